//! Mock deployment engine for `forge-vertex` integration tests.
//!
//! [`MockEngine`] implements [`forge_vertex::AgentEngine`] and is the
//! canonical test double for the end-to-end deployment tests: it records
//! every call, returns configurable canned results queued at construction
//! time, and falls back to sensible defaults when a queue is empty.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use forge_vertex::engine::{AgentEngine, EngineSpec};
use forge_vertex::error::VertexError;

/// Recorded calls and queued results for one [`MockEngine`].
#[derive(Default)]
struct MockState {
    /// Every spec passed to `create`, in call order.
    create_calls: Vec<EngineSpec>,
    /// Every `(resource_name, input)` passed to `query`, in call order.
    query_calls: Vec<(String, String)>,
    /// FIFO queue of `create` results. Empty queue → default resource name.
    create_results: VecDeque<Result<String, VertexError>>,
    /// FIFO queue of `query` results. Empty queue → default `{"output": …}`.
    query_results: VecDeque<Result<serde_json::Value, VertexError>>,
}

/// Deterministic, in-process mock of the managed deployment API.
pub struct MockEngine {
    state: Arc<Mutex<MockState>>,
}

impl MockEngine {
    pub fn builder() -> MockEngineBuilder {
        MockEngineBuilder::default()
    }

    pub fn create_call_count(&self) -> usize {
        self.state.lock().expect("mock state mutex poisoned").create_calls.len()
    }

    pub fn query_call_count(&self) -> usize {
        self.state.lock().expect("mock state mutex poisoned").query_calls.len()
    }

    /// The most recent spec passed to `create`, if any.
    pub fn last_create_spec(&self) -> Option<EngineSpec> {
        self.state
            .lock()
            .expect("mock state mutex poisoned")
            .create_calls
            .last()
            .cloned()
    }

    /// Every `(resource_name, input)` pair passed to `query`.
    pub fn query_calls(&self) -> Vec<(String, String)> {
        self.state
            .lock()
            .expect("mock state mutex poisoned")
            .query_calls
            .clone()
    }
}

#[async_trait]
impl AgentEngine for MockEngine {
    async fn create(&self, spec: &EngineSpec) -> Result<String, VertexError> {
        let mut state = self.state.lock().expect("mock state mutex poisoned");
        state.create_calls.push(spec.clone());
        state
            .create_results
            .pop_front()
            .unwrap_or_else(|| Ok("projects/mock/locations/mock/reasoningEngines/1".to_string()))
    }

    async fn query(
        &self,
        resource_name: &str,
        input: &str,
    ) -> Result<serde_json::Value, VertexError> {
        let mut state = self.state.lock().expect("mock state mutex poisoned");
        state
            .query_calls
            .push((resource_name.to_string(), input.to_string()));
        state
            .query_results
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({"output": "mock output"})))
    }
}

/// Fluent builder for [`MockEngine`].
#[derive(Default)]
pub struct MockEngineBuilder {
    state: MockState,
}

impl MockEngineBuilder {
    /// Enqueue a successful `create` resolving to `resource_name`.
    pub fn create_succeeds(mut self, resource_name: impl Into<String>) -> Self {
        self.state.create_results.push_back(Ok(resource_name.into()));
        self
    }

    /// Enqueue a failing `create`.
    pub fn create_fails(mut self, error: VertexError) -> Self {
        self.state.create_results.push_back(Err(error));
        self
    }

    /// Enqueue a structured `query` response.
    pub fn query_responds(mut self, response: serde_json::Value) -> Self {
        self.state.query_results.push_back(Ok(response));
        self
    }

    /// Enqueue a failing `query` (e.g. for warmup-probe failure tests).
    pub fn query_fails(mut self, error: VertexError) -> Self {
        self.state.query_results.push_back(Err(error));
        self
    }

    pub fn build(self) -> MockEngine {
        MockEngine {
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}
