//! Asynchronous deployment orchestrator.
//!
//! One background worker per deployment, delegate-and-poll: `start` creates
//! the record, spawns the worker, and returns the fresh id immediately;
//! `status` is a pure read that never blocks or mutates. Workers never
//! share a record, so deployments run concurrently without mutual
//! exclusion.
//!
//! Credential resolution happens inside the platform client at call time; a
//! missing credential fails the worker into the `Error` state like any
//! other creation failure.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::{info, warn};

use forge_core::{
    AgentProfile, DeploymentId, DeploymentOutcome, DeploymentRecord, DeploymentState,
    PlatformSettings, StatusSnapshot, prompts,
};

use crate::engine::{AgentEngine, EngineSpec};
use crate::store::DeploymentStore;

/// Best-effort question asked right after creation to confirm the runtime
/// answers.
pub const WARMUP_QUERY: &str = "Hello, are you ready?";

/// Owns the deployment table and the per-deployment background workers.
pub struct Deployer {
    store: Arc<DeploymentStore>,
    engine: Arc<dyn AgentEngine>,
    settings: PlatformSettings,
    tasks: Arc<DashMap<DeploymentId, AbortHandle>>,
}

impl Deployer {
    pub fn new(
        store: Arc<DeploymentStore>,
        engine: Arc<dyn AgentEngine>,
        settings: PlatformSettings,
    ) -> Self {
        Self {
            store,
            engine,
            settings,
            tasks: Arc::new(DashMap::new()),
        }
    }

    /// Begin a deployment and return its fresh identifier without blocking.
    ///
    /// The profile is captured into the record by value; later edits to the
    /// caller's copy have no effect on the running deployment.
    pub fn start(&self, profile: AgentProfile) -> DeploymentId {
        let record = DeploymentRecord::new(profile.clone());
        let id = record.id;
        self.store.insert(record);

        let store = Arc::clone(&self.store);
        let engine = Arc::clone(&self.engine);
        let settings = self.settings.clone();
        let tasks = Arc::clone(&self.tasks);

        let handle = tokio::spawn(async move {
            run_worker(&store, engine.as_ref(), &settings, id, profile).await;
            tasks.remove(&id);
        });
        self.tasks.insert(id, handle.abort_handle());

        info!(deployment_id = %id, "deployment started");
        id
    }

    /// Poll one deployment. Pure read; `None` for unknown ids.
    pub fn status(&self, id: DeploymentId) -> Option<StatusSnapshot> {
        self.store.snapshot(id)
    }

    /// Abort an in-flight deployment.
    ///
    /// Returns `true` if the record was still live and is now marked
    /// `Error("deployment cancelled")`. The remote creation call may
    /// already be in flight; the platform-side resource can leak. The
    /// caller is warned, not protected.
    pub fn cancel(&self, id: DeploymentId) -> bool {
        if let Some((_, handle)) = self.tasks.remove(&id) {
            handle.abort();
        }
        let cancelled = self.store.fail(id, "deployment cancelled");
        if cancelled {
            warn!(deployment_id = %id, "deployment cancelled; remote resource may leak");
        }
        cancelled
    }

    pub fn store(&self) -> Arc<DeploymentStore> {
        Arc::clone(&self.store)
    }
}

/// The background unit of work for one deployment. Sole writer of its
/// record after the initial insert.
async fn run_worker(
    store: &DeploymentStore,
    engine: &dyn AgentEngine,
    settings: &PlatformSettings,
    id: DeploymentId,
    profile: AgentProfile,
) {
    if !store.advance(id, DeploymentState::InProgress) {
        // Cancelled before the worker got scheduled.
        return;
    }

    info!(deployment_id = %id, agent_name = %profile.agent_name, "worker starting runtime creation");

    let system_message = prompts::system_instruction(&profile);
    let spec = EngineSpec::new(&profile.agent_name, &profile.description, &system_message);

    let resource_name = match engine.create(&spec).await {
        Ok(name) => name,
        Err(e) => {
            warn!(deployment_id = %id, error = %e, "runtime creation failed");
            store.fail(id, e.to_string());
            return;
        }
    };

    let endpoint_url = format!("{}/v1beta1/{}:query", settings.api_host(), resource_name);

    // Warmup probe is best-effort: failure clears the validation flag but
    // never reverts a successful creation.
    let endpoint_validated = match engine.query(&resource_name, WARMUP_QUERY).await {
        Ok(_) => true,
        Err(e) => {
            warn!(
                deployment_id = %id,
                error = %e,
                "endpoint validation probe failed; runtime is deployed but unverified"
            );
            false
        }
    };

    let outcome = DeploymentOutcome {
        resource_name,
        endpoint_url,
        display_name: profile.agent_name.clone(),
        description: profile.description.clone(),
        endpoint_validated,
        system_instruction: system_message,
        profile,
        created_at: chrono::Utc::now(),
    };

    if store.complete(id, outcome) {
        info!(deployment_id = %id, validated = endpoint_validated, "deployment completed");
    }
}
