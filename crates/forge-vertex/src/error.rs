//! Platform-layer error types.

use forge_core::DeploymentState;
use thiserror::Error;

/// Errors from calls against the managed platform.
#[derive(Debug, Error)]
pub enum VertexError {
    /// No usable credential could be resolved for the call.
    #[error("no platform credentials available: {0}")]
    Auth(String),

    /// The platform answered with a non-success status.
    #[error("platform API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure before any status was received.
    #[error("network error: {0}")]
    Network(String),

    /// The request hit the client-side timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// The platform answered 2xx but the body did not have the expected
    /// shape.
    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

impl VertexError {
    /// Map a transport error onto the taxonomy.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VertexError::Timeout(err.to_string())
        } else {
            VertexError::Network(err.to_string())
        }
    }
}

/// Why one query-strategy tier did not produce an answer.
///
/// Both variants advance the chain to the next tier; the distinction only
/// matters for logging.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The tier's prerequisites are missing (no token, no endpoint). The
    /// tier was skipped without a round trip.
    #[error("strategy unavailable: {0}")]
    Unavailable(String),

    /// The tier made its call and it failed.
    #[error("strategy failed: {0}")]
    Failed(String),
}

/// Terminal errors from the agent tester, surfaced to the API boundary.
#[derive(Debug, Error)]
pub enum TesterError {
    #[error("deployment not found")]
    NotFound,

    #[error("deployment not complete (status: {0})")]
    NotReady(DeploymentState),
}
