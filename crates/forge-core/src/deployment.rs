//! Deployment records and the per-deployment state machine.
//!
//! Each deployment attempt gets a fresh [`DeploymentId`]; records are never
//! reused across attempts, even for an identical profile. A record's state
//! only moves forward:
//!
//! ```text
//! Pending ──> InProgress ──> Completed
//!                       └──> Error
//! ```
//!
//! Records live in process memory for the lifetime of the process. A restart
//! loses them all; pollers of a now-unknown id get a not-found signal.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::AgentProfile;

/// Unique token identifying one deployment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(Uuid);

impl DeploymentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for DeploymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of one deployment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    Pending,
    InProgress,
    Completed,
    Error,
}

impl DeploymentState {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentState::Completed | DeploymentState::Error)
    }

    /// Whether a transition from `self` to `next` moves strictly forward.
    pub fn can_advance_to(&self, next: DeploymentState) -> bool {
        use DeploymentState::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (Pending, Error) | (InProgress, Completed) | (InProgress, Error)
        )
    }
}

impl std::fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeploymentState::Pending => "pending",
            DeploymentState::InProgress => "in_progress",
            DeploymentState::Completed => "completed",
            DeploymentState::Error => "error",
        };
        f.write_str(s)
    }
}

/// Frozen result payload of a successful deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentOutcome {
    /// Hosted-resource identifier returned by the platform, e.g.
    /// `projects/p/locations/l/reasoningEngines/123`.
    pub resource_name: String,
    /// Callable endpoint URL for the hosted runtime.
    pub endpoint_url: String,
    /// Display name (the profile's agent name).
    pub display_name: String,
    /// Profile description, echoed for display.
    pub description: String,
    /// Whether the post-creation warmup probe got a response. A failed
    /// probe does not fail the deployment; it only clears this flag.
    pub endpoint_validated: bool,
    /// The system instruction captured at deploy time. Needed to replay the
    /// agent's behaviour through the raw generateContent fallback.
    pub system_instruction: String,
    /// Copy of the profile the deployment was created from.
    pub profile: AgentProfile,
    /// Wall-clock creation time.
    pub created_at: DateTime<Utc>,
}

/// One deployment attempt, owned by the worker that created it.
///
/// Not serializable: `started_at` is a monotonic instant used for elapsed
/// time. Pollers read a [`StatusSnapshot`] instead.
#[derive(Debug, Clone)]
pub struct DeploymentRecord {
    pub id: DeploymentId,
    pub state: DeploymentState,
    pub profile: AgentProfile,
    pub started_at: Instant,
    pub outcome: Option<DeploymentOutcome>,
    pub error: Option<String>,
}

impl DeploymentRecord {
    /// Create a fresh record in `Pending`.
    pub fn new(profile: AgentProfile) -> Self {
        Self {
            id: DeploymentId::new(),
            state: DeploymentState::Pending,
            profile,
            started_at: Instant::now(),
            outcome: None,
            error: None,
        }
    }

    /// Advance the state machine. Returns `false` (and leaves the record
    /// untouched) if the transition would move backwards or out of a
    /// terminal state.
    pub fn advance(&mut self, next: DeploymentState) -> bool {
        if !self.state.can_advance_to(next) {
            return false;
        }
        self.state = next;
        true
    }

    /// Read-model projection used by the polling path.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            id: self.id,
            status: self.state,
            elapsed_seconds: self.started_at.elapsed().as_secs_f64(),
            result: self.outcome.clone(),
            error: self.error.clone(),
        }
    }
}

/// What a poller sees: pure read, computed as "now minus start".
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub id: DeploymentId,
    pub status: DeploymentState,
    pub elapsed_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DeploymentOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
