//! In-memory deployment record store.
//!
//! The store is the only shared mutable state in the system. It is injected
//! into the orchestrator and the tester (never a global), so a persistent
//! backing store is a drop-in replacement at the constructor.
//!
//! Write discipline: the requester does the initial insert; after that,
//! exactly one worker (the one spawned for the record) mutates it. Pollers
//! only ever take snapshots.

use dashmap::DashMap;

use forge_core::{
    DeploymentId, DeploymentOutcome, DeploymentRecord, DeploymentState, StatusSnapshot,
};

/// Map of deployment id to record, process-lifetime only. A restart loses
/// every record; pollers of a lost id see not-found.
#[derive(Default)]
pub struct DeploymentStore {
    records: DashMap<DeploymentId, DeploymentRecord>,
}

impl DeploymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh record. Called once per deployment by the requester.
    pub fn insert(&self, record: DeploymentRecord) {
        self.records.insert(record.id, record);
    }

    /// Pure read: snapshot of one record, or `None` for unknown ids.
    pub fn snapshot(&self, id: DeploymentId) -> Option<StatusSnapshot> {
        self.records.get(&id).map(|r| r.snapshot())
    }

    /// Current state of one record.
    pub fn state(&self, id: DeploymentId) -> Option<DeploymentState> {
        self.records.get(&id).map(|r| r.state)
    }

    /// Frozen outcome of a completed record.
    pub fn outcome(&self, id: DeploymentId) -> Option<DeploymentOutcome> {
        self.records.get(&id).and_then(|r| r.outcome.clone())
    }

    /// Advance a record's state machine. Returns `false` for unknown ids
    /// and rejected (backwards/terminal) transitions.
    pub fn advance(&self, id: DeploymentId, next: DeploymentState) -> bool {
        match self.records.get_mut(&id) {
            Some(mut record) => record.advance(next),
            None => false,
        }
    }

    /// Freeze a successful outcome and mark the record completed.
    pub fn complete(&self, id: DeploymentId, outcome: DeploymentOutcome) -> bool {
        match self.records.get_mut(&id) {
            Some(mut record) => {
                if !record.advance(DeploymentState::Completed) {
                    return false;
                }
                record.outcome = Some(outcome);
                true
            }
            None => false,
        }
    }

    /// Record a terminal failure with its textual description. No partial
    /// result is stored.
    pub fn fail(&self, id: DeploymentId, error: impl Into<String>) -> bool {
        match self.records.get_mut(&id) {
            Some(mut record) => {
                if !record.advance(DeploymentState::Error) {
                    return false;
                }
                record.error = Some(error.into());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
