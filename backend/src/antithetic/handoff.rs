//! Seed hand-off between workers
//!
//! When replications of one experiment are spread across workers, the odd
//! half of a pair cannot start until the state captured at the start of the
//! even half has arrived. [`ReplicationHandoff`] is that message.
//!
//! # Critical Invariants
//!
//! - **Config Matching**: a hand-off only applies to the configuration whose
//!   digest it carries
//! - **Experiment Matching**: a hand-off never crosses experiments, even with
//!   identical configurations

use super::{Parity, ReplicationPairing};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while applying a hand-off
#[derive(Debug, Error, PartialEq)]
pub enum HandoffError {
    #[error("Config mismatch: expected digest {expected}, hand-off carries {found}")]
    ConfigMismatch { expected: String, found: String },

    #[error("Experiment mismatch: expected {expected}, hand-off carries {found}")]
    ExperimentMismatch { expected: Uuid, found: Uuid },

    #[error("Malformed hand-off payload: {0}")]
    Malformed(String),
}

/// Controller state transmitted between workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationHandoff {
    pub experiment_id: Uuid,

    /// SHA-256 digest of the experiment configuration
    pub config_digest: String,

    /// Index the receiving worker's next replication will get
    pub next_replication: u64,

    pub pairing: ReplicationPairing,

    /// Parity of the last replication started by the sender
    pub parity: Parity,

    /// Seed captured on entry to the sender's last even replication
    pub stored_seed: u64,

    /// Generator state at export time
    pub rng_state: u64,
}

impl ReplicationHandoff {
    pub fn verify(&self, experiment_id: Uuid, config_digest: &str) -> Result<(), HandoffError> {
        if self.config_digest != config_digest {
            return Err(HandoffError::ConfigMismatch {
                expected: config_digest.to_string(),
                found: self.config_digest.clone(),
            });
        }
        if self.experiment_id != experiment_id {
            return Err(HandoffError::ExperimentMismatch {
                expected: experiment_id,
                found: self.experiment_id,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, HandoffError> {
        serde_json::to_string(self).map_err(|e| HandoffError::Malformed(e.to_string()))
    }

    pub fn from_json(payload: &str) -> Result<Self, HandoffError> {
        serde_json::from_str(payload).map_err(|e| HandoffError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antithetic::AntitheticController;

    #[test]
    fn test_handoff_json_preserves_state() {
        let mut controller = AntitheticController::new(77, ReplicationPairing::Antithetic);
        controller.begin_replication();
        let id = Uuid::new_v4();

        let handoff = controller.handoff(id, "abc");
        let parsed = ReplicationHandoff::from_json(&handoff.to_json().unwrap()).unwrap();

        assert_eq!(parsed, handoff);
    }

    #[test]
    fn test_verify_rejects_foreign_digest() {
        let controller = AntitheticController::new(77, ReplicationPairing::Antithetic);
        let id = Uuid::new_v4();
        let handoff = controller.handoff(id, "abc");

        assert!(matches!(
            handoff.verify(id, "def"),
            Err(HandoffError::ConfigMismatch { .. })
        ));
        assert!(matches!(
            handoff.verify(Uuid::new_v4(), "abc"),
            Err(HandoffError::ExperimentMismatch { .. })
        ));
    }

    #[test]
    fn test_garbage_payload_is_malformed() {
        assert!(matches!(
            ReplicationHandoff::from_json("{not json"),
            Err(HandoffError::Malformed(_))
        ));
    }
}
