//! Orchestrator - replication model, runner and experiments
//!
//! See `engine.rs` for the model hooks and `experiment.rs` for
//! multi-replication summaries.

pub mod engine;
pub mod experiment;

pub use engine::{run_replication, ReplicationResult, SeatInventoryModel, SimulationError};
pub use experiment::{Experiment, ExperimentSummary, MeasureSummary};
