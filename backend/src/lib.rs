//! Seat Simulator Core - Rust Engine
//!
//! Stochastic core of a revenue-management simulation: customers of several
//! classes arrive over a finite selling horizon, see the fares currently on
//! offer, and either buy or leave. Replications are paired antithetically.
//!
//! # Architecture
//!
//! - **rng**: Deterministic uniform streams (xorshift64*, scripted)
//! - **variates**: Exponential, truncated-normal and thinned arrival instants
//! - **antithetic**: Replication parity, seed pairing and hand-off
//! - **arrivals**: Intensity profiles and the per-class arrival driver
//! - **choice**: Availability rules and the inverse-CDF purchase decision
//! - **models**: Catalogue, inventory, replication state, event log
//! - **metrics**: Named counters and derived measures
//! - **scheduler**: Future event list
//! - **orchestrator**: Replication model, runner and experiments
//! - **config**: JSON configuration and validation
//!
//! # Critical Invariants
//!
//! 1. All prices and revenue are integral (i64)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Seats sold never exceed capacity
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod antithetic;
pub mod arrivals;
pub mod choice;
pub mod config;
pub mod core;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod scheduler;
pub mod variates;

// Re-exports for convenience
pub use antithetic::{AntitheticController, Parity, ReplicationHandoff, ReplicationPairing};
pub use arrivals::{ArrivalEvent, ArrivalProcess, ArrivalProcessDriver, IntensityProfile};
pub use choice::{AvailabilityPolicy, ChoiceModel, Decision, PurchasePolicy};
pub use config::{ConfigError, Policy, SimulationConfig};
pub use core::time::TimeHorizon;
pub use metrics::{CounterRegistry, Measures};
pub use models::{Catalogue, CustomerClass, Event, EventLog, Product, RejectionReason};
pub use orchestrator::{
    run_replication, Experiment, ExperimentSummary, ReplicationResult, SeatInventoryModel,
    SimulationError,
};
pub use rng::{RngManager, ScriptedSource, UniformSource};
pub use scheduler::{Calendar, EventScheduler};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn seat_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulation::PySimulation>()?;
    Ok(())
}
