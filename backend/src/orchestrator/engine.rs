//! Replication model and runner
//!
//! [`SeatInventoryModel`] is the stochastic core of one seat-inventory
//! replication. It exposes the hooks a discrete-event runner drives:
//!
//! ```text
//! reset()       -> clear inventory, counters and log; advance the controller
//! initialize()  -> schedule the first arrival of every class
//! handle(e)     -> count, choose, sell or reject, schedule the next arrival
//! is_complete() -> every sellable product is sold out
//! ```
//!
//! [`run_replication`] is the minimal runner: it pops events from a
//! [`Calendar`] until the calendar drains, the horizon passes or the
//! inventory sells out.
//!
//! # Critical Invariants
//!
//! 1. **Determinism**: same config and seed produce the same replication
//! 2. **Single Stream**: every draw of a replication comes from the
//!    controller's generator, transformed by the replication's parity
//! 3. **Capacity**: `sold[i] <= capacity[i]` at every instant

use crate::antithetic::{AntitheticController, HandoffError, Parity, ReplicationTicket};
use crate::arrivals::{ArrivalEvent, ArrivalProcessDriver};
use crate::choice::{ChoiceModel, Decision};
use crate::config::{ConfigError, SimulationConfig};
use crate::core::time::TimeHorizon;
use crate::metrics::Measures;
use crate::models::catalogue::Catalogue;
use crate::models::event::Event;
use crate::models::state::ReplicationState;
use crate::scheduler::{Calendar, EventScheduler};
use crate::variates::VariateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors surfaced by the model and the runners
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Variate generation failed: {0}")]
    Variate(#[from] VariateError),

    #[error("Seed hand-off rejected: {0}")]
    Handoff(#[from] HandoffError),

    #[error("Replication not started: call reset() before initialize()")]
    NotStarted,

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

// ============================================================================
// Model
// ============================================================================

/// Stochastic core of a seat-inventory replication.
///
/// # Example
///
/// ```rust
/// use seat_simulator_core_rs::config::SimulationConfig;
/// use seat_simulator_core_rs::orchestrator::{run_replication, SeatInventoryModel};
/// use seat_simulator_core_rs::scheduler::Calendar;
///
/// let mut model = SeatInventoryModel::new(SimulationConfig::reference()).unwrap();
/// let mut calendar = Calendar::new();
///
/// let result = run_replication(&mut model, &mut calendar).unwrap();
/// assert_eq!(result.index, 0);
/// ```
#[derive(Debug, Clone)]
pub struct SeatInventoryModel {
    config: SimulationConfig,
    catalogue: Catalogue,
    horizon: TimeHorizon,
    choice: ChoiceModel,
    driver: ArrivalProcessDriver,
    controller: AntitheticController,
    state: ReplicationState,
    ticket: Option<ReplicationTicket>,
}

impl SeatInventoryModel {
    /// Validate `config` and build a model ready for its first replication.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let catalogue = config.catalogue()?;
        let horizon = config.time_horizon()?;
        let driver = ArrivalProcessDriver::new(config.policy.arrivals, horizon, &catalogue)?;
        let choice = ChoiceModel::new(config.policy.availability, config.policy.purchase);
        let controller = AntitheticController::new(config.seed, config.policy.pairing);
        let state = ReplicationState::new(&catalogue, config.record_events);

        Ok(Self {
            config,
            catalogue,
            horizon,
            choice,
            driver,
            controller,
            state,
            ticket: None,
        })
    }

    /// Replace the controller, e.g. with one resumed from a seed hand-off.
    pub fn with_controller(mut self, controller: AntitheticController) -> Self {
        self.controller = controller;
        self
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Replication-reset hook.
    pub fn reset(&mut self) -> ReplicationTicket {
        let ticket = self.controller.begin_replication();
        self.state.reset();
        self.state.log.log(Event::ReplicationStarted {
            time: 0.0,
            replication: ticket.index,
            parity: ticket.parity,
            seed: ticket.seed,
        });
        self.ticket = Some(ticket);
        ticket
    }

    /// Replication-initialization hook.
    ///
    /// # Errors
    /// [`SimulationError::NotStarted`] if [`Self::reset`] has never run.
    pub fn initialize<Sch: EventScheduler<ArrivalEvent>>(
        &mut self,
        scheduler: &mut Sch,
    ) -> Result<(), SimulationError> {
        if self.ticket.is_none() {
            return Err(SimulationError::NotStarted);
        }
        let parity = self.controller.parity();
        self.driver.initialize(
            &self.catalogue,
            &mut self.state,
            scheduler,
            self.controller.rng_mut(),
            parity,
        )?;
        Ok(())
    }

    /// Event handler: one customer arrival at `scheduler.now()`.
    pub fn handle<Sch: EventScheduler<ArrivalEvent>>(
        &mut self,
        event: ArrivalEvent,
        scheduler: &mut Sch,
    ) -> Result<Decision, SimulationError> {
        let parity = self.controller.parity();
        let decision = self.driver.on_arrival(
            &self.catalogue,
            &self.choice,
            &mut self.state,
            scheduler,
            event,
            self.controller.rng_mut(),
            parity,
        )?;
        Ok(decision)
    }

    /// Stop predicate: every sellable product is sold out.
    pub fn is_complete(&self) -> bool {
        self.state.inventory.all_sold_out()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn measures(&self) -> Measures<'_> {
        self.state.measures(&self.catalogue)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn horizon(&self) -> &TimeHorizon {
        &self.horizon
    }

    pub fn state(&self) -> &ReplicationState {
        &self.state
    }

    pub fn controller(&self) -> &AntitheticController {
        &self.controller
    }

    /// Ticket of the replication in progress, if any
    pub fn ticket(&self) -> Option<ReplicationTicket> {
        self.ticket
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Outcome of one replication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationResult {
    pub index: u64,
    pub parity: Parity,
    pub seed: u64,

    /// Every measure as `(name, value)`
    pub measures: Vec<(String, f64)>,

    /// Raw counter values by name
    pub counters: BTreeMap<String, f64>,

    pub events_processed: u64,

    /// Time of the last handled event (0 if none)
    pub end_time: f64,
}

impl ReplicationResult {
    pub fn measure(&self, name: &str) -> Option<f64> {
        self.measures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn counter(&self, name: &str) -> Option<f64> {
        self.counters.get(name).copied()
    }
}

/// Run one full replication of `model` on `calendar`.
///
/// The calendar is cleared first, so it can be reused across replications.
pub fn run_replication(
    model: &mut SeatInventoryModel,
    calendar: &mut Calendar<ArrivalEvent>,
) -> Result<ReplicationResult, SimulationError> {
    calendar.clear();
    let ticket = model.reset();
    model.initialize(calendar)?;

    let horizon = model.horizon().length();
    let mut events_processed = 0;
    let mut end_time = 0.0;

    while !model.is_complete() {
        match calendar.peek_time() {
            Some(time) if time <= horizon => {}
            _ => break,
        }
        let Some((time, event)) = calendar.pop_next() else {
            break;
        };
        model.handle(event, calendar)?;
        events_processed += 1;
        end_time = time;
    }

    Ok(ReplicationResult {
        index: ticket.index,
        parity: ticket.parity,
        seed: ticket.seed,
        measures: model.measures().named(),
        counters: model.state().registry.snapshot(),
        events_processed,
        end_time,
    })
}
