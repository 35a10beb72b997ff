//! Per-class arrival cycle
//!
//! One handler serves every class; the class travels inside the scheduled
//! [`ArrivalEvent`]. On each arrival:
//!
//! ```text
//! 1. count the arrival (total and per class)
//! 2. resolve the customer's choice
//! 3. draw the class's next arrival instant
//! 4. schedule it if it falls inside the horizon, otherwise retire the class
//! ```
//!
//! The driver never schedules departures: a sale consumes inventory for good.

use super::{ArrivalProcess, IntensityProfile};
use crate::antithetic::Parity;
use crate::choice::{ChoiceModel, Decision};
use crate::config::ConfigError;
use crate::core::time::TimeHorizon;
use crate::models::catalogue::{Catalogue, ClassId};
use crate::models::event::Event;
use crate::models::state::ReplicationState;
use crate::rng::UniformSource;
use crate::scheduler::EventScheduler;
use crate::variates::{
    exponential_interarrival, non_homogeneous_arrival, normal_interarrival, VariateError,
};

/// Smallest intensity used for an exponential gap. A class whose intensity is
/// exactly zero still gets a finite (very large) gap instead of `inf`/`NaN`.
pub const RATE_FLOOR: f64 = 1e-12;

/// Scheduled arrival of one customer of `class`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalEvent {
    pub class: ClassId,
}

/// Draws and schedules arrivals for every customer class.
#[derive(Debug, Clone, Copy)]
pub struct ArrivalProcessDriver {
    process: ArrivalProcess,
    horizon: TimeHorizon,
}

impl ArrivalProcessDriver {
    /// # Errors
    /// [`ConfigError::MissingNormalParams`] when the normal process is chosen
    /// and a class has no `(mu, sigma)`.
    pub fn new(
        process: ArrivalProcess,
        horizon: TimeHorizon,
        catalogue: &Catalogue,
    ) -> Result<Self, ConfigError> {
        if process == ArrivalProcess::Normal {
            if let Some(class) = catalogue.classes().iter().find(|c| c.normal.is_none()) {
                return Err(ConfigError::MissingNormalParams(class.name.clone()));
            }
        }
        Ok(Self { process, horizon })
    }

    pub fn process(&self) -> ArrivalProcess {
        self.process
    }

    pub fn horizon(&self) -> &TimeHorizon {
        &self.horizon
    }

    fn thinned<S: UniformSource>(
        &self,
        intensity: IntensityProfile,
        bound: f64,
        t0: f64,
        source: &mut S,
        parity: Parity,
    ) -> Result<f64, VariateError> {
        let length = self.horizon.length();
        non_homogeneous_arrival(
            source,
            t0,
            length,
            |t| intensity.rate_at(t, length),
            bound,
            parity,
        )
    }

    /// First arrival of `class`, by thinning from `t = 0`.
    pub fn first_arrival<S: UniformSource>(
        &self,
        catalogue: &Catalogue,
        class: ClassId,
        source: &mut S,
        parity: Parity,
    ) -> Result<f64, VariateError> {
        let c = catalogue.class(class);
        self.thinned(c.intensity, c.effective_rate_bound(), 0.0, source, parity)
    }

    /// Arrival following one at time `t`.
    pub fn next_arrival<S: UniformSource>(
        &self,
        catalogue: &Catalogue,
        class: ClassId,
        t: f64,
        source: &mut S,
        parity: Parity,
    ) -> Result<f64, VariateError> {
        let c = catalogue.class(class);
        match self.process {
            ArrivalProcess::Exponential => {
                let rate = c.intensity.rate_at(t, self.horizon.length()).max(RATE_FLOOR);
                Ok(t + exponential_interarrival(source, rate, parity)?)
            }
            ArrivalProcess::Thinned => {
                self.thinned(c.intensity, c.effective_rate_bound(), t, source, parity)
            }
            ArrivalProcess::Normal => {
                let params = c.normal.ok_or(VariateError::InvalidNormalParameters {
                    mu: f64::NAN,
                    sigma: f64::NAN,
                })?;
                Ok(t + normal_interarrival(source, params.mu, params.sigma, parity)?)
            }
        }
    }

    /// Schedule `class` at `time` if it lies inside the horizon; otherwise log
    /// that the class is retired for this replication.
    fn schedule_or_retire<Sch: EventScheduler<ArrivalEvent>>(
        &self,
        scheduler: &mut Sch,
        state: &mut ReplicationState,
        class: ClassId,
        time: f64,
    ) {
        if self.horizon.contains(time) {
            scheduler.schedule_at(time, ArrivalEvent { class });
        } else {
            state.log.log(Event::HorizonReached { time, class });
        }
    }

    /// Replication-initialization hook: schedule the first arrival of every class.
    pub fn initialize<Sch, S>(
        &self,
        catalogue: &Catalogue,
        state: &mut ReplicationState,
        scheduler: &mut Sch,
        source: &mut S,
        parity: Parity,
    ) -> Result<(), VariateError>
    where
        Sch: EventScheduler<ArrivalEvent>,
        S: UniformSource,
    {
        for class in 0..catalogue.num_classes() {
            let first = self.first_arrival(catalogue, class, source, parity)?;
            self.schedule_or_retire(scheduler, state, class, first);
        }
        Ok(())
    }

    /// Handle one arrival of `event.class` at the scheduler's current time.
    #[allow(clippy::too_many_arguments)]
    pub fn on_arrival<Sch, S>(
        &self,
        catalogue: &Catalogue,
        choice: &ChoiceModel,
        state: &mut ReplicationState,
        scheduler: &mut Sch,
        event: ArrivalEvent,
        source: &mut S,
        parity: Parity,
    ) -> Result<Decision, VariateError>
    where
        Sch: EventScheduler<ArrivalEvent>,
        S: UniformSource,
    {
        let t = scheduler.now();
        let class = event.class;

        state.registry.increment(state.counters.arrivals);
        state.registry.increment(state.counters.class_arrivals[class]);
        state.log.log(Event::Arrival { time: t, class });

        let decision = choice.serve(catalogue, state, &self.horizon, t, class, source, parity);

        let next = self.next_arrival(catalogue, class, t, source, parity)?;
        self.schedule_or_retire(scheduler, state, class, next);
        Ok(decision)
    }
}
