//! Multi-replication experiments
//!
//! Replications run sequentially on one model, so an antithetic pair is
//! never split. Each named measure is summarised as mean, sample standard
//! deviation and 95% confidence half-width `1.96·s/√n`. Under antithetic
//! pairing the summary also reports statistics over pair averages, which are
//! the independent observations the variance reduction acts on.

use super::engine::{run_replication, ReplicationResult, SeatInventoryModel, SimulationError};
use crate::antithetic::{AntitheticController, Parity, ReplicationHandoff, ReplicationPairing};
use crate::arrivals::ArrivalEvent;
use crate::config::SimulationConfig;
use crate::scheduler::Calendar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normal quantile for a two-sided 95% interval
const Z_95: f64 = 1.96;

/// Sample statistics of one measure across replications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureSummary {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
    pub half_width: f64,
    pub n: usize,
}

impl MeasureSummary {
    pub fn from_samples(name: &str, samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self {
                name: name.to_string(),
                mean: 0.0,
                std_dev: 0.0,
                half_width: 0.0,
                n: 0,
            };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        Self {
            name: name.to_string(),
            mean,
            std_dev,
            half_width: Z_95 * std_dev / (n as f64).sqrt(),
            n,
        }
    }

    pub fn ci_lower(&self) -> f64 {
        self.mean - self.half_width
    }

    pub fn ci_upper(&self) -> f64 {
        self.mean + self.half_width
    }
}

/// Experiment-level report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub experiment_id: Uuid,
    pub config_digest: String,
    pub replications: usize,
    pub measures: Vec<MeasureSummary>,

    /// Statistics over (even, odd) pair averages; empty without complete pairs
    pub paired: Vec<MeasureSummary>,
}

impl ExperimentSummary {
    pub fn measure(&self, name: &str) -> Option<&MeasureSummary> {
        self.measures.iter().find(|m| m.name == name)
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self).map_err(|e| SimulationError::Serialization(e.to_string()))
    }
}

/// Sequence of replications sharing one model and one controller.
///
/// # Example
///
/// ```rust
/// use seat_simulator_core_rs::config::SimulationConfig;
/// use seat_simulator_core_rs::orchestrator::Experiment;
///
/// let config = SimulationConfig::reference().with_record_events(false);
/// let mut experiment = Experiment::new(config).unwrap();
/// let summary = experiment.run(4).unwrap();
///
/// assert_eq!(summary.replications, 4);
/// assert_eq!(summary.paired[0].n, 2);
/// ```
#[derive(Debug)]
pub struct Experiment {
    id: Uuid,
    digest: String,
    model: SeatInventoryModel,
    calendar: Calendar<ArrivalEvent>,
    results: Vec<ReplicationResult>,
}

impl Experiment {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let digest = config.digest()?;
        Ok(Self {
            id: Uuid::new_v4(),
            digest,
            model: SeatInventoryModel::new(config)?,
            calendar: Calendar::new(),
            results: Vec::new(),
        })
    }

    /// Continue experiment `experiment_id` on another worker from a seed
    /// hand-off.
    ///
    /// # Errors
    /// [`SimulationError::Handoff`] when the hand-off was produced for a
    /// different configuration or a different experiment.
    pub fn resume(
        config: SimulationConfig,
        handoff: &ReplicationHandoff,
        experiment_id: Uuid,
    ) -> Result<Self, SimulationError> {
        let digest = config.digest()?;
        let controller = AntitheticController::resume(handoff, experiment_id, &digest)?;
        Ok(Self {
            id: experiment_id,
            digest,
            model: SeatInventoryModel::new(config)?.with_controller(controller),
            calendar: Calendar::new(),
            results: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config_digest(&self) -> &str {
        &self.digest
    }

    pub fn model(&self) -> &SeatInventoryModel {
        &self.model
    }

    pub fn results(&self) -> &[ReplicationResult] {
        &self.results
    }

    /// Run the next replication and keep its result.
    pub fn run_replication(&mut self) -> Result<&ReplicationResult, SimulationError> {
        let result = run_replication(&mut self.model, &mut self.calendar)?;
        self.results.push(result);
        Ok(&self.results[self.results.len() - 1])
    }

    /// Run `n` more replications and summarise everything run so far.
    pub fn run(&mut self, n: usize) -> Result<ExperimentSummary, SimulationError> {
        for _ in 0..n {
            self.run_replication()?;
        }
        Ok(self.summary())
    }

    /// State another worker needs to continue this experiment.
    pub fn handoff(&self) -> ReplicationHandoff {
        self.model.controller().handoff(self.id, &self.digest)
    }

    pub fn summary(&self) -> ExperimentSummary {
        let names: Vec<String> = self
            .results
            .first()
            .map(|r| r.measures.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default();

        let measures = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let samples: Vec<f64> = self.results.iter().map(|r| r.measures[i].1).collect();
                MeasureSummary::from_samples(name, &samples)
            })
            .collect();

        let pairs = self.complete_pairs();
        let paired = if pairs.is_empty() {
            Vec::new()
        } else {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let samples: Vec<f64> = pairs
                        .iter()
                        .map(|(even, odd)| 0.5 * (even.measures[i].1 + odd.measures[i].1))
                        .collect();
                    MeasureSummary::from_samples(name, &samples)
                })
                .collect()
        };

        ExperimentSummary {
            experiment_id: self.id,
            config_digest: self.digest.clone(),
            replications: self.results.len(),
            measures,
            paired,
        }
    }

    /// Consecutive (even, odd) results sharing a seed.
    fn complete_pairs(&self) -> Vec<(&ReplicationResult, &ReplicationResult)> {
        if self.model.controller().pairing() != ReplicationPairing::Antithetic {
            return Vec::new();
        }
        self.results
            .windows(2)
            .filter(|w| {
                w[0].parity == Parity::Even && w[1].parity == Parity::Odd && w[0].seed == w[1].seed
            })
            .map(|w| (&w[0], &w[1]))
            .collect()
    }
}
