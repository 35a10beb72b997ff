//! PyO3 wrapper for experiments
//!
//! Exposes an [`Experiment`] to Python as `Simulation`. Configuration crosses
//! the boundary as a JSON string; results come back as JSON or plain dicts.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::antithetic::ReplicationHandoff;
use crate::config::SimulationConfig;
use crate::orchestrator::{Experiment, ReplicationResult};
use uuid::Uuid;

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

fn runtime_error(context: &str, e: impl std::fmt::Display) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("{}: {}", context, e))
}

/// Python wrapper for a multi-replication experiment
///
/// # Example (from Python)
///
/// ```python
/// import json
/// from seat_simulator_core_rs import Simulation
///
/// sim = Simulation(reference_config_json)
/// summary = json.loads(sim.run(100))
/// print(summary["measures"][0])
/// ```
#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: Experiment,
}

#[pymethods]
impl PySimulation {
    /// Create a simulation from a JSON configuration
    ///
    /// # Errors
    ///
    /// Raises ValueError if the JSON is malformed or fails validation.
    #[new]
    fn new(config_json: &str) -> PyResult<Self> {
        let config = SimulationConfig::from_json(config_json).map_err(value_error)?;
        let inner = Experiment::new(config)
            .map_err(|e| runtime_error("Failed to create simulation", e))?;
        Ok(PySimulation { inner })
    }

    /// Continue an experiment from a seed hand-off produced by `handoff()`
    ///
    /// `experiment_id` defaults to the id carried by the hand-off.
    ///
    /// # Errors
    ///
    /// Raises ValueError on malformed input or when the hand-off belongs to
    /// another configuration or experiment.
    #[staticmethod]
    #[pyo3(signature = (config_json, handoff_json, experiment_id=None))]
    fn resume(config_json: &str, handoff_json: &str, experiment_id: Option<&str>) -> PyResult<Self> {
        let config = SimulationConfig::from_json(config_json).map_err(value_error)?;
        let handoff = ReplicationHandoff::from_json(handoff_json).map_err(value_error)?;
        let experiment_id = match experiment_id {
            Some(id) => Uuid::parse_str(id).map_err(value_error)?,
            None => handoff.experiment_id,
        };
        let inner = Experiment::resume(config, &handoff, experiment_id).map_err(value_error)?;
        Ok(PySimulation { inner })
    }

    /// Reference scenario configuration as JSON
    #[staticmethod]
    fn reference_config() -> PyResult<String> {
        SimulationConfig::reference()
            .to_json()
            .map_err(|e| runtime_error("Failed to serialize config", e))
    }

    /// Run `replications` more replications; returns the summary as JSON
    fn run(&mut self, replications: usize) -> PyResult<String> {
        let summary = self
            .inner
            .run(replications)
            .map_err(|e| runtime_error("Simulation failed", e))?;
        summary
            .to_json()
            .map_err(|e| runtime_error("Failed to serialize summary", e))
    }

    /// Run a single replication; returns its measures and counters as a dict
    fn run_replication<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let result = self
            .inner
            .run_replication()
            .map_err(|e| runtime_error("Replication failed", e))?;
        replication_result_to_py(py, result)
    }

    /// Seed hand-off for continuing this experiment elsewhere, as JSON
    fn handoff(&self) -> PyResult<String> {
        self.inner
            .handoff()
            .to_json()
            .map_err(|e| runtime_error("Failed to serialize hand-off", e))
    }

    #[getter]
    fn experiment_id(&self) -> String {
        self.inner.id().to_string()
    }
}

fn replication_result_to_py<'py>(
    py: Python<'py>,
    result: &ReplicationResult,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("index", result.index)?;
    dict.set_item("even", result.parity.is_even())?;
    dict.set_item("seed", result.seed)?;
    dict.set_item("events_processed", result.events_processed)?;
    dict.set_item("end_time", result.end_time)?;

    let measures = PyDict::new_bound(py);
    for (name, value) in &result.measures {
        measures.set_item(name, value)?;
    }
    dict.set_item("measures", measures)?;

    let counters = PyDict::new_bound(py);
    for (name, value) in &result.counters {
        counters.set_item(name, value)?;
    }
    dict.set_item("counters", counters)?;

    Ok(dict)
}
