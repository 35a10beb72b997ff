//! Simulation configuration
//!
//! A [`SimulationConfig`] is everything a run needs: horizon, seed, catalogue
//! and the [`Policy`] switches. It loads from JSON, validates in one place and
//! hashes to a stable SHA-256 digest used to match seed hand-offs.
//!
//! # Example
//!
//! ```rust
//! use seat_simulator_core_rs::config::SimulationConfig;
//!
//! let config = SimulationConfig::reference();
//! config.validate().unwrap();
//!
//! let json = config.to_json().unwrap();
//! let loaded = SimulationConfig::from_json(&json).unwrap();
//! assert_eq!(loaded.digest().unwrap(), config.digest().unwrap());
//! ```

use crate::antithetic::ReplicationPairing;
use crate::arrivals::{ArrivalProcess, IntensityProfile};
use crate::choice::{AvailabilityPolicy, PurchasePolicy};
use crate::core::time::TimeHorizon;
use crate::models::catalogue::{Catalogue, CustomerClass, Product};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Catalogue has no products")]
    EmptyCatalogue,

    #[error("At least one customer class is required")]
    NoCustomerClasses,

    #[error("Catalogue has no no-purchase product (a product with unbounded capacity)")]
    MissingSink,

    #[error("Catalogue has more than one no-purchase product: {0:?}")]
    MultipleSinks(Vec<String>),

    #[error("No-purchase product {0} must have price 0")]
    PricedSink(String),

    #[error("No-purchase product {0} cannot be time-restricted")]
    RestrictedSink(String),

    #[error("Product {0} has a negative price")]
    NegativePrice(String),

    #[error("Class {class} has {found} weights, expected {expected}")]
    WeightLengthMismatch {
        class: String,
        expected: usize,
        found: usize,
    },

    #[error("Class {class} has invalid weight {weight} for product {product}")]
    InvalidWeight {
        class: String,
        product: String,
        weight: f64,
    },

    #[error("Class {0} has only zero weights")]
    AllZeroWeights(String),

    #[error("Class {0} has a non-positive or non-finite intensity parameter")]
    InvalidIntensity(String),

    #[error("Class {class} has invalid rate bound {bound}")]
    NonPositiveRateBound { class: String, bound: f64 },

    #[error("Class {class} has invalid normal parameters: mu={mu}, sigma={sigma}")]
    InvalidNormalParams { class: String, mu: f64, sigma: f64 },

    #[error("Normal arrivals selected but class {0} has no (mu, sigma)")]
    MissingNormalParams(String),

    #[error("Horizon must be positive and finite, got {0}")]
    InvalidHorizon(f64),

    #[error("Restriction window {window} lies outside [0, {horizon}]")]
    InvalidRestrictionWindow { window: f64, horizon: f64 },

    #[error("Malformed configuration: {0}")]
    Json(String),
}

/// Behavioural switches, fixed for the life of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub availability: AvailabilityPolicy,
    #[serde(default)]
    pub purchase: PurchasePolicy,
    #[serde(default)]
    pub arrivals: ArrivalProcess,
    #[serde(default)]
    pub pairing: ReplicationPairing,
}

fn default_record_events() -> bool {
    true
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Length of the selling horizon
    pub horizon: f64,

    /// Seed of the controller's generator
    pub seed: u64,

    /// Time-restricted products close for the final `restriction_window` units
    #[serde(default)]
    pub restriction_window: f64,

    /// Products in catalogue order; exactly one must be the unbounded sink
    pub products: Vec<Product>,

    pub classes: Vec<CustomerClass>,

    #[serde(default)]
    pub policy: Policy,

    /// Keep a per-replication event log
    #[serde(default = "default_record_events")]
    pub record_events: bool,
}

impl SimulationConfig {
    /// The reference three-class, nine-fare scenario.
    pub fn reference() -> Self {
        const HORIZON: f64 = 179.0;
        let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I"];
        let prices = [1000, 900, 850, 750, 700, 650, 600, 500, 350];

        let mut products: Vec<Product> = names
            .iter()
            .zip(prices)
            .map(|(name, price)| {
                let product = Product::new(name, 20, price);
                if *name == "D" || *name == "H" {
                    product.with_time_restriction()
                } else {
                    product
                }
            })
            .collect();
        products.push(Product::sink("reject"));

        let classes = vec![
            CustomerClass::new(
                "business",
                vec![11.0, 15.0, 18.0, 20.0, 19.0, 15.0, 12.0, 11.0, 13.0, 8.0],
                IntensityProfile::Sine {
                    amplitude: 1.2,
                    period: 180.0,
                },
            )
            .with_normal(1.0, 0.5),
            CustomerClass::new(
                "leisure",
                vec![8.0, 9.0, 11.0, 12.0, 14.0, 15.0, 16.0, 18.0, 20.0, 8.0],
                IntensityProfile::Linear { amplitude: 0.6 },
            )
            .with_normal(1.6, 0.8),
            CustomerClass::new(
                "economy",
                vec![1.0, 5.0, 8.0, 10.0, 11.0, 12.0, 13.0, 15.0, 20.0, 8.0],
                IntensityProfile::InverseSine {
                    amplitude: 0.8,
                    period: 180.0,
                },
            )
            .with_normal(1.4, 0.7),
        ];

        Self {
            horizon: HORIZON,
            seed: 0,
            restriction_window: 21.0,
            products,
            classes,
            policy: Policy::default(),
            record_events: true,
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_record_events(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }

    /// Check every configuration invariant.
    ///
    /// # Errors
    /// The first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_horizon()?;
        self.catalogue()?;
        if self.policy.arrivals == ArrivalProcess::Normal {
            if let Some(class) = self.classes.iter().find(|c| c.normal.is_none()) {
                return Err(ConfigError::MissingNormalParams(class.name.clone()));
            }
        }
        Ok(())
    }

    /// Validated horizon and restriction window.
    pub fn time_horizon(&self) -> Result<TimeHorizon, ConfigError> {
        if !(self.horizon > 0.0 && self.horizon.is_finite()) {
            return Err(ConfigError::InvalidHorizon(self.horizon));
        }
        let window = self.restriction_window;
        if !(window >= 0.0 && window <= self.horizon) {
            return Err(ConfigError::InvalidRestrictionWindow {
                window,
                horizon: self.horizon,
            });
        }
        Ok(TimeHorizon::new(self.horizon, window))
    }

    /// Validated catalogue.
    pub fn catalogue(&self) -> Result<Catalogue, ConfigError> {
        Catalogue::new(self.products.clone(), self.classes.clone())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Hex SHA-256 of the compact JSON serialization.
    ///
    /// Field order follows the struct definitions, so equal configurations
    /// always produce equal digests. `record_events` only controls logging
    /// and is left out, so a hand-off stays valid across that switch.
    pub fn digest(&self) -> Result<String, ConfigError> {
        let mut sampled = self.clone();
        sampled.record_events = default_record_events();
        let json =
            serde_json::to_string(&sampled).map_err(|e| ConfigError::Json(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::reference()
    }
}
