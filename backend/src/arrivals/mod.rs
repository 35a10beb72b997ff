//! Arrival processes for customer classes.
//!
//! Each class arrives according to a time-varying intensity evaluated on the
//! remaining selling time `s = horizon − t`. How the next arrival instant is
//! drawn from that intensity is chosen once per model by [`ArrivalProcess`].
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same arrivals
//! 2. **Per-Class Intensity**: Each class has its own [`IntensityProfile`]
//! 3. **Known Majorant**: Every profile can bound itself, so thinning is
//!    always available for the first arrival of a class
//!
//! # Example
//!
//! ```
//! use seat_simulator_core_rs::arrivals::IntensityProfile;
//!
//! let business = IntensityProfile::Sine { amplitude: 1.2, period: 180.0 };
//! let rate = business.rate_at(89.0, 179.0);
//! assert!((rate - 1.2).abs() < 1e-12);
//! assert_eq!(business.majorant(), 1.2);
//! ```

pub mod driver;

pub use driver::{ArrivalEvent, ArrivalProcessDriver, RATE_FLOOR};

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Time-varying arrival intensity of one customer class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntensityProfile {
    /// `rate`
    Constant { rate: f64 },

    /// `amplitude · sin(π·s / period)`; peaks mid-horizon when `period ≈ 2·horizon`
    Sine { amplitude: f64, period: f64 },

    /// `amplitude · s / horizon`; decays linearly to zero at the horizon
    Linear { amplitude: f64 },

    /// `amplitude · (1 − sin(π·s / period))`
    InverseSine { amplitude: f64, period: f64 },
}

impl IntensityProfile {
    /// Intensity at time `t`, clamped at zero.
    pub fn rate_at(&self, t: f64, horizon: f64) -> f64 {
        let s = horizon - t;
        let rate = match *self {
            IntensityProfile::Constant { rate } => rate,
            IntensityProfile::Sine { amplitude, period } => amplitude * (PI * s / period).sin(),
            IntensityProfile::Linear { amplitude } => amplitude * s / horizon,
            IntensityProfile::InverseSine { amplitude, period } => {
                amplitude * (1.0 - (PI * s / period).sin())
            }
        };
        rate.max(0.0)
    }

    /// Constant upper bound on [`Self::rate_at`] over any time range.
    pub fn majorant(&self) -> f64 {
        match *self {
            IntensityProfile::Constant { rate } => rate.abs(),
            IntensityProfile::Sine { amplitude, .. } => amplitude.abs(),
            IntensityProfile::Linear { amplitude } => amplitude.abs(),
            IntensityProfile::InverseSine { amplitude, .. } => 2.0 * amplitude.abs(),
        }
    }

    /// Positive, finite level and (where present) period.
    pub fn parameters_valid(&self) -> bool {
        let positive = |x: f64| x > 0.0 && x.is_finite();
        match *self {
            IntensityProfile::Constant { rate } => positive(rate),
            IntensityProfile::Sine { amplitude, period }
            | IntensityProfile::InverseSine { amplitude, period } => {
                positive(amplitude) && positive(period)
            }
            IntensityProfile::Linear { amplitude } => positive(amplitude),
        }
    }
}

/// Mean and standard deviation of a normal interarrival gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mu: f64,
    pub sigma: f64,
}

/// How interarrival gaps are drawn after the first arrival of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalProcess {
    /// Exponential gap at the intensity evaluated at the current arrival
    #[default]
    Exponential,
    /// Thinning against the class majorant
    Thinned,
    /// Truncated normal gap from the class `(mu, sigma)`
    Normal,
}
