//! Simulated time horizon
//!
//! The scheduler owns the clock; this module only answers questions about a
//! point in time relative to the selling horizon: is it still inside the
//! horizon, how much selling time remains, and has the restriction cutoff
//! for time-restricted products passed.

use serde::{Deserialize, Serialize};

/// Selling horizon with a trailing restriction window
///
/// # Example
/// ```
/// use seat_simulator_core_rs::TimeHorizon;
///
/// let horizon = TimeHorizon::new(179.0, 21.0);
/// assert_eq!(horizon.cutoff(), 158.0);
/// assert!(!horizon.is_restricted(158.0));
/// assert!(horizon.is_restricted(158.5));
/// assert_eq!(horizon.remaining(100.0), 79.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeHorizon {
    /// End of the selling period
    length: f64,
    /// Width of the final window in which restricted products are closed
    restriction_window: f64,
}

impl TimeHorizon {
    /// # Panics
    /// Panics unless `length > 0` and `0 <= restriction_window <= length`.
    /// Configuration validation reports these as errors before this point.
    pub fn new(length: f64, restriction_window: f64) -> Self {
        assert!(length > 0.0 && length.is_finite(), "horizon must be positive");
        assert!(
            (0.0..=length).contains(&restriction_window),
            "restriction window must lie within the horizon"
        );
        Self {
            length,
            restriction_window,
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn restriction_window(&self) -> f64 {
        self.restriction_window
    }

    /// Instant after which time-restricted products stop selling.
    pub fn cutoff(&self) -> f64 {
        self.length - self.restriction_window
    }

    /// Strictly past the cutoff.
    pub fn is_restricted(&self, t: f64) -> bool {
        t > self.cutoff()
    }

    /// Selling time left at `t` (negative once past the horizon).
    pub fn remaining(&self, t: f64) -> f64 {
        self.length - t
    }

    pub fn contains(&self, t: f64) -> bool {
        t <= self.length
    }
}
