//! Variate generation for arrival instants
//!
//! Pure functions of a [`UniformSource`] and a replication [`Parity`]. Every
//! uniform goes through `parity.apply` before use, so an odd replication
//! replaying an even replication's stream sees `1 − u` at each draw.
//!
//! - [`exponential_interarrival`]: inverse transform, `−ln(1 − u) / rate`
//! - [`normal_interarrival`]: exponential-majorant rejection for `|Z|`,
//!   random sign, truncated to strictly positive gaps
//! - [`non_homogeneous_arrival`]: thinning against a constant majorant
//!
//! Logarithm arguments are floored at `f64::MIN_POSITIVE`, so a boundary
//! uniform yields a large finite value instead of `inf` or `NaN`.

use crate::antithetic::Parity;
use crate::rng::UniformSource;
use thiserror::Error;

/// Domain errors for variate parameters
#[derive(Debug, Error, PartialEq)]
pub enum VariateError {
    #[error("Rate must be positive and finite, got {0}")]
    NonPositiveRate(f64),

    #[error("Invalid normal parameters: mu={mu}, sigma={sigma}")]
    InvalidNormalParameters { mu: f64, sigma: f64 },
}

#[inline]
fn ln_floored(x: f64) -> f64 {
    x.max(f64::MIN_POSITIVE).ln()
}

/// Exponential gap with the given rate.
///
/// # Errors
/// [`VariateError::NonPositiveRate`] when `rate <= 0` or is not finite.
///
/// # Example
/// ```
/// use seat_simulator_core_rs::antithetic::Parity;
/// use seat_simulator_core_rs::rng::ScriptedSource;
/// use seat_simulator_core_rs::variates::exponential_interarrival;
///
/// let mut source = ScriptedSource::new(vec![0.5]);
/// let gap = exponential_interarrival(&mut source, 2.0, Parity::Even).unwrap();
/// assert!((gap - std::f64::consts::LN_2 / 2.0).abs() < 1e-12);
/// ```
pub fn exponential_interarrival<S: UniformSource>(
    source: &mut S,
    rate: f64,
    parity: Parity,
) -> Result<f64, VariateError> {
    if !(rate > 0.0 && rate.is_finite()) {
        return Err(VariateError::NonPositiveRate(rate));
    }
    let u = parity.apply(source.next_uniform());
    Ok(-ln_floored(1.0 - u) / rate)
}

/// Normal gap `mu + z·sigma`, resampled until strictly positive.
///
/// Each attempt draws `(u1, u2)` (parity-transformed), sets
/// `y1 = −ln u1`, `y2 = −ln u2` and accepts when `y2 ≥ (y1 − 1)² / 2`.
/// The sign of `y1` comes from one more raw uniform (`≤ 0.5` → positive).
/// There is no iteration cap; with valid parameters termination is
/// probabilistic but the expected number of attempts is small.
///
/// # Errors
/// [`VariateError::InvalidNormalParameters`] for non-finite parameters, a
/// negative `sigma`, or a degenerate `sigma = 0` with `mu <= 0` (no positive
/// candidate could ever be produced).
pub fn normal_interarrival<S: UniformSource>(
    source: &mut S,
    mu: f64,
    sigma: f64,
    parity: Parity,
) -> Result<f64, VariateError> {
    if !mu.is_finite() || !sigma.is_finite() || sigma < 0.0 || (sigma == 0.0 && mu <= 0.0) {
        return Err(VariateError::InvalidNormalParameters { mu, sigma });
    }

    loop {
        let u1 = parity.apply(source.next_uniform());
        let u2 = parity.apply(source.next_uniform());
        let y1 = -ln_floored(u1);
        let y2 = -ln_floored(u2);

        if y2 < (y1 - 1.0).powi(2) / 2.0 {
            continue;
        }

        let z = if source.next_uniform() <= 0.5 { y1 } else { -y1 };
        let candidate = mu + z * sigma;
        if candidate > 0.0 {
            return Ok(candidate);
        }
    }
}

/// Next arrival instant of a non-homogeneous Poisson process by thinning.
///
/// Starting from `t0`, repeatedly advances `t ← t − ln(u1) / rate_bound` and
/// returns `t` as soon as it passes `horizon` or `u2 ≤ rate_fn(t) / rate_bound`.
/// A returned value greater than `horizon` means no further arrival.
///
/// `rate_bound` must dominate `rate_fn` on `[t0, horizon]`; this is not
/// checked and a violated bound silently biases the output.
///
/// # Errors
/// [`VariateError::NonPositiveRate`] when `rate_bound` is not positive and finite.
pub fn non_homogeneous_arrival<S, F>(
    source: &mut S,
    t0: f64,
    horizon: f64,
    rate_fn: F,
    rate_bound: f64,
    parity: Parity,
) -> Result<f64, VariateError>
where
    S: UniformSource,
    F: Fn(f64) -> f64,
{
    if !(rate_bound > 0.0 && rate_bound.is_finite()) {
        return Err(VariateError::NonPositiveRate(rate_bound));
    }

    let mut t = t0;
    loop {
        let u1 = parity.apply(source.next_uniform());
        t -= ln_floored(u1) / rate_bound;
        if t > horizon {
            return Ok(t);
        }

        let u2 = parity.apply(source.next_uniform());
        if u2 <= rate_fn(t) / rate_bound {
            return Ok(t);
        }
    }
}
