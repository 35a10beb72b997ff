//! Variate generator tests
//!
//! Exact checks use a scripted uniform source; distributional checks use a
//! seeded xorshift stream with tolerances wide enough to be deterministic.

use seat_simulator_core_rs::antithetic::Parity;
use seat_simulator_core_rs::rng::{RngManager, ScriptedSource, UniformSource};
use seat_simulator_core_rs::variates::{
    exponential_interarrival, non_homogeneous_arrival, normal_interarrival, VariateError,
};

// ============================================================================
// Exponential
// ============================================================================

#[test]
fn test_exponential_mean_matches_rate() {
    let mut rng = RngManager::new(12345);
    let rate = 2.0;
    let n = 20_000;

    let total: f64 = (0..n)
        .map(|_| exponential_interarrival(&mut rng, rate, Parity::Even).unwrap())
        .sum();
    let mean = total / n as f64;

    assert!((mean - 0.5).abs() < 0.02, "mean {} too far from 0.5", mean);
}

#[test]
fn test_exponential_odd_parity_complements_uniform() {
    let mut even_source = ScriptedSource::new(vec![0.3]);
    let mut odd_source = ScriptedSource::new(vec![0.3]);

    let even = exponential_interarrival(&mut even_source, 1.0, Parity::Even).unwrap();
    let odd = exponential_interarrival(&mut odd_source, 1.0, Parity::Odd).unwrap();

    // Even uses u = 0.3, odd uses u = 0.7; gap is -ln(1 - u)
    assert!((even - -(0.7f64).ln()).abs() < 1e-12);
    assert!((odd - -(0.3f64).ln()).abs() < 1e-12);
}

#[test]
fn test_exponential_zero_uniform_on_odd_is_finite() {
    // Odd parity turns u = 0 into 1, so 1 - u = 0 and the log is floored
    let mut source = ScriptedSource::new(vec![0.0]);
    let gap = exponential_interarrival(&mut source, 1.0, Parity::Odd).unwrap();

    assert!(gap.is_finite());
    assert!(gap > 700.0);
}

#[test]
fn test_exponential_rejects_bad_rates() {
    let mut source = ScriptedSource::new(vec![0.5]);
    for rate in [0.0, -1.0, f64::INFINITY, f64::NAN] {
        let result = exponential_interarrival(&mut source, rate, Parity::Even);
        assert!(matches!(result, Err(VariateError::NonPositiveRate(_))));
    }
    assert_eq!(source.consumed(), 0);
}

// ============================================================================
// Normal
// ============================================================================

#[test]
fn test_normal_scripted_acceptance() {
    // y1 = y2 = ln 2 is accepted; 0.3 <= 0.5 picks the positive sign
    let mut source = ScriptedSource::new(vec![0.5, 0.5, 0.3]);
    let gap = normal_interarrival(&mut source, 1.0, 0.5, Parity::Even).unwrap();

    assert!((gap - (1.0 + 0.5 * std::f64::consts::LN_2)).abs() < 1e-12);
    assert_eq!(source.consumed(), 3);
}

#[test]
fn test_normal_sign_draw_ignores_parity() {
    let mut even_source = ScriptedSource::new(vec![0.5, 0.5, 0.3]);
    let mut odd_source = ScriptedSource::new(vec![0.5, 0.5, 0.3]);

    let even = normal_interarrival(&mut even_source, 1.0, 0.5, Parity::Even).unwrap();
    let odd = normal_interarrival(&mut odd_source, 1.0, 0.5, Parity::Odd).unwrap();

    assert_eq!(even, odd);
}

#[test]
fn test_normal_is_always_positive() {
    let mut rng = RngManager::new(7);
    for _ in 0..5_000 {
        let gap = normal_interarrival(&mut rng, -0.5, 1.0, Parity::Even).unwrap();
        assert!(gap > 0.0 && gap.is_finite());
    }
}

#[test]
fn test_normal_mean_for_well_separated_mu() {
    // mu = 10 sigma: truncation is negligible
    let mut rng = RngManager::new(99);
    let n = 20_000;
    let total: f64 = (0..n)
        .map(|_| normal_interarrival(&mut rng, 5.0, 0.5, Parity::Even).unwrap())
        .sum();
    let mean = total / n as f64;

    assert!((mean - 5.0).abs() < 0.05, "mean {} too far from 5.0", mean);
}

#[test]
fn test_normal_rejects_degenerate_parameters() {
    let mut source = ScriptedSource::new(vec![0.5]);
    assert!(normal_interarrival(&mut source, 0.0, 0.0, Parity::Even).is_err());
    assert!(normal_interarrival(&mut source, 1.0, -1.0, Parity::Even).is_err());
    assert!(normal_interarrival(&mut source, f64::NAN, 1.0, Parity::Even).is_err());
    assert_eq!(normal_interarrival(&mut source, 2.0, 0.0, Parity::Even), Ok(2.0));
}

// ============================================================================
// Thinning
// ============================================================================

#[test]
fn test_thinning_accepts_when_rate_equals_bound() {
    let mut source = ScriptedSource::new(vec![0.5, 0.9]);
    let t = non_homogeneous_arrival(&mut source, 1.0, 100.0, |_| 2.0, 2.0, Parity::Even).unwrap();

    assert!((t - (1.0 + std::f64::consts::LN_2 / 2.0)).abs() < 1e-12);
    assert_eq!(source.consumed(), 2);
}

#[test]
fn test_thinning_returns_past_horizon_without_second_draw() {
    let mut source = ScriptedSource::new(vec![0.001]);
    let t = non_homogeneous_arrival(&mut source, 0.0, 1.0, |_| 1.0, 1.0, Parity::Even).unwrap();

    assert!(t > 1.0);
    assert_eq!(source.consumed(), 1);
}

#[test]
fn test_thinning_zero_rate_walks_to_horizon() {
    let mut rng = RngManager::new(3);
    let t = non_homogeneous_arrival(&mut rng, 0.0, 50.0, |_| 0.0, 1.0, Parity::Even).unwrap();
    assert!(t > 50.0);
}

#[test]
fn test_thinning_count_matches_integrated_intensity() {
    // Linear intensity 2·(10 - t)/10 on [0, 10] integrates to 10
    let mut rng = RngManager::new(2024);
    let horizon = 10.0;
    let rate = |t: f64| (2.0 * (horizon - t) / horizon).max(0.0);
    let replications = 2_000;

    let mut total = 0usize;
    for _ in 0..replications {
        let mut t = 0.0;
        loop {
            t = non_homogeneous_arrival(&mut rng, t, horizon, rate, 2.0, Parity::Even).unwrap();
            if t > horizon {
                break;
            }
            total += 1;
        }
    }
    let mean = total as f64 / replications as f64;
    assert!((mean - 10.0).abs() < 0.4, "mean count {} too far from 10", mean);
}

#[test]
fn test_xorshift_uniforms_lie_in_unit_interval() {
    let mut rng = RngManager::new(0);
    for _ in 0..10_000 {
        let u = rng.next_uniform();
        assert!((0.0..1.0).contains(&u));
    }
}
