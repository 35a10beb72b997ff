//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG used as the uniform stream of every replication.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence of uniforms. The antithetic controller depends on
//! this: re-seeding with a stored seed must replay the identical stream.

use super::UniformSource;
use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use seat_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let u = rng.next_f64();
/// assert!((0.0..1.0).contains(&u));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift cannot leave the all-zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Draw a value suitable for seeding a fresh generator.
    ///
    /// Consumes exactly one step of the stream, so the seed is reproducible
    /// for whoever holds the generator state but opaque to everyone else.
    pub fn next_seed(&mut self) -> u64 {
        self.next()
    }

    /// Get current RNG state (for hand-off/replay)
    ///
    /// `RngManager::new(rng.get_state())` continues the exact same stream.
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Top 53 bits → [0.0, 1.0)
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }
}

impl UniformSource for RngManager {
    fn next_uniform(&mut self) -> f64 {
        self.next_f64()
    }
}
