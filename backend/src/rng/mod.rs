//! Deterministic random number generation
//!
//! Uses xorshift64* for the underlying stream. Every uniform consumed by the
//! variate generator and the choice model is pulled through [`UniformSource`],
//! so tests can swap the generator for a scripted sequence.
//! CRITICAL: All randomness in the simulator MUST go through this module.

mod scripted;
mod xorshift;

pub use scripted::ScriptedSource;
pub use xorshift::RngManager;

/// A stream of raw uniforms in `[0.0, 1.0)`.
///
/// Implementors return the value *before* any antithetic transform; the
/// complement is applied by the caller according to the replication parity.
pub trait UniformSource {
    /// Next raw uniform in `[0.0, 1.0)`.
    fn next_uniform(&mut self) -> f64;
}

impl<T: UniformSource + ?Sized> UniformSource for &mut T {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}
