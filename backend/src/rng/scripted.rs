//! Scripted uniform source for exact, non-statistical assertions.

use super::UniformSource;

/// Replays a fixed list of uniforms, cycling when exhausted.
///
/// # Example
/// ```
/// use seat_simulator_core_rs::rng::{ScriptedSource, UniformSource};
///
/// let mut source = ScriptedSource::new(vec![0.3, 0.9]);
/// assert_eq!(source.next_uniform(), 0.3);
/// assert_eq!(source.next_uniform(), 0.9);
/// assert_eq!(source.next_uniform(), 0.3);
/// assert_eq!(source.consumed(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
    consumed: usize,
}

impl ScriptedSource {
    /// # Panics
    /// Panics if `values` is empty or contains a value outside `[0.0, 1.0)`.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted source needs at least one value");
        assert!(
            values.iter().all(|u| (0.0..1.0).contains(u)),
            "scripted uniforms must lie in [0.0, 1.0)"
        );
        Self {
            values,
            cursor: 0,
            consumed: 0,
        }
    }

    /// Number of uniforms handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl UniformSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.consumed += 1;
        value
    }
}
