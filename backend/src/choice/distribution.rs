//! Cumulative choice distribution over available products
//!
//! `F[i] = Σ_{j≤i} w[j] / Σw` for available products and `F[i] = 0` for
//! unavailable ones, so an available product that follows an unavailable one
//! never inherits a bucket. Sampling is inverse-CDF with strict `<`: a draw
//! equal to a bucket edge belongs to the next bucket.

use crate::models::catalogue::ProductId;

/// Piecewise-constant distribution built for one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceDistribution {
    cumulative: Vec<f64>,
    /// Last available product with positive weight; its bucket ends at 1.0
    last_positive: ProductId,
}

impl ChoiceDistribution {
    /// Build from class weights and availability flags.
    ///
    /// Returns `None` when no available product carries positive weight.
    ///
    /// # Example
    /// ```
    /// use seat_simulator_core_rs::choice::ChoiceDistribution;
    ///
    /// let dist = ChoiceDistribution::build(&[1.0, 2.0, 1.0], &[true, false, true]).unwrap();
    /// assert_eq!(dist.cumulative(), &[0.5, 0.0, 1.0]);
    /// assert_eq!(dist.select(0.49), 0);
    /// assert_eq!(dist.select(0.5), 2);
    /// ```
    pub fn build(weights: &[f64], available: &[bool]) -> Option<Self> {
        debug_assert_eq!(weights.len(), available.len());

        let total: f64 = weights
            .iter()
            .zip(available)
            .filter(|(_, &open)| open)
            .map(|(w, _)| *w)
            .sum();
        if total <= 0.0 {
            return None;
        }
        let last_positive = (0..weights.len())
            .rev()
            .find(|&i| available[i] && weights[i] > 0.0)?;

        let mut running = 0.0;
        let cumulative = weights
            .iter()
            .zip(available)
            .enumerate()
            .map(|(i, (&w, &open))| {
                if !open {
                    return 0.0;
                }
                running += w;
                if i >= last_positive {
                    1.0
                } else {
                    running / total
                }
            })
            .collect();

        Some(Self {
            cumulative,
            last_positive,
        })
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// First product whose bucket edge lies strictly above `r`.
    ///
    /// `r ≥ 1` (a complemented zero) lands in the last positive bucket.
    pub fn select(&self, r: f64) -> ProductId {
        self.cumulative
            .iter()
            .position(|&edge| r < edge)
            .unwrap_or(self.last_positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_unavailable_is_none() {
        assert!(ChoiceDistribution::build(&[1.0, 1.0], &[false, false]).is_none());
    }

    #[test]
    fn test_zero_weight_available_is_none() {
        assert!(ChoiceDistribution::build(&[0.0, 5.0], &[true, false]).is_none());
    }

    #[test]
    fn test_unavailable_bucket_is_zeroed_after_cumulation() {
        let dist = ChoiceDistribution::build(&[1.0, 1.0, 1.0, 1.0], &[true, true, false, true]).unwrap();
        assert_eq!(dist.cumulative()[2], 0.0);
        assert_eq!(dist.cumulative()[3], 1.0);
    }

    #[test]
    fn test_zero_weight_product_never_selected() {
        let dist = ChoiceDistribution::build(&[0.0, 3.0, 0.0], &[true, true, true]).unwrap();
        for r in [0.0, 0.3, 0.999_999, 1.0] {
            assert_eq!(dist.select(r), 1);
        }
    }

    #[test]
    fn test_tie_goes_to_next_bucket() {
        let dist = ChoiceDistribution::build(&[1.0, 1.0, 2.0], &[true, true, true]).unwrap();
        assert_eq!(dist.select(0.25), 1);
        assert_eq!(dist.select(0.5), 2);
    }
}
