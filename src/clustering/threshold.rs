// Threshold resolution: explicit values or distribution percentiles

use crate::clustering::Feature;
use crate::error::{ClusterError, Result};
use crate::store::DistanceStore;

/// Percentile used when neither a threshold nor a percentile is given.
pub const DEFAULT_PERCENTILE: u8 = 10;

/// How the clustering threshold is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdSpec {
    /// Use this distance directly.
    Explicit(f64),
    /// Use the P-th percentile of all known distances for the feature.
    Percentile(u8),
}

impl ThresholdSpec {
    /// Resolve to a concrete threshold, validating the input first.
    pub fn resolve(self, store: &impl DistanceStore, feature: Feature) -> Result<f64> {
        match self {
            ThresholdSpec::Explicit(value) => {
                if value < 0.0 || !value.is_finite() {
                    return Err(ClusterError::InvalidThreshold(value));
                }
                Ok(value)
            }
            ThresholdSpec::Percentile(p) => {
                if !(1..=99).contains(&p) {
                    return Err(ClusterError::InvalidPercentile(p));
                }
                let distances = store.all_distances(feature)?;
                Ok(percentile(&distances, p))
            }
        }
    }
}

/// P-th percentile of an ascending-sorted list, linearly interpolated
/// between order statistics (same convention as numpy's default).
fn percentile(sorted: &[f64], p: u8) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (sorted.len() - 1) as f64 * f64::from(p) / 100.0;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let fraction = rank - low as f64;

    sorted[low] + fraction * (sorted[high] - sorted[low])
}
