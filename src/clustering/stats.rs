// Distance distribution statistics used to pick thresholds

use crate::clustering::Feature;
use crate::error::Result;
use crate::store::DistanceStore;
use serde::Serialize;

/// Descriptive statistics of one feature's distance distribution, with the
/// two candidate thresholds the clustering workflow considers.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionSummary {
    pub feature: Feature,
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// 10th percentile, the default clustering threshold.
    pub threshold_p10: f64,
    /// `max(0, Q1 - 1.5 * IQR)`, the outlier-based alternative.
    pub threshold_iqr: f64,
}

/// Summarize the distance distribution of one feature.
pub fn summarize_distribution(
    store: &impl DistanceStore,
    feature: Feature,
) -> Result<DistributionSummary> {
    let distances = store.all_distances(feature)?;
    let count = distances.len();

    let mean = distances.iter().sum::<f64>() / count as f64;
    let variance = distances
        .iter()
        .map(|d| (d - mean).powi(2))
        .sum::<f64>()
        / count as f64;

    let q1 = interpolated(&distances, 25.0);
    let q3 = interpolated(&distances, 75.0);
    let iqr = q3 - q1;

    Ok(DistributionSummary {
        feature,
        count,
        mean,
        std_dev: variance.sqrt(),
        min: distances[0],
        q1,
        median: interpolated(&distances, 50.0),
        q3,
        max: distances[count - 1],
        threshold_p10: interpolated(&distances, 10.0),
        threshold_iqr: (q1 - 1.5 * iqr).max(0.0),
    })
}

/// Linear-interpolated percentile over an ascending-sorted list.
fn interpolated(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (sorted.len() - 1) as f64 * p / 100.0;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    sorted[low] + (rank - low as f64) * (sorted[high] - sorted[low])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;
    use crate::store::AlignmentDb;

    #[test]
    fn summarizes_known_distribution() {
        let db = AlignmentDb::open_in_memory().unwrap();
        let ids: Vec<i64> = (0..=10).collect();
        db.insert_segments(&ids).unwrap();
        for i in 1..=10 {
            db.insert_score(0, i, Feature::Rhythmic, i as f64).unwrap();
        }

        let summary = summarize_distribution(&db, Feature::Rhythmic).unwrap();
        assert_eq!(summary.count, 10);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 10.0);
        assert!((summary.mean - 5.5).abs() < 1e-9);
        assert!((summary.median - 5.5).abs() < 1e-9);
        assert!((summary.q1 - 3.25).abs() < 1e-9);
        assert!((summary.q3 - 7.75).abs() < 1e-9);
        assert!((summary.threshold_p10 - 1.9).abs() < 1e-9);
        // Q1 - 1.5 * IQR = 3.25 - 6.75 < 0, clamped
        assert_eq!(summary.threshold_iqr, 0.0);
    }

    #[test]
    fn empty_feature_errors() {
        let db = AlignmentDb::open_in_memory().unwrap();
        assert!(matches!(
            summarize_distribution(&db, Feature::Diatonic),
            Err(ClusterError::EmptyDistribution(Feature::Diatonic))
        ));
    }
}
