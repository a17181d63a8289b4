// Average distances between finished clusters

use crate::clustering::{ClusterId, Feature, Partition};
use crate::error::Result;
use crate::store::DistanceStore;
use std::collections::BTreeMap;

/// Average known distance between two clusters of a finished partition, or
/// `None` when no cross pair was ever aligned.
pub fn cluster_distance(
    store: &impl DistanceStore,
    feature: Feature,
    partition: &Partition,
    first: ClusterId,
    second: ClusterId,
) -> Result<Option<f64>> {
    let a = partition.members_of(first);
    let b = partition.members_of(second);
    store.average_cross_distance(feature, &a, &b)
}

/// Average distances for every unordered cluster pair with at least one
/// known cross pair. Keys are `(smaller id, larger id)`.
pub fn cluster_distance_matrix(
    store: &impl DistanceStore,
    feature: Feature,
    partition: &Partition,
) -> Result<BTreeMap<(ClusterId, ClusterId), f64>> {
    let clusters = partition.clusters();
    let mut matrix = BTreeMap::new();

    for (&first, a) in clusters {
        for (&second, b) in clusters.range(first + 1..) {
            if let Some(average) = store.average_cross_distance(feature, a, b)? {
                matrix.insert((first, second), average);
            }
        }
    }

    Ok(matrix)
}
