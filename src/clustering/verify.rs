// Partition verification and summary reporting

use crate::clustering::Partition;
use crate::error::{ClusterError, Result};
use crate::store::SegmentId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Summary of one clustering run.
#[derive(Debug, Clone, Serialize)]
pub struct ClusteringReport {
    pub total_segments: usize,
    pub total_clusters: usize,
    pub singleton_clusters: usize,
    pub largest_cluster: usize,
}

/// Check that the partition covers the universe exactly and summarize it.
///
/// Never mutates the partition. A coverage mismatch is an internal
/// consistency fault and always surfaces as an error.
pub fn verify_partition(
    partition: &Partition,
    universe: &BTreeSet<SegmentId>,
) -> Result<ClusteringReport> {
    let assigned = partition.segments();
    let missing = universe.difference(&assigned).count();
    let unexpected = assigned.difference(universe).count();

    if missing > 0 || unexpected > 0 {
        log::error!(
            "partition coverage mismatch: {missing} segment(s) missing, {unexpected} unexpected"
        );
        return Err(ClusterError::CoverageViolation { missing, unexpected });
    }

    let mut singleton_clusters = 0;
    let mut largest_cluster = 0;
    for members in partition.clusters().values() {
        if members.len() == 1 {
            singleton_clusters += 1;
        }
        largest_cluster = largest_cluster.max(members.len());
    }

    Ok(ClusteringReport {
        total_segments: partition.len(),
        total_clusters: partition.cluster_count(),
        singleton_clusters,
        largest_cluster,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(groups: &[&[SegmentId]]) -> Partition {
        let mut partition = Partition::new();
        for group in groups {
            let cluster = partition.fresh_cluster();
            for &segment in *group {
                partition.assign(segment, cluster);
            }
        }
        partition
    }

    #[test]
    fn summarizes_complete_partition() {
        let partition = partition(&[&[1, 2], &[3, 4, 5], &[6]]);
        let universe = BTreeSet::from([1, 2, 3, 4, 5, 6]);

        let report = verify_partition(&partition, &universe).unwrap();
        assert_eq!(report.total_segments, 6);
        assert_eq!(report.total_clusters, 3);
        assert_eq!(report.singleton_clusters, 1);
        assert_eq!(report.largest_cluster, 3);
    }

    #[test]
    fn missing_segments_are_fatal() {
        let partition = partition(&[&[1, 2]]);
        let universe = BTreeSet::from([1, 2, 3]);

        assert!(matches!(
            verify_partition(&partition, &universe),
            Err(ClusterError::CoverageViolation {
                missing: 1,
                unexpected: 0
            })
        ));
    }

    #[test]
    fn unexpected_segments_are_fatal() {
        let partition = partition(&[&[1, 2, 9]]);
        let universe = BTreeSet::from([1, 2]);

        assert!(matches!(
            verify_partition(&partition, &universe),
            Err(ClusterError::CoverageViolation {
                missing: 0,
                unexpected: 1
            })
        ));
    }

    #[test]
    fn empty_partition_over_empty_universe_passes() {
        let report = verify_partition(&Partition::new(), &BTreeSet::new()).unwrap();
        assert_eq!(report.total_segments, 0);
        assert_eq!(report.total_clusters, 0);
    }
}
