// Quality-threshold clustering engine

use crate::clustering::union_find::UnionFind;
use crate::clustering::{Feature, Partition};
use crate::error::Result;
use crate::store::{DistanceStore, SegmentId};
use std::collections::BTreeSet;

/// Cluster every segment of `universe` using quality-threshold clustering.
///
/// Three phases:
/// 1. Segments connected by chains of zero-distance pairs always share a
///    cluster, whatever the threshold.
/// 2. Remaining segments are processed in ascending id order. Each seed first
///    tries to join an existing cluster of one of its in-threshold neighbors
///    (first cluster whose every known distance to the seed stays within the
///    threshold wins), otherwise it grows a fresh cluster from its still
///    unassigned neighbors, admitting each only if it stays within the
///    threshold of the entire candidate so far.
/// 3. Anything still unassigned becomes a singleton.
///
/// Pairs with no recorded distance never block an admission; they simply
/// provide no reason to include anyone. Iteration order is fixed, so two runs
/// over the same data produce the same partition.
pub fn cluster_with_qt(
    store: &impl DistanceStore,
    universe: &BTreeSet<SegmentId>,
    feature: Feature,
    threshold: f64,
) -> Result<Partition> {
    let mut partition = Partition::new();

    identity_phase(store, universe, feature, &mut partition)?;
    expansion_phase(store, universe, feature, threshold, &mut partition)?;
    singleton_phase(universe, &mut partition);

    debug_assert_eq!(partition.len(), universe.len());
    log::debug!(
        "clustered {} segments into {} clusters (feature: {}, threshold: {})",
        partition.len(),
        partition.cluster_count(),
        feature,
        threshold
    );

    Ok(partition)
}

/// Phase 1: group segments connected by zero-distance chains.
fn identity_phase(
    store: &impl DistanceStore,
    universe: &BTreeSet<SegmentId>,
    feature: Feature,
    partition: &mut Partition,
) -> Result<()> {
    let mut identity = UnionFind::new();
    for (a, b) in store.zero_distance_pairs(feature)? {
        if universe.contains(&a) && universe.contains(&b) {
            identity.union(a, b);
        }
    }

    // classes() is keyed by smallest member, so ids are assigned in a stable
    // order across runs
    for (_, members) in identity.classes() {
        let cluster = partition.fresh_cluster();
        for segment in members {
            partition.assign(segment, cluster);
        }
    }

    Ok(())
}

/// Phase 2: greedy threshold-bounded expansion in ascending id order.
fn expansion_phase(
    store: &impl DistanceStore,
    universe: &BTreeSet<SegmentId>,
    feature: Feature,
    threshold: f64,
    partition: &mut Partition,
) -> Result<()> {
    for &seed in universe {
        if partition.contains(seed) {
            continue;
        }

        let neighbors: Vec<SegmentId> = store
            .neighbors_within(feature, seed, threshold)?
            .into_iter()
            .filter(|n| *n != seed && universe.contains(n))
            .collect();

        let seed_set = BTreeSet::from([seed]);

        // Try to join the first existing cluster whose members all stay
        // within the threshold of the seed
        let mut joined = false;
        for &neighbor in &neighbors {
            let Some(cluster) = partition.cluster_of(neighbor) else {
                continue;
            };
            let members = partition.members_of(cluster);
            if !store.any_cross_pair_exceeds(feature, &seed_set, &members, threshold)? {
                partition.assign(seed, cluster);
                joined = true;
                break;
            }
        }
        if joined {
            continue;
        }

        // Grow a fresh cluster; each admission is tested against the whole
        // candidate so the diameter bound holds for every known pair
        let mut candidate = seed_set;
        for &neighbor in &neighbors {
            if partition.contains(neighbor) || candidate.contains(&neighbor) {
                continue;
            }
            let addition = BTreeSet::from([neighbor]);
            if !store.any_cross_pair_exceeds(feature, &candidate, &addition, threshold)? {
                candidate.insert(neighbor);
            }
        }

        let cluster = partition.fresh_cluster();
        for segment in candidate {
            partition.assign(segment, cluster);
        }
    }

    Ok(())
}

/// Phase 3: anything never resolved gets its own cluster.
fn singleton_phase(universe: &BTreeSet<SegmentId>, partition: &mut Partition) {
    for &segment in universe {
        if !partition.contains(segment) {
            let cluster = partition.fresh_cluster();
            partition.assign(segment, cluster);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AlignmentDb;

    const FEATURE: Feature = Feature::Diatonic;

    fn db(segments: &[SegmentId], scores: &[(SegmentId, SegmentId, f64)]) -> AlignmentDb {
        let db = AlignmentDb::open_in_memory().unwrap();
        db.insert_segments(segments).unwrap();
        for &(a, b, score) in scores {
            db.insert_score(a, b, FEATURE, score).unwrap();
        }
        db
    }

    fn run(db: &AlignmentDb, threshold: f64) -> Partition {
        let universe = db.all_segments().unwrap();
        cluster_with_qt(db, &universe, FEATURE, threshold).unwrap()
    }

    #[test]
    fn five_segment_scenario() {
        let db = db(
            &[1, 2, 3, 4, 5],
            &[(1, 2, 0.0), (3, 4, 2.0), (3, 5, 3.0), (4, 5, 9.0)],
        );
        let partition = run(&db, 3.0);

        // {1,2} identity, {3,4} within diameter, {5} blocked by D(4,5)=9
        assert_eq!(partition.cluster_count(), 3);
        assert_eq!(partition.cluster_of(1), partition.cluster_of(2));
        assert_eq!(partition.cluster_of(3), partition.cluster_of(4));
        assert_ne!(partition.cluster_of(5), partition.cluster_of(3));
        assert_ne!(partition.cluster_of(5), partition.cluster_of(1));
    }

    #[test]
    fn covers_every_segment() {
        let db = db(&[1, 2, 3, 4, 5, 6], &[(1, 2, 1.0), (4, 5, 8.0)]);
        let partition = run(&db, 2.0);
        assert_eq!(partition.segments(), db.all_segments().unwrap());
    }

    #[test]
    fn identity_chains_ignore_threshold() {
        // 1-2-3 chained through zero distances, even though D(1,3) is large
        let db = db(
            &[1, 2, 3],
            &[(1, 2, 0.0), (2, 3, 0.0), (1, 3, 50.0)],
        );
        let partition = run(&db, 1.0);

        assert_eq!(partition.cluster_count(), 1);
        assert_eq!(partition.cluster_of(1), partition.cluster_of(3));
    }

    #[test]
    fn zero_threshold_yields_identity_classes_and_singletons() {
        let db = db(
            &[1, 2, 3, 4],
            &[(1, 2, 0.0), (3, 4, 1.0)],
        );
        let partition = run(&db, 0.0);

        assert_eq!(partition.cluster_of(1), partition.cluster_of(2));
        assert_eq!(partition.cluster_count(), 3);
        assert_ne!(partition.cluster_of(3), partition.cluster_of(4));
    }

    #[test]
    fn unknown_pairs_do_not_block_admission() {
        // 1-2 and 1-3 are close; 2-3 was never aligned. The permissive policy
        // lets all three share a cluster.
        let db = db(&[1, 2, 3], &[(1, 2, 1.0), (1, 3, 1.0)]);
        let partition = run(&db, 2.0);

        assert_eq!(partition.cluster_count(), 1);
    }

    #[test]
    fn known_far_pair_blocks_candidate_growth() {
        // Same shape, but 2-3 is out of range: 3 cannot join 1's candidate
        let db = db(&[1, 2, 3], &[(1, 2, 1.0), (1, 3, 1.0), (2, 3, 10.0)]);
        let partition = run(&db, 2.0);

        assert_eq!(partition.cluster_of(1), partition.cluster_of(2));
        assert_ne!(partition.cluster_of(3), partition.cluster_of(1));
        assert_eq!(partition.cluster_count(), 2);
    }

    #[test]
    fn later_seed_joins_existing_cluster() {
        // 10 seeds {10, 11}. 12 is only a neighbor of 11, so it is picked up
        // later and joins the existing cluster through the cross-pair test.
        let db = db(&[10, 11, 12], &[(10, 11, 1.0), (11, 12, 1.0)]);
        let partition = run(&db, 2.0);

        assert_eq!(partition.cluster_count(), 1);
        assert_eq!(partition.cluster_of(12), partition.cluster_of(10));
    }

    #[test]
    fn segments_without_alignments_become_singletons() {
        let db = db(&[1, 2, 3], &[]);
        let partition = run(&db, 5.0);

        assert_eq!(partition.len(), 3);
        assert_eq!(partition.cluster_count(), 3);
    }

    #[test]
    fn reruns_are_identical() {
        let db = db(
            &[1, 2, 3, 4, 5, 6, 7],
            &[
                (1, 2, 0.0),
                (2, 5, 1.0),
                (3, 4, 2.0),
                (3, 5, 3.0),
                (4, 5, 9.0),
                (6, 7, 2.5),
            ],
        );
        let first = run(&db, 3.0);
        let second = run(&db, 3.0);

        let first_map: Vec<_> = first.iter().collect();
        let second_map: Vec<_> = second.iter().collect();
        assert_eq!(first_map, second_map);
    }

    #[test]
    fn diameter_invariant_holds() {
        let db = db(
            &[1, 2, 3, 4, 5, 6],
            &[
                (1, 2, 1.0),
                (1, 3, 2.0),
                (2, 3, 6.0),
                (4, 5, 1.0),
                (5, 6, 1.5),
                (4, 6, 2.0),
            ],
        );
        let threshold = 3.0;
        let partition = run(&db, threshold);

        for members in partition.clusters().values() {
            for &a in members {
                let rest: BTreeSet<_> = members.iter().copied().filter(|&m| m > a).collect();
                let a_set = BTreeSet::from([a]);
                assert!(!db
                    .any_cross_pair_exceeds(FEATURE, &a_set, &rest, threshold)
                    .unwrap());
            }
        }
    }

    #[test]
    fn empty_universe_produces_empty_partition() {
        let db = db(&[], &[]);
        let partition = run(&db, 3.0);
        assert!(partition.is_empty());
        assert_eq!(partition.cluster_count(), 0);
    }
}
