// Read-only access to the pairwise segment distance relation

pub mod sqlite;

pub use sqlite::AlignmentDb;

use std::collections::BTreeSet;

use crate::clustering::Feature;
use crate::error::Result;

/// Identifier of one musical segment, as stored in the `Segment` table.
pub type SegmentId = i64;

/// Read-only view of the pairwise distance relation for one run.
///
/// The relation is symmetric and partial: a pair with no recorded distance
/// carries no evidence of similarity and never blocks a merge. Implementations
/// must treat the backing data as an immutable snapshot while a clustering
/// run is in progress.
pub trait DistanceStore {
    /// Every known segment id. This is the clustering universe.
    fn all_segments(&self) -> Result<BTreeSet<SegmentId>>;

    /// All pairs at distance exactly zero for the feature.
    fn zero_distance_pairs(&self, feature: Feature) -> Result<Vec<(SegmentId, SegmentId)>>;

    /// Segments with a known distance to `segment` at most `threshold`.
    fn neighbors_within(
        &self,
        feature: Feature,
        segment: SegmentId,
        threshold: f64,
    ) -> Result<BTreeSet<SegmentId>>;

    /// Every known distance for the feature, sorted ascending.
    ///
    /// Errors with [`ClusterError::EmptyDistribution`](crate::error::ClusterError)
    /// when the feature has no recorded distances.
    fn all_distances(&self, feature: Feature) -> Result<Vec<f64>>;

    /// True iff some pair (a in `a`, b in `b`) has a known distance above
    /// `threshold`. Unknown pairs do not count as exceeding.
    fn any_cross_pair_exceeds(
        &self,
        feature: Feature,
        a: &BTreeSet<SegmentId>,
        b: &BTreeSet<SegmentId>,
        threshold: f64,
    ) -> Result<bool>;

    /// Average known distance between the two sets, or `None` when no cross
    /// pair is recorded. Used by reporting only, never by the engine.
    fn average_cross_distance(
        &self,
        feature: Feature,
        a: &BTreeSet<SegmentId>,
        b: &BTreeSet<SegmentId>,
    ) -> Result<Option<f64>>;
}
