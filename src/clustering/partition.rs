// Cluster assignments produced by one clustering run

use crate::store::SegmentId;
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of one cluster, unique within a single run.
pub type ClusterId = u32;

/// Complete segment-to-cluster assignment.
///
/// Built incrementally by the engine, immutable once returned. Keeps the
/// inverse map alongside the forward one so membership lookups during
/// clustering stay cheap.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    assignments: BTreeMap<SegmentId, ClusterId>,
    members: BTreeMap<ClusterId, BTreeSet<SegmentId>>,
    next_id: ClusterId,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next cluster id.
    pub(crate) fn fresh_cluster(&mut self) -> ClusterId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Assign a segment to a cluster. A segment is assigned exactly once.
    pub(crate) fn assign(&mut self, segment: SegmentId, cluster: ClusterId) {
        let previous = self.assignments.insert(segment, cluster);
        debug_assert!(previous.is_none(), "segment {segment} assigned twice");
        self.members.entry(cluster).or_default().insert(segment);
    }

    /// Whether the segment has been assigned (resolved) yet.
    pub fn contains(&self, segment: SegmentId) -> bool {
        self.assignments.contains_key(&segment)
    }

    /// Cluster of a segment, if assigned.
    pub fn cluster_of(&self, segment: SegmentId) -> Option<ClusterId> {
        self.assignments.get(&segment).copied()
    }

    /// Members of one cluster. Empty when the id is unknown.
    pub fn members_of(&self, cluster: ClusterId) -> BTreeSet<SegmentId> {
        self.members.get(&cluster).cloned().unwrap_or_default()
    }

    /// Number of assigned segments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of distinct clusters.
    pub fn cluster_count(&self) -> usize {
        self.members.len()
    }

    /// Assigned segments in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, ClusterId)> + '_ {
        self.assignments.iter().map(|(&s, &c)| (s, c))
    }

    /// All clusters with their members, ascending by cluster id.
    pub fn clusters(&self) -> &BTreeMap<ClusterId, BTreeSet<SegmentId>> {
        &self.members
    }

    /// Segment ids covered by the partition.
    pub fn segments(&self) -> BTreeSet<SegmentId> {
        self.assignments.keys().copied().collect()
    }
}
