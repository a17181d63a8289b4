// Union-find over segment ids for zero-distance identity classes

use crate::store::SegmentId;
use std::collections::{BTreeMap, BTreeSet};

/// Disjoint-set structure over sparse segment ids.
///
/// Only segments that appear in a union are tracked; everything else is
/// implicitly its own class.
#[derive(Debug, Default)]
pub struct UnionFind {
    parent: BTreeMap<SegmentId, SegmentId>,
}

impl UnionFind {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root of the class containing `id`, with path compression.
    pub fn find(&mut self, id: SegmentId) -> SegmentId {
        let mut root = id;
        while let Some(&parent) = self.parent.get(&root) {
            if parent == root {
                break;
            }
            root = parent;
        }

        // Compress the walked path
        let mut current = id;
        while let Some(&parent) = self.parent.get(&current) {
            if parent == root {
                break;
            }
            self.parent.insert(current, root);
            current = parent;
        }

        root
    }

    /// Merge the classes containing `a` and `b`.
    pub fn union(&mut self, a: SegmentId, b: SegmentId) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        self.parent.entry(root_a).or_insert(root_a);
        self.parent.entry(root_b).or_insert(root_b);
        if root_a != root_b {
            // Smaller root wins so class roots are stable across merge order
            let (keep, absorb) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent.insert(absorb, keep);
        }
    }

    /// All tracked classes, keyed by their smallest member, members ascending.
    pub fn classes(&mut self) -> BTreeMap<SegmentId, BTreeSet<SegmentId>> {
        let ids: Vec<SegmentId> = self.parent.keys().copied().collect();
        let mut classes: BTreeMap<SegmentId, BTreeSet<SegmentId>> = BTreeMap::new();
        for id in ids {
            let root = self.find(id);
            classes.entry(root).or_default().insert(id);
        }
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_are_transitive() {
        let mut uf = UnionFind::new();
        uf.union(1, 2);
        uf.union(2, 3);
        uf.union(7, 8);

        assert_eq!(uf.find(1), uf.find(3));
        assert_ne!(uf.find(1), uf.find(7));

        let classes = uf.classes();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[&1], BTreeSet::from([1, 2, 3]));
        assert_eq!(classes[&7], BTreeSet::from([7, 8]));
    }

    #[test]
    fn merge_order_does_not_change_roots() {
        let mut left = UnionFind::new();
        left.union(5, 9);
        left.union(9, 2);

        let mut right = UnionFind::new();
        right.union(9, 2);
        right.union(5, 9);

        assert_eq!(left.classes(), right.classes());
        assert_eq!(left.find(9), 2);
    }

    #[test]
    fn untracked_ids_are_their_own_class() {
        let mut uf = UnionFind::new();
        uf.union(1, 2);
        assert_eq!(uf.find(42), 42);
    }
}
