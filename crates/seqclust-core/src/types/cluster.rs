//! Cluster: a leaf sequence or the merge of two sub-clusters.
//!
//! A chain of n inputs can produce a tree n − 1 levels deep, so nothing here
//! recurses over the tree: walks, clone, drop and serde all use explicit
//! stacks. The serialized form is a flat post-order node list.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::collections::{FxHashMap, FxHashSet};
use super::identifiers::ClusterId;
use super::sequence::Sequence;
use crate::errors::ClusterTreeError;

/// Which constituent of a merge supplies the representative sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representative {
    First,
    Second,
}

/// An immutable node of the merge tree.
///
/// A merge owns its two constituents outright. The hierarchy keeps its own
/// record of every cluster, so ownership here never needs to be shared.
pub struct Cluster {
    id: ClusterId,
    sequence: Sequence,
    score: f64,
    constituents: Option<Box<[Cluster; 2]>>,
}

impl Cluster {
    /// A leaf cluster wrapping one input sequence. Score is 0.
    pub fn leaf(id: ClusterId, sequence: Sequence) -> Self {
        Self {
            id,
            sequence,
            score: 0.0,
            constituents: None,
        }
    }

    /// Merge two clusters. The representative sequence is shared with the
    /// chosen constituent, not copied.
    pub fn merge(
        id: ClusterId,
        first: Cluster,
        second: Cluster,
        representative: Representative,
        score: f64,
    ) -> Self {
        let sequence = match representative {
            Representative::First => first.sequence.clone(),
            Representative::Second => second.sequence.clone(),
        };
        Self {
            id,
            sequence,
            score,
            constituents: Some(Box::new([first, second])),
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Distance at which this cluster was formed; 0 for leaves.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn is_leaf(&self) -> bool {
        self.constituents.is_none()
    }

    /// The two merged sub-clusters, in merge order.
    pub fn constituents(&self) -> Option<(&Cluster, &Cluster)> {
        self.constituents.as_deref().map(|[a, b]| (a, b))
    }

    /// Number of leaves under this cluster (1 for a leaf).
    pub fn leaf_count(&self) -> usize {
        self.leaf_ids().len()
    }

    /// Leaf ids in left-to-right order.
    pub fn leaf_ids(&self) -> Vec<ClusterId> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(cluster) = stack.pop() {
            match cluster.constituents() {
                Some((first, second)) => {
                    stack.push(second);
                    stack.push(first);
                }
                None => out.push(cluster.id),
            }
        }
        out
    }

    /// Longest root-to-leaf path, counted in merges (0 for a leaf).
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((cluster, depth)) = stack.pop() {
            max = max.max(depth);
            if let Some((first, second)) = cluster.constituents() {
                stack.push((first, depth + 1));
                stack.push((second, depth + 1));
            }
        }
        max
    }

    /// Ids of the two direct constituents.
    pub fn constituent_ids(&self) -> Option<(ClusterId, ClusterId)> {
        self.constituents().map(|(a, b)| (a.id, b.id))
    }

    /// Every node of the tree, constituents before the merge that owns them.
    /// The root comes last.
    pub fn post_order(&self) -> Vec<&Cluster> {
        let mut out = Vec::new();
        let mut stack = vec![(self, false)];
        while let Some((cluster, expanded)) = stack.pop() {
            match cluster.constituents() {
                Some((first, second)) if !expanded => {
                    stack.push((cluster, true));
                    stack.push((second, false));
                    stack.push((first, false));
                }
                _ => out.push(cluster),
            }
        }
        out
    }

    /// This node alone, without its constituents.
    fn detached(&self) -> Self {
        Self {
            id: self.id,
            sequence: self.sequence.clone(),
            score: self.score,
            constituents: None,
        }
    }
}

impl Clone for Cluster {
    fn clone(&self) -> Self {
        let mut root = self.detached();
        let mut work: Vec<(&Cluster, &mut Cluster)> = vec![(self, &mut root)];
        while let Some((source, target)) = work.pop() {
            if let Some([first, second]) = source.constituents.as_deref() {
                let pair = target
                    .constituents
                    .insert(Box::new([first.detached(), second.detached()]));
                let [first_copy, second_copy] = &mut **pair;
                work.push((first, first_copy));
                work.push((second, second_copy));
            }
        }
        root
    }
}

impl Drop for Cluster {
    fn drop(&mut self) {
        // Unlink children before they drop so each drop sees a leaf.
        let mut pending: Vec<Box<[Cluster; 2]>> = self.constituents.take().into_iter().collect();
        while let Some(mut pair) = pending.pop() {
            for child in pair.iter_mut() {
                if let Some(grandchildren) = child.constituents.take() {
                    pending.push(grandchildren);
                }
            }
        }
    }
}

impl fmt::Debug for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("id", &self.id)
            .field("sequence", &self.sequence)
            .field("score", &self.score)
            .field("constituents", &self.constituent_ids())
            .finish()
    }
}

#[derive(Serialize)]
struct NodeView<'a> {
    id: ClusterId,
    sequence: &'a Sequence,
    score: f64,
    constituents: Option<(ClusterId, ClusterId)>,
}

#[derive(Serialize)]
struct TreeView<'a> {
    nodes: Vec<NodeView<'a>>,
}

#[derive(Deserialize)]
struct NodeRecord {
    id: ClusterId,
    sequence: Sequence,
    score: f64,
    #[serde(default)]
    constituents: Option<(ClusterId, ClusterId)>,
}

#[derive(Deserialize)]
struct TreeRecord {
    nodes: Vec<NodeRecord>,
}

impl Serialize for Cluster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes = self
            .post_order()
            .into_iter()
            .map(|c| NodeView {
                id: c.id,
                sequence: &c.sequence,
                score: c.score,
                constituents: c.constituent_ids(),
            })
            .collect();
        TreeView { nodes }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cluster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tree = TreeRecord::deserialize(deserializer)?;
        Cluster::from_records(tree).map_err(serde::de::Error::custom)
    }
}

impl Cluster {
    /// Rebuild from post-order records. Each merge claims two earlier,
    /// still unclaimed nodes; exactly one node may remain unclaimed.
    fn from_records(tree: TreeRecord) -> Result<Self, ClusterTreeError> {
        let mut seen: FxHashSet<ClusterId> = FxHashSet::default();
        let mut unclaimed: FxHashMap<ClusterId, Cluster> = FxHashMap::default();

        for record in tree.nodes {
            let id = record.id;
            if !seen.insert(id) {
                return Err(ClusterTreeError::DuplicateId { id: id.get() });
            }
            let constituents = match record.constituents {
                None => None,
                Some((a, b)) => {
                    let missing = |constituent: ClusterId| ClusterTreeError::MissingConstituent {
                        id: id.get(),
                        constituent: constituent.get(),
                    };
                    let first = unclaimed.remove(&a).ok_or_else(|| missing(a))?;
                    let second = unclaimed.remove(&b).ok_or_else(|| missing(b))?;
                    Some(Box::new([first, second]))
                }
            };
            // Re-share the representative's allocation with its constituent.
            let sequence = match constituents.as_deref() {
                None => record.sequence,
                Some([first, _]) if first.sequence == record.sequence => first.sequence.clone(),
                Some([_, second]) if second.sequence == record.sequence => second.sequence.clone(),
                Some(_) => return Err(ClusterTreeError::ForeignRepresentative { id: id.get() }),
            };
            unclaimed.insert(
                id,
                Cluster {
                    id,
                    sequence,
                    score: record.score,
                    constituents,
                },
            );
        }

        let roots = unclaimed.len();
        let mut remaining = unclaimed.into_values();
        match (remaining.next(), remaining.next()) {
            (Some(root), None) => Ok(root),
            (None, _) => Err(ClusterTreeError::Empty),
            _ => Err(ClusterTreeError::MultipleRoots { roots }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u32, raw: &[u32]) -> Cluster {
        Cluster::leaf(ClusterId(id), Sequence::from_raw(raw))
    }

    /// `n` leaves merged as a left-leaning chain, depth `n - 1`.
    fn chain(n: u32) -> Cluster {
        let mut root = leaf(0, &[0, 1000]);
        for i in 1..n {
            root = Cluster::merge(
                ClusterId(n + i - 1),
                root,
                leaf(i, &[0, 1000 + i]),
                Representative::First,
                0.5,
            );
        }
        root
    }

    #[test]
    fn leaf_has_zero_score_and_no_constituents() {
        let c = leaf(0, &[1, 2]);
        assert!(c.is_leaf());
        assert_eq!(c.score(), 0.0);
        assert!(c.constituents().is_none());
        assert_eq!(c.leaf_ids(), vec![ClusterId(0)]);
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn merge_shares_representative_allocation() {
        let a = leaf(0, &[1, 2, 3]);
        let b = leaf(1, &[2, 3, 4]);
        let a_seq = a.sequence().clone();
        let b_seq = b.sequence().clone();

        let first = Cluster::merge(ClusterId(2), a.clone(), b.clone(), Representative::First, 0.25);
        assert!(first.sequence().ptr_eq(&a_seq));
        assert_eq!(first.score(), 0.25);

        let second = Cluster::merge(ClusterId(3), a, b, Representative::Second, 0.25);
        assert!(second.sequence().ptr_eq(&b_seq));
    }

    #[test]
    fn leaf_ids_follow_merge_order() {
        let ab = Cluster::merge(ClusterId(3), leaf(0, &[1]), leaf(1, &[1]), Representative::First, 0.0);
        let root = Cluster::merge(ClusterId(4), leaf(2, &[1]), ab, Representative::Second, 0.5);
        assert_eq!(root.leaf_ids(), vec![ClusterId(2), ClusterId(0), ClusterId(1)]);
        assert_eq!(root.leaf_count(), 3);
        assert_eq!(root.depth(), 2);
        assert_eq!(root.constituent_ids(), Some((ClusterId(2), ClusterId(3))));
    }

    #[test]
    fn post_order_ends_at_root() {
        let ab = Cluster::merge(ClusterId(3), leaf(0, &[1]), leaf(1, &[1]), Representative::First, 0.0);
        let root = Cluster::merge(ClusterId(4), ab, leaf(2, &[1]), Representative::First, 0.5);
        let ids: Vec<u32> = root.post_order().iter().map(|c| c.id().get()).collect();
        assert_eq!(ids, vec![0, 1, 3, 2, 4]);
    }

    #[test]
    fn clone_keeps_shape_and_shares_sequences() {
        let root = chain(5);
        let copy = root.clone();
        assert_eq!(copy.leaf_ids(), root.leaf_ids());
        assert_eq!(copy.depth(), 4);
        assert!(copy.sequence().ptr_eq(root.sequence()));
    }

    #[test]
    fn deep_chain_clones_and_drops() {
        let root = chain(200_000);
        assert_eq!(root.depth(), 199_999);
        let copy = root.clone();
        drop(root);
        assert_eq!(copy.leaf_count(), 200_000);
    }

    #[test]
    fn debug_lists_constituent_ids_only() {
        let root = Cluster::merge(ClusterId(2), leaf(0, &[1]), leaf(1, &[2]), Representative::First, 0.0);
        let rendered = format!("{root:?}");
        assert!(rendered.contains("constituents: Some((ClusterId(0), ClusterId(1)))"));
    }

    #[test]
    fn flat_records_reject_malformed_trees() {
        let record = |id: u32, raw: &[u32], constituents: Option<(u32, u32)>| NodeRecord {
            id: ClusterId(id),
            sequence: Sequence::from_raw(raw),
            score: 0.0,
            constituents: constituents.map(|(a, b)| (ClusterId(a), ClusterId(b))),
        };
        let build = |nodes: Vec<NodeRecord>| Cluster::from_records(TreeRecord { nodes }).map(|c| c.id());

        assert_eq!(build(vec![]), Err(ClusterTreeError::Empty));
        assert_eq!(
            build(vec![record(0, &[1], None), record(0, &[1], None)]),
            Err(ClusterTreeError::DuplicateId { id: 0 })
        );
        assert_eq!(
            build(vec![record(0, &[1], None), record(2, &[1], Some((0, 1)))]),
            Err(ClusterTreeError::MissingConstituent { id: 2, constituent: 1 })
        );
        assert_eq!(
            build(vec![
                record(0, &[1], None),
                record(1, &[2], None),
                record(2, &[3], Some((0, 1))),
            ]),
            Err(ClusterTreeError::ForeignRepresentative { id: 2 })
        );
        assert_eq!(
            build(vec![record(0, &[1], None), record(1, &[2], None)]),
            Err(ClusterTreeError::MultipleRoots { roots: 2 })
        );
        assert_eq!(
            build(vec![
                record(0, &[1], None),
                record(1, &[2], None),
                record(2, &[2], Some((0, 1))),
            ]),
            Ok(ClusterId(2))
        );
    }
}
