//! Provenance hierarchy over a petgraph `DiGraph`, append-only.
//!
//! One node per cluster ever created. Edges run from a predecessor (a node
//! the new cluster was linked to) to the new cluster's node. Under
//! `LinkPolicy::Identity` this is the merge tree; under
//! `LinkPolicy::SequenceValue` a node may gain several successors because
//! its sequence recurs as a representative further up.

use petgraph::algo::is_cyclic_directed;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use seqclust_core::types::{Cluster, ClusterId, FxHashMap, LinkPolicy, Sequence};
use tracing::trace;

/// The hierarchy's record of one cluster.
#[derive(Debug, Clone, Serialize)]
pub struct HierarchyNode {
    pub cluster_id: ClusterId,
    /// Shares its allocation with the cluster's own sequence.
    pub sequence: Sequence,
    pub score: f64,
    /// Ids of the two merged clusters; `None` for leaves.
    pub constituents: Option<(ClusterId, ClusterId)>,
}

impl HierarchyNode {
    fn from_cluster(cluster: &Cluster) -> Self {
        Self {
            cluster_id: cluster.id(),
            sequence: cluster.sequence().clone(),
            score: cluster.score(),
            constituents: cluster.constituent_ids(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.constituents.is_none()
    }

    fn label(&self) -> String {
        if self.is_leaf() {
            format!("{} {}", self.cluster_id, self.sequence)
        } else {
            format!("{} {} d={:.3}", self.cluster_id, self.sequence, self.score)
        }
    }
}

/// Append-only merge-provenance graph.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    graph: DiGraph<HierarchyNode, ()>,
    index: FxHashMap<ClusterId, NodeIndex>,
    policy: LinkPolicy,
}

impl Hierarchy {
    /// Build a hierarchy holding one unlinked node per leaf.
    pub fn new(leaves: &[Cluster], policy: LinkPolicy) -> Self {
        let mut hierarchy = Self {
            graph: DiGraph::with_capacity(leaves.len() * 2, leaves.len() * 2),
            index: FxHashMap::default(),
            policy,
        };
        for leaf in leaves {
            hierarchy.add_cluster(leaf);
        }
        hierarchy
    }

    pub fn policy(&self) -> LinkPolicy {
        self.policy
    }

    /// Record a newly created cluster.
    ///
    /// Links it to its predecessors per the link policy and registers it as a
    /// successor on each. Returns the predecessor ids (empty for leaves).
    pub fn add_cluster(&mut self, cluster: &Cluster) -> Vec<ClusterId> {
        let predecessors = self.find_predecessors(cluster);
        let node = self.graph.add_node(HierarchyNode::from_cluster(cluster));
        self.index.insert(cluster.id(), node);
        for &pred in &predecessors {
            self.graph.add_edge(pred, node, ());
        }

        let linked: Vec<ClusterId> = predecessors
            .iter()
            .map(|&idx| self.graph[idx].cluster_id)
            .collect();
        trace!(cluster = %cluster.id(), linked = ?linked, "hierarchy node added");
        linked
    }

    /// Predecessor nodes for a cluster, in node-creation order.
    fn find_predecessors(&self, cluster: &Cluster) -> Vec<NodeIndex> {
        let Some((first, second)) = cluster.constituents() else {
            return Vec::new();
        };
        match self.policy {
            LinkPolicy::Identity => [first.id(), second.id()]
                .iter()
                .filter_map(|id| self.index.get(id).copied())
                .collect(),
            LinkPolicy::SequenceValue => self
                .graph
                .node_indices()
                .filter(|&idx| {
                    let seq = &self.graph[idx].sequence;
                    seq == first.sequence() || seq == second.sequence()
                })
                .collect(),
        }
    }

    pub fn node(&self, id: ClusterId) -> Option<&HierarchyNode> {
        self.index.get(&id).map(|&idx| &self.graph[idx])
    }

    /// Nodes the given cluster was linked to when it was added.
    pub fn linked(&self, id: ClusterId) -> Vec<&HierarchyNode> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Nodes that were later linked to the given cluster.
    pub fn successors(&self, id: ClusterId) -> Vec<&HierarchyNode> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: ClusterId, direction: Direction) -> Vec<&HierarchyNode> {
        let Some(&idx) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort_unstable();
        found.dedup();
        found.into_iter().map(|n| &self.graph[n]).collect()
    }

    /// Leaf nodes, in input order.
    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        self.iter().filter(|n| n.is_leaf()).collect()
    }

    /// Nodes with no successors. A completed identity hierarchy has exactly one.
    pub fn roots(&self) -> Vec<&HierarchyNode> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All links as `(predecessor, successor)` pairs, in creation order.
    pub fn edges(&self) -> Vec<(ClusterId, ClusterId)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| {
                (
                    self.graph[e.source()].cluster_id,
                    self.graph[e.target()].cluster_id,
                )
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Links only ever point at newer nodes, so this holds for any hierarchy
    /// built through `add_cluster`.
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Read-only access to the underlying graph for custom traversals.
    pub fn graph(&self) -> &DiGraph<HierarchyNode, ()> {
        &self.graph
    }

    /// Graphviz DOT rendering, one labelled vertex per node.
    pub fn to_dot(&self) -> String {
        let labelled = self.graph.map(|_, node| node.label(), |_, _| String::new());
        format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
    }
}
