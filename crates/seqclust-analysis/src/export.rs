//! Interchange formats for clustering results.
//!
//! - `HierarchyExport`: node/edge lists for JSON consumers
//! - `to_newick`: the owned merge tree as a Newick string
//!
//! DOT output lives on [`Hierarchy::to_dot`].

use serde::{Deserialize, Serialize};
use seqclust_core::types::{Cluster, ClusterId, LinkPolicy, Sequence};

use crate::hierarchy::Hierarchy;

/// One exported hierarchy node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: ClusterId,
    pub sequence: Sequence,
    pub score: f64,
    pub constituents: Option<(ClusterId, ClusterId)>,
}

/// One exported link, predecessor to successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEdge {
    pub from: ClusterId,
    pub to: ClusterId,
}

/// Flat, serializable snapshot of a hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyExport {
    pub link_policy: LinkPolicy,
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

impl HierarchyExport {
    pub fn from_hierarchy(hierarchy: &Hierarchy) -> Self {
        Self {
            link_policy: hierarchy.policy(),
            nodes: hierarchy
                .iter()
                .map(|n| ExportNode {
                    id: n.cluster_id,
                    sequence: n.sequence.clone(),
                    score: n.score,
                    constituents: n.constituents,
                })
                .collect(),
            edges: hierarchy
                .edges()
                .into_iter()
                .map(|(from, to)| ExportEdge { from, to })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

enum Frame<'a> {
    Open(&'a Cluster),
    Text(String),
}

/// Newick rendering of a merge tree, e.g. `((c0,c1)c3,c2)c4;`.
///
/// Leaves are `c<id>`; internal nodes carry their own id as a label. Built
/// with an explicit stack, so deep chains do not recurse.
pub fn to_newick(root: &Cluster) -> String {
    let mut out = String::new();
    let mut stack = vec![Frame::Open(root)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Text(text) => out.push_str(&text),
            Frame::Open(cluster) => match cluster.constituents() {
                None => out.push_str(&cluster.id().to_string()),
                Some((first, second)) => {
                    out.push('(');
                    stack.push(Frame::Text(format!("){}", cluster.id())));
                    stack.push(Frame::Open(second));
                    stack.push(Frame::Text(",".to_string()));
                    stack.push(Frame::Open(first));
                }
            },
        }
    }
    out.push(';');
    out
}
