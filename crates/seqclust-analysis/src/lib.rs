//! seqclust-analysis: hierarchical clustering of AoI token sequences.
//!
//! - Matcher: maximal common substrings across a set of sources
//! - Distance: per-iteration n×n matrix normalized by the dataset's longest match
//! - Representative: which constituent's sequence a merge inherits
//! - Hierarchy: append-only provenance graph over every cluster ever created
//! - Clustering: the iterative nearest-pair merge loop
//! - Export: DOT, JSON, and Newick renderings of the results

pub mod clustering;
pub mod distance;
pub mod export;
pub mod hierarchy;
pub mod matcher;
pub mod representative;

pub use clustering::{
    ClusteringOutput, ClusteringRun, HierarchicalClustering, MergeStep, StepOutcome,
};
pub use distance::{compute_distances, DistanceComputation, DistanceMatrix};
pub use export::{to_newick, ExportEdge, ExportNode, HierarchyExport};
pub use hierarchy::{Hierarchy, HierarchyNode};
pub use matcher::MaximalSubstringMatcher;
pub use representative::choose_representative;
