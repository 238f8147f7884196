//! Integration tests for the clustering loop, hierarchy, and export.

use std::time::Duration;

use seqclust_analysis::*;
use seqclust_core::config::SeqclustConfig;
use seqclust_core::errors::ClusteringError;
use seqclust_core::traits::{Cancellable, CancellationToken, SequenceMatcher};
use seqclust_core::types::{
    ClusterId, CommonSubstring, LinkPolicy, Sequence, SmallVec4, Token, TokenInterner,
};

fn seq(raw: &[u32]) -> Sequence {
    Sequence::from_raw(raw)
}

/// Four sequences with a known merge order:
/// (c0,c1)->c4, (c4,c2)->c5, (c5,c3)->c6, all at distance 0.
fn chain_input() -> Vec<Sequence> {
    vec![
        seq(&[1, 2, 3, 4]),
        seq(&[2, 3, 4, 5]),
        seq(&[7, 8, 1, 2]),
        seq(&[7, 8, 9]),
    ]
}

fn sequential(policy: LinkPolicy) -> HierarchicalClustering {
    let mut config = SeqclustConfig::default();
    config.clustering.parallel = Some(false);
    config.clustering.link_policy = Some(policy);
    HierarchicalClustering::new(config)
}

#[test]
fn scenario_disjoint_sequence_stops_with_no_global_match() {
    let engine = HierarchicalClustering::with_defaults();
    let mut run = engine
        .start(vec![seq(&[1, 2, 3]), seq(&[2, 3, 4]), seq(&[9, 9, 9])])
        .unwrap();

    let first = match run.step().unwrap() {
        StepOutcome::Merged(step) => step,
        StepOutcome::Complete => panic!("expected a merge"),
    };
    assert_eq!(first.positions, (0, 1));
    assert_eq!(first.merged, (ClusterId(0), ClusterId(1)));
    assert_eq!(first.distance, 0.0);
    assert_eq!(first.match_counts, (1, 1));
    // Tied counts: the lower index wins.
    assert_eq!(first.representative, ClusterId(0));
    assert_eq!(run.live().len(), 2);
    assert_eq!(run.live()[0].id(), ClusterId(3));
    assert_eq!(run.live()[1].id(), ClusterId(2));

    let err = run.step().unwrap_err();
    assert_eq!(
        err,
        ClusteringError::NoGlobalMatch {
            live_clusters: 2,
            merges_completed: 1
        }
    );

    let err = engine
        .process(vec![seq(&[1, 2, 3]), seq(&[2, 3, 4]), seq(&[9, 9, 9])])
        .unwrap_err();
    assert!(matches!(err, ClusteringError::NoGlobalMatch { .. }));
}

#[test]
fn chain_merges_in_expected_order() {
    let output = sequential(LinkPolicy::Identity).process(chain_input()).unwrap();

    let summary: Vec<((ClusterId, ClusterId), ClusterId, ClusterId)> = output
        .merges
        .iter()
        .map(|m| (m.merged, m.cluster, m.representative))
        .collect();
    assert_eq!(
        summary,
        vec![
            ((ClusterId(0), ClusterId(1)), ClusterId(4), ClusterId(0)),
            ((ClusterId(4), ClusterId(2)), ClusterId(5), ClusterId(2)),
            ((ClusterId(5), ClusterId(3)), ClusterId(6), ClusterId(5)),
        ]
    );
    assert_eq!(output.merges[1].match_counts, (1, 2));
    assert!(output.merges.iter().all(|m| m.distance == 0.0));

    assert_eq!(output.root.id(), ClusterId(6));
    assert_eq!(output.root.leaf_count(), 4);
    assert_eq!(to_newick(&output.root), "(((c0,c1)c4,c2)c5,c3)c6;");
}

#[test]
fn root_representative_is_the_leaf_allocation() {
    let output = sequential(LinkPolicy::Identity).process(chain_input()).unwrap();
    let leaf_two = output.hierarchy.node(ClusterId(2)).unwrap();
    assert!(output.root.sequence().ptr_eq(&leaf_two.sequence));
}

#[test]
fn identity_hierarchy_is_a_tree() {
    let output = sequential(LinkPolicy::Identity).process(chain_input()).unwrap();
    let h = &output.hierarchy;

    assert_eq!(h.len(), 7);
    assert_eq!(h.edge_count(), 6);
    assert_eq!(h.leaves().len(), 4);
    assert_eq!(h.roots().len(), 1);
    assert_eq!(h.roots()[0].cluster_id, ClusterId(6));
    assert!(h.is_acyclic());

    for node in h.iter() {
        let expected = if node.is_leaf() { 0 } else { 2 };
        assert_eq!(h.linked(node.cluster_id).len(), expected);
    }
}

#[test]
fn sequence_value_hierarchy_links_by_representative() {
    let output = sequential(LinkPolicy::SequenceValue).process(chain_input()).unwrap();
    let h = &output.hierarchy;

    let ids = |id: u32| -> Vec<ClusterId> {
        h.linked(ClusterId(id)).iter().map(|n| n.cluster_id).collect()
    };
    assert_eq!(ids(4), vec![ClusterId(0), ClusterId(1)]);
    // c4 carries c0's sequence, so both are linked.
    assert_eq!(ids(5), vec![ClusterId(0), ClusterId(2), ClusterId(4)]);
    assert_eq!(ids(6), vec![ClusterId(2), ClusterId(3), ClusterId(5)]);
    assert_eq!(h.successors(ClusterId(2)).len(), 2);
    assert!(h.is_acyclic());
}

#[test]
fn single_input_is_a_trivial_hierarchy() {
    let output = HierarchicalClustering::with_defaults()
        .process(vec![seq(&[4, 2])])
        .unwrap();
    assert!(output.root.is_leaf());
    assert_eq!(output.root.id(), ClusterId(0));
    assert!(output.merges.is_empty());
    assert_eq!(output.hierarchy.len(), 1);
}

#[test]
fn empty_input_is_rejected() {
    let err = HierarchicalClustering::with_defaults()
        .process(Vec::<Sequence>::new())
        .unwrap_err();
    assert_eq!(err, ClusteringError::EmptyInput);
}

#[test]
fn iteration_limit_aborts() {
    let mut config = SeqclustConfig::default();
    config.clustering.max_iterations = Some(1);
    let err = HierarchicalClustering::new(config)
        .process(chain_input())
        .unwrap_err();
    assert_eq!(err, ClusteringError::IterationLimitExceeded { limit: 1 });
}

#[test]
fn cancellation_is_observed_before_the_next_merge() {
    let engine = HierarchicalClustering::with_defaults();
    let mut run = engine.start(chain_input()).unwrap();
    assert!(matches!(run.step().unwrap(), StepOutcome::Merged(_)));

    run.cancellation_token().cancel();
    let err = run.step().unwrap_err();
    assert_eq!(err, ClusteringError::Cancelled { merges_completed: 1 });
}

#[test]
fn engine_runs_again_after_a_cancelled_run() {
    let engine = HierarchicalClustering::with_defaults();
    let run = engine.start(vec![seq(&[1, 2]), seq(&[1, 2])]).unwrap();
    run.cancellation_token().cancel();
    let err = run.finish().unwrap_err();
    assert_eq!(err, ClusteringError::Cancelled { merges_completed: 0 });

    let output = engine.process(vec![seq(&[1, 2]), seq(&[1, 2])]).unwrap();
    assert_eq!(output.merges.len(), 1);
}

#[test]
fn caller_token_is_honoured_and_reusable_after_reset() {
    let engine = HierarchicalClustering::with_defaults();
    let token = CancellationToken::new();
    token.cancel();
    let err = engine
        .process_with_cancellation(chain_input(), token.clone())
        .unwrap_err();
    assert_eq!(err, ClusteringError::Cancelled { merges_completed: 0 });

    token.reset();
    let output = engine
        .process_with_cancellation(chain_input(), token)
        .unwrap();
    assert_eq!(output.merges.len(), 3);
}

#[test]
fn deadline_aborts() {
    let mut config = SeqclustConfig::default();
    config.clustering.timeout_ms = Some(1);
    let engine = HierarchicalClustering::new(config);
    let mut run = engine.start(chain_input()).unwrap();
    std::thread::sleep(Duration::from_millis(10));
    let err = run.step().unwrap_err();
    assert!(matches!(err, ClusteringError::DeadlineExceeded { limit_ms: 1, .. }));
}

/// Reports a match for the full dataset but never for a pair.
struct GlobalOnlyMatcher;

impl SequenceMatcher for GlobalOnlyMatcher {
    fn common_substrings(&self, sources: &[(usize, &[Token])]) -> Vec<CommonSubstring> {
        if sources.len() <= 2 {
            return Vec::new();
        }
        let occurrences: SmallVec4<usize> = sources.iter().map(|(i, _)| *i).collect();
        vec![CommonSubstring::new(vec![Token(0)], occurrences)]
    }

    fn name(&self) -> &str {
        "global-only"
    }
}

#[test]
fn all_infinite_pairs_stall() {
    let engine =
        HierarchicalClustering::with_matcher(SeqclustConfig::default(), Box::new(GlobalOnlyMatcher));
    let err = engine
        .process(vec![seq(&[0]), seq(&[0]), seq(&[0])])
        .unwrap_err();
    assert_eq!(
        err,
        ClusteringError::Stalled {
            live_clusters: 3,
            merges_completed: 0
        }
    );
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let input = vec![
        seq(&[1, 2, 3, 4, 5]),
        seq(&[3, 4, 5, 6, 2]),
        seq(&[6, 1, 2]),
        seq(&[9, 1, 2, 3]),
        seq(&[5, 6, 9, 2]),
        seq(&[2, 3]),
    ];
    let seq_run = sequential(LinkPolicy::Identity).process(input.clone()).unwrap();

    let mut config = SeqclustConfig::default();
    config.clustering.parallel = Some(true);
    let par_run = HierarchicalClustering::new(config).process(input.clone()).unwrap();
    let again = HierarchicalClustering::new(SeqclustConfig::default())
        .process(input)
        .unwrap();

    assert_eq!(seq_run.merges, par_run.merges);
    assert_eq!(par_run.merges, again.merges);
    assert_eq!(seq_run.merges.len(), 5);
}

#[test]
fn interned_labels_cluster_like_raw_tokens() {
    let interner = TokenInterner::new();
    let input = vec![
        interner.intern_sequence(["door", "hall", "stairs"]),
        interner.intern_sequence(["hall", "stairs", "attic"]),
        interner.intern_sequence(["attic", "roof"]),
    ];
    let output = HierarchicalClustering::with_defaults().process(input).unwrap();
    assert_eq!(output.merges.len(), 2);

    let root_labels: Vec<&str> = output
        .root
        .sequence()
        .iter()
        .filter_map(|t| interner.resolve(*t))
        .collect();
    assert_eq!(root_labels.len(), output.root.sequence().len());
}

#[test]
fn export_covers_the_whole_run() {
    let output = sequential(LinkPolicy::Identity).process(chain_input()).unwrap();
    let export = HierarchyExport::from_hierarchy(&output.hierarchy);
    assert_eq!(export.nodes.len(), 7);
    assert_eq!(export.edges.len(), 6);

    let dot = output.hierarchy.to_dot();
    assert_eq!(dot.matches("->").count(), 6);
}

#[test]
fn long_chain_root_roundtrips_through_json() {
    let input: Vec<Sequence> = (0..80).map(|i| seq(&[0, 1000 + i])).collect();
    let output = HierarchicalClustering::with_defaults().process(input).unwrap();
    assert_eq!(output.root.depth(), 79);

    let json = serde_json::to_string(&output.root).unwrap();
    let back: seqclust_core::types::Cluster = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id(), output.root.id());
    assert_eq!(back.depth(), 79);
    assert_eq!(to_newick(&back), to_newick(&output.root));
}
