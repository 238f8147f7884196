//! Agglomerative clustering loop.
//!
//! Each iteration rebuilds the distance matrix over the live clusters,
//! merges the first closest pair in row-major order, prepends the merge to
//! the live list, and records it in the hierarchy. The loop is explicit, so
//! stack depth does not grow with the number of inputs.

use std::time::Instant;

use serde::Serialize;
use seqclust_core::config::SeqclustConfig;
use seqclust_core::errors::{ClusteringError, SeqclustErrorCode};
use seqclust_core::traits::{CancellationToken, SequenceMatcher};
use seqclust_core::tracing::CLUSTERING_SPAN;
use seqclust_core::types::{Cluster, ClusterId, Representative, Sequence, Token};
use tracing::{debug, info, info_span, warn};

use crate::distance::compute_distances;
use crate::hierarchy::Hierarchy;
use crate::matcher::MaximalSubstringMatcher;
use crate::representative::choose_representative;

/// Audit record of one merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeStep {
    /// Zero-based merge number.
    pub iteration: usize,
    /// Positions of the pair in the live list (and matrix) at merge time.
    pub positions: (usize, usize),
    /// Ids of the merged clusters, in matrix order.
    pub merged: (ClusterId, ClusterId),
    /// Id assigned to the new cluster.
    pub cluster: ClusterId,
    pub distance: f64,
    /// Id of the constituent whose sequence the merge inherited.
    pub representative: ClusterId,
    /// Match counts of the pair in this iteration.
    pub match_counts: (usize, usize),
    pub max_match_length: usize,
}

/// Result of a single [`ClusteringRun::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Merged(MergeStep),
    /// One live cluster remains.
    Complete,
}

/// A finished clustering: the root, the full hierarchy, and the merge log.
#[derive(Debug, Clone)]
pub struct ClusteringOutput {
    pub root: Cluster,
    pub hierarchy: Hierarchy,
    pub merges: Vec<MergeStep>,
}

/// Hierarchical clustering engine.
///
/// Holds configuration and the sequence matcher. Reusable: every run it
/// starts gets its own cancellation token.
pub struct HierarchicalClustering {
    config: SeqclustConfig,
    matcher: Box<dyn SequenceMatcher>,
}

impl HierarchicalClustering {
    /// Create an engine using the built-in maximal-substring matcher.
    pub fn new(config: SeqclustConfig) -> Self {
        let matcher = MaximalSubstringMatcher::from_config(&config.matcher);
        Self::with_matcher(config, Box::new(matcher))
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SeqclustConfig::default())
    }

    /// Create an engine around a caller-supplied matcher.
    pub fn with_matcher(config: SeqclustConfig, matcher: Box<dyn SequenceMatcher>) -> Self {
        Self { config, matcher }
    }

    pub fn config(&self) -> &SeqclustConfig {
        &self.config
    }

    /// Set up a run over the given sequences without merging anything yet.
    ///
    /// Leaves get ids `0..n` in input order. Fails on empty input. The run
    /// gets a fresh token, reachable through [`ClusteringRun::cancellation_token`].
    pub fn start<I, S>(&self, sequences: I) -> Result<ClusteringRun<'_>, ClusteringError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sequence>,
    {
        self.start_with_cancellation(sequences, CancellationToken::new())
    }

    /// Like [`start`](Self::start), polling a caller-owned token.
    pub fn start_with_cancellation<I, S>(
        &self,
        sequences: I,
        cancellation: CancellationToken,
    ) -> Result<ClusteringRun<'_>, ClusteringError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sequence>,
    {
        let live: Vec<Cluster> = sequences
            .into_iter()
            .enumerate()
            .map(|(i, seq)| Cluster::leaf(ClusterId(i as u32), seq.into()))
            .collect();
        if live.is_empty() {
            return Err(ClusteringError::EmptyInput);
        }

        let hierarchy = Hierarchy::new(&live, self.config.clustering.effective_link_policy());
        Ok(ClusteringRun {
            engine: self,
            next_id: live.len() as u32,
            live,
            hierarchy,
            merges: Vec::new(),
            started: Instant::now(),
            cancellation,
        })
    }

    /// Cluster the sequences down to a single root.
    ///
    /// A single input yields a one-node hierarchy with no merges. Any error
    /// aborts the run and discards the partial hierarchy.
    pub fn process<I, S>(&self, sequences: I) -> Result<ClusteringOutput, ClusteringError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sequence>,
    {
        self.process_with_cancellation(sequences, CancellationToken::new())
    }

    /// Like [`process`](Self::process), stopping before the next merge once
    /// `cancellation` is cancelled from another thread.
    pub fn process_with_cancellation<I, S>(
        &self,
        sequences: I,
        cancellation: CancellationToken,
    ) -> Result<ClusteringOutput, ClusteringError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Sequence>,
    {
        let run = self.start_with_cancellation(sequences, cancellation).inspect_err(|e| {
            warn!(code = e.error_code(), error = %e, "clustering rejected");
        })?;

        let span = info_span!(
            CLUSTERING_SPAN,
            leaves = run.live.len(),
            policy = run.hierarchy.policy().name(),
            matcher = self.matcher.name()
        );
        let _guard = span.enter();

        run.finish()
    }
}

/// One in-progress clustering run.
pub struct ClusteringRun<'a> {
    engine: &'a HierarchicalClustering,
    live: Vec<Cluster>,
    hierarchy: Hierarchy,
    merges: Vec<MergeStep>,
    next_id: u32,
    started: Instant,
    cancellation: CancellationToken,
}

impl<'a> ClusteringRun<'a> {
    /// Clusters still awaiting a merge, newest first.
    pub fn live(&self) -> &[Cluster] {
        &self.live
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn merges(&self) -> &[MergeStep] {
        &self.merges
    }

    /// Handle that stops this run before its next merge.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn is_complete(&self) -> bool {
        self.live.len() <= 1
    }

    /// Perform one merge, or report completion.
    pub fn step(&mut self) -> Result<StepOutcome, ClusteringError> {
        if self.is_complete() {
            return Ok(StepOutcome::Complete);
        }
        let merges_completed = self.merges.len();
        self.check_guards(merges_completed)?;

        let clustering = &self.engine.config.clustering;
        let sequences: Vec<&[Token]> = self.live.iter().map(|c| c.sequence().tokens()).collect();
        let computation = compute_distances(
            &sequences,
            self.engine.matcher.as_ref(),
            clustering.effective_parallel(),
        )
        .map_err(|e| e.with_merges_completed(merges_completed))?;

        let (i, j, distance) = match computation.matrix.argmin() {
            Some((i, j, d)) if d.is_finite() => (i, j, d),
            _ => {
                return Err(ClusteringError::Stalled {
                    live_clusters: self.live.len(),
                    merges_completed,
                })
            }
        };
        debug_assert!(i < j, "finite minimum must lie above the diagonal");

        let representative = choose_representative(&computation.match_counts, i, j);

        // Remove the later position first so `i` stays valid.
        let second = self.live.remove(j);
        let first = self.live.remove(i);
        let merged_ids = (first.id(), second.id());
        let representative_id = match representative {
            Representative::First => merged_ids.0,
            Representative::Second => merged_ids.1,
        };

        let id = ClusterId(self.next_id);
        self.next_id += 1;
        let merged = Cluster::merge(id, first, second, representative, distance);
        self.hierarchy.add_cluster(&merged);
        self.live.insert(0, merged);

        let step = MergeStep {
            iteration: merges_completed,
            positions: (i, j),
            merged: merged_ids,
            cluster: id,
            distance,
            representative: representative_id,
            match_counts: (computation.match_counts[i], computation.match_counts[j]),
            max_match_length: computation.max_match_length,
        };
        debug!(
            iteration = step.iteration,
            first = %merged_ids.0,
            second = %merged_ids.1,
            cluster = %id,
            distance,
            representative = %representative_id,
            live = self.live.len(),
            "merged closest pair"
        );
        self.merges.push(step.clone());
        Ok(StepOutcome::Merged(step))
    }

    fn check_guards(&self, merges_completed: usize) -> Result<(), ClusteringError> {
        self.cancellation.check(merges_completed)?;
        let clustering = &self.engine.config.clustering;
        if let Some(limit) = clustering.max_iterations {
            if merges_completed >= limit {
                return Err(ClusteringError::IterationLimitExceeded { limit });
            }
        }
        if let Some(timeout) = clustering.timeout() {
            let elapsed = self.started.elapsed();
            if elapsed > timeout {
                return Err(ClusteringError::DeadlineExceeded {
                    elapsed_ms: elapsed.as_millis() as u64,
                    limit_ms: timeout.as_millis() as u64,
                });
            }
        }
        Ok(())
    }

    /// Step until a single root remains.
    pub fn finish(mut self) -> Result<ClusteringOutput, ClusteringError> {
        loop {
            match self.step() {
                Ok(StepOutcome::Merged(_)) => {}
                Ok(StepOutcome::Complete) => break,
                Err(e) => {
                    warn!(
                        code = e.error_code(),
                        error = %e,
                        merges = self.merges.len(),
                        "clustering aborted"
                    );
                    return Err(e);
                }
            }
        }

        // `start` rejects empty input and every merge keeps one cluster live.
        let Some(root) = self.live.pop() else {
            return Err(ClusteringError::EmptyInput);
        };
        info!(
            root = %root.id(),
            merges = self.merges.len(),
            nodes = self.hierarchy.len(),
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "clustering complete"
        );
        Ok(ClusteringOutput {
            root,
            hierarchy: self.hierarchy,
            merges: self.merges,
        })
    }
}
