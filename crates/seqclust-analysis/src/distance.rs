//! Distance engine: the per-iteration n×n matrix and match-count tally.
//!
//! distance(i, j) = 1 − best_pair_match / longest_match_in_dataset, or +inf
//! when the pair shares nothing. The matrix is rebuilt from scratch every
//! iteration; it is never cached across merges.

use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use seqclust_core::errors::ClusteringError;
use seqclust_core::traits::SequenceMatcher;
use seqclust_core::tracing::DISTANCE_SPAN;
use seqclust_core::types::Token;
use tracing::{debug, debug_span, trace};

/// Symmetric distance matrix, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// An n×n matrix with every cell at +inf.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![f64::INFINITY; n * n],
        }
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    /// Set both (i, j) and (j, i).
    fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        self.cells[i * self.n + j] = value;
        self.cells[j * self.n + i] = value;
    }

    /// The first minimal cell in row-major order, as `(row, col, value)`.
    ///
    /// Ties keep the earliest cell. Because the matrix is symmetric with an
    /// infinite diagonal, a finite minimum always lands above the diagonal
    /// (`row < col`). `None` only for an empty matrix.
    pub fn argmin(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (flat, &value) in self.cells.iter().enumerate() {
            match best {
                Some((_, current)) if value >= current => {}
                _ => best = Some((flat, value)),
            }
        }
        best.map(|(flat, value)| (flat / self.n, flat % self.n, value))
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n {
            let row: Vec<String> = self
                .row(i)
                .iter()
                .map(|v| {
                    if v.is_infinite() {
                        "inf".to_string()
                    } else {
                        format!("{v:.3}")
                    }
                })
                .collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}

/// Everything one distance computation produces.
#[derive(Debug, Clone)]
pub struct DistanceComputation {
    pub matrix: DistanceMatrix,
    /// Per-index count of common-substring results, summed over every pair
    /// the index took part in.
    pub match_counts: Vec<usize>,
    /// Length of the longest common substring across all sequences.
    pub max_match_length: usize,
    /// Matcher invocations made, including the dataset-wide one.
    pub matcher_queries: usize,
}

/// Outcome of one pairwise query.
struct PairMatch {
    i: usize,
    j: usize,
    best_length: Option<usize>,
    result_count: usize,
}

/// Build the distance matrix and match counts for the given live sequences.
///
/// Fails with [`ClusteringError::NoGlobalMatch`] (reporting zero merges; the
/// caller stamps its own progress) when no two sequences share anything.
/// With `parallel`, pairwise queries run on the rayon pool; results are
/// reduced in pair order either way, so the output does not depend on it.
pub fn compute_distances(
    sequences: &[&[Token]],
    matcher: &dyn SequenceMatcher,
    parallel: bool,
) -> Result<DistanceComputation, ClusteringError> {
    let started = Instant::now();
    let n = sequences.len();
    let _span = debug_span!(DISTANCE_SPAN, live = n).entered();

    let all: Vec<(usize, &[Token])> = sequences.iter().copied().enumerate().collect();
    let max_match_length = match matcher.common_substrings(&all).first() {
        Some(longest) if longest.length > 0 => longest.length,
        _ => {
            return Err(ClusteringError::NoGlobalMatch {
                live_clusters: n,
                merges_completed: 0,
            })
        }
    };

    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let query = |&(i, j): &(usize, usize)| {
        let results = matcher.common_substrings(&[(i, sequences[i]), (j, sequences[j])]);
        PairMatch {
            i,
            j,
            best_length: results.first().map(|r| r.length),
            result_count: results.len(),
        }
    };
    let outcomes: Vec<PairMatch> = if parallel {
        pairs.par_iter().map(query).collect()
    } else {
        pairs.iter().map(query).collect()
    };

    let mut matrix = DistanceMatrix::new(n);
    let mut match_counts = vec![0usize; n];
    for outcome in &outcomes {
        if let Some(length) = outcome.best_length {
            let distance = (1.0 - length as f64 / max_match_length as f64).max(0.0);
            matrix.set_pair(outcome.i, outcome.j, distance);
            match_counts[outcome.i] += outcome.result_count;
            match_counts[outcome.j] += outcome.result_count;
        }
    }

    debug!(
        live = n,
        max_match_length,
        queries = pairs.len() + 1,
        matcher = matcher.name(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "distance matrix built"
    );
    trace!("distance matrix =\n{matrix}");

    Ok(DistanceComputation {
        matrix,
        match_counts,
        max_match_length,
        matcher_queries: pairs.len() + 1,
    })
}
