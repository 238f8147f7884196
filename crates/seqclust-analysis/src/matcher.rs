//! Maximal common substring enumeration.
//!
//! A common substring is a contiguous token run present in at least two
//! distinct sources. It is *maximal* when no longer common substring
//! contains it. Every common substring sits on some diagonal of some pair of
//! sources, so the maximal ones are exactly the diagonal runs that no other
//! diagonal run contains.
//!
//! O(k² · L²) for k sources of length L. AoI sequences are short, and the
//! pairwise queries of the distance engine only ever pass two sources.

use std::cmp::Ordering;

use seqclust_core::config::MatcherConfig;
use seqclust_core::traits::SequenceMatcher;
use seqclust_core::types::sequence::contains_run;
use seqclust_core::types::{CommonSubstring, FxHashSet, SmallVec4, Token};

/// Default [`SequenceMatcher`]: reports every maximal common substring of at
/// least `min_length` tokens.
#[derive(Debug, Clone)]
pub struct MaximalSubstringMatcher {
    min_length: usize,
}

impl MaximalSubstringMatcher {
    /// Create a matcher. A `min_length` of 0 is treated as 1.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length: min_length.max(1),
        }
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        Self::new(config.effective_min_length())
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl Default for MaximalSubstringMatcher {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SequenceMatcher for MaximalSubstringMatcher {
    fn common_substrings(&self, sources: &[(usize, &[Token])]) -> Vec<CommonSubstring> {
        if sources.len() < 2 {
            return Vec::new();
        }

        // Phase 1: every run that cannot be extended along its diagonal.
        let mut runs: FxHashSet<&[Token]> = FxHashSet::default();
        for (a, &(_, left)) in sources.iter().enumerate() {
            for &(_, right) in &sources[a + 1..] {
                collect_diagonal_runs(left, right, self.min_length, &mut runs);
            }
        }
        if runs.is_empty() {
            return Vec::new();
        }

        // Phase 2: drop runs contained in a longer one. Longest first, so
        // checking against the kept set is enough.
        let mut candidates: Vec<&[Token]> = runs.into_iter().collect();
        candidates.sort_by(|x, y| y.len().cmp(&x.len()).then_with(|| x.cmp(y)));
        let mut maximal: Vec<&[Token]> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let contained = maximal
                .iter()
                .any(|kept| kept.len() > candidate.len() && contains_run(kept, candidate));
            if !contained {
                maximal.push(candidate);
            }
        }

        // Phase 3: occurrence sets.
        let mut results: Vec<CommonSubstring> = maximal
            .into_iter()
            .map(|tokens| {
                let mut occurrences: SmallVec4<usize> = sources
                    .iter()
                    .filter(|(_, seq)| contains_run(seq, tokens))
                    .map(|(idx, _)| *idx)
                    .collect();
                occurrences.sort_unstable();
                occurrences.dedup();
                CommonSubstring::new(tokens.to_vec(), occurrences)
            })
            .collect();

        results.sort_by(compare_results);
        results
    }

    fn name(&self) -> &str {
        "maximal-substring"
    }
}

/// Descending length, then lowest source index, then token order.
fn compare_results(a: &CommonSubstring, b: &CommonSubstring) -> Ordering {
    b.length
        .cmp(&a.length)
        .then_with(|| a.occurrences.first().cmp(&b.occurrences.first()))
        .then_with(|| a.tokens.cmp(&b.tokens))
}

/// Walk every diagonal of the `left` × `right` match grid and collect the
/// maximal runs of equal tokens, as slices of `left`.
fn collect_diagonal_runs<'a>(
    left: &'a [Token],
    right: &[Token],
    min_length: usize,
    out: &mut FxHashSet<&'a [Token]>,
) {
    let starts = (0..left.len())
        .map(|i| (i, 0))
        .chain((1..right.len()).map(|j| (0, j)));

    for (mut i, mut j) in starts {
        let mut run = 0usize;
        while i < left.len() && j < right.len() {
            if left[i] == right[j] {
                run += 1;
            } else {
                if run >= min_length {
                    out.insert(&left[i - run..i]);
                }
                run = 0;
            }
            i += 1;
            j += 1;
        }
        if run >= min_length {
            out.insert(&left[i - run..i]);
        }
    }
}
