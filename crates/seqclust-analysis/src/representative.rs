//! Representative selection for merged clusters.
//!
//! The merged cluster inherits the sequence that matches the most other
//! sequences in the dataset, measured by the iteration's match counts.

use seqclust_core::types::Representative;

/// Pick the constituent whose sequence becomes the merge's representative.
///
/// `first` and `second` index into `match_counts` in the order the merge pair
/// was discovered. Strictly greater count wins; ties go to `first`.
pub fn choose_representative(match_counts: &[usize], first: usize, second: usize) -> Representative {
    if match_counts[first] >= match_counts[second] {
        Representative::First
    } else {
        Representative::Second
    }
}
