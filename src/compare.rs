//! Suffix comparison through a Difference Cover Sample.
//!
//! Deciding full lexicographic suffix order normally costs up to the length
//! of the shorter suffix. With a populated rank store, any comparison that
//! ties through the first `Q` symbols is settled by one lookup-table probe
//! and two rank reads: the covering property guarantees an offset `l < Q`
//! at which both suffixes are sampled.

use std::cmp::Ordering;

use crate::dcs::{DcsRanks, DifferenceCoverTable, DC_Q};
use crate::sequence::PackedSequence;

/// Compares suffixes of one shared string in strict lexicographic order.
///
/// A pure function of the string, the cover table, and the rank store; it
/// holds no mutable state and may be invoked concurrently without bound.
///
/// The rank store must be fully populated (see
/// [`SuffixRanker`](crate::SuffixRanker)) before any comparison that reaches
/// the rank fallback — that is, whenever the string holds `Q` symbols or
/// more. This precondition is a caller contract and is not checked.
#[derive(Clone, Copy)]
pub struct SuffixComparator<'a, S> {
    seq: &'a S,
    table: &'a DifferenceCoverTable,
    ranks: &'a DcsRanks,
}
impl<'a, S: PackedSequence> SuffixComparator<'a, S> {
    /// Creates a comparator over the given string and tables
    pub fn new(seq: &'a S, table: &'a DifferenceCoverTable, ranks: &'a DcsRanks) -> Self {
        Self { seq, table, ranks }
    }

    /// Returns true if the suffix at `i` is lexicographically smaller than
    /// the suffix at `j`, for distinct offsets `i != j`.
    #[must_use]
    pub fn less(&self, i: usize, j: usize) -> bool {
        let len = self.seq.len();
        let spw = self.seq.width().symbols_per_word();
        let rem_i = len - i;
        let rem_j = len - j;

        // bounded direct comparison: walk packed words covering the first
        // min(Q, remaining) symbols of each suffix
        let q_words = DC_Q.div_ceil(spw);
        let n_words = rem_i.min(rem_j).div_ceil(spw).min(q_words);
        for w in 0..n_words {
            let wi = self.seq.pack_word(i + w * spw, spw);
            let wj = self.seq.pack_word(j + w * spw, spw);
            if wi != wj {
                return wi < wj;
            }
        }

        // a suffix that ran out of symbols sorts before any extension of it
        if rem_i < DC_Q || rem_j < DC_Q {
            return rem_i < rem_j;
        }

        // both suffixes have >= Q symbols and tie through Q: the covering
        // property places i+l and j+l in the sample
        let l = self.table.lut(i % DC_Q, j % DC_Q);
        let rank_i = self.ranks.get(self.table.sample_slot(i + l));
        let rank_j = self.ranks.get(self.table.sample_slot(j + l));
        rank_i < rank_j
    }

    /// The ordering of the suffixes at `i` and `j`, in the shape Rust sorts
    /// consume. `Equal` only for `i == j`.
    #[must_use]
    pub fn cmp(&self, i: usize, j: usize) -> Ordering {
        if i == j {
            Ordering::Equal
        } else if self.less(i, j) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}
