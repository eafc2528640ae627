//! Q-gram occurrence indexing.
//!
//! A q-gram index groups every starting offset of a string by the `q`
//! symbols found there, packed into a single key word. Occurrences are
//! stored in compressed sparse-row form: `qgrams` holds the unique keys in
//! ascending order, `slots` the exclusive prefix sums of their occurrence
//! counts, and `positions` the original string offsets grouped by key.
//!
//! Construction is a fixed pipeline of executor primitives — map the keys,
//! sort them with their offsets, run-length-encode the unique keys, and scan
//! the counts — so genome-scale strings never pass through a sequential
//! per-symbol loop.

use crate::error::{BuildError, ConfigError, Result};
use crate::executor::Executor;
use crate::sequence::{PackedSequence, SymbolWidth};
use crate::utils::try_vec;

/// The q-gram key at string offset `i`.
///
/// The `q` symbols starting at `i` are packed big-endian into the low bits
/// of the key; offsets at or past the end of the string contribute the zero
/// symbol. This is the one key convention — the builder, [`lookup`], and any
/// downstream consumer must all compute keys through it.
///
/// [`lookup`]: QGramIndex::lookup
#[must_use]
pub fn key_at<S: PackedSequence + ?Sized>(seq: &S, q: u32, i: usize) -> u64 {
    let bits = seq.width().bits();
    let mut key = 0u64;
    for k in 0..q as usize {
        let symbol = if i + k < seq.len() { seq.symbol(i + k) } else { 0 };
        key = (key << bits) | u64::from(symbol);
    }
    key
}

/// A sorted, deduplicated, CSR-encoded index of q-gram occurrences.
///
/// Built once per string and immutable afterward; there is no incremental
/// update. Invariants: `qgrams` is strictly ascending, `slots` is monotone
/// with `slots.len() == qgrams.len() + 1`, and `slots[last]` equals the
/// string length.
#[derive(Debug, Clone)]
pub struct QGramIndex {
    q: u32,
    width: SymbolWidth,
    qgrams: Vec<u64>,
    slots: Vec<u32>,
    positions: Vec<u32>,
}
impl QGramIndex {
    /// Builds the index over every starting offset of `seq`.
    ///
    /// Fails if `q` symbols do not fit the 64-bit key word, if the string
    /// exceeds the 32-bit position limit, or if the encoded occurrence
    /// counts do not add up to the string length (an internal consistency
    /// failure, never user-recoverable).
    pub fn build<S, E>(q: u32, seq: &S, exec: &E) -> Result<Self>
    where
        S: PackedSequence + Sync + ?Sized,
        E: Executor,
    {
        let width = seq.width();
        if q == 0 || u64::from(q) * u64::from(width.bits()) > 64 {
            return Err(ConfigError::KeyWidthExceeded {
                q,
                bits: width.bits(),
            }
            .into());
        }
        let len = seq.len();
        if len > u32::MAX as usize {
            return Err(BuildError::StringTooLong(len).into());
        }

        // one (key, offset) pair per starting offset
        let mut pairs = try_vec::<(u64, u32)>(len)?;
        exec.fill(&mut pairs, |i| (key_at(seq, q, i), i as u32));
        exec.sort_pairs(&mut pairs);

        let mut keys = try_vec::<u64>(len)?;
        exec.fill(&mut keys, |i| pairs[i].0);
        let mut positions = try_vec::<u32>(len)?;
        exec.fill(&mut positions, |i| pairs[i].1);
        drop(pairs);

        let (qgrams, counts) = exec.run_length_encode(&keys);
        drop(keys);
        let slots = exec.exclusive_scan(&counts);

        let total = slots[qgrams.len()] as usize;
        if total != len {
            return Err(BuildError::QGramCountMismatch {
                expected: len,
                got: total,
            }
            .into());
        }

        Ok(Self {
            q,
            width,
            qgrams,
            slots,
            positions,
        })
    }

    /// The gram length in symbols
    #[must_use]
    pub fn q(&self) -> u32 {
        self.q
    }

    /// The symbol width the index was built over
    #[must_use]
    pub fn width(&self) -> SymbolWidth {
        self.width
    }

    /// Number of indexed offsets (the string length)
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the index covers an empty string
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The unique gram keys, strictly ascending
    #[must_use]
    pub fn qgrams(&self) -> &[u64] {
        &self.qgrams
    }

    /// CSR offsets into [`positions`](QGramIndex::positions)
    #[must_use]
    pub fn slots(&self) -> &[u32] {
        &self.slots
    }

    /// String offsets grouped by gram key
    #[must_use]
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// The occurrence offsets of a gram key, or the empty slice if the key
    /// never occurs
    #[must_use]
    pub fn lookup(&self, key: u64) -> &[u32] {
        match self.qgrams.binary_search(&key) {
            Ok(k) => {
                let lo = self.slots[k] as usize;
                let hi = self.slots[k + 1] as usize;
                &self.positions[lo..hi]
            }
            Err(_) => &[],
        }
    }
}
