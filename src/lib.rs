//! # sufq
//!
//! Auxiliary index structures for exact and approximate substring search
//! over very large symbol sequences (reference genomes and similar,
//! hundreds of millions to billions of symbols).
//!
//! Two structures form the core:
//!
//! 1. A **q-gram index** ([`QGramIndex`]): every starting offset of a
//!    string, grouped in CSR form by the `q` symbols found there.
//! 2. A **Difference Cover Sample**: a sparse, deterministically-covering
//!    subset of suffix offsets ([`DifferenceCoverTable`]) whose ranks
//!    ([`DcsRanks`], filled by [`SuffixRanker`]) let [`SuffixComparator`]
//!    decide full lexicographic suffix order with O(1) amortized
//!    tie-breaking — without ever materializing whole suffixes.
//!
//! The outer suffix-sort driver is not part of this crate: it recursively
//! sorts just the sampled suffixes, feeds that order into the ranker, and
//! then uses the comparator as the ordering relation for the full sort.
//!
//! Strings are read through the [`PackedSequence`] trait (2, 4, or 8 bits
//! per symbol); heavy construction work runs through an [`Executor`]
//! ([`SerialExecutor`] or the thread-pool [`ParallelExecutor`]).
//!
//! ## Usage
//!
//! ```rust
//! use sufq::{
//!     DcsRanks, DifferenceCoverTable, PackedBuffer, PackedSequence, QGramIndex,
//!     SerialExecutor, SuffixComparator,
//! };
//!
//! fn main() -> sufq::Result<()> {
//!     let exec = SerialExecutor;
//!     let seq = PackedBuffer::from_nucleotides(b"ACGTACGTACGGTTAC")?;
//!
//!     // q-gram occurrence index
//!     let index = QGramIndex::build(4, &seq, &exec)?;
//!     let key = sufq::key_at(&seq, 4, 0);
//!     assert!(index.lookup(key).contains(&0));
//!
//!     // difference-cover suffix comparison; strings of 64 symbols or more
//!     // additionally need the sampled suffixes ranked first
//!     let table = DifferenceCoverTable::new()?;
//!     let ranks = DcsRanks::with_len(seq.len())?;
//!     let comparator = SuffixComparator::new(&seq, &table, &ranks);
//!
//!     let mut order: Vec<usize> = (0..seq.len()).collect();
//!     order.sort_unstable_by(|&a, &b| comparator.cmp(a, b));
//!     assert!(order.windows(2).all(|w| comparator.less(w[0], w[1])));
//!     Ok(())
//! }
//! ```

mod alphabet;
mod compare;
mod dcs;
mod error;
mod executor;
mod qgram;
mod ranker;
mod sequence;
mod utils;

pub use alphabet::Alphabet;
pub use compare::SuffixComparator;
pub use dcs::{DcsRanks, DifferenceCoverTable, DC_N, DC_Q, DC_RESIDUES};
pub use error::{BuildError, ConfigError, Error, Result};
pub use executor::{Executor, ParallelExecutor, SerialExecutor};
pub use qgram::{key_at, QGramIndex};
pub use ranker::SuffixRanker;
pub use sequence::{PackedBuffer, PackedSequence, SymbolWidth};
