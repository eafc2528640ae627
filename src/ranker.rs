//! Rank assignment for sorted sample suffixes.
//!
//! The outer sort machinery recursively orders just the DC-sampled suffixes
//! and streams the result back here, either as batches already in final
//! order or as scattered (offset, rank) pairs from an out-of-order merge.
//! The ranker inverts that ordering into the dense rank store the
//! comparator's fallback step reads.

use crate::dcs::{DcsRanks, DifferenceCoverTable};
use crate::error::Result;
use crate::executor::Executor;
use crate::utils::try_vec;

/// Writes suffix ranks into a [`DcsRanks`] store.
///
/// Every batch scatter is race-free under unbounded parallelism because the
/// sample-local index is injective over a correctly partitioned input; that
/// is a caller invariant, not checked at runtime.
pub struct SuffixRanker<'a, E> {
    table: &'a DifferenceCoverTable,
    store: &'a mut DcsRanks,
    exec: &'a E,
    n_output: u32,
}
impl<'a, E: Executor> SuffixRanker<'a, E> {
    /// Creates a ranker that writes into `store`
    pub fn new(table: &'a DifferenceCoverTable, store: &'a mut DcsRanks, exec: &'a E) -> Self {
        Self {
            table,
            store,
            exec,
            n_output: 0,
        }
    }

    /// Ranks the next batch of sampled suffix offsets.
    ///
    /// The batch must be in final sorted order restricted to the sampled
    /// suffixes; the offset at batch position `k` receives rank
    /// `n_output + k`. Successive calls must together cover every sampled
    /// suffix exactly once, in contiguous rank order.
    pub fn process_batch(&mut self, offsets: &[u32]) -> Result<()> {
        let mut slots = try_vec::<usize>(offsets.len())?;
        let table = self.table;
        self.exec
            .fill(&mut slots, |k| table.sample_slot(offsets[k] as usize));

        let first = self.n_output;
        self.exec
            .scatter_with(&slots, |k| first + k as u32, self.store.as_mut_slice());
        self.n_output += offsets.len() as u32;
        Ok(())
    }

    /// Ranks a sparse batch with explicit per-offset ranks.
    ///
    /// Each `(offsets[k], ranks[k])` pair scatters independently; the
    /// running output counter is not advanced.
    pub fn process_scattered(&mut self, offsets: &[u32], ranks: &[u32]) -> Result<()> {
        debug_assert_eq!(offsets.len(), ranks.len());
        let mut slots = try_vec::<usize>(offsets.len())?;
        let table = self.table;
        self.exec
            .fill(&mut slots, |k| table.sample_slot(offsets[k] as usize));

        self.exec
            .scatter_with(&slots, |k| ranks[k], self.store.as_mut_slice());
        Ok(())
    }

    /// Number of suffixes ranked through [`process_batch`](Self::process_batch) so far
    #[must_use]
    pub fn n_ranked(&self) -> usize {
        self.n_output as usize
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::executor::{ParallelExecutor, SerialExecutor};
    use crate::sequence::{PackedBuffer, PackedSequence, SymbolWidth};
    use anyhow::Result;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn random_sequence(len: usize, seed: u64) -> PackedBuffer {
        let mut rng = SmallRng::seed_from_u64(seed);
        let symbols: Vec<u8> = (0..len).map(|_| rng.random_range(0..4)).collect();
        PackedBuffer::from_symbols(SymbolWidth::Two, &symbols).unwrap()
    }

    fn suffix_symbols(seq: &PackedBuffer, i: usize) -> Vec<u8> {
        (i..seq.len()).map(|k| seq.symbol(k)).collect()
    }

    /// The sampled suffixes in final sorted order, by naive comparison.
    fn sorted_sample(seq: &PackedBuffer, table: &DifferenceCoverTable) -> Vec<u32> {
        let mut sample = table.sample_offsets(seq.len());
        sample.sort_by(|&a, &b| {
            suffix_symbols(seq, a as usize).cmp(&suffix_symbols(seq, b as usize))
        });
        sample
    }

    #[test]
    fn test_ranks_increase_in_sorted_order() -> Result<()> {
        let seq = random_sequence(500, 101);
        let table = DifferenceCoverTable::new()?;
        let sample = sorted_sample(&seq, &table);

        let mut store = DcsRanks::with_len(seq.len())?;
        let mut ranker = SuffixRanker::new(&table, &mut store, &SerialExecutor);
        ranker.process_batch(&sample)?;
        assert_eq!(ranker.n_ranked(), sample.len());

        let read_back: Vec<u32> = sample
            .iter()
            .map(|&s| store.get(table.sample_index(s as usize).unwrap()))
            .collect();
        assert!(read_back.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(read_back, (0..sample.len() as u32).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_split_batches_match_single_batch() -> Result<()> {
        let seq = random_sequence(400, 7);
        let table = DifferenceCoverTable::new()?;
        let sample = sorted_sample(&seq, &table);

        let mut whole = DcsRanks::with_len(seq.len())?;
        SuffixRanker::new(&table, &mut whole, &SerialExecutor).process_batch(&sample)?;

        let mut split = DcsRanks::with_len(seq.len())?;
        let mut ranker = SuffixRanker::new(&table, &mut split, &ParallelExecutor::with_threads(4));
        for chunk in sample.chunks(17) {
            ranker.process_batch(chunk)?;
        }
        assert_eq!(ranker.n_ranked(), sample.len());

        assert_eq!(whole.as_slice(), split.as_slice());
        Ok(())
    }

    #[test]
    fn test_scattered_matches_batched() -> Result<()> {
        let seq = random_sequence(400, 13);
        let table = DifferenceCoverTable::new()?;
        let sample = sorted_sample(&seq, &table);

        let mut batched = DcsRanks::with_len(seq.len())?;
        SuffixRanker::new(&table, &mut batched, &SerialExecutor).process_batch(&sample)?;

        // shuffle the (offset, rank) pairs and feed them out of order
        let mut rng = SmallRng::seed_from_u64(99);
        let mut pairs: Vec<(u32, u32)> = sample
            .iter()
            .enumerate()
            .map(|(rank, &offset)| (offset, rank as u32))
            .collect();
        for i in (1..pairs.len()).rev() {
            let j = rng.random_range(0..=i);
            pairs.swap(i, j);
        }

        let mut scattered = DcsRanks::with_len(seq.len())?;
        let mut ranker = SuffixRanker::new(&table, &mut scattered, &SerialExecutor);
        for chunk in pairs.chunks(23) {
            let offsets: Vec<u32> = chunk.iter().map(|&(o, _)| o).collect();
            let ranks: Vec<u32> = chunk.iter().map(|&(_, r)| r).collect();
            ranker.process_scattered(&offsets, &ranks)?;
        }

        assert_eq!(batched.as_slice(), scattered.as_slice());
        Ok(())
    }
}
