//! Pluggable parallel primitives.
//!
//! The index builders are expressed as a short pipeline of accelerator-style
//! primitives (map, sort-by-key, run-length-encode, exclusive-scan, scatter),
//! each of which runs to completion before the next begins. The [`Executor`]
//! trait abstracts how each primitive runs so the same pipeline can execute
//! sequentially or across a thread pool without changing any contract.

use rayon::prelude::*;

/// Uniform interface over the data-parallel primitives used by the builders.
///
/// Both provided implementations are observationally equivalent; the choice
/// only affects wall-clock time and thread usage.
pub trait Executor {
    /// Fills `out` by applying `f` to every index in `0..out.len()`
    fn fill<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync;

    /// Sorts `(key, payload)` pairs by key.
    ///
    /// The relative order of payloads under equal keys is unspecified.
    fn sort_pairs(&self, pairs: &mut [(u64, u32)]);

    /// Collapses runs of equal adjacent keys into unique keys and run
    /// lengths. `keys` must already be sorted.
    fn run_length_encode(&self, keys: &[u64]) -> (Vec<u64>, Vec<u32>);

    /// Exclusive prefix sum; the output has one extra trailing slot holding
    /// the total.
    fn exclusive_scan(&self, counts: &[u32]) -> Vec<u32>;

    /// Scatters `values(k)` to `out[indices[k]]` for every `k`.
    ///
    /// Race-free under unbounded parallelism only when the indices are
    /// distinct. That is a caller contract; it is not checked here.
    fn scatter_with<F>(&self, indices: &[usize], values: F, out: &mut [u32])
    where
        F: Fn(usize) -> u32 + Sync;
}

/// Runs every primitive as a plain sequential loop
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialExecutor;

impl Executor for SerialExecutor {
    fn fill<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = f(i);
        }
    }

    fn sort_pairs(&self, pairs: &mut [(u64, u32)]) {
        pairs.sort_unstable_by_key(|&(key, _)| key);
    }

    fn run_length_encode(&self, keys: &[u64]) -> (Vec<u64>, Vec<u32>) {
        let mut uniques = Vec::new();
        let mut counts: Vec<u32> = Vec::new();
        for &key in keys {
            match uniques.last() {
                Some(&last) if last == key => {
                    let slot = counts.len() - 1;
                    counts[slot] += 1;
                }
                _ => {
                    uniques.push(key);
                    counts.push(1);
                }
            }
        }
        (uniques, counts)
    }

    fn exclusive_scan(&self, counts: &[u32]) -> Vec<u32> {
        let mut out = Vec::with_capacity(counts.len() + 1);
        let mut total = 0u32;
        for &count in counts {
            out.push(total);
            total += count;
        }
        out.push(total);
        out
    }

    fn scatter_with<F>(&self, indices: &[usize], values: F, out: &mut [u32])
    where
        F: Fn(usize) -> u32 + Sync,
    {
        for (k, &index) in indices.iter().enumerate() {
            out[index] = values(k);
        }
    }
}

/// Runs the primitives across a thread pool
#[derive(Debug, Clone, Copy)]
pub struct ParallelExecutor {
    threads: usize,
}
impl ParallelExecutor {
    /// Creates an executor sized to the available cores
    #[must_use]
    pub fn new() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }

    /// Creates an executor with an explicit thread count.
    ///
    /// A count of zero selects all available cores; larger counts are capped
    /// at the core count.
    #[must_use]
    pub fn with_threads(threads: usize) -> Self {
        let threads = if threads == 0 {
            num_cpus::get()
        } else {
            threads.min(num_cpus::get())
        };
        Self { threads }
    }

    fn chunk_len(&self, n: usize) -> usize {
        n.div_ceil(self.threads.max(1)).max(1)
    }
}
impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Shares a mutable base pointer across scatter workers.
///
/// Sound only because the scatter contract guarantees distinct target
/// indices, so no two workers ever write the same element.
struct SyncPtr(*mut u32);
unsafe impl Send for SyncPtr {}
unsafe impl Sync for SyncPtr {}

impl Executor for ParallelExecutor {
    fn fill<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        out.par_iter_mut().enumerate().for_each(|(i, slot)| {
            *slot = f(i);
        });
    }

    fn sort_pairs(&self, pairs: &mut [(u64, u32)]) {
        pairs.par_sort_unstable_by_key(|&(key, _)| key);
    }

    fn run_length_encode(&self, keys: &[u64]) -> (Vec<u64>, Vec<u32>) {
        if keys.is_empty() {
            return (Vec::new(), Vec::new());
        }
        // offsets where a new run begins; collect preserves index order
        let starts: Vec<usize> = (0..keys.len())
            .into_par_iter()
            .filter(|&i| i == 0 || keys[i] != keys[i - 1])
            .collect();
        let uniques: Vec<u64> = starts.par_iter().map(|&s| keys[s]).collect();
        let counts: Vec<u32> = (0..starts.len())
            .into_par_iter()
            .map(|u| {
                let end = starts.get(u + 1).copied().unwrap_or(keys.len());
                (end - starts[u]) as u32
            })
            .collect();
        (uniques, counts)
    }

    fn exclusive_scan(&self, counts: &[u32]) -> Vec<u32> {
        let n = counts.len();
        if n == 0 {
            return vec![0];
        }
        let chunk = self.chunk_len(n);

        // per-chunk totals, then a small sequential scan over them
        let sums: Vec<u32> = counts
            .par_chunks(chunk)
            .map(|c| c.iter().sum::<u32>())
            .collect();
        let mut offsets = Vec::with_capacity(sums.len());
        let mut total = 0u32;
        for &sum in &sums {
            offsets.push(total);
            total += sum;
        }

        let mut out = vec![0u32; n + 1];
        let (body, tail) = out.split_at_mut(n);
        body.par_chunks_mut(chunk)
            .zip(counts.par_chunks(chunk))
            .enumerate()
            .for_each(|(ci, (out_chunk, count_chunk))| {
                let mut acc = offsets[ci];
                for (slot, &count) in out_chunk.iter_mut().zip(count_chunk) {
                    *slot = acc;
                    acc += count;
                }
            });
        tail[0] = total;
        out
    }

    fn scatter_with<F>(&self, indices: &[usize], values: F, out: &mut [u32])
    where
        F: Fn(usize) -> u32 + Sync,
    {
        let out_len = out.len();
        let base = SyncPtr(out.as_mut_ptr());
        indices.par_iter().enumerate().for_each(|(k, &index)| {
            // Capture the whole `SyncPtr` (which is `Sync`), not the bare
            // `*mut u32` field that edition-2021 disjoint capture would take.
            let base = &base;
            debug_assert!(index < out_len);
            // SAFETY: target indices are distinct and in range (scatter
            // contract), so each write touches a unique element of `out`.
            unsafe { *base.0.add(index) = values(k) };
        });
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn random_keys(n: usize, distinct: u64, seed: u64) -> Vec<u64> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut keys: Vec<u64> = (0..n).map(|_| rng.random_range(0..distinct)).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_fill_equivalence() {
        let serial = SerialExecutor;
        let parallel = ParallelExecutor::with_threads(4);

        let mut a = vec![0u64; 1000];
        let mut b = vec![0u64; 1000];
        serial.fill(&mut a, |i| (i as u64).wrapping_mul(0x9e37_79b9));
        parallel.fill(&mut b, |i| (i as u64).wrapping_mul(0x9e37_79b9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sort_pairs_orders_keys() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut pairs: Vec<(u64, u32)> = (0..2000u32)
            .map(|v| (rng.random_range(0..100u64), v))
            .collect();
        let mut expected = pairs.clone();

        ParallelExecutor::new().sort_pairs(&mut pairs);
        SerialExecutor.sort_pairs(&mut expected);

        let keys: Vec<u64> = pairs.iter().map(|&(k, _)| k).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));

        // payload order under equal keys is unspecified, but the multiset of
        // pairs must match
        let mut lhs = pairs.clone();
        let mut rhs = expected.clone();
        lhs.sort_unstable();
        rhs.sort_unstable();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_run_length_encode_equivalence() {
        let keys = random_keys(5000, 257, 7);
        let (u1, c1) = SerialExecutor.run_length_encode(&keys);
        let (u2, c2) = ParallelExecutor::with_threads(3).run_length_encode(&keys);
        assert_eq!(u1, u2);
        assert_eq!(c1, c2);
        assert!(u1.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(c1.iter().map(|&c| c as usize).sum::<usize>(), keys.len());
    }

    #[test]
    fn test_run_length_encode_empty() {
        let (uniques, counts) = ParallelExecutor::new().run_length_encode(&[]);
        assert!(uniques.is_empty());
        assert!(counts.is_empty());
    }

    #[test]
    fn test_exclusive_scan_equivalence() {
        let mut rng = SmallRng::seed_from_u64(11);
        let counts: Vec<u32> = (0..4001).map(|_| rng.random_range(0..10)).collect();
        let serial = SerialExecutor.exclusive_scan(&counts);
        let parallel = ParallelExecutor::with_threads(5).exclusive_scan(&counts);
        assert_eq!(serial, parallel);
        assert_eq!(serial.len(), counts.len() + 1);
        assert_eq!(serial[0], 0);
        assert_eq!(
            serial[counts.len()],
            counts.iter().copied().sum::<u32>()
        );
    }

    #[test]
    fn test_exclusive_scan_empty() {
        assert_eq!(ParallelExecutor::new().exclusive_scan(&[]), vec![0]);
        assert_eq!(SerialExecutor.exclusive_scan(&[]), vec![0]);
    }

    #[test]
    fn test_scatter_permutation() {
        let mut rng = SmallRng::seed_from_u64(3);
        let n = 1000;
        let mut indices: Vec<usize> = (0..n).collect();
        // Fisher-Yates shuffle
        for i in (1..n).rev() {
            let j = rng.random_range(0..=i);
            indices.swap(i, j);
        }

        let mut serial = vec![0u32; n];
        let mut parallel = vec![0u32; n];
        SerialExecutor.scatter_with(&indices, |k| k as u32, &mut serial);
        ParallelExecutor::with_threads(4).scatter_with(&indices, |k| k as u32, &mut parallel);
        assert_eq!(serial, parallel);

        // inverse property: value k landed at indices[k]
        for (k, &index) in indices.iter().enumerate() {
            assert_eq!(serial[index], k as u32);
        }
    }
}
