//! Difference Cover Sample tables.
//!
//! A difference cover is a set of residues modulo a period `Q` such that for
//! any pair of residues `(i, j)` there is an offset `l < Q` with both
//! `(i + l) % Q` and `(j + l) % Q` in the set. Sampling a string's suffixes
//! at covered offsets gives a sparse subset whose ranks, once known, break
//! any suffix comparison that ties through the first `Q` symbols — see
//! [`SuffixComparator`](crate::SuffixComparator).

use crate::error::{ConfigError, Result};
use crate::utils::try_vec;

/// The difference cover period
pub const DC_Q: usize = 64;
/// The number of residues in the cover
pub const DC_N: usize = 9;

/// The covering residues modulo [`DC_Q`].
///
/// Chosen offline for minimal lookup-table diameter; fixed, never derived at
/// runtime.
pub const DC_RESIDUES: [u32; DC_N] = [1, 2, 3, 6, 15, 17, 35, 43, 60];

/// Membership, inverse-position, and pairwise-offset tables for the fixed
/// difference cover.
///
/// The table is a pure function of `(Q, N)`: it is independent of any input
/// string, built once, and shared across every string indexed with this
/// period. It is an explicit immutable value owned by whichever sorting
/// session needs it.
#[derive(Debug, Clone)]
pub struct DifferenceCoverTable {
    /// Membership of each residue in the cover
    bitmask: [bool; DC_Q],
    /// Residue -> index in [`DC_RESIDUES`]; meaningful only for members
    pos: [u32; DC_Q],
    /// For each residue pair `(i, j)`, the smallest offset `l` such that
    /// both shifted residues are covered
    lut: Box<[u32]>,
}
impl DifferenceCoverTable {
    /// Builds the lookup tables for the fixed cover.
    ///
    /// Fails with [`ConfigError::NoCoveringOffset`] if some residue pair has
    /// no covering offset, which a valid covering set never produces.
    pub fn new() -> Result<Self> {
        let mut bitmask = [false; DC_Q];
        let mut pos = [0u32; DC_Q];
        for (k, &residue) in DC_RESIDUES.iter().enumerate() {
            bitmask[residue as usize] = true;
            pos[residue as usize] = k as u32;
        }

        // (i, j) -> smallest l with (i + l) and (j + l) both covered
        let mut lut = vec![0u32; DC_Q * DC_Q].into_boxed_slice();
        for i in 0..DC_Q {
            for j in 0..DC_Q {
                let offset = (0..DC_Q)
                    .find(|&l| bitmask[(i + l) % DC_Q] && bitmask[(j + l) % DC_Q]);
                match offset {
                    Some(l) => lut[i * DC_Q + j] = l as u32,
                    None => {
                        return Err(
                            ConfigError::NoCoveringOffset(i as u32, j as u32).into()
                        )
                    }
                }
            }
        }

        Ok(Self { bitmask, pos, lut })
    }

    /// Returns true if the residue of `i` modulo the period is covered
    #[must_use]
    pub fn contains(&self, i: usize) -> bool {
        self.bitmask[i % DC_Q]
    }

    /// The smallest offset `l` such that `(i_mod + l) % Q` and
    /// `(j_mod + l) % Q` are both covered
    #[must_use]
    pub fn lut(&self, i_mod: usize, j_mod: usize) -> usize {
        debug_assert!(i_mod < DC_Q && j_mod < DC_Q);
        self.lut[i_mod * DC_Q + j_mod] as usize
    }

    /// The sample-local index of a global suffix offset, or `None` if the
    /// offset is not part of the sample
    #[must_use]
    pub fn sample_index(&self, i: usize) -> Option<usize> {
        let (block, intra) = (i / DC_Q, i % DC_Q);
        if self.bitmask[intra] {
            Some(block * DC_N + self.pos[intra] as usize)
        } else {
            None
        }
    }

    /// Unchecked sample-local index; meaningful only for covered offsets
    pub(crate) fn sample_slot(&self, i: usize) -> usize {
        (i / DC_Q) * DC_N + self.pos[i % DC_Q] as usize
    }

    /// Number of rank slots needed for a string of the given length
    #[must_use]
    pub fn sample_len(len: usize) -> usize {
        len.div_ceil(DC_Q) * DC_N
    }

    /// The sampled suffix offsets of a string of the given length, ascending.
    ///
    /// Convenience for sort drivers and tests; the hot paths never
    /// materialize this set.
    #[must_use]
    pub fn sample_offsets(&self, len: usize) -> Vec<u32> {
        (0..len as u32)
            .filter(|&i| self.bitmask[i as usize % DC_Q])
            .collect()
    }
}

/// Dense per-string rank store for the sampled suffixes.
///
/// One slot per valid sample-local index across the string. Entries are
/// meaningless until a [`SuffixRanker`](crate::SuffixRanker) populates them
/// and read-only afterward; reading a slot before population is a caller
/// contract violation and is not checked.
#[derive(Debug, Clone)]
pub struct DcsRanks {
    ranks: Vec<u32>,
}
impl DcsRanks {
    /// Allocates a zeroed rank store for a string of the given length
    pub fn with_len(len: usize) -> Result<Self> {
        let ranks = try_vec(DifferenceCoverTable::sample_len(len))?;
        Ok(Self { ranks })
    }

    /// Number of rank slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns true if the store holds no slots
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// The rank stored at a sample-local index
    #[must_use]
    pub fn get(&self, slot: usize) -> u32 {
        self.ranks[slot]
    }

    /// The full rank slice, in sample-local index order
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.ranks
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.ranks
    }
}
