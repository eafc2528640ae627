//! Packed symbol sequences.
//!
//! Strings are stored as fixed-width symbols packed into `u64` chunks, the
//! same layout used for 2-bit encoded reads: symbol `i` occupies bits
//! `(i % spw) * width .. (i % spw + 1) * width` of chunk `i / spw`, where
//! `spw` is the number of symbols per chunk.
//!
//! The index builders and the suffix comparator read strings exclusively
//! through [`PackedSequence`], so any random-access packed representation
//! (owned, borrowed, or memory-resident elsewhere) can be indexed without
//! copying.

use auto_impl::auto_impl;
use bytemuck::cast_slice;

use crate::alphabet::Alphabet;
use crate::error::{ConfigError, Result};
use crate::utils::try_vec;

/// The number of bits used to encode a single symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolWidth {
    /// 2 bits per symbol (4-letter alphabets)
    Two,
    /// 4 bits per symbol (up to 16-letter alphabets)
    Four,
    /// 8 bits per symbol (byte alphabets)
    Eight,
}
impl SymbolWidth {
    /// Number of bits per symbol
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Number of symbols that fit a single `u64` word
    #[must_use]
    pub fn symbols_per_word(self) -> usize {
        (64 / self.bits()) as usize
    }

    /// Bitmask covering a single symbol
    #[must_use]
    pub fn mask(self) -> u64 {
        (1 << self.bits()) - 1
    }
}

/// A fixed-symbol-width, random-access sequence.
///
/// Implementations expose their length, symbol width, and per-symbol reads;
/// [`pack_word`](PackedSequence::pack_word) derives the word-packed view the
/// suffix comparator works on. Reads past the end of the sequence yield the
/// zero symbol, the single tail convention shared by every consumer of the
/// packing (q-gram keys and comparison words alike).
#[auto_impl(&, Box, Arc)]
pub trait PackedSequence {
    /// Number of symbols in the sequence
    fn len(&self) -> usize;

    /// Returns true if the sequence holds no symbols
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The packing width of this sequence's symbols
    fn width(&self) -> SymbolWidth;

    /// The value of the symbol at offset `i`.
    ///
    /// # Panics
    /// May panic if `i >= len`.
    fn symbol(&self, i: usize) -> u8;

    /// Packs `count` symbols starting at `start` into a single word.
    ///
    /// Symbols are left-aligned (the first symbol lands in the most
    /// significant bits) so that unsigned comparison of packed words equals
    /// lexicographic comparison of the underlying symbols. Offsets at or
    /// past the end of the sequence read as the zero symbol.
    fn pack_word(&self, start: usize, count: usize) -> u64 {
        let bits = self.width().bits() as usize;
        debug_assert!(count <= self.width().symbols_per_word());
        let mut word = 0u64;
        for k in 0..count {
            let symbol = if start + k < self.len() {
                self.symbol(start + k)
            } else {
                0
            };
            word |= u64::from(symbol) << (64 - bits * (k + 1));
        }
        word
    }
}

/// An owned packed sequence backed by `u64` chunks
#[derive(Debug, Clone)]
pub struct PackedBuffer {
    words: Vec<u64>,
    len: usize,
    width: SymbolWidth,
}
impl PackedBuffer {
    /// Packs a slice of raw symbol values at the given width.
    ///
    /// Fails if any value does not fit the width.
    pub fn from_symbols(width: SymbolWidth, symbols: &[u8]) -> Result<Self> {
        let spw = width.symbols_per_word();
        let bits = width.bits() as usize;
        let mut words = try_vec::<u64>(symbols.len().div_ceil(spw))?;
        for (i, &symbol) in symbols.iter().enumerate() {
            if u64::from(symbol) > width.mask() {
                return Err(ConfigError::SymbolOutOfRange(symbol, width.bits()).into());
            }
            words[i / spw] |= u64::from(symbol) << ((i % spw) * bits);
        }
        Ok(Self {
            words,
            len: symbols.len(),
            width,
        })
    }

    /// Packs an ASCII nucleotide sequence (A/C/G/T only) at 2 bits per symbol
    pub fn from_nucleotides(sequence: &[u8]) -> Result<Self> {
        let mut words = Vec::new();
        bitnuc::twobit::encode(sequence, &mut words)?;
        Ok(Self {
            words,
            len: sequence.len(),
            width: SymbolWidth::Two,
        })
    }

    /// Packs an ASCII string through the given alphabet's conversion table
    pub fn from_text(alphabet: Alphabet, text: &[u8]) -> Result<Self> {
        let mut symbols = Vec::new();
        alphabet.encode_into(text, &mut symbols)?;
        Self::from_symbols(alphabet.width(), &symbols)
    }

    /// The underlying `u64` chunks
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// A raw byte view of the underlying chunks
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.words)
    }
}

impl PackedSequence for PackedBuffer {
    fn len(&self) -> usize {
        self.len
    }
    fn width(&self) -> SymbolWidth {
        self.width
    }
    fn symbol(&self, i: usize) -> u8 {
        let spw = self.width.symbols_per_word();
        let bits = self.width.bits() as usize;
        ((self.words[i / spw] >> ((i % spw) * bits)) & self.width.mask()) as u8
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_symbol_roundtrip() -> Result<()> {
        for width in [SymbolWidth::Two, SymbolWidth::Four, SymbolWidth::Eight] {
            let symbols: Vec<u8> = (0..100u8).map(|i| i % (1 << width.bits())).collect();
            let buffer = PackedBuffer::from_symbols(width, &symbols)?;
            assert_eq!(buffer.len(), symbols.len());
            for (i, &symbol) in symbols.iter().enumerate() {
                assert_eq!(buffer.symbol(i), symbol);
            }
        }
        Ok(())
    }

    #[test]
    fn test_symbol_out_of_range() {
        let err = PackedBuffer::from_symbols(SymbolWidth::Two, &[0, 1, 4]);
        assert!(err.is_err());
    }

    #[test]
    fn test_nucleotides_match_symbol_packing() -> Result<()> {
        let sequence = b"ACGTACGTTTGACGGCATCAGGACT";
        let buffer = PackedBuffer::from_nucleotides(sequence)?;
        assert_eq!(buffer.len(), sequence.len());
        for (i, &c) in sequence.iter().enumerate() {
            let expected = Alphabet::Dna.encode(c).unwrap();
            assert_eq!(buffer.symbol(i), expected);
        }
        Ok(())
    }

    #[test]
    fn test_pack_word_is_lexicographic() -> Result<()> {
        // "CGT" > "CGA" must hold on the packed words
        let a = PackedBuffer::from_nucleotides(b"CGT")?;
        let b = PackedBuffer::from_nucleotides(b"CGA")?;
        let spw = SymbolWidth::Two.symbols_per_word();
        assert!(a.pack_word(0, spw) > b.pack_word(0, spw));
        Ok(())
    }

    #[test]
    fn test_pack_word_zero_pads_tail() -> Result<()> {
        // words packed past the end must equal words packed over explicit
        // zero symbols
        let short = PackedBuffer::from_symbols(SymbolWidth::Four, &[5, 9, 2])?;
        let padded = PackedBuffer::from_symbols(SymbolWidth::Four, &[5, 9, 2, 0, 0, 0, 0, 0])?;
        let spw = SymbolWidth::Four.symbols_per_word();
        assert_eq!(short.pack_word(0, spw), padded.pack_word(0, spw));
        assert_eq!(short.pack_word(2, spw), padded.pack_word(2, spw));
        Ok(())
    }

    #[test]
    fn test_from_text() -> Result<()> {
        let buffer = PackedBuffer::from_text(Alphabet::Protein, b"MKVLAA")?;
        assert_eq!(buffer.width(), SymbolWidth::Eight);
        assert_eq!(buffer.symbol(0), Alphabet::Protein.encode(b'M').unwrap());
        assert_eq!(buffer.symbol(5), Alphabet::Protein.encode(b'A').unwrap());
        Ok(())
    }

    #[test]
    fn test_as_bytes_width() -> Result<()> {
        let buffer = PackedBuffer::from_nucleotides(b"ACGTACGT")?;
        assert_eq!(buffer.as_bytes().len(), buffer.words().len() * 8);
        Ok(())
    }
}
