//! Symbol/character conversion for the supported sequence alphabets.
//!
//! The alphabet is chosen at configuration time, so conversion is a closed
//! set of enum variants rather than a trait object.

use crate::error::{ConfigError, Result};
use crate::sequence::SymbolWidth;

const DNA_CHARS: &[u8] = b"ACGT";
const IUPAC_CHARS: &[u8] = b"=ACMGRSVTWYHKDBN";
const PROTEIN_CHARS: &[u8] = b"ACDEFGHIKLMNOPQRSTVWYBZX";

/// The supported sequence alphabets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    /// 4-letter DNA alphabet { A, C, G, T }
    Dna,
    /// 16-letter IUPAC DNA alphabet { =, A, C, M, G, R, S, V, T, W, Y, H, K, D, B, N }
    DnaIupac,
    /// 24-letter protein alphabet { A, C, D, E, F, G, H, I, K, L, M, N, O, P, Q, R, S, T, V, W, Y, B, Z, X }
    Protein,
}
impl Alphabet {
    /// Returns the packing width of this alphabet's symbols
    #[must_use]
    pub fn width(self) -> SymbolWidth {
        match self {
            Self::Dna => SymbolWidth::Two,
            Self::DnaIupac => SymbolWidth::Four,
            Self::Protein => SymbolWidth::Eight,
        }
    }

    /// Returns the number of symbols in the alphabet
    #[must_use]
    pub fn symbol_count(self) -> usize {
        self.chars().len()
    }

    /// Returns the display name of the alphabet
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Dna => "DNA",
            Self::DnaIupac => "IUPAC DNA",
            Self::Protein => "protein",
        }
    }

    fn chars(self) -> &'static [u8] {
        match self {
            Self::Dna => DNA_CHARS,
            Self::DnaIupac => IUPAC_CHARS,
            Self::Protein => PROTEIN_CHARS,
        }
    }

    /// Converts an ASCII character to its symbol value, case-insensitive.
    ///
    /// Returns `None` for characters outside the alphabet.
    #[must_use]
    pub fn encode(self, c: u8) -> Option<u8> {
        let upper = c.to_ascii_uppercase();
        self.chars()
            .iter()
            .position(|&x| x == upper)
            .map(|p| p as u8)
    }

    /// Converts a symbol value back to its ASCII character.
    ///
    /// Out-of-range symbol values decode to `?`.
    #[must_use]
    pub fn decode(self, symbol: u8) -> u8 {
        self.chars().get(symbol as usize).copied().unwrap_or(b'?')
    }

    /// Converts an ASCII string into symbol values, replacing the contents of `out`.
    ///
    /// Fails on the first character outside the alphabet.
    pub fn encode_into(self, text: &[u8], out: &mut Vec<u8>) -> Result<()> {
        out.clear();
        out.reserve(text.len());
        for &c in text {
            match self.encode(c) {
                Some(symbol) => out.push(symbol),
                None => {
                    return Err(ConfigError::InvalidCharacter(char::from(c), self.name()).into())
                }
            }
        }
        Ok(())
    }
}
