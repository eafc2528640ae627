/// Custom Result type for sufq operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the sufq library, encompassing all possible error
/// cases that can occur while constructing or querying index structures.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors in the configuration of an index structure
    ConfigError(#[from] ConfigError),
    /// Errors that occur while building an index structure
    BuildError(#[from] BuildError),
    /// Errors from the bitnuc nucleotide processing library
    BitnucError(#[from] bitnuc::Error),
    /// Generic errors that can occur in any part of the system
    AnyhowError(#[from] anyhow::Error),
}

/// Errors in the configuration of an index structure.
///
/// These are logic errors: they indicate an unusable parameter combination,
/// never a transient condition, and are never retried.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The difference cover has no covering offset for a residue pair.
    ///
    /// Cannot happen for a valid covering set; surfacing it aborts
    /// construction instead of handing out an unsound comparator.
    #[error("no covering offset for residue pair ({0}, {1})")]
    NoCoveringOffset(u32, u32),

    /// The requested q-gram does not fit the 64-bit key word
    #[error("q-gram of {q} symbols at {bits} bits per symbol exceeds the 64-bit key width")]
    KeyWidthExceeded { q: u32, bits: u32 },

    /// A symbol value does not fit the declared symbol width
    #[error("symbol value {0} does not fit {1} bits")]
    SymbolOutOfRange(u8, u32),

    /// A character is not part of the selected alphabet
    #[error("character {0:?} is not part of the {1} alphabet")]
    InvalidCharacter(char, &'static str),
}

/// Errors that occur while building an index structure.
///
/// The partially-built structure is discarded on error; there are no resume
/// semantics.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// The run-length encoded q-gram counts do not add up to the string length
    #[error("mismatching number of q-grams: inserted {expected}, got {got}")]
    QGramCountMismatch { expected: usize, got: usize },

    /// The string is longer than the 32-bit position encoding allows
    #[error("string length ({0}) exceeds the 32-bit position limit")]
    StringTooLong(usize),

    /// An allocation failed while building
    #[error("allocation failure during index construction")]
    Allocation(#[from] std::collections::TryReserveError),
}
