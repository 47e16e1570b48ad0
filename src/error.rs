use std::collections::TryReserveError;

/// Errors reported by the fallible corners of the collection API.
///
/// The hashed containers themselves never fail once constructed; this type only
/// covers index checks, paired-slice checks and allocation failures surfaced
/// through the `try_*` constructors.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("length mismatch: {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },

    #[error("bit field size must be > 0")]
    EmptyBitField,

    #[error("failed to allocate table storage: {0}")]
    Alloc(#[from] TryReserveError),
}

pub type CollectResult<T> = Result<T, CollectError>;
