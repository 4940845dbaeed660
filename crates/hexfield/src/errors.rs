//! Error types for hex decoding and bit reading.

use thiserror::Error;

/// Errors produced while turning raw hex text into a [crate::bits::BitSequence].
///
/// All of them are batch-fatal: when one is returned no field is extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Nothing left after stripping whitespace.
    #[error("hex input is empty")]
    EmptyInput,
    /// The stripped text cannot be split into whole bytes.
    #[error("hex input has an odd number of digits ({len})")]
    OddLength { len: usize },
    /// A character outside `0-9a-fA-F` survived whitespace stripping.
    #[error("invalid hex digit {ch:?} at position {index}")]
    InvalidHexDigit { ch: char, index: usize },
}

/// Errors produced when reading bits from a byte slice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Requested bit range is beyond the end of the data.
    #[error("bit range is out of bounds")]
    OutOfBounds,
    /// More than 64 bits were requested in a single numeric read.
    #[error("cannot read more than 64 bits as a number")]
    TooManyBitsRead,
}
