//! Codec error types.

use std::io;

use thiserror::Error;

use crate::kind::PrimitiveKind;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised by the codec.
///
/// Every error is raised at the point of detection and nothing is retried. A
/// failed read leaves the stream advanced by whatever was consumed before the
/// failure.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Argument outside the accepted domain (e.g. a negative length prefix)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Stream ended before the requested length was satisfied
    #[error("read {read} bytes instead of {requested}")]
    IncompleteRead {
        /// Bytes actually obtained before end of stream
        read: usize,
        /// Bytes requested
        requested: usize,
    },

    /// Type that cannot be transcoded at this layer
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Content too large for its length prefix
    #[error("content of {len} bytes exceeds the {max} byte limit of its length prefix")]
    LengthOverflow {
        /// Content length in bytes
        len: usize,
        /// Largest length the prefix can carry
        max: usize,
    },

    /// Absent value where the target is not nullable
    ///
    /// Reserved for callers layering nullability over the codec; never raised
    /// by the codec itself.
    #[error("empty value for a non-nullable target")]
    EmptyValueOnNonNullable,

    /// Fixed-width text cannot be brought to exactly the requested width
    #[error("encoded text is {actual} bytes, fixed width is {expected}")]
    EncodingLengthMismatch {
        /// Requested width in bytes
        expected: usize,
        /// Closest width the encoding can produce
        actual: usize,
    },

    /// Byte slice too short to hold the requested kind
    #[error("{kind} needs {needed} bytes from offset {start}, buffer holds {available}")]
    BufferTooShort {
        /// Kind being decoded
        kind: PrimitiveKind,
        /// Start offset into the buffer
        start: usize,
        /// Bytes the kind occupies
        needed: usize,
        /// Buffer length
        available: usize,
    },

    /// Integer that maps to no variant of the target enumeration
    #[error("no variant of {name} has discriminant {value}")]
    UnknownDiscriminant {
        /// Enumeration type name
        name: &'static str,
        /// Decoded underlying value
        value: i128,
    },

    /// Date/time tick count outside `0..=DateTime::MAX_TICKS`
    #[error("tick count {0} is outside the representable date range")]
    TicksOutOfRange(i64),

    /// Text encoding name that is not recognized
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// GUID string not in `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form
    #[error("invalid GUID: {0}")]
    InvalidGuid(String),

    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Whether the error came from the stream ending early.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::IncompleteRead { .. })
    }
}
