//! Wire codec error types.

use thiserror::Error;

/// Wire codec errors.
#[derive(Error, Debug)]
pub enum WireError {
    /// Reserved header bits were set.
    #[error("reserved header bits set")]
    ReservedBits,

    /// Compressed header carries an algorithm this node does not know.
    #[error("unknown compression algorithm: {0}")]
    UnknownAlgorithm(u8),

    /// Payload size exceeds the protocol limit.
    #[error("message too large: {size} bytes, max {max} bytes")]
    MessageSize { size: usize, max: usize },

    /// Outbound payload serialized to zero bytes.
    #[error("empty message payload")]
    EmptyPayload,

    /// Payload bytes did not parse as the declared message type.
    #[error("bad message: {0}")]
    BadMessage(String),

    /// The compression library reported a failure.
    #[error("compression failed: {0}")]
    Compression(String),

    /// Varint size prefix ran out of input bytes.
    #[error("varint truncated")]
    VarintTruncated,

    /// Varint size prefix does not fit the size type.
    #[error("varint overflow")]
    VarintOverflow,

    /// Decompressed byte count disagrees with the declared original size.
    #[error("decompressed size mismatch: declared {declared}, got {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    /// Declared original size exceeds the decompression budget.
    #[error("declared size {size} exceeds decompression limit {max}")]
    DecompressedTooLarge { size: usize, max: usize },
}

/// Result type for wire codec operations.
pub type WireResult<T> = Result<T, WireError>;
