//! Error type shared by the encoder, the decoder and the description layer

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while recording or decoding a drawing
#[derive(Debug, Error)]
pub enum Error {
    /// `pop()` was called without a matching push, or a decoded stream
    /// contains an unmatched pop record
    #[error("pop called without a matching push")]
    StackUnderflow,

    /// The drawing or its context is not in a state that allows the call
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// An operation received a number of arguments it cannot encode
    #[error("invalid argument count for {operation}: {count}")]
    InvalidArgumentCount {
        /// Name of the rejected operation
        operation: &'static str,
        /// Number of arguments that were passed
        count: usize,
    },

    /// A description contained a value that cannot be normalized
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A length or count does not fit the 4-byte length prefix
    #[error("length {0} does not fit into a 32 bit length prefix")]
    LengthOverflow(usize),

    /// A read would pass the end of the buffer
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd {
        /// Bytes the read needed
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// A discriminator byte did not match any known identifier
    #[error("invalid {kind} identifier {value}")]
    InvalidTag {
        /// Identifier table that was consulted
        kind: &'static str,
        /// Value found in the stream
        value: u32,
    },

    /// Bytes follow the close record of a drawing
    #[error("{0} bytes of trailing data after close record")]
    TrailingData(usize),

    /// A decoded string is not valid UTF-8
    #[error("invalid UTF-8 string")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Groups, combined geometries or embedded drawings nest too deep
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// A decoded value is outside the representable range
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Packing or unpacking a bit field failed
    #[error("bit field packing failed: {0}")]
    Packing(#[from] packed_struct::PackingError),

    /// A description or script could not be parsed
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
