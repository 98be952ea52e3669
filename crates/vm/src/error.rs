//! Error types for the code stream and stack.

/// Errors surfaced by [`CodeStream`](crate::core::code_stream::CodeStream) and
/// [`Stack`](crate::core::stack::Stack) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The value given to build a code stream is not a sequence of bytes.
    #[error("invalid code input: {0}")]
    InvalidCodeInput(String),

    /// A random-access read beyond the end of the code.
    #[error("position {position} is out of range for code of length {length}")]
    OutOfRange {
        /// The requested position.
        position: usize,
        /// The length of the code.
        length: usize,
    },

    /// An operation needed more items than the stack holds.
    #[error("stack underflow: needed {needed} item(s), found {available}")]
    StackUnderflow {
        /// The number of items the operation required.
        needed: usize,
        /// The number of items on the stack.
        available: usize,
    },

    /// A push would exceed the configured maximum depth.
    #[error("stack overflow: limit of {limit} item(s) reached")]
    StackOverflow {
        /// The configured maximum depth.
        limit: usize,
    },

    /// A value does not fit in a 256-bit word.
    #[error("value of {0} bytes does not fit in a 32 byte word")]
    ValueTooLarge(usize),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
