//! Error types.
//!
//! The parser itself never fails: malformed markup degrades to literal text.
//! Errors only arise when restoring saved state or where a parser is wired
//! to channels and size limits.

use thiserror::Error;

/// Error type for async streaming operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The receiving side of the event channel was dropped.
    #[error("channel closed unexpectedly")]
    ChannelClosed,

    /// Input chunk exceeded maximum allowed size.
    #[error("chunk size {size} exceeds maximum {max}")]
    ChunkTooLarge {
        /// Size of the chunk that was rejected, in bytes.
        size: usize,
        /// Maximum allowed chunk size.
        max: usize,
    },
}

/// A saved [`ParserState`](crate::ParserState) that breaks the parser's
/// invariants and cannot be resumed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("inconsistent parser state: {reason}")]
pub struct InvalidState {
    reason: &'static str,
}

impl InvalidState {
    pub(crate) const fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Which invariant was violated.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}
