#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
//! Streaming extraction of inline markdown link citations.
//!
//! This crate re-exports [`citekit_core`]. Feed model output deltas to a
//! [`StreamingCitationParser`], display the clean text it returns, and attach
//! the [`Citation`]s it emits to the spans they cover.
//!
//! ```ignore
//! use citekit::{ChunkParser, StreamingCitationParser};
//!
//! let mut parser = StreamingCitationParser::new();
//! let out = parser.collect_chunks(["[A](http://a.com) and ", "[B](http://b.com)"]);
//! assert_eq!(out.text, "A and B");
//! assert_eq!(out.citations[1].span(), 6..7);
//! ```
pub use citekit_core::*;
