#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Streaming extraction of inline markdown link citations.
//!
//! Text generated token by token often carries links such as
//! `[the docs](https://docs.rs/getting-started)`. This crate strips that
//! markup while the text is still streaming, releasing display-ready text as
//! early as possible and emitting a [`Citation`] for each link the moment it
//! is complete, with its span expressed in the coordinates of the clean text.
//!
//! Start with [`StreamingCitationParser`]; see the `async_stream` module for channel
//! and `Stream` adapters.

pub mod buffer;
pub mod citation;
pub mod config;
mod error;
mod parser;
pub mod stream;
pub mod token;

#[cfg(any(feature = "tokio", feature = "futures"))]
pub mod async_stream;

pub use buffer::PendingBuffer;
pub use citation::{Citation, PathSegmentTitle, TitleFormatter, restore_links};
pub use config::{IndexUnit, ParserConfig};
pub use error::{InvalidState, StreamError};
pub use parser::{Mode, ParserState, StreamingCitationParser};
pub use stream::{ChunkParser, ParsedChunk, strip_citations};
