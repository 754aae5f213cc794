//! Async adapters for driving a parser from a stream of text deltas.
//!
//! A model response usually arrives as a channel or stream of text deltas.
//! The adapters here run each delta through a [`StreamingCitationParser`](crate::StreamingCitationParser) and
//! forward the result as [`StreamEvent`]s: clean text first, then any
//! citations the delta completed.
//!
//! # Features
//!
//! - `tokio`: [`tokio_impl::CitationStream`] reads from and writes to
//!   `tokio::sync::mpsc` channels
//! - `futures`: [`futures_impl::CitationEvents`] adapts any
//!   `Stream<Item = String>` (runtime-agnostic)
//!
//! # Example
//!
//! ```ignore
//! use citekit_core::async_stream::{StreamConfig, StreamEvent, tokio_impl::CitationStream};
//! use tokio::sync::mpsc;
//!
//! async fn relay(deltas: mpsc::Receiver<String>) -> Result<Vec<Citation>, StreamError> {
//!     let (stream, mut event_rx) = CitationStream::channel(StreamConfig::default());
//!
//!     let pump = tokio::spawn(stream.run(deltas));
//!
//!     while let Some(event) = event_rx.recv().await {
//!         match event {
//!             StreamEvent::Text(text) => print!("{text}"),
//!             StreamEvent::Citations(citations) => render_sources(&citations),
//!         }
//!     }
//!
//!     pump.await.map_err(|_| StreamError::ChannelClosed)?
//! }
//! ```

use crate::Citation;

/// One unit of output from an async adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreamEvent {
    /// Clean text safe to display.
    Text(String),
    /// Citations completed by the most recent delta.
    Citations(Vec<Citation>),
}

/// Configuration for async stream processing.
///
/// # Presets
///
/// - [`StreamConfig::small()`]: short replies, little buffering
/// - [`StreamConfig::medium()`]: balanced (default)
/// - [`StreamConfig::large()`]: long documents, bulk deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Capacity of the event channel built by
    /// [`CitationStream::channel`](tokio_impl::CitationStream::channel).
    ///
    /// Zero is treated as one. Default: 64.
    pub event_buffer_size: usize,
    /// Maximum size of a single delta in bytes.
    ///
    /// Larger deltas trigger [`StreamError::ChunkTooLarge`](crate::StreamError::ChunkTooLarge).
    /// Default: 64KB.
    pub max_chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::medium()
    }
}

impl StreamConfig {
    /// Configuration for short replies.
    pub const fn small() -> Self {
        Self {
            event_buffer_size: 16,
            max_chunk_size: 4 * 1024,
        }
    }

    /// Configuration for typical chat responses.
    pub const fn medium() -> Self {
        Self {
            event_buffer_size: 64,
            max_chunk_size: 64 * 1024,
        }
    }

    /// Configuration for long documents.
    pub const fn large() -> Self {
        Self {
            event_buffer_size: 512,
            max_chunk_size: 1024 * 1024,
        }
    }
}

/// Turn one chunk's output into events, text first.
fn queue_events(out: crate::ParsedChunk, mut emit: impl FnMut(StreamEvent)) {
    if !out.text.is_empty() {
        emit(StreamEvent::Text(out.text));
    }
    if !out.citations.is_empty() {
        emit(StreamEvent::Citations(out.citations));
    }
}

#[cfg(feature = "tokio")]
pub mod tokio_impl {
    //! Tokio-based async adapter.

    use super::*;
    use crate::{StreamError, StreamingCitationParser, TitleFormatter};
    use ::tokio::sync::mpsc;

    /// Parser bound to an event channel.
    pub struct CitationStream<F = crate::PathSegmentTitle> {
        parser: StreamingCitationParser<F>,
        event_tx: mpsc::Sender<StreamEvent>,
        config: StreamConfig,
    }

    impl CitationStream {
        /// Create a stream with a default parser and configuration.
        pub fn new(event_tx: mpsc::Sender<StreamEvent>) -> Self {
            Self::with_parser(StreamingCitationParser::new(), event_tx, StreamConfig::default())
        }

        /// Create a stream together with the receiving end of its event
        /// channel, sized by `config.event_buffer_size`.
        pub fn channel(config: StreamConfig) -> (Self, mpsc::Receiver<StreamEvent>) {
            let (event_tx, event_rx) = mpsc::channel(config.event_buffer_size.max(1));
            let stream = Self::with_parser(StreamingCitationParser::new(), event_tx, config);
            (stream, event_rx)
        }
    }

    impl<F: TitleFormatter> CitationStream<F> {
        /// Create a stream around an existing parser.
        pub fn with_parser(
            parser: StreamingCitationParser<F>,
            event_tx: mpsc::Sender<StreamEvent>,
            config: StreamConfig,
        ) -> Self {
            Self {
                parser,
                event_tx,
                config,
            }
        }

        #[inline]
        pub fn parser(&self) -> &StreamingCitationParser<F> {
            &self.parser
        }

        /// Parse one delta and send the resulting events.
        pub async fn feed(&mut self, chunk: &str) -> Result<(), StreamError> {
            if chunk.len() > self.config.max_chunk_size {
                return Err(StreamError::ChunkTooLarge {
                    size: chunk.len(),
                    max: self.config.max_chunk_size,
                });
            }

            let mut events = Vec::with_capacity(2);
            queue_events(self.parser.process_chunk(chunk), |e| events.push(e));
            self.send_all(events).await
        }

        /// Flush the parser and send the remaining text.
        ///
        /// Returns every citation produced over the stream's lifetime.
        pub async fn finish(mut self) -> Result<Vec<Citation>, StreamError> {
            let rest = self.parser.finalize();
            if !rest.is_empty() {
                self.send_all(vec![StreamEvent::Text(rest)]).await?;
            }
            Ok(self.parser.citations().to_vec())
        }

        /// Feed every delta from `chunk_rx` until it closes, then finish.
        pub async fn run(
            mut self,
            mut chunk_rx: mpsc::Receiver<String>,
        ) -> Result<Vec<Citation>, StreamError> {
            while let Some(chunk) = chunk_rx.recv().await {
                self.feed(&chunk).await?;
            }
            self.finish().await
        }

        async fn send_all(&self, events: Vec<StreamEvent>) -> Result<(), StreamError> {
            for event in events {
                self.event_tx
                    .send(event)
                    .await
                    .map_err(|_| StreamError::ChannelClosed)?;
            }
            Ok(())
        }
    }
}

#[cfg(feature = "futures")]
pub mod futures_impl {
    //! Futures-based adapter (runtime-agnostic).

    use super::*;
    use crate::{StreamingCitationParser, TitleFormatter};
    use core::pin::Pin;
    use core::task::{Context, Poll};
    use futures_core::Stream;
    use std::collections::VecDeque;

    /// A stream adapter that turns text deltas into [`StreamEvent`]s.
    ///
    /// When the inner stream ends, the parser is finalized and any held-back
    /// text is yielded before the adapter itself ends.
    pub struct CitationEvents<S, F = crate::PathSegmentTitle> {
        inner: S,
        parser: StreamingCitationParser<F>,
        queued: VecDeque<StreamEvent>,
        finished: bool,
    }

    impl<S> CitationEvents<S>
    where
        S: Stream<Item = String>,
    {
        /// Wrap a stream of deltas with a default parser.
        pub fn new(inner: S) -> Self {
            Self::with_parser(inner, StreamingCitationParser::new())
        }
    }

    impl<S, F> CitationEvents<S, F>
    where
        S: Stream<Item = String>,
        F: TitleFormatter,
    {
        /// Wrap a stream of deltas with an existing parser.
        pub fn with_parser(inner: S, parser: StreamingCitationParser<F>) -> Self {
            Self {
                inner,
                parser,
                queued: VecDeque::with_capacity(2),
                finished: false,
            }
        }

        /// All citations seen so far.
        #[inline]
        pub fn citations(&self) -> &[Citation] {
            self.parser.citations()
        }
    }

    impl<S, F> Stream for CitationEvents<S, F>
    where
        S: Stream<Item = String> + Unpin,
        F: TitleFormatter + Unpin,
    {
        type Item = StreamEvent;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            let this = self.get_mut();
            loop {
                if let Some(event) = this.queued.pop_front() {
                    return Poll::Ready(Some(event));
                }
                if this.finished {
                    return Poll::Ready(None);
                }

                match Pin::new(&mut this.inner).poll_next(cx) {
                    Poll::Ready(Some(chunk)) => {
                        let queued = &mut this.queued;
                        queue_events(this.parser.process_chunk(&chunk), |e| queued.push_back(e));
                    }
                    Poll::Ready(None) => {
                        this.finished = true;
                        let rest = this.parser.finalize();
                        if !rest.is_empty() {
                            this.queued.push_back(StreamEvent::Text(rest));
                        }
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_config_presets() {
        assert_eq!(StreamConfig::default(), StreamConfig::medium());
        assert_eq!(StreamConfig::small().max_chunk_size, 4 * 1024);
        assert_eq!(StreamConfig::large().event_buffer_size, 512);
    }

    #[test]
    fn test_queue_events_order() {
        let mut events = Vec::new();
        let out = crate::ParsedChunk {
            text: "a".to_string(),
            citations: vec![Citation {
                url: "u".into(),
                title: "U".into(),
                description: "a".into(),
                start_index: 0,
                end_index: 1,
            }],
        };
        queue_events(out, |e| events.push(e));
        assert!(matches!(events[0], StreamEvent::Text(_)));
        assert!(matches!(events[1], StreamEvent::Citations(_)));

        let mut none = Vec::new();
        queue_events(crate::ParsedChunk::default(), |e| none.push(e));
        assert!(none.is_empty());
    }
}
