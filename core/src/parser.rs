//! Streaming citation parser.
//!
//! [`StreamingCitationParser`] consumes arbitrary fragments of a text stream
//! and strips inline `[text](url)` links down to their text, emitting a
//! [`Citation`] the moment each closing `)` arrives.

use crate::{
    buffer::PendingBuffer,
    citation::{Citation, PathSegmentTitle, TitleFormatter, truncate_chars, truncate_description},
    config::{IndexUnit, ParserConfig},
    error::InvalidState,
    stream::ParsedChunk,
    token::{LinkToken, lex_from},
};
use core::ops::Range;
use tracing::{debug, trace};

/// Scanner mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Plain text; also the state after every resolved candidate.
    #[default]
    Initial,
    /// Inside `[...`, collecting link text.
    LinkText,
    /// Saw `]`, expecting `(`.
    LinkMiddle,
    /// Inside `(...`, collecting the URL.
    LinkLocation,
}

/// Everything a parser carries between calls.
///
/// Between calls, `pending` is either empty (mode [`Mode::Initial`]) or holds
/// exactly the markup of the current candidate: `[` and the link text, then
/// `]`, then `(` and the URL, depending on the mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserState {
    mode: Mode,
    pending: PendingBuffer,
    link_text: String,
    link_url: String,
    clean_len: usize,
    citations: Vec<Citation>,
}

impl ParserState {
    /// Current scanner mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Unresolved input held back from the output.
    #[inline]
    pub fn pending(&self) -> &PendingBuffer {
        &self.pending
    }

    /// Length of all clean text released so far.
    #[inline]
    pub fn clean_len(&self) -> usize {
        self.clean_len
    }

    /// All citations produced so far, in order.
    #[inline]
    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    /// Check the invariants that hold between calls.
    pub fn validate(&self) -> Result<(), InvalidState> {
        if !self.pending.is_consistent() {
            return Err(InvalidState::new("buffer cursors out of range"));
        }
        if self.pending.scan() != self.pending.len() || self.pending.candidate() != 0 {
            return Err(InvalidState::new("buffer not compacted"));
        }
        if self.mode == Mode::Initial && !self.pending.is_empty() {
            return Err(InvalidState::new("unreleased text outside a candidate"));
        }
        if self.pending.unreleased() != self.candidate_markup() {
            return Err(InvalidState::new("pending text does not match candidate"));
        }
        if self
            .citations
            .iter()
            .any(|c| c.start_index >= c.end_index || c.end_index > self.clean_len)
        {
            return Err(InvalidState::new("citation span outside clean text"));
        }
        Ok(())
    }

    /// The markup a candidate in the current mode has consumed so far.
    fn candidate_markup(&self) -> String {
        match self.mode {
            Mode::Initial => String::new(),
            Mode::LinkText => format!("[{}", self.link_text),
            Mode::LinkMiddle => format!("[{}]", self.link_text),
            Mode::LinkLocation => format!("[{}]({}", self.link_text, self.link_url),
        }
    }
}

/// Clean text produced during one call, with its length in index units.
struct Output {
    text: String,
    len: usize,
    unit: IndexUnit,
}

impl Output {
    fn new(unit: IndexUnit) -> Self {
        Self {
            text: String::new(),
            len: 0,
            unit,
        }
    }

    fn push(&mut self, text: &str) {
        self.len += self.unit.measure(text);
        self.text.push_str(text);
    }
}

/// Incremental parser for inline link citations.
///
/// One instance serves one stream. Feed fragments in order with
/// [`process_chunk`](Self::process_chunk), then call
/// [`finalize`](Self::finalize) once. Use [`reset`](Self::reset) to reuse the
/// instance for an unrelated stream.
///
/// # State machine
///
#[cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/link_fsm.mmd"))]
///
/// | Mode | `[` | `]` | `(` | `)` | `\n` | other |
/// |------|-----|-----|-----|-----|------|-------|
/// | Initial | flush, start candidate | | | | | |
/// | LinkText | restart candidate | → LinkMiddle | text | text | abandon | text |
/// | LinkMiddle | abandon, re-scan | abandon, re-scan | → LinkLocation | abandon, re-scan | abandon, re-scan | abandon, re-scan |
/// | LinkLocation | url | url | url | complete | abandon | url |
///
/// Abandoning a candidate never drops input: the buffered characters are
/// released verbatim once scanning is back in `Initial` with no new `[`.
///
/// # Example
///
/// ```ignore
/// use citekit_core::StreamingCitationParser;
///
/// let mut parser = StreamingCitationParser::new();
/// let mut text = String::new();
///
/// for delta in ["Per [the do", "cs](https://docs.rs/getting-started), use it"] {
///     let out = parser.process_chunk(delta);
///     text.push_str(&out.text);
///     for citation in out.citations {
///         println!("{} -> {}", citation.title, citation.url);
///     }
/// }
/// text.push_str(&parser.finalize());
/// assert_eq!(text, "Per the docs, use it");
/// ```
#[derive(Debug, Clone)]
pub struct StreamingCitationParser<F = PathSegmentTitle> {
    state: ParserState,
    config: ParserConfig,
    formatter: F,
}

impl StreamingCitationParser {
    /// Create a parser with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(ParserConfig::DEFAULT)
    }

    /// Create a parser with a custom configuration.
    #[inline]
    pub fn with_config(config: ParserConfig) -> Self {
        Self::with_formatter(config, PathSegmentTitle)
    }
}

impl Default for StreamingCitationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: TitleFormatter> StreamingCitationParser<F> {
    /// Create a parser with a custom title formatter.
    pub fn with_formatter(config: ParserConfig, formatter: F) -> Self {
        Self {
            state: ParserState::default(),
            config,
            formatter,
        }
    }

    /// Resume a parser from a previously saved state.
    ///
    /// The configuration should match the one the state was produced with,
    /// otherwise offsets of new citations will not line up with old ones.
    pub fn from_state(
        state: ParserState,
        config: ParserConfig,
        formatter: F,
    ) -> Result<Self, InvalidState> {
        state.validate()?;
        Ok(Self {
            state,
            config,
            formatter,
        })
    }

    #[inline]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Current state, suitable for saving and restoring with
    /// [`from_state`](Self::from_state).
    #[inline]
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    #[inline]
    pub fn into_state(self) -> ParserState {
        self.state
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// All citations produced since construction or the last reset.
    #[inline]
    pub fn citations(&self) -> &[Citation] {
        &self.state.citations
    }

    /// Length of all clean text released so far, in index units.
    #[inline]
    pub fn clean_len(&self) -> usize {
        self.state.clean_len
    }

    /// Bytes of input currently held back.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.state.pending.len()
    }

    /// Feed the next fragment of the stream.
    ///
    /// Returns the clean text that is now safe to display and the citations
    /// completed by this fragment. Text belonging to an unfinished candidate
    /// link is held back until the candidate resolves.
    pub fn process_chunk(&mut self, chunk: &str) -> ParsedChunk {
        if chunk.is_empty() {
            return ParsedChunk::default();
        }

        self.state.pending.push_str(chunk);

        let mut out = Output::new(self.config.index_unit);
        let mut citations = Vec::new();

        let tokens = lex_from(self.state.pending.as_str(), self.state.pending.scan());
        for (token, span) in tokens {
            self.state.pending.set_scan(span.end);
            self.step(token, span, &mut out, &mut citations);
        }

        if self.state.mode == Mode::Initial {
            let pending = &mut self.state.pending;
            out.push(pending.slice(pending.candidate()..pending.len()));
            pending.set_candidate(pending.len());
        }
        self.state.pending.compact();
        self.state.clean_len += out.len;

        ParsedChunk {
            text: out.text,
            citations,
        }
    }

    /// Flush everything still buffered as literal text.
    ///
    /// An unfinished candidate is not a citation: its brackets, parentheses
    /// and partial URL are returned verbatim. Citations are left untouched.
    pub fn finalize(&mut self) -> String {
        let rest = self.state.pending.take_unreleased();
        self.state.mode = Mode::Initial;
        self.state.link_text.clear();
        self.state.link_url.clear();
        self.state.clean_len += self.config.index_unit.measure(&rest);

        debug!(
            flushed = rest.len(),
            citations = self.state.citations.len(),
            "stream finalized"
        );
        rest
    }

    /// Restore the freshly constructed state, keeping the configuration and
    /// allocated buffers.
    pub fn reset(&mut self) {
        let state = &mut self.state;
        state.mode = Mode::Initial;
        state.pending.clear();
        state.link_text.clear();
        state.link_url.clear();
        state.clean_len = 0;
        state.citations.clear();
    }

    fn step(
        &mut self,
        token: LinkToken,
        span: Range<usize>,
        out: &mut Output,
        citations: &mut Vec<Citation>,
    ) {
        match self.state.mode {
            Mode::Initial => {
                if token == LinkToken::OpenBracket {
                    self.open_candidate(span.start, out);
                }
            }
            Mode::LinkText => match token {
                LinkToken::OpenBracket => self.open_candidate(span.start, out),
                LinkToken::CloseBracket => self.state.mode = Mode::LinkMiddle,
                LinkToken::Newline => self.abandon(span.start, "newline in link text"),
                _ => self.accumulate(token, span, out, citations),
            },
            Mode::LinkMiddle => {
                if token == LinkToken::OpenParen {
                    self.state.mode = Mode::LinkLocation;
                } else {
                    self.abandon(span.start, "no destination after link text");
                    self.step(token, span, out, citations);
                }
            }
            Mode::LinkLocation => match token {
                LinkToken::CloseParen => self.complete(span.end, out, citations),
                LinkToken::Newline => self.abandon(span.start, "newline in link destination"),
                _ => self.accumulate(token, span, out, citations),
            },
        }
    }

    /// Release text before `at` and start a new candidate there.
    fn open_candidate(&mut self, at: usize, out: &mut Output) {
        let pending = &mut self.state.pending;
        out.push(pending.slice(pending.candidate()..at));
        pending.set_candidate(at);

        self.state.link_text.clear();
        self.state.link_url.clear();
        self.state.mode = Mode::LinkText;
        trace!(at, "candidate link started");
    }

    /// Give up on the current candidate. Its text stays buffered and is
    /// released as plain text.
    fn abandon(&mut self, at: usize, reason: &'static str) {
        self.state.mode = Mode::Initial;
        self.state.link_text.clear();
        self.state.link_url.clear();
        trace!(at, reason, "candidate link abandoned");
    }

    /// Append a token's text to the link text or URL, abandoning the
    /// candidate if it would outgrow `max_link_len`.
    fn accumulate(
        &mut self,
        token: LinkToken,
        span: Range<usize>,
        out: &mut Output,
        citations: &mut Vec<Citation>,
    ) {
        let held = self.state.link_text.len() + self.state.link_url.len();
        if held.saturating_add(span.len()) > self.config.max_link_len {
            self.abandon(span.start, "candidate exceeds max_link_len");
            self.step(token, span, out, citations);
            return;
        }

        let state = &mut self.state;
        let piece = state.pending.slice(span);
        match state.mode {
            Mode::LinkLocation => state.link_url.push_str(piece),
            _ => state.link_text.push_str(piece),
        }
    }

    /// Resolve the current candidate. `end` is just past the closing `)`.
    fn complete(&mut self, end: usize, out: &mut Output, citations: &mut Vec<Citation>) {
        let state = &mut self.state;
        state.mode = Mode::Initial;

        // `[](url)` has no text to anchor a span on; it stays literal.
        if state.link_text.is_empty() {
            state.link_url.clear();
            trace!(end, "empty link text kept as literal");
            return;
        }

        let text = core::mem::take(&mut state.link_text);
        let url = core::mem::take(&mut state.link_url);

        let start_index = state.clean_len + out.len;
        let end_index = start_index + self.config.index_unit.measure(&text);

        let mut title = self.formatter.format_title(&url);
        if title.is_empty() {
            title = truncate_chars(&text, self.config.max_title_chars).to_string();
        }
        let description = truncate_description(
            &text,
            self.config.max_description_chars,
            self.config.ellipsis,
        );

        out.push(&text);
        state.pending.set_candidate(end);

        let citation = Citation {
            url,
            title,
            description,
            start_index,
            end_index,
        };
        debug!(
            url = %citation.url,
            start_index,
            end_index,
            "citation completed"
        );
        state.citations.push(citation.clone());
        citations.push(citation);
    }
}
