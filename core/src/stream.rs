//! Generic push/finish interface for streaming text parsers.

use crate::{Citation, StreamingCitationParser, TitleFormatter};

/// Output of one pushed chunk or the final flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChunk<T = Citation> {
    /// Text safe to render immediately.
    pub text: String,
    /// Payloads completed by this chunk, in stream order.
    pub citations: Vec<T>,
}

impl<T> Default for ParsedChunk<T> {
    fn default() -> Self {
        Self {
            text: String::new(),
            citations: Vec::new(),
        }
    }
}

impl<T> ParsedChunk<T> {
    /// Returns true when no text or payloads were produced.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.citations.is_empty()
    }

    /// Append a later chunk's output to this one.
    pub fn merge(&mut self, other: ParsedChunk<T>) {
        self.text.push_str(&other.text);
        self.citations.extend(other.citations);
    }
}

/// A parser that consumes streamed text and emits visible text plus
/// extracted payloads.
pub trait ChunkParser {
    /// Payload extracted by this parser.
    type Extracted;

    /// Feed the next chunk of the stream.
    fn push_str(&mut self, chunk: &str) -> ParsedChunk<Self::Extracted>;

    /// Flush buffered state at end of stream.
    fn finish(&mut self) -> ParsedChunk<Self::Extracted>;

    /// Feed every chunk in order, then flush, collecting all output.
    fn collect_chunks<'a, I>(&mut self, chunks: I) -> ParsedChunk<Self::Extracted>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut all = ParsedChunk::default();
        for chunk in chunks {
            all.merge(self.push_str(chunk));
        }
        all.merge(self.finish());
        all
    }
}

impl<F: TitleFormatter> ChunkParser for StreamingCitationParser<F> {
    type Extracted = Citation;

    #[inline]
    fn push_str(&mut self, chunk: &str) -> ParsedChunk<Citation> {
        self.process_chunk(chunk)
    }

    #[inline]
    fn finish(&mut self) -> ParsedChunk<Citation> {
        ParsedChunk {
            text: self.finalize(),
            citations: Vec::new(),
        }
    }
}

/// Strip link markup from a complete string.
///
/// Returns `(clean_text, citations)` with the same semantics as streaming the
/// text through a default [`StreamingCitationParser`] in one chunk.
pub fn strip_citations(text: &str) -> (String, Vec<Citation>) {
    let out = StreamingCitationParser::new().collect_chunks([text]);
    (out.text, out.citations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_chunk_merge() {
        let mut a: ParsedChunk<u8> = ParsedChunk {
            text: "ab".into(),
            citations: vec![1],
        };
        a.merge(ParsedChunk {
            text: "c".into(),
            citations: vec![2],
        });
        assert_eq!(a.text, "abc");
        assert_eq!(a.citations, vec![1, 2]);
        assert!(!a.is_empty());
        assert!(ParsedChunk::<u8>::default().is_empty());
    }

    #[test]
    fn test_collect_chunks() {
        let mut parser = StreamingCitationParser::new();
        let out = parser.collect_chunks(["see [do", "cs](https://x.io/a-b) and [tail"]);
        assert_eq!(out.text, "see docs and [tail");
        assert_eq!(out.citations.len(), 1);
        assert_eq!(out.citations[0].title, "A B");
    }

    #[test]
    fn test_strip_citations() {
        let (text, citations) = strip_citations("[A](http://a.com) and [B](http://b.com)");
        assert_eq!(text, "A and B");
        assert_eq!(citations.len(), 2);
    }
}
