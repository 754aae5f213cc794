//! Citation records and title derivation.

use crate::config::IndexUnit;
use core::ops::Range;

/// A hyperlink extracted from streamed text.
///
/// `start_index..end_index` is the span the link text occupies in the clean
/// output, counted from the first byte of the stream in the parser's
/// [`IndexUnit`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Citation {
    /// Link destination, verbatim.
    pub url: String,
    /// Human-readable title derived from the URL.
    pub title: String,
    /// Link text, truncated for display.
    pub description: String,
    /// Start of the link text in the clean output.
    pub start_index: usize,
    /// End of the link text in the clean output (exclusive).
    pub end_index: usize,
}

impl Citation {
    /// The clean-text span covered by this citation.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// Length of the span.
    #[inline]
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derives a display title from a link destination.
///
/// Return an empty string to let the parser fall back to a prefix of the
/// link text.
pub trait TitleFormatter {
    fn format_title(&self, url: &str) -> String;
}

impl<F> TitleFormatter for F
where
    F: Fn(&str) -> String,
{
    #[inline]
    fn format_title(&self, url: &str) -> String {
        self(url)
    }
}

/// Titles from the last path segment of a URL.
///
/// `https://example.com/guides/getting-started` becomes `Getting Started`.
/// No percent-decoding is done and query strings are kept as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathSegmentTitle;

impl TitleFormatter for PathSegmentTitle {
    fn format_title(&self, url: &str) -> String {
        let segment = url.rsplit('/').next().unwrap_or_default();
        title_case(&segment.replace('-', " "))
    }
}

/// Capitalise the first cased letter of each word, lowercase the rest.
///
/// A word starts at any letter not preceded by a cased letter, so
/// `"rust_lang.html"` becomes `"Rust_Lang.Html"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_lowercase() || c.is_uppercase();
    }

    out
}

/// The first `max` characters of `text`.
#[inline]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// The first `max` characters of `text`, with `ellipsis` appended if any
/// were cut.
pub fn truncate_description(text: &str, max: usize, ellipsis: &str) -> String {
    let head = truncate_chars(text, max);
    if head.len() < text.len() {
        let mut out = String::with_capacity(head.len() + ellipsis.len());
        out.push_str(head);
        out.push_str(ellipsis);
        out
    } else {
        head.to_string()
    }
}

/// Re-insert link markup into clean text.
///
/// Each citation span is wrapped back into `[text](url)`. This inverts the
/// parser: for any input, restoring its clean output with its citations
/// reproduces the input. Citations must be in emission order; ones whose
/// span does not fit the text are skipped.
pub fn restore_links(clean: &str, citations: &[Citation], unit: IndexUnit) -> String {
    let mut out = String::with_capacity(clean.len() + citations.len() * 32);
    let mut copied = 0;

    for citation in citations {
        let (Some(start), Some(end)) = (
            unit.byte_offset(clean, citation.start_index),
            unit.byte_offset(clean, citation.end_index),
        ) else {
            continue;
        };
        if start < copied || end < start {
            continue;
        }

        out.push_str(&clean[copied..start]);
        out.push('[');
        out.push_str(&clean[start..end]);
        out.push_str("](");
        out.push_str(&citation.url);
        out.push(')');
        copied = end;
    }

    out.push_str(&clean[copied..]);
    out
}
