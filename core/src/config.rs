//! Parser configuration for output formatting and resource limits.
//!
//! This module provides [`ParserConfig`] for controlling how citations are
//! rendered and how much unresolved input a parser may hold, plus
//! [`IndexUnit`] for choosing the coordinate space citation offsets are
//! expressed in.
//!
//! # Example
//!
//! ```ignore
//! use citekit_core::config::{IndexUnit, ParserConfig};
//!
//! // Character offsets, 100 char descriptions, no candidate limit
//! let config = ParserConfig::default();
//!
//! // Offsets for a JavaScript consumer, links capped at 4KiB
//! let config = ParserConfig::new()
//!     .with_index_unit(IndexUnit::Utf16)
//!     .with_max_link_len(4096);
//! ```

/// Unit in which citation offsets and clean-text lengths are counted.
///
/// The default counts Unicode scalar values, so an offset is the position of
/// a `char` in the assembled clean text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum IndexUnit {
    /// Unicode scalar values (`char`s).
    #[default]
    Char,
    /// UTF-8 bytes.
    Byte,
    /// UTF-16 code units, as used by JavaScript string indices.
    Utf16,
}

impl IndexUnit {
    /// Length of `text` in this unit.
    #[inline]
    pub fn measure(self, text: &str) -> usize {
        match self {
            IndexUnit::Char => text.chars().count(),
            IndexUnit::Byte => text.len(),
            IndexUnit::Utf16 => text.encode_utf16().count(),
        }
    }

    /// Length of a single character in this unit.
    #[inline]
    pub fn measure_char(self, c: char) -> usize {
        match self {
            IndexUnit::Char => 1,
            IndexUnit::Byte => c.len_utf8(),
            IndexUnit::Utf16 => c.len_utf16(),
        }
    }

    /// Converts an offset in this unit into a byte offset into `text`.
    ///
    /// Returns `None` if the offset lies past the end of `text` or inside a
    /// character (possible for `Byte` and `Utf16`).
    pub fn byte_offset(self, text: &str, offset: usize) -> Option<usize> {
        let mut units = 0;
        for (byte, c) in text.char_indices() {
            if units == offset {
                return Some(byte);
            }
            if units > offset {
                return None;
            }
            units += self.measure_char(c);
        }
        (units == offset).then_some(text.len())
    }
}

/// Configuration for citation rendering and buffer limits.
///
/// # Default Values
///
/// | Setting | Default | Rationale |
/// |---------|---------|-----------|
/// | `max_description_chars` | 100 | Fits a tooltip or hover card |
/// | `max_title_chars` | 50 | Fallback titles stay one line |
/// | `ellipsis` | `"..."` | Marks a truncated description |
/// | `index_unit` | [`IndexUnit::Char`] | Character offsets |
/// | `max_link_len` | `usize::MAX` | No limit by default |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum number of characters of link text kept in
    /// [`Citation::description`](crate::Citation::description).
    ///
    /// Longer link text is cut at this length and [`ellipsis`](Self::ellipsis)
    /// is appended. The clean-text span always covers the full link text.
    pub max_description_chars: usize,

    /// Maximum number of characters of link text used as a title when the
    /// title formatter produces nothing for the URL.
    pub max_title_chars: usize,

    /// Suffix appended to truncated descriptions.
    pub ellipsis: &'static str,

    /// Coordinate unit for citation offsets.
    pub index_unit: IndexUnit,

    /// Maximum bytes of link text plus URL a candidate link may accumulate.
    ///
    /// When a candidate grows past this limit it is abandoned and its text
    /// is released verbatim. This bounds the pending buffer for input such as
    /// an unmatched `[` followed by a long run without newlines.
    ///
    /// Default: `usize::MAX` (no limit)
    pub max_link_len: usize,
}

impl Default for ParserConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ParserConfig {
    /// Default configuration, usable in const contexts.
    pub const DEFAULT: Self = Self {
        max_description_chars: 100,
        max_title_chars: 50,
        ellipsis: "...",
        index_unit: IndexUnit::Char,
        max_link_len: usize::MAX,
    };

    /// Creates a new configuration with default values.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the description truncation length in characters.
    #[inline]
    pub const fn with_max_description_chars(mut self, chars: usize) -> Self {
        self.max_description_chars = chars;
        self
    }

    /// Sets the fallback title length in characters.
    #[inline]
    pub const fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    /// Sets the suffix appended to truncated descriptions.
    #[inline]
    pub const fn with_ellipsis(mut self, ellipsis: &'static str) -> Self {
        self.ellipsis = ellipsis;
        self
    }

    /// Sets the unit citation offsets are counted in.
    #[inline]
    pub const fn with_index_unit(mut self, unit: IndexUnit) -> Self {
        self.index_unit = unit;
        self
    }

    /// Sets the maximum candidate link size in bytes.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Limit on link text plus URL. Use `usize::MAX` to disable.
    #[inline]
    pub const fn with_max_link_len(mut self, bytes: usize) -> Self {
        self.max_link_len = bytes;
        self
    }
}
