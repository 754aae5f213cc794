//! Pending input buffer with a movable confirmed boundary.
//!
//! [`PendingBuffer`] holds only the unresolved tail of the stream. Two
//! cursors track progress through it:
//!
//! - `candidate`: start of the run not yet released (a candidate link, or
//!   plain text that may still be flushed)
//! - `scan`: first byte the scanner has not looked at
//!
//! The invariant `candidate <= scan <= len` always holds. Calling
//! [`compact`](PendingBuffer::compact) drops everything before `candidate`,
//! so the buffer never holds more than the current candidate plus the
//! newest chunk.

/// Append-only text buffer with scan and candidate cursors.
///
/// # Example
/// ```ignore
/// let mut buffer = PendingBuffer::new();
/// buffer.push_str("see [docs");
/// buffer.set_scan(buffer.len());
/// buffer.set_candidate(4);
/// buffer.compact();
/// assert_eq!(buffer.as_str(), "[docs");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingBuffer {
    text: String,
    scan: usize,
    candidate: usize,
}

impl PendingBuffer {
    /// Create an empty buffer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total buffered bytes, including any already scanned.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if nothing is buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The whole buffered text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Append a chunk of input.
    #[inline]
    pub fn push_str(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    /// First byte not yet seen by the scanner.
    #[inline]
    pub fn scan(&self) -> usize {
        self.scan
    }

    /// Start of the unreleased run.
    #[inline]
    pub fn candidate(&self) -> usize {
        self.candidate
    }

    /// Move the scan cursor, clamped to `[candidate, len]`.
    #[inline]
    pub fn set_scan(&mut self, scan: usize) {
        self.scan = scan.clamp(self.candidate, self.text.len());
    }

    /// Move the candidate cursor, clamped to `[0, scan]`.
    #[inline]
    pub fn set_candidate(&mut self, candidate: usize) {
        self.candidate = candidate.min(self.scan);
    }

    /// Text from the candidate cursor to the end of the buffer.
    #[inline]
    pub fn unreleased(&self) -> &str {
        &self.text[self.candidate..]
    }

    /// Text in `range`, clamped to the buffer.
    #[inline]
    pub fn slice(&self, range: core::ops::Range<usize>) -> &str {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        &self.text[start..end]
    }

    /// Drop the released prefix before the candidate cursor.
    ///
    /// Cursors are shifted so they keep pointing at the same text.
    pub fn compact(&mut self) {
        if self.candidate > 0 {
            self.text.drain(..self.candidate);
            self.scan -= self.candidate;
            self.candidate = 0;
        }
    }

    /// Take everything from the candidate cursor on and empty the buffer.
    pub fn take_unreleased(&mut self) -> String {
        let mut text = core::mem::take(&mut self.text);
        text.drain(..self.candidate);
        self.scan = 0;
        self.candidate = 0;
        text
    }

    /// Returns true if the cursors are ordered and sit on char boundaries.
    ///
    /// Always true for buffers built through this API; useful for state
    /// restored from elsewhere.
    pub fn is_consistent(&self) -> bool {
        self.candidate <= self.scan
            && self.scan <= self.text.len()
            && self.text.is_char_boundary(self.candidate)
            && self.text.is_char_boundary(self.scan)
    }

    /// Clear all text and reset both cursors, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.text.clear();
        self.scan = 0;
        self.candidate = 0;
    }
}
