//! Byte spans inside a text buffer.

use text_size::TextSize;

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)` inside a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: ByteOffset,
    /// The end byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Creates a span from raw `usize` offsets as produced by lexers.
    #[inline]
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        Self {
            start: TextSize::from(range.start as u32),
            end: TextSize::from(range.end as u32),
        }
    }

    /// Creates a span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates an empty span at the given offset.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self::new(offset, offset)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns a span running from the start of `self` to the end of `other`.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.start),
        }
    }

    /// Returns the text covered by this span.
    ///
    /// Returns an empty string if the span does not fall on char boundaries of `text`.
    pub fn slice(self, text: &str) -> &str {
        let start = u32::from(self.start) as usize;
        let end = u32::from(self.end) as usize;
        text.get(start..end).unwrap_or("")
    }
}
