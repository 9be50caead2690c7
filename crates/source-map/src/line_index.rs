//! Offset to line/column conversion.

use crate::{ByteOffset, GeneratedPosition};
use text_size::TextSize;

/// A 0-indexed line and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed byte column within the line.
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Converts to the 1-based line, 0-based column convention used by source maps.
    #[inline]
    pub fn to_generated(self) -> GeneratedPosition {
        GeneratedPosition::new(self.line + 1, self.col)
    }
}

/// Line start table for a text buffer.
///
/// Only `\n` starts a new line; a preceding `\r` stays part of the previous line,
/// which matches how CSS tooling reports positions for CRLF files.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// `line_starts[i]` is the byte offset where line `i` begins.
    line_starts: Vec<ByteOffset>,
    len: ByteOffset,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
        );

        Self {
            line_starts,
            len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a line/column position.
    ///
    /// Returns `None` past the end of the text.
    pub fn line_col(&self, offset: ByteOffset) -> Option<LineCol> {
        if offset > self.len {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = u32::from(offset) - u32::from(self.line_starts[line]);

        Some(LineCol::new(line as u32, col))
    }

    /// Like [`LineIndex::line_col`], but the column counts UTF-16 code units,
    /// as source map consumers do. `text` must be the indexed text.
    ///
    /// Returns `None` past the end or inside a multi-byte character.
    pub fn line_col_utf16(&self, text: &str, offset: ByteOffset) -> Option<LineCol> {
        let byte = self.line_col(offset)?;
        let start = u32::from(self.line_starts[byte.line as usize]) as usize;
        let prefix = text.get(start..u32::from(offset) as usize)?;
        Some(LineCol::new(byte.line, prefix.encode_utf16().count() as u32))
    }

    /// Converts a line/column position back to a byte offset.
    pub fn offset(&self, line_col: LineCol) -> Option<ByteOffset> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        let offset = start + TextSize::from(line_col.col);
        (offset <= self.len).then_some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_positions() {
        let css = ".a {\n  color: red;\n}\n.b { color: blue; }\n";
        let index = LineIndex::new(css);
        assert_eq!(index.line_count(), 5);

        let b = css.find(".b").unwrap() as u32;
        assert_eq!(index.line_col(TextSize::from(b)), Some(LineCol::new(3, 0)));

        let color = css.find("color").unwrap() as u32;
        assert_eq!(
            index.line_col(TextSize::from(color)),
            Some(LineCol::new(1, 2))
        );
    }

    #[test]
    fn test_crlf_keeps_carriage_return_on_line() {
        let index = LineIndex::new(".a {}\r\n.b {}");
        assert_eq!(index.line_col(TextSize::from(5)), Some(LineCol::new(0, 5)));
        assert_eq!(index.line_col(TextSize::from(7)), Some(LineCol::new(1, 0)));
    }

    #[test]
    fn test_past_end_is_none() {
        let index = LineIndex::new("abc");
        assert_eq!(index.line_col(TextSize::from(3)), Some(LineCol::new(0, 3)));
        assert_eq!(index.line_col(TextSize::from(4)), None);
        assert_eq!(index.offset(LineCol::new(1, 0)), None);
    }

    #[test]
    fn test_offset_roundtrip() {
        let text = ".x {}\n\n.y { }\n";
        let index = LineIndex::new(text);
        for offset in 0..=text.len() {
            let offset = TextSize::from(offset as u32);
            let line_col = index.line_col(offset).unwrap();
            assert_eq!(index.offset(line_col), Some(offset));
        }
    }

    #[test]
    fn test_utf16_columns() {
        // `é` is two bytes and one UTF-16 unit, `😀` four bytes and two units.
        let text = "/* é😀 */ .a {}\n.b {}";
        let index = LineIndex::new(text);
        let a = TextSize::from(text.find(".a").unwrap() as u32);
        assert_eq!(index.line_col(a), Some(LineCol::new(0, 13)));
        assert_eq!(index.line_col_utf16(text, a), Some(LineCol::new(0, 10)));

        let b = TextSize::from(text.find(".b").unwrap() as u32);
        assert_eq!(index.line_col_utf16(text, b), Some(LineCol::new(1, 0)));

        let inside = TextSize::from(text.find('é').unwrap() as u32 + 1);
        assert_eq!(index.line_col_utf16(text, inside), None);
    }

    #[test]
    fn test_to_generated_is_one_based() {
        let generated = LineCol::new(0, 4).to_generated();
        assert_eq!(generated.line, 1);
        assert_eq!(generated.column, 4);
    }
}
