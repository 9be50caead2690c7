//! Source-map coordinates.

/// A position in generated text: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedPosition {
    pub line: u32,
    pub column: u32,
}

impl GeneratedPosition {
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A resolved position in an original source file: 1-based line, 0-based column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OriginalPosition {
    /// The source file named by the map, if the mapping carried one.
    pub source: Option<String>,
    pub line: u32,
    pub column: u32,
}

impl OriginalPosition {
    pub fn new(source: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            source: Some(source.into()),
            line,
            column,
        }
    }
}
