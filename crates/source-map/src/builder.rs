//! Reading and writing v3 source maps.

use crate::{GeneratedPosition, OriginalPosition};
use thiserror::Error;

/// Source map errors.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The map could not be decoded or encoded.
    #[error("invalid source map: {0}")]
    Invalid(#[from] sourcemap::Error),

    /// The encoded map was not valid UTF-8.
    #[error("source map is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A decoded v3 source map.
///
/// Used both for maps emitted by a stylesheet compiler and for the declaration
/// maps this tool writes.
#[derive(Debug, Clone)]
pub struct SourceMap {
    inner: sourcemap::SourceMap,
}

impl SourceMap {
    /// Parses a JSON source map.
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let inner = sourcemap::SourceMap::from_slice(json.as_bytes())?;
        Ok(Self { inner })
    }

    /// Creates a source map builder.
    pub fn builder(file: Option<&str>) -> SourceMapBuilder {
        SourceMapBuilder::new(file)
    }

    /// Returns the number of mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.get_token_count() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `file` field, if any.
    pub fn file(&self) -> Option<&str> {
        self.inner.get_file()
    }

    /// Finds the original position for a generated position.
    ///
    /// Picks the closest mapping at or before `generated` on the same generated
    /// line. Mappings on earlier lines and mappings without source coordinates
    /// resolve to `None`.
    pub fn original_position_for(&self, generated: GeneratedPosition) -> Option<OriginalPosition> {
        let line = generated.line.checked_sub(1)?;
        let token = self.inner.lookup_token(line, generated.column)?;
        if token.get_dst_line() != line {
            return None;
        }

        let (src_line, src_col) = (token.get_src_line(), token.get_src_col());
        if src_line == u32::MAX || src_col == u32::MAX {
            return None;
        }

        Some(OriginalPosition {
            source: token.get_source().map(str::to_owned),
            line: src_line + 1,
            column: src_col,
        })
    }

    /// Serializes the map to compact JSON.
    pub fn to_json(&self) -> Result<String, SourceMapError> {
        let mut buf = Vec::new();
        self.inner.to_writer(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Incrementally builds a [`SourceMap`].
pub struct SourceMapBuilder {
    inner: sourcemap::SourceMapBuilder,
}

impl SourceMapBuilder {
    /// Creates a builder for a map describing `file`, with an empty `sourceRoot`.
    pub fn new(file: Option<&str>) -> Self {
        let mut inner = sourcemap::SourceMapBuilder::new(file);
        inner.set_source_root(Some(""));
        Self { inner }
    }

    /// Adds a mapping from a generated position to an original one.
    ///
    /// `original.source` must be set; mappings without a source are skipped and
    /// `false` is returned.
    pub fn add_mapping(&mut self, generated: GeneratedPosition, original: &OriginalPosition) -> bool {
        let Some(source) = original.source.as_deref() else {
            return false;
        };
        let (Some(dst_line), Some(src_line)) =
            (generated.line.checked_sub(1), original.line.checked_sub(1))
        else {
            return false;
        };

        self.inner.add(
            dst_line,
            generated.column,
            src_line,
            original.column,
            Some(source),
            None,
            false,
        );
        true
    }

    pub fn build(self) -> SourceMap {
        SourceMap {
            inner: self.inner.into_sourcemap(),
        }
    }
}
