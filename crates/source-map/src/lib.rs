//! Source positions and source maps for typed-less-modules-rs.
//!
//! Declarations are produced from compiled CSS, which is itself produced from
//! the original stylesheet. This crate provides the pieces needed to walk back
//! through both hops:
//!
//! - [`Span`] and [`LineIndex`] locate nodes inside a text buffer
//! - [`SourceMap`] reads a compiler's v3 source map and answers
//!   "original position for generated position" queries
//! - [`SourceMapBuilder`] writes new v3 maps (compiled CSS maps and
//!   declaration maps)

mod builder;
mod line_index;
mod position;
mod span;

pub use builder::{SourceMap, SourceMapBuilder, SourceMapError};
pub use line_index::{LineCol, LineIndex};
pub use position::{GeneratedPosition, OriginalPosition};
pub use span::{ByteOffset, Span};
