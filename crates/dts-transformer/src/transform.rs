//! Compiled CSS to transformations.

use crate::names::{transform_name, NameFormat};
use crate::positions::map_positions;
use crate::tokens::export_tokens;
use crate::types::Transformation;
use css_parser::ParseError;
use source_map::{SourceMap, SourceMapError};
use thiserror::Error;

/// Errors that stop a transformation.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The compiled CSS did not parse.
    #[error("compiled CSS is invalid: {0}")]
    Css(#[from] ParseError),

    /// The compiler's source map did not decode.
    #[error(transparent)]
    SourceMap(#[from] SourceMapError),
}

/// Extracts, locates and names the exported tokens of compiled CSS.
///
/// `map` is the compiler's source map for `css`. The result keeps the
/// tokens' discovery order.
pub fn transform(
    css: &str,
    map: Option<&str>,
    name_format: NameFormat,
) -> Result<Vec<Transformation>, TransformError> {
    let parsed = css_parser::parse(css);
    if let Some(error) = parsed.errors.into_iter().next() {
        return Err(error.into());
    }

    let tokens = export_tokens(&parsed.stylesheet);
    let map = map.map(SourceMap::from_json).transpose()?;
    let positions = map_positions(&parsed.stylesheet, css, map.as_ref(), &tokens);

    Ok(tokens
        .iter()
        .zip(positions)
        .map(|(token, original_position)| Transformation {
            display_name: transform_name(token, name_format),
            original_position,
        })
        .collect())
}
