//! Maps exported tokens back to their original stylesheet positions.

use css_parser::{Rule, Stylesheet};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use source_map::{LineIndex, OriginalPosition, SourceMap};

/// Resolves each token to the original position of the last rule whose
/// selector is exactly `.<token>`.
///
/// `css` is the text `stylesheet` was parsed from and `map` its source map.
/// The result is parallel to `tokens`.
pub fn map_positions(
    stylesheet: &Stylesheet,
    css: &str,
    map: Option<&SourceMap>,
    tokens: &IndexSet<String>,
) -> Vec<Option<OriginalPosition>> {
    let Some(map) = map else {
        return vec![None; tokens.len()];
    };

    let mut matched: FxHashMap<&str, &Rule> = FxHashMap::default();
    for rule in stylesheet.rules() {
        let selector = rule.selector.trim();
        let name = selector.strip_prefix('.').unwrap_or(selector);
        if let Some(token) = tokens.get(name) {
            matched.insert(token.as_str(), rule);
        }
    }

    let index = LineIndex::new(css);
    tokens
        .iter()
        .map(|token| {
            let rule = matched.get(token.as_str())?;
            let start = index.line_col_utf16(css, rule.span.start)?;
            map.original_position_for(start.to_generated())
        })
        .collect()
}
