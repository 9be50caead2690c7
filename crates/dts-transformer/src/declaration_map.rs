//! Declaration maps: `.d.ts` positions back to the original stylesheet.

use crate::render::RenderedDeclaration;
use crate::types::Transformation;
use source_map::{GeneratedPosition, OriginalPosition, SourceMap};

/// Builds the source map for a rendered declaration.
///
/// `declaration_file` becomes the map's `file`; `stylesheet_file` is the
/// source used for positions the compiler did not attribute to a file.
pub fn declaration_map(
    rendered: &RenderedDeclaration,
    transformations: &[Transformation],
    declaration_file: &str,
    stylesheet_file: &str,
) -> SourceMap {
    let mut builder = SourceMap::builder(Some(declaration_file));

    for line in &rendered.lines {
        let Some(original) = transformations
            .get(line.index)
            .and_then(|t| t.original_position.as_ref())
        else {
            continue;
        };

        let original = OriginalPosition {
            source: Some(
                original
                    .source
                    .clone()
                    .unwrap_or_else(|| stylesheet_file.to_string()),
            ),
            ..original.clone()
        };
        builder.add_mapping(GeneratedPosition::new(line.line, line.column), &original);
    }

    builder.build()
}

/// The comment linking a declaration to its map, including the final newline.
pub fn map_footer(map_file: &str) -> String {
    format!("//# sourceMappingURL={map_file}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, ExportType};
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Transformation> {
        vec![
            Transformation::new("first").with_position(OriginalPosition::new("a.less", 3, 0)),
            Transformation::new("if").with_position(OriginalPosition::new("a.less", 5, 0)),
            Transformation::new("unmapped"),
            Transformation::new("last").with_position(OriginalPosition {
                source: None,
                line: 9,
                column: 2,
            }),
        ]
    }

    #[test]
    fn test_named_map_resolves_each_line() {
        let transformations = sample();
        let rendered = render(&transformations, ExportType::Named).unwrap();
        let map = declaration_map(&rendered, &transformations, "a.less.d.ts", "a.less");

        assert_eq!(map.file(), Some("a.less.d.ts"));
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.original_position_for(GeneratedPosition::new(1, 13)),
            Some(OriginalPosition::new("a.less", 3, 0))
        );
        // "if" is rejected, "unmapped" has no position: "last" is line 3.
        assert_eq!(map.original_position_for(GeneratedPosition::new(2, 13)), None);
        assert_eq!(
            map.original_position_for(GeneratedPosition::new(3, 13)),
            Some(OriginalPosition::new("a.less", 9, 2))
        );
    }

    #[test]
    fn test_default_map_offsets_by_interface_header() {
        let transformations = sample();
        let rendered = render(&transformations, ExportType::Default).unwrap();
        let map = declaration_map(&rendered, &transformations, "a.less.d.ts", "a.less");

        assert_eq!(map.len(), 3);
        assert_eq!(
            map.original_position_for(GeneratedPosition::new(3, 2)),
            Some(OriginalPosition::new("a.less", 5, 0))
        );
    }

    #[test]
    fn test_map_json_shape() {
        let transformations = sample();
        let rendered = render(&transformations, ExportType::Named).unwrap();
        let json = declaration_map(&rendered, &transformations, "a.less.d.ts", "a.less")
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 3);
        assert_eq!(value["file"], "a.less.d.ts");
        assert_eq!(value["sourceRoot"], "");
        assert_eq!(value["sources"], serde_json::json!(["a.less"]));
    }

    #[test]
    fn test_footer() {
        assert_eq!(
            map_footer("a.less.d.ts.map"),
            "//# sourceMappingURL=a.less.d.ts.map\n"
        );
    }
}
