//! Native compiler: validates CSS and inlines local imports.
//!
//! The output is the input text with every resolvable top-level `@import`
//! replaced by the imported file's contents (recursively, each file at most
//! once). The source map carries one mapping per node start, pointing at the
//! file and position the node came from.

use crate::imports::{import_specifier, is_remote, resolve_import};
use crate::{CompileError, CompileOptions, CompileOutput};
use camino::{Utf8Path, Utf8PathBuf};
use css_parser::{Lexer, Node, Syntax, TokenKind};
use rustc_hash::FxHashSet;
use source_map::{ByteOffset, LineCol, LineIndex, OriginalPosition, SourceMap};
use std::borrow::Cow;
use std::ops::Range;

/// Compiles plain CSS without any external process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCompiler;

impl NativeCompiler {
    /// Compiles `source`, the contents of `options.filename`.
    pub fn compile(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CompileError> {
        let root = options.filename.parent().unwrap_or(Utf8Path::new(""));
        let mut bundle = Bundle::default();
        bundle.seen.insert(options.filename.clone());

        self.append(source, &options.filename, root, options, &mut bundle)?;

        let map = if options.source_map {
            Some(bundle.source_map(&options.filename)?)
        } else {
            None
        };

        Ok(CompileOutput {
            css: bundle.css,
            map,
        })
    }

    fn append(
        &self,
        source: &str,
        file: &Utf8Path,
        root: &Utf8Path,
        options: &CompileOptions,
        bundle: &mut Bundle,
    ) -> Result<(), CompileError> {
        let cleaned = blank_line_comments(source, file);
        let source = cleaned.as_ref();
        let parsed = css_parser::parse(source);
        let index = LineIndex::new(source);
        let error_at = |message: String, offset: ByteOffset| {
            let pos = index.line_col_utf16(source, offset).unwrap_or_default();
            CompileError::at(message, file, pos.line + 1, pos.col)
        };

        if let Some(error) = parsed.errors.first() {
            return Err(error_at(error.to_string(), error.span.start));
        }

        let unit = Unit {
            source,
            index: &index,
            name: source_name(file, root),
            starts: parsed
                .stylesheet
                .descendants()
                .map(|node| node.span().start)
                .collect(),
        };

        let mut cursor = 0;
        for node in &parsed.stylesheet.nodes {
            let Node::AtRule(at_rule) = node else {
                continue;
            };
            if !at_rule.name.eq_ignore_ascii_case("import") {
                continue;
            }
            let Some(specifier) = import_specifier(&at_rule.params) else {
                continue;
            };
            if is_remote(specifier) {
                continue;
            }

            let target = resolve_import(specifier, file, options).ok_or_else(|| {
                error_at(format!("'{specifier}' wasn't found"), at_rule.span.start)
            })?;

            bundle.copy(&unit, cursor..usize::from(at_rule.span.start));
            cursor = usize::from(at_rule.span.end);

            if bundle.seen.insert(target.clone()) {
                tracing::trace!(importer = %file, import = %target, "inlining import");
                let text = std::fs::read_to_string(&target).map_err(|e| {
                    error_at(format!("failed to read '{target}': {e}"), at_rule.span.start)
                })?;
                self.append(&text, &target, root, options, bundle)?;
                if !bundle.css.is_empty() && !bundle.css.ends_with('\n') {
                    bundle.css.push('\n');
                }
            }
        }
        bundle.copy(&unit, cursor..source.len());

        Ok(())
    }
}

/// One input file being copied into the bundle.
struct Unit<'a> {
    source: &'a str,
    index: &'a LineIndex,
    name: String,
    /// Node start offsets in document order.
    starts: Vec<ByteOffset>,
}

struct Mapping {
    generated: usize,
    source: String,
    original: LineCol,
}

#[derive(Default)]
struct Bundle {
    css: String,
    mappings: Vec<Mapping>,
    seen: FxHashSet<Utf8PathBuf>,
}

impl Bundle {
    fn copy(&mut self, unit: &Unit<'_>, range: Range<usize>) {
        if range.is_empty() {
            return;
        }

        let base = self.css.len();
        for &start in &unit.starts {
            let offset = usize::from(start);
            if !range.contains(&offset) {
                continue;
            }
            if let Some(original) = unit.index.line_col_utf16(unit.source, start) {
                self.mappings.push(Mapping {
                    generated: base + offset - range.start,
                    source: unit.name.clone(),
                    original,
                });
            }
        }

        self.css.push_str(&unit.source[range]);
    }

    fn source_map(&self, filename: &Utf8Path) -> Result<String, CompileError> {
        let file = format!("{}.css", filename.file_stem().unwrap_or("out"));
        let index = LineIndex::new(&self.css);
        let mut builder = SourceMap::builder(Some(&file));

        for mapping in &self.mappings {
            let Ok(offset) = u32::try_from(mapping.generated) else {
                continue;
            };
            let generated = index.line_col_utf16(&self.css, ByteOffset::from(offset));
            let Some(generated) = generated else {
                continue;
            };
            builder.add_mapping(
                generated.to_generated(),
                &OriginalPosition::new(
                    mapping.source.clone(),
                    mapping.original.line + 1,
                    mapping.original.col,
                ),
            );
        }

        builder
            .build()
            .to_json()
            .map_err(|e| CompileError::new(format!("failed to serialize source map: {e}")))
    }
}

/// Replaces LESS `//` comments with spaces so the text parses as CSS and
/// every other byte keeps its offset.
fn blank_line_comments<'a>(source: &'a str, file: &Utf8Path) -> Cow<'a, str> {
    if Syntax::from_extension(file.extension()) != Syntax::Less {
        return Cow::Borrowed(source);
    }

    let mut text = String::new();
    let mut cursor = 0;
    for token in Lexer::with_syntax(source, Syntax::Less) {
        if token.kind != TokenKind::LineComment {
            continue;
        }
        let start = usize::from(token.span.start);
        let end = usize::from(token.span.end);
        text.push_str(&source[cursor..start]);
        text.extend(std::iter::repeat(' ').take(end - start));
        cursor = end;
    }

    if cursor == 0 {
        return Cow::Borrowed(source);
    }
    text.push_str(&source[cursor..]);
    Cow::Owned(text)
}

/// Names a source relative to the entry file's directory.
fn source_name(file: &Utf8Path, root: &Utf8Path) -> String {
    file.strip_prefix(root)
        .map(|relative| relative.to_string())
        .unwrap_or_else(|_| file.to_string())
}
