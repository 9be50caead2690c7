//! Declaration text rendering.

use crate::reserved::{check_name, Rejection};
use crate::types::Transformation;
use std::str::FromStr;
use thiserror::Error;

/// Column at which the name starts on an `export const <name>: string;` line.
pub const NAMED_NAME_COLUMN: u32 = "export const ".len() as u32;

/// Column at which the key starts on a `  '<name>': string;` line.
pub const DEFAULT_NAME_COLUMN: u32 = 2;

/// The shape of the generated declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExportType {
    /// One `export const` per token.
    #[default]
    Named,
    /// A `Styles` interface with a default export.
    Default,
}

/// An export type string that is neither `named` nor `default`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid export type '{0}' (expected 'named' or 'default')")]
pub struct InvalidExportType(pub String);

impl FromStr for ExportType {
    type Err = InvalidExportType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "named" => Ok(Self::Named),
            "default" => Ok(Self::Default),
            other => Err(InvalidExportType(other.to_string())),
        }
    }
}

/// Where a transformation landed in the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationLine {
    /// Index into the transformation list.
    pub index: usize,
    /// 1-based line in the declaration text.
    pub line: u32,
    /// 0-based column where the name starts.
    pub column: u32,
}

/// Rendered declaration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDeclaration {
    pub text: String,
    pub export_type: ExportType,
    /// One entry per rendered token, in order.
    pub lines: Vec<DeclarationLine>,
    /// Names left out of a named declaration, in order.
    pub rejections: Vec<Rejection>,
}

/// Renders declaration text for `transformations`.
///
/// Returns `None` when there is nothing to declare.
pub fn render(
    transformations: &[Transformation],
    export_type: ExportType,
) -> Option<RenderedDeclaration> {
    if transformations.is_empty() {
        return None;
    }

    Some(match export_type {
        ExportType::Named => render_named(transformations),
        ExportType::Default => render_default(transformations),
    })
}

fn render_named(transformations: &[Transformation]) -> RenderedDeclaration {
    let mut declarations = Vec::new();
    let mut lines = Vec::new();
    let mut rejections = Vec::new();

    for (index, transformation) in transformations.iter().enumerate() {
        let name = &transformation.display_name;
        if let Some(rejection) = check_name(name) {
            rejections.push(rejection);
            continue;
        }

        declarations.push(format!("export const {name}: string;"));
        lines.push(DeclarationLine {
            index,
            line: declarations.len() as u32,
            column: NAMED_NAME_COLUMN,
        });
    }

    let mut text = declarations.join("\n");
    text.push('\n');

    RenderedDeclaration {
        text,
        export_type: ExportType::Named,
        lines,
        rejections,
    }
}

fn render_default(transformations: &[Transformation]) -> RenderedDeclaration {
    let mut text = String::from("export interface Styles {\n");
    let mut lines = Vec::with_capacity(transformations.len());

    for (index, transformation) in transformations.iter().enumerate() {
        text.push_str(&format!("  '{}': string;\n", transformation.display_name));
        lines.push(DeclarationLine {
            index,
            line: index as u32 + 2,
            column: DEFAULT_NAME_COLUMN,
        });
    }

    text.push_str("}\n\n");
    text.push_str("export type ClassNames = keyof Styles;\n\n");
    text.push_str("declare const styles: Styles;\n\n");
    text.push_str("export default styles;\n");

    RenderedDeclaration {
        text,
        export_type: ExportType::Default,
        lines,
        rejections: Vec::new(),
    }
}
