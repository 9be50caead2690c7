//! Compiled CSS to TypeScript declarations.
//!
//! This crate turns the output of a stylesheet compiler into `.d.ts` text
//! and a declaration map. It handles:
//! - Collecting the exported class names in discovery order
//! - Locating each name in the original stylesheet through the compiler's source map
//! - Rewriting names (`camel`, `kebab`/`param`, `dashes`, `none`)
//! - Rendering named (`export const`) or default (`Styles` interface) declarations
//! - Building a source map from declaration lines back to the stylesheet
//!
//! # Example
//!
//! ```
//! use dts_transformer::{render, transform, ExportType, NameFormat};
//!
//! let transformations = transform(".some-class { color: red; }", None, NameFormat::Camel).unwrap();
//! let rendered = render(&transformations, ExportType::Named).unwrap();
//! assert_eq!(rendered.text, "export const someClass: string;\n");
//! ```

mod declaration_map;
mod names;
mod positions;
mod render;
mod reserved;
mod tokens;
mod transform;
mod types;

pub use declaration_map::{declaration_map, map_footer};
pub use names::{transform_name, NameFormat};
pub use positions::map_positions;
pub use render::{
    render, DeclarationLine, ExportType, InvalidExportType, RenderedDeclaration,
    DEFAULT_NAME_COLUMN, NAMED_NAME_COLUMN,
};
pub use reserved::{check_name, is_reserved_word, Rejection, RejectionReason};
pub use tokens::export_tokens;
pub use transform::{transform, TransformError};
pub use types::Transformation;
