//! Stylesheet compilers for typed-less-modules-rs.
//!
//! A compiler turns stylesheet source into plain CSS plus a v3 source map
//! pointing back at the original files. Two backends are available:
//!
//! - the native compiler, which validates plain CSS and inlines local
//!   `@import`s (with alias rewriting), without spawning anything
//! - `lessc`, the LESS reference compiler, run as a child process
//!
//! [`Compiler`] picks a backend per file according to a [`CompilerKind`].
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8PathBuf;
//! use style_compiler::{CompileOptions, Compiler, CompilerKind};
//!
//! # async fn run() -> Result<(), style_compiler::CompileError> {
//! let compiler = Compiler::new(CompilerKind::Auto, &Utf8PathBuf::from("."))?;
//! let options = CompileOptions::new(Utf8PathBuf::from("src/button.less"));
//! let source = std::fs::read_to_string(&options.filename).unwrap_or_default();
//! let output = compiler.compile(&source, &options).await?;
//! println!("{}", output.css);
//! # Ok(())
//! # }
//! ```

mod aliases;
mod error;
mod imports;
mod lessc;
mod native;

pub use aliases::Aliases;
pub use error::CompileError;
pub use lessc::LesscCompiler;
pub use native::NativeCompiler;

use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Once;

static NATIVE_LESS_WARNING: Once = Once::new();

/// Options for compiling one stylesheet.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Path of the stylesheet being compiled.
    pub filename: Utf8PathBuf,
    /// Import specifier rewrites.
    pub aliases: Aliases,
    /// Extra directories searched for imports.
    pub include_paths: Vec<Utf8PathBuf>,
    /// Whether to produce a source map.
    pub source_map: bool,
}

impl CompileOptions {
    /// Creates options for `filename` with source maps enabled.
    pub fn new(filename: Utf8PathBuf) -> Self {
        Self {
            filename,
            source_map: true,
            ..Default::default()
        }
    }
}

/// The result of compiling a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// The compiled CSS.
    pub css: String,
    /// The source map for `css`, as JSON.
    pub map: Option<String>,
}

/// Which backend compiles stylesheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CompilerKind {
    /// `lessc` for `.less` files when it can be found, native otherwise.
    #[default]
    Auto,
    /// Always the native compiler.
    Native,
    /// Always `lessc`.
    Lessc,
}

/// Compiles stylesheets with the backend chosen by a [`CompilerKind`].
#[derive(Debug, Clone)]
pub struct Compiler {
    kind: CompilerKind,
    lessc: Option<LesscCompiler>,
}

impl Compiler {
    /// Creates a compiler that only uses the native backend.
    pub fn native() -> Self {
        Self {
            kind: CompilerKind::Native,
            lessc: None,
        }
    }

    /// Creates a compiler, locating `lessc` from `workspace_root` when the kind needs it.
    ///
    /// Fails only for [`CompilerKind::Lessc`] when `lessc` cannot be found.
    pub fn new(kind: CompilerKind, workspace_root: &Utf8Path) -> Result<Self, CompileError> {
        let lessc = match kind {
            CompilerKind::Native => None,
            CompilerKind::Auto => LesscCompiler::find(Some(workspace_root)).map(LesscCompiler::new),
            CompilerKind::Lessc => {
                let path = LesscCompiler::find(Some(workspace_root)).ok_or_else(|| {
                    CompileError::new("lessc not found - install `less` or use --compiler native")
                })?;
                Some(LesscCompiler::new(path))
            }
        };

        if kind == CompilerKind::Auto && lessc.is_none() {
            tracing::debug!("lessc not found, .less files use the native compiler");
        }

        Ok(Self { kind, lessc })
    }

    /// Returns the kind this compiler was created with.
    pub fn kind(&self) -> CompilerKind {
        self.kind
    }

    /// Compiles `source`, the contents of `options.filename`.
    pub async fn compile(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompileOutput, CompileError> {
        if let Some(lessc) = self.lessc_for(&options.filename) {
            return lessc.compile(options).await;
        }

        if self.kind == CompilerKind::Auto && options.filename.extension() == Some("less") {
            NATIVE_LESS_WARNING.call_once(|| {
                tracing::warn!(
                    "lessc not found, compiling .less files natively (LESS-only syntax is not supported)"
                );
            });
        }

        let source = source.to_owned();
        let options = options.clone();
        tokio::task::spawn_blocking(move || NativeCompiler.compile(&source, &options))
            .await
            .map_err(|e| CompileError::new(format!("native compiler task failed: {e}")))?
    }

    fn lessc_for(&self, filename: &Utf8Path) -> Option<&LesscCompiler> {
        match self.kind {
            CompilerKind::Native => None,
            CompilerKind::Lessc => self.lessc.as_ref(),
            CompilerKind::Auto => self
                .lessc
                .as_ref()
                .filter(|_| filename.extension() == Some("less")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_never_uses_lessc() {
        let compiler = Compiler::native();
        assert_eq!(compiler.kind(), CompilerKind::Native);
        assert!(compiler.lessc_for(Utf8Path::new("a.less")).is_none());
    }

    #[test]
    fn test_auto_uses_lessc_only_for_less_files() {
        let compiler = Compiler {
            kind: CompilerKind::Auto,
            lessc: Some(LesscCompiler::new(Utf8PathBuf::from("/bin/lessc"))),
        };
        assert!(compiler.lessc_for(Utf8Path::new("a.less")).is_some());
        assert!(compiler.lessc_for(Utf8Path::new("a.css")).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_compiler_kind_deserializes_lowercase() {
        let kind: CompilerKind = serde_json::from_str("\"lessc\"").unwrap();
        assert_eq!(kind, CompilerKind::Lessc);
    }

    #[tokio::test]
    async fn test_auto_without_lessc_compiles_less_natively() {
        let compiler = Compiler {
            kind: CompilerKind::Auto,
            lessc: None,
        };
        let options = CompileOptions::new(Utf8PathBuf::from("inline.less"));
        let output = compiler
            .compile("// it's a comment\n.a { color: red; }\n", &options)
            .await
            .unwrap();
        assert!(output.css.ends_with(".a { color: red; }\n"));
        assert!(!output.css.contains("it's"));
    }

    #[tokio::test]
    async fn test_compile_native_inline_source() {
        let options = CompileOptions::new(Utf8PathBuf::from("inline.css"));
        let output = Compiler::native()
            .compile(".a { color: red; }\n", &options)
            .await
            .unwrap();
        assert_eq!(output.css, ".a { color: red; }\n");
        assert!(output.map.is_some());
    }
}
