//! `lessc` process runner.

use crate::{CompileError, CompileOptions, CompileOutput};
use camino::{Utf8Path, Utf8PathBuf};
use std::ffi::OsString;
use std::process::Stdio;
use std::sync::Once;
use tokio::process::Command;

static ALIAS_WARNING: Once = Once::new();

/// Compiles LESS by running the `lessc` command line compiler.
#[derive(Debug, Clone)]
pub struct LesscCompiler {
    lessc_path: Utf8PathBuf,
}

impl LesscCompiler {
    /// Creates a runner for the `lessc` binary at `lessc_path`.
    pub fn new(lessc_path: Utf8PathBuf) -> Self {
        Self { lessc_path }
    }

    /// Returns the path of the `lessc` binary.
    pub fn path(&self) -> &Utf8Path {
        &self.lessc_path
    }

    /// Attempts to find `lessc` in the workspace, PATH, or common locations.
    ///
    /// Search order:
    /// 1. `node_modules/.bin/lessc` in the workspace root or any parent
    /// 2. System PATH
    /// 3. Common installation locations
    pub fn find(workspace_root: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
        if let Some(workspace) = workspace_root {
            for dir in workspace.ancestors() {
                let candidate = dir.join("node_modules/.bin/lessc");
                if candidate.exists() {
                    return Some(candidate);
                }
            }
        }

        if let Ok(path) = which::which("lessc") {
            if let Ok(utf8_path) = Utf8PathBuf::try_from(path) {
                return Some(utf8_path);
            }
        }

        let common_paths = [
            "/usr/local/bin/lessc",
            "/usr/bin/lessc",
            "~/.npm-global/bin/lessc",
        ];
        for path in common_paths {
            let expanded = shellexpand::tilde(path);
            let path = Utf8Path::new(expanded.as_ref());
            if path.exists() {
                return Some(path.to_owned());
            }
        }

        None
    }

    /// Compiles `options.filename` with `lessc`.
    ///
    /// `lessc` reads the file itself, so imports resolve relative to it.
    /// Aliases are not applied.
    pub async fn compile(&self, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
        if !options.aliases.is_empty() {
            ALIAS_WARNING.call_once(|| {
                tracing::warn!("aliases are not applied when compiling with lessc");
            });
        }

        let out_dir = tempfile::tempdir()
            .map_err(|e| CompileError::new(format!("failed to create temp directory: {e}")))?;
        let css_path = out_dir.path().join("out.css");
        let map_path = out_dir.path().join("out.css.map");

        let mut command = Command::new(&self.lessc_path);
        command.arg("--no-color");
        if options.source_map {
            let mut arg = OsString::from("--source-map=");
            arg.push(&map_path);
            command.arg(arg);
            if let Some(dir) = options.filename.parent().filter(|dir| !dir.as_str().is_empty()) {
                command.arg(format!("--source-map-basepath={dir}"));
            }
        }
        if !options.include_paths.is_empty() {
            let joined = std::env::join_paths(&options.include_paths)
                .map_err(|e| CompileError::new(format!("invalid include path: {e}")))?;
            let mut arg = OsString::from("--include-path=");
            arg.push(joined);
            command.arg(arg);
        }
        command.arg(options.filename.as_str()).arg(&css_path);

        tracing::debug!(file = %options.filename, lessc = %self.lessc_path, "running lessc");

        let output = command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CompileError::new(format!("failed to spawn lessc: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(parse_lessc_error(&stderr, &options.filename));
        }

        let css = tokio::fs::read_to_string(&css_path)
            .await
            .map_err(|e| CompileError::new(format!("failed to read lessc output: {e}")))?;
        let map = if options.source_map {
            let map = tokio::fs::read_to_string(&map_path)
                .await
                .map_err(|e| CompileError::new(format!("failed to read lessc source map: {e}")))?;
            Some(map)
        } else {
            None
        };

        Ok(CompileOutput { css, map })
    }
}

/// Parses a `lessc` error such as
/// `ParseError: Unrecognised input in /a/b.less on line 3, column 5:`.
fn parse_lessc_error(stderr: &str, fallback: &Utf8Path) -> CompileError {
    let first = stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("lessc failed");

    let Some((head, location)) = first.rsplit_once(" on line ") else {
        return CompileError {
            filename: Some(fallback.to_owned()),
            ..CompileError::new(first)
        };
    };

    let (message, filename) = match head.rsplit_once(" in ") {
        Some((message, filename)) => (message, Utf8PathBuf::from(filename)),
        None => (head, fallback.to_owned()),
    };

    let location = location.trim_end_matches(':');
    let (line, column) = match location.split_once(", column ") {
        Some((line, column)) => (line.trim().parse().ok(), column.trim().parse().ok()),
        None => (location.trim().parse().ok(), None),
    };

    CompileError {
        message: message.to_string(),
        filename: Some(filename),
        line,
        column,
    }
}
