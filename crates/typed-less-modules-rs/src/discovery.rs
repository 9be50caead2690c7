//! Stylesheet discovery.

use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;
use walkdir::WalkDir;

/// Discovery errors.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The pattern is not a valid glob.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },
}

/// The stylesheets selected by a command line pattern.
///
/// A directory selects every `.less` and `.css` file below it, a file selects
/// itself, anything else is a glob.
#[derive(Debug, Clone)]
pub struct FilePattern {
    /// Directory the walk starts from.
    base: Utf8PathBuf,
    matcher: GlobMatcher,
    /// Used to match absolute paths against relative patterns.
    cwd: Option<Utf8PathBuf>,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self, DiscoveryError> {
        let pattern = strip_current_dir(pattern);
        let path = Utf8Path::new(pattern);
        let (base, glob) = if pattern.is_empty() {
            (Utf8PathBuf::new(), "**/*.{less,css}".to_string())
        } else if path.is_dir() {
            let dir = pattern.trim_end_matches('/');
            (
                Utf8PathBuf::from(dir),
                format!("{}/**/*.{{less,css}}", globset::escape(dir)),
            )
        } else if path.is_file() {
            (
                path.parent().unwrap_or(Utf8Path::new(".")).to_owned(),
                globset::escape(pattern),
            )
        } else {
            (literal_base(pattern), pattern.to_string())
        };

        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .build()
            .map_err(|source| DiscoveryError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            })?
            .compile_matcher();

        let cwd = std::env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::try_from(dir).ok());

        Ok(Self { base, matcher, cwd })
    }

    /// Returns the directory to watch and walk.
    pub fn base(&self) -> &Utf8Path {
        if self.base.as_str().is_empty() {
            Utf8Path::new(".")
        } else {
            &self.base
        }
    }

    /// Returns true if `path` is selected by the pattern.
    pub fn matches(&self, path: &Utf8Path) -> bool {
        if self.matcher.is_match(path) {
            return true;
        }
        self.cwd
            .as_deref()
            .and_then(|cwd| path.strip_prefix(cwd).ok())
            .is_some_and(|relative| self.matcher.is_match(relative))
    }

    /// Lists the selected files, sorted, skipping `node_modules`.
    pub fn files(&self) -> Vec<Utf8PathBuf> {
        let base = self.base();
        let mut files: Vec<Utf8PathBuf> = WalkDir::new(base)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != "node_modules")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| Utf8PathBuf::try_from(entry.into_path()).ok())
            .map(|path| {
                if self.base.as_str().is_empty() {
                    path.strip_prefix(".").map(Utf8Path::to_owned).unwrap_or(path)
                } else {
                    path
                }
            })
            .filter(|path| self.matcher.is_match(path))
            .collect();

        files.sort();
        files.dedup();
        files
    }
}

/// Drops leading `./` components; `.` itself becomes the empty pattern.
///
/// Watch events carry absolute paths, which are matched after stripping the
/// working directory, so a `./` prefix would never match them.
fn strip_current_dir(pattern: &str) -> &str {
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest.trim_start_matches('/');
    }
    if pattern == "." {
        ""
    } else {
        pattern
    }
}

/// Returns the leading path components of `pattern` that contain no glob
/// syntax.
fn literal_base(pattern: &str) -> Utf8PathBuf {
    let mut base = Utf8PathBuf::new();
    for component in Utf8Path::new(pattern).components() {
        if component.as_str().contains(['*', '?', '[', '{']) {
            break;
        }
        base.push(component);
    }

    // The last component is a file name, not a directory.
    if base.as_str() == pattern {
        base.pop();
    }
    base
}
