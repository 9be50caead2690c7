//! Compile error type.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// A stylesheet failed to compile.
///
/// `line` is 1-based and `column` 0-based, the way stylesheet compilers
/// report positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    /// Human-readable description.
    pub message: String,
    /// The file the error occurred in, if known.
    pub filename: Option<Utf8PathBuf>,
    /// Line of the error, if known.
    pub line: Option<u32>,
    /// Column of the error, if known.
    pub column: Option<u32>,
}

impl CompileError {
    /// Creates an error with no location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            filename: None,
            line: None,
            column: None,
        }
    }

    /// Creates an error at a position in `filename`.
    pub fn at(message: impl Into<String>, filename: &Utf8Path, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            filename: Some(filename.to_owned()),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Formats the location as `(file[line:column])`, if a file is known.
    pub fn location(&self) -> Option<String> {
        let filename = self.filename.as_ref()?;
        Some(match (self.line, self.column) {
            (Some(line), Some(column)) => format!("({filename}[{line}:{column}])"),
            _ => format!("({filename})"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location() {
        let error = CompileError::at("Unclosed block", Utf8Path::new("a.less"), 3, 0);
        assert_eq!(error.to_string(), "Unclosed block");
        assert_eq!(error.location().as_deref(), Some("(a.less[3:0])"));
        assert_eq!(CompileError::new("boom").location(), None);
    }
}
