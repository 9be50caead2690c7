//! Identifier validity for named exports.

use std::fmt;

/// ES5 keywords, literals and future reserved words, plus the words
/// reserved in strict mode code.
const ES5_STRICT: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "implements", "interface", "let",
    "package", "private", "protected", "public", "static", "yield", "eval", "arguments",
];

/// Words ES2015 adds on top of the ES5 strict set.
const ES6_STRICT: &[&str] = &["await"];

/// Returns true if `name` cannot be declared as a `const` in a module.
pub fn is_reserved_word(name: &str) -> bool {
    ES5_STRICT.contains(&name) || ES6_STRICT.contains(&name)
}

/// Why a name was left out of a named-export declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    ReservedKeyword,
    ContainsDashes,
}

/// A name that was left out of a named-export declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectionReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectionReason::ReservedKeyword => write!(
                f,
                "[SKIPPING] '{}' is a reserved keyword (consider renaming or using --exportType default).",
                self.name
            ),
            RejectionReason::ContainsDashes => write!(
                f,
                "[SKIPPING] '{}' contains dashes (consider using 'camelCase' or 'dashes' for --nameFormat or using --exportType default).",
                self.name
            ),
        }
    }
}

/// Checks a display name for use as `export const <name>`.
pub fn check_name(name: &str) -> Option<Rejection> {
    let reason = if is_reserved_word(name) {
        RejectionReason::ReservedKeyword
    } else if name.contains('-') {
        RejectionReason::ContainsDashes
    } else {
        return None;
    };

    Some(Rejection {
        name: name.to_string(),
        reason,
    })
}
