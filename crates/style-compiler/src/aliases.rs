//! Import specifier rewriting.

use indexmap::IndexMap;

/// Rewrites `@import` specifiers before they are resolved.
///
/// Exact aliases are checked first. Otherwise the first prefix alias, in
/// insertion order, whose key starts the specifier replaces that prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
    /// Specifiers replaced as a whole.
    pub exact: IndexMap<String, String>,
    /// Specifier prefixes replaced by another prefix.
    pub prefixes: IndexMap<String, String>,
}

impl Aliases {
    /// Returns true if no aliases are configured.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefixes.is_empty()
    }

    /// Returns the rewritten specifier, or `None` if no alias applies.
    pub fn resolve(&self, specifier: &str) -> Option<String> {
        if let Some(target) = self.exact.get(specifier) {
            return Some(target.clone());
        }

        self.prefixes.iter().find_map(|(prefix, replacement)| {
            specifier
                .strip_prefix(prefix.as_str())
                .map(|rest| format!("{replacement}{rest}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> Aliases {
        let mut aliases = Aliases::default();
        aliases
            .exact
            .insert("~fancy-import".to_string(), "complex".to_string());
        aliases
            .exact
            .insert("~another".to_string(), "style".to_string());
        aliases
            .prefixes
            .insert("~".to_string(), "nested-styles/".to_string());
        aliases
            .prefixes
            .insert("~x".to_string(), "unreachable/".to_string());
        aliases
    }

    #[test]
    fn test_exact_alias_wins_over_prefix() {
        assert_eq!(aliases().resolve("~fancy-import").as_deref(), Some("complex"));
        assert_eq!(aliases().resolve("~another").as_deref(), Some("style"));
    }

    #[test]
    fn test_first_prefix_in_order_wins() {
        assert_eq!(
            aliases().resolve("~xstyle").as_deref(),
            Some("nested-styles/xstyle")
        );
    }

    #[test]
    fn test_no_alias() {
        assert_eq!(aliases().resolve("./local.less"), None);
        assert!(Aliases::default().is_empty());
        assert!(!aliases().is_empty());
    }
}
