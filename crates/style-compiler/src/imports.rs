//! `@import` specifier extraction and file resolution.

use crate::CompileOptions;
use camino::{Utf8Path, Utf8PathBuf};

/// Extracts the imported specifier from `@import` params.
///
/// Handles LESS import options (`(reference) "x"`), `url(...)` and trailing
/// media queries.
pub(crate) fn import_specifier(params: &str) -> Option<&str> {
    let mut rest = params.trim();

    if rest.starts_with('(') {
        rest = rest[rest.find(')')? + 1..].trim_start();
    }
    if let Some(inner) = rest.strip_prefix("url(") {
        rest = inner[..inner.find(')')?].trim();
    }

    let quote = rest.chars().next()?;
    if quote == '"' || quote == '\'' {
        let body = &rest[1..];
        return Some(&body[..body.find(quote)?]);
    }

    rest.split_whitespace().next()
}

/// Returns true for imports that must stay as `@import` in the output.
pub(crate) fn is_remote(specifier: &str) -> bool {
    specifier.starts_with("http://")
        || specifier.starts_with("https://")
        || specifier.starts_with("//")
}

/// Resolves an import specifier written in `importer` to an existing file.
///
/// The specifier is rewritten by the configured aliases first. A leading `~`
/// resolves through `node_modules` directories above the importer. Relative
/// specifiers are tried against the importer's directory, then each include
/// path. Specifiers without a stylesheet extension also try `.less` and `.css`.
pub(crate) fn resolve_import(
    specifier: &str,
    importer: &Utf8Path,
    options: &CompileOptions,
) -> Option<Utf8PathBuf> {
    let specifier = options
        .aliases
        .resolve(specifier)
        .unwrap_or_else(|| specifier.to_string());
    let base = importer.parent().unwrap_or(Utf8Path::new(""));

    let mut candidates = Vec::new();
    if let Some(module) = specifier.strip_prefix('~') {
        for dir in base.ancestors() {
            candidates.push(dir.join("node_modules").join(module));
        }
    } else {
        let path = Utf8Path::new(&specifier);
        if path.is_absolute() {
            candidates.push(path.to_owned());
        } else {
            candidates.push(base.join(path));
            candidates.extend(options.include_paths.iter().map(|dir| dir.join(path)));
        }
    }

    candidates
        .into_iter()
        .flat_map(with_extensions)
        .find(|candidate| candidate.is_file())
}

fn with_extensions(path: Utf8PathBuf) -> Vec<Utf8PathBuf> {
    match path.extension() {
        Some("less" | "css") => vec![path],
        _ => vec![
            Utf8PathBuf::from(format!("{path}.less")),
            Utf8PathBuf::from(format!("{path}.css")),
            path,
        ],
    }
}
