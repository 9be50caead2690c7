//! Token name formats.

/// How token names are rewritten before they are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum NameFormat {
    /// `some-class` becomes `someClass`.
    #[default]
    Camel,
    /// `someClass` becomes `some-class`.
    Kebab,
    /// Same as [`NameFormat::Kebab`].
    Param,
    /// Camel case, but only for names containing a dash.
    Dashes,
    /// Names are kept as written.
    None,
}

/// Rewrites a raw token name according to `format`.
pub fn transform_name(raw: &str, format: NameFormat) -> String {
    match format {
        NameFormat::Camel => camel_case(raw),
        NameFormat::Kebab | NameFormat::Param => param_case(raw),
        NameFormat::Dashes if raw.contains('-') => camel_case(raw),
        NameFormat::Dashes | NameFormat::None => raw.to_string(),
    }
}

fn camel_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, word) in split_words(raw).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

fn param_case(raw: &str) -> String {
    split_words(raw)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Splits on separators and case boundaries: `XMLHttp-request_v2` gives
/// `XML`, `Http`, `request`, `v2`.
fn split_words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '_' | '.') || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
