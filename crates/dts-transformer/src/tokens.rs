//! Exported token extraction.
//!
//! Every class selector in the compiled CSS is exported, in the order it is
//! first seen, except classes scoped with `:global`. Selectors inside
//! `@keyframes` are frame offsets, not classes, and are skipped.

use css_parser::{Node, Stylesheet};
use indexmap::IndexSet;

/// Collects the exported class names of `stylesheet` in discovery order.
pub fn export_tokens(stylesheet: &Stylesheet) -> IndexSet<String> {
    let mut tokens = IndexSet::new();
    collect(&stylesheet.nodes, &mut tokens);
    tokens
}

fn collect(nodes: &[Node], tokens: &mut IndexSet<String>) {
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                scan_selector(&rule.selector, tokens);
                collect(&rule.nodes, tokens);
            }
            Node::AtRule(at_rule) if at_rule.is_keyframes() => {}
            Node::AtRule(at_rule) => {
                if let Some(children) = &at_rule.nodes {
                    collect(children, tokens);
                }
            }
            Node::Declaration(_) | Node::Comment(_) => {}
        }
    }
}

/// Adds the local class names of one selector list to `tokens`.
fn scan_selector(selector: &str, tokens: &mut IndexSet<String>) {
    let chars: Vec<char> = selector.chars().collect();
    let mut i = 0;
    // Scope set by a bare `:global` / `:local` outside any parentheses.
    let mut bare_global = false;
    // Scope inside each open parenthesis.
    let mut scopes: Vec<bool> = Vec::new();

    while i < chars.len() {
        let global = scopes.last().copied().unwrap_or(bare_global);
        match chars[i] {
            '.' => {
                let (name, next) = read_ident(&chars, i + 1);
                // `.5` is a number, `.\35` is a class.
                let is_class = !name.is_empty()
                    && chars.get(i + 1).is_some_and(|first| !first.is_ascii_digit());
                if is_class && !global {
                    tokens.insert(name);
                }
                i = next.max(i + 1);
            }
            '#' => i = read_ident(&chars, i + 1).1,
            '[' => i = skip_attribute(&chars, i),
            '"' | '\'' => i = skip_string(&chars, i),
            ':' => {
                let start = if chars.get(i + 1) == Some(&':') { i + 2 } else { i + 1 };
                let (name, next) = read_ident(&chars, start);
                let scope = match name.to_ascii_lowercase().as_str() {
                    "global" => Some(true),
                    "local" => Some(false),
                    _ => None,
                };

                if chars.get(next) == Some(&'(') {
                    scopes.push(scope.unwrap_or(global));
                    i = next + 1;
                } else {
                    if let Some(scope) = scope {
                        match scopes.last_mut() {
                            Some(current) => *current = scope,
                            None => bare_global = scope,
                        }
                    }
                    i = next;
                }
            }
            '(' => {
                scopes.push(global);
                i += 1;
            }
            ')' => {
                scopes.pop();
                i += 1;
            }
            ',' if scopes.is_empty() => {
                bare_global = false;
                i += 1;
            }
            '\\' => i = read_ident(&chars, i).1.max(i + 1),
            _ => i += 1,
        }
    }
}

/// Reads an identifier starting at `i`, resolving CSS escapes.
///
/// Returns the identifier and the index just past it.
fn read_ident(chars: &[char], mut i: usize) -> (String, usize) {
    let mut name = String::new();

    while let Some(&c) = chars.get(i) {
        if c == '\\' {
            i += 1;
            let hex: String = chars[i.min(chars.len())..]
                .iter()
                .take(6)
                .take_while(|c| c.is_ascii_hexdigit())
                .collect();
            if !hex.is_empty() {
                i += hex.len();
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    name.push(ch);
                }
                if chars.get(i).is_some_and(|c| c.is_whitespace()) {
                    i += 1;
                }
            } else if let Some(&escaped) = chars.get(i) {
                name.push(escaped);
                i += 1;
            }
        } else if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            name.push(c);
            i += 1;
        } else {
            break;
        }
    }

    (name, i)
}

fn skip_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn skip_attribute(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '"' | '\'' => i = skip_string(chars, i),
            '\\' => i += 2,
            ']' => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}
