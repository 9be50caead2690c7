//! AST types for the CSS rule tree.

use smol_str::SmolStr;
use source_map::Span;

/// A parsed stylesheet.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
    /// The span of the entire stylesheet.
    pub span: Span,
}

impl Stylesheet {
    /// Iterates over every node depth-first, parents before children.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.nodes.iter()],
        }
    }

    /// Iterates over every rule depth-first in document order, including rules
    /// nested inside at-rules and inside other rules.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.descendants().filter_map(|node| match node {
            Node::Rule(rule) => Some(rule),
            _ => None,
        })
    }
}

/// A node of the rule tree.
#[derive(Debug, Clone)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(Comment),
}

impl Node {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Rule(rule) => rule.span,
            Node::AtRule(at_rule) => at_rule.span,
            Node::Declaration(decl) => decl.span,
            Node::Comment(comment) => comment.span,
        }
    }

    /// Returns the child nodes, if this node has a block.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Rule(rule) => Some(&rule.nodes),
            Node::AtRule(at_rule) => at_rule.nodes.as_deref(),
            Node::Declaration(_) | Node::Comment(_) => None,
        }
    }
}

/// A style rule: `selector { ... }`.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The selector text, trimmed.
    pub selector: SmolStr,
    /// The span of the selector text.
    pub selector_span: Span,
    /// The span of the whole rule, through the closing brace.
    pub span: Span,
    /// Declarations and nested rules.
    pub nodes: Vec<Node>,
}

/// An at-rule: `@name params;` or `@name params { ... }`.
#[derive(Debug, Clone)]
pub struct AtRule {
    /// The name without the leading `@`.
    pub name: SmolStr,
    /// The params text, trimmed.
    pub params: String,
    /// The span of the params text.
    pub params_span: Span,
    /// The span of the whole at-rule.
    pub span: Span,
    /// The block contents, if the at-rule has a block.
    pub nodes: Option<Vec<Node>>,
}

impl AtRule {
    /// Returns true for `@keyframes` and vendor-prefixed variants.
    pub fn is_keyframes(&self) -> bool {
        let name = self.name.to_ascii_lowercase();
        name == "keyframes" || (name.starts_with('-') && name.ends_with("-keyframes"))
    }
}

/// A declaration: `property: value`.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub property: SmolStr,
    pub value: String,
    pub span: Span,
}

/// A comment, including its delimiters.
#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// Depth-first iterator over the nodes of a [`Stylesheet`].
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(node) => {
                    if let Some(children) = node.children() {
                        self.stack.push(children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
