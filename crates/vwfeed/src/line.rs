//! Output line assembly.
//!
//! The wire format parsed by the downstream learner:
//!
//! ```text
//! <label> <importance> <tag>|<ns1> <tok> <tok> |<ns2> <tok> ...
//! ```
//!
//! The label is fixed four-decimal precision, the tag (when present) sits
//! flush against the first `|`, blocks are separated by a single space
//! before each `|`, and the line carries no trailing whitespace.

use crate::token::format_fixed;

/// One namespace block: its name plus the row's tokens, in column order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceGroup<'a> {
    pub name: &'a str,
    pub tokens: Vec<String>,
}

impl<'a> NamespaceGroup<'a> {
    pub fn empty(name: &'a str) -> Self {
        Self {
            name,
            tokens: Vec::new(),
        }
    }
}

/// Assemble one grammar-conformant line (no trailing newline).
pub fn build_line(
    label: f64,
    importance: &str,
    tag: Option<&str>,
    groups: &[NamespaceGroup<'_>],
) -> String {
    let tokens_len: usize = groups
        .iter()
        .map(|g| g.name.len() + 2 + g.tokens.iter().map(|t| t.len() + 1).sum::<usize>())
        .sum();
    let mut line = String::with_capacity(16 + tokens_len);

    line.push_str(&format_fixed(label));
    line.push(' ');
    line.push_str(importance);

    // The mandatory space after the importance field is only needed when a
    // tag or a namespace region follows.
    if tag.is_some() || !groups.is_empty() {
        line.push(' ');
    }
    if let Some(tag) = tag {
        line.push_str(tag);
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push('|');
        line.push_str(group.name);
        for token in &group.tokens {
            line.push(' ');
            line.push_str(token);
        }
    }

    line
}
