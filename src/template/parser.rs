//! Single-pass placeholder parser.
//!
//! Syntax: `{key}` marks a placeholder; keys are non-empty runs of ASCII
//! letters, digits, or underscore. Doubled delimiters (`{{`, `}}`) escape to a
//! literal brace. Anything else involving a brace is a syntax error.

use std::collections::BTreeSet;

use super::TemplateError;

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Literal text, with escape sequences already unescaped.
    Literal(String),
    /// A named placeholder.
    Key(String),
}

/// Parse a template into literal and placeholder segments in one traversal.
pub(crate) fn parse(template: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => key.push(ch),
                        Some(ch) => {
                            return Err(TemplateError::Syntax(format!(
                                "invalid character '{ch}' in placeholder key"
                            )))
                        }
                        None => {
                            return Err(TemplateError::Syntax(
                                "unterminated placeholder: expected '}'".to_string(),
                            ))
                        }
                    }
                }

                if key.is_empty() {
                    return Err(TemplateError::Syntax(
                        "placeholder key must not be empty".to_string(),
                    ));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Key(key));
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    literal.push('}');
                } else {
                    return Err(TemplateError::Syntax(
                        "unmatched '}' outside placeholder".to_string(),
                    ));
                }
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// The distinct keys referenced by the parsed segments.
pub(crate) fn keys_of(segments: &[Segment]) -> BTreeSet<&str> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Key(key) => Some(key.as_str()),
            Segment::Literal(_) => None,
        })
        .collect()
}
