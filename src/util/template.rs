//! Placeholder rendering for command templates.
//!
//! Command actions are written as templates such as
//! `{cxx} {cxx_flags} -c main.cc -o build/main.o`. Every `{key}` is replaced
//! with the value of `key` from an [`Env`] when the target is declared.
//!
//! # Escaping
//!
//! `{{` and `}}` produce literal `{` and `}`, which keeps shell constructs
//! like `${HOME}` expressible as `${{HOME}}`.

use thiserror::Error;

use crate::util::config::Env;

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, with escapes already collapsed.
    Literal(String),
    /// A `{key}` reference.
    Placeholder(String),
}

/// Errors raised while parsing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed placeholder at position {0}")]
    Unclosed(usize),

    #[error("unmatched `}}` at position {0}")]
    UnmatchedClose(usize),

    #[error("empty placeholder at position {0}")]
    Empty(usize),

    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

/// Split a template into literal and placeholder segments.
pub fn parse(input: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let mut key = String::new();
                let mut closed = false;
                for (_, k) in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    if k == '{' {
                        return Err(TemplateError::Unclosed(pos));
                    }
                    key.push(k);
                }

                if !closed {
                    return Err(TemplateError::Unclosed(pos));
                }
                if key.is_empty() {
                    return Err(TemplateError::Empty(pos));
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(key));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    literal.push('}');
                } else {
                    return Err(TemplateError::UnmatchedClose(pos));
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

/// Render a template against the given environment.
pub fn render(input: &str, env: &Env) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(input.len());
    for segment in parse(input)? {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Placeholder(key) => {
                let value = env
                    .get(&key)
                    .ok_or_else(|| TemplateError::UnknownKey(key.clone()))?;
                out.push_str(value);
            }
        }
    }
    Ok(out)
}
