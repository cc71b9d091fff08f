//! S-expression reader
//!
//! Turns source text into [`Value`] trees. Whitespace and `;` line comments
//! are insignificant. A `?` at the start of an atom is read as its own
//! identifier so that `?name` yields the placeholder marker followed by the
//! name.
//!
//! Literals that cannot be written as a bare atom use bar quoting:
//! `|text|` is an identifier and `#|text|` a number, with the same
//! backslash escapes as strings plus `\|`.

use crate::model::{Literal, LiteralKind, Value};
use crate::{Error, Result};
use std::iter::Peekable;
use std::str::CharIndices;

/// Parse every top-level value in `text`
pub fn parse(text: &str) -> Result<Vec<Value>> {
    Reader::new(text).read_all()
}

/// Parse text that must hold exactly one top-level value
pub fn parse_one(text: &str) -> Result<Value> {
    let mut values = parse(text)?;
    match values.len() {
        1 => Ok(values.remove(0)),
        0 => Err(Error::parse(text.len(), "expected a value, found none")),
        n => Err(Error::parse(
            text.len(),
            format!("expected one value, found {}", n),
        )),
    }
}

struct Reader<'t> {
    text: &'t str,
    chars: Peekable<CharIndices<'t>>,
}

impl<'t> Reader<'t> {
    fn new(text: &'t str) -> Self {
        Reader {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    fn read_all(mut self) -> Result<Vec<Value>> {
        let mut roots = Vec::new();
        // Open composites: (start offset, children so far)
        let mut open: Vec<(usize, Vec<Value>)> = Vec::new();

        while let Some((offset, c)) = self.next_significant() {
            let value = match c {
                '(' => {
                    open.push((offset, Vec::new()));
                    continue;
                }
                ')' => match open.pop() {
                    Some((_, children)) => Value::Composite(children),
                    None => return Err(Error::parse(offset, "unexpected ')'")),
                },
                '"' => Value::string(self.read_delimited(offset, '"')?),
                '|' => Value::ident(self.read_delimited(offset, '|')?),
                '#' if matches!(self.chars.peek(), Some(&(_, '|'))) => {
                    self.chars.next();
                    Value::number(self.read_delimited(offset, '|')?)
                }
                '?' => Value::ident("?"),
                _ => self.read_atom(offset),
            };

            match open.last_mut() {
                Some((_, children)) => children.push(value),
                None => roots.push(value),
            }
        }

        if let Some((offset, _)) = open.last() {
            return Err(Error::parse(*offset, "unclosed '('"));
        }
        Ok(roots)
    }

    /// Next character that is not whitespace or inside a comment
    fn next_significant(&mut self) -> Option<(usize, char)> {
        while let Some((offset, c)) = self.chars.next() {
            if c.is_whitespace() {
                continue;
            }
            if c == ';' {
                for (_, c) in self.chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            return Some((offset, c));
        }
        None
    }

    /// Read up to the unescaped `close`, the opening delimiter already consumed
    fn read_delimited(&mut self, start: usize, close: char) -> Result<String> {
        let mut text = String::new();
        while let Some((offset, c)) = self.chars.next() {
            match c {
                c if c == close => return Ok(text),
                '\\' => {
                    let escaped = match self.chars.next() {
                        Some((_, '"')) => '"',
                        Some((_, '|')) => '|',
                        Some((_, '\\')) => '\\',
                        Some((_, 'n')) => '\n',
                        Some((_, 't')) => '\t',
                        Some((_, 'r')) => '\r',
                        Some((_, other)) => {
                            return Err(Error::parse(
                                offset,
                                format!("unknown escape '\\{}'", other),
                            ))
                        }
                        None => break,
                    };
                    text.push(escaped);
                }
                c => text.push(c),
            }
        }
        let what = if close == '"' { "string" } else { "'|' quoted atom" };
        Err(Error::parse(start, format!("unterminated {}", what)))
    }

    fn read_atom(&mut self, start: usize) -> Value {
        let mut end = self.text.len();
        while let Some(&(offset, c)) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';') {
                end = offset;
                break;
            }
            self.chars.next();
        }
        let atom = &self.text[start..end];
        let kind = if looks_numeric(atom) {
            LiteralKind::Number
        } else {
            LiteralKind::Identifier
        };
        Value::Literal(Literal::new(kind, atom))
    }
}

/// Whether `literal` can be printed as a bare atom that reads back unchanged
pub(crate) fn is_bare_atom(literal: &Literal) -> bool {
    let text = literal.text.as_str();
    let plain = !text.is_empty()
        && !text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';'))
        && !text.starts_with('|')
        && !text.starts_with("#|")
        && (text == "?" || !text.starts_with('?'));
    match literal.kind {
        LiteralKind::Identifier => plain && !looks_numeric(text),
        LiteralKind::Number => plain && looks_numeric(text),
        LiteralKind::String => false,
    }
}

fn looks_numeric(atom: &str) -> bool {
    let digits = atom.trim_start_matches(&['+', '-'][..]);
    let digits = digits.strip_prefix('.').unwrap_or(digits);
    digits.starts_with(|c: char| c.is_ascii_digit()) && atom.parse::<f64>().is_ok()
}
