//! Canonical textual rendering
//!
//! Composites print as `(`children`)`. Adjacent identifier or number
//! literals are separated by exactly one space; nothing else gets
//! whitespace. Identifiers and numbers that would not read back as the same
//! bare atom are bar quoted (`|a b|`, `#|inf|`). Rendering then parsing
//! yields the same value.
//!
//! This text is for people and files only; ids are computed by
//! [`crate::hasher`] from child ids, never from rendered text.

use crate::model::{Literal, LiteralKind, Value};
use crate::reader::is_bare_atom;
use crate::walk::{walk, Visitor, Walk};
use std::fmt;

/// Render a value in canonical form
pub fn render(value: &Value) -> String {
    let mut renderer = Renderer::default();
    walk(value, &mut renderer);
    renderer.out
}

#[derive(Default)]
struct Renderer {
    out: String,
    /// Whether the last emitted token was an identifier or number
    prev_delimitable: bool,
}

impl Visitor for Renderer {
    fn visit_literal(&mut self, literal: &Literal) -> Walk {
        let delimitable = literal.kind.is_delimitable();
        if delimitable && self.prev_delimitable {
            self.out.push(' ');
        }
        push_literal(&mut self.out, literal);
        self.prev_delimitable = delimitable;
        Walk::Continue
    }

    fn enter_composite(&mut self, _children: &[Value]) -> Walk {
        self.out.push('(');
        self.prev_delimitable = false;
        Walk::Continue
    }

    fn exit_composite(&mut self) -> Walk {
        self.out.push(')');
        self.prev_delimitable = false;
        Walk::Continue
    }
}

fn push_literal(out: &mut String, literal: &Literal) {
    if is_bare_atom(literal) {
        out.push_str(&literal.text);
        return;
    }
    match literal.kind {
        LiteralKind::String => push_quoted(out, &literal.text, '"'),
        LiteralKind::Identifier => push_quoted(out, &literal.text, '|'),
        LiteralKind::Number => {
            out.push('#');
            push_quoted(out, &literal.text, '|');
        }
    }
}

fn push_quoted(out: &mut String, text: &str, delimiter: char) {
    out.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        push_literal(&mut out, self);
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::hash_value;
    use crate::model::Seed;
    use crate::reader::parse_one;

    #[test]
    fn test_render_spacing() {
        let v = parse_one("( a   b\n c (d) \"e f\" 1 2 )").unwrap();
        assert_eq!(render(&v), "(a b c(d)\"e f\"1 2)");
    }

    #[test]
    fn test_render_keeps_adjacent_atoms_apart() {
        let v = Value::list([Value::ident("a"), Value::number("1")]);
        assert_eq!(render(&v), "(a 1)");
        assert_eq!(render(&Value::list([])), "()");
    }

    #[test]
    fn test_render_escapes_strings() {
        let v = Value::string("say \"hi\"\n\\");
        assert_eq!(v.to_string(), r#""say \"hi\"\n\\""#);
    }

    #[test]
    fn test_render_quotes_atoms_that_would_misread() {
        let v = Value::list([
            Value::ident("1"),
            Value::ident("?x"),
            Value::ident("a b"),
            Value::ident(""),
            Value::number("nan"),
            Value::ident("|"),
        ]);
        assert_eq!(render(&v), r#"(|1| |?x| |a b| || #|nan| |\||)"#);
        assert_ne!(
            render(&Value::list([Value::ident("a b")])),
            render(&Value::list([Value::ident("a"), Value::ident("b")]))
        );
    }

    #[test]
    fn test_constructed_literals_roundtrip() {
        let seed = Seed::from_bytes([3u8; 32]);
        let values = [
            Value::ident("1"),
            Value::ident("?x"),
            Value::list([Value::ident("a b"), Value::ident("")]),
            Value::list([Value::ident("x"), Value::ident("#|y"), Value::string("")]),
            Value::number("inf"),
            Value::number(""),
            Value::ident("tab\there"),
        ];
        for v in values {
            let reparsed = parse_one(&render(&v)).unwrap();
            assert_eq!(reparsed, v);
            assert_eq!(hash_value(&seed, &reparsed), hash_value(&seed, &v));
        }
    }

    #[test]
    fn test_render_parse_roundtrip_preserves_id() {
        let seed = Seed::from_bytes([3u8; 32]);
        for text in ["(define (f x) (+ x 1.5))", "(\"a b\" c \"\")", "((()))", "-7"] {
            let v = parse_one(text).unwrap();
            let reparsed = parse_one(&render(&v)).unwrap();
            assert_eq!(reparsed, v);
            assert_eq!(hash_value(&seed, &reparsed), hash_value(&seed, &v));
        }
    }
}
