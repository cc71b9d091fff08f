//! Symbolic expression values

use serde::{Deserialize, Serialize};

/// Literal classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    Identifier,
    Number,
    String,
}

impl LiteralKind {
    pub fn as_byte(&self) -> u8 {
        match self {
            LiteralKind::Identifier => 0,
            LiteralKind::Number => 1,
            LiteralKind::String => 2,
        }
    }

    /// Identifiers and numbers run together when printed back to back
    pub fn is_delimitable(&self) -> bool {
        matches!(self, LiteralKind::Identifier | LiteralKind::Number)
    }
}

/// A leaf value
///
/// `text` is the literal's content: for strings this is the unescaped
/// contents without the surrounding quotes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, text: impl Into<String>) -> Self {
        Literal {
            kind,
            text: text.into(),
        }
    }

    /// The placeholder marker `?`
    pub fn is_placeholder_marker(&self) -> bool {
        self.kind == LiteralKind::Identifier && self.text == "?"
    }
}

/// A node in an expression tree: a literal, or an ordered list of children
///
/// `Clone` and `Drop` use explicit stacks, so nesting depth is bounded only
/// by memory.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Literal(Literal),
    Composite(Vec<Value>),
}

impl Value {
    pub fn ident(text: impl Into<String>) -> Self {
        Value::Literal(Literal::new(LiteralKind::Identifier, text))
    }

    pub fn number(text: impl Into<String>) -> Self {
        Value::Literal(Literal::new(LiteralKind::Number, text))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::Literal(Literal::new(LiteralKind::String, text))
    }

    pub fn list(children: impl IntoIterator<Item = Value>) -> Self {
        Value::Composite(children.into_iter().collect())
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(lit) => Some(lit),
            Value::Composite(_) => None,
        }
    }

    pub fn children(&self) -> &[Value] {
        match self {
            Value::Literal(_) => &[],
            Value::Composite(children) => children,
        }
    }

    /// Number of nodes in this tree, literals and composites alike
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(value) = pending.pop() {
            count += 1;
            pending.extend(value.children());
        }
        count
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        let root = match self {
            Value::Literal(literal) => return Value::Literal(literal.clone()),
            Value::Composite(children) => children,
        };

        // (source children, next index, copies made so far)
        let mut frames: Vec<(&[Value], usize, Vec<Value>)> =
            vec![(root.as_slice(), 0, Vec::with_capacity(root.len()))];
        while let Some(frame) = frames.last_mut() {
            let (source, next) = (frame.0, frame.1);
            frame.1 += 1;
            match source.get(next) {
                Some(Value::Literal(literal)) => frame.2.push(Value::Literal(literal.clone())),
                Some(Value::Composite(children)) => {
                    frames.push((children.as_slice(), 0, Vec::with_capacity(children.len())))
                }
                None => {
                    let copy = Value::Composite(std::mem::take(&mut frame.2));
                    frames.pop();
                    match frames.last_mut() {
                        Some(parent) => parent.2.push(copy),
                        None => return copy,
                    }
                }
            }
        }
        // The root frame returns when it runs out of children
        Value::Composite(Vec::new())
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        let Value::Composite(children) = self else {
            return;
        };
        if children.iter().all(|child| child.children().is_empty()) {
            return;
        }
        let mut pending = std::mem::take(children);
        while let Some(mut value) = pending.pop() {
            if let Value::Composite(grandchildren) = &mut value {
                pending.append(grandchildren);
            }
        }
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        Value::Literal(lit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_counts_every_node() {
        let v = Value::list([
            Value::ident("a"),
            Value::list([Value::number("1"), Value::string("s")]),
            Value::list([]),
        ]);
        assert_eq!(v.size(), 6);
        assert_eq!(Value::ident("x").size(), 1);
    }

    #[test]
    fn test_delimitable_classes() {
        assert!(LiteralKind::Identifier.is_delimitable());
        assert!(LiteralKind::Number.is_delimitable());
        assert!(!LiteralKind::String.is_delimitable());
    }

    fn chain(depth: usize) -> Value {
        let mut value = Value::ident("leaf");
        for _ in 0..depth {
            value = Value::Composite(vec![value, Value::number("0")]);
        }
        value
    }

    #[test]
    fn test_clone_matches_original() {
        let v = Value::list([
            Value::ident("a"),
            Value::list([Value::list([]), Value::string("s")]),
            Value::number("1"),
        ]);
        assert_eq!(v.clone(), v);
        assert_eq!(chain(50).clone(), chain(50));
    }

    #[test]
    fn test_deep_values_clone_and_drop_without_recursion() {
        let deep = chain(200_000);
        let copy = deep.clone();
        assert_eq!(copy.size(), deep.size());
        drop(deep);
        drop(copy);
    }

    #[test]
    fn test_value_json_shape() {
        let v = Value::list([Value::ident("a")]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"composite": [{"literal": {"kind": "identifier", "text": "a"}}]})
        );
    }
}
