//! Exact-match queries and placeholder extraction

use crate::hasher::hash_value;
use crate::model::{Id, Literal, LiteralKind, Value, Weight};
use crate::reader::parse_one;
use crate::store::Backend;
use crate::walk::{walk, Visitor, Walk};
use crate::{Error, Result};
use serde::Serialize;

/// A stored value equal to the query
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: Id,
    pub value: Value,
    pub weight: Weight,
}

/// Outcome of [`query`]
///
/// `matches` holds at most one exact match. When there is none,
/// `placeholders` lists the `?name` placeholders found in the query in
/// first-occurrence order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub matches: Vec<Match>,
    pub placeholders: Vec<String>,
}

impl QueryResult {
    pub fn is_match(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Parse `text`, look it up by id, and fall back to placeholder extraction
pub fn query<B>(backend: &B, text: &str) -> Result<QueryResult>
where
    B: Backend + ?Sized,
{
    let value = parse_one(text).map_err(|e| Error::MalformedQuery(e.to_string()))?;
    let id = hash_value(backend.seed(), &value);

    if let Some(loaded) = backend.load(&id) {
        if loaded.weight > 0 {
            return Ok(QueryResult {
                matches: vec![Match {
                    id,
                    value,
                    weight: loaded.weight,
                }],
                placeholders: Vec::new(),
            });
        }
    }

    Ok(QueryResult {
        matches: Vec::new(),
        placeholders: placeholder_names(&value),
    })
}

/// Names introduced by the `?` marker
///
/// A name is the identifier directly after a `?` literal among the same
/// siblings, or the remainder of an identifier spelled `?name`.
pub fn placeholder_names(value: &Value) -> Vec<String> {
    let mut finder = PlaceholderFinder::default();
    walk(value, &mut finder);
    finder.names
}

#[derive(Default)]
struct PlaceholderFinder {
    names: Vec<String>,
    after_marker: bool,
}

impl PlaceholderFinder {
    fn add(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }
}

impl Visitor for PlaceholderFinder {
    fn visit_literal(&mut self, literal: &Literal) -> Walk {
        if literal.is_placeholder_marker() {
            self.after_marker = true;
            return Walk::Continue;
        }

        if literal.kind == LiteralKind::Identifier {
            if self.after_marker {
                self.add(&literal.text);
            } else if let Some(name) = literal.text.strip_prefix('?') {
                self.add(name);
            }
        }
        self.after_marker = false;
        Walk::Continue
    }

    fn enter_composite(&mut self, _children: &[Value]) -> Walk {
        self.after_marker = false;
        Walk::Continue
    }

    fn exit_composite(&mut self) -> Walk {
        self.after_marker = false;
        Walk::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Seed;
    use crate::reader::parse;
    use crate::store::MemoryBackend;
    use crate::transaction::build_transaction;

    fn setup(text: &str) -> MemoryBackend {
        let backend = MemoryBackend::with_seed(Seed::from_bytes([4u8; 32]));
        let values = parse(text).unwrap();
        backend
            .store_batch(&build_transaction(backend.seed(), &values), 1)
            .unwrap();
        backend
    }

    #[test]
    fn test_exact_match() {
        let backend = setup("(1 2 3)");
        let result = query(&backend, "( 1 2\n 3 )").unwrap();
        assert!(result.is_match());
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].weight, 1);
        assert_eq!(result.matches[0].value.to_string(), "(1 2 3)");
        assert!(result.placeholders.is_empty());
    }

    #[test]
    fn test_subtree_match() {
        let backend = setup("(outer (inner 1))");
        let result = query(&backend, "(inner 1)").unwrap();
        assert_eq!(result.matches.len(), 1);
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let backend = setup("(1 2 3)");
        let result = query(&backend, "(9 9 9)").unwrap();
        assert!(result.matches.is_empty());
        assert!(result.placeholders.is_empty());
    }

    #[test]
    fn test_placeholders_are_extracted() {
        let backend = setup("(parent alice bob)");
        let result = query(&backend, "(parent ?x (pair ?y ?x) ? \"s\" ?)").unwrap();
        assert!(result.matches.is_empty());
        assert_eq!(result.placeholders, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_marker_does_not_cross_composite_boundary() {
        let v = parse_one("(a ? (b) c)").unwrap();
        assert!(placeholder_names(&v).is_empty());
    }

    #[test]
    fn test_spelled_placeholder_identifier() {
        let v = Value::list([Value::ident("f"), Value::ident("?arg")]);
        assert_eq!(placeholder_names(&v), vec!["arg".to_string()]);
    }

    #[test]
    fn test_malformed_query() {
        let backend = setup("(a)");
        assert!(matches!(query(&backend, "(a"), Err(Error::MalformedQuery(_))));
        assert!(matches!(query(&backend, ""), Err(Error::MalformedQuery(_))));
        assert!(matches!(query(&backend, "a b"), Err(Error::MalformedQuery(_))));
    }
}
