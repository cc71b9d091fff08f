//! Tree walking with literal / enter / exit hooks
//!
//! Hashing, rendering, transaction building and placeholder extraction are
//! all written as [`Visitor`]s driven by [`walk`].

use crate::model::{Literal, Value};

/// Flow control returned by every visitor hook
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Keep going
    Continue,
    /// From `enter_composite`: skip the children and the matching exit.
    /// Elsewhere it behaves like `Continue`.
    SkipSubtree,
    /// Abort the whole walk
    Stop,
}

/// Hooks invoked in depth-first, left-to-right order
pub trait Visitor {
    fn visit_literal(&mut self, literal: &Literal) -> Walk;

    /// Called before the children of a composite
    fn enter_composite(&mut self, children: &[Value]) -> Walk;

    /// Called after the last child of a composite that was entered
    fn exit_composite(&mut self) -> Walk;
}

enum Step<'a> {
    Visit(&'a Value),
    Exit,
}

/// Walk a value, returning `Walk::Stop` if a hook stopped early
///
/// Uses an explicit stack, so nesting depth is bounded only by memory.
pub fn walk<V: Visitor + ?Sized>(value: &Value, visitor: &mut V) -> Walk {
    let mut stack = vec![Step::Visit(value)];

    while let Some(step) = stack.pop() {
        let signal = match step {
            Step::Visit(Value::Literal(literal)) => visitor.visit_literal(literal),
            Step::Visit(Value::Composite(children)) => {
                let signal = visitor.enter_composite(children);
                if signal == Walk::Continue {
                    stack.push(Step::Exit);
                    stack.extend(children.iter().rev().map(Step::Visit));
                }
                signal
            }
            Step::Exit => visitor.exit_composite(),
        };

        if signal == Walk::Stop {
            return Walk::Stop;
        }
    }

    Walk::Continue
}

/// Walk several top-level values in order with one visitor
pub fn walk_all<'a, V, I>(values: I, visitor: &mut V) -> Walk
where
    V: Visitor + ?Sized,
    I: IntoIterator<Item = &'a Value>,
{
    for value in values {
        if walk(value, visitor) == Walk::Stop {
            return Walk::Stop;
        }
    }
    Walk::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records hook calls as a compact trace
    struct Trace {
        events: Vec<String>,
        skip_len: Option<usize>,
        stop_at: Option<&'static str>,
    }

    impl Trace {
        fn new() -> Self {
            Trace {
                events: Vec::new(),
                skip_len: None,
                stop_at: None,
            }
        }
    }

    impl Visitor for Trace {
        fn visit_literal(&mut self, literal: &Literal) -> Walk {
            self.events.push(literal.text.clone());
            if self.stop_at == Some(literal.text.as_str()) {
                Walk::Stop
            } else {
                Walk::Continue
            }
        }

        fn enter_composite(&mut self, children: &[Value]) -> Walk {
            self.events.push("(".into());
            if self.skip_len == Some(children.len()) {
                Walk::SkipSubtree
            } else {
                Walk::Continue
            }
        }

        fn exit_composite(&mut self) -> Walk {
            self.events.push(")".into());
            Walk::Continue
        }
    }

    fn sample() -> Value {
        Value::list([
            Value::ident("a"),
            Value::list([Value::ident("b"), Value::ident("c"), Value::ident("d")]),
            Value::ident("e"),
            Value::ident("f"),
        ])
    }

    #[test]
    fn test_walk_order() {
        let mut trace = Trace::new();
        assert_eq!(walk(&sample(), &mut trace), Walk::Continue);
        assert_eq!(trace.events.join(" "), "( a ( b c d ) e f )");
    }

    #[test]
    fn test_skip_subtree_suppresses_children_and_exit() {
        let mut trace = Trace::new();
        trace.skip_len = Some(3);
        walk(&sample(), &mut trace);
        assert_eq!(trace.events.join(" "), "( a ( e f )");
    }

    #[test]
    fn test_stop_aborts_walk() {
        let mut trace = Trace::new();
        trace.stop_at = Some("c");
        assert_eq!(walk(&sample(), &mut trace), Walk::Stop);
        assert_eq!(trace.events.join(" "), "( a ( b c");
    }

    #[test]
    fn test_walk_all_visits_roots_in_order() {
        let mut trace = Trace::new();
        walk_all(&[Value::ident("x"), Value::list([])], &mut trace);
        assert_eq!(trace.events.join(" "), "x ( )");
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut value = Value::ident("leaf");
        for _ in 0..100_000 {
            value = Value::Composite(vec![value]);
        }
        let mut trace = Trace::new();
        walk(&value, &mut trace);
        assert_eq!(trace.events.len(), 200_001);
    }
}
