//! Graph traversal over stored refs

use crate::model::Id;
use crate::store::Backend;
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// Which adjacency to follow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalDirection {
    /// Parent → children
    Refs,
    /// Child → containing composites
    InverseRefs,
}

/// Breadth-first traversal from `root`
///
/// Every id reachable from `root` (excluding `root` itself) is passed to
/// `visit` exactly once, however many paths lead to it. Returning `false`
/// from `visit` ends the traversal. The backend is asked for the neighbours
/// of each distinct id at most once.
pub fn each_transitive<B, F>(backend: &B, root: &Id, direction: TraversalDirection, mut visit: F)
where
    B: Backend + ?Sized,
    F: FnMut(Id) -> bool,
{
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(*root);
    queue.push_back(*root);

    let mut expanded = 0usize;
    while let Some(current) = queue.pop_front() {
        expanded += 1;
        let mut neighbours = Vec::new();
        let mut collect = |id: Id| {
            neighbours.push(id);
            true
        };
        match direction {
            TraversalDirection::Refs => backend.each_ref(&current, &mut collect),
            TraversalDirection::InverseRefs => backend.each_inverse_ref(&current, &mut collect),
        }

        for next in neighbours {
            if visited.insert(next) {
                if !visit(next) {
                    trace!(root = %root.short(), ?direction, expanded, "traversal stopped early");
                    return;
                }
                queue.push_back(next);
            }
        }
    }

    trace!(root = %root.short(), ?direction, expanded, "traversal complete");
}

/// Visit all descendants of `root`
pub fn each_transitive_ref<B, F>(backend: &B, root: &Id, visit: F)
where
    B: Backend + ?Sized,
    F: FnMut(Id) -> bool,
{
    each_transitive(backend, root, TraversalDirection::Refs, visit)
}

/// Visit all composites that contain `root`, directly or indirectly
pub fn each_transitive_inverse_ref<B, F>(backend: &B, root: &Id, visit: F)
where
    B: Backend + ?Sized,
    F: FnMut(Id) -> bool,
{
    each_transitive(backend, root, TraversalDirection::InverseRefs, visit)
}

/// Collect the full traversal in visit order
pub fn collect_transitive<B>(backend: &B, root: &Id, direction: TraversalDirection) -> Vec<Id>
where
    B: Backend + ?Sized,
{
    let mut out = Vec::new();
    each_transitive(backend, root, direction, |id| {
        out.push(id);
        true
    });
    out
}
