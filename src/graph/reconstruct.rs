//! Rebuilding values from stored ids

use crate::hasher::hash_value;
use crate::model::{Id, Value, Weight};
use crate::store::{Backend, EntryContent};
use crate::{Error, Result};
use std::collections::HashMap;

/// Reconstruct the value stored under `id` together with its weight
///
/// Returns `Ok(None)` for an unknown id. Every distinct id is loaded once per
/// call. Finished subtrees are moved into their parent and only copied when
/// another parent still needs them, so the cost follows the size of the
/// rebuilt value. A composite whose child is missing means the backend lost
/// part of a batch and is reported as [`Error::InvariantViolation`].
pub fn query_one_id<B>(backend: &B, id: &Id) -> Result<Option<(Value, Weight)>>
where
    B: Backend + ?Sized,
{
    let Some(root) = backend.load(id) else {
        return Ok(None);
    };
    let weight = root.weight;
    let plan = plan_rebuild(backend, id, root.content)?;

    let mut uses = plan.uses;
    let mut contents = plan.contents;
    let mut built: HashMap<Id, Value> = HashMap::with_capacity(plan.order.len());
    for current in plan.order {
        let value = match contents.remove(&current) {
            Some(EntryContent::Literal(literal)) => Value::Literal(literal),
            Some(EntryContent::Composite(children)) => {
                let mut values = Vec::with_capacity(children.len());
                for child in children {
                    values.push(take_built(&mut built, &mut uses, child)?);
                }
                Value::Composite(values)
            }
            None => {
                return Err(Error::InvariantViolation(format!(
                    "{} was scheduled twice",
                    current.short()
                )))
            }
        };
        built.insert(current, value);
    }

    let value = built
        .remove(id)
        .ok_or_else(|| Error::InvariantViolation(format!("{} was not rebuilt", id.short())))?;
    Ok(Some((value, weight)))
}

struct RebuildPlan {
    /// Distinct ids, children before parents
    order: Vec<Id>,
    contents: HashMap<Id, EntryContent>,
    /// How many parent slots in the rebuilt value each id fills
    uses: HashMap<Id, usize>,
}

fn plan_rebuild<B>(backend: &B, id: &Id, root: EntryContent) -> Result<RebuildPlan>
where
    B: Backend + ?Sized,
{
    let mut plan = RebuildPlan {
        order: Vec::new(),
        contents: HashMap::new(),
        uses: HashMap::new(),
    };
    // (id, children already scheduled)
    let mut stack = vec![(*id, false)];
    let mut first = Some(root);

    while let Some((current, scheduled)) = stack.pop() {
        if scheduled {
            plan.order.push(current);
            continue;
        }
        if plan.contents.contains_key(&current) {
            continue;
        }

        let content = match first.take() {
            Some(content) => content,
            None => {
                backend
                    .load(&current)
                    .ok_or_else(|| {
                        Error::InvariantViolation(format!("dangling ref to {}", current.short()))
                    })?
                    .content
            }
        };

        match content {
            EntryContent::Literal(literal) => {
                plan.contents.insert(current, EntryContent::Literal(literal));
                plan.order.push(current);
            }
            EntryContent::Composite(_) => {
                let mut children = Vec::new();
                backend.each_ref(&current, &mut |child| {
                    children.push(child);
                    true
                });
                for child in &children {
                    *plan.uses.entry(*child).or_insert(0) += 1;
                }
                stack.push((current, true));
                stack.extend(children.iter().rev().map(|child| (*child, false)));
                plan.contents.insert(current, EntryContent::Composite(children));
            }
        }
    }

    Ok(plan)
}

/// Hand out a finished child, moving it on its last use
fn take_built(
    built: &mut HashMap<Id, Value>,
    uses: &mut HashMap<Id, usize>,
    child: Id,
) -> Result<Value> {
    let remaining = match uses.get_mut(&child) {
        Some(count) => {
            *count = count.saturating_sub(1);
            *count
        }
        None => 0,
    };
    let value = if remaining == 0 {
        built.remove(&child)
    } else {
        built.get(&child).cloned()
    };
    value.ok_or_else(|| {
        Error::InvariantViolation(format!("child {} was not rebuilt", child.short()))
    })
}

/// Check that the value stored under `id` hashes back to `id`
///
/// Unknown ids verify as `false`.
pub fn verify<B>(backend: &B, id: &Id) -> Result<bool>
where
    B: Backend + ?Sized,
{
    Ok(match query_one_id(backend, id)? {
        Some((value, _)) => hash_value(backend.seed(), &value) == *id,
        None => false,
    })
}
