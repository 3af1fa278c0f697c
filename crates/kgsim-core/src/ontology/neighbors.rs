//! Bounded up-then-down ontology neighborhood.

use std::collections::HashSet;

use crate::models::EntityId;

/// Ancestors of `node` within `max_up` hops, plus descendants within
/// `max_down` hops of `node` or of any of those ancestors.
///
/// The result may contain `node` itself (it is a child of its own parent);
/// callers building candidate pools remove it.
pub fn ontology_neighbors<A, D, E>(
    node: &str,
    max_up: usize,
    max_down: usize,
    mut ancestors: A,
    mut descendants: D,
) -> Result<HashSet<EntityId>, E>
where
    A: FnMut(&str) -> Result<HashSet<EntityId>, E>,
    D: FnMut(&str) -> Result<HashSet<EntityId>, E>,
{
    // Step 1: parents up to `max_up` hops.
    let mut parents: HashSet<EntityId> = HashSet::new();
    let mut seeds: HashSet<EntityId> = HashSet::from([node.to_string()]);
    for _ in 0..max_up {
        let mut found = HashSet::new();
        for seed in &seeds {
            found.extend(ancestors(seed)?);
        }
        seeds = found.difference(&parents).cloned().collect();
        parents.extend(found);
        if seeds.is_empty() {
            break;
        }
    }

    // Step 2: children up to `max_down` hops from the node and its parents.
    let mut children: HashSet<EntityId> = HashSet::new();
    let mut seeds: HashSet<EntityId> = parents.clone();
    seeds.insert(node.to_string());
    for _ in 0..max_down {
        let mut found = HashSet::new();
        for seed in &seeds {
            found.extend(descendants(seed)?);
        }
        seeds = found.difference(&children).cloned().collect();
        children.extend(found);
        if seeds.is_empty() {
            break;
        }
    }

    children.extend(parents);
    Ok(children)
}
