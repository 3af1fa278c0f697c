//! Most-specific-subsumer resolution.
//!
//! A most specific subsumer of `c1` and `c2` is a common ancestor (reflexive,
//! transitive) that is not the direct parent of another common ancestor.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::constants::MAX_ANCESTOR_DEPTH;
use crate::models::EntityId;

/// Reflexive-transitive ancestor set of a class, with each member's direct
/// parents.
#[derive(Debug, Clone, Default)]
pub struct AncestorClosure {
    pub parents: HashMap<EntityId, HashSet<EntityId>>,
}

impl AncestorClosure {
    pub fn contains(&self, class: &str) -> bool {
        self.parents.contains_key(class)
    }

    pub fn members(&self) -> impl Iterator<Item = &EntityId> {
        self.parents.keys()
    }
}

/// Breadth-first ancestor closure of `class` (including `class` itself),
/// bounded by [`MAX_ANCESTOR_DEPTH`] hops.
pub fn ancestor_closure<F, E>(class: &str, mut ancestors: F) -> Result<AncestorClosure, E>
where
    F: FnMut(&str) -> Result<HashSet<EntityId>, E>,
{
    let mut closure = AncestorClosure::default();
    let mut queue: VecDeque<(EntityId, usize)> = VecDeque::new();
    let mut seen: HashSet<EntityId> = HashSet::new();
    seen.insert(class.to_string());
    queue.push_back((class.to_string(), 0));

    while let Some((node, depth)) = queue.pop_front() {
        let direct = if depth < MAX_ANCESTOR_DEPTH {
            ancestors(&node)?
        } else {
            HashSet::new()
        };
        for parent in &direct {
            if seen.insert(parent.clone()) {
                queue.push_back((parent.clone(), depth + 1));
            }
        }
        closure.parents.insert(node, direct);
    }
    Ok(closure)
}

/// Resolve the most specific subsumers of `c1` and `c2`.
///
/// `c1 == c2` yields `{c1}`. When one class is an ancestor of the other the
/// result is that ancestor. An empty set means the classes share no ancestor.
pub fn most_specific_subsumers<F, E>(
    c1: &str,
    c2: &str,
    mut ancestors: F,
) -> Result<HashSet<EntityId>, E>
where
    F: FnMut(&str) -> Result<HashSet<EntityId>, E>,
{
    if c1 == c2 {
        return Ok(HashSet::from([c1.to_string()]));
    }
    let left = ancestor_closure(c1, &mut ancestors)?;
    let right = ancestor_closure(c2, &mut ancestors)?;

    let common: HashSet<&EntityId> = left.members().filter(|c| right.contains(c)).collect();

    // Either side may reach a common class through a different parent chain,
    // so parents from both closures are excluded.
    let mut excluded: HashSet<&EntityId> = HashSet::new();
    for class in &common {
        for closure in [&left, &right] {
            if let Some(parents) = closure.parents.get(*class) {
                excluded.extend(parents.iter());
            }
        }
    }

    Ok(common
        .into_iter()
        .filter(|c| !excluded.contains(c))
        .cloned()
        .collect())
}
