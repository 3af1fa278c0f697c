use std::collections::{HashMap, HashSet};
use std::convert::Infallible;

use kgsim_core::models::{ClassCount, ClassMembership};
use kgsim_core::ontology::{ancestor_closure, most_specific_subsumers};
use proptest::prelude::*;

/// Random DAG over `n` classes: class `i` may only have parents `j < i`, so
/// class 0 is the only guaranteed root.
fn arb_ontology() -> impl Strategy<Value = HashMap<String, HashSet<String>>> {
    (2usize..12).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n).prop_map(
            move |matrix| {
                let mut parents: HashMap<String, HashSet<String>> = HashMap::new();
                for (i, row) in matrix.iter().enumerate() {
                    let entry = parents.entry(format!("c{i}")).or_default();
                    for (j, &edge) in row.iter().enumerate().take(i) {
                        if edge {
                            entry.insert(format!("c{j}"));
                        }
                    }
                    // Keep every non-root class connected.
                    if i > 0 && entry.is_empty() {
                        entry.insert(format!("c{}", i - 1));
                    }
                }
                parents
            },
        )
    })
}

fn lookup(
    onto: &HashMap<String, HashSet<String>>,
) -> impl FnMut(&str) -> Result<HashSet<String>, Infallible> + '_ {
    move |c| Ok(onto.get(c).cloned().unwrap_or_default())
}

// ── Subsumers ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn subsumers_are_common_ancestors(onto in arb_ontology(), a in 0usize..12, b in 0usize..12) {
        let n = onto.len();
        let (a, b) = (format!("c{}", a % n), format!("c{}", b % n));
        let mss = most_specific_subsumers(&a, &b, lookup(&onto)).unwrap();
        let left = ancestor_closure(&a, lookup(&onto)).unwrap();
        let right = ancestor_closure(&b, lookup(&onto)).unwrap();
        for s in &mss {
            prop_assert!(left.contains(s) && right.contains(s));
        }
    }

    #[test]
    fn connected_dag_always_has_a_subsumer(onto in arb_ontology(), a in 0usize..12, b in 0usize..12) {
        let n = onto.len();
        let (a, b) = (format!("c{}", a % n), format!("c{}", b % n));
        let mss = most_specific_subsumers(&a, &b, lookup(&onto)).unwrap();
        prop_assert!(!mss.is_empty());
    }

    #[test]
    fn subsumers_are_symmetric(onto in arb_ontology(), a in 0usize..12, b in 0usize..12) {
        let n = onto.len();
        let (a, b) = (format!("c{}", a % n), format!("c{}", b % n));
        let ab = most_specific_subsumers(&a, &b, lookup(&onto)).unwrap();
        let ba = most_specific_subsumers(&b, &a, lookup(&onto)).unwrap();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn no_subsumer_is_a_parent_of_another(onto in arb_ontology(), a in 0usize..12, b in 0usize..12) {
        let n = onto.len();
        let (a, b) = (format!("c{}", a % n), format!("c{}", b % n));
        let mss = most_specific_subsumers(&a, &b, lookup(&onto)).unwrap();
        for s in &mss {
            let parents = onto.get(s).cloned().unwrap_or_default();
            for t in &mss {
                prop_assert!(!parents.contains(t));
            }
        }
    }
}

// ── Compact class membership ─────────────────────────────────────────────

fn arb_membership() -> impl Strategy<Value = ClassMembership> {
    proptest::collection::vec(("Q[1-9][0-9]{0,5}", 0u64..10_000_000), 0..20).prop_map(|items| {
        ClassMembership::new(
            items
                .into_iter()
                .map(|(class, count)| ClassCount { class, count })
                .collect(),
        )
    })
}

proptest! {
    #[test]
    fn compact_form_reparses_to_same_membership(m in arb_membership()) {
        prop_assert_eq!(ClassMembership::parse_compact(&m.to_compact()), m);
    }

    #[test]
    fn parsing_arbitrary_text_never_panics(s in ".{0,200}") {
        let m = ClassMembership::parse_compact(&s);
        prop_assert!(m.len() <= s.len());
    }
}
