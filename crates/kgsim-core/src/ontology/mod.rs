//! Ontology traversal helpers expressed over one-hop edge lookups, so they
//! run unchanged against a raw backend or a cache-fronted store.

pub mod neighbors;
pub mod subsumers;

pub use neighbors::ontology_neighbors;
pub use subsumers::{ancestor_closure, most_specific_subsumers, AncestorClosure};
