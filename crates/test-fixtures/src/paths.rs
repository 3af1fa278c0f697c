//! In-memory bounded-hop path enumeration.

use std::collections::HashMap;

use kgsim_core::errors::BackendResult;
use kgsim_core::traits::IPathBackend;
use kgsim_core::EntityId;
use petgraph::algo::all_simple_paths;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

#[derive(Debug, Clone, Default)]
pub struct InMemoryPathBackend {
    graph: StableDiGraph<EntityId, ()>,
    node_index: HashMap<EntityId, NodeIndex>,
}

impl InMemoryPathBackend {
    pub fn from_edges(edges: &[(&str, &str)]) -> Self {
        let mut backend = Self::default();
        for (from, to) in edges {
            let f = backend.ensure_node(from);
            let t = backend.ensure_node(to);
            backend.graph.add_edge(f, t, ());
        }
        backend
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(idx) = self.node_index.get(id) {
            return *idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_index.insert(id.to_string(), idx);
        idx
    }
}

impl IPathBackend for InMemoryPathBackend {
    fn paths(
        &self,
        source: &str,
        target: &str,
        max_hops: usize,
    ) -> BackendResult<Vec<Vec<EntityId>>> {
        let (Some(&from), Some(&to)) = (self.node_index.get(source), self.node_index.get(target))
        else {
            return Ok(Vec::new());
        };
        if max_hops == 0 {
            return Ok(Vec::new());
        }
        let mut paths: Vec<Vec<EntityId>> =
            all_simple_paths::<Vec<NodeIndex>, _>(&self.graph, from, to, 0, Some(max_hops - 1))
                .map(|path| {
                    path.into_iter()
                        .filter_map(|n| self.graph.node_weight(n).cloned())
                        .collect()
                })
                .collect();
        paths.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        Ok(paths)
    }
}
