use std::collections::{BTreeMap, BTreeSet};

use quill_common::names::Name;

/// An undirected interference graph. Adjacency is kept in ordered sets so
/// that every traversal, and therefore every coloring, is deterministic.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Interference {
    pub graph: BTreeMap<Name, BTreeSet<Name>>,
}

impl Interference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Name) {
        self.graph.entry(node).or_default();
    }

    /// Add an edge between `a` and `b`. Self-loops are ignored.
    pub fn add_edge(&mut self, a: Name, b: Name) {
        if a == b {
            self.add_node(a);
            return;
        }

        self.graph.entry(a).or_default().insert(b);
        self.graph.entry(b).or_default().insert(a);
    }

    /// Make every pair of `nodes` interfere. A single node still becomes part
    /// of the graph.
    pub fn add_clique<'a>(&mut self, nodes: impl IntoIterator<Item = &'a Name>) {
        let nodes: Vec<_> = nodes.into_iter().copied().collect();

        for (i, a) in nodes.iter().enumerate() {
            self.add_node(*a);
            for b in &nodes[i + 1..] {
                self.add_edge(*a, *b);
            }
        }
    }

    /// Remove a node along with all of its edges.
    pub fn remove(&mut self, node: &Name) {
        if let Some(neighbors) = self.graph.remove(node) {
            for neighbor in neighbors {
                if let Some(adjacent) = self.graph.get_mut(&neighbor) {
                    adjacent.remove(node);
                }
            }
        }
    }

    pub fn degree(&self, node: &Name) -> usize {
        self.graph.get(node).map(BTreeSet::len).unwrap_or(0)
    }

    pub fn neighbors(&self, node: &Name) -> impl Iterator<Item = &Name> {
        self.graph.get(node).into_iter().flatten()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Name> {
        self.graph.keys()
    }

    /// Every edge once, with the smaller name first.
    pub fn edges(&self) -> impl Iterator<Item = (Name, Name)> + '_ {
        self.graph.iter().flat_map(|(a, adjacent)| {
            adjacent
                .iter()
                .filter(move |b| a < *b)
                .map(move |b| (*a, *b))
        })
    }

    pub fn contains(&self, node: &Name) -> bool {
        self.graph.contains_key(node)
    }

    pub fn interferes(&self, a: &Name, b: &Name) -> bool {
        self.graph
            .get(a)
            .map(|adjacent| adjacent.contains(b))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}
