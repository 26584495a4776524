use std::cmp::Reverse;

use log::trace;
use quill_common::names::Name;

use super::color::{color, Coloring};
use super::interfere::Interference;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Allocation {
    pub coloring: Coloring,

    /// Nodes that were removed from the graph, in removal order.
    pub spilled: Vec<Name>,
}

/// Color `graph` with `k` colors, spilling the node with the highest degree
/// until a coloring exists.
pub fn allocate(graph: &Interference, k: usize) -> Allocation {
    let mut graph = graph.clone();
    let mut spilled = Vec::new();

    loop {
        if let Some(coloring) = color(&graph, k) {
            return Allocation { coloring, spilled };
        }

        // `min_by_key` keeps the first of several equal keys.
        let Some(node) = graph
            .nodes()
            .copied()
            .min_by_key(|node| Reverse(graph.degree(node)))
        else {
            unreachable!("the empty graph is always colorable");
        };

        trace!("spilling {node:?} with degree {}", graph.degree(&node));

        graph.remove(&node);
        spilled.push(node);
    }
}
