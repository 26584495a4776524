use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use quill_common::names::Name;

use super::interfere::Interference;

pub type Coloring = BTreeMap<Name, usize>;

/// Color `graph` with at most `k` colors using the Welsh-Powell heuristic:
/// visit nodes by descending degree and give each the lowest color none of
/// its colored neighbors have. Returns `None` as soon as some node has no
/// free color.
pub fn color(graph: &Interference, k: usize) -> Option<Coloring> {
    let mut order: Vec<Name> = graph.nodes().copied().collect();

    // Stable, so equal degrees stay in name order.
    order.sort_by_key(|node| Reverse(graph.degree(node)));

    let mut coloring = Coloring::new();

    for node in order {
        let taken: BTreeSet<usize> = graph
            .neighbors(&node)
            .filter_map(|neighbor| coloring.get(neighbor).copied())
            .collect();

        let color = (0..k).find(|color| !taken.contains(color))?;
        coloring.insert(node, color);
    }

    Some(coloring)
}
