use quill_backend::regalloc::UnitGraph;
use quill_common::names::{Name, Names};

/// All interference graphs of a program as one undirected GraphViz graph.
/// Nodes are labelled with their unit, their name and the register they
/// would get.
pub struct GraphViz<'a> {
    names: &'a Names,
    nodes: Vec<Node>,
    edges: Vec<(usize, usize)>,
}

struct Node {
    unit: Name,
    name: Name,
    color: Option<usize>,
}

impl<'a> GraphViz<'a> {
    pub fn new(names: &'a Names, graphs: &[UnitGraph]) -> Self {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        for unit in graphs {
            let offset = nodes.len();
            let ids: Vec<_> = unit.graph.nodes().copied().collect();

            nodes.extend(ids.iter().map(|name| Node {
                unit: unit.unit,
                name: *name,
                color: unit.allocation.coloring.get(name).copied(),
            }));

            for (a, b) in unit.graph.edges() {
                let find = |name| ids.iter().position(|id| *id == name);
                if let (Some(a), Some(b)) = (find(a), find(b)) {
                    edges.push((offset + a, offset + b));
                }
            }
        }

        Self {
            names,
            nodes,
            edges,
        }
    }

    pub fn render<W: std::io::Write>(&self, output: &mut W) -> dot2::Result {
        dot2::render(self, output)
    }
}

impl<'a> dot2::Labeller<'a> for GraphViz<'a> {
    type Node = usize;
    type Edge = (usize, usize);
    type Subgraph = ();

    fn graph_id(&'a self) -> dot2::Result<dot2::Id<'a>> {
        dot2::Id::new("interference")
    }

    fn node_id(&'a self, n: &Self::Node) -> dot2::Result<dot2::Id<'a>> {
        dot2::Id::new(format!("N{n}"))
    }

    fn node_label(&'a self, n: &Self::Node) -> dot2::Result<dot2::label::Text<'a>> {
        let node = &self.nodes[*n];
        let place = match node.color {
            Some(color) => format!("%r{color}"),
            None => String::from("spilled"),
        };

        Ok(dot2::label::Text::LabelStr(
            format!(
                "{}: {} ({place})",
                self.names.text(&node.unit),
                self.names.text(&node.name)
            )
            .into(),
        ))
    }

    fn kind(&self) -> dot2::Kind {
        dot2::Kind::Graph
    }
}

impl<'a> dot2::GraphWalk<'a> for GraphViz<'a> {
    type Node = usize;
    type Edge = (usize, usize);
    type Subgraph = ();

    fn nodes(&'a self) -> dot2::Nodes<'a, Self::Node> {
        (0..self.nodes.len()).collect()
    }

    fn edges(&'a self) -> dot2::Edges<'a, Self::Edge> {
        (&self.edges[..]).into()
    }

    fn source(&'a self, edge: &Self::Edge) -> Self::Node {
        edge.0
    }

    fn target(&'a self, edge: &Self::Edge) -> Self::Node {
        edge.1
    }
}
