use std::collections::HashSet;

use im::OrdSet;
use log::trace;
use quill_common::ir::{Block, Expr};
use quill_common::names::Name;

use super::interfere::Interference;

/// Analyze the liveness of one unit body. Every binding whose name is not
/// used afterwards is renamed to `discard`, and every set of names that is
/// simultaneously live becomes a clique in the returned graph.
pub fn liveness(discard: Name, globals: &HashSet<Name>, body: &mut Block) -> Liveness {
    let mut analyzer = LivenessAnalyzer::new(discard, globals);
    let live_in = analyzer.block(body, OrdSet::new());

    Liveness {
        graph: analyzer.graph,
        live_in,
        dead: analyzer.dead,
    }
}

#[derive(Debug)]
pub struct Liveness {
    pub graph: Interference,

    /// The names live when the body is entered. A parameter missing from
    /// this set is never read.
    pub live_in: OrdSet<Name>,

    /// How many bindings were renamed to the discard marker.
    pub dead: usize,
}

struct LivenessAnalyzer<'a> {
    discard: Name,
    globals: &'a HashSet<Name>,
    graph: Interference,
    dead: usize,
}

impl<'a> LivenessAnalyzer<'a> {
    pub fn new(discard: Name, globals: &'a HashSet<Name>) -> Self {
        Self {
            discard,
            globals,
            graph: Interference::new(),
            dead: 0,
        }
    }

    /// ```text
    /// live(x := e; next) = live(e, live(next)) - {x}
    /// ```
    fn block(&mut self, block: &mut Block, keep: OrdSet<Name>) -> OrdSet<Name> {
        let mut live = self.expr(&mut block.tail, keep);

        for stmt in block.stmts.iter_mut().rev() {
            if stmt.name == self.discard || !live.contains(&stmt.name) {
                if stmt.name != self.discard {
                    trace!("binding {:?} is dead", stmt.name);
                    stmt.name = self.discard;
                    self.dead += 1;
                }

                live = self.expr(&mut stmt.value, live);
                continue;
            }

            live = self.expr(&mut stmt.value, live).without(&stmt.name);
            self.graph.add_clique(&live);
        }

        live
    }

    fn expr(&mut self, expr: &mut Expr, keep: OrdSet<Name>) -> OrdSet<Name> {
        let mut live = match expr {
            Expr::If {
                left,
                right,
                then,
                elze,
                ..
            } => {
                let then = self.block(then, keep.clone());
                let elze = self.block(elze, keep);
                let mut live = then.union(elze);

                live.extend(self.locals([*left, *right]));
                live
            }

            leaf => {
                let mut live = keep;
                live.extend(self.locals(leaf.uses()));
                live
            }
        };

        live.remove(&self.discard);
        self.graph.add_clique(&live);
        live
    }

    fn locals(&self, names: impl IntoIterator<Item = Name>) -> Vec<Name> {
        names
            .into_iter()
            .filter(|name| !self.globals.contains(name))
            .collect()
    }
}
