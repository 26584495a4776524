use std::collections::HashMap;

use im::OrdSet;
use quill_common::ir::{rename_all, Block};
use quill_common::names::Name;

use super::allocation::Allocation;
use super::constraint::Registers;
use super::interfere::Interference;

/// Rewrites one unit with the registers picked for it.
pub struct Applier {
    mapping: HashMap<Name, Name>,
    discard: Name,
}

impl Applier {
    pub fn new(registers: &Registers, discard: Name, allocation: &Allocation) -> Self {
        let mapping = allocation
            .coloring
            .iter()
            .map(|(name, color)| (*name, registers.register(*color)))
            .collect();

        Self { mapping, discard }
    }

    /// Rename the parameters and the body of a unit. Parameters that are not
    /// live on entry are cleared to the discard marker first.
    pub fn apply(&self, params: &mut [Name], body: &mut Block, live_in: &OrdSet<Name>) {
        for param in params.iter_mut() {
            if !live_in.contains(param) {
                *param = self.discard;
            }
        }

        rename_all(&self.mapping, params);
        body.rename(&self.mapping);
    }

    /// Panic if two interfering names were given the same register.
    pub fn check_consistency(&self, graph: &Interference) {
        for (a, b) in graph.edges() {
            let (Some(ra), Some(rb)) = (self.mapping.get(&a), self.mapping.get(&b)) else {
                continue;
            };

            if ra == rb {
                panic!(
                    "internal compiler error: interfering {a:?} and {b:?} share register {ra:?}"
                );
            }
        }
    }
}
