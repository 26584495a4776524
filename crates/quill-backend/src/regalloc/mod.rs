//! Register allocation over the tree IR. Every unit (global initializer,
//! function and the entry point) is allocated on its own:
//!
//! 1. liveness analysis builds an interference graph and discards dead
//!    bindings,
//! 2. the graph is colored with one color per register, spilling nodes until
//!    a coloring exists,
//! 3. colored names are renamed to their registers.
//!
//! Once every unit is renamed, registers are shuffled within functions to
//! line up call arguments with the parameters they are passed to.

pub use allocation::{allocate, Allocation};
pub use apply::Applier;
pub use color::{color, Coloring};
pub use constraint::{Constraints, Registers, DEFAULT_PATIENCE, DEFAULT_REGISTERS};
pub use interfere::Interference;
pub use liveness::{liveness, Liveness};
pub use moves::{move_cost, MoveStats, Shuffler, Trial};

mod allocation;
mod apply;
mod color;
mod constraint;
mod interfere;
mod liveness;
mod moves;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashSet};

use log::{debug, info};
use quill_common::ir::{check, IrError, Program, UnitMut};
use quill_common::names::{Name, Names};
use rand::Rng;

/// The number of spilled variables in every unit.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SpillTable {
    counts: BTreeMap<Name, usize>,
}

impl SpillTable {
    pub fn get(&self, unit: &Name) -> Option<usize> {
        self.counts.get(unit).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &usize)> {
        self.counts.iter()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    fn insert(&mut self, unit: Name, count: usize) {
        self.counts.insert(unit, count);
    }
}

#[derive(Debug)]
pub struct Report {
    pub spills: SpillTable,

    /// Absent if the move optimizer was disabled.
    pub moves: Option<MoveStats>,
}

/// Allocate registers for every unit of `program` in place.
pub fn regalloc(
    names: &mut Names,
    constraints: &Constraints,
    rng: impl Rng,
    program: &mut Program,
) -> Result<Report, IrError> {
    check(names, program)?;

    info!(
        "allocating {} registers for {} functions and {} globals",
        constraints.registers,
        program.functions.len(),
        program.globals.len()
    );

    let registers = Registers::new(names, constraints.registers);
    let globals = program.global_names();
    let mut spills = SpillTable::default();

    for unit in program.units_mut() {
        let name = unit.name;
        let count = allocate_unit(names, &registers, &globals, unit);
        spills.insert(name, count);
    }

    info!("spilled {} variables", spills.total());

    let moves = constraints
        .shuffle
        .then(|| Shuffler::new(&registers, program, rng).run(constraints.patience));

    Ok(Report { spills, moves })
}

fn allocate_unit(
    names: &Names,
    registers: &Registers,
    globals: &HashSet<Name>,
    unit: UnitMut,
) -> usize {
    let UnitMut { name, params, body } = unit;

    let live = liveness(names.discard(), globals, body);
    let allocation = allocate(&live.graph, registers.len());

    debug!(
        "unit `{}`: {} variables, {} interferences, {} dead bindings, {} spilled",
        names.text(&name),
        live.graph.len(),
        live.graph.edges().count(),
        live.dead,
        allocation.spilled.len()
    );

    let applier = Applier::new(registers, names.discard(), &allocation);
    applier.apply(params, body, &live.live_in);
    applier.check_consistency(&live.graph);

    allocation.spilled.len()
}

/// The interference graph of one unit, along with the allocation it admits.
#[derive(Debug)]
pub struct UnitGraph {
    pub unit: Name,
    pub graph: Interference,
    pub allocation: Allocation,
}

/// Build the interference graph of every unit without changing `program`.
pub fn interference_graphs(
    names: &Names,
    constraints: &Constraints,
    program: &Program,
) -> Result<Vec<UnitGraph>, IrError> {
    check(names, program)?;

    let globals = program.global_names();
    let mut program = program.clone();

    let graphs = program
        .units_mut()
        .map(|unit| {
            let live = liveness(names.discard(), &globals, unit.body);
            let allocation = allocate(&live.graph, constraints.registers);

            UnitGraph {
                unit: unit.name,
                graph: live.graph,
                allocation,
            }
        })
        .collect();

    Ok(graphs)
}
