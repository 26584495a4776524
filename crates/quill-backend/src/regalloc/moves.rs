//! Reduces the number of register moves needed around calls by renaming
//! registers inside whole functions, so that arguments already sit in the
//! registers the callee expects them in.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::{debug, trace};
use quill_common::ir::{rename_all, Program};
use quill_common::names::Name;
use rand::Rng;

use super::constraint::Registers;

/// Count the call arguments that have to be moved: positions where both the
/// argument and the callee's parameter are registers, but different ones.
pub fn move_cost(registers: &Registers, program: &Program) -> usize {
    program
        .units()
        .flat_map(|unit| unit.body.calls())
        .map(|(callee, args)| {
            let Some(function) = program.function(&callee) else {
                return 0;
            };

            args.iter()
                .zip(&function.params)
                .filter(|(arg, param)| {
                    registers.contains(arg) && registers.contains(param) && arg != param
                })
                .count()
        })
        .sum()
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MoveStats {
    pub trials: usize,
    pub accepted: usize,
    pub initial_cost: usize,
    pub final_cost: usize,
}

/// The outcome of a single [`Shuffler::trial`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trial {
    /// No swap was possible.
    Skipped,
    /// The swap made things worse and was undone.
    Rejected,
    /// The swap was kept, but the cost stayed the same.
    Unchanged,
    Improved,
}

/// Randomized local search over register swaps.
pub struct Shuffler<'a, R> {
    registers: &'a Registers,
    program: &'a mut Program,
    rng: R,

    cost: usize,
    initial: usize,
    trials: usize,
    accepted: usize,
}

impl<'a, R: Rng> Shuffler<'a, R> {
    pub fn new(registers: &'a Registers, program: &'a mut Program, rng: R) -> Self {
        let cost = move_cost(registers, program);

        Self {
            registers,
            program,
            rng,

            cost,
            initial: cost,
            trials: 0,
            accepted: 0,
        }
    }

    pub fn cost(&self) -> usize {
        self.cost
    }

    /// Make trials until `patience` of them in a row fail to lower the cost.
    pub fn run(mut self, patience: usize) -> MoveStats {
        let mut misses = 0;

        while misses < patience {
            match self.trial() {
                Trial::Improved => misses = 0,
                Trial::Skipped | Trial::Rejected | Trial::Unchanged => misses += 1,
            }
        }

        debug!(
            "move cost went from {} to {} in {} trials",
            self.initial, self.cost, self.trials
        );

        MoveStats {
            trials: self.trials,
            accepted: self.accepted,
            initial_cost: self.initial,
            final_cost: self.cost,
        }
    }

    /// Swap two random registers throughout one random function, keeping the
    /// swap unless it raises the cost.
    pub fn trial(&mut self) -> Trial {
        self.trials += 1;

        let count = self.registers.len();
        if self.program.functions.is_empty() || count < 2 {
            return Trial::Skipped;
        }

        let index = self.rng.gen_range(0..self.program.functions.len());
        if self.program.functions[index].params.is_empty() {
            return Trial::Skipped;
        }

        let first = self.rng.gen_range(0..count);
        let mut second = self.rng.gen_range(0..count - 1);
        if second >= first {
            second += 1;
        }

        let a = self.registers.register(first);
        let b = self.registers.register(second);
        let swap = HashMap::from([(a, b), (b, a)]);

        self.swap(index, &swap);
        let cost = move_cost(self.registers, self.program);

        match cost.cmp(&self.cost) {
            Ordering::Greater => {
                self.swap(index, &swap);
                Trial::Rejected
            }

            Ordering::Less => {
                trace!("swapping {a:?} and {b:?} lowered the cost to {cost}");
                self.cost = cost;
                self.accepted += 1;
                Trial::Improved
            }

            Ordering::Equal => Trial::Unchanged,
        }
    }

    fn swap(&mut self, index: usize, mapping: &HashMap<Name, Name>) {
        let function = &mut self.program.functions[index];
        rename_all(mapping, &mut function.params);
        function.body.rename(mapping);
    }
}
