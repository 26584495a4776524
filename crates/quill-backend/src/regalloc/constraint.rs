use std::collections::HashMap;

use quill_common::names::{Name, Names};

pub const DEFAULT_REGISTERS: usize = 24;
pub const DEFAULT_PATIENCE: usize = 1000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Constraints {
    /// The number of physical registers available to every unit.
    pub registers: usize,

    /// How many non-improving trials the move optimizer makes before it gives
    /// up.
    pub patience: usize,

    /// Whether to run the move optimizer at all.
    pub shuffle: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            registers: DEFAULT_REGISTERS,
            patience: DEFAULT_PATIENCE,
            shuffle: true,
        }
    }
}

/// The physical registers `%r0 .. %r{k-1}`, interned once per session.
#[derive(Debug)]
pub struct Registers {
    names: Vec<Name>,
    index: HashMap<Name, usize>,
}

impl Registers {
    pub fn new(names: &mut Names, count: usize) -> Self {
        let names: Vec<_> = (0..count).map(|i| names.register(i)).collect();
        let index = names.iter().enumerate().map(|(i, name)| (*name, i)).collect();

        Self { names, index }
    }

    /// The register for `color`, which must be below the register count.
    pub fn register(&self, color: usize) -> Name {
        self.names[color]
    }

    pub fn index_of(&self, name: &Name) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Name> + '_ {
        self.names.iter().copied()
    }
}
