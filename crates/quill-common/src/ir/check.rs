//! Checks the invariants earlier stages promise to the register allocator.
//! Any violation is a bug in the stage that produced the IR, so the first one
//! found is reported and nothing is repaired.

use std::collections::{HashMap, HashSet};

use log::trace;
use thiserror::Error;

use super::tree::{Block, Expr, Program, Unit};
use crate::names::{Actual, Name, Names};

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum IrError {
    #[error("`{name}` is defined more than once")]
    DuplicateDefinition { name: String },

    #[error("call to undefined function `{callee}` in `{unit}`")]
    UndefinedFunction { unit: String, callee: String },

    #[error("`{callee}` takes {expected} arguments, but `{unit}` passes {actual}")]
    ArityMismatch {
        unit: String,
        callee: String,
        expected: usize,
        actual: usize,
    },

    #[error("unbound variable `{name}` in `{unit}`")]
    UnboundVariable { unit: String, name: String },

    #[error("`{name}` is bound more than once in `{unit}`")]
    Rebound { unit: String, name: String },

    #[error("`{name}` in `{unit}` is a register, but `{unit}` has not been allocated")]
    UnexpectedRegister { unit: String, name: String },
}

pub fn check(names: &Names, program: &Program) -> Result<(), IrError> {
    let mut defined = HashSet::new();
    for name in program
        .globals
        .iter()
        .map(|global| global.name)
        .chain(program.functions.iter().map(|function| function.name))
        .chain(std::iter::once(program.entry.name))
    {
        if !defined.insert(name) {
            return Err(IrError::DuplicateDefinition {
                name: names.text(&name),
            });
        }
    }

    let arities = program
        .functions
        .iter()
        .map(|function| (function.name, function.params.len()))
        .collect();

    let globals = program.globals.iter().map(|global| global.name).collect();

    for unit in program.units() {
        let checker = Checker::new(names, &arities, &globals, &defined, unit.name);
        checker.check_unit(unit)?;
        trace!("`{}` is well-formed", names.text(&unit.name));
    }

    Ok(())
}

struct Checker<'a> {
    names: &'a Names,
    arities: &'a HashMap<Name, usize>,
    globals: &'a HashSet<Name>,
    defined: &'a HashSet<Name>,
    unit: Name,

    /// Every name bound so far in this unit.
    bound: HashSet<Name>,

    /// The names in scope, innermost last.
    scope: Vec<Name>,
}

impl<'a> Checker<'a> {
    pub fn new(
        names: &'a Names,
        arities: &'a HashMap<Name, usize>,
        globals: &'a HashSet<Name>,
        defined: &'a HashSet<Name>,
        unit: Name,
    ) -> Self {
        Self {
            names,
            arities,
            globals,
            defined,
            unit,
            bound: HashSet::new(),
            scope: Vec::new(),
        }
    }

    pub fn check_unit(mut self, unit: Unit) -> Result<(), IrError> {
        for param in unit.params {
            self.bind(*param)?;
        }

        self.check_block(unit.body)
    }

    fn check_block(&mut self, block: &Block) -> Result<(), IrError> {
        let depth = self.scope.len();

        for stmt in block.stmts.iter() {
            self.check_expr(&stmt.value)?;
            self.bind(stmt.name)?;
        }

        self.check_expr(&block.tail)?;
        self.scope.truncate(depth);

        Ok(())
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<(), IrError> {
        for name in expr.uses() {
            self.check_use(name)?;
        }

        match expr {
            Expr::Call { fun, args } => match self.arities.get(fun) {
                Some(expected) if *expected == args.len() => Ok(()),
                Some(expected) => Err(IrError::ArityMismatch {
                    unit: self.text(&self.unit),
                    callee: self.text(fun),
                    expected: *expected,
                    actual: args.len(),
                }),
                None => Err(IrError::UndefinedFunction {
                    unit: self.text(&self.unit),
                    callee: self.text(fun),
                }),
            },

            Expr::If { then, elze, .. } => {
                self.check_block(then)?;
                self.check_block(elze)
            }

            Expr::Unit
            | Expr::Int(_)
            | Expr::Var(_)
            | Expr::Neg(_)
            | Expr::Binary(..)
            | Expr::Extern { .. }
            | Expr::Tuple(_)
            | Expr::Proj(..) => Ok(()),
        }
    }

    fn check_use(&self, name: Name) -> Result<(), IrError> {
        self.check_not_register(name)?;

        if self.globals.contains(&name) || self.scope.contains(&name) {
            Ok(())
        } else {
            Err(IrError::UnboundVariable {
                unit: self.text(&self.unit),
                name: self.text(&name),
            })
        }
    }

    fn bind(&mut self, name: Name) -> Result<(), IrError> {
        if self.names.is_discard(&name) {
            return Ok(());
        }

        self.check_not_register(name)?;

        if self.defined.contains(&name) || !self.bound.insert(name) {
            return Err(IrError::Rebound {
                unit: self.text(&self.unit),
                name: self.text(&name),
            });
        }

        self.scope.push(name);
        Ok(())
    }

    fn check_not_register(&self, name: Name) -> Result<(), IrError> {
        match self.names.get(&name) {
            Actual::Register(_) => Err(IrError::UnexpectedRegister {
                unit: self.text(&self.unit),
                name: self.text(&name),
            }),
            _ => Ok(()),
        }
    }

    fn text(&self, name: &Name) -> String {
        self.names.text(name)
    }
}
