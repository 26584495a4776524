use std::collections::BTreeSet;

use super::tree::{Block, Expr};
use crate::names::Name;

impl Expr {
    /// The names read directly by this node. For a conditional, these are the
    /// compared operands; names used inside the branches are not included.
    pub fn uses(&self) -> Vec<Name> {
        match self {
            Self::Unit | Self::Int(_) => Vec::new(),
            Self::Var(name) | Self::Neg(name) | Self::Proj(name, _) => vec![*name],
            Self::Binary(_, left, right) | Self::If { left, right, .. } => vec![*left, *right],
            Self::Call { args, .. } | Self::Extern { args, .. } | Self::Tuple(args) => {
                args.clone()
            }
        }
    }

    /// Returns `true` if evaluating this node may have an externally visible
    /// effect.
    pub fn has_effect(&self) -> bool {
        match self {
            Self::Call { .. } | Self::Extern { .. } => true,
            Self::If { then, elze, .. } => then.has_effect() || elze.has_effect(),
            Self::Unit
            | Self::Int(_)
            | Self::Var(_)
            | Self::Neg(_)
            | Self::Binary(..)
            | Self::Tuple(_)
            | Self::Proj(..) => false,
        }
    }

    pub fn free_vars(&self) -> BTreeSet<Name> {
        match self {
            Self::If {
                left,
                right,
                then,
                elze,
                ..
            } => {
                let mut free = then.free_vars();
                free.extend(elze.free_vars());
                free.insert(*left);
                free.insert(*right);
                free
            }

            leaf => leaf.uses().into_iter().collect(),
        }
    }
}

impl Block {
    pub fn has_effect(&self) -> bool {
        self.stmts.iter().any(|stmt| stmt.value.has_effect()) || self.tail.has_effect()
    }

    /// The names read in this block which are not bound by it.
    pub fn free_vars(&self) -> BTreeSet<Name> {
        let mut free = self.tail.free_vars();

        for stmt in self.stmts.iter().rev() {
            free.remove(&stmt.name);
            free.extend(stmt.value.free_vars());
        }

        free
    }

    /// Every direct call reachable from this block, as the callee and the
    /// actual arguments.
    pub fn calls(&self) -> Vec<(Name, &[Name])> {
        let mut calls = Vec::new();
        let mut worklist = vec![self];

        while let Some(block) = worklist.pop() {
            let exprs = block
                .stmts
                .iter()
                .map(|stmt| &stmt.value)
                .chain(std::iter::once(&block.tail));

            for expr in exprs {
                match expr {
                    Expr::Call { fun, args } => calls.push((*fun, &args[..])),
                    Expr::If { then, elze, .. } => {
                        worklist.push(then.as_ref());
                        worklist.push(elze.as_ref());
                    }
                    _ => {}
                }
            }
        }

        calls
    }
}
