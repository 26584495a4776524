use std::collections::HashMap;

use super::tree::{Block, Expr, Statement};
use crate::names::Name;

impl Block {
    /// Replace every occurrence of a name in `mapping`, binding sites
    /// included. All replacements happen at once, so `{a -> b, b -> a}` swaps
    /// the two names.
    pub fn rename(&mut self, mapping: &HashMap<Name, Name>) {
        let mut worklist: Vec<&mut Block> = vec![self];

        while let Some(Block { stmts, tail }) = worklist.pop() {
            for Statement { name, value } in stmts {
                rename_name(mapping, name);
                rename_expr(mapping, value, &mut worklist);
            }

            rename_expr(mapping, tail, &mut worklist);
        }
    }
}

/// Rename the given names in place.
pub fn rename_all(mapping: &HashMap<Name, Name>, names: &mut [Name]) {
    for name in names {
        rename_name(mapping, name);
    }
}

fn rename_expr<'a>(
    mapping: &HashMap<Name, Name>,
    expr: &'a mut Expr,
    worklist: &mut Vec<&'a mut Block>,
) {
    match expr {
        Expr::Unit | Expr::Int(_) => {}
        Expr::Var(name) | Expr::Neg(name) | Expr::Proj(name, _) => rename_name(mapping, name),
        Expr::Binary(_, left, right) => {
            rename_name(mapping, left);
            rename_name(mapping, right);
        }
        Expr::Call { args, .. } | Expr::Extern { args, .. } | Expr::Tuple(args) => {
            rename_all(mapping, args)
        }
        Expr::If {
            left,
            right,
            then,
            elze,
            ..
        } => {
            rename_name(mapping, left);
            rename_name(mapping, right);
            worklist.push(&mut **then);
            worklist.push(&mut **elze);
        }
    }
}

fn rename_name(mapping: &HashMap<Name, Name>, name: &mut Name) {
    if let Some(new) = mapping.get(name) {
        *name = *new;
    }
}
