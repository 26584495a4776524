//! The tree-shaped intermediate representation consumed by register
//! allocation. Every function body is a [`Block`]: a chain of bindings
//! followed by a result expression. Conditionals are the only nodes with
//! sub-blocks.

pub use check::{check, IrError};
pub use pretty::Prettier;
pub use rename::rename_all;
pub use tree::{
    BinOp, Block, Cmp, Expr, Function, Global, Program, Statement, Unit, UnitMut,
};

mod check;
mod pretty;
mod query;
mod rename;
mod tree;
