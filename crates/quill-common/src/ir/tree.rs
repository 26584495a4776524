use std::collections::HashSet;

use crate::names::Name;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Program {
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,

    /// The top-level entry point, which takes no parameters.
    pub entry: Function,
}

impl Program {
    pub fn new(globals: Vec<Global>, functions: Vec<Function>, entry: Function) -> Self {
        Self {
            globals,
            functions,
            entry,
        }
    }

    pub fn function(&self, name: &Name) -> Option<&Function> {
        self.functions.iter().find(|function| &function.name == name)
    }

    /// Every name that is addressed directly rather than through a register:
    /// global variables and functions.
    pub fn global_names(&self) -> HashSet<Name> {
        self.globals
            .iter()
            .map(|global| global.name)
            .chain(self.functions.iter().map(|function| function.name))
            .chain(std::iter::once(self.entry.name))
            .collect()
    }

    /// Every allocation unit: the global initializers, the functions and the
    /// entry point.
    pub fn units(&self) -> impl Iterator<Item = Unit<'_>> {
        self.globals
            .iter()
            .map(|global| Unit {
                name: global.name,
                params: &[],
                body: &global.init,
            })
            .chain(
                self.functions
                    .iter()
                    .chain(std::iter::once(&self.entry))
                    .map(|function| Unit {
                        name: function.name,
                        params: &function.params,
                        body: &function.body,
                    }),
            )
    }

    pub fn units_mut(&mut self) -> impl Iterator<Item = UnitMut<'_>> {
        self.globals
            .iter_mut()
            .map(|global| UnitMut {
                name: global.name,
                params: Default::default(),
                body: &mut global.init,
            })
            .chain(
                self.functions
                    .iter_mut()
                    .chain(std::iter::once(&mut self.entry))
                    .map(|function| UnitMut {
                        name: function.name,
                        params: &mut function.params,
                        body: &mut function.body,
                    }),
            )
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Global {
    pub name: Name,
    pub init: Block,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Function {
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Block,
}

/// A view of one allocation unit.
#[derive(Clone, Copy, Debug)]
pub struct Unit<'a> {
    pub name: Name,
    pub params: &'a [Name],
    pub body: &'a Block,
}

#[derive(Debug)]
pub struct UnitMut<'a> {
    pub name: Name,
    pub params: &'a mut [Name],
    pub body: &'a mut Block,
}

/// A chain of bindings ending in a result. Statement `i` binds its name for
/// statements `i + 1..` and the tail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    pub stmts: Vec<Statement>,
    pub tail: Expr,
}

impl Block {
    pub fn new(stmts: Vec<Statement>, tail: Expr) -> Self {
        Self { stmts, tail }
    }
}

impl From<Expr> for Block {
    fn from(tail: Expr) -> Self {
        Self::new(Vec::new(), tail)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Statement {
    pub name: Name,
    pub value: Expr,
}

impl Statement {
    pub fn new(name: Name, value: Expr) -> Self {
        Self { name, value }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    Unit,
    Int(i64),
    Var(Name),
    Neg(Name),
    Binary(BinOp, Name, Name),

    /// A direct call of a function defined in the program.
    Call {
        fun: Name,
        args: Vec<Name>,
    },

    /// A call into the runtime.
    Extern {
        fun: Name,
        args: Vec<Name>,
    },

    Tuple(Vec<Name>),
    Proj(Name, usize),

    If {
        cmp: Cmp,
        left: Name,
        right: Name,
        then: Box<Block>,
        elze: Box<Block>,
    },
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Cmp {
    Eq,
    Le,
    Lt,
}

impl Cmp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Le => "<=",
            Self::Lt => "<",
        }
    }
}
