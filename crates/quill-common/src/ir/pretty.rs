use pretty::{Arena, DocAllocator, DocBuilder};

use super::tree::{Block, Expr, Function, Global, Program, Statement};
use crate::names::{Name, Names};

pub struct Prettier<'a> {
    names: &'a Names,
    allocator: Arena<'a>,
    width: usize,
}

impl<'a> Prettier<'a> {
    pub fn new(names: &'a Names) -> Self {
        Self {
            names,
            allocator: Arena::new(),
            width: 80,
        }
    }

    pub fn with_width(self, width: usize) -> Self {
        Self { width, ..self }
    }

    #[must_use]
    pub fn pretty_program(&'a self, program: &Program) -> String {
        self.render(self.doc_program(program))
    }

    #[must_use]
    pub fn pretty_block(&'a self, block: &Block) -> String {
        self.render(self.doc_block(block))
    }

    fn render(&'a self, doc: DocBuilder<'a, Arena<'a>>) -> String {
        let mut res = Vec::new();
        doc.render(self.width, &mut res)
            .expect("rendering into memory cannot fail");
        String::from_utf8_lossy(&res).into_owned()
    }

    fn doc_program(&'a self, program: &Program) -> DocBuilder<'a, Arena<'a>> {
        self.allocator.intersperse(
            program
                .globals
                .iter()
                .map(|global| self.doc_global(global))
                .chain(program.functions.iter().map(|fun| self.doc_function(fun)))
                .chain(std::iter::once(self.doc_entry(&program.entry))),
            self.allocator.hardline().append(self.allocator.hardline()),
        )
    }

    fn doc_global(&'a self, global: &Global) -> DocBuilder<'a, Arena<'a>> {
        self.allocator
            .text("global ")
            .append(self.doc_name(&global.name))
            .append(" =")
            .append(self.allocator.hardline().append(self.doc_block(&global.init)).nest(2))
    }

    fn doc_function(&'a self, function: &Function) -> DocBuilder<'a, Arena<'a>> {
        self.allocator
            .text("fun ")
            .append(self.doc_name(&function.name))
            .append(self.doc_args(&function.params))
            .append(" =")
            .append(
                self.allocator
                    .hardline()
                    .append(self.doc_block(&function.body))
                    .nest(2),
            )
    }

    fn doc_entry(&'a self, entry: &Function) -> DocBuilder<'a, Arena<'a>> {
        self.allocator
            .text("main =")
            .append(self.allocator.hardline().append(self.doc_block(&entry.body)).nest(2))
    }

    fn doc_block(&'a self, block: &Block) -> DocBuilder<'a, Arena<'a>> {
        self.allocator.intersperse(
            block
                .stmts
                .iter()
                .map(|stmt| self.doc_stmt(stmt))
                .chain(std::iter::once(self.doc_expr(&block.tail))),
            self.allocator.hardline(),
        )
    }

    fn doc_stmt(&'a self, stmt: &Statement) -> DocBuilder<'a, Arena<'a>> {
        self.allocator
            .text("let ")
            .append(self.doc_name(&stmt.name))
            .append(" = ")
            .append(self.doc_expr(&stmt.value).nest(2))
            .append(" in")
    }

    fn doc_expr(&'a self, expr: &Expr) -> DocBuilder<'a, Arena<'a>> {
        match expr {
            Expr::Unit => self.allocator.text("()"),
            Expr::Int(i) => self.allocator.text(format!("{i}")),
            Expr::Var(name) => self.doc_name(name),
            Expr::Neg(name) => self.allocator.text("neg ").append(self.doc_name(name)),
            Expr::Binary(op, left, right) => self
                .allocator
                .text(op.keyword())
                .append(self.allocator.space())
                .append(self.doc_name(left))
                .append(self.allocator.space())
                .append(self.doc_name(right)),
            Expr::Call { fun, args } => self.doc_name(fun).append(self.doc_args(args)),
            Expr::Extern { fun, args } => self
                .allocator
                .text("extern ")
                .append(self.doc_name(fun))
                .append(self.doc_args(args)),
            Expr::Tuple(values) => self.allocator.text("tuple").append(self.doc_args(values)),
            Expr::Proj(of, at) => self
                .doc_name(of)
                .append(self.allocator.text(format!(".{at}"))),
            Expr::If {
                cmp,
                left,
                right,
                then,
                elze,
            } => self
                .allocator
                .text("if ")
                .append(self.doc_name(left))
                .append(self.allocator.text(format!(" {} ", cmp.symbol())))
                .append(self.doc_name(right))
                .append(" then")
                .append(self.allocator.hardline().append(self.doc_block(then)).nest(2))
                .append(self.allocator.hardline())
                .append("else")
                .append(self.allocator.hardline().append(self.doc_block(elze)).nest(2)),
        }
    }

    fn doc_args(&'a self, args: &[Name]) -> DocBuilder<'a, Arena<'a>> {
        self.allocator
            .intersperse(
                args.iter().map(|arg| self.doc_name(arg)),
                self.allocator.text(", "),
            )
            .parens()
    }

    fn doc_name(&'a self, name: &Name) -> DocBuilder<'a, Arena<'a>> {
        self.allocator.text(self.names.text(name))
    }
}
