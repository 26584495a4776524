use quill_common::ir::{BinOp, Block, Cmp, Expr, Statement};
use quill_common::message::Span;

use super::Parser;
use crate::lex::Token;

impl<I: Iterator<Item = (Token, Span)>> Parser<'_, I> {
    /// Parse a chain of `let NAME = expr in` bindings ending in an
    /// expression.
    pub(super) fn parse_block(&mut self) -> Option<Block> {
        let mut stmts = Vec::new();

        while self.consume(Token::Let).is_some() {
            let (name, _) = self.name()?;
            self.expect(Token::Equal, "=")?;
            let value = self.parse_expr()?;
            self.expect(Token::In, "in")?;

            stmts.push(Statement::new(name, value));
        }

        let tail = self.parse_expr()?;
        Some(Block::new(stmts, tail))
    }

    fn parse_expr(&mut self) -> Option<Expr> {
        if self.consume(Token::If).is_some() {
            self.parse_if()
        } else {
            self.parse_leaf()
        }
    }

    fn parse_if(&mut self) -> Option<Expr> {
        let (left, _) = self.name()?;
        let cmp = self.parse_cmp()?;
        let (right, _) = self.name()?;

        self.expect(Token::Then, "then")?;
        let then = Box::new(self.parse_block()?);
        self.expect(Token::Else, "else")?;
        let elze = Box::new(self.parse_block()?);

        Some(Expr::If {
            cmp,
            left,
            right,
            then,
            elze,
        })
    }

    fn parse_cmp(&mut self) -> Option<Cmp> {
        if self.consume(Token::EqualEqual).is_some() {
            Some(Cmp::Eq)
        } else if self.consume(Token::LessEqual).is_some() {
            Some(Cmp::Le)
        } else if self.consume(Token::Less).is_some() {
            Some(Cmp::Lt)
        } else {
            let span = self.closest_span();
            self.at(span).read_expected_token("<");
            None
        }
    }

    fn parse_leaf(&mut self) -> Option<Expr> {
        if let Some((Token::Number(value), _)) = &self.current {
            let value = *value;
            self.advance();
            return Some(Expr::Int(value));
        }

        if self.consume(Token::LeftParen).is_some() {
            self.expect(Token::RightParen, ")")?;
            Some(Expr::Unit)
        } else if self.consume(Token::Neg).is_some() {
            let (x, _) = self.name()?;
            Some(Expr::Neg(x))
        } else if let Some(op) = self.parse_binop() {
            let (x, _) = self.name()?;
            let (y, _) = self.name()?;
            Some(Expr::Binary(op, x, y))
        } else if self.consume(Token::Extern).is_some() {
            let (fun, _) = self.name()?;
            let args = self.name_list()?;
            Some(Expr::Extern { fun, args })
        } else if self.consume(Token::Tuple).is_some() {
            let items = self.name_list()?;
            Some(Expr::Tuple(items))
        } else if self.peek(Token::Name(String::new())).is_some() {
            self.parse_name_expr()
        } else {
            let span = self.closest_span();
            self.at(span).read_expected_expr();
            None
        }
    }

    /// Parse a variable, a projection `x.0` or a call `f(x, y)`.
    fn parse_name_expr(&mut self) -> Option<Expr> {
        let (name, _) = self.name()?;

        if self.peek(Token::LeftParen).is_some() {
            let args = self.name_list()?;
            return Some(Expr::Call { fun: name, args });
        }

        if self.consume(Token::Dot).is_some() {
            return match &self.current {
                Some((Token::Number(index), _)) if *index >= 0 => {
                    let index = *index as usize;
                    self.advance();
                    Some(Expr::Proj(name, index))
                }

                _ => {
                    let span = self.closest_span();
                    self.at(span).read_expected_token("index");
                    None
                }
            };
        }

        Some(Expr::Var(name))
    }

    fn parse_binop(&mut self) -> Option<BinOp> {
        if self.consume(Token::Add).is_some() {
            Some(BinOp::Add)
        } else if self.consume(Token::Sub).is_some() {
            Some(BinOp::Sub)
        } else if self.consume(Token::Mul).is_some() {
            Some(BinOp::Mul)
        } else if self.consume(Token::Div).is_some() {
            Some(BinOp::Div)
        } else {
            None
        }
    }
}
