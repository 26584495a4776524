use quill_common::ir::{Function, Global};
use quill_common::message::Span;

use super::{Item, Parser};
use crate::lex::Token;

impl<I: Iterator<Item = (Token, Span)>> Parser<'_, I> {
    /// Parse a single item. Returns `None` if an error was reported.
    pub(super) fn parse_item(&mut self) -> Option<Item> {
        if self.consume(Token::Global).is_some() {
            self.parse_global()
        } else if self.consume(Token::Fun).is_some() {
            self.parse_function()
        } else if self.consume(Token::Main).is_some() {
            self.parse_entry()
        } else {
            let span = self.closest_span();
            self.at(span).read_expected_item();
            None
        }
    }

    /// Returns `true` if the next token could be the start of an item.
    pub(super) fn peek_item(&self) -> bool {
        const ITEM_STARTS: &[Token; 3] = &[Token::Global, Token::Fun, Token::Main];
        self.peek(ITEM_STARTS).is_some()
    }

    /// Parse `global NAME = block`.
    fn parse_global(&mut self) -> Option<Item> {
        let (name, _) = self.name()?;
        self.expect(Token::Equal, "=")?;
        let init = self.parse_block()?;

        Some(Item::Global(Global { name, init }))
    }

    /// Parse `fun NAME(params) = block`.
    fn parse_function(&mut self) -> Option<Item> {
        let (name, _) = self.name()?;
        let params = self.name_list()?;
        self.expect(Token::Equal, "=")?;
        let body = self.parse_block()?;

        Some(Item::Function(Function { name, params, body }))
    }

    /// Parse `main = block`.
    fn parse_entry(&mut self) -> Option<Item> {
        self.expect(Token::Equal, "=")?;
        let body = self.parse_block()?;
        let name = self.names.lit("main");

        Some(Item::Entry(Function {
            name,
            params: Vec::new(),
            body,
        }))
    }
}
