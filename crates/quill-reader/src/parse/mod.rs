mod expr;
mod item;

use quill_common::ir::{Function, Global, Program};
use quill_common::message::{File, MessageAdder, Messages, Span};
use quill_common::names::{Name, Names};

use crate::lex::Token;

pub struct Parser<'a, I> {
    names: &'a mut Names,
    msgs: Messages,
    tokens: I,

    current: Option<(Token, Span)>,
    previous: Option<Span>,
    file: File,
}

impl<'a, I: Iterator<Item = (Token, Span)>> Parser<'a, I> {
    pub fn new(names: &'a mut Names, file: File, tokens: I) -> Self {
        let mut this = Self {
            names,
            msgs: Messages::new(),
            tokens,

            current: None,
            previous: None,
            file,
        };

        this.advance();
        this
    }

    /// Parse items until the tokens run out, then assemble them into a
    /// program with exactly one entry point.
    pub fn parse_program(mut self) -> Result<Program, Messages> {
        let mut globals: Vec<Global> = Vec::new();
        let mut functions: Vec<Function> = Vec::new();
        let mut entry: Option<(Function, Span)> = None;

        while self.current.is_some() {
            if let Some(skipped) = self.synchronize(|this| this.peek_item()) {
                self.at(skipped).read_expected_item();
                continue;
            }

            let opener = self.closest_span();
            match self.parse_item() {
                Some(Item::Global(global)) => globals.push(global),
                Some(Item::Function(function)) => functions.push(function),
                Some(Item::Entry(function)) => match entry {
                    Some((_, previous)) => self.at(opener).read_duplicate_main(previous),
                    None => entry = Some((function, opener)),
                },

                // Errors have been reported; resume at the next item.
                None => {
                    self.synchronize(|this| this.peek_item());
                }
            }
        }

        let span = self.closest_span();
        let Some((entry, _)) = entry else {
            self.at(span).read_missing_main();
            return Err(self.msgs);
        };

        if self.msgs.is_empty() {
            Ok(Program::new(globals, functions, entry))
        } else {
            Err(self.msgs)
        }
    }

    /// Get some span close to the current token.
    fn closest_span(&self) -> Span {
        self.current
            .as_ref()
            .map(|(_, span)| *span)
            .or(self.previous)
            .unwrap_or_else(|| Span::new(self.file, 0, 0))
    }

    /// Move the parser one token forward.
    fn advance(&mut self) {
        self.previous = self.current.take().map(|(_, span)| span);
        self.current = self.tokens.next();
    }

    /// Return the span of the current token if it matches.
    fn peek(&self, matcher: impl Matcher) -> Option<Span> {
        let (token, span) = self.current.as_ref()?;
        matcher.matches(token).then_some(*span)
    }

    /// Advance the parser and return its span if the current token matches.
    fn consume(&mut self, matcher: impl Matcher) -> Option<Span> {
        let span = self.peek(matcher)?;
        self.advance();
        Some(span)
    }

    /// Like [`Parser::consume`], but report an error naming `what` if the
    /// token is missing.
    fn expect(&mut self, matcher: impl Matcher, what: &str) -> Option<Span> {
        let span = self.consume(matcher);
        if span.is_none() {
            let at = self.closest_span();
            self.at(at).read_expected_token(what);
        }

        span
    }

    /// Consume a name token and intern it. The binder `_` is the discard
    /// marker.
    fn name(&mut self) -> Option<(Name, Span)> {
        let Some((Token::Name(text), span)) = &self.current else {
            let at = self.closest_span();
            self.at(at).read_expected_name();
            return None;
        };

        let span = *span;
        let name = if text == "_" {
            self.names.discard()
        } else {
            let text = text.clone();
            self.names.lit(text)
        };

        self.advance();
        Some((name, span))
    }

    /// Parse a parenthesized, comma separated list of names.
    fn name_list(&mut self) -> Option<Vec<Name>> {
        self.expect(Token::LeftParen, "(")?;

        let mut names = Vec::new();
        if self.consume(Token::RightParen).is_some() {
            return Some(names);
        }

        loop {
            let (name, _) = self.name()?;
            names.push(name);

            if self.consume(Token::Comma).is_none() {
                break;
            }
        }

        self.expect(Token::RightParen, ")")?;
        Some(names)
    }

    /// Skip tokens until the given function returns `true` or until there are
    /// no more tokens. Returns the span of the skipped tokens, if any.
    fn synchronize(&mut self, mut f: impl FnMut(&Self) -> bool) -> Option<Span> {
        let mut skipped: Option<Span> = None;

        while let Some((token, span)) = &self.current {
            if f(self) {
                break;
            }

            log::trace!("skipped {token:?}");

            *skipped.get_or_insert(*span) += *span;
            self.advance();
        }

        skipped
    }

    /// Produce a message adder at the given span.
    fn at(&mut self, span: Span) -> MessageAdder {
        self.msgs.at(span)
    }
}

enum Item {
    Global(Global),
    Function(Function),
    Entry(Function),
}

trait Matcher {
    fn matches(&self, token: &Token) -> bool;
}

impl Matcher for Token {
    fn matches(&self, token: &Token) -> bool {
        match (self, token) {
            (Token::Name(_), Token::Name(_)) => true,
            (Token::Number(_), Token::Number(_)) => true,

            (a, b) => a == b,
        }
    }
}

impl<const N: usize> Matcher for &[Token; N] {
    fn matches(&self, token: &Token) -> bool {
        self.iter().any(|tok| tok.matches(token))
    }
}
