use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::MessageAdder;

const UNEXPECTED_CHAR: &str = "EL00";
const NUMBER_OUT_OF_RANGE: &str = "EL01";
const EXPECTED_ITEM: &str = "EP00";
const EXPECTED_TOKEN: &str = "EP01";
const EXPECTED_EXPR: &str = "EP02";
const EXPECTED_NAME: &str = "EP03";
const MISSING_MAIN: &str = "EP04";
const DUPLICATE_MAIN: &str = "EP05";

impl<'a> MessageAdder<'a> {
    pub fn lex_unexpected_char(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(UNEXPECTED_CHAR)
                .with_message("unexpected character")
                .with_labels(labels),
        );
    }

    pub fn lex_number_out_of_range(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("does not fit in a 64-bit signed integer")];

        self.add(
            Diagnostic::error()
                .with_code(NUMBER_OUT_OF_RANGE)
                .with_message("integer literal is out of range")
                .with_labels(labels),
        );
    }

    pub fn read_expected_item(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from(
            "an item starts with `global`, `fun` or `main`",
        )];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_ITEM)
                .with_message("expected an item")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn read_expected_token(&mut self, what: &str) {
        let labels =
            vec![Label::primary(self.at.file, self.at).with_message(format!("expected `{what}`"))];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_TOKEN)
                .with_message(format!("expected `{what}`"))
                .with_labels(labels),
        );
    }

    pub fn read_expected_expr(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("expected a literal, a name, an operation or a conditional")];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_EXPR)
                .with_message("expected an expression")
                .with_labels(labels),
        );
    }

    pub fn read_expected_name(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(EXPECTED_NAME)
                .with_message("expected a name")
                .with_labels(labels),
        );
    }

    pub fn read_missing_main(&mut self) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from("add an entry point like `main = ()`")];

        self.add(
            Diagnostic::error()
                .with_code(MISSING_MAIN)
                .with_message("program has no entry point")
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn read_duplicate_main(&mut self, previous: super::Span) {
        let labels = vec![
            Label::primary(self.at.file, self.at),
            Label::secondary(previous.file, previous).with_message("first defined here"),
        ];

        self.add(
            Diagnostic::error()
                .with_code(DUPLICATE_MAIN)
                .with_message("entry point is defined more than once")
                .with_labels(labels),
        );
    }
}
