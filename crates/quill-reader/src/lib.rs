//! Reads the textual form of the tree IR.
//!
//! ```text
//! global limit = 10
//!
//! fun f(a, b) =
//!   let c = sub a b in
//!   c
//!
//! main =
//!   let x = 1 in
//!   if x < limit then f(x, limit) else extern print(x)
//! ```
//!
//! Comments start with `--` and run to the end of the line.

pub mod lex;
mod parse;


use log::{debug, info};
use quill_common::ir::Program;
use quill_common::message::{File, Messages};
use quill_common::names::Names;

use lex::lex;
use parse::Parser;

/// Read a program from `src`, interning its names into `names`.
pub fn read(names: &mut Names, file: File, src: &str) -> Result<Program, Messages> {
    info!("reading file {file}");

    let mut msgs = Messages::new();
    let tokens = lex(&mut msgs, file, src);
    debug!("lexed {} tokens", tokens.len());

    let parsed = Parser::new(names, file, tokens.into_iter()).parse_program();

    match parsed {
        Ok(program) if msgs.is_empty() => Ok(program),
        Ok(_) => Err(msgs),
        Err(errs) => {
            msgs.merge(errs);
            Err(msgs)
        }
    }
}
