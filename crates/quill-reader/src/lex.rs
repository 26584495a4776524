use logos::Logos;
use quill_common::message::{File, Messages, Span};

#[derive(Logos, Clone, Debug, Eq, PartialEq)]
pub enum Token {
    #[token("global")]
    Global,
    #[token("fun")]
    Fun,
    #[token("main")]
    Main,

    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("if")]
    If,
    #[token("then")]
    Then,
    #[token("else")]
    Else,

    #[token("extern")]
    Extern,
    #[token("tuple")]
    Tuple,
    #[token("neg")]
    Neg,
    #[token("add")]
    Add,
    #[token("sub")]
    Sub,
    #[token("mul")]
    Mul,
    #[token("div")]
    Div,

    #[token("==")]
    EqualEqual,
    #[token("<=")]
    LessEqual,
    #[token("<")]
    Less,

    #[token("=")]
    Equal,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_']*", |lex| lex.slice().to_string())]
    Name(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Number(i64),

    #[error]
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    #[regex(r"--[^\n\r]*", logos::skip)]
    Invalid,
}

/// Produce the tokens of `src`, reporting any invalid ones.
pub fn lex(msgs: &mut Messages, file: File, src: &str) -> Vec<(Token, Span)> {
    Token::lexer(src)
        .spanned()
        .filter_map(|(token, range)| {
            let span = Span::new(file, range.start, range.end);
            match token {
                // A number that does not fit an `i64` fails its callback.
                Token::Invalid if is_number(&src[range.clone()]) => {
                    msgs.at(span).lex_number_out_of_range();
                    None
                }

                Token::Invalid => {
                    msgs.at(span).lex_unexpected_char();
                    None
                }

                token => Some((token, span)),
            }
        })
        .collect()
}

fn is_number(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
