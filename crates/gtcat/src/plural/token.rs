//! Tokenizer for plural-form expressions.

use winnow::ascii::digit1;
use winnow::combinator::alt;
use winnow::prelude::*;
use winnow::token::take_while;

use super::ast::BinaryOp;
use super::error::ExpressionError;

/// A lexical token of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Variable,
    Number(i64),
    Not,
    Binary(BinaryOp),
    OpenParen,
    CloseParen,
    Question,
    Colon,
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Split an expression into tokens, skipping whitespace.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ExpressionError> {
    let mut input = source;
    let mut tokens = Vec::new();

    loop {
        // Whitespace never fails to parse; zero-width is fine.
        let _ = ws(&mut input);
        let Some(next) = input.chars().next() else {
            break;
        };
        let position = source.len() - input.len();

        if next.is_ascii_digit() {
            let digits = number(&mut input).map_err(|_| ExpressionError::InvalidCharacter {
                position,
                character: next,
            })?;
            let value = digits.parse::<i64>().map_err(|_| {
                ExpressionError::malformed(format!("integer literal '{digits}' is out of range"))
            })?;
            tokens.push(Spanned {
                token: Token::Number(value),
                position,
            });
            continue;
        }

        let token = token(&mut input).map_err(|_| ExpressionError::InvalidCharacter {
            position,
            character: next,
        })?;
        tokens.push(Spanned { token, position });
    }

    Ok(tokens)
}

fn ws<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., char::is_whitespace).parse_next(input)
}

fn number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    digit1.parse_next(input)
}

/// Parse any non-numeric token. Two-character operators are tried first so
/// `!=` is never read as `!` followed by `=`.
fn token(input: &mut &str) -> ModalResult<Token> {
    alt((
        'n'.value(Token::Variable),
        two_char_operator,
        one_char_operator,
        '('.value(Token::OpenParen),
        ')'.value(Token::CloseParen),
        '?'.value(Token::Question),
        ':'.value(Token::Colon),
    ))
    .parse_next(input)
}

fn two_char_operator(input: &mut &str) -> ModalResult<Token> {
    alt((
        "==".value(BinaryOp::Equal),
        "!=".value(BinaryOp::NotEqual),
        ">=".value(BinaryOp::GreaterEqual),
        "<=".value(BinaryOp::LessEqual),
        "&&".value(BinaryOp::And),
        "||".value(BinaryOp::Or),
    ))
    .map(Token::Binary)
    .parse_next(input)
}

fn one_char_operator(input: &mut &str) -> ModalResult<Token> {
    alt((
        '!'.value(Token::Not),
        '*'.value(Token::Binary(BinaryOp::Mul)),
        '/'.value(Token::Binary(BinaryOp::Div)),
        '%'.value(Token::Binary(BinaryOp::Rem)),
        '+'.value(Token::Binary(BinaryOp::Add)),
        '-'.value(Token::Binary(BinaryOp::Sub)),
        '<'.value(Token::Binary(BinaryOp::Less)),
        '>'.value(Token::Binary(BinaryOp::Greater)),
    ))
    .parse_next(input)
}
