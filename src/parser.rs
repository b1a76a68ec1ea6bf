//! Recursive-descent parser from tokens to [`Expression`] trees.
//!
//! Each call parses one expression starting at the first token and reports
//! how many tokens it consumed, so a compound node can advance past each
//! child before parsing the next one.

use std::rc::Rc;

use crate::MAX_PARSE_DEPTH;
use crate::ParseError;
use crate::ast::Expression;
use crate::lexer::Token;
use crate::literal::{Literal, classify};
use crate::stack::ensure_sufficient_stack;

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseConfig {
    /// Maximum parenthesis nesting accepted before failing with
    /// [`ParseError::TooDeep`]
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            max_depth: MAX_PARSE_DEPTH,
        }
    }
}

/// Parse one expression from the front of `tokens`.
///
/// Returns the expression and the number of tokens it spans. Tokens after
/// that are left alone; see [`parse_program`] for whole-input parsing.
pub fn parse(tokens: &[Token]) -> Result<(Expression, usize), ParseError> {
    parse_with_config(tokens, ParseConfig::default())
}

pub fn parse_with_config(
    tokens: &[Token],
    config: ParseConfig,
) -> Result<(Expression, usize), ParseError> {
    parse_expression(tokens, config, 0)
}

/// Parse a complete program: exactly one expression and no leftover tokens.
pub fn parse_program(tokens: &[Token]) -> Result<Expression, ParseError> {
    parse_program_with_config(tokens, ParseConfig::default())
}

pub fn parse_program_with_config(
    tokens: &[Token],
    config: ParseConfig,
) -> Result<Expression, ParseError> {
    let (expr, consumed) = parse_with_config(tokens, config)?;
    match tokens.get(consumed) {
        None => Ok(expr),
        Some(extra) => Err(unexpected(extra)),
    }
}

fn unexpected(token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        token: token.as_str().to_owned(),
        offset: token.offset(),
    }
}

fn parse_expression(
    tokens: &[Token],
    config: ParseConfig,
    depth: usize,
) -> Result<(Expression, usize), ParseError> {
    let Some(first) = tokens.first() else {
        return Err(ParseError::UnexpectedEnd);
    };

    if first.is_open() {
        ensure_sufficient_stack(|| parse_compound(tokens, config, depth + 1))
    } else if first.is_close() {
        Err(unexpected(first))
    } else {
        Ok((parse_leaf(first)?, 1))
    }
}

/// `tokens[0]` is the opening parenthesis; `depth` counts it.
fn parse_compound(
    tokens: &[Token],
    config: ParseConfig,
    depth: usize,
) -> Result<(Expression, usize), ParseError> {
    if depth > config.max_depth {
        return Err(ParseError::TooDeep {
            max_depth: config.max_depth,
        });
    }

    let mut children = Vec::new();
    let mut consumed = 1;

    loop {
        match tokens.get(consumed) {
            None => return Err(ParseError::UnexpectedEnd),
            Some(token) if token.is_close() => {
                return Ok((Expression::Compound(children), consumed + 1));
            }
            Some(_) => {
                let (child, step) = parse_expression(&tokens[consumed..], config, depth)?;
                children.push(Rc::new(child));
                consumed += step;
            }
        }
    }
}

fn parse_leaf(token: &Token) -> Result<Expression, ParseError> {
    let expr = match classify(token.as_str())? {
        Literal::Number(value) => Expression::Number {
            value,
            text: token.as_str().to_owned(),
        },
        Literal::String(_) => Expression::String {
            text: token.as_str().to_owned(),
        },
        Literal::Symbol(name) => Expression::Symbol(name.to_owned()),
    };
    Ok(expr)
}
