//! scam - a small tree-walking interpreter for a Lisp-family expression language
//!
//! Source text goes through a fixed pipeline:
//!
//! ```text
//! source --tokenize--> tokens --parse--> Expression --eval--> Value
//! ```
//!
//! ```scheme
//! (begin
//!   (define add1 (lambda (a) (+ a 1)))
//!   (add1 41))          ; => 42
//! ```
//!
//! ## Language
//!
//! - Numbers are `f64` (`42`, `-3.5`), strings are double-quoted with no escapes.
//! - Special forms: `define`, `begin`, `if`, `lambda`.
//! - Primitives: `+ - * /`, `== > <`, and the booleans `true` / `false`.
//! - `if` takes its alternative branch only when the predicate is the boolean
//!   `false`; zero and the empty string select the consequent.
//! - Closures capture their defining environment by reference (lexical scope).
//!
//! ## Modules
//!
//! - `lexer`: source text to tokens
//! - `literal`: classification of a single token as number, string or symbol
//! - `parser`: recursive-descent parser producing the AST
//! - `ast`: the [`ast::Expression`] tree
//! - `value`: runtime values and procedures
//! - `environment`: chained lexical scopes
//! - `evaluator`: special forms and procedure application
//! - `primitives`: the built-in procedure registry
//! - `debug`: renderers for tokens, AST and environment bindings
//! - `stack`: on-demand stack growth for deep recursion

use std::rc::Rc;

use thiserror::Error;

pub mod ast;
pub mod debug;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod primitives;
mod stack;
pub mod value;

pub use ast::Expression;
pub use environment::Environment;
pub use evaluator::{EvalConfig, eval, eval_with_config, make_root_env};
pub use lexer::{Token, tokenize};
pub use literal::{Literal, classify};
pub use parser::{
    ParseConfig, parse, parse_program, parse_program_with_config, parse_with_config,
};
pub use value::{Procedure, Value};

/// Maximum parsing depth to prevent stack overflow on pathological input
pub const MAX_PARSE_DEPTH: usize = 256;

/// Maximum evaluation depth before runaway recursion is reported.
///
/// Each user procedure call costs a few levels (body, branch, argument), so
/// this sits far above [`MAX_PARSE_DEPTH`]. The stack grows on demand.
pub const MAX_EVAL_DEPTH: usize = 10_000;

/// Errors raised while splitting source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },
}

/// Errors raised while building the AST from tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unknown literal: {0}")]
    UnknownLiteral(String),
    #[error("unexpected token '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expression nested too deeply (max depth: {max_depth})")]
    TooDeep { max_depth: usize },
}

/// Errors raised during evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
    #[error("cannot apply non-procedure: {0}")]
    NotCallable(String),
    #[error("{procedure}: expected {expected} arguments, got {got}")]
    ArityMismatch {
        procedure: String,
        expected: evaluator::Arity,
        got: usize,
    },
    #[error("{procedure}: expected {expected}, got {found}")]
    TypeMismatch {
        procedure: String,
        expected: &'static str,
        found: String,
    },
    #[error("malformed {form}: {reason}")]
    InvalidSpecialForm { form: &'static str, reason: String },
    #[error("invalid expression: {0}")]
    InvalidExpression(String),
    #[error("begin requires at least one expression")]
    EmptyBegin,
    #[error("evaluation depth limit exceeded (max: {max_depth})")]
    StackOverflow { max_depth: usize },
}

impl EvalError {
    pub(crate) fn arity(procedure: impl Into<String>, expected: evaluator::Arity, got: usize) -> Self {
        EvalError::ArityMismatch {
            procedure: procedure.into(),
            expected,
            got,
        }
    }
}

/// Any failure of the full source-to-value pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("LexError: {0}")]
    Lex(#[from] LexError),
    #[error("ParseError: {0}")]
    Parse(#[from] ParseError),
    #[error("EvalError: {0}")]
    Eval(#[from] EvalError),
}

/// Limits applied to one run of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunConfig {
    pub parse: ParseConfig,
    pub eval: EvalConfig,
}

/// Tokenize, parse and evaluate `source` in a fresh root environment.
pub fn run(source: &str) -> Result<Value, Error> {
    run_with_config(source, RunConfig::default())
}

/// Same as [`run`], with explicit depth limits.
pub fn run_with_config(source: &str, config: RunConfig) -> Result<Value, Error> {
    let env = make_root_env();
    run_in(source, &env, config)
}

/// Run `source` against an existing environment, keeping its definitions.
pub fn run_in(
    source: &str,
    env: &Rc<Environment>,
    config: RunConfig,
) -> Result<Value, Error> {
    let tokens = tokenize(source)?;
    let expr = parse_program_with_config(&tokens, config.parse)?;
    Ok(eval_with_config(&expr, env, config.eval)?)
}
