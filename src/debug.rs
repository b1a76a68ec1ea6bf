//! Plain-text renderers for the `--debug` report.
//!
//! Every renderer is a borrowing wrapper implementing [`fmt::Display`], so
//! callers decide where the text goes. The full report looks like:
//!
//! ```text
//! TOKENS (5)
//! ==========
//! (, +, 1, 2, )
//!
//! AST:
//! ====
//! COMPOUND
//!     SYMBOL +
//!     NUMBER 1.000000
//!     NUMBER 2.000000
//!
//! ENV:
//! ====
//! < => PRIMITIVE PROCEDURE <
//! ...
//!
//! RESULT:
//! =======
//! NUMBER 3.000000
//! ```

use std::fmt;

use crate::EvalError;
use crate::ast::Expression;
use crate::environment::Environment;
use crate::lexer::Token;
use crate::value::{Procedure, Value};

/// Token list, comma separated
pub struct TokenList<'a>(pub &'a [Token]);

impl fmt::Display for TokenList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Pre-order AST listing, four spaces of indentation per level
pub struct AstTree<'a>(pub &'a Expression);

impl AstTree<'_> {
    fn write_node(f: &mut fmt::Formatter<'_>, expr: &Expression, indent: usize) -> fmt::Result {
        write!(f, "{:width$}", "", width = indent * 4)?;
        match expr {
            Expression::Compound(children) => {
                writeln!(f, "COMPOUND")?;
                for child in children {
                    Self::write_node(f, child, indent + 1)?;
                }
                Ok(())
            }
            Expression::Number { value, .. } => writeln!(f, "NUMBER {value:.6}"),
            Expression::String { text } => writeln!(f, "STRING {text}"),
            Expression::Symbol(name) => writeln!(f, "SYMBOL {name}"),
        }
    }
}

impl fmt::Display for AstTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_node(f, self.0, 0)
    }
}

/// Tagged description of a value, e.g. `NUMBER 15.000000`
pub struct Describe<'a>(pub &'a Value);

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Number(n) => write!(f, "NUMBER {n:.6}"),
            Value::String(s) => write!(f, "STRING {s}"),
            Value::Symbol(s) => write!(f, "SYMBOL {s}"),
            Value::Boolean(b) => write!(f, "BOOLEAN {b}"),
            Value::Procedure(Procedure::Primitive(primitive)) => {
                write!(f, "PRIMITIVE PROCEDURE {}", primitive.name)
            }
            Value::Procedure(Procedure::UserDefined(closure)) => {
                write!(f, "USER DEFINED PROCEDURE ({})", closure.params.join(" "))
            }
        }
    }
}

/// Bindings of one scope, newest first
pub struct EnvListing<'a>(pub &'a Environment);

impl fmt::Display for EnvListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.0.local_bindings() {
            writeln!(f, "{name} => {}", Describe(&value))?;
        }
        Ok(())
    }
}

/// The `TOKENS` section, available as soon as tokenizing succeeds
pub struct TokensSection<'a>(pub &'a [Token]);

impl fmt::Display for TokensSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TOKENS ({})", self.0.len())?;
        writeln!(f, "==========")?;
        writeln!(f, "{}", TokenList(self.0))?;
        writeln!(f)
    }
}

/// The `AST`, `ENV` and `RESULT` sections, printed after evaluation
pub struct EvalReport<'a> {
    pub ast: &'a Expression,
    pub env: &'a Environment,
    pub result: &'a Result<Value, EvalError>,
}

impl fmt::Display for EvalReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AST:")?;
        writeln!(f, "====")?;
        write!(f, "{}", AstTree(self.ast))?;
        writeln!(f)?;

        writeln!(f, "ENV:")?;
        writeln!(f, "====")?;
        write!(f, "{}", EnvListing(self.env))?;
        writeln!(f)?;

        writeln!(f, "RESULT:")?;
        writeln!(f, "=======")?;
        match self.result {
            Ok(value) => writeln!(f, "{}", Describe(value)),
            Err(err) => writeln!(f, "ERROR {err}"),
        }
    }
}
