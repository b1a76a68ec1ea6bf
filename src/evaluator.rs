//! Tree-walking evaluator.
//!
//! [`eval`] dispatches on the shape of an [`Expression`]:
//!
//! - number and string literals evaluate to themselves
//! - symbols are looked up through the environment chain
//! - compounds headed by `define`, `begin`, `if` or `lambda` are special forms
//!   and receive their operands unevaluated
//! - every other compound is a procedure application: the operator and then
//!   the arguments (left to right) are evaluated, and the procedure is applied
//!
//! Applying a user-defined procedure creates a fresh environment whose parent
//! is the environment captured when the `lambda` was evaluated, never the
//! caller's. That is what makes scoping lexical.
//!
//! Evaluation depth is bounded by [`EvalConfig::max_depth`]; runaway
//! recursion fails with [`EvalError::StackOverflow`] instead of exhausting the
//! native stack.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::EvalError;
use crate::MAX_EVAL_DEPTH;
use crate::ast::Expression;
use crate::environment::Environment;
use crate::primitives::primitives;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Closure, Procedure, Value};

/// Accepted argument counts of a procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }

    /// Fail with [`EvalError::ArityMismatch`] unless `count` is accepted.
    pub fn validate(self, procedure: &str, count: usize) -> Result<(), EvalError> {
        if self.accepts(count) {
            Ok(())
        } else {
            Err(EvalError::arity(procedure, self, count))
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Evaluator settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalConfig {
    /// Maximum evaluation depth before failing with [`EvalError::StackOverflow`]
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: MAX_EVAL_DEPTH,
        }
    }
}

/// Create a root environment holding `false`, `true` and every primitive.
pub fn make_root_env() -> Rc<Environment> {
    let env = Environment::new();

    env.define("false", Value::Boolean(false));
    env.define("true", Value::Boolean(true));

    for primitive in primitives() {
        env.define(primitive.name, Value::Procedure(Procedure::Primitive(primitive)));
    }

    env
}

/// Evaluate an expression (public API)
pub fn eval(expr: &Expression, env: &Rc<Environment>) -> Result<Value, EvalError> {
    eval_with_config(expr, env, EvalConfig::default())
}

pub fn eval_with_config(
    expr: &Expression,
    env: &Rc<Environment>,
    config: EvalConfig,
) -> Result<Value, EvalError> {
    Evaluator { config }.eval(expr, env, 0)
}

/// Syntax handled by the evaluator itself rather than by application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialForm {
    Define,
    Begin,
    If,
    Lambda,
}

impl SpecialForm {
    fn from_symbol(name: &str) -> Option<Self> {
        match name {
            "define" => Some(SpecialForm::Define),
            "begin" => Some(SpecialForm::Begin),
            "if" => Some(SpecialForm::If),
            "lambda" => Some(SpecialForm::Lambda),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            SpecialForm::Define => "define",
            SpecialForm::Begin => "begin",
            SpecialForm::If => "if",
            SpecialForm::Lambda => "lambda",
        }
    }

    fn operand_count_error(self, expected: usize, got: usize) -> EvalError {
        EvalError::InvalidSpecialForm {
            form: self.name(),
            reason: format!("expected {expected} operands, got {got}"),
        }
    }
}

struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Evaluate with depth tracking to prevent stack overflow
    fn eval(
        &self,
        expr: &Expression,
        env: &Rc<Environment>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        if depth >= self.config.max_depth {
            return Err(EvalError::StackOverflow {
                max_depth: self.config.max_depth,
            });
        }
        tracing::trace!(depth, kind = expr.kind_name(), "eval");

        ensure_sufficient_stack(|| self.eval_expression(expr, env, depth))
    }

    fn eval_expression(
        &self,
        expr: &Expression,
        env: &Rc<Environment>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        match expr {
            Expression::Number { value, .. } => Ok(Value::Number(*value)),
            Expression::String { .. } => Ok(Value::String(
                expr.string_content().unwrap_or_default().to_owned(),
            )),
            Expression::Symbol(name) => env
                .lookup(name)
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            Expression::Compound(children) => self.eval_compound(children, env, depth),
        }
    }

    fn eval_compound(
        &self,
        children: &[Rc<Expression>],
        env: &Rc<Environment>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        let Some((head, operands)) = children.split_first() else {
            return Err(EvalError::InvalidExpression(
                "cannot evaluate empty compound ()".to_owned(),
            ));
        };

        if let Some(form) = head.as_symbol().and_then(SpecialForm::from_symbol) {
            return match form {
                SpecialForm::Define => self.eval_define(operands, env, depth),
                SpecialForm::Begin => self.eval_begin(operands, env, depth),
                SpecialForm::If => self.eval_if(operands, env, depth),
                SpecialForm::Lambda => eval_lambda(operands, env),
            };
        }

        let procedure = self.eval_operator(head, env, depth)?;
        let args = operands
            .iter()
            .map(|arg| self.eval(arg, env, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        self.apply(&procedure, &args, depth)
    }

    /// Evaluate the head of an application down to a procedure
    fn eval_operator(
        &self,
        head: &Expression,
        env: &Rc<Environment>,
        depth: usize,
    ) -> Result<Procedure, EvalError> {
        match head {
            Expression::Symbol(name) => match self.eval(head, env, depth + 1)? {
                Value::Procedure(procedure) => Ok(procedure),
                other => Err(EvalError::NotCallable(format!(
                    "{name} ({} {other})",
                    other.type_name()
                ))),
            },
            Expression::Compound(_) => match self.eval(head, env, depth + 1)? {
                Value::Procedure(procedure) => Ok(procedure),
                other => Err(EvalError::InvalidExpression(format!(
                    "operator {head} evaluated to {} {other}, not a procedure",
                    other.type_name()
                ))),
            },
            Expression::Number { .. } | Expression::String { .. } => Err(
                EvalError::InvalidExpression(format!("literal {head} in operator position")),
            ),
        }
    }

    fn apply(
        &self,
        procedure: &Procedure,
        args: &[Value],
        depth: usize,
    ) -> Result<Value, EvalError> {
        tracing::debug!(procedure = %procedure.name(), args = args.len(), depth, "apply");

        match procedure {
            Procedure::Primitive(primitive) => primitive.call(args),
            Procedure::UserDefined(closure) => {
                if closure.params.len() != args.len() {
                    return Err(EvalError::arity(
                        procedure.name(),
                        Arity::Exact(closure.params.len()),
                        args.len(),
                    ));
                }

                // Parent is the captured environment, not the caller's
                let frame = Environment::with_parent(Rc::clone(&closure.env));
                for (param, arg) in closure.params.iter().zip(args) {
                    frame.define(param.clone(), arg.clone());
                }

                self.eval(&closure.body, &frame, depth + 1)
            }
        }
    }

    /// `(define name expr)`
    fn eval_define(
        &self,
        operands: &[Rc<Expression>],
        env: &Rc<Environment>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        match operands {
            [target, expr] => {
                let Some(name) = target.as_symbol() else {
                    return Err(EvalError::InvalidSpecialForm {
                        form: "define",
                        reason: format!("expected a symbol to bind, got {target}"),
                    });
                };
                let value = self.eval(expr, env, depth + 1)?;
                tracing::debug!(name, value = %value, "define");
                env.define(name, value.clone());
                Ok(value)
            }
            _ => Err(SpecialForm::Define.operand_count_error(2, operands.len())),
        }
    }

    /// `(begin e1 ... en)` evaluates to the value of `en`
    fn eval_begin(
        &self,
        operands: &[Rc<Expression>],
        env: &Rc<Environment>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        let mut last = None;
        for expr in operands {
            last = Some(self.eval(expr, env, depth + 1)?);
        }
        last.ok_or(EvalError::EmptyBegin)
    }

    /// `(if predicate consequent alternative)`
    fn eval_if(
        &self,
        operands: &[Rc<Expression>],
        env: &Rc<Environment>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        match operands {
            [predicate, consequent, alternative] => {
                let condition = self.eval(predicate, env, depth + 1)?;
                if condition.is_false() {
                    self.eval(alternative, env, depth + 1)
                } else {
                    self.eval(consequent, env, depth + 1)
                }
            }
            _ => Err(SpecialForm::If.operand_count_error(3, operands.len())),
        }
    }
}

/// `(lambda (params ...) body)` captures `env` by reference.
fn eval_lambda(operands: &[Rc<Expression>], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let [param_list, body] = operands else {
        return Err(SpecialForm::Lambda.operand_count_error(2, operands.len()));
    };

    let Expression::Compound(param_exprs) = param_list.as_ref() else {
        return Err(EvalError::InvalidExpression(format!(
            "lambda parameters must be a list of symbols, got {param_list}"
        )));
    };

    let mut seen = HashSet::new();
    let mut params = Vec::with_capacity(param_exprs.len());
    for param in param_exprs {
        let Some(name) = param.as_symbol() else {
            return Err(EvalError::InvalidExpression(format!(
                "lambda parameter must be a symbol, got {param}"
            )));
        };
        if !seen.insert(name) {
            return Err(EvalError::InvalidExpression(format!(
                "duplicate lambda parameter: {name}"
            )));
        }
        params.push(name.to_owned());
    }

    Ok(Value::Procedure(Procedure::UserDefined(Rc::new(Closure {
        params,
        body: Rc::clone(body),
        env: Rc::clone(env),
    }))))
}
