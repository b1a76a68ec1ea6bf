//! Runtime values.
//!
//! Evaluation produces numbers, strings, booleans and procedures. Symbols
//! exist as a value kind for completeness but no expression evaluates to
//! one. Procedures are either entries of the static primitive registry or
//! closures pairing a `lambda` body with the environment it was created in.

use std::fmt;
use std::rc::Rc;

use crate::ast::Expression;
use crate::environment::Environment;
use crate::primitives::Primitive;

#[derive(Clone)]
pub enum Value {
    Number(f64),
    /// String content, without quotes
    String(String),
    Symbol(String),
    Boolean(bool),
    Procedure(Procedure),
}

#[derive(Clone)]
pub enum Procedure {
    Primitive(&'static Primitive),
    UserDefined(Rc<Closure>),
}

/// A user-defined procedure (params, body, captured environment)
pub struct Closure {
    pub params: Vec<String>,
    pub body: Rc<Expression>,
    pub env: Rc<Environment>,
}

impl Procedure {
    /// Name used in error messages
    pub fn name(&self) -> String {
        match self {
            Procedure::Primitive(primitive) => primitive.name.to_owned(),
            Procedure::UserDefined(closure) => format!("(lambda ({}) ...)", closure.params.join(" ")),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Boolean(_) => "boolean",
            Value::Procedure(_) => "procedure",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Only the boolean `false` selects the alternative branch of `if`.
    pub fn is_false(&self) -> bool {
        matches!(self, Value::Boolean(false))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n:?})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Symbol(s) => write!(f, "Symbol({s})"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Procedure(p) => write!(f, "Procedure({p:?})"),
        }
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Procedure::Primitive(primitive) => write!(f, "Primitive({})", primitive.name),
            Procedure::UserDefined(closure) => {
                // The captured environment is left out; it may contain this closure.
                write!(
                    f,
                    "UserDefined(params={:?}, body={})",
                    closure.params, closure.body
                )
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Procedure(Procedure::Primitive(primitive)) => {
                write!(f, "#<primitive:{}>", primitive.name)
            }
            Value::Procedure(Procedure::UserDefined(closure)) => {
                write!(f, "#<procedure:({})>", closure.params.join(" "))
            }
        }
    }
}

impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Primitives are unique by name
            (Procedure::Primitive(a), Procedure::Primitive(b)) => a.name == b.name,
            (Procedure::UserDefined(a), Procedure::UserDefined(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) | (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Procedure(a), Value::Procedure(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;
    use crate::ast::{compound, sym};
    use crate::primitives::find_primitive;

    fn closure(params: &[&str]) -> Value {
        Value::Procedure(Procedure::UserDefined(Rc::new(Closure {
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            body: Rc::new(compound([sym("+"), sym("a"), sym("b")])),
            env: Environment::new(),
        })))
    }

    #[test]
    fn test_display() {
        let plus = Value::Procedure(Procedure::Primitive(find_primitive("+").unwrap()));
        let test_cases = vec![
            (Value::Number(15.0), "15"),
            (Value::Number(0.5), "0.5"),
            (Value::Number(-2.25), "-2.25"),
            (Value::from("aa a"), "\"aa a\""),
            (Value::Symbol("x".to_owned()), "x"),
            (Value::Boolean(true), "true"),
            (Value::Boolean(false), "false"),
            (plus, "#<primitive:+>"),
            (closure(&["a", "b"]), "#<procedure:(a b)>"),
        ];

        for (i, (value, expected)) in test_cases.iter().enumerate() {
            assert_eq!(format!("{value}"), *expected, "display test #{}", i + 1);
        }
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::from(1.0), Value::Number(1.0));
        assert_ne!(Value::Number(1.0), Value::Boolean(true));
        assert_ne!(Value::from("x"), Value::Symbol("x".to_owned()));

        let f = closure(&["a"]);
        assert_eq!(f, f.clone());
        assert_ne!(f, closure(&["a"]));

        let lt = find_primitive("<").unwrap();
        assert_eq!(
            Value::Procedure(Procedure::Primitive(lt)),
            Value::Procedure(Procedure::Primitive(lt))
        );
    }

    #[test]
    fn test_falsiness_is_boolean_false_only() {
        assert!(Value::Boolean(false).is_false());
        assert!(!Value::Boolean(true).is_false());
        assert!(!Value::Number(0.0).is_false());
        assert!(!Value::from("").is_false());
    }

    #[test]
    fn test_debug_omits_environment() {
        let text = format!("{:?}", closure(&["a", "b"]));
        assert_eq!(text, "Procedure(UserDefined(params=[\"a\", \"b\"], body=(+ a b)))");
    }
}
