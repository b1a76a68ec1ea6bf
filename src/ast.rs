//! The abstract syntax tree produced by the parser.
//!
//! An [`Expression`] is either a compound (a parenthesized, ordered list of
//! child expressions) or a leaf: a number, a string or a symbol. Trees are
//! never mutated after parsing. Compound children sit behind [`Rc`] so that
//! the body of a `lambda` can be shared with the closure built from it
//! instead of being copied.
//!
//! Helper constructors ([`num`], [`string`], [`sym`], [`compound`]) keep
//! hand-built trees in tests short.

use std::fmt;
use std::rc::Rc;

/// Core AST type
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `( child ... )`
    Compound(Vec<Rc<Expression>>),
    /// A numeric literal and the source text it was read from
    Number { value: f64, text: String },
    /// A string literal, stored with its surrounding quotes
    String { text: String },
    /// An identifier
    Symbol(String),
}

impl Expression {
    /// Upper-case tag used by the debug AST listing
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Compound(_) => "COMPOUND",
            Expression::Number { .. } => "NUMBER",
            Expression::String { .. } => "STRING",
            Expression::Symbol(_) => "SYMBOL",
        }
    }

    /// Children of a compound node; leaves have none.
    pub fn children(&self) -> &[Rc<Expression>] {
        match self {
            Expression::Compound(children) => children,
            _ => &[],
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expression::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Content of a string literal, without the quotes.
    pub fn string_content(&self) -> Option<&str> {
        match self {
            Expression::String { text } => text
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"')),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Compound(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            Expression::Number { text, .. } | Expression::String { text } => f.write_str(text),
            Expression::Symbol(name) => f.write_str(name),
        }
    }
}

/// Number leaf whose source text is the shortest rendering of `value`
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn num(value: f64) -> Expression {
    Expression::Number {
        value,
        text: format!("{value}"),
    }
}

/// String leaf from its content (quotes are added)
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn string<S: AsRef<str>>(content: S) -> Expression {
    Expression::String {
        text: format!("\"{}\"", content.as_ref()),
    }
}

#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn sym<S: AsRef<str>>(name: S) -> Expression {
    Expression::Symbol(name.as_ref().to_owned())
}

#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn compound<I: IntoIterator<Item = Expression>>(children: I) -> Expression {
    Expression::Compound(children.into_iter().map(Rc::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_re_renders_source() {
        let test_cases = vec![
            (num(42.0), "42"),
            (num(-0.5), "-0.5"),
            (string("aa a"), "\"aa a\""),
            (sym("my-val"), "my-val"),
            (compound([]), "()"),
            (
                compound([sym("+"), num(1.0), compound([sym("*"), num(2.0), num(3.0)])]),
                "(+ 1 (* 2 3))",
            ),
        ];

        for (i, (expr, expected)) in test_cases.iter().enumerate() {
            assert_eq!(format!("{expr}"), *expected, "display test #{}", i + 1);
        }
    }

    #[test]
    fn test_accessors() {
        let expr = compound([sym("f"), string("x y")]);
        assert_eq!(expr.kind_name(), "COMPOUND");
        assert_eq!(expr.children().len(), 2);
        assert_eq!(expr.children()[0].as_symbol(), Some("f"));
        assert_eq!(expr.children()[1].string_content(), Some("x y"));
        assert_eq!(expr.children()[1].as_symbol(), None);
        assert!(sym("f").children().is_empty());
        assert_eq!(num(1.0).kind_name(), "NUMBER");
    }
}
