//! Classification of a single non-parenthesis token.
//!
//! Categories are tried in a fixed order: number, then string, then symbol.
//! A token that fits none of them is reported as
//! [`ParseError::UnknownLiteral`].

use nom::{
    IResult, Parser,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{all_consuming, opt, recognize, verify},
    sequence::{delimited, pair},
};

use crate::ParseError;

/// What a leaf token denotes
#[derive(Debug, Clone, PartialEq)]
pub enum Literal<'a> {
    Number(f64),
    /// Text between the surrounding quotes
    String(&'a str),
    Symbol(&'a str),
}

/// Optional leading sign followed by digits and dots
fn number_shape(input: &str) -> IResult<&str, &str> {
    all_consuming(recognize(pair(
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit() || c == '.'),
    )))
    .parse(input)
}

/// `"` ... `"` with no interior quote; yields the content
fn string_content(input: &str) -> IResult<&str, &str> {
    all_consuming(delimited(
        char('"'),
        take_while(|c: char| c != '"'),
        char('"'),
    ))
    .parse(input)
}

fn symbol_name(input: &str) -> IResult<&str, &str> {
    all_consuming(verify(
        take_while1(|c: char| c != '"' && !c.is_whitespace()),
        |name: &str| !name.starts_with(|c: char| c.is_ascii_digit()),
    ))
    .parse(input)
}

fn parse_number(token: &str) -> Option<f64> {
    let (_, text) = number_shape(token).ok()?;
    if text.chars().filter(|&c| c == '.').count() > 1 {
        return None;
    }
    // A bare "." or "-." reads as zero
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return Some(0.0);
    }
    text.parse::<f64>().ok()
}

/// Decide whether `token` is a number, a string or a symbol.
pub fn classify(token: &str) -> Result<Literal<'_>, ParseError> {
    if let Some(n) = parse_number(token) {
        return Ok(Literal::Number(n));
    }
    if let Ok((_, content)) = string_content(token) {
        return Ok(Literal::String(content));
    }
    if let Ok((_, name)) = symbol_name(token) {
        return Ok(Literal::Symbol(name));
    }
    Err(ParseError::UnknownLiteral(token.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum Expected {
        Num(f64),
        Str(&'static str),
        Sym(&'static str),
        Unknown,
    }
    use Expected::*;

    #[test]
    fn test_classify_data_driven() {
        let test_cases = vec![
            // ===== NUMBERS =====
            ("0", Num(0.0)),
            ("42", Num(42.0)),
            ("-5", Num(-5.0)),
            ("23.0123", Num(23.0123)),
            ("-0.5", Num(-0.5)),
            (".5", Num(0.5)),
            ("5.", Num(5.0)),
            ("007", Num(7.0)),
            (".", Num(0.0)),
            ("-.", Num(0.0)),
            // ===== STRINGS =====
            ("\"hello\"", Str("hello")),
            ("\"aa'12 3a\"", Str("aa'12 3a")),
            ("\"\"", Str("")),
            ("\"(x)\"", Str("(x)")),
            // ===== SYMBOLS =====
            ("+", Sym("+")),
            ("-", Sym("-")),
            ("==", Sym("==")),
            ("define", Sym("define")),
            ("my-val", Sym("my-val")),
            ("-aaa", Sym("-aaa")),
            ("--5", Sym("--5")),
            ("x1", Sym("x1")),
            ("λ", Sym("λ")),
            // ===== REJECTED =====
            ("", Unknown),
            ("1.2.3", Unknown),
            ("5-", Unknown),
            ("12abc", Unknown),
            ("aa12 3a", Unknown),
            ("\"", Unknown),
            ("\"a\"b\"", Unknown),
            ("a\"b", Unknown),
        ];

        for (i, (input, expected)) in test_cases.iter().enumerate() {
            let test_id = format!("classify test #{} ({input:?})", i + 1);
            let result = classify(input);
            match (result, expected) {
                (Ok(Literal::Number(n)), Num(want)) => {
                    assert!((n - want).abs() < f64::EPSILON, "{test_id}: got {n}");
                }
                (Ok(Literal::String(s)), Str(want)) => assert_eq!(s, *want, "{test_id}"),
                (Ok(Literal::Symbol(s)), Sym(want)) => assert_eq!(s, *want, "{test_id}"),
                (Err(ParseError::UnknownLiteral(token)), Unknown) => {
                    assert_eq!(token, *input, "{test_id}");
                }
                (actual, expected) => {
                    panic!("{test_id}: expected {expected:?}, got {actual:?}")
                }
            }
        }
    }

    #[test]
    fn test_number_round_trip() {
        for token in ["1", "-17", "3.25", "0.1", "-1234.5678", "1e0"] {
            let Ok(Literal::Number(first)) = classify(token) else {
                // exponents are not part of the number syntax
                assert_eq!(token, "1e0");
                continue;
            };
            let rendered = format!("{first}");
            let Ok(Literal::Number(second)) = classify(&rendered) else {
                panic!("re-rendered {rendered:?} did not classify as a number");
            };
            assert!((first - second).abs() < 1e-12, "{token}: {first} != {second}");
        }
    }
}
