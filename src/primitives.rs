//! Built-in procedures.
//!
//! The registry is a fixed list of [`Primitive`] entries installed into every
//! root environment by [`crate::evaluator::make_root_env`]:
//!
//! ```scheme
//! (+ 1 2 3)      ; 6
//! (- 10 3 2)     ; 5
//! (/ 1 4)        ; 0.25
//! (== 0.1 0.1)   ; true, equality within 1e-6
//! (> 2 1)        ; true
//! ```
//!
//! ## Arithmetic
//!
//! `+ - * /` fold their arguments left to right starting from the first one,
//! so all four need at least one argument and `(- 5)` is `5`, not `-5`.
//! Division follows IEEE-754: `(/ 1 0)` is infinity.
//!
//! ## Comparison
//!
//! `== > <` take exactly two numbers and return a boolean.
//!
//! ## Adding New Primitives
//!
//! 1. Write a function with the signature `fn(&[Value]) -> Result<Value, EvalError>`
//! 2. Add an entry to `PRIMITIVES` with its name and [`Arity`]
//! 3. Add test cases below

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::EvalError;
use crate::evaluator::Arity;
use crate::value::Value;

/// Tolerance used by `==` to absorb floating-point representation error
pub const EQUALITY_TOLERANCE: f64 = 1e-6;

/// Canonical signature of a built-in procedure
pub type PrimitiveFn = fn(&[Value]) -> Result<Value, EvalError>;

/// Definition of a built-in procedure
#[derive(Debug)]
pub struct Primitive {
    /// Name the procedure is bound to in the root environment
    pub name: &'static str,
    /// Accepted argument counts, checked before `func` runs
    pub arity: Arity,
    func: PrimitiveFn,
}

impl Primitive {
    /// Check arity, then apply the built-in to already evaluated arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        self.arity.validate(self.name, args.len())?;
        (self.func)(args)
    }
}

fn expect_number(procedure: &str, value: &Value) -> Result<f64, EvalError> {
    value.as_number().ok_or_else(|| EvalError::TypeMismatch {
        procedure: procedure.to_owned(),
        expected: "number",
        found: format!("{} {value}", value.type_name()),
    })
}

// Arity is checked by `Primitive::call` before any of these run.

// Accumulators start from the first argument, not from an identity value
macro_rules! numeric_accumulator {
    ($name:ident, $id:literal, $op:tt) => {
        fn $name(args: &[Value]) -> Result<Value, EvalError> {
            let mut acc = expect_number($id, &args[0])?;
            for arg in &args[1..] {
                acc = acc $op expect_number($id, arg)?;
            }
            Ok(Value::Number(acc))
        }
    };
}

numeric_accumulator!(builtin_add, "+", +);
numeric_accumulator!(builtin_sub, "-", -);
numeric_accumulator!(builtin_mul, "*", *);
numeric_accumulator!(builtin_div, "/", /);

macro_rules! numeric_predicate {
    ($name:ident, $id:literal, $cmp:ident) => {
        fn $name(args: &[Value]) -> Result<Value, EvalError> {
            let a = expect_number($id, &args[0])?;
            let b = expect_number($id, &args[1])?;
            Ok(Value::Boolean($cmp(a, b)))
        }
    };
}

fn is_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EQUALITY_TOLERANCE
}

fn is_greater(a: f64, b: f64) -> bool {
    a > b
}

fn is_less(a: f64, b: f64) -> bool {
    a < b
}

numeric_predicate!(builtin_eq, "==", is_equal);
numeric_predicate!(builtin_gt, ">", is_greater);
numeric_predicate!(builtin_lt, "<", is_less);

/// Global registry of all primitives, in installation order
static PRIMITIVES: LazyLock<Vec<Primitive>> = LazyLock::new(|| {
    vec![
        // Arithmetic
        Primitive {
            name: "+",
            arity: Arity::AtLeast(1),
            func: builtin_add,
        },
        Primitive {
            name: "-",
            arity: Arity::AtLeast(1),
            func: builtin_sub,
        },
        Primitive {
            name: "*",
            arity: Arity::AtLeast(1),
            func: builtin_mul,
        },
        Primitive {
            name: "/",
            arity: Arity::AtLeast(1),
            func: builtin_div,
        },
        // Comparison
        Primitive {
            name: "==",
            arity: Arity::Exact(2),
            func: builtin_eq,
        },
        Primitive {
            name: ">",
            arity: Arity::Exact(2),
            func: builtin_gt,
        },
        Primitive {
            name: "<",
            arity: Arity::Exact(2),
            func: builtin_lt,
        },
    ]
});

static PRIMITIVES_BY_NAME: LazyLock<HashMap<&'static str, &'static Primitive>> =
    LazyLock::new(|| {
        let primitives: &'static [Primitive] = PRIMITIVES.as_slice();
        primitives.iter().map(|p| (p.name, p)).collect()
    });

/// All primitives in installation order
pub fn primitives() -> &'static [Primitive] {
    PRIMITIVES.as_slice()
}

pub fn find_primitive(name: &str) -> Option<&'static Primitive> {
    PRIMITIVES_BY_NAME.get(name).copied()
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<Value, EvalError> {
        find_primitive(name).unwrap().call(args)
    }

    fn nums(values: &[f64]) -> Vec<Value> {
        values.iter().copied().map(Value::Number).collect()
    }

    #[test]
    fn test_registry() {
        let names: Vec<&str> = primitives().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["+", "-", "*", "/", "==", ">", "<"]);

        let plus = find_primitive("+").unwrap();
        assert_eq!(plus.arity, Arity::AtLeast(1));
        assert!(std::ptr::eq(plus, &primitives()[0]));
        assert!(find_primitive("define").is_none());
        assert!(find_primitive("true").is_none());
    }

    #[test]
    fn test_arithmetic_data_driven() {
        let test_cases: Vec<(&str, Vec<f64>, f64)> = vec![
            ("+", vec![1.0, 2.0], 3.0),
            ("+", vec![1.0, 2.0, 3.0, 4.0], 10.0),
            ("+", vec![42.0], 42.0),
            ("-", vec![10.0, 3.0, 2.0], 5.0),
            // folds from the first argument: no unary negation
            ("-", vec![5.0], 5.0),
            ("*", vec![2.0, 3.0, 4.0], 24.0),
            ("*", vec![7.0], 7.0),
            ("/", vec![1.0, 4.0], 0.25),
            ("/", vec![100.0, 5.0, 2.0], 10.0),
            ("/", vec![9.0], 9.0),
            ("-", vec![0.5, 1.0], -0.5),
        ];

        for (i, (name, args, expected)) in test_cases.iter().enumerate() {
            let result = call(name, &nums(args)).unwrap();
            assert_eq!(result, Value::Number(*expected), "arithmetic test #{}", i + 1);
        }
    }

    #[test]
    fn test_division_by_zero_is_ieee() {
        let result = call("/", &nums(&[1.0, 0.0])).unwrap();
        assert_eq!(result, Value::Number(f64::INFINITY));
    }

    #[test]
    fn test_predicates_data_driven() {
        let test_cases: Vec<(&str, f64, f64, bool)> = vec![
            ("==", 1.0, 1.0, true),
            ("==", 0.1 + 0.2, 0.3, true),
            ("==", 1.0, 1.000_000_5, true),
            ("==", 1.0, 1.001, false),
            (">", 2.0, 1.0, true),
            (">", 1.0, 1.0, false),
            ("<", 1.0, 2.0, true),
            ("<", 2.0, 1.0, false),
            ("<", -3.0, -2.0, true),
        ];

        for (i, (name, a, b, expected)) in test_cases.iter().enumerate() {
            let result = call(name, &nums(&[*a, *b])).unwrap();
            assert_eq!(result, Value::Boolean(*expected), "predicate test #{}", i + 1);
        }
    }

    #[test]
    fn test_arity_errors() {
        let test_cases: Vec<(&str, usize, Arity)> = vec![
            ("+", 0, Arity::AtLeast(1)),
            ("-", 0, Arity::AtLeast(1)),
            ("*", 0, Arity::AtLeast(1)),
            ("/", 0, Arity::AtLeast(1)),
            ("==", 1, Arity::Exact(2)),
            (">", 3, Arity::Exact(2)),
            ("<", 0, Arity::Exact(2)),
        ];

        for (name, count, expected) in test_cases {
            let args = nums(&vec![1.0; count]);
            assert_eq!(
                call(name, &args),
                Err(EvalError::ArityMismatch {
                    procedure: name.to_owned(),
                    expected,
                    got: count,
                }),
                "{name} with {count} arguments"
            );
        }
    }

    #[test]
    fn test_arity_checked_before_arguments() {
        // a bad argument count wins over a bad argument type
        let err = call("<", &[Value::from("a")]).unwrap_err();
        assert_eq!(err, EvalError::arity("<", Arity::Exact(2), 1));

        let err = call("*", &[]).unwrap_err();
        assert_eq!(err, EvalError::arity("*", Arity::AtLeast(1), 0));
    }

    #[test]
    fn test_type_errors() {
        let err = call("+", &[Value::Number(1.0), Value::from("two")]).unwrap_err();
        assert_eq!(
            err,
            EvalError::TypeMismatch {
                procedure: "+".to_owned(),
                expected: "number",
                found: "string \"two\"".to_owned(),
            }
        );

        let err = call("<", &[Value::Boolean(true), Value::Number(1.0)]).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { .. }));
    }
}
