//! Stack growth for the recursive parser and evaluator.
//!
//! Both recurse once per nesting level, so deep programs would otherwise be
//! bounded by the native stack of whatever thread runs them. The depth limits
//! in [`crate::ParseConfig`] and [`crate::EvalConfig`] stay the only cap.

/// Grow the stack if less than 128KB remains, by 1MB at a time.
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(128 * 1024, 1024 * 1024, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_recursion() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
        }

        assert_eq!(depth(100_000), 100_000);
    }
}
