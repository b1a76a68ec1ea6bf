//! Chained lexical scopes.
//!
//! An environment is an append-only list of bindings plus an optional link to
//! its parent. `define` appends to one environment; a newer binding of the
//! same name shadows the older one in that scope, and closures holding the
//! scope see the newer binding. Lookup walks outward until a binding is found
//! or the chain is exhausted.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

#[derive(Default)]
pub struct Environment {
    bindings: RefCell<Vec<(String, Value)>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// A root environment with no bindings
    pub fn new() -> Rc<Self> {
        Rc::new(Environment::default())
    }

    /// A child scope of `parent`
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(Vec::new()),
            parent: Some(parent),
        })
    }

    pub fn parent(&self) -> Option<&Rc<Environment>> {
        self.parent.as_ref()
    }

    /// Bind `name` in this scope, shadowing any earlier binding here.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().push((name.into(), value));
    }

    /// Find the newest binding of `name`, searching outward through parents.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let local = self
            .bindings
            .borrow()
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone());

        match local {
            Some(value) => Some(value),
            None => self.parent.as_ref().and_then(|parent| parent.lookup(name)),
        }
    }

    /// Bindings of this scope only, newest first, shadowed entries included
    pub fn local_bindings(&self) -> Vec<(String, Value)> {
        self.bindings.borrow().iter().rev().cloned().collect()
    }

    /// Number of scopes from this one up to the root, inclusive
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |parent| parent.depth())
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Names only; values can be closures that point back here.
        let names: Vec<String> = self
            .bindings
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let root = Environment::new();
        root.define("x", Value::Number(1.0));
        root.define("y", Value::Number(2.0));

        let child = Environment::with_parent(Rc::clone(&root));
        child.define("x", Value::Number(10.0));

        assert_eq!(child.lookup("x"), Some(Value::Number(10.0)));
        assert_eq!(child.lookup("y"), Some(Value::Number(2.0)));
        assert_eq!(root.lookup("x"), Some(Value::Number(1.0)));
        assert_eq!(child.lookup("z"), None);
        assert_eq!(child.depth(), 2);
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_same_scope_define_shadows() {
        let env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.define("x", Value::Number(2.0));

        assert_eq!(env.lookup("x"), Some(Value::Number(2.0)));
        let names: Vec<String> = env.local_bindings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "x"]);
        assert_eq!(env.local_bindings()[0].1, Value::Number(2.0));
    }

    #[test]
    fn test_child_define_does_not_touch_parent() {
        let root = Environment::new();
        let child = Environment::with_parent(Rc::clone(&root));
        child.define("only-here", Value::Boolean(true));
        assert_eq!(root.lookup("only-here"), None);
        assert!(root.local_bindings().is_empty());
    }

    #[test]
    fn test_debug_lists_names() {
        let env = Environment::new();
        env.define("a", Value::Number(1.0));
        assert_eq!(
            format!("{env:?}"),
            "Environment { names: [\"a\"], depth: 1 }"
        );
    }
}
