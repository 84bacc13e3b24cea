//! Variable environment and function table for the Brewin evaluator.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use brewin_types::ast::{FuncDef, Program};
use std::collections::BTreeMap;

/// A variable binding: declared by `var`, filled by assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Uninitialized,
    Value(Value),
}

/// The flat variable scope of one function invocation.
///
/// Created empty when the invocation begins and dropped when it returns;
/// nothing is shared with callers or callees.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: BTreeMap<String, Slot>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` as uninitialized.
    /// Returns `false` (and changes nothing) if it was already declared.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.bindings.contains_key(name) {
            return false;
        }
        self.bindings.insert(name.to_string(), Slot::Uninitialized);
        true
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Overwrite a declared variable.
    /// Returns `false` (and changes nothing) if `name` was never declared.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self.bindings.get_mut(name) {
            Some(slot) => {
                *slot = Slot::Value(value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.bindings.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Function definitions by name, built once per run and read-only after.
#[derive(Debug)]
pub struct FunctionTable<'ast> {
    functions: BTreeMap<&'ast str, &'ast FuncDef>,
}

impl<'ast> FunctionTable<'ast> {
    /// Register every function of `program`.
    ///
    /// A second definition with an already-registered name is a fault.
    pub fn build(program: &'ast Program) -> EvalResult<Self> {
        let mut functions = BTreeMap::new();
        for func in &program.functions {
            if functions.insert(func.name.name.as_str(), func).is_some() {
                return Err(EvalError::fault(
                    func.name.span,
                    format!("function '{}' is defined more than once", func.name.name),
                ));
            }
        }
        Ok(Self { functions })
    }

    pub fn get(&self, name: &str) -> Option<&'ast FuncDef> {
        self.functions.get(name).copied()
    }
}
