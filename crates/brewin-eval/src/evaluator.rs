//! Tree-walking interpreter: program driver, statement executor, expression
//! evaluator and call dispatch.

use crate::console::Console;
use crate::env::{Environment, FunctionTable, Slot};
use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use brewin_types::ast::*;
use brewin_types::Span;
use tracing::{debug, trace};

/// Name of the function the driver invokes.
pub const ENTRY_FUNCTION: &str = "main";

/// Builtin that writes its arguments as one line.
pub const PRINT: &str = "print";

/// Builtin that optionally prompts, then reads one integer.
pub const INPUTI: &str = "inputi";

/// Executes Brewin programs against a [`Console`].
///
/// The console is the only state the interpreter owns. Function tables and
/// environments live for one run and one invocation respectively.
#[derive(Debug)]
pub struct Interpreter<C> {
    console: C,
}

impl<C: Console> Interpreter<C> {
    pub fn new(console: C) -> Self {
        Self { console }
    }

    pub fn into_console(self) -> C {
        self.console
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program Driver
    // ══════════════════════════════════════════════════════════════════════

    /// Register every function, then run `main` in a fresh environment.
    ///
    /// Duplicate function names and a missing `main` are reported before any
    /// statement executes. Output written before a runtime error is kept.
    #[tracing::instrument(level = "debug", skip_all, fields(functions = program.functions.len()))]
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        let functions = FunctionTable::build(program)?;
        let main = functions.get(ENTRY_FUNCTION).ok_or_else(|| {
            EvalError::name(
                program.span,
                format!("no '{ENTRY_FUNCTION}' function defined"),
            )
        })?;
        debug!("program start");
        self.run_function(&functions, main)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn run_function(&mut self, functions: &FunctionTable<'_>, def: &FuncDef) -> EvalResult<()> {
        debug!(function = %def.name.name, statements = def.body.len(), "enter function");
        let mut env = Environment::new();
        for stmt in &def.body {
            self.run_statement(functions, stmt, &mut env)?;
        }
        Ok(())
    }

    fn run_statement(
        &mut self,
        functions: &FunctionTable<'_>,
        stmt: &Stmt,
        env: &mut Environment,
    ) -> EvalResult<()> {
        trace!(line = stmt.span().start_line, "statement");
        match stmt {
            Stmt::VarDef(def) => {
                if !env.declare(&def.name.name) {
                    return Err(EvalError::name(
                        def.name.span,
                        format!("variable '{}' is already defined", def.name.name),
                    ));
                }
                Ok(())
            }
            Stmt::Assign(assign) => {
                // The target must exist before the right-hand side runs.
                if !env.is_declared(&assign.target.name) {
                    return Err(undefined_variable(&assign.target.name, assign.target.span));
                }
                let value = self.eval_expr(functions, &assign.value, env)?;
                let assigned = env.assign(&assign.target.name, value);
                debug_assert!(assigned, "target was checked before evaluation");
                Ok(())
            }
            Stmt::Call(call) => self.call(functions, call, env).map(|_| ()),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression in `env`.
    pub fn eval_expr(
        &mut self,
        functions: &FunctionTable<'_>,
        expr: &Expr,
        env: &mut Environment,
    ) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::IntLit(n) => Ok(Value::Int(*n)),
            ExprKind::StringLit(s) => Ok(Value::Str(s.clone())),
            ExprKind::Var(name) => match env.get(name) {
                Some(Slot::Value(value)) => Ok(value.clone()),
                Some(Slot::Uninitialized) => Err(EvalError::name(
                    expr.span,
                    format!("variable '{name}' is used before it is assigned"),
                )),
                None => Err(undefined_variable(name, expr.span)),
            },
            ExprKind::Binary { left, op, right } => {
                let lv = self.eval_expr(functions, left, env)?;
                let rv = self.eval_expr(functions, right, env)?;
                eval_binary(*op, lv, rv, expr.span)
            }
            ExprKind::Neg(operand) => match self.eval_expr(functions, operand, env)? {
                Value::Int(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| overflow("-", expr.span)),
                other => Err(EvalError::type_error(
                    expr.span,
                    format!("cannot negate a {}", other.type_name()),
                )),
            },
            ExprKind::Call(call) => self.call(functions, call, env)?.ok_or_else(|| {
                EvalError::type_error(
                    expr.span,
                    format!("'{}' does not produce a value", call.name.name),
                )
            }),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    /// Dispatch a call. Builtins shadow user functions of the same name.
    ///
    /// Only `inputi` produces a value.
    fn call(
        &mut self,
        functions: &FunctionTable<'_>,
        call: &Call,
        env: &mut Environment,
    ) -> EvalResult<Option<Value>> {
        match call.name.name.as_str() {
            PRINT => {
                trace!(builtin = PRINT, args = call.args.len());
                let line = self.concat_args(functions, &call.args, env)?;
                self.write_line(&line, call.span)?;
                Ok(None)
            }
            INPUTI => {
                trace!(builtin = INPUTI, args = call.args.len());
                if !call.args.is_empty() {
                    let prompt = self.concat_args(functions, &call.args, env)?;
                    self.write_line(&prompt, call.span)?;
                }
                self.read_int(call.span).map(Some)
            }
            name => {
                let def = functions.get(name).ok_or_else(|| {
                    EvalError::name(call.name.span, format!("function '{name}' is not defined"))
                })?;
                if !call.args.is_empty() {
                    return Err(EvalError::name(
                        call.span,
                        format!(
                            "function '{name}' takes no arguments, but {} were given",
                            call.args.len()
                        ),
                    ));
                }
                self.run_function(functions, def)?;
                Ok(None)
            }
        }
    }

    /// Evaluate arguments left to right and join their text forms.
    fn concat_args(
        &mut self,
        functions: &FunctionTable<'_>,
        args: &[Expr],
        env: &mut Environment,
    ) -> EvalResult<String> {
        let mut line = String::new();
        for arg in args {
            let value = self.eval_expr(functions, arg, env)?;
            line.push_str(&value.to_string());
        }
        Ok(line)
    }

    fn write_line(&mut self, line: &str, span: Span) -> EvalResult<()> {
        self.console
            .write_line(line)
            .map_err(|e| EvalError::fault(span, format!("console write failed: {e}")))
    }

    fn read_int(&mut self, span: Span) -> EvalResult<Value> {
        let line = self
            .console
            .read_line()
            .map_err(|e| EvalError::fault(span, format!("console read failed: {e}")))?
            .ok_or_else(|| EvalError::fault(span, "unexpected end of input"))?;
        let text = line.trim();
        text.parse::<i64>().map(Value::Int).map_err(|_| {
            EvalError::type_error(span, format!("input '{text}' is not a valid integer"))
        })
    }
}

fn eval_binary(op: BinOp, lv: Value, rv: Value, span: Span) -> EvalResult<Value> {
    if !lv.same_kind(&rv) {
        return Err(EvalError::type_error(
            span,
            format!(
                "incompatible types for '{op}': {} and {}",
                lv.type_name(),
                rv.type_name()
            ),
        ));
    }
    let result = match (op, lv, rv) {
        (BinOp::Add, Value::Str(a), Value::Str(b)) => return Ok(Value::Str(a + &b)),
        (BinOp::Add, Value::Int(a), Value::Int(b)) => a.checked_add(b),
        (BinOp::Sub, Value::Int(a), Value::Int(b)) => a.checked_sub(b),
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => a.checked_mul(b),
        (_, other, _) => {
            return Err(EvalError::type_error(
                span,
                format!("operator '{op}' is not supported for {}", other.type_name()),
            ))
        }
    };
    result
        .map(Value::Int)
        .ok_or_else(|| overflow(op.symbol(), span))
}

fn undefined_variable(name: &str, span: Span) -> EvalError {
    EvalError::name(span, format!("variable '{name}' is not defined"))
}

fn overflow(op: &str, span: Span) -> EvalError {
    EvalError::fault(span, format!("integer overflow in '{op}'"))
}
