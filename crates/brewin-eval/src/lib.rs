//! Brewin tree-walking evaluator.
//!
//! Executes a parsed [`Program`](brewin_types::ast::Program) directly from
//! the AST. All I/O goes through a [`Console`]; the first runtime error ends
//! the run and is returned as an [`EvalError`].

mod console;
mod env;
mod error;
mod evaluator;
mod value;

pub use console::{BufferedConsole, Console, StdConsole};
pub use env::{Environment, FunctionTable, Slot};
pub use error::{ErrorType, EvalError, EvalResult, RunError};
pub use evaluator::{Interpreter, ENTRY_FUNCTION, INPUTI, PRINT};
pub use value::Value;

use brewin_types::SourceFile;

/// Lex, parse and run a source file.
///
/// Nothing executes when the source has syntax errors. Pass `&mut console`
/// to inspect the console afterwards.
pub fn run_source<C: Console>(source_file: &SourceFile, console: C) -> Result<(), RunError> {
    let parsed = brewin_parser::parse_source(source_file);
    if parsed.errors.has_errors() {
        return Err(RunError::Syntax(parsed.errors));
    }
    let Some(program) = parsed.program else {
        return Err(RunError::Syntax(parsed.errors));
    };
    Interpreter::new(console).run(&program)?;
    Ok(())
}
