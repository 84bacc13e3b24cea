//! Shared types for the Brewin interpreter.
//!
//! This crate defines the AST node types, source spans and syntax error
//! types shared by the lexer, parser and evaluator.

mod error;
mod span;
pub mod ast;

pub use error::{BrewinError, CompileErrors, ErrorCode, MAX_ERRORS};
pub use span::{SourceFile, Span};
