//! Runtime error types for the Brewin evaluator.

use brewin_types::{CompileErrors, Span};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The language-level error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// Undeclared, redeclared, uninitialised or undefined names.
    Name,
    /// Operands or inputs of the wrong kind.
    Type,
    /// Faults outside the language's own rules: duplicate functions,
    /// integer overflow, console failures.
    Fault,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name error"),
            Self::Type => f.write_str("type error"),
            Self::Fault => f.write_str("fault error"),
        }
    }
}

/// Evaluation error. The first one raised ends the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("name error at {span}: {message}")]
    Name { message: String, span: Span },

    #[error("type error at {span}: {message}")]
    Type { message: String, span: Span },

    #[error("fault error at {span}: {message}")]
    Fault { message: String, span: Span },
}

impl EvalError {
    pub fn name(span: Span, message: impl Into<String>) -> Self {
        Self::Name {
            message: message.into(),
            span,
        }
    }

    pub fn type_error(span: Span, message: impl Into<String>) -> Self {
        Self::Type {
            message: message.into(),
            span,
        }
    }

    pub fn fault(span: Span, message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
            span,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            Self::Name { .. } => ErrorType::Name,
            Self::Type { .. } => ErrorType::Type,
            Self::Fault { .. } => ErrorType::Fault,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Name { message, .. }
            | Self::Type { message, .. }
            | Self::Fault { message, .. } => message,
        }
    }

    /// Where in the source the error was detected.
    pub fn span(&self) -> Span {
        match self {
            Self::Name { span, .. } | Self::Type { span, .. } | Self::Fault { span, .. } => *span,
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Failure of the whole source → output pipeline.
#[derive(Debug, Error)]
pub enum RunError {
    /// The source did not lex or parse; nothing was executed.
    #[error("{0}")]
    Syntax(CompileErrors),

    /// The program started and failed at runtime.
    #[error(transparent)]
    Eval(#[from] EvalError),
}
