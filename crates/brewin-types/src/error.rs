use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors reported before fail-fast.
pub const MAX_ERRORS: usize = 20;

/// Numeric syntax error code (E100–E199).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNEXPECTED_CHARACTER: Self = Self(101);
    pub const UNTERMINATED_STRING: Self = Self(102);
    pub const UNTERMINATED_COMMENT: Self = Self(103);
    pub const INVALID_ESCAPE: Self = Self(104);
    pub const INTEGER_OUT_OF_RANGE: Self = Self(105);
    pub const EMPTY_PROGRAM: Self = Self(106);
    pub const NESTING_TOO_DEEP: Self = Self(107);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured syntax error produced by the lexer or parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewinError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E100).
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl BrewinError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for BrewinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {} {}", self.file, self.span, self.code, self.message)
    }
}

impl std::error::Error for BrewinError {}

/// All syntax errors collected from one lex + parse pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<BrewinError>,
    pub total_errors: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Returns `true` once the error cap has been reached.
    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: BrewinError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Append every error from `other` (lexer errors ahead of parser errors).
    pub fn extend(&mut self, other: CompileErrors) {
        let stored = other.errors.len();
        for error in other.errors {
            self.push_error(error);
        }
        // Errors past the cap were counted but not stored.
        self.total_errors += other.total_errors.saturating_sub(stored);
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        if self.total_errors > self.errors.len() {
            write!(
                f,
                "\n... and {} more errors",
                self.total_errors - self.errors.len()
            )?;
        }
        Ok(())
    }
}
