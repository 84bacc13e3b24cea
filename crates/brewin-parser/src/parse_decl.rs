//! Top-level parsing: the program and its function definitions.

use brewin_lexer::token::TokenKind;
use brewin_types::ast::*;
use brewin_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a complete program: `FuncDef { FuncDef }`.
    pub(crate) fn parse_program(&mut self) -> Option<Program> {
        let start = self.current_span();
        let mut functions = Vec::new();

        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if self.check(&TokenKind::Func) {
                if let Some(func) = self.parse_func_def() {
                    functions.push(func);
                } else {
                    self.skip_to_next_func();
                }
            } else {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!(
                        "expected 'func' at top level, got '{}'",
                        self.peek_kind()
                    ),
                );
                self.skip_to_next_func();
            }
        }

        if functions.is_empty() && !self.too_many_errors() {
            self.error_at_current(
                ErrorCode::EMPTY_PROGRAM,
                "a program must define at least one function",
            );
        }

        let span = start.merge(self.previous_span());
        Some(Program { functions, span })
    }

    /// `func name() { body }`
    fn parse_func_def(&mut self) -> Option<FuncDef> {
        let start = self.current_span();
        self.advance(); // eat `func`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        if !self.check(&TokenKind::RParen) {
            self.error_with_suggestion(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected ')', got '{}'", self.peek_kind()),
                "functions take no parameters",
            );
            return None;
        }
        self.advance(); // eat `)`
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(FuncDef { name, body, span })
    }

    /// Error recovery at the top level: resume at the next `func`.
    ///
    /// Callers either sit on a non-`func` token or have already consumed the
    /// failed definition's `func`, so this never loops in place.
    fn skip_to_next_func(&mut self) {
        while !self.at_end() && !self.check(&TokenKind::Func) {
            self.advance();
        }
    }
}
