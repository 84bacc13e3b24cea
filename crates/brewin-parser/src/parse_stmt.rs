//! Statement parsing.

use crate::parser::Parser;
use brewin_lexer::token::TokenKind;
use brewin_types::ast::*;
use brewin_types::ErrorCode;

impl<'src> Parser<'src> {
    /// Parse a function body: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Option<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace)
            && !self.check(&TokenKind::Func)
            && !self.at_end()
        {
            if self.too_many_errors() {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            } else {
                self.synchronize();
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Some(stmts)
    }

    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::Var => self.parse_var_def(),
            TokenKind::Identifier(_) => match self.look_ahead(1) {
                TokenKind::Eq => self.parse_assignment(),
                TokenKind::LParen => {
                    let call = self.parse_call()?;
                    self.expect_semicolon()?;
                    Some(Stmt::Call(call))
                }
                other => {
                    let message = format!("expected '=' or '(' after identifier, got '{other}'");
                    self.advance();
                    self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                    None
                }
            },
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected statement, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// `var name;`
    fn parse_var_def(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `var`
        let name = self.expect_identifier()?;
        if self.check(&TokenKind::Eq) {
            self.error_with_suggestion(
                ErrorCode::UNEXPECTED_TOKEN,
                "expected ';', got '='",
                format!("declare first, then assign: var {0}; {0} = ...;", name.name),
            );
            return None;
        }
        self.expect_semicolon()?;
        let span = start.merge(self.previous_span());
        Some(Stmt::VarDef(VarDef { name, span }))
    }

    /// `name = expr;`
    fn parse_assignment(&mut self) -> Option<Stmt> {
        let target = self.expect_identifier()?;
        self.advance(); // eat `=`
        let value = self.parse_expression()?;
        self.expect_semicolon()?;
        let span = target.span.merge(self.previous_span());
        Some(Stmt::Assign(Assign {
            target,
            value,
            span,
        }))
    }

    fn expect_semicolon(&mut self) -> Option<()> {
        self.expect(&TokenKind::Semicolon).map(|_| ())
    }
}
