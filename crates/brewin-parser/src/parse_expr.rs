//! Expression parsing.
//!
//! Precedence (lowest → highest):
//! 3. `+`, `-` (left-associative)
//! 2. `*` (left-associative)
//! 1. unary `-`
//!
//! Primaries: integer and string literals, variables, calls, `( expr )`.
//!
//! Every subtree is built together with its height so that chains of
//! operators or signs cannot grow a tree deeper than `MAX_EXPR_HEIGHT`.

use brewin_lexer::token::TokenKind;
use brewin_types::ast::*;
use brewin_types::{ErrorCode, Span};

use crate::parser::{Parser, MAX_EXPR_DEPTH, MAX_EXPR_HEIGHT};

/// An expression and the height of its tree (a literal has height 1).
struct Tree {
    expr: Expr,
    height: u32,
}

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_nested().map(|tree| tree.expr)
    }

    fn parse_nested(&mut self) -> Option<Tree> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("maximum expression nesting depth is {MAX_EXPR_DEPTH}"),
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_add();
        self.expr_depth -= 1;
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Option<Tree> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            left = self.binary(left, op, right)?;
        }
        Some(left)
    }

    /// `MulExpr = UnaryExpr { "*" UnaryExpr }`
    fn parse_mul(&mut self) -> Option<Tree> {
        let mut left = self.parse_unary()?;
        while self.eat(&TokenKind::Star) {
            let right = self.parse_unary()?;
            left = self.binary(left, BinOp::Mul, right)?;
        }
        Some(left)
    }

    /// `UnaryExpr = { "-" } PrimaryExpr`
    fn parse_unary(&mut self) -> Option<Tree> {
        let mut signs = Vec::new();
        while self.check(&TokenKind::Minus) {
            let span = self.advance().span;
            if signs.len() as u32 >= MAX_EXPR_HEIGHT {
                self.too_deep(span);
                return None;
            }
            signs.push(span);
        }
        let mut tree = self.parse_primary()?;
        // Innermost minus applies first.
        for sign in signs.into_iter().rev() {
            let span = sign.merge(tree.expr.span);
            let height = tree.height + 1;
            tree = self.node(ExprKind::Neg(Box::new(tree.expr)), span, height)?;
        }
        Some(tree)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Option<Tree> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::IntLit(n) => {
                self.advance();
                self.node(ExprKind::IntLit(n), start, 1)
            }
            TokenKind::StringLit(s) => {
                self.advance();
                self.node(ExprKind::StringLit(s), start, 1)
            }
            TokenKind::LParen => {
                self.advance(); // eat `(`
                let inner = self.parse_nested()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Some(Tree {
                    expr: Expr::new(inner.expr.kind, span),
                    height: inner.height,
                })
            }
            TokenKind::Identifier(name) => {
                if *self.look_ahead(1) == TokenKind::LParen {
                    let (call, args_height) = self.parse_call_tree()?;
                    let span = call.span;
                    self.node(ExprKind::Call(call), span, args_height + 1)
                } else {
                    self.advance();
                    self.node(ExprKind::Var(name), start, 1)
                }
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Call Parsing
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse `name(args...)`, shared by call statements and call expressions.
    pub(crate) fn parse_call(&mut self) -> Option<Call> {
        self.parse_call_tree().map(|(call, _)| call)
    }

    /// Parse a call; also returns the height of its tallest argument.
    fn parse_call_tree(&mut self) -> Option<(Call, u32)> {
        let start = self.current_span();
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let (args, height) = self.parse_arg_list()?;
        self.expect(&TokenKind::RParen)?;
        let span = start.merge(self.previous_span());
        Some((Call { name, args, span }, height))
    }

    /// Parse a comma-separated argument list (inside parens).
    fn parse_arg_list(&mut self) -> Option<(Vec<Expr>, u32)> {
        let mut args = Vec::new();
        let mut height = 0;
        if self.check(&TokenKind::RParen) {
            return Some((args, height));
        }
        loop {
            let arg = self.parse_nested()?;
            height = height.max(arg.height);
            args.push(arg.expr);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Some((args, height))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Tree Construction
    // ══════════════════════════════════════════════════════════════════════════

    fn binary(&mut self, left: Tree, op: BinOp, right: Tree) -> Option<Tree> {
        let span = left.expr.span.merge(right.expr.span);
        let height = left.height.max(right.height) + 1;
        self.node(
            ExprKind::Binary {
                left: Box::new(left.expr),
                op,
                right: Box::new(right.expr),
            },
            span,
            height,
        )
    }

    /// Wrap `kind` as a tree node, rejecting it once it exceeds `MAX_EXPR_HEIGHT`.
    fn node(&mut self, kind: ExprKind, span: Span, height: u32) -> Option<Tree> {
        if height > MAX_EXPR_HEIGHT {
            self.too_deep(span);
            return None;
        }
        Some(Tree {
            expr: Expr::new(kind, span),
            height,
        })
    }

    fn too_deep(&mut self, span: Span) {
        self.error_at(
            ErrorCode::NESTING_TOO_DEEP,
            format!("expression is too deeply nested (maximum height is {MAX_EXPR_HEIGHT})"),
            span,
        );
    }
}
