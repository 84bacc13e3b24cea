//! AST node types for the Brewin language.
//!
//! Every node carries a [`Span`] for error reporting. Node kinds are closed
//! enums, so every consumer matches them exhaustively.

use crate::Span;
use serde::Serialize;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete Brewin program: one or more function definitions, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub functions: Vec<FuncDef>,
    pub span: Span,
}

/// `func name() { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncDef {
    pub name: Ident,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `var x;`
    VarDef(VarDef),
    /// `x = expr;`
    Assign(Assign),
    /// `f(args);`
    Call(Call),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDef(v) => v.span,
            Stmt::Assign(a) => a.span,
            Stmt::Call(c) => c.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDef {
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign {
    pub target: Ident,
    pub value: Expr,
    pub span: Span,
}

/// A call, used both as a statement and as an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub name: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// `42`
    IntLit(i64),
    /// `"hello"`
    StringLit(String),
    /// `x`
    Var(String),
    /// `a + b`, `a - b`, `a * b`
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `-a`
    Neg(Box<Expr>),
    /// `f(args)`
    Call(Call),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
