//! Token types for the Brewin lexer.
//!
//! Defines [`TokenKind`] covering every lexeme in Brewin and [`Token`],
//! which pairs a kind with a source [`Span`].

use brewin_types::Span;
use std::fmt;

/// Reserved identifiers. These cannot be used as variable or function names.
pub const ALL_KEYWORDS: &[&str] = &["func", "var"];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the Brewin lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the Brewin language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────

    /// Integer literal: `42`. Always non-negative; `-` is a separate token.
    IntLit(i64),
    /// String literal with escapes resolved: `"hello"`
    StringLit(String),

    // ── Identifiers & Keywords ───────────────────────────────

    /// User-defined identifier: `first`, `main`, `inputi`
    Identifier(String),
    /// `func`
    Func,
    /// `var`
    Var,

    // ── Operators ────────────────────────────────────────────

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `=`
    Eq,

    // ── Punctuation ──────────────────────────────────────────

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,

    /// End of file
    Eof,
}

impl TokenKind {
    /// Look up a reserved identifier.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "func" => Some(TokenKind::Func),
            "var" => Some(TokenKind::Var),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Func | TokenKind::Var)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLit(n) => write!(f, "{n}"),
            TokenKind::StringLit(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::Func => f.write_str("func"),
            TokenKind::Var => f.write_str("var"),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Eq => f.write_str("="),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}
