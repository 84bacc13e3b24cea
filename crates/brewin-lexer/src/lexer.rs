//! Core Brewin lexer (converts source text to a token stream).
//!
//! Features:
//! - Integer and string literals, identifiers, `func`/`var` keywords
//! - Single-line (`//`) and block (`/* */`) comments stripped
//! - Whitespace, including newlines, is insignificant; `;` ends statements
//! - Error recovery: collects up to [`MAX_ERRORS`] errors instead of stopping
//!   at the first

use brewin_types::{BrewinError, CompileErrors, ErrorCode, SourceFile, Span, MAX_ERRORS};

use crate::token::{Token, TokenKind};

/// The Brewin lexer.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Collected errors.
    errors: CompileErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: CompileErrors,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: CompileErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            if self.errors.is_full() {
                tokens.push(Token::new(TokenKind::Eof, self.current_span()));
                break;
            }
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tracing::trace!(
            file = %self.source_file.name,
            tokens = tokens.len(),
            errors = self.errors.total_errors,
            "lexed source"
        );

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = BrewinError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and comments until the next meaningful byte.
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b' ' | b'\t' | b'\r' | b'\n'), _) => {
                    self.advance();
                }
                (Some(b'/'), Some(b'/')) => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                (Some(b'/'), Some(b'*')) => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    /// Skip a `/* ... */` comment. Block comments do not nest.
    fn skip_block_comment(&mut self) {
        let (start_line, start_col) = (self.line, self.col);
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_COMMENT,
                        "Unterminated block comment",
                        span,
                    );
                    return;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        self.skip_trivia();

        let start_line = self.line;
        let start_col = self.col;
        let start = self.pos;
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, self.current_span());
        };

        let kind = match ch {
            b'"' => self.scan_string(start_line, start_col),
            b'0'..=b'9' => self.scan_int(start, start_line, start_col),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(start),

            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'=' => TokenKind::Eq,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,

            _ => {
                // Swallow the rest of a multi-byte character so it is reported once.
                while self.peek().is_some_and(|b| (b & 0xC0) == 0x80) {
                    self.advance();
                }
                let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("Unexpected character '{text}'"),
                    span,
                );
                if self.errors.is_full() {
                    return Token::new(TokenKind::Eof, self.current_span());
                }
                // Error recovery: skip the character and try again
                return self.scan_token();
            }
        };

        Token::new(kind, self.span_from(start_line, start_col))
    }

    fn scan_int(&mut self, start: usize, start_line: u32, start_col: u32) -> TokenKind {
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]);
        match text.parse::<i64>() {
            Ok(value) => TokenKind::IntLit(value),
            Err(_) => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INTEGER_OUT_OF_RANGE,
                    format!("Integer literal '{text}' does not fit in 64 bits"),
                    span,
                );
                TokenKind::IntLit(0)
            }
        }
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]);
        TokenKind::from_keyword(&text).unwrap_or_else(|| TokenKind::Identifier(text.into_owned()))
    }

    /// Scan a string literal starting after the opening `"`.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> TokenKind {
        let mut buf = Vec::new();

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_STRING,
                        "Unterminated string literal",
                        span,
                    );
                    break;
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    if let Some(escaped) = self.scan_escape_sequence() {
                        buf.push(escaped);
                    }
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch);
                }
            }
        }

        TokenKind::StringLit(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Scan an escape sequence starting at the `\`.
    /// Returns the unescaped byte, or `None` at end of input.
    fn scan_escape_sequence(&mut self) -> Option<u8> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance();

        match self.peek() {
            Some(b'"') | Some(b'\\') => self.advance(),
            Some(b'n') => self.advance().map(|_| b'\n'),
            Some(b't') => self.advance().map(|_| b'\t'),
            // Leave the newline for the caller to report as unterminated.
            None | Some(b'\n') => None,
            Some(ch) => {
                self.advance();
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INVALID_ESCAPE,
                    format!("Invalid escape sequence '\\{}'", ch as char),
                    span,
                );
                // error recovery: keep the character as-is
                Some(ch)
            }
        }
    }
}
