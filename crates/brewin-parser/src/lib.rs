//! Brewin parser: converts a token stream into an AST.

mod parse_decl;
mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser};

use brewin_lexer::Lexer;
use brewin_types::SourceFile;

/// Lex and parse a source file in one step.
///
/// Lexer errors come first in the returned error list, followed by parser
/// errors. The parser still runs over a token stream with lexer errors so
/// that both kinds are reported together.
pub fn parse_source(source_file: &SourceFile) -> ParseResult {
    let lexed = Lexer::new(source_file).lex();
    let mut result = Parser::new(lexed.tokens, source_file).parse();
    let mut errors = lexed.errors;
    errors.extend(result.errors);
    result.errors = errors;
    result
}
