pub mod ast;
mod lexer;
mod parser;

pub use lexer::TokenKind;
pub use parser::{ParseError, ParseErrorKind};

/// Parses a comma-separated list of dice expressions.
pub fn parse(s: &str) -> Result<ast::Roll, ParseError> {
    parser::Parser::new(s).parse()
}
