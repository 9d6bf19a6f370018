//! Lexer and parser for delimited S-expression source.
//!
//! Source text is split into [Token]s by a [Lexer] and folded into a tree of
//! [Sexp]s by a [Parser]. Which characters open, close or separate is decided
//! by a [Delimiters] registry owned by each lexer.

mod delims;
mod error;
mod parse;
mod print;
mod tokenize;
mod tree;

pub use delims::Delimiters;
pub use error::{ParseError, ParseResult, TokenizeError, TokenizeResult};
pub use parse::{Parser, parse_file, parse_str};
pub use print::{print, print_pretty};
pub use tokenize::{Lexer, Token, TokenType, tokenize};
pub use tree::{Position, Sexp, Span, Tuple};
