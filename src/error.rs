use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Error)]
pub enum TokenizeError {
  /// Hit EOF before the closing quote of a string literal
  #[error("{start}: runaway string")]
  RunawayString {
    /// Position of the opening quote
    start: Position,
  },
}

pub type TokenizeResult<T> = Result<T, TokenizeError>;

#[derive(Debug, Error)]
pub enum ParseError {
  #[error("failed to read file: {}", path.display())]
  FileRead {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error(transparent)]
  Tokenize(#[from] TokenizeError),
  /// Hit EOF before finding the closer for `open`
  #[error("{start}: unclosed delimiter `{open}`")]
  UnclosedDelimiter { open: String, start: Position },
}

pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
  /// Where in the source the error was detected. [None] for read failures,
  /// which happen before there is any source.
  pub fn position(&self) -> Option<&Position> {
    match self {
      ParseError::FileRead { .. } => None,
      ParseError::Tokenize(TokenizeError::RunawayString { start }) => Some(start),
      ParseError::UnclosedDelimiter { start, .. } => Some(start),
    }
  }
}
