use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::{Delimiters, Position, Span, TokenizeError, TokenizeResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
  pub token_type: TokenType,
  /// For string literals, the raw text between the quotes (escapes are left as is)
  pub content: String,
  pub pos: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TokenType {
  /// A single registered delimiter character, paired or standalone
  Delimiter,
  StringLiteral,
  /// Any run of characters that aren't whitespace or delimiters
  Identifier,
}

impl Token {
  pub fn is_delimiter(&self) -> bool {
    self.token_type == TokenType::Delimiter
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.token_type {
      TokenType::StringLiteral => write!(f, "\"{}\"", self.content),
      TokenType::Delimiter | TokenType::Identifier => f.write_str(&self.content),
    }
  }
}

/// Tokenize all of `text` using the default delimiters
pub fn tokenize(file: &str, text: &str) -> TokenizeResult<Vec<Token>> {
  Lexer::new(file, text, Delimiters::default()).collect()
}

/// Produces [Token]s one at a time from source text.
///
/// The cursor only ever moves forward. Once a [TokenizeError] has been
/// returned the cursor is at the end of the input, so iteration stops.
pub struct Lexer {
  file: Arc<str>,
  text: String,
  delims: Delimiters,
  /// Byte offset of the next character
  offset: usize,
  line: usize,
  col: usize,
}

impl Lexer {
  pub fn new(file: impl Into<Arc<str>>, text: impl Into<String>, delims: Delimiters) -> Self {
    Lexer { file: file.into(), text: text.into(), delims, offset: 0, line: 0, col: 0 }
  }

  pub fn file(&self) -> &Arc<str> {
    &self.file
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn delimiters(&self) -> &Delimiters {
    &self.delims
  }

  /// Returns `Ok(None)` at the end of the input
  pub fn next_token(&mut self) -> TokenizeResult<Option<Token>> {
    while self.peek().is_some_and(char::is_whitespace) {
      self.forward();
    }

    let Some(c) = self.peek() else {
      return Ok(None);
    };

    let start = self.offset;
    let line = self.line;
    let col = self.col;

    let token = if self.delims.is_delimiter_char(c) {
      self.forward();
      Token {
        token_type: TokenType::Delimiter,
        content: c.to_string(),
        pos: self.pos(start, line, col),
      }
    } else if c == '"' {
      self.string_token(start, line, col)?
    } else {
      while self.peek().is_some_and(|c| !c.is_whitespace() && !self.delims.is_delimiter_char(c)) {
        self.forward();
      }
      Token {
        token_type: TokenType::Identifier,
        content: self.text[start..self.offset].to_string(),
        pos: self.pos(start, line, col),
      }
    };

    trace!(token_type = ?token.token_type, content = %token.content, pos = %token.pos, "token");
    Ok(Some(token))
  }

  /// Scan a string literal. A quote only ends the string if the character
  /// right before it isn't a backslash, so `"a\\"` is unterminated.
  fn string_token(&mut self, start: usize, line: usize, col: usize) -> TokenizeResult<Token> {
    // opening quote
    self.forward();
    let content_start = self.offset;

    let mut prev = '"';
    loop {
      match self.forward() {
        None => {
          return Err(TokenizeError::RunawayString {
            start: Position {
              file: self.file.clone(),
              span: Span { start, end: start + 1 },
              line,
              col,
            },
          });
        }
        Some('"') if prev != '\\' => break,
        Some(c) => prev = c,
      }
    }

    // The closing quote is a single byte
    let content_end = self.offset - 1;
    Ok(Token {
      token_type: TokenType::StringLiteral,
      content: self.text[content_start..content_end].to_string(),
      pos: self.pos(start, line, col),
    })
  }

  fn peek(&self) -> Option<char> {
    self.text[self.offset..].chars().next()
  }

  fn forward(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.offset += c.len_utf8();
    if c == '\n' {
      self.line += 1;
      self.col = 0;
    } else {
      self.col += 1;
    }
    Some(c)
  }

  /// Position from `start` up to the cursor
  fn pos(&self, start: usize, line: usize, col: usize) -> Position {
    Position { file: self.file.clone(), span: Span { start, end: self.offset }, line, col }
  }
}

impl Iterator for Lexer {
  type Item = TokenizeResult<Token>;

  fn next(&mut self) -> Option<Self::Item> {
    self.next_token().transpose()
  }
}
