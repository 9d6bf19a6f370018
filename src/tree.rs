use std::fmt;
use std::mem;
use std::sync::Arc;

use serde::Serialize;

use crate::tokenize::Token;

/// The start and end byte offsets of a [Token] or [Sexp]. `end` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
  pub start: usize,
  pub end: usize,
}

impl Span {
  pub fn len(&self) -> usize {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }
}

/// Where a token or tuple sits in its source file.
///
/// `line` and `col` are 0-based and point at the first character. Columns
/// count characters, not bytes. [fmt::Display] shows them 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
  pub file: Arc<str>,
  pub span: Span,
  pub line: usize,
  pub col: usize,
}

impl Position {
  pub fn start(&self) -> usize {
    self.span.start
  }

  pub fn end(&self) -> usize {
    self.span.end
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.file, self.line + 1, self.col + 1)
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Sexp {
  Token(Token),
  Tuple(Tuple),
}

/// A delimited group such as `(a b c)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tuple {
  pub elements: Vec<Sexp>,
  /// The literal opening delimiter, e.g. `(`
  pub open: String,
  /// The literal closing delimiter, e.g. `)`
  pub close: String,
  /// Spans from the start of `open` to the end of `close`
  pub pos: Position,
}

impl Tuple {
  pub fn len(&self) -> usize {
    self.elements.len()
  }

  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }
}

// The derived drop would recurse once per nesting level
impl Drop for Tuple {
  fn drop(&mut self) {
    let mut pending = mem::take(&mut self.elements);
    while let Some(sexp) = pending.pop() {
      if let Sexp::Tuple(mut tuple) = sexp {
        pending.append(&mut tuple.elements);
      }
    }
  }
}

impl Sexp {
  pub fn pos(&self) -> &Position {
    match self {
      Sexp::Token(tok) => &tok.pos,
      Sexp::Tuple(tuple) => &tuple.pos,
    }
  }

  pub fn as_token(&self) -> Option<&Token> {
    match self {
      Sexp::Token(tok) => Some(tok),
      Sexp::Tuple(_) => None,
    }
  }

  pub fn as_tuple(&self) -> Option<&Tuple> {
    match self {
      Sexp::Token(_) => None,
      Sexp::Tuple(tuple) => Some(tuple),
    }
  }

  /// The terminals of this tree in document order, with each tuple
  /// contributing its opener and closer around its elements.
  pub fn tokens(&self) -> Vec<&str> {
    let mut out = Vec::new();
    self.collect_tokens(&mut out);
    out
  }

  fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a str>) {
    match self {
      Sexp::Token(tok) => out.push(&tok.content),
      Sexp::Tuple(tuple) => {
        out.push(&tuple.open);
        for elem in &tuple.elements {
          elem.collect_tokens(out);
        }
        out.push(&tuple.close);
      }
    }
  }
}

impl From<Token> for Sexp {
  fn from(tok: Token) -> Self {
    Sexp::Token(tok)
  }
}

impl From<Tuple> for Sexp {
  fn from(tuple: Tuple) -> Self {
    Sexp::Tuple(tuple)
  }
}

impl fmt::Display for Sexp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&crate::print(self))
  }
}
