use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::{Delimiters, Lexer, ParseError, ParseResult, Position, Sexp, Span, Token, Tuple};

/// Parse `text` with the default delimiters. `file` is only used for positions.
pub fn parse_str(file: &str, text: &str) -> ParseResult<Sexp> {
  Parser::new(file, text).parse()
}

/// Read and parse the file at `path` with the default delimiters
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<Sexp> {
  Parser::from_file(path)?.parse()
}

/// Builds [Sexp] trees out of the tokens from a [Lexer].
///
/// Nesting is tracked with an explicit stack of open tuples rather than
/// recursion, so deeply nested input can't overflow the call stack.
pub struct Parser {
  lexer: Lexer,
}

/// A tuple whose closer hasn't been seen yet
struct Frame {
  open: Token,
  elements: Vec<Sexp>,
}

impl Parser {
  pub fn new(file: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
    Parser::with_delimiters(file, text, Delimiters::default())
  }

  pub fn with_delimiters(
    file: impl Into<Arc<str>>,
    text: impl Into<String>,
    delims: Delimiters,
  ) -> Self {
    Parser { lexer: Lexer::new(file, text, delims) }
  }

  pub fn from_file(path: impl AsRef<Path>) -> ParseResult<Self> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
      .map_err(|source| ParseError::FileRead { path: path.to_path_buf(), source })?;
    Ok(Parser::new(&*path.to_string_lossy(), text))
  }

  /// Parse the whole input. The result is always a `[`/`]` tuple spanning the
  /// entire text, with every top-level expression as an element.
  pub fn parse(mut self) -> ParseResult<Sexp> {
    debug!(file = %self.lexer.file(), len = self.lexer.text().len(), "parsing");

    let mut elements = Vec::new();
    while let Some(sexp) = self.next_sexp()? {
      elements.push(sexp);
    }

    debug!(file = %self.lexer.file(), top_level = elements.len(), "parsed");
    Ok(Sexp::Tuple(Tuple {
      elements,
      open: "[".to_string(),
      close: "]".to_string(),
      pos: Position {
        file: self.lexer.file().clone(),
        span: Span { start: 0, end: self.lexer.text().len() },
        line: 0,
        col: 0,
      },
    }))
  }

  /// Returns the next complete expression, or `Ok(None)` at the end of the
  /// input. A closer that doesn't belong to the innermost open tuple is
  /// returned as an ordinary token.
  ///
  /// Grouping goes by token content alone, so multi-character pairs (which
  /// lex as identifiers) and string literals like `")"` open and close too.
  pub fn next_sexp(&mut self) -> ParseResult<Option<Sexp>> {
    let mut stack: Vec<Frame> = Vec::new();

    loop {
      let next = self.lexer.next_token().inspect_err(|e| debug!("{e}"))?;
      let Some(token) = next else {
        return match stack.pop() {
          None => Ok(None),
          Some(frame) => {
            let err = ParseError::UnclosedDelimiter {
              open: frame.open.content,
              start: frame.open.pos,
            };
            debug!("{err}");
            Err(err)
          }
        };
      };

      let delims = self.lexer.delimiters();
      let closes_innermost =
        stack.last().is_some_and(|frame| delims.matches(&frame.open.content, &token.content));

      let done = if closes_innermost {
        let frame =
          stack.pop().expect("there should be an open frame if closes_innermost is true");
        Sexp::Tuple(close_frame(frame, token))
      } else if delims.is_open(&token.content) {
        stack.push(Frame { open: token, elements: Vec::new() });
        continue;
      } else {
        Sexp::Token(token)
      };

      match stack.last_mut() {
        Some(parent) => parent.elements.push(done),
        None => return Ok(Some(done)),
      }
    }
  }
}

fn close_frame(frame: Frame, close: Token) -> Tuple {
  let Frame { open, elements } = frame;
  trace!(open = %open.content, close = %close.content, len = elements.len(), "tuple");
  Tuple {
    elements,
    pos: Position {
      file: open.pos.file,
      span: Span { start: open.pos.span.start, end: close.pos.span.end },
      line: open.pos.line,
      col: open.pos.col,
    },
    open: open.content,
    close: close.content,
  }
}

#[cfg(test)]
mod test {
  use rstest::rstest;

  use super::*;
  use crate::{TokenType, TokenizeError};

  fn parse(text: &str) -> Sexp {
    parse_str("test.yin", text).unwrap_or_else(|e| panic!("{e}"))
  }

  fn root(text: &str) -> Vec<Sexp> {
    match parse(text) {
      Sexp::Tuple(mut tuple) => std::mem::take(&mut tuple.elements),
      Sexp::Token(tok) => panic!("root should be a tuple, got {tok}"),
    }
  }

  fn tuple(sexp: &Sexp) -> &Tuple {
    sexp.as_tuple().unwrap_or_else(|| panic!("expected a tuple, got {sexp}"))
  }

  fn token(sexp: &Sexp) -> &Token {
    sexp.as_token().unwrap_or_else(|| panic!("expected a token, got {sexp}"))
  }

  #[test]
  fn flat_list() {
    let elems = root("(a b c)");
    assert_eq!(elems.len(), 1);
    let list = tuple(&elems[0]);
    assert_eq!((list.open.as_str(), list.close.as_str()), ("(", ")"));
    let contents: Vec<_> = list.elements.iter().map(|e| token(e).content.as_str()).collect();
    assert_eq!(contents, vec!["a", "b", "c"]);
    assert!(list.elements.iter().all(|e| token(e).token_type == TokenType::Identifier));
    assert_eq!(list.pos.span, Span { start: 0, end: 7 });
  }

  #[test]
  fn string_leaf() {
    let elems = root(r#"(a "hello world" c)"#);
    let list = tuple(&elems[0]);
    let s = token(&list.elements[1]);
    assert_eq!(s.token_type, TokenType::StringLiteral);
    assert_eq!(s.content, "hello world");
  }

  #[test]
  fn nested() {
    let elems = root("(a (b c) d)");
    let outer = tuple(&elems[0]);
    assert_eq!(outer.len(), 3);
    let inner = tuple(&outer.elements[1]);
    let contents: Vec<_> = inner.elements.iter().map(|e| token(e).content.as_str()).collect();
    assert_eq!(contents, vec!["b", "c"]);
    assert_eq!(inner.pos.span, Span { start: 3, end: 8 });
    assert_eq!((inner.pos.line, inner.pos.col), (0, 3));
  }

  #[test]
  fn standalone_is_leaf() {
    let elems = root("x.y");
    let contents: Vec<_> = elems.iter().map(|e| token(e).content.as_str()).collect();
    assert_eq!(contents, vec!["x", ".", "y"]);
    assert_eq!(token(&elems[1]).token_type, TokenType::Delimiter);
  }

  #[test]
  fn stray_closer_is_leaf() {
    let elems = root("a ) b");
    assert_eq!(elems.len(), 3);
    assert_eq!(token(&elems[1]).content, ")");
  }

  #[test]
  fn quoted_delimiters_group_by_content() {
    let elems = root(r#""(" x ")" (a ")""#);
    assert_eq!(elems.len(), 2);
    let first = tuple(&elems[0]);
    assert_eq!((first.open.as_str(), first.close.as_str()), ("(", ")"));
    assert_eq!(first.len(), 1);
    assert_eq!(first.pos.span, Span { start: 0, end: 9 });
    let second = tuple(&elems[1]);
    assert_eq!(token(&second.elements[0]).content, "a");
  }

  #[test]
  fn multi_char_pairs_open_tuples() {
    let delims = Delimiters::empty().with_pair("#[", "#]");
    let Sexp::Tuple(root) = Parser::with_delimiters("test.yin", "#[ a #] b", delims)
      .parse()
      .unwrap_or_else(|e| panic!("{e}"))
    else {
      panic!("root should be a tuple");
    };
    assert_eq!(root.len(), 2);
    let group = tuple(&root.elements[0]);
    assert_eq!((group.open.as_str(), group.close.as_str()), ("#[", "#]"));
    assert_eq!(token(&group.elements[0]).content, "a");
    assert_eq!(group.pos.span, Span { start: 0, end: 7 });
  }

  #[test]
  fn empty_tuples() {
    let elems = root("() [] {}");
    assert_eq!(elems.len(), 3);
    assert!(elems.iter().all(|e| tuple(e).is_empty()));
  }

  #[test]
  fn root_spans_whole_input() {
    let text = "  (a)\n b  ";
    let Sexp::Tuple(root) = parse(text) else { panic!("root should be a tuple") };
    assert_eq!((root.open.as_str(), root.close.as_str()), ("[", "]"));
    assert_eq!(root.pos.span, Span { start: 0, end: text.len() });
    assert_eq!(root.len(), 2);
  }

  #[test]
  fn empty_input() {
    assert!(root("").is_empty());
    assert!(root(" \n ").is_empty());
  }

  #[test]
  fn next_sexp_is_pull_based() {
    let mut parser = Parser::new("test.yin", "a (b) c");
    let mut seen = Vec::new();
    while let Some(sexp) = parser.next_sexp().unwrap_or_else(|e| panic!("{e}")) {
      seen.push(sexp.to_string());
    }
    assert_eq!(seen, vec!["a", "(b)", "c"]);
    assert!(parser.next_sexp().unwrap_or_else(|e| panic!("{e}")).is_none());
  }

  #[rstest]
  #[case("(a [b c} d)", "[", 3)]
  #[case("(a", "(", 0)]
  #[case("(a (b) {c", "{", 7)]
  #[case("x\n  (y", "(", 4)]
  fn unclosed(#[case] text: &str, #[case] open: &str, #[case] offset: usize) {
    match parse_str("test.yin", text) {
      Err(ParseError::UnclosedDelimiter { open: actual, start }) => {
        assert_eq!(actual, open);
        assert_eq!(start.span.start, offset);
      }
      other => panic!("expected an unclosed delimiter, got {other:?}"),
    }
  }

  #[test]
  fn unclosed_reports_line_and_column() {
    let err = parse_str("test.yin", "x\n  (y").map(|_| ()).unwrap_err();
    assert_eq!(err.to_string(), "test.yin:2:3: unclosed delimiter `(`");
  }

  #[test]
  fn runaway_string_aborts_parse() {
    let err = parse_str("test.yin", r#"(a "unterminated"#).map(|_| ()).unwrap_err();
    assert!(matches!(err, ParseError::Tokenize(TokenizeError::RunawayString { .. })));
    assert_eq!(err.position().map(Position::start), Some(3));
    assert_eq!(err.to_string(), "test.yin:1:4: runaway string");
  }

  #[test]
  fn custom_pairs() {
    let delims = Delimiters::empty().with_pair("<", ">");
    let sexp = Parser::with_delimiters("test.yin", "<a (b)>", delims)
      .parse()
      .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(sexp.to_string(), "[<a (b)>]");
  }

  #[test]
  fn deep_nesting_does_not_overflow() {
    let depth = 300_000;
    let text = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let elems = root(&text);
    let mut sexp = &elems[0];
    let mut seen = 0;
    while let Some(tuple) = sexp.as_tuple() {
      seen += 1;
      sexp = &tuple.elements[0];
    }
    assert_eq!(seen, depth);
    drop(elems);
  }

  #[test]
  fn unclosed_deep_nesting_drops_cleanly() {
    let text = format!("({}x{}", "(".repeat(200_000), ")".repeat(200_000));
    let err = parse_str("test.yin", &text).map(|_| ()).unwrap_err();
    assert!(matches!(err, ParseError::UnclosedDelimiter { .. }));
  }

  #[test]
  fn missing_file() {
    let err = parse_file("does/not/exist.yin").map(|_| ()).unwrap_err();
    assert!(matches!(err, ParseError::FileRead { .. }));
    assert!(err.position().is_none());
    assert_eq!(err.to_string(), "failed to read file: does/not/exist.yin");
  }
}
