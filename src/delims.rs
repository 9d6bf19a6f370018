use std::collections::{HashMap, HashSet};

/// The delimiters a [crate::Lexer] splits on and a [crate::Parser] groups by.
///
/// Paired delimiters open and close tuples. Standalone delimiters (like `.`)
/// are always their own token but never group anything.
#[derive(Clone, Debug)]
pub struct Delimiters {
  all: HashSet<String>,
  /// Opener to closer
  pairs: HashMap<String, String>,
}

impl Delimiters {
  /// A registry with no delimiters at all
  pub fn empty() -> Self {
    Delimiters { all: HashSet::new(), pairs: HashMap::new() }
  }

  /// Register `open` as a delimiter that must be closed by `close`. A second
  /// registration of the same `open` replaces the first closer.
  pub fn register_pair(&mut self, open: impl Into<String>, close: impl Into<String>) {
    let open = open.into();
    let close = close.into();
    self.all.insert(open.clone());
    self.all.insert(close.clone());
    self.pairs.insert(open, close);
  }

  pub fn register_standalone(&mut self, delim: impl Into<String>) {
    self.all.insert(delim.into());
  }

  pub fn with_pair(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
    self.register_pair(open, close);
    self
  }

  pub fn with_standalone(mut self, delim: impl Into<String>) -> Self {
    self.register_standalone(delim);
    self
  }

  pub fn is_delimiter(&self, s: &str) -> bool {
    self.all.contains(s)
  }

  pub fn is_delimiter_char(&self, c: char) -> bool {
    let mut buf = [0; 4];
    self.is_delimiter(c.encode_utf8(&mut buf))
  }

  pub fn is_open(&self, s: &str) -> bool {
    self.pairs.contains_key(s)
  }

  pub fn is_close(&self, s: &str) -> bool {
    self.pairs.values().any(|close| close == s)
  }

  /// The closer `open` requires, or [None] if `open` doesn't open anything
  pub fn close_for(&self, open: &str) -> Option<&str> {
    self.pairs.get(open).map(String::as_str)
  }

  pub fn matches(&self, open: &str, close: &str) -> bool {
    self.close_for(open) == Some(close)
  }
}

impl Default for Delimiters {
  /// `()`, `{}` and `[]` pairs, plus `.` for field access
  fn default() -> Self {
    Delimiters::empty()
      .with_pair("(", ")")
      .with_pair("{", "}")
      .with_pair("[", "]")
      .with_standalone(".")
  }
}
