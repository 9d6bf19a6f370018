use crate::Sexp;
use crate::TokenType;

/// Render a tree on one line, the way it would be written by hand.
///
/// This is for looking at trees, not for storing them. Whitespace and
/// positions are lost, and string contents are written back unchanged.
pub fn print(sexp: &Sexp) -> String {
  let mut buf = String::new();
  print_impl(sexp, &mut buf);
  buf
}

fn print_impl(sexp: &Sexp, buf: &mut String) {
  match sexp {
    Sexp::Token(tok) => match tok.token_type {
      TokenType::StringLiteral => {
        buf.push('"');
        buf.push_str(&tok.content);
        buf.push('"');
      }
      TokenType::Delimiter | TokenType::Identifier => buf.push_str(&tok.content),
    },
    Sexp::Tuple(tuple) => {
      buf.push_str(&tuple.open);
      for (i, elem) in tuple.elements.iter().enumerate() {
        if i > 0 {
          buf.push(' ');
        }
        print_impl(elem, buf);
      }
      buf.push_str(&tuple.close);
    }
  }
}

/// Render a tree with one element per line, indenting the contents of each
/// tuple by two spaces. Tuples with no nested tuples stay on one line.
pub fn print_pretty(sexp: &Sexp) -> String {
  let mut buf = String::new();
  print_pretty_impl(sexp, 0, &mut buf);
  buf
}

fn print_pretty_impl(sexp: &Sexp, indent: usize, buf: &mut String) {
  for _ in 0..indent {
    buf.push_str("  ");
  }
  match sexp {
    Sexp::Tuple(tuple) if tuple.elements.iter().any(|elem| elem.as_tuple().is_some()) => {
      buf.push_str(&tuple.open);
      buf.push('\n');
      for elem in &tuple.elements {
        print_pretty_impl(elem, indent + 1, buf);
        buf.push('\n');
      }
      for _ in 0..indent {
        buf.push_str("  ");
      }
      buf.push_str(&tuple.close);
    }
    _ => print_impl(sexp, buf),
  }
}
