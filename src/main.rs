use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use delimit::{Delimiters, Lexer, ParseError, ParseResult};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
  /// The whole tree on one line
  #[default]
  Tree,
  /// One tuple element per line, indented by depth
  Pretty,
  /// The tree as JSON, positions included
  Json,
  /// The token stream, one token per line
  Tokens,
}

#[derive(Parser)]
#[command(name = "delimit", version)]
#[command(about = "Parse a source file into S-expressions and print the result")]
struct Cli {
  /// File to parse
  path: PathBuf,

  #[arg(long, short = 'f', value_enum, default_value_t = Format::Tree)]
  format: Format,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  match run(&cli) {
    Ok(out) => {
      println!("{out}");
      ExitCode::SUCCESS
    }
    Err(e) => {
      eprintln!("error: {e}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
  let out = match cli.format {
    Format::Tree => delimit::print(&delimit::parse_file(&cli.path)?),
    Format::Pretty => delimit::print_pretty(&delimit::parse_file(&cli.path)?),
    Format::Json => serde_json::to_string_pretty(&delimit::parse_file(&cli.path)?)?,
    Format::Tokens => dump_tokens(cli)?,
  };
  Ok(out)
}

fn dump_tokens(cli: &Cli) -> ParseResult<String> {
  let text = std::fs::read_to_string(&cli.path)
    .map_err(|source| ParseError::FileRead { path: cli.path.clone(), source })?;
  token_lines(Lexer::new(&*cli.path.to_string_lossy(), text, Delimiters::default()))
}

/// One `file:line:col kind token` line per token
fn token_lines(lexer: Lexer) -> ParseResult<String> {
  let mut lines = Vec::new();
  for token in lexer {
    let token = token?;
    lines.push(format!("{} {:?} {}", token.pos, token.token_type, token));
  }
  Ok(lines.join("\n"))
}
