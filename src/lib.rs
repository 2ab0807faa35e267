pub mod util;
pub mod interpreter;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use clap::Parser as ClapParser;
use thiserror::Error;
use tracing::debug;
use crate::interpreter::ast::Program;
use crate::interpreter::evaluator::Evaluator;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;
use crate::interpreter::value::Value;

const PROMPT: &str = ">> ";

#[derive(ClapParser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Source file to run, starts a REPL if omitted")]
    pub input: Option<PathBuf>,

    #[clap(long, help = "Print the parsed program before evaluating it")]
    pub print_ast: bool,
    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{}", .0.join("\n"))]
    Syntax(Vec<String>),
    #[error("ERROR: {0}")]
    Runtime(String),
}

/// Parses a complete program, failing with every recorded syntax error.
pub fn parse(source: &str) -> Result<Program, Error> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse();

    if parser.had_error() {
        Err(Error::Syntax(parser.into_errors()))
    } else {
        Ok(program)
    }
}

pub fn run(config: &Config) -> Result<(), Error> {
    match &config.input {
        Some(path) => run_file(path, std::io::stdout().lock(), config),
        None => repl(std::io::stdin().lock(), std::io::stdout().lock(), config),
    }
}

/// Evaluates a whole file. The result is written to `output` unless it is `null`.
pub fn run_file<W: Write>(path: &Path, mut output: W, config: &Config) -> Result<(), Error> {
    debug!(path = %path.display(), "running file");

    let source = std::fs::read_to_string(path)?;
    let program = parse(&source)?;

    if config.print_ast {
        writeln!(output, "{}", program)?;
    }

    let mut evaluator = Evaluator::new();

    match evaluator.evaluate_program(&program) {
        Value::Error(message) => Err(Error::Runtime(message)),
        Value::Null => Ok(()),
        value => {
            writeln!(output, "{}", value.inspect())?;
            Ok(())
        },
    }
}

/// Reads programs line by line, evaluating each in one persistent environment.
pub fn repl<R: BufRead, W: Write>(input: R, mut output: W, config: &Config) -> Result<(), Error> {
    let mut evaluator = Evaluator::new();

    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;

        match parse(&line) {
            Ok(program) => {
                if config.print_ast {
                    writeln!(output, "{}", program)?;
                }

                writeln!(output, "{}", evaluator.evaluate_program(&program).inspect())?;
            },
            Err(Error::Syntax(errors)) => {
                writeln!(output, "parser errors:")?;

                for error in errors {
                    writeln!(output, "\t{}", error)?;
                }
            },
            Err(error) => return Err(error),
        }

        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    writeln!(output)?;
    Ok(())
}
