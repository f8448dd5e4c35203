pub mod ast;
pub mod diagnostics;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod token;
pub mod value;

use std::{io::Write, rc::Rc};

use log::info;

pub use self::interpreter::{Interpreter, RuntimeError};
pub use self::lexer::{LexError, Lexer};
pub use self::parser::{ParseError, Parser};
pub use self::resolver::{ResolveError, Resolver};

/// The three ways a run can fail before or during evaluation, used by the driver to pick an
/// exit code (§6's `sysexits.h`-derived scheme: 65 for any static error, 70 for a runtime one).
#[derive(Debug)]
pub enum RunError {
    Lex(Vec<LexError>),
    Parse(ParseError),
    Resolve(Vec<ResolveError>),
    Runtime(RuntimeError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Lex(errors) => {
                for e in errors {
                    writeln!(f, "{e}")?;
                }
                Ok(())
            }
            RunError::Parse(e) => write!(f, "{e}"),
            RunError::Resolve(errors) => {
                for e in errors {
                    writeln!(f, "{e}")?;
                }
                Ok(())
            }
            RunError::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {}

impl RunError {
    /// The `sysexits.h` code the driver should exit with for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Lex(_) | RunError::Parse(_) | RunError::Resolve(_) => 65,
            RunError::Runtime(_) => 70,
        }
    }
}

/// Runs the whole pipeline — lex, parse, resolve, evaluate — against a source string, writing
/// `print` output to `out`. Shared by the CLI binary and the integration tests under `tests/`,
/// which swap `out` for an in-memory buffer instead of shelling out to a compiled artifact.
pub fn run_source(source: &str, out: impl Write) -> Result<(), RunError> {
    let source: Rc<str> = Rc::from(source);

    let tokens = Lexer::new(&source).lex().map_err(RunError::Lex)?;
    info!("lexed {} tokens", tokens.len());

    let statements = Parser::new(tokens, source.clone()).parse().map_err(RunError::Parse)?;
    info!("parsed {} statements", statements.len());

    let locals = Resolver::new(source).resolve(&statements).map_err(RunError::Resolve)?;
    info!("resolved {} variable references", locals.len());

    info!("interpreting");
    Interpreter::new(locals, out).interpret(&statements).map_err(RunError::Runtime)
}
