use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser as ClapParser;
use log::{error, Level};

/// Mirrors this codebase's `why` binary: a `clap`-derived CLI with a verbosity flag mapped onto
/// `simple_logger`, adapted from a subcommand tree to the single positional file argument this
/// interpreter needs.
#[derive(ClapParser, Debug)]
#[command(author, version, about = "A tree-walking interpreter for Lox.")]
struct Cli {
    /// Lox source file to run.
    file: PathBuf,

    #[arg(short, long, default_value = "error")]
    verbosity: LogLevel,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprint!("{e}");
            return ExitCode::from(1);
        }
    };
    simple_logger::init_with_level(cli.verbosity.into()).expect("logger should only be initialized once");

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            error!("{e}");
            eprintln!("Could not read file '{}': {e}", cli.file.display());
            return ExitCode::from(1);
        }
    };

    match lox::run_source(&source, io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!("{run_error}");
            eprint!("{run_error}");
            ExitCode::from(run_error.exit_code() as u8)
        }
    }
}
