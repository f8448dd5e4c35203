use std::fmt::{self, Display};

use crate::token::Token;

/// A runtime error: an offending token (for its line) plus a message. Reported differently from
/// the static `LexError`/`ParseError`/`ResolveError` family — a one-line message followed by
/// `[line N]`, not a caret-annotated source excerpt, per this stage's own diagnostic contract.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: token.line,
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.line)
    }
}

impl std::error::Error for RuntimeError {}
