use std::{
    fmt::{self, Display},
    rc::Rc,
};

use crate::{diagnostics, token::Span};

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    message: String,
    span: Span,
}

impl LexError {
    pub fn unexpected_char(c: char, line: usize, col: usize, source: Rc<str>) -> Self {
        Self {
            message: format!("Unexpected character '{c}'."),
            span: Span::point(line, col, source),
        }
    }

    pub fn unterminated_string(line: usize, col: usize, source: Rc<str>) -> Self {
        Self {
            message: "Unterminated string.".into(),
            span: Span::point(line, col, source),
        }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", diagnostics::render(&self.message, &self.span))
    }
}

impl std::error::Error for LexError {}
