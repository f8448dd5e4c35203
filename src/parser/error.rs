use std::{
    fmt::{self, Display},
    rc::Rc,
};

use crate::{diagnostics, token::{Span, Token}};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    message: String,
    span: Span,
}

impl ParseError {
    pub fn at(token: &Token, message: impl Into<String>, source: Rc<str>) -> Self {
        let col = 1;
        Self {
            message: message.into(),
            span: Span::point(token.line, col, source),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", diagnostics::render(&self.message, &self.span))
    }
}

impl std::error::Error for ParseError {}
