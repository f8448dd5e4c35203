use std::{
    fmt::{self, Display},
    rc::Rc,
};

use crate::{diagnostics, token::{Span, Token}};

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveError {
    message: String,
    span: Span,
}

impl ResolveError {
    pub fn at(token: &Token, message: impl Into<String>, source: Rc<str>) -> Self {
        Self {
            message: message.into(),
            span: Span::point(token.line, 1, source),
        }
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", diagnostics::render(&self.message, &self.span))
    }
}

impl std::error::Error for ResolveError {}
