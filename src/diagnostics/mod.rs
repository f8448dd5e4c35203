//! Shared rendering for line/column-aware diagnostics.
//!
//! [`crate::lexer::LexError`], [`crate::parser::ParseError`] and [`crate::resolver::ResolveError`]
//! all carry a [`Span`] and delegate their `Display` impl to [`render`] so a source excerpt with a
//! caret under the offending span looks the same no matter which stage raised it.
use colored::Colorize;
use std::fmt::Write as _;

use crate::token::Span;

pub fn render(message: &str, span: &Span) -> String {
    let lines: Vec<&str> = span.source.lines().collect();
    let Some(line_str) = lines.get(span.line.saturating_sub(1)) else {
        return format!("{message}\n[line {}]", span.line);
    };

    let margin = span.line.to_string().len();
    let pad = " ".repeat(margin);
    let left_pad = " ".repeat(span.col_start.saturating_sub(1));
    let caret_len = span.col_end.saturating_sub(span.col_start).max(1);
    let caret = "^".repeat(caret_len).red();

    let mut out = String::new();
    let _ = writeln!(out, "{pad} |");
    let _ = writeln!(out, "{} | {line_str}", span.line);
    let _ = writeln!(out, "{pad} | {left_pad}{caret} {message}");
    out
}
