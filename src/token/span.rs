use std::rc::Rc;

/// A line/column range into a shared source buffer, used only for rendering diagnostics.
///
/// Cloning a `Span` is cheap: the source text is reference counted rather than copied, so every
/// token, AST node and diagnostic in a run can carry one without duplicating the file contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub line: usize,
    pub col_start: usize,
    pub col_end: usize,
    pub source: Rc<str>,
}

impl Span {
    pub fn new(line: usize, col_start: usize, col_end: usize, source: Rc<str>) -> Self {
        Self {
            line,
            col_start,
            col_end,
            source,
        }
    }

    pub fn point(line: usize, col: usize, source: Rc<str>) -> Self {
        Self::new(line, col, col + 1, source)
    }
}
