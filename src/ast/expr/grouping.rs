use super::Expr;

#[derive(Debug, Clone)]
pub struct GroupingExpr {
    pub inner: Box<Expr>,
}
