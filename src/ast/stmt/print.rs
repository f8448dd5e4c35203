use crate::ast::Expr;

#[derive(Debug, Clone)]
pub struct PrintStmt {
    pub expr: Expr,
}
