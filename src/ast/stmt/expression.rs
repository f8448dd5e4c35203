use crate::ast::Expr;

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expr: Expr,
}
