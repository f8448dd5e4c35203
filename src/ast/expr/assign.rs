use super::Expr;
use crate::ast::ExprId;
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub id: ExprId,
    pub name: Token,
    pub value: Box<Expr>,
}
