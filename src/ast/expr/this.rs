use crate::ast::ExprId;
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct ThisExpr {
    pub id: ExprId,
    pub keyword: Token,
}
