use crate::ast::ExprId;
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct SuperExpr {
    pub id: ExprId,
    pub keyword: Token,
    pub method: Token,
}
