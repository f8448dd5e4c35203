use crate::ast::Expr;
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct VarStmt {
    pub name: Token,
    pub initializer: Option<Expr>,
}
