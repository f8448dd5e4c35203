use crate::ast::{FunctionStmt, VarExpr};
use crate::token::Token;

#[derive(Debug, Clone)]
pub struct ClassStmt {
    pub name: Token,
    pub superclass: Option<VarExpr>,
    pub methods: Vec<FunctionStmt>,
}
