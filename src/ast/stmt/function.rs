use crate::ast::Stmt;
use crate::token::Token;
use std::rc::Rc;

/// Shared by top-level `fun` declarations and class method bodies; wrapped in `Rc` because
/// both a `FunctionStmt` and the `LoxFunction` closures created from it need to share the same
/// parameter/body data without cloning the body on every call.
#[derive(Debug, Clone)]
pub struct FunctionStmt {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
}
