use crate::ast::ExprId;
use crate::token::Token;

/// A bare identifier reference. Resolved at static-analysis time to a scope distance keyed on
/// `id`, or treated as a global lookup if the resolver never recorded one.
#[derive(Debug, Clone)]
pub struct VarExpr {
    pub id: ExprId,
    pub name: Token,
}
