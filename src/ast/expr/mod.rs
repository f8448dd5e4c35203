mod assign;
mod binary;
mod call;
mod get;
mod grouping;
mod literal;
mod logical;
mod set;
mod super_expr;
mod this;
mod unary;
mod var;

pub use self::assign::*;
pub use self::binary::*;
pub use self::call::*;
pub use self::get::*;
pub use self::grouping::*;
pub use self::literal::*;
pub use self::logical::*;
pub use self::set::*;
pub use self::super_expr::*;
pub use self::this::*;
pub use self::unary::*;
pub use self::var::*;

/// The tagged union of every expression shape the grammar produces.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Grouping(GroupingExpr),
    Var(VarExpr),
    Assign(AssignExpr),
    Call(CallExpr),
    Get(GetExpr),
    Set(SetExpr),
    This(ThisExpr),
    Super(SuperExpr),
}

impl Expr {
    /// Best-effort source line for error reporting; every variant carries at least one token.
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal(e) => e.line,
            Expr::Unary(e) => e.operator.line,
            Expr::Binary(e) => e.operator.line,
            Expr::Logical(e) => e.operator.line,
            Expr::Grouping(e) => e.inner.line(),
            Expr::Var(e) => e.name.line,
            Expr::Assign(e) => e.name.line,
            Expr::Call(e) => e.paren.line,
            Expr::Get(e) => e.name.line,
            Expr::Set(e) => e.name.line,
            Expr::This(e) => e.keyword.line,
            Expr::Super(e) => e.keyword.line,
        }
    }
}
