//! Abstract syntax tree produced by the parser and walked by the resolver and evaluator.
//!
//! Mirrors this codebase's one-struct-per-node-type layout (`ast/declaration.rs`,
//! `ast/binary_expr.rs`, ...): each expression or statement variant gets its own file under
//! `ast/expr/` or `ast/stmt/`, re-exported here, with the `Expr`/`Stmt` enums acting as the
//! tagged-union replacement for the source material's visitor dispatch.
pub mod expr;
pub mod stmt;

pub use self::expr::*;
pub use self::stmt::*;

/// A stable, parser-assigned identity for the subset of expression nodes the resolver needs to
/// key its side-table on (`var`, assignment targets, `this`, `super`). Using a small integer
/// handle instead of pointer identity keeps the table trivially hashable regardless of how the
/// AST is owned at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

/// Hands out increasing [`ExprId`]s while parsing a single program.
#[derive(Default)]
pub struct ExprIdGen(u32);

impl ExprIdGen {
    pub fn next(&mut self) -> ExprId {
        let id = ExprId(self.0);
        self.0 += 1;
        id
    }
}
