//! Static pass that pre-computes, for every variable reference the parser could resolve
//! lexically, how many environment frames to walk outward at evaluation time.
mod error;

pub use self::error::ResolveError;

use std::{collections::HashMap, rc::Rc};

use crate::ast::{
    AssignExpr, ClassStmt, Expr, ExprId, FunctionStmt, ReturnStmt, Stmt, SuperExpr, ThisExpr, VarExpr, VarStmt,
};
use crate::token::Token;

pub type Locals = HashMap<ExprId, usize>;
pub type ResolveResult = Result<Locals, Vec<ResolveError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Generalizes this codebase's `Typechecker` (a `&mut TypeScope`-threading recursive walk with
/// `check_statement`/`check_expression` dispatch) from type inference to scope-distance
/// bookkeeping: same shape of walk, a resolution table instead of inferred types as the product.
pub struct Resolver {
    source: Rc<str>,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
    locals: Locals,
    errors: Vec<ResolveError>,
}

impl Resolver {
    pub fn new(source: Rc<str>) -> Self {
        Self {
            source,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            locals: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> ResolveResult {
        self.resolve_statements(statements);
        if self.errors.is_empty() {
            Ok(self.locals)
        } else {
            Err(self.errors)
        }
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(s) => self.resolve_expr(&s.expr),
            Stmt::Print(s) => self.resolve_expr(&s.expr),
            Stmt::Var(s) => self.resolve_var_stmt(s),
            Stmt::Block(s) => {
                self.begin_scope();
                self.resolve_statements(&s.statements);
                self.end_scope();
            }
            Stmt::If(s) => {
                self.resolve_expr(&s.condition);
                self.resolve_stmt(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While(s) => {
                self.resolve_expr(&s.condition);
                self.resolve_stmt(&s.body);
            }
            Stmt::Function(f) => {
                self.declare(&f.name);
                self.define(&f.name);
                self.resolve_function(f, FunctionType::Function);
            }
            Stmt::Return(s) => self.resolve_return(s),
            Stmt::Class(c) => self.resolve_class(c),
        }
    }

    fn resolve_var_stmt(&mut self, s: &VarStmt) {
        self.declare(&s.name);
        if let Some(initializer) = &s.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&s.name);
    }

    fn resolve_return(&mut self, s: &ReturnStmt) {
        if self.current_function == FunctionType::None {
            self.error(&s.keyword, "Can't return from top-level code.");
        }
        if let Some(value) = &s.value {
            if self.current_function == FunctionType::Initializer {
                self.error(&s.keyword, "Can't return a value from an initializer.");
            }
            self.resolve_expr(value);
        }
    }

    fn resolve_class(&mut self, c: &ClassStmt) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&c.name);
        self.define(&c.name);

        if let Some(superclass) = &c.superclass {
            if superclass.name.lexeme == c.name.lexeme {
                self.error(&superclass.name, "A class can't inherit from itself.");
            }
            self.current_class = ClassType::Subclass;
            self.resolve_var_ref(superclass.id, &superclass.name.lexeme);

            self.begin_scope();
            self.scopes.last_mut().expect("just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("just pushed").insert("this".to_string(), true);

        for method in &c.methods {
            let declaration = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, declaration);
        }

        self.end_scope();
        if c.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, f: &FunctionStmt, ty: FunctionType) {
        let enclosing_function = self.current_function;
        self.current_function = ty;

        self.begin_scope();
        for param in &f.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(&f.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Grouping(e) => self.resolve_expr(&e.inner),
            Expr::Unary(e) => self.resolve_expr(&e.right),
            Expr::Binary(e) => {
                self.resolve_expr(&e.left);
                self.resolve_expr(&e.right);
            }
            Expr::Logical(e) => {
                self.resolve_expr(&e.left);
                self.resolve_expr(&e.right);
            }
            Expr::Call(e) => {
                self.resolve_expr(&e.callee);
                for arg in &e.args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get(e) => self.resolve_expr(&e.object),
            Expr::Set(e) => {
                self.resolve_expr(&e.value);
                self.resolve_expr(&e.object);
            }
            Expr::Var(e) => self.resolve_var_expr(e),
            Expr::Assign(e) => self.resolve_assign_expr(e),
            Expr::This(e) => self.resolve_this(e),
            Expr::Super(e) => self.resolve_super(e),
        }
    }

    fn resolve_var_expr(&mut self, e: &VarExpr) {
        if let Some(scope) = self.scopes.last() {
            if scope.get(&e.name.lexeme) == Some(&false) {
                self.error(&e.name, "Can't read local variable in its own initializer.");
            }
        }
        self.resolve_var_ref(e.id, &e.name.lexeme);
    }

    fn resolve_assign_expr(&mut self, e: &AssignExpr) {
        self.resolve_expr(&e.value);
        self.resolve_var_ref(e.id, &e.name.lexeme);
    }

    fn resolve_this(&mut self, e: &ThisExpr) {
        if self.current_class == ClassType::None {
            self.error(&e.keyword, "Can't use 'this' outside of a class.");
            return;
        }
        self.resolve_var_ref(e.id, "this");
    }

    fn resolve_super(&mut self, e: &SuperExpr) {
        match self.current_class {
            ClassType::None => self.error(&e.keyword, "Can't use 'super' outside of a class."),
            ClassType::Class => self.error(&e.keyword, "Can't use 'super' in a class with no superclass."),
            ClassType::Subclass => self.resolve_var_ref(e.id, "super"),
        }
    }

    /// Shared by `var` reads, assignment targets, `this`, `super`, and superclass names: walk the
    /// scope stack from innermost outward and record the distance at first hit, leaving global
    /// references unresolved.
    fn resolve_var_ref(&mut self, id: ExprId, name: &str) {
        for (i, scope) in self.scopes.iter().enumerate().rev() {
            if scope.contains_key(name) {
                self.locals.insert(id, self.scopes.len() - 1 - i);
                return;
            }
        }
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        let already_declared = scope.contains_key(&name.lexeme);
        scope.insert(name.lexeme.clone(), false);
        if already_declared {
            self.error(name, "Already a variable with this name in this scope.");
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn error(&mut self, token: &Token, message: impl Into<String>) {
        self.errors.push(ResolveError::at(token, message, self.source.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use std::rc::Rc;

    fn resolve(src: &str) -> ResolveResult {
        let source: Rc<str> = Rc::from(src);
        let tokens = Lexer::new(src).lex().expect("lex should succeed");
        let statements = Parser::new(tokens, source.clone()).parse().expect("parse should succeed");
        Resolver::new(source).resolve(&statements)
    }

    #[test]
    fn resolves_local_variable_reference() {
        let locals = resolve("{ var a = 1; print a; }").expect("resolve should succeed");
        assert_eq!(locals.len(), 1);
    }

    #[test]
    fn rejects_reading_variable_in_its_own_initializer() {
        assert!(resolve("{ var a = a; }").is_err());
    }

    #[test]
    fn rejects_redeclaration_in_same_scope() {
        assert!(resolve("{ var a = 1; var a = 2; }").is_err());
    }

    #[test]
    fn rejects_return_at_top_level() {
        assert!(resolve("return 1;").is_err());
    }

    #[test]
    fn rejects_value_return_from_initializer() {
        assert!(resolve("class A { init() { return 1; } }").is_err());
    }

    #[test]
    fn rejects_this_outside_class() {
        assert!(resolve("print this;").is_err());
    }

    #[test]
    fn rejects_class_inheriting_from_itself() {
        assert!(resolve("class A < A {}").is_err());
    }

    #[test]
    fn rejects_super_without_superclass() {
        assert!(resolve("class A { m() { super.m(); } }").is_err());
    }

    #[test]
    fn global_reference_is_left_unresolved() {
        let locals = resolve("var a = 1; print a;").expect("resolve should succeed");
        assert!(locals.is_empty());
    }

    #[test]
    fn accumulates_multiple_resolve_errors_in_one_pass() {
        let errors = resolve("{ var a = a; } return 1;").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
