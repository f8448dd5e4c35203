//! Token stream → AST via hand-rolled recursive descent with Pratt-style precedence climbing
//! for the binary operator ladder.
mod error;

pub use self::error::ParseError;

use std::rc::Rc;

use crate::ast::{
    AssignExpr, BinaryExpr, BlockStmt, CallExpr, ClassStmt, Expr, ExprIdGen, ExpressionStmt, FunctionStmt, GetExpr,
    GroupingExpr, IfStmt, LiteralExpr, LiteralValue, LogicalExpr, PrintStmt, ReturnStmt, SetExpr, Stmt, SuperExpr,
    ThisExpr, UnaryExpr, VarExpr, VarStmt, WhileStmt,
};
use crate::token::{Literal, Token, TokenKind};

pub type ParseResult<T> = Result<T, ParseError>;

const MAX_ARGS: usize = 255;

/// Consumes a finished token stream and produces the statement list that makes up a program.
///
/// Mirrors this codebase's hand-written-descent parsers (one method per grammar production,
/// `match_token`/`check`/`consume`/`advance` thin wrappers over a cursor), generalized from a
/// combinator-table grammar to plain recursive functions since Lox's grammar is small and fixed.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    source: Rc<str>,
    ids: ExprIdGen,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, source: Rc<str>) -> Self {
        Self {
            tokens,
            current: 0,
            source,
            ids: ExprIdGen::default(),
        }
    }

    pub fn parse(mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        Ok(statements)
    }

    // --- declarations -----------------------------------------------------

    fn declaration(&mut self) -> ParseResult<Stmt> {
        if self.match_token(&[TokenKind::Var]) {
            return self.var_declaration();
        }
        if self.match_token(&[TokenKind::Fun]) {
            return Ok(Stmt::Function(self.function("function")?));
        }
        if self.match_token(&[TokenKind::Class]) {
            return self.class_declaration();
        }
        self.statement()
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;
        let initializer = if self.match_token(&[TokenKind::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var(VarStmt { name, initializer }))
    }

    fn function(&mut self, kind: &str) -> ParseResult<FunctionStmt> {
        let name = self.consume(TokenKind::Identifier, &format!("Expect {kind} name."))?;
        self.consume(TokenKind::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_ARGS {
                    return Err(self.error(self.peek(), "Can't have more than 255 parameters."));
                }
                params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?);
                if !self.match_token(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;

        self.consume(TokenKind::LeftBrace, &format!("Expect '{{' before {kind} body."))?;
        let body = self.block()?;

        Ok(FunctionStmt {
            name,
            params,
            body: Rc::new(body),
        })
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect class name.")?;

        let superclass = if self.match_token(&[TokenKind::Less]) {
            let super_name = self.consume(TokenKind::Identifier, "Expect superclass name.")?;
            Some(VarExpr {
                id: self.ids.next(),
                name: super_name,
            })
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expect '{' before class body.")?;
        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassStmt {
            name,
            superclass,
            methods,
        }))
    }

    // --- statements ---------------------------------------------------------

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.match_token(&[TokenKind::Print]) {
            return self.print_statement();
        }
        if self.match_token(&[TokenKind::LeftBrace]) {
            return Ok(Stmt::Block(BlockStmt {
                statements: self.block()?,
            }));
        }
        if self.match_token(&[TokenKind::If]) {
            return self.if_statement();
        }
        if self.match_token(&[TokenKind::While]) {
            return self.while_statement();
        }
        if self.match_token(&[TokenKind::For]) {
            return self.for_statement();
        }
        if self.match_token(&[TokenKind::Return]) {
            return self.return_statement();
        }
        self.expression_statement()
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(PrintStmt { expr }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(ExpressionStmt { expr }))
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_token(&[TokenKind::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
        }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While(WhileStmt { condition, body }))
    }

    /// Desugars `for (init; cond; update) body` into the equivalent `while` loop wrapped in a
    /// block, per the grammar's for-desugar rule: a missing condition becomes `true`.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_token(&[TokenKind::Semicolon]) {
            None
        } else if self.match_token(&[TokenKind::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenKind::Semicolon) {
            self.expression()?
        } else {
            Expr::Literal(LiteralExpr {
                value: LiteralValue::Bool(true),
                line: self.peek().line,
            })
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenKind::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockStmt {
                statements: vec![body, Stmt::Expression(ExpressionStmt { expr: increment })],
            });
        }

        body = Stmt::While(WhileStmt {
            condition,
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockStmt {
                statements: vec![initializer, body],
            });
        }

        Ok(body)
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous();
        let value = if !self.check(TokenKind::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnStmt { keyword, value }))
    }

    // --- expressions ----------------------------------------------------------

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.match_token(&[TokenKind::Equal]) {
            let equals = self.previous();
            let value = self.assignment()?;

            return match expr {
                Expr::Var(v) => Ok(Expr::Assign(AssignExpr {
                    id: self.ids.next(),
                    name: v.name,
                    value: Box::new(value),
                })),
                Expr::Get(g) => Ok(Expr::Set(SetExpr {
                    object: g.object,
                    name: g.name,
                    value: Box::new(value),
                })),
                _ => Err(self.error(&equals, "Invalid assignment target.")),
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;
        while self.match_token(&[TokenKind::Or]) {
            let operator = self.previous();
            let right = self.and()?;
            expr = Expr::Logical(LogicalExpr {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;
        while self.match_token(&[TokenKind::And]) {
            let operator = self.previous();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalExpr {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary_ladder(Self::comparison, &[TokenKind::BangEqual, TokenKind::EqualEqual])
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary_ladder(
            Self::term,
            &[TokenKind::Greater, TokenKind::GreaterEqual, TokenKind::Less, TokenKind::LessEqual],
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.binary_ladder(Self::factor, &[TokenKind::Minus, TokenKind::Plus])
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary_ladder(Self::unary, &[TokenKind::Slash, TokenKind::Star])
    }

    /// One precedence level of the binary ladder: parse with `operand`, then fold in any number
    /// of same-precedence operators from `kinds`, left-associatively.
    fn binary_ladder(&mut self, operand: fn(&mut Self) -> ParseResult<Expr>, kinds: &[TokenKind]) -> ParseResult<Expr> {
        let mut expr = operand(self)?;
        while self.match_token(kinds) {
            let operator = self.previous();
            let right = operand(self)?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_token(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous();
            let right = self.unary()?;
            return Ok(Expr::Unary(UnaryExpr {
                operator,
                right: Box::new(right),
            }));
        }
        self.call()
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.match_token(&[TokenKind::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.match_token(&[TokenKind::Dot]) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.")?;
                expr = Expr::Get(GetExpr {
                    object: Box::new(expr),
                    name,
                });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() >= MAX_ARGS {
                    return Err(self.error(self.peek(), "Can't have more than 255 arguments."));
                }
                args.push(self.expression()?);
                if !self.match_token(&[TokenKind::Comma]) {
                    break;
                }
            }
        }
        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;
        Ok(Expr::Call(CallExpr {
            callee: Box::new(callee),
            paren,
            args,
        }))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.match_token(&[TokenKind::False]) {
            return Ok(Expr::Literal(LiteralExpr {
                value: LiteralValue::Bool(false),
                line: self.previous().line,
            }));
        }
        if self.match_token(&[TokenKind::True]) {
            return Ok(Expr::Literal(LiteralExpr {
                value: LiteralValue::Bool(true),
                line: self.previous().line,
            }));
        }
        if self.match_token(&[TokenKind::Nil]) {
            return Ok(Expr::Literal(LiteralExpr {
                value: LiteralValue::Nil,
                line: self.previous().line,
            }));
        }
        if self.match_token(&[TokenKind::Number]) {
            let token = self.previous();
            let Some(Literal::Number(n)) = token.literal else {
                unreachable!("lexer always attaches a Number literal to a Number token")
            };
            return Ok(Expr::Literal(LiteralExpr {
                value: LiteralValue::Number(n),
                line: token.line,
            }));
        }
        if self.match_token(&[TokenKind::String]) {
            let token = self.previous();
            let Some(Literal::Str(s)) = token.literal.clone() else {
                unreachable!("lexer always attaches a Str literal to a String token")
            };
            return Ok(Expr::Literal(LiteralExpr {
                value: LiteralValue::Str(s),
                line: token.line,
            }));
        }
        if self.match_token(&[TokenKind::This]) {
            return Ok(Expr::This(ThisExpr {
                id: self.ids.next(),
                keyword: self.previous(),
            }));
        }
        if self.match_token(&[TokenKind::Super]) {
            let keyword = self.previous();
            self.consume(TokenKind::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(TokenKind::Identifier, "Expect superclass method name.")?;
            return Ok(Expr::Super(SuperExpr {
                id: self.ids.next(),
                keyword,
                method,
            }));
        }
        if self.match_token(&[TokenKind::Identifier]) {
            return Ok(Expr::Var(VarExpr {
                id: self.ids.next(),
                name: self.previous(),
            }));
        }
        if self.match_token(&[TokenKind::LeftParen]) {
            let inner = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(GroupingExpr { inner: Box::new(inner) }));
        }

        Err(self.error(self.peek(), "Expect expression."))
    }

    // --- cursor plumbing --------------------------------------------------

    fn match_token(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|k| self.check(*k)) {
            self.advance();
            return true;
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> Token {
        self.tokens[self.current - 1].clone()
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error(self.peek(), message))
    }

    fn error(&self, token: &Token, message: impl Into<String>) -> ParseError {
        ParseError::at(token, message, self.source.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> ParseResult<Vec<Stmt>> {
        let source: Rc<str> = Rc::from(src);
        let tokens = Lexer::new(src).lex().expect("lex should succeed");
        Parser::new(tokens, source).parse()
    }

    #[test]
    fn parses_arithmetic_precedence() {
        let stmts = parse("1 + 2 * 3;").expect("parse should succeed");
        assert_eq!(stmts.len(), 1);
        let Stmt::Expression(ExpressionStmt { expr: Expr::Binary(b) }) = &stmts[0] else {
            panic!("expected a top-level binary expression statement");
        };
        assert_eq!(b.operator.kind, TokenKind::Plus);
        assert!(matches!(&*b.right, Expr::Binary(inner) if inner.operator.kind == TokenKind::Star));
    }

    #[test]
    fn parses_var_declaration_without_initializer() {
        let stmts = parse("var x;").expect("parse should succeed");
        assert!(matches!(&stmts[0], Stmt::Var(VarStmt { initializer: None, .. })));
    }

    #[test]
    fn reinterprets_identifier_equals_as_assignment() {
        let stmts = parse("x = 1;").expect("parse should succeed");
        assert!(matches!(
            &stmts[0],
            Stmt::Expression(ExpressionStmt { expr: Expr::Assign(_) })
        ));
    }

    #[test]
    fn rejects_invalid_assignment_target() {
        assert!(parse("1 = 2;").is_err());
    }

    #[test]
    fn for_loop_desugars_to_while_in_a_block() {
        let stmts = parse("for (var i = 0; i < 3; i = i + 1) print i;").expect("parse should succeed");
        assert_eq!(stmts.len(), 1);
        let Stmt::Block(BlockStmt { statements }) = &stmts[0] else {
            panic!("expected desugared for-loop to be a block");
        };
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[0], Stmt::Var(_)));
        assert!(matches!(statements[1], Stmt::While(_)));
    }

    #[test]
    fn class_with_superclass_and_methods() {
        let stmts = parse("class B < A { speak() { return 1; } }").expect("parse should succeed");
        let Stmt::Class(class) = &stmts[0] else {
            panic!("expected a class declaration");
        };
        assert!(class.superclass.is_some());
        assert_eq!(class.methods.len(), 1);
    }

    #[test]
    fn rejects_more_than_255_parameters() {
        let params = (0..256).map(|i| format!("a{i}")).collect::<Vec<_>>().join(", ");
        let src = format!("fun f({params}) {{}}");
        assert!(parse(&src).is_err());
    }
}
