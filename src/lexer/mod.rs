//! Source string → token stream.
mod error;

pub use self::error::LexError;

use std::{iter::Peekable, rc::Rc, str::Chars};

use crate::token::{Literal, Token, TokenKind};

pub type LexResult<T> = Result<T, Vec<LexError>>;

/// Walks a source string with a `(current, line, col)` cursor and produces [`Token`]s.
///
/// Mirrors this codebase's char-by-char, `Peekable<Chars>`-driven lexer: `next`/`peek`/`next_if`
/// thin wrappers over the iterator, whitespace eaten up front, each token kind handled by its own
/// `lex_*` method.
pub struct Lexer<'a> {
    source: Rc<str>,
    iterator: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source: Rc::from(source),
            iterator: source.chars().peekable(),
            tokens: vec![],
            errors: vec![],
            line: 1,
            col: 1,
        }
    }

    /// Lex the whole source, returning every token (EOF-terminated) or every accumulated error.
    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        while self.peek().is_some() {
            self.eat_whitespace_and_comments();
            if self.peek().is_none() {
                break;
            }
            self.lex_one();
        }

        self.tokens.push(Token::eof(self.line));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.iterator.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        self.iterator.clone().nth(1)
    }

    fn next(&mut self) -> Option<char> {
        let c = self.iterator.next();
        if let Some(c) = c {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        c
    }

    fn next_if(&mut self, func: impl FnOnce(&char) -> bool) -> Option<char> {
        let c = self.iterator.next_if(func)?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn eat_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.next();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.next();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_one(&mut self) {
        let Some(c) = self.peek() else { return };

        match c {
            'a'..='z' | 'A'..='Z' | '_' => self.lex_identifier(),
            '0'..='9' => self.lex_number(),
            '"' => self.lex_string(),
            _ => self.lex_symbol(),
        }
    }

    fn lex_identifier(&mut self) {
        let line = self.line;
        let mut lexeme = String::new();
        while let Some(c) = self.next_if(|c| c.is_ascii_alphanumeric() || *c == '_') {
            lexeme.push(c);
        }

        let kind = TokenKind::keyword(&lexeme).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(kind, lexeme, None, line));
    }

    fn lex_number(&mut self) {
        let line = self.line;
        let mut lexeme = String::new();
        while let Some(c) = self.next_if(|c| c.is_ascii_digit()) {
            lexeme.push(c);
        }

        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            lexeme.push(self.next().expect("peeked '.'"));
            while let Some(c) = self.next_if(|c| c.is_ascii_digit()) {
                lexeme.push(c);
            }
        }

        let value: f64 = lexeme.parse().expect("lexeme is a validated number");
        self.tokens.push(Token::new(
            TokenKind::Number,
            lexeme,
            Some(Literal::Number(value)),
            line,
        ));
    }

    fn lex_string(&mut self) {
        let line = self.line;
        let col = self.col;
        self.next(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                None => {
                    self.errors
                        .push(LexError::unterminated_string(line, col, self.source.clone()));
                    return;
                }
                Some('"') => {
                    self.next();
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.next();
                }
            }
        }

        let lexeme = format!("\"{value}\"");
        self.tokens.push(Token::new(
            TokenKind::String,
            lexeme,
            Some(Literal::Str(value)),
            line,
        ));
    }

    fn lex_symbol(&mut self) {
        let line = self.line;
        let col = self.col;
        let c = self.next().expect("lex_symbol called with a pending char");

        let two_char = |second: char| -> bool { matches!((c, second), ('!', '=') | ('=', '=') | ('<', '=') | ('>', '=')) };

        let kind = if self.peek().is_some_and(two_char) {
            let second = self.next().unwrap();
            match (c, second) {
                ('!', '=') => TokenKind::BangEqual,
                ('=', '=') => TokenKind::EqualEqual,
                ('<', '=') => TokenKind::LessEqual,
                ('>', '=') => TokenKind::GreaterEqual,
                _ => unreachable!("two_char only matches the pairs above"),
            }
        } else {
            match c {
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '-' => TokenKind::Minus,
                '+' => TokenKind::Plus,
                ';' => TokenKind::Semicolon,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '!' => TokenKind::Bang,
                '=' => TokenKind::Equal,
                '<' => TokenKind::Less,
                '>' => TokenKind::Greater,
                other => {
                    self.errors
                        .push(LexError::unexpected_char(other, line, col, self.source.clone()));
                    return;
                }
            }
        };

        let lexeme = match kind {
            TokenKind::BangEqual | TokenKind::EqualEqual | TokenKind::LessEqual | TokenKind::GreaterEqual => {
                format!("{c}=")
            }
            _ => c.to_string(),
        };

        self.tokens.push(Token::new(kind, lexeme, None, line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .lex()
            .expect("lex should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_arithmetic_expression() {
        assert_eq!(
            kinds("1 + 2 * 3;"),
            vec![
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_two_char_operators() {
        assert_eq!(
            kinds("!= == <= >="),
            vec![
                TokenKind::BangEqual,
                TokenKind::EqualEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_keywords_vs_identifiers() {
        assert_eq!(
            kinds("var class classical"),
            vec![TokenKind::Var, TokenKind::Class, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_string_literal() {
        let tokens = Lexer::new("\"hello\"").lex().expect("lex should succeed");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, Some(Literal::Str("hello".into())));
    }

    #[test]
    fn lexes_multiline_string_tracks_line() {
        let tokens = Lexer::new("\"a\nb\" 1").lex().expect("lex should succeed");
        assert_eq!(tokens[0].kind, TokenKind::String);
        // the token after the string starts on the second line
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        let tokens = Lexer::new("123.").lex().expect("lex should succeed");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.0)));
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn line_comment_consumed_to_newline() {
        assert_eq!(kinds("1 // comment\n2"), vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_reports_error() {
        let result = Lexer::new("\"oops").lex();
        assert!(result.is_err());
    }

    #[test]
    fn unknown_character_is_skipped_and_reported() {
        let result = Lexer::new("@").lex();
        assert!(result.is_err());
    }

    #[test]
    fn accumulates_multiple_lex_errors_in_one_pass() {
        let errors = Lexer::new("@ # $").lex().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
