use std::rc::Rc;
use tracing::{debug, trace};
use crate::interpreter::ast::{BlockStatement, Expr, Program, Stmt};
use crate::interpreter::lexer::{Lexer, Token, TokenType};

/// Binding strength of infix-capable tokens, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Ternary,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl From<TokenType> for Precedence {
    fn from(token_type: TokenType) -> Self {
        match token_type {
            TokenType::QuestionMark => Precedence::Ternary,
            TokenType::Equal | TokenType::NotEqual => Precedence::Equals,
            TokenType::Less | TokenType::Greater => Precedence::LessGreater,
            TokenType::Plus | TokenType::Minus => Precedence::Sum,
            TokenType::Multiply | TokenType::Divide => Precedence::Product,
            TokenType::ParenthesisLeft => Precedence::Call,
            TokenType::SquareBracketLeft => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

/// Precedence-climbing parser over a [`Lexer`].
///
/// Syntax errors never abort parsing. They are collected (see [`Parser::into_errors`]) and the
/// statement that failed is dropped from the resulting [`Program`].
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    current: Token, peek: Token,

    errors: Vec<String>,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        let mut parser = Parser {
            lexer,
            current: Token::empty(), peek: Token::empty(),
            errors: Vec::new(),
        };

        // Fill both `current` and `peek`
        parser.consume();
        parser.consume();
        parser
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    // Statement parsing

    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.check(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }

            self.consume();
        }

        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current.token_type() {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Stmt> {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::Identifier) {
            return None;
        }

        let name = self.current.clone();

        if !self.expect_peek(TokenType::Assign) {
            return None;
        }

        self.consume();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_statement_end();

        Some(Stmt::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        self.consume();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_statement_end();

        Some(Stmt::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_statement_end();

        Some(Stmt::Expression { token, expr })
    }

    /// Expects `current` to be the opening `{`; leaves `current` on the closing `}`.
    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        let token = self.current.clone();
        let mut statements = Vec::new();
        self.consume();

        while !self.check(TokenType::BracketRight) && !self.check(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }

            self.consume();
        }

        if self.check(TokenType::Eof) {
            self.error(format!("expected next token to be {}, got {} instead", TokenType::BracketRight, TokenType::Eof));
            return None;
        }

        Some(BlockStatement { token, statements })
    }

    #[inline]
    fn skip_statement_end(&mut self) {
        if self.check_peek(TokenType::Semicolon) {
            self.consume();
        }
    }

    // Expression parsing

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        trace!(token = %self.current, ?precedence, "parse expression");
        let mut left = self.parse_prefix()?;

        while !self.check_peek(TokenType::Semicolon) && self.peek_precedence() > precedence {
            self.consume();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.current.token_type() {
            TokenType::Identifier => Some(Expr::Identifier(self.current.clone())),
            TokenType::Int => self.parse_integer_literal(),
            TokenType::True | TokenType::False => Some(Expr::BooleanLiteral {
                token: self.current.clone(),
                value: self.check(TokenType::True),
            }),
            TokenType::Null => Some(Expr::NullLiteral(self.current.clone())),
            TokenType::String => Some(Expr::StringLiteral(self.current.clone())),
            TokenType::Not | TokenType::Minus => self.parse_prefix_expression(),
            TokenType::ParenthesisLeft => self.parse_grouped_expression(),
            TokenType::If => self.parse_if_expression(),
            TokenType::Function => self.parse_function_literal(),
            TokenType::SquareBracketLeft => self.parse_array_literal(),
            TokenType::BracketLeft => self.parse_hash_literal(),
            token_type => {
                self.error(format!("no prefix parse function for {} found", token_type));
                None
            },
        }
    }

    /// Called with `current` on the infix token; only reached for tokens whose
    /// precedence is above [`Precedence::Lowest`].
    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        match self.current.token_type() {
            TokenType::ParenthesisLeft => self.parse_call_expression(left),
            TokenType::SquareBracketLeft => self.parse_index_expression(left),
            TokenType::QuestionMark => self.parse_ternary_expression(left),
            _ => self.parse_infix_expression(left),
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        match token.source().parse::<i64>() {
            Ok(value) => Some(Expr::IntegerLiteral { token, value }),
            Err(_) => {
                self.error(format!("could not parse {} as integer", token.source()));
                None
            },
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let operator = self.current.clone();
        self.consume();

        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix { operator, right: Box::new(right) })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let operator = self.current.clone();
        let precedence = self.current_precedence();
        self.consume();

        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix { left: Box::new(left), operator, right: Box::new(right) })
    }

    fn parse_ternary_expression(&mut self, condition: Expr) -> Option<Expr> {
        let token = self.current.clone();
        self.consume();

        let consequence = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::Colon) {
            return None;
        }

        self.consume();
        let alternative = self.parse_expression(Precedence::Lowest)?;

        Some(Expr::Ternary {
            token,
            condition: Box::new(condition),
            consequence: Box::new(consequence),
            alternative: Box::new(alternative),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.consume();
        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return None;
        }

        let condition = self.parse_grouped_expression()?;

        if !self.expect_peek(TokenType::BracketLeft) {
            return None;
        }

        let consequence = self.parse_block_statement()?;
        let mut alternative = None;

        if self.check_peek(TokenType::Else) {
            self.consume();

            if !self.expect_peek(TokenType::BracketLeft) {
                return None;
            }

            alternative = Some(self.parse_block_statement()?);
        }

        Some(Expr::If { token, condition: Box::new(condition), consequence, alternative })
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::BracketLeft) {
            return None;
        }

        let body = self.parse_block_statement()?;
        Some(Expr::FunctionLiteral { token, parameters: parameters.into(), body: Rc::new(body) })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Token>> {
        let mut parameters = Vec::new();

        if self.check_peek(TokenType::ParenthesisRight) {
            self.consume();
            return Some(parameters);
        }

        if !self.expect_peek(TokenType::Identifier) {
            return None;
        }

        parameters.push(self.current.clone());

        while self.check_peek(TokenType::Comma) {
            self.consume();

            if !self.expect_peek(TokenType::Identifier) {
                return None;
            }

            parameters.push(self.current.clone());
        }

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        Some(parameters)
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let token = self.current.clone();
        let arguments = self.parse_expression_list(TokenType::ParenthesisRight)?;

        Some(Expr::Call { token, function: Box::new(function), arguments })
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.current.clone();
        self.consume();

        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::SquareBracketRight) {
            return None;
        }

        Some(Expr::Index { token, left: Box::new(left), index: Box::new(index) })
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        let elements = self.parse_expression_list(TokenType::SquareBracketRight)?;

        Some(Expr::ArrayLiteral { token, elements })
    }

    /// Comma-separated expressions up to `end`; `current` is the opening delimiter.
    /// A trailing comma before `end` is accepted.
    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        while !self.check_peek(end) {
            self.consume();
            list.push(self.parse_expression(Precedence::Lowest)?);

            if !self.check_peek(TokenType::Comma) {
                break;
            }

            self.consume();
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        let mut pairs = Vec::new();

        while !self.check_peek(TokenType::BracketRight) {
            self.consume();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenType::Colon) {
                return None;
            }

            self.consume();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.check_peek(TokenType::Comma) {
                break;
            }

            self.consume();
        }

        if !self.expect_peek(TokenType::BracketRight) {
            return None;
        }

        Some(Expr::HashLiteral { token, pairs })
    }

    // Token handling

    fn consume(&mut self) {
        std::mem::swap(&mut self.current, &mut self.peek); // self.current = self.peek; self.peek gets replaced below

        loop {
            match self.lexer.scan_token() {
                Ok(token) => {
                    self.peek = token;
                    break;
                },
                Err(err) => self.error(err.to_string()),
            }
        }
    }

    fn expect_peek(&mut self, token_type: TokenType) -> bool {
        if self.check_peek(token_type) {
            self.consume();
            return true;
        }

        self.error(format!("expected next token to be {}, got {} instead", token_type, self.peek.token_type()));
        false
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    #[inline]
    fn check_peek(&self, token_type: TokenType) -> bool {
        self.peek.token_type() == token_type
    }

    fn current_precedence(&self) -> Precedence {
        Precedence::from(self.current.token_type())
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::from(self.peek.token_type())
    }

    // Error handling

    fn error(&mut self, message: String) {
        debug!(at = %self.current.start(), "syntax error: {}", message);
        self.errors.push(message);
    }
}
