//! Parser for the K language
//!
//! A single-pass recursive descent parser: statements are LL(1), expressions
//! use precedence climbing over the operator table below. There is no error
//! recovery: the first ill-formed construction aborts the parse and is
//! reported as a [`Diagnostic`].
//!
//! Operator precedence (higher binds tighter):
//!
//! | operators            | precedence |
//! |----------------------|------------|
//! | unary `-`            | 50 (prefix)|
//! | `*` `/`              | 40         |
//! | `+` `-`              | 10         |
//! | `< <= > >= == !=`    | 5          |
//!
//! All binary operators are left-associative, so `1 < 2 < 3` parses as
//! `(1 < 2) < 3`.

use crate::ast::*;
use crate::diagnostics::Diagnostic;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parse result
pub type ParseResult<T> = Result<T, Diagnostic>;

/// Parse a complete source file into a [`Program`].
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source)?.parse_program()
}

/// The parser for the K language
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    previous: Token,
}

fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    Some(match kind {
        TokenKind::Star => (BinaryOp::Mul, 40),
        TokenKind::Slash => (BinaryOp::Div, 40),
        TokenKind::Plus => (BinaryOp::Add, 10),
        TokenKind::Minus => (BinaryOp::Sub, 10),
        TokenKind::Lt => (BinaryOp::Lt, 5),
        TokenKind::LtEq => (BinaryOp::Le, 5),
        TokenKind::Gt => (BinaryOp::Gt, 5),
        TokenKind::GtEq => (BinaryOp::Ge, 5),
        TokenKind::EqEq => (BinaryOp::Eq, 5),
        TokenKind::NotEq => (BinaryOp::Ne, 5),
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    /// Create a new parser. Fails if the very first token is already a lex
    /// error.
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        let previous = current.clone();
        Ok(Self {
            lexer,
            current,
            previous,
        })
    }

    /// Advance to the next token, returning the one just consumed.
    fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token()?;
        self.previous = std::mem::replace(&mut self.current, next);
        Ok(self.previous.clone())
    }

    /// Check if current token matches
    fn check(&self, kind: &TokenKind) -> bool {
        self.current.kind == *kind
    }

    /// Check if at end of file
    fn is_at_end(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    /// Consume the current token if it matches, otherwise error at the
    /// current token.
    fn expect(&mut self, kind: &TokenKind, message: &str) -> ParseResult<()> {
        if self.check(kind) {
            self.advance()?;
            Ok(())
        } else {
            Err(Diagnostic::error(message, self.current.span))
        }
    }

    /// Consume a semicolon, or error at the position just past the previous
    /// token, where the semicolon should have been.
    fn expect_semicolon(&mut self, after: &str) -> ParseResult<()> {
        if self.check(&TokenKind::Semicolon) {
            self.advance()?;
            Ok(())
        } else {
            Err(Diagnostic::error(
                format!("Expected ';' after {after}"),
                Span::point(self.previous.span.end),
            ))
        }
    }

    /// Get text of a token
    fn text(&self, token: &Token) -> &'src str {
        token.text(self.lexer.source())
    }

    // ============ Statements ============

    /// Parse a complete program. An empty source is a valid program with no
    /// statements.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let start = self.current.span.start;
        let mut stmts = Vec::new();

        while !self.is_at_end() {
            stmts.push(self.parse_statement()?);
        }

        let end = self.previous.span.end.max(start);
        Ok(Program {
            stmts,
            span: Span::new(start, end),
        })
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.current.kind {
            TokenKind::Print => self.parse_print_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Mut => self.parse_mut_declaration(),
            TokenKind::LBrace => self.parse_block(),
            _ => self.parse_expression_statement(),
        }
    }

    /// `print E (, E)* ;`
    fn parse_print_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.current.span.start;
        self.advance()?; // consume 'print'

        let format = self.parse_expr()?;
        let mut args = Vec::new();
        while self.check(&TokenKind::Comma) {
            self.advance()?;
            args.push(self.parse_expr()?);
        }
        self.expect_semicolon("print statement")?;

        Ok(Stmt {
            kind: StmtKind::Print { format, args },
            span: Span::new(start, self.previous.span.end),
        })
    }

    /// `if ( E ) block else block`. The else branch is mandatory.
    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.current.span.start;
        self.advance()?; // consume 'if'

        self.expect(&TokenKind::LParen, "Expected '(' after 'if'")?;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "Expected ')' after if condition")?;

        let then_branch = self.parse_block()?;
        self.expect(&TokenKind::Else, "Expected 'else' after if block")?;
        let else_branch = self.parse_block()?;

        Ok(Stmt {
            kind: StmtKind::If {
                condition,
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span: Span::new(start, self.previous.span.end),
        })
    }

    /// `while ( E ) block`
    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.current.span.start;
        self.advance()?; // consume 'while'

        self.expect(&TokenKind::LParen, "Expected '(' after 'while'")?;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "Expected ')' after while condition")?;

        let body = self.parse_block()?;

        Ok(Stmt {
            kind: StmtKind::While {
                condition,
                body: Box::new(body),
            },
            span: Span::new(start, self.previous.span.end),
        })
    }

    /// `mut IDENT = E ;`
    fn parse_mut_declaration(&mut self) -> ParseResult<Stmt> {
        let start = self.current.span.start;
        self.advance()?; // consume 'mut'

        if !self.check(&TokenKind::Ident) {
            return Err(Diagnostic::error(
                "Expected identifier after 'mut'",
                self.current.span,
            ));
        }
        let name_token = self.advance()?;
        let name = self.text(&name_token).to_string();
        let name_span = name_token.span;

        self.expect(&TokenKind::Eq, "Expected '=' after variable name in 'mut' declaration")?;
        let value = self.parse_expr()?;
        self.expect_semicolon("declaration")?;

        Ok(Stmt {
            kind: StmtKind::Assign {
                name,
                name_span,
                value,
                mutable: true,
            },
            span: Span::new(start, self.previous.span.end),
        })
    }

    /// `{ statement* }`
    fn parse_block(&mut self) -> ParseResult<Stmt> {
        if !self.check(&TokenKind::LBrace) {
            return Err(Diagnostic::error("Expected '{'", self.current.span));
        }
        let start = self.current.span.start;
        self.advance()?; // consume '{'

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::RBrace, "Expected '}'")?;

        Ok(Stmt {
            kind: StmtKind::Block(stmts),
            span: Span::new(start, self.previous.span.end),
        })
    }

    /// `IDENT = E ;` or a bare expression statement.
    ///
    /// The left-hand side is parsed as a full expression first; only when an
    /// `=` follows is it required to be a bare identifier. `=` binds to the
    /// statement, not a general operator, so assignments cannot nest
    /// inside expressions.
    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.current.span.start;
        let expr = self.parse_expr()?;

        if self.check(&TokenKind::Eq) {
            let ExprKind::Variable(name) = &expr.kind else {
                return Err(Diagnostic::error("Invalid assignment target", expr.span));
            };
            let name = name.clone();
            let name_span = expr.span;
            self.advance()?; // consume '='
            let value = self.parse_expr()?;
            self.expect_semicolon("assignment")?;

            return Ok(Stmt {
                kind: StmtKind::Assign {
                    name,
                    name_span,
                    value,
                    mutable: false,
                },
                span: Span::new(start, self.previous.span.end),
            });
        }

        self.expect_semicolon("expression")?;
        Ok(Stmt {
            kind: StmtKind::Expr(expr),
            span: Span::new(start, self.previous.span.end),
        })
    }

    // ============ Expressions ============

    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_unary()?;
        self.parse_binary_rhs(0, lhs)
    }

    /// Precedence climbing: keep folding operators at least as strong as
    /// `min_prec` into `lhs`, recursing when the next operator binds
    /// tighter. Equal precedence folds immediately, which makes every level
    /// left-associative.
    fn parse_binary_rhs(&mut self, min_prec: u8, mut lhs: Expr) -> ParseResult<Expr> {
        loop {
            let Some((op, prec)) = binary_op(&self.current.kind) else {
                return Ok(lhs);
            };
            if prec < min_prec {
                return Ok(lhs);
            }
            self.advance()?;

            let mut rhs = self.parse_unary()?;
            if let Some((_, next_prec)) = binary_op(&self.current.kind) {
                if prec < next_prec {
                    rhs = self.parse_binary_rhs(prec + 1, rhs)?;
                }
            }

            let span = lhs.span.merge(rhs.span);
            lhs = Expr {
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            };
        }
    }

    /// Prefix `-` binds tighter than any binary operator.
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.check(&TokenKind::Minus) {
            let start = self.current.span.start;
            self.advance()?;
            let operand = self.parse_unary()?;
            let span = Span::new(start, operand.span.end);
            return Ok(Expr {
                kind: ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
                span,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current.kind.clone() {
            TokenKind::Number(value) => {
                let token = self.advance()?;
                Ok(Expr {
                    kind: ExprKind::Number(value),
                    span: token.span,
                })
            }
            TokenKind::Str(value) => {
                let token = self.advance()?;
                Ok(Expr {
                    kind: ExprKind::Str(value),
                    span: token.span,
                })
            }
            TokenKind::Ident => {
                let token = self.advance()?;
                let name = self.text(&token).to_string();
                Ok(Expr {
                    kind: ExprKind::Variable(name),
                    span: token.span,
                })
            }
            TokenKind::LParen => {
                self.advance()?; // consume '('
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "Expected ')'")?;
                Ok(expr)
            }
            _ => Err(Diagnostic::error(
                "Unknown token when expecting an expression",
                self.current.span,
            )),
        }
    }
}
