//! Abstract Syntax Tree (AST) for the K language
//!
//! The AST represents the structure of a K program after parsing. Each node
//! carries the span of the source it was parsed from. Trees are
//! unique-ownership: no node is shared, and nothing mutates the tree after
//! parsing; the checker reads it and publishes its findings in a side table.

use crate::span::Span;

/// A complete K program (one source file)
#[derive(Debug, Clone)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// Kind of statement
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Variable binding or mutation: `x = 1;`, `mut n = 0;`
    ///
    /// Which of declaration, reassignment, or shadowing this turns out to be
    /// is resolved by the checker (see [`AssignKind`]); the parser only knows
    /// whether the `mut` keyword was present.
    Assign {
        name: String,
        name_span: Span,
        value: Expr,
        mutable: bool,
    },

    /// Print statement: `print "x = %f", x;`
    ///
    /// The first expression is the format; the rest are arguments.
    Print { format: Expr, args: Vec<Expr> },

    /// Conditional: `if (c) { ... } else { ... }`. The else branch is
    /// required by the grammar.
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },

    /// Loop: `while (c) { ... }`
    While { condition: Expr, body: Box<Stmt> },

    /// Brace-delimited statement list introducing a new lexical scope
    Block(Vec<Stmt>),

    /// Bare expression statement: `x + 1;`
    Expr(Expr),
}

/// Expression
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Kind of expression
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Number literal: `42`, `3.14`
    Number(f64),

    /// Variable reference: `x`
    Variable(String),

    /// String literal with escapes already processed: `"hello\n"`
    Str(String),

    /// Unary operation: `-x`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation: `a + b`, `a < b`
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// How an assignment statement resolved against the scopes in effect.
///
/// Produced by the checker, consumed by the lowering: a declaration or a
/// shadowing allocates a fresh stack slot in the current scope, a
/// reassignment stores through the nearest existing slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignKind {
    Declaration,
    Reassignment,
    Shadowing,
}
