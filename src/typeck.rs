//! Name resolution, mutability, and type checking
//!
//! One traversal over the finished AST with a stack of lexical scopes.
//! `Program`, every `Block`, each branch of an `if`, and a `while` body all
//! open a scope; lookup walks innermost-outward; introducing a name in an
//! inner scope always shadows.
//!
//! The checker never mutates the AST. What the lowering needs to know (how
//! each assignment resolved) is published in [`CheckedProgram`] as a
//! span-keyed side table.

use std::collections::HashMap;
use std::fmt;

use crate::ast::{AssignKind, Expr, ExprKind, Program, Stmt, StmtKind};
use crate::diagnostics::Diagnostic;
use crate::span::Span;

/// The two value types a binding can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Number,
    Str,
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Number => write!(f, "number"),
            Ty::Str => write!(f, "string"),
        }
    }
}

/// What the checker knows about one binding.
#[derive(Debug, Clone, Copy)]
struct Symbol {
    mutable: bool,
    /// Where the binding was first introduced, for diagnostics.
    decl_span: Span,
    ty: Ty,
}

/// The checker's output: per-assignment resolution for the lowering.
#[derive(Debug, Default)]
pub struct CheckedProgram {
    /// Keyed by the assignment statement's span.
    pub assign_kinds: HashMap<Span, AssignKind>,
}

/// Check a program, producing the assignment side table or the first error.
pub fn check_program(program: &Program) -> Result<CheckedProgram, Diagnostic> {
    let mut checker = Checker::default();
    checker.scopes.push(HashMap::new());
    for stmt in &program.stmts {
        checker.check_stmt(stmt)?;
    }
    checker.scopes.pop();
    Ok(CheckedProgram {
        assign_kinds: checker.assign_kinds,
    })
}

#[derive(Default)]
struct Checker {
    /// Stack of scopes (innermost last)
    scopes: Vec<HashMap<String, Symbol>>,
    assign_kinds: HashMap<Span, AssignKind>,
}

impl Checker {
    fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn leave_scope(&mut self) {
        self.scopes.pop();
    }

    fn define(&mut self, name: &str, mutable: bool, decl_span: Span, ty: Ty) {
        let symbol = Symbol {
            mutable,
            decl_span,
            ty,
        };
        self.scopes
            .last_mut()
            .expect("BUG: checker scope stack is empty")
            .insert(name.to_string(), symbol);
    }

    /// Look a name up from the innermost scope outward.
    fn lookup(&self, name: &str) -> Option<Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    fn lookup_current(&self, name: &str) -> Option<Symbol> {
        self.scopes
            .last()
            .expect("BUG: checker scope stack is empty")
            .get(name)
            .copied()
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), Diagnostic> {
        match &stmt.kind {
            StmtKind::Assign {
                name,
                name_span,
                value,
                mutable,
            } => self.check_assign(stmt.span, name, *name_span, value, *mutable),

            StmtKind::Print { format, args } => {
                self.infer_expr(format)?;
                for arg in args {
                    self.infer_expr(arg)?;
                }
                Ok(())
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(condition)?;
                self.enter_scope();
                self.check_stmt(then_branch)?;
                self.leave_scope();
                self.enter_scope();
                self.check_stmt(else_branch)?;
                self.leave_scope();
                Ok(())
            }

            StmtKind::While { condition, body } => {
                self.check_condition(condition)?;
                self.enter_scope();
                self.check_stmt(body)?;
                self.leave_scope();
                Ok(())
            }

            StmtKind::Block(stmts) => {
                self.enter_scope();
                for stmt in stmts {
                    self.check_stmt(stmt)?;
                }
                self.leave_scope();
                Ok(())
            }

            StmtKind::Expr(expr) => {
                self.infer_expr(expr)?;
                Ok(())
            }
        }
    }

    fn check_condition(&mut self, condition: &Expr) -> Result<(), Diagnostic> {
        if self.infer_expr(condition)? == Ty::Str {
            return Err(Diagnostic::error(
                "String literal cannot be used as a condition",
                condition.span,
            ));
        }
        Ok(())
    }

    /// The central rule set: resolve an `IDENT = E` against the scopes in
    /// effect and record the resulting [`AssignKind`].
    fn check_assign(
        &mut self,
        stmt_span: Span,
        name: &str,
        name_span: Span,
        value: &Expr,
        mutable: bool,
    ) -> Result<(), Diagnostic> {
        let rhs_ty = self.infer_expr(value)?;

        let kind = if mutable {
            // `mut x = e` always introduces a fresh mutable binding here.
            self.define(name, true, name_span, rhs_ty);
            AssignKind::Declaration
        } else if let Some(symbol) = self.lookup_current(name) {
            if !symbol.mutable {
                return Err(self.immutable_reassignment(name, symbol, name_span));
            }
            self.require_same_type(symbol, rhs_ty, name_span)?;
            AssignKind::Reassignment
        } else if let Some(symbol) = self.lookup(name) {
            if symbol.mutable {
                // Mutation of an outer `mut` binding, no new declaration.
                self.require_same_type(symbol, rhs_ty, name_span)?;
                AssignKind::Reassignment
            } else {
                // The outer binding is immutable: shadow it here.
                self.define(name, false, name_span, rhs_ty);
                AssignKind::Shadowing
            }
        } else {
            self.define(name, false, name_span, rhs_ty);
            AssignKind::Declaration
        };

        self.assign_kinds.insert(stmt_span, kind);
        Ok(())
    }

    fn immutable_reassignment(&self, name: &str, symbol: Symbol, span: Span) -> Diagnostic {
        Diagnostic::error(
            format!("Cannot reassign to immutable variable '{name}'"),
            span,
        )
        .with_note("first assignment here", Some(symbol.decl_span))
        .with_help(format!("consider making this binding mutable: 'mut {name}'"))
    }

    fn require_same_type(&self, symbol: Symbol, rhs_ty: Ty, span: Span) -> Result<(), Diagnostic> {
        if symbol.ty == rhs_ty {
            return Ok(());
        }
        Err(Diagnostic::error("mismatched types", span)
            .with_note("expected due to first assignment", Some(symbol.decl_span))
            .with_help(format!("expected {}, found {}", symbol.ty, rhs_ty)))
    }

    /// Infer an expression's type, validating every subexpression.
    fn infer_expr(&mut self, expr: &Expr) -> Result<Ty, Diagnostic> {
        match &expr.kind {
            ExprKind::Number(_) => Ok(Ty::Number),
            ExprKind::Str(_) => Ok(Ty::Str),

            ExprKind::Variable(name) => match self.lookup(name) {
                Some(symbol) => Ok(symbol.ty),
                None => Err(Diagnostic::error(
                    format!("cannot find value '{name}' in this scope"),
                    expr.span,
                )),
            },

            ExprKind::Unary { operand, .. } => {
                if self.infer_expr(operand)? == Ty::Str {
                    return Err(Diagnostic::error(
                        "String literal cannot be used in unary operation",
                        operand.span,
                    ));
                }
                Ok(Ty::Number)
            }

            ExprKind::Binary { lhs, rhs, .. } => {
                if self.infer_expr(lhs)? == Ty::Str {
                    return Err(Diagnostic::error(
                        "String literal cannot be used in binary operation (left operand)",
                        lhs.span,
                    ));
                }
                if self.infer_expr(rhs)? == Ty::Str {
                    return Err(Diagnostic::error(
                        "String literal cannot be used in binary operation (right operand)",
                        rhs.span,
                    ));
                }
                Ok(Ty::Number)
            }
        }
    }
}
