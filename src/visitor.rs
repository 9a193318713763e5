//! Whole-tree passes over the AST.
//!
//! Each pass implements [`Visitor`] once; the `accept` methods below are the
//! only place that matches on node variants, so adding a variant breaks every
//! pass at compile time instead of silently skipping it.

use crate::ast::{Expr, Operator, Program, Stmt, VarDecl};
use crate::token::Token;

pub trait Visitor {
    /// Result of visiting a program, declaration or statement.
    type StmtOutput;
    /// Result of visiting an expression.
    type ExprOutput;

    fn visit_program(&mut self, program: &Program) -> Self::StmtOutput;
    fn visit_var_decl(&mut self, decl: &VarDecl) -> Self::StmtOutput;
    fn visit_begin_end(&mut self, statements: &[Stmt]) -> Self::StmtOutput;
    fn visit_assign(&mut self, target: &Token, expression: &Expr) -> Self::StmtOutput;
    fn visit_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> Self::StmtOutput;
    fn visit_while(&mut self, condition: &Expr, body: &Stmt) -> Self::StmtOutput;

    fn visit_binary_op(
        &mut self,
        left: &Expr,
        operator: &Token,
        op: Operator,
        right: &Expr,
    ) -> Self::ExprOutput;
    fn visit_int_lit(&mut self, token: &Token, value: i64) -> Self::ExprOutput;
    fn visit_boolean_lit(&mut self, token: &Token, value: bool) -> Self::ExprOutput;
    fn visit_variable_use(&mut self, identifier: &Token) -> Self::ExprOutput;
}

impl Program {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::StmtOutput {
        visitor.visit_program(self)
    }
}

impl VarDecl {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::StmtOutput {
        visitor.visit_var_decl(self)
    }
}

impl Stmt {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::StmtOutput {
        match self {
            Stmt::BeginEnd { statements } => visitor.visit_begin_end(statements),
            Stmt::Assign { target, expression } => visitor.visit_assign(target, expression),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => visitor.visit_if(condition, then_branch, else_branch.as_deref()),
            Stmt::While { condition, body } => visitor.visit_while(condition, body),
        }
    }
}

impl Expr {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ExprOutput {
        match self {
            Expr::BinaryOp {
                left,
                operator,
                op,
                right,
            } => visitor.visit_binary_op(left, operator, *op, right),
            Expr::IntLit { token, value } => visitor.visit_int_lit(token, *value),
            Expr::BooleanLit { token, value } => visitor.visit_boolean_lit(token, *value),
            Expr::VariableUse { identifier } => visitor.visit_variable_use(identifier),
        }
    }
}
