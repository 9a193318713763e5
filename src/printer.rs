//! Indented textual rendering of the AST, for debugging and the `ast` command.

use crate::ast::{Expr, Operator, Program, Stmt, VarDecl};
use crate::token::Token;
use crate::visitor::Visitor;

/// Renders `program` with two spaces of indentation per level.
pub fn print_program(program: &Program) -> String {
    program.accept(&mut AstPrinter::default())
}

#[derive(Default)]
pub struct AstPrinter {
    indent_level: usize,
}

impl AstPrinter {
    fn line(&self, text: impl AsRef<str>) -> String {
        format!("{}{}\n", "  ".repeat(self.indent_level), text.as_ref())
    }

    /// Renders a labelled child one level deeper than the label.
    fn section(&mut self, label: &str, render: impl FnOnce(&mut Self) -> String) -> String {
        let mut out = self.line(label);
        self.indent_level += 1;
        out.push_str(&render(self));
        self.indent_level -= 1;
        out
    }
}

impl Visitor for AstPrinter {
    type StmtOutput = String;
    type ExprOutput = String;

    fn visit_program(&mut self, program: &Program) -> String {
        let mut out = self.line(format!("Program: {}", program.name.lexeme));
        self.indent_level += 1;
        out.push_str(&self.section("Declarations:", |printer| {
            program
                .declarations
                .iter()
                .map(|decl| decl.accept(printer))
                .collect()
        }));
        out.push_str(&self.section("Body:", |printer| {
            printer.visit_begin_end(&program.body)
        }));
        self.indent_level -= 1;
        out
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) -> String {
        self.line(format!(
            "VarDecl: {} : {}",
            decl.identifier.lexeme, decl.type_token.lexeme
        ))
    }

    fn visit_begin_end(&mut self, statements: &[Stmt]) -> String {
        let mut out = self.line("BeginEnd");
        self.indent_level += 1;
        for statement in statements {
            out.push_str(&statement.accept(self));
        }
        self.indent_level -= 1;
        out
    }

    fn visit_assign(&mut self, target: &Token, expression: &Expr) -> String {
        let mut out = self.line(format!("Assign: {}", target.lexeme));
        self.indent_level += 1;
        out.push_str(&self.section("Expression:", |printer| expression.accept(printer)));
        self.indent_level -= 1;
        out
    }

    fn visit_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) -> String {
        let mut out = self.line("If");
        self.indent_level += 1;
        out.push_str(&self.section("Condition:", |printer| condition.accept(printer)));
        out.push_str(&self.section("Then:", |printer| then_branch.accept(printer)));
        if let Some(else_branch) = else_branch {
            out.push_str(&self.section("Else:", |printer| else_branch.accept(printer)));
        }
        self.indent_level -= 1;
        out
    }

    fn visit_while(&mut self, condition: &Expr, body: &Stmt) -> String {
        let mut out = self.line("While");
        self.indent_level += 1;
        out.push_str(&self.section("Condition:", |printer| condition.accept(printer)));
        out.push_str(&self.section("Do:", |printer| body.accept(printer)));
        self.indent_level -= 1;
        out
    }

    fn visit_binary_op(&mut self, left: &Expr, operator: &Token, _op: Operator, right: &Expr) -> String {
        let mut out = self.line(format!("BinaryOp: '{}'", operator.lexeme));
        self.indent_level += 1;
        out.push_str(&self.section("Left:", |printer| left.accept(printer)));
        out.push_str(&self.section("Right:", |printer| right.accept(printer)));
        self.indent_level -= 1;
        out
    }

    fn visit_int_lit(&mut self, token: &Token, _value: i64) -> String {
        self.line(format!("IntLit: {}", token.lexeme))
    }

    fn visit_boolean_lit(&mut self, token: &Token, _value: bool) -> String {
        self.line(format!("BooleanLit: {}", token.lexeme))
    }

    fn visit_variable_use(&mut self, identifier: &Token) -> String {
        self.line(format!("VariableUse: {}", identifier.lexeme))
    }
}
