use log::debug;

use crate::ast::{Expr, Operator, OperatorClass, Program, Stmt, Type, VarDecl};
use crate::error::{CompileError, ContextRule, Result};
use crate::token::Token;
use crate::variable::SymbolTable;
use crate::visitor::Visitor;

/// Checks declarations and types, returning the populated symbol table.
pub fn check(program: &Program) -> Result<SymbolTable> {
    let mut checker = TypeChecker::new();
    program.accept(&mut checker)?;
    Ok(checker.into_symbol_table())
}

/// Context checker. Statements yield nothing; expressions yield their
/// inferred type.
#[derive(Default)]
pub struct TypeChecker {
    symbol_table: SymbolTable,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn into_symbol_table(self) -> SymbolTable {
        self.symbol_table
    }

    fn check_condition(&mut self, construct: &str, condition: &Expr) -> Result<()> {
        let condition_type = condition.accept(self)?;
        if condition_type != Type::Boolean {
            return Err(CompileError::context(
                ContextRule::ConditionType,
                format!("'{construct}' condition must be boolean but found {condition_type}"),
                condition.line(),
            ));
        }
        Ok(())
    }
}

impl Visitor for TypeChecker {
    type StmtOutput = Result<()>;
    type ExprOutput = Result<Type>;

    fn visit_program(&mut self, program: &Program) -> Result<()> {
        for decl in &program.declarations {
            decl.accept(self)?;
        }
        debug!("declared {} variable(s)", self.symbol_table.len());
        self.visit_begin_end(&program.body)
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) -> Result<()> {
        self.symbol_table.declare(&decl.identifier, decl.type_)
    }

    fn visit_begin_end(&mut self, statements: &[Stmt]) -> Result<()> {
        for statement in statements {
            statement.accept(self)?;
        }
        Ok(())
    }

    fn visit_assign(&mut self, target: &Token, expression: &Expr) -> Result<()> {
        let declared = self.symbol_table.resolve(target)?.type_;
        let found = expression.accept(self)?;
        if declared != found {
            return Err(CompileError::context(
                ContextRule::TypeMismatch,
                format!(
                    "cannot assign {found} expression to {declared} variable '{}'",
                    target.lexeme
                ),
                target.line,
            ));
        }
        Ok(())
    }

    fn visit_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) -> Result<()> {
        self.check_condition("if", condition)?;
        then_branch.accept(self)?;
        if let Some(else_branch) = else_branch {
            else_branch.accept(self)?;
        }
        Ok(())
    }

    fn visit_while(&mut self, condition: &Expr, body: &Stmt) -> Result<()> {
        self.check_condition("while", condition)?;
        body.accept(self)
    }

    fn visit_binary_op(&mut self, left: &Expr, operator: &Token, op: Operator, right: &Expr) -> Result<Type> {
        let left = left.accept(self)?;
        let right = right.accept(self)?;
        let operator_error = |requirement: &str| {
            CompileError::context(
                ContextRule::OperatorType,
                format!("operator '{op}' requires {requirement} but found {left} and {right}"),
                operator.line,
            )
        };
        match op.class() {
            OperatorClass::Arithmetic => {
                if left != Type::Integer || right != Type::Integer {
                    return Err(operator_error("integer operands"));
                }
                Ok(Type::Integer)
            }
            OperatorClass::Logical => {
                if left != Type::Boolean || right != Type::Boolean {
                    return Err(operator_error("boolean operands"));
                }
                Ok(Type::Boolean)
            }
            OperatorClass::Relational => {
                if left != right {
                    return Err(operator_error("operands of the same type"));
                }
                Ok(Type::Boolean)
            }
        }
    }

    fn visit_int_lit(&mut self, _token: &Token, _value: i64) -> Result<Type> {
        Ok(Type::Integer)
    }

    fn visit_boolean_lit(&mut self, _token: &Token, _value: bool) -> Result<Type> {
        Ok(Type::Boolean)
    }

    fn visit_variable_use(&mut self, identifier: &Token) -> Result<Type> {
        Ok(self.symbol_table.resolve(identifier)?.type_)
    }
}
