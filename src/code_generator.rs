use log::{debug, trace};

use crate::ast::{Expr, Operator, Program, Stmt, VarDecl};
use crate::instruction::{Instruction, Label, ObjectCode};
use crate::token::Token;
use crate::visitor::Visitor;

/// Hands out `L0, L1, ...`, never reusing a number.
#[derive(Debug, Default)]
pub struct LabelGenerator {
    label_number: u32,
}

impl LabelGenerator {
    pub fn new_label(&mut self) -> Label {
        let label = Label(self.label_number);
        self.label_number += 1;
        trace!("allocated label {label}");
        label
    }
}

/// Emits stack-machine code for a program that has already passed the
/// checker. Variables are addressed by name, so no symbol table is needed.
pub fn generate(program: &Program) -> ObjectCode {
    let mut generator = CodeGenerator::new();
    program.accept(&mut generator);
    debug!("generated {} instruction(s)", generator.instructions.len());
    ObjectCode::new(generator.instructions)
}

#[derive(Default)]
pub struct CodeGenerator {
    labels: LabelGenerator,
    instructions: Vec<Instruction>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, instruction: Instruction) {
        trace!("emit {instruction}");
        self.instructions.push(instruction);
    }
}

fn operator_instruction(op: Operator) -> Instruction {
    match op {
        Operator::Add => Instruction::Add,
        Operator::Sub => Instruction::Sub,
        Operator::Mult => Instruction::Mult,
        Operator::Div => Instruction::Div,
        Operator::And => Instruction::And,
        Operator::Or => Instruction::Or,
        Operator::Eq => Instruction::Eq,
        Operator::Lt => Instruction::Lt,
        Operator::Gt => Instruction::Gt,
    }
}

impl Visitor for CodeGenerator {
    type StmtOutput = ();
    type ExprOutput = ();

    fn visit_program(&mut self, program: &Program) {
        for decl in &program.declarations {
            decl.accept(self);
        }
        self.visit_begin_end(&program.body);
        self.emit(Instruction::Halt);
    }

    fn visit_var_decl(&mut self, _decl: &VarDecl) {}

    fn visit_begin_end(&mut self, statements: &[Stmt]) {
        for statement in statements {
            statement.accept(self);
        }
    }

    fn visit_assign(&mut self, target: &Token, expression: &Expr) {
        expression.accept(self);
        self.emit(Instruction::Store(target.lexeme.clone()));
    }

    fn visit_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) {
        let l_else = self.labels.new_label();
        let l_end = self.labels.new_label();

        condition.accept(self);
        self.emit(Instruction::JumpIfFalse(l_else));
        then_branch.accept(self);
        self.emit(Instruction::Jump(l_end));
        self.emit(Instruction::Label(l_else));
        if let Some(else_branch) = else_branch {
            else_branch.accept(self);
        }
        self.emit(Instruction::Label(l_end));
    }

    fn visit_while(&mut self, condition: &Expr, body: &Stmt) {
        let l_start = self.labels.new_label();
        let l_end = self.labels.new_label();

        self.emit(Instruction::Label(l_start));
        condition.accept(self);
        self.emit(Instruction::JumpIfFalse(l_end));
        body.accept(self);
        self.emit(Instruction::Jump(l_start));
        self.emit(Instruction::Label(l_end));
    }

    fn visit_binary_op(&mut self, left: &Expr, _operator: &Token, op: Operator, right: &Expr) {
        left.accept(self);
        right.accept(self);
        self.emit(operator_instruction(op));
    }

    fn visit_int_lit(&mut self, _token: &Token, value: i64) {
        self.emit(Instruction::LoadL(value));
    }

    fn visit_boolean_lit(&mut self, _token: &Token, value: bool) {
        self.emit(Instruction::LoadL(i64::from(value)));
    }

    fn visit_variable_use(&mut self, identifier: &Token) {
        self.emit(Instruction::Load(identifier.lexeme.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::tokenizer::tokenize;

    fn generate_source(source: &str) -> Vec<String> {
        let tokens = tokenize(source).into_result().unwrap();
        generate(&parse(&tokens).unwrap()).lines()
    }

    #[test]
    fn test_label_generator() {
        let mut labels = LabelGenerator::default();
        assert_eq!(labels.new_label(), Label(0));
        assert_eq!(labels.new_label(), Label(1));
        assert_eq!(labels.new_label().to_string(), "L2");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(generate_source("program p; begin end"), vec!["HALT"]);
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            generate_source("program p; var idade : integer; begin idade := 30; end"),
            vec!["LOADL 30", "STORE idade", "HALT"]
        );
    }

    #[test]
    fn test_binary_operations() {
        assert_eq!(
            generate_source("program p; begin x := (a + 2) * b - 1; y := a < b = c or false; end"),
            vec![
                "LOAD a", "LOADL 2", "ADD", "LOAD b", "MULT", "LOADL 1", "SUB", "STORE x",
                "LOAD a", "LOAD b", "LT", "LOAD c", "LOADL 0", "OR", "EQ", "STORE y", "HALT",
            ]
        );
    }

    #[test]
    fn test_if_else() {
        assert_eq!(
            generate_source("program p; var x : integer; begin if true then x := 1 else x := 2; end"),
            vec![
                "LOADL 1",
                "JUMPIF(0) L0",
                "LOADL 1",
                "STORE x",
                "JUMP L1",
                "L0:",
                "LOADL 2",
                "STORE x",
                "L1:",
                "HALT",
            ]
        );
    }

    #[test]
    fn test_if_without_else() {
        assert_eq!(
            generate_source("program p; begin if b then x := 1; end"),
            vec!["LOAD b", "JUMPIF(0) L0", "LOADL 1", "STORE x", "JUMP L1", "L0:", "L1:", "HALT"]
        );
    }

    #[test]
    fn test_while() {
        assert_eq!(
            generate_source("program p; begin while x < 3 do x := x + 1; end"),
            vec![
                "L0:",
                "LOAD x",
                "LOADL 3",
                "LT",
                "JUMPIF(0) L1",
                "LOAD x",
                "LOADL 1",
                "ADD",
                "STORE x",
                "JUMP L0",
                "L1:",
                "HALT",
            ]
        );
    }

    #[test]
    fn test_nested_labels_are_unique() {
        let lines = generate_source(
            "program p; begin
               while true do if false then while true do x := 1 else x := 2;
               if true then x := 3;
             end",
        );
        let definitions: Vec<&String> = lines.iter().filter(|l| l.ends_with(':')).collect();
        assert_eq!(
            definitions,
            vec!["L0:", "L4:", "L5:", "L2:", "L3:", "L1:", "L6:", "L7:"]
        );
    }
}
