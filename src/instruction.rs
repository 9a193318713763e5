use itertools::Itertools;
use std::fmt;

/// Jump target. Rendered as `L<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// One line of stack-machine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Add,
    Sub,
    Mult,
    Div,
    And,
    Or,
    Eq,
    Lt,
    Gt,
    /// Push a literal value.
    LoadL(i64),
    /// Push the value of a named variable.
    Load(String),
    /// Pop into a named variable.
    Store(String),
    Jump(Label),
    /// Pop, and jump if the value is 0.
    JumpIfFalse(Label),
    /// Label definition line.
    Label(Label),
    Halt,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Sub => write!(f, "SUB"),
            Self::Mult => write!(f, "MULT"),
            Self::Div => write!(f, "DIV"),
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Eq => write!(f, "EQ"),
            Self::Lt => write!(f, "LT"),
            Self::Gt => write!(f, "GT"),
            Self::LoadL(value) => write!(f, "LOADL {value}"),
            Self::Load(name) => write!(f, "LOAD {name}"),
            Self::Store(name) => write!(f, "STORE {name}"),
            Self::Jump(label) => write!(f, "JUMP {label}"),
            Self::JumpIfFalse(label) => write!(f, "JUMPIF(0) {label}"),
            Self::Label(label) => write!(f, "{label}:"),
            Self::Halt => write!(f, "HALT"),
        }
    }
}

/// The complete, immutable output of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCode {
    instructions: Vec<Instruction>,
}

impl ObjectCode {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn lines(&self) -> Vec<String> {
        self.instructions.iter().map(|i| i.to_string()).collect()
    }

    /// Labels in the order their definition lines appear.
    pub fn defined_labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Label(label) => Some(*label),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// One instruction per line, with a trailing newline.
impl fmt::Display for ObjectCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.instructions.iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string() {
        assert_eq!(Instruction::LoadL(30).to_string(), "LOADL 30");
        assert_eq!(Instruction::Store("idade".into()).to_string(), "STORE idade");
        assert_eq!(Instruction::Load("x".into()).to_string(), "LOAD x");
        assert_eq!(Instruction::JumpIfFalse(Label(0)).to_string(), "JUMPIF(0) L0");
        assert_eq!(Instruction::Jump(Label(12)).to_string(), "JUMP L12");
        assert_eq!(Instruction::Label(Label(3)).to_string(), "L3:");
        assert_eq!(Instruction::Mult.to_string(), "MULT");
        assert_eq!(Instruction::Halt.to_string(), "HALT");
    }

    #[test]
    fn test_object_code_text() {
        let code = ObjectCode::new(vec![
            Instruction::LoadL(1),
            Instruction::Store("x".into()),
            Instruction::Halt,
        ]);
        assert_eq!(code.to_string(), "LOADL 1\nSTORE x\nHALT\n");
        assert_eq!(code.lines(), vec!["LOADL 1", "STORE x", "HALT"]);
        assert_eq!(code.defined_labels().count(), 0);
    }
}
