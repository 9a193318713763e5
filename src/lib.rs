//! Compiler from a small imperative language to stack-machine text.
//!
//! Passes run strictly in order and the first error aborts the compilation:
//! `tokenizer` -> `parser` -> `type_checker` -> `code_generator`.
pub mod ast;
pub mod code_generator;
pub mod error;
pub mod instruction;
pub mod parser;
pub mod printer;
pub mod token;
pub mod tokenizer;
pub mod type_checker;
pub mod variable;
pub mod visitor;

use log::debug;

pub use error::{CompileError, ContextRule, ErrorKind, Result};
pub use instruction::{Instruction, Label, ObjectCode};

use ast::Program;
use token::Token;
use variable::SymbolTable;

/// Every artifact of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub symbol_table: SymbolTable,
    pub object_code: ObjectCode,
}

impl Compilation {
    pub fn run(source_code: &str) -> Result<Self> {
        let tokens = tokenizer::tokenize(source_code).into_result()?;
        debug!("scanned {} token(s)", tokens.len());

        let program = parser::parse(&tokens)?;
        debug!(
            "parsed program '{}' with {} declaration(s)",
            program.name.lexeme,
            program.declarations.len()
        );

        let symbol_table = type_checker::check(&program)?;
        let object_code = code_generator::generate(&program);

        Ok(Self {
            tokens,
            program,
            symbol_table,
            object_code,
        })
    }
}

/// Compiles `source_code` to object code. No code is produced unless every
/// pass succeeds.
pub fn compile(source_code: &str) -> Result<ObjectCode> {
    Compilation::run(source_code).map(|compilation| compilation.object_code)
}
