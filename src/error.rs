use strum_macros::Display;
use thiserror::Error;

use crate::token::TokenKind;

/// `Result` type alias used by every compilation pass.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Which pass rejected the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Context(ContextRule),
}

/// The checker rule a context error violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ContextRule {
    DuplicateDeclaration,
    UndeclaredIdentifier,
    TypeMismatch,
    ConditionType,
    OperatorType,
}

/// A fatal compilation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error at line {line}: {message}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }

    pub fn lexical(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::Lexical, message, line)
    }

    /// Syntax error naming what the grammar wanted and what it got instead.
    pub fn syntax(expected: impl std::fmt::Display, found: TokenKind, line: usize) -> Self {
        Self::new(
            ErrorKind::Syntax,
            format!("expected {expected} but found {found}"),
            line,
        )
    }

    pub fn context(rule: ContextRule, message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::Context(rule), message, line)
    }

    /// Returns the violated checker rule, if this is a context error.
    pub fn context_rule(&self) -> Option<ContextRule> {
        match self.kind {
            ErrorKind::Context(rule) => Some(rule),
            _ => None,
        }
    }
}
