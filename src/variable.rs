use std::collections::HashMap;

use crate::ast::Type;
use crate::error::{CompileError, ContextRule, Result};
use crate::token::Token;

/// A declared identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct IdEntry {
    pub token: Token,
    pub type_: Type,
}

/// Single flat namespace of declared variables, kept in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolTable {
    symbols: HashMap<String, usize>,
    entries: Vec<IdEntry>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<&IdEntry> {
        self.symbols.get(symbol).map(|&index| &self.entries[index])
    }

    /// Adds `token` with type `type_`, failing if the name is already taken.
    pub fn declare(&mut self, token: &Token, type_: Type) -> Result<()> {
        if let Some(existing) = self.get(&token.lexeme) {
            return Err(CompileError::context(
                ContextRule::DuplicateDeclaration,
                format!(
                    "variable '{}' is already declared (first declared at line {})",
                    token.lexeme, existing.token.line
                ),
                token.line,
            ));
        }
        self.symbols.insert(token.lexeme.clone(), self.entries.len());
        self.entries.push(IdEntry {
            token: token.clone(),
            type_,
        });
        Ok(())
    }

    /// Looks up a referenced identifier, failing if it was never declared.
    pub fn resolve(&self, token: &Token) -> Result<&IdEntry> {
        self.get(&token.lexeme).ok_or_else(|| {
            CompileError::context(
                ContextRule::UndeclaredIdentifier,
                format!("variable '{}' is not declared", token.lexeme),
                token.line,
            )
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn id(name: &str, line: usize) -> Token {
        Token::new(TokenKind::Id, name, None, line)
    }

    #[test]
    fn test_declare_and_get() {
        let mut table = SymbolTable::new();
        table.declare(&id("a", 1), Type::Integer).unwrap();
        table.declare(&id("b", 2), Type::Boolean).unwrap();
        assert_eq!(table.get("a").map(|entry| entry.type_), Some(Type::Integer));
        assert_eq!(table.resolve(&id("b", 9)).unwrap().token.line, 2);
        assert!(table.get("c").is_none());
        assert_eq!(
            table.iter().map(|entry| entry.token.lexeme.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_duplicate() {
        let mut table = SymbolTable::new();
        table.declare(&id("a", 1), Type::Integer).unwrap();
        let err = table.declare(&id("a", 3), Type::Boolean).unwrap_err();
        assert_eq!(err.context_rule(), Some(ContextRule::DuplicateDeclaration));
        assert_eq!(err.line, 3);
        // The first declaration is untouched.
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a").unwrap().type_, Type::Integer);
    }

    #[test]
    fn test_undeclared() {
        let table = SymbolTable::new();
        let err = table.resolve(&id("x", 4)).unwrap_err();
        assert_eq!(err.context_rule(), Some(ContextRule::UndeclaredIdentifier));
        assert_eq!(err.line, 4);
    }
}
