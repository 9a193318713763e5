use strum_macros::Display;

use crate::token::{Token, TokenKind};

/// Root of the tree: header name, declarations, then the `begin ... end` body.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: Token,
    pub declarations: Vec<VarDecl>,
    /// Statements of the top-level compound statement.
    pub body: Vec<Stmt>,
}

/// `var <identifier> : <type>;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub identifier: Token,
    pub type_token: Token,
    pub type_: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    BeginEnd {
        statements: Vec<Stmt>,
    },
    Assign {
        target: Token,
        expression: Expr,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    BinaryOp {
        left: Box<Expr>,
        operator: Token,
        op: Operator,
        right: Box<Expr>,
    },
    IntLit {
        token: Token,
        value: i64,
    },
    BooleanLit {
        token: Token,
        value: bool,
    },
    VariableUse {
        identifier: Token,
    },
}

impl Expr {
    /// Line of the leftmost token of the expression.
    pub fn line(&self) -> usize {
        match self {
            Expr::BinaryOp { left, .. } => left.line(),
            Expr::IntLit { token, .. } | Expr::BooleanLit { token, .. } => token.line,
            Expr::VariableUse { identifier } => identifier.line,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Type {
    Integer,
    Boolean,
}

impl Type {
    pub fn from_token_kind(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::Integer => Some(Type::Integer),
            TokenKind::Boolean => Some(Type::Boolean),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mult,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "=")]
    Eq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
}

/// Typing family an operator belongs to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperatorClass {
    /// Integer operands, integer result.
    Arithmetic,
    /// Boolean operands, boolean result.
    Logical,
    /// Operands of equal type, boolean result.
    Relational,
}

impl Operator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Operator> {
        let op = match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Times => Self::Mult,
            TokenKind::Div => Self::Div,
            TokenKind::And => Self::And,
            TokenKind::Or => Self::Or,
            TokenKind::Eq => Self::Eq,
            TokenKind::Lt => Self::Lt,
            TokenKind::Gt => Self::Gt,
            _ => return None,
        };
        Some(op)
    }

    pub fn class(self) -> OperatorClass {
        match self {
            Self::Add | Self::Sub | Self::Mult | Self::Div => OperatorClass::Arithmetic,
            Self::And | Self::Or => OperatorClass::Logical,
            Self::Eq | Self::Lt | Self::Gt => OperatorClass::Relational,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64, line: usize) -> Expr {
        Expr::IntLit {
            token: Token::new(TokenKind::IntLit, value.to_string(), None, line),
            value,
        }
    }

    #[test]
    fn test_expr_line_is_leftmost() {
        let expr = Expr::BinaryOp {
            left: Box::new(int(1, 4)),
            operator: Token::new(TokenKind::Plus, "+", None, 5),
            op: Operator::Add,
            right: Box::new(int(2, 6)),
        };
        assert_eq!(expr.line(), 4);
    }

    #[test]
    fn test_operator_class() {
        assert_eq!(Operator::Div.class(), OperatorClass::Arithmetic);
        assert_eq!(Operator::Or.class(), OperatorClass::Logical);
        assert_eq!(Operator::Eq.class(), OperatorClass::Relational);
        assert_eq!(Operator::from_token_kind(TokenKind::Times), Some(Operator::Mult));
        assert_eq!(Operator::from_token_kind(TokenKind::Assign), None);
        assert_eq!(Operator::And.to_string(), "and");
    }
}
