use std::fmt;
use strum_macros::Display;

/// A single lexical unit produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, literal: Option<Literal>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }
}

/// Listing format used by the `tokens` command.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Token [type={}, lexeme='{}', literal=", self.kind, self.lexeme)?;
        match &self.literal {
            Some(literal) => write!(f, "{literal}")?,
            None => write!(f, "None")?,
        }
        write!(f, ", line={}]", self.line)
    }
}

/// Numeric value carried by literal tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Float(value) => write!(f, "{value:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    #[strum(serialize = "LPAREN")]
    LParen,
    #[strum(serialize = "RPAREN")]
    RParen,
    Semicolon,
    Plus,
    Minus,
    Times,
    Div,
    Lt,
    Gt,
    Eq,
    Colon,
    Assign,

    Id,
    IntLit,
    FloatLit,

    Program,
    Var,
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Do,
    Integer,
    Boolean,
    True,
    False,
    Or,
    And,

    Eof,
}

impl TokenKind {
    /// Folds an identifier-shaped word into its keyword kind. Case-sensitive.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "program" => Self::Program,
            "var" => Self::Var,
            "begin" => Self::Begin,
            "end" => Self::End,
            "if" => Self::If,
            "then" => Self::Then,
            "else" => Self::Else,
            "while" => Self::While,
            "do" => Self::Do,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "true" => Self::True,
            "false" => Self::False,
            "or" => Self::Or,
            "and" => Self::And,
            _ => return None,
        };
        Some(kind)
    }

    /// Kind of a fixed operator or punctuation lexeme.
    pub fn symbol(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "(" => Self::LParen,
            ")" => Self::RParen,
            ";" => Self::Semicolon,
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Times,
            "/" => Self::Div,
            "<" => Self::Lt,
            ">" => Self::Gt,
            "=" => Self::Eq,
            ":" => Self::Colon,
            ":=" => Self::Assign,
            _ => return None,
        };
        Some(kind)
    }
}
