use lazy_static::lazy_static;
use log::{trace, warn};
use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::error::{CompileError, Result};
use crate::token::{Literal, Token, TokenKind};

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"^//[^\n]*").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"^[ \t\r\n]+").unwrap();
    static ref OPERATOR: Regex = Regex::new(r"^(:=|[:+\-*/<>=])").unwrap();
    static ref DELIMITER: Regex = Regex::new(r"^[;()]").unwrap();
    static ref FLOAT_LITERAL: Regex = Regex::new(r"^[0-9]+\.[0-9]+").unwrap();
    static ref INT_LITERAL: Regex = Regex::new(r"^[0-9]+").unwrap();
    static ref WORD: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

/// The order of these variants matters!
/// Comment must come before operators, otherwise `//` would be read as two
/// divisions, and floats must come before integers so `1.5` is one token.
#[derive(Debug, Clone, Copy, PartialEq, EnumIter)]
enum LexemeClass {
    Comment,
    WhiteSpace,
    Operator,
    Delimiter,
    FloatLiteral,
    IntLiteral,
    Word,
}

impl LexemeClass {
    /// Get regex pattern for the specific class.
    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Comment => &COMMENT,
            Self::WhiteSpace => &WHITESPACE,
            Self::Operator => &OPERATOR,
            Self::Delimiter => &DELIMITER,
            Self::FloatLiteral => &FLOAT_LITERAL,
            Self::IntLiteral => &INT_LITERAL,
            Self::Word => &WORD,
        }
    }

    /// Returns whether a specific class should be ignored in tokenization.
    fn ignore(&self) -> bool {
        matches!(self, Self::Comment | Self::WhiteSpace)
    }
}

/// Output of the tokenizer: the full token sequence plus every lexical error
/// found along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Tokens {
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl Tokens {
    /// Always ends with exactly one `EOF` token.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fails with the first lexical error, if any.
    pub fn into_result(self) -> Result<Vec<Token>> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.tokens),
        }
    }
}

/// Splits `source_code` into tokens. Never aborts: unrecognized characters
/// are recorded as errors and skipped.
pub fn tokenize(source_code: &str) -> Tokens {
    let mut tokens: Vec<Token> = Vec::new();
    let mut errors = Vec::new();
    let mut position: usize = 0;
    let mut line: usize = 1;

    'scan: while position < source_code.len() {
        let rest = &source_code[position..];
        for class in LexemeClass::iter() {
            if let Some(re_match) = class.pattern().find(rest) {
                let text = re_match.as_str();
                if !class.ignore() {
                    match classify(class, text, line) {
                        Ok(token) => {
                            trace!("{token}");
                            tokens.push(token);
                        }
                        Err(err) => {
                            warn!("{err}");
                            errors.push(err);
                        }
                    }
                }
                line += text.matches('\n').count();
                position += re_match.end();
                continue 'scan;
            }
        }

        // `rest` is non-empty here, so there is always a next char.
        let c = rest.chars().next().unwrap_or_default();
        let err = CompileError::lexical(format!("unrecognized character '{c}'"), line);
        warn!("{err}");
        errors.push(err);
        position += c.len_utf8().max(1);
    }

    tokens.push(Token::new(TokenKind::Eof, "", None, line));
    Tokens { tokens, errors }
}

fn classify(class: LexemeClass, text: &str, line: usize) -> Result<Token> {
    let (kind, literal) = match class {
        LexemeClass::Operator | LexemeClass::Delimiter => {
            let kind = TokenKind::symbol(text)
                .ok_or_else(|| CompileError::lexical(format!("unknown symbol '{text}'"), line))?;
            (kind, None)
        }
        LexemeClass::FloatLiteral => {
            let value = text.parse::<f64>().map_err(|err| {
                CompileError::lexical(format!("invalid float literal '{text}': {err}"), line)
            })?;
            (TokenKind::FloatLit, Some(Literal::Float(value)))
        }
        LexemeClass::IntLiteral => {
            let value = text.parse::<i64>().map_err(|_| {
                CompileError::lexical(format!("integer literal '{text}' is out of range"), line)
            })?;
            (TokenKind::IntLit, Some(Literal::Int(value)))
        }
        LexemeClass::Word => (TokenKind::keyword(text).unwrap_or(TokenKind::Id), None),
        LexemeClass::Comment | LexemeClass::WhiteSpace => {
            unreachable!("ignored classes are never classified")
        }
    };
    Ok(Token::new(kind, text, literal, line))
}
