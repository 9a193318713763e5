use crate::ast::{Expr, Operator, Program, Stmt, Type, VarDecl};
use crate::error::{CompileError, ErrorKind, Result};
use crate::token::{Literal, Token, TokenKind};
use std::iter::Peekable;
use std::slice::Iter;

type TokenIter<'a> = Peekable<Iter<'a, Token>>;

/// Parses a full program. The first mismatch aborts the whole parse.
pub fn parse(tokens: &[Token]) -> Result<Program> {
    let mut iter = tokens.iter().peekable();
    let program = parse_program(&mut iter)?;
    consume(&mut iter, TokenKind::Eof)?;
    Ok(program)
}

fn parse_program(iter: &mut TokenIter<'_>) -> Result<Program> {
    consume(iter, TokenKind::Program)?;
    let name = consume(iter, TokenKind::Id)?.clone();
    consume(iter, TokenKind::Semicolon)?;

    let mut declarations = Vec::new();
    while peek_kind(iter) == TokenKind::Var {
        declarations.push(parse_var_declaration(iter)?);
    }

    let body = parse_compound(iter)?;
    Ok(Program {
        name,
        declarations,
        body,
    })
}

fn parse_var_declaration(iter: &mut TokenIter<'_>) -> Result<VarDecl> {
    consume(iter, TokenKind::Var)?;
    let identifier = consume(iter, TokenKind::Id)?.clone();
    consume(iter, TokenKind::Colon)?;

    let type_token = current(iter)?;
    let type_ = Type::from_token_kind(type_token.kind).ok_or_else(|| {
        CompileError::syntax(
            format!("{} or {}", TokenKind::Integer, TokenKind::Boolean),
            type_token.kind,
            type_token.line,
        )
    })?;
    let type_token = consume(iter, type_token.kind)?.clone();
    consume(iter, TokenKind::Semicolon)?;

    Ok(VarDecl {
        identifier,
        type_token,
        type_,
    })
}

/// `begin stmt_list end`, returning the statements.
fn parse_compound(iter: &mut TokenIter<'_>) -> Result<Vec<Stmt>> {
    consume(iter, TokenKind::Begin)?;
    let mut statements = Vec::new();
    while !matches!(peek_kind(iter), TokenKind::End | TokenKind::Eof) {
        statements.push(parse_statement(iter)?);
        consume(iter, TokenKind::Semicolon)?;
    }
    consume(iter, TokenKind::End)?;
    Ok(statements)
}

fn parse_statement(iter: &mut TokenIter<'_>) -> Result<Stmt> {
    let token = current(iter)?;
    match token.kind {
        TokenKind::Id => parse_assignment(iter),
        TokenKind::If => parse_if(iter),
        TokenKind::While => parse_while(iter),
        TokenKind::Begin => Ok(Stmt::BeginEnd {
            statements: parse_compound(iter)?,
        }),
        found => Err(CompileError::syntax("statement", found, token.line)),
    }
}

fn parse_assignment(iter: &mut TokenIter<'_>) -> Result<Stmt> {
    let target = consume(iter, TokenKind::Id)?.clone();
    consume(iter, TokenKind::Assign)?;
    let expression = parse_expression(iter)?;
    Ok(Stmt::Assign { target, expression })
}

fn parse_if(iter: &mut TokenIter<'_>) -> Result<Stmt> {
    consume(iter, TokenKind::If)?;
    let condition = parse_expression(iter)?;
    consume(iter, TokenKind::Then)?;
    let then_branch = Box::new(parse_statement(iter)?);

    // Optional else branch
    let mut else_branch = None;
    if peek_kind(iter) == TokenKind::Else {
        consume(iter, TokenKind::Else)?;
        else_branch = Some(Box::new(parse_statement(iter)?));
    }

    Ok(Stmt::If {
        condition,
        then_branch,
        else_branch,
    })
}

fn parse_while(iter: &mut TokenIter<'_>) -> Result<Stmt> {
    consume(iter, TokenKind::While)?;
    let condition = parse_expression(iter)?;
    consume(iter, TokenKind::Do)?;
    let body = Box::new(parse_statement(iter)?);
    Ok(Stmt::While { condition, body })
}

fn parse_expression(iter: &mut TokenIter<'_>) -> Result<Expr> {
    parse_binary_level(
        iter,
        &[TokenKind::Lt, TokenKind::Gt, TokenKind::Eq],
        parse_simple_expression,
    )
}

fn parse_simple_expression(iter: &mut TokenIter<'_>) -> Result<Expr> {
    parse_binary_level(
        iter,
        &[TokenKind::Plus, TokenKind::Minus, TokenKind::Or],
        parse_term,
    )
}

fn parse_term(iter: &mut TokenIter<'_>) -> Result<Expr> {
    parse_binary_level(
        iter,
        &[TokenKind::Times, TokenKind::Div, TokenKind::And],
        parse_factor,
    )
}

/// One left-associative precedence tier: `operand (op operand)*`.
fn parse_binary_level(
    iter: &mut TokenIter<'_>,
    operators: &[TokenKind],
    operand: fn(&mut TokenIter<'_>) -> Result<Expr>,
) -> Result<Expr> {
    let mut left = operand(iter)?;
    while operators.contains(&peek_kind(iter)) {
        let kind = peek_kind(iter);
        let operator = consume(iter, kind)?.clone();
        let op = Operator::from_token_kind(kind)
            .ok_or_else(|| CompileError::syntax("operator", kind, operator.line))?;
        let right = operand(iter)?;
        left = Expr::BinaryOp {
            left: Box::new(left),
            operator,
            op,
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn parse_factor(iter: &mut TokenIter<'_>) -> Result<Expr> {
    let token = current(iter)?;
    match token.kind {
        TokenKind::IntLit => {
            let token = consume(iter, TokenKind::IntLit)?.clone();
            let value = match token.literal {
                Some(Literal::Int(value)) => value,
                _ => token.lexeme.parse::<i64>().map_err(|_| {
                    CompileError::lexical(
                        format!("integer literal '{}' is out of range", token.lexeme),
                        token.line,
                    )
                })?,
            };
            Ok(Expr::IntLit { token, value })
        }
        TokenKind::True | TokenKind::False => {
            let value = token.kind == TokenKind::True;
            let token = consume(iter, token.kind)?.clone();
            Ok(Expr::BooleanLit { token, value })
        }
        TokenKind::Id => Ok(Expr::VariableUse {
            identifier: consume(iter, TokenKind::Id)?.clone(),
        }),
        TokenKind::LParen => parse_parenthesized(iter),
        TokenKind::FloatLit => Err(CompileError::new(
            ErrorKind::Syntax,
            format!("float literal '{}' is not supported", token.lexeme),
            token.line,
        )),
        found => Err(CompileError::syntax("expression", found, token.line)),
    }
}

fn parse_parenthesized(iter: &mut TokenIter<'_>) -> Result<Expr> {
    consume(iter, TokenKind::LParen)?;
    let expression = parse_expression(iter)?;
    consume(iter, TokenKind::RParen)?;
    Ok(expression)
}

/// The single failure point: advances past the current token if it has the
/// expected kind, otherwise fails with a syntax error.
fn consume<'a>(iter: &mut TokenIter<'a>, expected: TokenKind) -> Result<&'a Token> {
    let token = current(iter)?;
    if token.kind != expected {
        return Err(CompileError::syntax(expected, token.kind, token.line));
    }
    iter.next();
    Ok(token)
}

fn current<'a>(iter: &mut TokenIter<'a>) -> Result<&'a Token> {
    iter.peek()
        .copied()
        .ok_or_else(|| CompileError::syntax("token", TokenKind::Eof, 0))
}

fn peek_kind(iter: &mut TokenIter<'_>) -> TokenKind {
    iter.peek().map_or(TokenKind::Eof, |token| token.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn parse_source(source: &str) -> Result<Program> {
        parse(&tokenize(source).into_result()?)
    }

    /// Parses `expr` as the right-hand side of a single assignment.
    fn parse_expr(expr: &str) -> Expr {
        let program = parse_source(&format!("program p; begin x := {expr}; end"))
            .expect("Should parse, else the test should fail");
        match program.body.into_iter().next() {
            Some(Stmt::Assign { expression, .. }) => expression,
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    /// Renders an expression back to fully parenthesized text.
    fn shape(expr: &Expr) -> String {
        match expr {
            Expr::BinaryOp {
                left, op, right, ..
            } => format!("({} {} {})", shape(left), op, shape(right)),
            Expr::IntLit { value, .. } => value.to_string(),
            Expr::BooleanLit { value, .. } => value.to_string(),
            Expr::VariableUse { identifier } => identifier.lexeme.clone(),
        }
    }

    #[test]
    fn test_program() {
        let program = parse_source(
            "program TesteAtribuicao;
            var idade : integer;
            var ativo : boolean;
            begin
              idade := 30;
              ativo := true;
            end",
        )
        .unwrap();
        assert_eq!(program.name.lexeme, "TesteAtribuicao");
        assert_eq!(program.declarations.len(), 2);
        assert_eq!(program.declarations[0].identifier.lexeme, "idade");
        assert_eq!(program.declarations[0].type_, Type::Integer);
        assert_eq!(program.declarations[1].type_, Type::Boolean);
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_empty_body() {
        let program = parse_source("program p; begin end").unwrap();
        assert!(program.declarations.is_empty());
        assert!(program.body.is_empty());
    }

    #[test]
    fn test_add_and_sub() {
        assert_eq!(shape(&parse_expr("1 + 3 - 5")), "((1 + 3) - 5)");
        assert_eq!(
            shape(&parse_expr("5 + 3 - 1 + 3 - 5 + 10 + 1")),
            "((((((5 + 3) - 1) + 3) - 5) + 10) + 1)"
        );
    }

    #[test]
    fn test_mul_and_division() {
        assert_eq!(shape(&parse_expr("1 * 3 - 5")), "((1 * 3) - 5)");
        assert_eq!(shape(&parse_expr("5 + 3 * 1")), "(5 + (3 * 1))");
        assert_eq!(shape(&parse_expr("8 / 4 / 2")), "((8 / 4) / 2)");
    }

    #[test]
    fn test_logical_tiers() {
        assert_eq!(
            shape(&parse_expr("a or b and c")),
            "(a or (b and c))"
        );
        assert_eq!(
            shape(&parse_expr("a < b + 1 = true")),
            "((a < (b + 1)) = true)"
        );
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(shape(&parse_expr("(5 + 3) + 1")), "((5 + 3) + 1)");
        assert_eq!(shape(&parse_expr("5 * (3 + 1)")), "(5 * (3 + 1))");
    }

    #[test]
    fn test_if_else() {
        let program =
            parse_source("program p; begin if true then x := 1 else x := 2; end").unwrap();
        match &program.body[0] {
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                assert_eq!(shape(condition), "true");
                assert!(matches!(**then_branch, Stmt::Assign { .. }));
                assert!(else_branch.is_some());
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_while_block() {
        let program = parse_source(
            "program p; begin while x < 10 do begin x := x + 1; y := x; end; end",
        )
        .unwrap();
        match &program.body[0] {
            Stmt::While { body, .. } => match &**body {
                Stmt::BeginEnd { statements } => assert_eq!(statements.len(), 2),
                other => panic!("expected block, got {other:?}"),
            },
            other => panic!("expected while, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_source("program p; begin x := 1\nend").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "expected SEMICOLON but found END");
    }

    #[test]
    fn test_missing_end() {
        let err = parse_source("program p; begin x := 1;").unwrap_err();
        assert_eq!(err.message, "expected END but found EOF");
    }

    #[test]
    fn test_invalid_statement() {
        let err = parse_source("program p; begin 1 := 2; end").unwrap_err();
        assert_eq!(err.message, "expected statement but found INT_LIT");
    }

    #[test]
    fn test_declaration_type_must_be_a_type() {
        let err = parse_source("program p; var x : foo; begin end").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.message, "expected INTEGER or BOOLEAN but found ID");
    }

    #[test]
    fn test_float_literal_rejected() {
        let err = parse_source("program p; begin x := 1.5; end").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.message, "float literal '1.5' is not supported");
    }

    #[test]
    fn test_garbage_at_the_end() {
        let err = parse_source("program p; begin end x").unwrap_err();
        assert_eq!(err.message, "expected EOF but found ID");
    }

    #[test]
    fn test_parsing_nothing() {
        assert!(parse(&[]).is_err());
        assert!(parse_source("").is_err());
    }
}
