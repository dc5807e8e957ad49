use derive_more::Display;

use orchestrator_client::Operation;

mod parser;
mod tokenizer;
mod validator;

/// Binary expression tree produced by the parsing pipeline. Consumed once by
/// the task graph lowering, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(f64),
    Application(Operation, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Display, Clone, PartialEq)]
pub enum ExpressionError {
    #[display(fmt = "empty expression")]
    Empty,
    #[display(fmt = "invalid character: {}", _0)]
    InvalidCharacter(char),
    #[display(fmt = "operator at start: {}", _0)]
    LeadingOperator(String),
    #[display(fmt = "operator at end: {}", _0)]
    TrailingOperator(String),
    #[display(fmt = "invalid space: \"{} {}\"", _0, _1)]
    InvalidSpace(String, String),
    #[display(fmt = "invalid parentheses")]
    UnbalancedParentheses,
    #[display(fmt = "invalid number: {}", _0)]
    InvalidNumber(String),
    #[display(fmt = "malformed expression")]
    Malformed,
}

impl std::error::Error for ExpressionError {}

/// Runs the full pipeline: validation, tokenization, tree construction.
pub fn parse(input: &str) -> Result<Expr, ExpressionError> {
    let symbols = validator::validate(input)?;
    let tokens = tokenizer::tokenize(&symbols)?;
    parser::build(&tokens)
}
