use std::str::FromStr;

use orchestrator_client::Operation;

use super::validator::{classify, SymbolClass};
use super::ExpressionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paren {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operation),
    Paren(Paren),
}

/// Maps validated symbols to typed tokens. Multi-character symbols are
/// always numbers by construction.
pub fn tokenize(symbols: &[String]) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let class = symbol.chars().next().and_then(classify);

        let token = if symbol.len() > 1 || class == Some(SymbolClass::Number) {
            let value = symbol
                .parse::<f64>()
                .map_err(|_| ExpressionError::InvalidNumber(symbol.clone()))?;
            Token::Number(value)
        } else {
            match (class, symbol.as_str()) {
                (Some(SymbolClass::Operator), _) => Token::Operator(
                    Operation::from_str(symbol).map_err(|_| ExpressionError::Malformed)?,
                ),
                (Some(SymbolClass::Paren), "(") => Token::Paren(Paren::Open),
                (Some(SymbolClass::Paren), _) => Token::Paren(Paren::Close),
                _ => return Err(ExpressionError::Malformed),
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}
