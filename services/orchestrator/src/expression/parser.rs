use orchestrator_client::Operation;

use super::tokenizer::{Paren, Token};
use super::{Expr, ExpressionError};

fn additive(op: Operation) -> bool {
    matches!(op, Operation::Add | Operation::Sub)
}

fn multiplicative(op: Operation) -> bool {
    matches!(op, Operation::Mul | Operation::Div)
}

/// Folds a minus in operand position (first token, or right after another
/// operator) into the number literal that follows it.
fn fold_unary_minus(tokens: &[Token]) -> Vec<Token> {
    let mut folded = Vec::with_capacity(tokens.len());
    let mut skip = false;

    for (i, &token) in tokens.iter().enumerate() {
        if skip {
            skip = false;
            continue;
        }

        if let Token::Operator(Operation::Sub) = token {
            let operand_position = i == 0 || matches!(tokens[i - 1], Token::Operator(_));
            if operand_position {
                if let Some(Token::Number(value)) = tokens.get(i + 1) {
                    folded.push(Token::Number(-value));
                    skip = true;
                    continue;
                }
            }
        }

        folded.push(token);
    }

    folded
}

/// Splits on operators selected by `select` at parenthesis depth zero,
/// returning the segments between them and the operators in order.
fn split_top_level(
    tokens: &[Token],
    select: fn(Operation) -> bool,
) -> (Vec<&[Token]>, Vec<Operation>) {
    let mut segments = Vec::new();
    let mut operators = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Paren(Paren::Open) => depth += 1,
            Token::Paren(Paren::Close) => depth -= 1,
            Token::Operator(op) if depth == 0 && select(*op) => {
                segments.push(&tokens[start..i]);
                operators.push(*op);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&tokens[start..]);

    (segments, operators)
}

fn parse_expression(tokens: &[Token]) -> Result<Expr, ExpressionError> {
    let (terms, operators) = split_top_level(tokens, additive);

    let mut terms = terms.into_iter();
    let mut expr = match terms.next() {
        Some(term) => parse_term(term)?,
        None => return Err(ExpressionError::Malformed),
    };

    // Left fold keeps same-precedence operators left associative
    for (op, term) in operators.into_iter().zip(terms) {
        expr = Expr::Application(op, Box::new(expr), Box::new(parse_term(term)?));
    }

    Ok(expr)
}

fn parse_term(tokens: &[Token]) -> Result<Expr, ExpressionError> {
    let (factors, operators) = split_top_level(tokens, multiplicative);

    let mut factors = factors.into_iter();
    let mut expr = match factors.next() {
        Some(factor) => parse_factor(factor)?,
        None => return Err(ExpressionError::Malformed),
    };

    for (op, factor) in operators.into_iter().zip(factors) {
        expr = Expr::Application(op, Box::new(expr), Box::new(parse_factor(factor)?));
    }

    Ok(expr)
}

fn parse_factor(tokens: &[Token]) -> Result<Expr, ExpressionError> {
    match tokens {
        [Token::Number(value)] => Ok(Expr::Constant(*value)),
        [Token::Paren(Paren::Open), interior @ .., Token::Paren(Paren::Close)]
            if !interior.is_empty() =>
        {
            parse_expression(interior)
        }
        // Anything else is a structural defect the validator let through;
        // surfaced as an error value, never a panic
        _ => Err(ExpressionError::Malformed),
    }
}

/// Builds the expression tree: additive operators bind loosest,
/// multiplicative ones tighter, parentheses tightest.
pub fn build(tokens: &[Token]) -> Result<Expr, ExpressionError> {
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let folded = fold_unary_minus(tokens);
    parse_expression(&folded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parse;

    fn eval(e: &Expr) -> f64 {
        match e {
            Expr::Constant(v) => *v,
            Expr::Application(op, l, r) => match op {
                Operation::Add => eval(l) + eval(r),
                Operation::Sub => eval(l) - eval(r),
                Operation::Mul => eval(l) * eval(r),
                Operation::Div => eval(l) / eval(r),
            },
        }
    }

    #[test]
    fn test_precedence() -> Result<(), ExpressionError> {
        let expr = parse("3 + 4 * 2")?;

        assert_eq!(eval(&expr), 11.0);
        match expr {
            Expr::Application(Operation::Add, l, r) => {
                assert_eq!(*l, Expr::Constant(3.0));
                match *r {
                    Expr::Application(Operation::Mul, l, r) => {
                        assert_eq!(*l, Expr::Constant(4.0));
                        assert_eq!(*r, Expr::Constant(2.0));
                    }
                    other => panic!("{:?} doesn't match", other),
                }
            }
            other => panic!("{:?} doesn't match", other),
        }
        Ok(())
    }

    #[test]
    fn test_grouping() -> Result<(), ExpressionError> {
        let expr = parse("(3+4)*2")?;

        assert_eq!(eval(&expr), 14.0);
        match expr {
            Expr::Application(Operation::Mul, l, r) => {
                match *l {
                    Expr::Application(Operation::Add, l, r) => {
                        assert_eq!(*l, Expr::Constant(3.0));
                        assert_eq!(*r, Expr::Constant(4.0));
                    }
                    other => panic!("{:?} doesn't match", other),
                }
                assert_eq!(*r, Expr::Constant(2.0));
            }
            other => panic!("{:?} doesn't match", other),
        }
        Ok(())
    }

    #[test]
    fn test_unary_minus() -> Result<(), ExpressionError> {
        assert_eq!(eval(&parse("-3+5")?), 2.0);
        assert_eq!(eval(&parse("3 - -2")?), 5.0);
        assert_eq!(eval(&parse("2*-3")?), -6.0);
        Ok(())
    }

    #[test]
    fn test_left_associativity() -> Result<(), ExpressionError> {
        assert_eq!(eval(&parse("2-3-4")?), -5.0);
        assert_eq!(eval(&parse("16/4/2")?), 2.0);
        Ok(())
    }

    #[test]
    fn test_eval() -> Result<(), ExpressionError> {
        assert_eq!(eval(&parse("2+2")?), 4.0);
        assert_eq!(eval(&parse("34/2")?), 17.0);
        assert_eq!(eval(&parse("34 +6/ 2")?), 37.0);
        assert_eq!(eval(&parse("(34 +6)/ 2")?), 20.0);
        assert_eq!(eval(&parse("((2))")?), 2.0);
        assert_eq!(eval(&parse("3 * 4 / (6+54) * 5 - 1")?), 0.0);
        Ok(())
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse("()"), Err(ExpressionError::Malformed));
        assert_eq!(parse("2++2"), Err(ExpressionError::Malformed));
        assert_eq!(parse("(2)(3)"), Err(ExpressionError::Malformed));
    }
}
