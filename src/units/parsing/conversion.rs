
//! Parser for numeric conversion formulas such as
//! `"(value - 32) * 5 / 9"`. The only identifier is `value`, the
//! quantity being converted; everything else is decimal literals,
//! the four arithmetic operators, and parentheses.

use super::TokenizeError;
use crate::parsing::shunting_yard::{
  self, InfixOperator, Precedence, ShuntingYardDriver, ShuntingYardError, Token,
};
use crate::parsing::tokenizer::TokenizerState;
use crate::units::conversion::Conversion;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use std::fmt::{self, Display, Formatter};

/// A value token in the conversion grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
  /// A decimal literal.
  Number(f64),
  /// The `value` placeholder.
  Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOp {
  Add,
  Sub,
  Mul,
  Div,
}

/// Semantic errors raised while building the conversion AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionOpError {
  /// A constant-valued denominator equal to exactly 0.0, caught at
  /// parse time. Best-effort only: a denominator that merely
  /// evaluates to zero for some inputs, or that becomes zero during
  /// later composition, is not detected.
  #[error("division by zero in conversion formula")]
  DivisionByZero,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionParseError {
  #[error(transparent)]
  Tokenize(#[from] TokenizeError),
  #[error(transparent)]
  Parse(#[from] ShuntingYardError<ConversionOpError>),
}

impl InfixOperator for ConversionOp {
  fn symbol(&self) -> &'static str {
    match self {
      ConversionOp::Add => "+",
      ConversionOp::Sub => "-",
      ConversionOp::Mul => "*",
      ConversionOp::Div => "/",
    }
  }

  fn precedence(&self) -> Precedence {
    match self {
      ConversionOp::Add | ConversionOp::Sub => Precedence(0),
      ConversionOp::Mul | ConversionOp::Div => Precedence(1),
    }
  }
}

impl Display for Scalar {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Scalar::Number(n) => write!(f, "{}", n),
      Scalar::Value => write!(f, "value"),
    }
  }
}

/// Shunting yard driver compiling conversion tokens into a
/// [`Conversion`] tree, constant-folding as it goes.
#[derive(Debug, Clone, Default)]
struct ConversionBuilder;

impl ShuntingYardDriver<Scalar, ConversionOp> for ConversionBuilder {
  type Output = Conversion;
  type Error = ConversionOpError;

  fn compile_scalar(&mut self, scalar: Scalar) -> Result<Conversion, ConversionOpError> {
    Ok(match scalar {
      Scalar::Number(n) => Conversion::Constant(n),
      Scalar::Value => Conversion::Value,
    })
  }

  fn compile_infix_op(
    &mut self,
    left: Conversion,
    op: &ConversionOp,
    right: Conversion,
  ) -> Result<Conversion, ConversionOpError> {
    if *op == ConversionOp::Div && right.is_constant() && right.eval(0.0) == 0.0 {
      return Err(ConversionOpError::DivisionByZero);
    }
    let node = match op {
      ConversionOp::Add => Conversion::Add(Box::new(left), Box::new(right)),
      ConversionOp::Sub => Conversion::Sub(Box::new(left), Box::new(right)),
      ConversionOp::Mul => Conversion::Mul(Box::new(left), Box::new(right)),
      ConversionOp::Div => Conversion::Div(Box::new(left), Box::new(right)),
    };
    Ok(node.folded())
  }
}

fn tokenize(input: &str) -> Result<Vec<Token<Scalar, ConversionOp>>, TokenizeError> {
  // Optional leading digits, optional single decimal point, at least
  // one digit somewhere.
  static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+\.\d*|\.\d+|\d+)").unwrap());
  static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*").unwrap());

  let mut state = TokenizerState::new(input);
  let mut tokens = Vec::new();
  loop {
    state.consume_spaces();
    if state.is_eof() {
      break;
    }
    let remaining = state.remaining();
    if let Some(m) = state.read_regex(&NUMBER_RE) {
      // expect safety: The number regex only matches valid decimal
      // literals.
      let number = m.as_str().parse().expect("number regex matched an invalid float");
      tokens.push(Token::scalar(Scalar::Number(number), m.span()));
    } else if let Some(m) = state.read_regex(&IDENTIFIER_RE) {
      if m.as_str() != "value" {
        return Err(TokenizeError::new(remaining));
      }
      tokens.push(Token::scalar(Scalar::Value, m.span()));
    } else if let Some(m) = state.read_literal("(") {
      tokens.push(Token::left_paren(m.span()));
    } else if let Some(m) = state.read_literal(")") {
      tokens.push(Token::right_paren(m.span()));
    } else if let Some(m) = state.read_literal("+") {
      tokens.push(Token::infix_operator(ConversionOp::Add, m.span()));
    } else if let Some(m) = state.read_literal("-") {
      tokens.push(Token::infix_operator(ConversionOp::Sub, m.span()));
    } else if let Some(m) = state.read_literal("*") {
      tokens.push(Token::infix_operator(ConversionOp::Mul, m.span()));
    } else if let Some(m) = state.read_literal("/") {
      tokens.push(Token::infix_operator(ConversionOp::Div, m.span()));
    } else {
      return Err(TokenizeError::new(remaining));
    }
  }
  Ok(tokens)
}

/// Parses a conversion formula into its expression tree.
pub fn parse_conversion(input: &str) -> Result<Conversion, ConversionParseError> {
  let tokens = tokenize(input)?;
  let conversion = shunting_yard::parse(&mut ConversionBuilder, tokens)?;
  Ok(conversion)
}

#[cfg(test)]
mod tests {
  use super::*;

  use approx::assert_relative_eq;

  fn assert_equivalent(lhs: &str, rhs: &str) {
    let lhs = parse_conversion(lhs).unwrap();
    let rhs = parse_conversion(rhs).unwrap();
    for x in [0.0, 1.0, 123.4, -56.78] {
      assert_relative_eq!(lhs.eval(x), rhs.eval(x), epsilon = 1e-10);
    }
  }

  #[test]
  fn test_simple_constant() {
    let conv = parse_conversion("123.4").unwrap();
    assert_eq!(conv, Conversion::Constant(123.4));
    assert_relative_eq!(conv.eval(0.0), 123.4);
    assert_relative_eq!(conv.eval(1.0), 123.4);
  }

  #[test]
  fn test_simple_value() {
    let conv = parse_conversion("value").unwrap();
    assert_eq!(conv, Conversion::Value);
    assert_relative_eq!(conv.eval(0.0), 0.0);
    assert_relative_eq!(conv.eval(123.4), 123.4);
  }

  #[test]
  fn test_number_literal_shapes() {
    assert_eq!(parse_conversion("5").unwrap(), Conversion::Constant(5.0));
    assert_eq!(parse_conversion("5.").unwrap(), Conversion::Constant(5.0));
    assert_eq!(parse_conversion(".5").unwrap(), Conversion::Constant(0.5));
    assert_eq!(parse_conversion("5.25").unwrap(), Conversion::Constant(5.25));
  }

  #[test]
  fn test_basic_addition() {
    let conv = parse_conversion("value + 3.0").unwrap();
    assert_relative_eq!(conv.eval(0.0), 3.0);
    assert_relative_eq!(conv.eval(1.0), 4.0);
    assert_relative_eq!(conv.eval(123.4), 126.4);
  }

  #[test]
  fn test_add_commutative() {
    assert_equivalent("value + 3.0", "3.0 + value");
  }

  #[test]
  fn test_mul_commutative() {
    assert_equivalent("value * 3.0", "3.0 * value");
  }

  #[test]
  fn test_associativity_with_parens() {
    assert_equivalent("value + 3.0 + 7.0", "(value + 3.0) + 7.0");
    assert_equivalent("value + 3.0 + 7.0", "value + (3.0 + 7.0)");
    assert_equivalent("value - 3.0 - 7.0", "(value - 3.0) - 7.0");
    assert_equivalent("value * 3.0 * 7.0", "value * (3.0 * 7.0)");
    assert_equivalent("value / 10.0 / 2.0", "(value / 10.0) / 2.0");
  }

  #[test]
  fn test_identities() {
    assert_equivalent("value + 0.0", "value");
    assert_equivalent("value - 0.0", "value");
    assert_equivalent("value * 1.0", "value");
    assert_equivalent("value * 0.0", "0.0");
  }

  #[test]
  fn test_distributivity() {
    assert_equivalent("value * 3.0 + 7.0 * value", "value * 10.0");
  }

  #[test]
  fn test_precedence() {
    assert_equivalent("value / 10.0 * 3.0", "(value / 10.0) * 3.0");
    assert_equivalent("value + 10.0 * 3.0", "value + (10.0 * 3.0)");
  }

  #[test]
  fn test_constant_folding_at_parse_time() {
    assert_eq!(parse_conversion("1.0 + 2.0 * 3.0").unwrap(), Conversion::Constant(7.0));
    assert_eq!(
      parse_conversion("value + 2.0 * 3.0").unwrap(),
      Conversion::Add(Box::new(Conversion::Value), Box::new(Conversion::Constant(6.0))),
    );
  }

  #[test]
  fn test_division_by_zero() {
    let err = parse_conversion("value / 0.0").unwrap_err();
    assert_eq!(
      err,
      ConversionParseError::Parse(ShuntingYardError::CustomError(
        ConversionOpError::DivisionByZero,
      )),
    );
    // Folding runs bottom-up, so a denominator that folds to zero is
    // caught too.
    assert!(parse_conversion("value / (3.0 - 3.0)").is_err());
  }

  #[test]
  fn test_unknown_identifier() {
    let err = parse_conversion("value + frob * 2.0").unwrap_err();
    assert_eq!(err, ConversionParseError::Tokenize(TokenizeError::new("frob * 2.0")));
  }

  #[test]
  fn test_unknown_character() {
    let err = parse_conversion("value & 2.0").unwrap_err();
    assert_eq!(err, ConversionParseError::Tokenize(TokenizeError::new("& 2.0")));
  }

  #[test]
  fn test_malformed_expressions() {
    assert!(parse_conversion("(value + 1.0").is_err());
    assert!(parse_conversion("value + 1.0)").is_err());
    assert!(parse_conversion("* value").is_err());
    assert!(parse_conversion("value *").is_err());
    assert!(parse_conversion("value 1.0").is_err());
    assert!(parse_conversion("").is_err());
  }

  #[test]
  fn test_whitespace_insignificant() {
    assert_equivalent("\n\t value   +\t3.0  ", "value+3.0");
  }

  #[test]
  fn test_fahrenheit_celsius_round_trip() {
    let to = parse_conversion("(value - 32) * 5 / 9").unwrap();
    let from = parse_conversion("value * 9 / 5 + 32").unwrap();
    for x in [1e-13, 1.0, 123.4] {
      assert_relative_eq!(to.compose(&from).eval(x), x, epsilon = 1e-10);
      assert_relative_eq!(from.compose(&to).eval(x), x, epsilon = 1e-10);
    }
  }
}
