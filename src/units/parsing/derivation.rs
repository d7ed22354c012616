
//! Parser for dimension derivation formulas such as
//! `"Meter / Second^2"`. Identifiers name base quantities; integer
//! literals appear as the dimensionless `1`, the void `0`, and
//! exponents of `^`.

use super::TokenizeError;
use crate::parsing::shunting_yard::{
  self, InfixOperator, Precedence, ShuntingYardDriver, ShuntingYardError, Token,
};
use crate::parsing::tokenizer::TokenizerState;
use crate::units::dimension_id::DimensionId;

use num::One;
use num::pow::Pow;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use std::fmt::{self, Display, Formatter};

/// An operand in a derivation formula: either a bare integer literal
/// or a dimension vector. The distinction matters to `^`, which
/// requires a dimension base and a literal exponent, and to the
/// literal `0`, which acts as an absorbing "void" element rather
/// than a dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
  Literal(i64),
  Dimension(DimensionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationOp {
  Mul,
  Div,
  Pow,
}

/// Semantic errors raised while combining derivation operands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationOpError {
  #[error("division by zero in derivation formula")]
  DivisionByZero,
  #[error("left-hand side of '^' was not a dimension")]
  PowBaseNotDimension,
  #[error("right-hand side of '^' was not an integer")]
  PowExponentNotInteger,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DerivationParseError {
  #[error(transparent)]
  Tokenize(#[from] TokenizeError),
  #[error(transparent)]
  Parse(#[from] ShuntingYardError<DerivationOpError>),
}

impl Term {
  /// Projects the term onto a dimension vector. `1` is the
  /// dimensionless identity; any other literal becomes a
  /// pseudo-dimension keyed by its decimal text, which keeps the
  /// void `0` distinct from every real dimension and from the
  /// identity.
  pub fn into_dimension_id(self) -> DimensionId {
    match self {
      Term::Dimension(id) => id,
      Term::Literal(1) => DimensionId::one(),
      Term::Literal(n) => DimensionId::singleton(n.to_string()),
    }
  }

  fn is_zero(&self) -> bool {
    *self == Term::Literal(0)
  }
}

impl InfixOperator for DerivationOp {
  fn symbol(&self) -> &'static str {
    match self {
      DerivationOp::Mul => "*",
      DerivationOp::Div => "/",
      DerivationOp::Pow => "^",
    }
  }

  fn precedence(&self) -> Precedence {
    match self {
      DerivationOp::Mul | DerivationOp::Div => Precedence(1),
      DerivationOp::Pow => Precedence(2),
    }
  }
}

impl Display for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Term::Literal(n) => write!(f, "{}", n),
      Term::Dimension(id) => write!(f, "{}", id),
    }
  }
}

/// Shunting yard driver combining derivation operands with the
/// dimension algebra.
#[derive(Debug, Clone, Default)]
struct DerivationBuilder;

impl ShuntingYardDriver<Term, DerivationOp> for DerivationBuilder {
  type Output = Term;
  type Error = DerivationOpError;

  fn compile_scalar(&mut self, scalar: Term) -> Result<Term, DerivationOpError> {
    Ok(scalar)
  }

  fn compile_infix_op(
    &mut self,
    left: Term,
    op: &DerivationOp,
    right: Term,
  ) -> Result<Term, DerivationOpError> {
    match op {
      DerivationOp::Mul => {
        // The void 0 absorbs; it propagates rather than failing so a
        // definition can deliberately mark a result as invalid.
        if left.is_zero() || right.is_zero() {
          Ok(Term::Literal(0))
        } else {
          Ok(Term::Dimension(left.into_dimension_id() * right.into_dimension_id()))
        }
      }
      DerivationOp::Div => {
        if right.is_zero() {
          Err(DerivationOpError::DivisionByZero)
        } else if left.is_zero() {
          Ok(Term::Literal(0))
        } else {
          Ok(Term::Dimension(left.into_dimension_id() / right.into_dimension_id()))
        }
      }
      DerivationOp::Pow => {
        let base = match left {
          Term::Dimension(id) => id,
          Term::Literal(_) => return Err(DerivationOpError::PowBaseNotDimension),
        };
        let exponent = match right {
          Term::Literal(n) => n,
          Term::Dimension(_) => return Err(DerivationOpError::PowExponentNotInteger),
        };
        Ok(Term::Dimension(base.pow(exponent)))
      }
    }
  }
}

fn tokenize(input: &str) -> Result<Vec<Token<Term, DerivationOp>>, TokenizeError> {
  static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+").unwrap());
  static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*").unwrap());

  let mut state = TokenizerState::new(input);
  let mut tokens = Vec::new();
  loop {
    state.consume_spaces();
    if state.is_eof() {
      break;
    }
    let remaining = state.remaining();
    if let Some(m) = state.read_regex(&INTEGER_RE) {
      // Overflowing i64 is rejected rather than clamped.
      let n = m.as_str().parse().map_err(|_| TokenizeError::new(remaining))?;
      tokens.push(Token::scalar(Term::Literal(n), m.span()));
    } else if let Some(m) = state.read_regex(&IDENTIFIER_RE) {
      tokens.push(Token::scalar(Term::Dimension(DimensionId::singleton(m.as_str())), m.span()));
    } else if let Some(m) = state.read_literal("(") {
      tokens.push(Token::left_paren(m.span()));
    } else if let Some(m) = state.read_literal(")") {
      tokens.push(Token::right_paren(m.span()));
    } else if let Some(m) = state.read_literal("*") {
      tokens.push(Token::infix_operator(DerivationOp::Mul, m.span()));
    } else if let Some(m) = state.read_literal("/") {
      tokens.push(Token::infix_operator(DerivationOp::Div, m.span()));
    } else if let Some(m) = state.read_literal("^") {
      tokens.push(Token::infix_operator(DerivationOp::Pow, m.span()));
    } else {
      return Err(TokenizeError::new(remaining));
    }
  }
  Ok(tokens)
}

/// Parses a derivation formula into the dimension vector it denotes.
pub fn parse_derivation(input: &str) -> Result<DimensionId, DerivationParseError> {
  let tokens = tokenize(input)?;
  let term = shunting_yard::parse(&mut DerivationBuilder, tokens)?;
  Ok(term.into_dimension_id())
}
