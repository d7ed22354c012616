
use super::source::Span;

use std::error::{Error as StdError};
use std::fmt::{self, Display, Formatter};

/// A token, for the purposes of the shunting yard algorithm.
///
/// The engine is generic over the scalar type `T` and the operator
/// kind `O`, so each grammar supplies its own closed token set while
/// sharing the reduction algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<T, O> {
  data: TokenData<T, O>,
  span: Span,
}

/// The contents of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenData<T, O> {
  /// A value in the target language.
  Scalar(T),
  /// An infix, binary operator.
  InfixOperator(O),
  /// A grouping marker. Only ever lives on the operator stack, where
  /// it is removed by a matching `RightParen` and nothing else.
  LeftParen,
  /// The closing grouping marker.
  RightParen,
}

/// Internal type which tracks an output value together with the first
/// token that produced it. Used to produce better error messages.
#[derive(Debug, Clone)]
struct OutputWithToken<T, O, Out> {
  output: Out,
  token: Token<T, O>,
}

/// An entry on the operator stack.
#[derive(Debug, Clone)]
enum StackValue<O> {
  Operator(O),
  LeftParen { span: Span },
}

/// The binding strength of an infix operator. All operators consumed
/// by this engine are binary and left-associative, so precedence is
/// the only property a grammar specifies per operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Precedence(pub u8);

/// The operator kind supplied by a grammar.
pub trait InfixOperator {
  /// The operator's surface syntax, used in error messages.
  fn symbol(&self) -> &'static str;

  fn precedence(&self) -> Precedence;
}

/// A type implementing this trait is capable of driving the shunting
/// yard algorithm and compiling tokens to a given target language.
pub trait ShuntingYardDriver<T, O> {
  type Output;
  type Error: StdError;

  fn compile_scalar(&mut self, scalar: T) -> Result<Self::Output, Self::Error>;

  fn compile_infix_op(
    &mut self,
    left: Self::Output,
    op: &O,
    right: Self::Output,
  ) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShuntingYardError<E: StdError> {
  CustomError(E),
  /// The input ran out before producing any value at all.
  UnexpectedEof,
  /// An operator was applied with fewer than two values available.
  MissingOperand { operator: &'static str },
  /// A right parenthesis with no matching left parenthesis.
  UnexpectedRightParen { span: Span },
  /// A left parenthesis still open at the end of the input.
  UnmatchedLeftParen { span: Span },
  /// More than one value remained after full reduction, i.e. two
  /// operands with no operator between them.
  UnexpectedToken { token: String, span: Span },
}

impl<T, O> Token<T, O> {
  pub fn scalar(data: T, span: Span) -> Self {
    Self { data: TokenData::Scalar(data), span }
  }

  pub fn infix_operator(op: O, span: Span) -> Self {
    Self { data: TokenData::InfixOperator(op), span }
  }

  pub fn left_paren(span: Span) -> Self {
    Self { data: TokenData::LeftParen, span }
  }

  pub fn right_paren(span: Span) -> Self {
    Self { data: TokenData::RightParen, span }
  }

  pub fn span(&self) -> Span {
    self.span
  }
}

impl<T: Display, O: InfixOperator> Display for TokenData<T, O> {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
    match self {
      TokenData::Scalar(s) => s.fmt(f),
      TokenData::InfixOperator(op) => op.symbol().fmt(f),
      TokenData::LeftParen => "(".fmt(f),
      TokenData::RightParen => ")".fmt(f),
    }
  }
}

impl<T: Display, O: InfixOperator> Display for Token<T, O> {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
    write!(f, "{}", self.data)
  }
}

impl<E: StdError> Display for ShuntingYardError<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
    match self {
      ShuntingYardError::CustomError(e) =>
        write!(f, "{}", e),
      ShuntingYardError::UnexpectedEof =>
        write!(f, "unexpected end of input"),
      ShuntingYardError::MissingOperand { operator } =>
        write!(f, "missing operand to '{}' operator", operator),
      ShuntingYardError::UnexpectedRightParen { span } =>
        write!(f, "unexpected ')' at position {}", span),
      ShuntingYardError::UnmatchedLeftParen { span } =>
        write!(f, "unmatched '(' at position {}", span),
      ShuntingYardError::UnexpectedToken { token, span } =>
        write!(f, "unexpected token {} at position {}", token, span),
    }
  }
}

impl<E: StdError + 'static> StdError for ShuntingYardError<E> {
  fn source(&self) -> Option<&(dyn StdError + 'static)> {
    match self {
      ShuntingYardError::CustomError(e) => Some(e),
      _ => None,
    }
  }
}

impl<E: StdError> From<E> for ShuntingYardError<E> {
  fn from(e: E) -> Self {
    Self::CustomError(e)
  }
}

/// Runs the shunting yard algorithm over the token stream, compiling
/// as it goes through the given driver. On success, exactly one
/// reduced value exists and is returned.
pub fn parse<T, O, D, I>(
  driver: &mut D,
  input: I,
) -> Result<D::Output, ShuntingYardError<D::Error>>
where T: Clone + Display,
      O: InfixOperator,
      D: ShuntingYardDriver<T, O>,
      I: IntoIterator<Item = Token<T, O>> {
  let mut operator_stack: Vec<StackValue<O>> = Vec::new();
  let mut output_stack: Vec<OutputWithToken<T, O, D::Output>> = Vec::new();
  for token in input {
    match token.data {
      TokenData::Scalar(t) => {
        let output = driver.compile_scalar(t.clone())?;
        let token = Token { data: TokenData::Scalar(t), span: token.span };
        output_stack.push(OutputWithToken { output, token });
      }
      TokenData::InfixOperator(op) => {
        // Pop operators until we hit one with lower precedence or an
        // open parenthesis. Equal precedence pops, since all of our
        // operators associate to the left.
        while let Some(stack_value) = operator_stack.pop() {
          match stack_value {
            StackValue::Operator(stack_op) if stack_op.precedence() >= op.precedence() => {
              apply_operator(driver, &mut output_stack, &stack_op)?;
            }
            _ => {
              operator_stack.push(stack_value);
              break;
            }
          }
        }
        operator_stack.push(StackValue::Operator(op));
      }
      TokenData::LeftParen => {
        operator_stack.push(StackValue::LeftParen { span: token.span });
      }
      TokenData::RightParen => {
        loop {
          match operator_stack.pop() {
            Some(StackValue::Operator(op)) => {
              apply_operator(driver, &mut output_stack, &op)?;
            }
            Some(StackValue::LeftParen { .. }) => {
              break;
            }
            None => {
              return Err(ShuntingYardError::UnexpectedRightParen { span: token.span });
            }
          }
        }
      }
    }
  }

  // Pop and resolve remaining operators.
  while let Some(stack_value) = operator_stack.pop() {
    match stack_value {
      StackValue::Operator(op) => {
        apply_operator(driver, &mut output_stack, &op)?;
      }
      StackValue::LeftParen { span } => {
        return Err(ShuntingYardError::UnmatchedLeftParen { span });
      }
    }
  }

  let final_result = output_stack.pop().ok_or(ShuntingYardError::UnexpectedEof)?;
  if let Some(remaining_value) = output_stack.pop() {
    return Err(ShuntingYardError::UnexpectedToken {
      token: remaining_value.token.to_string(),
      span: remaining_value.token.span,
    });
  }
  Ok(final_result.output)
}

fn apply_operator<T, O, D>(
  driver: &mut D,
  output_stack: &mut Vec<OutputWithToken<T, O, D::Output>>,
  op: &O,
) -> Result<(), ShuntingYardError<D::Error>>
where O: InfixOperator,
      D: ShuntingYardDriver<T, O> {
  let missing_operand = || ShuntingYardError::MissingOperand { operator: op.symbol() };
  let rhs = output_stack.pop().ok_or_else(missing_operand)?;
  let lhs = output_stack.pop().ok_or_else(missing_operand)?;
  let output = driver.compile_infix_op(lhs.output, op, rhs.output)?;
  output_stack.push(OutputWithToken { output, token: lhs.token });
  Ok(())
}
