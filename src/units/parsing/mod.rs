
//! The two concrete formula grammars, built on the generic engine in
//! [`crate::parsing::shunting_yard`]: numeric conversion formulas
//! (`"value * 9 / 5 + 32"`) and dimension derivation formulas
//! (`"Meter / Second^2"`).

pub mod conversion;
pub mod derivation;

use thiserror::Error;

pub use conversion::{parse_conversion, ConversionParseError};
pub use derivation::{parse_derivation, DerivationParseError};

/// An unrecognized character sequence in a formula. Reports the
/// unconsumed remainder of the input, starting at the offending
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not tokenize formula at '{remaining}'")]
pub struct TokenizeError {
  pub remaining: String,
}

impl TokenizeError {
  pub fn new(remaining: impl Into<String>) -> Self {
    Self { remaining: remaining.into() }
  }
}
