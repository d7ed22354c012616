
//! Grammar-agnostic machinery for parsing small arithmetic formulas.
//!
//! The [`shunting_yard`] module provides the operator-precedence
//! engine itself, and [`tokenizer`] the regex-driven cursor that the
//! concrete grammars in [`crate::units::parsing`] build their token
//! streams with.

pub mod shunting_yard;
pub mod source;
pub mod tokenizer;
