
//! Dimensional analysis and unit conversion.
//!
//! This crate models systems of measurement: dimensions identified by
//! sparse exponent vectors, units with conversion formulas into their
//! dimension's base unit, and a memoizing converter that composes
//! those formulas to translate values between any two compatible
//! units. Systems can be built programmatically or loaded from a JSON
//! definition document.
//!
//! The formula and derivation grammars are both small
//! operator-precedence languages, parsed with a shared shunting-yard
//! engine in [`parsing`].

pub mod definition;
pub mod errorlist;
pub mod parsing;
pub mod units;
