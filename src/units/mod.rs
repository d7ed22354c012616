
//! Units of measure, the dimensions they measure, and conversions
//! between them.
//!
//! A [`UnitSystem`](system::UnitSystem) collects
//! [`Dimension`](dimension::Dimension)s, each identified by a
//! [`DimensionId`](dimension_id::DimensionId), together with the
//! [`Unit`](unit::Unit)s that measure them. Each unit carries a pair
//! of [`Conversion`](conversion::Conversion) formulas into and out of
//! its dimension's base unit, and a
//! [`Converter`](converter::Converter) composes those formulas to
//! translate values between any two units of a shared dimension.

pub mod conversion;
pub mod converter;
pub mod dimension;
pub mod dimension_id;
pub mod parsing;
pub mod system;
pub mod unit;
