
use super::conversion::Conversion;

/// A named unit belonging to exactly one dimension, carrying the
/// conversions to and from that dimension's base unit.
///
/// The two conversions must be mutual inverses on representable
/// inputs. This is required for correctness but not mechanically
/// checked. Both default to the identity, which is also the only
/// correct value for a dimension's base unit itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
  name: String,
  dimension: String,
  to_base: Conversion,
  from_base: Conversion,
}

impl Unit {
  pub fn new(name: impl Into<String>, dimension: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      dimension: dimension.into(),
      to_base: Conversion::Value,
      from_base: Conversion::Value,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// The name of the dimension this unit belongs to.
  pub fn dimension_name(&self) -> &str {
    &self.dimension
  }

  /// The conversion from this unit into the dimension's base unit.
  pub fn to_base(&self) -> &Conversion {
    &self.to_base
  }

  /// The conversion from the dimension's base unit into this unit.
  pub fn from_base(&self) -> &Conversion {
    &self.from_base
  }

  pub fn set_to_base(&mut self, conversion: Conversion) {
    self.to_base = conversion;
  }

  pub fn set_from_base(&mut self, conversion: Conversion) {
    self.from_base = conversion;
  }
}
