
use super::dimension_id::DimensionId;

/// A physical dimension in a unit system: a name, the exponent
/// vector identifying it, a designated base unit, and the units
/// measuring it.
///
/// Units and the base unit are recorded by name; the owning
/// [`UnitSystem`](super::system::UnitSystem) holds the units
/// themselves. The base unit is set at most once, and its to-base
/// and from-base conversions must both be the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
  name: String,
  id: DimensionId,
  base_unit: Option<String>,
  units: Vec<String>,
}

impl Dimension {
  pub fn new(name: impl Into<String>, id: DimensionId) -> Self {
    Self {
      name: name.into(),
      id,
      base_unit: None,
      units: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn id(&self) -> &DimensionId {
    &self.id
  }

  /// True if this dimension is a compound of base quantities rather
  /// than a single base quantity at exponent 1.
  pub fn is_derived(&self) -> bool {
    let mut components = self.id.components();
    !matches!((components.next(), components.next()), (Some((_, 1)), None))
  }

  pub fn base_unit(&self) -> Option<&str> {
    self.base_unit.as_deref()
  }

  pub fn set_base_unit(&mut self, name: impl Into<String>) {
    self.base_unit = Some(name.into());
  }

  /// The names of the units measuring this dimension, in the order
  /// they were added.
  pub fn units(&self) -> impl Iterator<Item = &str> {
    self.units.iter().map(String::as_str)
  }

  pub fn add_unit(&mut self, name: impl Into<String>) {
    self.units.push(name.into());
  }
}
