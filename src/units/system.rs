
use super::dimension::Dimension;
use super::dimension_id::DimensionId;
use super::unit::Unit;

use itertools::Itertools;
use thiserror::Error;

use std::collections::HashMap;

/// The owner of all dimensions and units, indexed by normalized
/// name. A unit system is built once, by the definition loader or by
/// hand, and treated as immutable afterward.
#[derive(Debug, Clone, Default)]
pub struct UnitSystem {
  dimensions: HashMap<String, Dimension>,
  units: HashMap<String, Unit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
  #[error("dimension '{0}' is already defined")]
  DuplicateDimension(String),
  #[error("unit '{0}' is already defined")]
  DuplicateUnit(String),
  #[error("unit '{unit}' refers to unknown dimension '{dimension}'")]
  UnknownDimension { unit: String, dimension: String },
}

/// Normalizes a dimension or unit name for indexing: lookups are
/// case-insensitive, and runs of whitespace are insignificant.
pub fn normalize_name(name: &str) -> String {
  name.split_whitespace().join(" ").to_lowercase()
}

impl UnitSystem {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_dimension(&mut self, dimension: Dimension) -> Result<(), SystemError> {
    let key = normalize_name(dimension.name());
    if self.dimensions.contains_key(&key) {
      return Err(SystemError::DuplicateDimension(dimension.name().to_owned()));
    }
    self.dimensions.insert(key, dimension);
    Ok(())
  }

  /// Registers a unit, recording it on its owning dimension. The
  /// dimension must already exist.
  pub fn add_unit(&mut self, unit: Unit) -> Result<(), SystemError> {
    let key = normalize_name(unit.name());
    if self.units.contains_key(&key) {
      return Err(SystemError::DuplicateUnit(unit.name().to_owned()));
    }
    let dimension = self.dimensions.get_mut(&normalize_name(unit.dimension_name()))
      .ok_or_else(|| SystemError::UnknownDimension {
        unit: unit.name().to_owned(),
        dimension: unit.dimension_name().to_owned(),
      })?;
    dimension.add_unit(unit.name());
    self.units.insert(key, unit);
    Ok(())
  }

  pub fn get_dimension(&self, name: &str) -> Option<&Dimension> {
    self.dimensions.get(&normalize_name(name))
  }

  pub fn get_dimension_mut(&mut self, name: &str) -> Option<&mut Dimension> {
    self.dimensions.get_mut(&normalize_name(name))
  }

  pub fn get_unit(&self, name: &str) -> Option<&Unit> {
    self.units.get(&normalize_name(name))
  }

  pub fn get_unit_mut(&mut self, name: &str) -> Option<&mut Unit> {
    self.units.get_mut(&normalize_name(name))
  }

  /// Finds the dimension identified by the given exponent vector, if
  /// any.
  pub fn dimension_for_id(&self, id: &DimensionId) -> Option<&Dimension> {
    self.dimensions.values().find(|dim| dim.id() == id)
  }

  pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
    self.dimensions.values()
  }

  pub fn units(&self) -> impl Iterator<Item = &Unit> {
    self.units.values()
  }
}
