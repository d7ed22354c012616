
use super::conversion::Conversion;
use super::system::{normalize_name, UnitSystem};
use super::unit::Unit;

use thiserror::Error;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Computes and memoizes conversions between units of a
/// [`UnitSystem`].
///
/// The cache is keyed by the *directed* pair of normalized unit
/// names: converting A to B and converting B to A are independent
/// computations, each cached on its own first request. Computing an
/// entry is a pure function of its key, so the interior mutability
/// here is observable only through the [`computations`][Self::computations]
/// counter; a multithreaded caller must supply its own
/// synchronization around the converter as a whole.
#[derive(Debug)]
pub struct Converter<'a> {
  system: &'a UnitSystem,
  cache: RefCell<HashMap<(String, String), Conversion>>,
  computations: Cell<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
  #[error("unknown unit '{0}'")]
  UnknownUnit(String),
  #[error("cannot convert from '{from}' to '{to}': dimensions differ")]
  Incompatible { from: String, to: String },
}

impl<'a> Converter<'a> {
  /// Creates a converter over the given system, which must not
  /// change for the converter's lifetime.
  pub fn new(system: &'a UnitSystem) -> Self {
    Self {
      system,
      cache: RefCell::new(HashMap::new()),
      computations: Cell::new(0),
    }
  }

  /// Whether a conversion from `from` to `to` exists, i.e. the two
  /// units share a dimension. Computes and caches the conversion as
  /// a side effect when it does.
  pub fn can_convert(&self, from: &str, to: &str) -> bool {
    self.conversion_for(from, to).is_ok()
  }

  /// Converts `value` from one unit to the other.
  pub fn convert(&self, from: &str, to: &str, value: f64) -> Result<f64, ConvertError> {
    Ok(self.conversion_for(from, to)?.eval(value))
  }

  /// The composed conversion between the two units, without
  /// evaluating it. The returned tree is independent of the cached
  /// one.
  pub fn get_conversion(&self, from: &str, to: &str) -> Result<Conversion, ConvertError> {
    self.conversion_for(from, to)
  }

  /// The number of conversions computed so far, i.e. cache misses
  /// that went through composition. Cache hits do not increment
  /// this.
  pub fn computations(&self) -> usize {
    self.computations.get()
  }

  fn lookup_unit(&self, name: &str) -> Result<&Unit, ConvertError> {
    self.system.get_unit(name)
      .ok_or_else(|| ConvertError::UnknownUnit(name.to_owned()))
  }

  fn conversion_for(&self, from: &str, to: &str) -> Result<Conversion, ConvertError> {
    let key = (normalize_name(from), normalize_name(to));
    if let Some(conversion) = self.cache.borrow().get(&key) {
      return Ok(conversion.clone());
    }

    let from_unit = self.lookup_unit(from)?;
    let to_unit = self.lookup_unit(to)?;
    let from_dim = self.system.get_dimension(from_unit.dimension_name())
      .ok_or_else(|| ConvertError::UnknownUnit(from.to_owned()))?;
    let to_dim = self.system.get_dimension(to_unit.dimension_name())
      .ok_or_else(|| ConvertError::UnknownUnit(to.to_owned()))?;
    if from_dim.id() != to_dim.id() {
      return Err(ConvertError::Incompatible { from: from.to_owned(), to: to.to_owned() });
    }

    // Into the shared base unit, then out to the destination.
    let conversion = to_unit.from_base().compose(from_unit.to_base());
    self.computations.set(self.computations.get() + 1);
    self.cache.borrow_mut().insert(key, conversion.clone());
    Ok(conversion)
  }
}
