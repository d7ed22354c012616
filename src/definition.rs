
//! Loader for JSON unit-definition documents.
//!
//! A document declares base dimensions, derived dimensions, and the
//! units that convert into them:
//!
//! ```json
//! {
//!   "base_dimensions":    [ { "name": "Length", "unit": "Meter" } ],
//!   "derived_dimensions": [ { "name": "Velocity", "unit": "MeterPerSecond",
//!                             "derivation": "Meter / Second" } ],
//!   "converted_units":    [ { "name": "Foot", "dimension": "Length",
//!                             "conversion": 0.3048 } ]
//! }
//! ```
//!
//! A `conversion` is either a bare scale factor `k` (to-base multiplies
//! by `k`, from-base divides) or a two-element array of formulas
//! `[to_base, from_base]`, each in the grammar of
//! [`parse_conversion`]. Loading keeps going past recoverable errors
//! so that one pass over a document reports everything wrong with it.

use crate::errorlist::ErrorList;
use crate::units::conversion::Conversion;
use crate::units::dimension::Dimension;
use crate::units::dimension_id::DimensionId;
use crate::units::parsing::{parse_conversion, parse_derivation, ConversionParseError, DerivationParseError};
use crate::units::system::{SystemError, UnitSystem};
use crate::units::unit::Unit;

use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;

use std::fmt::{self, Display};

#[derive(Debug, Clone, Default, Deserialize)]
struct DefinitionDoc {
  #[serde(default)]
  base_dimensions: Vec<BaseDimensionDef>,
  #[serde(default)]
  derived_dimensions: Vec<DerivedDimensionDef>,
  #[serde(default)]
  converted_units: Vec<ConvertedUnitDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct BaseDimensionDef {
  name: String,
  unit: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DerivedDimensionDef {
  name: String,
  unit: String,
  derivation: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ConvertedUnitDef {
  name: String,
  dimension: String,
  conversion: ConversionDef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ConversionDef {
  Scale(f64),
  Formulas(String, String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
  #[error("malformed definition document: {0}")]
  Structure(String),
  #[error("dimension '{0}' is defined more than once")]
  RedefinedDimension(String),
  #[error("dimension '{name}' derives to the same id as '{existing}'")]
  ConflictingDimensionId { name: String, existing: String },
  #[error("unit '{0}' is defined more than once")]
  RedefinedUnit(String),
  #[error("unit '{unit}' refers to unknown dimension '{dimension}'")]
  UnknownDimension { unit: String, dimension: String },
  #[error("unit '{0}' has a scale factor of zero")]
  ZeroScaleFactor(String),
  #[error("bad derivation for dimension '{name}': {error}")]
  BadDerivation { name: String, error: DerivationParseError },
  #[error("bad conversion for unit '{name}': {error}")]
  BadConversion { name: String, error: ConversionParseError },
}

/// The full collection of problems found in one loading pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionErrors(pub Vec<DefinitionError>);

impl Display for DefinitionErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.iter().join("; "))
  }
}

impl std::error::Error for DefinitionErrors {}

impl From<SystemError> for DefinitionError {
  fn from(err: SystemError) -> Self {
    match err {
      SystemError::DuplicateDimension(name) => DefinitionError::RedefinedDimension(name),
      SystemError::DuplicateUnit(name) => DefinitionError::RedefinedUnit(name),
      SystemError::UnknownDimension { unit, dimension } =>
        DefinitionError::UnknownDimension { unit, dimension },
    }
  }
}

/// Loads a [`UnitSystem`] from the text of a JSON definition document.
pub fn load_system(text: &str) -> Result<UnitSystem, DefinitionErrors> {
  let doc: DefinitionDoc = match serde_json::from_str(text) {
    Ok(doc) => doc,
    Err(err) => {
      return Err(DefinitionErrors(vec![DefinitionError::Structure(err.to_string())]));
    }
  };

  let mut system = UnitSystem::new();
  let mut errors = ErrorList::new();
  for def in &doc.base_dimensions {
    define_dimension(&mut system, &mut errors, &def.name, &def.unit,
                     DimensionId::singleton(&def.unit));
  }
  for def in &doc.derived_dimensions {
    match parse_derivation(&def.derivation) {
      Ok(id) => define_dimension(&mut system, &mut errors, &def.name, &def.unit, id),
      Err(error) => errors.push(DefinitionError::BadDerivation { name: def.name.clone(), error }),
    }
  }
  for def in &doc.converted_units {
    define_unit(&mut system, &mut errors, def);
  }

  if errors.is_empty() {
    Ok(system)
  } else {
    Err(DefinitionErrors(errors.into_vec()))
  }
}

fn define_dimension(
  system: &mut UnitSystem,
  errors: &mut ErrorList<DefinitionError>,
  name: &str,
  base_unit: &str,
  id: DimensionId,
) {
  if system.get_dimension(name).is_some() {
    errors.push(DefinitionError::RedefinedDimension(name.to_owned()));
    return;
  }
  if let Some(existing) = system.dimension_for_id(&id) {
    errors.push(DefinitionError::ConflictingDimensionId {
      name: name.to_owned(),
      existing: existing.name().to_owned(),
    });
    return;
  }
  let mut dimension = Dimension::new(name, id);
  dimension.set_base_unit(base_unit);
  if let Err(err) = system.add_dimension(dimension) {
    errors.push(err.into());
    return;
  }
  // The base unit converts to and from itself trivially.
  if let Err(err) = system.add_unit(Unit::new(base_unit, name)) {
    errors.push(err.into());
  }
}

fn define_unit(system: &mut UnitSystem, errors: &mut ErrorList<DefinitionError>, def: &ConvertedUnitDef) {
  let (to_base, from_base) = match conversion_pair(def) {
    Ok(pair) => pair,
    Err(err) => {
      errors.push(err);
      return;
    }
  };
  let mut unit = Unit::new(&def.name, &def.dimension);
  unit.set_to_base(to_base);
  unit.set_from_base(from_base);
  if let Err(err) = system.add_unit(unit) {
    errors.push(err.into());
  }
}

fn conversion_pair(def: &ConvertedUnitDef) -> Result<(Conversion, Conversion), DefinitionError> {
  match &def.conversion {
    ConversionDef::Scale(scale) => {
      if *scale == 0.0 {
        Err(DefinitionError::ZeroScaleFactor(def.name.clone()))
      } else {
        Ok((Conversion::scale_factor(*scale), Conversion::scale_factor(1.0 / scale)))
      }
    }
    ConversionDef::Formulas(to_base, from_base) => {
      let to_base = parse_formula(&def.name, to_base)?;
      let from_base = parse_formula(&def.name, from_base)?;
      Ok((to_base, from_base))
    }
  }
}

fn parse_formula(unit_name: &str, formula: &str) -> Result<Conversion, DefinitionError> {
  parse_conversion(formula)
    .map_err(|error| DefinitionError::BadConversion { name: unit_name.to_owned(), error })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::units::converter::Converter;
  use crate::units::parsing::TokenizeError;

  use approx::assert_relative_eq;

  const SI_DOCUMENT: &str = r#"{
    "base_dimensions": [
      { "name": "Length", "unit": "Meter" },
      { "name": "Time", "unit": "Second" },
      { "name": "Temperature", "unit": "Celsius" }
    ],
    "derived_dimensions": [
      { "name": "Velocity", "unit": "MeterPerSecond",
        "derivation": "Meter / Second" }
    ],
    "converted_units": [
      { "name": "Foot", "dimension": "Length", "conversion": 0.3048 },
      { "name": "Minute", "dimension": "Time", "conversion": 60 },
      { "name": "Fahrenheit", "dimension": "Temperature",
        "conversion": ["(value - 32) * 5 / 9", "value * 9 / 5 + 32"] },
      { "name": "FootPerMinute", "dimension": "Velocity",
        "conversion": 0.00508 }
    ]
  }"#;

  #[test]
  fn test_load_si_document() {
    let system = load_system(SI_DOCUMENT).unwrap();
    assert_eq!(system.dimensions().count(), 4);
    assert_eq!(system.units().count(), 8);

    let velocity = system.get_dimension("Velocity").unwrap();
    assert!(velocity.is_derived());
    assert_eq!(velocity.base_unit(), Some("MeterPerSecond"));
    assert_eq!(
      *velocity.id(),
      DimensionId::singleton("Meter") / DimensionId::singleton("Second"),
    );

    let meter = system.get_unit("Meter").unwrap();
    assert_eq!(meter.to_base(), &Conversion::Value);
    assert_eq!(meter.from_base(), &Conversion::Value);
  }

  #[test]
  fn test_loaded_system_converts() {
    let system = load_system(SI_DOCUMENT).unwrap();
    let converter = Converter::new(&system);
    assert_relative_eq!(converter.convert("Foot", "Meter", 1.0).unwrap(), 0.3048);
    assert_relative_eq!(converter.convert("Fahrenheit", "Celsius", 212.0).unwrap(), 100.0, epsilon = 1e-10);
    assert_relative_eq!(
      converter.convert("FootPerMinute", "MeterPerSecond", 1.0).unwrap(),
      0.00508,
      epsilon = 1e-10,
    );
    assert!(!converter.can_convert("Foot", "Second"));
  }

  #[test]
  fn test_empty_document() {
    let system = load_system("{}").unwrap();
    assert_eq!(system.dimensions().count(), 0);
    assert_eq!(system.units().count(), 0);
  }

  #[test]
  fn test_malformed_json_is_fatal() {
    let err = load_system("{ not json").unwrap_err();
    assert_eq!(err.0.len(), 1);
    assert!(matches!(err.0[0], DefinitionError::Structure(_)));
  }

  #[test]
  fn test_errors_are_aggregated() {
    let document = r#"{
      "base_dimensions": [
        { "name": "Length", "unit": "Meter" },
        { "name": "Length", "unit": "Cubit" },
        { "name": "Span", "unit": "Meter" }
      ],
      "converted_units": [
        { "name": "Foot", "dimension": "Distance", "conversion": 0.3048 },
        { "name": "Griffin", "dimension": "Length", "conversion": 0 }
      ]
    }"#;
    let err = load_system(document).unwrap_err();
    assert_eq!(err.0, vec![
      DefinitionError::RedefinedDimension("Length".to_owned()),
      DefinitionError::ConflictingDimensionId {
        name: "Span".to_owned(),
        existing: "Length".to_owned(),
      },
      DefinitionError::UnknownDimension {
        unit: "Foot".to_owned(),
        dimension: "Distance".to_owned(),
      },
      DefinitionError::ZeroScaleFactor("Griffin".to_owned()),
    ]);
  }

  #[test]
  fn test_redefined_unit() {
    let document = r#"{
      "base_dimensions": [ { "name": "Length", "unit": "Meter" } ],
      "converted_units": [
        { "name": "Meter", "dimension": "Length", "conversion": 2.0 }
      ]
    }"#;
    let err = load_system(document).unwrap_err();
    assert_eq!(err.0, vec![DefinitionError::RedefinedUnit("Meter".to_owned())]);
  }

  #[test]
  fn test_bad_derivation_is_reported_with_dimension_name() {
    let document = r#"{
      "base_dimensions": [ { "name": "Length", "unit": "Meter" } ],
      "derived_dimensions": [
        { "name": "Area", "unit": "SquareMeter", "derivation": "Meter ^" }
      ]
    }"#;
    let err = load_system(document).unwrap_err();
    assert_eq!(err.0.len(), 1);
    assert!(matches!(
      &err.0[0],
      DefinitionError::BadDerivation { name, .. } if name == "Area",
    ));
  }

  #[test]
  fn test_bad_conversion_is_reported_with_unit_name() {
    let document = r#"{
      "base_dimensions": [ { "name": "Temperature", "unit": "Celsius" } ],
      "converted_units": [
        { "name": "Fahrenheit", "dimension": "Temperature",
          "conversion": ["value @ 32", "value"] }
      ]
    }"#;
    let err = load_system(document).unwrap_err();
    assert_eq!(err.0, vec![
      DefinitionError::BadConversion {
        name: "Fahrenheit".to_owned(),
        error: ConversionParseError::Tokenize(TokenizeError::new("@ 32")),
      },
    ]);
  }

  #[test]
  fn test_error_display_joins_messages() {
    let errors = DefinitionErrors(vec![
      DefinitionError::RedefinedUnit("Foot".to_owned()),
      DefinitionError::ZeroScaleFactor("Griffin".to_owned()),
    ]);
    assert_eq!(
      errors.to_string(),
      "unit 'Foot' is defined more than once; unit 'Griffin' has a scale factor of zero",
    );
  }
}
