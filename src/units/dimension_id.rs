
use itertools::Itertools;
use num::One;
use num::pow::Pow;

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{self, Display, Formatter};
use std::ops::{Mul, Div};

/// A dimension identifier is a sparse vector of integer exponents
/// over base-quantity names. For instance, acceleration is
/// `Meter¹ Second⁻²`.
///
/// Entries with exponent zero are semantically absent: they may be
/// physically present in the map, but a `DimensionId` storing an
/// explicit zero compares equal to one lacking that key entirely.
/// The empty vector is the dimensionless identity.
#[derive(Debug, Clone, Default, Eq)]
pub struct DimensionId {
  exponents: BTreeMap<String, i64>,
}

impl DimensionId {
  /// A dimension consisting of a single base quantity at exponent 1.
  pub fn singleton(name: impl Into<String>) -> Self {
    let mut exponents = BTreeMap::new();
    exponents.insert(name.into(), 1);
    Self { exponents }
  }

  /// The exponent for the given base quantity, with absent keys
  /// reading as zero.
  pub fn get(&self, name: &str) -> i64 {
    self.exponents.get(name).copied().unwrap_or(0)
  }

  pub fn insert(&mut self, name: impl Into<String>, exponent: i64) {
    self.exponents.insert(name.into(), exponent);
  }

  /// The non-zero entries of the vector, in lexicographic key order.
  pub fn components(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
    self.exponents.iter()
      .filter(|(_, exp)| **exp != 0)
      .map(|(name, exp)| (name.as_str(), *exp))
  }
}

impl PartialEq for DimensionId {
  fn eq(&self, other: &Self) -> bool {
    let mut all_keys = self.exponents.keys().chain(other.exponents.keys());
    all_keys.all(|key| self.get(key) == other.get(key))
  }
}

impl Mul for DimensionId {
  type Output = Self;

  fn mul(mut self, rhs: Self) -> Self {
    for (name, exp) in rhs.exponents {
      *self.exponents.entry(name).or_insert(0) += exp;
    }
    self
  }
}

impl Div for DimensionId {
  type Output = Self;

  fn div(mut self, rhs: Self) -> Self {
    for (name, exp) in rhs.exponents {
      *self.exponents.entry(name).or_insert(0) -= exp;
    }
    self
  }
}

impl Pow<i64> for &DimensionId {
  type Output = DimensionId;

  fn pow(self, power: i64) -> DimensionId {
    DimensionId {
      exponents: self.exponents.iter()
        .map(|(name, exp)| (name.clone(), exp * power))
        .collect(),
    }
  }
}

impl Pow<i64> for DimensionId {
  type Output = DimensionId;

  fn pow(mut self, power: i64) -> DimensionId {
    for exp in self.exponents.values_mut() {
      *exp *= power;
    }
    self
  }
}

impl One for DimensionId {
  fn one() -> Self {
    Self::default()
  }

  fn is_one(&self) -> bool {
    self.exponents.values().all(|exp| *exp == 0)
  }
}

impl FromIterator<(String, i64)> for DimensionId {
  fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
    Self { exponents: iter.into_iter().collect() }
  }
}

impl IntoIterator for DimensionId {
  type Item = (String, i64);
  type IntoIter = btree_map::IntoIter<String, i64>;

  fn into_iter(self) -> Self::IntoIter {
    self.exponents.into_iter()
  }
}

impl Display for DimensionId {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let numerator = self.components()
      .filter(|(_, exp)| *exp > 0)
      .map(|(name, exp)| if exp == 1 { name.to_owned() } else { format!("{}^{}", name, exp) })
      .join(" ");
    let denominator = self.components()
      .filter(|(_, exp)| *exp < 0)
      .map(|(name, exp)| if exp == -1 { name.to_owned() } else { format!("{}^{}", name, -exp) })
      .join(" ");
    if numerator.is_empty() {
      write!(f, "1")?;
    } else {
      write!(f, "{}", numerator)?;
    }
    if !denominator.is_empty() {
      write!(f, " / {}", denominator)?;
    }
    Ok(())
  }
}
