
use std::fmt::{self, Display, Formatter};

/// An expression tree representing a unary numeric function: the
/// conversion from one unit to another. The sole free variable is the
/// quantity being converted, written `value` in the surface syntax.
///
/// Every node exclusively owns its children. Composition and cloning
/// always produce fresh trees, so two live conversions never share
/// structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
  /// A constant, unaffected by the input value.
  Constant(f64),
  /// The identity function: a placeholder for the input value.
  Value,
  Add(Box<Conversion>, Box<Conversion>),
  Sub(Box<Conversion>, Box<Conversion>),
  Mul(Box<Conversion>, Box<Conversion>),
  Div(Box<Conversion>, Box<Conversion>),
}

impl Conversion {
  /// A conversion which multiplies its input by a constant factor.
  /// Used when a unit's definition is a bare numeric scale rather
  /// than a formula.
  pub fn scale_factor(factor: f64) -> Conversion {
    Conversion::Mul(Box::new(Conversion::Constant(factor)), Box::new(Conversion::Value))
  }

  pub fn eval(&self, value: f64) -> f64 {
    match self {
      Conversion::Constant(c) => *c,
      Conversion::Value => value,
      Conversion::Add(lhs, rhs) => lhs.eval(value) + rhs.eval(value),
      Conversion::Sub(lhs, rhs) => lhs.eval(value) - rhs.eval(value),
      Conversion::Mul(lhs, rhs) => lhs.eval(value) * rhs.eval(value),
      Conversion::Div(lhs, rhs) => lhs.eval(value) / rhs.eval(value),
    }
  }

  /// True if the tree's result does not depend on the input value. A
  /// constant node is constant, the value placeholder is not, and a
  /// binary node is constant exactly when both children are.
  pub fn is_constant(&self) -> bool {
    match self {
      Conversion::Constant(_) => true,
      Conversion::Value => false,
      Conversion::Add(lhs, rhs)
      | Conversion::Sub(lhs, rhs)
      | Conversion::Mul(lhs, rhs)
      | Conversion::Div(lhs, rhs) => lhs.is_constant() && rhs.is_constant(),
    }
  }

  /// Collapses this node into a [`Conversion::Constant`] if both of
  /// its operands are constant, evaluating with the node's real
  /// operator. A constant subtree's value is invariant to the input,
  /// so evaluating at an arbitrary point (we use 0.0) is valid.
  /// Non-binary nodes and nodes with a non-constant child are
  /// returned unchanged.
  pub fn folded(self) -> Conversion {
    match &self {
      Conversion::Add(lhs, rhs)
      | Conversion::Sub(lhs, rhs)
      | Conversion::Mul(lhs, rhs)
      | Conversion::Div(lhs, rhs) if lhs.is_constant() && rhs.is_constant() =>
        Conversion::Constant(self.eval(0.0)),
      _ => self,
    }
  }

  /// Structural composition: substitutes `other` for every
  /// [`Conversion::Value`] leaf of `self`, so that
  ///
  /// ```text
  /// f.compose(g).eval(x) == f.eval(g.eval(x))
  /// ```
  ///
  /// The result is a brand-new tree sharing no nodes with either
  /// input, re-folded so that constant-valued chains collapse as far
  /// as possible. Folding here does not re-check for division by
  /// zero; a denominator that only becomes zero during composition
  /// folds to a non-finite constant instead of failing.
  pub fn compose(&self, other: &Conversion) -> Conversion {
    match self {
      Conversion::Constant(c) => Conversion::Constant(*c),
      Conversion::Value => other.clone(),
      Conversion::Add(lhs, rhs) =>
        Conversion::Add(Box::new(lhs.compose(other)), Box::new(rhs.compose(other))).folded(),
      Conversion::Sub(lhs, rhs) =>
        Conversion::Sub(Box::new(lhs.compose(other)), Box::new(rhs.compose(other))).folded(),
      Conversion::Mul(lhs, rhs) =>
        Conversion::Mul(Box::new(lhs.compose(other)), Box::new(rhs.compose(other))).folded(),
      Conversion::Div(lhs, rhs) =>
        Conversion::Div(Box::new(lhs.compose(other)), Box::new(rhs.compose(other))).folded(),
    }
  }
}

/// Writes an operand, parenthesizing it if it is itself a binary
/// node.
fn write_operand(f: &mut Formatter, operand: &Conversion) -> fmt::Result {
  match operand {
    Conversion::Constant(_) | Conversion::Value => write!(f, "{}", operand),
    _ => write!(f, "({})", operand),
  }
}

fn write_binary(f: &mut Formatter, lhs: &Conversion, op: &str, rhs: &Conversion) -> fmt::Result {
  write_operand(f, lhs)?;
  write!(f, "{}", op)?;
  write_operand(f, rhs)
}

impl Display for Conversion {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Conversion::Constant(c) => write!(f, "{}", c),
      Conversion::Value => write!(f, "value"),
      Conversion::Add(lhs, rhs) => write_binary(f, lhs, "+", rhs),
      Conversion::Sub(lhs, rhs) => write_binary(f, lhs, "-", rhs),
      Conversion::Mul(lhs, rhs) => write_binary(f, lhs, "*", rhs),
      Conversion::Div(lhs, rhs) => write_binary(f, lhs, "/", rhs),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use approx::assert_relative_eq;

  fn constant(c: f64) -> Box<Conversion> {
    Box::new(Conversion::Constant(c))
  }

  fn value() -> Box<Conversion> {
    Box::new(Conversion::Value)
  }

  /// `(value - 32) * 5 / 9`, built by hand.
  fn fahrenheit_to_celsius() -> Conversion {
    Conversion::Div(
      Box::new(Conversion::Mul(
        Box::new(Conversion::Sub(value(), constant(32.0))),
        constant(5.0),
      )),
      constant(9.0),
    )
  }

  /// `value * 9 / 5 + 32`, built by hand.
  fn celsius_to_fahrenheit() -> Conversion {
    Conversion::Add(
      Box::new(Conversion::Div(
        Box::new(Conversion::Mul(value(), constant(9.0))),
        constant(5.0),
      )),
      constant(32.0),
    )
  }

  #[test]
  fn test_eval() {
    let conv = fahrenheit_to_celsius();
    assert_relative_eq!(conv.eval(32.0), 0.0);
    assert_relative_eq!(conv.eval(212.0), 100.0);
    assert_relative_eq!(conv.eval(-40.0), -40.0);
  }

  #[test]
  fn test_is_constant() {
    assert!(Conversion::Constant(3.0).is_constant());
    assert!(!Conversion::Value.is_constant());
    assert!(Conversion::Add(constant(1.0), constant(2.0)).is_constant());
    assert!(!Conversion::Add(constant(1.0), value()).is_constant());
    assert!(!fahrenheit_to_celsius().is_constant());
  }

  #[test]
  fn test_scale_factor() {
    let conv = Conversion::scale_factor(2.54);
    assert_eq!(conv, Conversion::Mul(constant(2.54), value()));
    assert_relative_eq!(conv.eval(100.0), 254.0);
  }

  #[test]
  fn test_folded() {
    let folded = Conversion::Mul(constant(6.0), constant(7.0)).folded();
    assert_eq!(folded, Conversion::Constant(42.0));

    let unfolded = Conversion::Mul(constant(6.0), value()).folded();
    assert_eq!(unfolded, Conversion::Mul(constant(6.0), value()));
  }

  #[test]
  fn test_compose_law() {
    let f = celsius_to_fahrenheit();
    let g = fahrenheit_to_celsius();
    for x in [1e-13, 1.0, 123.4] {
      assert_relative_eq!(f.compose(&g).eval(x), f.eval(g.eval(x)), epsilon = 1e-10);
    }
  }

  #[test]
  fn test_compose_inverse_law() {
    let to = fahrenheit_to_celsius();
    let from = celsius_to_fahrenheit();
    for x in [1e-13, 1.0, 123.4] {
      assert_relative_eq!(to.compose(&from).eval(x), x, epsilon = 1e-10);
      assert_relative_eq!(from.compose(&to).eval(x), x, epsilon = 1e-10);
    }
  }

  #[test]
  fn test_compose_of_constant_ignores_inner() {
    let f = Conversion::Constant(99.0);
    let g = fahrenheit_to_celsius();
    assert_eq!(f.compose(&g), Conversion::Constant(99.0));
  }

  #[test]
  fn test_compose_folds_constant_chains() {
    // (value * 2) composed with (value * 3) is (value * 3) * 2; the
    // scale factors stay separate nodes, but composing two constant
    // offsets folds entirely.
    let f = Conversion::Add(value(), constant(1.0));
    let g = Conversion::Constant(2.0);
    assert_eq!(f.compose(&g), Conversion::Constant(3.0));
  }

  #[test]
  fn test_compose_produces_independent_tree() {
    let f = Conversion::Add(value(), constant(1.0));
    let g = Conversion::Mul(constant(2.0), value());
    let composed = f.compose(&g);
    drop(f);
    drop(g);
    assert_relative_eq!(composed.eval(5.0), 11.0);
  }

  #[test]
  fn test_display_fully_parenthesized() {
    assert_eq!(fahrenheit_to_celsius().to_string(), "((value-32)*5)/9");
    assert_eq!(celsius_to_fahrenheit().to_string(), "((value*9)/5)+32");
    assert_eq!(Conversion::scale_factor(12.0).to_string(), "12*value");
    assert_eq!(Conversion::Value.to_string(), "value");
  }
}
