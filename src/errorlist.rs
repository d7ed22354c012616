
/// Accumulator for recoverable errors. Work that can keep going
/// after a failure pushes each error here and the caller inspects
/// the collected list at the end.
#[derive(Debug, Clone)]
pub struct ErrorList<E> {
  errors: Vec<E>,
}

impl<E> ErrorList<E> {
  /// A new, empty error list.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, error: E) {
    self.errors.push(error)
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn len(&self) -> usize {
    self.errors.len()
  }

  /// Pushes all errors from `other` onto the end of `self`, leaving
  /// `other` empty.
  pub fn append(&mut self, other: &mut Self) {
    self.errors.append(&mut other.errors)
  }

  /// Equivalent to `From::from` but specialized to `Vec` to improve
  /// type inference.
  pub fn into_vec(self) -> Vec<E> {
    self.errors
  }
}

impl<E> IntoIterator for ErrorList<E> {
  type Item = E;
  type IntoIter = ::std::vec::IntoIter<E>;

  fn into_iter(self) -> Self::IntoIter {
    self.errors.into_iter()
  }
}

impl<E> Default for ErrorList<E> {
  fn default() -> Self {
    Self { errors: Vec::new() }
  }
}

impl<E> From<ErrorList<E>> for Vec<E> {
  fn from(error_list: ErrorList<E>) -> Self {
    error_list.into_vec()
  }
}

impl<E> FromIterator<E> for ErrorList<E> {
  fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
    Self { errors: iter.into_iter().collect() }
  }
}
