
use super::source::{SourceOffset, Span};

use regex::Regex;
use once_cell::sync::Lazy;

/// A cursor over a formula string, tracking how much of the input has
/// been consumed. Grammar-specific tokenizers drive this cursor with
/// anchored regexes and literal reads.
#[derive(Debug, Clone)]
pub struct TokenizerState<'a> {
  input: &'a str,
  position: SourceOffset,
}

/// The substring consumed by a single tokenizer step, together with
/// its location in the original input.
#[derive(Debug, Clone)]
pub struct TokenizerMatch<'a> {
  matched_str: &'a str,
  start: SourceOffset,
  end: SourceOffset,
}

impl<'a> TokenizerState<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      input,
      position: SourceOffset(0),
    }
  }

  pub fn is_eof(&self) -> bool {
    self.input.is_empty()
  }

  pub fn peek(&self) -> Option<char> {
    self.input.chars().next()
  }

  pub fn current_pos(&self) -> SourceOffset {
    self.position
  }

  /// The unconsumed suffix of the input. Tokenization errors report
  /// this verbatim.
  pub fn remaining(&self) -> &'a str {
    self.input
  }

  /// Advances the cursor by `amount` bytes, truncated to the end of
  /// the input, and returns the skipped substring.
  pub fn advance(&mut self, mut amount: usize) -> TokenizerMatch<'a> {
    amount = amount.min(self.input.len());

    let match_pos = self.position;
    let (prefix, suffix) = self.input.split_at(amount);
    self.position.0 += amount;
    self.input = suffix;
    TokenizerMatch {
      matched_str: prefix,
      start: match_pos,
      end: match_pos + amount,
    }
  }

  /// If the input begins with `literal`, consumes it and returns the
  /// match. Otherwise leaves the cursor untouched.
  pub fn read_literal(&mut self, literal: &str) -> Option<TokenizerMatch<'a>> {
    self.input.starts_with(literal).then(|| {
      self.advance(literal.len())
    })
  }

  /// If the current position matches the given regex, consumes the
  /// match and returns it.
  ///
  /// The regex MUST be anchored at the start of the input. This
  /// function panics if that precondition is not satisfied.
  pub fn read_regex(&mut self, regex: &Regex) -> Option<TokenizerMatch<'a>> {
    let m = regex.find(self.input)?;
    assert_eq!(m.start(), 0, "Regex must be anchored at the start of the input");

    Some(self.advance(m.len()))
  }

  pub fn consume_spaces(&mut self) {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*").unwrap());
    self.read_regex(&RE).expect("regex should not fail");
  }
}

impl<'a> TokenizerMatch<'a> {
  pub fn as_str(&self) -> &'a str {
    self.matched_str
  }

  pub fn start(&self) -> SourceOffset {
    self.start
  }

  pub fn end(&self) -> SourceOffset {
    self.end
  }

  pub fn span(&self) -> Span {
    Span::new(self.start, self.end)
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }
}
