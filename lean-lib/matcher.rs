//! Queries over an [`AbbreviationTable`].
//!
//! These are pure lookups: the typing session calls them on every
//! keystroke, so each one is bounded by the length of the queried string
//! (plus a logarithmic set lookup).

use std::ops::Bound;

use crate::table::AbbreviationTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
  /// The string is an abbreviation.
  NonStrict,
  /// The string is an abbreviation and no longer abbreviation extends it.
  Strict,
}

impl AbbreviationTable {
  /// Whether `text` is a prefix of some abbreviation. The empty string is a
  /// prefix of everything.
  pub fn is_prefix(&self, text: &str) -> bool {
    text.is_empty() || self.prefixes().contains(text)
  }

  pub fn is_complete(&self, text: &str, completeness: Completeness) -> bool {
    if !self.entries().contains_key(text) {
      return false;
    }
    match completeness {
      Completeness::NonStrict => true,
      Completeness::Strict => !self.is_extendable(text),
    }
  }

  /// Whether some abbreviation has `text` as a proper prefix.
  pub fn is_extendable(&self, text: &str) -> bool {
    // Strings starting with `text` sort directly after it.
    self
      .prefixes()
      .range::<str, _>((Bound::Excluded(text), Bound::Unbounded))
      .next()
      .is_some_and(|next| next.starts_with(text))
  }

  /// The shortest prefix of `text` that is an abbreviation.
  pub fn shortest_match<'a>(&self, text: &'a str) -> Option<&'a str> {
    text
      .char_indices()
      .map(|(idx, ch)| &text[..idx + ch.len_utf8()])
      .take_while(|prefix| self.is_prefix(prefix))
      .find(|prefix| self.entries().contains_key(*prefix))
  }

  pub fn replacement_for(&self, abbreviation: &str) -> Option<&str> {
    self.entries().get(abbreviation).map(|text| text.as_str())
  }
}

#[cfg(test)]
mod test {
  use quickcheck::TestResult;

  use super::*;

  fn arrows() -> AbbreviationTable {
    AbbreviationTable::build(
      [("to", "→"), ("top", "⊤"), ("t", "τ"), ("forall", "∀")],
      [],
    )
  }

  #[test]
  fn prefix_queries() {
    let table = arrows();
    assert!(table.is_prefix(""));
    assert!(table.is_prefix("f"));
    assert!(table.is_prefix("foral"));
    assert!(table.is_prefix("forall"));
    assert!(!table.is_prefix("forall "));
    assert!(!table.is_prefix("x"));
  }

  #[test]
  fn strict_completeness_excludes_extendable_keys() {
    let table = arrows();
    assert!(table.is_complete("to", Completeness::NonStrict));
    assert!(!table.is_complete("to", Completeness::Strict));
    assert!(table.is_complete("top", Completeness::Strict));
    assert!(table.is_complete("forall", Completeness::Strict));
    assert!(!table.is_complete("fora", Completeness::NonStrict));
    assert!(!table.is_complete("", Completeness::NonStrict));
  }

  #[test]
  fn extendable_ignores_siblings() {
    // "tp" sorts after "top" but does not extend "to"
    let table = AbbreviationTable::build([("to", "→"), ("tp", "x")], []);
    assert!(!table.is_extendable("to"));
    assert!(table.is_extendable("t"));
  }

  #[test]
  fn shortest_match_scans_ascending() {
    let table = arrows();
    assert_eq!(table.shortest_match("topx"), Some("t"));
    assert_eq!(table.shortest_match("forallx"), Some("forall"));
    assert_eq!(table.shortest_match("for"), None);
    assert_eq!(table.shortest_match(""), None);
    assert_eq!(table.shortest_match("xto"), None);
  }

  #[test]
  fn replacement_lookup() {
    let table = arrows();
    assert_eq!(table.replacement_for("top"), Some("⊤"));
    assert_eq!(table.replacement_for("tops"), None);
  }

  quickcheck::quickcheck! {
      fn prefixes_of_keys_are_prefixes(keys: Vec<String>) -> bool {
          let table = AbbreviationTable::build(keys.iter().map(|k| (k.clone(), "x")), []);
          keys.iter().all(|key| {
              key
                .char_indices()
                .all(|(idx, ch)| table.is_prefix(&key[..idx + ch.len_utf8()]))
          })
      }

      fn non_prefixes_are_rejected(keys: Vec<String>, probe: String) -> TestResult {
          if probe.is_empty() || keys.iter().any(|key| key.starts_with(probe.as_str())) {
              return TestResult::discard();
          }
          let table = AbbreviationTable::build(keys.iter().map(|k| (k.clone(), "x")), []);
          TestResult::from_bool(!table.is_prefix(&probe))
      }

      fn shortest_match_is_minimal(keys: Vec<String>, text: String) -> bool {
          let table = AbbreviationTable::build(keys.iter().map(|k| (k.clone(), "x")), []);
          match table.shortest_match(&text) {
              Some(found) => {
                  text.starts_with(found)
                    && keys
                      .iter()
                      .filter(|key| !key.is_empty() && text.starts_with(key.as_str()))
                      .all(|key| key.len() >= found.len())
              },
              None => !keys
                .iter()
                .any(|key| !key.is_empty() && text.starts_with(key.as_str())),
          }
      }
  }
}
