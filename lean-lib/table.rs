//! The abbreviation table.
//!
//! A table maps abbreviations (`alpha`) to replacements (`α`) and keeps the
//! set of every non-empty prefix of every abbreviation, so that each
//! keystroke can be checked against it in time proportional to the typed
//! length. Tables are immutable once built; reloading configuration builds a
//! new table (see [`crate::store`]).

use std::{
  collections::{
    BTreeSet,
    HashMap,
  },
  fmt::Write,
};

use crate::{
  Tendril,
  defaults::DEFAULT_ABBREVIATIONS,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbreviationTable {
  entries:  HashMap<String, Tendril>,
  /// `{k[..i] | k in entries, 1 <= i <= len(k)}`, kept sorted so that the
  /// strings extending a prefix form a contiguous range.
  prefixes: BTreeSet<String>,
}

impl AbbreviationTable {
  /// Merge `overrides` over `defaults` and derive the prefix set.
  ///
  /// On a key collision the override wins. Empty abbreviations are dropped.
  pub fn build<D, O, K, V>(defaults: D, overrides: O) -> Self
  where
    D: IntoIterator<Item = (K, V)>,
    O: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Tendril>,
  {
    let mut entries = HashMap::new();
    for (abbreviation, replacement) in defaults.into_iter().chain(overrides) {
      let abbreviation = abbreviation.into();
      if abbreviation.is_empty() {
        tracing::warn!("ignoring empty abbreviation");
        continue;
      }
      entries.insert(abbreviation, replacement.into());
    }

    let prefixes = derive_prefixes(entries.keys());
    Self { entries, prefixes }
  }

  /// The built-in abbreviations with no overrides.
  pub fn builtin() -> Self {
    Self::build(
      DEFAULT_ABBREVIATIONS.iter().copied(),
      std::iter::empty::<(&str, &str)>(),
    )
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub(crate) fn entries(&self) -> &HashMap<String, Tendril> {
    &self.entries
  }

  pub(crate) fn prefixes(&self) -> &BTreeSet<String> {
    &self.prefixes
  }

  /// Entries sorted by abbreviation.
  pub fn sorted(&self) -> Vec<(&str, &str)> {
    let mut entries: Vec<_> = self
      .entries
      .iter()
      .map(|(abbreviation, replacement)| (abbreviation.as_str(), replacement.as_str()))
      .collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
  }

  /// Human readable listing of every abbreviation, as typed with `leader`.
  pub fn listing(&self, leader: &str) -> String {
    let mut out = String::from("Lean Unicode Abbreviations\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    for (abbreviation, replacement) in self.sorted() {
      let _ = writeln!(out, "{leader}{abbreviation:<20} → {replacement}");
    }
    out
  }
}

fn derive_prefixes<'a>(keys: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
  let mut prefixes = BTreeSet::new();
  for key in keys {
    for (idx, ch) in key.char_indices() {
      prefixes.insert(key[..idx + ch.len_utf8()].to_string());
    }
  }
  prefixes
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn overrides_win_on_collision() {
    let table = AbbreviationTable::build([("to", "→"), ("ne", "≠")], [("to", "↦")]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.entries()["to"].as_str(), "↦");
    assert_eq!(table.entries()["ne"].as_str(), "≠");
  }

  #[test]
  fn prefix_set_is_every_nonempty_prefix() {
    let table = AbbreviationTable::build([("top", "⊤"), ("to", "→"), ("αβ", "x")], []);
    let prefixes: Vec<&str> = table.prefixes().iter().map(String::as_str).collect();
    assert_eq!(prefixes, vec!["t", "to", "top", "α", "αβ"]);
  }

  #[test]
  fn empty_inputs_give_empty_table() {
    let table =
      AbbreviationTable::build(std::iter::empty::<(&str, &str)>(), std::iter::empty());
    assert!(table.is_empty());
    assert!(table.prefixes().is_empty());
  }

  #[test]
  fn empty_abbreviation_is_dropped() {
    let table = AbbreviationTable::build([("", "x"), ("a", "α")], []);
    assert_eq!(table.len(), 1);
    assert!(!table.prefixes().contains(""));
  }

  #[test]
  fn builtin_contains_common_symbols() {
    let table = AbbreviationTable::builtin();
    assert_eq!(table.entries()["alpha"].as_str(), "α");
    assert_eq!(table.entries()["forall"].as_str(), "∀");
    assert_eq!(table.entries()["<>"].as_str(), "⟨$CURSOR⟩");
    assert!(AbbreviationTable::default().is_empty());
  }

  #[test]
  fn listing_is_sorted_and_uses_leader() {
    let table = AbbreviationTable::build([("to", "→"), ("alpha", "α")], []);
    let listing = table.listing("\\");
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines[0], "Lean Unicode Abbreviations");
    assert_eq!(lines[1], "=".repeat(50));
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], format!("\\{:<20} → α", "alpha"));
    assert_eq!(lines[4], format!("\\{:<20} → →", "to"));
  }
}
