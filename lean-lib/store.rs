//! Shared, atomically replaceable abbreviation table.
//!
//! Readers take a snapshot with [`AbbreviationStore::load`] once per event
//! and match against it; a reload builds a complete table first and
//! publishes it with a single pointer swap, so a reader never sees a table
//! whose prefix set is half rebuilt.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::table::AbbreviationTable;

#[derive(Debug)]
pub struct AbbreviationStore {
  table: ArcSwap<AbbreviationTable>,
}

impl AbbreviationStore {
  pub fn new(table: AbbreviationTable) -> Self {
    Self {
      table: ArcSwap::from_pointee(table),
    }
  }

  /// Snapshot of the current table.
  pub fn load(&self) -> Arc<AbbreviationTable> {
    self.table.load_full()
  }

  /// Replace the current table.
  pub fn publish(&self, table: AbbreviationTable) {
    tracing::debug!(entries = table.len(), "publishing abbreviation table");
    self.table.store(Arc::new(table));
  }
}

impl Default for AbbreviationStore {
  fn default() -> Self {
    Self::new(AbbreviationTable::builtin())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn snapshot_survives_publish() {
    let store = AbbreviationStore::new(AbbreviationTable::build([("a", "α")], []));
    let before = store.load();
    store.publish(AbbreviationTable::build([("b", "β")], []));

    assert_eq!(before.replacement_for("a"), Some("α"));
    assert_eq!(store.load().replacement_for("a"), None);
    assert_eq!(store.load().replacement_for("b"), Some("β"));
  }

  #[test]
  fn default_is_builtin() {
    let store = AbbreviationStore::default();
    assert_eq!(*store.load(), AbbreviationTable::builtin());
  }
}
