//! A minimal editable buffer: text, a single cursor and a few flags.
//!
//! Every edit goes through a [`Transaction`], so a buffer is never observed
//! half-way through a change.

use std::{
  num::NonZeroUsize,
  path::{
    Path,
    PathBuf,
  },
};

use ropey::Rope;
use thiserror::Error;

use crate::{
  Tendril,
  commit::{
    self,
    CommitError,
    Replacement,
  },
  transaction::{
    Assoc,
    Transaction,
    TransactionError,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(NonZeroUsize);

impl DocumentId {
  pub const fn new(id: NonZeroUsize) -> Self {
    Self(id)
  }

  pub const fn get(self) -> NonZeroUsize {
    self.0
  }
}

impl From<NonZeroUsize> for DocumentId {
  fn from(value: NonZeroUsize) -> Self {
    Self::new(value)
  }
}

#[derive(Debug, Error)]
pub enum DocumentError {
  #[error(transparent)]
  Transaction(#[from] TransactionError),
  #[error(transparent)]
  Commit(#[from] CommitError),
}

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Clone)]
pub struct Document {
  id:       DocumentId,
  text:     Rope,
  cursor:   usize,
  path:     Option<PathBuf>,
  modified: bool,
}

impl Document {
  pub fn new(id: DocumentId, text: Rope) -> Self {
    Self {
      id,
      text,
      cursor: 0,
      path: None,
      modified: false,
    }
  }

  pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.path = Some(path.into());
    self
  }

  pub fn id(&self) -> DocumentId {
    self.id
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// Move the cursor, clamped to the end of the text. Returns the new
  /// position.
  pub fn set_cursor(&mut self, pos: usize) -> usize {
    self.cursor = pos.min(self.text.len_chars());
    self.cursor
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Whether the text changed since the last [`Document::mark_saved`].
  pub fn is_modified(&self) -> bool {
    self.modified
  }

  pub fn mark_saved(&mut self) {
    self.modified = false;
  }

  /// Insert `text` at the cursor and move the cursor past it.
  pub fn insert(&mut self, text: &str) -> Result<()> {
    let transaction = Transaction::insert(&self.text, self.cursor, Tendril::from(text))?;
    self.apply(&transaction)
  }

  /// Delete up to `count` chars before the cursor. Returns the number
  /// actually deleted.
  pub fn delete_backward(&mut self, count: usize) -> Result<usize> {
    let from = self.cursor.saturating_sub(count);
    if from == self.cursor {
      return Ok(0);
    }
    let deleted = self.cursor - from;
    let transaction = Transaction::delete(&self.text, from, self.cursor)?;
    self.apply(&transaction)?;
    Ok(deleted)
  }

  /// Apply a replacement decided by a typing session.
  pub fn apply_replacement(&mut self, replacement: &Replacement) -> Result<usize> {
    self.cursor = commit::commit(&mut self.text, replacement, self.cursor)?;
    self.modified = true;
    Ok(self.cursor)
  }

  pub fn apply(&mut self, transaction: &Transaction) -> Result<()> {
    transaction.apply(&mut self.text)?;
    self.cursor = match transaction.cursor() {
      Some(cursor) => cursor,
      None => transaction.edit().map_pos(self.cursor, Assoc::After)?,
    };
    self.modified = true;
    Ok(())
  }
}
