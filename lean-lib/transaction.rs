//! Single-range edits over a [`Rope`].
//!
//! Every change this crate makes to a buffer replaces one char range with
//! new text: typing inserts at the cursor, backspace deletes before it, and a
//! committed abbreviation swaps its span for the replacement. An [`Edit`]
//! describes one such change against a document of known length, and a
//! [`Transaction`] pairs it with the cursor the buffer should end up with.
//! Applying either is a single step, so a caller never observes the
//! document between the deletion and the insertion of a replacement.
//!
//! ```ignore
//! use lean_lib::transaction::Transaction;
//! use ropey::Rope;
//!
//! let mut doc = Rope::from("x \\alpha");
//! let tx = Transaction::replace(&doc, 2, 8, "α".into()).unwrap();
//! tx.apply(&mut doc).unwrap();
//! assert_eq!(doc.to_string(), "x α");
//! ```

use ropey::Rope;
use thiserror::Error;

use crate::Tendril;

pub type Result<T> = std::result::Result<T, TransactionError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransactionError {
  #[error("edit expects a document of {expected} chars, got {actual}")]
  LengthMismatch { expected: usize, actual: usize },
  #[error("invalid edit range: start {from} is after end {to}")]
  InvalidRange { from: usize, to: usize },
  #[error("edit range {from}..{to} is out of bounds for document length {len}")]
  RangeOutOfBounds {
    from: usize,
    to:   usize,
    len:  usize,
  },
  #[error("position {pos} is out of bounds for document length {len}")]
  PositionOutOfBounds { pos: usize, len: usize },
}

/// Which side of newly inserted text a mapped position lands on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Assoc {
  Before,
  After,
}

/// Replace `from..to` with `text` in a document of `len` chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
  from: usize,
  to:   usize,
  text: Tendril,
  len:  usize,
}

impl Edit {
  pub fn new(doc: &Rope, from: usize, to: usize, text: Tendril) -> Result<Self> {
    let len = doc.len_chars();
    if from > to {
      return Err(TransactionError::InvalidRange { from, to });
    }
    if to > len {
      return Err(TransactionError::RangeOutOfBounds { from, to, len });
    }
    Ok(Self {
      from,
      to,
      text,
      len,
    })
  }

  pub fn from(&self) -> usize {
    self.from
  }

  pub fn to(&self) -> usize {
    self.to
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  /// Length of the document this edit applies to.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn len_after(&self) -> usize {
    self.len - (self.to - self.from) + self.inserted()
  }

  pub fn is_empty(&self) -> bool {
    self.from == self.to && self.text.is_empty()
  }

  fn inserted(&self) -> usize {
    self.text.chars().count()
  }

  pub fn apply(&self, doc: &mut Rope) -> Result<()> {
    let actual = doc.len_chars();
    if actual != self.len {
      return Err(TransactionError::LengthMismatch {
        expected: self.len,
        actual,
      });
    }
    if self.from < self.to {
      doc.remove(self.from..self.to);
    }
    if !self.text.is_empty() {
      doc.insert(self.from, &self.text);
    }
    Ok(())
  }

  /// Where `pos` ends up once the edit is applied.
  ///
  /// The start of a replaced range stays at the start of the new text.
  /// Positions strictly inside the range, or at a pure insertion point, go
  /// before or after the new text according to `assoc`.
  pub fn map_pos(&self, pos: usize, assoc: Assoc) -> Result<usize> {
    if pos > self.len {
      return Err(TransactionError::PositionOutOfBounds { pos, len: self.len });
    }
    let inserted = self.inserted();
    let past_text = match assoc {
      Assoc::Before => self.from,
      Assoc::After => self.from + inserted,
    };

    let mapped = if pos < self.from {
      pos
    } else if pos == self.from && self.from < self.to {
      self.from
    } else if pos < self.to || pos == self.from {
      past_text
    } else {
      pos - (self.to - self.from) + inserted
    };
    Ok(mapped)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
  edit:   Edit,
  cursor: Option<usize>,
}

impl From<Edit> for Transaction {
  fn from(edit: Edit) -> Self {
    Self { edit, cursor: None }
  }
}

impl Transaction {
  /// Replace `from..to` with `text`.
  pub fn replace(doc: &Rope, from: usize, to: usize, text: Tendril) -> Result<Self> {
    Edit::new(doc, from, to, text).map(Self::from)
  }

  /// Insert `text` at `pos`, leaving the cursor after it.
  pub fn insert(doc: &Rope, pos: usize, text: Tendril) -> Result<Self> {
    let end = pos + text.chars().count();
    Ok(Self::replace(doc, pos, pos, text)?.with_cursor(end))
  }

  /// Delete `from..to`, leaving the cursor at `from`.
  pub fn delete(doc: &Rope, from: usize, to: usize) -> Result<Self> {
    Ok(Self::replace(doc, from, to, Tendril::new())?.with_cursor(from))
  }

  pub fn edit(&self) -> &Edit {
    &self.edit
  }

  /// When set, explicitly places the cursor after the edit applies.
  pub fn cursor(&self) -> Option<usize> {
    self.cursor
  }

  pub fn with_cursor(mut self, cursor: usize) -> Self {
    self.cursor = Some(cursor);
    self
  }

  pub fn apply(&self, doc: &mut Rope) -> Result<()> {
    self.edit.apply(doc)
  }
}
