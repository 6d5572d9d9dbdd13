//! Applying an abbreviation replacement to a buffer.
//!
//! A [`Replacement`] names the exact span the typing session tracked (leader
//! included) and the text that should take its place. Committing builds a
//! single-edit [`Transaction`], so the deletion of the span and the
//! insertion of the replacement land together.
//!
//! # Cursor placement
//!
//! The replacement text may contain [`CURSOR_PLACEHOLDER`]. It is removed
//! before insertion and the cursor is put where its first occurrence was,
//! e.g. `\<>` becomes `⟨|⟩`. Without a placeholder the cursor goes to the end
//! of the inserted text. A cursor that was outside the span (the user moved
//! away, or typed past it) keeps its place relative to the surrounding text.

use ropey::Rope;
use thiserror::Error;

use crate::{
  Tendril,
  transaction::{
    Assoc,
    Transaction,
    TransactionError,
  },
};

pub const CURSOR_PLACEHOLDER: &str = "$CURSOR";

pub type Result<T> = std::result::Result<T, CommitError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommitError {
  #[error("buffer text at {from}..{to} changed: expected {expected:?}, found {found:?}")]
  StaleSpan {
    from:     usize,
    to:       usize,
    expected: String,
    found:    String,
  },
  #[error(transparent)]
  Transaction(#[from] TransactionError),
}

/// A pending substitution produced by a typing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
  /// Start of the span, at the leader.
  pub from:         usize,
  /// End of the span (exclusive).
  pub to:           usize,
  /// The abbreviation being replaced, without leader or ender.
  pub abbreviation: String,
  /// The buffer text the span held when the replacement was decided.
  pub original:     Tendril,
  /// The replacement text, possibly containing [`CURSOR_PLACEHOLDER`].
  pub text:         Tendril,
}

/// Strip the cursor placeholder from `text`, returning the text to insert and
/// the char offset of the first placeholder, if any.
pub fn expand_placeholder(text: &str) -> (Tendril, Option<usize>) {
  let Some(byte_idx) = text.find(CURSOR_PLACEHOLDER) else {
    return (Tendril::from(text), None);
  };
  let offset = text[..byte_idx].chars().count();
  let stripped = text.replace(CURSOR_PLACEHOLDER, "");
  (Tendril::from(stripped.as_str()), Some(offset))
}

impl Replacement {
  /// Build the transaction that performs this replacement on `doc`, given the
  /// cursor position before the edit.
  pub fn transaction(&self, doc: &Rope, cursor: usize) -> Result<Transaction> {
    let found = doc
      .get_slice(self.from..self.to)
      .map(String::from)
      .unwrap_or_default();
    if found != self.original.as_str() {
      return Err(CommitError::StaleSpan {
        from: self.from,
        to: self.to,
        expected: self.original.to_string(),
        found,
      });
    }

    let (inserted, placeholder) = expand_placeholder(&self.text);
    let inserted_len = inserted.chars().count();
    let transaction = Transaction::replace(doc, self.from, self.to, inserted)?;

    let new_cursor = if cursor <= self.from || cursor > self.to {
      transaction.edit().map_pos(cursor, Assoc::After)?
    } else {
      self.from + placeholder.unwrap_or(inserted_len)
    };

    Ok(transaction.with_cursor(new_cursor))
  }
}

/// Replace the span in `doc` and return the new cursor position.
pub fn commit(doc: &mut Rope, replacement: &Replacement, cursor: usize) -> Result<usize> {
  let transaction = replacement.transaction(doc, cursor)?;
  transaction.apply(doc)?;
  let new_cursor = transaction.cursor().unwrap_or(cursor);
  tracing::debug!(
    abbreviation = %replacement.abbreviation,
    text = %replacement.text,
    from = replacement.from,
    to = replacement.to,
    new_cursor,
    "committed abbreviation"
  );
  Ok(new_cursor)
}
