//! Per-buffer abbreviation tracking.
//!
//! A [`TypingSession`] watches the edits and cursor moves of one buffer and
//! decides when a typed abbreviation should be replaced. It never edits the
//! buffer itself: every decision to replace is returned as a
//! [`Replacement`] for the host to commit (see [`crate::commit`]).
//!
//! # States
//!
//! - **Idle** - nothing is tracked.
//! - **Tracking** - a leader was typed; the text between the leader and the
//!   cursor is a prefix of at least one abbreviation.
//!
//! # Transitions
//!
//! On every text modification ([`TypingSession::on_text_inserted`]):
//!
//! 1. Idle, and the text just before the cursor is the leader: start
//!    tracking with an empty abbreviation.
//! 2. Tracking, and the edit touches the span: re-read the abbreviation from
//!    the buffer.
//!    - Still a prefix: extend the span. With `eager`, a strictly complete
//!      abbreviation is replaced at once; otherwise an abbreviation followed
//!      by the ender is replaced together with the ender.
//!    - No longer a prefix: the ender rule above still applies. With `eager`,
//!      the previously tracked abbreviation is salvaged if it was complete,
//!      and a leader typed right after it starts a new sequence.
//!      Otherwise tracking is dropped, and the new input may itself start a
//!      sequence.
//!
//! On a cursor move ([`TypingSession::on_selection_moved`]) that leaves the
//! span, a complete abbreviation is replaced and anything else is dropped.
//!
//! # Offsets
//!
//! All positions are char offsets into the buffer, as used by [`ropey`].

use std::{
  borrow::Cow,
  ops::Range,
};

use ropey::{
  Rope,
  RopeSlice,
};

use crate::{
  Tendril,
  commit::{
    Replacement,
    expand_placeholder,
  },
  matcher::Completeness,
  table::AbbreviationTable,
};

/// Read access to the buffer a session tracks.
pub trait BufferText {
  fn len_chars(&self) -> usize;

  /// The text between two char offsets, or `None` if the range is out of
  /// bounds.
  fn substr(&self, from: usize, to: usize) -> Option<Cow<'_, str>>;
}

impl BufferText for Rope {
  fn len_chars(&self) -> usize {
    Rope::len_chars(self)
  }

  fn substr(&self, from: usize, to: usize) -> Option<Cow<'_, str>> {
    self.get_slice(from..to).map(Cow::from)
  }
}

impl BufferText for RopeSlice<'_> {
  fn len_chars(&self) -> usize {
    RopeSlice::len_chars(self)
  }

  fn substr(&self, from: usize, to: usize) -> Option<Cow<'_, str>> {
    self.get_slice(from..to).map(Cow::from)
  }
}

impl BufferText for str {
  fn len_chars(&self) -> usize {
    self.chars().count()
  }

  fn substr(&self, from: usize, to: usize) -> Option<Cow<'_, str>> {
    if from > to {
      return None;
    }
    let byte_at = |pos: usize| {
      if pos == self.chars().count() {
        Some(self.len())
      } else {
        self.char_indices().nth(pos).map(|(idx, _)| idx)
      }
    };
    Some(Cow::Borrowed(&self[byte_at(from)?..byte_at(to)?]))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
  /// Token that starts an abbreviation.
  pub leader: Tendril,
  /// Token that, typed after a complete abbreviation, forces replacement.
  pub ender:  Tendril,
  /// Replace strictly complete abbreviations without waiting for the ender.
  pub eager:  bool,
}

impl Default for InputConfig {
  fn default() -> Self {
    Self {
      leader: Tendril::from("\\"),
      ender:  Tendril::from("\t"),
      eager:  false,
    }
  }
}

/// The span of an abbreviation being typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedAbbreviation {
  /// Position of the leader.
  anchor: usize,
  /// Position right after the leader.
  start:  usize,
  /// End of the typed abbreviation (exclusive).
  end:    usize,
  /// Last observed text of `start..end`.
  text:   String,
}

impl TrackedAbbreviation {
  pub fn anchor(&self) -> usize {
    self.anchor
  }

  /// The abbreviation span, excluding the leader.
  pub fn span(&self) -> Range<usize> {
    self.start..self.end
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  /// Whether `pos` lies on the abbreviation span, counting both ends.
  fn contains(&self, pos: usize) -> bool {
    self.start <= pos && pos <= self.end
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
  #[default]
  Idle,
  Tracking(TrackedAbbreviation),
}

enum Update {
  Tracking(TrackedAbbreviation),
  Commit(Replacement),
  Discard,
}

#[derive(Debug, Clone, Default)]
pub struct TypingSession {
  config: InputConfig,
  state:  SessionState,
}

impl TypingSession {
  pub fn new(config: InputConfig) -> Self {
    Self {
      config,
      state: SessionState::Idle,
    }
  }

  pub fn config(&self) -> &InputConfig {
    &self.config
  }

  pub fn state(&self) -> &SessionState {
    &self.state
  }

  pub fn tracked(&self) -> Option<&TrackedAbbreviation> {
    match &self.state {
      SessionState::Tracking(tracked) => Some(tracked),
      SessionState::Idle => None,
    }
  }

  pub fn is_tracking(&self) -> bool {
    self.tracked().is_some()
  }

  /// Drop any tracked span without replacing it.
  pub fn reset(&mut self) {
    self.state = SessionState::Idle;
  }

  /// Handle a modification of the buffer that left the cursor at `point`.
  pub fn on_text_inserted<B: BufferText + ?Sized>(
    &mut self,
    table: &AbbreviationTable,
    buffer: &B,
    point: usize,
  ) -> Option<Replacement> {
    if let SessionState::Tracking(tracked) = std::mem::take(&mut self.state) {
      // the character before the cursor must belong to the span
      if point > tracked.anchor && point <= tracked.end + 1 {
        match self.update(table, buffer, tracked, point) {
          Update::Tracking(tracked) => {
            tracing::trace!(text = %tracked.text, end = tracked.end, "tracking abbreviation");
            self.state = SessionState::Tracking(tracked);
            return None;
          },
          Update::Commit(replacement) => {
            if replacement.to < point {
              self.restart_after_salvage(buffer, point, &replacement);
            }
            return Some(replacement);
          },
          Update::Discard => {},
        }
      } else {
        tracing::debug!(
          anchor = tracked.anchor,
          point,
          "edit outside abbreviation, dropping it"
        );
      }
    }

    self.try_start(buffer, point);
    None
  }

  /// Handle the cursor moving to `cursor` without an edit.
  pub fn on_selection_moved<B: BufferText + ?Sized>(
    &mut self,
    table: &AbbreviationTable,
    buffer: &B,
    cursor: usize,
  ) -> Option<Replacement> {
    match &self.state {
      SessionState::Tracking(tracked) if !tracked.contains(cursor) => {},
      _ => return None,
    }
    let SessionState::Tracking(tracked) = std::mem::take(&mut self.state) else {
      return None;
    };

    if !table.is_complete(&tracked.text, Completeness::NonStrict) {
      tracing::debug!(text = %tracked.text, "cursor left incomplete abbreviation");
      return None;
    }
    match buffer.substr(tracked.start, tracked.end) {
      Some(current) if current == tracked.text => {},
      _ => {
        tracing::debug!(text = %tracked.text, "abbreviation changed under the cursor");
        return None;
      },
    }

    self.replacement(table, buffer, tracked.anchor, tracked.end, &tracked.text)
  }

  fn update<B: BufferText + ?Sized>(
    &self,
    table: &AbbreviationTable,
    buffer: &B,
    tracked: TrackedAbbreviation,
    point: usize,
  ) -> Update {
    if point < tracked.start || !self.leader_intact(buffer, &tracked) {
      tracing::debug!(anchor = tracked.anchor, "leader removed");
      return Update::Discard;
    }
    let Some(text) = buffer.substr(tracked.start, point) else {
      return Update::Discard;
    };
    let text = text.into_owned();

    if table.is_prefix(&text) {
      if self.config.eager && table.is_complete(&text, Completeness::Strict) {
        return self.commit(table, buffer, tracked.anchor, point, &text);
      }
      if let Some(base) = self.strip_ender(&text)
        && table.is_complete(base, Completeness::NonStrict)
      {
        return self.commit(table, buffer, tracked.anchor, point, base);
      }
      return Update::Tracking(TrackedAbbreviation {
        end: point,
        text,
        ..tracked
      });
    }

    if let Some(base) = self.strip_ender(&text)
      && table.is_complete(base, Completeness::NonStrict)
    {
      return self.commit(table, buffer, tracked.anchor, point, base);
    }

    if self.awaits_ender(table, &text) {
      return Update::Tracking(TrackedAbbreviation {
        end: point,
        text,
        ..tracked
      });
    }

    if self.config.eager
      && table.is_complete(&tracked.text, Completeness::NonStrict)
      && buffer.substr(tracked.start, tracked.end).as_deref() == Some(tracked.text.as_str())
    {
      tracing::debug!(text = %tracked.text, "salvaging abbreviation before invalid input");
      return self.commit(table, buffer, tracked.anchor, tracked.end, &tracked.text);
    }

    tracing::trace!(%text, "not an abbreviation prefix");
    Update::Discard
  }

  fn commit<B: BufferText + ?Sized>(
    &self,
    table: &AbbreviationTable,
    buffer: &B,
    anchor: usize,
    end: usize,
    abbreviation: &str,
  ) -> Update {
    match self.replacement(table, buffer, anchor, end, abbreviation) {
      Some(replacement) => Update::Commit(replacement),
      None => Update::Discard,
    }
  }

  fn replacement<B: BufferText + ?Sized>(
    &self,
    table: &AbbreviationTable,
    buffer: &B,
    anchor: usize,
    end: usize,
    abbreviation: &str,
  ) -> Option<Replacement> {
    let Some(text) = table.replacement_for(abbreviation) else {
      tracing::error!(abbreviation, "no replacement for complete abbreviation");
      return None;
    };
    let original = buffer.substr(anchor, end)?;
    Some(Replacement {
      from:         anchor,
      to:           end,
      abbreviation: abbreviation.to_string(),
      original:     Tendril::from(&*original),
      text:         Tendril::from(text),
    })
  }

  /// `text` without a trailing ender, if it has one.
  fn strip_ender<'a>(&self, text: &'a str) -> Option<&'a str> {
    let ender = self.config.ender.as_str();
    if ender.is_empty() {
      return None;
    }
    text.strip_suffix(ender)
  }

  /// Whether `text` is a complete abbreviation followed by part of a
  /// multi-char ender.
  fn awaits_ender(&self, table: &AbbreviationTable, text: &str) -> bool {
    let ender = self.config.ender.as_str();
    ender
      .char_indices()
      .skip(1)
      .filter_map(|(idx, _)| text.strip_suffix(&ender[..idx]))
      .any(|base| table.is_complete(base, Completeness::NonStrict))
  }

  fn leader_intact<B: BufferText + ?Sized>(&self, buffer: &B, tracked: &TrackedAbbreviation) -> bool {
    buffer.substr(tracked.anchor, tracked.start).as_deref() == Some(self.config.leader.as_str())
  }

  /// A salvaged abbreviation ends before `point`. If the input that broke it
  /// was a leader, track that leader, with positions as they will be once
  /// `replacement` is committed.
  fn restart_after_salvage<B: BufferText + ?Sized>(
    &mut self,
    buffer: &B,
    point: usize,
    replacement: &Replacement,
  ) {
    self.try_start(buffer, point);
    let SessionState::Tracking(tracked) = &mut self.state else {
      return;
    };
    if tracked.anchor < replacement.to {
      self.state = SessionState::Idle;
      return;
    }

    let removed = replacement.to - replacement.from;
    let inserted = expand_placeholder(&replacement.text).0.chars().count();
    let rebase = |pos: usize| pos - removed + inserted;
    tracked.anchor = rebase(tracked.anchor);
    tracked.start = rebase(tracked.start);
    tracked.end = rebase(tracked.end);
  }

  fn try_start<B: BufferText + ?Sized>(&mut self, buffer: &B, point: usize) {
    let leader_len = self.config.leader.chars().count();
    if leader_len == 0 {
      return;
    }
    let Some(anchor) = point.checked_sub(leader_len) else {
      return;
    };
    if buffer.substr(anchor, point).as_deref() != Some(self.config.leader.as_str()) {
      return;
    }

    tracing::debug!(anchor, "started abbreviation");
    self.state = SessionState::Tracking(TrackedAbbreviation {
      anchor,
      start: point,
      end: point,
      text: String::new(),
    });
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn table() -> AbbreviationTable {
    AbbreviationTable::build(
      [
        ("alpha", "α"),
        ("to", "→"),
        ("top", "⊤"),
        ("forall", "∀"),
        ("a b", "ab"),
      ],
      [],
    )
  }

  fn eager() -> InputConfig {
    InputConfig {
      eager: true,
      ..InputConfig::default()
    }
  }

  /// Type `input` one char at a time at the end of `text`, stopping at the
  /// first replacement.
  fn type_str(
    session: &mut TypingSession,
    table: &AbbreviationTable,
    text: &mut String,
    input: &str,
  ) -> Option<Replacement> {
    for ch in input.chars() {
      text.push(ch);
      let point = text.chars().count();
      if let Some(replacement) = session.on_text_inserted(table, text.as_str(), point) {
        return Some(replacement);
      }
    }
    None
  }

  #[test]
  fn str_substr_uses_char_offsets() {
    let text = "aα\\to";
    assert_eq!(text.substr(1, 3).as_deref(), Some("α\\"));
    assert_eq!(text.substr(5, 5).as_deref(), Some(""));
    assert_eq!(text.substr(2, 6), None);
    assert_eq!(text.substr(3, 2), None);
  }

  #[test]
  fn leader_starts_tracking() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::from("x ");
    assert_eq!(type_str(&mut session, &table, &mut text, "\\"), None);
    let tracked = session.tracked().unwrap();
    assert_eq!(tracked.anchor(), 2);
    assert_eq!(tracked.span(), 3..3);
    assert_eq!(tracked.text(), "");
  }

  #[test]
  fn typing_extends_span() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::new();
    assert_eq!(type_str(&mut session, &table, &mut text, "\\alp"), None);
    let tracked = session.tracked().unwrap();
    assert_eq!(tracked.span(), 1..4);
    assert_eq!(tracked.text(), "alp");
  }

  #[test]
  fn whitespace_can_be_part_of_abbreviation() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::new();
    type_str(&mut session, &table, &mut text, "\\a b");
    assert_eq!(session.tracked().unwrap().text(), "a b");
  }

  #[test]
  fn invalid_input_drops_tracking() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::new();
    assert_eq!(type_str(&mut session, &table, &mut text, "\\alx"), None);
    assert_eq!(session.state(), &SessionState::Idle);
  }

  #[test]
  fn ender_commits_and_is_consumed() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::from("f ");
    let replacement = type_str(&mut session, &table, &mut text, "\\forall\t").unwrap();
    assert_eq!(replacement.from, 2);
    assert_eq!(replacement.to, 10);
    assert_eq!(replacement.abbreviation, "forall");
    assert_eq!(replacement.original.as_str(), "\\forall\t");
    assert_eq!(replacement.text.as_str(), "∀");
    assert!(!session.is_tracking());
  }

  #[test]
  fn ender_after_incomplete_prefix_drops_tracking() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::new();
    assert_eq!(type_str(&mut session, &table, &mut text, "\\fora\t"), None);
    assert!(!session.is_tracking());
  }

  #[test]
  fn eager_replaces_strictly_complete() {
    let table = table();
    let mut session = TypingSession::new(eager());
    let mut text = String::new();
    let replacement = type_str(&mut session, &table, &mut text, "\\alpha").unwrap();
    assert_eq!((replacement.from, replacement.to), (0, 6));
    assert_eq!(replacement.text.as_str(), "α");
  }

  #[test]
  fn eager_waits_while_extendable() {
    let table = table();
    let mut session = TypingSession::new(eager());
    let mut text = String::new();
    assert_eq!(type_str(&mut session, &table, &mut text, "\\to"), None);
    assert!(session.is_tracking());
    let replacement = type_str(&mut session, &table, &mut text, "p").unwrap();
    assert_eq!(replacement.abbreviation, "top");
  }

  #[test]
  fn eager_salvages_previous_match() {
    let table = table();
    let mut session = TypingSession::new(eager());
    let mut text = String::new();
    let replacement = type_str(&mut session, &table, &mut text, "\\tox").unwrap();
    assert_eq!((replacement.from, replacement.to), (0, 3));
    assert_eq!(replacement.original.as_str(), "\\to");
    assert_eq!(replacement.text.as_str(), "→");
    assert!(!session.is_tracking());
  }

  #[test]
  fn leader_after_salvage_starts_new_span() {
    let table = table();
    let mut session = TypingSession::new(eager());
    let mut text = String::from("x ");
    let replacement = type_str(&mut session, &table, &mut text, "\\to\\").unwrap();
    assert_eq!((replacement.from, replacement.to), (2, 5));

    // positions are those after the commit
    let tracked = session.tracked().unwrap();
    assert_eq!(tracked.anchor(), 3);
    assert_eq!(tracked.span(), 4..4);

    let mut text = String::from("x →\\");
    let replacement = type_str(&mut session, &table, &mut text, "alpha").unwrap();
    assert_eq!((replacement.from, replacement.to), (3, 9));
    assert_eq!(replacement.text.as_str(), "α");
  }

  #[test]
  fn no_salvage_without_eager() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::new();
    assert_eq!(type_str(&mut session, &table, &mut text, "\\tox"), None);
    assert!(!session.is_tracking());
  }

  #[test]
  fn second_leader_abandons_first_span() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::new();
    assert_eq!(type_str(&mut session, &table, &mut text, "\\to\\"), None);
    let tracked = session.tracked().unwrap();
    assert_eq!(tracked.anchor(), 3);
    assert_eq!(tracked.text(), "");

    // a leader typed elsewhere also restarts
    let mut session = TypingSession::default();
    let mut text = String::from("\\al  ");
    session.on_text_inserted(&table, text.as_str(), 1);
    session.on_text_inserted(&table, text.as_str(), 2);
    session.on_text_inserted(&table, text.as_str(), 3);
    assert_eq!(session.tracked().unwrap().text(), "al");
    text.push('\\');
    assert_eq!(session.on_text_inserted(&table, text.as_str(), 6), None);
    assert_eq!(session.tracked().unwrap().anchor(), 5);
  }

  #[test]
  fn cursor_escape_commits_complete_abbreviation() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::from("x ");
    type_str(&mut session, &table, &mut text, "\\alpha");
    assert_eq!(session.on_selection_moved(&table, text.as_str(), 8), None);
    assert!(session.is_tracking());
    assert_eq!(session.on_selection_moved(&table, text.as_str(), 3), None);
    assert!(session.is_tracking());

    let replacement = session
      .on_selection_moved(&table, text.as_str(), 0)
      .unwrap();
    assert_eq!((replacement.from, replacement.to), (2, 8));
    assert_eq!(replacement.text.as_str(), "α");
    assert!(!session.is_tracking());
  }

  #[test]
  fn cursor_escape_discards_incomplete_abbreviation() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::from("x ");
    type_str(&mut session, &table, &mut text, "\\alp");
    assert_eq!(session.on_selection_moved(&table, text.as_str(), 0), None);
    assert!(!session.is_tracking());

    type_str(&mut session, &table, &mut text, "\\");
    assert_eq!(session.on_selection_moved(&table, text.as_str(), 0), None);
    assert!(!session.is_tracking());
  }

  #[test]
  fn backspace_shrinks_span() {
    let table = table();
    let mut session = TypingSession::default();
    let mut text = String::new();
    type_str(&mut session, &table, &mut text, "\\alp");
    text.pop();
    assert_eq!(session.on_text_inserted(&table, text.as_str(), 3), None);
    assert_eq!(session.tracked().unwrap().text(), "al");

    // deleting the leader ends tracking
    text.truncate(0);
    assert_eq!(session.on_text_inserted(&table, text.as_str(), 0), None);
    assert!(!session.is_tracking());
  }

  #[test]
  fn multi_char_leader_and_ender() {
    let table = table();
    let config = InputConfig {
      leader: "::".into(),
      ender:  "..".into(),
      eager:  false,
    };
    let mut session = TypingSession::new(config);
    let mut text = String::new();
    let replacement = type_str(&mut session, &table, &mut text, "::to..").unwrap();
    assert_eq!((replacement.from, replacement.to), (0, 6));
    assert_eq!(replacement.text.as_str(), "→");

    // ":" alone is not the leader
    let mut text = String::from(" ");
    assert_eq!(type_str(&mut session, &table, &mut text, ":"), None);
    assert!(!session.is_tracking());
  }

  #[test]
  fn eager_waits_for_unambiguous_match() {
    let table = AbbreviationTable::build([("t", "τ"), ("to", "→")], []);
    let mut session = TypingSession::new(eager());
    let mut text = String::new();
    let replacement = type_str(&mut session, &table, &mut text, "\\to").unwrap();
    assert_eq!(replacement.abbreviation, "to");
  }
}
