//! The editor-facing entry point.
//!
//! [`UnicodeInput`] is what a host calls from its "text changed" and
//! "cursor moved" hooks. It applies the user's edit to the [`Document`],
//! forwards the event to that document's [`TypingSession`], and commits any
//! replacement the session decides on before returning.
//!
//! [`TypingSession`]: crate::session::TypingSession

use std::sync::Arc;

use crate::{
  Tendril,
  commit::Replacement,
  document::{
    Document,
    DocumentId,
    Result,
  },
  registry::SessionRegistry,
  session::{
    BufferText,
    InputConfig,
  },
  store::AbbreviationStore,
  table::AbbreviationTable,
};

/// How far back from the cursor a manual conversion looks for the leader.
pub const MANUAL_CONVERSION_LOOKBACK: usize = 20;

#[derive(Debug)]
pub struct UnicodeInput {
  store:    Arc<AbbreviationStore>,
  sessions: SessionRegistry,
  enabled:  bool,
}

impl Default for UnicodeInput {
  fn default() -> Self {
    Self::new(Arc::new(AbbreviationStore::default()), InputConfig::default())
  }
}

impl UnicodeInput {
  pub fn new(store: Arc<AbbreviationStore>, config: InputConfig) -> Self {
    Self {
      store,
      sessions: SessionRegistry::new(config),
      enabled: true,
    }
  }

  pub fn store(&self) -> &Arc<AbbreviationStore> {
    &self.store
  }

  pub fn config(&self) -> &InputConfig {
    self.sessions.config()
  }

  pub fn sessions(&self) -> &SessionRegistry {
    &self.sessions
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  /// Turn automatic replacement on or off. Turning it off drops every
  /// tracked span.
  pub fn set_enabled(&mut self, enabled: bool) {
    if !enabled {
      let config = self.config().clone();
      self.sessions.reconfigure(config);
    }
    self.enabled = enabled;
  }

  pub fn reconfigure(&mut self, config: InputConfig) {
    self.sessions.reconfigure(config);
  }

  /// Publish a freshly built table and switch to `config`.
  pub fn reload(&mut self, table: AbbreviationTable, config: InputConfig) {
    self.store.publish(table);
    self.reconfigure(config);
  }

  /// Forget everything about a closed document.
  pub fn close(&mut self, id: DocumentId) {
    self.sessions.remove(id);
  }

  /// Type `text` at the cursor of `doc`.
  pub fn insert(&mut self, doc: &mut Document, text: &str) -> Result<Option<Replacement>> {
    doc.insert(text)?;
    self.text_changed(doc)
  }

  /// Delete `count` chars before the cursor of `doc`.
  pub fn backspace(&mut self, doc: &mut Document, count: usize) -> Result<Option<Replacement>> {
    if doc.delete_backward(count)? == 0 {
      return Ok(None);
    }
    self.text_changed(doc)
  }

  /// Move the cursor of `doc` without editing.
  pub fn move_cursor(&mut self, doc: &mut Document, pos: usize) -> Result<Option<Replacement>> {
    let cursor = doc.set_cursor(pos);
    if !self.enabled {
      return Ok(None);
    }
    let table = self.store.load();
    let replacement = self
      .sessions
      .session_mut(doc.id())
      .on_selection_moved(&table, doc.text(), cursor);
    self.apply(doc, replacement)
  }

  /// Convert the abbreviation left of the cursor without waiting for the
  /// ender.
  ///
  /// Looks back at most [`MANUAL_CONVERSION_LOOKBACK`] chars on the current
  /// line for the last leader, and replaces the leader plus the shortest
  /// abbreviation that follows it. Text typed past the abbreviation is kept.
  /// Does nothing while unicode input is disabled.
  pub fn convert_at_cursor(&mut self, doc: &mut Document) -> Result<Option<Replacement>> {
    if !self.enabled {
      return Ok(None);
    }
    self.sessions.session_mut(doc.id()).reset();

    let table = self.store.load();
    let leader = self.config().leader.clone();
    let replacement = find_manual_conversion(&table, &leader, doc);
    if replacement.is_none() {
      tracing::debug!(cursor = doc.cursor(), "nothing to convert");
    }
    self.apply(doc, replacement)
  }

  fn text_changed(&mut self, doc: &mut Document) -> Result<Option<Replacement>> {
    if !self.enabled {
      return Ok(None);
    }
    let table = self.store.load();
    let replacement = self
      .sessions
      .session_mut(doc.id())
      .on_text_inserted(&table, doc.text(), doc.cursor());
    self.apply(doc, replacement)
  }

  fn apply(
    &mut self,
    doc: &mut Document,
    replacement: Option<Replacement>,
  ) -> Result<Option<Replacement>> {
    let Some(replacement) = replacement else {
      return Ok(None);
    };
    doc.apply_replacement(&replacement)?;
    Ok(Some(replacement))
  }
}

fn find_manual_conversion(
  table: &AbbreviationTable,
  leader: &str,
  doc: &Document,
) -> Option<Replacement> {
  if leader.is_empty() {
    return None;
  }
  let text = doc.text();
  let cursor = doc.cursor();
  let line_start = text.line_to_char(text.char_to_line(cursor));
  let window_start = line_start.max(cursor.saturating_sub(MANUAL_CONVERSION_LOOKBACK));
  let window = text.substr(window_start, cursor)?;

  let leader_idx = window.rfind(leader)?;
  let after = &window[leader_idx + leader.len()..];
  let abbreviation = table.shortest_match(after)?;
  let replacement = table.replacement_for(abbreviation)?;

  let from = window_start + window[..leader_idx].chars().count();
  let to = from + leader.chars().count() + abbreviation.chars().count();
  Some(Replacement {
    from,
    to,
    abbreviation: abbreviation.to_string(),
    original: Tendril::from(&*text.substr(from, to)?),
    text: Tendril::from(replacement),
  })
}
