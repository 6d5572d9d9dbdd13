//! One typing session per buffer.

use std::collections::HashMap;

use crate::{
  document::DocumentId,
  session::{
    InputConfig,
    TypingSession,
  },
};

#[derive(Debug, Default)]
pub struct SessionRegistry {
  config:   InputConfig,
  sessions: HashMap<DocumentId, TypingSession>,
}

impl SessionRegistry {
  pub fn new(config: InputConfig) -> Self {
    Self {
      config,
      sessions: HashMap::new(),
    }
  }

  pub fn config(&self) -> &InputConfig {
    &self.config
  }

  /// The session for `id`, created with the current configuration on first
  /// use.
  pub fn session_mut(&mut self, id: DocumentId) -> &mut TypingSession {
    let config = &self.config;
    self
      .sessions
      .entry(id)
      .or_insert_with(|| TypingSession::new(config.clone()))
  }

  pub fn get(&self, id: DocumentId) -> Option<&TypingSession> {
    self.sessions.get(&id)
  }

  /// Forget the session of a closed buffer.
  pub fn remove(&mut self, id: DocumentId) -> Option<TypingSession> {
    self.sessions.remove(&id)
  }

  pub fn len(&self) -> usize {
    self.sessions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.is_empty()
  }

  /// Switch to a new configuration. Every tracked span is dropped; sessions
  /// are recreated on their next event.
  pub fn reconfigure(&mut self, config: InputConfig) {
    if !self.sessions.is_empty() {
      tracing::debug!(sessions = self.sessions.len(), "resetting typing sessions");
    }
    self.sessions.clear();
    self.config = config;
  }
}
