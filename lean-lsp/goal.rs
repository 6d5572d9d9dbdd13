use std::path::Path;

use lean_config::InfoviewSettings;
use lean_lib::document::Document;
use serde::Deserialize;
use serde_json::{
  Value,
  json,
};
use thiserror::Error;

use crate::{
  char_idx_to_position,
  file_uri_for_path,
};

pub const PLAIN_GOAL: &str = "$/lean/plainGoal";
pub const PLAIN_TERM_GOAL: &str = "$/lean/plainTermGoal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LspPosition {
  pub line:      u32,
  pub character: u32,
}

impl LspPosition {
  fn as_json(self) -> Value {
    json!({
      "line": self.line,
      "character": self.character,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LspRange {
  pub start: LspPosition,
  pub end:   LspPosition,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GoalQueryError {
  #[error("file has unsaved changes, save first")]
  Unsaved,
  #[error("no open file path")]
  NoFilePath,
}

#[derive(Debug, Error)]
pub enum GoalParseError {
  #[error("invalid goal result shape")]
  InvalidShape,
  #[error("failed to decode goal payload: {0}")]
  Decode(#[from] serde_json::Error),
}

pub fn plain_goal_params(uri: &str, position: LspPosition) -> Value {
  text_document_position_params(uri, position)
}

pub fn plain_term_goal_params(uri: &str, position: LspPosition) -> Value {
  text_document_position_params(uri, position)
}

fn text_document_position_params(uri: &str, position: LspPosition) -> Value {
  json!({
    "textDocument": { "uri": uri },
    "position": position.as_json(),
  })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalRequestKind {
  PlainGoal,
  PlainTermGoal,
}

impl GoalRequestKind {
  pub fn method(self) -> &'static str {
    match self {
      Self::PlainGoal => PLAIN_GOAL,
      Self::PlainTermGoal => PLAIN_TERM_GOAL,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalRequest {
  pub kind:   GoalRequestKind,
  pub params: Value,
}

impl GoalRequest {
  pub fn method(&self) -> &'static str {
    self.kind.method()
  }
}

/// The goal requests to send for one cursor position.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalQuery {
  uri:      String,
  position: LspPosition,
  requests: Vec<GoalRequest>,
}

impl GoalQuery {
  /// Plan the requests for `position` in the file at `path`.
  ///
  /// The server only knows the saved file, so a buffer with unsaved changes
  /// is refused, as is one without a path. Each request kind is included
  /// only when its panel is enabled.
  pub fn prepare(
    path: Option<&Path>,
    dirty: bool,
    position: LspPosition,
    settings: &InfoviewSettings,
  ) -> Result<Self, GoalQueryError> {
    if dirty {
      return Err(GoalQueryError::Unsaved);
    }
    let uri = path
      .and_then(file_uri_for_path)
      .ok_or(GoalQueryError::NoFilePath)?;

    let mut requests = Vec::with_capacity(2);
    if settings.current_goals {
      requests.push(GoalRequest {
        kind:   GoalRequestKind::PlainGoal,
        params: plain_goal_params(&uri, position),
      });
    }
    if settings.expected_type {
      requests.push(GoalRequest {
        kind:   GoalRequestKind::PlainTermGoal,
        params: plain_term_goal_params(&uri, position),
      });
    }
    tracing::debug!(
      %uri,
      line = position.line,
      character = position.character,
      requests = requests.len(),
      "prepared goal query"
    );

    Ok(Self {
      uri,
      position,
      requests,
    })
  }

  /// [`GoalQuery::prepare`] at the cursor of `doc`.
  pub fn for_document(doc: &Document, settings: &InfoviewSettings) -> Result<Self, GoalQueryError> {
    let position = char_idx_to_position(doc.text(), doc.cursor());
    Self::prepare(doc.path(), doc.is_modified(), position, settings)
  }

  pub fn uri(&self) -> &str {
    &self.uri
  }

  pub fn position(&self) -> LspPosition {
    self.position
  }

  pub fn requests(&self) -> &[GoalRequest] {
    &self.requests
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Goal {
  /// A goal already rendered by the server.
  Text(String),
  Structured {
    hypotheses: Vec<String>,
    conclusion: String,
  },
}

/// Result of `$/lean/plainGoal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainGoal {
  pub goals:    Vec<Goal>,
  pub rendered: Option<String>,
}

/// Result of `$/lean/plainTermGoal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTermGoal {
  pub goal:  String,
  pub range: Option<LspRange>,
}

pub fn parse_plain_goal_response(
  result: Option<&Value>,
) -> Result<Option<PlainGoal>, GoalParseError> {
  let Some(result) = non_null(result)? else {
    return Ok(None);
  };
  let payload: PlainGoalPayload = serde_json::from_value(result.clone())?;
  Ok(Some(PlainGoal {
    goals:    payload
      .goals
      .into_iter()
      .map(GoalPayload::into_goal)
      .collect(),
    rendered: payload.rendered,
  }))
}

pub fn parse_plain_term_goal_response(
  result: Option<&Value>,
) -> Result<Option<PlainTermGoal>, GoalParseError> {
  let Some(result) = non_null(result)? else {
    return Ok(None);
  };
  let payload: PlainTermGoalPayload = serde_json::from_value(result.clone())?;
  Ok(Some(PlainTermGoal {
    goal:  payload.goal,
    range: payload.range,
  }))
}

fn non_null(result: Option<&Value>) -> Result<Option<&Value>, GoalParseError> {
  match result {
    None | Some(Value::Null) => Ok(None),
    Some(value @ Value::Object(_)) => Ok(Some(value)),
    Some(_) => Err(GoalParseError::InvalidShape),
  }
}

#[derive(Debug, Deserialize)]
struct PlainGoalPayload {
  #[serde(default)]
  goals:    Vec<GoalPayload>,
  rendered: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GoalPayload {
  Text(String),
  Structured {
    #[serde(default)]
    hypotheses: Vec<String>,
    conclusion: Option<String>,
    #[serde(rename = "type")]
    ty:         Option<String>,
  },
}

impl GoalPayload {
  fn into_goal(self) -> Goal {
    match self {
      Self::Text(text) => Goal::Text(text),
      Self::Structured {
        hypotheses,
        conclusion,
        ty,
      } => {
        Goal::Structured {
          hypotheses,
          conclusion: conclusion.or(ty).unwrap_or_else(|| "unknown".to_string()),
        }
      },
    }
  }
}

#[derive(Debug, Deserialize)]
struct PlainTermGoalPayload {
  goal:  String,
  range: Option<LspRange>,
}
