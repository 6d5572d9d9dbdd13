//! The goal-state ("infoview") side of the Lean language server protocol.
//!
//! This crate builds request parameters and decodes responses; sending them
//! is up to the host's language client.

use std::path::{
  Path,
  PathBuf,
};

use ropey::Rope;
use url::Url;

pub mod goal;
pub mod render;

pub use goal::LspPosition;

/// `file://` URI for `path`, resolved against the current directory when
/// relative.
pub fn file_uri_for_path(path: &Path) -> Option<String> {
  let absolute = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir().ok()?.join(path)
  };
  Url::from_file_path(absolute).ok().map(String::from)
}

pub fn path_for_file_uri(uri: &str) -> Option<PathBuf> {
  let parsed = Url::parse(uri).ok()?;
  if parsed.scheme() != "file" {
    return None;
  }
  parsed.to_file_path().ok()
}

/// LSP position (UTF-16 columns) of a char offset.
pub fn char_idx_to_position(text: &Rope, pos: usize) -> LspPosition {
  let pos = pos.min(text.len_chars());
  let line = text.char_to_line(pos);
  let line_start = text.line_to_char(line);
  let character = text
    .slice(line_start..pos)
    .chars()
    .map(|ch| ch.len_utf16() as u32)
    .sum::<u32>();

  LspPosition {
    line: line as u32,
    character,
  }
}
