//! Key notation for replaying typing sessions from the command line.
//!
//! Plain characters are typed as is. Special keys use `<Name>`:
//! `<Tab>`, `<BS>`, `<Left>`, `<Right>`, `<Home>`, `<End>`, `<Convert>`
//! (manual conversion) and `<lt>` for a literal `<`. Any other `<` is typed
//! literally, so `\<>` needs no escaping.

use lean_lib::{
  document::{
    Document,
    Result,
  },
  input::UnicodeInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
  Char(char),
  Backspace,
  Left,
  Right,
  Home,
  End,
  Convert,
}

fn named(name: &str) -> Option<Key> {
  let key = match name.to_ascii_lowercase().as_str() {
    "tab" => Key::Char('\t'),
    "lt" => Key::Char('<'),
    "cr" | "enter" => Key::Char('\n'),
    "bs" | "backspace" => Key::Backspace,
    "left" => Key::Left,
    "right" => Key::Right,
    "home" => Key::Home,
    "end" => Key::End,
    "convert" => Key::Convert,
    _ => return None,
  };
  Some(key)
}

pub fn parse_keys(input: &str) -> Vec<Key> {
  let mut keys = Vec::new();
  let mut rest = input;
  while let Some(ch) = rest.chars().next() {
    if ch == '<'
      && let Some(close) = rest.find('>')
      && let Some(key) = named(&rest[1..close])
    {
      keys.push(key);
      rest = &rest[close + 1..];
      continue;
    }
    keys.push(Key::Char(ch));
    rest = &rest[ch.len_utf8()..];
  }
  keys
}

/// Feed `keys` through `input`, returning how many replacements fired.
pub fn replay(input: &mut UnicodeInput, doc: &mut Document, keys: &[Key]) -> Result<usize> {
  let mut replacements = 0;
  for key in keys {
    let cursor = doc.cursor();
    let replacement = match *key {
      Key::Char(ch) => input.insert(doc, ch.encode_utf8(&mut [0; 4]))?,
      Key::Backspace => input.backspace(doc, 1)?,
      Key::Left => input.move_cursor(doc, cursor.saturating_sub(1))?,
      Key::Right => input.move_cursor(doc, cursor + 1)?,
      Key::Home => input.move_cursor(doc, 0)?,
      Key::End => {
        let end = doc.text().len_chars();
        input.move_cursor(doc, end)?
      },
      Key::Convert => input.convert_at_cursor(doc)?,
    };
    if let Some(replacement) = replacement {
      tracing::info!(
        abbreviation = %replacement.abbreviation,
        text = %replacement.text,
        "replaced"
      );
      replacements += 1;
    }
  }
  Ok(replacements)
}
