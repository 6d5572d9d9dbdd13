//! Building the abbreviation table from the built-in set, an optional
//! abbreviation file and the user's custom entries.

use std::{
  collections::BTreeMap,
  path::Path,
};

use lean_lib::{
  defaults::DEFAULT_ABBREVIATIONS,
  session::InputConfig,
  table::AbbreviationTable,
};

use crate::{
  ConfigError,
  Result,
  read_optional,
};

/// Read a flat JSON object of abbreviations. A missing file is `None`.
pub fn load_abbreviations(path: &Path) -> Result<Option<BTreeMap<String, String>>> {
  let Some(contents) = read_optional(path)? else {
    return Ok(None);
  };
  let abbreviations = serde_json::from_str(&contents).map_err(|source| {
    ConfigError::BadAbbreviations {
      path: path.to_path_buf(),
      source,
    }
  })?;
  Ok(Some(abbreviations))
}

/// Merge `custom` over `base` (or over the built-in set when there is no
/// base file).
///
/// Abbreviations containing the leader or the ender can never be typed and
/// are dropped.
pub fn build_table(
  base: Option<BTreeMap<String, String>>,
  custom: &BTreeMap<String, String>,
  input: &InputConfig,
) -> AbbreviationTable {
  let typeable = |(abbreviation, _): &(String, String)| {
    let contains = |token: &str| !token.is_empty() && abbreviation.contains(token);
    let ok = !contains(input.leader.as_str()) && !contains(input.ender.as_str());
    if !ok {
      tracing::warn!(%abbreviation, "abbreviation contains the leader or ender, ignoring");
    }
    ok
  };

  let base: Vec<(String, String)> = match base {
    Some(base) => base.into_iter().collect(),
    None => {
      DEFAULT_ABBREVIATIONS
        .iter()
        .map(|(abbreviation, text)| (abbreviation.to_string(), text.to_string()))
        .collect()
    },
  };
  let custom = custom
    .iter()
    .map(|(abbreviation, text)| (abbreviation.clone(), text.clone()));

  AbbreviationTable::build(
    base.into_iter().filter(typeable),
    custom.filter(typeable),
  )
}
