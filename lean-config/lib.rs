//! Settings for the unicode input engine and the goal view.
//!
//! Settings live in TOML files. A global file under the user's config
//! directory is read first and a workspace-local file is merged over it, so a
//! project can change a single key without repeating the rest:
//!
//! ```toml
//! [unicode-input]
//! eager = true
//!
//! [unicode-input.custom]
//! "ne" = "≠"
//!
//! [infoview]
//! no-goals = true
//! ```
//!
//! An `abbreviations.json` next to the global file replaces the built-in
//! abbreviation set.

use std::{
  io,
  path::{
    Path,
    PathBuf,
  },
};

use etcetera::{
  HomeDirError,
  base_strategy::{
    BaseStrategy,
    choose_base_strategy,
  },
};
use lean_lib::{
  input::UnicodeInput,
  table::AbbreviationTable,
};
use thiserror::Error;
use toml::Value;

pub mod abbreviations;
pub mod settings;

pub use settings::{
  InfoviewSettings,
  Settings,
  UnicodeInputSettings,
};

/// Overrides the global config directory.
pub const CONFIG_DIR_ENV: &str = "LEAN_INPUT_CONFIG_DIR";
pub const CONFIG_FILE: &str = "config.toml";
pub const ABBREVIATIONS_FILE: &str = "abbreviations.json";
/// Directory holding the workspace-local config.
pub const WORKSPACE_DIR: &str = ".lean-input";

const APP_NAME: &str = "lean-input";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("bad config: {0}")]
  BadConfig(#[from] toml::de::Error),
  #[error("bad abbreviation file {}: {source}", path.display())]
  BadAbbreviations {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },
  #[error("unable to find the config directory: {0}")]
  NoConfigDir(#[from] HomeDirError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// The user's global config directory.
pub fn config_dir() -> Result<PathBuf> {
  if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
    return Ok(PathBuf::from(dir));
  }
  let strategy = choose_base_strategy()?;
  Ok(strategy.config_dir().join(APP_NAME))
}

/// Where settings and abbreviations are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
  pub global:        PathBuf,
  pub local:         PathBuf,
  pub abbreviations: PathBuf,
}

impl ConfigPaths {
  /// Paths for a workspace rooted at `workspace`, using `global` instead of
  /// the file in the config directory when given.
  pub fn discover(global: Option<PathBuf>, workspace: &Path) -> Result<Self> {
    let dir = config_dir()?;
    Ok(Self {
      global:        global.unwrap_or_else(|| dir.join(CONFIG_FILE)),
      local:         workspace.join(WORKSPACE_DIR).join(CONFIG_FILE),
      abbreviations: dir.join(ABBREVIATIONS_FILE),
    })
  }

  /// Paths inside a single directory, used for the global config, the local
  /// config and the abbreviation file alike.
  pub fn in_dir(dir: &Path, workspace: &Path) -> Self {
    Self {
      global:        dir.join(CONFIG_FILE),
      local:         workspace.join(WORKSPACE_DIR).join(CONFIG_FILE),
      abbreviations: dir.join(ABBREVIATIONS_FILE),
    }
  }
}

/// Read a file, treating a missing file as `None`.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
  match std::fs::read_to_string(path) {
    Ok(contents) => Ok(Some(contents)),
    Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => {
      Err(ConfigError::Io {
        path: path.to_path_buf(),
        source,
      })
    },
  }
}

/// Merge two TOML documents, merging values from `right` onto `left`.
///
/// Tables are merged key by key up to `merge_depth` levels deep; below that,
/// and for every other kind of value, `right` replaces `left`.
pub fn merge_toml_values(left: Value, right: Value, merge_depth: usize) -> Value {
  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) if merge_depth > 0 => {
      for (key, rvalue) in right_map {
        let merged = match left_map.remove(&key) {
          Some(lvalue) => merge_toml_values(lvalue, rvalue, merge_depth - 1),
          None => rvalue,
        };
        left_map.insert(key, merged);
      }
      Value::Table(left_map)
    },
    (_, value) => value,
  }
}

impl Settings {
  /// Parse and merge the global and local config files, local last.
  pub fn from_toml_sources(global: Option<&str>, local: Option<&str>) -> Result<Self> {
    let mut merged = Value::Table(toml::Table::new());
    for source in [global, local].into_iter().flatten() {
      let table: toml::Table = toml::from_str(source)?;
      merged = merge_toml_values(merged, Value::Table(table), 3);
    }
    Ok(merged.try_into()?)
  }

  pub fn load(paths: &ConfigPaths) -> Result<Self> {
    let global = read_optional(&paths.global)?;
    let local = read_optional(&paths.local)?;
    tracing::debug!(
      global = %paths.global.display(),
      global_found = global.is_some(),
      local = %paths.local.display(),
      local_found = local.is_some(),
      "loading settings"
    );
    Self::from_toml_sources(global.as_deref(), local.as_deref())
  }

  /// The abbreviation table these settings describe.
  pub fn table(&self, paths: &ConfigPaths) -> Result<AbbreviationTable> {
    let base = abbreviations::load_abbreviations(&paths.abbreviations)?;
    Ok(abbreviations::build_table(
      base,
      &self.unicode_input.custom,
      &self.unicode_input.input_config(),
    ))
  }

  /// Push these settings into a running input host.
  pub fn apply(&self, input: &mut UnicodeInput, table: AbbreviationTable) {
    input.reload(table, self.unicode_input.input_config());
    input.set_enabled(self.unicode_input.enabled);
  }
}

/// Re-read every file and update `input`. On error the host keeps its
/// current table and configuration.
pub fn reload(input: &mut UnicodeInput, paths: &ConfigPaths) -> Result<Settings> {
  let settings = Settings::load(paths)?;
  let table = settings.table(paths)?;
  tracing::info!(entries = table.len(), "reloaded abbreviations");
  settings.apply(input, table);
  Ok(settings)
}
