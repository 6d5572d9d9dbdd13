use std::collections::BTreeMap;

use lean_lib::{
  Tendril,
  session::InputConfig,
};
use serde::{
  Deserialize,
  Serialize,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Settings {
  pub unicode_input: UnicodeInputSettings,
  pub infoview:      InfoviewSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct UnicodeInputSettings {
  /// Replace abbreviations while typing.
  pub enabled: bool,
  pub leader:  String,
  pub ender:   String,
  pub eager:   bool,
  /// Extra abbreviations, merged over the base table.
  pub custom:  BTreeMap<String, String>,
}

impl Default for UnicodeInputSettings {
  fn default() -> Self {
    let input = InputConfig::default();
    Self {
      enabled: true,
      leader:  input.leader.to_string(),
      ender:   input.ender.to_string(),
      eager:   input.eager,
      custom:  BTreeMap::new(),
    }
  }
}

impl UnicodeInputSettings {
  /// The session configuration these settings describe. An empty leader or
  /// ender falls back to its default.
  pub fn input_config(&self) -> InputConfig {
    let defaults = InputConfig::default();
    let token = |name: &str, value: &str, default: Tendril| {
      if value.is_empty() {
        tracing::warn!(setting = name, default = ?default, "empty token, using default");
        default
      } else {
        Tendril::from(value)
      }
    };
    InputConfig {
      leader: token("leader", &self.leader, defaults.leader),
      ender:  token("ender", &self.ender, defaults.ender),
      eager:  self.eager,
    }
  }
}

/// Which goal-state panels to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct InfoviewSettings {
  pub current_goals: bool,
  pub expected_type: bool,
  /// Show the goals panel even when there are no goals.
  pub no_goals:      bool,
}

impl Default for InfoviewSettings {
  fn default() -> Self {
    Self {
      current_goals: true,
      expected_type: true,
      no_goals:      false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_session_defaults() {
    let settings = Settings::default();
    assert!(settings.unicode_input.enabled);
    assert_eq!(settings.unicode_input.input_config(), InputConfig::default());
    assert_eq!(settings.infoview, InfoviewSettings {
      current_goals: true,
      expected_type: true,
      no_goals:      false,
    });
  }

  #[test]
  fn empty_tokens_fall_back() {
    let settings = UnicodeInputSettings {
      leader: String::new(),
      ender: ";;".into(),
      eager: true,
      ..UnicodeInputSettings::default()
    };
    let config = settings.input_config();
    assert_eq!(config.leader.as_str(), "\\");
    assert_eq!(config.ender.as_str(), ";;");
    assert!(config.eager);
  }

  #[test]
  fn parses_kebab_case() {
    let settings: Settings = toml::from_str(
      r#"
      [unicode-input]
      eager = true
      [unicode-input.custom]
      ne = "≠"

      [infoview]
      no-goals = true
      "#,
    )
    .unwrap();
    assert!(settings.unicode_input.eager);
    assert_eq!(settings.unicode_input.custom["ne"], "≠");
    assert!(settings.infoview.no_goals);
    assert!(settings.infoview.current_goals);
  }

  #[test]
  fn rejects_unknown_keys() {
    assert!(toml::from_str::<Settings>("[unicode-input]\nleeder = \"\\\\\"").is_err());
  }
}
