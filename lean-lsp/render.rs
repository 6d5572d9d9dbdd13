//! Plain-text rendering of goal state for an output panel.

use lean_config::InfoviewSettings;

use crate::goal::{
  Goal,
  PlainGoal,
  PlainTermGoal,
};

const RULE_WIDTH: usize = 40;

fn rule() -> String {
  "-".repeat(RULE_WIDTH)
}

/// Render the goals of a `plainGoal` result.
pub fn format_goals(goal: Option<&PlainGoal>) -> String {
  let goals = match goal {
    Some(goal) if !goal.goals.is_empty() => &goal.goals,
    _ => return "No goals".to_string(),
  };

  let mut lines = Vec::new();
  for (idx, goal) in goals.iter().enumerate() {
    lines.push(format!("-- Goal {}:", idx + 1));
    match goal {
      Goal::Text(text) => lines.push(text.clone()),
      Goal::Structured {
        hypotheses,
        conclusion,
      } => {
        if !hypotheses.is_empty() {
          lines.push("\n-- Hypotheses:".to_string());
          lines.extend(hypotheses.iter().map(|hypothesis| format!("  {hypothesis}")));
        }
        lines.push(format!("\n⊢ {conclusion}"));
        lines.push(String::new());
      },
    }
    lines.push(rule());
  }
  lines.join("\n")
}

/// Render the expected type of a `plainTermGoal` result, or an empty string
/// when there is none.
pub fn format_expected_type(term: Option<&PlainTermGoal>) -> String {
  match term {
    Some(term) if !term.goal.is_empty() => {
      let rule = rule();
      ["-- Expected Type:", term.goal.as_str(), rule.as_str()].join("\n")
    },
    _ => String::new(),
  }
}

/// The full panel contents, or `None` when there is nothing to show.
///
/// Each part is shown only when enabled and non-empty. With nothing to show,
/// `no-goals` still renders the "No goals" panel.
pub fn render_infoview(
  goal: Option<&PlainGoal>,
  term: Option<&PlainTermGoal>,
  settings: &InfoviewSettings,
) -> Option<String> {
  let goal = goal.filter(|goal| settings.current_goals && !goal.goals.is_empty());
  let term = term.filter(|term| settings.expected_type && !term.goal.is_empty());
  if goal.is_none() && term.is_none() && !settings.no_goals {
    return None;
  }

  let mut parts = Vec::new();
  if goal.is_some() || settings.no_goals {
    parts.push(format_goals(goal));
    parts.push(String::new());
  }
  let expected = format_expected_type(term);
  if !expected.is_empty() {
    parts.push(expected);
    parts.push(String::new());
  }
  Some(parts.join("\n"))
}
