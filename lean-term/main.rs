//! Command-line host for the Lean unicode input engine.
//!
//! Useful for checking a configuration without an editor: list the active
//! abbreviations, replay keystrokes through the same typing sessions an
//! editor would use, or build and render goal-view requests.

mod keys;

use std::{
  io::Read,
  num::NonZeroUsize,
  path::PathBuf,
  sync::Arc,
};

use clap::{
  ArgAction,
  Parser,
  Subcommand,
};
use eyre::{
  Result,
  WrapErr,
  eyre,
};
use lean_config::{
  ConfigPaths,
  Settings,
};
use lean_lib::{
  document::{
    Document,
    DocumentId,
  },
  input::UnicodeInput,
  store::AbbreviationStore,
  table::AbbreviationTable,
};
use lean_lsp::{
  LspPosition,
  goal::{
    GoalQuery,
    parse_plain_goal_response,
    parse_plain_term_goal_response,
  },
  render::render_infoview,
};
use ropey::Rope;
use serde_json::{
  Value,
  json,
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "lean-input")]
#[command(about = "Unicode abbreviation input for Lean, from the terminal")]
struct Cli {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count, global = true)]
  verbosity: u8,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
  config_file: Option<PathBuf>,

  /// Replace strictly complete abbreviations without waiting for the ender
  #[arg(long, global = true)]
  eager: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Print every abbreviation
  List,

  /// Replay keystrokes and print the resulting text
  ///
  /// Special keys: <Tab> <BS> <Left> <Right> <Home> <End> <Convert> <lt>
  Type {
    keys: String,
  },

  /// Print the goal requests for a position in a file
  GoalParams {
    file:      PathBuf,
    /// Zero-based line
    line:      u32,
    /// Zero-based UTF-16 column
    character: u32,
  },

  /// Render goal responses read as JSON from FILE or stdin
  ///
  /// Input shape: {"plainGoal": <result>, "plainTermGoal": <result>}
  Infoview {
    file: Option<PathBuf>,
  },
}

fn init_logging(verbosity: u8) {
  let level = match verbosity {
    0 => LevelFilter::WARN,
    1 => LevelFilter::INFO,
    2 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  };
  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_writer(std::io::stderr)
    .init();
}

fn load(cli: &Cli) -> Result<(Settings, AbbreviationTable)> {
  let workspace = std::env::current_dir().wrap_err("failed to read working directory")?;
  let paths = ConfigPaths::discover(cli.config_file.clone(), &workspace)?;
  let mut settings = Settings::load(&paths)
    .wrap_err_with(|| format!("failed to load {}", paths.global.display()))?;
  if cli.eager {
    settings.unicode_input.eager = true;
  }
  let table = settings.table(&paths)?;
  Ok((settings, table))
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbosity);

  let (settings, table) = load(&cli)?;

  match &cli.command {
    Command::List => {
      print!("{}", table.listing(&settings.unicode_input.input_config().leader));
    },
    Command::Type { keys } => {
      let mut input = UnicodeInput::new(
        Arc::new(AbbreviationStore::new(AbbreviationTable::default())),
        Default::default(),
      );
      settings.apply(&mut input, table);

      let id = DocumentId::new(NonZeroUsize::MIN);
      let mut doc = Document::new(id, Rope::new());
      let fired = keys::replay(&mut input, &mut doc, &keys::parse_keys(keys))?;
      tracing::info!(replacements = fired, cursor = doc.cursor(), "done");
      println!("{}", doc.text());
    },
    Command::GoalParams {
      file,
      line,
      character,
    } => {
      let position = LspPosition {
        line:      *line,
        character: *character,
      };
      let query = GoalQuery::prepare(Some(file.as_path()), false, position, &settings.infoview)?;
      for request in query.requests() {
        let message = json!({ "method": request.method(), "params": request.params });
        println!("{message}");
      }
    },
    Command::Infoview { file } => {
      let mut raw = String::new();
      match file {
        Some(file) => {
          raw = std::fs::read_to_string(file)
            .wrap_err_with(|| format!("failed to read {}", file.display()))?;
        },
        None => {
          std::io::stdin()
            .read_to_string(&mut raw)
            .wrap_err("failed to read stdin")?;
        },
      }
      let responses: Value = serde_json::from_str(&raw).wrap_err("invalid JSON")?;
      if !responses.is_object() {
        return Err(eyre!("expected an object with plainGoal and plainTermGoal"));
      }
      let goal = parse_plain_goal_response(responses.get("plainGoal"))?;
      let term = parse_plain_term_goal_response(responses.get("plainTermGoal"))?;
      if let Some(panel) = render_infoview(goal.as_ref(), term.as_ref(), &settings.infoview) {
        print!("{panel}");
      }
    },
  }

  Ok(())
}
