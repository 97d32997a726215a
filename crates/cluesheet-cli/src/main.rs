//! Command-line front end for a Clue-style deduction sheet.
//!
//! Reads a script of sheet commands, applies them with the configured
//! automation rules, and prints the resulting sheet.
//!
//! # Usage
//!
//! ```sh
//! cargo run -- --row-elimination --last-maybe-deduction game.txt
//! ```
//!
//! Keep a game across runs by loading and saving its state:
//!
//! ```sh
//! echo "not Rope 3" | cargo run -- --state game.json
//! ```

use std::{
    fs,
    io::{self, Read as _},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use cluesheet_core::Theme;
use cluesheet_engine::{AutoRulesConfig, Sheet, SheetConfig, SheetHistory, SheetState};
use serde::{Serialize, de::DeserializeOwned};

use self::{
    error::CliError,
    script::{Command, Line},
};

mod error;
mod render;
mod script;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeKind {
    Classic,
    Master,
}

impl From<ThemeKind> for Theme {
    fn from(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Classic => Theme::Classic,
            ThemeKind::Master => Theme::Master,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Card set to use for a new sheet.
    #[arg(long, value_name = "THEME", default_value = "classic")]
    theme: ThemeKind,

    /// Number of players, including you.
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = 6,
        value_parser = clap::value_parser!(u8).range(2..=6)
    )]
    players: u8,

    /// Mark the rest of a row `not` when a cell becomes `has`.
    #[arg(long)]
    row_elimination: bool,

    /// Resolve a number group once only one cell in it is left.
    #[arg(long)]
    last_maybe_deduction: bool,

    /// JSON file with automation rule settings.
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// JSON sheet state to load before and save after the script.
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Script to run. Reads standard input when omitted.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let mut rules: AutoRulesConfig = match &args.rules {
        Some(path) => read_json(path)?,
        None => AutoRulesConfig::default(),
    };
    rules.row_elimination |= args.row_elimination;
    rules.last_maybe_deduction |= args.last_maybe_deduction;

    let mut sheet = match &args.state {
        Some(path) if path.exists() => {
            let state: SheetState = read_json(path)?;
            log::info!("loaded sheet state from {}", path.display());
            Sheet::from_state(state)
        }
        _ => Sheet::new(SheetConfig {
            theme: args.theme.into(),
            player_count: args.players,
            rules,
        }),
    };
    if args.rules.is_some() || args.row_elimination || args.last_maybe_deduction {
        sheet.set_rules(rules);
    }

    let source = if let Some(path) = &args.script {
        fs::read_to_string(path).map_err(|source| CliError::File {
            path: path.clone(),
            source,
        })?
    } else {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(CliError::Stdin)?;
        source
    };
    let lines = script::parse_script(&source, sheet.config().theme)?;

    let mut history = SheetHistory::default();
    history.push(&sheet);
    for line in lines {
        execute(&mut sheet, &mut history, &line);
    }

    print!("{}", render::render(&sheet));

    if let Some(path) = &args.state {
        write_json(path, &sheet.to_state())?;
        log::info!("saved sheet state to {}", path.display());
    }
    Ok(())
}

fn execute(sheet: &mut Sheet, history: &mut SheetHistory, line: &Line) {
    let result = match &line.command {
        Command::SetPrimary { cell, primary } => {
            let result = sheet.set_primary(*cell, *primary);
            if let Ok(report) = &result {
                let deduced = report
                    .changes()
                    .iter()
                    .filter(|change| !change.source.is_trigger());
                for change in deduced {
                    log::info!("{:?}: {} -> {}", change.source, change.cell, change.after);
                }
            }
            result.map(drop)
        }
        Command::Number { cell, key } => sheet.toggle_number(*cell, *key).map(drop),
        Command::Bar { cell, key } => sheet.toggle_bar_color(*cell, *key).map(drop),
        Command::Clear(cell) => sheet.clear_cell(*cell).map(drop),
        Command::Public(cards) => {
            sheet.confirm_public_cards(cards);
            Ok(())
        }
        Command::Own(cards) => {
            sheet.confirm_owner_cards(cards);
            Ok(())
        }
        Command::Shown { card, player } => sheet.toggle_shown(*card, *player).map(drop),
        Command::Undo => {
            if !history.undo(sheet) {
                eprintln!("line {}: nothing to undo", line.number);
            }
            return;
        }
        Command::Redo => {
            if !history.redo(sheet) {
                eprintln!("line {}: nothing to redo", line.number);
            }
            return;
        }
        Command::Reset => {
            sheet.reset();
            Ok(())
        }
        Command::Print => {
            print!("{}", render::render(sheet));
            println!();
            return;
        }
    };

    match result {
        Ok(()) => {
            history.record(sheet);
        }
        Err(reason) => eprintln!("line {}: {reason}", line.number),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_owned(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| CliError::Json {
        path: path.to_owned(),
        source,
    })?;
    fs::write(path, text).map_err(|source| CliError::File {
        path: path.to_owned(),
        source,
    })
}
