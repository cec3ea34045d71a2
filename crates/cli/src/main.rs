//! mediatimeline CLI: inspect and maintain a timeline snapshot.
//!
//! `mediatimeline [--db PATH] [--config FILE] [--json] COMMAND`
//!
//! Exit codes: 0 on success, 1 on any store or input error, 2 on usage
//! errors (reported by clap).

mod commands;
mod format;
mod parse;

use std::fs;
use std::process;

use mediatimeline::{Config, Record, SnapshotFile, Timeline};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_id, format_info, format_record, format_records, OutputMode};
use parse::{matches_to_action, Action};

fn main() {
    let matches = build_cli().get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    };

    debug!("Running {:?} against {}", action, config.database.display());

    let timeline = match Timeline::from_config(&config) {
        Ok(timeline) => timeline,
        Err(e) => {
            eprintln!("Failed to open timeline: {}", e);
            process::exit(1);
        }
    };

    match run(&timeline, action, output_mode) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    }
}

/// Config file (if given) with command-line overrides applied.
fn load_config(matches: &clap::ArgMatches) -> Result<Config, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };

    if let Some(db) = matches.get_one::<String>("db") {
        config.database = db.into();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level = level.clone();
    }
    Ok(config)
}

/// Logs go to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(timeline: &Timeline, action: Action, mode: OutputMode) -> Result<String, String> {
    match action {
        Action::LastId => Ok(format_id(timeline.last_id(), mode)),
        Action::Page(n) => Ok(format_records(&timeline.page(n), mode)),
        Action::Since(id) => Ok(format_records(&timeline.since(id), mode)),
        Action::Get(id) => timeline
            .get(id)
            .map(|record| format_record(&record, mode))
            .ok_or_else(|| format!("no record with id {}", id)),
        Action::Delete(id) => {
            let existed = timeline.get(id).is_some();
            timeline.delete(id).map_err(|e| e.to_string())?;
            Ok(if existed {
                format!("deleted {}", id)
            } else {
                format!("{} not present", id)
            })
        }
        Action::Import(path) => {
            let text = fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            let records: Vec<Record> = serde_json::from_str(&text)
                .map_err(|e| format!("invalid records in {}: {}", path.display(), e))?;
            let count = records.len();
            timeline.upsert(records).map_err(|e| e.to_string())?;
            Ok(format!(
                "imported {} records (newest {})",
                count,
                timeline.last_id()
            ))
        }
        Action::Info => {
            let snapshot = match timeline.path() {
                Some(path) => SnapshotFile::new(path)
                    .inspect()
                    .map_err(|e| e.to_string())?,
                None => None,
            };
            Ok(format_info(
                timeline.len(),
                timeline.last_id(),
                snapshot.as_ref(),
                mode,
            ))
        }
    }
}
