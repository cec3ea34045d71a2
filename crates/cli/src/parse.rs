//! ArgMatches → Action conversion.

use clap::ArgMatches;
use mediatimeline::RecordId;
use std::path::PathBuf;

/// A parsed subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LastId,
    Page(usize),
    Since(RecordId),
    Get(RecordId),
    Delete(RecordId),
    Import(PathBuf),
    Info,
}

/// Convert clap ArgMatches into an Action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<Action, String> {
    let (sub_name, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "last-id" => Ok(Action::LastId),
        "page" => {
            let n = required::<usize>(m, "n")?;
            if n == 0 {
                return Err("page numbers start at 1".to_string());
            }
            Ok(Action::Page(n))
        }
        "since" => {
            let id = required::<u64>(m, "id")?;
            if id == 0 {
                return Err("since id must be greater than 0".to_string());
            }
            Ok(Action::Since(id))
        }
        "get" => Ok(Action::Get(required(m, "id")?)),
        "delete" => Ok(Action::Delete(required(m, "id")?)),
        "import" => Ok(Action::Import(PathBuf::from(required::<String>(m, "file")?))),
        "info" => Ok(Action::Info),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn required<T: Clone + Send + Sync + 'static>(m: &ArgMatches, name: &str) -> Result<T, String> {
    m.get_one::<T>(name)
        .cloned()
        .ok_or_else(|| format!("missing argument <{}>", name))
}
