//! Clap command tree.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the `mediatimeline` command.
pub fn build_cli() -> Command {
    Command::new("mediatimeline")
        .about("Inspect and maintain a media timeline snapshot")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("Snapshot file (overrides the config file)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .help("TOML config file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .value_name("FILTER")
                .help("Log filter, e.g. debug or mediatimeline_store=trace"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print JSON instead of a table"),
        )
        .subcommand(Command::new("last-id").about("Print the newest record id (0 when empty)"))
        .subcommand(
            Command::new("page").about("Print one page, newest first").arg(
                Arg::new("n")
                    .required(true)
                    .value_parser(value_parser!(usize))
                    .help("Page number, starting at 1"),
            ),
        )
        .subcommand(
            Command::new("since").about("Print records newer than an id").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(value_parser!(u64))
                    .help("Exclusive lower bound"),
            ),
        )
        .subcommand(
            Command::new("get").about("Print one record").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(value_parser!(u64)),
            ),
        )
        .subcommand(
            Command::new("delete").about("Remove one record").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(value_parser!(u64)),
            ),
        )
        .subcommand(
            Command::new("import")
                .about("Upsert records from a JSON array file")
                .arg(Arg::new("file").required(true).value_name("FILE")),
        )
        .subcommand(Command::new("info").about("Show snapshot and store statistics"))
}
