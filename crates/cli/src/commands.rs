//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("roster")
        .about("Inspect and maintain a roster data directory")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("db")
                .long("db")
                .help("Data directory (default: .roster)")
                .global(true),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .help("Ephemeral in-memory roster, no disk")
                .action(ArgAction::SetTrue)
                .conflicts_with("db")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output on stderr (repeat for trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(Command::new("keys").about("List the collections present in storage"))
        .subcommand(
            Command::new("list")
                .about("Print every record of a collection")
                .arg(collection_arg()),
        )
        .subcommand(
            Command::new("get")
                .about("Print one record")
                .arg(collection_arg())
                .arg(id_arg().help("Record id")),
        )
        .subcommand(
            Command::new("save")
                .about("Insert or update a record from a JSON object")
                .arg(collection_arg())
                .arg(
                    Arg::new("record")
                        .required(true)
                        .help("JSON object, or @file to read it from a file"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete records by id")
                .arg(collection_arg())
                .arg(
                    id_arg()
                        .num_args(1..)
                        .help("One or more record ids"),
                ),
        )
        .subcommand(
            Command::new("clear")
                .about("Remove every record of a collection")
                .arg(collection_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Write a backup of every collection")
                .arg(
                    Arg::new("file")
                        .help("Output file (default: stdout)"),
                ),
        )
        .subcommand(
            Command::new("restore")
                .about("Restore collections from a backup file")
                .arg(Arg::new("file").required(true).help("Backup file"))
                .arg(
                    Arg::new("keys")
                        .long("keys")
                        .value_delimiter(',')
                        .help("Only restore these collections (comma-separated)"),
                ),
        )
}

fn collection_arg() -> Arg {
    Arg::new("collection")
        .required(true)
        .help("Collection key, e.g. students or exerciseTypes")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(clap::value_parser!(u64))
}
