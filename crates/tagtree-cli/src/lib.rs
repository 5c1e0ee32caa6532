//! Tagtree command line front end
//!
//! Stands in for the presentation layer: it loads trees through the
//! optimistic coordinator, computes selections locally and sends edits.

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;

pub use commands::App;
pub use config::{AppConfig, LogConfig, LogFormat};

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn tree_arg() -> Arg {
    Arg::new("tree")
        .required(true)
        .help("Tree id (the id of the document's root)")
}

/// Command line definition
#[must_use]
pub fn cli() -> Command {
    Command::new("tagtree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and edit tag tree documents")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file (default: ./tagtree.toml if present)"),
        )
        .arg(
            Arg::new("store-dir")
                .long("store-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory of JSON tree documents"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .global(true)
                .help("Log filter directive, e.g. info or tagtree_sync=debug"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Per-request timeout against the store"),
        )
        .arg(
            Arg::new("no-refetch")
                .long("no-refetch")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Skip the reconcile fetch after each edit"),
        )
        .subcommand(
            Command::new("seed")
                .about("Store a tree document (from a file or generated)")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .value_parser(value_parser!(PathBuf))
                        .conflicts_with_all(["branching", "depth", "leaves"])
                        .help("JSON document to store"),
                )
                .arg(
                    Arg::new("id")
                        .long("id")
                        .default_value("tags")
                        .help("Root id of a generated tree"),
                )
                .arg(
                    Arg::new("branching")
                        .long("branching")
                        .default_value("2")
                        .value_parser(value_parser!(usize))
                        .help("Child branches per branch"),
                )
                .arg(
                    Arg::new("depth")
                        .long("depth")
                        .default_value("2")
                        .value_parser(value_parser!(usize))
                        .help("Branch levels below the root"),
                )
                .arg(
                    Arg::new("leaves")
                        .long("leaves")
                        .default_value("2")
                        .value_parser(value_parser!(usize))
                        .help("Leaves per deepest branch"),
                ),
        )
        .subcommand(Command::new("list").about("List stored tree ids"))
        .subcommand(
            Command::new("show")
                .about("Print a tree with leaf counts")
                .arg(tree_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the document as JSON"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete nodes and their subtrees")
                .arg(tree_arg())
                .arg(
                    Arg::new("ids")
                        .required(true)
                        .num_args(1..)
                        .help("Node ids to delete"),
                ),
        )
        .subcommand(
            Command::new("update-leaf")
                .about("Merge fields into a leaf")
                .arg(tree_arg())
                .arg(Arg::new("leaf").required(true).help("Leaf id"))
                .arg(Arg::new("name").long("name").help("New display name"))
                .arg(
                    Arg::new("secondary")
                        .long("secondary")
                        .help("New secondary information"),
                )
                .arg(
                    Arg::new("training")
                        .long("training")
                        .value_parser(value_parser!(bool))
                        .help("Training flag (true or false)"),
                ),
        )
        .subcommand(
            Command::new("select")
                .about("Apply checkbox toggles and show the resulting selection")
                .arg(tree_arg())
                .arg(
                    Arg::new("check")
                        .long("check")
                        .action(ArgAction::Append)
                        .help("Check a node and its subtree (repeatable)"),
                )
                .arg(
                    Arg::new("uncheck")
                        .long("uncheck")
                        .action(ArgAction::Append)
                        .help("Uncheck a node and its subtree (repeatable)"),
                )
                .arg(
                    Arg::new("delete")
                        .long("delete")
                        .action(ArgAction::SetTrue)
                        .help("Delete the checked roots afterwards"),
                ),
        )
}
