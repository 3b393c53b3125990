//! Command-line arguments and subcommands, declared with clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "rill",
    version,
    about = "A small, embeddable, dynamically-typed scripting language."
)]
pub struct RillArgs {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse and evaluate a script file.
    Run {
        /// The path to the script to run.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Show the abstract syntax tree for a script.
    Ast {
        /// The path to the script to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Start the interactive shell (the default with no subcommand).
    Repl,
}
