//! CLI entry point: argument dispatch and the subcommand handlers.

use std::fs;
use std::path::Path;

use clap::Parser;

use crate::cli::args::{Command, RillArgs};
use crate::cli::output::StdoutSink;
use crate::engine;
use crate::errors::RillError;
use crate::repl;
use crate::runtime::builtins::SharedOutput;
use crate::runtime::value::Value;
use crate::syntax;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = RillArgs::parse();

    let ok = match args.command {
        Some(Command::Run { file }) => handle_run(&file),
        Some(Command::Ast { file }) => handle_ast(&file),
        Some(Command::Repl) | None => {
            repl::run_repl();
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn read_source(file: &Path) -> Option<String> {
    match fs::read_to_string(file) {
        Ok(source) => Some(source),
        Err(error) => {
            eprintln!("error: failed to read {}: {}", file.display(), error);
            None
        }
    }
}

/// Full pipeline: parse, evaluate, print the final value unless it is NULL.
fn handle_run(file: &Path) -> bool {
    let Some(source) = read_source(file) else {
        return false;
    };

    match engine::run_source_with_output(&source, SharedOutput::new(StdoutSink)) {
        Ok(Value::Null) => true,
        Ok(value) => {
            output::print_result(&value);
            true
        }
        Err(RillError::Parse(error)) => {
            output::print_parse_error(error, &source, &file.display().to_string());
            false
        }
        Err(error) => {
            output::print_eval_error(&error);
            false
        }
    }
}

/// Parses a script and pretty-prints the AST without evaluating it.
fn handle_ast(file: &Path) -> bool {
    let Some(source) = read_source(file) else {
        return false;
    };

    match syntax::parse(&source) {
        Ok(program) => {
            println!("{}", program);
            true
        }
        Err(error) => {
            output::print_parse_error(error, &source, &file.display().to_string());
            false
        }
    }
}
