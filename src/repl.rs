//! Rill REPL (Read-Eval-Print Loop)
//!
//! Interactive shell with persistent bindings across lines.

use std::io::{self, Write};

use crate::cli::output::{self, StdoutSink};
use crate::engine::Session;
use crate::errors::RillError;
use crate::runtime::builtins::SharedOutput;
use crate::runtime::value::Value;

/// Main REPL entry point.
pub fn run_repl() {
    if atty::is(atty::Stream::Stdin) {
        println!("rill {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.");
        println!();
    }

    let mut session = Session::new(SharedOutput::new(StdoutSink));
    let mut input_buffer = String::new();

    loop {
        if atty::is(atty::Stream::Stdin) {
            if input_buffer.is_empty() {
                print!("rill> ");
            } else {
                print!("  -> ");
            }
            let _ = io::stdout().flush();
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let line = line.trim_end();

                if input_buffer.is_empty() {
                    if let Some(command) = line.strip_prefix(':') {
                        match handle_repl_command(command, &mut session) {
                            ReplCommand::Continue => continue,
                            ReplCommand::Quit => break,
                        }
                    }
                }

                if !input_buffer.is_empty() {
                    input_buffer.push('\n');
                }
                input_buffer.push_str(line);

                // Keep reading while delimiters are open; an empty line
                // forces evaluation of whatever has accumulated.
                if is_complete_input(&input_buffer) || line.is_empty() {
                    eval_and_print(&mut session, &input_buffer);
                    input_buffer.clear();
                }
            }
            Err(error) => {
                eprintln!("error reading input: {}", error);
                break;
            }
        }
    }
}

fn eval_and_print(session: &mut Session, source: &str) {
    if source.trim().is_empty() {
        return;
    }
    match session.eval_source(source) {
        Ok(Value::Null) => {}
        Ok(value) => println!("{}", value),
        Err(RillError::Parse(error)) => output::print_parse_error(error, source, "<repl>"),
        Err(error) => eprintln!("ERROR: {}", error),
    }
}

enum ReplCommand {
    Continue,
    Quit,
}

fn handle_repl_command(command: &str, session: &mut Session) -> ReplCommand {
    match command.to_ascii_lowercase().as_str() {
        "help" | "h" => {
            println!("Commands:");
            println!("  :help, :h     Show this help");
            println!("  :quit, :q     Exit the REPL");
            println!("  :clear, :c    Drop all bindings");
            println!();
            println!("Anything else is evaluated as rill source.");
            ReplCommand::Continue
        }
        "quit" | "q" => ReplCommand::Quit,
        "clear" | "c" => {
            session.reset();
            println!("Context cleared.");
            ReplCommand::Continue
        }
        other => {
            println!("Unknown command `:{}`. Type :help for help.", other);
            ReplCommand::Continue
        }
    }
}

/// Balance check over `()`, `{}` and `[]` outside string literals; used to
/// decide whether the buffered input can be parsed yet.
fn is_complete_input(input: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for ch in input.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '(' | '{' | '[' if !in_string => depth += 1,
            ')' | '}' | ']' if !in_string => depth -= 1,
            _ => {}
        }
    }

    depth <= 0 && !in_string
}
