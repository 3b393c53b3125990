//! User-facing output: the concrete sinks behind `puts`, plus result and
//! error rendering for the CLI and REPL.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::ParseError;
use crate::runtime::builtins::OutputSink;
use crate::runtime::value::Value;

/// Writes each emitted line to stdout; the default sink for `run` and the
/// REPL.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Collects emitted lines into a string, for tests and programmatic capture.
#[derive(Default)]
pub struct OutputBuffer {
    buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }
}

/// Prints a program's final value in green, as the CLI does after `run`.
pub fn print_result(value: &Value) {
    let mut stdout = StandardStream::stdout(color_choice());
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    println!("{}", value);
    let _ = stdout.reset();
}

/// Prints an evaluation error in the language's `ERROR:` form.
pub fn print_eval_error(error: &dyn std::fmt::Display) {
    let mut stderr = StandardStream::stderr(color_choice());
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    eprintln!("ERROR: {}", error);
    let _ = stderr.reset();
}

/// Renders a parse error as a full miette diagnostic against its source.
pub fn print_parse_error(error: ParseError, source: &str, source_name: &str) {
    let report = miette::Report::new(error)
        .with_source_code(miette::NamedSource::new(source_name, source.to_string()));
    eprintln!("{:?}", report);
}

fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
