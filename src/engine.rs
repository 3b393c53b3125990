//! Engine orchestration: source text in, final value out.

use crate::cli::output::StdoutSink;
use crate::errors::RillError;
use crate::runtime::builtins::SharedOutput;
use crate::runtime::env::{Env, Environment};
use crate::runtime::eval::Evaluator;
use crate::runtime::value::Value;
use crate::syntax;

/// Runs source with an injectable output sink and returns the program's
/// final value.
pub fn run_source_with_output(source: &str, output: SharedOutput) -> Result<Value, RillError> {
    let program = syntax::parse(source)?;
    let env = Environment::root();
    let value = Evaluator::new(output).eval_program(&program, &env)?;
    Ok(value)
}

/// Runs source and sends host output to stdout.
pub fn run_source(source: &str) -> Result<Value, RillError> {
    run_source_with_output(source, SharedOutput::new(StdoutSink))
}

/// A persistent evaluation context: the environment survives across source
/// chunks, so the REPL accumulates bindings line by line.
pub struct Session {
    env: Env,
    evaluator: Evaluator,
}

impl Session {
    pub fn new(output: SharedOutput) -> Self {
        Self {
            env: Environment::root(),
            evaluator: Evaluator::new(output),
        }
    }

    pub fn eval_source(&mut self, source: &str) -> Result<Value, RillError> {
        let program = syntax::parse(source)?;
        Ok(self.evaluator.eval_program(&program, &self.env)?)
    }

    /// Drops all accumulated bindings.
    pub fn reset(&mut self) {
        self.env = Environment::root();
    }
}
