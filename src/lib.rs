//! Rill: a small, embeddable, dynamically-typed scripting language.
//!
//! The pipeline is `syntax` (source → AST) followed by `runtime`
//! (AST + environment → value). `engine` ties the two together; `cli` and
//! `repl` are the user-facing drivers.

pub mod ast;
pub mod cli;
pub mod engine;
pub mod errors;
pub mod repl;
pub mod runtime;
pub mod syntax;

pub use errors::{ParseError, RillError, RuntimeError};
pub use runtime::builtins::{NullSink, OutputSink, SharedOutput};
pub use runtime::env::{Env, Environment};
pub use runtime::eval::{evaluate, Evaluator};
pub use runtime::value::Value;
