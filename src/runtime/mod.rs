//! The runtime: value model, environments, evaluator, and built-ins.

pub mod builtins;
pub mod env;
pub mod eval;
pub mod value;

pub use builtins::{NullSink, OutputSink, SharedOutput};
pub use env::{Env, Environment};
pub use eval::{evaluate, Evaluator};
pub use value::Value;
