//! # Built-in functions
//!
//! Host-provided callables reachable from user code by bare name. The
//! evaluator consults this table only after the lexical environment, so a
//! user `let` shadows any built-in.
//!
//! Two calling conventions exist, chosen at registration:
//!
//! - **Pure**: operates on its argument values alone (`len`, `first`, ...).
//! - **Host**: additionally talks to the host output sink (`puts`).
//!
//! All arity and argument-type faults are ordinary evaluation errors; a
//! built-in never panics on bad user input.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use once_cell::sync::Lazy;

use crate::errors::RuntimeError;
use crate::runtime::value::{TypeTag, Value, NULL};

// ============================================================================
// OUTPUT SINK
// ============================================================================

/// Line-oriented sink for host output; one `emit` call is one line. Keeps
/// `puts` testable and injectable.
pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// A sink that discards everything, for silent evaluation.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str) {}
}

/// Shared, mutable handle to an output sink, cloneable across the evaluator
/// and built-ins.
#[derive(Clone)]
pub struct SharedOutput(Rc<RefCell<dyn OutputSink>>);

impl SharedOutput {
    pub fn new<T: OutputSink + 'static>(sink: T) -> Self {
        SharedOutput(Rc::new(RefCell::new(sink)))
    }

    pub fn emit(&self, text: &str) {
        self.0.borrow_mut().emit(text);
    }
}

// ============================================================================
// BUILT-IN REPRESENTATION
// ============================================================================

pub type PureBuiltinFn = fn(&[Value]) -> Result<Value, RuntimeError>;
pub type HostBuiltinFn = fn(&[Value], &SharedOutput) -> Result<Value, RuntimeError>;

#[derive(Clone, Copy)]
pub enum BuiltinFn {
    Pure(PureBuiltinFn),
    Host(HostBuiltinFn),
}

/// A named built-in as it appears inside a `Value`.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: BuiltinFn,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value], output: &SharedOutput) -> Result<Value, RuntimeError> {
        match self.func {
            BuiltinFn::Pure(func) => func(args),
            BuiltinFn::Host(func) => func(args, output),
        }
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Builtin) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Name table for built-ins, inspectable at runtime.
#[derive(Default)]
pub struct BuiltinRegistry {
    builtins: HashMap<&'static str, Builtin>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, func: BuiltinFn) {
        self.builtins.insert(name, Builtin { name, func });
    }

    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.builtins.get(name).copied()
    }

    pub fn has(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.builtins.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }
}

/// The process-wide table: initialized once, immutable thereafter.
static BUILTINS: Lazy<BuiltinRegistry> = Lazy::new(|| {
    let mut registry = BuiltinRegistry::new();
    register_std_builtins(&mut registry);
    registry
});

/// Looks up a built-in by name in the global table.
pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name)
}

/// Registers the standard built-ins with the given registry.
pub fn register_std_builtins(registry: &mut BuiltinRegistry) {
    registry.register("len", BuiltinFn::Pure(BUILTIN_LEN));
    registry.register("first", BuiltinFn::Pure(BUILTIN_FIRST));
    registry.register("last", BuiltinFn::Pure(BUILTIN_LAST));
    registry.register("rest", BuiltinFn::Pure(BUILTIN_REST));
    registry.register("push", BuiltinFn::Pure(BUILTIN_PUSH));
    registry.register("puts", BuiltinFn::Host(BUILTIN_PUTS));
}

// ============================================================================
// STANDARD BUILT-INS
// ============================================================================

fn expect_arity(args: &[Value], want: usize) -> Result<(), RuntimeError> {
    if args.len() != want {
        return Err(RuntimeError::WrongArity {
            want,
            got: args.len(),
        });
    }
    Ok(())
}

fn expect_array<'a>(
    builtin: &'static str,
    value: &'a Value,
) -> Result<&'a im::Vector<Value>, RuntimeError> {
    match value {
        Value::Array(elements) => Ok(elements),
        other => Err(RuntimeError::ArgumentType {
            builtin,
            expected: TypeTag::Array,
            argument: other.type_tag(),
        }),
    }
}

/// `len(x)`: element count of an Array or byte length of a String.
pub const BUILTIN_LEN: PureBuiltinFn = |args| {
    expect_arity(args, 1)?;
    match &args[0] {
        Value::String(value) => Ok(Value::Integer(value.len() as i64)),
        Value::Array(elements) => Ok(Value::Integer(elements.len() as i64)),
        other => Err(RuntimeError::UnsupportedArgument {
            builtin: "len",
            argument: other.type_tag(),
        }),
    }
};

/// `first(array)`: first element, or NULL when empty.
pub const BUILTIN_FIRST: PureBuiltinFn = |args| {
    expect_arity(args, 1)?;
    let elements = expect_array("first", &args[0])?;
    Ok(elements.front().cloned().unwrap_or(NULL))
};

/// `last(array)`: last element, or NULL when empty.
pub const BUILTIN_LAST: PureBuiltinFn = |args| {
    expect_arity(args, 1)?;
    let elements = expect_array("last", &args[0])?;
    Ok(elements.back().cloned().unwrap_or(NULL))
};

/// `rest(array)`: all but the first element as a new Array, or NULL when
/// empty.
pub const BUILTIN_REST: PureBuiltinFn = |args| {
    expect_arity(args, 1)?;
    let elements = expect_array("rest", &args[0])?;
    if elements.is_empty() {
        return Ok(NULL);
    }
    Ok(Value::Array(elements.skip(1)))
};

/// `push(array, value)`: new Array with the value appended; the original is
/// untouched.
pub const BUILTIN_PUSH: PureBuiltinFn = |args| {
    expect_arity(args, 2)?;
    let elements = expect_array("push", &args[0])?;
    let mut pushed = elements.clone();
    pushed.push_back(args[1].clone());
    Ok(Value::Array(pushed))
};

/// `puts(...)`: writes each argument's display form as one line to the host
/// sink; any arity; returns NULL.
pub const BUILTIN_PUTS: HostBuiltinFn = |args, output| {
    for arg in args {
        output.emit(&arg.to_string());
    }
    Ok(NULL)
};
