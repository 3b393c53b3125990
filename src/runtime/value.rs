use std::fmt;
use std::rc::Rc;

use crate::ast::BlockStatement;
use crate::runtime::builtins::Builtin;
use crate::runtime::env::Env;

/// The singleton truth values and null. All evaluation paths that produce a
/// boolean or null go through these constants rather than building variants
/// ad hoc.
pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;

/// A runtime value. Containers are immutable `im` structures: operators and
/// built-ins that "modify" return fresh values sharing structure with the
/// originals.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    String(String),
    Array(im::Vector<Value>),
    Hash(im::HashMap<HashKey, HashPair>),
    Function(Rc<Function>),
    Builtin(Builtin),
    /// Control-flow marker carrying a `return`ed value up through enclosing
    /// blocks. Unwrapped at function-application boundary and at the top of
    /// a program; never observable from user code.
    Return(Box<Value>),
}

/// A user function: parameter names, body, and the environment captured at
/// the defining expression (lexical closure).
#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<String>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

// The captured environment is skipped: it can contain the function itself,
// and a derived impl would recurse through the cycle.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Type tag used in error messages and as the equality fast-path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Integer,
    Boolean,
    Null,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            TypeTag::Integer => "INTEGER",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Null => "NULL",
            TypeTag::String => "STRING",
            TypeTag::Array => "ARRAY",
            TypeTag::Hash => "HASH",
            TypeTag::Function => "FUNCTION",
            TypeTag::Builtin => "BUILTIN",
            TypeTag::ReturnValue => "RETURN_VALUE",
        };
        write!(f, "{}", tag)
    }
}

/// Key derived from a hashable value. Two values produce equal keys iff the
/// language's `==` would call them equal, so lookup agrees with equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

/// A stored hash entry. The original key value is preserved alongside the
/// stored value so iteration can recover it.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

impl Value {
    /// The canonical boolean singletons for a host bool.
    pub fn boolean(value: bool) -> Value {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Integer(_) => TypeTag::Integer,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Null => TypeTag::Null,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Hash(_) => TypeTag::Hash,
            Value::Function(_) => TypeTag::Function,
            Value::Builtin(_) => TypeTag::Builtin,
            Value::Return(_) => TypeTag::ReturnValue,
        }
    }

    /// Everything is truthy except FALSE and NULL.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    pub fn is_hashable(&self) -> bool {
        matches!(
            self,
            Value::Integer(_) | Value::Boolean(_) | Value::String(_)
        )
    }

    /// The hash key for this value, or None for non-hashable variants; the
    /// evaluator turns None into an `unusable as hash key` error at the
    /// offending site.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(value) => Some(HashKey::Integer(*value)),
            Value::Boolean(value) => Some(HashKey::Boolean(*value)),
            Value::String(value) => Some(HashKey::String(value.clone())),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Variant-aware equality: content comparison within a variant, never
    /// across variants. Functions compare by identity, since two closures
    /// are interchangeable only if they share body and captured frames.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Return(a), Value::Return(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
            Value::String(value) => write!(f, "{}", value),
            Value::Array(elements) => {
                let elements = elements
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{}]", elements)
            }
            Value::Hash(pairs) => {
                // im's iteration order depends on hashing; sort by key so the
                // display form is deterministic.
                let mut entries: Vec<_> = pairs.values().collect();
                entries.sort_by(|a, b| a.key.hash_key().cmp(&b.key.hash_key()));
                let entries = entries
                    .iter()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", entries)
            }
            Value::Function(function) => {
                write!(f, "fn({}) {}", function.parameters.join(", "), function.body)
            }
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::Return(inner) => write!(f, "{}", inner),
        }
    }
}
