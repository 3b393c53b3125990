//! Error surface for the whole engine, one kind per phase.
//!
//! `RuntimeError` is a language-level result, not a host failure: its
//! `Display` form is the exact message an evaluation produces, and the
//! evaluator propagates it unchanged through every enclosing node.
//! `ParseError` carries a labeled span so the CLI and REPL can render a
//! caret diagnostic against the offending source.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::ast::{InfixOp, PrefixOp};
use crate::runtime::value::TypeTag;

/// Syntax-phase errors, produced by the lexer and parser.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(rill::parse::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("expected an expression, found {found}")]
    #[diagnostic(
        code(rill::parse::expression_expected),
        help("an expression starts with a literal, an identifier, a prefix operator, `(`, `[`, `{{`, `if`, `while` or `fn`")
    )]
    ExpressionExpected {
        found: String,
        #[label("no expression starts here")]
        span: SourceSpan,
    },

    #[error("illegal character `{character}`")]
    #[diagnostic(code(rill::parse::illegal_character))]
    IllegalCharacter {
        character: char,
        #[label("not part of the language")]
        span: SourceSpan,
    },

    #[error("unterminated string literal")]
    #[diagnostic(code(rill::parse::unterminated_string))]
    UnterminatedString {
        #[label("string opened here is never closed")]
        span: SourceSpan,
    },

    #[error("integer literal `{literal}` is out of range")]
    #[diagnostic(
        code(rill::parse::integer_out_of_range),
        help("integers must fit in a signed 64-bit value")
    )]
    IntegerOutOfRange {
        literal: String,
        #[label("too large")]
        span: SourceSpan,
    },
}

/// Evaluation-phase errors. These are first-class results of running a
/// program; the messages below are part of the language's contract and are
/// asserted verbatim by tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: TypeTag,
        operator: InfixOp,
        right: TypeTag,
    },

    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator { operator: PrefixOp, right: TypeTag },

    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: TypeTag,
        operator: InfixOp,
        right: TypeTag,
    },

    #[error("identifier not found: {name}")]
    IdentifierNotFound { name: String },

    #[error("unusable as hash key: {key}")]
    UnusableHashKey { key: TypeTag },

    #[error("not a function: {callee}")]
    NotAFunction { callee: String },

    #[error("index operator not supported {left}")]
    IndexNotSupported { left: TypeTag },

    #[error("division by zero")]
    DivisionByZero,

    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongArity { want: usize, got: usize },

    #[error("argument to `{builtin}` not supported, got {argument}")]
    UnsupportedArgument {
        builtin: &'static str,
        argument: TypeTag,
    },

    #[error("argument to `{builtin}` must be {expected}, got {argument}")]
    ArgumentType {
        builtin: &'static str,
        expected: TypeTag,
        argument: TypeTag,
    },

    #[error("recursion limit exceeded (maximum depth {limit})")]
    RecursionLimit { limit: usize },
}

/// Top-level error sum returned by the engine entry points.
#[derive(Debug, Error)]
pub enum RillError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] RuntimeError),
}
