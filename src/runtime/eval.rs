//! The tree-walking evaluator: a recursive dispatcher over AST node kinds.
//!
//! Evaluation of any node yields `Result<Value, RuntimeError>`; the `?`
//! operator is the propagation rule, so a failing sub-expression aborts
//! every enclosing node with the same error. `return` travels as the
//! `Value::Return` wrapper instead, forwarded verbatim by blocks and
//! unwrapped only at a function-application boundary or the top of the
//! program.

use std::rc::Rc;

use crate::ast::{BlockStatement, Expression, InfixOp, PrefixOp, Program, Statement};
use crate::errors::RuntimeError;
use crate::runtime::builtins::{self, SharedOutput};
use crate::runtime::env::{Env, Environment};
use crate::runtime::value::{Function, HashPair, TypeTag, Value, NULL};

/// Default ceiling on evaluator recursion. Deeply nested AST or runaway
/// user recursion surfaces as an evaluation error instead of exhausting the
/// host stack.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Evaluates a program against a root environment, writing host output to
/// the given sink.
pub fn evaluate(
    program: &Program,
    env: &Env,
    output: SharedOutput,
) -> Result<Value, RuntimeError> {
    Evaluator::new(output).eval_program(program, env)
}

pub struct Evaluator {
    output: SharedOutput,
    max_depth: usize,
    depth: usize,
}

impl Evaluator {
    pub fn new(output: SharedOutput) -> Self {
        Self::with_max_depth(output, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(output: SharedOutput, max_depth: usize) -> Self {
        Self {
            output,
            max_depth,
            depth: 0,
        }
    }

    /// Top-level entry point. Statements run in order; a surfacing `return`
    /// ends the program with its unwrapped value, and the value of the last
    /// statement is the program's value otherwise (NULL when empty).
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Result<Value, RuntimeError> {
        let mut result = NULL;
        for statement in &program.statements {
            match self.eval_statement(statement, env)? {
                Value::Return(inner) => return Ok(*inner),
                value => result = value,
            }
        }
        Ok(result)
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Env) -> Result<Value, RuntimeError> {
        match statement {
            Statement::Let { name, value } => {
                let value = self.eval_expression(value, env)?;
                env.borrow_mut().set(name.clone(), value);
                Ok(NULL)
            }
            Statement::Return { value } => {
                let value = self.eval_expression(value, env)?;
                Ok(Value::Return(Box::new(value)))
            }
            Statement::Expression(expression) => self.eval_expression(expression, env),
            Statement::Block(block) => self.eval_block(block, env),
        }
    }

    /// Blocks forward a `Value::Return` without unwrapping it, so a nested
    /// `return` keeps travelling to the nearest function boundary.
    fn eval_block(&mut self, block: &BlockStatement, env: &Env) -> Result<Value, RuntimeError> {
        let mut result = NULL;
        for statement in &block.statements {
            result = self.eval_statement(statement, env)?;
            if matches!(result, Value::Return(_)) {
                return Ok(result);
            }
        }
        Ok(result)
    }

    fn eval_expression(
        &mut self,
        expression: &Expression,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.depth += 1;
        let result = if self.depth > self.max_depth {
            Err(RuntimeError::RecursionLimit {
                limit: self.max_depth,
            })
        } else {
            self.dispatch_expression(expression, env)
        };
        self.depth -= 1;
        result
    }

    fn dispatch_expression(
        &mut self,
        expression: &Expression,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Integer(value) => Ok(Value::Integer(*value)),
            Expression::Boolean(value) => Ok(Value::boolean(*value)),
            Expression::String(value) => Ok(Value::String(value.clone())),
            Expression::Identifier(name) => eval_identifier(name, env),
            Expression::Prefix { operator, right } => {
                let right = self.eval_expression(right, env)?;
                eval_prefix(*operator, right)
            }
            Expression::Infix {
                operator,
                left,
                right,
            } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                eval_infix(*operator, left, right)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => self.eval_if(condition, consequence, alternative.as_ref(), env),
            Expression::While { condition, body } => self.eval_while(condition, body, env),
            Expression::Function { parameters, body } => Ok(Value::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: Rc::clone(body),
                env: Rc::clone(env),
            }))),
            Expression::Call {
                function,
                arguments,
            } => {
                let callee = self.eval_expression(function, env)?;
                let arguments = self.eval_expressions(arguments, env)?;
                self.apply_function(callee, &arguments)
            }
            Expression::Array(elements) => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Value::Array(im::Vector::from(elements)))
            }
            Expression::Index { left, index } => {
                let left = self.eval_expression(left, env)?;
                let index = self.eval_expression(index, env)?;
                eval_index(left, index)
            }
            Expression::Hash(pairs) => self.eval_hash_literal(pairs, env),
        }
    }

    /// Left-to-right evaluation; the first error aborts the whole list.
    fn eval_expressions(
        &mut self,
        expressions: &[Expression],
        env: &Env,
    ) -> Result<Vec<Value>, RuntimeError> {
        expressions
            .iter()
            .map(|expression| self.eval_expression(expression, env))
            .collect()
    }

    fn eval_if(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        let condition = self.eval_expression(condition, env)?;
        if condition.is_truthy() {
            self.eval_block(consequence, env)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative, env)
        } else {
            Ok(NULL)
        }
    }

    /// The loop itself has no value: it yields NULL once the condition goes
    /// falsy. A `return` inside the body propagates out to the enclosing
    /// function.
    fn eval_while(
        &mut self,
        condition: &Expression,
        body: &BlockStatement,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        loop {
            let condition = self.eval_expression(condition, env)?;
            if !condition.is_truthy() {
                return Ok(NULL);
            }
            let result = self.eval_block(body, env)?;
            if matches!(result, Value::Return(_)) {
                return Ok(result);
            }
        }
    }

    fn eval_hash_literal(
        &mut self,
        pairs: &[(Expression, Expression)],
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        let mut hash = im::HashMap::new();
        for (key_expression, value_expression) in pairs {
            let key = self.eval_expression(key_expression, env)?;
            let hashed = key
                .hash_key()
                .ok_or_else(|| RuntimeError::UnusableHashKey {
                    key: key.type_tag(),
                })?;
            let value = self.eval_expression(value_expression, env)?;
            hash.insert(hashed, HashPair { key, value });
        }
        Ok(Value::Hash(hash))
    }

    /// Applies a callee to already-evaluated arguments.
    ///
    /// User functions run their body in a fresh frame whose parent is the
    /// *captured* environment, never the caller's; a surfacing `return` is
    /// unwrapped here.
    fn apply_function(&mut self, callee: Value, args: &[Value]) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(function) => {
                if function.parameters.len() != args.len() {
                    return Err(RuntimeError::WrongArity {
                        want: function.parameters.len(),
                        got: args.len(),
                    });
                }
                let frame = Environment::with_parent(&function.env);
                for (parameter, argument) in function.parameters.iter().zip(args) {
                    frame.borrow_mut().set(parameter.clone(), argument.clone());
                }
                let result = self.eval_block(&function.body, &frame)?;
                Ok(unwrap_return(result))
            }
            Value::Builtin(builtin) => builtin.call(args, &self.output),
            other => Err(RuntimeError::NotAFunction {
                callee: other.to_string(),
            }),
        }
    }
}

fn eval_identifier(name: &str, env: &Env) -> Result<Value, RuntimeError> {
    if let Some(value) = env.borrow().get(name) {
        return Ok(value);
    }
    if let Some(builtin) = builtins::lookup(name) {
        return Ok(Value::Builtin(builtin));
    }
    Err(RuntimeError::IdentifierNotFound {
        name: name.to_string(),
    })
}

fn eval_prefix(operator: PrefixOp, right: Value) -> Result<Value, RuntimeError> {
    match operator {
        PrefixOp::Bang => Ok(Value::boolean(!right.is_truthy())),
        PrefixOp::Minus => match right {
            Value::Integer(value) => Ok(Value::Integer(-value)),
            other => Err(RuntimeError::UnknownPrefixOperator {
                operator,
                right: other.type_tag(),
            }),
        },
    }
}

/// Infix dispatch: integer pairs and string pairs get their own operator
/// tables; `==`/`!=` fall back to variant-aware equality for everything
/// else; remaining combinations are a type mismatch (different tags) or an
/// unknown operator (same tag).
fn eval_infix(operator: InfixOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        _ => match operator {
            InfixOp::Eq => Ok(Value::boolean(left == right)),
            InfixOp::NotEq => Ok(Value::boolean(left != right)),
            _ if left.type_tag() != right.type_tag() => Err(RuntimeError::TypeMismatch {
                left: left.type_tag(),
                operator,
                right: right.type_tag(),
            }),
            _ => Err(RuntimeError::UnknownInfixOperator {
                left: left.type_tag(),
                operator,
                right: right.type_tag(),
            }),
        },
    }
}

fn eval_integer_infix(operator: InfixOp, left: i64, right: i64) -> Result<Value, RuntimeError> {
    let value = match operator {
        InfixOp::Plus => Value::Integer(left + right),
        InfixOp::Minus => Value::Integer(left - right),
        InfixOp::Asterisk => Value::Integer(left * right),
        InfixOp::Slash => {
            if right == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            // wrapping_div: i64::MIN / -1 must not trap the host.
            Value::Integer(left.wrapping_div(right))
        }
        InfixOp::Lt => Value::boolean(left < right),
        InfixOp::Gt => Value::boolean(left > right),
        InfixOp::Eq => Value::boolean(left == right),
        InfixOp::NotEq => Value::boolean(left != right),
    };
    Ok(value)
}

/// Strings support `+` only. The Both-String branch is dispatched before
/// the generic `==`/`!=` equality arm, so even those operators error here.
fn eval_string_infix(operator: InfixOp, left: &str, right: &str) -> Result<Value, RuntimeError> {
    match operator {
        InfixOp::Plus => Ok(Value::String(format!("{}{}", left, right))),
        _ => Err(RuntimeError::UnknownInfixOperator {
            left: TypeTag::String,
            operator,
            right: TypeTag::String,
        }),
    }
}

fn eval_index(left: Value, index: Value) -> Result<Value, RuntimeError> {
    match (left, index) {
        (Value::Array(elements), Value::Integer(position)) => {
            if position < 0 {
                return Ok(NULL);
            }
            Ok(elements.get(position as usize).cloned().unwrap_or(NULL))
        }
        (Value::Hash(pairs), index) => {
            let key = index
                .hash_key()
                .ok_or_else(|| RuntimeError::UnusableHashKey {
                    key: index.type_tag(),
                })?;
            Ok(pairs.get(&key).map(|pair| pair.value.clone()).unwrap_or(NULL))
        }
        (other, _) => Err(RuntimeError::IndexNotSupported {
            left: other.type_tag(),
        }),
    }
}

fn unwrap_return(value: Value) -> Value {
    match value {
        Value::Return(inner) => *inner,
        other => other,
    }
}
