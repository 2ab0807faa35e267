use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};
use crate::interpreter::ast::{BlockStatement, Expr, Program, Stmt};
use crate::interpreter::builtins;
use crate::interpreter::environment::Environment;
use crate::interpreter::lexer::{Token, TokenType};
use crate::interpreter::value::{Function, Hash, HashPair, Value};

/// Returns from the enclosing function if the value is an error.
macro_rules! try_value {
    ($value:expr) => {
        match $value {
            error @ Value::Error(_) => return error,
            value => value,
        }
    };
}

/// Tree-walking evaluator. Every evaluation produces exactly one [`Value`];
/// failures are `Value::Error`s and stop evaluation of the enclosing construct.
pub struct Evaluator {
    environment: Rc<RefCell<Environment>>,
}

impl Evaluator {
    pub fn new() -> Evaluator {
        Evaluator::with_environment(Environment::new_global())
    }

    pub fn with_environment(environment: Rc<RefCell<Environment>>) -> Evaluator {
        Evaluator { environment }
    }

    pub fn environment(&self) -> Rc<RefCell<Environment>> {
        Rc::clone(&self.environment)
    }

    /// Evaluates all statements in order. A top level `return` ends evaluation early
    /// with its unwrapped value.
    pub fn evaluate_program(&mut self, program: &Program) -> Value {
        let mut result = Value::Null;

        for stmt in &program.statements {
            result = match self.evaluate_statement(stmt) {
                Value::ReturnValue(value) => return *value,
                error @ Value::Error(_) => return error,
                value => value,
            };
        }

        result
    }

    // ReturnValues are kept wrapped here so they unwind through nested blocks
    fn evaluate_block(&mut self, block: &BlockStatement) -> Value {
        let mut result = Value::Null;

        for stmt in &block.statements {
            result = self.evaluate_statement(stmt);

            if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
                return result;
            }
        }

        result
    }

    fn evaluate_statement(&mut self, stmt: &Stmt) -> Value {
        match stmt {
            Stmt::Let { name, value, .. } => self.evaluate_let(name, value),
            Stmt::Return { value, .. } => match try_value!(self.evaluate_expression(value)) {
                value @ Value::ReturnValue(_) => value,
                value => Value::ReturnValue(Box::new(value)),
            },
            Stmt::Expression { expr, .. } => self.evaluate_expression(expr),
        }
    }

    fn evaluate_let(&mut self, name: &Token, value: &Expr) -> Value {
        if builtins::is_builtin(name.source()) {
            return self.error(format!("can't assign to {}, it is a builtin function", name.source()));
        }

        let value = match try_value!(self.evaluate_expression(value)) {
            // `let x = if (c) { return y; };` unwinds instead of binding
            value @ Value::ReturnValue(_) => return value,
            value => value,
        };

        trace!(name = name.source(), "binding {:?}", value);
        self.environment.borrow_mut().set(name.source().to_owned(), value);
        Value::Null
    }

    fn evaluate_expression(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::Identifier(name) => self.evaluate_identifier(name),
            Expr::IntegerLiteral { value, .. } => Value::Integer(*value),
            Expr::BooleanLiteral { value, .. } => Value::Boolean(*value),
            Expr::NullLiteral(_) => Value::Null,
            Expr::StringLiteral(token) => Value::String(token.source().to_owned()),
            Expr::Prefix { operator, right } => {
                let right = try_value!(self.evaluate_expression(right));
                self.evaluate_prefix(operator, right)
            },
            Expr::Infix { left, operator, right } => {
                let left = try_value!(self.evaluate_expression(left));
                let right = try_value!(self.evaluate_expression(right));
                self.evaluate_infix(operator, left, right)
            },
            Expr::Ternary { condition, consequence, alternative, .. } => {
                if try_value!(self.evaluate_expression(condition)).is_truthy() {
                    self.evaluate_expression(consequence)
                } else {
                    self.evaluate_expression(alternative)
                }
            },
            Expr::If { condition, consequence, alternative, .. } => {
                if try_value!(self.evaluate_expression(condition)).is_truthy() {
                    self.evaluate_block(consequence)
                } else if let Some(alternative) = alternative {
                    self.evaluate_block(alternative)
                } else {
                    Value::Null
                }
            },
            Expr::FunctionLiteral { parameters, body, .. } => Value::Function(Rc::new(Function {
                parameters: Rc::clone(parameters),
                body: Rc::clone(body),
                environment: Rc::clone(&self.environment),
            })),
            Expr::Call { function, arguments, .. } => {
                let function = try_value!(self.evaluate_expression(function));

                match self.evaluate_expressions(arguments) {
                    Ok(arguments) => self.apply_function(function, arguments),
                    Err(error) => error,
                }
            },
            Expr::ArrayLiteral { elements, .. } => match self.evaluate_expressions(elements) {
                Ok(elements) => Value::array(elements),
                Err(error) => error,
            },
            Expr::Index { left, index, .. } => {
                let left = try_value!(self.evaluate_expression(left));
                let index = try_value!(self.evaluate_expression(index));
                self.evaluate_index(left, index)
            },
            Expr::HashLiteral { pairs, .. } => self.evaluate_hash_literal(pairs),
        }
    }

    /// Evaluates left to right, stopping at the first error.
    fn evaluate_expressions(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, Value> {
        let mut values = Vec::with_capacity(exprs.len());

        for expr in exprs {
            match self.evaluate_expression(expr) {
                error @ Value::Error(_) => return Err(error),
                value => values.push(value),
            }
        }

        Ok(values)
    }

    fn evaluate_identifier(&self, name: &Token) -> Value {
        if let Some(value) = self.environment.borrow().get(name.source()) {
            return value;
        }

        match builtins::lookup(name.source()) {
            Some(builtin) => Value::Builtin(builtin),
            None => self.error(format!("identifier not found: {}", name.source())),
        }
    }

    fn evaluate_prefix(&self, operator: &Token, right: Value) -> Value {
        match (operator.token_type(), right) {
            (TokenType::Not, right) => Value::Boolean(!right.is_truthy()),
            (TokenType::Minus, Value::Integer(value)) => match value.checked_neg() {
                Some(value) => Value::Integer(value),
                None => self.error(format!("integer overflow: -{}", value)),
            },
            (_, right) => self.error(format!("unknown operator: {}{}", operator.source(), right.value_type())),
        }
    }

    fn evaluate_infix(&self, operator: &Token, left: Value, right: Value) -> Value {
        match (&left, &right) {
            (Value::Integer(left), Value::Integer(right)) => self.evaluate_integer_infix(operator, *left, *right),
            (Value::String(left), Value::String(right)) => match operator.token_type() {
                TokenType::Plus => Value::String(format!("{}{}", left, right)),
                TokenType::Equal => Value::Boolean(left == right),
                TokenType::NotEqual => Value::Boolean(left != right),
                _ => self.error(format!("unknown operator: STRING {} STRING", operator.source())),
            },
            _ if left.value_type() != right.value_type() => self.error(format!("type mismatch: {} {} {}",
                left.value_type(), operator.source(), right.value_type())),
            _ => match operator.token_type() {
                TokenType::Equal => Value::Boolean(identical(&left, &right)),
                TokenType::NotEqual => Value::Boolean(!identical(&left, &right)),
                _ => self.error(format!("unknown operator: {} {} {}",
                    left.value_type(), operator.source(), right.value_type())),
            },
        }
    }

    fn evaluate_integer_infix(&self, operator: &Token, left: i64, right: i64) -> Value {
        let result = match operator.token_type() {
            TokenType::Plus => left.checked_add(right),
            TokenType::Minus => left.checked_sub(right),
            TokenType::Multiply => left.checked_mul(right),
            TokenType::Divide if right == 0 => return self.error(String::from("division by zero")),
            TokenType::Divide => left.checked_div(right),
            TokenType::Less => return Value::Boolean(left < right),
            TokenType::Greater => return Value::Boolean(left > right),
            TokenType::Equal => return Value::Boolean(left == right),
            TokenType::NotEqual => return Value::Boolean(left != right),
            _ => return self.error(format!("unknown operator: INTEGER {} INTEGER", operator.source())),
        };

        match result {
            Some(value) => Value::Integer(value),
            None => self.error(format!("integer overflow: {} {} {}", left, operator.source(), right)),
        }
    }

    fn apply_function(&mut self, function: Value, arguments: Vec<Value>) -> Value {
        match function {
            Value::Function(function) => {
                if let Err(error) = builtins::check_arguments(&arguments, function.parameters.len()) {
                    return error;
                }

                trace!("applying fn({}) to {:?}", function.parameters.len(), arguments);

                let environment = Environment::new_with_parent(Rc::clone(&function.environment));

                for (parameter, argument) in function.parameters.iter().zip(arguments) {
                    environment.borrow_mut().set(parameter.source().to_owned(), argument);
                }

                let previous = std::mem::replace(&mut self.environment, environment);
                let result = self.evaluate_block(&function.body);
                self.environment = previous;

                match result {
                    Value::ReturnValue(value) => *value,
                    value => value,
                }
            },
            Value::Builtin(builtin) => {
                trace!("applying builtin {} to {:?}", builtin.name, arguments);
                (builtin.function)(arguments)
            },
            other => self.error(format!("not a function: {}", other.value_type())),
        }
    }

    fn evaluate_index(&self, left: Value, index: Value) -> Value {
        match (&left, &index) {
            (Value::Array(elements), Value::Integer(index)) => {
                if *index < 0 {
                    self.error(String::from("array index can't be negative"))
                } else if *index as usize >= elements.len() {
                    self.error(format!("array index out of range , maxIndex={}", elements.len() as i64 - 1))
                } else {
                    elements[*index as usize].clone()
                }
            },
            (Value::Hash(hash), _) => match index.hash_key() {
                Some(key) => {
                    let value = hash.borrow().get(&key).map(|pair| pair.value.clone());
                    value.unwrap_or(Value::Null)
                },
                None => self.error(format!("unusable as hash key: {}", index.value_type())),
            },
            _ => self.error(format!("index operator not supported: {}", left.value_type())),
        }
    }

    fn evaluate_hash_literal(&mut self, pairs: &[(Expr, Expr)]) -> Value {
        let mut hash = Hash::new();

        for (key, value) in pairs {
            let key = try_value!(self.evaluate_expression(key));

            let hash_key = match key.hash_key() {
                Some(hash_key) => hash_key,
                None => return self.error(format!("unusable as hash key: {}", key.value_type())),
            };

            let value = try_value!(self.evaluate_expression(value));
            hash.insert(hash_key, HashPair { key, value });
        }

        Value::hash(hash)
    }

    fn error(&self, message: String) -> Value {
        debug!("runtime error: {}", message);
        Value::Error(message)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

/// Equality for values that are neither integers nor strings. Booleans and null compare
/// by value; everything else compares by identity.
fn identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(left), Value::Boolean(right)) => left == right,
        (Value::Null, Value::Null) => true,
        (Value::Array(left), Value::Array(right)) => Rc::ptr_eq(left, right),
        (Value::Hash(left), Value::Hash(right)) => Rc::ptr_eq(left, right),
        (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
        (Value::Builtin(left), Value::Builtin(right)) => left.name == right.name,
        _ => false,
    }
}
