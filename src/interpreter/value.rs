use std::cell::RefCell;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use rustc_hash::FxHashMap;
use crate::interpreter::ast::BlockStatement;
use crate::interpreter::environment::Environment;
use crate::interpreter::lexer::Token;
use crate::util;

pub type BuiltinFunction = fn(Vec<Value>) -> Value;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub function: BuiltinFunction,
}

/// A user-defined function closing over the environment it was created in.
pub struct Function {
    pub parameters: Rc<[Token]>,
    pub body: Rc<BlockStatement>,
    pub environment: Rc<RefCell<Environment>>,
}

/// Canonical key of a hashable value. The variant keeps keys of different types apart,
/// so `4` and `"4"` never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

pub trait Hashable {
    fn hash_key(&self) -> HashKey;
}

impl Hashable for i64 {
    fn hash_key(&self) -> HashKey {
        HashKey::Integer(*self)
    }
}

impl Hashable for bool {
    fn hash_key(&self) -> HashKey {
        HashKey::Boolean(*self)
    }
}

impl Hashable for String {
    fn hash_key(&self) -> HashKey {
        HashKey::String(self.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// Pairs keyed by [`HashKey`], iterated in first-insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hash {
    pairs: Vec<HashPair>,
    index: FxHashMap<HashKey, usize>,
}

impl Hash {
    pub fn new() -> Hash {
        Hash::default()
    }

    /// Replaces the pair stored under `key`, keeping its position, or appends a new one.
    pub fn insert(&mut self, key: HashKey, pair: HashPair) {
        match self.index.get(&key) {
            Some(&position) => self.pairs[position] = pair,
            None => {
                self.index.insert(key, self.pairs.len());
                self.pairs.push(pair);
            },
        }
    }

    pub fn get(&self, key: &HashKey) -> Option<&HashPair> {
        self.index.get(key).map(|&position| &self.pairs[position])
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HashPair> {
        self.pairs.iter()
    }
}

#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    String(String),

    Array(Rc<Vec<Value>>),
    // Shared and mutable, `set` writes through every alias
    Hash(Rc<RefCell<Hash>>),

    Function(Rc<Function>),
    Builtin(Builtin),

    Error(String),
    ReturnValue(Box<Value>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueType {
    // @formatter:off
    Integer, Boolean, Null, String,
    Array, Hash,
    Function, Builtin,
    Error, ReturnValue,
    // @formatter:on
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValueType::Integer => "INTEGER",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Null => "NULL",
            ValueType::String => "STRING",
            ValueType::Array => "ARRAY",
            ValueType::Hash => "HASH",
            ValueType::Function => "FUNCTION",
            ValueType::Builtin => "BUILTIN",
            ValueType::Error => "ERROR",
            ValueType::ReturnValue => "RETURN_VALUE",
        })
    }
}

impl From<&Value> for ValueType {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(_) => ValueType::Integer,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Null => ValueType::Null,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Hash(_) => ValueType::Hash,
            Value::Function(_) => ValueType::Function,
            Value::Builtin(_) => ValueType::Builtin,
            Value::Error(_) => ValueType::Error,
            Value::ReturnValue(_) => ValueType::ReturnValue,
        }
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        ValueType::from(self)
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(elements))
    }

    pub fn hash(hash: Hash) -> Value {
        Value::Hash(Rc::new(RefCell::new(hash)))
    }

    /// The hashable view of this value, if it has one.
    pub fn as_hashable(&self) -> Option<&dyn Hashable> {
        match self {
            Value::Integer(value) => Some(value as &dyn Hashable),
            Value::Boolean(value) => Some(value as &dyn Hashable),
            Value::String(value) => Some(value as &dyn Hashable),
            _ => None,
        }
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        self.as_hashable().map(|hashable| hashable.hash_key())
    }

    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Null => write!(f, "null"),
            Value::String(value) => write!(f, "{}", value),
            Value::Array(elements) => write!(f, "[{}]", util::join(elements.as_slice(), ", ")),
            // A hash that is already being written contains itself
            Value::Hash(hash) => match hash.try_borrow_mut() {
                Ok(hash) => write!(f, "{{{}}}", hash.iter()
                    .map(|pair| format!("{}: {}", pair.key, pair.value)).collect::<Vec<String>>()
                    .join(", ")),
                Err(_) => write!(f, "{{...}}"),
            },
            Value::Function(function) => write!(f, "fn({}) {{\n{}\n}}", function.parameters.iter()
                .map(|param| param.source()).collect::<Vec<&str>>().join(", "), function.body),
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::Error(message) => write!(f, "ERROR: {}", message),
            Value::ReturnValue(value) => write!(f, "{}", value),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(value) => write!(f, "\"{}\"", value),
            Value::Array(elements) => f.debug_list().entries(elements.iter()).finish(),
            // Functions are not expanded, their environment may contain themselves
            Value::Function(function) => write!(f, "<function fn({})>", function.parameters.len()),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Value::ReturnValue(value) => write!(f, "return {:?}", value),
            _ => write!(f, "{}", self),
        }
    }
}

/// Structural equality, used by the host and in tests. Functions and builtins are
/// equal only to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(left), Value::Integer(right)) => left == right,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Null, Value::Null) => true,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Array(left), Value::Array(right)) => left == right,
            (Value::Hash(left), Value::Hash(right)) => Rc::ptr_eq(left, right)
                || match (left.try_borrow_mut(), right.try_borrow_mut()) {
                    (Ok(left), Ok(right)) => *left == *right,
                    _ => false,
                },
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            (Value::Builtin(left), Value::Builtin(right)) => left.name == right.name,
            (Value::Error(left), Value::Error(right)) => left == right,
            (Value::ReturnValue(left), Value::ReturnValue(right)) => left == right,
            _ => false,
        }
    }
}
