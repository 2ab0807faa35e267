use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use crate::interpreter::value::{Builtin, BuiltinFunction, HashPair, Value};

lazy_static! {
    static ref BUILTINS: FxHashMap<&'static str, Builtin> = {
        let functions: [(&'static str, BuiltinFunction); 8] = [
            ("len", len),
            ("first", first),
            ("last", last),
            ("rest", rest),
            ("push", push),
            ("puts", puts),
            ("sputs", sputs),
            ("set", set),
        ];

        functions.into_iter()
            .map(|(name, function)| (name, Builtin { name, function }))
            .collect()
    };
}

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

pub(crate) fn check_arguments(args: &[Value], expected: usize) -> Result<(), Value> {
    if args.len() < expected {
        Err(Value::Error(format!("Too few arguments, expected {}, got {}", expected, args.len())))
    } else if args.len() > expected {
        Err(Value::Error(format!("Too many arguments, expected {}, got {}", expected, args.len())))
    } else {
        Ok(())
    }
}

macro_rules! check_arguments {
    ($args:expr, $expected:expr) => {
        if let Err(error) = check_arguments(&$args, $expected) {
            return error;
        }
    };
}

/// Returns the elements of a non-empty array argument, or the error `name` reports otherwise.
fn non_empty_array<'a>(name: &str, value: &'a Value) -> Result<&'a [Value], Value> {
    match value {
        Value::Array(elements) if elements.is_empty() =>
            Err(Value::Error(format!("Array have 0 elements , can't return `{}`", name))),
        Value::Array(elements) => Ok(elements.as_slice()),
        other => Err(Value::Error(format!("argument to `{}` must be ARRAY, got {}", name, other.value_type()))),
    }
}

fn len(args: Vec<Value>) -> Value {
    check_arguments!(args, 1);

    match &args[0] {
        Value::String(value) => Value::Integer(value.chars().count() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        other => Value::Error(format!("argument to `len` not supported, got {}", other.value_type())),
    }
}

fn first(args: Vec<Value>) -> Value {
    check_arguments!(args, 1);

    match non_empty_array("first", &args[0]) {
        Ok(elements) => elements[0].clone(),
        Err(error) => error,
    }
}

fn last(args: Vec<Value>) -> Value {
    check_arguments!(args, 1);

    match non_empty_array("last", &args[0]) {
        Ok(elements) => elements[elements.len() - 1].clone(),
        Err(error) => error,
    }
}

fn rest(args: Vec<Value>) -> Value {
    check_arguments!(args, 1);

    match non_empty_array("rest", &args[0]) {
        Ok(elements) => Value::array(elements[1..].to_vec()),
        Err(error) => error,
    }
}

fn push(args: Vec<Value>) -> Value {
    check_arguments!(args, 2);

    let mut args = args.into_iter();

    match (args.next(), args.next()) {
        (Some(Value::Array(elements)), Some(element)) => {
            let mut elements = elements.as_ref().clone();
            elements.push(element);
            Value::array(elements)
        },
        (Some(other), _) => Value::Error(format!("first argument to `push` must be ARRAY, got {}", other.value_type())),
        _ => Value::Null,
    }
}

fn puts(args: Vec<Value>) -> Value {
    for arg in &args {
        println!("{}", arg.inspect());
    }

    Value::Null
}

fn sputs(args: Vec<Value>) -> Value {
    Value::String(args.iter().map(Value::inspect).collect::<Vec<String>>().join("\n"))
}

fn set(args: Vec<Value>) -> Value {
    check_arguments!(args, 3);

    let hash = match &args[0] {
        Value::Hash(hash) => hash,
        other => return Value::Error(format!("argument to `set` must be HASH, got {}", other.value_type())),
    };

    let key = match args[1].hash_key() {
        Some(key) => key,
        None => return Value::Error(format!("unusable as hash key: {}", args[1].value_type())),
    };

    hash.borrow_mut().insert(key, HashPair { key: args[1].clone(), value: args[2].clone() });
    Value::Null
}

#[cfg(test)]
mod tests;
