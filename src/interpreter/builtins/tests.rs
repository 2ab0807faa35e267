use pretty_assertions::assert_eq;
use crate::interpreter::value::{Hash, HashKey};
use super::*;

fn call(name: &str, args: Vec<Value>) -> Value {
    let builtin = lookup(name).unwrap_or_else(|| panic!("no builtin named {}", name));
    (builtin.function)(args)
}

fn string(value: &str) -> Value {
    Value::String(String::from(value))
}

fn error(message: &str) -> Value {
    Value::Error(String::from(message))
}

#[test]
fn test_registry() {
    for name in ["len", "first", "last", "rest", "push", "puts", "sputs", "set"] {
        assert!(is_builtin(name), "{} should be a builtin", name);
        assert_eq!(Some(name), lookup(name).map(|builtin| builtin.name));
    }

    assert!(!is_builtin("print"));
    assert!(lookup("map").is_none());
}

#[test]
fn test_len() {
    assert_eq!(Value::Integer(0), call("len", vec![string("")]));
    assert_eq!(Value::Integer(4), call("len", vec![string("four")]));
    assert_eq!(Value::Integer(5), call("len", vec![string("héllo")]));
    assert_eq!(Value::Integer(2), call("len", vec![Value::array(vec![Value::Null, Value::Null])]));
    assert_eq!(error("argument to `len` not supported, got INTEGER"), call("len", vec![Value::Integer(1)]));
    assert_eq!(error("Too many arguments, expected 1, got 2"), call("len", vec![string("one"), string("two")]));
    assert_eq!(error("Too few arguments, expected 1, got 0"), call("len", vec![]));
}

#[test]
fn test_first_last_rest() {
    let array = Value::array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);

    assert_eq!(Value::Integer(1), call("first", vec![array.clone()]));
    assert_eq!(Value::Integer(3), call("last", vec![array.clone()]));
    assert_eq!(Value::array(vec![Value::Integer(2), Value::Integer(3)]), call("rest", vec![array.clone()]));
    assert_eq!(Value::array(vec![]), call("rest", vec![Value::array(vec![Value::Integer(1)])]));
}

#[test]
fn test_empty_array_is_an_error() {
    assert_eq!(error("Array have 0 elements , can't return `first`"), call("first", vec![Value::array(vec![])]));
    assert_eq!(error("Array have 0 elements , can't return `last`"), call("last", vec![Value::array(vec![])]));
    assert_eq!(error("Array have 0 elements , can't return `rest`"), call("rest", vec![Value::array(vec![])]));
}

#[test]
fn test_non_array_arguments() {
    assert_eq!(error("argument to `first` must be ARRAY, got INTEGER"), call("first", vec![Value::Integer(1)]));
    assert_eq!(error("argument to `last` must be ARRAY, got STRING"), call("last", vec![string("abc")]));
    assert_eq!(error("argument to `rest` must be ARRAY, got NULL"), call("rest", vec![Value::Null]));
    assert_eq!(error("first argument to `push` must be ARRAY, got INTEGER"), call("push", vec![Value::Integer(1), Value::Integer(1)]));
}

#[test]
fn test_push_leaves_original_untouched() {
    let original = Value::array(vec![Value::Integer(1)]);
    let pushed = call("push", vec![original.clone(), Value::Integer(2)]);

    assert_eq!(Value::array(vec![Value::Integer(1), Value::Integer(2)]), pushed);
    assert_eq!(Value::array(vec![Value::Integer(1)]), original);
    assert_eq!(error("Too few arguments, expected 2, got 1"), call("push", vec![original]));
}

#[test]
fn test_puts_and_sputs() {
    assert_eq!(Value::Null, call("puts", vec![string("printed by a test")]));
    assert_eq!(Value::Null, call("puts", vec![]));
    assert_eq!(string("1\ntrue\n[a]"), call("sputs", vec![Value::Integer(1), Value::Boolean(true), Value::array(vec![string("a")])]));
    assert_eq!(string(""), call("sputs", vec![]));
}

#[test]
fn test_set_mutates_shared_hash() {
    let hash = Value::hash(Hash::new());

    assert_eq!(Value::Null, call("set", vec![hash.clone(), string("a"), Value::Integer(1)]));
    assert_eq!(Value::Null, call("set", vec![hash.clone(), string("a"), Value::Integer(2)]));

    match &hash {
        Value::Hash(hash) => {
            let hash = hash.borrow();
            assert_eq!(1, hash.len());
            assert_eq!(Some(&Value::Integer(2)), hash.get(&HashKey::String(String::from("a"))).map(|pair| &pair.value));
        },
        other => panic!("expected a hash, got {:?}", other),
    }
}

#[test]
fn test_set_errors() {
    let hash = Value::hash(Hash::new());

    assert_eq!(error("argument to `set` must be HASH, got ARRAY"), call("set", vec![Value::array(vec![]), Value::Integer(1), Value::Integer(1)]));
    assert_eq!(error("unusable as hash key: ARRAY"), call("set", vec![hash.clone(), Value::array(vec![]), Value::Integer(1)]));
    assert_eq!(error("Too few arguments, expected 3, got 2"), call("set", vec![hash, Value::Integer(1)]));
}
