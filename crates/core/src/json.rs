use serde_json::{Map, Value};

/// Recursively remove all object fields whose value is `Value::Null`.
///
/// Null array elements are kept so indices stay stable.
pub fn prune_null_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(prune_null_fields);
        }
        Value::Array(items) => items.iter_mut().for_each(prune_null_fields),
        _ => {}
    }
}

/// Return a cloned JSON value with all object fields that have `null` values removed.
pub fn without_null_fields(value: &Value) -> Value {
    let mut cloned = value.clone();
    prune_null_fields(&mut cloned);
    cloned
}

/// Insert `value` under `key` unless the key is already present.
///
/// When both sides are objects the new entries are spliced in recursively,
/// again without replacing anything that exists. Running the same splice
/// twice leaves the target unchanged, and fields already written by the
/// encoder always win.
pub fn splice_absent(target: &mut Map<String, Value>, key: &str, value: Value) {
    match (target.get_mut(key), value) {
        (None, value) => {
            target.insert(key.to_string(), value);
        }
        (Some(Value::Object(existing)), Value::Object(incoming)) => {
            for (k, v) in incoming {
                splice_absent(existing, &k, v);
            }
        }
        (Some(_), _) => {}
    }
}

/// Splice every entry of `extra` into `target`, skipping `disallow` keys.
pub fn splice_all_absent(target: &mut Map<String, Value>, extra: &Map<String, Value>, disallow: &[&str]) {
    for (k, v) in extra {
        if disallow.contains(&k.as_str()) {
            continue;
        }
        splice_absent(target, k, v.clone());
    }
}

/// Insert `value` only when it is `Some` and not JSON null.
pub fn insert_present(target: &mut Map<String, Value>, key: &str, value: Option<&Value>) {
    if let Some(v) = value.filter(|v| !v.is_null()) {
        target.insert(key.to_string(), v.clone());
    }
}
