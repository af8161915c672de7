use crate::ai_codec_core::json::{insert_present, prune_null_fields, splice_absent, without_null_fields};
use serde_json::{json, Map, Value};

fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn removes_nested_null_fields_but_keeps_array_nulls() {
    let input = json!({
        "a": null,
        "b": 1,
        "c": { "d": null, "e": 2 },
        "arr": [ {"k": null, "m": 5}, null ]
    });
    let out = without_null_fields(&input);
    assert_eq!(out, json!({"b": 1, "c": {"e": 2}, "arr": [{"m": 5}, null]}));
}

#[test]
fn prune_is_a_no_op_on_scalars() {
    let mut v = json!(3);
    prune_null_fields(&mut v);
    assert_eq!(v, json!(3));
}

#[test]
fn splice_never_overwrites_and_is_idempotent() {
    let mut body = obj(json!({"model": "m", "stream_options": {"include_usage": true}}));
    splice_absent(&mut body, "model", json!("other"));
    splice_absent(&mut body, "stream_options", json!({"include_usage": false, "extra": 1}));
    splice_absent(&mut body, "top_k", json!(5));
    let once = body.clone();
    splice_absent(&mut body, "top_k", json!(9));
    splice_absent(&mut body, "stream_options", json!({"extra": 2}));

    assert_eq!(body, once);
    assert_eq!(
        Value::Object(body),
        json!({"model": "m", "stream_options": {"include_usage": true, "extra": 1}, "top_k": 5})
    );
}

#[test]
fn insert_present_skips_none_and_null() {
    let mut body = Map::new();
    insert_present(&mut body, "a", None);
    insert_present(&mut body, "b", Some(&Value::Null));
    insert_present(&mut body, "c", Some(&json!(false)));
    assert_eq!(Value::Object(body), json!({"c": false}));
}
