use serde_json::{Map, Value};

use crate::ai_codec_core::error::{Suggestion, ValidationError};
use crate::options::compose::ComposedSchema;
use crate::options::schema::{OptionKind, Schema};
use crate::options::suggest::closest_match;

/// Ordered option key → JSON value mapping.
pub type OptionSet = Map<String, Value>;

/// Validate `options` against a composed schema.
///
/// Collisions between the provider and core schemas are reported before
/// anything else. The result only holds declared keys, in schema order, with
/// defaults filled in; null values count as absent. Feeding the result back in
/// returns it unchanged.
pub fn validate(options: &OptionSet, composed: &ComposedSchema) -> Result<OptionSet, ValidationError> {
    if !composed.collisions().is_empty() {
        return Err(ValidationError::Collision {
            keys: composed.collisions().to_vec(),
        });
    }

    let schema = composed.schema();
    let unknown: Vec<&str> = options
        .keys()
        .map(String::as_str)
        .filter(|k| !schema.contains(k))
        .collect();
    if !unknown.is_empty() {
        let provider_keys = composed.provider_keys();
        let mut hints = Vec::new();
        let misplaced: Vec<String> = unknown
            .iter()
            .filter(|k| provider_keys.contains(k))
            .map(|k| k.to_string())
            .collect();
        if !misplaced.is_empty() {
            hints.push(Suggestion::NestUnderProviderOptions { keys: misplaced });
        }
        for key in unknown.iter().filter(|k| !provider_keys.contains(k)) {
            let candidates = schema.keys().chain(provider_keys.iter().copied());
            if let Some(candidate) = closest_match(key, candidates) {
                hints.push(Suggestion::DidYouMean {
                    key: key.to_string(),
                    candidate: candidate.to_string(),
                });
            }
        }
        return Err(ValidationError::UnknownOptions {
            keys: unknown.into_iter().map(str::to_string).collect(),
            hints,
        });
    }

    validate_entries(options, schema, "")
}

fn validate_entries(options: &OptionSet, schema: &Schema, prefix: &str) -> Result<OptionSet, ValidationError> {
    let mut out = OptionSet::new();
    for spec in schema.iter() {
        let path = format!("{prefix}{}", spec.key);
        match options.get(&spec.key).filter(|v| !v.is_null()) {
            Some(value) => {
                let value = check_value(&path, &spec.kind, value)?;
                out.insert(spec.key.clone(), value);
            }
            None => {
                if let Some(default) = &spec.default {
                    out.insert(spec.key.clone(), default.clone());
                } else if spec.required {
                    return Err(ValidationError::MissingRequired { key: path });
                }
            }
        }
    }
    Ok(out)
}

fn check_value(path: &str, kind: &OptionKind, value: &Value) -> Result<Value, ValidationError> {
    if !kind.accepts(value) {
        return Err(ValidationError::InvalidType {
            key: path.to_string(),
            expected: kind.to_string(),
            value: value.clone(),
        });
    }
    match (kind, value) {
        (OptionKind::Nested(inner), Value::Object(map)) => {
            let unknown: Vec<String> = map
                .keys()
                .filter(|k| !inner.contains(k))
                .map(|k| format!("{path}.{k}"))
                .collect();
            if !unknown.is_empty() {
                let hints = map
                    .keys()
                    .filter(|k| !inner.contains(k))
                    .filter_map(|k| {
                        closest_match(k, inner.keys()).map(|c| Suggestion::DidYouMean {
                            key: format!("{path}.{k}"),
                            candidate: c.to_string(),
                        })
                    })
                    .collect();
                return Err(ValidationError::UnknownOptions {
                    keys: unknown,
                    hints,
                });
            }
            Ok(Value::Object(validate_entries(map, inner, &format!("{path}."))?))
        }
        _ => Ok(value.clone()),
    }
}

