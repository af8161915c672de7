use serde_json::Value;

use crate::ai_codec_core::error::{SdkError, ValidationError};
use crate::ai_codec_types::{Context, Model, Operation};
use crate::options::compose::{ComposedSchema, PROVIDER_OPTIONS_KEY};
use crate::options::core_schema::ON_UNSUPPORTED_KEY;
use crate::options::validate::{validate, OptionSet};

/// Boolean alias accepted for `stream`.
pub const STREAMING_ALIAS_KEY: &str = "streaming";
/// Option carrying a conversation; checked but never validated as an option.
pub const CONTEXT_KEY: &str = "context";

/// Top-level options an embeddings request can carry.
pub const EMBEDDING_OPTION_KEYS: &[&str] = &["user", ON_UNSUPPORTED_KEY, PROVIDER_OPTIONS_KEY];
/// Provider options an embeddings body can carry.
pub const EMBEDDING_PROVIDER_KEYS: &[&str] = &["dimensions", "encoding_format"];

/// Output of a provider translation hook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translated {
    pub options: OptionSet,
    pub warnings: Vec<String>,
}

impl Translated {
    pub fn passthrough(options: OptionSet) -> Self {
        Self {
            options,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Remove `key`, recording `reason` when it was actually set.
    pub fn drop_option(&mut self, key: &str, reason: &str) -> Option<Value> {
        let removed = self.options.remove(key).filter(|v| !v.is_null());
        if removed.is_some() {
            self.warn(format!("`{key}` dropped: {reason}"));
        }
        removed
    }

    /// Move `from` to `to`, recording the rename. An existing `to` wins and
    /// `from` is dropped.
    pub fn rename_option(&mut self, from: &str, to: &str, reason: &str) {
        let Some(value) = self.options.remove(from).filter(|v| !v.is_null()) else {
            return;
        };
        if self.options.get(to).is_some_and(|v| !v.is_null()) {
            self.warn(format!("`{from}` dropped: `{to}` is already set ({reason})"));
        } else {
            self.options.insert(to.to_string(), value);
            self.warn(format!("`{from}` renamed to `{to}`: {reason}"));
        }
    }

    /// Remove `keys` from the `provider_options` map, one warning per key
    /// that was set.
    pub fn drop_provider_options(&mut self, keys: &[&str], reason: &str) {
        let Some(Value::Object(provider)) = self.options.get_mut(PROVIDER_OPTIONS_KEY) else {
            return;
        };
        let dropped: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|k| provider.remove(*k).is_some_and(|v| !v.is_null()))
            .collect();
        for key in dropped {
            self.warn(format!("`{PROVIDER_OPTIONS_KEY}.{key}` dropped: {reason}"));
        }
    }

    /// Drop every set option an embeddings request has no field for,
    /// including provider options outside [`EMBEDDING_PROVIDER_KEYS`].
    pub fn retain_embedding_options(&mut self) {
        let stray: Vec<String> = self
            .options
            .keys()
            .filter(|k| !EMBEDDING_OPTION_KEYS.contains(&k.as_str()))
            .cloned()
            .collect();
        for key in stray {
            self.drop_option(&key, "not used for embeddings");
        }

        let stray: Vec<String> = match self.options.get(PROVIDER_OPTIONS_KEY) {
            Some(Value::Object(provider)) => provider
                .keys()
                .filter(|k| !EMBEDDING_PROVIDER_KEYS.contains(&k.as_str()))
                .cloned()
                .collect(),
            _ => return,
        };
        let stray: Vec<&str> = stray.iter().map(String::as_str).collect();
        self.drop_provider_options(&stray, "not used for embeddings");
    }
}

/// Policy applied to translation warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnUnsupported {
    #[default]
    Warn,
    Error,
    Ignore,
}

impl OnUnsupported {
    pub fn from_options(options: &OptionSet) -> Self {
        match options.get(ON_UNSUPPORTED_KEY).and_then(Value::as_str) {
            Some("error") => OnUnsupported::Error,
            Some("ignore") => OnUnsupported::Ignore,
            _ => OnUnsupported::Warn,
        }
    }

    /// Apply the policy. `Warn` logs each warning and keeps it, `Error`
    /// fails when there is anything to report, `Ignore` discards them.
    pub fn apply(self, warnings: Vec<String>) -> Result<Vec<String>, ValidationError> {
        match self {
            OnUnsupported::Warn => {
                for w in &warnings {
                    tracing::warn!(target: "ai_codec::options", warning = %w, "unsupported option");
                }
                Ok(warnings)
            }
            OnUnsupported::Error if !warnings.is_empty() => {
                Err(ValidationError::Unsupported { warnings })
            }
            OnUnsupported::Error => Ok(warnings),
            OnUnsupported::Ignore => {
                if !warnings.is_empty() {
                    tracing::debug!(
                        target: "ai_codec::options",
                        count = warnings.len(),
                        "discarding translation warnings"
                    );
                }
                Ok(Vec::new())
            }
        }
    }
}

/// Validated, translated options ready for encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedOptions {
    pub options: OptionSet,
    /// Parsed form of the `context` option, when one was given.
    pub context: Option<Context>,
    pub warnings: Vec<String>,
}

/// Rewrite accepted aliases to their canonical keys.
pub fn normalize_aliases(options: &mut OptionSet) {
    if let Some(Value::Bool(flag)) = options.get(STREAMING_ALIAS_KEY).cloned() {
        options.remove(STREAMING_ALIAS_KEY);
        options.entry("stream").or_insert(Value::Bool(flag));
    }
}

/// Pull the `context` option out of `options` and check its shape.
pub fn take_context(options: &mut OptionSet) -> Result<Option<(Value, Context)>, SdkError> {
    let Some(raw) = options.remove(CONTEXT_KEY) else {
        return Ok(None);
    };
    if raw.is_null() {
        return Ok(None);
    }
    let context: Context = serde_json::from_value(raw.clone()).map_err(|e| {
        SdkError::invalid_parameter(format!("invalid `{CONTEXT_KEY}` option {raw}: {e}"))
    })?;
    context.validate().map_err(|e| {
        SdkError::invalid_parameter(format!("invalid `{CONTEXT_KEY}` option {raw}: {e}"))
    })?;
    Ok(Some((raw, context)))
}

/// Run the full option pipeline for one call.
///
/// Order: alias normalization, context check, validation, the provider
/// translation hook, embedding pruning, then the warning policy. The raw `context` value is put
/// back into the returned options untouched.
pub fn process<F>(
    composed: &ComposedSchema,
    operation: Operation,
    model: &Model,
    mut options: OptionSet,
    translate: F,
) -> Result<ProcessedOptions, SdkError>
where
    F: FnOnce(Operation, &Model, OptionSet) -> Result<Translated, SdkError>,
{
    normalize_aliases(&mut options);
    let context = take_context(&mut options)?;
    let validated = validate(&options, composed)?;
    let policy = OnUnsupported::from_options(&validated);

    let mut translated = translate(operation, model, validated)?;
    if operation == Operation::Embedding {
        translated.retain_embedding_options();
    }
    let Translated {
        mut options,
        warnings,
    } = translated;
    tracing::debug!(
        target: "ai_codec::options",
        provider = %model.provider,
        model = %model.name,
        operation = %operation,
        warnings = warnings.len(),
        "options translated"
    );
    let warnings = policy.apply(warnings)?;

    let context = context.map(|(raw, parsed)| {
        options.insert(CONTEXT_KEY.to_string(), raw);
        parsed
    });
    Ok(ProcessedOptions {
        options,
        context,
        warnings,
    })
}
