use std::sync::Arc;

use crate::options::schema::{OptionKind, OptionSpec, Schema};

/// Core key under which provider-specific options are nested.
pub const PROVIDER_OPTIONS_KEY: &str = "provider_options";

/// A core schema with a provider schema plugged into `provider_options`.
///
/// Built once per provider and shared. Collisions are recorded here and
/// reported by [`validate`](crate::options::validate::validate).
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSchema {
    schema: Arc<Schema>,
    provider: Option<Arc<Schema>>,
    collisions: Vec<String>,
}

impl ComposedSchema {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn provider_schema(&self) -> Option<&Schema> {
        self.provider.as_deref()
    }

    pub fn provider_keys(&self) -> Vec<&str> {
        self.provider
            .as_deref()
            .map(|p| p.keys().collect())
            .unwrap_or_default()
    }

    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }
}

pub fn compose(core: &Schema, provider: Option<Arc<Schema>>) -> ComposedSchema {
    let collisions: Vec<String> = provider
        .as_deref()
        .map(|p| {
            p.keys()
                .filter(|k| *k != PROVIDER_OPTIONS_KEY && core.contains(k))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let nested_kind = match &provider {
        Some(p) => OptionKind::Nested(Arc::clone(p)),
        None => OptionKind::Map,
    };
    let doc = core
        .get(PROVIDER_OPTIONS_KEY)
        .map(|s| s.doc.clone())
        .unwrap_or_default();
    let mut schema = core.clone();
    schema.insert(OptionSpec::new(PROVIDER_OPTIONS_KEY, nested_kind).doc(doc));

    ComposedSchema {
        schema: Arc::new(schema),
        provider,
        collisions,
    }
}
