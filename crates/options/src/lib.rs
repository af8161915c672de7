//! Option schemas: the core option set, provider extension schemas, their
//! composition and validation, and the per-call translation pipeline.

pub mod compose;
pub mod core_schema;
pub mod pipeline;
pub mod schema;
pub mod suggest;
pub mod validate;

pub use crate::options::compose::{compose, ComposedSchema, PROVIDER_OPTIONS_KEY};
pub use crate::options::core_schema::{core_schema, ON_UNSUPPORTED_KEY};
pub use crate::options::pipeline::{
    normalize_aliases, process, OnUnsupported, ProcessedOptions, Translated, CONTEXT_KEY,
    EMBEDDING_OPTION_KEYS, EMBEDDING_PROVIDER_KEYS, STREAMING_ALIAS_KEY,
};
pub use crate::options::schema::{OptionKind, OptionSpec, Schema};
pub use crate::options::validate::{validate, OptionSet};

#[cfg(test)]
#[path = "../tests/schema_tests.rs"]
mod schema_tests;

#[cfg(test)]
#[path = "../tests/pipeline_tests.rs"]
mod pipeline_tests;
