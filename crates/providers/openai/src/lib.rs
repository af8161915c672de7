//! OpenAI chat completions and embeddings.

pub mod options;
pub mod provider;

pub use provider::{is_reasoning_model, OpenAIProvider};

#[cfg(test)]
#[path = "../tests/translate_tests.rs"]
mod translate_tests;
