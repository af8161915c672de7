//! vLLM's OpenAI-compatible server.

pub mod provider;

pub use provider::{vllm_schema, VllmProvider, GUIDED_DECODING_KEYS};

#[cfg(test)]
#[path = "../tests/translate_tests.rs"]
mod translate_tests;
