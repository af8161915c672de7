//! Groq's OpenAI-compatible endpoint.

pub mod provider;

pub use provider::{groq_schema, GroqProvider};

#[cfg(test)]
#[path = "../tests/translate_tests.rs"]
mod translate_tests;
