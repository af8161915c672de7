//! OpenRouter: OpenAI-compatible chat with routing hints and app
//! attribution headers.

pub mod provider;

pub use provider::{openrouter_schema, OpenRouterProvider};

#[cfg(test)]
#[path = "../tests/provider_tests.rs"]
mod provider_tests;
