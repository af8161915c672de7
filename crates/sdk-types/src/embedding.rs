use serde::{Deserialize, Serialize};

use crate::types::Usage;

/// Single embedding vector.
pub type Embedding = Vec<f32>;

/// Normalized reply of an embedding call, vectors ordered like the inputs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EmbeddingResponse {
    pub model: String,
    pub embeddings: Vec<Embedding>,
    #[serde(default)]
    pub usage: Usage,
}
