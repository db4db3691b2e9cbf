// Collaborators - external generation, context search and knowledge storage

pub mod memory;
pub mod ollama;

pub use memory::InMemoryKnowledgeBase;
pub use ollama::OllamaGenerator;

use super::error::CollaboratorError;
use super::types::ImageRef;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A search hit, most relevant first in any returned list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextDocument {
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub score: f32,
}

/// A document handed to the knowledge store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeDocument {
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Text (or vision, when an image is given) generation
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageRef>,
    ) -> Result<String, CollaboratorError>;
}

/// Free-text retrieval of reference material. An empty list is a valid answer.
#[async_trait]
pub trait ContextSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ContextDocument>, CollaboratorError>;
}

/// Persistence of finished analyses
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn store(&self, document: KnowledgeDocument) -> Result<(), CollaboratorError>;
}
