// In-memory art-history knowledge base - term-overlap search plus stored analyses

use super::{ContextDocument, ContextSearch, KnowledgeDocument, KnowledgeStore};
use crate::critique::error::CollaboratorError;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

/// Reference documents plus every analysis stored during the process lifetime
pub struct InMemoryKnowledgeBase {
    documents: RwLock<Vec<KnowledgeDocument>>,
}

impl InMemoryKnowledgeBase {
    /// Empty store
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Store seeded with introductory notes on five movements
    pub fn seeded() -> Self {
        Self {
            documents: RwLock::new(seed_documents()),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Default for InMemoryKnowledgeBase {
    fn default() -> Self {
        Self::seeded()
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// Fraction of query terms present in the document
fn overlap_score(query: &HashSet<String>, content: &str) -> f32 {
    if query.is_empty() {
        return 0.0;
    }
    let doc = terms(content);
    query.intersection(&doc).count() as f32 / query.len() as f32
}

#[async_trait]
impl ContextSearch for InMemoryKnowledgeBase {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ContextDocument>, CollaboratorError> {
        let query_terms = terms(query);
        let documents = self.documents.read().await;

        let mut hits: Vec<ContextDocument> = documents
            .iter()
            .map(|doc| ContextDocument {
                content: doc.content.clone(),
                metadata: doc.metadata.clone(),
                score: overlap_score(&query_terms, &doc.content),
            })
            .filter(|hit| hit.score > 0.0)
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);

        debug!(query_terms = query_terms.len(), hits = hits.len(), "knowledge search");
        Ok(hits)
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeBase {
    async fn store(&self, document: KnowledgeDocument) -> Result<(), CollaboratorError> {
        if document.content.trim().is_empty() {
            return Err(CollaboratorError::Storage("Refusing to store an empty document".to_string()));
        }
        self.documents.write().await.push(document);
        Ok(())
    }
}

fn seed(content: &str, metadata: serde_json::Value) -> KnowledgeDocument {
    let metadata: HashMap<String, serde_json::Value> = match metadata {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => HashMap::new(),
    };
    KnowledgeDocument {
        content: content.to_string(),
        metadata,
    }
}

fn seed_documents() -> Vec<KnowledgeDocument> {
    vec![
        seed(
            "Renaissance art (14th-17th century) emphasized humanism, perspective, and classical themes. \
             Key characteristics include realistic human figures, linear perspective, and chiaroscuro lighting techniques.",
            json!({"period": "Renaissance", "century": "14th-17th", "movements": ["High Renaissance", "Early Renaissance"]}),
        ),
        seed(
            "Baroque art (17th-18th century) featured dramatic lighting, intense emotions, and dynamic compositions. \
             Artists like Caravaggio pioneered tenebrism, while Bernini excelled in sculptural movement.",
            json!({"period": "Baroque", "century": "17th-18th", "techniques": ["tenebrism", "chiaroscuro"]}),
        ),
        seed(
            "Impressionism (late 19th century) revolutionized art with loose brushwork, light studies, and outdoor painting. \
             Monet, Renoir, and Degas captured fleeting moments and changing light conditions.",
            json!({"period": "Impressionism", "century": "19th", "techniques": ["plein air", "broken color"]}),
        ),
        seed(
            "Cubism (early 20th century) deconstructed forms into geometric shapes. \
             Picasso and Braque developed analytical and synthetic cubism, fundamentally changing perspective representation.",
            json!({"period": "Cubism", "century": "20th", "artists": ["Picasso", "Braque"]}),
        ),
        seed(
            "Abstract Expressionism (mid-20th century) emphasized spontaneous, automatic, or subconscious creation. \
             Artists like Pollock and Rothko explored pure abstraction and emotional expression.",
            json!({"period": "Abstract Expressionism", "century": "20th", "techniques": ["action painting", "color field"]}),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_ranks_by_overlap() {
        let kb = InMemoryKnowledgeBase::seeded();
        let hits = kb.search("impressionism loose brushwork monet", 5).await.unwrap();
        assert!(!hits.is_empty());
        assert_eq!(hits[0].metadata["period"], "Impressionism");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(hits.iter().all(|h| h.score > 0.0));
    }

    #[tokio::test]
    async fn test_search_limit_and_no_match() {
        let kb = InMemoryKnowledgeBase::seeded();
        let hits = kb.search("century art", 2).await.unwrap();
        assert_eq!(hits.len(), 2);

        let none = kb.search("xylophone", 5).await.unwrap();
        assert!(none.is_empty());
        assert!(kb.search("", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stored_analysis_is_searchable() {
        let kb = InMemoryKnowledgeBase::new();
        assert!(kb.is_empty().await);

        let mut metadata = HashMap::new();
        metadata.insert("type".to_string(), json!("analysis"));
        metadata.insert("artwork".to_string(), json!("The Harbor"));
        kb.store(KnowledgeDocument {
            content: "Analysis: a harbor scene dissolved into flickering light".to_string(),
            metadata,
        })
        .await
        .unwrap();

        assert_eq!(kb.len().await, 1);
        let hits = kb.search("harbor light", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata["artwork"], "The Harbor");
        assert_eq!(hits[0].score, 1.0);
    }

    #[tokio::test]
    async fn test_empty_document_rejected() {
        let kb = InMemoryKnowledgeBase::new();
        let result = kb
            .store(KnowledgeDocument {
                content: "  ".to_string(),
                metadata: HashMap::new(),
            })
            .await;
        assert!(matches!(result, Err(CollaboratorError::Storage(_))));
    }
}
