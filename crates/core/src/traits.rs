//! Collaborator interfaces.
//!
//! The language model, the similarity retriever, and the display layer
//! are external services. The engine depends only on these traits;
//! concrete clients live in their own crates so the core pipeline can be
//! tested with mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{LlmError, RetrievalError};

/// Request payload for a text completion. Sampling parameters are the
/// implementation's concern; callers supply only the prompt content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// System prompt establishing persona and grounding constraints.
    pub system: String,
    /// User-facing prompt body.
    pub prompt: String,
    /// Optional completion cap in tokens.
    pub max_tokens: Option<u32>,
}

impl GenerateRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            max_tokens: None,
        }
    }
}

/// Text-completion service.
///
/// Implementations own their timeout and retry policy; the engine treats
/// any error as terminal for the current turn.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError>;
}

/// Optional catalog metadata carried by a retrieved document, mirroring
/// the row the document was built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A ranked document returned by the similarity retriever.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Text body of the document.
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// Semantic similarity search over the product index.
#[async_trait]
pub trait SimilarityRetriever: Send + Sync {
    /// Return up to `top_k` documents ranked by similarity to `query`.
    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, RetrievalError>;
}

/// Outbound display operations, fire-and-forget.
///
/// Failures (an image that cannot be fetched, a closed window) are the
/// sink's concern and must never surface into the conversation.
pub trait DisplaySink: Send {
    fn display_reply(&mut self, text: &str);
    fn display_image(&mut self, url: &str);
}
