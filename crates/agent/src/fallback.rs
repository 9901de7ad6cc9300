//! Fallback retrieval.
//!
//! When the layered filter finds nothing, the raw query goes to the
//! external similarity retriever. Every candidate is re-confirmed
//! against the catalog before it may be shown (anti-hallucination
//! guard); candidates the catalog does not know are discarded, not
//! repaired. If nothing survives, the turn reports "no matching
//! products" rather than surfacing a degraded set.

use std::sync::Arc;

use aqua_agent_catalog::CatalogStore;
use aqua_agent_config::RetrievalSettings;
use aqua_agent_core::{Product, RetrievalError, SimilarityRetriever};

/// One accepted fallback candidate. `product` is the validated catalog
/// row when the candidate could be resolved; `content` is the
/// retriever's own text body for looser configurations.
#[derive(Debug)]
pub struct FallbackHit<'a> {
    pub product: Option<&'a Product>,
    pub content: String,
}

/// Adapter in front of the similarity retriever.
pub struct FallbackRetriever {
    retriever: Arc<dyn SimilarityRetriever>,
    top_k: usize,
    take: usize,
    validate: bool,
}

impl FallbackRetriever {
    pub fn new(retriever: Arc<dyn SimilarityRetriever>, settings: &RetrievalSettings) -> Self {
        Self {
            retriever,
            top_k: settings.top_k,
            take: settings.take,
            validate: settings.validate_results,
        }
    }

    /// Query the retriever and keep the first `take` candidates that
    /// pass validation. Candidates without a resolvable catalog name are
    /// skipped when validation is on.
    pub async fn retrieve<'a>(
        &self,
        query: &str,
        catalog: &'a CatalogStore,
    ) -> Result<Vec<FallbackHit<'a>>, RetrievalError> {
        let documents = self.retriever.search(query, self.top_k).await?;
        tracing::debug!(candidates = documents.len(), "fallback retrieval returned");

        let mut hits = Vec::new();
        for document in documents {
            let product = document
                .metadata
                .name
                .as_deref()
                .and_then(|name| catalog.find_by_name(name));

            if self.validate && product.is_none() {
                tracing::debug!(
                    name = ?document.metadata.name,
                    "discarding fallback candidate absent from catalog"
                );
                continue;
            }

            hits.push(FallbackHit {
                product,
                content: document.content,
            });
            if hits.len() >= self.take {
                break;
            }
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use aqua_agent_core::{DocumentMetadata, RetrievedDocument};

    struct StubRetriever {
        documents: Vec<RetrievedDocument>,
    }

    #[async_trait]
    impl SimilarityRetriever for StubRetriever {
        async fn search(
            &self,
            _query: &str,
            _top_k: usize,
        ) -> Result<Vec<RetrievedDocument>, RetrievalError> {
            Ok(self.documents.clone())
        }
    }

    fn document(name: Option<&str>, content: &str) -> RetrievedDocument {
        RetrievedDocument {
            content: content.to_string(),
            metadata: DocumentMetadata {
                name: name.map(str::to_string),
                ..Default::default()
            },
        }
    }

    fn catalog() -> CatalogStore {
        CatalogStore::from_products(vec![Product {
            name: "Aquapure Home RO".into(),
            regular_price: 9500,
            ..Default::default()
        }])
    }

    #[tokio::test]
    async fn test_validation_discards_unknown_names() {
        let retriever = Arc::new(StubRetriever {
            documents: vec![
                document(Some("Imaginary Purifier 3000"), "made up"),
                document(Some("Aquapure Home RO"), "real product text"),
            ],
        });
        let fallback = FallbackRetriever::new(retriever, &RetrievalSettings::default());

        let catalog = catalog();
        let hits = fallback.retrieve("cheap purifier", &catalog).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product.unwrap().name, "Aquapure Home RO");
    }

    #[tokio::test]
    async fn test_nothing_surviving_yields_empty() {
        let retriever = Arc::new(StubRetriever {
            documents: vec![document(Some("Imaginary Purifier 3000"), "made up")],
        });
        let fallback = FallbackRetriever::new(retriever, &RetrievalSettings::default());

        let catalog = catalog();
        let hits = fallback.retrieve("anything", &catalog).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_loose_mode_keeps_raw_documents() {
        let retriever = Arc::new(StubRetriever {
            documents: vec![document(None, "raw retriever text")],
        });
        let settings = RetrievalSettings {
            validate_results: false,
            ..Default::default()
        };
        let fallback = FallbackRetriever::new(retriever, &settings);

        let catalog = catalog();
        let hits = fallback.retrieve("anything", &catalog).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].product.is_none());
        assert_eq!(hits[0].content, "raw retriever text");
    }

    #[tokio::test]
    async fn test_take_cap_applies_after_validation() {
        let retriever = Arc::new(StubRetriever {
            documents: vec![
                document(Some("Imaginary A"), "a"),
                document(Some("Imaginary B"), "b"),
                document(Some("Aquapure Home RO"), "real"),
                document(Some("Aquapure Home RO"), "real again"),
                document(Some("Aquapure Home RO"), "never reached"),
            ],
        });
        let settings = RetrievalSettings {
            take: 2,
            ..Default::default()
        };
        let fallback = FallbackRetriever::new(retriever, &settings);

        let catalog = catalog();
        let hits = fallback.retrieve("anything", &catalog).await.unwrap();
        assert_eq!(hits.len(), 2);
    }
}
