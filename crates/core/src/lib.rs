//! Core traits and types for the recommendation assistant.
//!
//! Everything the individual crates need to agree on lives here: the
//! catalog `Product` row, the collaborator interfaces (language model,
//! similarity retriever, display sink), and the typed error taxonomy
//! surfaced at the turn boundary.

pub mod error;
pub mod product;
pub mod traits;

pub use error::{AgentError, LlmError, RetrievalError};
pub use product::{format_thousands, Product};
pub use traits::{
    DisplaySink, DocumentMetadata, GenerateRequest, LanguageModel, RetrievedDocument,
    SimilarityRetriever,
};
