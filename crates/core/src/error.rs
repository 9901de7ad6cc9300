//! Typed error taxonomy.
//!
//! Only two classes of failure exist at runtime: configuration problems
//! (fatal at startup) and collaborator failures (terminal for the current
//! turn). Extraction misses and empty filter results are not errors and
//! flow through ordinary return values.

use thiserror::Error;

/// Language-model collaborator failure.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (connect, timeout, malformed body).
    #[error("request failed: {0}")]
    Request(String),
    /// The API answered with a non-success status.
    #[error("api returned status {status}: {message}")]
    Api { status: u16, message: String },
    /// The completion came back empty after trimming.
    #[error("completion was empty")]
    EmptyCompletion,
}

/// Similarity-retriever collaborator failure.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Error surfaced to the caller at the turn boundary.
///
/// The caller decides how to present each class: configuration errors are
/// fatal, collaborator failures become a polite apology and the turn is
/// not recorded into conversation history.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("language model collaborator failed")]
    LanguageModel(#[from] LlmError),
    #[error("similarity retriever collaborator failed")]
    Retriever(#[from] RetrievalError),
}

impl AgentError {
    /// True when the failure came from an external collaborator rather
    /// than from configuration.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            AgentError::LanguageModel(_) | AgentError::Retriever(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_classification() {
        let err = AgentError::from(LlmError::EmptyCompletion);
        assert!(err.is_collaborator_failure());

        let err = AgentError::from(RetrievalError::Request("connection refused".into()));
        assert!(err.is_collaborator_failure());

        let err = AgentError::Config("missing key".into());
        assert!(!err.is_collaborator_failure());
    }
}
