//! Centralized constants.
//!
//! Single source of truth for default values used across the crates;
//! everything here can be overridden through `Settings`.

/// Service endpoints (defaults for local development).
pub mod endpoints {
    /// Groq OpenAI-compatible API base.
    pub const GROQ_DEFAULT: &str = "https://api.groq.com/openai/v1";

    /// Similarity-retriever sidecar search endpoint.
    pub const RETRIEVER_DEFAULT: &str = "http://localhost:8900/search";
}

/// Timeouts, in seconds.
pub mod timeouts {
    /// Language-model request timeout.
    pub const LLM_REQUEST_SECS: u64 = 60;

    /// Similarity-retriever request timeout.
    pub const RETRIEVER_REQUEST_SECS: u64 = 30;
}

/// Similarity-retrieval defaults.
pub mod retrieval {
    /// Results requested from the retriever per fallback query.
    pub const TOP_K: usize = 15;

    /// Fallback hits actually consumed per turn.
    pub const FALLBACK_TAKE: usize = 2;
}

/// Conversation-shaping defaults.
pub mod conversation {
    /// Maximum history entries kept per session (user and bot lines both
    /// count, so 12 entries is 6 full turns).
    pub const HISTORY_LIMIT: usize = 12;

    /// History lines included in the prompt payload.
    pub const PROMPT_HISTORY_LINES: usize = 6;

    /// Clarifying questions asked in a single turn.
    pub const MAX_QUESTIONS_PER_TURN: usize = 2;

    /// Prefix length used to fingerprint already-asked questions.
    pub const QUESTION_FINGERPRINT_LEN: usize = 50;

    /// Filtered products surfaced per turn.
    pub const PRODUCT_DISPLAY_LIMIT: usize = 5;

    /// Products included in the prompt payload.
    pub const PROMPT_PRODUCT_LIMIT: usize = 3;

    /// Education topics included in a single reply.
    pub const EDUCATION_TOPIC_LIMIT: usize = 2;
}

/// Text-formatting limits.
pub mod formatting {
    /// Description excerpt length in a product info block, in characters.
    pub const DESCRIPTION_EXCERPT_CHARS: usize = 400;

    /// Bot reply length recorded into conversation history.
    pub const HISTORY_REPLY_CHARS: usize = 200;
}

/// Default LLM generation parameters.
pub mod generation {
    /// Default model served by Groq.
    pub const MODEL: &str = "llama-3.1-8b-instant";

    /// Sampling temperature for consultative replies.
    pub const TEMPERATURE: f32 = 0.3;
}
