//! Per-session conversation context.
//!
//! Tracks what has already happened in a conversation so the assistant
//! never repeats itself: products already surfaced, questions already
//! asked, preferences picked up along the way, education topics covered,
//! and a bounded turn history. All sets grow only; history evicts oldest
//! pairs first.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use aqua_agent_config::constants::formatting::HISTORY_REPLY_CHARS;

use crate::needs::NeedsAssessment;

/// Bounds for the context tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum history entries (user and bot lines both count).
    pub history_limit: usize,
    /// Prefix length for asked-question fingerprints.
    pub fingerprint_len: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            history_limit: aqua_agent_config::constants::conversation::HISTORY_LIMIT,
            fingerprint_len: aqua_agent_config::constants::conversation::QUESTION_FINGERPRINT_LEN,
        }
    }
}

/// Mutable session record of prior turns and established facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    config: ContextConfig,
    shown_products: HashSet<String>,
    asked_question_fingerprints: HashSet<String>,
    user_preferences: HashMap<String, String>,
    educational_topics_covered: HashSet<String>,
    history: VecDeque<String>,
}

impl ConversationContext {
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Append one completed turn. The bot line is truncated before
    /// recording; once the cap is exceeded the oldest user+bot pair is
    /// dropped so history never ends mid-pair.
    pub fn record_turn(&mut self, user_text: &str, bot_text: &str) {
        self.history.push_back(format!("User: {user_text}"));
        self.history
            .push_back(format!("Bot: {}", truncate_chars(bot_text, HISTORY_REPLY_CHARS)));

        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
            self.history.pop_front();
        }
    }

    /// The most recent `lines` history entries, oldest first.
    pub fn recent_history(&self, lines: usize) -> String {
        let skip = self.history.len().saturating_sub(lines);
        self.history
            .iter()
            .skip(skip)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Completed turns so far.
    pub fn turns(&self) -> usize {
        self.history.len() / 2
    }

    fn fingerprint(&self, text: &str) -> String {
        text.to_lowercase()
            .chars()
            .take(self.config.fingerprint_len)
            .collect()
    }

    /// Coarse repeat detection: two questions are "the same" iff their
    /// truncated lowercase prefixes collide. Intentionally not semantic.
    pub fn is_repeat_question(&self, text: &str) -> bool {
        self.asked_question_fingerprints
            .contains(&self.fingerprint(text))
    }

    pub fn record_question(&mut self, text: &str) {
        let fingerprint = self.fingerprint(text);
        self.asked_question_fingerprints.insert(fingerprint);
    }

    pub fn mark_shown(&mut self, product_name: &str) {
        self.shown_products.insert(product_name.to_string());
    }

    pub fn shown_products(&self) -> &HashSet<String> {
        &self.shown_products
    }

    /// Price ceiling picked up from "under/below/less than" phrasing;
    /// overwrites any earlier value.
    pub fn set_max_price(&mut self, price: u64) {
        self.user_preferences
            .insert("max_price".to_string(), price.to_string());
    }

    pub fn max_price(&self) -> Option<u64> {
        self.user_preferences
            .get("max_price")
            .and_then(|v| v.parse().ok())
    }

    pub fn add_educational_topic(&mut self, topic_id: &str) {
        self.educational_topics_covered.insert(topic_id.to_string());
    }

    pub fn educational_topics(&self) -> &HashSet<String> {
        &self.educational_topics_covered
    }

    /// One-line summary of the session for the prompt payload.
    pub fn analyze(&self, needs: &NeedsAssessment) -> String {
        let mut parts = Vec::new();

        if needs.requirements_gathered() {
            let requirements = needs.summary();
            if !requirements.is_empty() {
                parts.push(format!(
                    "Customer requirements: {}",
                    requirements[..requirements.len().min(3)].join(" | ")
                ));
            }
        } else {
            parts.push("Requirements being assessed".to_string());
        }

        if !self.shown_products.is_empty() {
            parts.push(format!("Products shown: {}", self.shown_products.len()));
        }

        if !self.educational_topics_covered.is_empty() {
            let mut topics: Vec<&String> = self.educational_topics_covered.iter().collect();
            topics.sort();
            let listed: Vec<&str> = topics.iter().take(2).map(|s| s.as_str()).collect();
            parts.push(format!("Education provided: {}", listed.join(", ")));
        }

        if parts.is_empty() {
            "Fresh conversation".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

/// Truncate on a char boundary, appending an ellipsis when cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}
