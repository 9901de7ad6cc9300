//! Intent classification.
//!
//! Keyword-list classification into the four turn-level intents the
//! engine routes on. Educational and product signals are not exclusive;
//! a single message can carry both, so the individual predicates are
//! exposed alongside the precedence-ordered [`PrimaryIntent`].

/// Primary intent of one user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryIntent {
    Greeting,
    Farewell,
    ProductInquiry,
    Educational,
    General,
}

/// Keyword-list intent classifier.
pub struct IntentClassifier {
    greeting_keywords: &'static [&'static str],
    farewell_keywords: &'static [&'static str],
    educational_keywords: &'static [&'static str],
    product_keywords: &'static [&'static str],
}

const GREETING_KEYWORDS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
    "howdy",
    "what's up",
    "whats up",
    "sup",
    "hiya",
    "hola",
];

const FAREWELL_KEYWORDS: &[&str] = &[
    "bye",
    "goodbye",
    "see you",
    "farewell",
    "thanks",
    "thank you",
    "that's all",
    "thats all",
];

const EDUCATIONAL_KEYWORDS: &[&str] = &[
    "what is",
    "benefits of",
    "advantage",
    "disadvantage",
    "how does",
    "why",
    "explain",
    "difference",
    "comparison",
    "help",
    "information",
    "tell me about",
    "alkaline",
    "ph",
    "tds",
    "hardness",
    "chlorine",
    "purification",
    "filtration",
];

const PRODUCT_KEYWORDS: &[&str] = &[
    "show me",
    "i need",
    "i want",
    "looking for",
    "recommend",
    "suggest",
    "buy",
    "purchase",
    "price",
    "cost",
    "system",
    "purifier",
    "filter",
    "ro",
    "uv",
    "uf",
    "plant",
    "machine",
    "softener",
    "products",
];

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            greeting_keywords: GREETING_KEYWORDS,
            farewell_keywords: FAREWELL_KEYWORDS,
            educational_keywords: EDUCATIONAL_KEYWORDS,
            product_keywords: PRODUCT_KEYWORDS,
        }
    }

    /// Greeting test: exact match, exact match after stripping
    /// punctuation, or a message that opens with a greeting word.
    pub fn is_greeting(&self, text: &str) -> bool {
        let lower = text.to_lowercase().trim().to_string();

        if self.greeting_keywords.contains(&lower.as_str()) {
            return true;
        }

        let cleaned: String = lower
            .chars()
            .filter(|c| c.is_alphabetic() || c.is_whitespace())
            .collect();
        let cleaned = cleaned.trim();
        if self.greeting_keywords.contains(&cleaned) {
            return true;
        }

        self.greeting_keywords
            .iter()
            .any(|greeting| lower.starts_with(greeting))
    }

    pub fn is_farewell(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.farewell_keywords.iter().any(|k| lower.contains(k))
    }

    pub fn is_educational(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.educational_keywords.iter().any(|k| lower.contains(k))
    }

    pub fn is_product_inquiry(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.product_keywords.iter().any(|k| lower.contains(k))
    }

    /// Precedence-ordered primary intent, for routing and logging.
    pub fn classify(&self, text: &str) -> PrimaryIntent {
        if self.is_greeting(text) {
            PrimaryIntent::Greeting
        } else if self.is_farewell(text) {
            PrimaryIntent::Farewell
        } else if self.is_product_inquiry(text) {
            PrimaryIntent::ProductInquiry
        } else if self.is_educational(text) {
            PrimaryIntent::Educational
        } else {
            PrimaryIntent::General
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
