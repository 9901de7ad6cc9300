//! Keyword extraction and synonym normalization.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Alphanumeric runs of length two or more, taken from lowercased text.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]{2,}").unwrap());

/// Price ceilings phrased as "under / below / less than <amount>".
static PRICE_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:under|below|less\s+than)\s*₹?\s*(\d{2,6})\b").unwrap());

/// Filler words dropped before matching.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "do", "you", "have", "has", "is", "the", "an", "we", "are", "with", "any", "of", "in",
        "for", "to", "on", "and", "me", "can", "could", "please", "would", "like", "need", "want",
        "tell", "know", "if", "it", "this", "that", "there", "be", "at", "ave", "products",
        "what", "show", "looking", "my", "our", "your", "am", "will", "about",
    ]
    .into_iter()
    .collect()
});

/// Synonym groups mapping surface tokens onto one canonical token.
/// Many-to-one only; a token never expands into several.
const SYNONYM_GROUPS: &[(&str, &[&str])] = &[
    ("ro", &["ro", "reverse", "osmosis"]),
    ("uv", &["uv", "ultraviolet", "ultra", "violet"]),
    ("uf", &["uf", "ultrafiltration", "filtration"]),
    ("atm", &["atm", "vending", "dispenser", "coin", "operated"]),
    ("softener", &["softener", "softner", "soft"]),
    ("machine", &["machine", "unit", "system", "device"]),
    ("plant", &["plant", "treatment"]),
    ("industrial", &["industrial", "commercial", "business"]),
    ("domestic", &["domestic", "home", "household", "residential"]),
    ("purifier", &["purifier", "filter", "purification"]),
    ("lph", &["lph", "liters", "litres", "hour"]),
    ("gpd", &["gpd", "gallons", "day"]),
];

/// Tokens extracted from one user message, plus the price ceiling the
/// message stated, if any. The ceiling is a side channel separate from
/// the needs-assessment budget field: it feeds
/// `user_preferences.max_price` and overwrites any prior value.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtraction {
    pub tokens: Vec<String>,
    pub max_price: Option<u64>,
}

/// Tokenize, lowercase, and drop stopwords; pick up a price ceiling when
/// the message states one.
pub fn extract(text: &str) -> KeywordExtraction {
    let lower = text.to_lowercase();

    let tokens = WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|w| !STOPWORDS.contains(w.as_str()))
        .collect();

    let max_price = PRICE_HINT_RE
        .captures(&lower)
        .and_then(|caps| caps[1].parse().ok());

    KeywordExtraction { tokens, max_price }
}

/// Map tokens onto canonical representatives. Tokens matching no group
/// pass through unchanged; duplicates collapse, first-seen order wins.
pub fn normalize(tokens: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for token in tokens {
        let canonical = SYNONYM_GROUPS
            .iter()
            .find(|(_, group)| group.contains(&token.as_str()))
            .map(|(canonical, _)| *canonical)
            .unwrap_or(token.as_str());

        if seen.insert(canonical.to_string()) {
            normalized.push(canonical.to_string());
        }
    }

    normalized
}
