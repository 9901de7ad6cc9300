//! Sort-preference detection.
//!
//! Result order is catalog row order unless the customer's wording asks
//! for something else; the filter engine applies these as a stable,
//! single-key sort.

/// How to order recommended products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPreference {
    PriceAscending,
    PriceDescending,
    Alphabetical,
}

const DESCENDING_WORDS: &[&str] = &["expensive", "premium", "costly", "high-end", "high end"];
const ASCENDING_WORDS: &[&str] = &["cheap", "cheapest", "affordable", "economical", "low cost", "budget friendly"];
const ALPHABETICAL_WORDS: &[&str] = &["popular", "best", "top rated", "best selling"];

/// Detect an explicit sort request in the message, if any.
pub fn detect_sort_preference(text: &str) -> Option<SortPreference> {
    let lower = text.to_lowercase();

    if DESCENDING_WORDS.iter().any(|w| lower.contains(w)) {
        Some(SortPreference::PriceDescending)
    } else if ASCENDING_WORDS.iter().any(|w| lower.contains(w)) {
        Some(SortPreference::PriceAscending)
    } else if ALPHABETICAL_WORDS.iter().any(|w| lower.contains(w)) {
        Some(SortPreference::Alphabetical)
    } else {
        None
    }
}
