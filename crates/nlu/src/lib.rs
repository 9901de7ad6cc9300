//! Rule-based text processing.
//!
//! Keyword extraction with stopword removal and a price-hint side
//! channel, many-to-one synonym normalization onto canonical technology
//! and category tokens, intent classification (greeting, farewell,
//! educational, product inquiry), and sort-preference detection. This is
//! deliberately a v1 rule engine, not a statistical parser; pattern
//! precedence is pinned by tests because behavior is order-dependent.

pub mod intent;
pub mod keywords;
pub mod sort;

pub use intent::{IntentClassifier, PrimaryIntent};
pub use keywords::{extract, normalize, KeywordExtraction};
pub use sort::{detect_sort_preference, SortPreference};
