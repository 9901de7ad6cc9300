//! Requirement extraction from free text.
//!
//! Rule-based scanning of one user message into the needs assessment.
//! Every rule is independent and evaluated every turn; a miss leaves the
//! corresponding field untouched and extraction never fails. Budget
//! patterns are tried in a fixed priority order and the first match
//! stops evaluation - behavior is order-dependent, so the order is
//! pinned by tests.

use regex::Regex;

use crate::needs::{BudgetRange, CapacityNeed, Concern, NeedsAssessment, UsageType, WaterSource};

const DOMESTIC_WORDS: &[&str] = &["home", "house", "family", "domestic", "residential"];
const COMMERCIAL_WORDS: &[&str] = &["office", "commercial", "business", "company"];
const INDUSTRIAL_WORDS: &[&str] = &["factory", "industrial", "plant", "manufacturing"];

const SMALL_CAPACITY_PHRASES: &[&str] = &["small family", "2-3 people", "few people"];
const LARGE_CAPACITY_PHRASES: &[&str] = &["large family", "5-6 people", "big family"];
const OFFICE_CAPACITY_PHRASES: &[&str] = &["office", "50 people", "100 people"];

const BOREWELL_WORDS: &[&str] = &["borewell", "bore well", "groundwater", "well water"];
const MUNICIPAL_WORDS: &[&str] = &["municipal", "corporation", "tap water"];
const TANKER_WORDS: &[&str] = &["tanker", "tank water", "delivered water"];

const TASTE_WORDS: &[&str] = &["taste", "bad taste", "bitter"];
const HARDNESS_WORDS: &[&str] = &["hard water", "scale", "soap"];
const HIGH_TDS_WORDS: &[&str] = &["high tds", "tds", "dissolved solids"];
const BACTERIAL_WORDS: &[&str] = &["bacteria", "contamination", "infection"];
const CHLORINE_WORDS: &[&str] = &["chlorine", "chemical smell"];

/// Markers that turn a budget amount into a ±20% band.
const APPROX_MARKERS: &[&str] = &["around", "approximately", "approx", "roughly", "about"];

/// Rule-based requirement extractor.
pub struct RequirementExtractor {
    /// Budget patterns in priority order; first match wins.
    budget_patterns: Vec<Regex>,
    /// Household/headcount sizes, e.g. "family of 4", "6 people".
    household_pattern: Regex,
    headcount_pattern: Regex,
}

impl RequirementExtractor {
    pub fn new() -> Self {
        Self {
            budget_patterns: Self::build_budget_patterns(),
            household_pattern: Regex::new(r"(?:family|house(?:hold)?)\s+of\s+(\d{1,2})\b")
                .unwrap(),
            headcount_pattern: Regex::new(r"\b(\d{1,3})\s*(?:people|persons|members)\b").unwrap(),
        }
    }

    /// Amounts are restricted to 4-6 digits so small counts ("2 people")
    /// and oversized numbers never read as budgets. `\D*?` keeps the gap
    /// between the cue word and the amount free of other digits.
    fn build_budget_patterns() -> Vec<Regex> {
        vec![
            Regex::new(r"budget\D*?(\d{4,6})\b").unwrap(),
            Regex::new(r"under\s*₹?\s*(\d{4,6})\b").unwrap(),
            Regex::new(r"below\s*₹?\s*(\d{4,6})\b").unwrap(),
            Regex::new(r"₹\s*(\d{4,6})\b").unwrap(),
            Regex::new(r"price\D*?(\d{4,6})\b").unwrap(),
            Regex::new(r"cost\D*?(\d{4,6})\b").unwrap(),
        ]
    }

    /// Scan one message and fold everything it states into `needs`.
    /// Re-running on the same text is idempotent: single-valued fields
    /// are overwritten with the same value, concerns are a set.
    pub fn extract(&self, text: &str, needs: &mut NeedsAssessment) {
        let lower = text.to_lowercase();

        if let Some(usage) = self.extract_usage_type(&lower) {
            needs.set_usage_type(usage);
        }
        if let Some(capacity) = self.extract_capacity(&lower) {
            needs.set_capacity_needed(capacity);
        }
        if let Some(budget) = self.extract_budget(&lower) {
            needs.set_budget_range(budget);
        }
        if let Some(source) = self.extract_water_source(&lower) {
            needs.set_water_source(source);
        }
        for concern in self.extract_concerns(&lower) {
            needs.add_concern(concern);
        }
    }

    /// First matching keyword family wins.
    pub fn extract_usage_type(&self, lower: &str) -> Option<UsageType> {
        if contains_any(lower, DOMESTIC_WORDS) {
            Some(UsageType::Domestic)
        } else if contains_any(lower, COMMERCIAL_WORDS) {
            Some(UsageType::Commercial)
        } else if contains_any(lower, INDUSTRIAL_WORDS) {
            Some(UsageType::Industrial)
        } else {
            None
        }
    }

    /// Capacity from stock phrases, or from an explicit headcount:
    /// up to 4 people reads as small, 5-19 as large, 20+ as office.
    pub fn extract_capacity(&self, lower: &str) -> Option<CapacityNeed> {
        if contains_any(lower, SMALL_CAPACITY_PHRASES) {
            return Some(CapacityNeed::Small);
        }
        if contains_any(lower, LARGE_CAPACITY_PHRASES) {
            return Some(CapacityNeed::Large);
        }
        if contains_any(lower, OFFICE_CAPACITY_PHRASES) {
            return Some(CapacityNeed::Office);
        }

        let count = self
            .household_pattern
            .captures(lower)
            .or_else(|| self.headcount_pattern.captures(lower))
            .and_then(|caps| caps[1].parse::<u32>().ok())?;

        match count {
            0 => None,
            1..=4 => Some(CapacityNeed::Small),
            5..=19 => Some(CapacityNeed::Large),
            _ => Some(CapacityNeed::Office),
        }
    }

    /// First budget pattern that matches extracts the amount and stops.
    pub fn extract_budget(&self, lower: &str) -> Option<BudgetRange> {
        for pattern in &self.budget_patterns {
            if let Some(caps) = pattern.captures(lower) {
                if let Ok(amount) = caps[1].parse::<u64>() {
                    let budget = if contains_any(lower, APPROX_MARKERS) {
                        BudgetRange::around(amount)
                    } else {
                        BudgetRange::upper(amount)
                    };
                    tracing::debug!(amount, approximate = budget.min.is_some(), "budget extracted");
                    return Some(budget);
                }
            }
        }
        None
    }

    pub fn extract_water_source(&self, lower: &str) -> Option<WaterSource> {
        if contains_any(lower, BOREWELL_WORDS) {
            Some(WaterSource::Borewell)
        } else if contains_any(lower, MUNICIPAL_WORDS) {
            Some(WaterSource::Municipal)
        } else if contains_any(lower, TANKER_WORDS) {
            Some(WaterSource::Tanker)
        } else {
            None
        }
    }

    /// ALL matching concern tags, not just the first.
    pub fn extract_concerns(&self, lower: &str) -> Vec<Concern> {
        let families: [(&[&str], Concern); 5] = [
            (TASTE_WORDS, Concern::Taste),
            (HARDNESS_WORDS, Concern::Hardness),
            (HIGH_TDS_WORDS, Concern::HighTds),
            (BACTERIAL_WORDS, Concern::Bacterial),
            (CHLORINE_WORDS, Concern::Chlorine),
        ];

        families
            .into_iter()
            .filter(|(words, _)| contains_any(lower, words))
            .map(|(_, concern)| concern)
            .collect()
    }
}

impl Default for RequirementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
