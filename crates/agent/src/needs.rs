//! Customer needs-assessment record.
//!
//! One instance per session, mutated incrementally by the requirement
//! extractor on every turn. Fields are single-valued except for the
//! concern set; `requirements_gathered` only ever moves false → true
//! within a session - there is deliberately no reset operation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use aqua_agent_core::format_thousands;

/// Where the system will be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    Domestic,
    Commercial,
    Industrial,
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageType::Domestic => write!(f, "domestic"),
            UsageType::Commercial => write!(f, "commercial"),
            UsageType::Industrial => write!(f, "industrial"),
        }
    }
}

/// Rough capacity class inferred from household or office size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityNeed {
    Small,
    Large,
    Office,
}

impl fmt::Display for CapacityNeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityNeed::Small => write!(f, "small"),
            CapacityNeed::Large => write!(f, "large"),
            CapacityNeed::Office => write!(f, "office"),
        }
    }
}

/// Supply the customer's water comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterSource {
    Borewell,
    Municipal,
    Tanker,
}

impl fmt::Display for WaterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterSource::Borewell => write!(f, "borewell"),
            WaterSource::Municipal => write!(f, "municipal"),
            WaterSource::Tanker => write!(f, "tanker"),
        }
    }
}

/// Water-quality concern tags. Ordered so the set renders
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    Taste,
    Hardness,
    HighTds,
    Bacterial,
    Chlorine,
}

impl Concern {
    /// Human-readable tag used in summaries and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Concern::Taste => "taste issues",
            Concern::Hardness => "water hardness",
            Concern::HighTds => "high TDS",
            Concern::Bacterial => "bacterial contamination",
            Concern::Chlorine => "chlorine/chemicals",
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Budget stated by the customer: an upper bound, optionally with a
/// lower bound when the amount was approximate ("around 12000").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub max: u64,
    pub min: Option<u64>,
}

impl BudgetRange {
    /// Exact upper bound.
    pub fn upper(max: u64) -> Self {
        Self { max, min: None }
    }

    /// ±20% band around an approximate amount.
    pub fn around(amount: u64) -> Self {
        Self {
            max: amount + amount / 5,
            min: Some(amount - amount / 5),
        }
    }
}

/// Structured record of customer requirements inferred from conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeedsAssessment {
    usage_type: Option<UsageType>,
    capacity_needed: Option<CapacityNeed>,
    budget_range: Option<BudgetRange>,
    water_source: Option<WaterSource>,
    specific_concerns: BTreeSet<Concern>,
    requirements_gathered: bool,
}

impl NeedsAssessment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage_type(&self) -> Option<UsageType> {
        self.usage_type
    }

    pub fn capacity_needed(&self) -> Option<CapacityNeed> {
        self.capacity_needed
    }

    pub fn budget_range(&self) -> Option<BudgetRange> {
        self.budget_range
    }

    pub fn water_source(&self) -> Option<WaterSource> {
        self.water_source
    }

    pub fn specific_concerns(&self) -> &BTreeSet<Concern> {
        &self.specific_concerns
    }

    pub fn requirements_gathered(&self) -> bool {
        self.requirements_gathered
    }

    /// Restating a fact overwrites; it never toggles.
    pub fn set_usage_type(&mut self, usage: UsageType) {
        self.usage_type = Some(usage);
    }

    pub fn set_capacity_needed(&mut self, capacity: CapacityNeed) {
        self.capacity_needed = Some(capacity);
    }

    pub fn set_budget_range(&mut self, budget: BudgetRange) {
        self.budget_range = Some(budget);
    }

    pub fn set_water_source(&mut self, source: WaterSource) {
        self.water_source = Some(source);
    }

    /// Set semantics: adding the same concern twice is a no-op.
    pub fn add_concern(&mut self, concern: Concern) {
        self.specific_concerns.insert(concern);
    }

    /// Monotonic transition; there is no way back to false.
    pub fn mark_requirements_gathered(&mut self) {
        self.requirements_gathered = true;
    }

    /// True when nothing has been learned yet.
    pub fn is_empty(&self) -> bool {
        self.usage_type.is_none()
            && self.capacity_needed.is_none()
            && self.budget_range.is_none()
            && self.water_source.is_none()
            && self.specific_concerns.is_empty()
    }

    /// Known requirements as short display fragments.
    pub fn summary(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(usage) = self.usage_type {
            parts.push(format!("Usage: {usage}"));
        }
        if let Some(capacity) = self.capacity_needed {
            parts.push(format!("Capacity: {capacity}"));
        }
        if let Some(budget) = self.budget_range {
            parts.push(format!("Budget: ₹{}", format_thousands(budget.max)));
        }
        if let Some(source) = self.water_source {
            parts.push(format!("Source: {source}"));
        }
        if !self.specific_concerns.is_empty() {
            let concerns: Vec<&str> = self
                .specific_concerns
                .iter()
                .take(2)
                .map(Concern::label)
                .collect();
            parts.push(format!("Concerns: {}", concerns.join(", ")));
        }
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gathered_flag_is_monotonic() {
        let mut needs = NeedsAssessment::new();
        assert!(!needs.requirements_gathered());

        needs.mark_requirements_gathered();
        assert!(needs.requirements_gathered());

        // Further mutation cannot clear the flag; no API exists for it.
        needs.set_usage_type(UsageType::Domestic);
        needs.add_concern(Concern::Taste);
        assert!(needs.requirements_gathered());
    }

    #[test]
    fn test_concern_set_deduplicates() {
        let mut needs = NeedsAssessment::new();
        needs.add_concern(Concern::HighTds);
        needs.add_concern(Concern::HighTds);
        needs.add_concern(Concern::Taste);
        assert_eq!(needs.specific_concerns().len(), 2);
    }

    #[test]
    fn test_budget_band() {
        let exact = BudgetRange::upper(12000);
        assert_eq!(exact.max, 12000);
        assert_eq!(exact.min, None);

        let band = BudgetRange::around(12000);
        assert_eq!(band.max, 14400);
        assert_eq!(band.min, Some(9600));
    }

    #[test]
    fn test_summary_renders_known_fields_only() {
        let mut needs = NeedsAssessment::new();
        needs.set_usage_type(UsageType::Domestic);
        needs.set_budget_range(BudgetRange::upper(12000));

        let summary = needs.summary();
        assert_eq!(summary, vec!["Usage: domestic", "Budget: ₹12,000"]);
    }
}
