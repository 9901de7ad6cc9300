//! Needs-assessment gate.
//!
//! Decides whether enough is known to filter meaningfully, and produces
//! the clarifying questions for what is still missing. The sufficiency
//! rule is deliberately loose - 2 of 3 essential dimensions, not all
//! three - to avoid over-interrogating the customer.

use crate::needs::{NeedsAssessment, UsageType};

/// True when at least 2 of the 3 essential dimensions are covered:
/// usage type; capacity (implied for industrial customers, whose volume
/// is gathered separately); water source or at least one named concern.
pub fn sufficient(needs: &NeedsAssessment) -> bool {
    let checks = [
        needs.usage_type().is_some(),
        needs.capacity_needed().is_some() || needs.usage_type() == Some(UsageType::Industrial),
        needs.water_source().is_some() || !needs.specific_concerns().is_empty(),
    ];

    checks.into_iter().filter(|satisfied| *satisfied).count() >= 2
}

/// Clarifying questions for missing dimensions, in fixed priority order,
/// truncated to `max` so a single turn never overwhelms the customer.
/// Questions whose field is already set are skipped. An empty result
/// signals the caller to flip `requirements_gathered` and proceed.
pub fn next_questions(needs: &NeedsAssessment, max: usize) -> Vec<String> {
    let mut questions = Vec::new();

    if needs.usage_type().is_none() {
        questions.push(
            "Where will you be using this water treatment system - at home, in an office, \
             or at an industrial facility?"
                .to_string(),
        );
    }

    if needs.capacity_needed().is_none() {
        // Phrasing depends on what we already know about the customer.
        match needs.usage_type() {
            Some(UsageType::Domestic) => questions.push(
                "How many people will be using the system? Family size helps determine \
                 the right capacity."
                    .to_string(),
            ),
            Some(UsageType::Commercial) => questions.push(
                "How many people work in your office? That sets the daily water requirement."
                    .to_string(),
            ),
            Some(UsageType::Industrial) => questions.push(
                "What is your daily water requirement, in liters per hour or per day?"
                    .to_string(),
            ),
            None => {}
        }
    }

    if needs.water_source().is_none() {
        questions.push(
            "What is your water source - municipal supply, borewell, or tanker water?"
                .to_string(),
        );
    }

    if needs.budget_range().is_none() {
        questions.push(
            "What is your budget range? It helps me recommend the best system for your needs."
                .to_string(),
        );
    }

    if needs.specific_concerns().is_empty() {
        questions.push(
            "Are there any specific water quality issues - bad taste, hardness, high TDS, \
             or contamination concerns?"
                .to_string(),
        );
    }

    questions.truncate(max);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::needs::{BudgetRange, CapacityNeed, Concern, WaterSource};

    #[test]
    fn test_two_of_three_rule() {
        let mut needs = NeedsAssessment::new();
        assert!(!sufficient(&needs));

        needs.set_usage_type(UsageType::Domestic);
        assert!(!sufficient(&needs));

        needs.set_capacity_needed(CapacityNeed::Small);
        assert!(sufficient(&needs));
    }

    #[test]
    fn test_industrial_implies_capacity() {
        let mut needs = NeedsAssessment::new();
        needs.set_usage_type(UsageType::Industrial);
        // usage + implied capacity = 2 of 3.
        assert!(sufficient(&needs));
    }

    #[test]
    fn test_concern_substitutes_for_water_source() {
        let mut needs = NeedsAssessment::new();
        needs.set_capacity_needed(CapacityNeed::Large);
        needs.add_concern(Concern::HighTds);
        assert!(sufficient(&needs));
    }

    #[test]
    fn test_sufficiency_is_monotonic() {
        // Adding information can flip false -> true, never true -> false.
        let mut needs = NeedsAssessment::new();
        needs.set_usage_type(UsageType::Domestic);
        needs.set_capacity_needed(CapacityNeed::Small);
        assert!(sufficient(&needs));

        needs.set_water_source(WaterSource::Borewell);
        needs.set_budget_range(BudgetRange::upper(20000));
        needs.add_concern(Concern::Bacterial);
        assert!(sufficient(&needs));
    }

    #[test]
    fn test_questions_capped_at_two() {
        let needs = NeedsAssessment::new();
        let questions = next_questions(&needs, 2);
        assert_eq!(questions.len(), 2);
        // Usage type is the top-priority question.
        assert!(questions[0].contains("Where will you be using"));
    }

    #[test]
    fn test_capacity_question_waits_for_usage_type() {
        // With nothing known, capacity phrasing is undecidable, so the
        // capacity question is not among the first batch.
        let needs = NeedsAssessment::new();
        let questions = next_questions(&needs, 5);
        assert!(questions.iter().all(|q| !q.contains("How many people")));
    }

    #[test]
    fn test_capacity_question_phrased_per_usage() {
        let mut needs = NeedsAssessment::new();
        needs.set_usage_type(UsageType::Commercial);
        let questions = next_questions(&needs, 5);
        assert!(questions.iter().any(|q| q.contains("work in your office")));

        let mut needs = NeedsAssessment::new();
        needs.set_usage_type(UsageType::Industrial);
        let questions = next_questions(&needs, 5);
        assert!(questions.iter().any(|q| q.contains("liters per hour")));
    }

    #[test]
    fn test_set_fields_are_skipped() {
        let mut needs = NeedsAssessment::new();
        needs.set_usage_type(UsageType::Domestic);
        needs.set_capacity_needed(CapacityNeed::Small);
        needs.set_water_source(WaterSource::Municipal);
        needs.set_budget_range(BudgetRange::upper(15000));
        needs.add_concern(Concern::Taste);

        assert!(next_questions(&needs, 2).is_empty());
    }
}
