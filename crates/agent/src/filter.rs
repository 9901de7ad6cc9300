//! Layered product filtering with empty-result rollback.
//!
//! The working set starts as the whole catalog and each stage narrows
//! it. A stage commits its result only when the result is non-empty;
//! otherwise the wider set is carried forward unchanged. The rollback
//! applies to every stage, so an over-specific predicate can never zero
//! out the recommendations. A filter run counts as "empty" when stages
//! were attempted but none committed - the query expressed constraints
//! and nothing in the catalog satisfied any of them.

use once_cell::sync::Lazy;
use regex::Regex;

use aqua_agent_catalog::CatalogStore;
use aqua_agent_core::Product;
use aqua_agent_nlu::SortPreference;

use crate::needs::{CapacityNeed, Concern, NeedsAssessment, UsageType, WaterSource};

/// Word-bounded technology matchers, so "ro" does not light up inside
/// "process" or "room".
static RO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bro\b|reverse\s+osmosis").unwrap());
static UV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\buv\b|ultra\s*violet").unwrap());
static UF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\buf\b|ultra\s*filtration").unwrap());

/// Flow-rate mention, for capacity classification.
static LPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*lph\b").unwrap());

const VENDING_TERMS: &[&str] = &["atm", "vending", "coin"];

const DOMESTIC_CATEGORY_WORDS: &[&str] = &["domestic", "home", "residential"];
const COMMERCIAL_WORDS: &[&str] = &["commercial", "office", "business"];
const INDUSTRIAL_CATEGORY_WORDS: &[&str] = &["industrial", "plant"];

/// Result of one filter run over the catalog.
#[derive(Debug)]
pub struct FilterOutcome<'a> {
    /// Working set after all stages, in catalog row order.
    pub products: Vec<&'a Product>,
    /// Stages whose predicate applied to this query.
    pub attempted_stages: usize,
    /// Stages that found matches and narrowed the working set.
    pub committed_stages: usize,
}

impl FilterOutcome<'_> {
    /// Constraints existed but none of them matched anything. With
    /// rollback on every stage this is the only "no results" condition,
    /// and it is what triggers the fallback retriever.
    pub fn is_empty(&self) -> bool {
        self.attempted_stages > 0 && self.committed_stages == 0
    }
}

/// Run the layered pipeline: budget, usage type, concerns, water
/// source, capacity, then current-turn technology and general keywords.
pub fn filter_products<'a>(
    catalog: &'a CatalogStore,
    needs: &NeedsAssessment,
    preferred_max_price: Option<u64>,
    keywords: &[String],
) -> FilterOutcome<'a> {
    let mut working: Vec<&Product> = catalog.products().iter().collect();
    let mut attempted = 0usize;
    let mut committed = 0usize;

    // Stage 1: budget. The needs-assessment budget outranks the price
    // ceiling picked up from query phrasing; only rows with a published
    // price can satisfy either. The predicate is the upper bound alone -
    // a band's lower bound is context for the conversation, not a floor
    // that hides cheaper options.
    let limit = needs
        .budget_range()
        .map(|b| b.max)
        .or(preferred_max_price);
    if let Some(limit) = limit {
        attempted += 1;
        commit(&mut working, &mut committed, |p| {
            p.has_price() && p.regular_price <= limit
        });
    }

    // Stage 2: usage type.
    if let Some(usage) = needs.usage_type() {
        attempted += 1;
        commit(&mut working, &mut committed, |p| match usage {
            UsageType::Domestic => contains_any(&p.category, DOMESTIC_CATEGORY_WORDS),
            UsageType::Commercial => {
                contains_any(&p.category, COMMERCIAL_WORDS)
                    || contains_any(&p.name, COMMERCIAL_WORDS)
            }
            UsageType::Industrial => contains_any(&p.category, INDUSTRIAL_CATEGORY_WORDS),
        });
    }

    // Stage 3: concerns, OR-unioned over name and short description.
    if !needs.specific_concerns().is_empty() {
        let concerns: Vec<Concern> = needs.specific_concerns().iter().copied().collect();
        let has_mapped = concerns.iter().any(|c| !matches!(c, Concern::Taste));
        if has_mapped {
            attempted += 1;
            commit(&mut working, &mut committed, |p| {
                concerns.iter().any(|concern| concern_matches(concern, p))
            });
        }
    }

    // Stage 4: water source. Borewell supplies run high TDS and call for
    // RO; municipal supplies need UV/UF against bacterial risk.
    if let Some(source) = needs.water_source() {
        match source {
            WaterSource::Borewell => {
                attempted += 1;
                commit(&mut working, &mut committed, |p| {
                    RO_RE.is_match(&p.name) || RO_RE.is_match(&p.short_description)
                });
            }
            WaterSource::Municipal => {
                attempted += 1;
                commit(&mut working, &mut committed, |p| {
                    UV_RE.is_match(&p.name)
                        || UV_RE.is_match(&p.short_description)
                        || UF_RE.is_match(&p.name)
                        || UF_RE.is_match(&p.short_description)
                });
            }
            // Tanker water varies too much to imply a technology.
            WaterSource::Tanker => {}
        }
    }

    // Stage 5: capacity.
    if let Some(capacity) = needs.capacity_needed() {
        attempted += 1;
        commit(&mut working, &mut committed, |p| {
            capacity_matches(capacity, p)
        });
    }

    // Stage 6: technology tokens from the current turn only.
    let tech_present: Vec<&str> = keywords
        .iter()
        .map(|k| k.as_str())
        .filter(|k| matches!(*k, "ro" | "uv" | "uf"))
        .collect();
    if !tech_present.is_empty() {
        attempted += 1;
        commit(&mut working, &mut committed, |p| {
            tech_present.iter().any(|tech| {
                let re = match *tech {
                    "ro" => &RO_RE,
                    "uv" => &UV_RE,
                    _ => &UF_RE,
                };
                re.is_match(&p.name) || re.is_match(&p.short_description)
            })
        });
    }

    // Stage 7: general keyword match across all text fields.
    if !keywords.is_empty() {
        attempted += 1;
        commit(&mut working, &mut committed, |p| {
            keywords.iter().any(|keyword| {
                contains_ci(&p.name, keyword)
                    || contains_ci(&p.short_description, keyword)
                    || contains_ci(&p.category, keyword)
                    || contains_ci(&p.description, keyword)
            })
        });
    }

    tracing::debug!(
        attempted,
        committed,
        results = working.len(),
        "filter pipeline finished"
    );

    FilterOutcome {
        products: working,
        attempted_stages: attempted,
        committed_stages: committed,
    }
}

/// Dedicated rescan for water ATM / vending queries that the normal
/// stages missed: one OR-of-substring pass over the full catalog.
pub fn vending_rescan(catalog: &CatalogStore) -> Vec<&Product> {
    catalog
        .products()
        .iter()
        .filter(|p| {
            VENDING_TERMS.iter().any(|term| {
                contains_ci(&p.name, term)
                    || contains_ci(&p.category, term)
                    || contains_ci(&p.short_description, term)
                    || contains_ci(&p.description, term)
            })
        })
        .collect()
}

/// Stable single-key sort; ties keep catalog row order. Rows without a
/// published price sink to the end of price sorts.
pub fn sort_products(products: &mut [&Product], preference: SortPreference) {
    match preference {
        SortPreference::PriceAscending => {
            products.sort_by_key(|p| (!p.has_price(), p.regular_price));
        }
        SortPreference::PriceDescending => {
            products.sort_by_key(|p| (!p.has_price(), std::cmp::Reverse(p.regular_price)));
        }
        SortPreference::Alphabetical => {
            products.sort_by_key(|p| p.name.to_lowercase());
        }
    }
}

/// Apply one stage: replace the working set only when the predicate
/// matched anything, otherwise keep the wider set (rollback).
fn commit<'a, F>(working: &mut Vec<&'a Product>, committed: &mut usize, predicate: F)
where
    F: Fn(&Product) -> bool,
{
    let matches: Vec<&Product> = working.iter().copied().filter(|p| predicate(*p)).collect();
    if !matches.is_empty() {
        *working = matches;
        *committed += 1;
    }
}

fn concern_matches(concern: &Concern, product: &Product) -> bool {
    let text_fields = [&product.name, &product.short_description];
    match concern {
        Concern::Hardness => text_fields
            .iter()
            .any(|t| contains_ci(t, "softener") || contains_ci(t, "softner")),
        Concern::HighTds => text_fields
            .iter()
            .any(|t| RO_RE.is_match(t)),
        Concern::Bacterial => text_fields.iter().any(|t| UV_RE.is_match(t)),
        Concern::Chlorine => text_fields
            .iter()
            .any(|t| contains_ci(t, "carbon") || contains_ci(t, "activated")),
        // Taste has no technology mapping; it informs the conversation,
        // not the predicate chain.
        Concern::Taste => false,
    }
}

fn capacity_matches(capacity: CapacityNeed, product: &Product) -> bool {
    match capacity {
        CapacityNeed::Small => {
            lph_value(product).map_or(false, |lph| lph <= 15)
                || contains_ci(&product.name, "domestic")
                || contains_ci(&product.name, "home")
        }
        CapacityNeed::Large => {
            lph_value(product).map_or(false, |lph| lph >= 20)
                || contains_ci(&product.name, "premium")
                || contains_ci(&product.name, "advance")
        }
        CapacityNeed::Office => {
            contains_ci(&product.category, "commercial")
                || contains_ci(&product.description, "office")
                || contains_ci(&product.description, "commercial")
        }
    }
}

fn lph_value(product: &Product) -> Option<u64> {
    let combined = format!("{} {}", product.short_description, product.description);
    LPH_RE
        .captures(&combined)
        .and_then(|caps| caps[1].parse().ok())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|needle| lower.contains(needle))
}
