//! Product-info text blocks.
//!
//! Everything the language model is allowed to say about a product comes
//! from these blocks, so they carry only what the catalog row states:
//! explicitly mentioned specs, the stated price or "Price on request",
//! and a bounded description excerpt.

use once_cell::sync::Lazy;
use regex::Regex;

use aqua_agent_core::Product;

use crate::store::CatalogStore;

/// Flow rate, e.g. "12 LPH".
static LPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*lph\b").unwrap());

/// Membrane capacity, e.g. "75 GPD".
static GPD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*gpd\b").unwrap());

/// Storage tank size, phrased either way round in the source data.
static STORAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)storage\s+capacity\s+of\s+(\d+)\s*liters?|(\d+)\s*liters?\s+storage").unwrap()
});

/// Declared price line inside an info block.
static PRICE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"PRICE: ₹([\d,]+)").unwrap());

/// Extract the specs a description explicitly states. No inference: a
/// spec absent from the text is absent from the result.
pub fn extract_specs(text: &str) -> Vec<String> {
    let mut specs = Vec::new();

    if let Some(caps) = LPH_RE.captures(text) {
        specs.push(format!("Flow Rate: {} LPH", &caps[1]));
    }
    if let Some(caps) = GPD_RE.captures(text) {
        specs.push(format!("Capacity: {} GPD", &caps[1]));
    }
    if let Some(caps) = STORAGE_RE.captures(text) {
        let litres = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
        if let Some(litres) = litres {
            specs.push(format!("Storage: {litres} liters"));
        }
    }

    specs
}

/// Format one product into the text block fed to the language model.
pub fn product_info_block(product: &Product) -> String {
    let combined = format!("{} {}", product.short_description, product.description);
    let specs = extract_specs(&combined);
    let specs_text = if specs.is_empty() {
        "Specifications available in product description".to_string()
    } else {
        specs.join("; ")
    };

    let variants = if product.variant_attributes.trim().is_empty() {
        "Contact for variants"
    } else {
        product.variant_attributes.trim()
    };

    format!(
        "PRODUCT: {name}\n\
         PRICE: {price}\n\
         CATEGORY: {category}\n\
         KEY FEATURES: {features}\n\
         SPECIFICATIONS: {specs}\n\
         DESCRIPTION: {description}\n\
         VARIANTS: {variants}\n\
         APPLICATION: {application}",
        name = product.name,
        price = product.price_display(),
        category = product.category,
        features = product.short_description,
        specs = specs_text,
        description = excerpt(
            &product.description,
            aqua_agent_config::constants::formatting::DESCRIPTION_EXCERPT_CHARS,
        ),
        variants = variants,
        application = product.application(),
    )
}

/// Re-read the declared price from an info block. Returns `None` for
/// "Price on request" blocks.
pub fn declared_price(info_block: &str) -> Option<u64> {
    let caps = PRICE_LINE_RE.captures(info_block)?;
    caps[1].replace(',', "").parse().ok()
}

/// Resolve an info block back to its catalog product by the declared name.
pub fn declared_product<'a>(info_block: &str, catalog: &'a CatalogStore) -> Option<&'a Product> {
    let name = info_block
        .lines()
        .find_map(|line| line.strip_prefix("PRODUCT: "))?;
    catalog.find_by_name(name.trim())
}

/// Truncate to at most `max_chars` characters on a char boundary,
/// appending an ellipsis when anything was cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}
