//! Catalog product row.

use serde::{Deserialize, Serialize};

/// A single sellable product.
///
/// Rows are loaded once at startup and never mutated by conversation
/// logic. `name` is the identity used for lookups and de-duplication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product name, unique within the catalog.
    pub name: String,
    /// Hierarchical category, `>`-delimited (e.g. "Domestic > RO Systems").
    pub category: String,
    /// Price in whole rupees. Zero means the price is not published.
    pub regular_price: u64,
    /// Short marketing description.
    pub short_description: String,
    /// Full description.
    pub description: String,
    /// Free-text variant attributes.
    pub variant_attributes: String,
    /// Image URLs, split from the comma-separated source column.
    pub image_urls: Vec<String>,
}

impl Product {
    /// Whether the product has a published price.
    pub fn has_price(&self) -> bool {
        self.regular_price > 0
    }

    /// Display string for the price. Products without a published price
    /// render as "Price on request" - never an estimate.
    pub fn price_display(&self) -> String {
        if self.has_price() {
            format!("₹{}", format_thousands(self.regular_price))
        } else {
            "Price on request".to_string()
        }
    }

    /// First image URL, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(|s| s.as_str())
    }

    /// Top-level application segment of the category.
    pub fn application(&self) -> &str {
        self.category.split('>').next().unwrap_or("").trim()
    }
}

/// Insert comma separators into a non-negative integer.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
