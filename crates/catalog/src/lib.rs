//! In-memory product catalog.
//!
//! Loaded once at startup from the retailer's CSV export, normalized
//! (trimmed headers, coerced prices), and shared read-only across all
//! sessions for the life of the process.

pub mod format;
mod store;

pub use format::{declared_price, declared_product, extract_specs, product_info_block};
pub use store::{CatalogError, CatalogStore};
