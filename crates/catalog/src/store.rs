//! Catalog store and CSV ingestion.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use thiserror::Error;

use aqua_agent_core::Product;

/// Catalog loading failure. Fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Csv(#[from] csv::Error),
}

/// Read-only view of all sellable products.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
}

/// Raw CSV row as exported by the store backend. Headers are trimmed on
/// read so padded column names still bind.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Regular_price", default)]
    regular_price: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Short description", default)]
    short_description: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Attribute 1 value(s)", default)]
    variant_attributes: String,
    #[serde(rename = "Images", default)]
    images: String,
}

impl RawRow {
    fn into_product(self) -> Product {
        // Coerce price: invalid or missing values mean "price on request".
        let regular_price = self
            .regular_price
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|p| *p > 0.0)
            .map(|p| p as u64)
            .unwrap_or(0);

        let image_urls = self
            .images
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Product {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            regular_price,
            short_description: self.short_description,
            description: self.description,
            variant_attributes: self.variant_attributes,
            image_urls,
        }
    }
}

impl CatalogStore {
    /// Load the catalog from a CSV export on disk.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load the catalog from any CSV reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let mut products = Vec::new();
        for row in csv_reader.deserialize::<RawRow>() {
            let row = match row {
                Ok(row) => row,
                Err(error) => {
                    tracing::warn!(%error, "skipping malformed catalog row");
                    continue;
                }
            };
            if row.name.trim().is_empty() {
                continue;
            }
            products.push(row.into_product());
        }

        tracing::info!(count = products.len(), "catalog loaded");
        Ok(Self { products })
    }

    /// Build a store from already-constructed products.
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All products in catalog row order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive exact-name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        let needle = name.trim().to_lowercase();
        self.products
            .iter()
            .find(|p| p.name.to_lowercase() == needle)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Name, Regular_price ,Category,Short description,Description,Attribute 1 value(s),Images
Aquapure Home RO,12500,Domestic > RO Systems,12 LPH compact RO purifier,Compact RO purifier with 12 LPH flow rate and storage capacity of 8 liters,White | Blue,\"https://cdn.example.com/ro.jpg, https://cdn.example.com/ro2.jpg\"
Industrial RO Plant,,Industrial > RO Plants,500 LPH treatment plant,High capacity industrial plant,,
Softener Max,not-a-price,Water Softeners,Whole house softener,Ion exchange softener,,https://cdn.example.com/soft.jpg
";

    #[test]
    fn test_load_trims_headers_and_coerces_prices() {
        let catalog = CatalogStore::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);

        let ro = catalog.find_by_name("Aquapure Home RO").unwrap();
        assert_eq!(ro.regular_price, 12500);
        assert_eq!(ro.category, "Domestic > RO Systems");
        assert_eq!(ro.image_urls.len(), 2);

        // Missing and unparseable prices both coerce to "price on request".
        assert_eq!(
            catalog.find_by_name("Industrial RO Plant").unwrap().regular_price,
            0
        );
        assert_eq!(
            catalog.find_by_name("Softener Max").unwrap().regular_price,
            0
        );
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let catalog = CatalogStore::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(catalog.contains_name("aquapure home ro"));
        assert!(catalog.contains_name("SOFTENER MAX"));
        assert!(!catalog.contains_name("Nonexistent Purifier"));
    }

    #[test]
    fn test_rows_without_names_are_dropped() {
        let csv = "Name,Regular_price,Category,Short description,Description,Attribute 1 value(s),Images\n,100,Cat,s,d,,\n";
        let catalog = CatalogStore::from_reader(csv.as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }
}
