//! Product description to integer code mapping

use crate::data::SalesObservation;
use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Bidirectional mapping between product descriptions and dense codes in `[0, N)`.
///
/// Codes follow first-appearance order of the observations the catalog was
/// built from. The catalog is rebuilt from scratch for every observation set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductCatalog {
    codes: HashMap<String, usize>,
    products: Vec<String>,
}

impl ProductCatalog {
    /// Build a catalog from observations in order
    pub fn build(observations: &[SalesObservation]) -> Self {
        let mut catalog = Self::default();
        for observation in observations {
            catalog.code_or_insert(&observation.product);
        }
        catalog
    }

    /// Return the code for `product`, assigning the next free code if unseen
    fn code_or_insert(&mut self, product: &str) -> usize {
        if let Some(&code) = self.codes.get(product) {
            return code;
        }
        let code = self.products.len();
        self.products.push(product.to_string());
        self.codes.insert(product.to_string(), code);
        code
    }

    /// Code assigned to a product
    pub fn code_of(&self, product: &str) -> Option<usize> {
        self.codes.get(product).copied()
    }

    /// Code assigned to a product, failing if the product is unknown
    pub fn require_code(&self, product: &str) -> Result<usize> {
        self.code_of(product).ok_or_else(|| {
            ForecastError::EncodingError(format!("Product '{}' is not in the catalog", product))
        })
    }

    /// Product description for a code
    pub fn product_of(&self, code: usize) -> Option<&str> {
        self.products.get(code).map(String::as_str)
    }

    /// Products in code order
    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// `(code, product)` pairs in code order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.products
            .iter()
            .enumerate()
            .map(|(code, product)| (code, product.as_str()))
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(product: &str) -> SalesObservation {
        SalesObservation {
            period: "2024-01".to_string(),
            product: product.to_string(),
            quantity: 1.0,
        }
    }

    #[test]
    fn test_reuses_existing_code() {
        let mut catalog = ProductCatalog::default();
        assert_eq!(catalog.code_or_insert("A"), 0);
        assert_eq!(catalog.code_or_insert("B"), 1);
        assert_eq!(catalog.code_or_insert("A"), 0);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_require_code_unknown_product() {
        let catalog = ProductCatalog::build(&[obs("A")]);
        assert!(matches!(
            catalog.require_code("Z"),
            Err(ForecastError::EncodingError(_))
        ));
    }
}
