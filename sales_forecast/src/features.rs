//! Numeric feature construction from validated observations

use crate::catalog::ProductCatalog;
use crate::data::SalesObservation;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Model input pair: `[month_index, product_code]`
pub type FeatureRow = [f64; 2];

/// Observation expressed as numbers the model can consume
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EncodedObservation {
    /// Calendar month, 1 through 12. The year is discarded.
    pub month_index: u32,
    pub product_code: usize,
    pub quantity: f64,
}

impl EncodedObservation {
    /// Model input for this observation
    pub fn features(&self) -> FeatureRow {
        [self.month_index as f64, self.product_code as f64]
    }
}

/// Parse a `YYYY-MM` period as the first day of that month and return its month number
pub fn month_index(period: &str) -> Result<u32> {
    NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d")
        .map(|date| date.month())
        .map_err(|e| {
            ForecastError::EncodingError(format!("Invalid period '{}': {}", period, e))
        })
}

/// Encode observations against a catalog built from the same set
pub fn encode(
    observations: &[SalesObservation],
    catalog: &ProductCatalog,
) -> Result<Vec<EncodedObservation>> {
    observations
        .iter()
        .map(|observation| {
            Ok(EncodedObservation {
                month_index: month_index(&observation.period)?,
                product_code: catalog.require_code(&observation.product)?,
                quantity: observation.quantity,
            })
        })
        .collect()
}

/// Split encoded observations into model inputs and labels
pub fn features_and_labels(encoded: &[EncodedObservation]) -> (Vec<FeatureRow>, Vec<f64>) {
    encoded.iter().map(|e| (e.features(), e.quantity)).unzip()
}
