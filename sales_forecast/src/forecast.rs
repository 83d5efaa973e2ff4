//! Multi-step forecasts for every product in the catalog

use crate::catalog::ProductCatalog;
use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use crate::models::TrainedForecastModel;
use serde::Serialize;
use tracing::debug;

/// Forecast for a single product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Catalog code of the product
    product_code: usize,
    /// Predicted quantities, one per future month
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(product_code: usize, values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::TrainingError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            product_code,
            values,
            horizons,
        })
    }

    pub fn product_code(&self) -> usize {
        self.product_code
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }
}

/// Month indices following `last_observed_month`. Not wrapped at 12.
pub fn future_months(last_observed_month: u32, horizon: usize) -> Vec<u32> {
    (1..=horizon as u32)
        .map(|step| last_observed_month + step)
        .collect()
}

/// Predict `horizon` months past `last_observed_month` for each catalog product
pub fn forecast<M: TrainedForecastModel + ?Sized>(
    model: &M,
    last_observed_month: u32,
    catalog: &ProductCatalog,
    horizon: usize,
) -> Result<Vec<ForecastResult>> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Horizon must be at least 1".to_string(),
        ));
    }

    let months = future_months(last_observed_month, horizon);
    debug!(
        first_month = months[0],
        horizon,
        products = catalog.len(),
        "generating forecasts"
    );

    catalog
        .iter()
        .map(|(code, _)| {
            let inputs: Vec<FeatureRow> = months
                .iter()
                .map(|&month| [month as f64, code as f64])
                .collect();
            let values = model.predict(&inputs)?;
            ForecastResult::new(code, values, horizon)
        })
        .collect()
}
