//! Chart-ready series combining history and forecasts

use crate::catalog::ProductCatalog;
use crate::data::SalesObservation;
use crate::error::{ForecastError, Result};
use crate::forecast::ForecastResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One labeled line for the chart consumer. `None` marks a missing point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDataset {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// X-axis labels plus every dataset to draw
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesBundle {
    pub labels: Vec<String>,
    pub datasets: Vec<SeriesDataset>,
}

impl SeriesBundle {
    /// Serialize the bundle as compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the bundle as indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a dataset by label
    pub fn dataset(&self, label: &str) -> Option<&SeriesDataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}

/// Label of the historical series for a product
pub fn actual_label(product: &str) -> String {
    format!("{} (Actual)", product)
}

/// Label of the forecast series for a product
pub fn predicted_label(product: &str) -> String {
    format!("{} (Predicted)", product)
}

/// Label of the `step`-th future period, 1-based
pub fn future_label(step: usize) -> String {
    format!("Future Month {}", step)
}

/// How historical x-axis labels are derived from observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodLabels {
    /// One label per historical observation, in input order
    #[default]
    PerObservation,
    /// Each period once, in first-encounter order
    Distinct,
}

/// Build the chart bundle with one historical label per observation
pub fn assemble(
    observations: &[SalesObservation],
    catalog: &ProductCatalog,
    results: &[ForecastResult],
) -> Result<SeriesBundle> {
    assemble_with(observations, catalog, results, PeriodLabels::PerObservation)
}

/// Build the chart bundle from history and per-product forecasts.
///
/// Labels are the historical periods followed by one label per forecast step.
/// Each product gets an actual series holding only its own history, and a
/// predicted series left-padded with `None` for as many points as that history.
/// A result whose product code is not in `catalog` is an `EncodingError`.
pub fn assemble_with(
    observations: &[SalesObservation],
    catalog: &ProductCatalog,
    results: &[ForecastResult],
    period_labels: PeriodLabels,
) -> Result<SeriesBundle> {
    let mut labels: Vec<String> = match period_labels {
        PeriodLabels::PerObservation => observations.iter().map(|o| o.period.clone()).collect(),
        PeriodLabels::Distinct => {
            let mut seen = HashSet::new();
            observations
                .iter()
                .filter(|o| seen.insert(o.period.as_str()))
                .map(|o| o.period.clone())
                .collect()
        }
    };

    let horizon = results.iter().map(ForecastResult::horizons).max().unwrap_or(0);
    labels.extend((1..=horizon).map(future_label));

    let mut datasets = Vec::with_capacity(results.len() * 2);
    for result in results {
        let product = catalog.product_of(result.product_code()).ok_or_else(|| {
            ForecastError::EncodingError(format!(
                "Forecast for unknown product code {}",
                result.product_code()
            ))
        })?;

        let history: Vec<Option<f64>> = observations
            .iter()
            .filter(|o| o.product == product)
            .map(|o| Some(o.quantity))
            .collect();

        let predicted: Vec<Option<f64>> = std::iter::repeat(None)
            .take(history.len())
            .chain(result.values().iter().copied().map(Some))
            .collect();

        datasets.push(SeriesDataset {
            label: actual_label(product),
            values: history,
        });
        datasets.push(SeriesDataset {
            label: predicted_label(product),
            values: predicted,
        });
    }

    Ok(SeriesBundle { labels, datasets })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_points_serialize_as_null() {
        let bundle = SeriesBundle {
            labels: vec!["2024-01".to_string()],
            datasets: vec![SeriesDataset {
                label: "A (Predicted)".to_string(),
                values: vec![None, Some(2.5)],
            }],
        };
        let json = bundle.to_json().unwrap();
        assert!(json.contains("[null,2.5]"));
    }

    #[test]
    fn test_empty_inputs() {
        let bundle = assemble(&[], &ProductCatalog::default(), &[]).unwrap();
        assert!(bundle.labels.is_empty());
        assert!(bundle.datasets.is_empty());
    }
}
