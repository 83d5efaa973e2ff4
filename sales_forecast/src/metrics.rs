//! Metrics for evaluating how well a trained model fits its data

use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use crate::models::TrainedForecastModel;
use serde::Serialize;

/// Error metrics for forecast evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error over non-zero actuals
    pub mape: f64,
}

/// Calculate accuracy metrics for predicted vs actual values
pub fn accuracy(predicted: &[f64], actual: &[f64]) -> Result<ErrorMetrics> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = predicted.len() as f64;
    let errors: Vec<f64> = predicted
        .iter()
        .zip(actual.iter())
        .map(|(&p, &a)| a - p)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;

    let (pct_sum, pct_count) = actual
        .iter()
        .zip(errors.iter())
        .filter(|(&a, _)| a != 0.0)
        .fold((0.0, 0usize), |(sum, count), (&a, &e)| {
            (sum + e.abs() / a.abs() * 100.0, count + 1)
        });
    let mape = if pct_count > 0 {
        pct_sum / pct_count as f64
    } else {
        0.0
    };

    Ok(ErrorMetrics {
        mae,
        mse,
        rmse: mse.sqrt(),
        mape,
    })
}

/// In-sample fit of a trained model on its own training data
pub fn fit_metrics<M: TrainedForecastModel + ?Sized>(
    model: &M,
    features: &[FeatureRow],
    labels: &[f64],
) -> Result<ErrorMetrics> {
    let predicted = model.predict(features)?;
    accuracy(&predicted, labels)
}

impl std::fmt::Display for ErrorMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fit Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        Ok(())
    }
}
