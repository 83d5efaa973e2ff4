//! Regression models mapping (month, product code) to quantity

use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag checked by training loops between epochs
#[derive(Debug, Clone, Default)]
pub struct TrainingControl {
    cancelled: Arc<AtomicBool>,
}

impl TrainingControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask any training run holding this control to stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Trained regression model
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Predict one quantity per input pair. Pure forward pass.
    fn predict(&self, inputs: &[FeatureRow]) -> Result<Vec<f64>>;

    /// Mean training loss recorded after each epoch, if the model is iterative
    fn loss_history(&self) -> &[f64] {
        &[]
    }

    /// Name of the model
    fn name(&self) -> &str;
}

/// Regression model that can be fitted to encoded sales
pub trait ForecastModel: Debug + Clone + Send + Sync {
    /// The type of trained model produced
    type Trained: TrainedForecastModel + 'static;

    /// Fit a fresh model, stopping early if `control` is cancelled
    fn train_with_control(
        &self,
        features: &[FeatureRow],
        labels: &[f64],
        control: &TrainingControl,
    ) -> Result<Self::Trained>;

    /// Fit a fresh model
    fn train(&self, features: &[FeatureRow], labels: &[f64]) -> Result<Self::Trained> {
        self.train_with_control(features, labels, &TrainingControl::new())
    }

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Reject empty, mismatched or non-finite training sets
pub(crate) fn check_training_set(features: &[FeatureRow], labels: &[f64]) -> Result<()> {
    if features.is_empty() || labels.is_empty() {
        return Err(ForecastError::TrainingError(
            "Cannot train on an empty dataset".to_string(),
        ));
    }
    if features.len() != labels.len() {
        return Err(ForecastError::TrainingError(format!(
            "Features length ({}) doesn't match labels length ({})",
            features.len(),
            labels.len()
        )));
    }
    if features.iter().flatten().any(|v| !v.is_finite()) {
        return Err(ForecastError::TrainingError(
            "Features contain non-finite values".to_string(),
        ));
    }
    if labels.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::TrainingError(
            "Labels contain non-finite values".to_string(),
        ));
    }
    Ok(())
}

pub mod mlp;
pub mod seasonal_mean;
