//! Pipeline configuration and defaults

use crate::error::{ForecastError, Result};
use crate::series::PeriodLabels;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const HORIZON: usize = 6;
pub const EPOCHS: usize = 100;
pub const HIDDEN_DIM: usize = 64;
pub const INPUT_DIM: usize = 2;
pub const LEARNING_RATE: f64 = 1e-3;
pub const BATCH_SIZE: usize = 32;

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of future months forecast per product
    pub horizon: usize,
    /// Full passes over the training set
    pub epochs: usize,
    /// Width of the hidden layer
    pub hidden_dim: usize,
    /// Adam step size
    pub learning_rate: f64,
    /// Samples per gradient step
    pub batch_size: usize,
    /// Reshuffle samples before every epoch
    pub shuffle: bool,
    /// Seed for weight initialization and shuffling. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Upper bound on training wall-clock time for async runs
    pub training_timeout: Option<Duration>,
    /// Historical x-axis labelling of the chart bundle
    pub period_labels: PeriodLabels,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            horizon: HORIZON,
            epochs: EPOCHS,
            hidden_dim: HIDDEN_DIM,
            learning_rate: LEARNING_RATE,
            batch_size: BATCH_SIZE,
            shuffle: true,
            seed: None,
            training_timeout: None,
            period_labels: PeriodLabels::PerObservation,
        }
    }
}

impl PipelineConfig {
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_hidden_dim(mut self, hidden_dim: usize) -> Self {
        self.hidden_dim = hidden_dim;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_training_timeout(mut self, timeout: Duration) -> Self {
        self.training_timeout = Some(timeout);
        self
    }

    pub fn with_period_labels(mut self, period_labels: PeriodLabels) -> Self {
        self.period_labels = period_labels;
        self
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be at least 1".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "Epochs must be at least 1".to_string(),
            ));
        }
        if self.hidden_dim == 0 {
            return Err(ForecastError::InvalidParameter(
                "Hidden dimension must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "Batch size must be at least 1".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if let Some(timeout) = self.training_timeout {
            if timeout.is_zero() {
                return Err(ForecastError::InvalidParameter(
                    "Training timeout must be non-zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}
