//! End-to-end orchestration: rows in, chart bundle out
//!
//! Every run validates its own rows, builds its own catalog and trains a
//! fresh model, so concurrent runs never share state.

use crate::catalog::ProductCatalog;
use crate::config::PipelineConfig;
use crate::data::{validate, RawRecord, SalesObservation};
use crate::error::{ForecastError, Result};
use crate::features::{encode, features_and_labels, EncodedObservation, FeatureRow};
use crate::forecast::{forecast, ForecastResult};
use crate::metrics::{fit_metrics, ErrorMetrics};
use crate::models::mlp::MlpRegressor;
use crate::models::{ForecastModel, TrainedForecastModel, TrainingControl};
use crate::series::{assemble_with, SeriesBundle};
use serde::Serialize;
use tracing::{info, warn};

/// Validated and encoded data, ready for training
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub observations: Vec<SalesObservation>,
    pub catalog: ProductCatalog,
    pub encoded: Vec<EncodedObservation>,
    pub features: Vec<FeatureRow>,
    pub labels: Vec<f64>,
    /// Month index of the final observation in input order
    pub last_observed_month: u32,
}

/// Summary of the training step
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub model_name: String,
    pub epochs_run: usize,
    pub loss_history: Vec<f64>,
    pub fit: ErrorMetrics,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub observations: Vec<SalesObservation>,
    pub catalog: ProductCatalog,
    pub encoded: Vec<EncodedObservation>,
    pub results: Vec<ForecastResult>,
    pub bundle: SeriesBundle,
    pub report: TrainingReport,
}

/// Cancels a training control when dropped unless disarmed first
struct CancelOnDrop<'a> {
    control: Option<&'a TrainingControl>,
}

impl<'a> CancelOnDrop<'a> {
    fn new(control: &'a TrainingControl) -> Self {
        Self {
            control: Some(control),
        }
    }

    fn disarm(mut self) {
        self.control = None;
    }
}

impl Drop for CancelOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(control) = self.control.take() {
            control.cancel();
        }
    }
}

/// Forecasting pipeline over a chosen regression model
#[derive(Debug, Clone)]
pub struct ForecastPipeline<M: ForecastModel = MlpRegressor> {
    config: PipelineConfig,
    model: M,
}

impl ForecastPipeline<MlpRegressor> {
    /// Pipeline using the neural regressor configured from `config`
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let model = MlpRegressor::from_config(&config)?;
        Ok(Self { config, model })
    }
}

impl<M: ForecastModel + 'static> ForecastPipeline<M> {
    /// Pipeline using a caller-supplied model
    pub fn with_model(config: PipelineConfig, model: M) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validate, encode and split rows into training inputs
    pub fn prepare(&self, rows: &[RawRecord]) -> Result<PreparedData> {
        let observations = validate(rows);
        if observations.is_empty() {
            return Err(ForecastError::EmptyDataset(
                "No valid sales rows to train on. Check the date, description and quantity columns."
                    .to_string(),
            ));
        }

        let catalog = ProductCatalog::build(&observations);
        let encoded = encode(&observations, &catalog)?;
        let (features, labels) = features_and_labels(&encoded);
        let last_observed_month = encoded
            .last()
            .map(|e| e.month_index)
            .ok_or_else(|| ForecastError::EncodingError("No encoded observations".to_string()))?;

        info!(
            rows = rows.len(),
            observations = observations.len(),
            products = catalog.len(),
            "prepared training data"
        );

        Ok(PreparedData {
            observations,
            catalog,
            encoded,
            features,
            labels,
            last_observed_month,
        })
    }

    /// Run the whole pipeline on the calling thread
    pub fn run(&self, rows: &[RawRecord]) -> Result<PipelineOutput> {
        self.run_with_control(rows, &TrainingControl::new())
    }

    /// Run the whole pipeline on the calling thread, honouring `control`
    pub fn run_with_control(
        &self,
        rows: &[RawRecord],
        control: &TrainingControl,
    ) -> Result<PipelineOutput> {
        let prepared = self.prepare(rows)?;
        let trained = self
            .model
            .train_with_control(&prepared.features, &prepared.labels, control)?;
        self.finish(prepared, &trained)
    }

    /// Run the pipeline with training moved onto the blocking thread pool.
    ///
    /// If the configured timeout elapses, or the returned future is dropped
    /// before training finishes, `control` is cancelled so the background
    /// training stops at its next epoch boundary.
    pub async fn run_async(
        &self,
        rows: &[RawRecord],
        control: &TrainingControl,
    ) -> Result<PipelineOutput> {
        let prepared = self.prepare(rows)?;

        let model = self.model.clone();
        let features = prepared.features.clone();
        let labels = prepared.labels.clone();
        let task_control = control.clone();
        let handle = tokio::task::spawn_blocking(move || {
            model.train_with_control(&features, &labels, &task_control)
        });

        // Stops the background training if this future is dropped mid-await.
        let guard = CancelOnDrop::new(control);
        let joined = match self.config.training_timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(timeout = ?limit, "training timed out");
                    return Err(ForecastError::Timeout(limit));
                }
            },
            None => handle.await,
        };
        guard.disarm();

        let trained = joined.map_err(|e| {
            ForecastError::TrainingError(format!("Training task failed: {}", e))
        })??;

        self.finish(prepared, &trained)
    }

    fn finish(&self, prepared: PreparedData, trained: &M::Trained) -> Result<PipelineOutput> {
        let fit = fit_metrics(trained, &prepared.features, &prepared.labels)?;
        let results = forecast(
            trained,
            prepared.last_observed_month,
            &prepared.catalog,
            self.config.horizon,
        )?;
        let bundle = assemble_with(
            &prepared.observations,
            &prepared.catalog,
            &results,
            self.config.period_labels,
        )?;

        info!(
            model = trained.name(),
            forecasts = results.len(),
            horizon = self.config.horizon,
            rmse = fit.rmse,
            "pipeline complete"
        );

        let loss_history = trained.loss_history().to_vec();
        Ok(PipelineOutput {
            observations: prepared.observations,
            catalog: prepared.catalog,
            encoded: prepared.encoded,
            results,
            bundle,
            report: TrainingReport {
                model_name: trained.name().to_string(),
                epochs_run: loss_history.len(),
                loss_history,
                fit,
            },
        })
    }
}

/// Run the default pipeline on `rows` with `config`
pub fn run_pipeline(rows: &[RawRecord], config: PipelineConfig) -> Result<PipelineOutput> {
    ForecastPipeline::new(config)?.run(rows)
}
