//! # Sales Forecast
//!
//! Monthly per-product sales forecasting from tabular sales records.
//!
//! ## Features
//!
//! - Record validation that silently drops malformed rows
//! - Product catalog assigning dense integer codes in first-seen order
//! - (month, product code) feature encoding
//! - A two-layer feed-forward regressor trained with Adam on mean squared error
//! - Six-month-ahead forecasts for every product
//! - Chart-ready series bundles mixing history and forecasts
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::{DataLoader, ForecastPipeline, PipelineConfig};
//!
//! # fn main() -> sales_forecast::Result<()> {
//! let rows = DataLoader::from_csv("sales.csv")?;
//! let pipeline = ForecastPipeline::new(PipelineConfig::default())?;
//! let output = pipeline.run(&rows)?;
//!
//! println!("{}", output.bundle.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod series;

// Re-export commonly used types
pub use crate::catalog::ProductCatalog;
pub use crate::config::PipelineConfig;
pub use crate::data::{validate, DataLoader, RawRecord, SalesObservation};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{encode, EncodedObservation};
pub use crate::forecast::{forecast, ForecastResult};
pub use crate::models::{ForecastModel, TrainedForecastModel, TrainingControl};
pub use crate::pipeline::{run_pipeline, ForecastPipeline, PipelineOutput};
pub use crate::series::{assemble, assemble_with, PeriodLabels, SeriesBundle, SeriesDataset};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
