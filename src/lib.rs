//! # Sales Forecast Workspace
//!
//! Umbrella crate re-exporting the `sales_forecast` pipeline.
//!
//! ## Example
//!
//! ```
//! use sales_forecast_workspace::{ProductCatalog, RawRecord, validate};
//!
//! let rows = vec![
//!     RawRecord::sale("2024-01-10", "Widget", "5"),
//!     RawRecord::sale("", "Widget", "5"),
//!     RawRecord::sale("2024-01-15", "Gadget", "3"),
//! ];
//! let observations = validate(&rows);
//! assert_eq!(observations.len(), 2);
//!
//! let catalog = ProductCatalog::build(&observations);
//! assert_eq!(catalog.code_of("Gadget"), Some(1));
//! ```

pub use sales_forecast::*;
