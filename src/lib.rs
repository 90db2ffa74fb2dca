//! # Forecast Sales
//!
//! A Rust library for sales time series forecasting and threshold-based
//! alerting.
//!
//! ## Features
//!
//! - Tabular sales data handling (per-record year/model/region/volume)
//! - Forecasting with a cascading model fallback (ARIMA, additive-trend
//!   exponential smoothing, naive repeat)
//! - Accuracy metrics on a held-out test split (RMSE, MAE)
//! - Rule-based alerts for forecast shortfalls, underperforming models
//!   and regions, and declining trends
//!
//! ## Quick Start
//!
//! ```rust
//! use forecast_sales::data::SalesSeries;
//! use forecast_sales::forecast::ForecastEngine;
//!
//! let years: Vec<i32> = (2010..2025).collect();
//! let values: Vec<f64> = years
//!     .iter()
//!     .map(|y| 1_000_000.0 + (y - 2010) as f64 * 50_000.0)
//!     .collect();
//! let series = SalesSeries::new(years, values)?;
//!
//! // Evaluate on the last 20% of the series, then forecast 3 years ahead
//! let engine = ForecastEngine::new();
//! let forecast = engine.forecast(&series, 0.8, 3)?;
//!
//! assert_eq!(forecast.future_predictions().len(), 3);
//! # Ok::<(), forecast_sales::ForecastError>(())
//! ```

pub mod alerts;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::alerts::evaluator::{AlertEvaluator, AlertReport, EvaluatorState, MetricsBundle};
pub use crate::alerts::{AlertKind, AlertRecord, AlertSystem, Severity, ThresholdConfig};
pub use crate::data::{DataLoader, SalesData, SalesSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{ForecastEngine, SalesForecast};
pub use crate::metrics::AccuracyMetrics;
pub use crate::models::{FitStrategy, ModelForecast, ModelKind};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
