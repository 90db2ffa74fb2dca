//! Fitting strategies for the forecast fallback chain

use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::fmt::Debug;

/// Which tier of the fallback chain produced a forecast.
///
/// Variants are listed in cascade order: ARIMA is attempted first, Holt
/// linear smoothing second, and the naive repeat is the terminal tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelKind {
    /// Primary autoregressive integrated model
    Arima,
    /// Additive-trend exponential smoothing fallback
    HoltLinear,
    /// Repeat-last-value terminal fallback
    Naive,
}

/// Point forecast plus optional confidence intervals from one strategy
#[derive(Debug, Clone)]
pub struct ModelForecast {
    values: Vec<f64>,
    intervals: Option<Vec<(f64, f64)>>,
}

impl ModelForecast {
    /// Create a new forecast without intervals
    pub fn new(values: Vec<f64>, horizon: usize) -> Result<Self> {
        if values.len() != horizon {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizon ({})",
                values.len(),
                horizon
            )));
        }

        Ok(Self {
            values,
            intervals: None,
        })
    }

    /// Create a new forecast with confidence intervals
    pub fn with_intervals(
        values: Vec<f64>,
        horizon: usize,
        intervals: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if values.len() != horizon {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizon ({})",
                values.len(),
                horizon
            )));
        }

        if intervals.len() != values.len() {
            return Err(ForecastError::ValidationError(format!(
                "Intervals length ({}) doesn't match values length ({})",
                intervals.len(),
                values.len()
            )));
        }

        Ok(Self {
            values,
            intervals: Some(intervals),
        })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the confidence intervals, if the strategy produced them
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Number of periods forecast
    pub fn horizon(&self) -> usize {
        self.values.len()
    }
}

/// One tier of the fallback chain: fits on a training series and
/// forecasts a fixed number of future periods in a single call.
///
/// Fit problems are reported as `ForecastError::FitFailed`; the engine
/// consumes those to advance the cascade. Any other error surfaces.
pub trait FitStrategy: Debug {
    /// Fit on the training series and forecast `horizon` periods ahead
    fn fit_and_forecast(&self, train: &SalesSeries, horizon: usize) -> Result<ModelForecast>;

    /// Which tier this strategy represents
    fn kind(&self) -> ModelKind;

    /// Name of the strategy
    fn name(&self) -> &str;
}

pub mod arima;
pub mod exponential_smoothing;
pub mod naive;
