//! Naive repeat-last-value model: the terminal fallback tier

use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::models::{FitStrategy, ModelForecast, ModelKind};

/// Repeats the last observed training value for every forecast period.
///
/// The only way this can fail is an empty training series, which the
/// forecast engine rules out before any strategy runs; given any
/// observation at all it always produces a forecast.
#[derive(Debug, Clone, Default)]
pub struct NaiveRepeat;

impl NaiveRepeat {
    /// Create a new naive repeat model
    pub fn new() -> Self {
        Self
    }
}

impl FitStrategy for NaiveRepeat {
    fn fit_and_forecast(&self, train: &SalesSeries, horizon: usize) -> Result<ModelForecast> {
        let last = train.last_value().ok_or_else(|| ForecastError::FitFailed {
            model: self.name().to_string(),
            reason: "empty train series".to_string(),
        })?;

        ModelForecast::new(vec![last; horizon], horizon)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Naive
    }

    fn name(&self) -> &str {
        "Naive repeat"
    }
}
