//! Accuracy metrics for evaluating forecasts against held-out data

use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyMetrics {
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
}

impl std::fmt::Display for AccuracyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  RMSE: {:.4}", self.rmse)?;
        writeln!(f, "  MAE:  {:.4}", self.mae)?;
        Ok(())
    }
}

/// Calculate RMSE and MAE between a forecast and actual values.
///
/// An empty input signals `MetricUndefined` rather than returning zeros;
/// the caller decides whether that is fatal.
pub fn accuracy(forecast: &[f64], actual: &[f64]) -> Result<AccuracyMetrics> {
    if forecast.is_empty() || actual.is_empty() {
        return Err(ForecastError::MetricUndefined);
    }

    if forecast.len() != actual.len() {
        return Err(ForecastError::ValidationError(format!(
            "Forecast length ({}) doesn't match actual length ({})",
            forecast.len(),
            actual.len()
        )));
    }

    let n = forecast.len() as f64;
    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;

    Ok(AccuracyMetrics {
        rmse: mse.sqrt(),
        mae,
    })
}
