//! Additive-trend exponential smoothing: the first fallback tier

use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::models::{FitStrategy, ModelForecast, ModelKind};

const PARAMETER_GRID_STEP: f64 = 0.05;

/// Holt's linear trend model (double exponential smoothing).
///
/// Level and trend are updated recursively; when no smoothing parameters
/// are fixed, they are chosen by minimizing the one-step-ahead sum of
/// squared errors over a parameter grid. Produces no interval estimates.
#[derive(Debug, Clone)]
pub struct HoltLinear {
    /// Name of the model
    name: String,
    /// Level smoothing parameter, optimized when absent
    alpha: Option<f64>,
    /// Trend smoothing parameter, optimized when absent
    beta: Option<f64>,
}

impl HoltLinear {
    /// Create a new model with fixed smoothing parameters
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }

        if beta <= 0.0 || beta >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Beta must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt linear trend (alpha={}, beta={})", alpha, beta),
            alpha: Some(alpha),
            beta: Some(beta),
        })
    }

    /// Create a new model that picks its smoothing parameters by
    /// minimizing the in-sample squared error
    pub fn auto() -> Self {
        Self {
            name: "Holt linear trend (auto)".to_string(),
            alpha: None,
            beta: None,
        }
    }

    fn fit_failed(&self, reason: impl Into<String>) -> ForecastError {
        ForecastError::FitFailed {
            model: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// One-step-ahead sum of squared errors for the given parameters
    fn sse(values: &[f64], alpha: f64, beta: f64) -> f64 {
        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut sse = 0.0;

        for &value in &values[1..] {
            let forecast = level + trend;
            let error = value - forecast;
            sse += error * error;

            let next_level = alpha * value + (1.0 - alpha) * (level + trend);
            trend = beta * (next_level - level) + (1.0 - beta) * trend;
            level = next_level;
        }

        sse
    }

    /// Run the smoothing recursion, returning the final level and trend
    fn smooth(values: &[f64], alpha: f64, beta: f64) -> (f64, f64) {
        let mut level = values[0];
        let mut trend = values[1] - values[0];

        for &value in &values[1..] {
            let next_level = alpha * value + (1.0 - alpha) * (level + trend);
            trend = beta * (next_level - level) + (1.0 - beta) * trend;
            level = next_level;
        }

        (level, trend)
    }

    fn optimize(values: &[f64]) -> Option<(f64, f64)> {
        let mut best: Option<(f64, f64, f64)> = None;

        for i in 1..=18 {
            for j in 1..=18 {
                let alpha = i as f64 * PARAMETER_GRID_STEP;
                let beta = j as f64 * PARAMETER_GRID_STEP;
                let sse = Self::sse(values, alpha, beta);
                if sse.is_finite() && best.map_or(true, |(_, _, b)| sse < b) {
                    best = Some((alpha, beta, sse));
                }
            }
        }

        best.map(|(alpha, beta, _)| (alpha, beta))
    }
}

impl Default for HoltLinear {
    fn default() -> Self {
        Self::auto()
    }
}

impl FitStrategy for HoltLinear {
    fn fit_and_forecast(&self, train: &SalesSeries, horizon: usize) -> Result<ModelForecast> {
        let values = train.values();
        if values.len() < 3 {
            return Err(self.fit_failed(format!(
                "need at least 3 observations for an additive trend, got {}",
                values.len()
            )));
        }

        let (alpha, beta) = match (self.alpha, self.beta) {
            (Some(alpha), Some(beta)) => (alpha, beta),
            _ => Self::optimize(values)
                .ok_or_else(|| self.fit_failed("smoothing parameter search did not converge"))?,
        };

        let (level, trend) = Self::smooth(values, alpha, beta);
        if !level.is_finite() || !trend.is_finite() {
            return Err(self.fit_failed("smoothing produced a non-finite state"));
        }

        let forecasts: Vec<f64> = (1..=horizon).map(|h| level + h as f64 * trend).collect();
        ModelForecast::new(forecasts, horizon)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::HoltLinear
    }

    fn name(&self) -> &str {
        &self.name
    }
}
