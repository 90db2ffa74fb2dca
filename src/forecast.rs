//! Forecast engine: orchestrates the fitting strategies in a fixed
//! fallback order and assembles the final forecast

use crate::config::MIN_OBSERVATIONS;
use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::metrics::{accuracy, AccuracyMetrics};
use crate::models::arima::ArimaModel;
use crate::models::exponential_smoothing::HoltLinear;
use crate::models::naive::NaiveRepeat;
use crate::models::{FitStrategy, ModelForecast, ModelKind};
use crate::utils::{future_years, train_test_split};
use serde::Serialize;
use tracing::{debug, warn};

/// Completed forecast: historical series, held-out evaluation and the
/// future predictions. A value type, never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct SalesForecast {
    historical: SalesSeries,
    test_predictions: Vec<f64>,
    future_predictions: Vec<f64>,
    future_years: Vec<i32>,
    confidence_interval: Option<(Vec<f64>, Vec<f64>)>,
    metrics: Option<AccuracyMetrics>,
    model_used: ModelKind,
}

impl SalesForecast {
    /// The series the forecast was produced from
    pub fn historical(&self) -> &SalesSeries {
        &self.historical
    }

    /// Predictions over the held-out test split
    pub fn test_predictions(&self) -> &[f64] {
        &self.test_predictions
    }

    /// Predictions for the future periods
    pub fn future_predictions(&self) -> &[f64] {
        &self.future_predictions
    }

    /// Calendar years the future predictions refer to
    pub fn future_years(&self) -> &[i32] {
        &self.future_years
    }

    /// Lower and upper interval bounds aligned to the future predictions,
    /// present only when the primary tier produced the final forecast
    pub fn confidence_interval(&self) -> Option<(&[f64], &[f64])> {
        self.confidence_interval
            .as_ref()
            .map(|(lower, upper)| (lower.as_slice(), upper.as_slice()))
    }

    /// Accuracy on the test split; absent when it was undefined
    pub fn metrics(&self) -> Option<&AccuracyMetrics> {
        self.metrics.as_ref()
    }

    /// Which tier produced the future predictions
    pub fn model_used(&self) -> ModelKind {
        self.model_used
    }

    /// Serialize the forecast to JSON for the export collaborator
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Forecast engine with a cascading model fallback.
///
/// Strategies are tried strictly in order; a tier is only attempted once
/// the previous one has failed its fit, and the cascade never climbs back
/// to an earlier tier.
#[derive(Debug)]
pub struct ForecastEngine {
    strategies: Vec<Box<dyn FitStrategy>>,
}

impl ForecastEngine {
    /// Create an engine with the standard chain: ARIMA, then Holt linear
    /// smoothing, then naive repeat
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(ArimaModel::default()),
            Box::new(HoltLinear::auto()),
            Box::new(NaiveRepeat::new()),
        ])
    }

    /// Create an engine with a caller-supplied strategy chain
    pub fn with_strategies(strategies: Vec<Box<dyn FitStrategy>>) -> Self {
        Self { strategies }
    }

    /// Produce a forecast for `horizon` future periods.
    ///
    /// The series is split per the ratio, the chain is walked on the train
    /// split to pick a tier and score it against the test split, and the
    /// chosen tier is refit on the full series for the final predictions.
    /// If the refit fails, the cascade continues downward from that tier.
    pub fn forecast(
        &self,
        series: &SalesSeries,
        split_ratio: f64,
        horizon: usize,
    ) -> Result<SalesForecast> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon(horizon));
        }

        if series.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                stage: "forecast",
                detail: format!(
                    "need at least {} observations, got {}",
                    MIN_OBSERVATIONS,
                    series.len()
                ),
            });
        }

        let (train, test) = train_test_split(series, split_ratio)?;

        let (tier, test_forecast) = self.fit_from(0, &train, test.len())?;
        debug!(
            model = self.strategies[tier].name(),
            "test-window fit succeeded"
        );

        let metrics = match accuracy(test_forecast.values(), test.values()) {
            Ok(metrics) => Some(metrics),
            Err(ForecastError::MetricUndefined) => {
                warn!("test split is empty; accuracy metrics are undefined");
                None
            }
            Err(other) => return Err(other),
        };

        let (final_tier, future) = self.fit_from(tier, series, horizon)?;

        // Interval estimates are only trusted from the head of the chain
        let confidence_interval = if final_tier == 0 {
            future.intervals().map(|intervals| {
                let lower = intervals.iter().map(|(l, _)| *l).collect();
                let upper = intervals.iter().map(|(_, u)| *u).collect();
                (lower, upper)
            })
        } else {
            None
        };

        let last_year = series.last_year().unwrap_or_default();

        Ok(SalesForecast {
            historical: series.clone(),
            test_predictions: test_forecast.values().to_vec(),
            future_predictions: future.values().to_vec(),
            future_years: future_years(last_year, horizon),
            confidence_interval,
            metrics,
            model_used: self.strategies[final_tier].kind(),
        })
    }

    /// Walk the strategy chain starting at `start`, returning the index
    /// and forecast of the first tier whose fit succeeds
    fn fit_from(
        &self,
        start: usize,
        series: &SalesSeries,
        horizon: usize,
    ) -> Result<(usize, ModelForecast)> {
        for (index, strategy) in self.strategies.iter().enumerate().skip(start) {
            match strategy.fit_and_forecast(series, horizon) {
                Ok(forecast) => return Ok((index, forecast)),
                Err(ForecastError::FitFailed { model, reason }) => {
                    warn!(%model, %reason, "fit failed, advancing to the next fallback");
                }
                Err(other) => return Err(other),
            }
        }

        Err(ForecastError::ForecastingError(
            "every strategy in the fallback chain failed".to_string(),
        ))
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}
