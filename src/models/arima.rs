//! ARIMA model: the primary tier of the forecast fallback chain

use crate::config::{ARIMA_ORDER, CONFIDENCE_LEVEL};
use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use crate::models::{FitStrategy, ModelForecast, ModelKind};
use crate::utils::normal_quantile;
use tracing::debug;

const COEFFICIENT_STEP: f64 = 0.05;
const MIN_VARIANCE: f64 = 1e-12;

/// ARIMA model (AutoRegressive Integrated Moving Average).
///
/// Coefficients are estimated by a conditional-sum-of-squares search over
/// the stationarity/invertibility region; only first-order AR and MA terms
/// are estimated. Unsupported orders, degenerate input and non-convergent
/// searches all fail the fit, which hands control to the next tier.
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// Confidence level for forecast intervals
    confidence: f64,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
            confidence: CONFIDENCE_LEVEL,
        }
    }

    /// Override the confidence level used for forecast intervals
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    fn fit_failed(&self, reason: impl Into<String>) -> ForecastError {
        ForecastError::FitFailed {
            model: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Conditional sum of squares for an ARMA(1,1) on the centered series,
    /// returning the SSE and the final residual
    fn css(x: &[f64], phi: f64, theta: f64) -> (f64, f64) {
        let mut prev_error = 0.0;
        let mut sse = 0.0;

        for t in 1..x.len() {
            let error = x[t] - phi * x[t - 1] - theta * prev_error;
            sse += error * error;
            prev_error = error;
        }

        (sse, prev_error)
    }

    fn coefficient_grid(order: usize) -> Vec<f64> {
        if order == 0 {
            vec![0.0]
        } else {
            (-19..=19).map(|i| i as f64 * COEFFICIENT_STEP).collect()
        }
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        let (p, d, q) = ARIMA_ORDER;
        Self::new(p, d, q)
    }
}

impl FitStrategy for ArimaModel {
    fn fit_and_forecast(&self, train: &SalesSeries, horizon: usize) -> Result<ModelForecast> {
        if self.p > 1 || self.q > 1 {
            return Err(self.fit_failed(format!(
                "only first-order AR and MA terms are supported, got ({},{},{})",
                self.p, self.d, self.q
            )));
        }

        let values = train.values();
        let min_obs = self.p + self.d + self.q + 3;
        if values.len() < min_obs {
            return Err(self.fit_failed(format!(
                "need at least {} observations, got {}",
                min_obs,
                values.len()
            )));
        }

        // Difference d times, remembering the last value at each level for
        // the integration on the way back
        let mut work = values.to_vec();
        let mut level_tails = Vec::with_capacity(self.d);
        for _ in 0..self.d {
            level_tails.push(work[work.len() - 1]);
            work = work.windows(2).map(|w| w[1] - w[0]).collect();
        }

        let n = work.len() as f64;
        let mean = work.iter().sum::<f64>() / n;
        let x: Vec<f64> = work.iter().map(|v| v - mean).collect();

        let variance = x.iter().map(|v| v * v).sum::<f64>() / n;
        if !variance.is_finite() || variance < MIN_VARIANCE {
            return Err(self.fit_failed("degenerate series: no variance after differencing"));
        }

        // Grid search over the coefficient space
        let mut best: Option<(f64, f64, f64, f64)> = None;
        for &phi in &Self::coefficient_grid(self.p) {
            for &theta in &Self::coefficient_grid(self.q) {
                let (sse, last_error) = Self::css(&x, phi, theta);
                if sse.is_finite() && best.map_or(true, |(_, _, b, _)| sse < b) {
                    best = Some((phi, theta, sse, last_error));
                }
            }
        }

        let (phi, theta, sse, last_error) =
            best.ok_or_else(|| self.fit_failed("coefficient search did not converge"))?;
        debug!(model = %self.name, phi, theta, "estimated coefficients");

        let effective = x.len() - 1;
        let dof = effective.saturating_sub(self.p + self.q + 1).max(1);
        let sigma2 = sse / dof as f64;

        // Recursive forecast on the differenced scale
        let mut predictions = Vec::with_capacity(horizon);
        let mut x_prev = x[x.len() - 1];
        for step in 0..horizon {
            let moving = if step == 0 { theta * last_error } else { 0.0 };
            let x_hat = phi * x_prev + moving;
            predictions.push(mean + x_hat);
            x_prev = x_hat;
        }

        // Integrate back to the original scale
        for &tail in level_tails.iter().rev() {
            let mut acc = tail;
            predictions = predictions
                .into_iter()
                .map(|p| {
                    acc += p;
                    acc
                })
                .collect();
        }

        // Psi weights of the fitted process, accumulated through each
        // integration level, give the forecast error variance
        let mut psi = Vec::with_capacity(horizon);
        psi.push(1.0);
        if horizon > 1 {
            psi.push(phi + theta);
            for step in 2..horizon {
                let w = phi * psi[step - 1];
                psi.push(w);
            }
        }
        for _ in 0..self.d {
            let mut acc = 0.0;
            psi = psi
                .iter()
                .map(|&w| {
                    acc += w;
                    acc
                })
                .collect();
        }

        let z = normal_quantile(self.confidence);
        let mut intervals = Vec::with_capacity(horizon);
        let mut var_acc = 0.0;
        for (step, &point) in predictions.iter().enumerate() {
            var_acc += psi[step] * psi[step];
            let se = (sigma2 * var_acc).sqrt();
            intervals.push((point - z * se, point + z * se));
        }

        ModelForecast::with_intervals(predictions, horizon, intervals)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Arima
    }

    fn name(&self) -> &str {
        &self.name
    }
}
