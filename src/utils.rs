//! Utility functions for the forecast_sales crate

use crate::data::SalesSeries;
use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Split a sales series into training and test sub-series.
///
/// The training split takes the first `floor(N * ratio)` points and the
/// test split the remainder. Either partition coming out empty is an
/// error: a split that cannot be evaluated is not silently accepted.
pub fn train_test_split(series: &SalesSeries, ratio: f64) -> Result<(SalesSeries, SalesSeries)> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "Split ratio must be between 0 and 1, got {}",
            ratio
        )));
    }

    let n = series.len();
    if n < 2 {
        return Err(ForecastError::InsufficientData {
            stage: "split",
            detail: format!("need at least 2 observations, got {}", n),
        });
    }

    let train_len = (n as f64 * ratio).floor() as usize;
    if train_len == 0 || train_len == n {
        return Err(ForecastError::InsufficientData {
            stage: "split",
            detail: format!(
                "ratio {} leaves an empty partition for {} observations",
                ratio, n
            ),
        });
    }

    Ok((series.slice(0, Some(train_len)), series.slice(train_len, None)))
}

/// Create the future years following the last observed year
pub fn future_years(last_year: i32, horizon: usize) -> Vec<i32> {
    (1..=horizon as i32).map(|i| last_year + i).collect()
}

/// Two-sided standard normal quantile for the given confidence level
pub(crate) fn normal_quantile(confidence: f64) -> f64 {
    Normal::new(0.0, 1.0)
        .map(|n| n.inverse_cdf(0.5 + confidence / 2.0))
        .unwrap_or(1.96)
}
