//! Tuning constants for forecasting and alerting

/// ARIMA order (p, d, q) used by the primary fitting strategy
pub const ARIMA_ORDER: (usize, usize, usize) = (1, 1, 1);

/// Number of future periods forecast by default
pub const FORECAST_HORIZON: usize = 3;

/// Default train/test split ratio
pub const TRAIN_TEST_SPLIT: f64 = 0.8;

/// Smallest series the forecast engine accepts; leaves room for a
/// two-point train split plus a non-empty test split
pub const MIN_OBSERVATIONS: usize = 4;

/// Confidence level for forecast intervals
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Overall alert threshold as a fraction of average yearly sales
pub const OVERALL_THRESHOLD_MULTIPLIER: f64 = 0.8;

/// Per-model alert threshold as a fraction of the model's average volume
pub const MODEL_THRESHOLD_MULTIPLIER: f64 = 0.8;

/// Per-region alert threshold as a fraction of the region's average volume
pub const REGION_THRESHOLD_MULTIPLIER: f64 = 0.8;

/// Fractional drop between consecutive observations that counts as a
/// declining trend (inclusive boundary)
pub const DECLINE_THRESHOLD: f64 = 0.15;
