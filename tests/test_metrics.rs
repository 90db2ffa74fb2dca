use assert_approx_eq::assert_approx_eq;
use forecast_sales::error::ForecastError;
use forecast_sales::metrics::accuracy;

#[test]
fn test_accuracy_values() {
    let forecast = vec![2.0, 4.0, 6.0];
    let actual = vec![1.0, 5.0, 6.0];

    let metrics = accuracy(&forecast, &actual).unwrap();

    assert_approx_eq!(metrics.mae, 2.0 / 3.0);
    assert_approx_eq!(metrics.rmse, (2.0f64 / 3.0).sqrt());
}

#[test]
fn test_accuracy_perfect_forecast() {
    let values = vec![10.0, 20.0, 30.0];
    let metrics = accuracy(&values, &values).unwrap();

    assert_approx_eq!(metrics.rmse, 0.0);
    assert_approx_eq!(metrics.mae, 0.0);
}

#[test]
fn test_empty_split_is_undefined_not_zero() {
    let result = accuracy(&[], &[]);
    assert!(matches!(result, Err(ForecastError::MetricUndefined)));

    let result = accuracy(&[1.0], &[]);
    assert!(matches!(result, Err(ForecastError::MetricUndefined)));
}

#[test]
fn test_length_mismatch_is_rejected() {
    let result = accuracy(&[1.0, 2.0], &[1.0]);
    assert!(matches!(result, Err(ForecastError::ValidationError(_))));
}

#[test]
fn test_metrics_display() {
    let metrics = accuracy(&[1.0, 2.0], &[2.0, 3.0]).unwrap();
    let rendered = format!("{}", metrics);

    assert!(rendered.contains("RMSE"));
    assert!(rendered.contains("MAE"));
}
