use forecast_sales::alerts::evaluator::{AlertEvaluator, EvaluatorState, MetricsBundle};
use forecast_sales::alerts::rules::{declining_trend, entity_below_threshold, overall_forecast_low};
use forecast_sales::alerts::{AlertKind, AlertSystem, Severity, ThresholdConfig};
use forecast_sales::error::ForecastError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::BTreeMap;

#[test]
fn test_overall_rule_emits_one_alert_per_breaching_period() {
    let threshold = 13_513_372.0;
    let future = vec![8_108_023.0, 9_459_361.0, 6_756_686.0];

    let alerts = overall_forecast_low(&future, threshold);

    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0].gap, 5_405_349.0);
    assert_eq!(alerts[1].gap, 4_054_011.0);
    assert_eq!(alerts[2].gap, 6_756_686.0);

    for alert in &alerts {
        assert_eq!(alert.kind, AlertKind::OverallForecastLow);
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.threshold_or_baseline, threshold);
        assert!(alert.subject.is_none());
    }
}

#[test]
fn test_overall_rule_quiet_when_above_threshold() {
    let alerts = overall_forecast_low(&[20.0, 30.0], 10.0);
    assert!(alerts.is_empty());
}

#[test]
fn test_entity_rule_below_and_above() {
    let alert =
        entity_below_threshold(AlertKind::ModelUnderperformance, "X5", 90.0, 100.0).unwrap();

    assert_eq!(alert.severity, Severity::Medium);
    assert_eq!(alert.subject.as_deref(), Some("X5"));
    assert_eq!(alert.gap, 10.0);
    assert!(alert.message.contains("Model X5"));

    assert!(entity_below_threshold(AlertKind::ModelUnderperformance, "X5", 100.0, 100.0).is_none());
    assert!(entity_below_threshold(AlertKind::RegionDecline, "Asia", f64::NAN, 100.0).is_none());
}

#[rstest]
#[case::steep_decline(80.0, true)]
#[case::exact_boundary(85.0, true)]
#[case::just_under(85.01, false)]
fn test_declining_trend_boundary(#[case] latest: f64, #[case] triggers: bool) {
    let history = vec![120.0, 100.0, latest];
    let alert = declining_trend("3 Series", &history, 0.15);

    assert_eq!(alert.is_some(), triggers);
    if let Some(alert) = alert {
        assert_eq!(alert.kind, AlertKind::DecliningTrend);
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.threshold_or_baseline, 100.0);
        // The gap carries the percentage drop
        assert!((alert.gap - (100.0 - latest)).abs() < 1e-9);
    }
}

#[test]
fn test_declining_trend_skips_malformed_history() {
    assert!(declining_trend("X1", &[100.0], 0.15).is_none());
    assert!(declining_trend("X1", &[], 0.15).is_none());
    assert!(declining_trend("X1", &[0.0, 50.0], 0.15).is_none());
    assert!(declining_trend("X1", &[f64::NAN, 50.0], 0.15).is_none());
}

#[test]
fn test_threshold_lookup_falls_back_to_overall() {
    let mut config = ThresholdConfig::new(1000.0);
    config.per_model.insert("X5".to_string(), 400.0);

    assert_eq!(config.model_threshold("X5"), 400.0);
    assert_eq!(config.model_threshold("unknown"), 1000.0);
    assert_eq!(config.region_threshold("unknown"), 1000.0);
}

fn sample_bundle() -> MetricsBundle {
    let mut model_history = BTreeMap::new();
    // Below its 400.0 threshold and in a 20% decline
    model_history.insert("X5".to_string(), vec![500.0, 380.0, 304.0]);
    // Healthy model
    model_history.insert("X3".to_string(), vec![600.0, 650.0, 700.0]);
    // Malformed: no observations at all
    model_history.insert("i8".to_string(), vec![]);

    let mut region_latest = BTreeMap::new();
    region_latest.insert("Asia".to_string(), 150.0);
    region_latest.insert("Europe".to_string(), 900.0);

    MetricsBundle::new(vec![120.0, 300.0], model_history, region_latest)
}

fn sample_thresholds() -> ThresholdConfig {
    let mut config = ThresholdConfig::new(200.0);
    config.per_model.insert("X5".to_string(), 400.0);
    config.per_model.insert("X3".to_string(), 500.0);
    config.per_region.insert("Asia".to_string(), 300.0);
    config.per_region.insert("Europe".to_string(), 300.0);
    config
}

#[test]
fn test_evaluator_runs_rules_in_fixed_order() {
    let mut system = AlertSystem::new(sample_thresholds());
    let mut evaluator = AlertEvaluator::new();
    assert_eq!(evaluator.state(), EvaluatorState::Idle);

    evaluator
        .run_checks(Some(&sample_bundle()), &mut system)
        .unwrap();

    assert_eq!(evaluator.state(), EvaluatorState::Evaluated);

    // One overall breach (120 < 200), X5 underperforming, Asia
    // underperforming, X5 declining; the empty i8 history is skipped
    let kinds: Vec<AlertKind> = system.records().iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            AlertKind::OverallForecastLow,
            AlertKind::ModelUnderperformance,
            AlertKind::RegionDecline,
            AlertKind::DecliningTrend,
        ]
    );

    let subjects: Vec<Option<&str>> = system
        .records()
        .iter()
        .map(|r| r.subject.as_deref())
        .collect();
    assert_eq!(subjects, vec![None, Some("X5"), Some("Asia"), Some("X5")]);
}

#[test]
fn test_evaluator_fails_without_bundle() {
    let mut system = AlertSystem::new(ThresholdConfig::new(100.0));
    let mut evaluator = AlertEvaluator::new();

    let result = evaluator.run_checks(None, &mut system);

    assert!(matches!(result, Err(ForecastError::MissingInputBundle(_))));
    assert_eq!(evaluator.state(), EvaluatorState::Failed);
    assert!(system.is_empty());
}

#[test]
fn test_report_is_idempotent() {
    let mut system = AlertSystem::new(sample_thresholds());
    let mut evaluator = AlertEvaluator::new();
    evaluator
        .run_checks(Some(&sample_bundle()), &mut system)
        .unwrap();

    let first = evaluator.generate_alert_report(&system);
    let second = evaluator.generate_alert_report(&system);

    assert_eq!(first, second);
    assert_eq!(first.total, system.len());
    assert_eq!(first.high.len(), 1);
    assert_eq!(first.medium.len(), 3);
    assert!(first.low.is_empty());
}

#[test]
fn test_report_display_groups_by_severity() {
    let mut system = AlertSystem::new(sample_thresholds());
    let mut evaluator = AlertEvaluator::new();
    evaluator
        .run_checks(Some(&sample_bundle()), &mut system)
        .unwrap();

    let rendered = format!("{}", evaluator.generate_alert_report(&system));
    assert!(rendered.contains("SALES ALERT REPORT"));
    assert!(rendered.contains("HIGH SEVERITY ALERTS:"));
    assert!(rendered.contains("MEDIUM SEVERITY ALERTS:"));

    let empty_system = AlertSystem::new(ThresholdConfig::new(0.0));
    let rendered = format!("{}", evaluator.generate_alert_report(&empty_system));
    assert!(rendered.contains("No alerts triggered"));
}

#[test]
fn test_report_serializes_to_json() {
    let mut system = AlertSystem::new(sample_thresholds());
    let mut evaluator = AlertEvaluator::new();
    evaluator
        .run_checks(Some(&sample_bundle()), &mut system)
        .unwrap();

    let json = evaluator.generate_alert_report(&system).to_json().unwrap();
    assert!(json.contains("OverallForecastLow"));
    assert!(json.contains("DecliningTrend"));
}
