use forecast_sales::config::{FORECAST_HORIZON, TRAIN_TEST_SPLIT};
use forecast_sales::{
    AlertEvaluator, AlertKind, AlertSystem, DataLoader, EvaluatorState, ForecastEngine,
    MetricsBundle, ThresholdConfig,
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Fifteen years of two models in two regions. The X5 collapses in the
/// final year, which should trip the model, region and trend rules.
fn create_sample_data() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Year,Model,Region,Sales_Volume").unwrap();

    for i in 0..15i64 {
        let year = 2010 + i;

        let x5_volume = if i == 14 {
            400
        } else {
            1000 + 20 * i + (i % 2) * 50
        };
        writeln!(file, "{},X5,Europe,{}", year, x5_volume).unwrap();

        let x3_volume = 900 + 10 * i;
        writeln!(file, "{},X3,Asia,{}", year, x3_volume).unwrap();
    }

    file
}

#[test]
fn test_full_pipeline() {
    // 1. Load the sales table
    let data_file = create_sample_data();
    let data = DataLoader::from_csv(data_file.path()).unwrap();
    assert_eq!(data.len(), 30);

    // 2. Aggregate to the yearly series and forecast three years ahead
    let series = data.yearly_totals().unwrap();
    assert_eq!(series.len(), 15);

    let engine = ForecastEngine::new();
    let forecast = engine
        .forecast(&series, TRAIN_TEST_SPLIT, FORECAST_HORIZON)
        .unwrap();

    assert_eq!(forecast.future_predictions().len(), 3);
    assert_eq!(forecast.future_years(), &[2025, 2026, 2027]);
    assert!(forecast.metrics().is_some());

    // 3. Derive thresholds from the data and assemble the metric extracts
    let top_models = data.top_models(5).unwrap();
    assert_eq!(top_models[0], "X5");

    let thresholds = ThresholdConfig::from_sales(&data, &top_models).unwrap();
    let bundle = MetricsBundle::from_sales(&forecast, &data, &top_models).unwrap();

    // 4. Run the alert checks
    let mut system = AlertSystem::new(thresholds);
    let mut evaluator = AlertEvaluator::new();
    evaluator.run_checks(Some(&bundle), &mut system).unwrap();
    assert_eq!(evaluator.state(), EvaluatorState::Evaluated);

    let kinds: Vec<(AlertKind, Option<&str>)> = system
        .records()
        .iter()
        .map(|r| (r.kind, r.subject.as_deref()))
        .collect();

    // The collapsed X5 trips the model, region and trend rules
    assert!(kinds.contains(&(AlertKind::ModelUnderperformance, Some("X5"))));
    assert!(kinds.contains(&(AlertKind::RegionDecline, Some("Europe"))));
    assert!(kinds.contains(&(AlertKind::DecliningTrend, Some("X5"))));

    // The healthy X3 and Asia stay quiet
    assert!(!kinds.contains(&(AlertKind::ModelUnderperformance, Some("X3"))));
    assert!(!kinds.contains(&(AlertKind::RegionDecline, Some("Asia"))));
    assert!(!kinds.contains(&(AlertKind::DecliningTrend, Some("X3"))));

    // 5. Reporting is a pure, repeatable read
    let report = evaluator.generate_alert_report(&system);
    assert_eq!(report, evaluator.generate_alert_report(&system));
    assert_eq!(report.total, system.len());

    let rendered = format!("{}", report);
    assert!(rendered.contains("MEDIUM SEVERITY ALERTS:"));

    let json = report.to_json().unwrap();
    assert!(json.contains("DecliningTrend"));

    // 6. The forecast itself serializes for the export collaborator
    assert!(forecast.to_json().unwrap().contains("future_predictions"));
}

#[test]
fn test_pipeline_without_forecast_fails_evaluation() {
    let data_file = create_sample_data();
    let data = DataLoader::from_csv(data_file.path()).unwrap();

    let top_models = data.top_models(5).unwrap();
    let thresholds = ThresholdConfig::from_sales(&data, &top_models).unwrap();

    let mut system = AlertSystem::new(thresholds);
    let mut evaluator = AlertEvaluator::new();

    // The forecasting stage never ran, so there is no bundle to evaluate
    assert!(evaluator.run_checks(None, &mut system).is_err());
    assert_eq!(evaluator.state(), EvaluatorState::Failed);
    assert!(system.is_empty());
}
