//! Alert evaluator: runs the rule set in a fixed order against a bundle
//! of metric extracts and accumulates alerts into the caller's system

use crate::alerts::{rules, AlertKind, AlertRecord, AlertSystem, Severity};
use crate::data::SalesData;
use crate::error::{ForecastError, Result};
use crate::forecast::SalesForecast;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Lifecycle of an evaluation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorState {
    /// No run has started
    Idle,
    /// Rules are executing
    Checking,
    /// The run completed; every rule got its chance
    Evaluated,
    /// The input bundle was absent; nothing was evaluated
    Failed,
}

/// Named metric extracts consumed by the rule set
#[derive(Debug, Clone)]
pub struct MetricsBundle {
    /// Overall future forecast values
    pub future_predictions: Vec<f64>,
    /// Per-model yearly sales histories
    pub model_history: BTreeMap<String, Vec<f64>>,
    /// Per-region sales for the most recent year
    pub region_latest: BTreeMap<String, f64>,
}

impl MetricsBundle {
    /// Create a bundle from already-extracted metrics
    pub fn new(
        future_predictions: Vec<f64>,
        model_history: BTreeMap<String, Vec<f64>>,
        region_latest: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            future_predictions,
            model_history,
            region_latest,
        }
    }

    /// Assemble a bundle from a completed forecast and the sales data the
    /// entity extracts come from
    pub fn from_sales(
        forecast: &SalesForecast,
        data: &SalesData,
        models: &[String],
    ) -> Result<Self> {
        Ok(Self {
            future_predictions: forecast.future_predictions().to_vec(),
            model_history: data.model_history(models)?,
            region_latest: data.region_latest()?,
        })
    }
}

/// Runs the alert rules in a fixed order: overall forecast, model
/// underperformance, region underperformance, declining trend.
///
/// A malformed entity is skipped with a warning; only a missing bundle
/// fails the run.
#[derive(Debug)]
pub struct AlertEvaluator {
    state: EvaluatorState,
}

impl AlertEvaluator {
    /// Create an evaluator in the idle state
    pub fn new() -> Self {
        Self {
            state: EvaluatorState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> EvaluatorState {
        self.state
    }

    /// Run every rule against the bundle, appending triggered alerts to
    /// the caller-owned system
    pub fn run_checks(
        &mut self,
        bundle: Option<&MetricsBundle>,
        system: &mut AlertSystem,
    ) -> Result<()> {
        let Some(bundle) = bundle else {
            self.state = EvaluatorState::Failed;
            return Err(ForecastError::MissingInputBundle(
                "no metrics bundle; the forecasting stage did not run".to_string(),
            ));
        };

        self.state = EvaluatorState::Checking;
        let thresholds = system.thresholds().clone();

        for record in rules::overall_forecast_low(&bundle.future_predictions, thresholds.overall) {
            system.append(record);
        }

        for (name, history) in &bundle.model_history {
            match history.last() {
                Some(&latest) if latest.is_finite() => {
                    let threshold = thresholds.model_threshold(name);
                    if let Some(record) = rules::entity_below_threshold(
                        AlertKind::ModelUnderperformance,
                        name,
                        latest,
                        threshold,
                    ) {
                        system.append(record);
                    }
                }
                _ => warn!(model = %name, "skipping model with empty or malformed history"),
            }
        }

        for (name, &latest) in &bundle.region_latest {
            if !latest.is_finite() {
                warn!(region = %name, "skipping region with malformed sales value");
                continue;
            }

            let threshold = thresholds.region_threshold(name);
            if let Some(record) =
                rules::entity_below_threshold(AlertKind::RegionDecline, name, latest, threshold)
            {
                system.append(record);
            }
        }

        for (name, history) in &bundle.model_history {
            if let Some(record) =
                rules::declining_trend(name, history, thresholds.decline_threshold)
            {
                system.append(record);
            }
        }

        self.state = EvaluatorState::Evaluated;
        Ok(())
    }

    /// Build a report from the accumulated alerts. A pure read: it never
    /// re-runs evaluation and repeated calls yield identical reports.
    pub fn generate_alert_report(&self, system: &AlertSystem) -> AlertReport {
        let records = system.records();

        AlertReport {
            total: records.len(),
            high: filter_severity(records, Severity::High),
            medium: filter_severity(records, Severity::Medium),
            low: filter_severity(records, Severity::Low),
        }
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_severity(records: &[AlertRecord], severity: Severity) -> Vec<AlertRecord> {
    records
        .iter()
        .filter(|r| r.severity == severity)
        .cloned()
        .collect()
}

/// Alerts grouped by severity, insertion order preserved within groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertReport {
    /// Total number of triggered alerts
    pub total: usize,
    /// High severity alerts
    pub high: Vec<AlertRecord>,
    /// Medium severity alerts
    pub medium: Vec<AlertRecord>,
    /// Low severity alerts
    pub low: Vec<AlertRecord>,
}

impl AlertReport {
    /// Serialize the report to JSON for the export collaborator
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl std::fmt::Display for AlertReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SALES ALERT REPORT")?;

        if self.total == 0 {
            writeln!(f, "No alerts triggered; all metrics within acceptable range")?;
            return Ok(());
        }

        writeln!(f, "Total alerts: {}", self.total)?;

        if !self.high.is_empty() {
            writeln!(f, "HIGH SEVERITY ALERTS:")?;
            for alert in &self.high {
                writeln!(f, "  - {}", alert.message)?;
            }
        }

        if !self.medium.is_empty() {
            writeln!(f, "MEDIUM SEVERITY ALERTS:")?;
            for alert in &self.medium {
                writeln!(f, "  - {}", alert.message)?;
            }
        }

        if !self.low.is_empty() {
            writeln!(f, "LOW SEVERITY ALERTS:")?;
            for alert in &self.low {
                writeln!(f, "  - {}", alert.message)?;
            }
        }

        Ok(())
    }
}
