//! Alert records, threshold configuration and the append-only alert store

use crate::config::{
    DECLINE_THRESHOLD, MODEL_THRESHOLD_MULTIPLIER, OVERALL_THRESHOLD_MULTIPLIER,
    REGION_THRESHOLD_MULTIPLIER,
};
use crate::data::SalesData;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod evaluator;
pub mod rules;

/// What a single alert is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    /// A forecast period fell below the overall sales threshold
    OverallForecastLow,
    /// A model's most recent sales fell below its threshold
    ModelUnderperformance,
    /// A region's most recent sales fell below its threshold
    RegionDecline,
    /// A model's sales dropped sharply between consecutive periods
    DecliningTrend,
}

/// Severity class, fixed per alert kind: forecast-level breaches are HIGH,
/// entity-level breaches are MEDIUM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// One triggered alert. Immutable once appended to the alert system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    /// What the alert is about
    pub kind: AlertKind,
    /// Fixed severity of the alert kind
    pub severity: Severity,
    /// Model or region the alert refers to, absent for overall alerts
    pub subject: Option<String>,
    /// Human-readable summary
    pub message: String,
    /// The value that breached
    pub observed_value: f64,
    /// The threshold (or reference observation, for trend alerts)
    pub threshold_or_baseline: f64,
    /// Threshold minus observed value for "low" kinds; percentage drop
    /// for trend kinds
    pub gap: f64,
}

/// Alert thresholds, constructed once and read-only thereafter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdConfig {
    /// Threshold applied to every overall forecast period
    pub overall: f64,
    /// Per-model thresholds; models without an entry fall back to the
    /// overall threshold
    pub per_model: BTreeMap<String, f64>,
    /// Per-region thresholds; regions without an entry fall back to the
    /// overall threshold
    pub per_region: BTreeMap<String, f64>,
    /// Fractional drop that counts as a declining trend
    pub decline_threshold: f64,
}

impl ThresholdConfig {
    /// Create a config with the given overall threshold and no
    /// entity-specific entries
    pub fn new(overall: f64) -> Self {
        Self {
            overall,
            per_model: BTreeMap::new(),
            per_region: BTreeMap::new(),
            decline_threshold: DECLINE_THRESHOLD,
        }
    }

    /// Derive thresholds from historical sales: each threshold is the
    /// relevant historical average scaled by the configured multiplier
    pub fn from_sales(data: &SalesData, models: &[String]) -> Result<Self> {
        let overall = data.mean_yearly_total()? * OVERALL_THRESHOLD_MULTIPLIER;

        let mut per_model = BTreeMap::new();
        for name in models {
            let threshold = data.mean_volume_by_model(name)? * MODEL_THRESHOLD_MULTIPLIER;
            per_model.insert(name.clone(), threshold);
        }

        let mut per_region = BTreeMap::new();
        for name in data.regions()? {
            let threshold = data.mean_volume_by_region(&name)? * REGION_THRESHOLD_MULTIPLIER;
            per_region.insert(name, threshold);
        }

        Ok(Self {
            overall,
            per_model,
            per_region,
            decline_threshold: DECLINE_THRESHOLD,
        })
    }

    /// Threshold for a model, falling back to the overall threshold
    pub fn model_threshold(&self, name: &str) -> f64 {
        self.per_model.get(name).copied().unwrap_or(self.overall)
    }

    /// Threshold for a region, falling back to the overall threshold
    pub fn region_threshold(&self, name: &str) -> f64 {
        self.per_region.get(name).copied().unwrap_or(self.overall)
    }
}

/// Owns the threshold configuration and the ordered, append-only sequence
/// of triggered alerts. Created fresh per evaluation run; the only reset
/// is constructing a new instance.
#[derive(Debug, Clone)]
pub struct AlertSystem {
    thresholds: ThresholdConfig,
    alerts: Vec<AlertRecord>,
}

impl AlertSystem {
    /// Create an empty alert system with the given thresholds
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self {
            thresholds,
            alerts: Vec::new(),
        }
    }

    /// Get the threshold configuration
    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// All triggered alerts in evaluation order
    pub fn records(&self) -> &[AlertRecord] {
        &self.alerts
    }

    /// Number of triggered alerts
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Check if no alerts have been triggered
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub(crate) fn append(&mut self, record: AlertRecord) {
        self.alerts.push(record);
    }
}
