//! The alert rule evaluators.
//!
//! Each rule is a pure function over one metric family. Entity-level rules
//! return `Option<AlertRecord>` so that missing or malformed data for one
//! entity means "no alert", never an error.

use crate::alerts::{AlertKind, AlertRecord, Severity};
use tracing::warn;

/// Check every forecast period against the overall sales threshold,
/// emitting one HIGH alert per breaching period
pub fn overall_forecast_low(future: &[f64], threshold: f64) -> Vec<AlertRecord> {
    let mut alerts = Vec::new();

    for (index, &value) in future.iter().enumerate() {
        if !value.is_finite() {
            warn!(period = index + 1, "skipping non-finite forecast value");
            continue;
        }

        if value < threshold {
            let record = AlertRecord {
                kind: AlertKind::OverallForecastLow,
                severity: Severity::High,
                subject: None,
                message: format!(
                    "Forecasted sales for year {} ({:.0}) falls below threshold ({:.0})",
                    index + 1,
                    value,
                    threshold
                ),
                observed_value: value,
                threshold_or_baseline: threshold,
                gap: threshold - value,
            };
            warn!("{}", record.message);
            alerts.push(record);
        }
    }

    alerts
}

/// Check a model's or region's most recent sales against its threshold,
/// emitting a MEDIUM alert when below
pub fn entity_below_threshold(
    kind: AlertKind,
    name: &str,
    latest: f64,
    threshold: f64,
) -> Option<AlertRecord> {
    if !latest.is_finite() {
        return None;
    }

    if latest >= threshold {
        return None;
    }

    let label = match kind {
        AlertKind::ModelUnderperformance => "Model",
        AlertKind::RegionDecline => "Region",
        _ => "Entity",
    };

    let record = AlertRecord {
        kind,
        severity: Severity::Medium,
        subject: Some(name.to_string()),
        message: format!(
            "{} {} recent sales ({:.0}) below threshold ({:.0})",
            label, name, latest, threshold
        ),
        observed_value: latest,
        threshold_or_baseline: threshold,
        gap: threshold - latest,
    };
    warn!("{}", record.message);

    Some(record)
}

/// Check an entity's history for a sharp drop between the previous and
/// latest observations, emitting a MEDIUM alert when the fractional drop
/// meets or exceeds the threshold
pub fn declining_trend(
    name: &str,
    history: &[f64],
    decline_threshold: f64,
) -> Option<AlertRecord> {
    if history.len() < 2 {
        return None;
    }

    let latest = history[history.len() - 1];
    let reference = history[history.len() - 2];
    if !latest.is_finite() || !reference.is_finite() || reference <= 0.0 {
        return None;
    }

    let decline_rate = (reference - latest) / reference;
    if decline_rate < decline_threshold {
        return None;
    }

    let record = AlertRecord {
        kind: AlertKind::DecliningTrend,
        severity: Severity::Medium,
        subject: Some(name.to_string()),
        message: format!("{} showing {:.1}% decline", name, decline_rate * 100.0),
        observed_value: latest,
        threshold_or_baseline: reference,
        gap: decline_rate * 100.0,
    };
    warn!("{}", record.message);

    Some(record)
}
