use super::irrigation::CRITICAL_MOISTURE;
use crate::models::{MoistureAlert, MoistureReading, Severity};

/// Distance below the threshold at which an advisory becomes a warning
const WARNING_MARGIN: f64 = 0.10;

/// Moisture alert rule - flags a field whose newest reading is under its threshold
///
/// Severity levels:
/// - Advisory: below threshold by less than 0.10
/// - Warning: below threshold by 0.10 or more
/// - Critical: below the 0.20 critical line
pub fn evaluate_moisture_alert(
    readings: &[MoistureReading],
    threshold: f64,
) -> Option<MoistureAlert> {
    let latest = readings.iter().max_by(|a, b| {
        a.observation_date
            .cmp(&b.observation_date)
            .then_with(|| a.moisture_index.total_cmp(&b.moisture_index))
    })?;

    let moisture = latest.moisture_index;
    if moisture >= threshold {
        return None;
    }

    let severity = if moisture < CRITICAL_MOISTURE {
        Severity::Critical
    } else if moisture < threshold - WARNING_MARGIN {
        Severity::Warning
    } else {
        Severity::Advisory
    };

    let message = match severity {
        Severity::Critical => format!(
            "Soil moisture is critically low ({:.0}%). Irrigate as soon as possible.",
            moisture * 100.0
        ),
        Severity::Warning => format!(
            "Soil moisture ({:.0}%) is well below the {:.0}% alert level.",
            moisture * 100.0,
            threshold * 100.0
        ),
        Severity::Advisory => format!(
            "Soil moisture ({:.0}%) has dropped below the {:.0}% alert level.",
            moisture * 100.0,
            threshold * 100.0
        ),
    };

    tracing::info!(
        %severity,
        moisture,
        threshold,
        date = %latest.observation_date,
        "Moisture alert raised"
    );

    Some(MoistureAlert {
        severity,
        moisture_index: moisture,
        threshold,
        observation_date: latest.observation_date,
        message,
    })
}
