use crate::logic::normalizer::to_moisture_index;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default source label for Sentinel-1 derived readings
pub const SENTINEL1_SOURCE: &str = "sentinel-1";

/// A normalized soil moisture observation for one field and one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoistureReading {
    pub observation_date: NaiveDate,
    pub moisture_index: f64,
    pub vv_backscatter_db: f64,
    pub vh_backscatter_db: Option<f64>,
    pub source: String,
}

impl MoistureReading {
    /// Build a reading from raw VV/VH backscatter, normalizing VV into the moisture index
    pub fn from_backscatter(
        observation_date: NaiveDate,
        vv_db: f64,
        vh_db: Option<f64>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            observation_date,
            moisture_index: to_moisture_index(vv_db),
            vv_backscatter_db: vv_db,
            vh_backscatter_db: vh_db,
            source: source.into(),
        }
    }
}

/// Raw backscatter observation as delivered by the satellite extraction step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    pub observation_date: NaiveDate,
    pub vv_backscatter_db: f64,
    #[serde(default)]
    pub vh_backscatter_db: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
}

impl RawObservation {
    pub fn into_reading(self) -> MoistureReading {
        MoistureReading::from_backscatter(
            self.observation_date,
            self.vv_backscatter_db,
            self.vh_backscatter_db,
            self.source.unwrap_or_else(|| SENTINEL1_SOURCE.to_string()),
        )
    }
}

/// Sort newest-first and keep only the first reading seen for each date
pub fn dedupe_readings(mut readings: Vec<MoistureReading>) -> Vec<MoistureReading> {
    readings.sort_by(|a, b| b.observation_date.cmp(&a.observation_date));

    let mut seen = HashSet::new();
    readings.retain(|r| seen.insert(r.observation_date));
    readings
}
