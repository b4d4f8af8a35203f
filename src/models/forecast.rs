use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of forecast days (starting today) summarized into the planner scalars
pub const OUTLOOK_DAYS: i64 = 2;

/// Weather outlook consumed by the irrigation planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    /// 0.0-1.0
    pub rain_probability: f64,
    pub expected_rain_mm: f64,
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
}

impl WeatherForecast {
    /// Summarize daily entries into planner scalars using the first
    /// `OUTLOOK_DAYS` days starting at `today`. Past days are ignored.
    ///
    /// Returns `None` when no entry falls inside the outlook window; the
    /// planner then uses the crop's base water need.
    pub fn from_daily(mut daily: Vec<DailyForecast>, today: NaiveDate) -> Option<Self> {
        daily.retain(|d| d.date >= today);
        daily.sort_by_key(|d| d.date);

        let cutoff = today + chrono::Duration::days(OUTLOOK_DAYS);
        let outlook: Vec<&DailyForecast> = daily.iter().filter(|d| d.date < cutoff).collect();
        if outlook.is_empty() {
            return None;
        }

        let count = outlook.len() as f64;
        let temperature_c = outlook
            .iter()
            .map(|d| (d.high_temp_c + d.low_temp_c) / 2.0)
            .sum::<f64>()
            / count;
        let humidity_percent = outlook.iter().map(|d| d.avg_humidity).sum::<f64>() / count;
        let rain_probability = outlook
            .iter()
            .map(|d| d.rain_probability)
            .fold(0.0, f64::max);
        let expected_rain_mm = outlook.iter().map(|d| d.expected_rain_mm).sum();

        Some(Self {
            temperature_c,
            humidity_percent,
            rain_probability,
            expected_rain_mm,
            daily,
        })
    }
}

/// Aggregated daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high_temp_c: f64,
    pub low_temp_c: f64,
    pub avg_humidity: f64,
    /// 0.0-1.0
    pub rain_probability: f64,
    pub expected_rain_mm: f64,
}
