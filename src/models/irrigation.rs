use super::crop::CropStage;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::None => "None",
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Urgency::None => "✓",
            Urgency::Low => "→",
            Urgency::Medium => "⚠",
            Urgency::High => "⚠",
            Urgency::Critical => "!",
        }
    }

    /// One level lower when rain is likely. Critical and the two lowest levels stay put.
    pub fn softened(self) -> Self {
        match self {
            Urgency::High => Urgency::Medium,
            Urgency::Medium => Urgency::Low,
            other => other,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Urgency::Critical => {
                "Critically low soil moisture. Irrigate immediately to prevent crop damage."
            }
            Urgency::High => "Low soil moisture. Irrigation is recommended within 1-2 days.",
            Urgency::Medium => {
                "Soil moisture is below optimal. Plan irrigation in the next few days."
            }
            Urgency::Low => "Soil moisture is slightly below optimal. Monitor conditions.",
            Urgency::None => "Soil moisture is adequate. No irrigation needed.",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intermediate values behind a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrigationFactors {
    pub soil_moisture: f64,
    pub optimal_moisture: f64,
    pub deficit: f64,
    pub crop_stage: CropStage,
    pub daily_need_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrrigationRecommendation {
    pub needs_irrigation: bool,
    pub urgency: Urgency,
    pub water_amount_mm: f64,
    pub water_volume_liters: f64,
    pub next_irrigation_date: Option<NaiveDate>,
    pub message: String,
    pub factors: IrrigationFactors,
}

/// One day of the 7-day irrigation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub recommended: bool,
    pub water_amount_mm: f64,
    pub reason: String,
    pub weather_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_ordering() {
        assert!(Urgency::Critical > Urgency::High);
        assert!(Urgency::High > Urgency::Medium);
        assert!(Urgency::Low > Urgency::None);
    }

    #[test]
    fn softening_steps_down_one_level() {
        assert_eq!(Urgency::High.softened(), Urgency::Medium);
        assert_eq!(Urgency::Medium.softened(), Urgency::Low);
        assert_eq!(Urgency::Critical.softened(), Urgency::Critical);
        assert_eq!(Urgency::Low.softened(), Urgency::Low);
        assert_eq!(Urgency::None.softened(), Urgency::None);
    }

    #[test]
    fn urgency_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Urgency::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(serde_json::to_string(&Urgency::None).unwrap(), "\"none\"");
    }
}
