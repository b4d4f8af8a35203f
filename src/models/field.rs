use super::crop::CropType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldProfile {
    pub id: Option<i64>,
    pub name: String,
    pub crop_type: CropType,
    pub area_hectares: f64,
    pub planting_date: Option<NaiveDate>,
    /// Per-field alert threshold; the configured default applies when unset
    pub moisture_threshold: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FieldProfile {
    pub fn new(name: String, crop_type: CropType, area_hectares: f64) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: None,
            name,
            crop_type,
            area_hectares,
            planting_date: None,
            moisture_threshold: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_planting_date(mut self, planting_date: NaiveDate) -> Self {
        self.planting_date = Some(planting_date);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.moisture_threshold = Some(threshold);
        self
    }

    pub fn threshold_or(&self, default: f64) -> f64 {
        self.moisture_threshold.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        let field = FieldProfile::new("North".into(), CropType::Wheat, 12.5)
            .with_planting_date(date)
            .with_threshold(0.35);

        assert!(field.id.is_none());
        assert_eq!(field.planting_date, Some(date));
        assert_eq!(field.threshold_or(0.3), 0.35);
    }

    #[test]
    fn threshold_falls_back_to_default() {
        let field = FieldProfile::new("South".into(), CropType::Corn, 3.0);
        assert_eq!(field.threshold_or(0.3), 0.3);
    }
}
