use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "↑ Rising",
            TrendDirection::Down => "↓ Falling",
            TrendDirection::Stable => "→ Stable",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary of a moisture index history, derived fresh on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub change_percent: f64,
    pub avg_moisture: f64,
    pub min_moisture: f64,
    pub max_moisture: f64,
    /// Population standard deviation of the moisture index
    pub volatility: f64,
    pub days_above_threshold: usize,
    pub days_below_threshold: usize,
    /// One-step-ahead moisture index
    pub prediction: f64,
}

impl TrendAnalysis {
    pub fn total_readings(&self) -> usize {
        self.days_above_threshold + self.days_below_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TrendDirection::Up).unwrap(), "\"up\"");
        assert_eq!(
            serde_json::to_string(&TrendDirection::Stable).unwrap(),
            "\"stable\""
        );
    }

    #[test]
    fn direction_display() {
        assert!(TrendDirection::Up.to_string().contains("Rising"));
        assert!(TrendDirection::Down.to_string().contains("Falling"));
        assert!(TrendDirection::Stable.to_string().contains("Stable"));
    }
}
