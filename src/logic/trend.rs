use super::calculations::{linear_regression_slope, mean, population_std_dev, round_to};
use crate::models::{MoistureReading, TrendAnalysis, TrendDirection};

/// Minimum slope (moisture index per reading) treated as a real trend.
/// Tuned by hand; smaller slopes report `Stable`.
pub const TREND_SLOPE_THRESHOLD: f64 = 0.005;

/// Analyze a moisture history against an alert threshold.
///
/// Returns `None` with fewer than two readings: a new field simply has no
/// history yet. Input order does not matter; readings are put into
/// chronological order before the regression.
pub fn analyze_trend(readings: &[MoistureReading], threshold: f64) -> Option<TrendAnalysis> {
    if readings.len() < 2 {
        return None;
    }

    let mut sorted: Vec<&MoistureReading> = readings.iter().collect();
    sorted.sort_by(|a, b| {
        a.observation_date
            .cmp(&b.observation_date)
            .then_with(|| a.moisture_index.total_cmp(&b.moisture_index))
    });

    let values: Vec<f64> = sorted.iter().map(|r| r.moisture_index).collect();

    let avg = mean(&values).unwrap_or(0.0);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let volatility = population_std_dev(&values);

    let slope = linear_regression_slope(&values);
    let direction = if slope > TREND_SLOPE_THRESHOLD {
        TrendDirection::Up
    } else if slope < -TREND_SLOPE_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    let first = values[0];
    let last = values[values.len() - 1];
    let change_percent = if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    };

    let prediction = (last + slope).clamp(0.0, 1.0);

    let days_above_threshold = values.iter().filter(|v| **v >= threshold).count();
    let days_below_threshold = values.len() - days_above_threshold;

    tracing::debug!(
        readings = values.len(),
        slope,
        ?direction,
        "Computed moisture trend"
    );

    Some(TrendAnalysis {
        direction,
        change_percent: round_to(change_percent, 1),
        avg_moisture: round_to(avg, 3),
        min_moisture: round_to(min, 3),
        max_moisture: round_to(max, 3),
        volatility: round_to(volatility, 3),
        days_above_threshold,
        days_below_threshold,
        prediction: round_to(prediction, 3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn reading(day_offset: i64, moisture: f64) -> MoistureReading {
        let base = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        MoistureReading {
            observation_date: base + chrono::Duration::days(day_offset),
            moisture_index: moisture,
            vv_backscatter_db: -14.0,
            vh_backscatter_db: None,
            source: "test".into(),
        }
    }

    fn series(values: &[f64]) -> Vec<MoistureReading> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| reading(i as i64 * 6, *v))
            .collect()
    }

    #[test]
    fn insufficient_data_returns_none() {
        assert!(analyze_trend(&[], 0.3).is_none());
        assert!(analyze_trend(&[reading(0, 0.4)], 0.3).is_none());
        assert!(analyze_trend(&[reading(0, 0.4)], 0.0).is_none());
    }

    #[test]
    fn increasing_series_is_up() {
        let trend = analyze_trend(&series(&[0.2, 0.3, 0.4, 0.5, 0.6]), 0.3).unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.change_percent, 200.0);
        assert_eq!(trend.avg_moisture, 0.4);
        assert_eq!(trend.min_moisture, 0.2);
        assert_eq!(trend.max_moisture, 0.6);
        // 0.6 + 0.1 slope
        assert_eq!(trend.prediction, 0.7);
    }

    #[test]
    fn decreasing_series_is_down() {
        let trend = analyze_trend(&series(&[0.6, 0.5, 0.4, 0.3, 0.2]), 0.3).unwrap();
        assert_eq!(trend.direction, TrendDirection::Down);
        assert!((trend.change_percent - (-66.7)).abs() < 1e-9);
        assert_eq!(trend.prediction, 0.1);
    }

    #[test]
    fn slope_at_sensitivity_constant_is_stable() {
        // Slope of exactly 0.004 per reading stays below the 0.005 sensitivity
        let trend = analyze_trend(&series(&[0.400, 0.404, 0.408, 0.412]), 0.3).unwrap();
        assert_eq!(trend.direction, TrendDirection::Stable);

        let trend = analyze_trend(&series(&[0.40, 0.41, 0.42, 0.43]), 0.3).unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
    }

    #[test]
    fn regression_uses_chronological_order() {
        let mut readings = series(&[0.2, 0.3, 0.4, 0.5, 0.6]);
        readings.reverse();
        let trend = analyze_trend(&readings, 0.3).unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.change_percent, 200.0);
    }

    #[test]
    fn zero_first_reading_gives_zero_change() {
        let trend = analyze_trend(&series(&[0.0, 0.5]), 0.3).unwrap();
        assert_eq!(trend.change_percent, 0.0);
        assert_eq!(trend.direction, TrendDirection::Up);
    }

    #[test]
    fn prediction_is_clamped() {
        let trend = analyze_trend(&series(&[0.5, 0.8, 1.0]), 0.3).unwrap();
        assert_eq!(trend.prediction, 1.0);

        let trend = analyze_trend(&series(&[0.5, 0.2, 0.0]), 0.3).unwrap();
        assert_eq!(trend.prediction, 0.0);
    }

    #[test]
    fn volatility_is_population_std_dev() {
        let trend = analyze_trend(&series(&[0.2, 0.4]), 0.3).unwrap();
        assert_eq!(trend.volatility, 0.1);

        let flat = analyze_trend(&series(&[0.35, 0.35, 0.35]), 0.3).unwrap();
        assert_eq!(flat.volatility, 0.0);
        assert_eq!(flat.direction, TrendDirection::Stable);
    }

    #[test]
    fn threshold_boundary_counts_as_above() {
        let trend = analyze_trend(&series(&[0.3, 0.29, 0.31]), 0.3).unwrap();
        assert_eq!(trend.days_above_threshold, 2);
        assert_eq!(trend.days_below_threshold, 1);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let readings = series(&[0.31, 0.27, 0.45, 0.22, 0.38]);
        let first = serde_json::to_string(&analyze_trend(&readings, 0.3)).unwrap();
        let second = serde_json::to_string(&analyze_trend(&readings, 0.3)).unwrap();
        assert_eq!(first, second);
    }

    fn readings_strategy() -> impl Strategy<Value = Vec<MoistureReading>> {
        prop::collection::vec((0i64..365, 0.0f64..=1.0), 0..40)
            .prop_map(|pairs| pairs.into_iter().map(|(d, m)| reading(d, m)).collect())
    }

    proptest! {
        #[test]
        fn order_does_not_change_result(
            (original, shuffled) in readings_strategy()
                .prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle())),
            threshold in 0.0f64..=1.0,
        ) {
            prop_assert_eq!(
                analyze_trend(&original, threshold),
                analyze_trend(&shuffled, threshold)
            );
        }

        #[test]
        fn threshold_counts_cover_every_reading(
            readings in readings_strategy(),
            threshold in 0.0f64..=1.0,
        ) {
            if let Some(trend) = analyze_trend(&readings, threshold) {
                prop_assert_eq!(trend.total_readings(), readings.len());
                prop_assert!(trend.volatility >= 0.0);
                prop_assert!((0.0..=1.0).contains(&trend.prediction));
                prop_assert!(trend.min_moisture <= trend.avg_moisture);
                prop_assert!(trend.avg_moisture <= trend.max_moisture);
            } else {
                prop_assert!(readings.len() < 2);
            }
        }
    }
}
