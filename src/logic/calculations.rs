/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation (divides by N)
pub fn population_std_dev(values: &[f64]) -> f64 {
    let Some(avg) = mean(values) else {
        return 0.0;
    };

    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ordinary least-squares slope of `values` against their index (0..N-1)
pub fn linear_regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }

    (n_f * sum_xy - sum_x * sum_y) / denominator
}

/// Reference evapotranspiration (mm/day), simplified Hargreaves-style, clamped to [0, 10]
pub fn reference_evapotranspiration(temp_c: f64, humidity_percent: f64) -> f64 {
    let dryness = (30.0 - humidity_percent / 3.0).max(0.0);
    (0.0023 * (temp_c + 17.8) * dryness.sqrt()).clamp(0.0, 10.0)
}

/// Water-holding capacity of the root zone in mm
pub fn soil_capacity_mm(root_depth_m: f64) -> f64 {
    root_depth_m * 150.0
}

/// Convert a depth of water over an area to liters (1 mm on 1 ha = 10 000 L)
pub fn mm_to_liters(water_mm: f64, area_hectares: f64) -> f64 {
    water_mm * area_hectares * 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(0.1235, 2), 0.12);
        assert_eq!(round_to(12.25, 1), 12.3);
        assert_eq!(round_to(-1.5, 0), -2.0);
    }

    #[test]
    fn mean_values() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[0.2, 0.4]), Some(0.30000000000000004));
    }

    #[test]
    fn std_dev_divides_by_n() {
        // Population std-dev of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[0.4]), 0.0);
    }

    #[test]
    fn slope_of_straight_line() {
        let values = [0.1, 0.2, 0.3, 0.4];
        assert!((linear_regression_slope(&values) - 0.1).abs() < 1e-12);

        let flat = [0.5, 0.5, 0.5];
        assert!(linear_regression_slope(&flat).abs() < 1e-12);

        assert_eq!(linear_regression_slope(&[0.7]), 0.0);
        assert_eq!(linear_regression_slope(&[]), 0.0);
    }

    #[test]
    fn evapotranspiration_known_values() {
        // 25°C, 30% humidity: 0.0023 * 42.8 * sqrt(20)
        let et0 = reference_evapotranspiration(25.0, 30.0);
        assert!((et0 - 0.0023 * 42.8 * 20f64.sqrt()).abs() < 1e-12);

        // Saturated air: no evaporative demand
        assert_eq!(reference_evapotranspiration(25.0, 100.0), 0.0);

        // Very cold: clamped at zero
        assert_eq!(reference_evapotranspiration(-30.0, 10.0), 0.0);
    }

    #[test]
    fn evapotranspiration_is_capped() {
        assert_eq!(reference_evapotranspiration(5000.0, 0.0), 10.0);
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(soil_capacity_mm(1.2), 180.0);
        assert_eq!(mm_to_liters(10.0, 2.0), 200_000.0);
    }
}
