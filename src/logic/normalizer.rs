use super::calculations::round_to;

/// Driest VV backscatter considered (dB)
pub const VV_MIN_DB: f64 = -20.0;
/// Wettest/saturated VV backscatter considered (dB)
pub const VV_MAX_DB: f64 = -8.0;

/// Convert Sentinel-1 VV backscatter (dB) into a moisture index in [0, 1].
///
/// Out-of-range values are clamped rather than rejected: radar noise produces
/// outliers and a clamped index is still usable downstream.
pub fn to_moisture_index(vv_db: f64) -> f64 {
    if vv_db.is_nan() {
        return 0.0;
    }

    let clamped = vv_db.clamp(VV_MIN_DB, VV_MAX_DB);
    round_to((clamped - VV_MIN_DB) / (VV_MAX_DB - VV_MIN_DB), 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_end_maps_to_zero() {
        assert_eq!(to_moisture_index(-20.0), 0.0);
        assert_eq!(to_moisture_index(-25.0), 0.0);
        assert_eq!(to_moisture_index(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn wet_end_maps_to_one() {
        assert_eq!(to_moisture_index(-8.0), 1.0);
        assert_eq!(to_moisture_index(-2.0), 1.0);
        assert_eq!(to_moisture_index(f64::INFINITY), 1.0);
    }

    #[test]
    fn midpoint_is_half() {
        assert_eq!(to_moisture_index(-14.0), 0.5);
    }

    #[test]
    fn rounded_to_three_decimals() {
        // (-11 + 20) / 12 = 0.75, (-17 + 20) / 12 = 0.25, (-13 + 20) / 12 = 0.58333...
        assert_eq!(to_moisture_index(-11.0), 0.75);
        assert_eq!(to_moisture_index(-17.0), 0.25);
        assert_eq!(to_moisture_index(-13.0), 0.583);
    }

    #[test]
    fn nan_is_treated_as_driest() {
        assert_eq!(to_moisture_index(f64::NAN), 0.0);
    }

    #[test]
    fn monotonic_across_range() {
        let mut previous = to_moisture_index(-21.0);
        let mut db = -21.0;
        while db <= -7.0 {
            let index = to_moisture_index(db);
            assert!(index >= previous);
            assert!((0.0..=1.0).contains(&index));
            previous = index;
            db += 0.25;
        }
    }
}
