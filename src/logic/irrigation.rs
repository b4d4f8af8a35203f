use super::calculations::{
    mm_to_liters, reference_evapotranspiration, round_to, soil_capacity_mm,
};
use crate::models::{
    CropCoefficients, CropStage, IrrigationFactors, IrrigationRecommendation, Urgency,
    WeatherForecast,
};
use chrono::NaiveDate;

/// Moisture index below which the crop is in acute drought stress
pub const CRITICAL_MOISTURE: f64 = 0.20;
/// Moisture index below which irrigation is urgent
pub const HIGH_MOISTURE: f64 = 0.30;

const MEDIUM_DEFICIT: f64 = 0.15;
const LOW_DEFICIT: f64 = 0.05;

/// Share of forecast rain assumed to reach the root zone
pub const RAIN_EFFECTIVENESS: f64 = 0.7;

const RAIN_OFFSET_PROBABILITY: f64 = 0.5;
const RAIN_OFFSET_MIN_MM: f64 = 5.0;
const SOFTEN_PROBABILITY: f64 = 0.7;
const SOFTEN_MIN_MM: f64 = 10.0;

const MAX_DAYS_UNTIL_IRRIGATION: f64 = 7.0;

/// Decide whether a field needs water, how much, and how soon.
///
/// Never fails: a missing forecast falls back to the crop's base water need,
/// a missing planting date assumes mid-season, and unknown crop names use the
/// generic coefficient row.
pub fn calculate_irrigation_need(
    crop_type: &str,
    soil_moisture: f64,
    area_hectares: f64,
    weather: Option<&WeatherForecast>,
    planting_date: Option<NaiveDate>,
    today: NaiveDate,
) -> IrrigationRecommendation {
    let soil_moisture = if soil_moisture.is_nan() {
        0.0
    } else {
        soil_moisture.clamp(0.0, 1.0)
    };

    let crop_stage = planting_date
        .map(|planted| CropStage::from_days_since_planting((today - planted).num_days()))
        .unwrap_or(CropStage::Mid);

    let coefficients = CropCoefficients::for_crop(crop_type);
    let kc = coefficients.kc_for_stage(crop_stage);

    let optimal_moisture = crop_stage.optimal_moisture();
    let deficit = (optimal_moisture - soil_moisture).max(0.0);

    let daily_need_mm = match weather {
        Some(w) => reference_evapotranspiration(w.temperature_c, w.humidity_percent) * kc,
        None => coefficients.base_water_need_mm_per_day * kc,
    };

    let soil_capacity = soil_capacity_mm(coefficients.root_depth_m);
    let water_needed = deficit * soil_capacity;

    let effective_water = match weather {
        Some(w)
            if w.rain_probability > RAIN_OFFSET_PROBABILITY
                && w.expected_rain_mm > RAIN_OFFSET_MIN_MM =>
        {
            (water_needed - w.expected_rain_mm * RAIN_EFFECTIVENESS).max(0.0)
        }
        _ => water_needed,
    };

    let mut urgency = classify_urgency(soil_moisture, deficit);
    let mut message = urgency.message().to_string();

    if let Some(w) = weather {
        if w.rain_probability > SOFTEN_PROBABILITY
            && w.expected_rain_mm > SOFTEN_MIN_MM
            && urgency != Urgency::Critical
        {
            urgency = urgency.softened();
            message = format!(
                "{} Rain is forecast ({:.0} mm, {:.0}% chance), which may cover part of the need.",
                urgency.message(),
                w.expected_rain_mm,
                w.rain_probability * 100.0
            );
        }
    }

    let needs_irrigation = urgency != Urgency::None;

    let next_irrigation_date = needs_irrigation.then(|| {
        let days = days_until_critical(soil_moisture, daily_need_mm, soil_capacity);
        today + chrono::Duration::days(days)
    });

    let water_amount_mm = if needs_irrigation {
        round_to(effective_water, 1)
    } else {
        0.0
    };
    let water_volume_liters = mm_to_liters(water_amount_mm, area_hectares.max(0.0)).round();

    tracing::debug!(
        crop = crop_type,
        ?crop_stage,
        soil_moisture,
        deficit,
        daily_need_mm,
        ?urgency,
        "Calculated irrigation need"
    );

    IrrigationRecommendation {
        needs_irrigation,
        urgency,
        water_amount_mm,
        water_volume_liters,
        next_irrigation_date,
        message,
        factors: IrrigationFactors {
            soil_moisture: round_to(soil_moisture, 3),
            optimal_moisture,
            deficit: round_to(deficit, 3),
            crop_stage,
            daily_need_mm: round_to(daily_need_mm, 2),
        },
    }
}

/// Urgency from moisture and deficit, first match wins
pub fn classify_urgency(soil_moisture: f64, deficit: f64) -> Urgency {
    if soil_moisture < CRITICAL_MOISTURE {
        Urgency::Critical
    } else if soil_moisture < HIGH_MOISTURE {
        Urgency::High
    } else if deficit > MEDIUM_DEFICIT {
        Urgency::Medium
    } else if deficit > LOW_DEFICIT {
        Urgency::Low
    } else {
        Urgency::None
    }
}

/// Whole days until moisture falls to the critical line at the current daily
/// depletion rate, capped at one week.
fn days_until_critical(soil_moisture: f64, daily_need_mm: f64, soil_capacity_mm: f64) -> i64 {
    if daily_need_mm <= 0.0 || soil_capacity_mm <= 0.0 {
        return MAX_DAYS_UNTIL_IRRIGATION as i64;
    }

    let daily_depletion = daily_need_mm / soil_capacity_mm;
    let days = ((soil_moisture - CRITICAL_MOISTURE) / daily_depletion)
        .clamp(0.0, MAX_DAYS_UNTIL_IRRIGATION);
    days.floor() as i64
}
