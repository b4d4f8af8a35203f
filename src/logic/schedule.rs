use super::irrigation::RAIN_EFFECTIVENESS;
use crate::models::{DailyForecast, IrrigationRecommendation, ScheduleDay};
use chrono::NaiveDate;

pub const SCHEDULE_DAYS: i64 = 7;
/// Per-session limit of typical irrigation equipment (mm)
pub const MAX_DAILY_IRRIGATION_MM: f64 = 25.0;

/// Above this probability a day's rain is credited against the remaining need
const RAIN_DAY_PROBABILITY: f64 = 0.6;
/// Below this probability the forecast is too weak to hold off irrigating
const WEAK_FORECAST_PROBABILITY: f64 = 0.5;

/// Spread the recommended water over the next seven days, starting today.
///
/// Allocation is greedy: each dry day takes up to `MAX_DAILY_IRRIGATION_MM`
/// until the need is met. Likely-rain days are credited with 70% of their
/// expected rainfall and skipped. Days with an uncertain forecast
/// (50-60% rain probability) are held back without credit.
pub fn generate_irrigation_schedule(
    recommendation: &IrrigationRecommendation,
    forecast: &[DailyForecast],
    today: NaiveDate,
) -> Vec<ScheduleDay> {
    let mut remaining = if recommendation.needs_irrigation {
        recommendation.water_amount_mm.max(0.0)
    } else {
        0.0
    };

    let mut schedule = Vec::with_capacity(SCHEDULE_DAYS as usize);

    for offset in 0..SCHEDULE_DAYS {
        let date = today + chrono::Duration::days(offset);
        let day_forecast = forecast.iter().find(|d| d.date == date);

        let mut weather_note = None;
        let mut rain_day = false;

        if let Some(f) = day_forecast {
            if f.rain_probability > RAIN_DAY_PROBABILITY {
                rain_day = true;
                remaining = (remaining - f.expected_rain_mm * RAIN_EFFECTIVENESS).max(0.0);
                weather_note = Some(format!(
                    "Rain expected: {:.1} mm ({:.0}% chance)",
                    f.expected_rain_mm,
                    f.rain_probability * 100.0
                ));
            } else if f.rain_probability >= WEAK_FORECAST_PROBABILITY {
                weather_note = Some(format!(
                    "Possible rain ({:.0}% chance)",
                    f.rain_probability * 100.0
                ));
            }
        }

        let can_irrigate =
            day_forecast.map_or(true, |f| f.rain_probability < WEAK_FORECAST_PROBABILITY);

        let day = if remaining <= 0.0 {
            let reason = if rain_day {
                "Rain covers the remaining need"
            } else {
                "No irrigation needed"
            };
            ScheduleDay {
                date,
                recommended: false,
                water_amount_mm: 0.0,
                reason: reason.to_string(),
                weather_note,
            }
        } else if can_irrigate {
            let amount = remaining.min(MAX_DAILY_IRRIGATION_MM);
            remaining -= amount;
            ScheduleDay {
                date,
                recommended: true,
                water_amount_mm: amount,
                reason: format!("Irrigate {:.1} mm", amount),
                weather_note,
            }
        } else {
            let reason = if rain_day {
                "Skipped: rain expected"
            } else {
                "Postponed: uncertain rain forecast"
            };
            ScheduleDay {
                date,
                recommended: false,
                water_amount_mm: 0.0,
                reason: reason.to_string(),
                weather_note,
            }
        };

        schedule.push(day);
    }

    if remaining > 0.0 {
        tracing::debug!(
            remaining_mm = remaining,
            "Irrigation need exceeds one week of capacity"
        );
    }

    schedule
}
