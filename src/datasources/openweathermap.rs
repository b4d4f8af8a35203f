use crate::config::OpenWeatherMapConfig;
use crate::error::{Result, SoilCastError};
use crate::models::forecast::{DailyForecast, WeatherForecast};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
    city: OwmCity,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    pop: f64, // probability of precipitation
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "3h", default)]
    three_hour: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCity {
    /// Shift from UTC in seconds
    #[serde(default)]
    timezone: i64,
}

/// One 3-hour forecast point, already shifted to the location's calendar
struct ForecastPoint {
    date: NaiveDate,
    temp_c: f64,
    humidity_percent: f64,
    precipitation_mm: f64,
    precipitation_prob: f64,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the 5-day/3-hour forecast and summarize it for the planner
    pub async fn fetch_forecast(&self, today: NaiveDate) -> Result<WeatherForecast> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.config.latitude, self.config.longitude, self.config.api_key
        );

        let response = self.send(&url).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SoilCastError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmForecastResponse = response.json().await.map_err(|e| {
            SoilCastError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        let forecast = convert_response(owm_response, today).ok_or_else(|| {
            SoilCastError::DataSourceUnavailable(format!(
                "OpenWeatherMap has no forecast for {} onwards",
                today
            ))
        })?;
        tracing::info!(
            days = forecast.daily.len(),
            rain_mm = forecast.expected_rain_mm,
            "Fetched OpenWeatherMap forecast"
        );
        Ok(forecast)
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.config.latitude, self.config.longitude, self.config.api_key
        );

        let response = self.send(&url).await?;
        Ok(response.status().is_success())
    }

    /// Transport failures surface as `SoilCastError::Http`
    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        Ok(self.client.get(url).send().await?)
    }
}

fn convert_response(response: OwmForecastResponse, today: NaiveDate) -> Option<WeatherForecast> {
    let offset = response.city.timezone;

    let points: Vec<ForecastPoint> = response
        .list
        .iter()
        .map(|item| convert_forecast_item(item, offset))
        .collect();

    WeatherForecast::from_daily(aggregate_daily(&points), today)
}

fn convert_forecast_item(item: &OwmForecastItem, utc_offset_secs: i64) -> ForecastPoint {
    let date = DateTime::from_timestamp(item.dt + utc_offset_secs, 0)
        .unwrap_or_else(Utc::now)
        .date_naive();

    // Combine rain and snow precipitation
    let rain_mm = item.rain.as_ref().map(|r| r.three_hour).unwrap_or(0.0);
    let snow_mm = item.snow.as_ref().map(|s| s.three_hour).unwrap_or(0.0);

    ForecastPoint {
        date,
        temp_c: item.main.temp,
        humidity_percent: item.main.humidity,
        precipitation_mm: rain_mm + snow_mm,
        precipitation_prob: item.pop.clamp(0.0, 1.0),
    }
}

fn aggregate_daily(points: &[ForecastPoint]) -> Vec<DailyForecast> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastPoint>> = BTreeMap::new();
    for point in points {
        by_date.entry(point.date).or_default().push(point);
    }

    by_date
        .into_iter()
        .map(|(date, points)| aggregate_day(date, &points))
        .collect()
}

fn aggregate_day(date: NaiveDate, points: &[&ForecastPoint]) -> DailyForecast {
    let high_temp_c = points
        .iter()
        .map(|p| p.temp_c)
        .fold(f64::NEG_INFINITY, f64::max);
    let low_temp_c = points.iter().map(|p| p.temp_c).fold(f64::INFINITY, f64::min);

    let avg_humidity =
        points.iter().map(|p| p.humidity_percent).sum::<f64>() / points.len().max(1) as f64;

    DailyForecast {
        date,
        high_temp_c,
        low_temp_c,
        avg_humidity,
        rain_probability: points
            .iter()
            .map(|p| p.precipitation_prob)
            .fold(0.0, f64::max),
        expected_rain_mm: points.iter().map(|p| p.precipitation_mm).sum(),
    }
}
