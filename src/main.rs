mod cli;

use clap::Parser;
use cli::{Cli, Commands, FieldCommand};
use serde::Serialize;
use soilcast::config::Config;
use soilcast::datasources::OpenWeatherMapClient;
use soilcast::db::Database;
use soilcast::error::{Result, SoilCastError};
use soilcast::logic::{
    analyze_trend, calculate_irrigation_need, evaluate_moisture_alert,
    generate_irrigation_schedule, to_moisture_index,
};
use soilcast::models::{
    dedupe_readings, CropType, FieldProfile, IrrigationRecommendation, MoistureReading,
    RawObservation, ScheduleDay, WeatherForecast,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.as_ref();

    match cli.command {
        Commands::Init => {
            Config::setup_interactive()?;
            Ok(())
        }
        Commands::Check => check(cli.config.as_ref(), data_dir).await,
        Commands::Normalize { vv_db } => {
            println!("{:.3}", to_moisture_index(vv_db));
            Ok(())
        }
        Commands::Field { action } => {
            let db = Database::open(data_dir)?;
            match action {
                FieldCommand::Add {
                    name,
                    crop,
                    area,
                    planting_date,
                    threshold,
                } => add_field(&db, name, &crop, area, planting_date, threshold),
                FieldCommand::List => list_fields(&db),
            }
        }
        Commands::Ingest {
            field,
            date,
            vv,
            vh,
            source,
        } => {
            let db = Database::open(data_dir)?;
            if !vv.is_finite() {
                return Err(SoilCastError::InvalidData(format!(
                    "VV backscatter must be a finite dB value, got {}",
                    vv
                )));
            }
            let profile = db.require_field(&field)?;
            let reading = MoistureReading::from_backscatter(date, vv, vh, source);
            let id = field_id(&profile)?;

            if db.insert_reading(id, &reading)? {
                println!(
                    "Stored {} for {}: moisture index {:.3}",
                    reading.observation_date, profile.name, reading.moisture_index
                );
            } else {
                println!(
                    "{} already has a reading for {}; kept the existing one",
                    profile.name, reading.observation_date
                );
            }
            Ok(())
        }
        Commands::Import { field, file } => {
            let db = Database::open(data_dir)?;
            import_readings(&db, &field, &file)
        }
        Commands::Trend {
            field,
            threshold,
            json,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let db = Database::open(data_dir)?;
            show_trend(&db, &config, &field, threshold, json)
        }
        Commands::Plan {
            field,
            moisture,
            no_weather,
            json,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let db = Database::open(data_dir)?;
            plan(&db, &config, &field, moisture, no_weather, json).await
        }
    }
}

/// Config is optional for analysis commands; defaults apply without one
fn load_config(config_override: Option<&PathBuf>) -> Result<Config> {
    if Config::exists(config_override) {
        Config::load(config_override)
    } else {
        tracing::warn!("No configuration found, using defaults. Run `soilcast init` to create one.");
        Ok(Config::default())
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn field_id(profile: &FieldProfile) -> Result<i64> {
    profile
        .id
        .ok_or_else(|| SoilCastError::InvalidData(format!("field '{}' has no id", profile.name)))
}

fn validate_fraction(label: &str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SoilCastError::InvalidData(format!(
            "{} must be a fraction between 0 and 1, got {}",
            label, value
        )))
    }
}

async fn check(config_override: Option<&PathBuf>, data_dir: Option<&PathBuf>) -> Result<()> {
    let config = Config::load(config_override)?;
    println!("Config: OK");

    let db = Database::open(data_dir)?;
    println!("Database: OK ({})", db.path().display());

    match config.weather() {
        Some(owm) => {
            let client = OpenWeatherMapClient::new(owm.clone());
            match client.test_connection().await {
                Ok(true) => println!("OpenWeatherMap: OK"),
                Ok(false) => println!("OpenWeatherMap: REJECTED (check API key)"),
                Err(e) => println!("OpenWeatherMap: OFFLINE ({})", e),
            }
        }
        None => println!("OpenWeatherMap: not configured"),
    }

    Ok(())
}

fn add_field(
    db: &Database,
    name: String,
    crop: &str,
    area: f64,
    planting_date: Option<chrono::NaiveDate>,
    threshold: Option<f64>,
) -> Result<()> {
    if !(area > 0.0 && area.is_finite()) {
        return Err(SoilCastError::InvalidData(format!(
            "area must be a positive number of hectares, got {}",
            area
        )));
    }

    let crop_type = CropType::from_str(crop);
    if crop_type == CropType::Other && !crop.eq_ignore_ascii_case("other") {
        tracing::warn!(crop, "Unknown crop type, using generic coefficients");
    }

    let mut profile = FieldProfile::new(name, crop_type, area);
    if let Some(date) = planting_date {
        profile = profile.with_planting_date(date);
    }
    if let Some(t) = threshold {
        profile = profile.with_threshold(validate_fraction("threshold", t)?);
    }

    let id = db.create_field(&profile)?;
    println!(
        "Added field '{}' (#{}, {}, {:.2} ha)",
        profile.name, id, profile.crop_type, profile.area_hectares
    );
    Ok(())
}

fn list_fields(db: &Database) -> Result<()> {
    let fields = db.list_fields()?;
    if fields.is_empty() {
        println!("No fields registered. Add one with `soilcast field add`.");
        return Ok(());
    }

    for field in fields {
        let planted = field
            .planting_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<20} {:<12} {:>8.2} ha  planted {}",
            field.name,
            field.crop_type.as_str(),
            field.area_hectares,
            planted
        );
    }
    Ok(())
}

fn import_readings(db: &Database, field: &str, file: &PathBuf) -> Result<()> {
    let profile = db.require_field(field)?;
    let id = field_id(&profile)?;

    let content = std::fs::read_to_string(file)?;
    let raw: Vec<RawObservation> = serde_json::from_str(&content)?;
    let total = raw.len();

    let readings = dedupe_readings(raw.into_iter().map(RawObservation::into_reading).collect());

    let mut stored = 0;
    for reading in &readings {
        if db.insert_reading(id, reading)? {
            stored += 1;
        }
    }

    tracing::info!(field, total, stored, "Imported observations");
    println!(
        "Imported {} of {} observations for {} ({} duplicates skipped)",
        stored,
        total,
        profile.name,
        total - stored
    );
    Ok(())
}

fn show_trend(
    db: &Database,
    config: &Config,
    field: &str,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    let profile = db.require_field(field)?;
    let readings = db.readings_for_field(field_id(&profile)?)?;

    let threshold = match threshold {
        Some(t) => validate_fraction("threshold", t)?,
        None => profile.threshold_or(config.analysis.moisture_threshold),
    };

    let trend = analyze_trend(&readings, threshold);
    let alert = evaluate_moisture_alert(&readings, threshold);

    if json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct TrendOutput<'a> {
            field: &'a str,
            threshold: f64,
            total_readings: usize,
            trend: Option<soilcast::models::TrendAnalysis>,
            alert: Option<soilcast::models::MoistureAlert>,
        }

        let output = TrendOutput {
            field: &profile.name,
            threshold,
            total_readings: readings.len(),
            trend,
            alert,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Field: {} ({} readings)", profile.name, readings.len());
    match trend {
        None => println!("Not enough history yet (at least 2 readings needed)."),
        Some(t) => {
            println!("  Direction:   {}", t.direction);
            println!("  Change:      {:+.1}%", t.change_percent);
            println!(
                "  Moisture:    avg {:.0}%  min {:.0}%  max {:.0}%",
                t.avg_moisture * 100.0,
                t.min_moisture * 100.0,
                t.max_moisture * 100.0
            );
            println!("  Volatility:  {:.3}", t.volatility);
            println!(
                "  Threshold:   {:.0}% ({} at/above, {} below)",
                threshold * 100.0,
                t.days_above_threshold,
                t.days_below_threshold
            );
            println!("  Next value:  {:.0}%", t.prediction * 100.0);
        }
    }

    if let Some(alert) = alert {
        println!();
        println!("{} {}: {}", alert.severity.symbol(), alert.severity, alert.message);
    }

    Ok(())
}

async fn plan(
    db: &Database,
    config: &Config,
    field: &str,
    moisture: Option<f64>,
    no_weather: bool,
    json: bool,
) -> Result<()> {
    let profile = db.require_field(field)?;

    let soil_moisture = match moisture {
        Some(m) => validate_fraction("moisture", m)?,
        None => db
            .latest_reading(field_id(&profile)?)?
            .map(|r| r.moisture_index)
            .ok_or_else(|| {
                SoilCastError::InvalidData(format!(
                    "no readings stored for '{}'; ingest one or pass --moisture",
                    profile.name
                ))
            })?,
    };

    let today = today();
    let weather = if no_weather {
        None
    } else {
        fetch_weather(config, today).await
    };

    let recommendation = calculate_irrigation_need(
        profile.crop_type.as_str(),
        soil_moisture,
        profile.area_hectares,
        weather.as_ref(),
        profile.planting_date,
        today,
    );
    let daily = weather.as_ref().map(|w| w.daily.as_slice()).unwrap_or(&[]);
    let schedule = generate_irrigation_schedule(&recommendation, daily, today);

    if json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct PlanOutput<'a> {
            field: &'a str,
            weather: Option<&'a WeatherForecast>,
            recommendation: &'a IrrigationRecommendation,
            schedule: &'a [ScheduleDay],
        }

        let output = PlanOutput {
            field: &profile.name,
            weather: weather.as_ref(),
            recommendation: &recommendation,
            schedule: &schedule,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_plan(&profile, &recommendation, &schedule, weather.is_some());
    Ok(())
}

async fn fetch_weather(config: &Config, today: chrono::NaiveDate) -> Option<WeatherForecast> {
    let Some(owm) = config.weather() else {
        tracing::info!("OpenWeatherMap not configured - planning without forecast");
        return None;
    };

    let client = OpenWeatherMapClient::new(owm.clone());
    match client.fetch_forecast(today).await {
        Ok(forecast) => Some(forecast),
        Err(e) => {
            tracing::warn!("Failed to fetch forecast, planning without it: {}", e);
            None
        }
    }
}

fn print_plan(
    profile: &FieldProfile,
    rec: &IrrigationRecommendation,
    schedule: &[ScheduleDay],
    has_weather: bool,
) {
    let factors = &rec.factors;

    println!(
        "Field: {} ({}, {:.2} ha)",
        profile.name, profile.crop_type, profile.area_hectares
    );
    println!(
        "  Stage: {}   Moisture: {:.0}% (target {:.0}%, deficit {:.0}%)",
        factors.crop_stage,
        factors.soil_moisture * 100.0,
        factors.optimal_moisture * 100.0,
        factors.deficit * 100.0
    );
    println!(
        "  Daily need: {:.1} mm{}",
        factors.daily_need_mm,
        if has_weather { " (from forecast)" } else { "" }
    );
    println!();
    println!("{} Urgency: {}", rec.urgency.symbol(), rec.urgency);
    println!("  {}", rec.message);

    if rec.needs_irrigation {
        println!(
            "  Water: {:.1} mm ({:.0} L)",
            rec.water_amount_mm, rec.water_volume_liters
        );
        if let Some(date) = rec.next_irrigation_date {
            println!("  Irrigate by: {}", date);
        }
    }

    println!();
    println!("7-day schedule:");
    for day in schedule {
        let amount = if day.recommended {
            format!("{:>5.1} mm", day.water_amount_mm)
        } else {
            "     -  ".to_string()
        };
        print!("  {}  {}  {}", day.date.format("%a %Y-%m-%d"), amount, day.reason);
        if let Some(note) = &day.weather_note {
            print!("  [{}]", note);
        }
        println!();
    }
}
