use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "soilcast",
    version,
    about = "Soil-moisture trends and irrigation planning from satellite data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run interactive setup
    Init,
    /// Validate config and test connections
    Check,
    /// Convert a VV backscatter value (dB) into a moisture index
    Normalize {
        #[arg(allow_negative_numbers = true)]
        vv_db: f64,
    },
    /// Manage fields
    Field {
        #[command(subcommand)]
        action: FieldCommand,
    },
    /// Store one satellite observation for a field
    Ingest {
        #[arg(long)]
        field: String,
        /// Observation date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// VV backscatter in dB
        #[arg(long, allow_negative_numbers = true)]
        vv: f64,
        /// VH backscatter in dB
        #[arg(long, allow_negative_numbers = true)]
        vh: Option<f64>,
        #[arg(long, default_value = soilcast::models::SENTINEL1_SOURCE)]
        source: String,
    },
    /// Import a JSON array of raw observations for a field
    Import {
        #[arg(long)]
        field: String,
        file: PathBuf,
    },
    /// Summarize a field's moisture history
    Trend {
        #[arg(long)]
        field: String,
        /// Alert threshold (0.0-1.0); defaults to the field's or the configured value
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Recommend irrigation and a 7-day schedule for a field
    Plan {
        #[arg(long)]
        field: String,
        /// Current moisture index (0.0-1.0); defaults to the latest stored reading
        #[arg(long)]
        moisture: Option<f64>,
        /// Skip the weather forecast
        #[arg(long)]
        no_weather: bool,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum FieldCommand {
    /// Register a field
    Add {
        name: String,
        /// Crop type (wheat, corn, rapeseed, potato, sugar beet, barley, rye, ...)
        #[arg(long)]
        crop: String,
        /// Area in hectares
        #[arg(long)]
        area: f64,
        /// Planting date (YYYY-MM-DD)
        #[arg(long)]
        planting_date: Option<NaiveDate>,
        /// Moisture alert threshold (0.0-1.0)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// List registered fields
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_backscatter() {
        let cli = Cli::try_parse_from(["soilcast", "normalize", "-14.5"]).unwrap();
        match cli.command {
            Commands::Normalize { vv_db } => assert_eq!(vv_db, -14.5),
            _ => panic!("expected normalize"),
        }

        let cli = Cli::try_parse_from([
            "soilcast", "ingest", "--field", "North", "--date", "2024-05-01", "--vv", "-12.1",
        ])
        .unwrap();
        match cli.command {
            Commands::Ingest {
                vv, vh, date, source, ..
            } => {
                assert_eq!(vv, -12.1);
                assert!(vh.is_none());
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
                assert_eq!(source, "sentinel-1");
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn parses_field_add() {
        let cli = Cli::try_parse_from([
            "soilcast",
            "-v",
            "field",
            "add",
            "North",
            "--crop",
            "wheat",
            "--area",
            "12.5",
            "--planting-date",
            "2024-04-02",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Field {
                action:
                    FieldCommand::Add {
                        name,
                        area,
                        planting_date,
                        threshold,
                        ..
                    },
            } => {
                assert_eq!(name, "North");
                assert_eq!(area, 12.5);
                assert!(planting_date.is_some());
                assert!(threshold.is_none());
            }
            _ => panic!("expected field add"),
        }
    }
}
