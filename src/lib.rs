//! Soil-moisture trend analysis and irrigation planning.
//!
//! The engine in [`logic`] is a set of pure functions: normalize Sentinel-1
//! backscatter into a moisture index, summarize a field's moisture history,
//! and turn current moisture plus crop and weather data into an irrigation
//! recommendation with a 7-day schedule. The remaining modules carry the
//! tool around it: configuration, a local SQLite store and a forecast client.

pub mod config;
pub mod datasources;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{Result, SoilCastError};
