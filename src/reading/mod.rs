//! Record model and JSON dataset loading.
//!
//! The dataset is a single JSON array of merged earthquake/weather
//! observations. Every field is optional in the source data; absent numbers
//! stay `None` so reductions can exclude them instead of treating them as
//! zero measurements.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// One observation from the merged dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    pub date: Option<String>,
    pub city: Option<String>,
    pub magnitude: Option<f64>,
    pub elevation: Option<f64>,
    pub time: Option<String>,
    #[serde(default)]
    pub weather: Weather,
}

/// The nested weather block. `sunshine_hours` is recorded in seconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Weather {
    pub rain_sum: Option<f64>,
    pub snowfall_sum: Option<f64>,
    pub wind_speed_max: Option<f64>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub temperature_mean: Option<f64>,
    pub sunshine_hours: Option<f64>,
    pub precipitation_hours: Option<f64>,
}

impl Record {
    /// Parses the record date. `None` when the field is missing or does not
    /// match `YYYY-MM-DD`.
    pub fn naive_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }

    /// The `(year, month)` bucket key derived from the date.
    pub fn month_key(&self) -> Option<(i32, u32)> {
        self.naive_date().map(|d| (d.year(), d.month()))
    }
}

/// Numeric fields a metric can draw its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Magnitude,
    Elevation,
    RainSum,
    SnowfallSum,
    WindSpeedMax,
    TemperatureMax,
    TemperatureMin,
    TemperatureMean,
    SunshineHours,
    PrecipitationHours,
}

impl Field {
    /// Extracts the raw value from a record. Sunshine is converted from
    /// seconds to hours here so every consumer sees hours.
    pub fn extract(&self, record: &Record) -> Option<f64> {
        let weather = &record.weather;
        match self {
            Field::Magnitude => record.magnitude,
            Field::Elevation => record.elevation,
            Field::RainSum => weather.rain_sum,
            Field::SnowfallSum => weather.snowfall_sum,
            Field::WindSpeedMax => weather.wind_speed_max,
            Field::TemperatureMax => weather.temperature_max,
            Field::TemperatureMin => weather.temperature_min,
            Field::TemperatureMean => weather.temperature_mean,
            Field::SunshineHours => weather.sunshine_hours.map(|s| s / 3600.0),
            Field::PrecipitationHours => weather.precipitation_hours,
        }
    }
}

/// Reads the whole dataset into memory.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file =
        File::open(path).with_context(|| format!("opening dataset `{}`", path.display()))?;
    let records: Vec<Record> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing dataset `{}`", path.display()))?;

    Ok(records)
}

// -- Tests -------------------------------------------------------------------
