//! Command line interface.

pub mod command;

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{command, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the monthly chart set, one PNG per year per chart
    Monthly {
        /// Path to the merged observations JSON file
        #[arg(long)]
        data: PathBuf,

        /// Directory the chart folders are created in
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Render a single chart by name instead of the whole set
        #[arg(long)]
        chart: Option<String>,
    },
    /// Render per-city tier frequency charts
    Cities {
        /// Path to the merged observations JSON file
        #[arg(long)]
        data: PathBuf,

        /// Directory the chart folder is created in
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Which tier counts to chart
        #[arg(long, value_enum, default_value_t = CityMetric::Rainfall)]
        metric: CityMetric,
    },
    /// Render the pie chart suite
    Pies {
        /// Path to the merged observations JSON file
        #[arg(long)]
        data: PathBuf,

        /// Directory the chart folders are created in
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Start of an optional date-range filter (YYYY-MM-DD)
        #[arg(long, requires = "end_date")]
        start_date: Option<NaiveDate>,

        /// End of an optional date-range filter (YYYY-MM-DD)
        #[arg(long, requires = "start_date")]
        end_date: Option<NaiveDate>,

        /// Also render the date-range pies restricted to one city
        #[arg(long, requires = "start_date")]
        city: Option<String>,
    },
    /// List the available monthly charts
    List {},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CityMetric {
    Rainfall,
    Magnitude,
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
