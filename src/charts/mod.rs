//! Declarative monthly chart definitions.
//!
//! Each entry replaces one of the original single-purpose chart scripts: it
//! names the output folder, the chart style and the metrics (field +
//! reduction) the aggregation core must produce. Rendering walks this table
//! instead of carrying a copy of the grouping loop per chart.

use std::collections::BTreeMap;

use crate::aggregate::{Leaf, MetricSpec, Reduction, Source, Value};
use crate::classify::{self, ElevationTier};
use crate::reading::Field;

/// How a monthly chart draws its series.
#[derive(Clone, Copy)]
pub enum ChartKind {
    /// One line per metric.
    Lines,
    /// One bar group per month, one bar per metric.
    GroupedBars,
    /// First metric as bars on the primary axis, second metric as a line on
    /// a secondary axis.
    BarLine,
    /// Classifier label counts per month as grouped bars.
    CategoryBars(crate::aggregate::Classifier),
}

pub struct MonthlyChart {
    /// CLI name.
    pub name: &'static str,
    /// Chart caption; the year is appended at render time.
    pub title: &'static str,
    /// Output folder, recreated on every run.
    pub folder: &'static str,
    /// PNG file stem; files are `<stem>_<year>.png`.
    pub file_stem: &'static str,
    pub y_desc: &'static str,
    /// Secondary axis description for `BarLine` charts.
    pub secondary_y_desc: &'static str,
    pub kind: ChartKind,
    pub metrics: &'static [MetricSpec],
}

impl MonthlyChart {
    /// Builds the 12-entry series for one year of aggregated data, one per
    /// metric, defaulting missing months to zero. Mode labels are plotted as
    /// their elevation ordinal.
    pub fn year_series(&self, months: &BTreeMap<u32, Leaf>) -> Vec<(&'static str, Vec<f64>)> {
        self.metrics
            .iter()
            .map(|metric| {
                let values = (1..=12)
                    .map(|month| {
                        months
                            .get(&month)
                            .and_then(|leaf| leaf.get(metric.name))
                            .map(numeric)
                            .unwrap_or(0.0)
                    })
                    .collect();
                (metric.label, values)
            })
            .collect()
    }
}

fn numeric(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Label(label) => ElevationTier::from_label(label)
            .map(|tier| tier.ordinal() as f64)
            .unwrap_or(0.0),
    }
}

/// Looks a chart up by CLI name.
pub fn find(name: &str) -> Option<&'static MonthlyChart> {
    MONTHLY_CHARTS.iter().find(|chart| chart.name == name)
}

pub static MONTHLY_CHARTS: &[MonthlyChart] = &[
    MonthlyChart {
        name: "temperature",
        title: "Average Temperatures",
        folder: "temperature_graphs",
        file_stem: "temperature",
        y_desc: "Temperature (°C)",
        secondary_y_desc: "",
        kind: ChartKind::Lines,
        metrics: &[
            MetricSpec {
                name: "temperature_max",
                label: "Avg Max Temperature",
                source: Source::Value(Field::TemperatureMax, Reduction::Mean),
            },
            MetricSpec {
                name: "temperature_min",
                label: "Avg Min Temperature",
                source: Source::Value(Field::TemperatureMin, Reduction::Mean),
            },
            MetricSpec {
                name: "temperature_mean",
                label: "Avg Mean Temperature",
                source: Source::Value(Field::TemperatureMean, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "magnitude-range",
        title: "Highest and Lowest Magnitudes",
        folder: "magnitude_graphs",
        file_stem: "magnitude",
        y_desc: "Magnitude",
        secondary_y_desc: "",
        kind: ChartKind::GroupedBars,
        metrics: &[
            MetricSpec {
                name: "max_magnitude",
                label: "Max Magnitude",
                source: Source::Value(Field::Magnitude, Reduction::Max),
            },
            MetricSpec {
                name: "min_magnitude",
                label: "Min Magnitude",
                source: Source::Value(Field::Magnitude, Reduction::Min),
            },
        ],
    },
    MonthlyChart {
        name: "sunshine-range",
        title: "Highest and Lowest Sunshine Hours",
        folder: "sunshine_graphs",
        file_stem: "sunshine",
        y_desc: "Sunshine (hours)",
        secondary_y_desc: "",
        kind: ChartKind::GroupedBars,
        metrics: &[
            MetricSpec {
                name: "max_sunshine",
                label: "Max Sunshine Hours",
                source: Source::Value(Field::SunshineHours, Reduction::Max),
            },
            MetricSpec {
                name: "min_sunshine",
                label: "Min Sunshine Hours",
                source: Source::Value(Field::SunshineHours, Reduction::Min),
            },
        ],
    },
    MonthlyChart {
        name: "wind",
        title: "Highest and First Observed Wind Speeds",
        folder: "wind_speed_graphs",
        file_stem: "wind_speed",
        y_desc: "Wind Speed (km/h)",
        secondary_y_desc: "",
        kind: ChartKind::GroupedBars,
        metrics: &[
            MetricSpec {
                name: "max_wind_speed",
                label: "Max Wind Speed",
                source: Source::Value(Field::WindSpeedMax, Reduction::Max),
            },
            MetricSpec {
                name: "actual_wind_speed",
                label: "Actual Wind Speed",
                source: Source::Value(Field::WindSpeedMax, Reduction::First),
            },
        ],
    },
    MonthlyChart {
        name: "rain-snow",
        title: "Rainfall & Snowfall",
        folder: "graphs_rainfall_snowfall",
        file_stem: "rainfall_snowfall",
        y_desc: "Snowfall (cm)",
        secondary_y_desc: "Rainfall (mm)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "total_snowfall_sum",
                label: "Snowfall (cm)",
                source: Source::Value(Field::SnowfallSum, Reduction::Sum),
            },
            MetricSpec {
                name: "total_rainfall",
                label: "Rainfall (mm)",
                source: Source::Value(Field::RainSum, Reduction::Sum),
            },
        ],
    },
    MonthlyChart {
        name: "temp-wind",
        title: "Temperature & Wind Speed",
        folder: "graphs_temp_wind_speed",
        file_stem: "temp_wind_speed",
        y_desc: "Wind Speed (km/h)",
        secondary_y_desc: "Temperature (°C)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "avg_wind_speed",
                label: "Avg Wind Speed (km/h)",
                source: Source::Value(Field::WindSpeedMax, Reduction::Mean),
            },
            MetricSpec {
                name: "avg_temperature_mean",
                label: "Average Temperature (°C)",
                source: Source::Value(Field::TemperatureMean, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "temp-rain",
        title: "Temperature & Rainfall",
        folder: "temperature_rainfall_graphs",
        file_stem: "temperature_rainfall",
        y_desc: "Rainfall (mm)",
        secondary_y_desc: "Temperature (°C)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "total_rain_sum",
                label: "Total Rainfall (mm)",
                source: Source::Value(Field::RainSum, Reduction::Sum),
            },
            MetricSpec {
                name: "avg_temperature_mean",
                label: "Average Temperature (°C)",
                source: Source::Value(Field::TemperatureMean, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "temp-magnitude",
        title: "Temperature & Magnitude",
        folder: "temperature_magnitude_graphs",
        file_stem: "temperature_magnitude",
        y_desc: "Magnitude",
        secondary_y_desc: "Temperature (°C)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "avg_magnitude",
                label: "Avg Magnitude",
                source: Source::Value(Field::Magnitude, Reduction::Mean),
            },
            MetricSpec {
                name: "avg_temperature_mean",
                label: "Average Temperature (°C)",
                source: Source::Value(Field::TemperatureMean, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "snow-wind",
        title: "Snowfall & Wind Speed",
        folder: "wind_speed_snowfall_graphs",
        file_stem: "wind_speed_snowfall",
        y_desc: "Snowfall (cm)",
        secondary_y_desc: "Wind Speed (km/h)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "total_snowfall_sum",
                label: "Total Snowfall (cm)",
                source: Source::Value(Field::SnowfallSum, Reduction::Sum),
            },
            MetricSpec {
                name: "max_wind_speed",
                label: "Max Wind Speed (km/h)",
                source: Source::Value(Field::WindSpeedMax, Reduction::Max),
            },
        ],
    },
    MonthlyChart {
        name: "rain-magnitude",
        title: "Rainfall & Magnitude",
        folder: "rain_magnitude_graphs",
        file_stem: "rain_magnitude",
        y_desc: "Rainfall (mm)",
        secondary_y_desc: "Magnitude",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "total_rain_sum",
                label: "Total Rainfall (mm)",
                source: Source::Value(Field::RainSum, Reduction::Sum),
            },
            MetricSpec {
                name: "average_magnitude",
                label: "Avg Magnitude",
                source: Source::Value(Field::Magnitude, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "sun-precipitation",
        title: "Sunshine & Precipitation Hours",
        folder: "sunshine_precipitation_graphs",
        file_stem: "sunshine_precipitation",
        y_desc: "Precipitation (hours)",
        secondary_y_desc: "Sunshine (hours)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "total_precipitation_hours",
                label: "Total Precipitation Hours",
                source: Source::Value(Field::PrecipitationHours, Reduction::Sum),
            },
            MetricSpec {
                name: "avg_sunshine_hours",
                label: "Avg Sunshine Hours",
                source: Source::Value(Field::SunshineHours, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "magnitude-precipitation",
        title: "Magnitude & Precipitation Hours",
        folder: "magnitude_precipitation_graphs",
        file_stem: "magnitude_precipitation",
        y_desc: "Precipitation (hours)",
        secondary_y_desc: "Magnitude",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "avg_precipitation_hours",
                label: "Avg Precipitation Hours",
                source: Source::Value(Field::PrecipitationHours, Reduction::Mean),
            },
            MetricSpec {
                name: "avg_magnitude",
                label: "Avg Magnitude",
                source: Source::Value(Field::Magnitude, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "elevation-wind",
        title: "Elevation & Wind Speed",
        folder: "elevation_wind_graphs",
        file_stem: "elevation_wind",
        y_desc: "Elevation (m)",
        secondary_y_desc: "Wind Speed (km/h)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "avg_elevation",
                label: "Avg Elevation (m)",
                source: Source::Value(Field::Elevation, Reduction::Mean),
            },
            MetricSpec {
                name: "avg_wind_speed",
                label: "Avg Wind Speed (km/h)",
                source: Source::Value(Field::WindSpeedMax, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "sunshine-maxtemp",
        title: "Sunshine Hours & Max Temperature",
        folder: "graphs_sunshine_temperature",
        file_stem: "sunshine_temperature",
        y_desc: "Temperature (°C)",
        secondary_y_desc: "Sunshine (hours)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "avg_temperature_max",
                label: "Avg Max Temperature (°C)",
                source: Source::Value(Field::TemperatureMax, Reduction::Mean),
            },
            MetricSpec {
                name: "avg_sunshine_hours",
                label: "Avg Sunshine Hours",
                source: Source::Value(Field::SunshineHours, Reduction::Mean),
            },
        ],
    },
    MonthlyChart {
        name: "magnitude-elevation",
        title: "Magnitude & Prevailing Elevation",
        folder: "magnitude_elevation_graphs",
        file_stem: "magnitude_elevation",
        y_desc: "Magnitude",
        secondary_y_desc: "Elevation Tier (1-5)",
        kind: ChartKind::BarLine,
        metrics: &[
            MetricSpec {
                name: "avg_magnitude",
                label: "Avg Magnitude",
                source: Source::Value(Field::Magnitude, Reduction::Mean),
            },
            MetricSpec {
                name: "elevation_class",
                label: "Prevailing Elevation Tier",
                source: Source::ModeOf(classify::ELEVATION),
            },
        ],
    },
    MonthlyChart {
        name: "rainfall-frequency",
        title: "Rainfall Frequency by Category",
        folder: "rainfall_frequency_graphs",
        file_stem: "rainfall_frequency",
        y_desc: "Frequency",
        secondary_y_desc: "",
        kind: ChartKind::CategoryBars(classify::RAINFALL),
        metrics: &[],
    },
];

// -- Tests -------------------------------------------------------------------
