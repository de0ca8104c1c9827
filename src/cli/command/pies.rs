//! The pie chart suite: tier distributions over the whole dataset, sliced by
//! time of day, elevation tier and rainfall tier, optionally filtered to a
//! date range or a city, plus the day-summary pies.
//!
//! A distribution in which nothing classified (or every slice is zero) is
//! skipped with a notice instead of rendered.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use crate::aggregate::{self, Classifier};
use crate::classify::{self, ElevationTier, RainfallTier, TimeOfDay};
use crate::cli::create_spinner;
use crate::plot;
use crate::reading::{load_records, Field, Record};

use super::prepare_output_dir;

pub fn pies(
    data: &Path,
    out: &Path,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    city: Option<&str>,
) -> Result<String> {
    let records = load_records(data)?;
    let spinner = create_spinner("Rendering pie charts...".to_string());

    let quake_dir = prepare_output_dir(out, "earthquake_piecharts")?;
    let rain_dir = prepare_output_dir(out, "rain_piecharts")?;
    let day_dir = prepare_output_dir(out, "day_files")?;

    render_tier_pies(
        &records,
        &classify::MAGNITUDE,
        "Magnitude Distribution",
        "magnitude",
        &quake_dir,
    )?;
    render_tier_pies(
        &records,
        &classify::RAINFALL,
        "Rainfall Distribution",
        "rainfall",
        &rain_dir,
    )?;

    // Magnitude distribution within each rainfall tier.
    for tier in RainfallTier::ALL {
        let subset = filtered(&records, |r| {
            (classify::RAINFALL.apply)(r) == Some(tier.label())
        });
        render_distribution(
            &subset,
            &classify::MAGNITUDE,
            &format!("Magnitude Distribution by {}", tier.label()),
            &quake_dir.join(format!("magnitude_by_{}.png", slug(tier.label()))),
        )?;
    }

    if let (Some(start), Some(end)) = (start_date, end_date) {
        render_range_pies(&records, start, end, city, &quake_dir, &rain_dir)?;
    }

    render_day_pies(&records, &day_dir)?;

    spinner.finish_with_message("Pie charts rendered");

    Ok(out.display().to_string())
}

/// Overall distribution plus one pie per time-of-day and elevation tier.
fn render_tier_pies(
    records: &[Record],
    classifier: &Classifier,
    title: &str,
    file_stem: &str,
    dir: &Path,
) -> Result<()> {
    render_distribution(
        records,
        classifier,
        title,
        &dir.join(format!("{}_distribution.png", file_stem)),
    )?;

    for tod in TimeOfDay::ALL {
        let subset = filtered(records, |r| {
            (classify::TIME_OF_DAY.apply)(r) == Some(tod.label())
        });
        render_distribution(
            &subset,
            classifier,
            &format!("{} by {}", title, tod.label()),
            &dir.join(format!("{}_by_{}.png", file_stem, slug(tod.label()))),
        )?;
    }

    for tier in ElevationTier::ALL {
        let subset = filtered(records, |r| {
            (classify::ELEVATION.apply)(r) == Some(tier.label())
        });
        render_distribution(
            &subset,
            classifier,
            &format!("{} at {}", title, tier.label()),
            &dir.join(format!("{}_at_{}.png", file_stem, slug(tier.label()))),
        )?;
    }

    Ok(())
}

/// Date-range (and optional city) filtered distributions.
fn render_range_pies(
    records: &[Record],
    start: NaiveDate,
    end: NaiveDate,
    city: Option<&str>,
    quake_dir: &Path,
    rain_dir: &Path,
) -> Result<()> {
    let in_range = filtered(records, |r| {
        r.naive_date()
            .map(|d| d >= start && d <= end)
            .unwrap_or(false)
    });

    render_distribution(
        &in_range,
        &classify::MAGNITUDE,
        &format!("Magnitude Distribution {} to {}", start, end),
        &quake_dir.join(format!("magnitude_{}_{}.png", start, end)),
    )?;
    render_distribution(
        &in_range,
        &classify::RAINFALL,
        &format!("Rainfall Distribution {} to {}", start, end),
        &rain_dir.join(format!("rainfall_{}_{}.png", start, end)),
    )?;

    if let Some(city) = city {
        let in_city = filtered(&in_range, |r| {
            r.city
                .as_deref()
                .map(|c| c.eq_ignore_ascii_case(city))
                .unwrap_or(false)
        });

        render_distribution(
            &in_city,
            &classify::MAGNITUDE,
            &format!("Magnitude Distribution for {} {} to {}", city, start, end),
            &quake_dir.join(format!("magnitude_{}_{}_{}.png", slug(city), start, end)),
        )?;
        render_distribution(
            &in_city,
            &classify::RAINFALL,
            &format!("Rainfall Distribution for {} {} to {}", city, start, end),
            &rain_dir.join(format!("rainfall_{}_{}_{}.png", slug(city), start, end)),
        )?;
    }

    Ok(())
}

/// Whole-dataset day summary pies.
fn render_day_pies(records: &[Record], dir: &Path) -> Result<()> {
    render_distribution(
        records,
        &classify::SUNLIGHT,
        "Sunlight Distribution",
        &dir.join("sunlight_distribution.png"),
    )?;

    // Sunshine as a share of the full day, accumulated over all records.
    let mut daylight = 0.0;
    let mut rest_of_day = 0.0;
    for record in records {
        if let Some(hours) = Field::SunshineHours.extract(record) {
            let percent = hours / 24.0 * 100.0;
            daylight += percent;
            rest_of_day += 100.0 - percent;
        }
    }
    render_pie(
        &[("Daylight Hours", daylight), ("Rest of Day", rest_of_day)],
        "Daylight vs Rest of Day",
        &dir.join("daylight_vs_rest.png"),
    )?;

    let mut wet = 0.0;
    let mut dry = 0.0;
    for record in records {
        if let Some(hours) = Field::PrecipitationHours.extract(record) {
            let percent = hours / 24.0 * 100.0;
            wet += percent;
            dry += 100.0 - percent;
        }
    }
    render_pie(
        &[
            ("Precipitation Hours", wet),
            ("Hours Without Precipitation", dry),
        ],
        "Precipitation vs Dry Hours",
        &dir.join("precipitation_vs_dry.png"),
    )?;

    let rain: f64 = records
        .iter()
        .filter_map(|r| Field::RainSum.extract(r))
        .sum();
    let snow: f64 = records
        .iter()
        .filter_map(|r| Field::SnowfallSum.extract(r))
        .sum();
    render_pie(
        &[("Rain", rain), ("Snow", snow)],
        "Total Precipitation",
        &dir.join("precipitation_total.png"),
    )?;

    let sunshine: f64 = records
        .iter()
        .filter_map(|r| Field::SunshineHours.extract(r))
        .sum();
    let precipitation: f64 = records
        .iter()
        .filter_map(|r| Field::PrecipitationHours.extract(r))
        .sum();
    render_pie(
        &[("Sun Hours", sunshine), ("Precipitation", precipitation)],
        "Sunlight vs Precipitation Hours",
        &dir.join("sunlight_precipitation.png"),
    )?;

    Ok(())
}

fn render_distribution(
    records: &[Record],
    classifier: &Classifier,
    title: &str,
    path: &Path,
) -> Result<()> {
    let counts = aggregate::distribution(records, classifier);
    let slices: Vec<(&str, f64)> = counts
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .collect();

    render_pie(&slices, title, path)
}

fn render_pie(slices: &[(&str, f64)], title: &str, path: &Path) -> Result<()> {
    if slices.iter().all(|(_, v)| *v <= 0.0) {
        println!(
            "Skipping pie chart `{}` because there is no valid data to plot.",
            title
        );
        return Ok(());
    }

    let owned: Vec<(String, f64)> = slices
        .iter()
        .map(|(label, v)| (label.to_string(), *v))
        .collect();
    plot::pie_chart(&owned, title, path)?;

    Ok(())
}

fn filtered(records: &[Record], pred: impl Fn(&Record) -> bool) -> Vec<Record> {
    records.iter().filter(|r| pred(r)).cloned().collect()
}

fn slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn should_skip_all_zero_distributions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pie.png");

        render_pie(&[("a", 0.0), ("b", 0.0)], "Empty", &path).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn should_skip_everything_for_unclassifiable_records() {
        // No magnitudes, no weather: every distribution is all-zero and no
        // PNG is written anywhere.
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data.json");
        fs::write(&data, r#"[{"date": "2023-05-01"}, {"city": "X"}]"#).unwrap();

        pies(&data, root.path(), None, None, None).unwrap();

        for folder in ["earthquake_piecharts", "rain_piecharts", "day_files"] {
            let dir = root.path().join(folder);
            assert!(dir.is_dir());
            assert!(fs::read_dir(&dir).unwrap().next().is_none());
        }
    }

    #[test]
    fn should_filter_by_date_range() {
        let records: Vec<Record> = serde_json::from_str(
            r#"[
                {"date": "2023-01-15", "magnitude": 1.0},
                {"date": "2023-06-15", "magnitude": 6.0},
                {"date": "bad", "magnitude": 6.0}
            ]"#,
        )
        .unwrap();

        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 3, 31).unwrap();
        let subset = filtered(&records, |r| {
            r.naive_date()
                .map(|d| d >= start && d <= end)
                .unwrap_or(false)
        });

        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].magnitude, Some(1.0));
    }

    #[test]
    fn should_slug_labels_for_file_names() {
        assert_eq!(slug("Mid_Morning"), "mid_morning");
        assert_eq!(slug("Low Sunlight"), "low_sunlight");
        assert_eq!(slug("Below_Sea_Level"), "below_sea_level");
    }
}
