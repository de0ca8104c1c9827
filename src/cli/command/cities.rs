//! Per-city tier frequency charts, ten cities per PNG.

use std::path::Path;

use anyhow::Result;

use crate::aggregate;
use crate::classify;
use crate::cli::{create_spinner, CityMetric};
use crate::plot::{self, Series};
use crate::reading::load_records;

use super::prepare_output_dir;

const CITIES_PER_CHART: usize = 10;

pub fn cities(data: &Path, out: &Path, metric: CityMetric) -> Result<String> {
    let records = load_records(data)?;

    let (classifier, folder, file_stem, title) = match metric {
        CityMetric::Rainfall => (
            classify::RAINFALL,
            "city_rainfall_graphs",
            "rainfall_frequency",
            "Rainfall Frequency by Category",
        ),
        CityMetric::Magnitude => (
            classify::MAGNITUDE,
            "city_magnitude_graphs",
            "magnitude_frequency",
            "Magnitude Frequency by Category",
        ),
    };

    let spinner = create_spinner("Rendering city charts...".to_string());
    let table = aggregate::count_by_city(&records, &classifier);
    let dir = prepare_output_dir(out, folder)?;

    for (year, city_counts) in &table {
        let city_names: Vec<&str> = city_counts.keys().map(|c| c.as_str()).collect();

        for (part, chunk) in city_names.chunks(CITIES_PER_CHART).enumerate() {
            let series: Vec<Series> = classifier
                .labels
                .iter()
                .map(|&label| Series {
                    label: label.replace('_', " "),
                    values: chunk
                        .iter()
                        .map(|city| {
                            city_counts[*city].get(label).copied().unwrap_or(0) as f64
                        })
                        .collect(),
                })
                .collect();

            let path = dir.join(format!("{}_{}_{}.png", file_stem, year, part + 1));
            plot::grouped_bar_chart(
                chunk,
                &series,
                &format!("{} in {} - Part {}", title, year, part + 1),
                "City",
                "Frequency",
                &path,
            )?;
        }
    }
    spinner.finish_with_message("City charts rendered");

    Ok(dir.display().to_string())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn should_render_nothing_without_cities() {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data.json");
        // Records without a city are skipped entirely.
        fs::write(&data, r#"[{"date": "2023-05-01", "magnitude": 1.0}]"#).unwrap();

        let dir = cities(&data, root.path(), CityMetric::Magnitude).unwrap();

        assert!(fs::read_dir(&dir).unwrap().next().is_none());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn should_chunk_cities_into_parts_of_ten() {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data.json");

        let mut records = Vec::new();
        for i in 0..12 {
            records.push(format!(
                r#"{{"date": "2023-05-01", "city": "City{:02}", "weather": {{"rain_sum": 2.0}}}}"#,
                i
            ));
        }
        fs::write(&data, format!("[{}]", records.join(","))).unwrap();

        cities(&data, root.path(), CityMetric::Rainfall).unwrap();

        let dir = root.path().join("city_rainfall_graphs");
        assert!(dir.join("rainfall_frequency_2023_1.png").exists());
        assert!(dir.join("rainfall_frequency_2023_2.png").exists());
    }
}
