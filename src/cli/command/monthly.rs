//! Renders the monthly chart set: one PNG per year for every chart
//! definition in the registry.

use std::path::Path;

use anyhow::{anyhow, Result};

use crate::aggregate;
use crate::charts::{self, ChartKind, MonthlyChart};
use crate::cli::create_progress_bar;
use crate::plot::{self, Series, MONTH_ABBR};
use crate::reading::{load_records, Record};

use super::prepare_output_dir;

pub fn monthly(data: &Path, out: &Path, chart: Option<&str>) -> Result<String> {
    let records = load_records(data)?;

    let selected: Vec<&MonthlyChart> = match chart {
        Some(name) => {
            vec![charts::find(name).ok_or_else(|| anyhow!("unknown chart `{}`", name))?]
        }
        None => charts::MONTHLY_CHARTS.iter().collect(),
    };

    let pb = create_progress_bar(selected.len() as u64, "Rendering charts...".to_string());
    for chart in &selected {
        render_chart(chart, &records, out)?;
        pb.inc(1);
    }
    pb.finish_with_message("Charts rendered");

    Ok(out.display().to_string())
}

fn render_chart(chart: &MonthlyChart, records: &[Record], out: &Path) -> Result<()> {
    let dir = prepare_output_dir(out, chart.folder)?;
    let month_labels: Vec<&str> = MONTH_ABBR.to_vec();

    if let ChartKind::CategoryBars(classifier) = chart.kind {
        let table = aggregate::count_by_month(records, &classifier);
        for (year, months) in &table {
            let series: Vec<Series> = classifier
                .labels
                .iter()
                .map(|&label| Series {
                    label: label.replace('_', " "),
                    values: (1..=12)
                        .map(|m| {
                            months
                                .get(&m)
                                .and_then(|counts| counts.get(label))
                                .copied()
                                .unwrap_or(0) as f64
                        })
                        .collect(),
                })
                .collect();

            let path = dir.join(format!("{}_{}.png", chart.file_stem, year));
            plot::grouped_bar_chart(
                &month_labels,
                &series,
                &format!("{} in {}", chart.title, year),
                "Month",
                chart.y_desc,
                &path,
            )?;
        }
        return Ok(());
    }

    let table = aggregate::aggregate_monthly(records, chart.metrics);
    for (year, months) in &table {
        let series: Vec<Series> = chart
            .year_series(months)
            .into_iter()
            .map(|(label, values)| Series {
                label: label.to_string(),
                values,
            })
            .collect();

        let title = format!("{} in {}", chart.title, year);
        let path = dir.join(format!("{}_{}.png", chart.file_stem, year));

        match chart.kind {
            ChartKind::Lines => {
                plot::line_chart(&month_labels, &series, &title, "Month", chart.y_desc, &path)?
            }
            ChartKind::GroupedBars => plot::grouped_bar_chart(
                &month_labels,
                &series,
                &title,
                "Month",
                chart.y_desc,
                &path,
            )?,
            ChartKind::BarLine => plot::bar_line_chart(
                &month_labels,
                &series[0],
                &series[1],
                &title,
                "Month",
                chart.y_desc,
                chart.secondary_y_desc,
                &path,
            )?,
            ChartKind::CategoryBars(_) => unreachable!("handled above"),
        }
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------
