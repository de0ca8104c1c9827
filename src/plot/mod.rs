//! Chart rendering primitives.
//!
//! All charts are drawn with the [`plotters`] bitmap backend and saved as
//! PNG files. The functions here only know about labelled series of numbers;
//! which fields and reductions feed them is the chart registry's business.

use std::path::Path;

use plotters::element::Pie;
use plotters::prelude::*;
use thiserror::Error;

/// Errors that can occur during chart generation.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, ChartError>;

pub const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(214, 69, 65),   // red
    RGBColor(65, 105, 225),  // blue
    RGBColor(46, 139, 87),   // green
    RGBColor(230, 126, 34),  // orange
    RGBColor(125, 60, 152),  // purple
    RGBColor(0, 139, 139),   // teal
];

const PIE_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

/// One labelled data series, one value per x label.
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

/// Y-range covering the values with headroom. The baseline stays at zero
/// unless a value is negative, so bars always grow from zero.
fn value_range<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if max <= min {
        max = min + 1.0;
    }
    let pad = (max - min) * 0.1;
    let low = if min < 0.0 { min - pad } else { 0.0 };

    (low, max + pad)
}

fn check_series(x_labels: &[&str], series: &[Series]) -> Result<()> {
    if x_labels.is_empty() {
        return Err(ChartError::InvalidData("no x labels".to_string()));
    }
    if series.is_empty() {
        return Err(ChartError::InvalidData("no series to plot".to_string()));
    }
    for s in series {
        if s.values.len() != x_labels.len() {
            return Err(ChartError::InvalidData(format!(
                "series `{}` has {} values for {} labels",
                s.label,
                s.values.len(),
                x_labels.len()
            )));
        }
    }
    Ok(())
}

/// Formats an axis position as its category label; ticks that do not land on
/// a category are blank.
fn category_label(x: f64, labels: &[&str]) -> String {
    let idx = x.round();
    if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < labels.len() {
        labels[idx as usize].to_string()
    } else {
        String::new()
    }
}

/// Grouped bar chart: one bar group per x label, one bar per series.
pub fn grouped_bar_chart(
    x_labels: &[&str],
    series: &[Series],
    title: &str,
    x_desc: &str,
    y_desc: &str,
    path: &Path,
) -> Result<()> {
    check_series(x_labels, series)?;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    let n = x_labels.len();
    let (y_min, y_max) = value_range(series.iter().flat_map(|s| s.values.iter().copied()));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)
        .map_err(|e| ChartError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| category_label(*x, x_labels))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    let bar_width = 0.8 / series.len() as f64;
    for (index, s) in series.iter().enumerate() {
        let color = SERIES_COLORS[index % SERIES_COLORS.len()];
        let offset = -0.4 + index as f64 * bar_width;

        chart
            .draw_series(s.values.iter().enumerate().map(|(i, &v)| {
                let x0 = i as f64 + offset;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, v)], color.filled())
            }))
            .map_err(|e| ChartError::Drawing(e.to_string()))?
            .label(s.label.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    Ok(())
}

/// Line chart: one line (with point markers) per series.
pub fn line_chart(
    x_labels: &[&str],
    series: &[Series],
    title: &str,
    x_desc: &str,
    y_desc: &str,
    path: &Path,
) -> Result<()> {
    check_series(x_labels, series)?;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    let n = x_labels.len();
    let (y_min, y_max) = value_range(series.iter().flat_map(|s| s.values.iter().copied()));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)
        .map_err(|e| ChartError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| category_label(*x, x_labels))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    for (index, s) in series.iter().enumerate() {
        let color = SERIES_COLORS[index % SERIES_COLORS.len()];

        chart
            .draw_series(LineSeries::new(
                s.values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                color.stroke_width(2),
            ))
            .map_err(|e| ChartError::Drawing(e.to_string()))?
            .label(s.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart
            .draw_series(
                s.values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Circle::new((i as f64, v), 3, color.filled())),
            )
            .map_err(|e| ChartError::Drawing(e.to_string()))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    Ok(())
}

/// Bars on the primary y-axis and a line on a secondary y-axis, the
/// twin-axis layout the combination charts use.
pub fn bar_line_chart(
    x_labels: &[&str],
    bar: &Series,
    line: &Series,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    secondary_y_desc: &str,
    path: &Path,
) -> Result<()> {
    check_series(x_labels, std::slice::from_ref(bar))?;
    check_series(x_labels, std::slice::from_ref(line))?;

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    let n = x_labels.len();
    let x_range = -0.5f64..(n as f64 - 0.5);
    let (bar_min, bar_max) = value_range(bar.values.iter().copied());
    let (line_min, line_max) = value_range(line.values.iter().copied());

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), bar_min..bar_max)
        .map_err(|e| ChartError::ChartConfig(e.to_string()))?
        .set_secondary_coord(x_range, line_min..line_max);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| category_label(*x, x_labels))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    chart
        .configure_secondary_axes()
        .y_desc(secondary_y_desc)
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    let bar_color = SERIES_COLORS[1];
    chart
        .draw_series(bar.values.iter().enumerate().map(|(i, &v)| {
            Rectangle::new(
                [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, v)],
                bar_color.mix(0.6).filled(),
            )
        }))
        .map_err(|e| ChartError::Drawing(e.to_string()))?
        .label(bar.label.clone())
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 5), (x + 12, y + 5)], bar_color.mix(0.6).filled())
        });

    let line_color = SERIES_COLORS[0];
    chart
        .draw_secondary_series(LineSeries::new(
            line.values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
            line_color.stroke_width(2),
        ))
        .map_err(|e| ChartError::Drawing(e.to_string()))?
        .label(line.label.clone())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

    chart
        .draw_secondary_series(
            line.values
                .iter()
                .enumerate()
                .map(|(i, &v)| Circle::new((i as f64, v), 3, line_color.filled())),
        )
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    Ok(())
}

/// Builds pie legend labels with each slice's share of the total.
pub fn percentage_labels(slices: &[(String, f64)]) -> Vec<String> {
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    slices
        .iter()
        .map(|(label, v)| {
            if total > 0.0 {
                format!("{} - {:.1}%", label, v / total * 100.0)
            } else {
                label.clone()
            }
        })
        .collect()
}

/// Pie chart with percentage labels. All-zero and empty slice sets are
/// invalid; callers are expected to skip those instead of rendering.
pub fn pie_chart(slices: &[(String, f64)], title: &str, path: &Path) -> Result<()> {
    if slices.is_empty() || slices.iter().all(|(_, v)| *v <= 0.0) {
        return Err(ChartError::InvalidData(
            "no non-zero slices to plot".to_string(),
        ));
    }

    let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;
    let root = root
        .titled(title, ("sans-serif", 30))
        .map_err(|e| ChartError::DrawingArea(e.to_string()))?;

    let sizes: Vec<f64> = slices.iter().map(|(_, v)| v.max(0.0)).collect();
    let labels = percentage_labels(slices);
    let colors: Vec<RGBColor> = (0..slices.len())
        .map(|i| PIE_COLORS[i % PIE_COLORS.len()])
        .collect();

    let center = (400, 410);
    let radius = 270.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(140.0);
    pie.label_style(("sans-serif", 20).into_font());

    root.draw(&pie)
        .map_err(|e| ChartError::Drawing(e.to_string()))?;
    root.present()
        .map_err(|e| ChartError::Drawing(e.to_string()))?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
