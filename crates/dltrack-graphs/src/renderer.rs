//! Renderer trait and shared drawing helpers.

use crate::{format_delta, CumulativeSeries, HtmlChart, PngChart};
use chrono::{Days, NaiveDate};
use dltrack_common::Result;
use dltrack_config::ChartsConfig;
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Axis title for the horizontal axis.
pub const X_AXIS_LABEL: &str = "Date";
/// Axis title for the vertical axis.
pub const Y_AXIS_LABEL: &str = "Cumulative Downloads";
/// Tick label format for dates.
pub const TICK_DATE_FORMAT: &str = "%b %d";

const X_LABELS: usize = 12;
const Y_LABELS: usize = 10;
const GRID_DASH: [f64; 2] = [6.0, 6.0];
const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);

/// A chart output format.
pub trait ChartRenderer {
    /// Render `series` to `path`, creating parent directories as needed.
    fn render_to_file(&self, series: &CumulativeSeries, path: &Path) -> Result<()>;

    /// Short name of the output format.
    fn name(&self) -> &'static str;
}

/// Size and annotation settings shared by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Number of best-ranked models annotated by name.
    pub top_n: usize,
}

impl ChartOptions {
    /// PNG options from the `charts` config section.
    pub fn png(charts: &ChartsConfig) -> Self {
        Self {
            width: charts.png_width,
            height: charts.png_height,
            top_n: charts.top_n,
        }
    }

    /// HTML options from the `charts` config section.
    pub fn html(charts: &ChartsConfig) -> Self {
        Self {
            width: charts.html_width,
            height: charts.html_height,
            top_n: charts.top_n,
        }
    }
}

/// Paths of the files written by [`render_charts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCharts {
    /// Static chart.
    pub png: PathBuf,
    /// Interactive chart.
    pub html: PathBuf,
}

/// Render both charts as configured.
pub fn render_charts(series: &CumulativeSeries, charts: &ChartsConfig) -> Result<RenderedCharts> {
    let png = PngChart::new(ChartOptions::png(charts));
    let html = HtmlChart::new(ChartOptions::html(charts));
    let outputs: [(&dyn ChartRenderer, &Path); 2] =
        [(&png, &charts.png_path), (&html, &charts.html_path)];

    for (renderer, path) in outputs {
        renderer.render_to_file(series, path)?;
        info!("Saved {} chart to {}", renderer.name(), path.display());
    }

    Ok(RenderedCharts {
        png: charts.png_path.clone(),
        html: charts.html_path.clone(),
    })
}

/// Chart context over day offsets and signed deltas.
pub(crate) type DeltaChart<'a, DB> =
    ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Draw the caption, labelled axes and a dashed grid at the tick positions.
///
/// Both output formats start from this frame; `margin_right` leaves room for
/// labels placed past the last date.
pub(crate) fn draw_frame<'a, DB>(
    area: &'a DrawingArea<DB, Shift>,
    series: &CumulativeSeries,
    margin_right: u32,
) -> Result<DeltaChart<'a, DB>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let last = series.dates().len() - 1;
    let x_max = series.day_offset(last).max(1) as f64;
    let (lo, hi) = series.value_range();
    let span = (hi - lo).max(1) as f64;
    let (y_min, y_max) = (lo as f64 - span * 0.02, hi as f64 + span * 0.05);

    let start = series.start_date();
    let x_formatter = |x: &f64| date_label(start, *x);
    let y_formatter = |y: &f64| format_delta(y.round() as i64);

    let mut chart = ChartBuilder::on(area)
        .caption(series.title(), ("sans-serif", 32))
        .margin(20)
        .margin_right(margin_right)
        .x_label_area_size(70)
        .y_label_area_size(130)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(X_LABELS)
        .y_labels(Y_LABELS)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .axis_desc_style(("sans-serif", 22))
        .label_style(("sans-serif", 16))
        .draw()?;

    let coord = chart.as_coord_spec();
    let mut grid_lines = Vec::new();
    for x in coord.x_spec().key_points(X_LABELS) {
        grid_lines.push([chart.backend_coord(&(x, y_min)), chart.backend_coord(&(x, y_max))]);
    }
    for y in coord.y_spec().key_points(Y_LABELS) {
        grid_lines.push([chart.backend_coord(&(0.0, y)), chart.backend_coord(&(x_max, y))]);
    }
    for line in grid_lines {
        for segment in dash_segments(&line, &GRID_DASH) {
            area.draw(&PathElement::new(segment, GRID_COLOR.stroke_width(1)))?;
        }
    }

    Ok(chart)
}

/// Tick label for a day offset from `start`.
pub(crate) fn date_label(start: NaiveDate, offset: f64) -> String {
    start
        .checked_add_days(Days::new(offset.round().max(0.0) as u64))
        .map(|date| date.format(TICK_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Split a pixel polyline into the visible pieces of a dash pattern.
///
/// `pattern` alternates on and off lengths starting with "on". An empty
/// pattern returns the polyline unchanged.
pub fn dash_segments(points: &[(i32, i32)], pattern: &[f64]) -> Vec<Vec<(i32, i32)>> {
    if points.len() < 2 || pattern.iter().all(|len| *len <= 0.0) {
        return vec![points.to_vec()];
    }

    let mut segments = Vec::new();
    let mut current = vec![points[0]];
    let mut drawing = true;
    let mut step = 0;
    let mut remaining = pattern[0];

    for pair in points.windows(2) {
        let (x0, y0) = (f64::from(pair[0].0), f64::from(pair[0].1));
        let (x1, y1) = (f64::from(pair[1].0), f64::from(pair[1].1));
        let length = (x1 - x0).hypot(y1 - y0);
        let mut travelled = 0.0;

        while length - travelled > remaining {
            travelled += remaining;
            let t = travelled / length;
            let point = (
                (x0 + (x1 - x0) * t).round() as i32,
                (y0 + (y1 - y0) * t).round() as i32,
            );
            if drawing {
                current.push(point);
                segments.push(std::mem::take(&mut current));
            } else {
                current = vec![point];
            }
            drawing = !drawing;
            step = (step + 1) % pattern.len();
            remaining = pattern[step];
        }

        remaining -= length - travelled;
        if drawing {
            current.push(pair[1]);
        }
    }

    if drawing && current.len() > 1 {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use dltrack_common::test_utils::date;

    #[test]
    fn test_date_label() {
        let start = date(2024, 12, 30);
        assert_eq!(date_label(start, 0.0), "Dec 30");
        assert_eq!(date_label(start, 2.4), "Jan 01");
        assert_eq!(date_label(start, -1.0), "Dec 30");
    }

    #[test]
    fn test_solid_pattern_keeps_polyline() {
        let points = vec![(0, 0), (10, 0), (10, 10)];
        assert_eq!(dash_segments(&points, &[]), vec![points]);
    }

    #[test]
    fn test_dashes_on_straight_line() {
        let segments = dash_segments(&[(0, 0), (20, 0)], &[5.0, 5.0]);
        assert_eq!(segments, vec![vec![(0, 0), (5, 0)], vec![(10, 0), (15, 0)]]);
    }

    #[test]
    fn test_dash_carries_across_vertices() {
        let segments = dash_segments(&[(0, 0), (3, 0), (3, 10)], &[6.0, 2.0]);
        assert_eq!(segments[0], vec![(0, 0), (3, 0), (3, 3)]);
        assert_eq!(segments[1], vec![(3, 5), (3, 10)]);
    }

    #[test]
    fn test_options_from_config() {
        let charts = ChartsConfig::default();
        let png = ChartOptions::png(&charts);
        let html = ChartOptions::html(&charts);
        assert_eq!((png.width, png.height), (charts.png_width, charts.png_height));
        assert_eq!((html.width, html.height), (charts.html_width, charts.html_height));
        assert_eq!(png.top_n, charts.top_n);
    }
}
