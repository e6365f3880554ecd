//! Static PNG chart drawn with plotters.

use crate::renderer::{dash_segments, draw_frame, ensure_parent_dir, ChartOptions, ChartRenderer};
use crate::{CumulativeSeries, MarkerGlyph, MarkerShape, SeriesStyle};
use dltrack_common::{truncate_string, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;
use tracing::debug;

const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: f64 = 5.0;
const LEGEND_COLUMNS: usize = 2;
const ANNOTATION_OFFSET: i32 = 8;
const ANNOTATION_MARGIN: u32 = 180;

/// Renders the cumulative series as a PNG with a two-column legend panel.
#[derive(Debug, Clone)]
pub struct PngChart {
    options: ChartOptions,
}

impl PngChart {
    /// Create a PNG renderer.
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, series: &CumulativeSeries) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;

        let (width, _) = root.dim_in_pixel();
        let (plot_area, legend_area) = root.split_horizontally(width - legend_width(width));

        let last = series.dates().len() - 1;
        let chart = draw_frame(&plot_area, series, ANNOTATION_MARGIN)?;

        for (index, name) in series.models().iter().enumerate() {
            let style = SeriesStyle::for_name(name);
            let color = RGBColor::from(style.color);
            let points: Vec<(i32, i32)> = series
                .values(index)
                .iter()
                .enumerate()
                .map(|(d, &v)| chart.backend_coord(&(series.day_offset(d) as f64, v as f64)))
                .collect();

            for segment in dash_segments(&points, style.line.dash_pattern()) {
                root.draw(&PathElement::new(segment, color.stroke_width(LINE_WIDTH)))?;
            }
            for &point in &points {
                draw_marker(root, style.marker, point, color)?;
            }
        }

        let label_font = FontDesc::new(FontFamily::SansSerif, 18.0, FontStyle::Bold);
        for index in series.top(self.options.top_n) {
            let name = &series.models()[index];
            let color = RGBColor::from(SeriesStyle::for_name(name).color);
            let (x, y) = chart.backend_coord(&(
                series.day_offset(last) as f64,
                series.final_value(index) as f64,
            ));
            let style = label_font
                .color(&color)
                .pos(Pos::new(HPos::Left, VPos::Center));
            root.draw(&Text::new(name.clone(), (x + ANNOTATION_OFFSET, y), style))?;
        }

        draw_legend(&legend_area, series)?;
        debug!(
            "Drew {} series over {} date(s)",
            series.models().len(),
            series.dates().len()
        );
        Ok(())
    }
}

impl ChartRenderer for PngChart {
    fn render_to_file(&self, series: &CumulativeSeries, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let root = BitMapBackend::new(path, (self.options.width, self.options.height))
            .into_drawing_area();
        self.draw(&root, series)?;
        root.present()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "png"
    }
}

fn draw_legend<DB>(area: &DrawingArea<DB, Shift>, series: &CumulativeSeries) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (width, height) = area.dim_in_pixel();
    let rows = series.models().len().div_ceil(LEGEND_COLUMNS).max(1);
    let column_width = (width as i32 - 20) / LEGEND_COLUMNS as i32;
    let row_height = ((height as i32 - 120) / rows as i32).clamp(8, 28);
    let max_chars = usize::try_from((column_width - 50) / 8).unwrap_or(0).max(4);

    let font = FontDesc::new(FontFamily::SansSerif, f64::from(row_height.min(18)), FontStyle::Normal);
    let text_style = font.color(&BLACK).pos(Pos::new(HPos::Left, VPos::Center));

    for (i, name) in series.models().iter().enumerate() {
        let column = (i / rows) as i32;
        let row = (i % rows) as i32;
        let x = 10 + column * column_width;
        let y = 80 + row * row_height + row_height / 2;

        let style = SeriesStyle::for_name(name);
        let color = RGBColor::from(style.color);
        for segment in dash_segments(&[(x, y), (x + 36, y)], style.line.dash_pattern()) {
            area.draw(&PathElement::new(segment, color.stroke_width(LINE_WIDTH)))?;
        }
        draw_marker(area, style.marker, (x + 18, y), color)?;
        area.draw(&Text::new(
            truncate_string(name, max_chars),
            (x + 44, y),
            text_style.clone(),
        ))?;
    }
    Ok(())
}

fn draw_marker<DB>(
    area: &DrawingArea<DB, Shift>,
    shape: MarkerShape,
    center: (i32, i32),
    color: RGBColor,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let origin = (f64::from(center.0), f64::from(center.1));
    match MarkerGlyph::new(shape, origin, MARKER_SIZE) {
        MarkerGlyph::Disc { radius, .. } => {
            area.draw(&Circle::new(center, radius.round() as u32, color.filled()))?;
        }
        MarkerGlyph::Polygon(vertices) => {
            let vertices: Vec<(i32, i32)> = vertices.into_iter().map(to_pixel).collect();
            area.draw(&Polygon::new(vertices, color.filled()))?;
        }
        MarkerGlyph::Strokes(lines) => {
            for [from, to] in lines {
                area.draw(&PathElement::new(
                    vec![to_pixel(from), to_pixel(to)],
                    color.stroke_width(LINE_WIDTH),
                ))?;
            }
        }
    }
    Ok(())
}

fn to_pixel((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn legend_width(total: u32) -> u32 {
    (total / 5).clamp(100, 560).min(total / 2)
}
