//! Interactive HTML chart.
//!
//! The frame is drawn by plotters into an inline SVG; each model is then
//! added as a hoverable `<g class="series">` group, and a short inline script
//! handles emphasis and tooltips. The document opens from disk with no
//! network access.

use crate::renderer::{draw_frame, ensure_parent_dir, ChartOptions, ChartRenderer, TICK_DATE_FORMAT};
use crate::{format_delta, CumulativeSeries, LineStyle, MarkerGlyph, MarkerShape, Rgb, SeriesStyle};
use dltrack_common::{DlTrackError, Result};
use plotters::prelude::*;
use std::fmt::{self, Write as _};
use std::path::Path;

const MARKER_SIZE: f64 = 4.0;
const MARGIN_RIGHT: u32 = 30;

const STYLESHEET: &str = r"
body { font-family: sans-serif; margin: 16px; color: #222; }
.chart { display: flex; align-items: flex-start; gap: 16px; }
#plot .series { cursor: pointer; transition: opacity 0.1s; }
.legend { list-style: none; margin: 0; padding: 0; font-size: 13px; overflow-y: auto; }
.legend li { display: flex; align-items: center; gap: 6px; padding: 2px 4px; cursor: pointer; white-space: nowrap; }
#tooltip { position: absolute; display: none; pointer-events: none; background: rgba(255, 255, 255, 0.95);
  border: 1px solid #888; border-radius: 4px; padding: 4px 8px; font-size: 12px; white-space: pre; }
";

const SCRIPT: &str = r"
(function () {
  var groups = Array.prototype.slice.call(document.querySelectorAll('#plot g.series'));
  var items = Array.prototype.slice.call(document.querySelectorAll('.legend li'));
  var tooltip = document.getElementById('tooltip');

  function apply(group, width, opacity) {
    group.style.opacity = opacity;
    group.querySelectorAll('polyline.line').forEach(function (line) {
      line.setAttribute('stroke-width', width);
    });
  }
  function emphasize(name) {
    groups.forEach(function (group) {
      if (group.getAttribute('data-name') === name) {
        apply(group, 5, 1);
      } else {
        apply(group, 1, 0.15);
      }
    });
  }
  function reset() {
    groups.forEach(function (group) { apply(group, 2, 1); });
    tooltip.style.display = 'none';
  }

  groups.forEach(function (group) {
    var name = group.getAttribute('data-name');
    group.addEventListener('mouseenter', function () { emphasize(name); });
    group.addEventListener('mouseleave', reset);
    group.querySelectorAll('.point').forEach(function (point) {
      point.addEventListener('mousemove', function (event) {
        tooltip.textContent = name + '\n' + point.getAttribute('data-date') +
          '\nDownloads: ' + point.getAttribute('data-value');
        tooltip.style.left = (event.pageX + 12) + 'px';
        tooltip.style.top = (event.pageY + 12) + 'px';
        tooltip.style.display = 'block';
      });
    });
  });
  items.forEach(function (item) {
    var name = item.getAttribute('data-name');
    item.addEventListener('mouseenter', function () { emphasize(name); });
    item.addEventListener('mouseleave', reset);
  });
})();
";

/// Renders the cumulative series as a standalone HTML page.
#[derive(Debug, Clone)]
pub struct HtmlChart {
    options: ChartOptions,
}

impl HtmlChart {
    /// Create an HTML renderer.
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    /// Build the complete HTML document.
    pub fn to_html(&self, series: &CumulativeSeries) -> Result<String> {
        let plot = self.plot_svg(series)?;
        self.document(series, &plot).map_err(html_error)
    }

    /// Plot as an SVG element: the plotters frame plus one group per model
    /// in rank order.
    fn plot_svg(&self, series: &CumulativeSeries) -> Result<String> {
        let mut svg = String::new();
        let mut groups = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.options.width, self.options.height))
                .into_drawing_area();
            root.fill(&WHITE)?;
            let chart = draw_frame(&root, series, MARGIN_RIGHT)?;

            for index in series.ranked() {
                let points: Vec<(f64, f64)> = series
                    .values(index)
                    .iter()
                    .enumerate()
                    .map(|(d, &v)| {
                        let (x, y) = chart.backend_coord(&(series.day_offset(d) as f64, v as f64));
                        (f64::from(x), f64::from(y))
                    })
                    .collect();
                write_series(&mut groups, series, index, &points).map_err(html_error)?;
            }
            root.present()?;
        }

        let end = svg
            .rfind("</svg>")
            .ok_or_else(|| DlTrackError::graph("SVG backend produced an unterminated document"))?;
        svg.insert_str(end, &groups);
        Ok(svg.replacen("<svg ", "<svg id=\"plot\" ", 1))
    }

    fn document(&self, series: &CumulativeSeries, plot: &str) -> std::result::Result<String, fmt::Error> {
        let title = escape_html(&series.title());
        let mut out = String::new();

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{title}</title>")?;
        writeln!(out, "<style>{STYLESHEET}</style>")?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<div class=\"chart\">")?;
        out.push_str(plot);
        write_legend(&mut out, series, self.options.height)?;
        writeln!(out, "</div>")?;
        writeln!(out, "<div id=\"tooltip\"></div>")?;
        writeln!(out, "<script>{SCRIPT}</script>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(out)
    }
}

impl ChartRenderer for HtmlChart {
    fn render_to_file(&self, series: &CumulativeSeries, path: &Path) -> Result<()> {
        let html = self.to_html(series)?;
        ensure_parent_dir(path)?;
        std::fs::write(path, html)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

fn html_error(err: fmt::Error) -> DlTrackError {
    DlTrackError::graph_with_source("Failed to build HTML chart", err)
}

fn write_series(
    out: &mut String,
    series: &CumulativeSeries,
    index: usize,
    points: &[(f64, f64)],
) -> fmt::Result {
    let name = escape_html(&series.models()[index]);
    let style = SeriesStyle::for_name(&series.models()[index]);
    let color = style.color.to_hex();

    let path = points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");

    writeln!(out, "<g class=\"series\" data-name=\"{name}\">")?;
    writeln!(
        out,
        "<polyline class=\"hit\" points=\"{path}\" fill=\"none\" stroke=\"transparent\" stroke-width=\"10\"/>"
    )?;
    writeln!(
        out,
        "<polyline class=\"line\" points=\"{path}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\"{}/>",
        dash_attribute(style.line)
    )?;
    for (d, &point) in points.iter().enumerate() {
        let date = series.dates()[d].format(TICK_DATE_FORMAT);
        let value = format_delta(series.values(index)[d]);
        let data = format!("class=\"point\" data-date=\"{date}\" data-value=\"{value}\"");
        write_glyph(out, style.marker, point, MARKER_SIZE, style.color, &data)?;
    }
    writeln!(out, "</g>")
}

fn write_legend(out: &mut String, series: &CumulativeSeries, height: u32) -> fmt::Result {
    writeln!(out, "<ul class=\"legend\" style=\"max-height: {height}px\">")?;
    for index in series.ranked() {
        let raw = &series.models()[index];
        let name = escape_html(raw);
        let style = SeriesStyle::for_name(raw);
        writeln!(out, "<li data-name=\"{name}\">")?;
        writeln!(out, "<svg width=\"40\" height=\"14\" viewBox=\"0 0 40 14\">")?;
        writeln!(
            out,
            "<line x1=\"2\" y1=\"7\" x2=\"38\" y2=\"7\" stroke=\"{}\" stroke-width=\"2\"{}/>",
            style.color.to_hex(),
            dash_attribute(style.line)
        )?;
        write_glyph(out, style.marker, (20.0, 7.0), MARKER_SIZE, style.color, "")?;
        writeln!(out, "</svg><span>{name}</span></li>")?;
    }
    writeln!(out, "</ul>")
}

fn write_glyph(
    out: &mut String,
    shape: MarkerShape,
    center: (f64, f64),
    size: f64,
    color: Rgb,
    attributes: &str,
) -> fmt::Result {
    let color = color.to_hex();
    match MarkerGlyph::new(shape, center, size) {
        MarkerGlyph::Disc { center, radius } => writeln!(
            out,
            "<circle {attributes} cx=\"{:.1}\" cy=\"{:.1}\" r=\"{radius:.1}\" fill=\"{color}\"/>",
            center.0, center.1
        ),
        MarkerGlyph::Polygon(vertices) => {
            let points = vertices
                .iter()
                .map(|(x, y)| format!("{x:.1},{y:.1}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "<polygon {attributes} points=\"{points}\" fill=\"{color}\"/>")
        }
        MarkerGlyph::Strokes(lines) => {
            let d = lines
                .iter()
                .map(|[a, b]| format!("M{:.1} {:.1}L{:.1} {:.1}", a.0, a.1, b.0, b.1))
                .collect::<String>();
            writeln!(
                out,
                "<path {attributes} d=\"{d}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\"/>"
            )
        }
    }
}

fn dash_attribute(line: LineStyle) -> String {
    line.svg_dasharray()
        .map(|dashes| format!(" stroke-dasharray=\"{dashes}\""))
        .unwrap_or_default()
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use dltrack_common::test_utils::date;
    use dltrack_ledger::{LedgerRow, LedgerTable};

    fn series() -> CumulativeSeries {
        let table = LedgerTable {
            columns: vec!["low".to_string(), "high".to_string(), "<b>".to_string()],
            rows: vec![
                LedgerRow {
                    date: date(2024, 3, 1),
                    values: vec![10, 10, 0],
                },
                LedgerRow {
                    date: date(2024, 3, 2),
                    values: vec![11, 1_500, 5],
                },
            ],
        };
        CumulativeSeries::from_table(&table).unwrap()
    }

    fn chart() -> HtmlChart {
        HtmlChart::new(ChartOptions {
            width: 1200,
            height: 700,
            top_n: 10,
        })
    }

    #[test]
    fn test_series_groups_in_rank_order() {
        let html = chart().to_html(&series()).unwrap();
        let high = html.find("<g class=\"series\" data-name=\"high\"").unwrap();
        let tag = html.find("<g class=\"series\" data-name=\"&lt;b&gt;\"").unwrap();
        let low = html.find("<g class=\"series\" data-name=\"low\"").unwrap();
        assert!(high < tag && tag < low);
        assert_eq!(html.matches("<g class=\"series\"").count(), 3);
    }

    #[test]
    fn test_document_is_self_contained() {
        let html = chart().to_html(&series()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("<script src"));
        assert!(!html.contains("<link"));
        assert!(html.contains("<title>Cumulative Downloads per Model (since Mar 01, 2024)</title>"));
        assert_eq!(html.matches("<svg id=\"plot\"").count(), 1);
    }

    #[test]
    fn test_series_groups_inside_plot() {
        let html = chart().to_html(&series()).unwrap();
        let plot_end = html.find("</svg>").unwrap();
        let last_group = html.rfind("<g class=\"series\"").unwrap();
        assert!(last_group < plot_end);

        let plot = &html[..plot_end];
        assert!(plot.contains(">\nCumulative Downloads per Model (since Mar 01, 2024)\n</text>"));
        assert!(plot.contains(">\nCumulative Downloads\n</text>"));
        assert!(plot.contains(">\nDate\n</text>"));
    }

    #[test]
    fn test_points_carry_tooltip_data() {
        let html = chart().to_html(&series()).unwrap();
        assert!(html.contains("data-date=\"Mar 02\" data-value=\"1,490\""));
        assert!(html.contains("data-date=\"Mar 01\" data-value=\"0\""));
    }

    #[test]
    fn test_hover_script_widths() {
        let html = chart().to_html(&series()).unwrap();
        assert!(html.contains("apply(group, 5, 1)"));
        assert!(html.contains("apply(group, 1, 0.15)"));
        assert!(html.contains("apply(group, 2, 1)"));
    }

    #[test]
    fn test_series_colors_and_dashes() {
        let html = chart().to_html(&series()).unwrap();
        let style = SeriesStyle::for_name("high");
        assert!(html.contains(&format!("stroke=\"{}\"", style.color.to_hex())));
        if let Some(dashes) = style.line.svg_dasharray() {
            assert!(html.contains(&format!("stroke-dasharray=\"{dashes}\"")));
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("downloads.html");
        chart().render_to_file(&series(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<svg id=\"plot\""));
    }
}
