//! Self-contained line figures rendered to SVG.
//!
//! Every helper takes its data explicitly and returns a [`Figure`]; nothing is
//! drawn to shared state. Render with [`Figure::to_svg`] and write with
//! [`ResultWriter::write_figure`](crate::ResultWriter::write_figure).

use std::fmt;

use ddtw_core::WarpingPath;

use crate::error::PlotError;

/// Default title of [`plot_raw_signals`].
pub const RAW_SIGNALS_TITLE: &str = "raw_signals";
/// Default title of [`plot_alignment_path`].
pub const ALIGNMENT_PATH_TITLE: &str = "alignment_path";
/// Default title of [`plot_aligned_signals`].
pub const ALIGNED_SIGNALS_TITLE: &str = "aligned_signals";

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 55.0;
const GRID_DIVISIONS: usize = 5;
const PALETTE: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];

/// One polyline in a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    /// Legend label.
    pub label: String,
    /// `(x, y)` points in data coordinates.
    pub points: Vec<(f64, f64)>,
}

impl LineSeries {
    /// A series whose x coordinate is the sample index.
    pub fn from_values(label: impl Into<String>, values: &[f64]) -> Self {
        Self {
            label: label.into(),
            points: values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect(),
        }
    }
}

/// A titled, gridded line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    title: String,
    x_label: String,
    y_label: String,
    series: Vec<LineSeries>,
}

impl Figure {
    /// Create an empty figure.
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    /// Add a line series.
    #[must_use]
    pub fn with_series(mut self, series: LineSeries) -> Self {
        self.series.push(series);
        self
    }

    /// Return the figure title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Return the line series in drawing order.
    pub fn series(&self) -> &[LineSeries] {
        &self.series
    }

    /// Render as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

/// Writes the SVG document.
impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bounds = Bounds::of(&self.series);
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let to_px = |(x, y): (f64, f64)| {
            (
                MARGIN_LEFT + (x - bounds.x_min) / bounds.x_span() * plot_w,
                MARGIN_TOP + plot_h - (y - bounds.y_min) / bounds.y_span() * plot_h,
            )
        };

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
        )?;
        writeln!(f, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

        // grid + tick labels
        for k in 0..=GRID_DIVISIONS {
            let t = k as f64 / GRID_DIVISIONS as f64;
            let x = MARGIN_LEFT + t * plot_w;
            let y = MARGIN_TOP + plot_h - t * plot_h;
            writeln!(
                f,
                r##"<line x1="{x:.2}" y1="{MARGIN_TOP}" x2="{x:.2}" y2="{:.2}" stroke="#dddddd" stroke-width="1"/>"##,
                MARGIN_TOP + plot_h
            )?;
            writeln!(
                f,
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#dddddd" stroke-width="1"/>"##,
                MARGIN_LEFT + plot_w
            )?;
            writeln!(
                f,
                r#"<text x="{x:.2}" y="{:.2}" font-size="11" text-anchor="middle">{}</text>"#,
                MARGIN_TOP + plot_h + 16.0,
                tick(bounds.x_min + t * bounds.x_span())
            )?;
            writeln!(
                f,
                r#"<text x="{:.2}" y="{:.2}" font-size="11" text-anchor="end">{}</text>"#,
                MARGIN_LEFT - 6.0,
                y + 4.0,
                tick(bounds.y_min + t * bounds.y_span())
            )?;
        }

        writeln!(
            f,
            r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{plot_w}" height="{plot_h}" fill="none" stroke="black" stroke-width="1"/>"#
        )?;

        for (idx, series) in self.series.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            write!(f, r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points=""#)?;
            for (i, &p) in series.points.iter().enumerate() {
                let (px, py) = to_px(p);
                let sep = if i == 0 { "" } else { " " };
                write!(f, "{sep}{px:.2},{py:.2}")?;
            }
            writeln!(f, r#""><title>{}</title></polyline>"#, Escaped(&series.label))?;
            writeln!(
                f,
                r#"<text x="{:.2}" y="{:.2}" font-size="11" fill="{color}">{}</text>"#,
                MARGIN_LEFT + 8.0,
                MARGIN_TOP + 14.0 + 14.0 * idx as f64,
                Escaped(&series.label)
            )?;
        }

        writeln!(
            f,
            r#"<text x="{:.2}" y="24" font-size="16" text-anchor="middle">{}</text>"#,
            WIDTH / 2.0,
            Escaped(&self.title)
        )?;
        writeln!(
            f,
            r#"<text x="{:.2}" y="{:.2}" font-size="13" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            HEIGHT - 12.0,
            Escaped(&self.x_label)
        )?;
        writeln!(
            f,
            r#"<text x="18" y="{:.2}" font-size="13" text-anchor="middle" transform="rotate(-90 18 {:.2})">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0,
            Escaped(&self.y_label)
        )?;
        writeln!(f, "</svg>")
    }
}

/// Plot two raw signals against their sample index.
pub fn plot_raw_signals(signal_1: &[f64], signal_2: &[f64], title: &str) -> Figure {
    Figure::new(title, "time", "value")
        .with_series(LineSeries::from_values("signal 1", signal_1))
        .with_series(LineSeries::from_values("signal 2", signal_2))
}

/// Plot the warping path as signal-1 index against signal-2 index.
pub fn plot_alignment_path(path: &WarpingPath, title: &str) -> Figure {
    let points = path.pairs().map(|(a, b)| (a as f64, b as f64)).collect();
    Figure::new(title, "signal 1", "signal 2").with_series(LineSeries {
        label: "path".to_string(),
        points,
    })
}

/// Plot two sequences resampled along a warping path.
///
/// The path must index into `signal_1` and `signal_2` directly; shift it
/// first (see [`WarpingPath::shifted`]) when pairing a derivative-space path
/// with raw signals.
///
/// # Errors
///
/// Returns [`PlotError::Path`] if the path indexes past either sequence.
pub fn plot_aligned_signals(
    signal_1: &[f64],
    signal_2: &[f64],
    path: &WarpingPath,
    title: &str,
) -> Result<Figure, PlotError> {
    let warped = path.warp(signal_1, signal_2)?;
    Ok(Figure::new(title, "time", "value")
        .with_series(LineSeries::from_values("signal 1", &warped.first))
        .with_series(LineSeries::from_values("signal 2", &warped.second)))
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn of(series: &[LineSeries]) -> Self {
        let mut points = series.iter().flat_map(|s| s.points.iter().copied());
        let Some((x0, y0)) = points.next() else {
            return Self {
                x_min: 0.0,
                x_max: 1.0,
                y_min: 0.0,
                y_max: 1.0,
            };
        };
        points.fold(
            Self {
                x_min: x0,
                x_max: x0,
                y_min: y0,
                y_max: y0,
            },
            |b, (x, y)| Self {
                x_min: b.x_min.min(x),
                x_max: b.x_max.max(x),
                y_min: b.y_min.min(y),
                y_max: b.y_max.max(y),
            },
        )
    }

    // Degenerate ranges get a unit span so flat lines still render.
    fn x_span(&self) -> f64 {
        span(self.x_min, self.x_max)
    }

    fn y_span(&self) -> f64 {
        span(self.y_min, self.y_max)
    }
}

fn span(lo: f64, hi: f64) -> f64 {
    let s = hi - lo;
    if s > 0.0 && s.is_finite() { s } else { 1.0 }
}

fn tick(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// XML-escapes text as it is formatted.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                _ => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_signals_figure_has_two_lines() {
        let fig = plot_raw_signals(&[1.0, 2.0, 3.0], &[3.0, 2.0], RAW_SIGNALS_TITLE);
        assert_eq!(fig.title(), "raw_signals");
        assert_eq!(fig.series().len(), 2);
        assert_eq!(fig.series()[1].points, vec![(0.0, 3.0), (1.0, 2.0)]);

        let svg = fig.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(">raw_signals</text>"));
        assert!(svg.contains(">time</text>"));
    }

    #[test]
    fn alignment_path_points_follow_steps() {
        let path = WarpingPath::from_pairs([(0, 0), (1, 0), (2, 1)]);
        let fig = plot_alignment_path(&path, ALIGNMENT_PATH_TITLE);
        assert_eq!(fig.series()[0].points, vec![(0.0, 0.0), (1.0, 0.0), (2.0, 1.0)]);
        assert!(fig.to_svg().contains(">signal 2</text>"));
    }

    #[test]
    fn aligned_signals_resample_along_path() {
        let path = WarpingPath::from_pairs([(0, 0), (0, 1), (1, 2)]);
        let fig = plot_aligned_signals(&[5.0, 6.0], &[1.0, 2.0, 3.0], &path, ALIGNED_SIGNALS_TITLE)
            .unwrap();
        assert_eq!(fig.series()[0].points, vec![(0.0, 5.0), (1.0, 5.0), (2.0, 6.0)]);
        assert_eq!(fig.series()[1].points, vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
    }

    #[test]
    fn aligned_signals_reject_bad_path() {
        let path = WarpingPath::from_pairs([(0, 0), (4, 1)]);
        let result = plot_aligned_signals(&[1.0], &[1.0, 2.0], &path, "x");
        assert!(matches!(result, Err(PlotError::Path(_))));
    }

    #[test]
    fn empty_figure_still_renders() {
        let svg = Figure::new("empty", "x", "y").to_svg();
        assert_eq!(svg.matches("<polyline").count(), 0);
        assert!(svg.contains(">empty</text>"));
    }

    #[test]
    fn flat_series_renders_finite_coordinates() {
        let svg = plot_raw_signals(&[2.0, 2.0], &[2.0, 2.0], "flat").to_svg();
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn display_renders_the_same_document() {
        let fig = plot_raw_signals(&[0.0, 1.0], &[1.0, 0.0], "same");
        let svg = fig.to_svg();
        assert_eq!(format!("{fig}"), svg);
        // x spans 0..1 over the plot width, y spans 0..1 over its height
        assert!(svg.contains(r#"points="70.00,425.00 620.00,40.00""#));
    }

    #[test]
    fn text_is_escaped() {
        let svg = Figure::new("a < b & c", "x", "y").to_svg();
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn tick_labels_are_trimmed() {
        assert_eq!(tick(2.0), "2");
        assert_eq!(tick(0.5), "0.5");
        assert_eq!(tick(-0.001), "0");
    }
}
