use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use nalgebra::Point2;

use crate::fitting::FitStatus;
use crate::misc::FloatingPoint;

const WIDTH: f64 = 1500.;
const MARGIN: f64 = 60.;
const TITLE_HEIGHT: f64 = 40.;
const MARKER_RADIUS: f64 = 4.;

#[derive(Clone, Debug, PartialEq)]
enum Layer {
    Scatter {
        points: Vec<(f64, f64)>,
        color: String,
        opacity: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: String,
        opacity: f64,
    },
}

impl Layer {
    fn points(&self) -> &[(f64, f64)] {
        match self {
            Layer::Scatter { points, .. } | Layer::Polyline { points, .. } => points,
        }
    }
}

/// Minimal SVG scatter & line plot with an equal aspect ratio
///
/// # Example
/// ```
/// use foilsample::prelude::*;
/// use nalgebra::Point2;
///
/// let mut plot = SvgPlot::new("outline");
/// plot.scatter(&[Point2::new(0., 0.), Point2::new(1., 0.)], "red", 0.5);
/// let svg = plot.to_string();
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains("<title>outline</title>"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SvgPlot {
    title: String,
    x_range: Option<(f64, f64)>,
    layers: Vec<Layer>,
}

impl SvgPlot {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_range: None,
            layers: vec![],
        }
    }

    /// Diagnostic plot of a resampled outline: the input points in red,
    /// the resampled points joined by a blue line
    pub fn resampling<T: FloatingPoint>(
        name: &str,
        original: &[Point2<T>],
        resampled: &[Point2<T>],
        residual: T,
        status: FitStatus,
    ) -> Self {
        let title = format!(
            "{}  residuals: {:.6}  {}",
            name,
            residual.to_f64().unwrap_or(f64::NAN),
            status.code()
        );
        let mut plot = Self::new(title).with_x_range(-0.1, 1.1);
        plot.scatter(original, "red", 0.5);
        plot.polyline(resampled, "blue", 0.5);
        plot
    }

    /// Fix the horizontal extent of the plot instead of fitting it to the data
    pub fn with_x_range(mut self, min: f64, max: f64) -> Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Add points drawn as circles
    pub fn scatter<T: FloatingPoint>(&mut self, points: &[Point2<T>], color: &str, opacity: f64) {
        self.layers.push(Layer::Scatter {
            points: to_f64(points),
            color: color.to_string(),
            opacity,
        });
    }

    /// Add points drawn as circles joined by a line
    pub fn polyline<T: FloatingPoint>(&mut self, points: &[Point2<T>], color: &str, opacity: f64) {
        self.layers.push(Layer::Polyline {
            points: to_f64(points),
            color: color.to_string(),
            opacity,
        });
    }

    /// Write the plot as an svg file
    pub fn write(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string())
            .with_context(|| format!("Failed to write plot {}", path.display()))
    }

    /// Data bounds (x_min, x_max, y_min, y_max) padded by 5% of the larger extent
    fn bounds(&self) -> (f64, f64, f64, f64) {
        let finite = self
            .layers
            .iter()
            .flat_map(|l| l.points().iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        let (x0, x1, y0, y1) = finite.fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), (x, y)| (x0.min(*x), x1.max(*x), y0.min(*y), y1.max(*y)),
        );
        let (x0, x1, y0, y1) = if x0 <= x1 {
            (x0, x1, y0, y1)
        } else {
            (0., 1., 0., 1.)
        };
        let (x0, x1) = self.x_range.unwrap_or((x0, x1));
        let pad = 0.05 * (x1 - x0).max(y1 - y0).max(1e-9);
        match self.x_range {
            Some(_) => (x0, x1, y0 - pad, y1 + pad),
            None => (x0 - pad, x1 + pad, y0 - pad, y1 + pad),
        }
    }
}

fn to_f64<T: FloatingPoint>(points: &[Point2<T>]) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| {
            (
                p.x.to_f64().unwrap_or(f64::NAN),
                p.y.to_f64().unwrap_or(f64::NAN),
            )
        })
        .collect()
}

fn escape(text: &str) -> String {
    text.chars().fold(String::with_capacity(text.len()), |mut s, c| {
        match c {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            _ => s.push(c),
        }
        s
    })
}

impl fmt::Display for SvgPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x0, x1, y0, y1) = self.bounds();
        // one scale on both axes keeps the aspect ratio
        let scale = (WIDTH - 2. * MARGIN) / (x1 - x0);
        let height = (y1 - y0) * scale + 2. * MARGIN + TITLE_HEIGHT;
        let map = |(x, y): (f64, f64)| {
            (
                MARGIN + (x - x0) * scale,
                MARGIN + TITLE_HEIGHT + (y1 - y) * scale,
            )
        };
        let title = escape(&self.title);

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
            w = WIDTH,
            h = height
        )?;
        writeln!(f, "<title>{}</title>", title)?;
        writeln!(f, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            f,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="20" text-anchor="middle">{}</text>"#,
            WIDTH / 2.,
            MARGIN / 2. + TITLE_HEIGHT / 2.,
            title
        )?;
        writeln!(
            f,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
            MARGIN,
            MARGIN + TITLE_HEIGHT,
            WIDTH - 2. * MARGIN,
            height - 2. * MARGIN - TITLE_HEIGHT
        )?;

        for layer in self.layers.iter() {
            let (points, color, opacity) = match layer {
                Layer::Scatter {
                    points,
                    color,
                    opacity,
                } => (points, color, opacity),
                Layer::Polyline {
                    points,
                    color,
                    opacity,
                } => {
                    let path = points
                        .iter()
                        .filter(|(x, y)| x.is_finite() && y.is_finite())
                        .map(|p| map(*p))
                        .fold(String::new(), |mut s, (x, y)| {
                            let _ = write!(s, "{:.2},{:.2} ", x, y);
                            s
                        });
                    writeln!(
                        f,
                        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2" opacity="{}"/>"#,
                        path.trim_end(),
                        escape(color),
                        opacity
                    )?;
                    (points, color, opacity)
                }
            };
            writeln!(f, r#"<g fill="{}" opacity="{}">"#, escape(color), opacity)?;
            for (x, y) in points
                .iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|p| map(*p))
            {
                writeln!(
                    f,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{}"/>"#,
                    x, y, MARKER_RADIUS
                )?;
            }
            writeln!(f, "</g>")?;
        }

        writeln!(f, "</svg>")
    }
}
