use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::simulation::SeriesPoint;
use crate::services::curve_smoothing::{PixelScale, PlotBounds, PlotPoint, smooth_polyline};

pub const SERIES_LABEL: &str = "Current Limited (%)";
pub const X_AXIS_TITLE: &str = "Pulls";
pub const Y_AXIS_TITLE: &str = "Probability (%)";
pub const CURVE_TENSION: f64 = 0.25;
pub const STROKE_WIDTH: u32 = 2;
const Y_MAX: f64 = 100.0;
const MAX_X_LABELS: usize = 20;
const SAMPLES_PER_SEGMENT: usize = 8;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to render chart to {path}: {reason}")]
    Render { path: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFormat {
    Png,
    Svg,
}

/// The file a chart is drawn onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSurface {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl ChartSurface {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chart".to_string());
        let extension = match self.format() {
            SurfaceFormat::Png => "png",
            SurfaceFormat::Svg => "svg",
        };
        self.path.with_file_name(format!(".{name}.partial.{extension}"))
    }

    pub fn format(&self) -> SurfaceFormat {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => SurfaceFormat::Svg,
            _ => SurfaceFormat::Png,
        }
    }
}

// Counts chart instances that have been created and not yet dropped.
struct LiveToken(Arc<AtomicUsize>);

impl LiveToken {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ChartData {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl ChartData {
    fn from_series(series: &[SeriesPoint]) -> Self {
        Self {
            labels: series.iter().map(|point| format!("{}", point.x)).collect(),
            values: series.iter().map(|point| point.y * 100.0).collect(),
        }
    }
}

/// A chart drawn next to the surface, not yet shown on it.
pub struct StagedChart {
    data: ChartData,
    staging_path: PathBuf,
}

impl Drop for StagedChart {
    fn drop(&mut self) {
        // Already renamed away once committed.
        match fs::remove_file(&self.staging_path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                warn!(path = %self.staging_path.display(), error = %e, "failed to remove staged chart");
            }
            _ => {}
        }
    }
}

/// One drawn "Current Limited (%)" line chart.
pub struct LineChart {
    data: ChartData,
    _live: LiveToken,
}

impl LineChart {
    /// X axis category labels, one per point.
    #[cfg(test)]
    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    /// Plotted values in percent.
    #[cfg(test)]
    pub fn values(&self) -> &[f64] {
        &self.data.values
    }

    pub fn point_count(&self) -> usize {
        self.data.values.len()
    }

    fn destroy(self) {
        debug!(points = self.point_count(), "destroying previous chart");
    }
}

/// Owns the single live chart and replaces it on every render.
pub struct ChartRenderer {
    surface: ChartSurface,
    current: Option<LineChart>,
    live: Arc<AtomicUsize>,
}

impl ChartRenderer {
    pub fn new(surface: ChartSurface) -> Self {
        Self {
            surface,
            current: None,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn surface(&self) -> &ChartSurface {
        &self.surface
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&LineChart> {
        self.current.as_ref()
    }

    pub fn live_instances(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Draws `series` to a staging file beside the surface. The live chart
    /// and the surface file are untouched, so a failure here changes nothing.
    pub fn prepare(&self, series: &[SeriesPoint]) -> Result<StagedChart, ChartError> {
        let staged = StagedChart {
            data: ChartData::from_series(series),
            staging_path: self.surface.staging_path(),
        };
        let size = (self.surface.width, self.surface.height);
        let path = staged.staging_path.as_path();
        let result = match self.surface.format() {
            SurfaceFormat::Png => {
                draw_line_chart(BitMapBackend::new(path, size).into_drawing_area(), &staged.data)
            }
            SurfaceFormat::Svg => {
                draw_line_chart(SVGBackend::new(path, size).into_drawing_area(), &staged.data)
            }
        };
        result.map_err(|reason| ChartError::Render {
            path: self.surface.path().display().to_string(),
            reason,
        })?;
        Ok(staged)
    }

    /// Moves a staged chart onto the surface, releases the previous chart and
    /// only then makes the new one live.
    pub fn commit(&mut self, mut staged: StagedChart) -> Result<&LineChart, ChartError> {
        fs::rename(&staged.staging_path, self.surface.path()).map_err(|e| ChartError::Render {
            path: self.surface.path().display().to_string(),
            reason: e.to_string(),
        })?;
        self.destroy();

        let chart = LineChart {
            data: std::mem::take(&mut staged.data),
            _live: LiveToken::acquire(&self.live),
        };
        debug!(
            points = chart.point_count(),
            path = %self.surface.path().display(),
            "chart rendered"
        );
        Ok(self.current.insert(chart))
    }

    /// Replaces the live chart with one drawn from `series`. On error the
    /// previous chart stays live and its file stays on the surface.
    pub fn render(&mut self, series: &[SeriesPoint]) -> Result<&LineChart, ChartError> {
        let staged = self.prepare(series)?;
        self.commit(staged)
    }

    pub fn destroy(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.destroy();
        }
    }
}

fn draw_line_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart: &ChartData,
) -> Result<(), String> {
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let x_max = chart.values.len().saturating_sub(1).max(1) as f64;
    let ticks = category_ticks(chart.values.len());
    let tick_count = ticks.len();
    let mut context = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(55)
        .y_label_area_size(75)
        .build_cartesian_2d((0f64..x_max).with_key_points(ticks), 0f64..Y_MAX)
        .map_err(|e| e.to_string())?;

    let labels = &chart.labels;
    context
        .configure_mesh()
        .x_desc(X_AXIS_TITLE)
        .y_desc(Y_AXIS_TITLE)
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 20))
        .x_labels(tick_count)
        .y_labels(11)
        .x_label_formatter(&|value| category_label(labels, *value))
        .y_label_formatter(&|value| format!("{value}%"))
        .draw()
        .map_err(|e| e.to_string())?;

    let (plot_width, plot_height) = context.plotting_area().dim_in_pixel();
    let scale = PixelScale {
        x: plot_width as f64 / x_max,
        y: plot_height as f64 / Y_MAX,
    };
    let bounds = PlotBounds {
        x_min: 0.0,
        x_max,
        y_min: 0.0,
        y_max: Y_MAX,
    };
    let points: Vec<PlotPoint> = chart
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| PlotPoint::new(index as f64, *value))
        .collect();
    let curve = smooth_polyline(&points, CURVE_TENSION, scale, bounds, SAMPLES_PER_SEGMENT);

    let line_color = RGBColor(30, 122, 204);
    let line_style = ShapeStyle::from(&line_color).stroke_width(STROKE_WIDTH);
    context
        .draw_series(LineSeries::new(
            curve.into_iter().map(|point| (point.x, point.y)),
            line_style,
        ))
        .map_err(|e| e.to_string())?
        .label(SERIES_LABEL)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

    context
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())?;
    Ok(())
}

/// Whole-number positions to tick, every point while they fit, evenly thinned after.
fn category_ticks(point_count: usize) -> Vec<f64> {
    let step = point_count.div_ceil(MAX_X_LABELS).max(1);
    let ticks: Vec<f64> = (0..point_count).step_by(step).map(|index| index as f64).collect();
    if ticks.is_empty() { vec![0.0] } else { ticks }
}

// Only whole-number ticks map onto a category.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-9 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
