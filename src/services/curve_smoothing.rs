//! Bezier smoothing for line charts, matching the "tension" knob of common
//! web charting libraries: each interior point gets two control points along
//! the direction from its predecessor to its successor, pulled in
//! proportion to the neighbouring segment lengths.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

impl PlotPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Data-space rectangle that control points are capped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlotBounds {
    fn cap(&self, point: PlotPoint) -> PlotPoint {
        PlotPoint {
            x: point.x.clamp(self.x_min, self.x_max),
            y: point.y.clamp(self.y_min, self.y_max),
        }
    }
}

/// Pixels per data unit on each axis; segment lengths are measured in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelScale {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ControlPoints {
    before: PlotPoint,
    after: PlotPoint,
}

/// Returns a polyline through every input point. With `tension <= 0` or fewer
/// than three points the input is returned unchanged.
pub fn smooth_polyline(
    points: &[PlotPoint],
    tension: f64,
    scale: PixelScale,
    bounds: PlotBounds,
    samples_per_segment: usize,
) -> Vec<PlotPoint> {
    if points.len() < 3 || tension <= 0.0 || samples_per_segment == 0 {
        return points.to_vec();
    }

    let controls: Vec<ControlPoints> = (0..points.len())
        .map(|index| {
            let current = points[index];
            let previous = if index == 0 { current } else { points[index - 1] };
            let next = points.get(index + 1).copied().unwrap_or(current);
            control_points(previous, current, next, tension, scale, bounds)
        })
        .collect();

    let mut polyline = Vec::with_capacity(1 + (points.len() - 1) * samples_per_segment);
    polyline.push(points[0]);
    for index in 0..points.len() - 1 {
        let start = points[index];
        let end = points[index + 1];
        let c1 = controls[index].after;
        let c2 = controls[index + 1].before;
        for step in 1..=samples_per_segment {
            let t = step as f64 / samples_per_segment as f64;
            polyline.push(cubic_bezier(start, c1, c2, end, t));
        }
    }
    polyline
}

fn control_points(
    previous: PlotPoint,
    current: PlotPoint,
    next: PlotPoint,
    tension: f64,
    scale: PixelScale,
    bounds: PlotBounds,
) -> ControlPoints {
    let d01 = pixel_distance(previous, current, scale);
    let d12 = pixel_distance(current, next, scale);
    let total = d01 + d12;
    let (s01, s12) = if total > 0.0 {
        (d01 / total, d12 / total)
    } else {
        (0.0, 0.0)
    };

    let fa = tension * s01;
    let fb = tension * s12;
    let dx = next.x - previous.x;
    let dy = next.y - previous.y;

    ControlPoints {
        before: bounds.cap(PlotPoint::new(current.x - fa * dx, current.y - fa * dy)),
        after: bounds.cap(PlotPoint::new(current.x + fb * dx, current.y + fb * dy)),
    }
}

fn pixel_distance(a: PlotPoint, b: PlotPoint, scale: PixelScale) -> f64 {
    let dx = (b.x - a.x) * scale.x;
    let dy = (b.y - a.y) * scale.y;
    (dx * dx + dy * dy).sqrt()
}

fn cubic_bezier(p0: PlotPoint, p1: PlotPoint, p2: PlotPoint, p3: PlotPoint, t: f64) -> PlotPoint {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    PlotPoint {
        x: b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        y: b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    }
}
