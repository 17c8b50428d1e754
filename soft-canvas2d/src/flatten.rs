//! Curve and arc flattening into a stream of line segments.
//!
//! Every stage of the geometry pipeline (rasterizer, stroker, dasher, demux,
//! transformer) consumes the same [`Flattener`] event stream, so stages can be
//! chained as decorators.

use crate::matrix::Matrix;
use crate::path::{Path, PathSegment};
use std::f64::consts::TAU;

/// Maximum subdivision depth for Bézier curves.
pub const MAX_SUBDIVISION_DEPTH: u32 = 32;

/// Default flatness threshold for curves.
pub const DEFAULT_FLATTENING_TOLERANCE: f64 = 0.5;

/// Default maximum chord error for arc tracing, in device pixels.
pub const DEFAULT_ARC_CHORD_ERROR: f64 = 0.125;

/// Smallest angular step used when tracing arcs.
const MIN_ARC_STEP: f64 = 1e-4;

/// Receiver of a flattened polyline stream.
pub trait Flattener {
    /// Start a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);
    /// Draw a straight segment from the current point to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);
    /// The current subpath was closed. The closing segment has already been
    /// delivered through `line_to`.
    fn close(&mut self);
    /// The current subpath is finished.
    fn end(&mut self);
}

impl<F: Flattener + ?Sized> Flattener for &mut F {
    fn move_to(&mut self, x: f64, y: f64) {
        (**self).move_to(x, y)
    }

    fn line_to(&mut self, x: f64, y: f64) {
        (**self).line_to(x, y)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn end(&mut self) {
        (**self).end()
    }
}

/// Flattening precision settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenOptions {
    /// Flatness threshold for Bézier curves.
    pub tolerance: f64,
    /// Maximum chord error for arcs, in device pixels.
    pub arc_chord_error: f64,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_FLATTENING_TOLERANCE,
            arc_chord_error: DEFAULT_ARC_CHORD_ERROR,
        }
    }
}

impl FlattenOptions {
    /// Curve threshold adjusted by the transform scale factor, so magnified
    /// curves are subdivided more finely.
    fn curve_tolerance(&self, scale: f64) -> f64 {
        if scale.is_finite() && scale > 0.0 {
            self.tolerance / scale
        } else {
            self.tolerance
        }
    }
}

/// Walk `path` and deliver it to `flattener` as line segments.
///
/// `scale` is the uniform scale factor of the transform the path was built
/// under.
pub fn flatten(path: &Path, flattener: &mut dyn Flattener, scale: f64, options: &FlattenOptions) {
    let tolerance = options.curve_tolerance(scale);
    let (mut start_x, mut start_y) = (0.0, 0.0);
    let (mut x, mut y) = (0.0, 0.0);
    let mut started = false;
    let mut closed = false;

    for segment in path.segments() {
        if let PathSegment::MoveTo(mx, my) = segment {
            if started {
                flattener.end();
            }
            flattener.move_to(mx, my);
            (start_x, start_y) = (mx, my);
            (x, y) = (mx, my);
            started = true;
            closed = false;
            continue;
        }

        // Drawing after a close continues from the start of the closed subpath.
        if closed || !started {
            if started {
                flattener.end();
            }
            flattener.move_to(start_x, start_y);
            started = true;
            closed = false;
        }

        match segment {
            PathSegment::MoveTo(..) => {}
            PathSegment::LineTo(lx, ly) => {
                flattener.line_to(lx, ly);
                (x, y) = (lx, ly);
            }
            PathSegment::QuadTo(cx, cy, qx, qy) => {
                trace_quad(flattener, [x, y, cx, cy, qx, qy], tolerance);
                (x, y) = (qx, qy);
            }
            PathSegment::CubicTo(c1x, c1y, c2x, c2y, cx, cy) => {
                trace_cubic(flattener, [x, y, c1x, c1y, c2x, c2y, cx, cy], tolerance);
                (x, y) = (cx, cy);
            }
            PathSegment::ArcAngle {
                cx,
                cy,
                rx,
                ry,
                start_angle,
                sweep,
            } => {
                (x, y) = trace_arc(
                    flattener,
                    cx,
                    cy,
                    rx,
                    ry,
                    start_angle,
                    sweep,
                    scale,
                    options.arc_chord_error,
                );
            }
            PathSegment::Close => {
                flattener.line_to(start_x, start_y);
                flattener.close();
                (x, y) = (start_x, start_y);
                closed = true;
            }
        }
    }

    if started {
        flattener.end();
    }
}

/// Subdivide a cubic Bézier (`[x1, y1, x2, y2, x3, y3, x4, y4]`) until each
/// piece is flat, emitting a `line_to` per piece. The start point is assumed
/// to be the flattener's current point.
pub fn trace_cubic(flattener: &mut dyn Flattener, cubic: [f64; 8], tolerance: f64) {
    let mut stack: Vec<([f64; 8], u32)> = vec![(cubic, 0)];
    while let Some((c, depth)) = stack.pop() {
        if depth >= MAX_SUBDIVISION_DEPTH || cubic_is_flat(&c, tolerance) {
            flattener.line_to(c[6], c[7]);
            continue;
        }
        let (left, right) = subdivide_cubic(&c);
        stack.push((right, depth + 1));
        stack.push((left, depth + 1));
    }
}

/// Subdivide a quadratic Bézier (`[x1, y1, x2, y2, x3, y3]`) until each piece
/// is flat.
pub fn trace_quad(flattener: &mut dyn Flattener, quad: [f64; 6], tolerance: f64) {
    let mut stack: Vec<([f64; 6], u32)> = vec![(quad, 0)];
    while let Some((q, depth)) = stack.pop() {
        if depth >= MAX_SUBDIVISION_DEPTH || quad_is_flat(&q, tolerance) {
            flattener.line_to(q[4], q[5]);
            continue;
        }
        let (left, right) = subdivide_quad(&q);
        stack.push((right, depth + 1));
        stack.push((left, depth + 1));
    }
}

/// Trace an axis-aligned elliptical arc and return its end point.
///
/// The start point is assumed to be the flattener's current point. Steps are
/// `2·acos(r / (r + ε/scale))` radians; the final point is snapped to the exact
/// arc end.
#[allow(clippy::too_many_arguments)]
pub fn trace_arc(
    flattener: &mut dyn Flattener,
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start_angle: f64,
    sweep: f64,
    scale: f64,
    chord_error: f64,
) -> (f64, f64) {
    let sweep = sweep.clamp(-TAU, TAU);
    let end = start_angle + sweep;
    let end_point = (cx + end.cos() * rx, cy + end.sin() * ry);

    let ra = (rx.abs() + ry.abs()) / 2.0;
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let mut da = (ra / (ra + chord_error / scale)).acos() * 2.0;
    if ra <= 0.0 || sweep == 0.0 || !sweep.is_finite() || !da.is_finite() {
        flattener.line_to(end_point.0, end_point.1);
        return end_point;
    }
    da = da.max(MIN_ARC_STEP);
    let clockwise = sweep > 0.0;
    if !clockwise {
        da = -da;
    }

    let mut angle = start_angle + da;
    while (angle < end - da / 4.0) == clockwise {
        flattener.line_to(cx + angle.cos() * rx, cy + angle.sin() * ry);
        angle += da;
    }
    flattener.line_to(end_point.0, end_point.1);
    end_point
}

fn cubic_is_flat(c: &[f64; 8], tolerance: f64) -> bool {
    let dx = c[6] - c[0];
    let dy = c[7] - c[1];
    let chord_sq = dx * dx + dy * dy;
    if chord_sq < 1e-18 {
        // Closed loop: measure the control points against the start point.
        let d2 = (c[2] - c[0]).hypot(c[3] - c[1]);
        let d3 = (c[4] - c[0]).hypot(c[5] - c[1]);
        return d2.max(d3).powi(2) <= tolerance;
    }
    let d2 = ((c[2] - c[6]) * dy - (c[3] - c[7]) * dx).abs();
    let d3 = ((c[4] - c[6]) * dy - (c[5] - c[7]) * dx).abs();
    (d2 + d3) * (d2 + d3) <= tolerance * chord_sq
}

fn quad_is_flat(q: &[f64; 6], tolerance: f64) -> bool {
    let dx = q[4] - q[0];
    let dy = q[5] - q[1];
    let chord_sq = dx * dx + dy * dy;
    if chord_sq < 1e-18 {
        return (q[2] - q[0]).hypot(q[3] - q[1]).powi(2) <= tolerance;
    }
    let d = ((q[2] - q[4]) * dy - (q[3] - q[5]) * dx).abs();
    d * d <= tolerance * chord_sq
}

fn subdivide_cubic(c: &[f64; 8]) -> ([f64; 8], [f64; 8]) {
    let mid = |a: f64, b: f64| (a + b) / 2.0;
    let (x12, y12) = (mid(c[0], c[2]), mid(c[1], c[3]));
    let (x23, y23) = (mid(c[2], c[4]), mid(c[3], c[5]));
    let (x34, y34) = (mid(c[4], c[6]), mid(c[5], c[7]));
    let (x123, y123) = (mid(x12, x23), mid(y12, y23));
    let (x234, y234) = (mid(x23, x34), mid(y23, y34));
    let (xm, ym) = (mid(x123, x234), mid(y123, y234));
    (
        [c[0], c[1], x12, y12, x123, y123, xm, ym],
        [xm, ym, x234, y234, x34, y34, c[6], c[7]],
    )
}

fn subdivide_quad(q: &[f64; 6]) -> ([f64; 6], [f64; 6]) {
    let mid = |a: f64, b: f64| (a + b) / 2.0;
    let (x12, y12) = (mid(q[0], q[2]), mid(q[1], q[3]));
    let (x23, y23) = (mid(q[2], q[4]), mid(q[3], q[5]));
    let (xm, ym) = (mid(x12, x23), mid(y12, y23));
    ([q[0], q[1], x12, y12, xm, ym], [xm, ym, x23, y23, q[4], q[5]])
}

/// Forwards every event to several flatteners.
pub struct DemuxFlattener<'a> {
    pub flatteners: Vec<&'a mut dyn Flattener>,
}

impl<'a> DemuxFlattener<'a> {
    pub fn new(flatteners: Vec<&'a mut dyn Flattener>) -> Self {
        Self { flatteners }
    }
}

impl Flattener for DemuxFlattener<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        for f in self.flatteners.iter_mut() {
            f.move_to(x, y);
        }
    }

    fn line_to(&mut self, x: f64, y: f64) {
        for f in self.flatteners.iter_mut() {
            f.line_to(x, y);
        }
    }

    fn close(&mut self) {
        for f in self.flatteners.iter_mut() {
            f.close();
        }
    }

    fn end(&mut self) {
        for f in self.flatteners.iter_mut() {
            f.end();
        }
    }
}

/// Maps every point through a matrix before forwarding it.
pub struct Transformer<'a> {
    pub matrix: Matrix,
    pub next: &'a mut dyn Flattener,
}

impl<'a> Transformer<'a> {
    pub fn new(matrix: Matrix, next: &'a mut dyn Flattener) -> Self {
        Self { matrix, next }
    }
}

impl Flattener for Transformer<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.matrix.transform_point(x, y);
        self.next.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let (x, y) = self.matrix.transform_point(x, y);
        self.next.line_to(x, y);
    }

    fn close(&mut self) {
        self.next.close();
    }

    fn end(&mut self) {
        self.next.end();
    }
}

/// A flattened subpath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
}

impl Polyline {
    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
            .sum()
    }
}

/// Collects the stream into polylines, one per subpath.
#[derive(Debug, Default)]
pub struct PolylineCollector {
    pub polylines: Vec<Polyline>,
    current: Option<Polyline>,
}

impl PolylineCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_polylines(mut self) -> Vec<Polyline> {
        self.end();
        self.polylines
    }
}

impl Flattener for PolylineCollector {
    fn move_to(&mut self, x: f64, y: f64) {
        self.end();
        self.current = Some(Polyline {
            points: vec![(x, y)],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.current
            .get_or_insert_with(Polyline::default)
            .points
            .push((x, y));
    }

    fn close(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.closed = true;
        }
    }

    fn end(&mut self) {
        if let Some(polyline) = self.current.take() {
            self.polylines.push(polyline);
        }
    }
}

impl Path {
    /// Flatten this path into polylines with the default precision.
    pub fn to_polylines(&self) -> Vec<Polyline> {
        let mut collector = PolylineCollector::new();
        flatten(self, &mut collector, 1.0, &FlattenOptions::default());
        collector.into_polylines()
    }
}
