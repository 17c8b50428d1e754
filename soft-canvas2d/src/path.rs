//! Path model: a command list over a flat coordinate buffer.
//!
//! Coordinates stored in a [`Path`] are interpreted as-is by the flattener.
//! The rendering context stores its current path in device space, applying
//! the current transform as commands are appended.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::matrix::Matrix;
use std::f64::consts::PI;

const TAU: f64 = 2.0 * PI;

/// Points closer than this are considered coincident when connecting arcs.
const POINT_EPSILON: f64 = 1e-9;

/// Tolerance used when converting elliptical arcs to cubic Béziers.
const ARC_CUBIC_TOLERANCE: f64 = 0.05;

/// Path drawing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCmd {
    /// Start a new subpath: `x, y`.
    MoveTo,
    /// Straight segment: `x, y`.
    LineTo,
    /// Quadratic Bézier: `cx, cy, x, y`.
    QuadTo,
    /// Cubic Bézier: `c1x, c1y, c2x, c2y, x, y`.
    CubicTo,
    /// Axis-aligned elliptical arc: `cx, cy, rx, ry, start_angle, sweep`.
    ArcAngle,
    /// Close the current subpath.
    Close,
}

impl PathCmd {
    /// Number of coordinates consumed from the point buffer.
    pub const fn coord_count(self) -> usize {
        match self {
            PathCmd::MoveTo | PathCmd::LineTo => 2,
            PathCmd::QuadTo => 4,
            PathCmd::CubicTo | PathCmd::ArcAngle => 6,
            PathCmd::Close => 0,
        }
    }
}

/// One decoded path command with its coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadTo(f64, f64, f64, f64),
    CubicTo(f64, f64, f64, f64, f64, f64),
    ArcAngle {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        start_angle: f64,
        sweep: f64,
    },
    Close,
}

/// An ordered list of drawing commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    components: Vec<PathCmd>,
    points: Vec<f64>,
    /// Current pen position.
    x: f64,
    y: f64,
    /// Start of the current subpath.
    start_x: f64,
    start_y: f64,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn components(&self) -> &[PathCmd] {
        &self.components
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// A path is closed when its last command is `Close`.
    pub fn is_closed(&self) -> bool {
        self.components.last() == Some(&PathCmd::Close)
    }

    /// Current pen position.
    pub fn last_point(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Remove all commands.
    pub fn clear(&mut self) {
        self.components.clear();
        self.points.clear();
        self.x = 0.0;
        self.y = 0.0;
        self.start_x = 0.0;
        self.start_y = 0.0;
    }

    fn push(&mut self, cmd: PathCmd, coords: &[f64]) {
        debug_assert_eq!(cmd.coord_count(), coords.len());
        self.components.push(cmd);
        self.points.extend_from_slice(coords);
    }

    /// Inserts a `MoveTo` when a drawing command arrives on an empty path.
    fn ensure_subpath(&mut self, x: f64, y: f64) {
        if self.is_empty() {
            self.move_to(x, y);
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.push(PathCmd::MoveTo, &[x, y]);
        self.x = x;
        self.y = y;
        self.start_x = x;
        self.start_y = y;
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.ensure_subpath(x, y);
        self.push(PathCmd::LineTo, &[x, y]);
        self.x = x;
        self.y = y;
    }

    /// On an empty path this only starts a subpath at `(x, y)`.
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        if self.is_empty() {
            self.move_to(x, y);
            return;
        }
        self.push(PathCmd::QuadTo, &[cx, cy, x, y]);
        self.x = x;
        self.y = y;
    }

    /// On an empty path this only starts a subpath at `(x, y)`.
    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        if self.is_empty() {
            self.move_to(x, y);
            return;
        }
        self.push(PathCmd::CubicTo, &[c1x, c1y, c2x, c2y, x, y]);
        self.x = x;
        self.y = y;
    }

    /// Append an axis-aligned elliptical arc starting at `start_angle` and
    /// sweeping `sweep` radians (positive is clockwise on screen). Sweeps
    /// beyond a full turn are clamped to one turn.
    ///
    /// The arc is connected to the current point with a straight line, or
    /// starts a new subpath when the path is empty.
    pub fn arc_angle(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        start_angle: f64,
        sweep: f64,
    ) {
        let sweep = sweep.clamp(-TAU, TAU);
        let start_x = cx + start_angle.cos() * rx;
        let start_y = cy + start_angle.sin() * ry;
        self.connect_to(start_x, start_y);

        self.push(PathCmd::ArcAngle, &[cx, cy, rx, ry, start_angle, sweep]);
        let end_angle = start_angle + sweep;
        self.x = cx + end_angle.cos() * rx;
        self.y = cy + end_angle.sin() * ry;
    }

    /// Circular arc from `start_angle` to `end_angle`.
    ///
    /// A requested sweep of at least a full turn produces exactly one full
    /// circle; otherwise both angles are normalized and the end angle is moved
    /// by whole turns onto the requested side of the start angle.
    pub fn arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) {
        let (start, sweep) = normalize_arc(start_angle, end_angle, anticlockwise);
        self.arc_angle(cx, cy, radius, radius, start, sweep);
    }

    pub fn close(&mut self) {
        if self.is_empty() {
            return;
        }
        self.push(PathCmd::Close, &[]);
        self.x = self.start_x;
        self.y = self.start_y;
    }

    fn connect_to(&mut self, x: f64, y: f64) {
        if self.is_empty() {
            self.move_to(x, y);
            return;
        }
        if self.is_closed() {
            self.move_to(self.start_x, self.start_y);
        }
        if (self.x - x).abs() > POINT_EPSILON || (self.y - y).abs() > POINT_EPSILON {
            self.line_to(x, y);
        }
    }

    /// Closed rectangle subpath.
    pub fn add_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close();
    }

    /// Closed rectangle with quadratic corners of radii `arc_width / 2` and
    /// `arc_height / 2`.
    pub fn add_rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        arc_width: f64,
        arc_height: f64,
    ) {
        let rx = (arc_width / 2.0).max(0.0).min(width.abs() / 2.0);
        let ry = (arc_height / 2.0).max(0.0).min(height.abs() / 2.0);
        let (x1, y1) = (x + width, y + height);
        self.move_to(x, y + ry);
        self.quad_to(x, y, x + rx, y);
        self.line_to(x1 - rx, y);
        self.quad_to(x1, y, x1, y + ry);
        self.line_to(x1, y1 - ry);
        self.quad_to(x1, y1, x1 - rx, y1);
        self.line_to(x + rx, y1);
        self.quad_to(x, y1, x, y1 - ry);
        self.close();
    }

    /// Closed full ellipse subpath.
    pub fn add_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.move_to(cx + rx, cy);
        self.arc_angle(cx, cy, rx, ry, 0.0, -TAU);
        self.close();
    }

    pub fn add_circle(&mut self, cx: f64, cy: f64, radius: f64) {
        self.add_ellipse(cx, cy, radius, radius);
    }

    /// Open polyline through `points` given as `[x0, y0, x1, y1, ...]`.
    pub fn add_polyline(&mut self, points: &[f64]) {
        let mut pairs = points.chunks_exact(2);
        if let Some(first) = pairs.next() {
            self.move_to(first[0], first[1]);
            for p in pairs {
                self.line_to(p[0], p[1]);
            }
        }
    }

    /// Closed polygon through `points` given as `[x0, y0, x1, y1, ...]`.
    pub fn add_polygon(&mut self, points: &[f64]) {
        if points.len() >= 2 {
            self.add_polyline(points);
            self.close();
        }
    }

    /// Elliptical arc mapped through `transform` and appended to this path.
    ///
    /// Arcs whose image stays axis-aligned are kept as a single `ArcAngle`
    /// command; otherwise they are converted to cubic Béziers first.
    #[allow(clippy::too_many_arguments)]
    pub fn append_arc(
        &mut self,
        transform: &Matrix,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start_angle: f64,
        sweep: f64,
    ) {
        let (dcx, dcy) = transform.transform_point(cx, cy);
        if rotation == 0.0 && transform.is_axis_aligned() {
            self.arc_angle(dcx, dcy, rx * transform.a, ry * transform.d, start_angle, sweep);
            return;
        }
        if rx == ry && transform.is_similarity() {
            let scale = transform.a.hypot(transform.b);
            let start = start_angle + rotation + transform.rotation_angle();
            self.arc_angle(dcx, dcy, rx * scale, rx * scale, start, sweep);
            return;
        }

        let arc = kurbo::Arc {
            center: kurbo::Point::new(cx, cy),
            radii: kurbo::Vec2::new(rx, ry),
            start_angle,
            sweep_angle: sweep,
            x_rotation: rotation,
        };
        let (sin_r, cos_r) = rotation.sin_cos();
        let (lx, ly) = (rx * start_angle.cos(), ry * start_angle.sin());
        let (start_x, start_y) =
            transform.transform_point(cx + lx * cos_r - ly * sin_r, cy + lx * sin_r + ly * cos_r);
        let affine: kurbo::Affine = (*transform).into();
        self.connect_to(start_x, start_y);
        for el in arc.append_iter(ARC_CUBIC_TOLERANCE) {
            if let kurbo::PathEl::CurveTo(p1, p2, p3) = el {
                let (p1, p2, p3) = (affine * p1, affine * p2, affine * p3);
                self.cubic_to(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
            }
        }
    }

    /// Decoded commands in order.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            components: self.components.iter(),
            points: &self.points,
        }
    }

    /// Append every command of `other`, mapped through `transform`.
    pub fn append_transformed(&mut self, other: &Path, transform: &Matrix) {
        for seg in other.segments() {
            match seg {
                PathSegment::MoveTo(x, y) => {
                    let (x, y) = transform.transform_point(x, y);
                    self.move_to(x, y);
                }
                PathSegment::LineTo(x, y) => {
                    let (x, y) = transform.transform_point(x, y);
                    self.line_to(x, y);
                }
                PathSegment::QuadTo(cx, cy, x, y) => {
                    let (cx, cy) = transform.transform_point(cx, cy);
                    let (x, y) = transform.transform_point(x, y);
                    self.quad_to(cx, cy, x, y);
                }
                PathSegment::CubicTo(c1x, c1y, c2x, c2y, x, y) => {
                    let (c1x, c1y) = transform.transform_point(c1x, c1y);
                    let (c2x, c2y) = transform.transform_point(c2x, c2y);
                    let (x, y) = transform.transform_point(x, y);
                    self.cubic_to(c1x, c1y, c2x, c2y, x, y);
                }
                PathSegment::ArcAngle {
                    cx,
                    cy,
                    rx,
                    ry,
                    start_angle,
                    sweep,
                } => self.append_arc(transform, cx, cy, rx, ry, 0.0, start_angle, sweep),
                PathSegment::Close => self.close(),
            }
        }
    }

    /// Copy of this path mapped through `transform`.
    pub fn transformed(&self, transform: &Matrix) -> Path {
        let mut out = Path::new();
        out.append_transformed(self, transform);
        out
    }

    /// Build a path from SVG path data (the `d` attribute).
    ///
    /// Relative, smooth and arc commands are normalized to absolute lines and
    /// Béziers by the parser.
    pub fn from_svg_path_data(path_data: &str) -> Canvas2dResult<Self> {
        let mut path = Path::new();
        for segment in svgtypes::SimplifyingPathParser::from(path_data) {
            let segment = segment.map_err(|e| {
                Canvas2dError::PathError(format!("Invalid SVG path data: {:?}", e))
            })?;
            match segment {
                svgtypes::SimplePathSegment::MoveTo { x, y } => path.move_to(x, y),
                svgtypes::SimplePathSegment::LineTo { x, y } => path.line_to(x, y),
                svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    path.quad_to(x1, y1, x, y)
                }
                svgtypes::SimplePathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => path.cubic_to(x1, y1, x2, y2, x, y),
                svgtypes::SimplePathSegment::ClosePath => path.close(),
            }
        }
        Ok(path)
    }
}

/// Normalize a circular arc request into `(start_angle, sweep)`.
pub fn normalize_arc(start_angle: f64, end_angle: f64, anticlockwise: bool) -> (f64, f64) {
    if !anticlockwise && end_angle - start_angle >= TAU {
        return (start_angle, TAU);
    }
    if anticlockwise && start_angle - end_angle >= TAU {
        return (start_angle, -TAU);
    }

    let start = start_angle.rem_euclid(TAU);
    let mut end = end_angle.rem_euclid(TAU);
    if anticlockwise {
        while end >= start {
            end -= TAU;
        }
    } else {
        while end <= start {
            end += TAU;
        }
    }
    (start, end - start)
}

/// Iterator over decoded path commands.
pub struct Segments<'a> {
    components: std::slice::Iter<'a, PathCmd>,
    points: &'a [f64],
}

impl Iterator for Segments<'_> {
    type Item = PathSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let cmd = *self.components.next()?;
        let (p, rest) = self.points.split_at(cmd.coord_count());
        self.points = rest;
        Some(match cmd {
            PathCmd::MoveTo => PathSegment::MoveTo(p[0], p[1]),
            PathCmd::LineTo => PathSegment::LineTo(p[0], p[1]),
            PathCmd::QuadTo => PathSegment::QuadTo(p[0], p[1], p[2], p[3]),
            PathCmd::CubicTo => PathSegment::CubicTo(p[0], p[1], p[2], p[3], p[4], p[5]),
            PathCmd::ArcAngle => PathSegment::ArcAngle {
                cx: p[0],
                cy: p[1],
                rx: p[2],
                ry: p[3],
                start_angle: p[4],
                sweep: p[5],
            },
            PathCmd::Close => PathSegment::Close,
        })
    }
}
