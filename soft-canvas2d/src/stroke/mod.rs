//! Stroke outline generation.
//!
//! [`LineStroker`] receives a flattened polyline stream and forwards the
//! outline polygon of the stroke to the next stage, normally the rasterizer
//! with nonzero winding. [`DashConverter`] sits in front of it when a dash
//! pattern is active.

mod cap;
mod dash;
mod join;

pub use dash::DashConverter;

use crate::flatten::{Flattener, DEFAULT_ARC_CHORD_ERROR};
use crate::style::{LineCap, LineJoin};
use kurbo::{Point, Vec2};

/// Consecutive points closer than this are merged.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Stroke geometry parameters, in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::default(),
            join: LineJoin::default(),
            miter_limit: 10.0,
        }
    }
}

/// Signed relation of `p` to the line through `a` and `b`.
///
/// Zero when the three points are collinear; negative when `a → b → p` turns
/// clockwise on screen (Y grows downward).
pub fn point_line_relationship(a: Point, b: Point, p: Point) -> f64 {
    (b.y - a.y) * p.x + (a.x - b.x) * p.y + (b.x * a.y - a.x * b.y)
}

/// Normal of the unit direction `dir`, scaled by `half_width`.
fn offset_normal(dir: Vec2, half_width: f64) -> Vec2 {
    Vec2::new(dir.y, -dir.x) * half_width
}

fn unit(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > 0.0 {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Push the interior points of a circular arc around `center` onto `out`.
///
/// The arc's end points are not pushed.
pub(crate) fn push_arc_points(
    out: &mut Vec<Point>,
    center: Point,
    radius: f64,
    start_angle: f64,
    sweep: f64,
    chord_error: f64,
) {
    if radius <= 0.0 || sweep == 0.0 {
        return;
    }
    let step = 2.0 * (radius / (radius + chord_error)).acos();
    let steps = if step.is_finite() && step > 0.0 {
        (sweep.abs() / step).ceil().clamp(1.0, 1024.0) as usize
    } else {
        1
    };
    let da = sweep / steps as f64;
    for k in 1..steps {
        let angle = start_angle + da * k as f64;
        out.push(center + Vec2::new(angle.cos(), angle.sin()) * radius);
    }
}

/// Converts a polyline stream into stroke outline polygons.
pub struct LineStroker<'a> {
    next: &'a mut dyn Flattener,
    half_width: f64,
    cap: LineCap,
    join: LineJoin,
    miter_limit: f64,
    chord_error: f64,
    points: Vec<Point>,
    closed: bool,
    /// Outer side of the outline, emitted forward.
    vertices: Vec<Point>,
    /// Inner side of the outline, emitted in reverse.
    rewind: Vec<Point>,
}

impl<'a> LineStroker<'a> {
    pub fn new(style: &StrokeStyle, next: &'a mut dyn Flattener) -> Self {
        Self {
            next,
            half_width: style.width / 2.0,
            cap: style.cap,
            join: style.join,
            miter_limit: style.miter_limit,
            chord_error: DEFAULT_ARC_CHORD_ERROR,
            points: Vec::new(),
            closed: false,
            vertices: Vec::new(),
            rewind: Vec::new(),
        }
    }

    /// Maximum deviation allowed when approximating round caps and joins.
    pub fn with_chord_error(mut self, chord_error: f64) -> Self {
        if chord_error.is_finite() && chord_error > 0.0 {
            self.chord_error = chord_error;
        }
        self
    }

    fn flush(&mut self) {
        let mut points = std::mem::take(&mut self.points);
        let closed = std::mem::replace(&mut self.closed, false);
        if closed && points.len() > 2 && is_coincident(points[0], points[points.len() - 1]) {
            points.pop();
        }
        if points.len() < 2 || !(self.half_width > 0.0) {
            return;
        }

        self.vertices.clear();
        self.rewind.clear();
        if closed {
            self.stroke_closed(&points);
        } else {
            self.stroke_open(&points);
        }
    }

    fn stroke_open(&mut self, points: &[Point]) {
        let hw = self.half_width;
        let dirs: Vec<Vec2> = points.windows(2).map(|w| unit(w[1] - w[0])).collect();

        let first_normal = offset_normal(dirs[0], hw);
        self.vertices.push(points[0] + first_normal);
        self.rewind.push(points[0] - first_normal);
        for i in 1..points.len() - 1 {
            self.add_join(points[i - 1], points[i], points[i + 1], dirs[i - 1], dirs[i]);
        }
        let last = points[points.len() - 1];
        let last_dir = dirs[dirs.len() - 1];
        let last_normal = offset_normal(last_dir, hw);
        self.vertices.push(last + last_normal);
        self.rewind.push(last - last_normal);

        let mut outline = std::mem::take(&mut self.vertices);
        cap::add_cap(self.cap, &mut outline, last, last_dir, hw, self.chord_error);
        outline.extend(self.rewind.iter().rev());
        cap::add_cap(self.cap, &mut outline, points[0], -dirs[0], hw, self.chord_error);
        self.emit_polygon(&outline);
    }

    fn stroke_closed(&mut self, points: &[Point]) {
        let n = points.len();
        let dirs: Vec<Vec2> = (0..n)
            .map(|i| unit(points[(i + 1) % n] - points[i]))
            .collect();
        for i in 0..n {
            let prev = (i + n - 1) % n;
            self.add_join(points[prev], points[i], points[(i + 1) % n], dirs[prev], dirs[i]);
        }

        let vertices = std::mem::take(&mut self.vertices);
        let rewind: Vec<Point> = self.rewind.iter().rev().copied().collect();
        self.emit_polygon(&vertices);
        self.emit_polygon(&rewind);
    }

    fn add_join(&mut self, prev: Point, pivot: Point, next: Point, d0: Vec2, d1: Vec2) {
        join::add_join(
            &join::JoinParams {
                join: self.join,
                half_width: self.half_width,
                miter_limit: self.miter_limit,
                chord_error: self.chord_error,
            },
            prev,
            pivot,
            next,
            d0,
            d1,
            &mut self.vertices,
            &mut self.rewind,
        );
    }

    fn emit_polygon(&mut self, polygon: &[Point]) {
        let Some((first, rest)) = polygon.split_first() else {
            return;
        };
        self.next.move_to(first.x, first.y);
        for p in rest {
            self.next.line_to(p.x, p.y);
        }
        self.next.line_to(first.x, first.y);
        self.next.close();
        self.next.end();
    }
}

fn is_coincident(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= COINCIDENT_EPSILON && (a.y - b.y).abs() <= COINCIDENT_EPSILON
}

impl Flattener for LineStroker<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.flush();
        self.points.push(Point::new(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        match self.points.last() {
            Some(&last) if is_coincident(last, p) => {}
            _ => self.points.push(p),
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn end(&mut self) {
        self.flush();
    }
}
