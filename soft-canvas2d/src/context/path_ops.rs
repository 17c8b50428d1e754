//! Path building operations for Canvas2dContext.
//!
//! Incoming coordinates are in user space and are mapped through the current
//! transform before they are stored, so later transform changes do not move
//! geometry that is already part of the path.

use super::Canvas2dContext;
use crate::geometry::{
    ArcParams, ArcToParams, CubicBezierParams, EllipseParams, QuadraticBezierParams, RectParams,
    RoundedRectParams,
};
use crate::path::{normalize_arc, Path};
use std::f64::consts::PI;

/// Cross products below this treat the `arcTo` tangents as parallel.
const ARC_TO_PARALLEL_EPSILON: f64 = 1e-9;

impl Canvas2dContext {
    /// Begin a new path.
    pub fn begin_path(&mut self) {
        log::debug!(target: "canvas", "beginPath");
        self.state_mut().path.clear();
    }

    /// Transform a user-space point by the current transformation matrix.
    pub(crate) fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        self.state().transform.transform_point(x, y)
    }

    /// The current path, in device space.
    pub fn current_path(&self) -> &Path {
        &self.state().path
    }

    /// Move to a point.
    pub fn move_to(&mut self, x: f64, y: f64) {
        log::debug!(target: "canvas", "moveTo {} {}", x, y);
        let (x, y) = self.transform_point(x, y);
        self.state_mut().path.move_to(x, y);
    }

    /// Line to a point. Starts a subpath at the point on an empty path.
    pub fn line_to(&mut self, x: f64, y: f64) {
        log::debug!(target: "canvas", "lineTo {} {}", x, y);
        let (x, y) = self.transform_point(x, y);
        self.state_mut().path.line_to(x, y);
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        log::debug!(target: "canvas", "closePath");
        self.state_mut().path.close();
    }

    /// Add a quadratic Bezier curve.
    pub fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) {
        log::debug!(target: "canvas", "quadraticCurveTo {} {} {} {}", params.cpx, params.cpy, params.x, params.y);
        let (cx, cy) = self.transform_point(params.cpx, params.cpy);
        let (x, y) = self.transform_point(params.x, params.y);
        self.state_mut().path.quad_to(cx, cy, x, y);
    }

    /// Add a cubic Bezier curve.
    pub fn bezier_curve_to(&mut self, params: &CubicBezierParams) {
        log::debug!(
            target: "canvas",
            "bezierCurveTo {} {} {} {} {} {}",
            params.cp1x, params.cp1y, params.cp2x, params.cp2y, params.x, params.y
        );
        let (c1x, c1y) = self.transform_point(params.cp1x, params.cp1y);
        let (c2x, c2y) = self.transform_point(params.cp2x, params.cp2y);
        let (x, y) = self.transform_point(params.x, params.y);
        self.state_mut().path.cubic_to(c1x, c1y, c2x, c2y, x, y);
    }

    /// Add a closed rectangle subpath.
    pub fn rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "rect {} {} {} {}", params.x, params.y, params.width, params.height);
        let RectParams {
            x,
            y,
            width,
            height,
        } = *params;
        let mut corners = [x, y, x + width, y, x + width, y + height, x, y + height];
        let state = self.state_mut();
        state.transform.transform_points(&mut corners);
        state.path.add_polygon(&corners);
    }

    /// Add a closed rectangle with quadratic corners of radii
    /// `arc_width / 2` and `arc_height / 2`.
    pub fn rounded_rect(&mut self, params: &RoundedRectParams) {
        log::debug!(
            target: "canvas",
            "roundedRect {} {} {} {} {} {}",
            params.x, params.y, params.width, params.height, params.arc_width, params.arc_height
        );
        let mut shape = Path::new();
        shape.add_rounded_rect(
            params.x,
            params.y,
            params.width,
            params.height,
            params.arc_width,
            params.arc_height,
        );
        self.append_user_path(&shape);
    }

    /// Add a closed circle subpath.
    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) {
        log::debug!(target: "canvas", "circle {} {} {}", cx, cy, radius);
        if !(radius >= 0.0) {
            log::debug!(target: "canvas", "circle ignored: negative radius {}", radius);
            return;
        }
        let mut shape = Path::new();
        shape.add_circle(cx, cy, radius);
        self.append_user_path(&shape);
    }

    /// Add a closed, axis-aligned full ellipse subpath.
    pub fn full_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        log::debug!(target: "canvas", "fullEllipse {} {} {} {}", cx, cy, rx, ry);
        if !(rx >= 0.0 && ry >= 0.0) {
            log::debug!(target: "canvas", "fullEllipse ignored: negative radius");
            return;
        }
        let mut shape = Path::new();
        shape.add_ellipse(cx, cy, rx, ry);
        self.append_user_path(&shape);
    }

    /// Add a circular arc, connected to the current point with a line.
    pub fn arc(&mut self, params: &ArcParams) {
        log::debug!(
            target: "canvas",
            "arc {} {} {} {} {} {}",
            params.x, params.y, params.radius, params.start_angle, params.end_angle, params.anticlockwise
        );
        self.append_ellipse(&EllipseParams::from(params));
    }

    /// Add an elliptical arc, connected to the current point with a line.
    pub fn ellipse(&mut self, params: &EllipseParams) {
        log::debug!(
            target: "canvas",
            "ellipse {} {} {} {} {} {} {} {}",
            params.x, params.y, params.radius_x, params.radius_y, params.rotation,
            params.start_angle, params.end_angle, params.anticlockwise
        );
        self.append_ellipse(params);
    }

    fn append_ellipse(&mut self, params: &EllipseParams) {
        let values = [
            params.x,
            params.y,
            params.radius_x,
            params.radius_y,
            params.rotation,
            params.start_angle,
            params.end_angle,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return;
        }
        if params.radius_x < 0.0 || params.radius_y < 0.0 {
            log::debug!(target: "canvas", "ellipse ignored: negative radius");
            return;
        }
        let (start, sweep) = normalize_arc(params.start_angle, params.end_angle, params.anticlockwise);
        let transform = self.state().transform;
        self.state_mut().path.append_arc(
            &transform,
            params.x,
            params.y,
            params.radius_x,
            params.radius_y,
            params.rotation,
            start,
            sweep,
        );
    }

    /// Add an arc tangent to the lines from the current point to `(x1, y1)`
    /// and from `(x1, y1)` to `(x2, y2)`.
    ///
    /// With no current point the path starts at `(x1, y1)`. A zero radius or
    /// coincident points add a line to `(x1, y1)`; parallel tangents add a
    /// line to `(x2, y2)`.
    pub fn arc_to(&mut self, params: &ArcToParams) {
        log::debug!(
            target: "canvas",
            "arcTo {} {} {} {} {}",
            params.x1, params.y1, params.x2, params.y2, params.radius
        );
        let ArcToParams {
            x1,
            y1,
            x2,
            y2,
            radius,
        } = *params;
        if !(radius >= 0.0) || !radius.is_finite() {
            log::debug!(target: "canvas", "arcTo ignored: invalid radius {}", radius);
            return;
        }
        if self.state().path.is_empty() {
            self.move_to(x1, y1);
            return;
        }
        let transform = self.state().transform;
        let (dx, dy) = self.state().path.last_point();
        let Some((x0, y0)) = transform.inverse_transform_point(dx, dy) else {
            return;
        };

        let (ux0, uy0) = (x0 - x1, y0 - y1);
        let (ux1, uy1) = (x2 - x1, y2 - y1);
        let (len0, len1) = (ux0.hypot(uy0), ux1.hypot(uy1));
        if radius == 0.0 || len0 == 0.0 || len1 == 0.0 {
            self.line_to(x1, y1);
            return;
        }
        let (v0x, v0y) = (ux0 / len0, uy0 / len0);
        let (v1x, v1y) = (ux1 / len1, uy1 / len1);
        let cross = v0x * v1y - v0y * v1x;
        if cross.abs() < ARC_TO_PARALLEL_EPSILON {
            self.line_to(x2, y2);
            return;
        }

        // Angle between the two tangent directions, strictly in (0, PI).
        let theta = (v0x * v1x + v0y * v1y).clamp(-1.0, 1.0).acos();
        let tangent_distance = radius / (theta / 2.0).tan();
        let (t0x, t0y) = (x1 + v0x * tangent_distance, y1 + v0y * tangent_distance);
        let (t1x, t1y) = (x1 + v1x * tangent_distance, y1 + v1y * tangent_distance);

        let (bx, by) = (v0x + v1x, v0y + v1y);
        let bisector = bx.hypot(by);
        let center_distance = radius / (theta / 2.0).sin();
        let (cx, cy) = (
            x1 + bx / bisector * center_distance,
            y1 + by / bisector * center_distance,
        );

        let start = (t0y - cy).atan2(t0x - cx);
        let end = (t1y - cy).atan2(t1x - cx);
        let (start, sweep) = normalize_arc(start, end, cross > 0.0);
        // The tangent arc never spans more than half a turn.
        let sweep = if sweep.abs() > PI {
            sweep - sweep.signum() * 2.0 * PI
        } else {
            sweep
        };
        self.state_mut()
            .path
            .append_arc(&transform, cx, cy, radius, radius, 0.0, start, sweep);
    }

    /// Append a user-space path, transformed into device space.
    pub(crate) fn append_user_path(&mut self, path: &Path) {
        let transform = self.state().transform;
        self.state_mut().path.append_transformed(path, &transform);
    }
}
