//! Line caps at the ends of open subpaths.

use super::push_arc_points;
use crate::style::LineCap;
use kurbo::{Point, Vec2};
use std::f64::consts::PI;

/// Append the cap at `center`, where the stroke leaves along `dir`.
///
/// The outline arrives at `center + n` (with `n` the offset normal of `dir`)
/// and continues from `center - n` afterwards; neither end point is pushed.
pub(super) fn add_cap(
    cap: LineCap,
    out: &mut Vec<Point>,
    center: Point,
    dir: Vec2,
    half_width: f64,
    chord_error: f64,
) {
    let normal = Vec2::new(dir.y, -dir.x) * half_width;
    let from = center + normal;
    let to = center - normal;
    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            let extension = dir * half_width;
            out.push(from + extension);
            out.push(to + extension);
        }
        LineCap::Round => {
            let start = normal.y.atan2(normal.x);
            push_arc_points(out, center, half_width, start, PI, chord_error);
        }
    }
}
