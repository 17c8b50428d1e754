//! Line joins at interior polyline vertices.

use super::{offset_normal, point_line_relationship, push_arc_points};
use crate::style::LineJoin;
use kurbo::{Point, Vec2};
use std::f64::consts::TAU;

pub(super) struct JoinParams {
    pub join: LineJoin,
    pub half_width: f64,
    pub miter_limit: f64,
    pub chord_error: f64,
}

/// Append the join at `pivot` between the segment arriving along `d0` and the
/// segment leaving along `d1`.
///
/// The outer side of the turn receives the join geometry; the inner side is
/// routed through the pivot so the outline stays closed under nonzero winding.
#[allow(clippy::too_many_arguments)]
pub(super) fn add_join(
    params: &JoinParams,
    prev: Point,
    pivot: Point,
    next: Point,
    d0: Vec2,
    d1: Vec2,
    vertices: &mut Vec<Point>,
    rewind: &mut Vec<Point>,
) {
    let hw = params.half_width;
    let n0 = offset_normal(d0, hw);
    let n1 = offset_normal(d1, hw);

    let relation = point_line_relationship(prev, pivot, next);
    if relation == 0.0 {
        if d0.dot(d1) >= 0.0 {
            vertices.push(pivot + n0);
            rewind.push(pivot - n0);
        } else {
            // Reversal: connect both offsets directly.
            vertices.push(pivot + n0);
            vertices.push(pivot + n1);
            rewind.push(pivot - n0);
            rewind.push(pivot - n1);
        }
        return;
    }

    let clockwise = relation < 0.0;
    let (outer, inner, side) = if clockwise {
        (vertices, rewind, 1.0)
    } else {
        (rewind, vertices, -1.0)
    };

    inner.push(pivot - n0 * side);
    inner.push(pivot);
    inner.push(pivot - n1 * side);

    let o0 = n0 * side;
    let o1 = n1 * side;
    outer.push(pivot + o0);
    match params.join {
        LineJoin::Bevel => {}
        LineJoin::Miter => {
            if let Some(tip) = miter_tip(pivot, o0, o1, hw, params.miter_limit) {
                outer.push(tip);
            }
        }
        LineJoin::Round => {
            let a0 = o0.y.atan2(o0.x);
            let a1 = o1.y.atan2(o1.x);
            let sweep = if clockwise {
                (a1 - a0).rem_euclid(TAU)
            } else {
                -(a0 - a1).rem_euclid(TAU)
            };
            push_arc_points(outer, pivot, hw, a0, sweep, params.chord_error);
        }
    }
    outer.push(pivot + o1);
}

/// Intersection of the two outer offset lines, or `None` when the miter
/// length exceeds `miter_limit` times the line width.
fn miter_tip(pivot: Point, o0: Vec2, o1: Vec2, hw: f64, miter_limit: f64) -> Option<Point> {
    let denom = hw * hw + o0.dot(o1);
    if denom <= f64::EPSILON * hw * hw {
        return None;
    }
    let tip = (o0 + o1) * (hw * hw / denom);
    // miter length / line width == |tip| / half width
    if tip.hypot() > miter_limit * hw {
        return None;
    }
    Some(pivot + tip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miter_tip_right_angle() {
        let tip = miter_tip(
            Point::new(0.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 0.0),
            1.0,
            10.0,
        );
        assert_eq!(tip, Some(Point::new(1.0, -1.0)));
    }

    #[test]
    fn test_miter_tip_limit() {
        // A right angle has a miter ratio of sqrt(2).
        let o0 = Vec2::new(0.0, -1.0);
        let o1 = Vec2::new(1.0, 0.0);
        assert!(miter_tip(Point::ZERO, o0, o1, 1.0, 1.5).is_some());
        assert!(miter_tip(Point::ZERO, o0, o1, 1.0, 1.4).is_none());
    }

    #[test]
    fn test_counter_clockwise_turn_puts_join_on_rewind_side() {
        let params = JoinParams {
            join: LineJoin::Miter,
            half_width: 1.0,
            miter_limit: 10.0,
            chord_error: 0.125,
        };
        let mut vertices = Vec::new();
        let mut rewind = Vec::new();
        // Heading right, then turning up on screen.
        add_join(
            &params,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, -10.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            &mut vertices,
            &mut rewind,
        );
        assert_eq!(vertices.len(), 3);
        assert!(vertices.contains(&Point::new(10.0, 0.0)));
        assert!(rewind.contains(&Point::new(11.0, 1.0)));
    }
}
