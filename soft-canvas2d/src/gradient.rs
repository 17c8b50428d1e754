//! Gradient types for Canvas 2D operations.
//!
//! Gradient geometry lives in user space; the painter maps each device pixel
//! through the inverse transform before evaluating the gradient.

use crate::color::{self, CanvasColor, Premultiplied, TRANSPARENT};
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::RadialGradientParams;

/// A color stop in a gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    /// Color at this stop.
    pub color: CanvasColor,
}

/// Type of gradient.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientType {
    /// Linear gradient from (x0, y0) to (x1, y1).
    Linear { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Radial gradient from inner circle to outer circle.
    Radial(RadialGradientParams),
}

/// Canvas gradient (linear or radial), padded beyond its end stops.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasGradient {
    /// Gradient type and geometry.
    pub gradient_type: GradientType,
    /// Color stops, sorted by offset.
    stops: Vec<GradientStop>,
}

impl CanvasGradient {
    /// Create a new linear gradient.
    pub fn new_linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            gradient_type: GradientType::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    /// Create a new radial gradient.
    pub fn new_radial(params: &RadialGradientParams) -> Self {
        Self {
            gradient_type: GradientType::Radial(*params),
            stops: Vec::new(),
        }
    }

    /// Add a color stop to the gradient.
    ///
    /// Stops with equal offsets keep insertion order, which produces a hard
    /// transition.
    pub fn add_color_stop(&mut self, offset: f64, color: CanvasColor) -> Canvas2dResult<()> {
        if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
            return Err(Canvas2dError::InvalidGradientStop(offset));
        }
        let index = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(index, GradientStop { offset, color });
        Ok(())
    }

    /// Add a color stop from a CSS color string.
    pub fn add_color_stop_str(&mut self, offset: f64, color: &str) -> Canvas2dResult<()> {
        let color = color::parse_color(color)?;
        self.add_color_stop(offset, color)
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Premultiplied color at user-space point `(x, y)`.
    pub fn color_at(&self, x: f64, y: f64) -> Premultiplied {
        match self.parameter_at(x, y) {
            Some(t) => self.color_for(t),
            None => TRANSPARENT,
        }
    }

    /// Gradient parameter `t` at a point, or `None` where the gradient is
    /// undefined (degenerate geometry or outside a radial cone).
    fn parameter_at(&self, x: f64, y: f64) -> Option<f64> {
        match &self.gradient_type {
            GradientType::Linear { x0, y0, x1, y1 } => {
                let (dx, dy) = (x1 - x0, y1 - y0);
                let len2 = dx * dx + dy * dy;
                if len2 == 0.0 {
                    return None;
                }
                Some(((x - x0) * dx + (y - y0) * dy) / len2)
            }
            GradientType::Radial(p) => radial_parameter(p, x, y),
        }
    }

    /// Interpolated premultiplied color for parameter `t`, padded at the ends.
    fn color_for(&self, t: f64) -> Premultiplied {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return TRANSPARENT;
        };
        if t <= first.offset {
            return first.color.premultiplied();
        }
        if t >= last.offset {
            return last.color.premultiplied();
        }
        let upper = self.stops.partition_point(|s| s.offset <= t);
        let (a, b) = (&self.stops[upper - 1], &self.stops[upper]);
        let span = b.offset - a.offset;
        if span <= 0.0 {
            return b.color.premultiplied();
        }
        let f = ((t - a.offset) / span) as f32;
        color::lerp(a.color.premultiplied(), b.color.premultiplied(), f)
    }
}

/// Solve for the largest `t` such that `(x, y)` lies on the circle
/// interpolated between the start and end circles with a non-negative
/// radius.
fn radial_parameter(p: &RadialGradientParams, x: f64, y: f64) -> Option<f64> {
    let (cdx, cdy) = (p.x1 - p.x0, p.y1 - p.y0);
    let (pdx, pdy) = (x - p.x0, y - p.y0);
    let dr = p.r1 - p.r0;

    let a = cdx * cdx + cdy * cdy - dr * dr;
    let b = pdx * cdx + pdy * cdy + p.r0 * dr;
    let c = pdx * pdx + pdy * pdy - p.r0 * p.r0;
    let radius_ok = |t: f64| p.r0 + t * dr >= 0.0;

    if a.abs() < 1e-12 {
        if b == 0.0 {
            return None;
        }
        let t = c / (2.0 * b);
        return radius_ok(t).then_some(t);
    }

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let t1 = (b + root) / a;
    let t2 = (b - root) / a;
    let (hi, lo) = if t1 > t2 { (t1, t2) } else { (t2, t1) };
    if radius_ok(hi) {
        Some(hi)
    } else if radius_ok(lo) {
        Some(lo)
    } else {
        None
    }
}
