//! Parameter structs for Canvas 2D drawing operations.
//!
//! These structs replace long positional argument lists with named fields,
//! grouping semantically related parameters together.

/// Parameters for a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// X coordinate of the arc center.
    pub x: f64,
    /// Y coordinate of the arc center.
    pub y: f64,
    /// Radius of the arc.
    pub radius: f64,
    /// Starting angle in radians.
    pub start_angle: f64,
    /// Ending angle in radians.
    pub end_angle: f64,
    /// If true, draw arc counterclockwise.
    pub anticlockwise: bool,
}

/// Parameters for an elliptical arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParams {
    /// X coordinate of the ellipse center.
    pub x: f64,
    /// Y coordinate of the ellipse center.
    pub y: f64,
    /// X-axis radius of the ellipse.
    pub radius_x: f64,
    /// Y-axis radius of the ellipse.
    pub radius_y: f64,
    /// Rotation of the ellipse in radians.
    pub rotation: f64,
    /// Starting angle in radians.
    pub start_angle: f64,
    /// Ending angle in radians.
    pub end_angle: f64,
    /// If true, draw arc counterclockwise.
    pub anticlockwise: bool,
}

impl From<&ArcParams> for EllipseParams {
    fn from(arc: &ArcParams) -> Self {
        Self {
            x: arc.x,
            y: arc.y,
            radius_x: arc.radius,
            radius_y: arc.radius,
            rotation: 0.0,
            start_angle: arc.start_angle,
            end_angle: arc.end_angle,
            anticlockwise: arc.anticlockwise,
        }
    }
}

/// Parameters for an arcTo operation.
///
/// The arc is drawn from the current point through a tangent defined by
/// two control points with a given radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcToParams {
    /// First control point X.
    pub x1: f64,
    /// First control point Y.
    pub y1: f64,
    /// Second control point X.
    pub x2: f64,
    /// Second control point Y.
    pub y2: f64,
    /// Arc radius.
    pub radius: f64,
}

/// Parameters for a cubic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezierParams {
    /// First control point X.
    pub cp1x: f64,
    /// First control point Y.
    pub cp1y: f64,
    /// Second control point X.
    pub cp2x: f64,
    /// Second control point Y.
    pub cp2y: f64,
    /// End point X.
    pub x: f64,
    /// End point Y.
    pub y: f64,
}

/// Parameters for a quadratic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezierParams {
    /// Control point X.
    pub cpx: f64,
    /// Control point Y.
    pub cpy: f64,
    /// End point X.
    pub x: f64,
    /// End point Y.
    pub y: f64,
}

/// Parameters for a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectParams {
    /// X coordinate of the rectangle origin.
    pub x: f64,
    /// Y coordinate of the rectangle origin.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

/// Parameters for a rectangle with rounded corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRectParams {
    /// X coordinate of the rectangle origin.
    pub x: f64,
    /// Y coordinate of the rectangle origin.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Horizontal corner diameter.
    pub arc_width: f64,
    /// Vertical corner diameter.
    pub arc_height: f64,
}

/// Source and destination rectangles for a cropped drawImage operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCropParams {
    /// Source rectangle X.
    pub sx: f64,
    /// Source rectangle Y.
    pub sy: f64,
    /// Source rectangle width.
    pub sw: f64,
    /// Source rectangle height.
    pub sh: f64,
    /// Destination rectangle X.
    pub dx: f64,
    /// Destination rectangle Y.
    pub dy: f64,
    /// Destination rectangle width.
    pub dw: f64,
    /// Destination rectangle height.
    pub dh: f64,
}

/// A dirty rectangle for partial image data writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    /// X offset into the source data.
    pub x: i32,
    /// Y offset into the source data.
    pub y: i32,
    /// Width of region to copy.
    pub width: i32,
    /// Height of region to copy.
    pub height: i32,
}

/// Parameters for creating a radial gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradientParams {
    /// Inner circle center X.
    pub x0: f64,
    /// Inner circle center Y.
    pub y0: f64,
    /// Inner circle radius.
    pub r0: f64,
    /// Outer circle center X.
    pub x1: f64,
    /// Outer circle center Y.
    pub y1: f64,
    /// Outer circle radius.
    pub r1: f64,
}

/// Drop shadow settings. Offsets and blur are in device pixels and are not
/// affected by the current transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: crate::color::CanvasColor,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            blur: 0.0,
            color: crate::color::CanvasColor::TRANSPARENT,
        }
    }
}

impl Shadow {
    /// A shadow is drawn only with a visible color and a non-zero offset or
    /// blur.
    pub fn is_visible(&self) -> bool {
        !self.color.is_transparent()
            && (self.offset_x != 0.0 || self.offset_y != 0.0 || self.blur != 0.0)
    }

    /// Integer stack blur radius.
    pub fn blur_radius(&self) -> u32 {
        if self.blur.is_finite() && self.blur > 0.0 {
            self.blur.min(u16::MAX as f64) as u32
        } else {
            0
        }
    }
}

/// A reference to non-premultiplied RGBA image data.
#[derive(Debug, Clone, Copy)]
pub struct CanvasImageDataRef<'a> {
    /// RGBA pixel data, non-premultiplied, 4 bytes per pixel.
    pub data: &'a [u8],
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasImageDataRef<'_> {
    /// Whether `data` holds exactly `width × height` pixels.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && (self.width as usize)
                .checked_mul(self.height as usize)
                .and_then(|n| n.checked_mul(4))
                == Some(self.data.len())
    }
}
