//! Colors and premultiplied pixel helpers.
//!
//! The pixel buffer stores premultiplied RGBA8. Blending works on
//! premultiplied `[f32; 4]` values in `0.0..=1.0` and converts at the
//! buffer boundary.

use crate::error::{Canvas2dError, Canvas2dResult};

/// A premultiplied RGBA color with components in `0.0..=1.0`.
pub type Premultiplied = [f32; 4];

/// Fully transparent premultiplied color.
pub const TRANSPARENT: Premultiplied = [0.0; 4];

/// A backend-neutral straight-alpha RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl CanvasColor {
    pub const BLACK: CanvasColor = CanvasColor::from_rgba8(0, 0, 0, 255);
    pub const TRANSPARENT: CanvasColor = CanvasColor::from_rgba8(0, 0, 0, 0);

    /// Create a color from 8-bit RGBA components.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from floating-point RGBA components (each in 0.0..=1.0).
    pub fn from_rgba_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: unit_to_u8(r),
            g: unit_to_u8(g),
            b: unit_to_u8(b),
            a: unit_to_u8(a),
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Premultiplied float components.
    pub fn premultiplied(&self) -> Premultiplied {
        let a = self.a as f32 / 255.0;
        [
            self.r as f32 / 255.0 * a,
            self.g as f32 / 255.0 * a,
            self.b as f32 / 255.0 * a,
            a,
        ]
    }
}

/// Parse a CSS color string.
pub fn parse_color(s: &str) -> Canvas2dResult<CanvasColor> {
    let parsed = csscolorparser::parse(s)
        .map_err(|e| Canvas2dError::ColorParseError(format!("{}: {}", s, e)))?;

    let [r, g, b, a] = parsed.to_rgba8();
    Ok(CanvasColor::from_rgba8(r, g, b, a))
}

fn unit_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Read a premultiplied RGBA8 pixel.
#[inline]
pub fn load(pixel: &[u8]) -> Premultiplied {
    [
        pixel[0] as f32 / 255.0,
        pixel[1] as f32 / 255.0,
        pixel[2] as f32 / 255.0,
        pixel[3] as f32 / 255.0,
    ]
}

/// Write a premultiplied color as RGBA8, keeping color channels within alpha.
#[inline]
pub fn store(pixel: &mut [u8], color: Premultiplied) {
    let a = unit_to_u8(color[3]);
    pixel[3] = a;
    for i in 0..3 {
        pixel[i] = unit_to_u8(color[i]).min(a);
    }
}

/// Scale every component of a premultiplied color.
#[inline]
pub fn scale(color: Premultiplied, factor: f32) -> Premultiplied {
    [
        color[0] * factor,
        color[1] * factor,
        color[2] * factor,
        color[3] * factor,
    ]
}

/// Linear interpolation between two premultiplied colors.
#[inline]
pub fn lerp(from: Premultiplied, to: Premultiplied, t: f32) -> Premultiplied {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
        from[3] + (to[3] - from[3]) * t,
    ]
}

/// Convert premultiplied RGBA8 to straight alpha, in place.
pub fn unpremultiply_rgba8(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u32;
        match a {
            0 => {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
            }
            255 => {}
            _ => {
                for c in px.iter_mut().take(3) {
                    *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
    }
}

/// Convert straight-alpha RGBA8 to premultiplied, in place.
pub fn premultiply_rgba8(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        match a {
            255 => {}
            0 => {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
            }
            _ => {
                for c in px.iter_mut().take(3) {
                    *c = ((*c as u16 * a + 127) / 255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#ff0000", CanvasColor::from_rgba8(255, 0, 0, 255))]
    #[case("rgba(0, 0, 255, 0.5)", CanvasColor::from_rgba8(0, 0, 255, 128))]
    #[case("transparent", CanvasColor::TRANSPARENT)]
    #[case("black", CanvasColor::BLACK)]
    fn test_parse_color(#[case] input: &str, #[case] expected: CanvasColor) {
        assert_eq!(parse_color(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_color_invalid() {
        assert!(matches!(
            parse_color("not-a-color"),
            Err(Canvas2dError::ColorParseError(_))
        ));
    }

    #[test]
    fn test_premultiply_round_trip_opaque() {
        let mut data = vec![10, 20, 30, 255, 200, 100, 50, 0];
        premultiply_rgba8(&mut data);
        assert_eq!(data, vec![10, 20, 30, 255, 0, 0, 0, 0]);
        unpremultiply_rgba8(&mut data);
        assert_eq!(data, vec![10, 20, 30, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_half_alpha_premultiply() {
        let mut data = vec![255, 0, 0, 128];
        premultiply_rgba8(&mut data);
        assert_eq!(data, vec![128, 0, 0, 128]);
        unpremultiply_rgba8(&mut data);
        assert_eq!(data, vec![255, 0, 0, 128]);
    }

    #[test]
    fn test_store_clamps_color_to_alpha() {
        let mut px = [0u8; 4];
        store(&mut px, [1.2, 0.5, -0.1, 0.5]);
        assert_eq!(px, [128, 128, 0, 128]);
    }
}
