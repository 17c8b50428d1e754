//! Style types and enums for Canvas 2D operations.

use crate::color::CanvasColor;
use crate::error::Canvas2dError;
use crate::gradient::CanvasGradient;
use crate::pattern::CanvasPattern;
use std::str::FromStr;
use std::sync::Arc;

/// Fill or stroke paint.
///
/// Gradients and patterns are shared between saved frames and never mutated
/// once installed.
#[derive(Debug, Clone)]
pub enum FillStyle {
    /// Solid color fill.
    Color(CanvasColor),
    /// Linear or radial gradient fill.
    Gradient(Arc<CanvasGradient>),
    /// Image pattern fill.
    Pattern(Arc<CanvasPattern>),
}

impl Default for FillStyle {
    fn default() -> Self {
        // Default is opaque black
        FillStyle::Color(CanvasColor::BLACK)
    }
}

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl FromStr for LineCap {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid line cap: '{}'",
                s
            ))),
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

impl FromStr for LineJoin {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid line join: '{}'",
                s
            ))),
        }
    }
}

/// Text alignment for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Align text to the left of the anchor point.
    #[default]
    Left,
    /// Align text to the right of the anchor point.
    Right,
    /// Center text on the anchor point.
    Center,
    /// Same as left for left-to-right text.
    Start,
    /// Same as right for left-to-right text.
    End,
}

impl FromStr for TextAlign {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(TextAlign::Left),
            "right" => Ok(TextAlign::Right),
            "center" => Ok(TextAlign::Center),
            "start" => Ok(TextAlign::Start),
            "end" => Ok(TextAlign::End),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid text align: '{}'",
                s
            ))),
        }
    }
}

/// Text baseline for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Top of the em square.
    Top,
    /// Hanging baseline.
    Hanging,
    /// Middle of the em square.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Ideographic baseline.
    Ideographic,
    /// Bottom of the em square.
    Bottom,
}

impl FromStr for TextBaseline {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(TextBaseline::Top),
            "hanging" => Ok(TextBaseline::Hanging),
            "middle" => Ok(TextBaseline::Middle),
            "alphabetic" => Ok(TextBaseline::Alphabetic),
            "ideographic" => Ok(TextBaseline::Ideographic),
            "bottom" => Ok(TextBaseline::Bottom),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid text baseline: '{}'",
                s
            ))),
        }
    }
}

/// Fill rule for path operations.
///
/// Determines how the interior of a path is calculated when filling.
/// Strokes always rasterize with [`CanvasFillRule::NonZero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasFillRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl CanvasFillRule {
    /// Whether a point with the given winding number is inside.
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            CanvasFillRule::NonZero => winding != 0,
            CanvasFillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

impl FromStr for CanvasFillRule {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nonzero" => Ok(CanvasFillRule::NonZero),
            "evenodd" => Ok(CanvasFillRule::EvenOdd),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid fill rule: '{}'",
                s
            ))),
        }
    }
}

/// Resampling filter for images and patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation of the four nearest texels.
    #[default]
    Bilinear,
    /// Catmull-Rom bicubic interpolation over a 4x4 neighborhood.
    Bicubic,
}

impl FromStr for ImageFilter {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(ImageFilter::Nearest),
            "bilinear" => Ok(ImageFilter::Bilinear),
            "bicubic" => Ok(ImageFilter::Bicubic),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid image filter: '{}'",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("butt", LineCap::Butt)]
    #[case("round", LineCap::Round)]
    #[case("square", LineCap::Square)]
    fn test_line_cap_from_str(#[case] s: &str, #[case] expected: LineCap) {
        assert_eq!(s.parse::<LineCap>().unwrap(), expected);
    }

    #[test]
    fn test_invalid_tokens() {
        assert!("Round".parse::<LineJoin>().is_err());
        assert!("".parse::<TextAlign>().is_err());
        assert!("non-zero".parse::<CanvasFillRule>().is_err());
        assert!("cubic".parse::<ImageFilter>().is_err());
    }

    #[rstest]
    #[case(CanvasFillRule::NonZero, 2, true)]
    #[case(CanvasFillRule::NonZero, -1, true)]
    #[case(CanvasFillRule::NonZero, 0, false)]
    #[case(CanvasFillRule::EvenOdd, 2, false)]
    #[case(CanvasFillRule::EvenOdd, -1, true)]
    fn test_fill_rule_inside(
        #[case] rule: CanvasFillRule,
        #[case] winding: i32,
        #[case] inside: bool,
    ) {
        assert_eq!(rule.is_inside(winding), inside);
    }
}
