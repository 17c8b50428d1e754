//! Text layout on top of an external glyph provider.
//!
//! The engine never reads font files. A [`GlyphProvider`] hands out glyph
//! outlines and advances for a character and a [`FontRequest`]; text is laid
//! out left to right on a single line.

use crate::font_parser::FontRequest;
use crate::matrix::Matrix;
use crate::path::Path;
use crate::style::{TextAlign, TextBaseline};

/// One glyph, scaled to the requested font size.
///
/// The outline is in pixels with the origin on the baseline at the left edge
/// of the glyph and y growing downward.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub outline: Path,
    pub advance: f64,
}

/// Vertical font metrics in pixels, both positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascent: f64,
    pub descent: f64,
}

impl FontMetrics {
    /// Metrics approximated from the font size alone.
    pub fn approximate(size_px: f64) -> Self {
        Self {
            ascent: size_px * 0.8,
            descent: size_px * 0.2,
        }
    }
}

/// Source of glyph outlines.
pub trait GlyphProvider: Send + Sync {
    /// Glyph for `ch`, or `None` when the font has no such glyph.
    fn glyph(&self, ch: char, font: &FontRequest) -> Option<Glyph>;

    fn metrics(&self, font: &FontRequest) -> FontMetrics {
        FontMetrics::approximate(font.size_px)
    }
}

/// Text metrics returned by measureText().
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMetrics {
    /// Width of the text in pixels.
    pub width: f64,
    /// Distance from baseline to top of the bounding box.
    pub actual_bounding_box_ascent: f64,
    /// Distance from baseline to bottom of the bounding box.
    pub actual_bounding_box_descent: f64,
    /// Font ascent.
    pub font_bounding_box_ascent: f64,
    /// Font descent.
    pub font_bounding_box_descent: f64,
    /// Distance from alignment point to left of the bounding box.
    pub actual_bounding_box_left: f64,
    /// Distance from alignment point to right of the bounding box.
    pub actual_bounding_box_right: f64,
}

/// Glyphs positioned along the baseline.
#[derive(Debug, Clone)]
pub struct TextLayout {
    pub glyphs: Vec<(f64, Glyph)>,
    pub width: f64,
    pub metrics: FontMetrics,
}

impl TextLayout {
    /// All glyph outlines as one path, with the text origin at `(0, 0)`.
    pub fn outline(&self) -> Path {
        let mut path = Path::new();
        for (x, glyph) in &self.glyphs {
            path.append_transformed(&glyph.outline, &Matrix::translation(*x, 0.0));
        }
        path
    }
}

/// Lay out `text`. Returns `None` when any character has no glyph.
pub fn layout_text(
    provider: &dyn GlyphProvider,
    text: &str,
    font: &FontRequest,
) -> Option<TextLayout> {
    let mut glyphs = Vec::with_capacity(text.len());
    let mut x = 0.0;
    for ch in text.chars() {
        let glyph = provider.glyph(ch, font)?;
        let advance = glyph.advance;
        glyphs.push((x, glyph));
        x += advance;
    }
    Some(TextLayout {
        glyphs,
        width: x,
        metrics: provider.metrics(font),
    })
}

/// Measure text. Missing glyphs or provider give all-zero metrics.
pub fn measure_text(
    provider: Option<&dyn GlyphProvider>,
    text: &str,
    font: &FontRequest,
) -> TextMetrics {
    let Some(layout) = provider.and_then(|p| layout_text(p, text, font)) else {
        return TextMetrics::default();
    };
    let FontMetrics { ascent, descent } = layout.metrics;
    TextMetrics {
        width: layout.width,
        actual_bounding_box_ascent: ascent,
        actual_bounding_box_descent: descent,
        font_bounding_box_ascent: ascent,
        font_bounding_box_descent: descent,
        actual_bounding_box_left: 0.0,
        actual_bounding_box_right: layout.width,
    }
}

/// Calculate X offset for text alignment.
pub fn calculate_text_x_offset(width: f64, align: TextAlign) -> f64 {
    match align {
        TextAlign::Left | TextAlign::Start => 0.0,
        TextAlign::Right | TextAlign::End => -width,
        TextAlign::Center => -width / 2.0,
    }
}

/// Calculate Y offset for text baseline.
pub fn calculate_text_y_offset(metrics: &FontMetrics, baseline: TextBaseline) -> f64 {
    let FontMetrics { ascent, descent } = *metrics;
    match baseline {
        TextBaseline::Top => ascent,
        TextBaseline::Hanging => ascent * 0.8,
        TextBaseline::Middle => (ascent - descent) / 2.0,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Ideographic => -descent * 0.5,
        TextBaseline::Bottom => -descent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Every ASCII letter is a box of half the font size; nothing else exists.
    struct BoxGlyphs;

    impl GlyphProvider for BoxGlyphs {
        fn glyph(&self, ch: char, font: &FontRequest) -> Option<Glyph> {
            if !ch.is_ascii_alphabetic() {
                return None;
            }
            let side = font.size_px / 2.0;
            let mut outline = Path::new();
            outline.add_rect(0.0, -side, side, side);
            Some(Glyph {
                outline,
                advance: side,
            })
        }
    }

    fn font(size: f64) -> FontRequest {
        FontRequest {
            size_px: size,
            ..FontRequest::default()
        }
    }

    #[test]
    fn test_layout_advances() {
        let layout = layout_text(&BoxGlyphs, "abc", &font(20.0)).unwrap();
        let xs: Vec<f64> = layout.glyphs.iter().map(|(x, _)| *x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0]);
        assert_eq!(layout.width, 30.0);
        assert!(!layout.outline().is_empty());
    }

    #[test]
    fn test_missing_glyph_measures_zero() {
        assert!(layout_text(&BoxGlyphs, "a1", &font(10.0)).is_none());
        assert_eq!(
            measure_text(Some(&BoxGlyphs), "a1", &font(10.0)),
            TextMetrics::default()
        );
        assert_eq!(measure_text(None, "a", &font(10.0)).width, 0.0);
    }

    #[test]
    fn test_measure_uses_provider_metrics() {
        let m = measure_text(Some(&BoxGlyphs), "ab", &font(10.0));
        assert_eq!(m.width, 10.0);
        assert_eq!(m.font_bounding_box_ascent, 8.0);
        assert_eq!(m.font_bounding_box_descent, 2.0);
    }

    #[rstest]
    #[case(TextAlign::Left, 0.0)]
    #[case(TextAlign::Start, 0.0)]
    #[case(TextAlign::Center, -50.0)]
    #[case(TextAlign::Right, -100.0)]
    #[case(TextAlign::End, -100.0)]
    fn test_x_offset(#[case] align: TextAlign, #[case] expected: f64) {
        assert_eq!(calculate_text_x_offset(100.0, align), expected);
    }

    #[rstest]
    #[case(TextBaseline::Alphabetic, 0.0)]
    #[case(TextBaseline::Top, 8.0)]
    #[case(TextBaseline::Middle, 3.0)]
    #[case(TextBaseline::Bottom, -2.0)]
    fn test_y_offset(#[case] baseline: TextBaseline, #[case] expected: f64) {
        let metrics = FontMetrics::approximate(10.0);
        assert!((calculate_text_y_offset(&metrics, baseline) - expected).abs() < 1e-9);
    }
}
