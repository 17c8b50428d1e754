//! Text rendering operations for Canvas2dContext.
//!
//! Glyph outlines come from the configured [`GlyphProvider`] and are painted
//! as ordinary paths.
//!
//! [`GlyphProvider`]: crate::text::GlyphProvider

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::font_parser::{parse_font, FontRequest};
use crate::matrix::Matrix;
use crate::path::Path;
use crate::style::{CanvasFillRule, TextAlign, TextBaseline};
use crate::text::{
    calculate_text_x_offset, calculate_text_y_offset, layout_text, measure_text, TextMetrics,
};

impl Canvas2dContext {
    /// Set the font from a CSS font string.
    pub fn set_font(&mut self, font: &str) -> Canvas2dResult<()> {
        self.state_mut().font = parse_font(font)?;
        Ok(())
    }

    /// Current font request.
    pub fn font(&self) -> &FontRequest {
        &self.state().font
    }

    /// Set the text alignment.
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state_mut().text_align = align;
    }

    pub fn text_align(&self) -> TextAlign {
        self.state().text_align
    }

    /// Set the text baseline.
    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state_mut().text_baseline = baseline;
    }

    pub fn text_baseline(&self) -> TextBaseline {
        self.state().text_baseline
    }

    /// Measure text with the current font. All metrics are zero when there
    /// is no glyph provider or a glyph is missing.
    pub fn measure_text(&self, text: &str) -> TextMetrics {
        measure_text(self.glyph_provider.as_deref(), text, &self.state().font)
    }

    /// Fill text at the specified position.
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        if let Some(path) = self.text_path(text, x, y, None) {
            self.fill_device_path(&path, CanvasFillRule::NonZero);
        }
    }

    /// Fill text, squeezed horizontally to fit `max_width`.
    pub fn fill_text_max_width(&mut self, text: &str, x: f64, y: f64, max_width: f64) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {} {}", text, x, y, max_width);
        if let Some(path) = self.text_path(text, x, y, Some(max_width)) {
            self.fill_device_path(&path, CanvasFillRule::NonZero);
        }
    }

    /// Stroke text at the specified position.
    pub fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        log::debug!(target: "canvas", "strokeText \"{}\" {} {}", text, x, y);
        if let Some(path) = self.text_path(text, x, y, None) {
            self.stroke_device_path(&path);
        }
    }

    /// Stroke text, squeezed horizontally to fit `max_width`.
    pub fn stroke_text_max_width(&mut self, text: &str, x: f64, y: f64, max_width: f64) {
        log::debug!(target: "canvas", "strokeText \"{}\" {} {} {}", text, x, y, max_width);
        if let Some(path) = self.text_path(text, x, y, Some(max_width)) {
            self.stroke_device_path(&path);
        }
    }

    /// Device-space outline of `text` placed at `(x, y)` with the current
    /// alignment and baseline.
    fn text_path(&self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Option<Path> {
        if max_width.is_some_and(|w| !(w > 0.0)) {
            return None;
        }
        let state = self.state();
        let Some(provider) = self.glyph_provider.as_deref() else {
            log::warn!(target: "canvas", "text not drawn: no glyph provider");
            return None;
        };
        let Some(layout) = layout_text(provider, text, &state.font) else {
            log::warn!(target: "canvas", "text not drawn: missing glyph in {:?}", text);
            return None;
        };

        let squeeze = match max_width {
            Some(max_width) if layout.width > max_width => max_width / layout.width,
            _ => 1.0,
        };
        let dx = calculate_text_x_offset(layout.width, state.text_align) * squeeze;
        let dy = calculate_text_y_offset(&layout.metrics, state.text_baseline);
        let placement = Matrix::scaling(squeeze, 1.0)
            .then(&Matrix::translation(x + dx, y + dy))
            .then(&state.transform);
        Some(layout.outline().transformed(&placement))
    }
}

#[cfg(test)]
mod tests {
    use crate::context::Canvas2dContext;
    use crate::font_parser::FontRequest;
    use crate::path::Path;
    use crate::style::{TextAlign, TextBaseline};
    use crate::text::{Glyph, GlyphProvider};
    use rstest::rstest;
    use std::sync::Arc;

    /// Every ASCII letter is a box of half the font size sitting on the
    /// baseline.
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

    fn ctx() -> Canvas2dContext {
        let mut ctx = Canvas2dContext::builder(40, 40)
            .with_glyph_provider(Arc::new(BoxGlyphs))
            .build()
            .unwrap();
        ctx.set_font("10px sans-serif").unwrap();
        ctx
    }

    fn alpha(ctx: &Canvas2dContext, x: i32, y: i32) -> u8 {
        ctx.get_image_data(x, y, 1, 1)[3]
    }

    #[rstest]
    #[case(TextAlign::Left, 10)]
    #[case(TextAlign::Center, 5)]
    #[case(TextAlign::End, 0)]
    fn test_fill_text_alignment(#[case] align: TextAlign, #[case] left: i32) {
        let mut ctx = ctx();
        ctx.set_text_align(align);
        ctx.fill_text("ab", 10.0, 20.0);
        assert_eq!(alpha(&ctx, left, 15), 255);
        assert_eq!(alpha(&ctx, left + 9, 19), 255);
        assert_eq!(alpha(&ctx, left + 10, 19), 0);
        assert_eq!(alpha(&ctx, left, 20), 0);
        assert_eq!(alpha(&ctx, left, 14), 0);
    }

    #[test]
    fn test_fill_text_top_baseline() {
        let mut ctx = ctx();
        ctx.set_text_baseline(TextBaseline::Top);
        ctx.fill_text("a", 0.0, 0.0);
        // The glyph box spans [ascent - 5, ascent) with ascent 8.
        assert_eq!(alpha(&ctx, 1, 3), 255);
        assert_eq!(alpha(&ctx, 1, 7), 255);
        assert_eq!(alpha(&ctx, 1, 8), 0);
    }

    #[test]
    fn test_missing_glyph_draws_nothing() {
        let mut ctx = ctx();
        ctx.fill_text("a1", 10.0, 20.0);
        ctx.stroke_text("a1", 10.0, 20.0);
        assert!(ctx.image().iter().all(|&b| b == 0));
        assert_eq!(ctx.measure_text("a1").width, 0.0);
        assert_eq!(ctx.measure_text("abc").width, 15.0);
    }

    #[test]
    fn test_no_provider_measures_zero() {
        let mut ctx = Canvas2dContext::new(10, 10).unwrap();
        assert_eq!(ctx.measure_text("hello").width, 0.0);
        ctx.fill_text("hello", 0.0, 10.0);
        assert!(ctx.image().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_text_max_width_squeezes() {
        let mut ctx = ctx();
        ctx.fill_text_max_width("abcd", 0.0, 10.0, 10.0);
        assert_eq!(alpha(&ctx, 9, 8), 255);
        assert_eq!(alpha(&ctx, 10, 8), 0);
    }

    #[test]
    fn test_text_follows_transform() {
        let mut ctx = ctx();
        ctx.translate(20.0, 0.0);
        ctx.fill_text("a", 0.0, 30.0);
        assert_eq!(alpha(&ctx, 20, 27), 255);
        assert_eq!(alpha(&ctx, 19, 27), 0);
    }

    #[test]
    fn test_set_font() {
        let mut ctx = ctx();
        ctx.set_font("bold 16px serif").unwrap();
        assert_eq!(ctx.font().size_px, 16.0);
        assert!(ctx.set_font("serif").is_err());
        assert_eq!(ctx.font().families, vec!["serif"]);
    }
}
