//! Canvas 2D rendering context implementation.

mod drawing;
mod image_ops;
mod path_ops;
mod text_rendering;
mod transform;

use crate::blur_cache::{BlurCache, SharedBlurCache};
use crate::color::{parse_color, CanvasColor};
use crate::config::CanvasConfig;
use crate::drawing_state::{DrawingState, FrameStack};
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{CanvasImageDataRef, RadialGradientParams, Shadow};
use crate::gradient::CanvasGradient;
use crate::pattern::{CanvasPattern, Repetition};
use crate::style::{CanvasFillRule, FillStyle, ImageFilter, LineCap, LineJoin};
use crate::text::GlyphProvider;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Builder for Canvas2dContext.
pub struct Canvas2dContextBuilder {
    width: u32,
    height: u32,
    config: CanvasConfig,
    glyph_provider: Option<Arc<dyn GlyphProvider>>,
    blur_cache: Option<SharedBlurCache>,
    fill_rule: CanvasFillRule,
}

impl Canvas2dContextBuilder {
    /// Create a new builder with specified dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            config: CanvasConfig::default(),
            glyph_provider: None,
            blur_cache: None,
            fill_rule: CanvasFillRule::default(),
        }
    }

    pub fn with_config(mut self, config: CanvasConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the source of glyph outlines used by text operations.
    pub fn with_glyph_provider(mut self, provider: Arc<dyn GlyphProvider>) -> Self {
        self.glyph_provider = Some(provider);
        self
    }

    /// Share a shadow blur cache with other contexts.
    pub fn with_blur_cache(mut self, cache: SharedBlurCache) -> Self {
        self.blur_cache = Some(cache);
        self
    }

    /// Fill rule the context starts with and returns to on `reset`.
    pub fn with_fill_rule(mut self, fill_rule: CanvasFillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Build the Canvas2dContext.
    pub fn build(self) -> Canvas2dResult<Canvas2dContext> {
        let Self {
            width,
            height,
            config,
            glyph_provider,
            blur_cache,
            fill_rule,
        } = self;
        if width == 0 || height == 0 || width > config.max_dimension || height > config.max_dimension
        {
            return Err(Canvas2dError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        let blur_cache =
            blur_cache.unwrap_or_else(|| BlurCache::shared(config.blur_cache_max_bytes));
        let initial_state = DrawingState {
            fill_rule,
            ..DrawingState::default()
        };

        Ok(Canvas2dContext {
            width,
            height,
            pixmap,
            frames: FrameStack::new(initial_state.clone()),
            initial_state,
            config,
            glyph_provider,
            blur_cache,
        })
    }
}

/// Canvas 2D rendering context.
///
/// Owns the pixel buffer, the frame stack and the current path. Path
/// geometry is transformed into device space as it is added; line widths and
/// dash lengths stay in user space until stroke time.
pub struct Canvas2dContext {
    /// Width of the canvas in pixels.
    pub(crate) width: u32,
    /// Height of the canvas in pixels.
    pub(crate) height: u32,
    /// Premultiplied pixel buffer.
    pub(crate) pixmap: Pixmap,
    pub(crate) frames: FrameStack,
    /// State installed by `reset`.
    initial_state: DrawingState,
    pub(crate) config: CanvasConfig,
    pub(crate) glyph_provider: Option<Arc<dyn GlyphProvider>>,
    pub(crate) blur_cache: SharedBlurCache,
}

impl std::fmt::Debug for Canvas2dContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas2dContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.frames.depth())
            .field("config", &self.config)
            .field("glyph_provider", &self.glyph_provider.is_some())
            .finish()
    }
}

impl Canvas2dContext {
    /// Create a new Canvas2dContext with the specified dimensions and
    /// default configuration.
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        Self::builder(width, height).build()
    }

    /// Create a new builder for more configuration options.
    pub fn builder(width: u32, height: u32) -> Canvas2dContextBuilder {
        Canvas2dContextBuilder::new(width, height)
    }

    /// Get canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The shadow blur cache used by this context.
    pub fn blur_cache(&self) -> &SharedBlurCache {
        &self.blur_cache
    }

    /// The active drawing state.
    pub fn state(&self) -> &DrawingState {
        self.frames.current()
    }

    pub(crate) fn state_mut(&mut self) -> &mut DrawingState {
        self.frames.current_mut()
    }

    /// Save the current drawing state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.frames.save();
    }

    /// Restore the previously saved drawing state.
    ///
    /// Does nothing when no state was saved.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if !self.frames.restore() {
            log::trace!(target: "canvas", "restore ignored: no saved state");
        }
    }

    /// Reset the rendering context to its default state.
    ///
    /// This clears the canvas to transparent, resets all drawing state
    /// (styles, transform, clip, path) and empties the state stack.
    pub fn reset(&mut self) {
        log::debug!(target: "canvas", "reset");
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.frames.reset(self.initial_state.clone());
    }

    // --- Style setters ---

    /// Set the fill style from a CSS color string.
    pub fn set_fill_style(&mut self, style: &str) -> Canvas2dResult<()> {
        let color = parse_color(style)?;
        self.state_mut().fill_style = FillStyle::Color(color);
        Ok(())
    }

    /// Set the fill style from a CanvasColor.
    pub fn set_fill_style_color(&mut self, color: CanvasColor) {
        self.state_mut().fill_style = FillStyle::Color(color);
    }

    /// Set the stroke style from a CSS color string.
    pub fn set_stroke_style(&mut self, style: &str) -> Canvas2dResult<()> {
        let color = parse_color(style)?;
        self.state_mut().stroke_style = FillStyle::Color(color);
        Ok(())
    }

    /// Set the stroke style from a CanvasColor.
    pub fn set_stroke_style_color(&mut self, color: CanvasColor) {
        self.state_mut().stroke_style = FillStyle::Color(color);
    }

    pub fn fill_style(&self) -> &FillStyle {
        &self.state().fill_style
    }

    pub fn stroke_style(&self) -> &FillStyle {
        &self.state().stroke_style
    }

    /// Set the line width.
    /// Ignores non-finite values and values <= 0.
    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state_mut().line_width = width;
        }
    }

    pub fn line_width(&self) -> f64 {
        self.state().line_width
    }

    /// Set the line cap style.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state_mut().line_cap = cap;
    }

    pub fn line_cap(&self) -> LineCap {
        self.state().line_cap
    }

    /// Set the line join style.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state_mut().line_join = join;
    }

    pub fn line_join(&self) -> LineJoin {
        self.state().line_join
    }

    /// Set the miter limit.
    /// Ignores non-finite values and values <= 0.
    pub fn set_miter_limit(&mut self, limit: f64) {
        if limit.is_finite() && limit > 0.0 {
            self.state_mut().miter_limit = limit;
        }
    }

    pub fn miter_limit(&self) -> f64 {
        self.state().miter_limit
    }

    /// Set the global alpha (opacity).
    /// Ignores non-finite values and values outside [0.0, 1.0].
    pub fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state_mut().global_alpha = alpha;
        }
    }

    pub fn global_alpha(&self) -> f64 {
        self.state().global_alpha
    }

    /// Set the global composite operation.
    /// Unknown tokens are ignored and the previous operation is kept.
    /// Returns true if the value was accepted.
    pub fn set_global_composite_operation(&mut self, op: &str) -> bool {
        match op.parse() {
            Ok(operation) => {
                self.state_mut().global_composite_operation = operation;
                true
            }
            Err(_) => {
                log::debug!(target: "canvas", "ignoring composite operation {:?}", op);
                false
            }
        }
    }

    /// Current composite operation as its canvas token.
    pub fn global_composite_operation(&self) -> &'static str {
        self.state().global_composite_operation.as_str()
    }

    /// Set the line dash pattern.
    /// Ignored if any value is non-finite or negative. Odd-length arrays are
    /// repeated to make them even.
    pub fn set_line_dash(&mut self, mut segments: Vec<f64>) {
        if segments.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return;
        }
        if segments.len() % 2 == 1 {
            segments.extend_from_within(..);
        }
        self.state_mut().line_dash = segments;
    }

    /// Get the current line dash pattern.
    pub fn get_line_dash(&self) -> &[f64] {
        &self.state().line_dash
    }

    /// Set the line dash offset.
    /// Ignores non-finite values.
    pub fn set_line_dash_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.state_mut().line_dash_offset = offset;
        }
    }

    pub fn line_dash_offset(&self) -> f64 {
        self.state().line_dash_offset
    }

    /// Set the fill rule used by `fill` and `clip`.
    pub fn set_fill_rule(&mut self, fill_rule: CanvasFillRule) {
        self.state_mut().fill_rule = fill_rule;
    }

    pub fn fill_rule(&self) -> CanvasFillRule {
        self.state().fill_rule
    }

    /// Set the resampling filter for images and patterns.
    pub fn set_image_filter(&mut self, filter: ImageFilter) {
        self.state_mut().image_filter = filter;
    }

    pub fn image_filter(&self) -> ImageFilter {
        self.state().image_filter
    }

    // --- Shadow ---

    /// Ignores non-finite values.
    pub fn set_shadow_offset_x(&mut self, offset: f64) {
        if offset.is_finite() {
            self.state_mut().shadow.offset_x = offset;
        }
    }

    /// Ignores non-finite values.
    pub fn set_shadow_offset_y(&mut self, offset: f64) {
        if offset.is_finite() {
            self.state_mut().shadow.offset_y = offset;
        }
    }

    /// Ignores non-finite and negative values.
    pub fn set_shadow_blur(&mut self, blur: f64) {
        if blur.is_finite() && blur >= 0.0 {
            self.state_mut().shadow.blur = blur;
        }
    }

    /// Set the shadow color from a CSS color string.
    pub fn set_shadow_color(&mut self, color: &str) -> Canvas2dResult<()> {
        let color = parse_color(color)?;
        self.state_mut().shadow.color = color;
        Ok(())
    }

    pub fn set_shadow_color_value(&mut self, color: CanvasColor) {
        self.state_mut().shadow.color = color;
    }

    pub fn shadow(&self) -> Shadow {
        self.state().shadow
    }

    // --- Gradients ---

    /// Create a linear gradient.
    pub fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> CanvasGradient {
        CanvasGradient::new_linear(x0, y0, x1, y1)
    }

    /// Create a radial gradient.
    pub fn create_radial_gradient(&self, params: &RadialGradientParams) -> CanvasGradient {
        CanvasGradient::new_radial(params)
    }

    /// Set the fill style to a gradient.
    pub fn set_fill_style_gradient(&mut self, gradient: CanvasGradient) {
        self.state_mut().fill_style = FillStyle::Gradient(Arc::new(gradient));
    }

    /// Set the stroke style to a gradient.
    pub fn set_stroke_style_gradient(&mut self, gradient: CanvasGradient) {
        self.state_mut().stroke_style = FillStyle::Gradient(Arc::new(gradient));
    }

    // --- Patterns ---

    /// Create a pattern from non-premultiplied RGBA pixel data.
    ///
    /// `repetition` is one of "repeat", "repeat-x", "repeat-y" or
    /// "no-repeat". The pattern samples with the current image filter.
    pub fn create_pattern(
        &self,
        image: CanvasImageDataRef,
        repetition: &str,
    ) -> Canvas2dResult<Arc<CanvasPattern>> {
        let rep = repetition.parse::<Repetition>()?;
        let mut pattern = CanvasPattern::new(image, rep)?;
        pattern.set_filter(self.state().image_filter);
        Ok(Arc::new(pattern))
    }

    /// Set the fill style to a pattern.
    pub fn set_fill_style_pattern(&mut self, pattern: Arc<CanvasPattern>) {
        self.state_mut().fill_style = FillStyle::Pattern(pattern);
    }

    /// Set the stroke style to a pattern.
    pub fn set_stroke_style_pattern(&mut self, pattern: Arc<CanvasPattern>) {
        self.state_mut().stroke_style = FillStyle::Pattern(pattern);
    }
}
