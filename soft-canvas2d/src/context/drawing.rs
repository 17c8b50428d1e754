//! Fill, stroke, clip, and paint helper operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::color::CanvasColor;
use crate::composite::CompositeOperation;
use crate::flatten::flatten;
use crate::geometry::{RectParams, Shadow};
use crate::painter::{self, intersect_masks, AlphaOverPainter, PaintParams, PaintSource};
use crate::path::Path;
use crate::raster::{PixelRect, Rasterizer};
use crate::stroke::{DashConverter, LineStroker, StrokeStyle};
use crate::style::{CanvasFillRule, FillStyle};
use std::sync::Arc;
use tiny_skia::Mask;

impl Canvas2dContext {
    // --- Clipping ---

    /// Intersect the clip region with the current path, using the current
    /// fill rule.
    pub fn clip(&mut self) {
        log::debug!(target: "canvas", "clip");
        self.clip_with_rule(self.state().fill_rule);
    }

    /// Intersect the clip region with the current path.
    ///
    /// The path is rasterized into a fresh mask that is multiplied with the
    /// existing one. The clip lasts until the state is restored.
    pub fn clip_with_rule(&mut self, fill_rule: CanvasFillRule) {
        log::debug!(target: "canvas", "clip_with_rule {:?}", fill_rule);
        let path = self.state().path.clone();
        self.clip_device_path(&path, fill_rule);
    }

    /// Intersect the clip region with a user-space path.
    pub fn clip_path(&mut self, path: &Path, fill_rule: CanvasFillRule) {
        log::debug!(target: "canvas", "clipPath {:?}", fill_rule);
        let device = path.transformed(&self.state().transform);
        self.clip_device_path(&device, fill_rule);
    }

    fn clip_device_path(&mut self, path: &Path, fill_rule: CanvasFillRule) {
        let Some(mut mask) = Mask::new(self.width, self.height) else {
            return;
        };
        let mut rasterizer = self.flatten_fill(path);
        rasterizer.rasterize(
            fill_rule,
            PixelRect::from_size(self.width, self.height),
            &mut AlphaOverPainter::new(&mut mask),
        );
        let state = self.state_mut();
        if let Some(previous) = &state.clip {
            intersect_masks(&mut mask, previous);
        }
        state.clip = Some(Arc::new(mask));
    }

    // --- Drawing operations ---

    /// Fill the current path with the current fill rule.
    pub fn fill(&mut self) {
        log::debug!(target: "canvas", "fill");
        self.fill_with_rule(self.state().fill_rule);
    }

    /// Fill the current path with the specified fill rule.
    ///
    /// Open subpaths are closed implicitly. The path is kept, so a stroke
    /// may follow.
    pub fn fill_with_rule(&mut self, fill_rule: CanvasFillRule) {
        log::debug!(target: "canvas", "fill_with_rule {:?}", fill_rule);
        let path = self.state().path.clone();
        self.fill_device_path(&path, fill_rule);
    }

    /// Stroke the current path with the current stroke style.
    pub fn stroke(&mut self) {
        log::debug!(target: "canvas", "stroke");
        let path = self.state().path.clone();
        self.stroke_device_path(&path);
    }

    /// Fill then stroke the current path.
    pub fn fill_stroke(&mut self) {
        log::debug!(target: "canvas", "fillStroke");
        let path = self.state().path.clone();
        self.fill_device_path(&path, self.state().fill_rule);
        self.stroke_device_path(&path);
    }

    /// Fill a user-space path without touching the current path.
    pub fn fill_path(&mut self, path: &Path, fill_rule: CanvasFillRule) {
        log::debug!(target: "canvas", "fillPath {:?}", fill_rule);
        let device = path.transformed(&self.state().transform);
        self.fill_device_path(&device, fill_rule);
    }

    /// Stroke a user-space path without touching the current path.
    pub fn stroke_path(&mut self, path: &Path) {
        log::debug!(target: "canvas", "strokePath");
        let device = path.transformed(&self.state().transform);
        self.stroke_device_path(&device);
    }

    /// Fill a rectangle. The current path is left alone.
    pub fn fill_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "fillRect {} {} {} {}", params.x, params.y, params.width, params.height);
        let rect = self.device_rect(params);
        self.fill_device_path(&rect, CanvasFillRule::NonZero);
    }

    /// Stroke a rectangle. The current path is left alone.
    pub fn stroke_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "strokeRect {} {} {} {}", params.x, params.y, params.width, params.height);
        let rect = self.device_rect(params);
        self.stroke_device_path(&rect);
    }

    /// Clear a rectangle to transparent black, honoring transform and clip.
    pub fn clear_rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "clearRect {} {} {} {}", params.x, params.y, params.width, params.height);
        let rect = self.device_rect(params);
        let mut rasterizer = self.flatten_fill(&rect);
        let source = PaintSource::Solid([0.0, 0.0, 0.0, 1.0]);
        let state = self.frames.current();
        let paint_params = PaintParams {
            source: &source,
            global_alpha: 1.0,
            operation: CompositeOperation::DestinationOut,
            shadow: Shadow::default(),
            clip: state.clip.as_deref(),
            blur_cache: None,
        };
        painter::paint(&mut rasterizer, CanvasFillRule::NonZero, &mut self.pixmap, paint_params);
    }

    /// Clear the whole canvas to transparent black.
    pub fn clear(&mut self) {
        log::debug!(target: "canvas", "clear");
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Fill the whole canvas with `color`, ignoring transform, clip and
    /// compositing.
    pub fn clear_with_color(&mut self, color: CanvasColor) {
        log::debug!(target: "canvas", "clearWithColor {:?}", color);
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    // --- Private paint helpers ---

    /// Closed rectangle in device space.
    pub(crate) fn device_rect(&self, params: &RectParams) -> Path {
        let mut rect = Path::new();
        rect.add_rect(params.x, params.y, params.width, params.height);
        rect.transformed(&self.state().transform)
    }

    pub(crate) fn flatten_fill(&self, path: &Path) -> Rasterizer {
        let mut rasterizer = Rasterizer::new();
        flatten(
            path,
            &mut rasterizer,
            self.state().transform.scale_factor(),
            &self.config.flatten_options(),
        );
        rasterizer
    }

    /// Stroke outline of a device-space path.
    pub(crate) fn flatten_stroke(&self, path: &Path) -> Rasterizer {
        let state = self.state();
        let scale = state.transform.scale_factor();
        let options = self.config.flatten_options();
        let style = StrokeStyle {
            width: state.line_width * scale,
            cap: state.line_cap,
            join: state.line_join,
            miter_limit: state.miter_limit,
        };
        let dashes: Vec<f64> = state.line_dash.iter().map(|d| d * scale).collect();

        let mut rasterizer = Rasterizer::new();
        let mut stroker =
            LineStroker::new(&style, &mut rasterizer).with_chord_error(options.arc_chord_error);
        let dashed = DashConverter::new(&dashes, state.line_dash_offset * scale, &mut stroker)
            .map(|mut dasher| flatten(path, &mut dasher, scale, &options))
            .is_some();
        if !dashed {
            flatten(path, &mut stroker, scale, &options);
        }
        drop(stroker);
        rasterizer
    }

    pub(crate) fn fill_device_path(&mut self, path: &Path, fill_rule: CanvasFillRule) {
        let style = self.state().fill_style.clone();
        let Some(source) = self.paint_source(&style) else {
            return;
        };
        let mut rasterizer = self.flatten_fill(path);
        self.paint_rasterized(&mut rasterizer, fill_rule, &source);
    }

    pub(crate) fn stroke_device_path(&mut self, path: &Path) {
        let style = self.state().stroke_style.clone();
        let Some(source) = self.paint_source(&style) else {
            return;
        };
        let mut rasterizer = self.flatten_stroke(path);
        self.paint_rasterized(&mut rasterizer, CanvasFillRule::NonZero, &source);
    }

    /// Resolve a fill style against the current transform.
    ///
    /// Returns `None`, so nothing is painted, when a gradient or pattern
    /// cannot be mapped back from device space.
    pub(crate) fn paint_source(&self, style: &FillStyle) -> Option<PaintSource> {
        let transform = self.state().transform;
        match style {
            FillStyle::Color(color) => Some(PaintSource::Solid(color.premultiplied())),
            FillStyle::Gradient(gradient) => match transform.inverse() {
                Some(inverse) => Some(PaintSource::Gradient {
                    gradient: gradient.clone(),
                    inverse,
                }),
                None => {
                    log::warn!(target: "canvas", "gradient not painted: transform is not invertible");
                    None
                }
            },
            FillStyle::Pattern(pattern) => match pattern.transform().then(&transform).inverse() {
                Some(inverse) => Some(PaintSource::Pattern {
                    pattern: pattern.clone(),
                    inverse,
                }),
                None => {
                    log::warn!(target: "canvas", "pattern not painted: transform is not invertible");
                    None
                }
            },
        }
    }

    /// Paint a recorded polygon with the current alpha, operator, shadow and
    /// clip. Returns the device area that may have changed.
    pub(crate) fn paint_rasterized(
        &mut self,
        rasterizer: &mut Rasterizer,
        fill_rule: CanvasFillRule,
        source: &PaintSource,
    ) -> Option<PixelRect> {
        let state = self.frames.current();
        let params = PaintParams {
            source,
            global_alpha: state.global_alpha as f32,
            operation: state.global_composite_operation,
            shadow: state.shadow,
            clip: state.clip.as_deref(),
            blur_cache: Some(&*self.blur_cache),
        };
        painter::paint(rasterizer, fill_rule, &mut self.pixmap, params)
    }
}
