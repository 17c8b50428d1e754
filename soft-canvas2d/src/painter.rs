//! Span painting and compositing.
//!
//! A [`Painter`] turns rasterizer spans into pixels. Plain source-over
//! without a shadow blends straight into the destination. Every other case
//! paints into a premultiplied scratch layer with copy semantics first and
//! then composites the layer, preceded by its blurred shadow, with the
//! operator's factor table.

use crate::blur::{stack_blur, AlphaPlane};
use crate::blur_cache::BlurCache;
use crate::color::{self, Premultiplied, TRANSPARENT};
use crate::composite::CompositeOperation;
use crate::geometry::Shadow;
use crate::gradient::CanvasGradient;
use crate::matrix::Matrix;
use crate::pattern::CanvasPattern;
use crate::raster::{PixelRect, Rasterizer, Span, SpanPainter, FULL_COVERAGE};
use crate::style::CanvasFillRule;
use std::sync::{Arc, Mutex};
use tiny_skia::{Mask, Pixmap};

/// Where painted colors come from.
///
/// Gradients and patterns carry the device-to-source inverse transform so
/// that every pixel center can be mapped back before sampling.
#[derive(Debug, Clone)]
pub enum PaintSource {
    Solid(Premultiplied),
    Gradient {
        gradient: Arc<CanvasGradient>,
        inverse: Matrix,
    },
    Pattern {
        pattern: Arc<CanvasPattern>,
        inverse: Matrix,
    },
}

impl PaintSource {
    /// Color at the center of device pixel `(x, y)`.
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> Premultiplied {
        match self {
            PaintSource::Solid(color) => *color,
            PaintSource::Gradient { gradient, inverse } => {
                let (u, v) = inverse.transform_point(x as f64 + 0.5, y as f64 + 0.5);
                gradient.color_at(u, v)
            }
            PaintSource::Pattern { pattern, inverse } => {
                let (u, v) = inverse.transform_point(x as f64 + 0.5, y as f64 + 0.5);
                pattern.sample(u, v)
            }
        }
    }
}

/// Per-draw painting parameters.
#[derive(Clone, Copy)]
pub struct PaintParams<'a> {
    pub source: &'a PaintSource,
    pub global_alpha: f32,
    pub operation: CompositeOperation,
    pub shadow: Shadow,
    pub clip: Option<&'a Mask>,
    pub blur_cache: Option<&'a Mutex<BlurCache>>,
}

impl std::fmt::Debug for PaintParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintParams")
            .field("source", self.source)
            .field("global_alpha", &self.global_alpha)
            .field("operation", &self.operation)
            .field("shadow", &self.shadow)
            .field("clip", &self.clip.is_some())
            .finish()
    }
}

struct Scratch {
    bounds: PixelRect,
    pixels: Vec<Premultiplied>,
}

impl Scratch {
    fn new(bounds: PixelRect) -> Self {
        Self {
            bounds,
            pixels: vec![TRANSPARENT; bounds.width() as usize * bounds.height() as usize],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y - self.bounds.y0) as usize * self.bounds.width() as usize + (x - self.bounds.x0) as usize
    }

    #[inline]
    fn get(&self, x: i32, y: i32) -> Premultiplied {
        if self.bounds.contains(x, y) {
            self.pixels[self.index(x, y)]
        } else {
            TRANSPARENT
        }
    }
}

/// A blurred alpha plane placed at the shadow offset.
struct ShadowLayer {
    bounds: PixelRect,
    plane: Arc<AlphaPlane>,
    color: Premultiplied,
    dx: i32,
    dy: i32,
}

impl ShadowLayer {
    #[inline]
    fn get(&self, x: i32, y: i32) -> Premultiplied {
        let (sx, sy) = (x - self.dx, y - self.dy);
        if !self.bounds.contains(sx, sy) {
            return TRANSPARENT;
        }
        let alpha = self
            .plane
            .get((sx - self.bounds.x0) as u32, (sy - self.bounds.y0) as u32);
        color::scale(self.color, alpha as f32 / 255.0)
    }
}

/// Paints spans for one draw call.
pub struct Painter<'a> {
    pixmap: &'a mut Pixmap,
    params: PaintParams<'a>,
    canvas: PixelRect,
    raster_clip: PixelRect,
    scratch: Option<Scratch>,
    dirty: Option<PixelRect>,
}

impl<'a> Painter<'a> {
    /// Prepare to paint a shape whose spans fall within `bounds`.
    pub fn new(pixmap: &'a mut Pixmap, params: PaintParams<'a>, bounds: PixelRect) -> Self {
        let canvas = PixelRect::from_size(pixmap.width(), pixmap.height());
        let direct =
            params.operation == CompositeOperation::SourceOver && !params.shadow.is_visible();

        let (raster_clip, scratch) = if direct {
            (bounds.intersect(&canvas), None)
        } else {
            let mut area = canvas;
            if params.shadow.is_visible() {
                let (dx, dy) = shadow_offset(&params.shadow);
                area = canvas
                    .union(&canvas.translate(-dx, -dy))
                    .outset(params.shadow.blur_radius() as i32);
            }
            let area = bounds.intersect(&area);
            let scratch = (!area.is_empty()).then(|| Scratch::new(area));
            (area, scratch)
        };

        Self {
            pixmap,
            params,
            canvas,
            raster_clip,
            scratch,
            dirty: None,
        }
    }

    /// Rectangle the rasterizer should limit its spans to.
    pub fn raster_clip(&self) -> PixelRect {
        self.raster_clip
    }

    fn mark_dirty(&mut self, span: &Span) {
        let rect = PixelRect::new(span.x0, span.y, span.x1, span.y + 1);
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(&rect),
            None => rect,
        });
    }

    /// Composite any scratch layer into the destination and return the
    /// device rectangle that may have changed.
    pub fn finish(self) -> Option<PixelRect> {
        let Some(scratch) = &self.scratch else {
            if self.params.operation.is_confined() {
                return self.dirty;
            }
            // A non-confined operator with nothing inside the canvas still
            // affects the whole destination.
            let empty = Scratch::new(PixelRect::new(0, 0, 0, 0));
            composite_region(self.pixmap, &self.params, &empty, None, self.canvas);
            return Some(self.canvas);
        };

        let shadow = if self.params.shadow.is_visible() {
            Some(self.shadow_layer(scratch))
        } else {
            None
        };

        let region = if self.params.operation.is_confined() {
            let dirty = self.dirty?;
            let mut region = dirty;
            if let Some(shadow) = &shadow {
                let radius = self.params.shadow.blur_radius() as i32;
                region = region.union(&dirty.translate(shadow.dx, shadow.dy).outset(radius));
            }
            region.intersect(&self.canvas)
        } else {
            self.canvas
        };
        if region.is_empty() {
            return None;
        }

        composite_region(self.pixmap, &self.params, scratch, shadow.as_ref(), region);
        Some(region)
    }

    fn shadow_layer(&self, scratch: &Scratch) -> ShadowLayer {
        let shadow = &self.params.shadow;
        let radius = shadow.blur_radius();
        let bounds = scratch.bounds.outset(radius as i32);
        let mut plane = AlphaPlane::new(bounds.width(), bounds.height());
        for y in scratch.bounds.y0..scratch.bounds.y1 {
            for x in scratch.bounds.x0..scratch.bounds.x1 {
                let alpha = scratch.get(x, y)[3];
                let i = (y - bounds.y0) as usize * bounds.width() as usize + (x - bounds.x0) as usize;
                plane.data[i] = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }

        let plane = if radius == 0 {
            Arc::new(plane)
        } else {
            match self.params.blur_cache {
                Some(cache) => cache
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .blur(&plane, radius),
                None => Arc::new(stack_blur(&plane, radius)),
            }
        };

        let (dx, dy) = shadow_offset(shadow);
        ShadowLayer {
            bounds,
            plane,
            color: shadow.color.premultiplied(),
            dx,
            dy,
        }
    }
}

impl SpanPainter for Painter<'_> {
    fn paint_span(&mut self, span: Span) {
        let y = span.y;
        let x0 = span.x0.max(self.raster_clip.x0);
        let x1 = span.x1.min(self.raster_clip.x1);
        if x0 >= x1 || y < self.raster_clip.y0 || y >= self.raster_clip.y1 {
            return;
        }
        let span = Span { x0, x1, ..span };
        self.mark_dirty(&span);
        let alpha = span.alpha() * self.params.global_alpha;

        if let Some(scratch) = &mut self.scratch {
            for x in x0..x1 {
                let i = scratch.index(x, y);
                scratch.pixels[i] = color::scale(self.params.source.sample(x, y), alpha);
            }
            return;
        }

        let width = self.pixmap.width() as usize;
        let mask = self.params.clip;
        let data = self.pixmap.data_mut();
        for x in x0..x1 {
            let m = mask_alpha(mask, x, y);
            if m == 0.0 {
                continue;
            }
            let src = color::scale(self.params.source.sample(x, y), alpha * m);
            let offset = (y as usize * width + x as usize) * 4;
            let pixel = &mut data[offset..offset + 4];
            if src[3] >= 1.0 {
                color::store(pixel, src);
                continue;
            }
            let dst = color::load(pixel);
            color::store(pixel, CompositeOperation::SourceOver.blend(src, dst));
        }
    }
}

/// Blend shadow then source over `region` of the destination, gated by the
/// clip mask.
fn composite_region(
    pixmap: &mut Pixmap,
    params: &PaintParams,
    scratch: &Scratch,
    shadow: Option<&ShadowLayer>,
    region: PixelRect,
) {
    let op = params.operation;
    let width = pixmap.width() as usize;
    let data = pixmap.data_mut();
    for y in region.y0..region.y1 {
        for x in region.x0..region.x1 {
            let m = mask_alpha(params.clip, x, y);
            if m == 0.0 {
                continue;
            }
            let offset = (y as usize * width + x as usize) * 4;
            let pixel = &mut data[offset..offset + 4];
            let dst = color::load(pixel);
            let under = match shadow {
                Some(shadow) => op.blend(shadow.get(x, y), dst),
                None => dst,
            };
            let result = op.blend(scratch.get(x, y), under);
            let out = if m >= 1.0 {
                result
            } else {
                color::lerp(dst, result, m)
            };
            color::store(pixel, out);
        }
    }
}

#[inline]
fn mask_alpha(mask: Option<&Mask>, x: i32, y: i32) -> f32 {
    match mask {
        Some(mask) => {
            let i = y as usize * mask.width() as usize + x as usize;
            mask.data().get(i).map_or(0.0, |&a| a as f32 / 255.0)
        }
        None => 1.0,
    }
}

fn shadow_offset(shadow: &Shadow) -> (i32, i32) {
    let clamp = |v: f64| {
        if v.is_finite() {
            v.round().clamp(i16::MIN as f64, i16::MAX as f64) as i32
        } else {
            0
        }
    };
    (clamp(shadow.offset_x), clamp(shadow.offset_y))
}

/// Rasterize the recorded polygon and paint it. Returns the device area that
/// may have changed.
pub fn paint(
    rasterizer: &mut Rasterizer,
    fill_rule: CanvasFillRule,
    pixmap: &mut Pixmap,
    params: PaintParams,
) -> Option<PixelRect> {
    let bounds = rasterizer
        .bounds()
        .unwrap_or_else(|| PixelRect::new(0, 0, 0, 0));
    let mut painter = Painter::new(pixmap, params, bounds);
    let clip = painter.raster_clip();
    if !clip.is_empty() {
        rasterizer.rasterize(fill_rule, clip, &mut painter);
    }
    painter.finish()
}

/// Accumulates coverage into an 8-bit mask with the "over" operator:
/// `a + old * (1 - a)`.
pub struct AlphaOverPainter<'a> {
    mask: &'a mut Mask,
}

impl<'a> AlphaOverPainter<'a> {
    pub fn new(mask: &'a mut Mask) -> Self {
        Self { mask }
    }
}

impl SpanPainter for AlphaOverPainter<'_> {
    fn paint_span(&mut self, span: Span) {
        let (w, h) = (self.mask.width() as i32, self.mask.height() as i32);
        if span.y < 0 || span.y >= h {
            return;
        }
        let a = (span.coverage as u32 * 255 + FULL_COVERAGE as u32 / 2) / FULL_COVERAGE as u32;
        let row = span.y as usize * w as usize;
        let data = self.mask.data_mut();
        for x in span.x0.max(0)..span.x1.min(w) {
            let old = data[row + x as usize] as u32;
            data[row + x as usize] = (a + (old * (255 - a) + 127) / 255).min(255) as u8;
        }
    }
}

/// Multiply `mask` by `other` in place.
pub fn intersect_masks(mask: &mut Mask, other: &Mask) {
    for (a, &b) in mask.data_mut().iter_mut().zip(other.data().iter()) {
        *a = ((*a as u32 * b as u32 + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CanvasColor;
    use crate::flatten::Flattener;
    use rstest::rstest;

    fn rect(r: &mut Rasterizer, x0: f64, y0: f64, x1: f64, y1: f64) {
        r.move_to(x0, y0);
        r.line_to(x1, y0);
        r.line_to(x1, y1);
        r.line_to(x0, y1);
        r.close();
    }

    fn params(source: &PaintSource, operation: CompositeOperation) -> PaintParams<'_> {
        PaintParams {
            source,
            global_alpha: 1.0,
            operation,
            shadow: Shadow::default(),
            clip: None,
            blur_cache: None,
        }
    }

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * pixmap.width() + x) * 4) as usize;
        let d = pixmap.data();
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }

    fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height).unwrap();
        for px in pixmap.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        pixmap
    }

    #[test]
    fn test_direct_source_over_replaces_opaque() {
        let mut pixmap = filled(10, 10, [0, 0, 255, 255]);
        let source = PaintSource::Solid([1.0, 0.0, 0.0, 1.0]);
        let mut r = Rasterizer::new();
        rect(&mut r, 2.0, 2.0, 6.0, 6.0);
        let dirty = paint(
            &mut r,
            CanvasFillRule::NonZero,
            &mut pixmap,
            params(&source, CompositeOperation::SourceOver),
        );
        assert_eq!(dirty, Some(PixelRect::new(2, 2, 6, 6)));
        assert_eq!(pixel(&pixmap, 3, 3), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 1, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn test_global_alpha_blends() {
        let mut pixmap = filled(4, 4, [0, 0, 255, 255]);
        let source = PaintSource::Solid([1.0, 0.0, 0.0, 1.0]);
        let mut p = params(&source, CompositeOperation::SourceOver);
        p.global_alpha = 0.5;
        let mut r = Rasterizer::new();
        rect(&mut r, 0.0, 0.0, 4.0, 4.0);
        paint(&mut r, CanvasFillRule::NonZero, &mut pixmap, p);
        assert_eq!(pixel(&pixmap, 1, 1), [128, 0, 128, 255]);
    }

    #[test]
    fn test_copy_clears_outside_shape() {
        let mut pixmap = filled(10, 10, [0, 0, 255, 255]);
        let source = PaintSource::Solid([0.5, 0.0, 0.0, 0.5]);
        let mut r = Rasterizer::new();
        rect(&mut r, 2.0, 2.0, 6.0, 6.0);
        let dirty = paint(
            &mut r,
            CanvasFillRule::NonZero,
            &mut pixmap,
            params(&source, CompositeOperation::Copy),
        );
        assert_eq!(dirty, Some(PixelRect::from_size(10, 10)));
        assert_eq!(pixel(&pixmap, 3, 3), [128, 0, 0, 128]);
        assert_eq!(pixel(&pixmap, 8, 8), [0, 0, 0, 0]);
    }

    #[rstest]
    #[case(CompositeOperation::DestinationOut, [0, 0, 0, 0], [0, 0, 255, 255])]
    #[case(CompositeOperation::SourceAtop, [255, 0, 0, 255], [0, 0, 255, 255])]
    #[case(CompositeOperation::DestinationIn, [0, 0, 255, 255], [0, 0, 0, 0])]
    #[case(CompositeOperation::Xor, [0, 0, 0, 0], [0, 0, 255, 255])]
    fn test_operator_inside_and_outside(
        #[case] op: CompositeOperation,
        #[case] inside: [u8; 4],
        #[case] outside: [u8; 4],
    ) {
        let mut pixmap = filled(8, 8, [0, 0, 255, 255]);
        let source = PaintSource::Solid([1.0, 0.0, 0.0, 1.0]);
        let mut r = Rasterizer::new();
        rect(&mut r, 0.0, 0.0, 4.0, 4.0);
        paint(&mut r, CanvasFillRule::NonZero, &mut pixmap, params(&source, op));
        assert_eq!(pixel(&pixmap, 1, 1), inside);
        assert_eq!(pixel(&pixmap, 6, 6), outside);
    }

    #[test]
    fn test_clip_mask_gates_paint() {
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        let mut mask = Mask::new(8, 8).unwrap();
        {
            let mut r = Rasterizer::new();
            rect(&mut r, 0.0, 0.0, 4.0, 8.0);
            r.rasterize(
                CanvasFillRule::NonZero,
                PixelRect::from_size(8, 8),
                &mut AlphaOverPainter::new(&mut mask),
            );
        }
        let source = PaintSource::Solid([0.0, 1.0, 0.0, 1.0]);
        for op in [CompositeOperation::SourceOver, CompositeOperation::Copy] {
            let mut p = params(&source, op);
            p.clip = Some(&mask);
            let mut r = Rasterizer::new();
            rect(&mut r, 0.0, 0.0, 8.0, 8.0);
            paint(&mut r, CanvasFillRule::NonZero, &mut pixmap, p);
            assert_eq!(pixel(&pixmap, 1, 1), [0, 255, 0, 255], "{}", op);
            assert_eq!(pixel(&pixmap, 6, 1), [0, 0, 0, 0], "{}", op);
        }
    }

    #[test]
    fn test_hard_shadow_offset() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        let source = PaintSource::Solid([1.0, 0.0, 0.0, 1.0]);
        let mut p = params(&source, CompositeOperation::SourceOver);
        p.shadow = Shadow {
            offset_x: 5.0,
            offset_y: 5.0,
            blur: 0.0,
            color: CanvasColor::BLACK,
        };
        let mut r = Rasterizer::new();
        rect(&mut r, 2.0, 2.0, 8.0, 8.0);
        let dirty = paint(&mut r, CanvasFillRule::NonZero, &mut pixmap, p);
        assert_eq!(dirty, Some(PixelRect::new(2, 2, 13, 13)));
        assert_eq!(pixel(&pixmap, 3, 3), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 10, 10), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 15, 15), [0, 0, 0, 0]);
    }

    #[test]
    fn test_shadow_of_offscreen_shape_is_visible() {
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        let source = PaintSource::Solid([1.0, 0.0, 0.0, 1.0]);
        let mut p = params(&source, CompositeOperation::SourceOver);
        p.shadow = Shadow {
            offset_x: 20.0,
            offset_y: 0.0,
            blur: 0.0,
            color: CanvasColor::BLACK,
        };
        let mut r = Rasterizer::new();
        rect(&mut r, -18.0, 2.0, -14.0, 6.0);
        paint(&mut r, CanvasFillRule::NonZero, &mut pixmap, p);
        assert_eq!(pixel(&pixmap, 3, 3), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 7, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn test_blurred_shadow_uses_cache() {
        let cache = Mutex::new(BlurCache::new(1 << 20));
        let source = PaintSource::Solid([1.0, 0.0, 0.0, 1.0]);
        let mut p = params(&source, CompositeOperation::SourceOver);
        p.shadow = Shadow {
            offset_x: 0.0,
            offset_y: 0.0,
            blur: 3.0,
            color: CanvasColor::BLACK,
        };
        p.blur_cache = Some(&cache);
        for _ in 0..2 {
            let mut pixmap = Pixmap::new(30, 30).unwrap();
            let mut r = Rasterizer::new();
            rect(&mut r, 10.0, 10.0, 20.0, 20.0);
            paint(&mut r, CanvasFillRule::NonZero, &mut pixmap, p);
            // The shadow bleeds outside the shape.
            assert!(pixel(&pixmap, 8, 15)[3] > 0);
            assert_eq!(pixel(&pixmap, 2, 2), [0, 0, 0, 0]);
            assert_eq!(pixel(&pixmap, 15, 15), [255, 0, 0, 255]);
        }
        assert_eq!(cache.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_gradient_source_samples_pixel_centers() {
        let mut g = CanvasGradient::new_linear(0.0, 0.0, 10.0, 0.0);
        g.add_color_stop(0.0, CanvasColor::BLACK).unwrap();
        g.add_color_stop(1.0, CanvasColor::from_rgba8(255, 255, 255, 255))
            .unwrap();
        let source = PaintSource::Gradient {
            gradient: Arc::new(g),
            inverse: Matrix::IDENTITY,
        };
        assert_eq!(source.sample(4, 0), [0.45, 0.45, 0.45, 1.0]);
    }

    #[test]
    fn test_alpha_over_accumulates() {
        let mut mask = Mask::new(4, 1).unwrap();
        let mut painter = AlphaOverPainter::new(&mut mask);
        let half = Span {
            y: 0,
            x0: 0,
            x1: 2,
            coverage: FULL_COVERAGE / 2 + 1,
        };
        painter.paint_span(half);
        painter.paint_span(half);
        assert_eq!(&mask.data()[..3], &[192, 192, 0]);
    }

    #[test]
    fn test_intersect_masks() {
        let mut a = Mask::new(2, 1).unwrap();
        a.data_mut().copy_from_slice(&[255, 128]);
        let mut b = Mask::new(2, 1).unwrap();
        b.data_mut().copy_from_slice(&[128, 255]);
        intersect_masks(&mut a, &b);
        assert_eq!(a.data(), &[128, 128]);
    }
}
