//! Image drawing and pixel data operations for Canvas2dContext.
//!
//! Images are drawn by filling the destination rectangle with a
//! non-repeating pattern, so global alpha, compositing, clip and shadow apply
//! the same way they do to any fill.

use super::Canvas2dContext;
use crate::color;
use crate::error::Canvas2dResult;
use crate::geometry::{CanvasImageDataRef, DirtyRect, ImageCropParams, RectParams};
use crate::matrix::Matrix;
use crate::pattern::{premultiplied_pixmap, CanvasPattern, Repetition};
use crate::style::{CanvasFillRule, FillStyle};
use std::sync::Arc;
use tiny_skia::Pixmap;

impl Canvas2dContext {
    // --- Internal image drawing ---

    /// Draw the source rectangle of a premultiplied pixmap into the
    /// destination rectangle, resampling with the current image filter.
    fn draw_pixmap_region(&mut self, image: &Pixmap, params: &ImageCropParams) {
        let ImageCropParams {
            sx,
            sy,
            sw,
            sh,
            dx,
            dy,
            dw,
            dh,
        } = *params;

        // Clamp source rectangle to image bounds
        let sx = sx.max(0.0);
        let sy = sy.max(0.0);
        let sw = sw.min(image.width() as f64 - sx);
        let sh = sh.min(image.height() as f64 - sy);
        if !(sw > 0.0 && sh > 0.0 && dw > 0.0 && dh > 0.0) {
            return;
        }

        let (x0, y0) = (sx.floor() as u32, sy.floor() as u32);
        let x1 = ((sx + sw).ceil() as u32).min(image.width());
        let y1 = ((sy + sh).ceil() as u32).min(image.height());
        let Some(sub) = crop_pixmap(image, x0, y0, x1 - x0, y1 - y0) else {
            return;
        };
        let mut pattern = match CanvasPattern::from_pixmap(sub, Repetition::NoRepeat) {
            Ok(pattern) => pattern,
            Err(err) => {
                log::warn!(target: "canvas", "drawImage skipped: {}", err);
                return;
            }
        };
        pattern.set_filter(self.state().image_filter);
        pattern.set_transform(
            Matrix::translation(x0 as f64 - sx, y0 as f64 - sy)
                .then(&Matrix::scaling(dw / sw, dh / sh))
                .then(&Matrix::translation(dx, dy)),
        );

        let Some(source) = self.paint_source(&FillStyle::Pattern(Arc::new(pattern))) else {
            return;
        };
        let rect = self.device_rect(&RectParams {
            x: dx,
            y: dy,
            width: dw,
            height: dh,
        });
        let mut rasterizer = self.flatten_fill(&rect);
        self.paint_rasterized(&mut rasterizer, CanvasFillRule::NonZero, &source);
    }

    fn image_pixmap(image: &CanvasImageDataRef<'_>) -> Option<Pixmap> {
        match premultiplied_pixmap(*image) {
            Ok(pixmap) => Some(pixmap),
            Err(err) => {
                log::warn!(target: "canvas", "drawImage skipped: {}", err);
                None
            }
        }
    }

    // --- Public draw image/canvas methods ---

    /// Draw non-premultiplied RGBA image data at the specified position.
    pub fn draw_image_data(&mut self, image: &CanvasImageDataRef<'_>, dx: f64, dy: f64) {
        log::debug!(target: "canvas", "drawImage {}x{} at {} {}", image.width, image.height, dx, dy);
        let (w, h) = (image.width as f64, image.height as f64);
        if let Some(pixmap) = Self::image_pixmap(image) {
            self.draw_pixmap_region(&pixmap, &full_region(w, h, dx, dy, w, h));
        }
    }

    /// Draw image data scaled to the specified dimensions.
    pub fn draw_image_data_scaled(
        &mut self,
        image: &CanvasImageDataRef<'_>,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) {
        log::debug!(target: "canvas", "drawImage {}x{} to {} {} {} {}", image.width, image.height, dx, dy, dw, dh);
        let (w, h) = (image.width as f64, image.height as f64);
        if let Some(pixmap) = Self::image_pixmap(image) {
            self.draw_pixmap_region(&pixmap, &full_region(w, h, dx, dy, dw, dh));
        }
    }

    /// Draw a cropped region of image data to a destination rectangle.
    pub fn draw_image_data_cropped(
        &mut self,
        image: &CanvasImageDataRef<'_>,
        params: &ImageCropParams,
    ) {
        log::debug!(target: "canvas", "drawImage {}x{} cropped {:?}", image.width, image.height, params);
        if let Some(pixmap) = Self::image_pixmap(image) {
            self.draw_pixmap_region(&pixmap, params);
        }
    }

    /// Draw another canvas at the specified position.
    pub fn draw_canvas(&mut self, source: &Canvas2dContext, dx: f64, dy: f64) {
        log::debug!(target: "canvas", "drawCanvas at {} {}", dx, dy);
        let (w, h) = (source.width as f64, source.height as f64);
        self.draw_pixmap_region(&source.pixmap, &full_region(w, h, dx, dy, w, h));
    }

    /// Draw another canvas scaled to the specified dimensions.
    pub fn draw_canvas_scaled(
        &mut self,
        source: &Canvas2dContext,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) {
        log::debug!(target: "canvas", "drawCanvas to {} {} {} {}", dx, dy, dw, dh);
        let (w, h) = (source.width as f64, source.height as f64);
        self.draw_pixmap_region(&source.pixmap, &full_region(w, h, dx, dy, dw, dh));
    }

    /// Draw a cropped region of another canvas to a destination rectangle.
    pub fn draw_canvas_cropped(&mut self, source: &Canvas2dContext, params: &ImageCropParams) {
        log::debug!(target: "canvas", "drawCanvas cropped {:?}", params);
        self.draw_pixmap_region(&source.pixmap, params);
    }

    /// Create a pattern from another canvas.
    pub fn create_pattern_from_canvas(
        &self,
        source: &Canvas2dContext,
        repetition: &str,
    ) -> Canvas2dResult<Arc<CanvasPattern>> {
        let rep = repetition.parse::<Repetition>()?;
        let mut pattern = CanvasPattern::from_pixmap(source.pixmap.clone(), rep)?;
        pattern.set_filter(self.state().image_filter);
        Ok(Arc::new(pattern))
    }

    // --- Image data ---

    /// Create a new ImageData with the specified dimensions.
    ///
    /// Returns transparent black RGBA bytes, 4 per pixel.
    pub fn create_image_data(&self, width: u32, height: u32) -> Vec<u8> {
        vec![0u8; width as usize * height as usize * 4]
    }

    /// Get non-premultiplied RGBA data for a region of the canvas.
    ///
    /// Pixels outside the canvas read as transparent black.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8> {
        let mut data = self.create_image_data(width, height);
        let src = self.pixmap.data();
        let canvas_width = self.width as i64;
        let canvas_height = self.height as i64;

        for row in 0..height as i64 {
            let src_y = y as i64 + row;
            if src_y < 0 || src_y >= canvas_height {
                continue;
            }
            let col0 = (-(x as i64)).clamp(0, width as i64);
            let col1 = (canvas_width - x as i64).clamp(0, width as i64);
            if col0 >= col1 {
                continue;
            }
            let src_start = ((src_y * canvas_width + x as i64 + col0) * 4) as usize;
            let dst_start = ((row * width as i64 + col0) * 4) as usize;
            let len = ((col1 - col0) * 4) as usize;
            data[dst_start..dst_start + len].copy_from_slice(&src[src_start..src_start + len]);
        }

        color::unpremultiply_rgba8(&mut data);
        data
    }

    /// Whole canvas as non-premultiplied RGBA.
    pub fn image(&self) -> Vec<u8> {
        self.get_image_data(0, 0, self.width, self.height)
    }

    /// The premultiplied pixel buffer.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Write non-premultiplied RGBA data to the canvas at `(dx, dy)`.
    ///
    /// Pixels are replaced as-is; transform, clip, alpha and compositing do
    /// not apply.
    pub fn put_image_data(&mut self, data: &[u8], width: u32, height: u32, dx: i32, dy: i32) {
        self.put_image_data_dirty(
            data,
            width,
            height,
            dx,
            dy,
            &DirtyRect {
                x: 0,
                y: 0,
                width: width as i32,
                height: height as i32,
            },
        );
    }

    /// Write the `dirty` portion of image data to the canvas.
    ///
    /// Pixels outside the canvas bounds are silently ignored.
    pub fn put_image_data_dirty(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        dx: i32,
        dy: i32,
        dirty: &DirtyRect,
    ) {
        log::debug!(target: "canvas", "putImageData {}x{} at {} {} dirty {:?}", width, height, dx, dy, dirty);
        if data.len() < width as usize * height as usize * 4 {
            log::warn!(
                target: "canvas",
                "putImageData skipped: {} bytes for a {}x{} image",
                data.len(),
                width,
                height
            );
            return;
        }

        // Clamp dirty rect to source image bounds
        let dirty_x = dirty.x.clamp(0, width as i32);
        let dirty_y = dirty.y.clamp(0, height as i32);
        let dirty_width = dirty.width.max(0).min(width as i32 - dirty_x);
        let dirty_height = dirty.height.max(0).min(height as i32 - dirty_y);
        if dirty_width <= 0 || dirty_height <= 0 {
            return;
        }

        let canvas_width = self.width as i64;
        let canvas_height = self.height as i64;
        let pixels = self.pixmap.data_mut();

        for sy in dirty_y..dirty_y + dirty_height {
            let dst_y = dy as i64 + sy as i64;
            if dst_y < 0 || dst_y >= canvas_height {
                continue;
            }
            for sx in dirty_x..dirty_x + dirty_width {
                let dst_x = dx as i64 + sx as i64;
                if dst_x < 0 || dst_x >= canvas_width {
                    continue;
                }
                let src_idx = (sy as usize * width as usize + sx as usize) * 4;
                let dst_idx = ((dst_y * canvas_width + dst_x) * 4) as usize;
                let pixel = &mut pixels[dst_idx..dst_idx + 4];
                pixel.copy_from_slice(&data[src_idx..src_idx + 4]);
                color::premultiply_rgba8(pixel);
            }
        }
    }
}

/// Crop parameters drawing a whole `w × h` image into a destination
/// rectangle.
fn full_region(w: f64, h: f64, dx: f64, dy: f64, dw: f64, dh: f64) -> ImageCropParams {
    ImageCropParams {
        sx: 0.0,
        sy: 0.0,
        sw: w,
        sh: h,
        dx,
        dy,
        dw,
        dh,
    }
}

/// Copy of a sub-rectangle of `image`, or the whole image when the
/// rectangle covers it.
fn crop_pixmap(image: &Pixmap, x: u32, y: u32, width: u32, height: u32) -> Option<Pixmap> {
    if x == 0 && y == 0 && width == image.width() && height == image.height() {
        return Some(image.clone());
    }
    let mut sub = Pixmap::new(width, height)?;
    let src_stride = image.width() as usize * 4;
    let row_len = width as usize * 4;
    let src = image.data();
    for (row, dst) in sub.data_mut().chunks_exact_mut(row_len).enumerate() {
        let start = (y as usize + row) * src_stride + x as usize * 4;
        dst.copy_from_slice(&src[start..start + row_len]);
    }
    Some(sub)
}
