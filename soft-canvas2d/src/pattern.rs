//! Pattern types for Canvas 2D operations.

use crate::color::{self, Premultiplied, TRANSPARENT};
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::CanvasImageDataRef;
use crate::matrix::Matrix;
use crate::style::ImageFilter;
use tiny_skia::Pixmap;

/// Maximum pattern size.
const MAX_PATTERN_SIZE: u32 = 32767;

/// Pattern repetition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Repetition {
    /// Repeat in both directions (default).
    #[default]
    Repeat,
    /// Repeat only horizontally.
    RepeatX,
    /// Repeat only vertically.
    RepeatY,
    /// No repetition (single instance).
    NoRepeat,
}

impl Repetition {
    fn repeats_x(self) -> bool {
        matches!(self, Repetition::Repeat | Repetition::RepeatX)
    }

    fn repeats_y(self) -> bool {
        matches!(self, Repetition::Repeat | Repetition::RepeatY)
    }
}

impl std::str::FromStr for Repetition {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat" | "" => Ok(Repetition::Repeat),
            "repeat-x" => Ok(Repetition::RepeatX),
            "repeat-y" => Ok(Repetition::RepeatY),
            "no-repeat" => Ok(Repetition::NoRepeat),
            _ => Err(Canvas2dError::InvalidArgument(format!(
                "Invalid repetition mode: '{}'",
                s
            ))),
        }
    }
}

/// Canvas pattern for fill/stroke operations and image drawing.
///
/// The image is stored premultiplied. `transform` maps pattern space (one
/// unit per texel) to user space.
#[derive(Debug, Clone)]
pub struct CanvasPattern {
    /// The pattern image.
    pixmap: Pixmap,
    /// Repetition mode.
    repetition: Repetition,
    /// Pattern transform matrix.
    transform: Matrix,
    /// Resampling filter.
    filter: ImageFilter,
}

impl CanvasPattern {
    /// Create a new pattern from non-premultiplied RGBA pixel data.
    pub fn new(image: CanvasImageDataRef, repetition: Repetition) -> Canvas2dResult<Self> {
        check_size(image.width, image.height)?;
        Self::from_pixmap(premultiplied_pixmap(image)?, repetition)
    }

    /// Create a new pattern from a Pixmap (already premultiplied).
    pub fn from_pixmap(pixmap: Pixmap, repetition: Repetition) -> Canvas2dResult<Self> {
        check_size(pixmap.width(), pixmap.height())?;
        Ok(Self {
            pixmap,
            repetition,
            transform: Matrix::IDENTITY,
            filter: ImageFilter::default(),
        })
    }

    /// Set the pattern transform matrix.
    pub fn set_transform(&mut self, transform: Matrix) {
        self.transform = transform;
    }

    /// Get the pattern transform matrix.
    pub fn transform(&self) -> Matrix {
        self.transform
    }

    pub fn set_filter(&mut self, filter: ImageFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> ImageFilter {
        self.filter
    }

    /// Get the pattern width.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Get the pattern height.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Get the repetition mode.
    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied color at pattern-space point `(u, v)`.
    ///
    /// Texel `(i, j)` covers `[i, i + 1) × [j, j + 1)`. Along a non-repeating
    /// axis everything outside the image is transparent and filtering clamps
    /// to the edge texels.
    pub fn sample(&self, u: f64, v: f64) -> Premultiplied {
        let (w, h) = (self.width() as f64, self.height() as f64);
        if !u.is_finite() || !v.is_finite() {
            return TRANSPARENT;
        }
        if (!self.repetition.repeats_x() && !(0.0..w).contains(&u))
            || (!self.repetition.repeats_y() && !(0.0..h).contains(&v))
        {
            return TRANSPARENT;
        }

        match self.filter {
            ImageFilter::Nearest => self.texel(u.floor() as i64, v.floor() as i64),
            ImageFilter::Bilinear => {
                let (u, v) = (u - 0.5, v - 0.5);
                let (i, j) = (u.floor(), v.floor());
                let (fx, fy) = ((u - i) as f32, (v - j) as f32);
                let (i, j) = (i as i64, j as i64);
                let top = color::lerp(self.texel(i, j), self.texel(i + 1, j), fx);
                let bottom = color::lerp(self.texel(i, j + 1), self.texel(i + 1, j + 1), fx);
                color::lerp(top, bottom, fy)
            }
            ImageFilter::Bicubic => {
                let (u, v) = (u - 0.5, v - 0.5);
                let (i, j) = (u.floor(), v.floor());
                let wx = catmull_rom_weights((u - i) as f32);
                let wy = catmull_rom_weights((v - j) as f32);
                let (i, j) = (i as i64, j as i64);
                let mut out = [0f32; 4];
                for (dy, wy) in wy.iter().enumerate() {
                    for (dx, wx) in wx.iter().enumerate() {
                        let t = self.texel(i + dx as i64 - 1, j + dy as i64 - 1);
                        let weight = wx * wy;
                        for c in 0..4 {
                            out[c] += t[c] * weight;
                        }
                    }
                }
                let a = out[3].clamp(0.0, 1.0);
                [
                    out[0].clamp(0.0, a),
                    out[1].clamp(0.0, a),
                    out[2].clamp(0.0, a),
                    a,
                ]
            }
        }
    }

    /// Texel with wrapping on repeating axes and edge clamping otherwise.
    fn texel(&self, i: i64, j: i64) -> Premultiplied {
        let (w, h) = (self.width() as i64, self.height() as i64);
        let x = if self.repetition.repeats_x() {
            i.rem_euclid(w)
        } else {
            i.clamp(0, w - 1)
        };
        let y = if self.repetition.repeats_y() {
            j.rem_euclid(h)
        } else {
            j.clamp(0, h - 1)
        };
        let offset = ((y * w + x) * 4) as usize;
        color::load(&self.pixmap.data()[offset..offset + 4])
    }
}

fn check_size(width: u32, height: u32) -> Canvas2dResult<()> {
    if width == 0 || height == 0 {
        return Err(Canvas2dError::InvalidArgument(
            "Pattern dimensions must be non-zero".to_string(),
        ));
    }
    if width > MAX_PATTERN_SIZE || height > MAX_PATTERN_SIZE {
        return Err(Canvas2dError::InvalidArgument(format!(
            "Pattern size {}x{} exceeds maximum {}x{}",
            width, height, MAX_PATTERN_SIZE, MAX_PATTERN_SIZE
        )));
    }
    Ok(())
}

/// Copy non-premultiplied RGBA data into a premultiplied pixmap.
pub(crate) fn premultiplied_pixmap(image: CanvasImageDataRef) -> Canvas2dResult<Pixmap> {
    if !image.is_valid() {
        return Err(Canvas2dError::InvalidArgument(format!(
            "Data length {} does not match expected {} for {}x{} RGBA image",
            image.data.len(),
            image.width as usize * image.height as usize * 4,
            image.width,
            image.height
        )));
    }
    let mut data = image.data.to_vec();
    color::premultiply_rgba8(&mut data);
    let size = tiny_skia::IntSize::from_wh(image.width, image.height)
        .ok_or_else(|| Canvas2dError::InvalidArgument("Invalid image size".to_string()))?;
    Pixmap::from_vec(data, size)
        .ok_or_else(|| Canvas2dError::InvalidArgument("Failed to create pixmap".to_string()))
}

fn catmull_rom_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        (-t3 + 2.0 * t2 - t) / 2.0,
        (3.0 * t3 - 5.0 * t2 + 2.0) / 2.0,
        (-3.0 * t3 + 4.0 * t2 + t) / 2.0,
        (t3 - t2) / 2.0,
    ]
}
