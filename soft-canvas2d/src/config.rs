//! Rendering configuration.

use crate::blur_cache::DEFAULT_BLUR_CACHE_MAX_BYTES;
use crate::flatten::{FlattenOptions, DEFAULT_ARC_CHORD_ERROR, DEFAULT_FLATTENING_TOLERANCE};

/// Maximum canvas dimension (same as Chrome).
pub const MAX_DIMENSION: u32 = 32767;

/// Tunables of a rendering context.
///
/// Uses only plain values so callers can build it without touching any
/// engine types.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Curve flatness threshold in device pixels.
    pub flattening_tolerance: f64,
    /// Maximum distance between an arc and its chords, in device pixels.
    pub arc_chord_error: f64,
    /// Byte budget of the shadow blur cache.
    pub blur_cache_max_bytes: usize,
    /// Largest accepted canvas width or height.
    pub max_dimension: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            flattening_tolerance: DEFAULT_FLATTENING_TOLERANCE,
            arc_chord_error: DEFAULT_ARC_CHORD_ERROR,
            blur_cache_max_bytes: DEFAULT_BLUR_CACHE_MAX_BYTES,
            max_dimension: MAX_DIMENSION,
        }
    }
}

impl CanvasConfig {
    /// Flattening options, falling back to defaults for unusable values.
    pub fn flatten_options(&self) -> FlattenOptions {
        let positive = |v: f64, default: f64| if v.is_finite() && v > 0.0 { v } else { default };
        FlattenOptions {
            tolerance: positive(self.flattening_tolerance, DEFAULT_FLATTENING_TOLERANCE),
            arc_chord_error: positive(self.arc_chord_error, DEFAULT_ARC_CHORD_ERROR),
        }
    }
}
