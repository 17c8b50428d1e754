//! Shared test infrastructure for reference comparison tests.
//!
//! Each test renders the same scene with soft-canvas2d and with tiny-skia,
//! then counts the premultiplied pixels whose channels differ by more than
//! a threshold.

pub use soft_canvas2d::{Canvas2dContext, CanvasColor, CanvasFillRule, LineCap, LineJoin, RectParams};
pub use std::f64::consts::PI;
pub use tiny_skia as sk;

/// Per-channel difference (0-255) a pixel may have before it counts as
/// different. Edge pixels differ by a few coverage steps between
/// supersampled and analytic anti-aliasing.
pub const DEFAULT_THRESHOLD: u8 = 64;
/// Interior-only scenes must match almost exactly.
pub const EXACT_THRESHOLD: u8 = 2;

/// Maximum percentage of pixels that can differ before a test fails.
pub const MAX_DIFF_PERCENT: f64 = 2.0;

/// Test case definition for reference comparison.
pub struct CanvasTestCase {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Drawing with this crate.
    pub rust_fn: fn(&mut Canvas2dContext),
    /// The same drawing with tiny-skia.
    pub reference_fn: fn(&mut sk::Pixmap),
    /// Threshold for pixel matching (0-255).
    pub threshold: u8,
    /// Maximum percentage of pixels that can differ.
    pub max_diff_percent: f64,
}

/// Render both sides and compare them.
pub fn run_comparison_test(test: &CanvasTestCase) -> Result<(), String> {
    let mut ctx = Canvas2dContext::new(test.width, test.height)
        .map_err(|e| format!("{}: failed to create context: {}", test.name, e))?;
    (test.rust_fn)(&mut ctx);

    let mut reference = sk::Pixmap::new(test.width, test.height)
        .ok_or_else(|| format!("{}: failed to create reference pixmap", test.name))?;
    (test.reference_fn)(&mut reference);

    let actual = ctx.pixmap().data();
    let expected = reference.data();
    if actual.iter().all(|&b| b == 0) {
        return Err(format!("{}: nothing was rendered", test.name));
    }

    let diff_pixels = actual
        .chunks_exact(4)
        .zip(expected.chunks_exact(4))
        .filter(|(a, e)| a.iter().zip(e.iter()).any(|(a, e)| a.abs_diff(*e) > test.threshold))
        .count();
    let total = (test.width * test.height) as f64;
    let diff_percent = diff_pixels as f64 / total * 100.0;
    if diff_percent > test.max_diff_percent {
        return Err(format!(
            "{}: {} pixels differ ({:.2}% > {:.2}%)",
            test.name, diff_pixels, diff_percent, test.max_diff_percent
        ));
    }
    Ok(())
}

pub fn paint(r: u8, g: u8, b: u8, a: u8) -> sk::Paint<'static> {
    let mut paint = sk::Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

pub fn rect(x: f32, y: f32, width: f32, height: f32) -> sk::Rect {
    sk::Rect::from_xywh(x, y, width, height).unwrap()
}

pub fn circle(cx: f32, cy: f32, r: f32) -> sk::Path {
    sk::PathBuilder::from_circle(cx, cy, r).unwrap()
}

pub fn polyline(points: &[(f32, f32)], close: bool) -> sk::Path {
    let mut pb = sk::PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        pb.line_to(x, y);
    }
    if close {
        pb.close();
    }
    pb.finish().unwrap()
}

/// Vertices of a five-pointed star in drawing order.
pub fn star_points(cx: f64, cy: f64, r: f64) -> Vec<(f64, f64)> {
    (0..5)
        .map(|i| {
            let angle = -PI / 2.0 + i as f64 * 4.0 * PI / 5.0;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect()
}

pub fn rect_params(x: f64, y: f64, width: f64, height: f64) -> RectParams {
    RectParams {
        x,
        y,
        width,
        height,
    }
}
