//! Integration tests for soft-canvas2d.

use soft_canvas2d::{
    ArcParams, Canvas2d, Canvas2dContext, CanvasColor, CanvasFillRule, LineCap, LineJoin, Matrix,
    Path, RecordingCanvas, RectParams,
};
use std::f64::consts::PI;

fn rect(x: f64, y: f64, width: f64, height: f64) -> RectParams {
    RectParams {
        x,
        y,
        width,
        height,
    }
}

fn pixel(ctx: &Canvas2dContext, x: i32, y: i32) -> [u8; 4] {
    let data = ctx.get_image_data(x, y, 1, 1);
    [data[0], data[1], data[2], data[3]]
}

/// Test that fillRect covers exactly its pixel rectangle.
#[test]
fn test_fill_rect_covers_exact_pixels() {
    let mut ctx = Canvas2dContext::new(60, 40).unwrap();
    ctx.set_fill_style("#3366cc").unwrap();
    ctx.fill_rect(&rect(0.0, 0.0, 50.0, 30.0));

    let data = ctx.image();
    for y in 0..40 {
        for x in 0..60 {
            let idx = (y * 60 + x) * 4;
            let expected: [u8; 4] = if x < 50 && y < 30 {
                [0x33, 0x66, 0xcc, 255]
            } else {
                [0, 0, 0, 0]
            };
            assert_eq!(&data[idx..idx + 4], &expected, "pixel ({}, {})", x, y);
        }
    }
}

/// Test that a butt-capped horizontal stroke is a solid band.
#[test]
fn test_stroke_band() {
    let mut ctx = Canvas2dContext::new(100, 20).unwrap();
    ctx.set_line_width(10.0);
    ctx.set_line_cap(LineCap::Butt);
    ctx.move_to(0.0, 10.0);
    ctx.line_to(100.0, 10.0);
    ctx.stroke();

    for y in 0..20 {
        for x in [0, 37, 99] {
            let expected = if (5..15).contains(&y) { 255 } else { 0 };
            assert_eq!(pixel(&ctx, x, y)[3], expected, "pixel ({}, {})", x, y);
        }
    }
}

/// Test that a filled half disk covers about half the circle area.
#[test]
fn test_half_disk_area() {
    let mut ctx = Canvas2dContext::new(100, 100).unwrap();
    ctx.arc(&ArcParams {
        x: 50.0,
        y: 50.0,
        radius: 40.0,
        start_angle: 0.0,
        end_angle: PI,
        anticlockwise: false,
    });
    ctx.fill();

    let covered: f64 = ctx
        .image()
        .chunks_exact(4)
        .map(|p| p[3] as f64 / 255.0)
        .sum();
    let expected = PI * 40.0 * 40.0 / 2.0;
    assert!(
        (covered - expected).abs() / expected < 0.03,
        "covered {} expected {}",
        covered,
        expected
    );
    // Only the lower half is painted.
    assert_eq!(pixel(&ctx, 50, 30)[3], 0);
    assert_eq!(pixel(&ctx, 50, 70)[3], 255);
}

/// Test that a [5, 5] dash produces ten 5-pixel segments on a 100-unit line.
#[test]
fn test_dash_segments() {
    let mut ctx = Canvas2dContext::new(100, 20).unwrap();
    ctx.set_line_width(4.0);
    ctx.set_line_dash(vec![5.0, 5.0]);
    ctx.move_to(0.0, 10.0);
    ctx.line_to(100.0, 10.0);
    ctx.stroke();

    let row = ctx.get_image_data(0, 10, 100, 1);
    let on: Vec<bool> = row.chunks_exact(4).map(|p| p[3] == 255).collect();
    let mut runs = Vec::new();
    let mut start = None;
    for (x, &is_on) in on.iter().enumerate() {
        match (is_on, start) {
            (true, None) => start = Some(x),
            (false, Some(s)) => {
                runs.push(x - s);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(on.len() - s);
    }
    assert_eq!(runs, vec![5; 10]);
}

/// Test that opaque source-over replaces destination pixels exactly.
#[test]
fn test_opaque_source_over_replaces() {
    let mut ctx = Canvas2dContext::new(10, 10).unwrap();
    ctx.set_fill_style("rgba(0, 255, 0, 0.5)").unwrap();
    ctx.fill_rect(&rect(0.0, 0.0, 10.0, 10.0));
    ctx.set_fill_style("#c81e64").unwrap();
    ctx.fill_rect(&rect(0.0, 0.0, 10.0, 10.0));
    assert_eq!(pixel(&ctx, 4, 4), [0xc8, 0x1e, 0x64, 255]);
}

/// Test that copy yields the source everywhere.
#[test]
fn test_copy_yields_source() {
    let mut ctx = Canvas2dContext::new(20, 20).unwrap();
    ctx.set_fill_style("#ff0000").unwrap();
    ctx.fill_rect(&rect(0.0, 0.0, 20.0, 20.0));
    assert!(ctx.set_global_composite_operation("copy"));
    ctx.set_fill_style("rgba(0, 0, 255, 0.5)").unwrap();
    ctx.fill_rect(&rect(5.0, 5.0, 10.0, 10.0));

    let inside = pixel(&ctx, 10, 10);
    assert_eq!([inside[0], inside[1]], [0, 0]);
    assert!(inside[2] >= 254 && (127..=128).contains(&inside[3]));
    assert_eq!(pixel(&ctx, 1, 1), [0, 0, 0, 0]);
}

/// Test that save/restore brings back every style field and the path.
#[test]
fn test_save_restore_state() {
    let mut ctx = Canvas2dContext::new(50, 50).unwrap();
    ctx.move_to(1.0, 2.0);
    ctx.line_to(30.0, 2.0);
    let path_before = ctx.current_path().clone();

    ctx.save();
    ctx.set_line_width(7.0);
    ctx.set_line_join(LineJoin::Bevel);
    ctx.set_global_alpha(0.25);
    ctx.set_fill_rule(CanvasFillRule::EvenOdd);
    ctx.set_line_dash(vec![3.0]);
    ctx.translate(5.0, 5.0);
    ctx.line_to(10.0, 40.0);
    ctx.restore();

    assert_eq!(ctx.line_width(), 1.0);
    assert_eq!(ctx.line_join(), LineJoin::Miter);
    assert_eq!(ctx.global_alpha(), 1.0);
    assert_eq!(ctx.fill_rule(), CanvasFillRule::NonZero);
    assert!(ctx.get_line_dash().is_empty());
    assert!(ctx.get_transform().is_identity());
    assert_eq!(ctx.current_path(), &path_before);

    // Restoring with nothing saved changes nothing.
    ctx.restore();
    assert_eq!(ctx.current_path(), &path_before);
}

/// Test that a clip confines later drawing until restore.
#[test]
fn test_clip_until_restore() {
    let mut ctx = Canvas2dContext::new(40, 40).unwrap();
    ctx.save();
    ctx.rect(&rect(10.0, 10.0, 10.0, 10.0));
    ctx.clip();
    ctx.fill_rect(&rect(0.0, 0.0, 40.0, 40.0));
    assert_eq!(pixel(&ctx, 15, 15)[3], 255);
    assert_eq!(pixel(&ctx, 25, 25)[3], 0);

    ctx.restore();
    ctx.fill_rect(&rect(30.0, 30.0, 5.0, 5.0));
    assert_eq!(pixel(&ctx, 32, 32)[3], 255);
}

/// Test that an offset hard shadow is painted under the shape.
#[test]
fn test_offset_shadow() {
    let mut ctx = Canvas2dContext::new(50, 30).unwrap();
    ctx.set_shadow_color("#000000").unwrap();
    ctx.set_shadow_offset_x(20.0);
    ctx.set_fill_style("#ff0000").unwrap();
    ctx.fill_rect(&rect(10.0, 10.0, 10.0, 10.0));

    assert_eq!(pixel(&ctx, 15, 15), [255, 0, 0, 255]);
    assert_eq!(pixel(&ctx, 35, 15), [0, 0, 0, 255]);
    assert_eq!(pixel(&ctx, 25, 15), [0, 0, 0, 0]);
}

/// Test that a blurred shadow spreads beyond the shape's offset footprint.
#[test]
fn test_blurred_shadow_spreads() {
    let mut ctx = Canvas2dContext::new(60, 40).unwrap();
    ctx.set_shadow_color("#000000").unwrap();
    ctx.set_shadow_blur(6.0);
    ctx.set_shadow_offset_x(25.0);
    ctx.fill_rect(&rect(10.0, 10.0, 10.0, 10.0));

    // Just outside the offset square the blurred shadow is partially opaque.
    let edge = pixel(&ctx, 33, 15)[3];
    assert!(edge > 0 && edge < 255, "edge alpha {}", edge);
    assert_eq!(pixel(&ctx, 15, 15)[3], 255);
}

/// Test the matrix identities the context relies on.
#[test]
fn test_matrix_compose_and_invert() {
    let m = Matrix::new(2.0, 0.5, -1.0, 3.0, 7.0, -4.0);
    let mut composed = Matrix::IDENTITY;
    composed.compose(&m);
    assert!(composed.approx_eq(&m, 1e-12));

    let inverse = m.inverse().unwrap();
    assert!(m.then(&inverse).approx_eq(&Matrix::IDENTITY, 1e-12));
    assert!(Matrix::scaling(0.0, 1.0).inverse().is_none());
}

/// Test filling an SVG path leaves the current path alone.
#[test]
fn test_fill_svg_path() {
    let mut ctx = Canvas2dContext::new(30, 30).unwrap();
    ctx.move_to(0.0, 0.0);
    let triangle = Path::from_svg_path_data("M 0 0 L 20 0 L 0 20 Z").unwrap();
    ctx.fill_path(&triangle, CanvasFillRule::NonZero);

    assert_eq!(pixel(&ctx, 3, 3)[3], 255);
    assert_eq!(pixel(&ctx, 17, 17)[3], 0);
    assert_eq!(ctx.current_path().components().len(), 1);
    assert!(Path::from_svg_path_data("M 0 0 X 5 5").is_err());
}

/// Test that a recorded drawing replays to identical pixels.
#[test]
fn test_recording_replay() {
    fn draw(canvas: &mut dyn Canvas2d) {
        canvas.clear_with_color(CanvasColor::from_rgba8(255, 255, 255, 255));
        canvas.set_line_width(4.0);
        canvas.set_line_join(LineJoin::Round);
        canvas.rotate_about(PI / 6.0, 32.0, 32.0);
        canvas.rect(&rect(12.0, 12.0, 40.0, 40.0));
        canvas.stroke();
        canvas.reset_transform();
        canvas.circle(32.0, 32.0, 10.0);
        canvas.fill();
    }

    let mut recording = RecordingCanvas::new(Canvas2dContext::new(64, 64).unwrap());
    draw(&mut recording);

    let mut direct = Canvas2dContext::new(64, 64).unwrap();
    draw(&mut direct);
    assert_eq!(recording.image(), direct.image());

    let mut replayed = Canvas2dContext::new(64, 64).unwrap();
    recording.replay(&mut replayed);
    assert_eq!(replayed.image(), direct.image());
}

/// Test that reset returns to a blank, default context.
#[test]
fn test_reset() {
    let mut ctx = Canvas2dContext::new(10, 10).unwrap();
    ctx.save();
    ctx.scale(2.0, 2.0);
    ctx.set_line_width(3.0);
    ctx.fill_rect(&rect(0.0, 0.0, 5.0, 5.0));
    ctx.reset();

    assert!(ctx.image().iter().all(|&b| b == 0));
    assert_eq!(ctx.line_width(), 1.0);
    assert!(ctx.get_transform().is_identity());
    assert!(ctx.current_path().is_empty());
}
