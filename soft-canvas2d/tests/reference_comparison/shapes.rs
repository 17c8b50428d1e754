//! Filled geometry: rects, circles, polygons, transforms and clipping.

use super::common::*;

#[test]
fn test_fill_rect_comparison() {
    let test = CanvasTestCase {
        name: "fill_rect",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_fill_style("#ff0000").unwrap();
            ctx.fill_rect(&rect_params(10.0, 10.0, 60.0, 40.0));
        },
        reference_fn: |pixmap| {
            pixmap.fill_rect(
                rect(10.0, 10.0, 60.0, 40.0),
                &paint(255, 0, 0, 255),
                sk::Transform::identity(),
                None,
            );
        },
        threshold: EXACT_THRESHOLD,
        max_diff_percent: 0.5,
    };
    run_comparison_test(&test).expect("fill_rect comparison failed");
}

#[test]
fn test_fill_circle_comparison() {
    let test = CanvasTestCase {
        name: "fill_circle",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_fill_style("#0080ff").unwrap();
            ctx.circle(50.0, 50.0, 30.5);
            ctx.fill();
        },
        reference_fn: |pixmap| {
            pixmap.fill_path(
                &circle(50.0, 50.0, 30.5),
                &paint(0, 128, 255, 255),
                sk::FillRule::Winding,
                sk::Transform::identity(),
                None,
            );
        },
        threshold: DEFAULT_THRESHOLD,
        max_diff_percent: MAX_DIFF_PERCENT,
    };
    run_comparison_test(&test).expect("fill_circle comparison failed");
}

#[test]
fn test_star_even_odd_comparison() {
    let test = CanvasTestCase {
        name: "star_even_odd",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_fill_style("#008000").unwrap();
            let points = star_points(50.0, 50.0, 40.0);
            ctx.move_to(points[0].0, points[0].1);
            for &(x, y) in &points[1..] {
                ctx.line_to(x, y);
            }
            ctx.close_path();
            ctx.fill_with_rule(CanvasFillRule::EvenOdd);
        },
        reference_fn: |pixmap| {
            let points: Vec<(f32, f32)> = star_points(50.0, 50.0, 40.0)
                .into_iter()
                .map(|(x, y)| (x as f32, y as f32))
                .collect();
            pixmap.fill_path(
                &polyline(&points, true),
                &paint(0, 128, 0, 255),
                sk::FillRule::EvenOdd,
                sk::Transform::identity(),
                None,
            );
        },
        threshold: DEFAULT_THRESHOLD,
        max_diff_percent: MAX_DIFF_PERCENT,
    };
    run_comparison_test(&test).expect("star_even_odd comparison failed");
}

#[test]
fn test_rotated_rect_comparison() {
    let test = CanvasTestCase {
        name: "rotated_rect",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_fill_style("#800080").unwrap();
            ctx.rotate_about(PI / 4.0, 50.0, 50.0);
            ctx.fill_rect(&rect_params(30.0, 30.0, 40.0, 40.0));
        },
        reference_fn: |pixmap| {
            pixmap.fill_rect(
                rect(30.0, 30.0, 40.0, 40.0),
                &paint(128, 0, 128, 255),
                sk::Transform::from_rotate_at(45.0, 50.0, 50.0),
                None,
            );
        },
        threshold: DEFAULT_THRESHOLD,
        max_diff_percent: MAX_DIFF_PERCENT,
    };
    run_comparison_test(&test).expect("rotated_rect comparison failed");
}

#[test]
fn test_clipped_circle_comparison() {
    let test = CanvasTestCase {
        name: "clipped_circle",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.rect(&rect_params(25.0, 25.0, 50.0, 50.0));
            ctx.clip();
            ctx.begin_path();
            ctx.set_fill_style("#ff8000").unwrap();
            ctx.circle(50.0, 50.0, 40.0);
            ctx.fill();
        },
        reference_fn: |pixmap| {
            let mut mask = sk::Mask::new(100, 100).unwrap();
            mask.fill_path(
                &sk::PathBuilder::from_rect(rect(25.0, 25.0, 50.0, 50.0)),
                sk::FillRule::Winding,
                true,
                sk::Transform::identity(),
            );
            pixmap.fill_path(
                &circle(50.0, 50.0, 40.0),
                &paint(255, 128, 0, 255),
                sk::FillRule::Winding,
                sk::Transform::identity(),
                Some(&mask),
            );
        },
        threshold: DEFAULT_THRESHOLD,
        max_diff_percent: MAX_DIFF_PERCENT,
    };
    run_comparison_test(&test).expect("clipped_circle comparison failed");
}

#[test]
fn test_linear_gradient_comparison() {
    let test = CanvasTestCase {
        name: "linear_gradient",
        width: 100,
        height: 40,
        rust_fn: |ctx| {
            let mut gradient = ctx.create_linear_gradient(0.0, 0.0, 100.0, 0.0);
            gradient
                .add_color_stop(0.0, CanvasColor::from_rgba8(255, 0, 0, 255))
                .unwrap();
            gradient
                .add_color_stop(1.0, CanvasColor::from_rgba8(0, 0, 255, 255))
                .unwrap();
            ctx.set_fill_style_gradient(gradient);
            ctx.fill_rect(&rect_params(0.0, 0.0, 100.0, 40.0));
        },
        reference_fn: |pixmap| {
            let shader = sk::LinearGradient::new(
                sk::Point::from_xy(0.0, 0.0),
                sk::Point::from_xy(100.0, 0.0),
                vec![
                    sk::GradientStop::new(0.0, sk::Color::from_rgba8(255, 0, 0, 255)),
                    sk::GradientStop::new(1.0, sk::Color::from_rgba8(0, 0, 255, 255)),
                ],
                sk::SpreadMode::Pad,
                sk::Transform::identity(),
            )
            .unwrap();
            let mut paint = sk::Paint::default();
            paint.shader = shader;
            pixmap.fill_rect(
                rect(0.0, 0.0, 100.0, 40.0),
                &paint,
                sk::Transform::identity(),
                None,
            );
        },
        threshold: 8,
        max_diff_percent: 0.5,
    };
    run_comparison_test(&test).expect("linear_gradient comparison failed");
}
