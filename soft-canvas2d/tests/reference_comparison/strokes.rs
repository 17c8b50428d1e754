//! Stroked geometry: widths, joins, caps and dashes.

use super::common::*;

#[test]
fn test_horizontal_band_comparison() {
    let test = CanvasTestCase {
        name: "horizontal_band",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_stroke_style("#000000").unwrap();
            ctx.set_line_width(10.0);
            ctx.move_to(10.0, 50.0);
            ctx.line_to(90.0, 50.0);
            ctx.stroke();
        },
        reference_fn: |pixmap| {
            let stroke = sk::Stroke {
                width: 10.0,
                ..Default::default()
            };
            pixmap.stroke_path(
                &polyline(&[(10.0, 50.0), (90.0, 50.0)], false),
                &paint(0, 0, 0, 255),
                &stroke,
                sk::Transform::identity(),
                None,
            );
        },
        threshold: EXACT_THRESHOLD,
        max_diff_percent: 0.5,
    };
    run_comparison_test(&test).expect("horizontal_band comparison failed");
}

#[test]
fn test_round_join_polyline_comparison() {
    let test = CanvasTestCase {
        name: "round_join_polyline",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_stroke_style("#0000ff").unwrap();
            ctx.set_line_width(8.0);
            ctx.set_line_join(LineJoin::Round);
            ctx.set_line_cap(LineCap::Round);
            ctx.move_to(20.0, 80.0);
            ctx.line_to(50.0, 20.0);
            ctx.line_to(80.0, 80.0);
            ctx.stroke();
        },
        reference_fn: |pixmap| {
            let stroke = sk::Stroke {
                width: 8.0,
                line_join: sk::LineJoin::Round,
                line_cap: sk::LineCap::Round,
                ..Default::default()
            };
            pixmap.stroke_path(
                &polyline(&[(20.0, 80.0), (50.0, 20.0), (80.0, 80.0)], false),
                &paint(0, 0, 255, 255),
                &stroke,
                sk::Transform::identity(),
                None,
            );
        },
        threshold: DEFAULT_THRESHOLD,
        max_diff_percent: MAX_DIFF_PERCENT,
    };
    run_comparison_test(&test).expect("round_join_polyline comparison failed");
}

#[test]
fn test_miter_join_comparison() {
    let test = CanvasTestCase {
        name: "miter_join",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_stroke_style("#ff0000").unwrap();
            ctx.set_line_width(6.0);
            ctx.stroke_rect(&rect_params(20.0, 20.0, 60.0, 60.0));
        },
        reference_fn: |pixmap| {
            let stroke = sk::Stroke {
                width: 6.0,
                ..Default::default()
            };
            pixmap.stroke_path(
                &sk::PathBuilder::from_rect(rect(20.0, 20.0, 60.0, 60.0)),
                &paint(255, 0, 0, 255),
                &stroke,
                sk::Transform::identity(),
                None,
            );
        },
        threshold: EXACT_THRESHOLD,
        max_diff_percent: 0.5,
    };
    run_comparison_test(&test).expect("miter_join comparison failed");
}

#[test]
fn test_dashed_line_comparison() {
    let test = CanvasTestCase {
        name: "dashed_line",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_stroke_style("#008000").unwrap();
            ctx.set_line_width(6.0);
            ctx.set_line_dash(vec![10.0, 5.0]);
            ctx.move_to(10.0, 50.0);
            ctx.line_to(90.0, 50.0);
            ctx.stroke();
        },
        reference_fn: |pixmap| {
            let stroke = sk::Stroke {
                width: 6.0,
                dash: sk::StrokeDash::new(vec![10.0, 5.0], 0.0),
                ..Default::default()
            };
            pixmap.stroke_path(
                &polyline(&[(10.0, 50.0), (90.0, 50.0)], false),
                &paint(0, 128, 0, 255),
                &stroke,
                sk::Transform::identity(),
                None,
            );
        },
        threshold: DEFAULT_THRESHOLD,
        max_diff_percent: MAX_DIFF_PERCENT,
    };
    run_comparison_test(&test).expect("dashed_line comparison failed");
}
