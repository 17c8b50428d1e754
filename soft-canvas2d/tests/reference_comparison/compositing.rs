//! Global alpha and Porter-Duff operators.

use super::common::*;

#[test]
fn test_global_alpha_overlap_comparison() {
    let test = CanvasTestCase {
        name: "global_alpha_overlap",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_global_alpha(0.5);
            ctx.set_fill_style("#ff0000").unwrap();
            ctx.fill_rect(&rect_params(10.0, 10.0, 50.0, 50.0));
            ctx.set_fill_style("#0000ff").unwrap();
            ctx.fill_rect(&rect_params(30.0, 30.0, 50.0, 50.0));
        },
        reference_fn: |pixmap| {
            pixmap.fill_rect(
                rect(10.0, 10.0, 50.0, 50.0),
                &paint(255, 0, 0, 128),
                sk::Transform::identity(),
                None,
            );
            pixmap.fill_rect(
                rect(30.0, 30.0, 50.0, 50.0),
                &paint(0, 0, 255, 128),
                sk::Transform::identity(),
                None,
            );
        },
        threshold: EXACT_THRESHOLD,
        max_diff_percent: 0.5,
    };
    run_comparison_test(&test).expect("global_alpha_overlap comparison failed");
}

#[test]
fn test_destination_out_comparison() {
    let test = CanvasTestCase {
        name: "destination_out",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_fill_style("#ff0000").unwrap();
            ctx.fill_rect(&rect_params(0.0, 0.0, 100.0, 100.0));
            assert!(ctx.set_global_composite_operation("destination-out"));
            ctx.set_fill_style("#000000").unwrap();
            ctx.circle(50.0, 50.0, 25.0);
            ctx.fill();
        },
        reference_fn: |pixmap| {
            pixmap.fill_rect(
                rect(0.0, 0.0, 100.0, 100.0),
                &paint(255, 0, 0, 255),
                sk::Transform::identity(),
                None,
            );
            let mut cut = paint(0, 0, 0, 255);
            cut.blend_mode = sk::BlendMode::DestinationOut;
            pixmap.fill_path(
                &circle(50.0, 50.0, 25.0),
                &cut,
                sk::FillRule::Winding,
                sk::Transform::identity(),
                None,
            );
        },
        threshold: DEFAULT_THRESHOLD,
        max_diff_percent: MAX_DIFF_PERCENT,
    };
    run_comparison_test(&test).expect("destination_out comparison failed");
}

#[test]
fn test_source_in_comparison() {
    let test = CanvasTestCase {
        name: "source_in",
        width: 100,
        height: 100,
        rust_fn: |ctx| {
            ctx.set_fill_style("#ff0000").unwrap();
            ctx.fill_rect(&rect_params(10.0, 10.0, 50.0, 50.0));
            assert!(ctx.set_global_composite_operation("source-in"));
            ctx.set_fill_style("#0000ff").unwrap();
            ctx.fill_rect(&rect_params(30.0, 30.0, 50.0, 50.0));
        },
        reference_fn: |pixmap| {
            pixmap.fill_rect(
                rect(10.0, 10.0, 50.0, 50.0),
                &paint(255, 0, 0, 255),
                sk::Transform::identity(),
                None,
            );
            let mut inside = paint(0, 0, 255, 255);
            inside.blend_mode = sk::BlendMode::SourceIn;
            pixmap.fill_rect(
                rect(30.0, 30.0, 50.0, 50.0),
                &inside,
                sk::Transform::identity(),
                None,
            );
            // Canvas source-in also clears everything outside the shape.
            let mut outside = paint(0, 0, 0, 0);
            outside.blend_mode = sk::BlendMode::Clear;
            for r in [rect(0.0, 0.0, 100.0, 30.0), rect(0.0, 30.0, 30.0, 70.0)] {
                pixmap.fill_rect(r, &outside, sk::Transform::identity(), None);
            }
        },
        threshold: EXACT_THRESHOLD,
        max_diff_percent: 0.5,
    };
    run_comparison_test(&test).expect("source_in comparison failed");
}
