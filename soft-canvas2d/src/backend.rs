//! Backend-neutral drawing interface.
//!
//! [`Canvas2d`] is the drawing surface a front end talks to. The software
//! [`Canvas2dContext`] rasterizes every call; [`RecordingCanvas`] keeps a
//! [`DrawCommand`] log of every call while forwarding it to another backend,
//! so the same drawing can be replayed elsewhere later.

use crate::color::CanvasColor;
use crate::composite::CompositeOperation;
use crate::context::Canvas2dContext;
use crate::font_parser::FontRequest;
use crate::geometry::{
    ArcParams, ArcToParams, CanvasImageDataRef, CubicBezierParams, EllipseParams, ImageCropParams,
    QuadraticBezierParams, RectParams, RoundedRectParams, Shadow,
};
use crate::matrix::Matrix;
use crate::path::Path;
use crate::style::{CanvasFillRule, FillStyle, ImageFilter, LineCap, LineJoin, TextAlign, TextBaseline};
use crate::text::TextMetrics;
use std::sync::Arc;

/// A 2D drawing surface.
///
/// Coordinates are in user space and go through the current transform.
/// Invalid style values are ignored by implementations, never reported.
pub trait Canvas2d {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn save(&mut self);
    fn restore(&mut self);
    /// Clear the surface and return to the initial state.
    fn reset(&mut self);
    fn clear(&mut self);
    fn clear_with_color(&mut self, color: CanvasColor);

    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);
    fn rotate_about(&mut self, angle: f64, x: f64, y: f64);
    fn scale_about(&mut self, sx: f64, sy: f64, x: f64, y: f64);
    fn transform(&mut self, matrix: Matrix);
    fn set_transform(&mut self, matrix: Matrix);
    fn reset_transform(&mut self);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams);
    fn bezier_curve_to(&mut self, params: &CubicBezierParams);
    fn arc(&mut self, params: &ArcParams);
    fn arc_to(&mut self, params: &ArcToParams);
    fn ellipse(&mut self, params: &EllipseParams);
    fn rect(&mut self, params: &RectParams);
    fn rounded_rect(&mut self, params: &RoundedRectParams);
    fn circle(&mut self, cx: f64, cy: f64, radius: f64);
    fn full_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64);

    fn fill(&mut self);
    fn fill_with_rule(&mut self, fill_rule: CanvasFillRule);
    fn stroke(&mut self);
    fn fill_stroke(&mut self);
    fn clip(&mut self);
    fn clip_with_rule(&mut self, fill_rule: CanvasFillRule);
    fn fill_path(&mut self, path: &Path, fill_rule: CanvasFillRule);
    fn stroke_path(&mut self, path: &Path);
    fn fill_rect(&mut self, params: &RectParams);
    fn stroke_rect(&mut self, params: &RectParams);
    fn clear_rect(&mut self, params: &RectParams);

    fn set_fill_paint(&mut self, style: FillStyle);
    fn set_stroke_paint(&mut self, style: FillStyle);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_miter_limit(&mut self, limit: f64);
    fn set_line_dash(&mut self, segments: Vec<f64>);
    fn set_line_dash_offset(&mut self, offset: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_composite_operation(&mut self, operation: CompositeOperation);
    fn set_fill_rule(&mut self, fill_rule: CanvasFillRule);
    fn set_image_filter(&mut self, filter: ImageFilter);
    fn set_shadow(&mut self, shadow: Shadow);

    fn set_font_request(&mut self, font: FontRequest);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);
    fn measure_text(&self, text: &str) -> TextMetrics;

    /// Draw the `params` source rectangle of non-premultiplied RGBA data
    /// into its destination rectangle.
    fn draw_image(&mut self, image: &CanvasImageDataRef<'_>, params: &ImageCropParams);
    /// Replace pixels with non-premultiplied RGBA data.
    fn put_image_data(&mut self, data: &[u8], width: u32, height: u32, dx: i32, dy: i32);
    /// The whole surface as non-premultiplied RGBA.
    fn image(&self) -> Vec<u8>;
}

impl Canvas2d for Canvas2dContext {
    fn width(&self) -> u32 {
        Canvas2dContext::width(self)
    }

    fn height(&self) -> u32 {
        Canvas2dContext::height(self)
    }

    fn save(&mut self) {
        Canvas2dContext::save(self)
    }

    fn restore(&mut self) {
        Canvas2dContext::restore(self)
    }

    fn reset(&mut self) {
        Canvas2dContext::reset(self)
    }

    fn clear(&mut self) {
        Canvas2dContext::clear(self)
    }

    fn clear_with_color(&mut self, color: CanvasColor) {
        Canvas2dContext::clear_with_color(self, color)
    }

    fn translate(&mut self, x: f64, y: f64) {
        Canvas2dContext::translate(self, x, y)
    }

    fn rotate(&mut self, angle: f64) {
        Canvas2dContext::rotate(self, angle)
    }

    fn scale(&mut self, x: f64, y: f64) {
        Canvas2dContext::scale(self, x, y)
    }

    fn rotate_about(&mut self, angle: f64, x: f64, y: f64) {
        Canvas2dContext::rotate_about(self, angle, x, y)
    }

    fn scale_about(&mut self, sx: f64, sy: f64, x: f64, y: f64) {
        Canvas2dContext::scale_about(self, sx, sy, x, y)
    }

    fn transform(&mut self, matrix: Matrix) {
        Canvas2dContext::transform(self, matrix)
    }

    fn set_transform(&mut self, matrix: Matrix) {
        Canvas2dContext::set_transform(self, matrix)
    }

    fn reset_transform(&mut self) {
        Canvas2dContext::reset_transform(self)
    }

    fn begin_path(&mut self) {
        Canvas2dContext::begin_path(self)
    }

    fn close_path(&mut self) {
        Canvas2dContext::close_path(self)
    }

    fn move_to(&mut self, x: f64, y: f64) {
        Canvas2dContext::move_to(self, x, y)
    }

    fn line_to(&mut self, x: f64, y: f64) {
        Canvas2dContext::line_to(self, x, y)
    }

    fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) {
        Canvas2dContext::quadratic_curve_to(self, params)
    }

    fn bezier_curve_to(&mut self, params: &CubicBezierParams) {
        Canvas2dContext::bezier_curve_to(self, params)
    }

    fn arc(&mut self, params: &ArcParams) {
        Canvas2dContext::arc(self, params)
    }

    fn arc_to(&mut self, params: &ArcToParams) {
        Canvas2dContext::arc_to(self, params)
    }

    fn ellipse(&mut self, params: &EllipseParams) {
        Canvas2dContext::ellipse(self, params)
    }

    fn rect(&mut self, params: &RectParams) {
        Canvas2dContext::rect(self, params)
    }

    fn rounded_rect(&mut self, params: &RoundedRectParams) {
        Canvas2dContext::rounded_rect(self, params)
    }

    fn circle(&mut self, cx: f64, cy: f64, radius: f64) {
        Canvas2dContext::circle(self, cx, cy, radius)
    }

    fn full_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        Canvas2dContext::full_ellipse(self, cx, cy, rx, ry)
    }

    fn fill(&mut self) {
        Canvas2dContext::fill(self)
    }

    fn fill_with_rule(&mut self, fill_rule: CanvasFillRule) {
        Canvas2dContext::fill_with_rule(self, fill_rule)
    }

    fn stroke(&mut self) {
        Canvas2dContext::stroke(self)
    }

    fn fill_stroke(&mut self) {
        Canvas2dContext::fill_stroke(self)
    }

    fn clip(&mut self) {
        Canvas2dContext::clip(self)
    }

    fn clip_with_rule(&mut self, fill_rule: CanvasFillRule) {
        Canvas2dContext::clip_with_rule(self, fill_rule)
    }

    fn fill_path(&mut self, path: &Path, fill_rule: CanvasFillRule) {
        Canvas2dContext::fill_path(self, path, fill_rule)
    }

    fn stroke_path(&mut self, path: &Path) {
        Canvas2dContext::stroke_path(self, path)
    }

    fn fill_rect(&mut self, params: &RectParams) {
        Canvas2dContext::fill_rect(self, params)
    }

    fn stroke_rect(&mut self, params: &RectParams) {
        Canvas2dContext::stroke_rect(self, params)
    }

    fn clear_rect(&mut self, params: &RectParams) {
        Canvas2dContext::clear_rect(self, params)
    }

    fn set_fill_paint(&mut self, style: FillStyle) {
        self.state_mut().fill_style = style;
    }

    fn set_stroke_paint(&mut self, style: FillStyle) {
        self.state_mut().stroke_style = style;
    }

    fn set_line_width(&mut self, width: f64) {
        Canvas2dContext::set_line_width(self, width)
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        Canvas2dContext::set_line_cap(self, cap)
    }

    fn set_line_join(&mut self, join: LineJoin) {
        Canvas2dContext::set_line_join(self, join)
    }

    fn set_miter_limit(&mut self, limit: f64) {
        Canvas2dContext::set_miter_limit(self, limit)
    }

    fn set_line_dash(&mut self, segments: Vec<f64>) {
        Canvas2dContext::set_line_dash(self, segments)
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        Canvas2dContext::set_line_dash_offset(self, offset)
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        Canvas2dContext::set_global_alpha(self, alpha)
    }

    fn set_composite_operation(&mut self, operation: CompositeOperation) {
        self.state_mut().global_composite_operation = operation;
    }

    fn set_fill_rule(&mut self, fill_rule: CanvasFillRule) {
        Canvas2dContext::set_fill_rule(self, fill_rule)
    }

    fn set_image_filter(&mut self, filter: ImageFilter) {
        Canvas2dContext::set_image_filter(self, filter)
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        self.set_shadow_offset_x(shadow.offset_x);
        self.set_shadow_offset_y(shadow.offset_y);
        self.set_shadow_blur(shadow.blur);
        self.set_shadow_color_value(shadow.color);
    }

    fn set_font_request(&mut self, font: FontRequest) {
        self.state_mut().font = font;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        Canvas2dContext::set_text_align(self, align)
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        Canvas2dContext::set_text_baseline(self, baseline)
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        Canvas2dContext::fill_text(self, text, x, y)
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        Canvas2dContext::stroke_text(self, text, x, y)
    }

    fn measure_text(&self, text: &str) -> TextMetrics {
        Canvas2dContext::measure_text(self, text)
    }

    fn draw_image(&mut self, image: &CanvasImageDataRef<'_>, params: &ImageCropParams) {
        self.draw_image_data_cropped(image, params)
    }

    fn put_image_data(&mut self, data: &[u8], width: u32, height: u32, dx: i32, dy: i32) {
        Canvas2dContext::put_image_data(self, data, width, height, dx, dy)
    }

    fn image(&self) -> Vec<u8> {
        Canvas2dContext::image(self)
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Save,
    Restore,
    Reset,
    Clear,
    ClearWithColor(CanvasColor),
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    RotateAbout(f64, f64, f64),
    ScaleAbout(f64, f64, f64, f64),
    Transform(Matrix),
    SetTransform(Matrix),
    ResetTransform,
    BeginPath,
    ClosePath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadraticCurveTo(QuadraticBezierParams),
    BezierCurveTo(CubicBezierParams),
    Arc(ArcParams),
    ArcTo(ArcToParams),
    Ellipse(EllipseParams),
    Rect(RectParams),
    RoundedRect(RoundedRectParams),
    Circle(f64, f64, f64),
    FullEllipse(f64, f64, f64, f64),
    Fill,
    FillWithRule(CanvasFillRule),
    Stroke,
    FillStroke,
    Clip,
    ClipWithRule(CanvasFillRule),
    FillPath(Path, CanvasFillRule),
    StrokePath(Path),
    FillRect(RectParams),
    StrokeRect(RectParams),
    ClearRect(RectParams),
    SetFillPaint(FillStyle),
    SetStrokePaint(FillStyle),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    SetMiterLimit(f64),
    SetLineDash(Vec<f64>),
    SetLineDashOffset(f64),
    SetGlobalAlpha(f64),
    SetCompositeOperation(CompositeOperation),
    SetFillRule(CanvasFillRule),
    SetImageFilter(ImageFilter),
    SetShadow(Shadow),
    SetFont(FontRequest),
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    FillText(String, f64, f64),
    StrokeText(String, f64, f64),
    DrawImage {
        data: Arc<[u8]>,
        width: u32,
        height: u32,
        params: ImageCropParams,
    },
    PutImageData {
        data: Arc<[u8]>,
        width: u32,
        height: u32,
        dx: i32,
        dy: i32,
    },
}

impl DrawCommand {
    /// Issue this command on `target`.
    pub fn apply(&self, target: &mut dyn Canvas2d) {
        match self {
            DrawCommand::Save => target.save(),
            DrawCommand::Restore => target.restore(),
            DrawCommand::Reset => target.reset(),
            DrawCommand::Clear => target.clear(),
            DrawCommand::ClearWithColor(color) => target.clear_with_color(*color),
            DrawCommand::Translate(x, y) => target.translate(*x, *y),
            DrawCommand::Rotate(angle) => target.rotate(*angle),
            DrawCommand::Scale(x, y) => target.scale(*x, *y),
            DrawCommand::RotateAbout(angle, x, y) => target.rotate_about(*angle, *x, *y),
            DrawCommand::ScaleAbout(sx, sy, x, y) => target.scale_about(*sx, *sy, *x, *y),
            DrawCommand::Transform(matrix) => target.transform(*matrix),
            DrawCommand::SetTransform(matrix) => target.set_transform(*matrix),
            DrawCommand::ResetTransform => target.reset_transform(),
            DrawCommand::BeginPath => target.begin_path(),
            DrawCommand::ClosePath => target.close_path(),
            DrawCommand::MoveTo(x, y) => target.move_to(*x, *y),
            DrawCommand::LineTo(x, y) => target.line_to(*x, *y),
            DrawCommand::QuadraticCurveTo(params) => target.quadratic_curve_to(params),
            DrawCommand::BezierCurveTo(params) => target.bezier_curve_to(params),
            DrawCommand::Arc(params) => target.arc(params),
            DrawCommand::ArcTo(params) => target.arc_to(params),
            DrawCommand::Ellipse(params) => target.ellipse(params),
            DrawCommand::Rect(params) => target.rect(params),
            DrawCommand::RoundedRect(params) => target.rounded_rect(params),
            DrawCommand::Circle(cx, cy, r) => target.circle(*cx, *cy, *r),
            DrawCommand::FullEllipse(cx, cy, rx, ry) => target.full_ellipse(*cx, *cy, *rx, *ry),
            DrawCommand::Fill => target.fill(),
            DrawCommand::FillWithRule(rule) => target.fill_with_rule(*rule),
            DrawCommand::Stroke => target.stroke(),
            DrawCommand::FillStroke => target.fill_stroke(),
            DrawCommand::Clip => target.clip(),
            DrawCommand::ClipWithRule(rule) => target.clip_with_rule(*rule),
            DrawCommand::FillPath(path, rule) => target.fill_path(path, *rule),
            DrawCommand::StrokePath(path) => target.stroke_path(path),
            DrawCommand::FillRect(params) => target.fill_rect(params),
            DrawCommand::StrokeRect(params) => target.stroke_rect(params),
            DrawCommand::ClearRect(params) => target.clear_rect(params),
            DrawCommand::SetFillPaint(style) => target.set_fill_paint(style.clone()),
            DrawCommand::SetStrokePaint(style) => target.set_stroke_paint(style.clone()),
            DrawCommand::SetLineWidth(width) => target.set_line_width(*width),
            DrawCommand::SetLineCap(cap) => target.set_line_cap(*cap),
            DrawCommand::SetLineJoin(join) => target.set_line_join(*join),
            DrawCommand::SetMiterLimit(limit) => target.set_miter_limit(*limit),
            DrawCommand::SetLineDash(segments) => target.set_line_dash(segments.clone()),
            DrawCommand::SetLineDashOffset(offset) => target.set_line_dash_offset(*offset),
            DrawCommand::SetGlobalAlpha(alpha) => target.set_global_alpha(*alpha),
            DrawCommand::SetCompositeOperation(op) => target.set_composite_operation(*op),
            DrawCommand::SetFillRule(rule) => target.set_fill_rule(*rule),
            DrawCommand::SetImageFilter(filter) => target.set_image_filter(*filter),
            DrawCommand::SetShadow(shadow) => target.set_shadow(*shadow),
            DrawCommand::SetFont(font) => target.set_font_request(font.clone()),
            DrawCommand::SetTextAlign(align) => target.set_text_align(*align),
            DrawCommand::SetTextBaseline(baseline) => target.set_text_baseline(*baseline),
            DrawCommand::FillText(text, x, y) => target.fill_text(text, *x, *y),
            DrawCommand::StrokeText(text, x, y) => target.stroke_text(text, *x, *y),
            DrawCommand::DrawImage {
                data,
                width,
                height,
                params,
            } => {
                let image = CanvasImageDataRef {
                    data: &data[..],
                    width: *width,
                    height: *height,
                };
                target.draw_image(&image, params)
            }
            DrawCommand::PutImageData {
                data,
                width,
                height,
                dx,
                dy,
            } => target.put_image_data(&data[..], *width, *height, *dx, *dy),
        }
    }
}

/// Backend that logs every call and forwards it to an inner backend.
#[derive(Debug)]
pub struct RecordingCanvas<B> {
    inner: B,
    commands: Vec<DrawCommand>,
}

impl<B: Canvas2d> RecordingCanvas<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            commands: Vec::new(),
        }
    }

    /// Commands recorded so far, oldest first.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Remove and return the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    /// Issue every recorded command, in order, on `target`.
    pub fn replay(&self, target: &mut dyn Canvas2d) {
        log::debug!(target: "canvas", "replay {} commands", self.commands.len());
        for command in &self.commands {
            command.apply(target);
        }
    }

    fn record(&mut self, command: DrawCommand) {
        command.apply(&mut self.inner);
        self.commands.push(command);
    }
}

impl<B: Canvas2d> Canvas2d for RecordingCanvas<B> {
    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn save(&mut self) {
        self.record(DrawCommand::Save)
    }

    fn restore(&mut self) {
        self.record(DrawCommand::Restore)
    }

    fn reset(&mut self) {
        self.record(DrawCommand::Reset)
    }

    fn clear(&mut self) {
        self.record(DrawCommand::Clear)
    }

    fn clear_with_color(&mut self, color: CanvasColor) {
        self.record(DrawCommand::ClearWithColor(color))
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::Translate(x, y))
    }

    fn rotate(&mut self, angle: f64) {
        self.record(DrawCommand::Rotate(angle))
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::Scale(x, y))
    }

    fn rotate_about(&mut self, angle: f64, x: f64, y: f64) {
        self.record(DrawCommand::RotateAbout(angle, x, y))
    }

    fn scale_about(&mut self, sx: f64, sy: f64, x: f64, y: f64) {
        self.record(DrawCommand::ScaleAbout(sx, sy, x, y))
    }

    fn transform(&mut self, matrix: Matrix) {
        self.record(DrawCommand::Transform(matrix))
    }

    fn set_transform(&mut self, matrix: Matrix) {
        self.record(DrawCommand::SetTransform(matrix))
    }

    fn reset_transform(&mut self) {
        self.record(DrawCommand::ResetTransform)
    }

    fn begin_path(&mut self) {
        self.record(DrawCommand::BeginPath)
    }

    fn close_path(&mut self) {
        self.record(DrawCommand::ClosePath)
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::MoveTo(x, y))
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(DrawCommand::LineTo(x, y))
    }

    fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) {
        self.record(DrawCommand::QuadraticCurveTo(*params))
    }

    fn bezier_curve_to(&mut self, params: &CubicBezierParams) {
        self.record(DrawCommand::BezierCurveTo(*params))
    }

    fn arc(&mut self, params: &ArcParams) {
        self.record(DrawCommand::Arc(*params))
    }

    fn arc_to(&mut self, params: &ArcToParams) {
        self.record(DrawCommand::ArcTo(*params))
    }

    fn ellipse(&mut self, params: &EllipseParams) {
        self.record(DrawCommand::Ellipse(*params))
    }

    fn rect(&mut self, params: &RectParams) {
        self.record(DrawCommand::Rect(*params))
    }

    fn rounded_rect(&mut self, params: &RoundedRectParams) {
        self.record(DrawCommand::RoundedRect(*params))
    }

    fn circle(&mut self, cx: f64, cy: f64, radius: f64) {
        self.record(DrawCommand::Circle(cx, cy, radius))
    }

    fn full_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.record(DrawCommand::FullEllipse(cx, cy, rx, ry))
    }

    fn fill(&mut self) {
        self.record(DrawCommand::Fill)
    }

    fn fill_with_rule(&mut self, fill_rule: CanvasFillRule) {
        self.record(DrawCommand::FillWithRule(fill_rule))
    }

    fn stroke(&mut self) {
        self.record(DrawCommand::Stroke)
    }

    fn fill_stroke(&mut self) {
        self.record(DrawCommand::FillStroke)
    }

    fn clip(&mut self) {
        self.record(DrawCommand::Clip)
    }

    fn clip_with_rule(&mut self, fill_rule: CanvasFillRule) {
        self.record(DrawCommand::ClipWithRule(fill_rule))
    }

    fn fill_path(&mut self, path: &Path, fill_rule: CanvasFillRule) {
        self.record(DrawCommand::FillPath(path.clone(), fill_rule))
    }

    fn stroke_path(&mut self, path: &Path) {
        self.record(DrawCommand::StrokePath(path.clone()))
    }

    fn fill_rect(&mut self, params: &RectParams) {
        self.record(DrawCommand::FillRect(*params))
    }

    fn stroke_rect(&mut self, params: &RectParams) {
        self.record(DrawCommand::StrokeRect(*params))
    }

    fn clear_rect(&mut self, params: &RectParams) {
        self.record(DrawCommand::ClearRect(*params))
    }

    fn set_fill_paint(&mut self, style: FillStyle) {
        self.record(DrawCommand::SetFillPaint(style))
    }

    fn set_stroke_paint(&mut self, style: FillStyle) {
        self.record(DrawCommand::SetStrokePaint(style))
    }

    fn set_line_width(&mut self, width: f64) {
        self.record(DrawCommand::SetLineWidth(width))
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.record(DrawCommand::SetLineCap(cap))
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.record(DrawCommand::SetLineJoin(join))
    }

    fn set_miter_limit(&mut self, limit: f64) {
        self.record(DrawCommand::SetMiterLimit(limit))
    }

    fn set_line_dash(&mut self, segments: Vec<f64>) {
        self.record(DrawCommand::SetLineDash(segments))
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.record(DrawCommand::SetLineDashOffset(offset))
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.record(DrawCommand::SetGlobalAlpha(alpha))
    }

    fn set_composite_operation(&mut self, operation: CompositeOperation) {
        self.record(DrawCommand::SetCompositeOperation(operation))
    }

    fn set_fill_rule(&mut self, fill_rule: CanvasFillRule) {
        self.record(DrawCommand::SetFillRule(fill_rule))
    }

    fn set_image_filter(&mut self, filter: ImageFilter) {
        self.record(DrawCommand::SetImageFilter(filter))
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        self.record(DrawCommand::SetShadow(shadow))
    }

    fn set_font_request(&mut self, font: FontRequest) {
        self.record(DrawCommand::SetFont(font))
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.record(DrawCommand::SetTextAlign(align))
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.record(DrawCommand::SetTextBaseline(baseline))
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.record(DrawCommand::FillText(text.to_string(), x, y))
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.record(DrawCommand::StrokeText(text.to_string(), x, y))
    }

    fn measure_text(&self, text: &str) -> TextMetrics {
        self.inner.measure_text(text)
    }

    fn draw_image(&mut self, image: &CanvasImageDataRef<'_>, params: &ImageCropParams) {
        self.record(DrawCommand::DrawImage {
            data: Arc::from(image.data),
            width: image.width,
            height: image.height,
            params: *params,
        })
    }

    fn put_image_data(&mut self, data: &[u8], width: u32, height: u32, dx: i32, dy: i32) {
        self.record(DrawCommand::PutImageData {
            data: Arc::from(data),
            width,
            height,
            dx,
            dy,
        })
    }

    fn image(&self) -> Vec<u8> {
        self.inner.image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(canvas: &mut dyn Canvas2d) {
        canvas.set_fill_paint(FillStyle::Color(CanvasColor::from_rgba8(200, 10, 10, 255)));
        canvas.fill_rect(&RectParams {
            x: 2.0,
            y: 2.0,
            width: 10.0,
            height: 6.0,
        });
        canvas.save();
        canvas.translate(10.0, 10.0);
        canvas.set_line_width(3.0);
        canvas.set_line_dash(vec![4.0, 2.0]);
        canvas.move_to(0.0, 0.0);
        canvas.line_to(8.0, 8.0);
        canvas.stroke();
        canvas.restore();
        canvas.set_global_alpha(0.5);
        canvas.circle(15.0, 5.0, 4.0);
        canvas.fill();
    }

    #[test]
    fn test_recording_forwards_calls() {
        let mut direct = Canvas2dContext::new(24, 24).unwrap();
        scene(&mut direct);

        let mut recording = RecordingCanvas::new(Canvas2dContext::new(24, 24).unwrap());
        scene(&mut recording);
        assert_eq!(recording.commands().len(), 13);
        assert!(matches!(recording.commands()[3], DrawCommand::Translate(x, y) if x == 10.0 && y == 10.0));
        assert_eq!(recording.image(), direct.image());
    }

    #[test]
    fn test_replay_reproduces_pixels() {
        let mut recording = RecordingCanvas::new(Canvas2dContext::new(24, 24).unwrap());
        scene(&mut recording);

        let mut target = Canvas2dContext::new(24, 24).unwrap();
        recording.replay(&mut target);
        assert_eq!(target.image(), recording.inner().image());
        assert!(target.image().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_take_commands_and_images() {
        let mut recording = RecordingCanvas::new(Canvas2dContext::new(4, 4).unwrap());
        let data = [0u8, 0, 255, 255];
        let image = CanvasImageDataRef {
            data: &data,
            width: 1,
            height: 1,
        };
        recording.draw_image(
            &image,
            &ImageCropParams {
                sx: 0.0,
                sy: 0.0,
                sw: 1.0,
                sh: 1.0,
                dx: 1.0,
                dy: 1.0,
                dw: 1.0,
                dh: 1.0,
            },
        );
        recording.put_image_data(&[255, 0, 0, 255], 1, 1, 0, 0);
        let commands = recording.take_commands();
        assert_eq!(commands.len(), 2);
        assert!(recording.commands().is_empty());

        let mut target = Canvas2dContext::new(4, 4).unwrap();
        for command in &commands {
            command.apply(&mut target);
        }
        assert_eq!(target.image(), recording.into_inner().image());
        assert_eq!(&target.image()[0..4], &[255, 0, 0, 255]);
        assert_eq!(&target.image()[20..24], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_context_through_trait_object() {
        let mut ctx = Canvas2dContext::new(8, 8).unwrap();
        let canvas: &mut dyn Canvas2d = &mut ctx;
        canvas.set_composite_operation(CompositeOperation::Xor);
        canvas.set_shadow(Shadow {
            offset_x: 1.0,
            offset_y: f64::NAN,
            blur: 2.0,
            color: CanvasColor::BLACK,
        });
        assert_eq!((canvas.width(), canvas.height()), (8, 8));
        assert_eq!(ctx.global_composite_operation(), "xor");
        assert_eq!(ctx.shadow().offset_x, 1.0);
        assert_eq!(ctx.shadow().offset_y, 0.0);
        assert_eq!(ctx.shadow().blur, 2.0);
    }
}
