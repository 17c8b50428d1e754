//! Scanline polygon rasterizer.
//!
//! The rasterizer is a [`Flattener`]: it records the incoming polygon edges
//! and on [`Rasterizer::rasterize`] converts them to coverage spans with
//! four sub-scanlines per pixel row and exact horizontal coverage.

use crate::flatten::Flattener;
use crate::style::CanvasFillRule;

/// Sub-scanlines sampled per pixel row.
const SUBSAMPLES: usize = 4;

/// Coverage value of a fully covered pixel.
pub const FULL_COVERAGE: u16 = 0xffff;

/// A half-open integer rectangle `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Width, zero when empty.
    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    /// Height, zero when empty.
    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn intersect(&self, other: &PixelRect) -> PixelRect {
        PixelRect::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        )
    }

    /// Smallest rectangle containing both; an empty side is ignored.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        PixelRect::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    pub fn translate(&self, dx: i32, dy: i32) -> PixelRect {
        PixelRect::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }

    /// Grow by `amount` on every side.
    pub fn outset(&self, amount: i32) -> PixelRect {
        PixelRect::new(
            self.x0 - amount,
            self.y0 - amount,
            self.x1 + amount,
            self.y1 + amount,
        )
    }
}

/// A horizontal run of pixels `[x0, x1)` on row `y` sharing one coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: i32,
    pub x0: i32,
    pub x1: i32,
    /// Coverage in `0..=FULL_COVERAGE`.
    pub coverage: u16,
}

impl Span {
    /// Coverage as a fraction in `0.0..=1.0`.
    pub fn alpha(&self) -> f32 {
        self.coverage as f32 / FULL_COVERAGE as f32
    }
}

/// Consumer of rasterizer output.
pub trait SpanPainter {
    fn paint_span(&mut self, span: Span);
}

impl<F: FnMut(Span)> SpanPainter for F {
    fn paint_span(&mut self, span: Span) {
        self(span)
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    y1: f64,
    dxdy: f64,
    winding: i32,
}

impl Edge {
    fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Option<Edge> {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) || y0 == y1 {
            return None;
        }
        let (x0, y0, x1, y1, winding) = if y0 < y1 {
            (x0, y0, x1, y1, 1)
        } else {
            (x1, y1, x0, y0, -1)
        };
        Some(Edge {
            x0,
            y0,
            y1,
            dxdy: (x1 - x0) / (y1 - y0),
            winding,
        })
    }

    #[inline]
    fn x_at(&self, y: f64) -> f64 {
        self.x0 + (y - self.y0) * self.dxdy
    }
}

/// Accumulates polygon edges and scan-converts them to spans.
///
/// Every contour is closed implicitly.
#[derive(Debug, Default)]
pub struct Rasterizer {
    edges: Vec<Edge>,
    min_x: f64,
    max_x: f64,
    start: Option<(f64, f64)>,
    last: (f64, f64),
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            start: None,
            last: (0.0, 0.0),
        }
    }

    /// Drop all recorded edges.
    pub fn reset(&mut self) {
        self.edges.clear();
        self.min_x = f64::INFINITY;
        self.max_x = f64::NEG_INFINITY;
        self.start = None;
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.start.is_none()
    }

    fn add_edge(&mut self, from: (f64, f64), to: (f64, f64)) {
        if let Some(edge) = Edge::new(from.0, from.1, to.0, to.1) {
            self.min_x = self.min_x.min(from.0.min(to.0));
            self.max_x = self.max_x.max(from.0.max(to.0));
            self.edges.push(edge);
        }
    }

    fn close_contour(&mut self) {
        if let Some(start) = self.start {
            if start != self.last {
                self.add_edge(self.last, start);
            }
            self.last = start;
        }
    }

    /// Pixel bounds of the recorded edges, or `None` when nothing would be
    /// painted.
    pub fn bounds(&self) -> Option<PixelRect> {
        if self.edges.is_empty() {
            return None;
        }
        let (min_y, max_y) = self
            .edges
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
                (lo.min(e.y0), hi.max(e.y1))
            });
        Some(PixelRect::new(
            to_pixel(self.min_x.floor()),
            to_pixel(min_y.floor()),
            to_pixel(self.max_x.ceil()),
            to_pixel(max_y.ceil()),
        ))
    }

    /// Scan-convert the recorded polygon inside `clip` and hand the spans to
    /// `painter`, row by row from top to bottom. The edges are kept so the
    /// same polygon can be rasterized again.
    pub fn rasterize(
        &mut self,
        fill_rule: CanvasFillRule,
        clip: PixelRect,
        painter: &mut dyn SpanPainter,
    ) {
        self.close_contour();
        self.start = None;
        let Some(bounds) = self.bounds() else {
            return;
        };
        let area = bounds.intersect(&clip);
        if area.is_empty() {
            return;
        }

        let mut edges = self.edges.clone();
        edges.sort_by(|a, b| a.y0.total_cmp(&b.y0));

        let mut row = vec![0f32; area.width() as usize + 1];
        let mut active: Vec<usize> = Vec::new();
        let mut crossings: Vec<(f64, i32)> = Vec::new();
        let mut next = 0;
        let weight = 1.0 / SUBSAMPLES as f32;

        for y in area.y0..area.y1 {
            let top = y as f64;
            let bottom = top + 1.0;
            while next < edges.len() && edges[next].y0 < bottom {
                active.push(next);
                next += 1;
            }
            active.retain(|&i| edges[i].y1 > top);
            if active.is_empty() {
                if next == edges.len() {
                    break;
                }
                continue;
            }

            let mut touched: Option<(usize, usize)> = None;
            for s in 0..SUBSAMPLES {
                let sy = top + (s as f64 + 0.5) / SUBSAMPLES as f64;
                crossings.clear();
                for &i in &active {
                    let e = &edges[i];
                    if e.y0 <= sy && sy < e.y1 {
                        crossings.push((e.x_at(sy), e.winding));
                    }
                }
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                let mut enter = 0.0;
                for &(x, dir) in &crossings {
                    let was_inside = fill_rule.is_inside(winding);
                    winding += dir;
                    let inside = fill_rule.is_inside(winding);
                    if !was_inside && inside {
                        enter = x;
                    } else if was_inside && !inside {
                        if let Some(range) = accumulate(&mut row, &area, enter, x, weight) {
                            touched = Some(match touched {
                                Some((lo, hi)) => (lo.min(range.0), hi.max(range.1)),
                                None => range,
                            });
                        }
                    }
                }
            }

            if let Some((lo, hi)) = touched {
                emit_row(&mut row[lo..=hi], y, area.x0 + lo as i32, painter);
            }
        }
    }
}

fn to_pixel(v: f64) -> i32 {
    v.clamp(i32::MIN as f64 / 2.0, i32::MAX as f64 / 2.0) as i32
}

/// Add `weight × covered fraction` of `[xa, xb)` to each cell of `row`.
/// Returns the touched cell range.
fn accumulate(
    row: &mut [f32],
    area: &PixelRect,
    xa: f64,
    xb: f64,
    weight: f32,
) -> Option<(usize, usize)> {
    let left = area.x0 as f64;
    let right = area.x1 as f64;
    let xa = xa.max(left) - left;
    let xb = xb.min(right) - left;
    if !(xb > xa) {
        return None;
    }
    let ia = xa.floor() as usize;
    let ib = xb.floor() as usize;
    if ia == ib {
        row[ia] += (xb - xa) as f32 * weight;
        return Some((ia, ia));
    }
    row[ia] += ((ia + 1) as f64 - xa) as f32 * weight;
    for cell in &mut row[ia + 1..ib] {
        *cell += weight;
    }
    let tail = (xb - ib as f64) as f32;
    if tail > 0.0 && ib < row.len() {
        row[ib] += tail * weight;
        return Some((ia, ib));
    }
    Some((ia, ib - 1))
}

/// Quantize accumulated coverage, merge equal neighbours into spans and
/// reset the cells.
fn emit_row(cells: &mut [f32], y: i32, x_start: i32, painter: &mut dyn SpanPainter) {
    let mut run: Option<Span> = None;
    for (i, cell) in cells.iter_mut().enumerate() {
        let coverage = (cell.clamp(0.0, 1.0) * FULL_COVERAGE as f32).round() as u16;
        *cell = 0.0;
        let x = x_start + i as i32;
        match run.as_mut() {
            Some(span) if span.coverage == coverage && span.x1 == x => span.x1 = x + 1,
            _ => {
                if let Some(span) = run.take() {
                    painter.paint_span(span);
                }
                if coverage > 0 {
                    run = Some(Span {
                        y,
                        x0: x,
                        x1: x + 1,
                        coverage,
                    });
                }
            }
        }
    }
    if let Some(span) = run {
        painter.paint_span(span);
    }
}

impl Flattener for Rasterizer {
    fn move_to(&mut self, x: f64, y: f64) {
        self.close_contour();
        self.start = Some((x, y));
        self.last = (x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.start.is_none() {
            self.move_to(x, y);
            return;
        }
        self.add_edge(self.last, (x, y));
        self.last = (x, y);
    }

    fn close(&mut self) {
        self.close_contour();
    }

    fn end(&mut self) {
        self.close_contour();
        self.start = None;
    }
}
