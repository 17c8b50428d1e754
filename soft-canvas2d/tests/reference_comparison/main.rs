//! Reference comparison tests: compare soft-canvas2d output against tiny-skia.
//!
//! Both renderers draw the same scene into a premultiplied RGBA buffer and the
//! results must agree up to anti-aliasing differences along edges.

mod common;

mod compositing;
mod shapes;
mod strokes;
