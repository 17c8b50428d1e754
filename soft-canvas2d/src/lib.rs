//! Software Canvas 2D rendering engine.
//!
//! Draws vector paths, text outlines, gradients and images into an RGBA
//! buffer without a GPU or a browser. The pipeline is layered:
//! - [`Matrix`] and [`Path`] hold affine transforms and device-space geometry
//! - [`flatten`] turns curves and arcs into line segments
//! - [`stroke`] widens and dashes polylines into fillable outlines
//! - [`raster`] accumulates anti-aliased coverage per pixel span
//! - [`painter`] blends spans with Porter-Duff operators, clips and shadows
//!
//! [`Canvas2dContext`] puts these together behind a stateful Canvas-style
//! API, and [`backend`] abstracts over it so drawing can be recorded and
//! replayed.
//!
//! # Example
//!
//! ```rust,ignore
//! use soft_canvas2d::{Canvas2dContext, RectParams};
//!
//! let mut ctx = Canvas2dContext::new(400, 300)?;
//! ctx.set_fill_style("#ff0000")?;
//! ctx.fill_rect(&RectParams { x: 10.0, y: 10.0, width: 100.0, height: 50.0 });
//! let rgba = ctx.image();
//! ```

pub mod backend;
pub mod blur;
pub mod blur_cache;
pub mod color;
pub mod composite;
mod config;
mod context;
mod drawing_state;
mod error;
pub mod flatten;
mod font_parser;
mod geometry;
mod gradient;
mod matrix;
pub mod painter;
mod path;
mod pattern;
pub mod raster;
pub mod stroke;
mod style;
pub mod text;

// Re-export public API
pub use backend::{Canvas2d, DrawCommand, RecordingCanvas};
pub use blur_cache::{BlurCache, SharedBlurCache};
pub use color::CanvasColor;
pub use composite::CompositeOperation;
pub use config::CanvasConfig;
pub use context::{Canvas2dContext, Canvas2dContextBuilder};
pub use drawing_state::DrawingState;
pub use error::{Canvas2dError, Canvas2dResult};
pub use font_parser::{parse_font, FontRequest, FontStyle, FontWeight};
pub use geometry::{
    ArcParams, ArcToParams, CanvasImageDataRef, CubicBezierParams, DirtyRect, EllipseParams,
    ImageCropParams, QuadraticBezierParams, RadialGradientParams, RectParams, RoundedRectParams,
    Shadow,
};
pub use gradient::{CanvasGradient, GradientStop};
pub use matrix::Matrix;
pub use path::{normalize_arc, Path, PathCmd, PathSegment, Segments};
pub use pattern::{CanvasPattern, Repetition};
pub use style::{
    CanvasFillRule, FillStyle, ImageFilter, LineCap, LineJoin, TextAlign, TextBaseline,
};
pub use text::{FontMetrics, Glyph, GlyphProvider, TextMetrics};
