//! Drawing state that can be saved and restored.

use crate::composite::CompositeOperation;
use crate::font_parser::FontRequest;
use crate::geometry::Shadow;
use crate::matrix::Matrix;
use crate::path::Path;
use crate::style::{CanvasFillRule, FillStyle, ImageFilter, LineCap, LineJoin, TextAlign, TextBaseline};
use std::sync::Arc;
use tiny_skia::Mask;

/// Drawing state that can be saved and restored.
///
/// The current path lives here too, in device space, so a restore brings it
/// back exactly as it was saved.
#[derive(Debug, Clone)]
pub struct DrawingState {
    /// Current fill style.
    pub fill_style: FillStyle,
    /// Current stroke style.
    pub stroke_style: FillStyle,
    /// Line width in user units.
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    /// Dash lengths in user units, always of even length.
    pub line_dash: Vec<f64>,
    pub line_dash_offset: f64,
    /// Fill rule for `fill` and `clip`.
    pub fill_rule: CanvasFillRule,
    /// Current font specification.
    pub font: FontRequest,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    /// Current global alpha.
    pub global_alpha: f64,
    /// Current global composite operation.
    pub global_composite_operation: CompositeOperation,
    pub shadow: Shadow,
    /// Resampling filter for images and patterns.
    pub image_filter: ImageFilter,
    /// Current transform matrix.
    pub transform: Matrix,
    /// Device-space clip mask (if any). Masks are replaced, never mutated.
    pub clip: Option<Arc<Mask>>,
    /// Current path in device space.
    pub path: Path,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_style: FillStyle::default(),
            stroke_style: FillStyle::default(),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            fill_rule: CanvasFillRule::default(),
            font: FontRequest::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            global_alpha: 1.0,
            global_composite_operation: CompositeOperation::SourceOver,
            shadow: Shadow::default(),
            image_filter: ImageFilter::default(),
            transform: Matrix::IDENTITY,
            clip: None,
            path: Path::new(),
        }
    }
}

/// The active drawing state plus the states pushed by `save`.
#[derive(Debug, Clone, Default)]
pub struct FrameStack {
    current: DrawingState,
    saved: Vec<DrawingState>,
}

impl FrameStack {
    pub fn new(initial: DrawingState) -> Self {
        Self {
            current: initial,
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> &DrawingState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut DrawingState {
        &mut self.current
    }

    /// Push a copy of the current state.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state. Returns `false`, leaving the state alone,
    /// when nothing was saved.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Drop all saved states and start over from `initial`.
    pub fn reset(&mut self, initial: DrawingState) {
        self.saved.clear();
        self.current = initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CanvasColor;

    #[test]
    fn test_restore_brings_back_styles_and_path() {
        let mut stack = FrameStack::default();
        stack.current_mut().path.move_to(1.0, 2.0);
        stack.current_mut().path.line_to(3.0, 4.0);
        stack.save();
        let saved_path = stack.current().path.clone();

        let state = stack.current_mut();
        state.line_width = 7.0;
        state.line_dash = vec![1.0, 2.0];
        state.fill_style = FillStyle::Color(CanvasColor::from_rgba8(1, 2, 3, 4));
        state.transform.translate(10.0, 0.0);
        state.path.line_to(9.0, 9.0);
        assert_eq!(stack.depth(), 1);

        assert!(stack.restore());
        let state = stack.current();
        assert_eq!(state.line_width, 1.0);
        assert!(state.line_dash.is_empty());
        assert!(matches!(state.fill_style, FillStyle::Color(CanvasColor::BLACK)));
        assert!(state.transform.is_identity());
        assert_eq!(state.path, saved_path);
    }

    #[test]
    fn test_restore_on_empty_stack_is_noop() {
        let mut stack = FrameStack::default();
        stack.current_mut().miter_limit = 3.0;
        assert!(!stack.restore());
        assert_eq!(stack.current().miter_limit, 3.0);
    }

    #[test]
    fn test_saved_frames_are_independent() {
        let mut stack = FrameStack::default();
        stack.save();
        stack.current_mut().global_alpha = 0.25;
        stack.save();
        stack.current_mut().global_alpha = 0.5;
        assert!(stack.restore());
        assert_eq!(stack.current().global_alpha, 0.25);
        assert!(stack.restore());
        assert_eq!(stack.current().global_alpha, 1.0);
    }

    #[test]
    fn test_reset() {
        let mut stack = FrameStack::default();
        stack.save();
        stack.save();
        stack.current_mut().line_width = 4.0;
        stack.reset(DrawingState::default());
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current().line_width, 1.0);
    }
}
