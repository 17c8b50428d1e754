//! Transform operations for Canvas2dContext.
//!
//! Only the matrix changes here; path points already added stay where they
//! were placed in device space.

use super::Canvas2dContext;
use crate::matrix::Matrix;

impl Canvas2dContext {
    /// Translate the canvas.
    pub fn translate(&mut self, x: f64, y: f64) {
        log::debug!(target: "canvas", "translate {} {}", x, y);
        self.state_mut().transform.translate(x, y);
    }

    /// Rotate the canvas by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        log::debug!(target: "canvas", "rotate {}", angle);
        self.state_mut().transform.rotate(angle);
    }

    /// Scale the canvas.
    pub fn scale(&mut self, x: f64, y: f64) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        self.state_mut().transform.scale(x, y);
    }

    /// Rotate by `angle` radians around `(x, y)`.
    pub fn rotate_about(&mut self, angle: f64, x: f64, y: f64) {
        log::debug!(target: "canvas", "rotateAbout {} {} {}", angle, x, y);
        let transform = &mut self.state_mut().transform;
        transform.translate(x, y);
        transform.rotate(angle);
        transform.translate(-x, -y);
    }

    /// Scale by `(sx, sy)` keeping `(x, y)` fixed.
    pub fn scale_about(&mut self, sx: f64, sy: f64, x: f64, y: f64) {
        log::debug!(target: "canvas", "scaleAbout {} {} {} {}", sx, sy, x, y);
        let transform = &mut self.state_mut().transform;
        transform.translate(x, y);
        transform.scale(sx, sy);
        transform.translate(-x, -y);
    }

    /// Multiply the current transform by `matrix`, which applies first.
    pub fn transform(&mut self, matrix: Matrix) {
        log::debug!(target: "canvas", "transform {:?}", matrix);
        self.state_mut().transform.compose(&matrix);
    }

    /// Set the transform matrix (replacing the current one).
    pub fn set_transform(&mut self, matrix: Matrix) {
        log::debug!(target: "canvas", "setTransform {:?}", matrix);
        self.state_mut().transform = matrix;
    }

    /// Reset the transform to identity.
    pub fn reset_transform(&mut self) {
        log::debug!(target: "canvas", "resetTransform");
        self.state_mut().transform = Matrix::IDENTITY;
    }

    /// Get the current transformation matrix.
    pub fn get_transform(&self) -> Matrix {
        self.state().transform
    }
}
