//! Affine transformation matrix.

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// A 2D affine transformation matrix.
///
/// The matrix is represented as:
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
/// so that `x' = a·x + c·y + e` and `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Scale X component.
    pub a: f64,
    /// Skew Y component.
    pub b: f64,
    /// Skew X component.
    pub c: f64,
    /// Scale Y component.
    pub d: f64,
    /// Translate X component.
    pub e: f64,
    /// Translate Y component.
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Create a new Matrix with the specified components.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create an identity matrix.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` radians (clockwise on screen, where Y grows downward).
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Coefficients in `[a, b, c, d, e, f]` order.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() > SINGULAR_EPSILON
    }

    /// Returns the transform that applies `self` first and then `next`.
    pub fn then(&self, next: &Matrix) -> Matrix {
        Matrix {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Compose `other` into this matrix so that `other` is applied before the
    /// existing transform.
    pub fn compose(&mut self, other: &Matrix) {
        *self = other.then(self);
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.compose(&Self::translation(tx, ty));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.compose(&Self::scaling(sx, sy));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.compose(&Self::rotation(angle));
    }

    /// The inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Matrix> {
        if !self.is_invertible() {
            return None;
        }
        let det = self.determinant();
        Some(Matrix {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Transform a direction vector (translation is ignored).
    pub fn transform_vector(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.a * dx + self.c * dy, self.b * dx + self.d * dy)
    }

    pub fn inverse_transform_point(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.inverse().map(|inv| inv.transform_point(x, y))
    }

    /// Transform every coordinate pair of a flat `[x0, y0, x1, y1, ...]` slice in place.
    pub fn transform_points(&self, points: &mut [f64]) {
        for pair in points.chunks_exact_mut(2) {
            let (x, y) = self.transform_point(pair[0], pair[1]);
            pair[0] = x;
            pair[1] = y;
        }
    }

    /// Lengths of the transformed unit X and Y axes.
    pub fn axis_scales(&self) -> (f64, f64) {
        (self.a.hypot(self.b), self.c.hypot(self.d))
    }

    /// Uniform scale factor used to convert user-space lengths (line width,
    /// dash lengths, arc radii) to device space.
    pub fn scale_factor(&self) -> f64 {
        let (sx, sy) = self.axis_scales();
        (sx + sy) / 2.0
    }

    /// True when the matrix is a translation combined with a positive scale
    /// on each axis.
    pub fn is_axis_aligned(&self) -> bool {
        self.b == 0.0 && self.c == 0.0 && self.a > 0.0 && self.d > 0.0
    }

    /// True when the matrix is a rotation, uniform scale and translation
    /// without reflection.
    pub fn is_similarity(&self) -> bool {
        const EPS: f64 = 1e-9;
        (self.a - self.d).abs() <= EPS
            && (self.b + self.c).abs() <= EPS
            && self.determinant() > 0.0
    }

    /// Rotation angle of the transformed X axis.
    pub fn rotation_angle(&self) -> f64 {
        self.b.atan2(self.a)
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` of a transformed rectangle.
    pub fn transform_rect_bounds(&self, x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
        let corners = [
            self.transform_point(x, y),
            self.transform_point(x + w, y),
            self.transform_point(x + w, y + h),
            self.transform_point(x, y + h),
        ];
        corners.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), &(px, py)| (x0.min(px), y0.min(py), x1.max(px), y1.max(py)),
        )
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(l, r)| (l - r).abs() <= eps)
    }
}

impl From<Matrix> for kurbo::Affine {
    fn from(m: Matrix) -> Self {
        kurbo::Affine::new(m.to_array())
    }
}

impl From<[f64; 6]> for Matrix {
    fn from(c: [f64; 6]) -> Self {
        Matrix::new(c[0], c[1], c[2], c[3], c[4], c[5])
    }
}
