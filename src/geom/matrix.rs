use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::pool::Pool;

/// 2D affine transform `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Matrix {
    /// Horizontal scale.
    pub a: f64,
    /// Vertical skew.
    pub b: f64,
    /// Horizontal skew.
    pub c: f64,
    /// Vertical scale.
    pub d: f64,
    /// Horizontal translation.
    pub tx: f64,
    /// Vertical translation.
    pub ty: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Build from all six coefficients.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// Pure translation.
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Pure scale.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `radians`.
    pub fn rotation(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// Compose: the result applies `other` first, then `self`.
    ///
    /// Returns a fresh value, so `m = parent.pre_multiply(&m)` never aliases.
    pub fn pre_multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Inverse transform, or `None` when the determinant is zero.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Matrix::from(Affine::from(*self).inverse()))
    }

    /// Map a point.
    pub fn transform_point(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// `true` when the transform has no rotation or shear component.
    pub fn is_axis_aligned(&self) -> bool {
        self.b == 0.0 && self.c == 0.0
    }

    /// `true` when one axis collapses to zero length.
    ///
    /// Anything drawn through such a transform is a line at most.
    pub fn is_degenerate_scale(&self) -> bool {
        (self.a == 0.0 && self.b == 0.0) || (self.c == 0.0 && self.d == 0.0)
    }

    /// Same linear part with the translation offset by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Matrix {
        Matrix {
            tx: self.tx + dx,
            ty: self.ty + dy,
            ..*self
        }
    }

    /// Map `rect` and return the axis-aligned bounds of the result.
    pub fn transform_bounds(&self, rect: Rect) -> Rect {
        Affine::from(*self).transform_rect_bbox(rect)
    }
}

impl From<Matrix> for Affine {
    fn from(m: Matrix) -> Self {
        Affine::new([m.a, m.b, m.c, m.d, m.tx, m.ty])
    }
}

impl From<Affine> for Matrix {
    fn from(a: Affine) -> Self {
        let [a, b, c, d, tx, ty] = a.as_coeffs();
        Matrix { a, b, c, d, tx, ty }
    }
}

/// Arena of matrices addressed by generation-checked handles.
///
/// Provided for callers that keep long-lived transforms by handle; the renderer itself passes
/// [`Matrix`] by value.
pub type MatrixPool = Pool<Matrix>;

#[cfg(test)]
#[path = "../../tests/unit/geom/matrix.rs"]
mod tests;
