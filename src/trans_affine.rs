//! Affine transformation matrix used to pre-transform path sources.
//!
//! Affine maps send Bezier control points to the control points of the
//! mapped curve, so a path can be transformed segment by segment without
//! changing its segment kinds.

use crate::basics::{PointD, RectD, Segment};

/// 2D affine map.
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// A point maps to `(x*sx + y*shx + tx, x*shy + y*sy + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    pub const IDENTITY: TransAffine = TransAffine {
        sx: 1.0,
        shy: 0.0,
        shx: 0.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn new() -> Self {
        Self::IDENTITY
    }

    /// Matrix from its six components, in `sx, shy, shx, sy, tx, ty` order.
    pub fn new_custom(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    /// Counter-clockwise rotation by `angle` radians (clockwise on screen,
    /// where y grows downward).
    pub fn new_rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new_custom(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn new_scaling(sx: f64, sy: f64) -> Self {
        Self::new_custom(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn new_translation(dx: f64, dy: f64) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    /// Shear along x by `kx` and along y by `ky`.
    pub fn new_skewing(kx: f64, ky: f64) -> Self {
        Self::new_custom(1.0, ky, kx, 1.0, 0.0, 0.0)
    }

    // ---------------------------------------------------------------
    // Composition
    // ---------------------------------------------------------------

    /// Append `m`: the result applies `self` first, then `m`.
    pub fn multiply(&mut self, m: &TransAffine) -> &mut Self {
        *self = self.then(m);
        self
    }

    /// Prepend `m`: the result applies `m` first, then `self`.
    pub fn premultiply(&mut self, m: &TransAffine) -> &mut Self {
        *self = m.then(self);
        self
    }

    /// The map that applies `self` and then `next`.
    pub fn then(&self, next: &TransAffine) -> TransAffine {
        TransAffine {
            sx: self.sx * next.sx + self.shy * next.shx,
            shy: self.sx * next.shy + self.shy * next.sy,
            shx: self.shx * next.sx + self.sy * next.shx,
            sy: self.shx * next.shy + self.sy * next.sy,
            tx: self.tx * next.sx + self.ty * next.shx + next.tx,
            ty: self.tx * next.shy + self.ty * next.sy + next.ty,
        }
    }

    /// Inverse map, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<TransAffine> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let d = 1.0 / det;
        let sx = self.sy * d;
        let sy = self.sx * d;
        let shy = -self.shy * d;
        let shx = -self.shx * d;
        Some(TransAffine {
            sx,
            shy,
            shx,
            sy,
            tx: -self.tx * sx - self.ty * shx,
            ty: -self.tx * shy - self.ty * sy,
        })
    }

    // ---------------------------------------------------------------
    // Application
    // ---------------------------------------------------------------

    #[inline]
    pub fn transform(&self, x: &mut f64, y: &mut f64) {
        let (px, py) = (*x, *y);
        *x = px * self.sx + py * self.shx + self.tx;
        *y = px * self.shy + py * self.sy + self.ty;
    }

    #[inline]
    pub fn transform_point(&self, p: PointD) -> PointD {
        let (mut x, mut y) = (p.x, p.y);
        self.transform(&mut x, &mut y);
        PointD::new(x, y)
    }

    /// Map every coordinate pair of a segment.
    #[inline]
    pub fn transform_segment(&self, seg: &Segment) -> Segment {
        seg.map_points(|mut x, mut y| {
            self.transform(&mut x, &mut y);
            (x, y)
        })
    }

    /// Axis-aligned box around the four mapped corners of `r`.
    pub fn transform_rect(&self, r: &RectD) -> RectD {
        let corners = [
            self.transform_point(PointD::new(r.x1, r.y1)),
            self.transform_point(PointD::new(r.x2, r.y1)),
            self.transform_point(PointD::new(r.x2, r.y2)),
            self.transform_point(PointD::new(r.x1, r.y2)),
        ];
        corners[1..].iter().fold(
            RectD::new(corners[0].x, corners[0].y, corners[0].x, corners[0].y),
            |acc, p| RectD::new(acc.x1.min(p.x), acc.y1.min(p.y), acc.x2.max(p.x), acc.y2.max(p.y)),
        )
    }

    // ---------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// A mirroring map reverses the direction of every outline, which
    /// flips the sign of winding numbers.
    pub fn is_mirroring(&self) -> bool {
        self.determinant() < 0.0
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        [
            self.sx - 1.0,
            self.shy,
            self.shx,
            self.sy - 1.0,
            self.tx,
            self.ty,
        ]
        .iter()
        .all(|v| v.abs() <= epsilon)
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::IDENTITY
    }
}
