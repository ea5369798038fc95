//! Bounding rectangle calculation.
//!
//! Computes the tight axis-aligned bounding box of a path. Curve segments
//! are not bounded by their control polygon: the parametric extrema of each
//! axis are solved for and only the points actually on the curve count.
//!
//! Alongside the box the calculation keeps the four points that define it
//! ([`EdgePoints`]). Comparisons are strict, so when several points tie an
//! extremum the first one in iteration order wins.

use crate::basics::{unite_rectangles, PathSource, PointD, RectD, Segment};
use crate::conv_transform::ConvTransform;
use crate::error::GeometryError;
use crate::math::{Cubic1, Quad1, Tolerance};
use crate::trans_affine::TransAffine;

// ============================================================================
// EdgePoints
// ============================================================================

/// The topmost, rightmost, bottommost and leftmost points of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePoints {
    pub top: PointD,
    pub right: PointD,
    pub bottom: PointD,
    pub left: PointD,
}

impl EdgePoints {
    fn at(p: PointD) -> Self {
        Self {
            top: p,
            right: p,
            bottom: p,
            left: p,
        }
    }

    /// The bounding box spanned by the four edge points.
    pub fn rect(&self) -> RectD {
        RectD::new(self.left.x, self.top.y, self.right.x, self.bottom.y)
    }

    #[inline]
    fn consider_x(&mut self, x: f64, y: f64) {
        if x < self.left.x {
            self.left = PointD::new(x, y);
        }
        if x > self.right.x {
            self.right = PointD::new(x, y);
        }
    }

    #[inline]
    fn consider_y(&mut self, x: f64, y: f64) {
        if y < self.top.y {
            self.top = PointD::new(x, y);
        }
        if y > self.bottom.y {
            self.bottom = PointD::new(x, y);
        }
    }

    #[inline]
    fn consider(&mut self, x: f64, y: f64) {
        // Left, top, right, bottom: the order the extrema were always
        // updated in, kept so ties resolve identically.
        if x < self.left.x {
            self.left = PointD::new(x, y);
        }
        if y < self.top.y {
            self.top = PointD::new(x, y);
        }
        if x > self.right.x {
            self.right = PointD::new(x, y);
        }
        if y > self.bottom.y {
            self.bottom = PointD::new(x, y);
        }
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Compute the edge points of a segment stream.
///
/// Move segments only reposition the pen and close segments are ignored,
/// so a path made of nothing but moves and closes has no bounds and yields
/// [`GeometryError::EmptyPath`]. Non-finite coordinates never panic; they
/// simply lose every comparison.
pub fn edge_points<I>(segments: I, tol: &Tolerance) -> Result<EdgePoints, GeometryError>
where
    I: IntoIterator<Item = Segment>,
{
    let mut last = PointD::default();
    let mut edges: Option<EdgePoints> = None;

    for seg in segments {
        let (x, y) = match seg {
            Segment::MoveTo { x, y } => {
                last = PointD::new(x, y);
                continue;
            }
            Segment::Close => continue,
            Segment::LineTo { x, y }
            | Segment::QuadTo { x, y, .. }
            | Segment::CubicTo { x, y, .. } => (x, y),
        };

        // The pen point is a no-op on a freshly seeded set of edges.
        let e = edges.get_or_insert_with(|| EdgePoints::at(last));
        e.consider(last.x, last.y);
        e.consider(x, y);

        match seg {
            Segment::QuadTo { cx, cy, .. } => {
                let qx = Quad1::from_bezier(last.x, cx, x);
                let qy = Quad1::from_bezier(last.y, cy, y);
                if let Some(t) = qx.turning_point(tol.coefficient) {
                    e.consider_x(qx.eval(t), qy.eval(t));
                }
                if let Some(t) = qy.turning_point(tol.coefficient) {
                    e.consider_y(qx.eval(t), qy.eval(t));
                }
            }
            Segment::CubicTo {
                cx1, cy1, cx2, cy2, ..
            } => {
                let cx = Cubic1::from_bezier(last.x, cx1, cx2, x);
                let cy = Cubic1::from_bezier(last.y, cy1, cy2, y);
                for t in cx.turning_points(tol.coefficient).iter() {
                    e.consider_x(cx.eval(t), cy.eval(t));
                }
                for t in cy.turning_points(tol.coefficient).iter() {
                    e.consider_y(cx.eval(t), cy.eval(t));
                }
            }
            _ => {}
        }

        last = PointD::new(x, y);
    }

    edges.ok_or(GeometryError::EmptyPath)
}

/// Edge points of a path source with the default tolerance.
pub fn path_edge_points<P: PathSource + ?Sized>(path: &P) -> Result<EdgePoints, GeometryError> {
    edge_points(path.segments(), &Tolerance::default())
}

/// Tight bounding box of a path source.
pub fn bounding_rect<P: PathSource + ?Sized>(path: &P) -> Result<RectD, GeometryError> {
    bounding_rect_with(path, &Tolerance::default())
}

pub fn bounding_rect_with<P: PathSource + ?Sized>(
    path: &P,
    tol: &Tolerance,
) -> Result<RectD, GeometryError> {
    edge_points(path.segments(), tol).map(|e| e.rect())
}

/// Tight bounding box of a path after applying `trans` to it.
///
/// Curves are bounded after the transform, which is tighter than
/// transforming the untransformed box.
pub fn bounding_rect_transformed<P: PathSource + ?Sized>(
    path: &P,
    trans: &TransAffine,
) -> Result<RectD, GeometryError> {
    bounding_rect(&ConvTransform::new(path, *trans))
}

/// Combined bounding box of many paths.
///
/// Paths without drawable geometry are skipped. Returns `None` when no path
/// contributes anything.
pub fn bounding_rect_union<I>(paths: I) -> Option<RectD>
where
    I: IntoIterator,
    I::Item: PathSource,
{
    let mut result: Option<RectD> = None;
    for (idx, path) in paths.into_iter().enumerate() {
        match bounding_rect(&path) {
            Ok(r) => {
                result = Some(match result {
                    Some(acc) => unite_rectangles(&acc, &r),
                    None => r,
                });
            }
            Err(err) => log::trace!("bounding_rect_union: skipping path {idx}: {err}"),
        }
    }
    result
}

// ============================================================================
// Tests
// ============================================================================
