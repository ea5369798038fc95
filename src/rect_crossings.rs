//! Rectangle versus path tests used for spatial culling.
//!
//! Both queries first look for proof that the outline enters the open
//! interior of the rectangle. When there is none, the rectangle lies
//! wholly inside or wholly outside the filled path and a single point
//! containment test at its center decides which.

use crate::basics::{PathSource, PointD, RectD, Segment};
use crate::crossings::contains_with;
use crate::math::{is_degenerate_rect, Cubic1, Quad1, Roots, Tolerance};

// ============================================================================
// Lines
// ============================================================================

/// Parametric Liang-Barsky clip of the segment `p0 -> p1` against the
/// closed rectangle. Returns the `(t_enter, t_exit)` range inside it.
fn clip_line(p0: PointD, p1: PointD, r: &RectD) -> Option<(f64, f64)> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let mut t_enter = 0.0;
    let mut t_exit = 1.0;

    for (p, q) in [
        (-dx, p0.x - r.x1),
        (dx, r.x2 - p0.x),
        (-dy, p0.y - r.y1),
        (dy, r.y2 - p0.y),
    ] {
        if p == 0.0 {
            // Parallel to this edge: outside it for good, or no limit.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t_exit {
                return None;
            }
            if t > t_enter {
                t_enter = t;
            }
        } else {
            if t < t_enter {
                return None;
            }
            if t < t_exit {
                t_exit = t;
            }
        }
    }
    Some((t_enter, t_exit))
}

/// A line crosses when the part clipped to the closed rectangle has its
/// midpoint strictly inside. A clipped piece lying along an edge, or
/// reduced to a corner, stays on the boundary.
fn line_crosses(p0: PointD, p1: PointD, r: &RectD) -> bool {
    if p0 == p1 {
        return false;
    }
    match clip_line(p0, p1, r) {
        Some((t_enter, t_exit)) if t_enter < t_exit => {
            let t = (t_enter + t_exit) * 0.5;
            r.hit_test_open(p0.x + t * (p1.x - p0.x), p0.y + t * (p1.y - p0.y))
        }
        _ => false,
    }
}

// ============================================================================
// Quadratics
// ============================================================================

/// The curve is cut wherever it meets one of the four boundary lines.
/// Between two neighbouring cuts it cannot change sides of any boundary
/// line, so the piece is either strictly inside or not inside at all and
/// its middle decides. Tangent touches become cuts whose neighbouring
/// pieces both stay outside.
fn quad_crosses(p0: PointD, c: PointD, p1: PointD, r: &RectD, tol: &Tolerance) -> bool {
    let qx = Quad1::from_bezier(p0.x, c.x, p1.x);
    let qy = Quad1::from_bezier(p0.y, c.y, p1.y);

    let mut cuts = [0.0; 10];
    cuts[1] = 1.0;
    let mut len = 2;
    for roots in [
        qx.solve(r.x1, tol.coefficient),
        qx.solve(r.x2, tol.coefficient),
        qy.solve(r.y1, tol.coefficient),
        qy.solve(r.y2, tol.coefficient),
    ] {
        for t in roots.interior() {
            cuts[len] = t;
            len += 1;
        }
    }
    let cuts = &mut cuts[..len];
    cuts.sort_by(|a, b| a.total_cmp(b));

    cuts.windows(2).any(|w| {
        let t = (w[0] + w[1]) * 0.5;
        w[0] < w[1] && r.hit_test_open(qx.eval(t), qy.eval(t))
    })
}

// ============================================================================
// Cubics
// ============================================================================

/// Horizontal position of a candidate point relative to the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Bucket test for cubics.
///
/// Candidate parameters are the ends, the turning points of both axes and
/// the parameters where the curve meets the top and bottom lines. Between
/// neighbouring candidates both coordinates are monotone, so the curve can
/// only reach the interior if some candidate inside the (slightly widened)
/// vertical band lands between the left and right lines, or two consecutive
/// in-band candidates sit on opposite sides.
fn cubic_crosses(p0: PointD, c1: PointD, c2: PointD, p1: PointD, r: &RectD, tol: &Tolerance) -> bool {
    let cx = Cubic1::from_bezier(p0.x, c1.x, c2.x, p1.x);
    let cy = Cubic1::from_bezier(p0.y, c1.y, c2.y, p1.y);

    let mut candidates = [0.0; 12];
    let mut len = 0;
    let mut push_all = |roots: Roots, len: &mut usize| {
        for t in roots.interior() {
            candidates[*len] = t;
            *len += 1;
        }
    };
    push_all(cx.turning_points(tol.coefficient), &mut len);
    push_all(cy.turning_points(tol.coefficient), &mut len);
    push_all(cy.solve(r.y1, tol.coefficient), &mut len);
    push_all(cy.solve(r.y2, tol.coefficient), &mut len);
    candidates[len] = 0.0;
    candidates[len + 1] = 1.0;
    len += 2;
    let candidates = &mut candidates[..len];
    candidates.sort_by(|a, b| a.total_cmp(b));

    let band_top = r.y1 - tol.rect_band;
    let band_bottom = r.y2 + tol.rect_band;

    let mut state: Option<Side> = None;
    for &t in candidates.iter() {
        let y = cy.eval(t);
        if y >= band_top && y <= band_bottom {
            let x = cx.eval(t);
            let side = if x < r.x1 {
                Side::Left
            } else if x > r.x2 {
                Side::Right
            } else {
                return true;
            };
            match state {
                Some(prev) if prev != side => return true,
                _ => state = Some(side),
            }
        } else {
            state = None;
        }
    }
    false
}

// ============================================================================
// Public API
// ============================================================================

/// Returns `true` as soon as some segment is proven to enter the open
/// interior of `r`.
///
/// Lines are clipped to `r` and quadratics are cut at the four boundary
/// lines; either crosses when a resulting piece runs strictly inside `r`.
/// Cubics use the bucket test. `Close` and open sub-paths are treated as
/// lines back to the sub-path's move point.
pub fn segments_cross_rect<I>(segments: I, r: &RectD, tol: &Tolerance) -> bool
where
    I: IntoIterator<Item = Segment>,
{
    let mut pen = PointD::default();
    let mut start = PointD::default();

    for seg in segments {
        let crossed = match seg {
            Segment::MoveTo { x, y } => {
                let closing = line_crosses(pen, start, r);
                pen = PointD::new(x, y);
                start = pen;
                closing
            }
            Segment::Close => {
                let closing = line_crosses(pen, start, r);
                pen = start;
                closing
            }
            Segment::LineTo { x, y } => {
                let end = PointD::new(x, y);
                let crossed = line_crosses(pen, end, r);
                pen = end;
                crossed
            }
            Segment::QuadTo { cx, cy, x, y } => {
                let end = PointD::new(x, y);
                let crossed = quad_crosses(pen, PointD::new(cx, cy), end, r, tol);
                pen = end;
                crossed
            }
            Segment::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => {
                let end = PointD::new(x, y);
                let crossed = cubic_crosses(
                    pen,
                    PointD::new(cx1, cy1),
                    PointD::new(cx2, cy2),
                    end,
                    r,
                    tol,
                );
                pen = end;
                crossed
            }
        };
        if crossed {
            return true;
        }
    }
    line_crosses(pen, start, r)
}

/// Test whether the filled path and the rectangle share any interior.
///
/// A rectangle with no area never intersects.
pub fn intersects_rect<P: PathSource + ?Sized>(path: &P, r: &RectD) -> bool {
    intersects_rect_with(path, r, &Tolerance::default())
}

pub fn intersects_rect_with<P: PathSource + ?Sized>(path: &P, r: &RectD, tol: &Tolerance) -> bool {
    if is_degenerate_rect(r) {
        return false;
    }
    if segments_cross_rect(path.segments(), r, tol) {
        return true;
    }
    let c = r.center();
    contains_with(path, path.winding_rule(), c.x, c.y, tol)
}

/// Test whether the rectangle lies entirely inside the filled path.
///
/// A rectangle with no area is never contained.
pub fn contains_rect<P: PathSource + ?Sized>(path: &P, r: &RectD) -> bool {
    contains_rect_with(path, r, &Tolerance::default())
}

pub fn contains_rect_with<P: PathSource + ?Sized>(path: &P, r: &RectD, tol: &Tolerance) -> bool {
    if is_degenerate_rect(r) {
        return false;
    }
    if segments_cross_rect(path.segments(), r, tol) {
        return false;
    }
    let c = r.center();
    contains_with(path, path.winding_rule(), c.x, c.y, tol)
}

// ============================================================================
// Tests
// ============================================================================
