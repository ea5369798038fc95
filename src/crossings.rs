//! Point-in-path testing by signed crossing counts.
//!
//! An imaginary ray runs from `(-inf, y)` to `(x, y)`; every piece of the
//! outline that crosses it adds `+1` when it moves toward larger y and `-1`
//! when it moves toward smaller y. The winding rule then turns the total
//! into inside/outside.
//!
//! Curves are cut at their y turning points so each piece is monotone in y.
//! A piece from `y0` to `y1` crosses the ray when exactly one of
//! `y0 <= y`, `y1 <= y` holds. This half-open rule counts a vertex sitting
//! exactly on the ray once, whichever segments meet there.

use crate::basics::{PathSource, PointD, Segment, WindingRule};
use crate::math::{bisect, Cubic1, Quad1, Roots, Tolerance};

/// How far outside its piece an analytic root may land and still be
/// accepted (then clamped) before falling back to bisection.
const ROOT_SLACK: f64 = 1e-9;

// ============================================================================
// Monotone pieces
// ============================================================================

/// Parameter bounds of the y-monotone pieces of one segment, plus the y
/// value at each bound. End values are the exact stored coordinates so that
/// neighbouring segments agree on shared vertices.
struct Pieces {
    ts: [f64; 4],
    ys: [f64; 4],
    len: usize,
}

impl Pieces {
    fn new<F: Fn(f64) -> f64>(y0: f64, y1: f64, turning: &Roots, fy: F) -> Self {
        let mut ts = [0.0; 4];
        let mut ys = [0.0; 4];
        let mut len = 1;
        ys[0] = y0;
        for t in turning.interior() {
            ts[len] = t;
            len += 1;
        }
        ts[1..len].sort_by(|a, b| a.total_cmp(b));
        for i in 1..len {
            ys[i] = fy(ts[i]);
        }
        ts[len] = 1.0;
        ys[len] = y1;
        len += 1;
        Self { ts, ys, len }
    }

    /// Indices `(start, end)` of the pieces that cross height `y`.
    fn crossing(&self, y: f64) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len - 1)
            .map(|i| (i, i + 1))
            .filter(move |&(a, b)| (self.ys[a] <= y) != (self.ys[b] <= y))
    }
}

/// Parameter in `[ta, tb]` where the monotone function `fy` reaches `y`.
fn piece_root<F: Fn(f64) -> f64>(fy: F, roots: &Roots, ta: f64, tb: f64, y: f64) -> f64 {
    roots
        .iter()
        .find(|&t| t >= ta - ROOT_SLACK && t <= tb + ROOT_SLACK)
        .map(|t| t.clamp(ta, tb))
        .unwrap_or_else(|| bisect(|t| fy(t) - y, ta, tb))
}

fn direction(y_from: f64, y_to: f64) -> i32 {
    if y_to > y_from {
        1
    } else {
        -1
    }
}

// ============================================================================
// Per-segment crossings
// ============================================================================

fn line_crossings(p0: PointD, p1: PointD, x: f64, y: f64) -> i32 {
    if (p0.y <= y) == (p1.y <= y) {
        return 0;
    }
    let t = (y - p0.y) / (p1.y - p0.y);
    let xc = p0.x + t * (p1.x - p0.x);
    if xc < x {
        direction(p0.y, p1.y)
    } else {
        0
    }
}

fn quad_crossings(p0: PointD, c: PointD, p1: PointD, x: f64, y: f64, tol: &Tolerance) -> i32 {
    // Whole curve sits above, below or to the right of the ray.
    if (y < p0.y && y < c.y && y < p1.y)
        || (y >= p0.y && y >= c.y && y >= p1.y)
        || (p0.x >= x && c.x >= x && p1.x >= x)
    {
        return 0;
    }

    let qx = Quad1::from_bezier(p0.x, c.x, p1.x);
    let qy = Quad1::from_bezier(p0.y, c.y, p1.y);
    let mut turning = Roots::new();
    if let Some(t) = qy.turning_point(tol.coefficient) {
        turning.push(t);
    }

    let pieces = Pieces::new(p0.y, p1.y, &turning, |t| qy.eval(t));
    let roots = qy.solve(y, tol.coefficient);
    let mut count = 0;
    for (a, b) in pieces.crossing(y) {
        let t = piece_root(|t| qy.eval(t), &roots, pieces.ts[a], pieces.ts[b], y);
        if qx.eval(t) < x {
            count += direction(pieces.ys[a], pieces.ys[b]);
        }
    }
    count
}

#[allow(clippy::too_many_arguments)]
fn cubic_crossings(
    p0: PointD,
    c1: PointD,
    c2: PointD,
    p1: PointD,
    x: f64,
    y: f64,
    tol: &Tolerance,
) -> i32 {
    if (y < p0.y && y < c1.y && y < c2.y && y < p1.y)
        || (y >= p0.y && y >= c1.y && y >= c2.y && y >= p1.y)
        || (p0.x >= x && c1.x >= x && c2.x >= x && p1.x >= x)
    {
        return 0;
    }

    let cx = Cubic1::from_bezier(p0.x, c1.x, c2.x, p1.x);
    let cy = Cubic1::from_bezier(p0.y, c1.y, c2.y, p1.y);
    let turning = cy.turning_points(tol.coefficient);

    let pieces = Pieces::new(p0.y, p1.y, &turning, |t| cy.eval(t));
    let roots = cy.solve(y, tol.coefficient);
    let mut count = 0;
    for (a, b) in pieces.crossing(y) {
        let t = piece_root(|t| cy.eval(t), &roots, pieces.ts[a], pieces.ts[b], y);
        if cx.eval(t) < x {
            count += direction(pieces.ys[a], pieces.ys[b]);
        }
    }
    count
}

// ============================================================================
// Public API
// ============================================================================

/// Signed number of outline crossings on the ray from `(-inf, y)` to `(x, y)`.
///
/// `Close` counts as a line back to the sub-path's move point, and a
/// sub-path left open is closed the same way when the next move or the end
/// of the stream arrives.
pub fn count_crossings<I>(segments: I, x: f64, y: f64, tol: &Tolerance) -> i32
where
    I: IntoIterator<Item = Segment>,
{
    let mut crossings = 0;
    let mut pen = PointD::default();
    let mut start = PointD::default();

    for seg in segments {
        match seg {
            Segment::MoveTo { x: mx, y: my } => {
                crossings += line_crossings(pen, start, x, y);
                pen = PointD::new(mx, my);
                start = pen;
            }
            Segment::Close => {
                crossings += line_crossings(pen, start, x, y);
                pen = start;
            }
            Segment::LineTo { x: ex, y: ey } => {
                let end = PointD::new(ex, ey);
                crossings += line_crossings(pen, end, x, y);
                pen = end;
            }
            Segment::QuadTo { cx, cy, x: ex, y: ey } => {
                let end = PointD::new(ex, ey);
                crossings += quad_crossings(pen, PointD::new(cx, cy), end, x, y, tol);
                pen = end;
            }
            Segment::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x: ex,
                y: ey,
            } => {
                let end = PointD::new(ex, ey);
                crossings += cubic_crossings(
                    pen,
                    PointD::new(cx1, cy1),
                    PointD::new(cx2, cy2),
                    end,
                    x,
                    y,
                    tol,
                );
                pen = end;
            }
        }
    }
    crossings + line_crossings(pen, start, x, y)
}

/// Test whether `(x, y)` is inside `path` under an explicit winding rule.
pub fn contains<P: PathSource + ?Sized>(path: &P, rule: WindingRule, x: f64, y: f64) -> bool {
    contains_with(path, rule, x, y, &Tolerance::default())
}

pub fn contains_with<P: PathSource + ?Sized>(
    path: &P,
    rule: WindingRule,
    x: f64,
    y: f64,
    tol: &Tolerance,
) -> bool {
    rule.is_inside(count_crossings(path.segments(), x, y, tol))
}

/// Test whether `(x, y)` is inside `path` under the path's own winding rule.
pub fn contains_point<P: PathSource + ?Sized>(path: &P, x: f64, y: f64) -> bool {
    contains(path, path.winding_rule(), x, y)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::RectD;
    use crate::path_storage::PathStorage;

    fn square() -> PathStorage {
        PathStorage::from_poly(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0])
    }

    #[test]
    fn test_square_inside_outside() {
        let sq = square();
        assert!(contains(&sq, WindingRule::NonZero, 5.0, 5.0));
        assert!(!contains(&sq, WindingRule::NonZero, 15.0, 5.0));
        assert!(!contains(&sq, WindingRule::NonZero, -5.0, 5.0));
        assert!(!contains(&sq, WindingRule::NonZero, 5.0, 15.0));
        assert!(contains(&sq, WindingRule::EvenOdd, 5.0, 5.0));
    }

    #[test]
    fn test_square_corner_does_not_panic() {
        let sq = square();
        let _ = contains(&sq, WindingRule::NonZero, 0.0, 0.0);
        let _ = contains(&sq, WindingRule::EvenOdd, 10.0, 10.0);
    }

    #[test]
    fn test_direction_sign() {
        let sq = square();
        let tol = Tolerance::default();
        // Clockwise on screen: the left edge runs upward.
        assert_eq!(count_crossings(sq.segments(), 5.0, 5.0, &tol), -1);

        let ccw = PathStorage::from_poly(&[0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0]);
        assert_eq!(count_crossings(ccw.segments(), 5.0, 5.0, &tol), 1);
    }

    #[test]
    fn test_vertex_on_ray_counted_once() {
        let diamond = PathStorage::from_poly(&[0.0, -10.0, 10.0, 0.0, 0.0, 10.0, -10.0, 0.0]);
        let tol = Tolerance::default();
        assert_eq!(count_crossings(diamond.segments(), 0.0, 0.0, &tol), -1);
        assert_eq!(count_crossings(diamond.segments(), 20.0, 0.0, &tol), 0);
        assert_eq!(count_crossings(diamond.segments(), -15.0, 0.0, &tol), 0);
        assert!(contains(&diamond, WindingRule::EvenOdd, 0.0, 0.0));
    }

    #[test]
    fn test_nested_squares_winding_rules() {
        let mut path = PathStorage::new();
        path.add_rect(&RectD::new(0.0, 0.0, 10.0, 10.0));
        path.add_rect(&RectD::new(2.0, 2.0, 8.0, 8.0));
        assert!(contains(&path, WindingRule::NonZero, 5.0, 5.0));
        assert!(!contains(&path, WindingRule::EvenOdd, 5.0, 5.0));
        assert!(contains(&path, WindingRule::EvenOdd, 1.0, 5.0));
    }

    #[test]
    fn test_open_subpaths_close_implicitly() {
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.line_to(0.0, 10.0);
        assert!(contains_point(&path, 5.0, 5.0));

        path.move_to(20.0, 0.0);
        path.line_to(30.0, 0.0);
        path.line_to(30.0, 10.0);
        path.line_to(20.0, 10.0);
        path.move_to(100.0, 100.0);
        assert!(contains_point(&path, 5.0, 5.0));
        assert!(contains_point(&path, 25.0, 5.0));
        assert!(!contains_point(&path, 15.0, 5.0));
    }

    #[test]
    fn test_quad_arch() {
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.quad_to(50.0, 100.0, 100.0, 0.0);
        path.close_polygon();
        let tol = Tolerance::default();
        assert_eq!(count_crossings(path.segments(), 50.0, 40.0, &tol), 1);
        assert!(contains_point(&path, 50.0, 40.0));
        assert!(!contains_point(&path, 50.0, 60.0));
        assert!(!contains_point(&path, 5.0, 40.0));
        // Tangent to the apex height: no crossing either way.
        assert_eq!(count_crossings(path.segments(), 200.0, 50.0, &tol), 0);
    }

    #[test]
    fn test_ellipse() {
        let mut path = PathStorage::new();
        path.add_ellipse(50.0, 40.0, 20.0, 10.0);
        assert!(contains_point(&path, 50.0, 40.0));
        assert!(contains_point(&path, 69.0, 40.5));
        assert!(!contains_point(&path, 31.0, 31.0));
        assert!(!contains_point(&path, 71.0, 40.0));
        assert!(contains(&path, WindingRule::EvenOdd, 50.0, 49.0));
    }

    #[test]
    fn test_s_curve_crosses_ray_three_times() {
        // y(t) = 160t^3 - 240t^2 + 90t peaks at t=0.25 (y=10) and dips at
        // t=0.75 (y=0); x(t) = 30t.
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.cubic_to(10.0, 30.0, 20.0, -20.0, 30.0, 10.0);
        let tol = Tolerance::default();
        // At y=5 the pieces cross at x < 7.5 (+1), x = 15 (-1) and
        // x > 22.5 (+1); the implicit close crosses at x = 15 (-1).
        assert_eq!(count_crossings(path.segments(), 10.0, 5.0, &tol), 1);
        assert_eq!(count_crossings(path.segments(), 20.0, 5.0, &tol), -1);
        assert_eq!(count_crossings(path.segments(), 100.0, 5.0, &tol), 0);
        assert_eq!(count_crossings(path.segments(), -1.0, 5.0, &tol), 0);
    }

    #[test]
    fn test_nan_does_not_panic() {
        let mut path = PathStorage::new();
        path.move_to(0.0, 0.0);
        path.line_to(f64::NAN, 10.0);
        path.cubic_to(f64::NAN, 0.0, 1.0, f64::INFINITY, 2.0, 2.0);
        path.quad_to(f64::NAN, f64::NAN, 0.0, 5.0);
        let _ = contains_point(&path, 1.0, 1.0);
        assert!(!contains_point(&square(), f64::NAN, 5.0));
    }

    #[test]
    fn test_empty_path_contains_nothing() {
        assert!(!contains_point(&PathStorage::new(), 0.0, 0.0));
    }
}
