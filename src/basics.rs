//! Foundation types: points, rectangles, path segments and path sources.
//!
//! Everything else in the crate is built on the vocabulary defined here: a
//! path is a finite, ordered stream of [`Segment`] values plus a
//! [`WindingRule`], produced on demand by a [`PathSource`].

use std::sync::Arc;

// ============================================================================
// Winding rule
// ============================================================================

/// How crossing counts are interpreted as "inside".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindingRule {
    /// Inside when the signed crossing count is odd.
    EvenOdd,
    /// Inside when the signed crossing count is not zero.
    #[default]
    NonZero,
}

impl WindingRule {
    /// Interpret a signed crossing count under this rule.
    #[inline]
    pub fn is_inside(self, crossings: i32) -> bool {
        match self {
            WindingRule::EvenOdd => (crossings & 1) != 0,
            WindingRule::NonZero => crossings != 0,
        }
    }
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointBase<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PointBase<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

pub type PointD = PointBase<f64>;

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points.
///
/// `(x1, y1)` is the minimum corner and `(x2, y2)` the maximum corner once
/// normalized. The y axis grows downward, so `y1` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Normalize so that x1 <= x2 and y1 <= y2, swapping if needed.
    pub fn normalize(&mut self) -> &Self {
        if self.x1 > self.x2 {
            core::mem::swap(&mut self.x1, &mut self.x2);
        }
        if self.y1 > self.y2 {
            core::mem::swap(&mut self.y1, &mut self.y2);
        }
        self
    }

    /// Returns `true` if the rectangle is valid (non-inverted).
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Returns `true` if the point (x, y) is inside the rectangle or on its edge.
    pub fn hit_test(&self, x: T, y: T) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Returns `true` if this rectangle overlaps `r`. Touching edges count.
    pub fn overlaps(&self, r: &Self) -> bool {
        !(r.x1 > self.x2 || r.x2 < self.x1 || r.y1 > self.y2 || r.y2 < self.y1)
    }

    /// Returns `true` if `r` lies entirely within this rectangle.
    pub fn contains_rect(&self, r: &Self) -> bool {
        r.x1 >= self.x1 && r.x2 <= self.x2 && r.y1 >= self.y1 && r.y2 <= self.y2
    }
}

impl Rect<f64> {
    /// Build a rectangle from its origin and size.
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> PointD {
        PointD::new((self.x1 + self.x2) * 0.5, (self.y1 + self.y2) * 0.5)
    }

    /// Returns `true` if (x, y) lies strictly inside the rectangle.
    pub fn hit_test_open(&self, x: f64, y: f64) -> bool {
        x > self.x1 && x < self.x2 && y > self.y1 && y < self.y2
    }
}

/// Compute the union (bounding box) of two rectangles.
pub fn unite_rectangles<T: Copy + PartialOrd>(r1: &Rect<T>, r2: &Rect<T>) -> Rect<T> {
    let mut r = *r1;
    if r.x2 < r2.x2 {
        r.x2 = r2.x2;
    }
    if r.y2 < r2.y2 {
        r.y2 = r2.y2;
    }
    if r.x1 > r2.x1 {
        r.x1 = r2.x1;
    }
    if r.y1 > r2.y1 {
        r.y1 = r2.y1;
    }
    r
}

/// Rectangle with `i32` coordinates.
pub type RectI = Rect<i32>;
/// Rectangle with `f64` coordinates.
pub type RectD = Rect<f64>;

// ============================================================================
// Segment
// ============================================================================

/// One element of a path.
///
/// Control and end points are absolute. The start point of every drawing
/// segment is the pen position left by the previous segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    QuadTo {
        cx: f64,
        cy: f64,
        x: f64,
        y: f64,
    },
    CubicTo {
        cx1: f64,
        cy1: f64,
        cx2: f64,
        cy2: f64,
        x: f64,
        y: f64,
    },
    Close,
}

impl Segment {
    /// The pen position after this segment, or `None` for `Close`.
    #[inline]
    pub fn end_point(&self) -> Option<PointD> {
        match *self {
            Segment::MoveTo { x, y }
            | Segment::LineTo { x, y }
            | Segment::QuadTo { x, y, .. }
            | Segment::CubicTo { x, y, .. } => Some(PointD::new(x, y)),
            Segment::Close => None,
        }
    }

    /// Returns `true` for line, quadratic and cubic segments.
    #[inline]
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            Segment::LineTo { .. } | Segment::QuadTo { .. } | Segment::CubicTo { .. }
        )
    }

    /// Apply `f` to every coordinate pair of the segment.
    pub fn map_points<F: Fn(f64, f64) -> (f64, f64)>(&self, f: F) -> Segment {
        match *self {
            Segment::MoveTo { x, y } => {
                let (x, y) = f(x, y);
                Segment::MoveTo { x, y }
            }
            Segment::LineTo { x, y } => {
                let (x, y) = f(x, y);
                Segment::LineTo { x, y }
            }
            Segment::QuadTo { cx, cy, x, y } => {
                let (cx, cy) = f(cx, cy);
                let (x, y) = f(x, y);
                Segment::QuadTo { cx, cy, x, y }
            }
            Segment::CubicTo {
                cx1,
                cy1,
                cx2,
                cy2,
                x,
                y,
            } => {
                let (cx1, cy1) = f(cx1, cy1);
                let (cx2, cy2) = f(cx2, cy2);
                let (x, y) = f(x, y);
                Segment::CubicTo {
                    cx1,
                    cy1,
                    cx2,
                    cy2,
                    x,
                    y,
                }
            }
            Segment::Close => Segment::Close,
        }
    }
}

// ============================================================================
// PathSource trait
// ============================================================================

/// A lazily produced, single-pass stream of segments.
pub type Segments<'a> = Box<dyn Iterator<Item = Segment> + 'a>;

/// Anything that can replay its outline as a segment stream.
///
/// Every call to [`segments`](PathSource::segments) starts a fresh pass; the
/// returned iterator itself is not restartable. Queries that need two passes
/// (rectangle tests, for instance) simply ask twice.
pub trait PathSource {
    /// The rule used to turn crossing counts into inside/outside.
    fn winding_rule(&self) -> WindingRule;

    /// Start a new pass over the path.
    fn segments(&self) -> Segments<'_>;
}

impl<P: PathSource + ?Sized> PathSource for &P {
    fn winding_rule(&self) -> WindingRule {
        (**self).winding_rule()
    }

    fn segments(&self) -> Segments<'_> {
        (**self).segments()
    }
}

impl<P: PathSource + ?Sized> PathSource for Box<P> {
    fn winding_rule(&self) -> WindingRule {
        (**self).winding_rule()
    }

    fn segments(&self) -> Segments<'_> {
        (**self).segments()
    }
}

impl<P: PathSource + ?Sized> PathSource for Arc<P> {
    fn winding_rule(&self) -> WindingRule {
        (**self).winding_rule()
    }

    fn segments(&self) -> Segments<'_> {
        (**self).segments()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winding_rule_interpretation() {
        assert!(WindingRule::EvenOdd.is_inside(1));
        assert!(WindingRule::EvenOdd.is_inside(-1));
        assert!(!WindingRule::EvenOdd.is_inside(2));
        assert!(!WindingRule::EvenOdd.is_inside(0));

        assert!(WindingRule::NonZero.is_inside(2));
        assert!(WindingRule::NonZero.is_inside(-1));
        assert!(!WindingRule::NonZero.is_inside(0));
    }

    #[test]
    fn test_rect_normalize() {
        let mut r = RectD::new(30.0, 40.0, 10.0, 20.0);
        assert!(!r.is_valid());
        r.normalize();
        assert_eq!(r, RectD::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_rect_metrics() {
        let r = RectD::from_xywh(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.width(), 30.0);
        assert_eq!(r.height(), 40.0);
        assert_eq!(r.area(), 1200.0);
        assert_eq!(r.center(), PointD::new(25.0, 40.0));
    }

    #[test]
    fn test_rect_hit_tests() {
        let r = RectD::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.hit_test(0.0, 0.0));
        assert!(!r.hit_test_open(0.0, 0.0));
        assert!(r.hit_test_open(5.0, 5.0));
        assert!(!r.hit_test(11.0, 5.0));
    }

    #[test]
    fn test_rect_overlaps_and_contains() {
        let r1 = RectI::new(10, 20, 30, 40);
        let r2 = RectI::new(25, 35, 50, 60);
        assert!(r1.overlaps(&r2));
        assert!(r2.overlaps(&r1));
        assert!(!r1.overlaps(&RectI::new(31, 41, 50, 60)));
        // Shared edges still overlap.
        assert!(r1.overlaps(&RectI::new(30, 40, 50, 60)));

        assert!(r1.contains_rect(&RectI::new(15, 25, 20, 30)));
        assert!(!r1.contains_rect(&r2));
    }

    #[test]
    fn test_unite_rectangles() {
        let r1 = RectI::new(10, 20, 30, 40);
        let r2 = RectI::new(50, 60, 70, 80);
        assert_eq!(unite_rectangles(&r1, &r2), RectI::new(10, 20, 70, 80));
    }

    #[test]
    fn test_segment_end_point() {
        assert_eq!(
            Segment::MoveTo { x: 1.0, y: 2.0 }.end_point(),
            Some(PointD::new(1.0, 2.0))
        );
        let cubic = Segment::CubicTo {
            cx1: 0.0,
            cy1: 0.0,
            cx2: 1.0,
            cy2: 1.0,
            x: 3.0,
            y: 4.0,
        };
        assert_eq!(cubic.end_point(), Some(PointD::new(3.0, 4.0)));
        assert_eq!(Segment::Close.end_point(), None);
    }

    #[test]
    fn test_segment_is_drawing() {
        assert!(!Segment::MoveTo { x: 0.0, y: 0.0 }.is_drawing());
        assert!(Segment::LineTo { x: 0.0, y: 0.0 }.is_drawing());
        assert!(Segment::QuadTo {
            cx: 0.0,
            cy: 0.0,
            x: 0.0,
            y: 0.0
        }
        .is_drawing());
        assert!(!Segment::Close.is_drawing());
    }

    #[test]
    fn test_segment_map_points() {
        let q = Segment::QuadTo {
            cx: 1.0,
            cy: 2.0,
            x: 3.0,
            y: 4.0,
        };
        let moved = q.map_points(|x, y| (x + 10.0, y * 2.0));
        assert_eq!(
            moved,
            Segment::QuadTo {
                cx: 11.0,
                cy: 4.0,
                x: 13.0,
                y: 8.0
            }
        );
        assert_eq!(Segment::Close.map_points(|x, y| (x, y)), Segment::Close);
    }
}
