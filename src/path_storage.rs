//! Path storage: an in-memory, replayable segment container.
//!
//! Builds paths with absolute and relative commands and hands them out as a
//! [`PathSource`]. The rectangle and ellipse helpers produce the closed
//! outlines the geometry queries are usually exercised against.

use std::f64::consts::FRAC_PI_2;

use crate::basics::{PathSource, PointD, RectD, Segment, Segments, WindingRule};

/// Cubic approximation of an elliptical arc of at most a quarter turn.
///
/// Returns the start point, both control points and the end point as
/// `[x0, y0, x1, y1, x2, y2, x3, y3]`.
fn arc_to_cubic(cx: f64, cy: f64, rx: f64, ry: f64, start_angle: f64, sweep_angle: f64) -> [f64; 8] {
    let x0 = (sweep_angle / 2.0).cos();
    let y0 = (sweep_angle / 2.0).sin();
    let tx = (1.0 - x0) * 4.0 / 3.0;
    let ty = y0 - tx * x0 / y0;

    let px = [x0, x0 + tx, x0 + tx, x0];
    let py = [-y0, -ty, ty, y0];

    let (sn, cs) = (start_angle + sweep_angle / 2.0).sin_cos();

    let mut curve = [0.0; 8];
    for i in 0..4 {
        curve[i * 2] = cx + rx * (px[i] * cs - py[i] * sn);
        curve[i * 2 + 1] = cy + ry * (px[i] * sn + py[i] * cs);
    }
    curve
}

/// Ordered segment list plus the winding rule it is filled with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathStorage {
    segments: Vec<Segment>,
    winding_rule: WindingRule,
    pen: PointD,
    subpath_start: PointD,
}

impl PathStorage {
    /// Create an empty path filled with the non-zero rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty path with the given winding rule.
    pub fn with_winding_rule(winding_rule: WindingRule) -> Self {
        Self {
            winding_rule,
            ..Self::default()
        }
    }

    /// Closed rectangle outline `x1,y1 -> x2,y1 -> x2,y2 -> x1,y2`.
    pub fn from_rect(r: &RectD) -> Self {
        let mut ps = Self::new();
        ps.add_rect(r);
        ps
    }

    /// Closed polygon through the given `[x0, y0, x1, y1, ...]` coordinates.
    pub fn from_poly(data: &[f64]) -> Self {
        let mut ps = Self::new();
        ps.concat_poly(data, true);
        ps
    }

    pub fn set_winding_rule(&mut self, winding_rule: WindingRule) {
        self.winding_rule = winding_rule;
    }

    /// Remove all segments (keeps allocated memory).
    pub fn remove_all(&mut self) {
        self.segments.clear();
        self.pen = PointD::default();
        self.subpath_start = PointD::default();
    }

    // ---------------------------------------------------------------
    // Path construction
    // ---------------------------------------------------------------

    fn push(&mut self, seg: Segment) {
        match seg {
            Segment::MoveTo { x, y } => {
                self.pen = PointD::new(x, y);
                self.subpath_start = self.pen;
            }
            Segment::Close => self.pen = self.subpath_start,
            _ => {
                if let Some(p) = seg.end_point() {
                    self.pen = p;
                }
            }
        }
        self.segments.push(seg);
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.push(Segment::MoveTo { x, y });
    }

    pub fn move_rel(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.rel_to_abs(dx, dy);
        self.move_to(x, y);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.push(Segment::LineTo { x, y });
    }

    pub fn line_rel(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.rel_to_abs(dx, dy);
        self.line_to(x, y);
    }

    /// Horizontal line to `x` at the current pen height.
    pub fn hline_to(&mut self, x: f64) {
        let y = self.last_y();
        self.line_to(x, y);
    }

    pub fn hline_rel(&mut self, dx: f64) {
        self.line_rel(dx, 0.0);
    }

    /// Vertical line to `y` at the current pen column.
    pub fn vline_to(&mut self, y: f64) {
        let x = self.last_x();
        self.line_to(x, y);
    }

    pub fn vline_rel(&mut self, dy: f64) {
        self.line_rel(0.0, dy);
    }

    /// Quadratic Bezier with an explicit control point.
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.push(Segment::QuadTo { cx, cy, x, y });
    }

    pub fn quad_rel(&mut self, dcx: f64, dcy: f64, dx: f64, dy: f64) {
        let (cx, cy) = self.rel_to_abs(dcx, dcy);
        let (x, y) = self.rel_to_abs(dx, dy);
        self.quad_to(cx, cy, x, y);
    }

    /// Quadratic Bezier whose control point mirrors the previous curve's
    /// last control point about the pen (or sits on the pen if the previous
    /// segment is not a curve). Ignored on an empty path.
    pub fn quad_smooth(&mut self, x: f64, y: f64) {
        if self.segments.is_empty() {
            return;
        }
        let c = self.reflected_control();
        self.quad_to(c.x, c.y, x, y);
    }

    /// Cubic Bezier with two explicit control points.
    #[allow(clippy::too_many_arguments)]
    pub fn cubic_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) {
        self.push(Segment::CubicTo {
            cx1,
            cy1,
            cx2,
            cy2,
            x,
            y,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn cubic_rel(&mut self, dcx1: f64, dcy1: f64, dcx2: f64, dcy2: f64, dx: f64, dy: f64) {
        let (cx1, cy1) = self.rel_to_abs(dcx1, dcy1);
        let (cx2, cy2) = self.rel_to_abs(dcx2, dcy2);
        let (x, y) = self.rel_to_abs(dx, dy);
        self.cubic_to(cx1, cy1, cx2, cy2, x, y);
    }

    /// Cubic Bezier whose first control point mirrors the previous curve's
    /// last control point about the pen. Ignored on an empty path.
    pub fn cubic_smooth(&mut self, cx2: f64, cy2: f64, x: f64, y: f64) {
        if self.segments.is_empty() {
            return;
        }
        let c = self.reflected_control();
        self.cubic_to(c.x, c.y, cx2, cy2, x, y);
    }

    fn reflected_control(&self) -> PointD {
        let p = self.pen;
        match self.segments.last() {
            Some(Segment::QuadTo { cx, cy, .. })
            | Some(Segment::CubicTo {
                cx2: cx, cy2: cy, ..
            }) => PointD::new(p.x + p.x - cx, p.y + p.y - cy),
            _ => p,
        }
    }

    /// Close the current sub-path. Does nothing on an empty path or right
    /// after another close.
    pub fn close_polygon(&mut self) {
        if matches!(self.segments.last(), Some(s) if *s != Segment::Close) {
            self.push(Segment::Close);
        }
    }

    /// Append a closed rectangle sub-path.
    pub fn add_rect(&mut self, r: &RectD) {
        self.move_to(r.x1, r.y1);
        self.line_to(r.x2, r.y1);
        self.line_to(r.x2, r.y2);
        self.line_to(r.x1, r.y2);
        self.close_polygon();
    }

    /// Append a closed ellipse sub-path made of four quarter-turn cubics,
    /// starting at `(cx + rx, cy)`.
    pub fn add_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.move_to(cx + rx, cy);
        for quarter in 0..4 {
            let c = arc_to_cubic(cx, cy, rx, ry, quarter as f64 * FRAC_PI_2, FRAC_PI_2);
            self.cubic_to(c[2], c[3], c[4], c[5], c[6], c[7]);
        }
        self.close_polygon();
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn total_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, idx: usize) -> Option<&Segment> {
        self.segments.get(idx)
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    /// Convert relative coordinates to absolute by adding the pen position.
    pub fn rel_to_abs(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.pen.x + dx, self.pen.y + dy)
    }

    /// X of the pen position (0.0 on an empty path).
    pub fn last_x(&self) -> f64 {
        self.pen.x
    }

    /// Y of the pen position (0.0 on an empty path).
    pub fn last_y(&self) -> f64 {
        self.pen.y
    }

    // ---------------------------------------------------------------
    // Concatenation
    // ---------------------------------------------------------------

    /// Append every segment of another path source as-is.
    pub fn concat_path<P: PathSource + ?Sized>(&mut self, src: &P) {
        for seg in src.segments() {
            self.push(seg);
        }
    }

    /// Append a polyline from flat coordinate data, closing it if asked.
    pub fn concat_poly(&mut self, data: &[f64], closed: bool) {
        let mut points = data.chunks_exact(2);
        if let Some(first) = points.next() {
            self.move_to(first[0], first[1]);
            for p in points {
                self.line_to(p[0], p[1]);
            }
            if closed {
                self.close_polygon();
            }
        }
    }

    // ---------------------------------------------------------------
    // Whole-path edits
    // ---------------------------------------------------------------

    pub fn translate_all_paths(&mut self, dx: f64, dy: f64) {
        self.transform_all_paths(&|x, y| (x + dx, y + dy));
    }

    /// Map every stored coordinate (end and control points) through `trans`.
    pub fn transform_all_paths<F: Fn(f64, f64) -> (f64, f64)>(&mut self, trans: &F) {
        let old = std::mem::take(&mut self.segments);
        self.pen = PointD::default();
        self.subpath_start = PointD::default();
        for seg in old {
            self.push(seg.map_points(trans));
        }
    }
}

impl PathSource for PathStorage {
    fn winding_rule(&self) -> WindingRule {
        self.winding_rule
    }

    fn segments(&self) -> Segments<'_> {
        Box::new(self.segments.iter().copied())
    }
}

// ============================================================================
// Tests
// ============================================================================
