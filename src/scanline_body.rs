//! Reference boolean engine over binary scanlines.
//!
//! Shapes are sampled on a square grid: a cell is covered when its center
//! lies inside the path under the path's winding rule. Each covered row is
//! stored as sorted half-open spans of cell indices, and boolean
//! operations combine two bodies row by row, span edge by span edge.
//!
//! The result is exact for shapes aligned to the grid and a conservative
//! approximation otherwise. It exists so the operation model and the
//! rules can be exercised without an external geometry kernel.

use crate::basics::{PathSource, PointD, RectD};
use crate::boolean_algebra::{Body, BodyEngine, Relationship};
use crate::bounding_rect::bounding_rect;
use crate::crossings::contains;
use crate::math::is_finite_point;

/// Largest grid [`ScanlineEngine::to_body`] samples. Bigger shapes resolve
/// to an empty body.
pub const MAX_CELLS: i64 = 1 << 24;

/// Boolean operation type applied per span interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SBoolOp {
    Or,
    And,
    Xor,
    AMinusB,
}

impl SBoolOp {
    #[inline]
    fn eval(self, in1: bool, in2: bool) -> bool {
        match self {
            SBoolOp::Or => in1 || in2,
            SBoolOp::And => in1 && in2,
            SBoolOp::Xor => in1 ^ in2,
            SBoolOp::AMinusB => in1 && !in2,
        }
    }
}

// ============================================================================
// Spans and rows
// ============================================================================

/// Covered cells `x1..x2` of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x1: i32,
    pub x2: i32,
}

impl Span {
    pub fn new(x1: i32, x2: i32) -> Self {
        Self { x1, x2 }
    }

    pub fn len(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn is_empty(&self) -> bool {
        self.x2 <= self.x1
    }
}

/// One covered row: sorted, non-overlapping, non-adjacent spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanlineRow {
    pub y: i32,
    pub spans: Vec<Span>,
}

/// Append `span` to `out`, joining it with the last span when they touch.
fn push_span(out: &mut Vec<Span>, span: Span) {
    if span.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(last) if last.x2 >= span.x1 => last.x2 = last.x2.max(span.x2),
        _ => out.push(span),
    }
}

/// Whether cell `x` is covered, advancing `idx` past spans that end at or
/// before `x`. Calls must use non-decreasing `x`.
fn covered(spans: &[Span], idx: &mut usize, x: i32) -> bool {
    while *idx < spans.len() && spans[*idx].x2 <= x {
        *idx += 1;
    }
    *idx < spans.len() && spans[*idx].x1 <= x
}

fn combine_spans(a: &[Span], b: &[Span], op: SBoolOp) -> Vec<Span> {
    let mut edges: Vec<i32> = a
        .iter()
        .chain(b.iter())
        .flat_map(|s| [s.x1, s.x2])
        .collect();
    edges.sort_unstable();
    edges.dedup();

    let mut out = Vec::new();
    let (mut ia, mut ib) = (0, 0);
    for w in edges.windows(2) {
        let in1 = covered(a, &mut ia, w[0]);
        let in2 = covered(b, &mut ib, w[0]);
        if op.eval(in1, in2) {
            push_span(&mut out, Span::new(w[0], w[1]));
        }
    }
    out
}

fn combine_rows(a: &[ScanlineRow], b: &[ScanlineRow], op: SBoolOp) -> Vec<ScanlineRow> {
    let mut out = Vec::new();
    let mut emit = |y: i32, sa: &[Span], sb: &[Span]| {
        let spans = combine_spans(sa, sb, op);
        if !spans.is_empty() {
            out.push(ScanlineRow { y, spans });
        }
    };

    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        match (a.get(i), b.get(j)) {
            (Some(ra), Some(rb)) if ra.y == rb.y => {
                emit(ra.y, &ra.spans, &rb.spans);
                i += 1;
                j += 1;
            }
            (Some(ra), Some(rb)) if ra.y < rb.y => {
                emit(ra.y, &ra.spans, &[]);
                i += 1;
            }
            (Some(ra), None) => {
                emit(ra.y, &ra.spans, &[]);
                i += 1;
            }
            (_, Some(rb)) => {
                emit(rb.y, &[], &rb.spans);
                j += 1;
            }
            (None, None) => break,
        }
    }
    out
}

// ============================================================================
// ScanlineBody
// ============================================================================

/// A shape resolved to covered grid cells.
///
/// Bodies combined with each other are expected to share a cell size; the
/// result keeps the left-hand side's.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanlineBody {
    cell: f64,
    rows: Vec<ScanlineRow>,
}

impl ScanlineBody {
    pub fn empty(cell: f64) -> Self {
        Self {
            cell,
            rows: Vec::new(),
        }
    }

    /// Build from rows; rows are sorted by `y`, spans normalized and empty
    /// rows dropped.
    pub fn from_rows(cell: f64, rows: Vec<ScanlineRow>) -> Self {
        let mut rows: Vec<ScanlineRow> = rows
            .into_iter()
            .map(|mut row| {
                row.spans.sort_by_key(|s| s.x1);
                let mut spans = Vec::with_capacity(row.spans.len());
                for s in row.spans {
                    push_span(&mut spans, s);
                }
                ScanlineRow { y: row.y, spans }
            })
            .filter(|row| !row.spans.is_empty())
            .collect();
        rows.sort_by_key(|row| row.y);

        // Rows with equal y are united.
        let mut merged: Vec<ScanlineRow> = Vec::with_capacity(rows.len());
        for row in rows {
            match merged.last_mut() {
                Some(last) if last.y == row.y => {
                    last.spans = combine_spans(&last.spans, &row.spans, SBoolOp::Or);
                }
                _ => merged.push(row),
            }
        }
        Self { cell, rows: merged }
    }

    pub fn cell(&self) -> f64 {
        self.cell
    }

    pub fn rows(&self) -> &[ScanlineRow] {
        &self.rows
    }

    /// Number of covered cells.
    pub fn num_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.spans.iter())
            .map(|s| s.len() as usize)
            .sum()
    }

    fn combine(&self, rhs: &Self, op: SBoolOp) -> Self {
        Self {
            cell: self.cell,
            rows: combine_rows(&self.rows, &rhs.rows, op),
        }
    }
}

impl Body for ScanlineBody {
    fn add(&self, rhs: &Self) -> Self {
        self.combine(rhs, SBoolOp::Or)
    }

    fn subtract(&self, rhs: &Self) -> Self {
        self.combine(rhs, SBoolOp::AMinusB)
    }

    fn intersect(&self, rhs: &Self) -> Self {
        self.combine(rhs, SBoolOp::And)
    }

    fn xor(&self, rhs: &Self) -> Self {
        self.combine(rhs, SBoolOp::Xor)
    }

    fn bounds(&self) -> Option<RectD> {
        let first = self.rows.first()?;
        let last = self.rows.last()?;
        let mut x1 = i32::MAX;
        let mut x2 = i32::MIN;
        for row in &self.rows {
            if let (Some(a), Some(b)) = (row.spans.first(), row.spans.last()) {
                x1 = x1.min(a.x1);
                x2 = x2.max(b.x2);
            }
        }
        Some(RectD::new(
            x1 as f64 * self.cell,
            first.y as f64 * self.cell,
            x2 as f64 * self.cell,
            (last.y + 1) as f64 * self.cell,
        ))
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn relationship(&self, rhs: &Self) -> Relationship {
        if self.intersect(rhs).is_empty() {
            Relationship::Disjoint
        } else if rhs.subtract(self).is_empty() {
            Relationship::LhsContains
        } else if self.subtract(rhs).is_empty() {
            Relationship::RhsContains
        } else {
            Relationship::Complex
        }
    }

    fn contains_point(&self, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) || !(self.cell > 0.0) {
            return false;
        }
        let cx = (x / self.cell).floor() as i32;
        let cy = (y / self.cell).floor() as i32;
        match self.rows.binary_search_by_key(&cy, |row| row.y) {
            Ok(idx) => self.rows[idx]
                .spans
                .iter()
                .any(|s| s.x1 <= cx && cx < s.x2),
            Err(_) => false,
        }
    }
}

// ============================================================================
// ScanlineEngine
// ============================================================================

/// Resolves paths into [`ScanlineBody`] values on a grid of `cell` units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanlineEngine {
    cell: f64,
}

impl ScanlineEngine {
    pub fn new(cell: f64) -> Self {
        Self { cell }
    }

    pub fn cell(&self) -> f64 {
        self.cell
    }
}

impl Default for ScanlineEngine {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl BodyEngine for ScanlineEngine {
    type Body = ScanlineBody;

    fn empty(&self) -> ScanlineBody {
        ScanlineBody::empty(self.cell)
    }

    fn to_body(&self, shape: &dyn PathSource) -> ScanlineBody {
        let cell = self.cell;
        if !(cell > 0.0 && cell.is_finite()) {
            log::debug!("scanline engine: unusable cell size {cell}");
            return self.empty();
        }
        let r = match bounding_rect(shape) {
            Ok(r) => r,
            Err(err) => {
                log::debug!("scanline engine: {err}, resolving to empty body");
                return self.empty();
            }
        };
        if !(is_finite_point(PointD::new(r.x1, r.y1)) && is_finite_point(PointD::new(r.x2, r.y2))) {
            log::debug!("scanline engine: non-finite bounds, resolving to empty body");
            return self.empty();
        }

        let (fx1, fx2) = ((r.x1 / cell).floor(), (r.x2 / cell).ceil());
        let (fy1, fy2) = ((r.y1 / cell).floor(), (r.y2 / cell).ceil());
        let in_range = |v: f64| v >= i32::MIN as f64 && v <= i32::MAX as f64;
        if !(in_range(fx1) && in_range(fx2) && in_range(fy1) && in_range(fy2)) {
            log::debug!("scanline engine: grid outside cell coordinate range, resolving to empty body");
            return self.empty();
        }
        let (cx1, cx2) = (fx1 as i32, fx2 as i32);
        let (cy1, cy2) = (fy1 as i32, fy2 as i32);
        let (columns, lines) = (cx2 as i64 - cx1 as i64, cy2 as i64 - cy1 as i64);
        if columns * lines > MAX_CELLS {
            log::debug!(
                "scanline engine: {columns}x{lines} cells exceed the {MAX_CELLS} cell limit, resolving to empty body"
            );
            return self.empty();
        }

        let rule = shape.winding_rule();
        let mut rows = Vec::new();
        for cy in cy1..cy2 {
            let y = (cy as f64 + 0.5) * cell;
            let mut spans = Vec::new();
            for cx in cx1..cx2 {
                let x = (cx as f64 + 0.5) * cell;
                if contains(shape, rule, x, y) {
                    push_span(&mut spans, Span::new(cx, cx + 1));
                }
            }
            if !spans.is_empty() {
                rows.push(ScanlineRow { y: cy, spans });
            }
        }
        log::trace!(
            "scanline engine: resolved {} rows over {columns}x{lines} cells",
            rows.len()
        );
        ScanlineBody { cell, rows }
    }
}

// ============================================================================
// Tests
// ============================================================================
