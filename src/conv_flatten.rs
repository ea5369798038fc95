//! Curve flattening converter.
//!
//! Replaces quadratic and cubic segments with runs of `LineTo` segments whose
//! distance from the true curve stays within a maximum deviation. Move,
//! line and close segments pass through untouched.
//!
//! The step count for a curve comes from the classic chord error bound
//! `|B''|max / (8 n^2) <= tolerance`, evaluated once per curve; points are
//! then produced incrementally in power basis.

use crate::basics::{PathSource, PointD, Segment, Segments, WindingRule};
use crate::math::{Cubic1, Quad1};

/// Upper bound on the number of lines a single curve is split into.
pub const MAX_FLATTEN_STEPS: u32 = 1024;

// ============================================================================
// Step iterator
// ============================================================================

/// Lines approximating one curve, or a single passthrough segment.
enum Flattened {
    Single(Option<Segment>),
    Curve {
        x: Cubic1,
        y: Cubic1,
        end: PointD,
        step: u32,
        num_steps: u32,
    },
}

impl Iterator for Flattened {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        match self {
            Flattened::Single(seg) => seg.take(),
            Flattened::Curve {
                x,
                y,
                end,
                step,
                num_steps,
            } => {
                if *step >= *num_steps {
                    return None;
                }
                *step += 1;
                if *step == *num_steps {
                    // Land exactly on the end point.
                    return Some(Segment::LineTo { x: end.x, y: end.y });
                }
                let t = *step as f64 / *num_steps as f64;
                Some(Segment::LineTo {
                    x: x.eval(t),
                    y: y.eval(t),
                })
            }
        }
    }
}

fn steps_for(second_derivative_max: f64, max_deviation: f64) -> u32 {
    if !(max_deviation > 0.0) {
        return MAX_FLATTEN_STEPS;
    }
    let n = (second_derivative_max / (8.0 * max_deviation)).sqrt().ceil();
    if n.is_nan() {
        return 1;
    }
    (n as u32).clamp(1, MAX_FLATTEN_STEPS)
}

fn quad_as_cubic(q: Quad1) -> Cubic1 {
    Cubic1 {
        a: 0.0,
        b: q.a,
        c: q.b,
        d: q.c,
    }
}

fn flatten_segment(p0: PointD, seg: Segment, max_deviation: f64) -> Flattened {
    match seg {
        Segment::QuadTo { cx, cy, x, y } => {
            let ddx = p0.x - 2.0 * cx + x;
            let ddy = p0.y - 2.0 * cy + y;
            let m = 2.0 * (ddx * ddx + ddy * ddy).sqrt();
            Flattened::Curve {
                x: quad_as_cubic(Quad1::from_bezier(p0.x, cx, x)),
                y: quad_as_cubic(Quad1::from_bezier(p0.y, cy, y)),
                end: PointD::new(x, y),
                step: 0,
                num_steps: steps_for(m, max_deviation),
            }
        }
        Segment::CubicTo {
            cx1,
            cy1,
            cx2,
            cy2,
            x,
            y,
        } => {
            let (d1x, d1y) = (p0.x - 2.0 * cx1 + cx2, p0.y - 2.0 * cy1 + cy2);
            let (d2x, d2y) = (cx1 - 2.0 * cx2 + x, cy1 - 2.0 * cy2 + y);
            let m = 6.0 * (d1x * d1x + d1y * d1y).sqrt().max((d2x * d2x + d2y * d2y).sqrt());
            Flattened::Curve {
                x: Cubic1::from_bezier(p0.x, cx1, cx2, x),
                y: Cubic1::from_bezier(p0.y, cy1, cy2, y),
                end: PointD::new(x, y),
                step: 0,
                num_steps: steps_for(m, max_deviation),
            }
        }
        other => Flattened::Single(Some(other)),
    }
}

// ============================================================================
// ConvFlatten
// ============================================================================

/// Path source view that emits only move, line and close segments.
pub struct ConvFlatten<P: PathSource> {
    source: P,
    max_deviation: f64,
}

impl<P: PathSource> ConvFlatten<P> {
    /// Wrap `source`, keeping every line within `max_deviation` of its curve.
    /// A non-positive or NaN deviation flattens with the maximum step count.
    pub fn new(source: P, max_deviation: f64) -> Self {
        Self {
            source,
            max_deviation,
        }
    }

    pub fn set_max_deviation(&mut self, max_deviation: f64) {
        self.max_deviation = max_deviation;
    }

    pub fn max_deviation(&self) -> f64 {
        self.max_deviation
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }
}

impl<P: PathSource> PathSource for ConvFlatten<P> {
    fn winding_rule(&self) -> WindingRule {
        self.source.winding_rule()
    }

    fn segments(&self) -> Segments<'_> {
        let max_deviation = self.max_deviation;
        let mut pen = PointD::default();
        let mut start = PointD::default();
        Box::new(self.source.segments().flat_map(move |seg| {
            let p0 = pen;
            match seg {
                Segment::MoveTo { x, y } => {
                    pen = PointD::new(x, y);
                    start = pen;
                }
                Segment::Close => pen = start,
                _ => {
                    if let Some(p) = seg.end_point() {
                        pen = p;
                    }
                }
            }
            flatten_segment(p0, seg, max_deviation)
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================
