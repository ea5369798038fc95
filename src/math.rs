//! Numeric helpers shared by the bounds and containment code.
//!
//! Power-basis coefficients for quadratic and cubic Bezier components,
//! polynomial root finding restricted to what the curve queries need, and
//! the [`Tolerance`] value that names every epsilon used along the way.

use crate::basics::{PointD, RectD};

// ============================================================================
// Constants
// ============================================================================

/// Relative size under which a leading polynomial coefficient counts as zero.
pub const COEFFICIENT_EPSILON: f64 = 1e-12;

/// Vertical expansion of the rectangle band in the cubic bucketing test.
pub const RECT_BAND_EPSILON: f64 = 1e-4;

/// Iteration cap for the bisection fallback; enough to exhaust f64 precision.
const BISECTION_STEPS: u32 = 64;

// ============================================================================
// Tolerance
// ============================================================================

/// Named numeric tolerances threaded through every query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// A leading coefficient `a` is treated as zero when
    /// `|a| <= coefficient * max(|other coefficients|)`.
    pub coefficient: f64,
    /// Amount the rectangle's vertical band is widened by when cubic
    /// candidates are bucketed against it.
    pub rect_band: f64,
}

impl Tolerance {
    pub fn new(coefficient: f64, rect_band: f64) -> Self {
        Self {
            coefficient,
            rect_band,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(COEFFICIENT_EPSILON, RECT_BAND_EPSILON)
    }
}

// ============================================================================
// Roots
// ============================================================================

/// Up to three real roots, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Roots {
    values: [f64; 3],
    len: usize,
}

impl Roots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root. NaN and infinite values are dropped.
    #[inline]
    pub fn push(&mut self, t: f64) {
        if t.is_finite() && self.len < self.values.len() {
            self.values[self.len] = t;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }

    /// Roots strictly inside the open interval (0, 1).
    pub fn interior(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().filter(|&t| t > 0.0 && t < 1.0)
    }
}

#[inline]
fn negligible(lead: f64, scale: f64, eps: f64) -> bool {
    lead.abs() <= eps * scale || lead == 0.0
}

/// Root of `b*t + c = 0`; none when `b` vanishes relative to `c`.
pub fn solve_linear(b: f64, c: f64, eps: f64) -> Roots {
    let mut roots = Roots::new();
    if !negligible(b, c.abs(), eps) {
        roots.push(-c / b);
    }
    roots
}

/// Real roots of `a*t^2 + b*t + c = 0`.
///
/// Falls back to the linear equation when `a` is negligible. A double root is
/// reported once.
pub fn solve_quadratic(a: f64, b: f64, c: f64, eps: f64) -> Roots {
    if negligible(a, b.abs().max(c.abs()), eps) {
        return solve_linear(b, c, eps);
    }
    let mut roots = Roots::new();
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return roots;
    }
    if disc == 0.0 {
        roots.push(-b / (2.0 * a));
        return roots;
    }
    // Numerically stable form: avoid subtracting nearly equal values.
    let sq = disc.sqrt();
    let q = if b < 0.0 { -0.5 * (b - sq) } else { -0.5 * (b + sq) };
    roots.push(q / a);
    if q != 0.0 {
        roots.push(c / q);
    }
    roots
}

/// Real roots of `a*t^3 + b*t^2 + c*t + d = 0`.
///
/// Falls back to the quadratic equation when `a` is negligible. Each root is
/// polished with a few Newton steps.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64, eps: f64) -> Roots {
    if negligible(a, b.abs().max(c.abs()).max(d.abs()), eps) {
        return solve_quadratic(b, c, d, eps);
    }

    let b = b / a;
    let c = c / a;
    let d = d / a;

    // Depressed cubic t^3 + p*t + q with x = t - b/3.
    let shift = b / 3.0;
    let p = c - b * shift;
    let q = 2.0 * shift * shift * shift - shift * c + d;

    let half_q = q * 0.5;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p * third_p * third_p;

    let mut raw = Roots::new();
    if disc > 0.0 {
        let sq = disc.sqrt();
        let u = (-half_q + sq).cbrt();
        let v = (-half_q - sq).cbrt();
        raw.push(u + v - shift);
    } else if disc == 0.0 {
        if p == 0.0 {
            raw.push(-shift);
        } else {
            raw.push(3.0 * q / p - shift);
            raw.push(-1.5 * q / p - shift);
        }
    } else {
        let r = 2.0 * (-third_p).sqrt();
        let cos_arg = (3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = cos_arg.acos() / 3.0;
        let two_thirds_pi = 2.0 * std::f64::consts::PI / 3.0;
        for k in 0..3 {
            raw.push(r * (phi - two_thirds_pi * k as f64).cos() - shift);
        }
    }

    let mut roots = Roots::new();
    for t in raw.iter() {
        roots.push(polish_cubic_root(b, c, d, t));
    }
    roots
}

/// Newton refinement of a root of the monic cubic `t^3 + b*t^2 + c*t + d`.
fn polish_cubic_root(b: f64, c: f64, d: f64, mut t: f64) -> f64 {
    for _ in 0..3 {
        let f = ((t + b) * t + c) * t + d;
        let df = (3.0 * t + 2.0 * b) * t + c;
        if df == 0.0 {
            break;
        }
        let next = t - f / df;
        if !next.is_finite() {
            break;
        }
        t = next;
    }
    t
}

/// Find `t` in `[lo, hi]` where `f` changes sign, assuming `f(lo)` and `f(hi)`
/// lie on different sides of zero.
pub fn bisect<F: Fn(f64) -> f64>(f: F, mut lo: f64, mut hi: f64) -> f64 {
    let lo_negative = f(lo) < 0.0;
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if (f(mid) < 0.0) == lo_negative {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

// ============================================================================
// Power-basis curve components
// ============================================================================

/// One axis of a quadratic Bezier in power basis: `a*t^2 + b*t + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad1 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Quad1 {
    /// Component from the start, control and end coordinates.
    #[inline]
    pub fn from_bezier(p0: f64, p1: f64, p2: f64) -> Self {
        Self {
            a: p0 - 2.0 * p1 + p2,
            b: -2.0 * p0 + 2.0 * p1,
            c: p0,
        }
    }

    #[inline]
    pub fn eval(&self, t: f64) -> f64 {
        (self.a * t + self.b) * t + self.c
    }

    /// Parameter of the turning point, if the component has one in (0, 1).
    pub fn turning_point(&self, eps: f64) -> Option<f64> {
        if negligible(self.a, self.b.abs(), eps) {
            return None;
        }
        let t = -self.b / (2.0 * self.a);
        (t > 0.0 && t < 1.0).then_some(t)
    }

    /// Parameters where the component equals `value`.
    pub fn solve(&self, value: f64, eps: f64) -> Roots {
        solve_quadratic(self.a, self.b, self.c - value, eps)
    }
}

/// One axis of a cubic Bezier in power basis: `a*t^3 + b*t^2 + c*t + d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic1 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Cubic1 {
    /// Component from the start, two control and end coordinates.
    #[inline]
    pub fn from_bezier(p0: f64, p1: f64, p2: f64, p3: f64) -> Self {
        Self {
            a: -p0 + 3.0 * p1 - 3.0 * p2 + p3,
            b: 3.0 * p0 - 6.0 * p1 + 3.0 * p2,
            c: -3.0 * p0 + 3.0 * p1,
            d: p0,
        }
    }

    #[inline]
    pub fn eval(&self, t: f64) -> f64 {
        ((self.a * t + self.b) * t + self.c) * t + self.d
    }

    #[inline]
    pub fn derivative(&self, t: f64) -> f64 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }

    /// Parameters in (0, 1) where the derivative vanishes.
    pub fn turning_points(&self, eps: f64) -> Roots {
        let all = solve_quadratic(3.0 * self.a, 2.0 * self.b, self.c, eps);
        let mut roots = Roots::new();
        for t in all.interior() {
            roots.push(t);
        }
        roots
    }

    /// Parameters where the component equals `value`.
    pub fn solve(&self, value: f64, eps: f64) -> Roots {
        solve_cubic(self.a, self.b, self.c, self.d - value, eps)
    }
}

// ============================================================================
// Degenerate-shape helpers
// ============================================================================

/// Returns `true` if both coordinates are finite.
#[inline]
pub fn is_finite_point(p: PointD) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Returns `true` if the rectangle encloses no area (or is not a number).
#[inline]
pub fn is_degenerate_rect(r: &RectD) -> bool {
    !(r.x2 - r.x1 > 0.0 && r.y2 - r.y1 > 0.0)
}

// ============================================================================
// Tests
// ============================================================================
