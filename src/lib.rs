//! # path-geom
//!
//! Precise geometry over vector paths made of lines, quadratic and cubic
//! Bézier segments.
//!
//! - Tight bounding boxes that take curve extrema into account rather than
//!   control points
//! - Point containment under even-odd and non-zero winding rules
//! - Rectangle intersection and containment tests for spatial culling
//! - A deferred boolean operation model whose folding strategy can be
//!   swapped without changing the result
//!
//! ## Architecture
//!
//! Queries consume a [`basics::PathSource`], a re-iterable stream of
//! [`basics::Segment`] values plus a winding rule:
//!
//! 1. **Path Source**: [`path_storage::PathStorage`] or any custom source
//! 2. **Conversion**: affine transform and curve flattening views
//! 3. **Queries**: bounds, point and rectangle containment
//! 4. **Algebra**: operations folded into engine bodies by a `Rules` strategy

// Foundation types & math
pub mod basics;
pub mod error;
pub mod math;

// Path sources & conversion
pub mod conv_flatten;
pub mod conv_transform;
pub mod path_storage;
pub mod trans_affine;

// Queries
pub mod bounding_rect;
pub mod crossings;
pub mod rect_crossings;

// Boolean operation model
pub mod boolean_algebra;
pub mod deferred_area;
pub mod rules;
pub mod scanline_body;

pub use basics::{PathSource, PointD, RectD, Segment, WindingRule};
pub use bounding_rect::{bounding_rect, EdgePoints};
pub use crossings::{contains, contains_point};
pub use error::GeometryError;
pub use math::Tolerance;
pub use rect_crossings::{contains_rect, intersects_rect};
