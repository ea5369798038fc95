//! Affine transform converter for path sources.
//!
//! Wraps a `PathSource` and applies a `TransAffine` to every end and
//! control point as the segments stream past. The wrapped path is never
//! copied.

use crate::basics::{PathSource, Segments, WindingRule};
use crate::trans_affine::TransAffine;

// ============================================================================
// ConvTransform
// ============================================================================

/// Lazily transformed view of a path source.
///
/// Owns the source; use `ConvTransform<&PathStorage>` to borrow.
pub struct ConvTransform<P: PathSource> {
    source: P,
    trans: TransAffine,
}

impl<P: PathSource> ConvTransform<P> {
    pub fn new(source: P, trans: TransAffine) -> Self {
        Self { source, trans }
    }

    pub fn set_transform(&mut self, trans: TransAffine) {
        self.trans = trans;
    }

    pub fn transform(&self) -> &TransAffine {
        &self.trans
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }
}

impl<P: PathSource> PathSource for ConvTransform<P> {
    fn winding_rule(&self) -> WindingRule {
        self.source.winding_rule()
    }

    fn segments(&self) -> Segments<'_> {
        let trans = self.trans;
        Box::new(
            self.source
                .segments()
                .map(move |seg| trans.transform_segment(&seg)),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
