//! An area that queues boolean operations and resolves them on demand.
//!
//! Operations are cheap to enqueue; the queued list is handed to a
//! [`Rules`] strategy the first time the result is needed, so the strategy
//! can see the whole run at once.

use crate::basics::{PathSource, RectD};
use crate::boolean_algebra::{Body, BodyEngine, Operand, Operation, Relationship};
use crate::math::is_degenerate_rect;
use crate::path_storage::PathStorage;
use crate::rules::{FoldRules, OpSlot, Rules};

/// A body plus the operations still to be applied to it.
pub struct DeferredArea<E: BodyEngine, R: Rules = FoldRules> {
    engine: E,
    rules: R,
    body: E::Body,
    queue: Vec<OpSlot<E::Body>>,
}

impl<E: BodyEngine, R: Rules + Default> DeferredArea<E, R> {
    /// An empty area using the default strategy.
    pub fn new(engine: E) -> Self {
        Self::with_rules(engine, R::default())
    }
}

impl<E: BodyEngine, R: Rules> DeferredArea<E, R> {
    pub fn with_rules(engine: E, rules: R) -> Self {
        let body = engine.empty();
        Self {
            engine,
            rules,
            body,
            queue: Vec::new(),
        }
    }

    /// An area starting from an already resolved body.
    pub fn from_body(engine: E, rules: R, body: E::Body) -> Self {
        Self {
            engine,
            rules,
            body,
            queue: Vec::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Replace the strategy used for operations processed from now on.
    pub fn set_rules(&mut self, rules: R) {
        self.rules = rules;
    }

    /// Number of operations waiting to be processed.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    // ---------------------------------------------------------------
    // Queued operations
    // ---------------------------------------------------------------

    /// Queue an arbitrary operation.
    pub fn push(&mut self, op: Operation<E::Body>) {
        self.queue.push(Some(op));
    }

    pub fn add<P: PathSource + Send + Sync + 'static>(&mut self, shape: P) {
        self.push(Operation::add(Operand::shape(shape)));
    }

    pub fn subtract<P: PathSource + Send + Sync + 'static>(&mut self, shape: P) {
        self.push(Operation::subtract(Operand::shape(shape)));
    }

    pub fn intersect<P: PathSource + Send + Sync + 'static>(&mut self, shape: P) {
        self.push(Operation::intersect(Operand::shape(shape)));
    }

    pub fn exclusive_or<P: PathSource + Send + Sync + 'static>(&mut self, shape: P) {
        self.push(Operation::xor(Operand::shape(shape)));
    }

    /// Run every queued operation through the strategy.
    pub fn process_queue(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let ops = std::mem::take(&mut self.queue);
        log::debug!("deferred area: processing {} queued operations", ops.len());
        let body = std::mem::replace(&mut self.body, self.engine.empty());
        self.body = self.rules.apply(&self.engine, body, &ops);
    }

    /// The resolved body, processing the queue first.
    pub fn body(&mut self) -> &E::Body {
        self.process_queue();
        &self.body
    }

    /// Drop the body and every queued operation.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.body = self.engine.empty();
    }

    // ---------------------------------------------------------------
    // Queries (each processes the queue)
    // ---------------------------------------------------------------

    pub fn is_empty(&mut self) -> bool {
        self.body().is_empty()
    }

    pub fn bounds(&mut self) -> Option<RectD> {
        self.body().bounds()
    }

    pub fn contains_point(&mut self, x: f64, y: f64) -> bool {
        self.body().contains_point(x, y)
    }

    /// Relationship between this area and `shape`.
    pub fn relationship(&mut self, shape: &dyn PathSource) -> Relationship {
        let rhs = self.engine.to_body(shape);
        self.body().relationship(&rhs)
    }

    /// Returns `true` if this area covers all of `shape`.
    pub fn contains_shape(&mut self, shape: &dyn PathSource) -> bool {
        self.relationship(shape) == Relationship::LhsContains
    }

    /// Returns `true` if this area and `shape` share any area.
    pub fn intersects_shape(&mut self, shape: &dyn PathSource) -> bool {
        self.relationship(shape) != Relationship::Disjoint
    }

    /// Returns `true` if this area covers all of `r`. A rectangle with no
    /// area is never contained.
    pub fn contains_rect(&mut self, r: &RectD) -> bool {
        if is_degenerate_rect(r) {
            return false;
        }
        match self.bounds() {
            Some(b) if b.contains_rect(r) => self.contains_shape(&PathStorage::from_rect(r)),
            _ => false,
        }
    }

    /// Returns `true` if this area and `r` share any area. A rectangle with
    /// no area never intersects.
    pub fn intersects_rect(&mut self, r: &RectD) -> bool {
        if is_degenerate_rect(r) {
            return false;
        }
        match self.bounds() {
            Some(b) if b.overlaps(r) => self.intersects_shape(&PathStorage::from_rect(r)),
            _ => false,
        }
    }

    // ---------------------------------------------------------------
    // Immediate operations
    // ---------------------------------------------------------------

    /// Process both queues and add `rhs` right away.
    pub fn execute_add(&mut self, rhs: &mut Self) {
        let rhs_body = rhs.body().clone();
        self.body = self.body().add(&rhs_body);
    }

    pub fn execute_subtract(&mut self, rhs: &mut Self) {
        let rhs_body = rhs.body().clone();
        self.body = self.body().subtract(&rhs_body);
    }

    pub fn execute_intersect(&mut self, rhs: &mut Self) {
        let rhs_body = rhs.body().clone();
        self.body = self.body().intersect(&rhs_body);
    }

    pub fn execute_exclusive_or(&mut self, rhs: &mut Self) {
        let rhs_body = rhs.body().clone();
        self.body = self.body().xor(&rhs_body);
    }
}

impl<E: BodyEngine, R: Rules> DeferredArea<E, R>
where
    E::Body: PartialEq,
{
    /// Returns `true` if both areas resolve to the same body. Processes
    /// both queues.
    pub fn same_area(&mut self, other: &mut Self) -> bool {
        self.body() == other.body()
    }
}

/// The copy keeps the pending operations; they are shared, not resolved.
impl<E, R> Clone for DeferredArea<E, R>
where
    E: BodyEngine + Clone,
    R: Rules + Clone,
{
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            rules: self.rules.clone(),
            body: self.body.clone(),
            queue: self.queue.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_storage::PathStorage;
    use crate::rules::{BatchAddRules, PruneRules};
    use crate::scanline_body::ScanlineEngine;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> PathStorage {
        PathStorage::from_rect(&RectD::new(x1, y1, x2, y2))
    }

    #[test]
    fn test_operations_wait_in_queue() {
        let mut area: DeferredArea<ScanlineEngine> = DeferredArea::new(ScanlineEngine::default());
        area.add(rect(0.0, 0.0, 4.0, 4.0));
        area.subtract(rect(0.0, 0.0, 2.0, 4.0));
        assert_eq!(area.pending(), 2);

        assert_eq!(area.bounds(), Some(RectD::new(2.0, 0.0, 4.0, 4.0)));
        assert_eq!(area.pending(), 0);
        assert!(area.contains_point(3.0, 1.0));
        assert!(!area.contains_point(1.0, 1.0));
    }

    #[test]
    fn test_intersect_and_xor() {
        let mut area: DeferredArea<ScanlineEngine, PruneRules> =
            DeferredArea::new(ScanlineEngine::default());
        area.add(rect(0.0, 0.0, 4.0, 4.0));
        area.intersect(rect(2.0, 2.0, 6.0, 6.0));
        assert_eq!(area.bounds(), Some(RectD::new(2.0, 2.0, 4.0, 4.0)));

        area.exclusive_or(rect(2.0, 2.0, 4.0, 4.0));
        assert!(area.is_empty());
    }

    #[test]
    fn test_strategies_agree() {
        let engine = ScanlineEngine::default();
        let mut plain: DeferredArea<ScanlineEngine> = DeferredArea::new(engine);
        let mut batched = DeferredArea::with_rules(engine, BatchAddRules::new(PruneRules));
        for (x, y) in [(0.0, 0.0), (3.0, 1.0), (1.0, 5.0), (6.0, 6.0)] {
            plain.add(rect(x, y, x + 3.0, y + 3.0));
            batched.add(rect(x, y, x + 3.0, y + 3.0));
        }
        plain.subtract(rect(2.0, 2.0, 5.0, 5.0));
        batched.subtract(rect(2.0, 2.0, 5.0, 5.0));

        assert_eq!(plain.body(), batched.body());
    }

    #[test]
    fn test_reset_clears_body_and_queue() {
        let mut area: DeferredArea<ScanlineEngine> = DeferredArea::new(ScanlineEngine::default());
        area.add(rect(0.0, 0.0, 4.0, 4.0));
        area.process_queue();
        area.add(rect(5.0, 5.0, 6.0, 6.0));
        area.reset();
        assert_eq!(area.pending(), 0);
        assert!(area.is_empty());
    }

    #[test]
    fn test_shape_queries() {
        let mut area: DeferredArea<ScanlineEngine> = DeferredArea::new(ScanlineEngine::default());
        area.add(rect(0.0, 0.0, 10.0, 10.0));

        assert!(area.contains_shape(&rect(2.0, 2.0, 4.0, 4.0)));
        assert!(!area.contains_shape(&rect(8.0, 8.0, 12.0, 12.0)));
        assert!(area.intersects_shape(&rect(8.0, 8.0, 12.0, 12.0)));
        assert!(!area.intersects_shape(&rect(20.0, 20.0, 21.0, 21.0)));
        assert_eq!(
            area.relationship(&rect(-1.0, -1.0, 11.0, 11.0)),
            Relationship::RhsContains
        );
    }

    #[test]
    fn test_immediate_operations() {
        let engine = ScanlineEngine::default();
        let mut a: DeferredArea<ScanlineEngine> = DeferredArea::new(engine);
        let mut b: DeferredArea<ScanlineEngine> = DeferredArea::new(engine);
        a.add(rect(0.0, 0.0, 4.0, 4.0));
        b.add(rect(2.0, 0.0, 6.0, 4.0));

        a.execute_add(&mut b);
        assert_eq!(a.bounds(), Some(RectD::new(0.0, 0.0, 6.0, 4.0)));
        a.execute_subtract(&mut b);
        assert_eq!(a.bounds(), Some(RectD::new(0.0, 0.0, 2.0, 4.0)));
        a.execute_exclusive_or(&mut b);
        assert_eq!(a.body().num_cells(), 24);
        a.execute_intersect(&mut b);
        assert_eq!(a.bounds(), b.bounds());
    }

    #[test]
    fn test_rect_queries() {
        let mut area: DeferredArea<ScanlineEngine> = DeferredArea::new(ScanlineEngine::default());
        area.add(rect(0.0, 0.0, 10.0, 10.0));
        area.subtract(rect(4.0, 4.0, 6.0, 6.0));

        assert!(area.contains_rect(&RectD::new(1.0, 1.0, 3.0, 9.0)));
        assert!(!area.contains_rect(&RectD::new(3.0, 3.0, 7.0, 7.0)));
        assert!(!area.contains_rect(&RectD::new(8.0, 8.0, 12.0, 12.0)));
        assert!(area.intersects_rect(&RectD::new(3.0, 3.0, 7.0, 7.0)));
        assert!(area.intersects_rect(&RectD::new(8.0, 8.0, 12.0, 12.0)));
        assert!(!area.intersects_rect(&RectD::new(4.0, 4.0, 6.0, 6.0)));
        assert!(!area.intersects_rect(&RectD::new(20.0, 0.0, 30.0, 10.0)));

        // Negative or zero sizes.
        for r in [RectD::new(3.0, 3.0, 1.0, 1.0), RectD::new(1.0, 1.0, 1.0, 5.0)] {
            assert!(!area.contains_rect(&r));
            assert!(!area.intersects_rect(&r));
        }
    }

    #[test]
    fn test_rect_queries_on_empty_area() {
        let mut area: DeferredArea<ScanlineEngine> = DeferredArea::new(ScanlineEngine::default());
        assert!(!area.contains_rect(&RectD::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!area.intersects_rect(&RectD::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_clone_keeps_pending_operations() {
        let mut area: DeferredArea<ScanlineEngine, PruneRules> =
            DeferredArea::new(ScanlineEngine::default());
        area.add(rect(0.0, 0.0, 4.0, 4.0));
        area.process_queue();
        area.subtract(rect(0.0, 0.0, 2.0, 4.0));

        let mut copy = area.clone();
        assert_eq!(copy.pending(), 1);
        assert!(copy.same_area(&mut area));

        copy.add(rect(10.0, 10.0, 11.0, 11.0));
        assert!(!copy.same_area(&mut area));
        assert_eq!(area.bounds(), Some(RectD::new(2.0, 0.0, 4.0, 4.0)));
    }

    #[test]
    fn test_same_area_ignores_construction_order() {
        let engine = ScanlineEngine::default();
        let mut a: DeferredArea<ScanlineEngine> = DeferredArea::new(engine);
        let mut b: DeferredArea<ScanlineEngine> = DeferredArea::new(engine);
        a.add(rect(0.0, 0.0, 4.0, 4.0));
        a.add(rect(4.0, 0.0, 8.0, 4.0));
        b.add(rect(0.0, 0.0, 8.0, 4.0));
        assert!(a.same_area(&mut b));

        b.subtract(rect(0.0, 0.0, 1.0, 1.0));
        assert!(!a.same_area(&mut b));
    }
}
