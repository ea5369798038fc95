//! Strategies for folding an operation list into a body.
//!
//! [`FoldRules`] is the reference: a strict left-to-right fold. The other
//! strategies take shortcuts (skipping operations proven to change nothing,
//! or batching runs of additions) but must always produce the same body as
//! the plain fold. Strategies hold only immutable configuration, so one
//! instance can serve any number of threads at once.

use crate::basics::RectD;
use crate::boolean_algebra::{Body, BodyEngine, Operation, Operator, Relationship};

/// An operation list slot; `None` marks an elided operation.
pub type OpSlot<B> = Option<Operation<B>>;

// ============================================================================
// Rules trait
// ============================================================================

/// Folds a slice of operations into a body.
pub trait Rules: Send + Sync {
    /// Apply every non-`None` operation in `ops`, in order, to `body`.
    fn apply<E>(&self, engine: &E, body: E::Body, ops: &[OpSlot<E::Body>]) -> E::Body
    where
        E: BodyEngine + ?Sized;

    /// Apply `ops[start..=end]` to `body`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds, as slice indexing does.
    fn execute<E>(
        &self,
        engine: &E,
        body: E::Body,
        ops: &[OpSlot<E::Body>],
        start: usize,
        end: usize,
    ) -> E::Body
    where
        E: BodyEngine + ?Sized,
    {
        self.apply(engine, body, &ops[start..=end])
    }
}

// ============================================================================
// FoldRules
// ============================================================================

/// Literal left-to-right fold with no optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldRules;

impl Rules for FoldRules {
    fn apply<E>(&self, engine: &E, body: E::Body, ops: &[OpSlot<E::Body>]) -> E::Body
    where
        E: BodyEngine + ?Sized,
    {
        ops.iter()
            .flatten()
            .fold(body, |acc, op| op.apply_to(engine, &acc))
    }
}

// ============================================================================
// PruneRules
// ============================================================================

/// Fold that skips operations proven not to change the result.
///
/// - ADD of an empty operand, or of one the accumulation already covers.
/// - SUBTRACT and XOR of an empty operand.
/// - SUBTRACT whose operand bounds miss the accumulation's bounds.
///
/// An INTERSECT whose bounds miss the accumulation yields an empty body
/// without resolving the operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneRules;

fn overlapping(a: Option<RectD>, b: Option<RectD>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.overlaps(&b))
}

impl Rules for PruneRules {
    fn apply<E>(&self, engine: &E, body: E::Body, ops: &[OpSlot<E::Body>]) -> E::Body
    where
        E: BodyEngine + ?Sized,
    {
        let mut acc = body;
        for (i, op) in ops.iter().enumerate() {
            let Some(op) = op else { continue };
            let op_bounds = op.bounds();
            let acc_bounds = acc.bounds();

            match op.operator() {
                Operator::Add => {
                    let Some(ob) = op_bounds else {
                        log::trace!("prune: op {i} adds an empty operand");
                        continue;
                    };
                    let rhs = op.resolve(engine);
                    let covered = matches!(acc_bounds, Some(ab) if ab.contains_rect(&ob))
                        && acc.relationship(&rhs) == Relationship::LhsContains;
                    if covered {
                        log::trace!("prune: op {i} already covered by the accumulation");
                    } else {
                        acc = acc.add(&rhs);
                    }
                }
                Operator::Subtract => {
                    if overlapping(acc_bounds, op_bounds) {
                        acc = op.apply_to(engine, &acc);
                    } else {
                        log::trace!("prune: op {i} subtracts outside the accumulation");
                    }
                }
                Operator::Xor => {
                    if op_bounds.is_some() {
                        acc = op.apply_to(engine, &acc);
                    } else {
                        log::trace!("prune: op {i} xors an empty operand");
                    }
                }
                Operator::Intersect => {
                    if overlapping(acc_bounds, op_bounds) {
                        acc = op.apply_to(engine, &acc);
                    } else {
                        log::debug!("prune: op {i} intersects disjoint bounds, result is empty");
                        acc = engine.empty();
                    }
                }
            }
        }
        acc
    }
}

// ============================================================================
// BatchAddRules
// ============================================================================

/// Unites each run of consecutive ADDs into one body before adding it, and
/// hands everything else to an inner strategy.
///
/// Within a run the operands are united largest bounds first; the order is
/// stable, so equal areas keep their list order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchAddRules<R = FoldRules> {
    inner: R,
}

impl<R: Rules> BatchAddRules<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

fn is_add<B: Body>(slot: &OpSlot<B>) -> bool {
    matches!(slot, Some(op) if op.operator() == Operator::Add)
}

fn bounds_area(r: Option<RectD>) -> f64 {
    r.map_or(0.0, |r| r.area())
}

impl<R: Rules> BatchAddRules<R> {
    fn add_run<E>(&self, engine: &E, body: E::Body, run: &[OpSlot<E::Body>]) -> E::Body
    where
        E: BodyEngine + ?Sized,
    {
        let mut adds: Vec<&Operation<E::Body>> = run.iter().flatten().collect();
        match adds.as_slice() {
            [] => return body,
            [op] => return op.apply_to(engine, &body),
            _ => {}
        }
        adds.sort_by(|a, b| bounds_area(b.bounds()).total_cmp(&bounds_area(a.bounds())));
        log::debug!("batch: uniting {} consecutive additions", adds.len());

        let mut iter = adds.into_iter();
        let Some(first) = iter.next() else {
            return body;
        };
        let batch = iter.fold(first.resolve(engine).into_owned(), |batch, op| {
            batch.add(&op.resolve(engine))
        });
        body.add(&batch)
    }
}

impl<R: Rules> Rules for BatchAddRules<R> {
    fn apply<E>(&self, engine: &E, body: E::Body, ops: &[OpSlot<E::Body>]) -> E::Body
    where
        E: BodyEngine + ?Sized,
    {
        let mut acc = body;
        let mut i = 0;
        while i < ops.len() {
            // A run is a maximal stretch of ADDs and empty slots, or of
            // anything else.
            let adding = is_add(&ops[i]);
            let mut j = i;
            while j < ops.len() && (ops[j].is_none() || is_add(&ops[j]) == adding) {
                j += 1;
            }
            let run = &ops[i..j];
            acc = if adding {
                self.add_run(engine, acc, run)
            } else {
                self.inner.apply(engine, acc, run)
            };
            i = j;
        }
        acc
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{PathSource, Segments, WindingRule};
    use crate::boolean_algebra::Operand;
    use crate::path_storage::PathStorage;
    use crate::scanline_body::{ScanlineBody, ScanlineEngine};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Operand<ScanlineBody> {
        Operand::shape(PathStorage::from_rect(&RectD::new(x1, y1, x2, y2)))
    }

    fn sample_ops() -> Vec<OpSlot<ScanlineBody>> {
        vec![
            Some(Operation::add(rect(0.0, 0.0, 4.0, 4.0))),
            None,
            Some(Operation::add(rect(2.0, 2.0, 8.0, 6.0))),
            Some(Operation::add(rect(1.0, 1.0, 2.0, 2.0))),
            Some(Operation::subtract(rect(3.0, 0.0, 5.0, 8.0))),
            Some(Operation::subtract(rect(20.0, 20.0, 22.0, 22.0))),
            Some(Operation::xor(rect(6.0, 0.0, 10.0, 3.0))),
            Some(Operation::add(rect(0.0, 7.0, 2.0, 9.0))),
            Some(Operation::intersect(rect(0.0, 0.0, 9.0, 9.0))),
        ]
    }

    /// Counts shape conversions so tests can see which operands were resolved.
    struct Counting {
        inner: PathStorage,
        conversions: Arc<AtomicUsize>,
    }

    impl PathSource for Counting {
        fn winding_rule(&self) -> WindingRule {
            self.inner.winding_rule()
        }

        fn segments(&self) -> Segments<'_> {
            self.conversions.fetch_add(1, AtomicOrdering::SeqCst);
            self.inner.segments()
        }
    }

    #[test]
    fn test_fold_skips_empty_slots() {
        let engine = ScanlineEngine::default();
        let ops = vec![
            None,
            Some(Operation::add(rect(0.0, 0.0, 2.0, 2.0))),
            None,
        ];
        let body = FoldRules.apply(&engine, engine.empty(), &ops);
        assert_eq!(body.num_cells(), 4);
        assert_eq!(FoldRules.apply(&engine, body.clone(), &[]), body);
    }

    #[test]
    fn test_execute_uses_inclusive_range() {
        let engine = ScanlineEngine::default();
        let ops = sample_ops();
        let head = FoldRules.execute(&engine, engine.empty(), &ops, 0, 0);
        assert_eq!(head.num_cells(), 16);

        let tail = FoldRules.execute(&engine, head.clone(), &ops, 1, 3);
        assert_eq!(tail, FoldRules.apply(&engine, engine.empty(), &ops[..4]));
    }

    #[test]
    #[should_panic]
    fn test_execute_out_of_range_panics() {
        let engine = ScanlineEngine::default();
        let ops = sample_ops();
        FoldRules.execute(&engine, engine.empty(), &ops, 0, ops.len());
    }

    #[test]
    fn test_strategies_match_fold() {
        let engine = ScanlineEngine::default();
        let ops = sample_ops();
        let expected = FoldRules.apply(&engine, engine.empty(), &ops);
        assert!(!expected.is_empty());

        assert_eq!(PruneRules.apply(&engine, engine.empty(), &ops), expected);
        assert_eq!(
            BatchAddRules::<FoldRules>::default().apply(&engine, engine.empty(), &ops),
            expected
        );
        assert_eq!(
            BatchAddRules::new(PruneRules).apply(&engine, engine.empty(), &ops),
            expected
        );
    }

    #[test]
    fn test_prune_skips_covered_add() {
        let engine = ScanlineEngine::default();
        let base = engine.to_body(&PathStorage::from_rect(&RectD::new(0.0, 0.0, 10.0, 10.0)));
        let conversions = Arc::new(AtomicUsize::new(0));
        let inner = Counting {
            inner: PathStorage::from_rect(&RectD::new(2.0, 2.0, 4.0, 4.0)),
            conversions: conversions.clone(),
        };
        let ops = vec![Some(Operation::add(Operand::shape(inner)))];
        let out = PruneRules.apply(&engine, base.clone(), &ops);
        assert_eq!(out, base);
        assert_eq!(out, FoldRules.apply(&engine, base.clone(), &ops));
        assert!(conversions.load(AtomicOrdering::SeqCst) >= 1);
    }

    #[test]
    fn test_prune_skips_distant_subtract_without_resolving() {
        let engine = ScanlineEngine::default();
        let base = engine.to_body(&PathStorage::from_rect(&RectD::new(0.0, 0.0, 4.0, 4.0)));
        let conversions = Arc::new(AtomicUsize::new(0));
        let far = Counting {
            inner: PathStorage::from_rect(&RectD::new(50.0, 50.0, 60.0, 60.0)),
            conversions: conversions.clone(),
        };
        let ops = vec![Some(Operation::subtract(Operand::shape(far)))];
        let out = PruneRules.apply(&engine, base.clone(), &ops);
        assert_eq!(out, base);
        // Only the bounds pass walked the path.
        assert_eq!(conversions.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_prune_disjoint_intersect_is_empty() {
        let engine = ScanlineEngine::default();
        let base = engine.to_body(&PathStorage::from_rect(&RectD::new(0.0, 0.0, 4.0, 4.0)));
        let ops = vec![Some(Operation::intersect(rect(10.0, 10.0, 12.0, 12.0)))];
        let out = PruneRules.apply(&engine, base.clone(), &ops);
        assert!(out.is_empty());
        assert_eq!(out, FoldRules.apply(&engine, base, &ops));
    }

    #[test]
    fn test_prune_empty_operands() {
        let engine = ScanlineEngine::default();
        let base = engine.to_body(&PathStorage::from_rect(&RectD::new(0.0, 0.0, 4.0, 4.0)));
        let ops = vec![
            Some(Operation::add(Operand::shape(PathStorage::new()))),
            Some(Operation::xor(Operand::Body(engine.empty()))),
            Some(Operation::subtract(Operand::Body(engine.empty()))),
        ];
        assert_eq!(PruneRules.apply(&engine, base.clone(), &ops), base);
        assert_eq!(FoldRules.apply(&engine, base.clone(), &ops), base);
    }

    #[test]
    fn test_batch_runs_split_on_other_operators() {
        let engine = ScanlineEngine::default();
        let ops = vec![
            Some(Operation::add(rect(0.0, 0.0, 2.0, 2.0))),
            Some(Operation::add(rect(0.0, 0.0, 6.0, 6.0))),
            Some(Operation::subtract(rect(0.0, 0.0, 6.0, 3.0))),
            Some(Operation::add(rect(0.0, 0.0, 1.0, 1.0))),
        ];
        let out = BatchAddRules::<FoldRules>::default().apply(&engine, engine.empty(), &ops);
        // 6x3 left after the subtract, plus the single cell added back.
        assert_eq!(out.num_cells(), 19);
        assert_eq!(out, FoldRules.apply(&engine, engine.empty(), &ops));
    }

    #[test]
    fn test_rules_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FoldRules>();
        assert_send_sync::<PruneRules>();
        assert_send_sync::<BatchAddRules<PruneRules>>();
        assert_send_sync::<Operation<ScanlineBody>>();
    }
}
