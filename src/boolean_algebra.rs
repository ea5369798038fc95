//! Boolean operation model.
//!
//! Shapes are combined through an external engine that turns paths into
//! opaque *bodies* and knows how to add, subtract, intersect and xor them.
//! This module defines that contract ([`Body`], [`BodyEngine`]) and the
//! deferred [`Operation`] values a [`Rules`](crate::rules::Rules) strategy
//! folds into a body.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::basics::{PathSource, RectD};
use crate::bounding_rect::bounding_rect;
use crate::error::GeometryError;

// ============================================================================
// Operator
// ============================================================================

/// Boolean operator applied by an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Intersect,
    Xor,
}

impl Operator {
    pub const ADD: u32 = 0;
    pub const SUBTRACT: u32 = 1;
    pub const INTERSECT: u32 = 2;
    pub const XOR: u32 = 3;

    /// Integer code of the operator.
    pub fn code(self) -> u32 {
        match self {
            Operator::Add => Self::ADD,
            Operator::Subtract => Self::SUBTRACT,
            Operator::Intersect => Self::INTERSECT,
            Operator::Xor => Self::XOR,
        }
    }
}

impl TryFrom<u32> for Operator {
    type Error = GeometryError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            Self::ADD => Ok(Operator::Add),
            Self::SUBTRACT => Ok(Operator::Subtract),
            Self::INTERSECT => Ok(Operator::Intersect),
            Self::XOR => Ok(Operator::Xor),
            other => Err(GeometryError::InvalidOperator(other)),
        }
    }
}

// ============================================================================
// Relationship
// ============================================================================

/// How two bodies overlap, seen from the left-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    /// The left-hand body covers all of the right-hand body.
    LhsContains,
    /// The right-hand body covers all of the left-hand body.
    RhsContains,
    /// The bodies partially overlap.
    Complex,
    /// The bodies share no area.
    Disjoint,
}

// ============================================================================
// Engine contract
// ============================================================================

/// A resolved shape owned by the boolean engine.
///
/// Every operation returns a new body and leaves both inputs untouched.
pub trait Body: Clone {
    fn add(&self, rhs: &Self) -> Self;
    fn subtract(&self, rhs: &Self) -> Self;
    fn intersect(&self, rhs: &Self) -> Self;
    fn xor(&self, rhs: &Self) -> Self;

    /// Bounding box of the covered area, `None` for an empty body.
    fn bounds(&self) -> Option<RectD>;

    fn is_empty(&self) -> bool;

    fn relationship(&self, rhs: &Self) -> Relationship;

    /// Returns `true` if `(x, y)` lies in the covered area.
    fn contains_point(&self, x: f64, y: f64) -> bool;

    /// Dispatch on `op`.
    fn apply(&self, op: Operator, rhs: &Self) -> Self {
        match op {
            Operator::Add => self.add(rhs),
            Operator::Subtract => self.subtract(rhs),
            Operator::Intersect => self.intersect(rhs),
            Operator::Xor => self.xor(rhs),
        }
    }
}

/// Factory side of the boolean engine.
pub trait BodyEngine {
    type Body: Body;

    /// A body covering nothing.
    fn empty(&self) -> Self::Body;

    /// Resolve a path into a body using the path's winding rule.
    fn to_body(&self, shape: &dyn PathSource) -> Self::Body;
}

// ============================================================================
// Operand
// ============================================================================

/// A shared, thread-safe path source.
pub type SharedShape = Arc<dyn PathSource + Send + Sync>;

/// Right-hand side of an operation: an already resolved body or a shape
/// still to be converted by the engine.
#[derive(Clone)]
pub enum Operand<B> {
    Body(B),
    Shape(SharedShape),
}

impl<B> Operand<B> {
    /// Wrap any path source as a shape operand.
    pub fn shape<P: PathSource + Send + Sync + 'static>(path: P) -> Self {
        Operand::Shape(Arc::new(path))
    }
}

impl<B: Body> Operand<B> {
    /// Bounds of the operand; `None` when it covers nothing.
    pub fn bounds(&self) -> Option<RectD> {
        match self {
            Operand::Body(body) => body.bounds(),
            Operand::Shape(shape) => match bounding_rect(shape.as_ref()) {
                Ok(r) => Some(r),
                Err(err) => {
                    log::trace!("operand has no bounds: {err}");
                    None
                }
            },
        }
    }

    /// The operand as a body, borrowing when it already is one.
    pub fn resolve<'a, E>(&'a self, engine: &E) -> Cow<'a, B>
    where
        E: BodyEngine<Body = B> + ?Sized,
    {
        match self {
            Operand::Body(body) => Cow::Borrowed(body),
            Operand::Shape(shape) => Cow::Owned(engine.to_body(shape.as_ref())),
        }
    }
}

impl<B: fmt::Debug> fmt::Debug for Operand<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Body(body) => f.debug_tuple("Body").field(body).finish(),
            Operand::Shape(_) => f.write_str("Shape(..)"),
        }
    }
}

// ============================================================================
// Operation
// ============================================================================

/// An operator paired with its operand, with the operand's bounds computed
/// on first use and cached.
#[derive(Clone, Debug)]
pub struct Operation<B> {
    operand: Operand<B>,
    operator: Operator,
    bounds: OnceCell<Option<RectD>>,
}

impl<B: Body> Operation<B> {
    pub fn new(operand: Operand<B>, operator: Operator) -> Self {
        Self {
            operand,
            operator,
            bounds: OnceCell::new(),
        }
    }

    /// Build from an integer operator code, as stored in operation lists.
    pub fn from_code(operand: Option<Operand<B>>, code: u32) -> Result<Self, GeometryError> {
        let operator = Operator::try_from(code)?;
        let operand = operand.ok_or(GeometryError::MissingOperand)?;
        Ok(Self::new(operand, operator))
    }

    pub fn add(operand: Operand<B>) -> Self {
        Self::new(operand, Operator::Add)
    }

    pub fn subtract(operand: Operand<B>) -> Self {
        Self::new(operand, Operator::Subtract)
    }

    pub fn intersect(operand: Operand<B>) -> Self {
        Self::new(operand, Operator::Intersect)
    }

    pub fn xor(operand: Operand<B>) -> Self {
        Self::new(operand, Operator::Xor)
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &Operand<B> {
        &self.operand
    }

    /// Operand bounds, computed once and shared by every later caller.
    pub fn bounds(&self) -> Option<RectD> {
        *self.bounds.get_or_init(|| self.operand.bounds())
    }

    pub fn resolve<'a, E>(&'a self, engine: &E) -> Cow<'a, B>
    where
        E: BodyEngine<Body = B> + ?Sized,
    {
        self.operand.resolve(engine)
    }

    /// Apply this operation to `body`.
    pub fn apply_to<E>(&self, engine: &E, body: &B) -> B
    where
        E: BodyEngine<Body = B> + ?Sized,
    {
        body.apply(self.operator, &self.resolve(engine))
    }
}

// ============================================================================
// Tests
// ============================================================================
