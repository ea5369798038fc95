//! Error types for path-geom.

use thiserror::Error;

/// Errors raised by the geometry queries and the operation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The path has no line, quadratic or cubic segment to measure.
    #[error("path contains no drawable segment")]
    EmptyPath,

    /// An operator code outside ADD, SUBTRACT, INTERSECT and XOR.
    #[error("invalid boolean operator code: {0}")]
    InvalidOperator(u32),

    /// An operation was built without an operand.
    #[error("operation requires an operand")]
    MissingOperand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GeometryError::EmptyPath.to_string(),
            "path contains no drawable segment"
        );
        assert_eq!(
            GeometryError::InvalidOperator(9).to_string(),
            "invalid boolean operator code: 9"
        );
    }
}
