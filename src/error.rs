//! Error types for IR construction and introspection

use thiserror::Error;

use crate::ast::DType;

pub type Result<T> = std::result::Result<T, IrError>;

/// Errors raised while building or inspecting IR nodes.
///
/// Every error is raised synchronously by the call that would have produced
/// the node; no partially-built node is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrError {
    /// Operand lane counts cannot be reconciled
    #[error("DTypeMismatch: cannot combine {lhs} and {rhs} in {op}")]
    DTypeMismatch { op: String, lhs: DType, rhs: DType },

    /// Binary bitwise or shift operator on a non-integer operand
    #[error("TypeError: bitwise op on non-integer dtype {dtype} in {op}")]
    InvalidBitwiseOperand { op: String, dtype: DType },

    /// `bitwise_not` on a non-integer operand
    #[error("RuntimeError: bitwise_not requires an integer operand, got {dtype}")]
    InvalidUnaryBitwiseOperand { dtype: DType },

    /// Native `and`/`or` (or truth conversion) on a symbolic expression
    #[error("ValueError: ambiguous boolean combination ({op}); use logical_and/logical_or, all or any")]
    AmbiguousLogicalCombination { op: String },

    /// `all()` / `any()` without arguments
    #[error("ValueError: empty logical combinator {combinator}()")]
    EmptyCombinator { combinator: String },

    #[error("AttributeError: {node} has no attribute '{attr}'")]
    UnknownAttribute { node: String, attr: String },

    #[error("invalid dtype '{0}'")]
    InvalidDType(String),

    #[error("TypeError: {op} requires boolean operands, got {dtype}")]
    InvalidLogicalOperand { op: String, dtype: DType },

    #[error("TypeError: intrinsic {name} does not accept {dtype}")]
    InvalidIntrinsicOperand { name: String, dtype: DType },

    #[error("TypeError: {field} of {node} must be a Var")]
    ExpectedVariable { node: String, field: String },
}

/// Fieldless identity of an [`IrError`], for matching on the surfaced kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DTypeMismatch,
    InvalidBitwiseOperand,
    InvalidUnaryBitwiseOperand,
    AmbiguousLogicalCombination,
    EmptyCombinator,
    UnknownAttribute,
    InvalidDType,
    InvalidLogicalOperand,
    InvalidIntrinsicOperand,
    ExpectedVariable,
}

impl IrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IrError::DTypeMismatch { .. } => ErrorKind::DTypeMismatch,
            IrError::InvalidBitwiseOperand { .. } => ErrorKind::InvalidBitwiseOperand,
            IrError::InvalidUnaryBitwiseOperand { .. } => ErrorKind::InvalidUnaryBitwiseOperand,
            IrError::AmbiguousLogicalCombination { .. } => {
                ErrorKind::AmbiguousLogicalCombination
            }
            IrError::EmptyCombinator { .. } => ErrorKind::EmptyCombinator,
            IrError::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            IrError::InvalidDType(_) => ErrorKind::InvalidDType,
            IrError::InvalidLogicalOperand { .. } => ErrorKind::InvalidLogicalOperand,
            IrError::InvalidIntrinsicOperand { .. } => ErrorKind::InvalidIntrinsicOperand,
            IrError::ExpectedVariable { .. } => ErrorKind::ExpectedVariable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitwise_kinds_are_distinct() {
        let binary = IrError::InvalidBitwiseOperand {
            op: "shift_left".to_string(),
            dtype: DType::float(32, 1),
        };
        let unary = IrError::InvalidUnaryBitwiseOperand {
            dtype: DType::float(32, 1),
        };
        assert_ne!(binary.kind(), unary.kind());
        assert!(binary.to_string().contains("bitwise op on non-integer dtype"));
        assert!(binary.to_string().contains("float32"));
    }

    #[test]
    fn test_empty_combinator_message() {
        let err = IrError::EmptyCombinator {
            combinator: "all".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::EmptyCombinator);
        assert_eq!(err.to_string(), "ValueError: empty logical combinator all()");
    }
}
