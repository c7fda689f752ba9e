//! TIR: typed scalar/vector expression IR
//!
//! Immutable expression and statement nodes for a tensor-program front end.
//! Downstream lowering, scheduling and code generation consume the trees built
//! here.
//!
//! # Architecture
//!
//! - **ast::dtype**: scalar/vector dtypes, literal dtype inference, promotion
//! - **ast**: the `Expr` node handle and its variants
//! - **ast::helper**: smart constructors that validate dtypes before building
//! - **ast::ops**: operator overloads on `Expr` built on the helpers
//! - **ast::stmt**: statement nodes
//! - **ast::renderer**: canonical text rendering
//!
//! # Example
//!
//! ```
//! use tir::prelude::*;
//!
//! let x = var("x");
//! let y = var("y");
//! let z = var("z");
//! let cond = all([x.lt(&y)?, y.gt((&z + 1)?)?])?;
//! assert_eq!(cond.to_string(), "((x < y) && (y > (z + 1)))");
//! # Ok::<(), tir::IrError>(())
//! ```

// ============================================================================
// Core Modules
// ============================================================================

pub mod ast;
pub mod error;

// ============================================================================
// Re-exports
// ============================================================================

pub use ast::{DType, Expr, Stmt};
pub use error::{ErrorKind, IrError, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module with commonly used types and constructors
pub mod prelude {
    // Nodes and types
    pub use crate::ast::{
        resolve_boolean, AsDType, AttrValue, BinaryOpKind, BitwiseOpKind, DType, Expr, ExprKind,
        ForKind, ScalarValue, Stmt, StmtKind, TypeCode, UnaryOpKind,
    };

    // Constructors
    pub use crate::ast::helper::*;

    // Rendering
    pub use crate::ast::renderer::{render_expr, render_stmt, IrRenderer, RenderOptions};

    pub use crate::error::{ErrorKind, IrError};
}
