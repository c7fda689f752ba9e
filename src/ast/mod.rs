//! Expression and statement nodes
//!
//! Nodes are immutable handles. Cloning an [`Expr`] clones the handle, not the
//! node, so identity ([`Expr::same_as`]) survives being passed around. Two
//! separately constructed `Var("x", int32)` are different nodes.

use std::sync::Arc;

pub mod attr;
pub mod dtype;
pub mod helper;
pub mod ops;
pub mod renderer;
pub mod stmt;

#[cfg(test)]
mod tests;

pub use attr::AttrValue;
pub use dtype::{infer_literal_dtype, promote, AsDType, DType, ScalarValue, TypeCode};
pub use renderer::{render_expr, render_stmt, IrRenderer, RenderOptions};
pub use stmt::{ForKind, Stmt, StmtKind};

use crate::error::{IrError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    /// Logical not on booleans
    Not,
    BitwiseNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpKind {
    Add,
    Sub,
    Mul,
    Div,
    /// Truncating remainder
    Mod,
    FloorDiv,
    FloorMod,
    Max,
    Min,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOpKind {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOpKind::Add => "add",
            BinaryOpKind::Sub => "sub",
            BinaryOpKind::Mul => "mul",
            BinaryOpKind::Div => "div",
            BinaryOpKind::Mod => "mod",
            BinaryOpKind::FloorDiv => "floordiv",
            BinaryOpKind::FloorMod => "floormod",
            BinaryOpKind::Max => "max",
            BinaryOpKind::Min => "min",
            BinaryOpKind::And => "and",
            BinaryOpKind::Or => "or",
            BinaryOpKind::Eq => "eq",
            BinaryOpKind::Ne => "ne",
            BinaryOpKind::Lt => "lt",
            BinaryOpKind::Le => "le",
            BinaryOpKind::Gt => "gt",
            BinaryOpKind::Ge => "ge",
        }
    }

    /// Comparisons always produce a boolean of the operand lane count
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOpKind::Eq
                | BinaryOpKind::Ne
                | BinaryOpKind::Lt
                | BinaryOpKind::Le
                | BinaryOpKind::Gt
                | BinaryOpKind::Ge
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOpKind::And | BinaryOpKind::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitwiseOpKind {
    ShiftLeft,
    ShiftRight,
    BitAnd,
    BitOr,
    BitXor,
}

impl BitwiseOpKind {
    /// Call-style name used when printing
    pub fn name(&self) -> &'static str {
        match self {
            BitwiseOpKind::ShiftLeft => "shift_left",
            BitwiseOpKind::ShiftRight => "shift_right",
            BitwiseOpKind::BitAnd => "bitwise_and",
            BitwiseOpKind::BitOr => "bitwise_or",
            BitwiseOpKind::BitXor => "bitwise_xor",
        }
    }
}

/// The closed set of expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntImm(i64),
    FloatImm(f64),
    StringImm(String),
    Var(String),
    Unary {
        op: UnaryOpKind,
        operand: Expr,
    },
    Binary {
        op: BinaryOpKind,
        lhs: Expr,
        rhs: Expr,
    },
    Bitwise {
        op: BitwiseOpKind,
        lhs: Expr,
        rhs: Expr,
    },
    /// Conversion to the node's dtype; lane count is preserved
    Cast(Expr),
    /// Scalar replicated to the node's lane count
    Broadcast(Expr),
    /// Pure intrinsic call
    Call { name: String, args: Vec<Expr> },
}

#[derive(Debug, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub dtype: DType,
}

/// Shared handle to an immutable expression node
#[derive(Debug, Clone)]
pub struct Expr(Arc<ExprNode>);

/// Structural equality, except that variables only equal themselves.
/// Use [`Expr::same_as`] for node identity.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        if self.same_as(other) {
            return true;
        }
        match (self.kind(), other.kind()) {
            (ExprKind::Var(_), _) | (_, ExprKind::Var(_)) => false,
            _ => self.0 == other.0,
        }
    }
}

impl Expr {
    pub(crate) fn new(kind: ExprKind, dtype: DType) -> Self {
        Expr(Arc::new(ExprNode { kind, dtype }))
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    pub fn dtype(&self) -> DType {
        self.0.dtype
    }

    pub fn lanes(&self) -> u16 {
        self.0.dtype.lanes()
    }

    /// True when both handles point at the very same node
    pub fn same_as(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind(), ExprKind::Var(_))
    }

    /// `IntImm` or `FloatImm`
    pub fn is_literal(&self) -> bool {
        matches!(self.kind(), ExprKind::IntImm(_) | ExprKind::FloatImm(_))
    }

    /// Name of a `Var` or intrinsic `Call`
    pub fn name(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::Var(name) | ExprKind::Call { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn int_value(&self) -> Option<i64> {
        match self.kind() {
            ExprKind::IntImm(v) => Some(*v),
            _ => None,
        }
    }

    pub fn float_value(&self) -> Option<f64> {
        match self.kind() {
            ExprKind::FloatImm(v) => Some(*v),
            _ => None,
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::StringImm(v) => Some(v),
            _ => None,
        }
    }

    /// Direct children in left-to-right order
    pub fn operands(&self) -> Vec<&Expr> {
        match self.kind() {
            ExprKind::IntImm(_)
            | ExprKind::FloatImm(_)
            | ExprKind::StringImm(_)
            | ExprKind::Var(_) => vec![],
            ExprKind::Unary { operand, .. } => vec![operand],
            ExprKind::Binary { lhs, rhs, .. } | ExprKind::Bitwise { lhs, rhs, .. } => {
                vec![lhs, rhs]
            }
            ExprKind::Cast(value) | ExprKind::Broadcast(value) => vec![value],
            ExprKind::Call { args, .. } => args.iter().collect(),
        }
    }

    /// Variant name as used in diagnostics
    pub fn type_key(&self) -> &'static str {
        match self.kind() {
            ExprKind::IntImm(_) => "IntImm",
            ExprKind::FloatImm(_) => "FloatImm",
            ExprKind::StringImm(_) => "StringImm",
            ExprKind::Var(_) => "Var",
            ExprKind::Unary { .. } => "UnaryOp",
            ExprKind::Binary { .. } => "BinaryOp",
            ExprKind::Bitwise { .. } => "BitwiseOp",
            ExprKind::Cast(_) => "Cast",
            ExprKind::Broadcast(_) => "Broadcast",
            ExprKind::Call { .. } => "Call",
        }
    }

    /// Concrete truth value, or `AmbiguousLogicalCombination` when the
    /// node cannot be decided statically. See [`resolve_boolean`].
    pub fn truth_value(&self) -> Result<bool> {
        resolve_boolean(self).ok_or_else(|| IrError::AmbiguousLogicalCombination {
            op: format!("bool({})", self.type_key()),
        })
    }

    /// Native short-circuit `and` on a symbolic expression. Always rejected;
    /// build `logical_and` or `all` instead.
    pub fn short_circuit_and(&self, _rhs: &Expr) -> Result<Expr> {
        Err(IrError::AmbiguousLogicalCombination {
            op: "and".to_string(),
        })
    }

    /// Native short-circuit `or` on a symbolic expression. Always rejected;
    /// build `logical_or` or `any` instead.
    pub fn short_circuit_or(&self, _rhs: &Expr) -> Result<Expr> {
        Err(IrError::AmbiguousLogicalCombination {
            op: "or".to_string(),
        })
    }
}

/// Statically decides the truth of a node where that is possible.
///
/// `Eq`/`Ne` nodes resolve by identity: identical operands give `true` for
/// `Eq` and `false` for `Ne`; distinct operands give `false` for both, which
/// means "not provably decidable" rather than "not equal". Integer literals
/// resolve to `value != 0`. Every other node yields `None`.
pub fn resolve_boolean(expr: &Expr) -> Option<bool> {
    match expr.kind() {
        ExprKind::Binary {
            op: op @ (BinaryOpKind::Eq | BinaryOpKind::Ne),
            lhs,
            rhs,
        } => Some(lhs.same_as(rhs) && *op == BinaryOpKind::Eq),
        ExprKind::IntImm(v) => Some(*v != 0),
        _ => None,
    }
}
