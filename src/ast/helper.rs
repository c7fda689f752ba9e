//! Smart constructors for expression nodes
//!
//! Every builder validates its operands and returns either a fully typed node
//! or an error. Implicit conversions (literal re-typing, `Cast`, `Broadcast`)
//! are materialized here as explicit child nodes, so consumers and the
//! renderer only ever see what is in the tree.

use log::debug;

use super::dtype::{infer_literal_dtype, promote, AsDType, DType, ScalarValue, TypeCode};
use super::{BinaryOpKind, BitwiseOpKind, Expr, ExprKind, UnaryOpKind};
use crate::error::{IrError, Result};

// ---------------------------------------------------------------------------
// Literals and leaves
// ---------------------------------------------------------------------------

/// Creates a literal whose dtype is inferred from the native value
pub fn constant(value: impl Into<ScalarValue>) -> Expr {
    let value = value.into();
    scalar_literal(value, infer_literal_dtype(&value))
}

/// Creates a literal of an explicit dtype. A vector dtype yields a
/// `Broadcast` of the scalar literal.
pub fn constant_of(value: impl Into<ScalarValue>, dtype: impl AsDType) -> Result<Expr> {
    let dtype = dtype.as_dtype()?;
    let scalar = scalar_literal(value.into(), dtype.element_of());
    if dtype.is_scalar() {
        Ok(scalar)
    } else {
        Ok(Expr::new(ExprKind::Broadcast(scalar), dtype))
    }
}

/// Integer values are wrapped to the width of `dtype`
fn scalar_literal(value: ScalarValue, dtype: DType) -> Expr {
    if dtype.is_float() {
        Expr::new(ExprKind::FloatImm(value.as_f64()), dtype)
    } else if dtype.is_bool() {
        Expr::new(ExprKind::IntImm(value.is_truthy() as i64), dtype)
    } else {
        Expr::new(ExprKind::IntImm(dtype.wrap_int(value.as_i64())), dtype)
    }
}

/// Creates an `int32` variable
pub fn var(name: impl Into<String>) -> Expr {
    Expr::new(ExprKind::Var(name.into()), DType::int(32, 1))
}

/// Creates a variable of the given dtype
pub fn var_of(name: impl Into<String>, dtype: impl AsDType) -> Result<Expr> {
    Ok(Expr::new(ExprKind::Var(name.into()), dtype.as_dtype()?))
}

pub fn string_imm(value: impl Into<String>) -> Expr {
    Expr::new(ExprKind::StringImm(value.into()), DType::handle())
}

/// Replicates a scalar across `lanes` lanes
pub fn broadcast(value: impl Into<Expr>, lanes: u16) -> Result<Expr> {
    let value = value.into();
    let dtype = value.dtype();
    if !dtype.is_scalar() || dtype.is_handle() || lanes == 0 {
        return Err(IrError::DTypeMismatch {
            op: "broadcast".to_string(),
            lhs: dtype,
            rhs: dtype.with_lanes(lanes),
        });
    }
    if lanes == 1 {
        return Ok(value);
    }
    Ok(Expr::new(ExprKind::Broadcast(value), dtype.with_lanes(lanes)))
}

// ---------------------------------------------------------------------------
// Operand coercion
// ---------------------------------------------------------------------------

/// Re-types a scalar literal to `elem`. Integer literals adapt to any numeric
/// element type, float literals only to float types.
fn retype_literal(expr: &Expr, elem: DType) -> Option<Expr> {
    if !expr.dtype().is_scalar() || elem.is_handle() {
        return None;
    }
    match expr.kind() {
        ExprKind::IntImm(v) => Some(scalar_literal(ScalarValue::I64(*v), elem)),
        ExprKind::FloatImm(v) if elem.is_float() => {
            Some(scalar_literal(ScalarValue::F64(*v), elem))
        }
        _ => None,
    }
}

/// Brings `expr` to element type `elem` and lane count `lanes`
fn coerce(expr: Expr, elem: DType, lanes: u16) -> Expr {
    let mut expr = expr;
    if expr.dtype().element_of() != elem {
        expr = match retype_literal(&expr, elem) {
            Some(lit) => lit,
            None => {
                debug!("inserting implicit cast {} -> {}", expr.dtype(), elem);
                let dtype = elem.with_lanes(expr.lanes());
                Expr::new(ExprKind::Cast(expr), dtype)
            }
        };
    }
    if expr.lanes() != lanes {
        debug!("inserting implicit broadcast of {} to {} lanes", expr.dtype(), lanes);
        let dtype = expr.dtype().with_lanes(lanes);
        expr = Expr::new(ExprKind::Broadcast(expr), dtype);
    }
    expr
}

/// Reconciles the dtypes of two operands, returning them with any implicit
/// conversion nodes applied.
fn match_operands(op: &str, lhs: Expr, rhs: Expr) -> Result<(Expr, Expr)> {
    if lhs.same_as(&rhs) {
        return Ok((lhs, rhs));
    }
    let (ldt, rdt) = (lhs.dtype(), rhs.dtype());

    let lanes = match (ldt.lanes(), rdt.lanes()) {
        (l, r) if l == r => l,
        // handles have no vector form
        _ if ldt.is_handle() || rdt.is_handle() => {
            return Err(IrError::DTypeMismatch {
                op: op.to_string(),
                lhs: ldt,
                rhs: rdt,
            })
        }
        (1, r) => r,
        (l, 1) => l,
        _ => {
            return Err(IrError::DTypeMismatch {
                op: op.to_string(),
                lhs: ldt,
                rhs: rdt,
            })
        }
    };

    let elem = if ldt.element_of() == rdt.element_of() {
        ldt.element_of()
    } else if ldt.lanes() != rdt.lanes() {
        // the scalar side adopts the vector's element type
        if ldt.is_vector() {
            ldt.element_of()
        } else {
            rdt.element_of()
        }
    } else if retype_literal(&rhs, ldt.element_of()).is_some() {
        ldt.element_of()
    } else if retype_literal(&lhs, rdt.element_of()).is_some() {
        rdt.element_of()
    } else {
        promote(op, ldt, rdt)?.element_of()
    };

    Ok((coerce(lhs, elem, lanes), coerce(rhs, elem, lanes)))
}

// ---------------------------------------------------------------------------
// Binary operators
// ---------------------------------------------------------------------------

fn binary(op: BinaryOpKind, lhs: Expr, rhs: Expr) -> Result<Expr> {
    if !op.is_comparison() {
        if let Some(handle) = [&lhs, &rhs].into_iter().find(|e| e.dtype().is_handle()) {
            return Err(IrError::DTypeMismatch {
                op: op.name().to_string(),
                lhs: lhs.dtype(),
                rhs: handle.dtype(),
            });
        }
    }
    if op.is_logical() {
        for operand in [&lhs, &rhs] {
            if !operand.dtype().is_bool() {
                return Err(IrError::InvalidLogicalOperand {
                    op: op.name().to_string(),
                    dtype: operand.dtype(),
                });
            }
        }
    }

    let (lhs, rhs) = match_operands(op.name(), lhs, rhs)?;
    let dtype = if op.is_comparison() {
        DType::boolean(lhs.lanes())
    } else {
        lhs.dtype()
    };
    Ok(Expr::new(ExprKind::Binary { op, lhs, rhs }, dtype))
}

/// Macro to generate binary operation helper functions
macro_rules! impl_binary_helper {
    ($fn_name:ident, $kind:ident, $doc:expr) => {
        #[doc = $doc]
        pub fn $fn_name(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Result<Expr> {
            binary(BinaryOpKind::$kind, lhs.into(), rhs.into())
        }
    };
}

impl_binary_helper!(add, Add, "Create an addition node: (a + b)");
impl_binary_helper!(sub, Sub, "Create a subtraction node: (a - b)");
impl_binary_helper!(mul, Mul, "Create a multiplication node: (a*b)");
impl_binary_helper!(div, Div, "Create a division node: (a/b)");
impl_binary_helper!(truncmod, Mod, "Create a truncating remainder node: (a % b)");
impl_binary_helper!(floordiv, FloorDiv, "Create a floor division node: floordiv(a, b)");
impl_binary_helper!(floormod, FloorMod, "Create a floor modulo node: floormod(a, b)");
impl_binary_helper!(max, Max, "Create a max node: max(a, b)");
impl_binary_helper!(min, Min, "Create a min node: min(a, b)");
impl_binary_helper!(equal, Eq, "Create an equality comparison: (a == b)");
impl_binary_helper!(not_equal, Ne, "Create an inequality comparison: (a != b)");
impl_binary_helper!(less, Lt, "Create a comparison: (a < b)");
impl_binary_helper!(less_equal, Le, "Create a comparison: (a <= b)");
impl_binary_helper!(greater, Gt, "Create a comparison: (a > b)");
impl_binary_helper!(greater_equal, Ge, "Create a comparison: (a >= b)");
impl_binary_helper!(logical_and, And, "Create a logical and of booleans: (a && b)");
impl_binary_helper!(logical_or, Or, "Create a logical or of booleans: (a || b)");

// ---------------------------------------------------------------------------
// Bitwise operators
// ---------------------------------------------------------------------------

fn bitwise(op: BitwiseOpKind, lhs: Expr, rhs: Expr) -> Result<Expr> {
    for operand in [&lhs, &rhs] {
        if !operand.dtype().is_integral() {
            return Err(IrError::InvalidBitwiseOperand {
                op: op.name().to_string(),
                dtype: operand.dtype(),
            });
        }
    }
    let (lhs, rhs) = match_operands(op.name(), lhs, rhs)?;
    let dtype = lhs.dtype();
    Ok(Expr::new(ExprKind::Bitwise { op, lhs, rhs }, dtype))
}

macro_rules! impl_bitwise_helper {
    ($fn_name:ident, $kind:ident) => {
        pub fn $fn_name(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Result<Expr> {
            bitwise(BitwiseOpKind::$kind, lhs.into(), rhs.into())
        }
    };
}

impl_bitwise_helper!(shift_left, ShiftLeft);
impl_bitwise_helper!(shift_right, ShiftRight);
impl_bitwise_helper!(bitwise_and, BitAnd);
impl_bitwise_helper!(bitwise_or, BitOr);
impl_bitwise_helper!(bitwise_xor, BitXor);

// ---------------------------------------------------------------------------
// Unary operators
// ---------------------------------------------------------------------------

pub fn bitwise_not(value: impl Into<Expr>) -> Result<Expr> {
    let operand = value.into();
    let dtype = operand.dtype();
    if !dtype.is_integral() {
        return Err(IrError::InvalidUnaryBitwiseOperand { dtype });
    }
    Ok(Expr::new(
        ExprKind::Unary {
            op: UnaryOpKind::BitwiseNot,
            operand,
        },
        dtype,
    ))
}

pub fn logical_not(value: impl Into<Expr>) -> Result<Expr> {
    let operand = value.into();
    let dtype = operand.dtype();
    if !dtype.is_bool() {
        return Err(IrError::InvalidLogicalOperand {
            op: "not".to_string(),
            dtype,
        });
    }
    Ok(Expr::new(
        ExprKind::Unary {
            op: UnaryOpKind::Not,
            operand,
        },
        dtype,
    ))
}

/// Negation, built as `x * -1` in the dtype of `x`
pub fn neg(value: impl Into<Expr>) -> Result<Expr> {
    let value = value.into();
    let minus_one = scalar_literal(ScalarValue::I64(-1), value.dtype().element_of());
    mul(value, minus_one)
}

// ---------------------------------------------------------------------------
// Cast
// ---------------------------------------------------------------------------

/// Folds a cast of a scalar literal into a literal of the target element type
fn fold_literal_cast(value: &Expr, elem: DType) -> Option<Expr> {
    if elem.is_handle() {
        return None;
    }
    match value.kind() {
        ExprKind::IntImm(v) => Some(scalar_literal(ScalarValue::I64(*v), elem)),
        ExprKind::FloatImm(v) => Some(scalar_literal(ScalarValue::F64(*v), elem)),
        _ => None,
    }
}

/// Converts `value` to `dtype`.
///
/// Same dtype returns `value` itself. A scalar cast to a vector dtype becomes
/// a `Broadcast` (of a `Cast` when the element type changes). Vectors can only
/// be cast between equal lane counts.
pub fn cast(value: impl Into<Expr>, dtype: impl AsDType) -> Result<Expr> {
    let value = value.into();
    let target = dtype.as_dtype()?;
    let source = value.dtype();
    if source == target {
        return Ok(value);
    }
    if source.is_vector() && source.lanes() != target.lanes() {
        return Err(IrError::DTypeMismatch {
            op: "cast".to_string(),
            lhs: source,
            rhs: target,
        });
    }

    let elem = target.element_of();
    let converted = if source.element_of() == elem {
        value
    } else if let Some(folded) = fold_literal_cast(&value, elem) {
        debug!("folded literal cast {} -> {}", source, elem);
        folded
    } else {
        let dtype = elem.with_lanes(source.lanes());
        Expr::new(ExprKind::Cast(value), dtype)
    };

    if converted.lanes() == target.lanes() {
        Ok(converted)
    } else {
        Ok(Expr::new(ExprKind::Broadcast(converted), target))
    }
}

// ---------------------------------------------------------------------------
// Variadic combinators
// ---------------------------------------------------------------------------

fn fold_logical(combinator: &str, op: BinaryOpKind, exprs: Vec<Expr>) -> Result<Expr> {
    let mut iter = exprs.into_iter();
    let first = iter.next().ok_or_else(|| IrError::EmptyCombinator {
        combinator: combinator.to_string(),
    })?;
    iter.try_fold(first, |acc, next| binary(op, acc, next))
}

/// Left-folds the conditions with `&&`: `((e1 && e2) && e3) ...`
///
/// A single condition is returned as is.
pub fn all<I, E>(conds: I) -> Result<Expr>
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    fold_logical("all", BinaryOpKind::And, conds.into_iter().map(Into::into).collect())
}

/// Left-folds the conditions with `||`: `((e1 || e2) || e3) ...`
///
/// A single condition is returned as is.
pub fn any<I, E>(conds: I) -> Result<Expr>
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    fold_logical("any", BinaryOpKind::Or, conds.into_iter().map(Into::into).collect())
}

// ---------------------------------------------------------------------------
// Intrinsics
// ---------------------------------------------------------------------------

/// Builds a pure intrinsic call with an explicit result dtype
pub fn call_intrinsic(
    name: impl Into<String>,
    args: Vec<Expr>,
    dtype: impl AsDType,
) -> Result<Expr> {
    Ok(Expr::new(
        ExprKind::Call {
            name: name.into(),
            args,
        },
        dtype.as_dtype()?,
    ))
}

/// NaN test.
///
/// Integer operands are never NaN and fold to a false literal of the
/// lane-matched boolean dtype. Float literals fold to their answer. Floats
/// narrower than 32 bits are cast to `float32` before the call.
pub fn isnan(value: impl Into<Expr>) -> Result<Expr> {
    let value = value.into();
    let dtype = value.dtype();
    let result = DType::boolean(dtype.lanes());

    match dtype.code() {
        TypeCode::Int | TypeCode::UInt => {
            debug!("isnan on {} folded to false", dtype);
            constant_of(false, result)
        }
        TypeCode::Float => {
            if let Some(v) = value.float_value() {
                debug!("isnan on literal {} folded", v);
                return constant_of(v.is_nan(), result);
            }
            let arg = if dtype.bits() < 32 {
                cast(value, DType::float(32, dtype.lanes()))?
            } else {
                value
            };
            Ok(Expr::new(
                ExprKind::Call {
                    name: "isnan".to_string(),
                    args: vec![arg],
                },
                result,
            ))
        }
        TypeCode::Handle => Err(IrError::InvalidIntrinsicOperand {
            name: "isnan".to_string(),
            dtype,
        }),
    }
}
