use super::dtype::{AsDType, ScalarValue};
use super::helper;
use super::Expr;
use crate::error::Result;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub};

// Operator overloading for Expr with Into<Expr> abstraction.
// Every operator is fallible, so the output is `Result<Expr>`.

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $builder:path) => {
        impl<T: Into<Expr>> $trait<T> for Expr {
            type Output = Result<Expr>;

            fn $method(self, rhs: T) -> Result<Expr> {
                $builder(self, rhs)
            }
        }

        impl<T: Into<Expr>> $trait<T> for &Expr {
            type Output = Result<Expr>;

            fn $method(self, rhs: T) -> Result<Expr> {
                $builder(self.clone(), rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, helper::add);
impl_binary_op!(Sub, sub, helper::sub);
impl_binary_op!(Mul, mul, helper::mul);
impl_binary_op!(Div, div, helper::div);
// `%` follows floor semantics
impl_binary_op!(Rem, rem, helper::floormod);

// Bitwise operations
impl_binary_op!(BitAnd, bitand, helper::bitwise_and);
impl_binary_op!(BitOr, bitor, helper::bitwise_or);
impl_binary_op!(BitXor, bitxor, helper::bitwise_xor);
impl_binary_op!(Shl, shl, helper::shift_left);
impl_binary_op!(Shr, shr, helper::shift_right);

// `!x` is bitwise not, matching Rust integer semantics
impl Not for Expr {
    type Output = Result<Expr>;

    fn not(self) -> Result<Expr> {
        helper::bitwise_not(self)
    }
}

impl Not for &Expr {
    type Output = Result<Expr>;

    fn not(self) -> Result<Expr> {
        helper::bitwise_not(self.clone())
    }
}

impl Neg for Expr {
    type Output = Result<Expr>;

    fn neg(self) -> Result<Expr> {
        helper::neg(self)
    }
}

impl Neg for &Expr {
    type Output = Result<Expr>;

    fn neg(self) -> Result<Expr> {
        helper::neg(self.clone())
    }
}

// Comparisons cannot go through PartialOrd/PartialEq because they build nodes
impl Expr {
    pub fn equal(&self, rhs: impl Into<Expr>) -> Result<Expr> {
        helper::equal(self.clone(), rhs)
    }

    pub fn not_equal(&self, rhs: impl Into<Expr>) -> Result<Expr> {
        helper::not_equal(self.clone(), rhs)
    }

    pub fn lt(&self, rhs: impl Into<Expr>) -> Result<Expr> {
        helper::less(self.clone(), rhs)
    }

    pub fn le(&self, rhs: impl Into<Expr>) -> Result<Expr> {
        helper::less_equal(self.clone(), rhs)
    }

    pub fn gt(&self, rhs: impl Into<Expr>) -> Result<Expr> {
        helper::greater(self.clone(), rhs)
    }

    pub fn ge(&self, rhs: impl Into<Expr>) -> Result<Expr> {
        helper::greater_equal(self.clone(), rhs)
    }

    /// Converts to another dtype, see [`helper::cast`]
    pub fn astype(&self, dtype: impl AsDType) -> Result<Expr> {
        helper::cast(self.clone(), dtype)
    }
}

// Into<Expr> implementations

impl From<&Expr> for Expr {
    fn from(value: &Expr) -> Self {
        value.clone()
    }
}

impl From<ScalarValue> for Expr {
    fn from(value: ScalarValue) -> Self {
        helper::constant(value)
    }
}

macro_rules! impl_from_native {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    helper::constant(value)
                }
            }
        )*
    };
}

impl_from_native!(bool, u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

// Reverse operations: numeric op Expr
macro_rules! impl_reverse_ops {
    (@op $ty:ty, $trait:ident, $method:ident, $builder:path) => {
        impl $trait<Expr> for $ty {
            type Output = Result<Expr>;
            fn $method(self, rhs: Expr) -> Result<Expr> {
                $builder(Expr::from(self), rhs)
            }
        }

        impl $trait<&Expr> for $ty {
            type Output = Result<Expr>;
            fn $method(self, rhs: &Expr) -> Result<Expr> {
                $builder(Expr::from(self), rhs.clone())
            }
        }
    };
    ($ty:ty) => {
        impl_reverse_ops!(@op $ty, Add, add, helper::add);
        impl_reverse_ops!(@op $ty, Sub, sub, helper::sub);
        impl_reverse_ops!(@op $ty, Mul, mul, helper::mul);
        impl_reverse_ops!(@op $ty, Div, div, helper::div);
        impl_reverse_ops!(@op $ty, Rem, rem, helper::floormod);
        impl_reverse_ops!(@op $ty, BitAnd, bitand, helper::bitwise_and);
        impl_reverse_ops!(@op $ty, BitOr, bitor, helper::bitwise_or);
        impl_reverse_ops!(@op $ty, BitXor, bitxor, helper::bitwise_xor);
        impl_reverse_ops!(@op $ty, Shl, shl, helper::shift_left);
        impl_reverse_ops!(@op $ty, Shr, shr, helper::shift_right);
    };
}

// Only the default literal types, so unsuffixed literals resolve unambiguously
impl_reverse_ops!(i32);
impl_reverse_ops!(f64);
