//! Scalar/vector data types and literal type inference

use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, Result};

/// Base category of a dtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Int,
    UInt,
    Float,
    /// Opaque pointer, used for buffer variables
    Handle,
}

/// A scalar or fixed-lane vector type: `<code><bits>x<lanes>`.
///
/// Booleans are 1-bit unsigned integers. Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DType {
    code: TypeCode,
    bits: u16,
    lanes: u16,
}

impl DType {
    /// Creates a dtype, checking that `bits` is supported for `code` and `lanes >= 1`.
    pub fn new(code: TypeCode, bits: u16, lanes: u16) -> Result<Self> {
        let supported = match code {
            TypeCode::Int => matches!(bits, 8 | 16 | 32 | 64),
            TypeCode::UInt => matches!(bits, 1 | 8 | 16 | 32 | 64),
            TypeCode::Float => matches!(bits, 16 | 32 | 64),
            TypeCode::Handle => bits == 64 && lanes == 1,
        };
        if !supported || lanes == 0 {
            return Err(IrError::InvalidDType(format!(
                "{:?} with {} bits and {} lanes",
                code, bits, lanes
            )));
        }
        Ok(Self { code, bits, lanes })
    }

    // Unchecked constructors for widths known to be valid. Callers outside the
    // crate go through `DType::new` or `FromStr`.
    pub(crate) const fn int(bits: u16, lanes: u16) -> Self {
        Self {
            code: TypeCode::Int,
            bits,
            lanes,
        }
    }

    pub(crate) const fn uint(bits: u16, lanes: u16) -> Self {
        Self {
            code: TypeCode::UInt,
            bits,
            lanes,
        }
    }

    pub(crate) const fn float(bits: u16, lanes: u16) -> Self {
        Self {
            code: TypeCode::Float,
            bits,
            lanes,
        }
    }

    /// `uint1` with the given lane count
    pub(crate) const fn boolean(lanes: u16) -> Self {
        Self::uint(1, lanes)
    }

    pub const fn handle() -> Self {
        Self {
            code: TypeCode::Handle,
            bits: 64,
            lanes: 1,
        }
    }

    pub fn code(&self) -> TypeCode {
        self.code
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn lanes(&self) -> u16 {
        self.lanes
    }

    /// The scalar type of one lane
    pub fn element_of(&self) -> DType {
        self.with_lanes(1)
    }

    /// Same element type with another lane count, validated like [`DType::new`]
    pub fn to_lanes(&self, lanes: u16) -> Result<DType> {
        DType::new(self.code, self.bits, lanes)
    }

    pub(crate) fn with_lanes(&self, lanes: u16) -> DType {
        Self { lanes, ..*self }
    }

    /// Reduces an integer to the range this integral dtype can represent:
    /// booleans become 0/1, narrower ints wrap two's-complement style.
    /// `uint64` keeps the raw bit pattern.
    pub fn wrap_int(&self, value: i64) -> i64 {
        if self.is_bool() {
            return (value != 0) as i64;
        }
        if !self.is_integral() || self.bits >= 64 {
            return value;
        }
        let shift = 64 - u32::from(self.bits);
        match self.code {
            TypeCode::Int => (value << shift) >> shift,
            _ => ((value as u64) << shift >> shift) as i64,
        }
    }

    pub fn is_int(&self) -> bool {
        self.code == TypeCode::Int
    }

    pub fn is_uint(&self) -> bool {
        self.code == TypeCode::UInt
    }

    pub fn is_float(&self) -> bool {
        self.code == TypeCode::Float
    }

    pub fn is_handle(&self) -> bool {
        self.code == TypeCode::Handle
    }

    pub fn is_bool(&self) -> bool {
        self.code == TypeCode::UInt && self.bits == 1
    }

    /// Int or UInt (booleans included)
    pub fn is_integral(&self) -> bool {
        matches!(self.code, TypeCode::Int | TypeCode::UInt)
    }

    pub fn is_scalar(&self) -> bool {
        self.lanes == 1
    }

    pub fn is_vector(&self) -> bool {
        self.lanes > 1
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bool() && self.lanes == 1 {
            return f.write_str("bool");
        }
        let base = match self.code {
            TypeCode::Int => "int",
            TypeCode::UInt => "uint",
            TypeCode::Float => "float",
            TypeCode::Handle => return f.write_str("handle"),
        };
        write!(f, "{}{}", base, self.bits)?;
        if self.lanes > 1 {
            write!(f, "x{}", self.lanes)?;
        }
        Ok(())
    }
}

impl FromStr for DType {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || IrError::InvalidDType(s.to_string());

        let (head, lanes) = match s.split_once('x') {
            Some((head, lanes)) => (head, lanes.parse::<u16>().map_err(|_| invalid())?),
            None => (s, 1),
        };

        let (code, bits) = if head == "bool" {
            (TypeCode::UInt, 1)
        } else if head == "handle" {
            (TypeCode::Handle, 64)
        } else {
            let split = head
                .find(|c: char| c.is_ascii_digit())
                .ok_or_else(invalid)?;
            let code = match &head[..split] {
                "int" => TypeCode::Int,
                "uint" => TypeCode::UInt,
                "float" => TypeCode::Float,
                _ => return Err(invalid()),
            };
            let bits = head[split..].parse::<u16>().map_err(|_| invalid())?;
            (code, bits)
        };

        DType::new(code, bits, lanes).map_err(|_| invalid())
    }
}

/// Anything that can name a dtype: a `DType` or its string form.
pub trait AsDType {
    fn as_dtype(&self) -> Result<DType>;
}

impl AsDType for DType {
    fn as_dtype(&self) -> Result<DType> {
        Ok(*self)
    }
}

impl AsDType for &DType {
    fn as_dtype(&self) -> Result<DType> {
        Ok(**self)
    }
}

impl AsDType for &str {
    fn as_dtype(&self) -> Result<DType> {
        self.parse()
    }
}

impl AsDType for String {
    fn as_dtype(&self) -> Result<DType> {
        self.parse()
    }
}

/// A native literal value together with its host type category
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// Integer literal without a declared width
    UntypedInt(i64),
    /// Float literal without a declared width
    UntypedFloat(f64),
}

macro_rules! impl_scalar_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for ScalarValue {
                fn from(value: $t) -> Self {
                    ScalarValue::$variant(value)
                }
            }
        )*
    };
}

impl_scalar_from!(
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

impl ScalarValue {
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            ScalarValue::F32(_) | ScalarValue::F64(_) | ScalarValue::UntypedFloat(_)
        )
    }

    /// The value as an integer, truncating floats
    pub fn as_i64(&self) -> i64 {
        match *self {
            ScalarValue::Bool(v) => v as i64,
            ScalarValue::U8(v) => v as i64,
            ScalarValue::U16(v) => v as i64,
            ScalarValue::U32(v) => v as i64,
            ScalarValue::U64(v) => v as i64,
            ScalarValue::I8(v) => v as i64,
            ScalarValue::I16(v) => v as i64,
            ScalarValue::I32(v) => v as i64,
            ScalarValue::I64(v) | ScalarValue::UntypedInt(v) => v,
            ScalarValue::F32(v) => v as i64,
            ScalarValue::F64(v) | ScalarValue::UntypedFloat(v) => v as i64,
        }
    }

    /// Nonzero test, without truncating floats first
    pub fn is_truthy(&self) -> bool {
        if self.is_float() {
            self.as_f64() != 0.0
        } else {
            self.as_i64() != 0
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            ScalarValue::F32(v) => v as f64,
            ScalarValue::F64(v) | ScalarValue::UntypedFloat(v) => v,
            _ => self.as_i64() as f64,
        }
    }
}

/// Maps a native literal to its dtype.
///
/// Untyped integers default to `int32` and untyped floats to `float32`.
pub fn infer_literal_dtype(value: &ScalarValue) -> DType {
    match value {
        ScalarValue::Bool(_) => DType::boolean(1),
        ScalarValue::U8(_) => DType::uint(8, 1),
        ScalarValue::U16(_) => DType::uint(16, 1),
        ScalarValue::U32(_) => DType::uint(32, 1),
        ScalarValue::U64(_) => DType::uint(64, 1),
        ScalarValue::I8(_) => DType::int(8, 1),
        ScalarValue::I16(_) => DType::int(16, 1),
        ScalarValue::I32(_) | ScalarValue::UntypedInt(_) => DType::int(32, 1),
        ScalarValue::I64(_) => DType::int(64, 1),
        ScalarValue::F32(_) | ScalarValue::UntypedFloat(_) => DType::float(32, 1),
        ScalarValue::F64(_) => DType::float(64, 1),
    }
}

/// Result dtype of combining two operands in a binary operator.
///
/// Lanes must agree unless one side is scalar, in which case the scalar is
/// broadcast and the vector's element type wins. With equal lanes, identical
/// types pass through and a mixed int/float pair resolves to the float side.
/// Everything else is a `DTypeMismatch`.
pub fn promote(op: &str, a: DType, b: DType) -> Result<DType> {
    let mismatch = || IrError::DTypeMismatch {
        op: op.to_string(),
        lhs: a,
        rhs: b,
    };

    if a.lanes != b.lanes {
        return match (a.is_scalar(), b.is_scalar()) {
            (true, false) => Ok(b),
            (false, true) => Ok(a),
            _ => Err(mismatch()),
        };
    }
    if a == b {
        return Ok(a);
    }
    match (a.is_float(), b.is_float()) {
        (true, false) if b.is_integral() => Ok(a),
        (false, true) if a.is_integral() => Ok(b),
        _ => Err(mismatch()),
    }
}
