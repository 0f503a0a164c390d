//! # **Operators Module** - *Kernel operation selectors*
//!
//! Enumerations that select which operation a kernel family performs.
//! Each kernel family matches on these once per call, outside the hot loop.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Binary arithmetic operations.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    /// Truncating division. Division by zero is always an error.
    Divide,
    /// Integer exponent must be non-negative.
    Power,
    ShiftLeft,
    ShiftRight,
    /// `atan2(y, x)`, float only.
    Atan2,
    /// `log_b(x)`, float only.
    Logb,
}

impl ArithmeticOperator {
    /// Operations that only accept floating point operands.
    #[inline]
    pub fn is_float_only(self) -> bool {
        matches!(self, ArithmeticOperator::Atan2 | ArithmeticOperator::Logb)
    }
}

/// Unary arithmetic and math functions.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum UnaryOperator {
    Abs,
    Negate,
    Sign,
    Sqrt,
    Ln,
    Log2,
    Log10,
    Log1p,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

impl UnaryOperator {
    /// Transcendental functions, which promote integer input to `f64`.
    #[inline]
    pub fn is_transcendental(self) -> bool {
        !matches!(
            self,
            UnaryOperator::Abs | UnaryOperator::Negate | UnaryOperator::Sign
        )
    }

    /// Function name used in error messages.
    pub fn name(self) -> &'static str {
        use UnaryOperator::*;
        match self {
            Abs => "abs",
            Negate => "negate",
            Sign => "sign",
            Sqrt => "sqrt",
            Ln => "ln",
            Log2 => "log2",
            Log10 => "log10",
            Log1p => "log1p",
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Asin => "asin",
            Acos => "acos",
            Atan => "atan",
        }
    }
}

/// Element-wise comparison operations.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

impl ComparisonOperator {
    /// `lhs op rhs` is equivalent to `rhs op.swapped() lhs`.
    #[inline]
    pub fn swapped(self) -> Self {
        use ComparisonOperator::*;
        match self {
            Equals => Equals,
            NotEquals => NotEquals,
            GreaterThan => LessThan,
            GreaterThanOrEqualTo => LessThanOrEqualTo,
            LessThan => GreaterThan,
            LessThanOrEqualTo => GreaterThanOrEqualTo,
        }
    }
}

/// Boolean logical operations.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum LogicalOperator {
    And,
    /// `lhs AND NOT rhs`. Not commutative.
    AndNot,
    Or,
    Xor,
}

/// # RoundMode
///
/// Rounding and tie-breaking policy.
///
/// ## Behaviour
/// - The first four modes always apply.
/// - The `Half*` modes only decide the exact halfway case; any other remainder
///   rounds to the nearest value.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash, PartialOrd, Ord)]
pub enum RoundMode {
    /// Floor.
    RoundDown,
    /// Ceil.
    RoundUp,
    /// Truncate.
    TowardsZero,
    AwayFromZero,
    HalfDown,
    HalfUp,
    HalfTowardsZero,
    HalfAwayFromZero,
    #[default]
    HalfToEven,
    HalfToOdd,
}

impl RoundMode {
    #[inline]
    pub fn is_half(self) -> bool {
        self >= RoundMode::HalfDown
    }
}

impl Display for RoundMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:?}", self)
    }
}

/// How a filter treats null slots of the selection mask.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
pub enum NullSelection {
    /// Null mask slots are dropped, as if false.
    #[default]
    DropNulls,
    /// Null mask slots emit a null output at their relative position.
    EmitNulls,
}

/// How dictionary encoding treats null input slots.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
pub enum NullEncoding {
    /// Nulls stay null in the indices, and are absent from the dictionary.
    #[default]
    Mask,
    /// Nulls get a dictionary entry of their own, and a valid index.
    Encode,
}
