use std::fmt::{Debug, Display};
use std::hash::Hash;

use arrow_buffer::i256;
use num_traits::{Float as NumFloat, Num, NumCast, PrimInt, ToPrimitive};

use crate::impl_usize_conversions;

/// Trait for types valid as float elements in columnar arrays.
///
/// Useful when specifying `my_fn::<T: Float>() {}`.
///
/// Extends and constrains the *num-traits* `Float` implementation to fit the crate's type universe.
pub trait Float: NumFloat + Copy + Default + ToPrimitive + PartialEq + Debug + Send + Sync + 'static {
    /// Arrow type name, used in error messages.
    const TYPE_NAME: &'static str;

    /// Bit pattern used for hashing and exact equality in memo tables.
    fn to_bits_u64(self) -> u64;
}

impl Float for f32 {
    const TYPE_NAME: &'static str = "float32";

    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits() as u64
    }
}

impl Float for f64 {
    const TYPE_NAME: &'static str = "float64";

    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits()
    }
}

/// Trait for types valid as integer elements in columnar arrays.
pub trait Integer:
    PrimInt + TryFrom<usize> + Default + Debug + Display + Hash + ToPrimitive + Send + Sync + 'static
{
    /// Arrow type name, used in error messages.
    const TYPE_NAME: &'static str;

    /// Lossless cast to `usize`
    fn to_usize(self) -> usize;

    /// Lossless cast from `usize`
    fn from_usize(v: usize) -> Self;

    /// Checked cast to `usize`, `None` for negative values or values above `usize::MAX`.
    #[inline]
    fn try_to_usize(self) -> Option<usize> {
        ToPrimitive::to_usize(&self)
    }
}

impl_usize_conversions!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Trait for types valid as numerical.
///
/// Useful when specifying `my_fn::<T: Numeric>() {}`.
///
/// Extends and constrains the *num-traits* `Num` implementation to fit the crate's type universe.
pub trait Numeric: Num + NumCast + Copy + Default + ToPrimitive + PartialEq + PartialOrd + 'static {}
impl Numeric for f32 {}
impl Numeric for f64 {}
impl Numeric for i8 {}
impl Numeric for i16 {}
impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for u8 {}
impl Numeric for u16 {}
impl Numeric for u32 {}
impl Numeric for u64 {}

/// Trait for types valid as fixed-width physical values, i.e. floats, integers,
/// decimals and booleans.
///
/// Useful when specifying `my_fn::<T: Primitive>() {}`, and is the bound the selection
/// and run-end kernels are generic over.
pub trait Primitive: Copy + Default + PartialEq + Debug + Send + Sync + 'static {}
impl Primitive for f32 {}
impl Primitive for f64 {}
impl Primitive for i8 {}
impl Primitive for i16 {}
impl Primitive for i32 {}
impl Primitive for i64 {}
impl Primitive for u8 {}
impl Primitive for u16 {}
impl Primitive for u32 {}
impl Primitive for u64 {}
impl Primitive for i128 {}
impl Primitive for i256 {}
impl Primitive for bool {}

/// Physical storage of a fixed-point decimal: `i128` for decimal128 and
/// `arrow_buffer::i256` for decimal256.
///
/// Exposes only the integer operations the decimal kernels need, with explicit
/// checked and wrapping forms.
pub trait Decimal:
    Copy + Default + Debug + Display + Ord + Hash + Send + Sync + 'static
{
    const ZERO: Self;
    const ONE: Self;
    /// Maximum number of decimal digits the storage can hold.
    const MAX_PRECISION: u8;
    /// Arrow type name, used in error messages.
    const TYPE_NAME: &'static str;

    fn from_i128(v: i128) -> Self;
    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn checked_mul(self, rhs: Self) -> Option<Self>;
    fn checked_div(self, rhs: Self) -> Option<Self>;
    fn checked_rem(self, rhs: Self) -> Option<Self>;
    fn checked_neg(self) -> Option<Self>;
    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn wrapping_neg(self) -> Self;

    #[inline]
    fn is_negative(self) -> bool {
        self < Self::ZERO
    }

    /// `10^exp`, or `None` when it exceeds the storage width.
    fn pow10(exp: u32) -> Option<Self> {
        let ten = Self::from_i128(10);
        let mut acc = Self::ONE;
        for _ in 0..exp {
            acc = acc.checked_mul(ten)?;
        }
        Some(acc)
    }

    /// True when `|self| < 10^precision`.
    fn fits_precision(self, precision: u8) -> bool {
        match Self::pow10(precision as u32) {
            Some(bound) => {
                let neg_bound = bound.wrapping_neg();
                self < bound && self > neg_bound
            }
            None => true,
        }
    }
}

impl Decimal for i128 {
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const MAX_PRECISION: u8 = 38;
    const TYPE_NAME: &'static str = "decimal128";

    #[inline]
    fn from_i128(v: i128) -> Self {
        v
    }
    #[inline]
    fn checked_add(self, rhs: Self) -> Option<Self> {
        i128::checked_add(self, rhs)
    }
    #[inline]
    fn checked_sub(self, rhs: Self) -> Option<Self> {
        i128::checked_sub(self, rhs)
    }
    #[inline]
    fn checked_mul(self, rhs: Self) -> Option<Self> {
        i128::checked_mul(self, rhs)
    }
    #[inline]
    fn checked_div(self, rhs: Self) -> Option<Self> {
        i128::checked_div(self, rhs)
    }
    #[inline]
    fn checked_rem(self, rhs: Self) -> Option<Self> {
        i128::checked_rem(self, rhs)
    }
    #[inline]
    fn checked_neg(self) -> Option<Self> {
        i128::checked_neg(self)
    }
    #[inline]
    fn wrapping_add(self, rhs: Self) -> Self {
        i128::wrapping_add(self, rhs)
    }
    #[inline]
    fn wrapping_sub(self, rhs: Self) -> Self {
        i128::wrapping_sub(self, rhs)
    }
    #[inline]
    fn wrapping_mul(self, rhs: Self) -> Self {
        i128::wrapping_mul(self, rhs)
    }
    #[inline]
    fn wrapping_neg(self) -> Self {
        i128::wrapping_neg(self)
    }
}

impl Decimal for i256 {
    const ZERO: Self = i256::ZERO;
    const ONE: Self = i256::ONE;
    const MAX_PRECISION: u8 = 76;
    const TYPE_NAME: &'static str = "decimal256";

    #[inline]
    fn from_i128(v: i128) -> Self {
        i256::from_i128(v)
    }
    #[inline]
    fn checked_add(self, rhs: Self) -> Option<Self> {
        i256::checked_add(self, rhs)
    }
    #[inline]
    fn checked_sub(self, rhs: Self) -> Option<Self> {
        i256::checked_sub(self, rhs)
    }
    #[inline]
    fn checked_mul(self, rhs: Self) -> Option<Self> {
        i256::checked_mul(self, rhs)
    }
    #[inline]
    fn checked_div(self, rhs: Self) -> Option<Self> {
        i256::checked_div(self, rhs)
    }
    #[inline]
    fn checked_rem(self, rhs: Self) -> Option<Self> {
        i256::checked_rem(self, rhs)
    }
    #[inline]
    fn checked_neg(self) -> Option<Self> {
        i256::checked_neg(self)
    }
    #[inline]
    fn wrapping_add(self, rhs: Self) -> Self {
        i256::wrapping_add(self, rhs)
    }
    #[inline]
    fn wrapping_sub(self, rhs: Self) -> Self {
        i256::wrapping_sub(self, rhs)
    }
    #[inline]
    fn wrapping_mul(self, rhs: Self) -> Self {
        i256::wrapping_mul(self, rhs)
    }
    #[inline]
    fn wrapping_neg(self) -> Self {
        i256::wrapping_neg(self)
    }
}
