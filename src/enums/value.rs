//! # **Value Module** - *Kernel operand container*
//!
//! `Value` is either an array window or a scalar. Binary kernels take two of them
//! and dispatch on the operand shape: array⊗array, array⊗scalar or scalar⊗array.
//! Two scalars is rejected with `InvalidArgument`.

use crate::{Array, ArrayV, Scalar};

/// # Value
///
/// ## Example
/// ```rust
/// use minarrow_compute::{arr_i32, Scalar, Value};
///
/// let lhs: Value = arr_i32![1, 2, 3].into();
/// let rhs: Value = Scalar::from(1i32).into();
/// assert!(lhs.is_array());
/// assert!(rhs.is_scalar());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Array(ArrayV),
    Scalar(Scalar),
}

impl Value {
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// Logical length, `None` for scalars.
    #[inline]
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.len()),
            Value::Scalar(_) => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&ArrayV> {
        match self {
            Value::Array(a) => Some(a),
            Value::Scalar(_) => None,
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Array(_) => None,
        }
    }

    pub fn arrow_type(&self) -> crate::enums::arrow_type::ArrowType {
        match self {
            Value::Array(a) => a.array.arrow_type(),
            Value::Scalar(s) => s.arrow_type(),
        }
    }
}

impl From<ArrayV> for Value {
    #[inline]
    fn from(v: ArrayV) -> Self {
        Value::Array(v)
    }
}

impl From<Array> for Value {
    #[inline]
    fn from(a: Array) -> Self {
        Value::Array(ArrayV::from(a))
    }
}

impl From<Scalar> for Value {
    #[inline]
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arr_i32;

    #[test]
    fn test_shapes() {
        let v: Value = arr_i32![1, 2].into();
        assert_eq!(v.len(), Some(2));
        assert!(v.as_scalar().is_none());
        let s: Value = Scalar::from(3i32).into();
        assert_eq!(s.len(), None);
        assert_eq!(s.as_scalar(), Some(&Scalar::Int32(Some(3))));
    }
}
