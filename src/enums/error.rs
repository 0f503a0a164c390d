//! # Error Module - Custom *Kernel* Error Type
//!
//! Defines the unified error type returned by every fallible kernel.
//!
//! ## Features
//! - Covers checked-arithmetic overflow, division by zero, math domain violations,
//! decimal precision overflow, out of bounds gathers and type mismatches.
//! - Every variant carries enough context (offending value, bounds, type name)
//! to build a readable message without access to the input arrays.
//! - A single failing element aborts the whole kernel call. Callers decide whether
//! to retry per element, substitute nulls or surface the error.

use thiserror::Error;

/// Catch all error type for `minarrow-compute` kernels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// Checked arithmetic produced a value outside the representable range.
    #[error("Overflow: value '{value}' cannot be represented in type '{target}'.")]
    Overflow { value: String, target: &'static str },

    /// Integer or decimal division by zero, or checked float division by zero.
    #[error("Divide by zero.")]
    DivideByZero,

    /// Input outside the mathematical domain of the operation.
    #[error("Domain error: '{op}' is undefined for input '{value}'.")]
    DomainError { op: &'static str, value: String },

    #[error("Logarithm of zero.")]
    LogOfZero,

    #[error("Logarithm of negative number.")]
    LogOfNegative,

    /// Decimal value or rounding position does not fit the target precision.
    #[error("Precision exceeded: value '{value}' does not fit in precision {precision}.")]
    PrecisionExceeded { value: String, precision: u8 },

    /// Gather index outside `[0, len)`.
    #[error("Index out of bounds: index {index} is not within [0, {len}).")]
    IndexOutOfBounds { index: String, len: usize },

    /// Operand types cannot be combined by this kernel.
    #[error("Type mismatch: cannot combine '{left}' with '{right}': {message}")]
    TypeMismatch {
        left: String,
        right: String,
        message: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Length mismatch in {context}: left {left}, right {right}.")]
    LengthMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
}

impl KernelError {
    /// Shorthand for an `Overflow` built from any displayable value.
    #[inline]
    pub fn overflow(value: impl ToString, target: &'static str) -> Self {
        KernelError::Overflow {
            value: value.to_string(),
            target,
        }
    }

    #[inline]
    pub fn domain(op: &'static str, value: impl ToString) -> Self {
        KernelError::DomainError {
            op,
            value: value.to_string(),
        }
    }

    #[inline]
    pub fn invalid(message: impl Into<String>) -> Self {
        KernelError::InvalidArgument(message.into())
    }

    #[inline]
    pub fn unsupported(message: impl Into<String>) -> Self {
        KernelError::UnsupportedType(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let e = KernelError::overflow(300, "i8");
        assert_eq!(
            e.to_string(),
            "Overflow: value '300' cannot be represented in type 'i8'."
        );
        let e = KernelError::IndexOutOfBounds {
            index: "7".into(),
            len: 4,
        };
        assert_eq!(
            e.to_string(),
            "Index out of bounds: index 7 is not within [0, 4)."
        );
        let e = KernelError::domain("sqrt", -1.0);
        assert!(e.to_string().contains("sqrt"));
    }
}
