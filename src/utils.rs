//! # Utilities - *Internal Helper Utilities*
//!
//! A small collection of validation helpers shared by the array constructors
//! and the kernels.

use crate::Bitmask;
use crate::enums::error::KernelError;

#[inline(always)]
pub fn validate_null_mask_len(data_len: usize, null_mask: &Option<Bitmask>) {
    if let Some(mask) = null_mask {
        assert_eq!(
            mask.len(),
            data_len,
            "Validation Error: Null mask length ({}) does not match data length ({})",
            mask.len(),
            data_len
        );
    }
}

/// Errors with `LengthMismatch` unless `left == right`.
#[inline(always)]
pub fn confirm_equal_len(context: &'static str, left: usize, right: usize) -> Result<(), KernelError> {
    if left != right {
        return Err(KernelError::LengthMismatch {
            context,
            left,
            right,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_equal_len() {
        assert!(confirm_equal_len("add", 3, 3).is_ok());
        assert_eq!(
            confirm_equal_len("add", 3, 4),
            Err(KernelError::LengthMismatch {
                context: "add",
                left: 3,
                right: 4
            })
        );
    }

    #[test]
    #[should_panic(expected = "Null mask length")]
    fn test_validate_null_mask_len_panics() {
        validate_null_mask_len(3, &Some(Bitmask::new_set_all(2, true)));
    }
}
