//! # **TextArray Module** - *Variable and Fixed Width Byte Array Dispatch*
//!
//! TextArray unifies UTF-8 strings, raw binary and fixed-size binary arrays into a
//! single enum. String and binary variants share `StringArray<O>` as storage and
//! differ only in their logical type.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::enums::arrow_type::ArrowType;
use crate::{Bitmask, FixedSizeBinaryArray, MaskedArray, StringArray};

/// # TextArray
///
/// ## Variants
/// - `String32` / `String64`: UTF-8, `u32` or `u64` offsets.
/// - `Binary32` / `Binary64`: opaque bytes, `u32` or `u64` offsets.
/// - `FixedSizeBinary`: fixed-width opaque bytes.
#[derive(PartialEq, Clone, Debug, Default)]
pub enum TextArray {
    String32(Arc<StringArray<u32>>),
    String64(Arc<StringArray<u64>>),
    Binary32(Arc<StringArray<u32>>),
    Binary64(Arc<StringArray<u64>>),
    FixedSizeBinary(Arc<FixedSizeBinaryArray>),
    #[default]
    Null, // Default Marker for mem::take
}

impl TextArray {
    /// Returns the logical length of the text array.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            TextArray::String32(arr) | TextArray::Binary32(arr) => arr.len(),
            TextArray::String64(arr) | TextArray::Binary64(arr) => arr.len(),
            TextArray::FixedSizeBinary(arr) => arr.len(),
            TextArray::Null => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the underlying null mask, if any.
    #[inline]
    pub fn null_mask(&self) -> Option<&Bitmask> {
        match self {
            TextArray::String32(arr) | TextArray::Binary32(arr) => arr.null_mask.as_ref(),
            TextArray::String64(arr) | TextArray::Binary64(arr) => arr.null_mask.as_ref(),
            TextArray::FixedSizeBinary(arr) => arr.null_mask.as_ref(),
            TextArray::Null => None,
        }
    }

    pub fn arrow_type(&self) -> ArrowType {
        match self {
            TextArray::String32(_) => ArrowType::String,
            TextArray::String64(_) => ArrowType::LargeString,
            TextArray::Binary32(_) => ArrowType::Binary,
            TextArray::Binary64(_) => ArrowType::LargeBinary,
            TextArray::FixedSizeBinary(arr) => ArrowType::FixedSizeBinary(arr.width),
            TextArray::Null => ArrowType::Null,
        }
    }

    /// Raw bytes of element `i`, ignoring validity.
    #[inline]
    pub fn value_bytes(&self, i: usize) -> &[u8] {
        match self {
            TextArray::String32(arr) | TextArray::Binary32(arr) => arr.value(i),
            TextArray::String64(arr) | TextArray::Binary64(arr) => arr.value(i),
            TextArray::FixedSizeBinary(arr) => arr.value(i),
            TextArray::Null => &[],
        }
    }
}

impl Display for TextArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TextArray::String32(arr) | TextArray::Binary32(arr) => write!(f, "{arr}"),
            TextArray::String64(arr) | TextArray::Binary64(arr) => write!(f, "{arr}"),
            TextArray::FixedSizeBinary(arr) => {
                write!(f, "FixedSizeBinaryArray[width={}, len={}]", arr.width, arr.len())
            }
            TextArray::Null => write!(f, "NullArray"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_binary_share_storage() {
        let s = Arc::new(StringArray::<u32>::from_slice(&["a", "bc"]));
        let as_str = TextArray::String32(s.clone());
        let as_bin = TextArray::Binary32(s);
        assert_eq!(as_str.arrow_type(), ArrowType::String);
        assert_eq!(as_bin.arrow_type(), ArrowType::Binary);
        assert_eq!(as_bin.value_bytes(1), b"bc");
        assert_eq!(as_str.len(), 2);
    }
}
