//! # **DictionaryArray Module** - *Dictionary encoded array*
//!
//! Integer `indices` into a `dictionary` of distinct values. Validity lives on the
//! indices; a valid index always points at a dictionary entry.

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::Array;

/// # DictionaryArray
///
/// Output of `dictionary_encode` and the dictionary unifier.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{arr_i32, arr_str32, DictionaryArray};
///
/// let dict = DictionaryArray::new(arr_i32![0, 1, 0], arr_str32!["a", "b"]).unwrap();
/// assert_eq!(dict.len(), 3);
/// ```
#[derive(PartialEq, Clone, Debug)]
pub struct DictionaryArray {
    pub indices: Array,
    pub dictionary: Array,
}

impl DictionaryArray {
    /// Builds a dictionary array. `indices` must be an integer array.
    pub fn new(indices: Array, dictionary: Array) -> Result<Self, KernelError> {
        if !indices.arrow_type().is_integer() {
            return Err(KernelError::invalid(format!(
                "dictionary indices must be integers, got {}",
                indices.arrow_type()
            )));
        }
        Ok(Self {
            indices,
            dictionary,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn arrow_type(&self) -> ArrowType {
        ArrowType::Dictionary(
            Box::new(self.indices.arrow_type()),
            Box::new(self.dictionary.arrow_type()),
        )
    }
}
