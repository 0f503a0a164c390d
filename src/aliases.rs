//! # Aliases - *Shorthand types used across the kernels*

use crate::{BitmaskV, StringArray};

/// Logical start position of a window.
pub type Offset = usize;

/// Logical element count of a window.
pub type Length = usize;

/// Validity of a window. `None` means the window holds no nulls and the mask
/// must not be consulted.
pub type Validity<'a> = Option<BitmaskV<'a>>;

/// Raw bytes sharing the string layout. `Array::TextArray(TextArray::Binary32(..))`
/// tags it as binary rather than UTF-8.
pub type BinaryArray<T> = StringArray<T>;
