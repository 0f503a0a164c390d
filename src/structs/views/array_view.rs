//! # **ArrayView Module** - *Windowed View over an Array*
//!
//! `ArrayV` is a **logical, read-only, zero-copy view** into a contiguous window
//! `[offset .. offset + len)` of any [`Array`] variant. It is the operand and
//! result type of every kernel.
//!
//! ## Behaviour
//! - All indices are **relative** to the view's start; buffer positions are `offset + i`.
//! - Internally retains an `Arc` reference to the parent array's buffers.
//! - Windowing and slicing are O(1) operations.
//! - The null count is computed on first use and cached in an `OnceLock`.
//!   A cached count of `0` means the validity mask is never read.
//!
//! ## Invariants
//! - `offset + len <= array.len()`
//! - `len` reflects the **logical** number of elements in the view.

use std::fmt::{self, Debug, Display, Formatter};
use std::sync::OnceLock;

use crate::aliases::Validity;
use crate::enums::error::KernelError;
use crate::structs::views::typed::{
    BinaryOffset, BinaryV, BooleanV, FixedBinaryV, NativeType, PrimitiveV,
};
use crate::{Array, BitmaskV, TextArray};

/// # ArrayView
///
/// Logical, windowed view over an `Array`.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{arr_opt, ArrayV};
///
/// let arr = arr_opt!(i32; Some(1), None, Some(3), Some(4));
/// let view = ArrayV::new(arr, 1, 3);
/// assert_eq!(view.len(), 3);
/// assert_eq!(view.null_count(), 1);
/// assert_eq!(view.slice(1, 2).null_count(), 0);
/// ```
#[derive(Clone, PartialEq)]
pub struct ArrayV {
    pub array: Array, // contains Arc<inner>
    pub offset: usize,
    len: usize,
    null_count: OnceLock<usize>,
}

impl ArrayV {
    /// Construct a windowed view of `array[offset..offset+len)`.
    #[inline]
    pub fn new(array: Array, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= array.len(),
            "ArrayView: window out of bounds (offset + len = {}, array.len = {})",
            offset + len,
            array.len()
        );
        Self {
            array,
            offset,
            len,
            null_count: OnceLock::new(),
        }
    }

    /// Construct a windowed view, supplying a precomputed null count.
    #[inline]
    pub fn with_null_count(array: Array, offset: usize, len: usize, null_count: usize) -> Self {
        let view = Self::new(array, offset, len);
        let _ = view.null_count.set(null_count);
        view
    }

    /// Return the logical length of the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of nulls in the view, scanning the mask on first use.
    #[inline]
    pub fn null_count(&self) -> usize {
        *self
            .null_count
            .get_or_init(|| self.array.null_count_range(self.offset, self.len))
    }

    /// True when every slot in the view is null.
    #[inline]
    pub fn all_null(&self) -> bool {
        self.len > 0 && self.null_count() == self.len
    }

    /// Derive a sub-window, relative to this view.
    #[inline]
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= self.len,
            "ArrayView::slice: out of bounds (offset + len = {}, view.len = {})",
            offset + len,
            self.len
        );
        Self::new(self.array.clone(), self.offset + offset, len)
    }

    /// Validity window over the view, or `None` when it holds no nulls.
    ///
    /// Kernels must use this rather than the raw mask so that the null-free fast
    /// path never touches the bitmap.
    #[inline]
    pub fn validity(&self) -> Validity<'_> {
        if self.null_count() == 0 {
            return None;
        }
        self.array
            .null_mask()
            .map(|mask| BitmaskV::new(mask, self.offset, self.len))
    }

    /// Returns true if logical index `i` is null.
    #[inline]
    pub fn is_null(&self, i: usize) -> bool {
        match &self.array {
            Array::RunEndArray(r) => r.is_null(self.offset + i),
            _ => self.validity().is_some_and(|v| !v.get(i)),
        }
    }

    /// Typed window over a fixed-width primitive array.
    pub fn primitive<T: NativeType>(&self) -> Result<PrimitiveV<'_, T>, KernelError> {
        let buf = T::buffer(&self.array).ok_or_else(|| {
            KernelError::unsupported(format!(
                "expected {} storage, found {}",
                T::NAME,
                self.array.arrow_type()
            ))
        })?;
        Ok(PrimitiveV {
            values: &buf[self.offset..self.offset + self.len],
            validity: self.validity(),
            null_count: self.null_count(),
        })
    }

    /// Typed window over a boolean array.
    pub fn boolean(&self) -> Result<BooleanV<'_>, KernelError> {
        match &self.array {
            Array::BooleanArray(arr) => Ok(BooleanV {
                values: BitmaskV::new(&arr.data, self.offset, self.len),
                validity: self.validity(),
            }),
            other => Err(KernelError::unsupported(format!(
                "expected boolean, found {}",
                other.arrow_type()
            ))),
        }
    }

    /// Typed window over a string or binary array with `O` offsets.
    pub fn binary<O: BinaryOffset>(&self) -> Result<BinaryV<'_, O>, KernelError> {
        let arr = match &self.array {
            Array::TextArray(t) => O::string_array(t),
            _ => None,
        }
        .ok_or_else(|| {
            KernelError::unsupported(format!(
                "expected variable length binary with {} offsets, found {}",
                O::TYPE_NAME,
                self.array.arrow_type()
            ))
        })?;
        Ok(BinaryV {
            offsets: &arr.offsets[self.offset..=self.offset + self.len],
            data: arr.data.as_slice(),
            validity: self.validity(),
        })
    }

    /// Typed window over a fixed-size binary array.
    pub fn fixed_binary(&self) -> Result<FixedBinaryV<'_>, KernelError> {
        match &self.array {
            Array::TextArray(TextArray::FixedSizeBinary(arr)) => {
                let w = arr.width;
                Ok(FixedBinaryV {
                    data: &arr.data[self.offset * w..(self.offset + self.len) * w],
                    width: w,
                    validity: self.validity(),
                })
            }
            other => Err(KernelError::unsupported(format!(
                "expected fixed size binary, found {}",
                other.arrow_type()
            ))),
        }
    }

    /// Materialises the window as an owned array.
    ///
    /// A full-length window returns a cheap `Arc` clone of the parent.
    pub fn to_array(&self) -> Array {
        if self.offset == 0 && self.len == self.array.len() {
            self.array.clone()
        } else {
            self.array.slice_clone(self.offset, self.len)
        }
    }

    /// Returns the view as a tuple `(array, offset, len)`.
    #[inline]
    pub fn as_tuple(&self) -> (Array, usize, usize) {
        (self.array.clone(), self.offset, self.len)
    }
}

impl From<Array> for ArrayV {
    fn from(array: Array) -> Self {
        let len = array.len();
        ArrayV::new(array, 0, len)
    }
}

impl Debug for ArrayV {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayV")
            .field("array", &self.array)
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("null_count", &self.null_count.get())
            .finish()
    }
}

impl Display for ArrayV {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ArrayView [{} values] (offset: {}, nulls: {})",
            self.len,
            self.offset,
            self.null_count()
        )?;
        write!(f, "{}", self.to_array())
    }
}
