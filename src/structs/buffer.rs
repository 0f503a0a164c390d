//! # **Buffer** - *Unified owned/shared data storage*
//!
//! Buffer backs every fixed-width value store in the crate (`IntegerArray`, `FloatArray`,
//! `DecimalArray`, `DatetimeArray`, binary offsets and bytes, bitmask words).
//!
//! # Design
//! `Buffer<T>` abstracts over two storage backends:
//! - **Owned**: [`Vec64<T>`] - an internally aligned, 64-byte, heap-allocated vector, exclusively
//!   owned. Every kernel output is an owned buffer.
//! - **Shared**: a read-only window `[offset, offset + len)` into a reference-counted `Vec64<T>`
//!   held by one or more other buffers. The allocation is released when the last holder drops.
//!
//! ## Behaviour
//! - **Read-only ops** (`&[T]` slicing, iteration) operate directly on the backing memory
//!   regardless of ownership.
//! - **Mutating ops** (push, resize, index-assign, etc.) transparently convert shared buffers into
//!   owned `Vec64<T>` before modifying, so a shared allocation is never written through.
//!
//! ## Typical use
//! ```rust
//! use minarrow_compute::{Buffer, vec64};
//!
//! let mut b = Buffer::from(vec64![1u32, 2, 3]);
//! b.push(4);
//! assert_eq!(b.as_slice(), &[1, 2, 3, 4]);
//!
//! let shared = b.share();
//! let window = shared.window(1, 2);
//! assert_eq!(window.as_slice(), &[2, 3]);
//! assert!(window.is_shared());
//! ```

use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::Vec64;

/// Number of elements shown by `Display` before eliding.
pub(crate) const MAX_PREVIEW: usize = 50;

/// # Buffer
///
/// Data buffer abstraction over an exclusively owned 64-byte aligned `Vec64<T>`,
/// or a shared window into one.
///
/// ### Behaviour:
/// - **Semantically equivalent to `Vec64<T>`** in most contexts.
/// - **Mutation operations** always copy a shared window into an owned `Vec64<T>` on first
///   write.
/// - For **owned buffers**, `Deref` and method forwarding make this behave exactly like `Vec64<T>`.
pub struct Buffer<T> {
    storage: Storage<T>,
}

/// Internal memory ownership tracking store
/// for `Buffer`
enum Storage<T> {
    Owned(Vec64<T>),
    Shared {
        owner: Arc<Vec64<T>>,
        offset: usize, // element index
        len: usize,    // element count
    },
}

impl<T: Clone> Buffer<T> {
    /// Construct an owned buffer from a slice, copying the data into an aligned Vec64.
    #[inline]
    pub fn from_slice(slice: &[T]) -> Self {
        let mut v = Vec64::with_capacity(slice.len());
        v.extend_from_slice(slice);
        Buffer::from_vec64(v)
    }

    /// Converts this buffer into shared storage in place, and returns a second handle
    /// onto the same allocation.
    ///
    /// Owned storage moves into an `Arc` without copying.
    pub fn share(&mut self) -> Self {
        if let Storage::Owned(_) = self.storage {
            let placeholder = Storage::Owned(Vec64::new());
            if let Storage::Owned(v) = std::mem::replace(&mut self.storage, placeholder) {
                let len = v.len();
                self.storage = Storage::Shared {
                    owner: Arc::new(v),
                    offset: 0,
                    len,
                };
            }
        }
        self.clone()
    }

    /// Zero-copy window `[offset, offset + len)` of a shared buffer.
    /// Owned buffers are copied, since their allocation cannot be aliased.
    ///
    /// # Panics
    /// Panics if the window exceeds the buffer.
    pub fn window(&self, offset: usize, len: usize) -> Self {
        assert!(offset + len <= self.len(), "Buffer::window out of bounds");
        match &self.storage {
            Storage::Owned(v) => Buffer::from_slice(&v[offset..offset + len]),
            Storage::Shared {
                owner,
                offset: base,
                ..
            } => Buffer {
                storage: Storage::Shared {
                    owner: Arc::clone(owner),
                    offset: base + offset,
                    len,
                },
            },
        }
    }

    /// Returns a mutable reference to the owned vector, copying out of shared storage first.
    #[inline]
    fn make_owned_mut(&mut self) -> &mut Vec64<T> {
        if let Storage::Shared { owner, offset, len } = &self.storage {
            let v: Vec64<T> = owner[*offset..*offset + *len].iter().cloned().collect();
            self.storage = Storage::Owned(v);
        }
        match &mut self.storage {
            Storage::Owned(v) => v,
            Storage::Shared { .. } => unreachable!("shared storage converted above"),
        }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.make_owned_mut().as_mut_slice()
    }

    #[inline]
    pub fn push(&mut self, v: T) {
        self.make_owned_mut().push(v)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.make_owned_mut().clear()
    }

    #[inline]
    pub fn reserve(&mut self, addl: usize) {
        self.make_owned_mut().reserve(addl)
    }

    #[inline]
    pub fn resize(&mut self, new_len: usize, value: T) {
        self.make_owned_mut().resize(new_len, value)
    }

    #[inline]
    pub fn extend_from_slice(&mut self, s: &[T]) {
        self.make_owned_mut().extend_from_slice(s)
    }

    #[inline]
    pub fn truncate(&mut self, new_len: usize) {
        self.make_owned_mut().truncate(new_len)
    }

    /// Creates an owned copy of the data, even if already owned.
    #[inline]
    pub fn to_owned_copy(&self) -> Self {
        Buffer::from_slice(self.as_slice())
    }
}

impl<T> Buffer<T> {
    /// Construct from an owned Vec64<T>.
    #[inline]
    pub fn from_vec64(v: Vec64<T>) -> Self {
        Self {
            storage: Storage::Owned(v),
        }
    }

    /// Construct a read-only window over a reference-counted allocation.
    ///
    /// # Panics
    /// Panics if the window exceeds the allocation.
    #[inline]
    pub fn from_shared(owner: Arc<Vec64<T>>, offset: usize, len: usize) -> Self {
        assert!(
            offset + len <= owner.len(),
            "Buffer::from_shared window out of bounds"
        );
        Self {
            storage: Storage::Shared { owner, offset, len },
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Owned(v) => v.as_slice(),
            Storage::Shared { owner, offset, len } => &owner[*offset..*offset + *len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Owned(v) => v.len(),
            Storage::Shared { len, .. } => *len,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Owned(v) => v.capacity(),
            Storage::Shared { len, .. } => *len,
        }
    }

    /// Returns true when the buffer is a window into a shared allocation.
    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self.storage, Storage::Shared { .. })
    }
}

impl<T: Clone> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        match &self.storage {
            Storage::Owned(v) => Buffer::from_vec64(v.clone()),
            Storage::Shared { owner, offset, len } => Buffer {
                storage: Storage::Shared {
                    owner: Arc::clone(owner),
                    offset: *offset,
                    len: *len,
                },
            },
        }
    }
}

impl<T: PartialEq> PartialEq for Buffer<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<Vec64<T>> for Buffer<T> {
    #[inline]
    fn eq(&self, other: &Vec64<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T> Default for Buffer<T> {
    #[inline]
    fn default() -> Self {
        Buffer::from_vec64(Vec64::new())
    }
}

impl<T> Deref for Buffer<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Clone> DerefMut for Buffer<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> From<Vec64<T>> for Buffer<T> {
    #[inline]
    fn from(v: Vec64<T>) -> Self {
        Buffer::from_vec64(v)
    }
}

impl<T> From<Vec<T>> for Buffer<T> {
    #[inline]
    fn from(v: Vec<T>) -> Self {
        Buffer::from_vec64(v.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Buffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T> FromIterator<T> for Buffer<T> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Buffer::from_vec64(iter.into_iter().collect())
    }
}

impl<T> AsRef<[T]> for Buffer<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Display> Display for Buffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = self.as_slice();
        write!(f, "[")?;
        for (i, v) in s.iter().take(MAX_PREVIEW).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        if s.len() > MAX_PREVIEW {
            write!(f, ", ... ({} total)", s.len())?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec64;

    #[test]
    fn test_owned_push_and_slice() {
        let mut buf = Buffer::from(vec64![1, 2, 3]);
        buf.push(4);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4]);
        assert!(!buf.is_shared());
    }

    #[test]
    fn test_share_and_window() {
        let mut buf = Buffer::from(vec64![1u8, 2, 3, 4, 5]);
        let other = buf.share();
        assert!(buf.is_shared() && other.is_shared());
        let w = other.window(1, 3);
        assert_eq!(w.as_slice(), &[2, 3, 4]);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_copy_on_write() {
        let arc = Arc::new(vec64![5u8, 6, 7, 8]);
        let mut a = Buffer::from_shared(Arc::clone(&arc), 1, 2);
        a[0] = 99;
        assert!(!a.is_shared());
        assert_eq!(a.as_slice(), &[99, 7]);
        assert_eq!(arc.as_slice(), &[5, 6, 7, 8]);
    }

    #[test]
    fn test_display_preview() {
        let buf = Buffer::from(vec64![1, 2, 3]);
        assert_eq!(format!("{buf}"), "[1, 2, 3]");
    }
}
