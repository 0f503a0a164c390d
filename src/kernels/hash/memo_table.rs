// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Memo Table** - *Value to dense id, in first-seen order*
//!
//! The hash state behind `unique`, `value_counts`, `dictionary_encode` and the
//! dictionary unifier.
//!
//! ## Invariants
//! - Ids are dense, start at 0, and are assigned in first-seen order.
//! - An id is never reassigned until [`MemoTable::reset`].
//! - At most one entry stands for null, and it consumes an id like any value.
//!
//! Hashing uses `ahash` under the `fast_hash` feature and std SipHash otherwise.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use arrow_buffer::i256;

#[cfg(feature = "fast_hash")]
type HashState = ahash::RandomState;
#[cfg(not(feature = "fast_hash"))]
type HashState = std::collections::hash_map::RandomState;

/// # MemoTable
///
/// ## Example
/// ```rust
/// use minarrow_compute::kernels::hash::MemoTable;
///
/// let mut memo: MemoTable<Vec<u8>> = MemoTable::new();
/// assert_eq!(memo.get_or_insert(b"a".as_slice()), (0, false));
/// assert_eq!(memo.get_or_insert_null(), (1, false));
/// assert_eq!(memo.get_or_insert(b"a".as_slice()), (0, true));
/// assert_eq!(memo.size(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct MemoTable<K> {
    ids: HashMap<K, usize, HashState>,
    /// Entry per id; `None` is the null entry.
    entries: Vec<Option<K>>,
    null_id: Option<usize>,
}

impl<K: Hash + Eq + Clone> Default for MemoTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> MemoTable<K> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: HashMap::with_capacity_and_hasher(capacity, HashState::default()),
            entries: Vec::with_capacity(capacity),
            null_id: None,
        }
    }

    /// Id of `key`, inserting it when absent. The flag is true when it was
    /// already present.
    ///
    /// Borrowed forms are accepted, so byte slices only allocate on first sight.
    #[inline]
    pub fn get_or_insert<Q>(&mut self, key: &Q) -> (usize, bool)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
    {
        if let Some(&id) = self.ids.get(key) {
            return (id, true);
        }
        let id = self.entries.len();
        let owned = key.to_owned();
        self.entries.push(Some(owned.clone()));
        self.ids.insert(owned, id);
        (id, false)
    }

    /// Id of the null entry, inserting it when absent.
    #[inline]
    pub fn get_or_insert_null(&mut self) -> (usize, bool) {
        match self.null_id {
            Some(id) => (id, true),
            None => {
                let id = self.entries.len();
                self.entries.push(None);
                self.null_id = Some(id);
                (id, false)
            }
        }
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.ids.get(key).copied()
    }

    #[inline]
    pub fn null_id(&self) -> Option<usize> {
        self.null_id
    }

    /// Number of ids handed out, the null entry included.
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order, `None` for the null entry.
    pub fn entries(&self) -> impl Iterator<Item = Option<&K>> + '_ {
        self.entries.iter().map(Option::as_ref)
    }

    /// Forgets every entry, so ids restart at 0.
    pub fn reset(&mut self) {
        self.ids.clear();
        self.entries.clear();
        self.null_id = None;
    }
}

/// Maps a value onto a hashable key with value equality.
///
/// Floats key on their bit pattern with every NaN folded onto one canonical NaN,
/// so NaN is memoised as a single value while `0.0` and `-0.0` stay distinct.
pub trait HashKey: Copy {
    type Key: Hash + Eq + Clone + Send + 'static;

    fn hash_key(self) -> Self::Key;

    fn from_key(key: &Self::Key) -> Self;
}

macro_rules! impl_hash_key_identity {
    ($($t:ty),*) => {
        $(
            impl HashKey for $t {
                type Key = $t;

                #[inline(always)]
                fn hash_key(self) -> $t {
                    self
                }

                #[inline(always)]
                fn from_key(key: &$t) -> $t {
                    *key
                }
            }
        )*
    };
}

impl_hash_key_identity!(bool, i8, i16, i32, i64, u8, u16, u32, u64, i128, i256);

macro_rules! impl_hash_key_float {
    ($t:ty, $bits:ty) => {
        impl HashKey for $t {
            type Key = $bits;

            #[inline(always)]
            fn hash_key(self) -> $bits {
                if self.is_nan() {
                    <$t>::NAN.to_bits()
                } else {
                    self.to_bits()
                }
            }

            #[inline(always)]
            fn from_key(key: &$bits) -> $t {
                <$t>::from_bits(*key)
            }
        }
    };
}

impl_hash_key_float!(f32, u32);
impl_hash_key_float!(f64, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_ids() {
        let mut memo: MemoTable<i64> = MemoTable::new();
        let ids: Vec<(usize, bool)> = [5i64, 3, 5, 9, 3]
            .iter()
            .map(|v| memo.get_or_insert(v))
            .collect();
        assert_eq!(ids, vec![(0, false), (1, false), (0, true), (2, false), (1, true)]);
        assert_eq!(memo.size(), 3);
        assert_eq!(memo.get(&9), Some(2));
        assert_eq!(memo.get(&4), None);
    }

    #[test]
    fn test_null_entry_takes_an_id() {
        let mut memo: MemoTable<i32> = MemoTable::new();
        memo.get_or_insert(&1);
        assert_eq!(memo.get_or_insert_null(), (1, false));
        assert_eq!(memo.get_or_insert_null(), (1, true));
        assert_eq!(memo.get_or_insert(&2), (2, false));
        let entries: Vec<Option<i32>> = memo.entries().map(|e| e.copied()).collect();
        assert_eq!(entries, vec![Some(1), None, Some(2)]);
    }

    #[test]
    fn test_reset() {
        let mut memo: MemoTable<Vec<u8>> = MemoTable::new();
        memo.get_or_insert(b"x".as_slice());
        memo.get_or_insert_null();
        memo.reset();
        assert!(memo.is_empty());
        assert_eq!(memo.null_id(), None);
        assert_eq!(memo.get_or_insert(b"y".as_slice()), (0, false));
    }

    #[test]
    fn test_float_keys() {
        assert_eq!(f64::NAN.hash_key(), (-f64::NAN).hash_key());
        assert_ne!(0.0f64.hash_key(), (-0.0f64).hash_key());
        assert_eq!(f32::from_key(&1.5f32.hash_key()), 1.5);
    }
}
