// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Dictionary Unification** - *Merge dictionaries and re-point their indices*
//!
//! A [`DictionaryUnifier`] folds any number of dictionaries of one value type into
//! a single unified dictionary. [`DictionaryUnifier::unify_and_transpose`] also
//! returns the transposition map, so `new_index = map[old_index]`, which
//! [`transpose_indices`] applies to a dictionary array's indices.
//!
//! [`unify_chunked`] does both for a list of dictionary-encoded chunks, leaving
//! every chunk pointing into one shared dictionary.

use std::sync::Arc;

use num_traits::ToPrimitive;

use crate::enums::arrow_type::ArrowType;
use crate::enums::error::KernelError;
use crate::kernels::hash::memo_table::{HashKey, MemoTable};
use crate::structs::views::typed::{BinaryOffset, NativeType, TypedWindow};
use crate::traits::type_unions::Integer;
use crate::{
    Array, ArrayV, Bitmask, Buffer, DictionaryArray, FixedSizeBinaryArray, IntegerArray,
    StringArray, TextArray, Vec64,
};

/// Memo state for one dictionary value layout.
trait UnifyState: Send {
    /// Memoises every entry of `dictionary`, returning the unified id of each.
    fn insert_all(&mut self, dictionary: &ArrayV) -> Result<Vec<i32>, KernelError>;

    fn len(&self) -> usize;

    /// Materialises the unified dictionary and clears the state.
    fn finish(&mut self) -> Array;
}

fn memoise<'a, W: TypedWindow<'a>, K: std::hash::Hash + Eq + Clone>(
    window: &W,
    memo: &mut MemoTable<K>,
    mut insert: impl FnMut(&mut MemoTable<K>, W::Item) -> (usize, bool),
) -> Result<Vec<i32>, KernelError> {
    let mut ids = Vec::with_capacity(window.len());
    for i in 0..window.len() {
        let (id, _) = if window.is_valid(i) {
            insert(memo, window.value(i))
        } else {
            memo.get_or_insert_null()
        };
        let id = i32::try_from(id)
            .map_err(|_| KernelError::invalid("unified dictionary does not fit int32 ids"))?;
        ids.push(id);
    }
    Ok(ids)
}

/// Validity for the unified dictionary: only the null entry, if any, is cleared.
fn null_entry_mask(len: usize, null_id: Option<usize>) -> Option<Bitmask> {
    null_id.map(|id| {
        let mut mask = Bitmask::new_set_all(len, true);
        mask.set(id, false);
        mask
    })
}

struct PrimitiveState<T: HashKey> {
    memo: MemoTable<T::Key>,
    like: Array,
}

impl<T: NativeType + HashKey> UnifyState for PrimitiveState<T> {
    fn insert_all(&mut self, dictionary: &ArrayV) -> Result<Vec<i32>, KernelError> {
        let window = dictionary.primitive::<T>()?;
        memoise(&window, &mut self.memo, |m, v| m.get_or_insert(&v.hash_key()))
    }

    fn len(&self) -> usize {
        self.memo.size()
    }

    fn finish(&mut self) -> Array {
        let mask = null_entry_mask(self.memo.size(), self.memo.null_id());
        // the null entry holds a default placeholder
        let values: Vec64<T> = self
            .memo
            .entries()
            .map(|e| e.map(T::from_key).unwrap_or_default())
            .collect();
        self.memo.reset();
        T::rebuild(&self.like, Buffer::from_vec64(values), mask)
    }
}

struct BinaryState<O> {
    memo: MemoTable<Vec<u8>>,
    like: TextArray,
    _offsets: std::marker::PhantomData<O>,
}

impl<O: BinaryOffset> UnifyState for BinaryState<O> {
    fn insert_all(&mut self, dictionary: &ArrayV) -> Result<Vec<i32>, KernelError> {
        let window = dictionary.binary::<O>()?;
        memoise(&window, &mut self.memo, |m, v| m.get_or_insert(v))
    }

    fn len(&self) -> usize {
        self.memo.size()
    }

    fn finish(&mut self) -> Array {
        let mut out = StringArray::<O>::with_capacity(self.memo.size(), 0);
        for entry in self.memo.entries() {
            match entry {
                Some(bytes) => out.push_bytes(bytes),
                None => out.push_null(),
            }
        }
        self.memo.reset();
        O::rebuild(&self.like, out)
    }
}

struct FixedBinaryState {
    memo: MemoTable<Vec<u8>>,
    width: usize,
}

impl UnifyState for FixedBinaryState {
    fn insert_all(&mut self, dictionary: &ArrayV) -> Result<Vec<i32>, KernelError> {
        let window = dictionary.fixed_binary()?;
        memoise(&window, &mut self.memo, |m, v| m.get_or_insert(v))
    }

    fn len(&self) -> usize {
        self.memo.size()
    }

    fn finish(&mut self) -> Array {
        let mut data = Vec64::with_capacity(self.memo.size() * self.width);
        for entry in self.memo.entries() {
            match entry {
                Some(bytes) => data.extend_from_slice(bytes),
                None => {
                    let filled = data.len();
                    data.resize(filled + self.width, 0)
                }
            }
        }
        let mask = null_entry_mask(self.memo.size(), self.memo.null_id());
        self.memo.reset();
        Array::from_fixed_size_binary(FixedSizeBinaryArray::new(
            Buffer::from_vec64(data),
            mask,
            self.width,
        ))
    }
}

fn primitive_state<T: NativeType + HashKey>(like: &Array) -> Box<dyn UnifyState> {
    Box::new(PrimitiveState::<T> {
        memo: MemoTable::new(),
        like: like.slice_clone(0, 0),
    })
}

fn binary_state<O: BinaryOffset>(like: &TextArray) -> Box<dyn UnifyState> {
    Box::new(BinaryState::<O> {
        memo: MemoTable::new(),
        like: like.clone(),
        _offsets: std::marker::PhantomData,
    })
}

fn state_for(like: &Array) -> Result<Box<dyn UnifyState>, KernelError> {
    use ArrowType::*;
    Ok(match (like.arrow_type(), like) {
        (Int8, _) => primitive_state::<i8>(like),
        (Int16, _) => primitive_state::<i16>(like),
        (Int32 | Date32 | Time32(_), _) => primitive_state::<i32>(like),
        (Int64 | Date64 | Time64(_) | Duration(_) | Timestamp(..), _) => {
            primitive_state::<i64>(like)
        }
        (UInt8, _) => primitive_state::<u8>(like),
        (UInt16, _) => primitive_state::<u16>(like),
        (UInt32, _) => primitive_state::<u32>(like),
        (UInt64, _) => primitive_state::<u64>(like),
        (Float32, _) => primitive_state::<f32>(like),
        (Float64, _) => primitive_state::<f64>(like),
        (Decimal128(..), _) => primitive_state::<i128>(like),
        (Decimal256(..), _) => primitive_state::<arrow_buffer::i256>(like),
        (String | Binary, Array::TextArray(t)) => binary_state::<u32>(t),
        (LargeString | LargeBinary, Array::TextArray(t)) => binary_state::<u64>(t),
        (FixedSizeBinary(width), _) => Box::new(FixedBinaryState {
            memo: MemoTable::new(),
            width,
        }),
        (other, _) => {
            return Err(KernelError::unsupported(format!(
                "dictionary unification is not defined for {other}"
            )));
        }
    })
}

/// Smallest signed index type addressing `len` dictionary entries.
fn smallest_index_type(len: usize) -> ArrowType {
    if len <= i8::MAX as usize {
        ArrowType::Int8
    } else if len <= i16::MAX as usize {
        ArrowType::Int16
    } else if len <= i32::MAX as usize {
        ArrowType::Int32
    } else {
        ArrowType::Int64
    }
}

/// Largest dictionary an index type can address.
fn index_capacity(index_type: &ArrowType) -> Result<usize, KernelError> {
    use ArrowType::*;
    Ok(match index_type {
        Int8 => i8::MAX as usize,
        UInt8 => u8::MAX as usize,
        Int16 => i16::MAX as usize,
        UInt16 => u16::MAX as usize,
        Int32 => i32::MAX as usize,
        UInt32 => u32::MAX as usize,
        Int64 | UInt64 => usize::MAX,
        other => {
            return Err(KernelError::invalid(format!(
                "dictionary index type must be an integer, got {other}"
            )));
        }
    })
}

/// # DictionaryUnifier
///
/// Folds dictionaries of one value type into a single dictionary, in first-seen
/// order. Reading a result resets the unifier, so it can be reused.
///
/// ## Example
/// ```rust
/// use minarrow_compute::{arr_str32, enums::arrow_type::ArrowType};
/// use minarrow_compute::kernels::hash::DictionaryUnifier;
///
/// let mut unifier = DictionaryUnifier::new(&arr_str32!["a", "b"]).unwrap();
/// unifier.unify(&arr_str32!["a", "b"]).unwrap();
/// let map = unifier.unify_and_transpose(&arr_str32!["c", "a"]).unwrap();
/// assert_eq!(map, vec![2, 0]);
///
/// let (index_type, dictionary) = unifier.result().unwrap();
/// assert_eq!(index_type, ArrowType::Int8);
/// assert_eq!(dictionary, arr_str32!["a", "b", "c"]);
/// ```
pub struct DictionaryUnifier {
    value_type: ArrowType,
    state: Box<dyn UnifyState>,
}

impl DictionaryUnifier {
    /// Unifier for dictionaries shaped like `like`, whose type (including decimal
    /// precision, temporal unit and timezone) every unified dictionary must share.
    pub fn new(like: &Array) -> Result<Self, KernelError> {
        Ok(Self {
            value_type: like.arrow_type(),
            state: state_for(like)?,
        })
    }

    #[inline]
    pub fn value_type(&self) -> &ArrowType {
        &self.value_type
    }

    /// Current size of the unified dictionary.
    #[inline]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_type(&self, dictionary: &Array) -> Result<(), KernelError> {
        let t = dictionary.arrow_type();
        if t != self.value_type {
            return Err(KernelError::TypeMismatch {
                left: self.value_type.to_string(),
                right: t.to_string(),
                message: "dictionary type differs from the unifier's".into(),
            });
        }
        Ok(())
    }

    /// Adds the entries of `dictionary`.
    pub fn unify(&mut self, dictionary: &Array) -> Result<(), KernelError> {
        self.unify_and_transpose(dictionary).map(|_| ())
    }

    /// Adds the entries of `dictionary`, returning where each entry now lives.
    pub fn unify_and_transpose(&mut self, dictionary: &Array) -> Result<Vec<i32>, KernelError> {
        self.check_type(dictionary)?;
        let map = self.state.insert_all(&ArrayV::from(dictionary.clone()))?;
        log::trace!(
            "unify: {} entries in, unified size {}",
            map.len(),
            self.state.len()
        );
        Ok(map)
    }

    /// The unified dictionary and the smallest signed index type addressing it.
    pub fn result(&mut self) -> Result<(ArrowType, Array), KernelError> {
        let index_type = smallest_index_type(self.state.len());
        Ok((index_type, self.state.finish()))
    }

    /// The unified dictionary, checked to fit `index_type`.
    pub fn result_with_index_type(&mut self, index_type: &ArrowType) -> Result<Array, KernelError> {
        let cap = index_capacity(index_type)?;
        let len = self.state.len();
        if len > cap {
            return Err(KernelError::invalid(format!(
                "unified dictionary of {len} entries needs a wider index type than {index_type}"
            )));
        }
        Ok(self.state.finish())
    }
}

/// True when `map` sends every index to itself.
#[inline]
pub fn is_trivial_transposition(map: &[i32]) -> bool {
    map.iter().enumerate().all(|(i, &t)| t as usize == i)
}

fn read_indices<I: NativeType + Integer>(indices: &ArrayV) -> Result<Vec<i64>, KernelError> {
    let v = indices.primitive::<I>()?;
    v.values
        .iter()
        .enumerate()
        .map(|(i, x)| {
            if !v.is_valid(i) {
                return Ok(0);
            }
            ToPrimitive::to_i64(x).ok_or_else(|| KernelError::overflow(x, "int64"))
        })
        .collect()
}

fn index_values(indices: &ArrayV) -> Result<Vec<i64>, KernelError> {
    use ArrowType::*;
    match indices.array.arrow_type() {
        Int8 => read_indices::<i8>(indices),
        Int16 => read_indices::<i16>(indices),
        Int32 => read_indices::<i32>(indices),
        Int64 => read_indices::<i64>(indices),
        UInt8 => read_indices::<u8>(indices),
        UInt16 => read_indices::<u16>(indices),
        UInt32 => read_indices::<u32>(indices),
        UInt64 => read_indices::<u64>(indices),
        other => Err(KernelError::invalid(format!(
            "dictionary indices must be integers, got {other}"
        ))),
    }
}

macro_rules! build_indices {
    ($values:expr, $mask:expr, $index_type:expr, $($variant:ident => ($t:ty, $ctor:ident)),* $(,)?) => {
        match $index_type {
            $(
                ArrowType::$variant => {
                    let data: Vec64<$t> = $values.iter().map(|&v| v as $t).collect();
                    Ok(Array::$ctor(IntegerArray::<$t>::new(data, $mask)))
                }
            )*
            other => Err(KernelError::invalid(format!(
                "dictionary index type must be an integer, got {other}"
            ))),
        }
    };
}

fn indices_array(
    values: &[i64],
    mask: Option<Bitmask>,
    index_type: &ArrowType,
) -> Result<Array, KernelError> {
    build_indices!(values, mask, index_type,
        Int8 => (i8, from_int8),
        Int16 => (i16, from_int16),
        Int32 => (i32, from_int32),
        Int64 => (i64, from_int64),
        UInt8 => (u8, from_uint8),
        UInt16 => (u16, from_uint16),
        UInt32 => (u32, from_uint32),
        UInt64 => (u64, from_uint64),
    )
}

/// Re-points the indices of `input` through `map` onto `dictionary`, with
/// indices of `index_type`.
///
/// When `map` is the identity and the index type is unchanged, the existing
/// index buffer is reused as is.
pub fn transpose_indices(
    input: &DictionaryArray,
    map: &[i32],
    index_type: &ArrowType,
    dictionary: Array,
) -> Result<Array, KernelError> {
    let view = ArrayV::from(input.indices.clone());
    let old = index_values(&view)?;
    let validity = view.validity();
    let is_null = |i: usize| validity.is_some_and(|v| !v.get(i));
    if let Some((_, &k)) = old
        .iter()
        .enumerate()
        .find(|&(i, &k)| !is_null(i) && usize::try_from(k).map_or(true, |k| k >= map.len()))
    {
        return Err(KernelError::IndexOutOfBounds {
            index: k.to_string(),
            len: map.len(),
        });
    }
    if input.indices.arrow_type() == *index_type && is_trivial_transposition(map) {
        log::trace!("transpose_indices: trivial map, reusing indices");
        return Ok(Array::from_dictionary(DictionaryArray::new(
            input.indices.clone(),
            dictionary,
        )?));
    }
    let cap = index_capacity(index_type)?;
    let mut out = Vec::with_capacity(old.len());
    for (i, &k) in old.iter().enumerate() {
        if is_null(i) {
            out.push(0);
            continue;
        }
        let mapped = &map[k as usize];
        if *mapped as usize > cap {
            return Err(KernelError::overflow(mapped, "dictionary index"));
        }
        out.push(*mapped as i64);
    }
    let mask = validity.map(|v| v.to_bitmask());
    let indices = indices_array(&out, mask, index_type)?;
    Ok(Array::from_dictionary(DictionaryArray::new(indices, dictionary)?))
}

/// Rewrites dictionary-encoded `chunks` onto one unified dictionary.
///
/// Every output chunk shares the same dictionary allocation and uses the
/// smallest signed index type that addresses it.
pub fn unify_chunked(chunks: &[Array]) -> Result<Vec<Array>, KernelError> {
    let dicts: Vec<&Arc<DictionaryArray>> = chunks
        .iter()
        .map(|c| match c {
            Array::DictionaryArray(d) => Ok(d),
            other => Err(KernelError::invalid(format!(
                "unify_chunked expects dictionary arrays, got {}",
                other.arrow_type()
            ))),
        })
        .collect::<Result<_, _>>()?;
    let Some(first) = dicts.first() else {
        return Ok(Vec::new());
    };

    let mut unifier = DictionaryUnifier::new(&first.dictionary)?;
    let mut maps = Vec::with_capacity(dicts.len());
    for d in &dicts {
        maps.push(unifier.unify_and_transpose(&d.dictionary)?);
    }
    let (index_type, dictionary) = unifier.result()?;
    log::debug!(
        "unify_chunked: {} chunks onto {} entries ({index_type} indices)",
        dicts.len(),
        dictionary.len()
    );
    dicts
        .iter()
        .zip(&maps)
        .map(|(d, map)| transpose_indices(d, map, &index_type, dictionary.clone()))
        .collect()
}
