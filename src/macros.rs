//! # **Macros Module** - *Crate-wide helper macros*
//!
//! Trait implementation helpers, plus short-hand array constructors used across
//! the tests and doc examples.

/// Implements `Integer` for each listed primitive, with lossless `usize` conversions.
#[macro_export]
macro_rules! impl_usize_conversions {
    ($($t:ty),*) => {
        $(
            impl $crate::traits::type_unions::Integer for $t {
                const TYPE_NAME: &'static str = stringify!($t);

                #[inline(always)]
                fn to_usize(self) -> usize {
                    self as usize
                }

                #[inline(always)]
                fn from_usize(v: usize) -> Self {
                    v as $t
                }
            }
        )*
    };
}

/// Builds an `Array` of `Int32` values. `None` entries become nulls.
///
/// ```rust
/// use minarrow_compute::arr_i32;
/// let a = arr_i32![1, 2, 3];
/// assert_eq!(a.len(), 3);
/// ```
#[macro_export]
macro_rules! arr_i32 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_int32($crate::IntegerArray::<i32>::from_slice(&[$($x),*]))
    };
}

#[macro_export]
macro_rules! arr_i64 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_int64($crate::IntegerArray::<i64>::from_slice(&[$($x),*]))
    };
}

#[macro_export]
macro_rules! arr_u32 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_uint32($crate::IntegerArray::<u32>::from_slice(&[$($x),*]))
    };
}

#[macro_export]
macro_rules! arr_f64 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_float64($crate::FloatArray::<f64>::from_slice(&[$($x),*]))
    };
}

#[macro_export]
macro_rules! arr_bool {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_bool($crate::BooleanArray::from_slice(&[$($x),*]))
    };
}

#[macro_export]
macro_rules! arr_str32 {
    ($($x:expr),* $(,)?) => {
        $crate::Array::from_string32($crate::StringArray::<u32>::from_slice(&[$($x),*]))
    };
}

/// Builds a nullable array from `Option` literals, e.g. `arr_opt!(i32; Some(1), None)`.
#[macro_export]
macro_rules! arr_opt {
    (i32; $($x:expr),* $(,)?) => {
        $crate::Array::from_int32($crate::IntegerArray::<i32>::from_options(&[$($x),*]))
    };
    (i64; $($x:expr),* $(,)?) => {
        $crate::Array::from_int64($crate::IntegerArray::<i64>::from_options(&[$($x),*]))
    };
    (f64; $($x:expr),* $(,)?) => {
        $crate::Array::from_float64($crate::FloatArray::<f64>::from_options(&[$($x),*]))
    };
    (bool; $($x:expr),* $(,)?) => {
        $crate::Array::from_bool($crate::BooleanArray::from_options(&[$($x),*]))
    };
    (str32; $($x:expr),* $(,)?) => {
        $crate::Array::from_string32($crate::StringArray::<u32>::from_options(&[$($x),*]))
    };
}

/// Implements `MaskedArray` and the shared push/value accessors for a fixed-width
/// array struct holding `data: Buffer<T>` and `null_mask: Option<Bitmask>`.
#[macro_export]
macro_rules! impl_masked_array {
    ($name:ident, $bound:path) => {
        impl<T: $bound> $crate::traits::masked_array::MaskedArray for $name<T> {
            type Item<'a>
                = T
            where
                Self: 'a;

            #[inline]
            fn len(&self) -> usize {
                self.data.len()
            }

            #[inline]
            fn get(&self, idx: usize) -> Option<T> {
                if $crate::traits::masked_array::MaskedArray::is_null(self, idx) {
                    None
                } else {
                    Some(self.data[idx])
                }
            }

            #[inline]
            fn null_mask(&self) -> Option<&$crate::Bitmask> {
                self.null_mask.as_ref()
            }

            #[inline]
            fn null_mask_mut(&mut self) -> Option<&mut $crate::Bitmask> {
                self.null_mask.as_mut()
            }

            #[inline]
            fn set_null_mask(&mut self, mask: Option<$crate::Bitmask>) {
                self.null_mask = mask;
            }
        }

        impl<T: $bound> $name<T> {
            /// Physical values, including the placeholder values under null slots.
            #[inline]
            pub fn values(&self) -> &[T] {
                self.data.as_slice()
            }

            /// Appends a valid value.
            #[inline]
            pub fn push(&mut self, value: T) {
                self.data.push(value);
                if let Some(mask) = self.null_mask.as_mut() {
                    mask.push(true);
                }
            }

            /// Appends a null, creating the mask on first use.
            #[inline]
            pub fn push_null(&mut self) {
                let idx = self.data.len();
                self.data.push(T::default());
                match self.null_mask.as_mut() {
                    Some(mask) => mask.push(false),
                    None => {
                        let mut mask = $crate::Bitmask::new_set_all(idx, true);
                        mask.push(false);
                        self.null_mask = Some(mask);
                    }
                }
            }

            /// Appends `Some(v)` as a value and `None` as a null.
            #[inline]
            pub fn push_opt(&mut self, value: Option<T>) {
                match value {
                    Some(v) => self.push(v),
                    None => self.push_null(),
                }
            }
        }
    };
}

/// Constructors for fixed-width arrays whose only fields are `data` and `null_mask`.
#[macro_export]
macro_rules! impl_numeric_array_constructors {
    ($name:ident, $bound:path) => {
        impl<T: $bound> $name<T> {
            /// Constructs an array over existing data and an optional validity mask.
            ///
            /// # Panics
            /// Panics if the mask length differs from the data length.
            #[inline]
            pub fn new(data: impl Into<$crate::Buffer<T>>, null_mask: Option<$crate::Bitmask>) -> Self {
                let data = data.into();
                $crate::utils::validate_null_mask_len(data.len(), &null_mask);
                Self { data, null_mask }
            }

            /// Empty array with reserved capacity, and an empty mask when `nullable`.
            #[inline]
            pub fn with_capacity(cap: usize, nullable: bool) -> Self {
                Self {
                    data: $crate::Buffer::from_vec64($crate::Vec64::with_capacity(cap)),
                    null_mask: if nullable {
                        Some($crate::Bitmask::with_capacity(cap))
                    } else {
                        None
                    },
                }
            }

            /// Dense array copied from a slice.
            #[inline]
            pub fn from_slice(slice: &[T]) -> Self {
                Self {
                    data: $crate::Buffer::from_slice(slice),
                    null_mask: None,
                }
            }

            /// Array copied from optional values, with a mask only when a `None` is present.
            pub fn from_options(values: &[Option<T>]) -> Self {
                let mut out = Self::with_capacity(values.len(), false);
                for v in values {
                    out.push_opt(*v);
                }
                out
            }
        }
    };
}
