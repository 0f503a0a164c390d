//! # **Minarrow Compute** - *Null-aware compute kernels over Arrow-layout columns*
//!
//! Kernels over the `minarrow` column model: 64-byte aligned buffers, packed
//! validity bitmasks, and typed arrays unified under the [`Array`] enum. Every kernel
//! takes read-only [`ArrayV`] windows (or [`Scalar`] literals through [`Value`])
//! and returns a freshly allocated [`Array`].
//!
//! ## Kernel families
//! - **Arithmetic**: integer, float, decimal and temporal, checked or wrapping
//!   ([`kernels::arithmetic`]).
//! - **Comparison** and **boolean** logic ([`kernels::comparison`], [`kernels::boolean`]).
//! - **Rounding**: numeric, decimal, to-multiple and calendar-aware temporal
//!   ([`kernels::rounding`]).
//! - **Selection**: `filter` and `take` ([`kernels::selection`]).
//! - **Hashing**: `unique`, `value_counts`, `dictionary_encode` and dictionary
//!   unification ([`kernels::hash`]).
//! - **Run-end encoding** and decoding ([`kernels::run_end`]).
//!
//! ## Backends
//! Hot inner loops route through [`kernels::dispatch::backend`]. The portable
//! backend is always present; the `simd` feature registers a lane-chunked one.
//!
//! ## Features
//! - `datetime_ops` *(default)*: calendar and timezone-local temporal rounding.
//! - `simd` *(default)*: lane-chunked backend.
//! - `fast_hash`: `ahash` for memo tables.
//! - `parallel_proc`: rayon helpers for chunk-parallel evaluation.
//!
//! ## Example
//! ```rust
//! use minarrow_compute::{arr_i32, ArrayV, Value};
//! use minarrow_compute::enums::operators::ArithmeticOperator;
//! use minarrow_compute::kernels::arithmetic::arithmetic;
//! use minarrow_compute::kernels::options::ArithmeticOptions;
//!
//! let l = Value::from(ArrayV::from(arr_i32![1, 2, 3]));
//! let r = Value::from(ArrayV::from(arr_i32![10, 20, 30]));
//! let out = arithmetic(&l, &r, ArithmeticOperator::Add, &ArithmeticOptions::default()).unwrap();
//! assert_eq!(out, arr_i32![11, 22, 33]);
//! ```

pub mod enums {
    pub mod array;
    pub mod arrow_type;
    pub mod error;
    pub mod operators;
    pub mod scalar;
    pub mod time_units;
    pub mod value;
    pub mod collections {
        pub mod numeric_array;
        pub mod temporal_array;
        pub mod text_array;
    }
}

pub mod structs {
    pub mod bit_block;
    pub mod bitmask;
    pub mod buffer;
    #[cfg(feature = "datetime_ops")]
    pub mod tz;

    pub mod variants {
        pub mod boolean;
        pub mod datetime;
        pub mod decimal;
        pub mod dictionary;
        pub mod fixed_binary;
        pub mod float;
        pub mod integer;
        pub mod run_end;
        pub mod string;
    }
    pub mod views {
        pub mod array_view;
        pub mod bitmask_view;
        pub mod typed;
    }
}

pub mod traits {
    pub mod masked_array;
    pub mod type_unions;
}

pub mod kernels {
    pub mod arithmetic;
    pub mod boolean;
    pub mod comparison;
    pub mod dispatch;
    pub mod exec;
    pub mod hash;
    pub mod options;
    #[cfg(feature = "parallel_proc")]
    pub mod parallel;
    pub mod rounding;
    pub mod run_end;
    pub mod selection;
}

pub mod aliases;
pub mod macros;
pub mod utils;

pub use vec64::{Vec64, vec64};

pub use aliases::{BinaryArray, Length, Offset, Validity};
pub use enums::array::Array;
pub use enums::arrow_type::ArrowType;
pub use enums::collections::numeric_array::NumericArray;
pub use enums::collections::temporal_array::TemporalArray;
pub use enums::collections::text_array::TextArray;
pub use enums::error::KernelError;
pub use enums::scalar::Scalar;
pub use enums::time_units::{CalendarUnit, TimeUnit};
pub use enums::value::Value;

pub use structs::bitmask::Bitmask;
pub use structs::buffer::Buffer;
pub use structs::variants::boolean::BooleanArray;
pub use structs::variants::datetime::{DatetimeArray, TemporalKind};
pub use structs::variants::decimal::DecimalArray;
pub use structs::variants::dictionary::DictionaryArray;
pub use structs::variants::fixed_binary::FixedSizeBinaryArray;
pub use structs::variants::float::FloatArray;
pub use structs::variants::integer::IntegerArray;
pub use structs::variants::run_end::RunEndArray;
pub use structs::variants::string::StringArray;
pub use structs::views::array_view::ArrayV;
pub use structs::views::bitmask_view::BitmaskV;

pub use traits::masked_array::MaskedArray;
pub use traits::type_unions::{Decimal, Float, Integer, Numeric, Primitive};
