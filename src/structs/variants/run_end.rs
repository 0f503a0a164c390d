//! # **RunEndArray Module** - *Run-end encoded array*
//!
//! Stores a column as `(run_end, value)` pairs. Run `k` covers logical positions
//! `[run_ends[k - 1], run_ends[k])`, with `run_ends[-1] = 0`.
//!
//! ## Invariants
//! - `run_ends` is an `Int16`, `Int32` or `Int64` array without nulls.
//! - Run ends are strictly increasing and positive.
//! - The last run end is at least the logical length.
//! - `values` holds exactly one entry per run. Null runs are nulls in `values`.

use crate::enums::arrow_type::ArrowType;
use crate::enums::collections::numeric_array::NumericArray;
use crate::enums::error::KernelError;
use crate::Array;

/// # RunEndArray
///
/// ## Example
/// ```rust
/// use minarrow_compute::{arr_i32, Array, RunEndArray};
///
/// // [7, 7, 7, 9, 9]
/// let ree = RunEndArray::new(arr_i32![3, 5], arr_i32![7, 9], 5).unwrap();
/// assert_eq!(ree.num_runs(), 2);
/// assert_eq!(ree.find_physical_index(3), 1);
/// ```
#[derive(PartialEq, Clone, Debug)]
pub struct RunEndArray {
    pub run_ends: Array,
    pub values: Array,
    pub len: usize,
}

impl RunEndArray {
    /// Builds and validates a run-end encoded array of logical length `len`.
    pub fn new(run_ends: Array, values: Array, len: usize) -> Result<Self, KernelError> {
        let out = Self {
            run_ends,
            values,
            len,
        };
        out.validate()?;
        Ok(out)
    }

    /// Number of runs.
    #[inline]
    pub fn num_runs(&self) -> usize {
        self.run_ends.len()
    }

    /// Run end at physical position `k`.
    #[inline]
    pub fn run_end(&self, k: usize) -> usize {
        match &self.run_ends {
            Array::NumericArray(NumericArray::Int16(a)) => a.data[k] as usize,
            Array::NumericArray(NumericArray::Int32(a)) => a.data[k] as usize,
            Array::NumericArray(NumericArray::Int64(a)) => a.data[k] as usize,
            _ => 0,
        }
    }

    /// Physical run index holding logical position `i`, found by binary search.
    ///
    /// Returns `num_runs()` when `i` lies past the final run end.
    pub fn find_physical_index(&self, i: usize) -> usize {
        let (mut lo, mut hi) = (0usize, self.num_runs());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.run_end(mid) <= i {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    pub fn arrow_type(&self) -> ArrowType {
        ArrowType::RunEndEncoded(
            Box::new(self.run_ends.arrow_type()),
            Box::new(self.values.arrow_type()),
        )
    }

    fn validate(&self) -> Result<(), KernelError> {
        match &self.run_ends {
            Array::NumericArray(
                NumericArray::Int16(_) | NumericArray::Int32(_) | NumericArray::Int64(_),
            ) => {}
            other => {
                return Err(KernelError::invalid(format!(
                    "run ends must be int16, int32 or int64, got {}",
                    other.arrow_type()
                )));
            }
        }
        if self.run_ends.null_count() > 0 {
            return Err(KernelError::invalid("run ends must not contain nulls"));
        }
        if self.run_ends.len() != self.values.len() {
            return Err(KernelError::LengthMismatch {
                context: "run end array",
                left: self.run_ends.len(),
                right: self.values.len(),
            });
        }
        let mut prev = 0usize;
        for k in 0..self.num_runs() {
            let end = match &self.run_ends {
                Array::NumericArray(NumericArray::Int16(a)) => a.data[k] as i64,
                Array::NumericArray(NumericArray::Int32(a)) => a.data[k] as i64,
                Array::NumericArray(NumericArray::Int64(a)) => a.data[k],
                _ => 0,
            };
            if end <= prev as i64 {
                return Err(KernelError::invalid(format!(
                    "run ends must be strictly increasing and positive, found {end} after {prev}"
                )));
            }
            prev = end as usize;
        }
        if prev < self.len {
            return Err(KernelError::invalid(format!(
                "last run end {prev} is shorter than the logical length {}",
                self.len
            )));
        }
        Ok(())
    }
}

impl RunEndArray {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the run covering logical position `idx` is null.
    pub fn is_null(&self, idx: usize) -> bool {
        let k = self.find_physical_index(idx);
        matches!(self.values.null_mask(), Some(mask) if !mask.get(k))
    }

    /// Logical null count: the total length of null runs.
    pub fn null_count(&self) -> usize {
        self.null_count_range(0, self.len)
    }

    /// Logical null count over `[offset, offset + len)`.
    pub fn null_count_range(&self, offset: usize, len: usize) -> usize {
        let Some(mask) = self.values.null_mask() else {
            return 0;
        };
        let stop = offset + len;
        let mut start = offset;
        let mut nulls = 0usize;
        let mut k = self.find_physical_index(offset);
        while start < stop && k < self.num_runs() {
            let end = self.run_end(k).min(stop);
            if !mask.get(k) {
                nulls += end - start;
            }
            start = end;
            k += 1;
        }
        nulls
    }
}
