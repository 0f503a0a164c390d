// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Parallel** - *Caller-side chunk parallelism over rayon*
//!
//! Kernels themselves are single threaded. These helpers split a view into
//! disjoint windows and run an independent kernel call per window on the rayon
//! pool. Windows share the parent buffers, so splitting copies nothing.
//!
//! Results come back in chunk order. If any chunk fails, one of the errors is returned.
//!
//! Memo tables are not shared across chunks: each call owns its own hashing
//! state, so hash kernels run per chunk produce per-chunk dictionaries, which
//! [`unify_chunked`](crate::kernels::hash::unify_chunked) can then merge.

use rayon::prelude::*;

use crate::enums::error::KernelError;
use crate::utils::confirm_equal_len;
use crate::ArrayV;

/// Splits `view` into consecutive windows of at most `chunk_len` slots.
pub fn chunk_views(view: &ArrayV, chunk_len: usize) -> Result<Vec<ArrayV>, KernelError> {
    if chunk_len == 0 {
        return Err(KernelError::invalid("chunk length must be positive"));
    }
    let len = view.len();
    Ok((0..len)
        .step_by(chunk_len)
        .map(|start| view.slice(start, chunk_len.min(len - start)))
        .collect())
}

/// Runs `kernel` over every `chunk_len` window of `view` in parallel.
///
/// ```rust
/// use minarrow_compute::{arr_i32, ArrayV};
/// use minarrow_compute::kernels::parallel::par_map_chunks;
///
/// let view = ArrayV::from(arr_i32![1, 2, 3, 4, 5]);
/// let lens = par_map_chunks(&view, 2, |w| Ok(w.len())).unwrap();
/// assert_eq!(lens, vec![2, 2, 1]);
/// ```
pub fn par_map_chunks<R, F>(view: &ArrayV, chunk_len: usize, kernel: F) -> Result<Vec<R>, KernelError>
where
    R: Send,
    F: Fn(&ArrayV) -> Result<R, KernelError> + Sync,
{
    let chunks = chunk_views(view, chunk_len)?;
    log::debug!(
        "par_map_chunks: {} slots in {} chunks on {} threads",
        view.len(),
        chunks.len(),
        rayon::current_num_threads()
    );
    chunks.par_iter().map(&kernel).collect()
}

/// Runs a binary `kernel` over aligned windows of `lhs` and `rhs` in parallel.
pub fn par_zip_chunks<R, F>(
    lhs: &ArrayV,
    rhs: &ArrayV,
    chunk_len: usize,
    kernel: F,
) -> Result<Vec<R>, KernelError>
where
    R: Send,
    F: Fn(&ArrayV, &ArrayV) -> Result<R, KernelError> + Sync,
{
    confirm_equal_len("par_zip_chunks", lhs.len(), rhs.len())?;
    let left = chunk_views(lhs, chunk_len)?;
    let right = chunk_views(rhs, chunk_len)?;
    left.par_iter()
        .zip(right.par_iter())
        .map(|(l, r)| kernel(l, r))
        .collect()
}

/// Runs `kernel` once per column in parallel, such as one call per table column.
pub fn par_map_columns<R, F>(columns: &[ArrayV], kernel: F) -> Result<Vec<R>, KernelError>
where
    R: Send,
    F: Fn(&ArrayV) -> Result<R, KernelError> + Sync,
{
    columns.par_iter().map(&kernel).collect()
}

/// Number of slots per chunk that spreads `len` over the rayon pool.
#[inline]
pub fn default_chunk_len(len: usize) -> usize {
    len.div_ceil(rayon::current_num_threads().max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::options::FilterOptions;
    use crate::kernels::selection::filter;
    use crate::{arr_bool, arr_i32, Array};

    #[test]
    fn test_chunk_views() {
        let view = ArrayV::from(arr_i32![1, 2, 3, 4, 5]);
        let chunks = chunk_views(&view, 2).unwrap();
        let lens: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![2, 2, 1]);
        assert_eq!(chunks[2].offset, 4);
        assert!(chunk_views(&view, 0).is_err());
        assert!(chunk_views(&view.slice(0, 0), 3).unwrap().is_empty());
    }

    #[test]
    fn test_par_zip_filter() {
        let values = ArrayV::from(arr_i32![1, 2, 3, 4, 5, 6]);
        let mask = ArrayV::from(arr_bool![true, false, true, true, false, true]);
        let out: Vec<Array> = par_zip_chunks(&values, &mask, 4, |v, m| {
            filter(v, m, &FilterOptions::default())
        })
        .unwrap();
        assert_eq!(out, vec![arr_i32![1, 3, 4], arr_i32![6]]);
    }

    #[test]
    fn test_par_errors_surface() {
        let values = ArrayV::from(arr_i32![1, 2, 3]);
        let mask = ArrayV::from(arr_bool![true]);
        assert!(par_zip_chunks(&values, &mask, 2, |v, _| Ok(v.len())).is_err());
        let r: Result<Vec<usize>, _> =
            par_map_chunks(&values, 1, |_| Err(KernelError::invalid("boom")));
        assert!(r.is_err());
    }

    #[test]
    fn test_par_map_columns() {
        let cols = vec![ArrayV::from(arr_i32![1, 2]), ArrayV::from(arr_i32![3])];
        let lens = par_map_columns(&cols, |c| Ok(c.len())).unwrap();
        assert_eq!(lens, vec![2, 1]);
        assert_eq!(default_chunk_len(0), 1);
    }
}
