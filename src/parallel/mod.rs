//! Parallel partitioning of the output space.
//!
//! The flattened m x k output is split into contiguous, disjoint ranges by
//! worker ordinal. Each [`multiply_parallel`] invocation fills exactly its
//! own range, so N invocations with distinct ordinals tile the whole output
//! and are safe to run concurrently without any synchronization. Thread
//! creation is the caller's business; see [`crate::multiply_threaded`] for a
//! ready-made driver.

use std::ops::Range;

use log::trace;

use crate::aligned::aligned_copy;
use crate::error::MatmulError;
use crate::kernels::VectorSupport;
use crate::kernels::micro::dot;

/// The flattened output range owned by `worker` (1-based) out of `workers`.
///
/// Every worker gets `m * k / workers` cells; the last worker also absorbs
/// the remainder. Ranges are consecutive, so across all ordinals they tile
/// `[0, m * k)` exactly with no gap or overlap.
///
/// # Panics
///
/// Panics if `workers == 0` or `worker` is not in `1..=workers`.
pub fn worker_range(m: usize, k: usize, worker: usize, workers: usize) -> Range<usize> {
    assert!(workers >= 1, "workers must be at least 1");
    assert!(
        (1..=workers).contains(&worker),
        "worker ordinal {worker} out of range 1..={workers}"
    );

    let total = m * k;
    let share = total / workers;
    let start = share * (worker - 1);
    let end = if worker == workers { total } else { start + share };
    start..end
}

/// Computes one worker's slice of C = A * B^T.
///
/// `c` is the full m x k output buffer, owned by the caller for the whole
/// multiplication; this call writes only the cells in
/// `worker_range(m, k, worker, workers)` and reads nothing from `c`. Inputs
/// are copied into private cache-line-aligned buffers for the duration of the
/// call, so vector loads are aligned regardless of the caller's allocator.
///
/// Invoking this once per ordinal in `1..=workers` (concurrently or not, with
/// every invocation observing the same `workers`) produces the same values as
/// the sequential [`crate::multiply`].
///
/// # Errors
///
/// [`MatmulError::Allocation`] if an aligned input copy cannot be allocated.
///
/// # Panics
///
/// Panics if slice lengths don't match the dimensions or the ordinal is out
/// of range.
#[allow(clippy::too_many_arguments)]
pub fn multiply_parallel(
    a: &[f64],
    bt: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    k: usize,
    worker: usize,
    workers: usize,
) -> Result<(), MatmulError> {
    assert_eq!(a.len(), m * n, "A: expected {}x{}={} elements", m, n, m * n);
    assert_eq!(bt.len(), k * n, "B^T: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * k, "C: expected {}x{}={} elements", m, k, m * k);

    let range = worker_range(m, k, worker, workers);
    trace!("multiply_parallel worker={worker}/{workers} range={range:?}");
    if range.is_empty() {
        return Ok(());
    }

    let a_local = aligned_copy(a)?;
    let bt_local = aligned_copy(bt)?;
    let support = VectorSupport::detect();

    let start = range.start;
    multiply_window(&a_local, &bt_local, &mut c[range], start, n, k, support);
    Ok(())
}

/// Fills `window`, the flattened output cells `[start, start + window.len())`.
///
/// Shared by [`multiply_parallel`] and the threaded driver, which hands each
/// worker thread a disjoint `split_at_mut` window.
pub(crate) fn multiply_window(
    a: &[f64],
    bt: &[f64],
    window: &mut [f64],
    start: usize,
    n: usize,
    k: usize,
    support: VectorSupport,
) {
    for (i, cell) in window.iter_mut().enumerate() {
        let idx = start + i;
        let row = idx / k;
        let col = idx % k;
        *cell = dot(&a[row * n..row * n + n], &bt[col * n..col * n + n], support);
    }
}
