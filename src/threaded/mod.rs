//! Multi-threaded driver over the parallel partitioner.
//!
//! Spawns scoped worker threads, hands each a disjoint window of C carved out
//! with `split_at_mut`, and runs the partitioner body on it. Worker count
//! adapts to problem size - small products stay on one thread because the
//! spawn cost outweighs the work.

use std::thread;

use log::trace;

use crate::aligned::aligned_copy;
use crate::error::MatmulError;
use crate::kernels::VectorSupport;
use crate::parallel::{multiply_parallel, multiply_window, worker_range};

/// Multi-threaded C = A * B^T into a caller-owned buffer.
///
/// Equivalent in values to running [`multiply_parallel`] once per ordinal;
/// this function does the thread management. The worker ranges are
/// consecutive, so the output splits into per-thread windows and the borrow
/// checker verifies their disjointness.
///
/// # Errors
///
/// [`MatmulError::Allocation`] if any worker fails to allocate its aligned
/// input copies.
///
/// # Panics
///
/// Panics if slice lengths don't match the dimensions, or if a worker thread
/// panics.
#[allow(clippy::too_many_arguments)]
pub fn multiply_threaded(
    a: &[f64],
    bt: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    k: usize,
    num_threads: usize,
) -> Result<(), MatmulError> {
    assert_eq!(a.len(), m * n, "A: expected {}x{}={} elements", m, n, m * n);
    assert_eq!(bt.len(), k * n, "B^T: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * k, "C: expected {}x{}={} elements", m, k, m * k);

    let workers = choose_worker_count(m, n, k, num_threads);
    trace!("multiply_threaded m={m} n={n} k={k} workers={workers}");

    if workers <= 1 {
        return multiply_parallel(a, bt, c, m, n, k, 1, 1);
    }

    let support = VectorSupport::detect();

    let results: Vec<Result<(), MatmulError>> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        let mut rest = &mut c[..];
        let mut consumed = 0;

        for worker in 1..=workers {
            let range = worker_range(m, k, worker, workers);
            let taken = std::mem::take(&mut rest);
            let (window, tail) = taken.split_at_mut(range.end - consumed);
            rest = tail;
            consumed = range.end;

            let start = range.start;
            handles.push(scope.spawn(move || {
                let a_local = aligned_copy(a)?;
                let bt_local = aligned_copy(bt)?;
                multiply_window(&a_local, &bt_local, window, start, n, k, support);
                Ok(())
            }));
        }

        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread panicked"))
            .collect()
    });

    for result in results {
        result?;
    }
    Ok(())
}

/// Scales the worker count down for small problems.
///
/// Below ~100M FLOPs one thread wins outright; below ~300M two threads are
/// enough. Never more workers than output cells.
fn choose_worker_count(m: usize, n: usize, k: usize, max_threads: usize) -> usize {
    let flops = 2.0 * (m * n * k) as f64;

    const SINGLE_THREAD_THRESHOLD: f64 = 100_000_000.0;
    const TWO_THREAD_THRESHOLD: f64 = 300_000_000.0;

    let by_work = if flops < SINGLE_THREAD_THRESHOLD {
        1
    } else if flops < TWO_THREAD_THRESHOLD {
        2
    } else {
        max_threads
    };

    by_work.min(m * k).min(max_threads).max(1)
}
