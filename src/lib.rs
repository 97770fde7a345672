//! Cache-blocked matrix multiplication for the transposed layout: C = A · Bᵗ.
//!
//! The right operand is stored pre-transposed, so every output cell is a
//! contiguous dot product of two rows. On top of that sit two alternative
//! strategies over the same math:
//!
//! - a sequential path that tiles the output through three cache levels
//!   (last-level → L2 → L1) before hitting a SIMD micro-kernel, and
//! - a parallel path that splits the flattened output into disjoint
//!   per-worker ranges, each computed with aligned input copies.
//!
//! ## Usage
//!
//! ```
//! use tilemul::multiply;
//!
//! // A is 2×3; bt holds the columns of the logical 3×2 B as rows.
//! let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let bt = vec![1.0, 0.0, 1.0, 0.0, 1.0, 1.0];
//!
//! let c = multiply(&a, &bt, 2, 3, 2).unwrap();
//! assert_eq!(c, vec![4.0, 5.0, 10.0, 11.0]);
//! ```
//!
//! For large matrices, use the multi-threaded driver:
//!
//! ```
//! use tilemul::multiply_threaded;
//!
//! let a = vec![1.0f64; 64 * 64];
//! let bt = vec![1.0f64; 64 * 64];
//! let mut c = vec![0.0f64; 64 * 64];
//!
//! multiply_threaded(&a, &bt, &mut c, 64, 64, 64, 4).unwrap();
//! assert_eq!(c[0], 64.0);
//! ```
//!
//! Or drive the workers yourself: [`multiply_parallel`] computes one worker's
//! disjoint slice of C and is safe to call from independently managed threads
//! as long as every ordinal in `1..=workers` runs exactly once.
//!
//! ## What's inside
//!
//! - AVX2/FMA dot-product kernel with scalar fallback, picked at runtime
//! - Three-level cache blocking with injectable [`CacheGeometry`]
//! - Flattened-index output partitioning for external thread pools
//! - Cache-line-aligned input copies for the parallel path

pub mod aligned;
pub mod blocked;
pub mod config;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod parallel;
pub mod threaded;

pub use aligned::{ALIGNMENT, AlignedBuf, aligned_copy};
pub use blocked::{multiply_tiled, multiply_with};
pub use config::CacheGeometry;
pub use error::MatmulError;
pub use kernels::VectorSupport;
pub use matrix::reference::matmul_reference;
pub use matrix::transpose::transpose;
pub use parallel::{multiply_parallel, worker_range};
pub use threaded::multiply_threaded;

/// Matrix multiply for the transposed layout: C = A · Bᵗ.
///
/// `a` is m×n row-major; `bt` is k×n row-major, holding the j-th column of
/// the logical right operand as its j-th row (the kernel never transposes
/// internally). Allocates, zeroes, and returns the m×k output. Uses the
/// default [`CacheGeometry`] and the widest vector path the CPU supports;
/// see [`multiply_with`] to tune the blocking.
///
/// Zero-sized dimensions are fine and yield a correspondingly empty result.
///
/// # Errors
///
/// [`MatmulError::Allocation`] if the output buffer cannot be allocated.
///
/// # Panics
///
/// Panics if the slice lengths don't match m, n, k.
pub fn multiply(
    a: &[f64],
    bt: &[f64],
    m: usize,
    n: usize,
    k: usize,
) -> Result<Vec<f64>, MatmulError> {
    blocked::multiply_with(a, bt, m, n, k, CacheGeometry::default())
}
