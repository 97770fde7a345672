//! The micro-kernel: one cache-resident tile of C, computed cell by cell as
//! contiguous dot products.

/// SIMD lane count for the vectorized paths (f64 elements per AVX register).
pub const LANES: usize = 4;

/// Vector capability of the running CPU, detected once per top-level call and
/// threaded through the tiling hierarchy.
///
/// The three variants select instruction sequences only; results agree up to
/// floating-point summation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorSupport {
    /// No vector hardware assumed; plain scalar loop.
    Scalar,
    /// AVX loads with separate multiply and add.
    Avx,
    /// AVX2 with fused multiply-add.
    AvxFma,
}

impl VectorSupport {
    /// Picks the widest path the CPU supports.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
                return VectorSupport::AvxFma;
            }
            if is_x86_feature_detected!("avx") {
                return VectorSupport::Avx;
            }
        }
        VectorSupport::Scalar
    }
}

/// Dot product of two equal-length rows using the selected path.
#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64], support: VectorSupport) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    match support {
        #[cfg(target_arch = "x86_64")]
        VectorSupport::AvxFma => unsafe { dot_fma(a, b) },
        #[cfg(target_arch = "x86_64")]
        VectorSupport::Avx => unsafe { dot_avx(a, b) },
        _ => dot_scalar(a, b),
    }
}

fn dot_scalar(a: &[f64], b: &[f64]) -> f64 {
    let mut sum = 0.0;
    for run in 0..a.len() {
        sum += a[run] * b[run];
    }
    sum
}

/// # Safety
///
/// Caller must ensure the CPU supports AVX2 and FMA.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn dot_fma(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let n = a.len();
    let main = n - n % LANES;

    let mut acc = _mm256_setzero_pd();
    for run in (0..main).step_by(LANES) {
        acc = _mm256_fmadd_pd(
            _mm256_loadu_pd(a.as_ptr().add(run)),
            _mm256_loadu_pd(b.as_ptr().add(run)),
            acc,
        );
    }

    // Horizontal reduction through a stack scratch array, then the scalar
    // tail for the n % 4 leftover elements.
    let mut prod = [0.0f64; LANES];
    _mm256_storeu_pd(prod.as_mut_ptr(), acc);
    let mut sum = prod[0] + prod[1] + prod[2] + prod[3];
    for run in main..n {
        sum += a[run] * b[run];
    }
    sum
}

/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn dot_avx(a: &[f64], b: &[f64]) -> f64 {
    use std::arch::x86_64::*;

    let n = a.len();
    let main = n - n % LANES;

    let mut acc = _mm256_setzero_pd();
    for run in (0..main).step_by(LANES) {
        let prod = _mm256_mul_pd(
            _mm256_loadu_pd(a.as_ptr().add(run)),
            _mm256_loadu_pd(b.as_ptr().add(run)),
        );
        acc = _mm256_add_pd(acc, prod);
    }

    let mut prod = [0.0f64; LANES];
    _mm256_storeu_pd(prod.as_mut_ptr(), acc);
    let mut sum = prod[0] + prod[1] + prod[2] + prod[3];
    for run in main..n {
        sum += a[run] * b[run];
    }
    sum
}

/// Computes one tile of C: for every (i, j) in the tile, the dot product of
/// A row `row0 + i` with B^T row `col0 + j` over the shared dimension `n`.
///
/// The tile is a view into the full buffers described by offsets and extents;
/// nothing outside the `rows x cols` cells starting at (row0, col0) is
/// touched. Each cell is assigned exactly once; tiles never overlap.
#[allow(clippy::too_many_arguments)]
pub fn micro_kernel(
    a: &[f64],
    bt: &[f64],
    c: &mut [f64],
    n: usize,
    k: usize,
    row0: usize,
    col0: usize,
    rows: usize,
    cols: usize,
    support: VectorSupport,
) {
    for i in 0..rows {
        let row = row0 + i;
        let a_row = &a[row * n..row * n + n];
        for j in 0..cols {
            let col = col0 + j;
            let b_row = &bt[col * n..col * n + n];
            c[row * k + col] = dot(a_row, b_row, support);
        }
    }
}
