/// Naive triple-loop reference: C = A * B^T.
///
/// One plain dot product per output cell, no blocking, no SIMD. Slow but
/// obviously correct - this is the baseline the tiled and parallel paths are
/// compared against.
///
/// # Arguments
///
/// * `a` - Matrix A (m × n), row-major
/// * `bt` - Transposed right operand B^T (k × n), row-major
/// * `c` - Output C (m × k), row-major, overwritten
/// * `m` - Rows of A and C
/// * `n` - Columns of A and B^T (shared dimension)
/// * `k` - Rows of B^T, columns of C
pub fn matmul_reference(a: &[f64], bt: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) {
    for i in 0..m {
        for j in 0..k {
            let mut sum = 0.0;
            for run in 0..n {
                sum += a[i * n + run] * bt[j * n + run];
            }
            c[i * k + j] = sum;
        }
    }
}
