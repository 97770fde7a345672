/// Transpose a matrix: dst = src^T
///
/// Converts row-major (rows × cols) to row-major (cols × rows). Callers
/// holding an ordinary row-major B use this to build the B^T layout the
/// multiplication kernel requires.
///
/// # Arguments
///
/// * `src` - Source matrix (rows × cols), row-major
/// * `dst` - Destination matrix (cols × rows), row-major
/// * `rows` - Number of rows in src
/// * `cols` - Number of columns in src
///
/// # Example
///
/// ```
/// use tilemul::transpose;
///
/// let b = vec![1.0, 0.0,   // 3×2 matrix
///              0.0, 1.0,
///              1.0, 1.0];
/// let mut bt = vec![0.0; 6]; // will be 2×3
///
/// transpose(&b, &mut bt, 3, 2);
///
/// assert_eq!(bt, vec![1.0, 0.0, 1.0,
///                     0.0, 1.0, 1.0]);
/// ```
pub fn transpose(src: &[f64], dst: &mut [f64], rows: usize, cols: usize) {
    for i in 0..rows {
        for j in 0..cols {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}
