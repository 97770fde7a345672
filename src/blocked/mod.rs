//! Cache-blocked sequential multiplication.
//!
//! Three tiling levels keep working sets resident in successive cache levels:
//! the outer tiler cuts the (m, k) output space into last-level-cache blocks,
//! the L2 and L1 tilers refine each block, and the micro-kernel computes the
//! innermost tiles. Sub-blocks are index ranges into the original buffers,
//! never copies, so the hierarchy allocates nothing beyond the output itself.

use log::trace;

use crate::config::CacheGeometry;
use crate::error::MatmulError;
use crate::kernels::{VectorSupport, micro_kernel};

/// Block side in elements for a cache of `capacity` bytes: one row panel of A
/// and one of B^T together fill about half the cache. Clamped to at least one
/// row so huge `n` still makes progress.
fn block_side(capacity: usize, n: usize) -> usize {
    (capacity / 2 / std::mem::size_of::<f64>() / n.max(1)).max(1)
}

/// Tiled multiplication with explicit geometry and vector capability,
/// writing into a caller-provided buffer.
///
/// `c` must hold `m * k` elements. Every cell is overwritten; prior contents
/// are irrelevant. This is the building block behind [`multiply_with`]; it is
/// public so callers can reuse an output allocation or pin the kernel path.
///
/// # Panics
///
/// Panics if the slice lengths don't match the dimensions.
#[allow(clippy::too_many_arguments)]
pub fn multiply_tiled(
    a: &[f64],
    bt: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    k: usize,
    geometry: CacheGeometry,
    support: VectorSupport,
) {
    assert_eq!(a.len(), m * n, "A: expected {}x{}={} elements", m, n, m * n);
    assert_eq!(bt.len(), k * n, "B^T: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * k, "C: expected {}x{}={} elements", m, k, m * k);

    let outer = block_side(geometry.last_level, n);
    trace!("multiply_tiled m={m} n={n} k={k} outer_block={outer} support={support:?}");

    for row in (0..m).step_by(outer) {
        let rows = outer.min(m - row);
        for col in (0..k).step_by(outer) {
            let cols = outer.min(k - col);
            tile_l2(a, bt, c, n, k, row, col, rows, cols, geometry, support);
        }
    }
}

/// Refines an outer block into L2-sized sub-blocks.
#[allow(clippy::too_many_arguments)]
fn tile_l2(
    a: &[f64],
    bt: &[f64],
    c: &mut [f64],
    n: usize,
    k: usize,
    row0: usize,
    col0: usize,
    rows: usize,
    cols: usize,
    geometry: CacheGeometry,
    support: VectorSupport,
) {
    let side = block_side(geometry.l2, n);

    for row in (0..rows).step_by(side) {
        for col in (0..cols).step_by(side) {
            tile_l1(
                a,
                bt,
                c,
                n,
                k,
                row0 + row,
                col0 + col,
                side.min(rows - row),
                side.min(cols - col),
                geometry,
                support,
            );
        }
    }
}

/// Refines an L2 block into L1-sized tiles and hands each to the micro-kernel.
#[allow(clippy::too_many_arguments)]
fn tile_l1(
    a: &[f64],
    bt: &[f64],
    c: &mut [f64],
    n: usize,
    k: usize,
    row0: usize,
    col0: usize,
    rows: usize,
    cols: usize,
    geometry: CacheGeometry,
    support: VectorSupport,
) {
    let side = block_side(geometry.l1, n);

    for row in (0..rows).step_by(side) {
        for col in (0..cols).step_by(side) {
            micro_kernel(
                a,
                bt,
                c,
                n,
                k,
                row0 + row,
                col0 + col,
                side.min(rows - row),
                side.min(cols - col),
                support,
            );
        }
    }
}

/// Matrix multiply with caller-supplied cache geometry: C = A * B^T.
///
/// Allocates and returns the m x k output. See [`crate::multiply`] for the
/// default-geometry entry point and the layout contract.
///
/// # Errors
///
/// [`MatmulError::Allocation`] if the output buffer cannot be allocated.
///
/// # Panics
///
/// Panics if the slice lengths don't match the dimensions.
pub fn multiply_with(
    a: &[f64],
    bt: &[f64],
    m: usize,
    n: usize,
    k: usize,
    geometry: CacheGeometry,
) -> Result<Vec<f64>, MatmulError> {
    assert_eq!(a.len(), m * n, "A: expected {}x{}={} elements", m, n, m * n);
    assert_eq!(bt.len(), k * n, "B^T: expected {}x{}={} elements", k, n, k * n);

    let mut c = Vec::new();
    c.try_reserve_exact(m * k)
        .map_err(|_| MatmulError::Allocation {
            what: "output matrix",
            elements: m * k,
        })?;
    c.resize(m * k, 0.0);

    multiply_tiled(a, bt, &mut c, m, n, k, geometry, VectorSupport::detect());
    Ok(c)
}
