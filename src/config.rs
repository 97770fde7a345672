//! Cache geometry configuration.
//!
//! Block sizes for the tiling hierarchy are derived from cache capacities at
//! call time, so the same binary adapts to different hardware by passing a
//! different [`CacheGeometry`] instead of recompiling.

/// Per-level cache capacities in bytes, used to size tiling blocks.
///
/// At each level the tiler picks a square block side such that one row panel
/// of A and one row panel of B^T together occupy about half the capacity:
/// `side = capacity / 2 / size_of::<f64>() / n`.
///
/// The defaults mirror a typical desktop part. They don't have to be exact -
/// results are identical for any geometry, only throughput changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheGeometry {
    /// L1 data cache capacity in bytes.
    pub l1: usize,
    /// L2 cache capacity in bytes.
    pub l2: usize,
    /// Last-level (shared) cache capacity in bytes.
    pub last_level: usize,
}

impl CacheGeometry {
    /// Builds a geometry from explicit capacities in bytes.
    pub const fn new(l1: usize, l2: usize, last_level: usize) -> Self {
        CacheGeometry { l1, l2, last_level }
    }
}

impl Default for CacheGeometry {
    fn default() -> Self {
        CacheGeometry {
            l1: 128 * 1024,
            l2: 1024 * 1024,
            last_level: 4 * 1024 * 1024,
        }
    }
}
