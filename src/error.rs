//! Error type for fallible allocations.

use std::fmt;

/// Errors produced by the multiplication entry points.
///
/// Dimension mismatches are a caller precondition checked by `assert!` at the
/// public entry points; the only runtime failure mode is running out of
/// memory for the output buffer or an aligned input copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatmulError {
    /// An allocation could not be satisfied.
    Allocation {
        /// What the allocation was for ("output matrix", "aligned copy").
        what: &'static str,
        /// Requested size in f64 elements.
        elements: usize,
    },
}

impl fmt::Display for MatmulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatmulError::Allocation { what, elements } => {
                write!(f, "failed to allocate {elements} f64 elements for {what}")
            }
        }
    }
}

impl std::error::Error for MatmulError {}
