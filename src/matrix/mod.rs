//! Basic matrix utilities.
//!
//! The naive reference is the correctness baseline the optimized paths are
//! tested against; the transpose produces the B^T layout the kernel expects
//! from a row-major B.

pub mod reference;
pub mod transpose;
