//! Inner-loop kernels for the dot-product core.
//!
//! Every output element is a contiguous dot product of an A row with a B^T
//! row. The vectorized path processes four lanes at a time, with FMA when the
//! CPU has it; the scalar path is a plain loop. All paths compute the same
//! values up to floating-point summation order.

pub mod micro;

pub use micro::{VectorSupport, micro_kernel};
