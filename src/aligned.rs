//! Aligned buffer provider.
//!
//! The parallel path copies its inputs into cache-line-aligned buffers so
//! vector loads are aligned no matter how the caller allocated A and B^T.

use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use crate::error::MatmulError;

/// Alignment of [`AlignedBuf`] allocations, in bytes. One cache line, which
/// also satisfies any current vector-register load requirement.
pub const ALIGNMENT: usize = 64;

/// An owned `f64` buffer allocated at [`ALIGNMENT`] bytes.
///
/// Derefs to `[f64]`; the allocation is released on drop. Empty buffers
/// allocate nothing.
pub struct AlignedBuf {
    ptr: NonNull<f64>,
    len: usize,
}

impl AlignedBuf {
    /// Allocates an uninitialized buffer of `len` elements.
    fn uninit(len: usize) -> Result<Self, MatmulError> {
        if len == 0 {
            return Ok(AlignedBuf {
                ptr: NonNull::dangling(),
                len: 0,
            });
        }
        let layout = Self::layout(len)?;
        let raw = unsafe { alloc::alloc(layout) } as *mut f64;
        let ptr = NonNull::new(raw).ok_or(MatmulError::Allocation {
            what: "aligned copy",
            elements: len,
        })?;
        Ok(AlignedBuf { ptr, len })
    }

    fn layout(len: usize) -> Result<Layout, MatmulError> {
        let bytes = len
            .checked_mul(std::mem::size_of::<f64>())
            .ok_or(MatmulError::Allocation {
                what: "aligned copy",
                elements: len,
            })?;
        Layout::from_size_align(bytes, ALIGNMENT).map_err(|_| MatmulError::Allocation {
            what: "aligned copy",
            elements: len,
        })
    }
}

impl Deref for AlignedBuf {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for AlignedBuf {
    fn deref_mut(&mut self) -> &mut [f64] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for AlignedBuf {
    fn drop(&mut self) {
        if self.len > 0 {
            // Layout construction succeeded at allocation time.
            let layout = Layout::from_size_align(
                self.len * std::mem::size_of::<f64>(),
                ALIGNMENT,
            )
            .unwrap();
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) };
        }
    }
}

/// Returns a cache-line-aligned copy of `src`.
///
/// The copy is bit-identical to the source and owned by the caller.
///
/// ```
/// use tilemul::{aligned_copy, ALIGNMENT};
///
/// let src = vec![1.0, 2.0, 3.0];
/// let copy = aligned_copy(&src).unwrap();
///
/// assert_eq!(&copy[..], &src[..]);
/// assert_eq!(copy.as_ptr() as usize % ALIGNMENT, 0);
/// ```
pub fn aligned_copy(src: &[f64]) -> Result<AlignedBuf, MatmulError> {
    let buf = AlignedBuf::uninit(src.len())?;
    if !src.is_empty() {
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), buf.ptr.as_ptr(), src.len()) };
    }
    Ok(buf)
}
