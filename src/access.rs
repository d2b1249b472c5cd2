//! Element access indirection for strided buffers.
//!
//! Walkers never inspect element types; they read and write exclusively
//! through an [`Access`] implementation. [`Direct`] covers buffers whose
//! logical elements are directly indexable; [`PackedComplex`] covers
//! interleaved complex buffers where one logical element occupies two
//! physical slots.

use bytemuck::Pod;
use num_complex::Complex;
use std::marker::PhantomData;

/// Get/set protocol over a buffer of logical elements.
///
/// `get` and `set` are pure functions of `(buffer, logical index)`; the
/// index has already been validated against [`Access::logical_len`] when the
/// owning view was constructed, so implementations check bounds only in
/// debug builds.
pub trait Access {
    /// Logical element type produced and consumed by callbacks.
    type Elem: Copy;
    /// Physical buffer type the view borrows.
    type Buffer: ?Sized;

    /// Number of logical elements addressable in `buf`.
    fn logical_len(buf: &Self::Buffer) -> usize;

    /// Read the logical element at `idx`.
    fn get(buf: &Self::Buffer, idx: usize) -> Self::Elem;

    /// Write the logical element at `idx`.
    fn set(buf: &mut Self::Buffer, idx: usize, value: Self::Elem);
}

/// Identity accessor for directly indexable buffers.
pub struct Direct<T>(PhantomData<T>);

impl<T: Copy> Access for Direct<T> {
    type Elem = T;
    type Buffer = [T];

    #[inline(always)]
    fn logical_len(buf: &[T]) -> usize {
        buf.len()
    }

    #[inline(always)]
    fn get(buf: &[T], idx: usize) -> T {
        debug_assert!(idx < buf.len());
        unsafe { *buf.get_unchecked(idx) }
    }

    #[inline(always)]
    fn set(buf: &mut [T], idx: usize, value: T) {
        debug_assert!(idx < buf.len());
        unsafe {
            *buf.get_unchecked_mut(idx) = value;
        }
    }
}

/// Accessor for interleaved complex buffers: logical element `i` is the
/// `(re, im)` pair at physical slots `2*i` and `2*i + 1`.
pub struct PackedComplex<T>(PhantomData<T>);

impl<T: Copy> Access for PackedComplex<T> {
    type Elem = Complex<T>;
    type Buffer = [T];

    #[inline(always)]
    fn logical_len(buf: &[T]) -> usize {
        buf.len() / 2
    }

    #[inline(always)]
    fn get(buf: &[T], idx: usize) -> Complex<T> {
        let j = 2 * idx;
        debug_assert!(j + 1 < buf.len());
        unsafe { Complex::new(*buf.get_unchecked(j), *buf.get_unchecked(j + 1)) }
    }

    #[inline(always)]
    fn set(buf: &mut [T], idx: usize, value: Complex<T>) {
        let j = 2 * idx;
        debug_assert!(j + 1 < buf.len());
        unsafe {
            *buf.get_unchecked_mut(j) = value.re;
            *buf.get_unchecked_mut(j + 1) = value.im;
        }
    }
}

/// Reinterpret a complex slice as its interleaved real representation.
///
/// `Complex<T>` is `repr(C)` with `re` then `im`, so the cast is exact and
/// the result has twice the length.
pub fn complex_slice_as_interleaved<T: Pod>(data: &[Complex<T>]) -> &[T] {
    bytemuck::cast_slice(data)
}

/// Mutable variant of [`complex_slice_as_interleaved`].
pub fn complex_slice_as_interleaved_mut<T: Pod>(data: &mut [Complex<T>]) -> &mut [T] {
    bytemuck::cast_slice_mut(data)
}
