//! Loop-interchanged iteration engine for strided N-dimensional array views.
//!
//! This crate walks multi-dimensional, arbitrarily strided, possibly
//! non-contiguous buffers and applies caller-supplied element operations,
//! independent of memory layout (row-major or column-major, negative strides,
//! arbitrary offsets, rank 0 and up).
//!
//! # Core Types
//!
//! - [`NdView`] / [`NdViewMut`]: borrowed strided descriptors over caller-owned
//!   buffers (shape, strides in elements, offset, [`Order`] tag)
//! - [`Access`] trait with [`Direct`] and [`PackedComplex`] implementations:
//!   element get/set indirection for plain and packed-composite buffers
//!
//! # Primary API
//!
//! ## Element-wise walks
//!
//! - [`unary_into`], [`binary_into`], [`ternary_into`]: element-wise maps
//! - [`unary_apply`], [`binary_apply`]: fully in-place variants
//! - [`msk_unary_into`], [`msk_unary_apply`]: mask-filtered maps
//! - [`fill_into`]: nullary fill through the output setter
//! - [`assign_into`]: converting copy between views
//! - [`for_each`]: visitor walk with natural-order coordinates
//!
//! ## One-dimensional strided kernels
//!
//! - [`map1_into`] and the [`floor1_into`] / [`abs1_into`] conveniences
//! - [`iamax`]: index of the first element with maximum absolute value
//! - [`sort1_inplace`]: in-place Shellsort over a strided vector
//!
//! ## Index utilities
//!
//! - [`sub2ind`] / [`ind2sub`] with an [`IndexMode`] out-of-range policy
//!
//! # Example
//!
//! ```rust
//! use ndwalk::{unary_into, Direct, NdView, NdViewMut, Order};
//!
//! let src = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//! let mut dst = vec![0.0; 8];
//!
//! // A [1, 1, 2, 2] view over the first four elements.
//! let x: NdView<Direct<f64>> =
//!     NdView::new(&src, &[1, 1, 2, 2], &[4, 4, 2, 1], 0, Order::RowMajor).unwrap();
//! let mut y: NdViewMut<Direct<f64>> =
//!     NdViewMut::new(&mut dst, &[1, 1, 2, 2], &[4, 4, 2, 1], 0, Order::RowMajor).unwrap();
//!
//! unary_into(&mut y, &x, |v| v * 10.0).unwrap();
//! assert_eq!(&dst[..4], &[10.0, 20.0, 30.0, 40.0]);
//! ```
//!
//! # Iteration strategy
//!
//! Each walk builds an ephemeral per-call plan: the [`Order`] tag selects the
//! fastest-varying axis (loop interchange), and every participating view gets
//! one precomputed cursor increment per loop level, so the inner loop advances
//! by a constant stride and each enclosing level corrects the cursor exactly
//! once per wrap. There is no per-element multiplication and no cross-call
//! state.

mod access;
mod index;
mod kernel1;
mod order;
mod plan;
mod view;
mod walk;

pub use access::{
    complex_slice_as_interleaved, complex_slice_as_interleaved_mut, Access, Direct, PackedComplex,
};
pub use index::{ind2sub, sub2ind, IndexMode};
pub use kernel1::{
    abs1_into, floor1_into, iamax, map1_into, negative_stride_offset, sort1_inplace, SortDirection,
};
pub use order::Order;
pub use view::{NdView, NdViewMut};
pub use walk::{
    assign_into, binary_apply, binary_into, fill_into, for_each, msk_unary_apply, msk_unary_into,
    ternary_into, unary_apply, unary_into,
};

/// Inline capacity for the O(rank) plan, counter, and coordinate arrays.
///
/// Walks of rank at most this never touch the heap.
pub(crate) const STACK_RANK: usize = 8;

// ============================================================================
// Error types
// ============================================================================

/// Errors surfaced by view construction and shape agreement checks.
///
/// The walkers themselves trust validated descriptors and cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// View ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// View shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Stride array length doesn't match the shape rank.
    #[error("stride and shape length mismatch")]
    StrideLengthMismatch,

    /// The descriptor can reach a linear index outside the buffer.
    #[error("view exceeds buffer bounds: reachable index {index}, buffer length {len}")]
    OutOfBounds { index: isize, len: usize },

    /// A subscript falls outside its axis under [`IndexMode::Throw`].
    #[error("subscript {subscript} out of bounds for axis {axis} with extent {extent}")]
    SubscriptOutOfBounds {
        axis: usize,
        subscript: isize,
        extent: usize,
    },

    /// A linear index falls outside the view length under [`IndexMode::Throw`].
    #[error("linear index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type for strided walk operations.
pub type Result<T> = std::result::Result<T, WalkError>;
