//! Strided view descriptors over caller-owned buffers.
//!
//! A view borrows its buffer and copies only the small metadata (shape and
//! strides), so a walk is insulated from later mutation of the caller's
//! descriptor arrays. Construction validates that every reachable linear
//! index stays inside the buffer; after that, walks trust the descriptor and
//! perform no per-element checks.

use crate::access::Access;
use crate::order::Order;
use crate::{Result, WalkError, STACK_RANK};
use smallvec::SmallVec;

pub(crate) type Dims = SmallVec<[usize; STACK_RANK]>;
pub(crate) type Strides = SmallVec<[isize; STACK_RANK]>;

/// An immutable strided view over a borrowed buffer.
///
/// # Example
/// ```rust
/// use ndwalk::{Direct, NdView, Order};
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let view: NdView<Direct<f64>> =
///     NdView::new(&data, &[2, 3], &[3, 1], 0, Order::RowMajor).unwrap();
///
/// assert_eq!(view.get(&[0, 0]), 1.0);
/// assert_eq!(view.get(&[1, 2]), 6.0);
/// ```
pub struct NdView<'a, A: Access> {
    data: &'a A::Buffer,
    shape: Dims,
    strides: Strides,
    offset: usize,
    order: Order,
}

/// A mutable strided view over a borrowed buffer.
///
/// Same descriptor as [`NdView`] but allows writing through the accessor.
pub struct NdViewMut<'a, A: Access> {
    data: &'a mut A::Buffer,
    shape: Dims,
    strides: Strides,
    offset: usize,
    order: Order,
}

fn validate(
    logical_len: usize,
    shape: &[usize],
    strides: &[isize],
    offset: usize,
) -> Result<()> {
    if shape.len() != strides.len() {
        return Err(WalkError::StrideLengthMismatch);
    }
    if shape.contains(&0) {
        // Empty view, nothing addressable.
        return Ok(());
    }

    // Min and max linear index reachable from the offset.
    let mut lo = offset as isize;
    let mut hi = offset as isize;
    for (&d, &s) in shape.iter().zip(strides.iter()) {
        let last = (d - 1) as isize;
        if s >= 0 {
            hi += s * last;
        } else {
            lo += s * last;
        }
    }

    if lo < 0 {
        return Err(WalkError::OutOfBounds {
            index: lo,
            len: logical_len,
        });
    }
    if hi as usize >= logical_len {
        return Err(WalkError::OutOfBounds {
            index: hi,
            len: logical_len,
        });
    }
    Ok(())
}

fn dot_index(offset: usize, strides: &[isize], subs: &[usize]) -> usize {
    let mut idx = offset as isize;
    for (&i, &s) in subs.iter().zip(strides.iter()) {
        idx += i as isize * s;
    }
    idx as usize
}

impl<'a, A: Access> NdView<'a, A> {
    /// Create a view, validating the descriptor against the buffer.
    ///
    /// `strides` are in logical elements and may be negative; `offset` is the
    /// linear index of the first indexed element. Returns an error if
    /// `shape` and `strides` disagree in length or if any index combination
    /// would leave the buffer.
    pub fn new<D: ?Sized + AsRef<A::Buffer>>(
        data: &'a D,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        order: Order,
    ) -> Result<Self> {
        let data = data.as_ref();
        validate(A::logical_len(data), shape, strides, offset)?;
        Ok(Self {
            data,
            shape: Dims::from_slice(shape),
            strides: Strides::from_slice(strides),
            offset,
            order,
        })
    }

    /// Create a view without bounds validation.
    ///
    /// # Safety
    /// The caller must ensure every index combination stays within the
    /// buffer's logical length.
    pub unsafe fn new_unchecked<D: ?Sized + AsRef<A::Buffer>>(
        data: &'a D,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        order: Order,
    ) -> Self {
        let data = data.as_ref();
        Self {
            data,
            shape: Dims::from_slice(shape),
            strides: Strides::from_slice(strides),
            offset,
            order,
        }
    }

    /// Per-axis extents.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Per-axis element steps.
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Linear index of the first indexed element.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Memory order tag.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of logical elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// True if any axis has extent zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    /// Read the element at the given subscripts.
    ///
    /// # Panics
    /// Panics if the subscripts are out of bounds.
    pub fn get(&self, subs: &[usize]) -> A::Elem {
        assert_eq!(subs.len(), self.rank(), "subscript rank mismatch");
        for (&i, &d) in subs.iter().zip(self.shape.iter()) {
            assert!(i < d, "subscript out of bounds");
        }
        A::get(self.data, dot_index(self.offset, &self.strides, subs))
    }

    /// The same elements with every axis reversed: strides negated and the
    /// offset moved to the mirrored starting element.
    pub fn reversed(&self) -> NdView<'a, A> {
        let (strides, offset) = reverse_descriptor(&self.shape, &self.strides, self.offset);
        NdView {
            data: self.data,
            shape: self.shape.clone(),
            strides,
            offset,
            order: self.order,
        }
    }

    #[inline]
    pub(crate) fn data(&self) -> &'a A::Buffer {
        self.data
    }
}

impl<'a, A: Access> NdViewMut<'a, A> {
    /// Create a mutable view, validating the descriptor against the buffer.
    pub fn new<D: ?Sized + AsMut<A::Buffer>>(
        data: &'a mut D,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        order: Order,
    ) -> Result<Self> {
        let data = data.as_mut();
        validate(A::logical_len(data), shape, strides, offset)?;
        Ok(Self {
            data,
            shape: Dims::from_slice(shape),
            strides: Strides::from_slice(strides),
            offset,
            order,
        })
    }

    /// Create a mutable view without bounds validation.
    ///
    /// # Safety
    /// The caller must ensure every index combination stays within the
    /// buffer's logical length.
    pub unsafe fn new_unchecked<D: ?Sized + AsMut<A::Buffer>>(
        data: &'a mut D,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        order: Order,
    ) -> Self {
        let data = data.as_mut();
        Self {
            data,
            shape: Dims::from_slice(shape),
            strides: Strides::from_slice(strides),
            offset,
            order,
        }
    }

    /// Per-axis extents.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Per-axis element steps.
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Linear index of the first indexed element.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Memory order tag.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of logical elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// True if any axis has extent zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    /// Read the element at the given subscripts.
    ///
    /// # Panics
    /// Panics if the subscripts are out of bounds.
    pub fn get(&self, subs: &[usize]) -> A::Elem {
        assert_eq!(subs.len(), self.rank(), "subscript rank mismatch");
        for (&i, &d) in subs.iter().zip(self.shape.iter()) {
            assert!(i < d, "subscript out of bounds");
        }
        A::get(self.data, dot_index(self.offset, &self.strides, subs))
    }

    /// Write the element at the given subscripts.
    ///
    /// # Panics
    /// Panics if the subscripts are out of bounds.
    pub fn set(&mut self, subs: &[usize], value: A::Elem) {
        assert_eq!(subs.len(), self.rank(), "subscript rank mismatch");
        for (&i, &d) in subs.iter().zip(self.shape.iter()) {
            assert!(i < d, "subscript out of bounds");
        }
        let idx = dot_index(self.offset, &self.strides, subs);
        A::set(self.data, idx, value);
    }

    /// Reverse every axis of this view in place (descriptor only).
    ///
    /// The underlying buffer is untouched; subsequent walks traverse the same
    /// elements in mirrored order.
    pub fn reverse_axes(&mut self) {
        let (strides, offset) = reverse_descriptor(&self.shape, &self.strides, self.offset);
        self.strides = strides;
        self.offset = offset;
    }

    /// Immutable re-borrow of this view's descriptor and buffer.
    pub fn as_view(&self) -> NdView<'_, A> {
        NdView {
            data: self.data,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
            order: self.order,
        }
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut A::Buffer {
        self.data
    }
}

/// Negate strides and move the offset to the mirrored starting element.
///
/// Zero-extent axes contribute nothing; the offset of an empty view is kept.
fn reverse_descriptor(shape: &[usize], strides: &[isize], offset: usize) -> (Strides, usize) {
    let mut new_offset = offset as isize;
    if !shape.contains(&0) {
        for (&d, &s) in shape.iter().zip(strides.iter()) {
            new_offset += (d as isize - 1) * s;
        }
    }
    let new_strides = strides.iter().map(|&s| -s).collect();
    (new_strides, new_offset as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Direct, PackedComplex};
    use num_complex::Complex64;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let data = vec![0.0f64; 6];
        let res: Result<NdView<Direct<f64>>> =
            NdView::new(&data, &[2, 3], &[3], 0, Order::RowMajor);
        assert!(matches!(res, Err(WalkError::StrideLengthMismatch)));
    }

    #[test]
    fn test_new_rejects_out_of_bounds() {
        let data = vec![0.0f64; 6];
        let res: Result<NdView<Direct<f64>>> =
            NdView::new(&data, &[2, 3], &[3, 1], 1, Order::RowMajor);
        assert!(matches!(res, Err(WalkError::OutOfBounds { .. })));
    }

    #[test]
    fn test_new_rejects_negative_reach() {
        let data = vec![0.0f64; 6];
        let res: Result<NdView<Direct<f64>>> =
            NdView::new(&data, &[2, 3], &[-3, 1], 0, Order::RowMajor);
        assert!(matches!(res, Err(WalkError::OutOfBounds { index, .. }) if index < 0));
    }

    #[test]
    fn test_zero_extent_skips_bounds_check() {
        // A zero-extent axis makes the view empty regardless of strides.
        let data = vec![0.0f64; 1];
        let view: NdView<Direct<f64>> =
            NdView::new(&data, &[0, 100], &[1000, 1000], 0, Order::RowMajor).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn test_negative_stride_view() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let view: NdView<Direct<f64>> =
            NdView::new(&data, &[4], &[-1], 3, Order::RowMajor).unwrap();
        assert_eq!(view.get(&[0]), 4.0);
        assert_eq!(view.get(&[3]), 1.0);
    }

    #[test]
    fn test_reversed_mirrors_elements() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let view: NdView<Direct<f64>> =
            NdView::new(&data, &[2, 3], &[3, 1], 0, Order::RowMajor).unwrap();
        let rev = view.reversed();
        assert_eq!(rev.strides(), &[-3, -1]);
        assert_eq!(rev.offset(), 5);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(rev.get(&[i, j]), view.get(&[1 - i, 2 - j]));
            }
        }
    }

    #[test]
    fn test_reverse_axes_roundtrip() {
        let mut data = vec![1.0, 2.0, 3.0, 4.0];
        let mut view: NdViewMut<Direct<f64>> =
            NdViewMut::new(&mut data, &[4], &[1], 0, Order::RowMajor).unwrap();
        view.reverse_axes();
        assert_eq!(view.get(&[0]), 4.0);
        view.reverse_axes();
        assert_eq!(view.get(&[0]), 1.0);
        assert_eq!(view.offset(), 0);
    }

    #[test]
    fn test_packed_complex_view() {
        // Four logical complex elements over eight interleaved slots.
        let data = vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0];
        let view: NdView<PackedComplex<f64>> =
            NdView::new(&data, &[2, 2], &[2, 1], 0, Order::RowMajor).unwrap();
        assert_eq!(view.get(&[0, 0]), Complex64::new(1.0, 10.0));
        assert_eq!(view.get(&[1, 1]), Complex64::new(4.0, 40.0));
    }

    #[test]
    fn test_packed_complex_bounds_use_logical_length() {
        // Eight physical slots hold only four logical elements.
        let data = vec![0.0f64; 8];
        let res: Result<NdView<PackedComplex<f64>>> =
            NdView::new(&data, &[8], &[1], 0, Order::RowMajor);
        assert!(matches!(res, Err(WalkError::OutOfBounds { .. })));
    }

    #[test]
    fn test_set_through_mut_view() {
        let mut data = vec![0.0f64; 4];
        let mut view: NdViewMut<Direct<f64>> =
            NdViewMut::new(&mut data, &[2, 2], &[2, 1], 0, Order::RowMajor).unwrap();
        view.set(&[1, 0], 5.0);
        assert_eq!(view.get(&[1, 0]), 5.0);
        assert_eq!(data[2], 5.0);
    }
}
