use crate::STACK_RANK;
use smallvec::SmallVec;

/// Memory order tag of a strided view.
///
/// The tag determines which axis varies fastest in memory and therefore the
/// loop-interchange plan: row-major iterates the last axis innermost,
/// column-major the first.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Order {
    /// C-like layout: last axis varies fastest.
    RowMajor,
    /// Fortran-like layout: first axis varies fastest.
    ColMajor,
}

impl Order {
    /// Loop-order permutation for `rank` axes, innermost level first.
    ///
    /// `loop_axes(rank)[k]` is the natural axis index iterated at loop
    /// level `k` (level 0 being the innermost loop).
    pub(crate) fn loop_axes(self, rank: usize) -> SmallVec<[usize; STACK_RANK]> {
        match self {
            Order::RowMajor => (0..rank).rev().collect(),
            Order::ColMajor => (0..rank).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_axes_row_major() {
        let axes = Order::RowMajor.loop_axes(4);
        assert_eq!(axes.as_slice(), &[3, 2, 1, 0]);
    }

    #[test]
    fn test_loop_axes_col_major() {
        let axes = Order::ColMajor.loop_axes(4);
        assert_eq!(axes.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_loop_axes_rank_zero() {
        assert!(Order::RowMajor.loop_axes(0).is_empty());
        assert!(Order::ColMajor.loop_axes(0).is_empty());
    }
}
