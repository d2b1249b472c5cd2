//! Per-call iteration plans: loop order and cursor increments.
//!
//! A plan lives only for the duration of one walk. Level 0 is the innermost
//! loop. The increment scheme is the classic nested-loop linearization: the
//! innermost level advances a cursor by the fastest axis's stride, and every
//! enclosing level applies a single precomputed correction when the level
//! below wraps, so no walk performs per-element multiplication.

use crate::order::Order;
use crate::view::{Dims, Strides};
use smallvec::SmallVec;

use crate::STACK_RANK;

pub(crate) struct LoopPlan {
    /// Natural axis iterated at each loop level, innermost first.
    pub axes: SmallVec<[usize; STACK_RANK]>,
    /// Shape permuted into loop order.
    pub extents: Dims,
}

impl LoopPlan {
    pub fn new(order: Order, shape: &[usize]) -> Self {
        let axes = order.loop_axes(shape.len());
        let extents = axes.iter().map(|&ax| shape[ax]).collect();
        LoopPlan { axes, extents }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    /// A zero-extent axis makes the whole walk a no-op; callers short-circuit
    /// on this before entering any nested loop.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extents.contains(&0)
    }

    /// Cursor increments for one view, per loop level.
    ///
    /// `d[0]` is the fastest axis's stride; `d[k]` for `k > 0` is
    /// `s[axes[k]] - extents[k-1] * s[axes[k-1]]`, the correction applied
    /// when level `k-1` wraps and level `k` advances by one.
    pub fn increments(&self, strides: &[isize]) -> Strides {
        debug_assert_eq!(strides.len(), self.rank());
        let mut d = Strides::with_capacity(self.rank());
        for k in 0..self.rank() {
            let s = strides[self.axes[k]];
            if k == 0 {
                d.push(s);
            } else {
                d.push(s - self.extents[k - 1] as isize * strides[self.axes[k - 1]]);
            }
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_2d_row_major() {
        // shape [2, 3], strides [3, 1]: inner loop walks the last axis.
        let plan = LoopPlan::new(Order::RowMajor, &[2, 3]);
        assert_eq!(plan.axes.as_slice(), &[1, 0]);
        assert_eq!(plan.extents.as_slice(), &[3, 2]);
        let d = plan.increments(&[3, 1]);
        // d0 = s1 = 1; d1 = s0 - S0*s1 = 3 - 3*1 = 0.
        assert_eq!(d.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_plan_2d_col_major() {
        // shape [2, 3], strides [1, 2]: inner loop walks the first axis.
        let plan = LoopPlan::new(Order::ColMajor, &[2, 3]);
        assert_eq!(plan.axes.as_slice(), &[0, 1]);
        assert_eq!(plan.extents.as_slice(), &[2, 3]);
        let d = plan.increments(&[1, 2]);
        // d0 = s0 = 1; d1 = s1 - S0*s0 = 2 - 2*1 = 0.
        assert_eq!(d.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_plan_3d_row_major_non_contiguous() {
        let plan = LoopPlan::new(Order::RowMajor, &[2, 3, 4]);
        let d = plan.increments(&[24, 8, 2]);
        // d0 = s2; d1 = s1 - 4*s2; d2 = s0 - 3*s1.
        assert_eq!(d.as_slice(), &[2, 0, 0]);

        let d = plan.increments(&[100, 10, 1]);
        assert_eq!(d.as_slice(), &[1, 6, 70]);
    }

    #[test]
    fn test_plan_negative_strides() {
        let plan = LoopPlan::new(Order::RowMajor, &[2, 3]);
        let d = plan.increments(&[-3, -1]);
        // d0 = -1; d1 = -3 - 3*(-1) = 0.
        assert_eq!(d.as_slice(), &[-1, 0]);
    }

    #[test]
    fn test_plan_rank_zero() {
        let plan = LoopPlan::new(Order::RowMajor, &[]);
        assert_eq!(plan.rank(), 0);
        assert!(!plan.is_empty());
        assert!(plan.increments(&[]).is_empty());
    }

    #[test]
    fn test_plan_zero_extent() {
        let plan = LoopPlan::new(Order::ColMajor, &[2, 0, 4]);
        assert!(plan.is_empty());
    }
}
