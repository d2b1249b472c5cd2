//! N-dimensional walkers: synchronized cursors over one or more views.
//!
//! Every operation follows the same scheme: build a [`LoopPlan`] from the
//! output view's order tag, precompute one increment vector per participating
//! view, then drive all cursors through an odometer loop, invoking the
//! caller's element operation at each visited coordinate. Ranks 1 through 3
//! use unrolled loops; [`walk_any`] is the generic reference implementation
//! for every rank and must stay observationally identical to the fast paths.

use crate::access::{Access, Direct};
use crate::plan::LoopPlan;
use crate::view::{NdView, NdViewMut, Strides};
use crate::{Result, WalkError, STACK_RANK};
use smallvec::SmallVec;

pub(crate) fn ensure_same_shape(a: &[usize], b: &[usize]) -> Result<()> {
    if a.len() != b.len() {
        return Err(WalkError::RankMismatch(a.len(), b.len()));
    }
    if a != b {
        return Err(WalkError::ShapeMismatch(a.to_vec(), b.to_vec()));
    }
    Ok(())
}

type Cursors = SmallVec<[isize; 4]>;

/// Drive one cursor per view through the plan, invoking `f` with the current
/// cursor positions once per element.
///
/// Callers have already short-circuited empty plans.
pub(crate) fn walk<F>(plan: &LoopPlan, starts: &[usize], incs: &[Strides], mut f: F)
where
    F: FnMut(&[isize]),
{
    debug_assert_eq!(starts.len(), incs.len());
    debug_assert!(!plan.is_empty());
    let mut cursors: Cursors = starts.iter().map(|&o| o as isize).collect();
    match plan.rank() {
        0 => f(&cursors),
        1 => walk1(plan, incs, &mut cursors, &mut f),
        2 => walk2(plan, incs, &mut cursors, &mut f),
        3 => walk3(plan, incs, &mut cursors, &mut f),
        _ => walk_any_inner(plan, incs, &mut cursors, &mut f),
    }
}

/// Generic-path entry used by the equivalence tests: always takes the
/// arbitrary-rank odometer, never an unrolled loop.
#[cfg(test)]
pub(crate) fn walk_any<F>(plan: &LoopPlan, starts: &[usize], incs: &[Strides], mut f: F)
where
    F: FnMut(&[isize]),
{
    debug_assert!(!plan.is_empty());
    let mut cursors: Cursors = starts.iter().map(|&o| o as isize).collect();
    if plan.rank() == 0 {
        f(&cursors);
        return;
    }
    walk_any_inner(plan, incs, &mut cursors, &mut f);
}

#[inline]
fn advance(cursors: &mut [isize], incs: &[Strides], level: usize) {
    for (c, d) in cursors.iter_mut().zip(incs.iter()) {
        *c += d[level];
    }
}

#[inline]
fn walk1<F>(plan: &LoopPlan, incs: &[Strides], cursors: &mut Cursors, f: &mut F)
where
    F: FnMut(&[isize]),
{
    for _ in 0..plan.extents[0] {
        f(cursors);
        advance(cursors, incs, 0);
    }
}

#[inline]
fn walk2<F>(plan: &LoopPlan, incs: &[Strides], cursors: &mut Cursors, f: &mut F)
where
    F: FnMut(&[isize]),
{
    for _ in 0..plan.extents[1] {
        for _ in 0..plan.extents[0] {
            f(cursors);
            advance(cursors, incs, 0);
        }
        advance(cursors, incs, 1);
    }
}

#[inline]
fn walk3<F>(plan: &LoopPlan, incs: &[Strides], cursors: &mut Cursors, f: &mut F)
where
    F: FnMut(&[isize]),
{
    for _ in 0..plan.extents[2] {
        for _ in 0..plan.extents[1] {
            for _ in 0..plan.extents[0] {
                f(cursors);
                advance(cursors, incs, 0);
            }
            advance(cursors, incs, 1);
        }
        advance(cursors, incs, 2);
    }
}

/// Arbitrary-rank odometer: ripple-carry counters, one precomputed increment
/// per level applied exactly once per wrap.
fn walk_any_inner<F>(plan: &LoopPlan, incs: &[Strides], cursors: &mut Cursors, f: &mut F)
where
    F: FnMut(&[isize]),
{
    let rank = plan.rank();
    debug_assert!(rank >= 1);
    let mut counters: SmallVec<[usize; STACK_RANK]> = SmallVec::new();
    counters.resize(rank, 0);

    loop {
        for _ in 0..plan.extents[0] {
            f(cursors);
            advance(cursors, incs, 0);
        }
        let mut level = 1;
        loop {
            if level == rank {
                return;
            }
            advance(cursors, incs, level);
            counters[level] += 1;
            if counters[level] < plan.extents[level] {
                break;
            }
            counters[level] = 0;
            level += 1;
        }
    }
}

/// Single-view odometer that additionally tracks natural-order coordinates.
///
/// The loop counters live in plan order; `coords` maps them back through the
/// plan's axis permutation, which is fixed for the whole walk.
fn walk_coords<F>(plan: &LoopPlan, start: usize, inc: &Strides, mut f: F)
where
    F: FnMut(isize, &[usize]),
{
    let rank = plan.rank();
    let mut coords: SmallVec<[usize; STACK_RANK]> = SmallVec::new();
    coords.resize(rank, 0);
    if rank == 0 {
        f(start as isize, &coords);
        return;
    }

    let mut cursor = start as isize;
    let mut counters: SmallVec<[usize; STACK_RANK]> = SmallVec::new();
    counters.resize(rank, 0);

    loop {
        for i0 in 0..plan.extents[0] {
            coords[plan.axes[0]] = i0;
            f(cursor, &coords);
            cursor += inc[0];
        }
        let mut level = 1;
        loop {
            if level == rank {
                return;
            }
            cursor += inc[level];
            counters[level] += 1;
            if counters[level] < plan.extents[level] {
                coords[plan.axes[level]] = counters[level];
                break;
            }
            counters[level] = 0;
            coords[plan.axes[level]] = 0;
            level += 1;
        }
    }
}

// ============================================================================
// Element-wise walks
// ============================================================================

/// Invoke `f` once per element and write the result through the output
/// setter (nullary map).
pub fn fill_into<D, F>(dst: &mut NdViewMut<'_, D>, mut f: F) -> Result<()>
where
    D: Access,
    F: FnMut() -> D::Elem,
{
    let plan = LoopPlan::new(dst.order(), dst.shape());
    if plan.is_empty() {
        return Ok(());
    }
    let incs = [plan.increments(dst.strides())];
    let starts = [dst.offset()];
    let dbuf = dst.data_mut();
    walk(&plan, &starts, &incs, |cur| {
        D::set(dbuf, cur[0] as usize, f());
    });
    Ok(())
}

/// Element-wise unary map from `src` into `dst`.
pub fn unary_into<D, S, F>(dst: &mut NdViewMut<'_, D>, src: &NdView<'_, S>, mut f: F) -> Result<()>
where
    D: Access,
    S: Access,
    F: FnMut(S::Elem) -> D::Elem,
{
    ensure_same_shape(dst.shape(), src.shape())?;
    let plan = LoopPlan::new(dst.order(), dst.shape());
    if plan.is_empty() {
        return Ok(());
    }
    let incs = [
        plan.increments(dst.strides()),
        plan.increments(src.strides()),
    ];
    let starts = [dst.offset(), src.offset()];
    let sbuf = src.data();
    let dbuf = dst.data_mut();
    walk(&plan, &starts, &incs, |cur| {
        let v = S::get(sbuf, cur[1] as usize);
        D::set(dbuf, cur[0] as usize, f(v));
    });
    Ok(())
}

/// Element-wise unary map fully in place: `dst = f(dst)`.
///
/// Input and output fully alias; each element is read before it is written,
/// so the result equals computing into a fresh buffer and copying back.
pub fn unary_apply<D, F>(dst: &mut NdViewMut<'_, D>, mut f: F) -> Result<()>
where
    D: Access,
    F: FnMut(D::Elem) -> D::Elem,
{
    let plan = LoopPlan::new(dst.order(), dst.shape());
    if plan.is_empty() {
        return Ok(());
    }
    let incs = [plan.increments(dst.strides())];
    let starts = [dst.offset()];
    let dbuf = dst.data_mut();
    walk(&plan, &starts, &incs, |cur| {
        let i = cur[0] as usize;
        let v = D::get(dbuf, i);
        D::set(dbuf, i, f(v));
    });
    Ok(())
}

/// Element-wise binary map from `a` and `b` into `dst`.
pub fn binary_into<D, A1, A2, F>(
    dst: &mut NdViewMut<'_, D>,
    a: &NdView<'_, A1>,
    b: &NdView<'_, A2>,
    mut f: F,
) -> Result<()>
where
    D: Access,
    A1: Access,
    A2: Access,
    F: FnMut(A1::Elem, A2::Elem) -> D::Elem,
{
    ensure_same_shape(dst.shape(), a.shape())?;
    ensure_same_shape(dst.shape(), b.shape())?;
    let plan = LoopPlan::new(dst.order(), dst.shape());
    if plan.is_empty() {
        return Ok(());
    }
    let incs = [
        plan.increments(dst.strides()),
        plan.increments(a.strides()),
        plan.increments(b.strides()),
    ];
    let starts = [dst.offset(), a.offset(), b.offset()];
    let abuf = a.data();
    let bbuf = b.data();
    let dbuf = dst.data_mut();
    walk(&plan, &starts, &incs, |cur| {
        let out = f(A1::get(abuf, cur[1] as usize), A2::get(bbuf, cur[2] as usize));
        D::set(dbuf, cur[0] as usize, out);
    });
    Ok(())
}

/// Binary map with the first operand in place: `dst = f(dst, b)`.
pub fn binary_apply<D, B, F>(
    dst: &mut NdViewMut<'_, D>,
    b: &NdView<'_, B>,
    mut f: F,
) -> Result<()>
where
    D: Access,
    B: Access,
    F: FnMut(D::Elem, B::Elem) -> D::Elem,
{
    ensure_same_shape(dst.shape(), b.shape())?;
    let plan = LoopPlan::new(dst.order(), dst.shape());
    if plan.is_empty() {
        return Ok(());
    }
    let incs = [
        plan.increments(dst.strides()),
        plan.increments(b.strides()),
    ];
    let starts = [dst.offset(), b.offset()];
    let bbuf = b.data();
    let dbuf = dst.data_mut();
    walk(&plan, &starts, &incs, |cur| {
        let i = cur[0] as usize;
        let out = f(D::get(dbuf, i), B::get(bbuf, cur[1] as usize));
        D::set(dbuf, i, out);
    });
    Ok(())
}

/// Element-wise ternary map from `a`, `b`, and `c` into `dst`.
pub fn ternary_into<D, A1, A2, A3, F>(
    dst: &mut NdViewMut<'_, D>,
    a: &NdView<'_, A1>,
    b: &NdView<'_, A2>,
    c: &NdView<'_, A3>,
    mut f: F,
) -> Result<()>
where
    D: Access,
    A1: Access,
    A2: Access,
    A3: Access,
    F: FnMut(A1::Elem, A2::Elem, A3::Elem) -> D::Elem,
{
    ensure_same_shape(dst.shape(), a.shape())?;
    ensure_same_shape(dst.shape(), b.shape())?;
    ensure_same_shape(dst.shape(), c.shape())?;
    let plan = LoopPlan::new(dst.order(), dst.shape());
    if plan.is_empty() {
        return Ok(());
    }
    let incs = [
        plan.increments(dst.strides()),
        plan.increments(a.strides()),
        plan.increments(b.strides()),
        plan.increments(c.strides()),
    ];
    let starts = [dst.offset(), a.offset(), b.offset(), c.offset()];
    let abuf = a.data();
    let bbuf = b.data();
    let cbuf = c.data();
    let dbuf = dst.data_mut();
    walk(&plan, &starts, &incs, |cur| {
        let out = f(
            A1::get(abuf, cur[1] as usize),
            A2::get(bbuf, cur[2] as usize),
            A3::get(cbuf, cur[3] as usize),
        );
        D::set(dbuf, cur[0] as usize, out);
    });
    Ok(())
}

/// Converting copy from `src` into `dst`.
pub fn assign_into<D, S>(dst: &mut NdViewMut<'_, D>, src: &NdView<'_, S>) -> Result<()>
where
    D: Access,
    S: Access,
    D::Elem: From<S::Elem>,
{
    unary_into(dst, src, |v| D::Elem::from(v))
}

/// Masked unary map: elements whose mask byte is non-zero are skipped; the
/// callback is not invoked and the output element is left untouched.
///
/// All three views must share a shape; cursors advance over skipped
/// elements like any others.
pub fn msk_unary_into<D, S, F>(
    dst: &mut NdViewMut<'_, D>,
    mask: &NdView<'_, Direct<u8>>,
    src: &NdView<'_, S>,
    mut f: F,
) -> Result<()>
where
    D: Access,
    S: Access,
    F: FnMut(S::Elem) -> D::Elem,
{
    ensure_same_shape(dst.shape(), src.shape())?;
    ensure_same_shape(dst.shape(), mask.shape())?;
    let plan = LoopPlan::new(dst.order(), dst.shape());
    if plan.is_empty() {
        return Ok(());
    }
    let incs = [
        plan.increments(dst.strides()),
        plan.increments(src.strides()),
        plan.increments(mask.strides()),
    ];
    let starts = [dst.offset(), src.offset(), mask.offset()];
    let sbuf = src.data();
    let mbuf = mask.data();
    let dbuf = dst.data_mut();
    walk(&plan, &starts, &incs, |cur| {
        if Direct::<u8>::get(mbuf, cur[2] as usize) != 0 {
            return;
        }
        let v = S::get(sbuf, cur[1] as usize);
        D::set(dbuf, cur[0] as usize, f(v));
    });
    Ok(())
}

/// Masked unary map in place: `dst = f(dst)` wherever the mask byte is zero.
pub fn msk_unary_apply<D, F>(
    dst: &mut NdViewMut<'_, D>,
    mask: &NdView<'_, Direct<u8>>,
    mut f: F,
) -> Result<()>
where
    D: Access,
    F: FnMut(D::Elem) -> D::Elem,
{
    ensure_same_shape(dst.shape(), mask.shape())?;
    let plan = LoopPlan::new(dst.order(), dst.shape());
    if plan.is_empty() {
        return Ok(());
    }
    let incs = [
        plan.increments(dst.strides()),
        plan.increments(mask.strides()),
    ];
    let starts = [dst.offset(), mask.offset()];
    let mbuf = mask.data();
    let dbuf = dst.data_mut();
    walk(&plan, &starts, &incs, |cur| {
        if Direct::<u8>::get(mbuf, cur[1] as usize) != 0 {
            return;
        }
        let i = cur[0] as usize;
        let v = D::get(dbuf, i);
        D::set(dbuf, i, f(v));
    });
    Ok(())
}

/// Visitor walk: invoke `f(element, coordinates)` for every element, with
/// coordinates in natural axis order.
pub fn for_each<S, F>(src: &NdView<'_, S>, mut f: F)
where
    S: Access,
    F: FnMut(S::Elem, &[usize]),
{
    let plan = LoopPlan::new(src.order(), src.shape());
    if plan.is_empty() {
        return;
    }
    let inc = plan.increments(src.strides());
    let buf = src.data();
    walk_coords(&plan, src.offset(), &inc, |cursor, coords| {
        f(S::get(buf, cursor as usize), coords);
    });
}
