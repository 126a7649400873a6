// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Precomputed per-element offset tables.
//!
//! Kernels that co-iterate arrays of unlike layout walk a dense vector of
//! buffer offsets instead of converting indices on the fly. Descriptors
//! with a usable element-wise stride short-circuit to `offset = index · ews`;
//! the multi-array entry points additionally drop operands that need no
//! table at all (`None` = identity mapping) and share one table between
//! operands of identical shape and strides.
//!
//! With the `rayon` feature enabled, independent tables of one call are
//! computed on the rayon thread pool; the results are identical to the
//! sequential schedule.

use std::sync::Arc;

use crate::{Order, ShapeDescriptor, MAX_RANK};

/// An offset table shared between co-iterated operands, or `None` when the
/// operand's offsets equal the logical indices.
pub type SharedOffsets = Option<Arc<[i64]>>;

/// The offset table of one descriptor, walked in `order`.
pub fn offsets_for(descriptor: &ShapeDescriptor, order: Order) -> Vec<i64> {
    let len = descriptor.length();
    let mut out = vec![0i64; len.max(0) as usize];
    offsets_into(descriptor, &mut out, order);
    out
}

/// Zero-allocation form of [`offsets_for`]: fills `out`, whose length must
/// equal the descriptor's.
pub fn offsets_into(descriptor: &ShapeDescriptor, out: &mut [i64], order: Order) {
    if out.is_empty() {
        return;
    }
    let ews = descriptor.ews();
    if ews > 0 {
        out[0] = 0;
        let mut non_unity = 0;
        if order != descriptor.order() {
            non_unity = descriptor.shape().iter().filter(|&&d| d != 1).count();
        }
        // a common vector walks the same elements in either order
        if order == descriptor.order() || non_unity == 1 {
            for e in 1..out.len() {
                out[e] = out[e - 1] + ews;
            }
            return;
        }
    }
    offsets_raw(descriptor.shape(), descriptor.strides(), out, order);
}

/// Per-axis odometer over raw shape/strides: accumulates `+stride[j]` along
/// the fastest axis and unwinds `-(shape[j]-1)·stride[j]` on rollover.
pub fn offsets_raw(shape: &[i64], strides: &[i64], out: &mut [i64], order: Order) {
    if out.is_empty() {
        return;
    }
    out[0] = 0;
    let rank = shape.len();
    if rank == 0 || out.len() == 1 {
        return;
    }

    // stack scratch covers every descriptor-backed rank; oversized raw
    // slices fall back to the heap
    let mut stack = [0i64; 2 * MAX_RANK];
    let mut spill = Vec::new();
    let scratch: &mut [i64] = if rank <= MAX_RANK {
        &mut stack
    } else {
        spill.resize(2 * rank, 0);
        &mut spill
    };
    let (idx, per_axis) = scratch.split_at_mut(rank);
    for (p, (&d, &s)) in izip!(per_axis.iter_mut(), izip!(shape, strides)) {
        *p = (d - 1) * s;
    }

    let mut running = 0i64;
    let mut filled = 1usize;

    match order {
        Order::RowMajor => {
            let last = rank as isize - 1;
            let mut j = last;
            while j >= 0 {
                let ax = j as usize;
                if shape[ax] == 1 {
                    j -= 1;
                    continue;
                }
                if j == last {
                    for _ in 1..shape[ax] {
                        out[filled] = out[filled - 1] + strides[ax];
                        filled += 1;
                    }
                    j -= 1;
                } else if idx[ax] < shape[ax] - 1 {
                    running += strides[ax];
                    out[filled] = running;
                    filled += 1;
                    idx[ax] += 1;
                    j = last;
                } else {
                    running -= per_axis[ax];
                    idx[ax] = 0;
                    j -= 1;
                }
            }
        }
        Order::ColumnMajor => {
            let mut j = 0;
            while j < rank {
                if shape[j] == 1 {
                    j += 1;
                    continue;
                }
                if j == 0 {
                    for _ in 1..shape[j] {
                        out[filled] = out[filled - 1] + strides[j];
                        filled += 1;
                    }
                    j += 1;
                } else if idx[j] < shape[j] - 1 {
                    running += strides[j];
                    out[filled] = running;
                    filled += 1;
                    idx[j] += 1;
                    j = 0;
                } else {
                    running -= per_axis[j];
                    idx[j] = 0;
                    j += 1;
                }
            }
        }
    }
}

fn shared(descriptor: &ShapeDescriptor, order: Order) -> Arc<[i64]> {
    offsets_for(descriptor, order).into()
}

/// Offset tables for two co-iterated arrays of equal length.
///
/// `None` entries are identity mappings the caller should short-circuit.
/// `order` is the walk used when neither operand dictates one.
pub fn offsets_for_pair(
    x: &ShapeDescriptor,
    y: &ShapeDescriptor,
    order: Order,
) -> (SharedOffsets, SharedOffsets) {
    let same_shape = x.same_shape(y);

    if x.ews() == 1
        && y.ews() == 1
        && x.order() == y.order()
        && (x.order() == Order::RowMajor || same_shape)
    {
        (None, None)
    } else if x.ews() == 1 {
        (None, Some(shared(y, x.order())))
    } else if y.ews() == 1 {
        (Some(shared(x, y.order())), None)
    } else if x.same_shape_and_strides(y) {
        let table = shared(x, order);
        (Some(table.clone()), Some(table))
    } else {
        let (xo, yo) = join(|| shared(x, order), || shared(y, order));
        (Some(xo), Some(yo))
    }
}

/// Offset tables for three co-iterated arrays of equal length.
pub fn offsets_for_triple(
    x: &ShapeDescriptor,
    y: &ShapeDescriptor,
    z: &ShapeDescriptor,
    order: Order,
) -> (SharedOffsets, SharedOffsets, SharedOffsets) {
    let xy_same = x.same_shape(y);
    let xz_same = x.same_shape(z);
    let all_same = xy_same && xz_same;

    let x_unit = x.ews() == 1;
    let y_unit = y.ews() == 1;
    let z_unit = z.ews() == 1;

    if x_unit
        && y_unit
        && z_unit
        && x.order() == y.order()
        && x.order() == z.order()
        && (x.order() == Order::RowMajor || all_same)
    {
        (None, None, None)
    } else if x_unit
        && y_unit
        && x.order() == y.order()
        && (x.order() == Order::RowMajor || xy_same)
    {
        (None, None, Some(shared(z, x.order())))
    } else if x_unit
        && z_unit
        && x.order() == z.order()
        && (x.order() == Order::RowMajor || xz_same)
    {
        (None, Some(shared(y, x.order())), None)
    } else if y_unit
        && z_unit
        && y.order() == z.order()
        && (y.order() == Order::RowMajor || y.same_shape(z))
    {
        (Some(shared(x, y.order())), None, None)
    } else if x_unit {
        let (yo, zo) = join(|| shared(y, x.order()), || shared(z, x.order()));
        (None, Some(yo), Some(zo))
    } else if y_unit {
        let (xo, zo) = join(|| shared(x, y.order()), || shared(z, y.order()));
        (Some(xo), None, Some(zo))
    } else if z_unit {
        let (xo, yo) = join(|| shared(x, z.order()), || shared(y, z.order()));
        (Some(xo), Some(yo), None)
    } else if x.same_shape_and_strides(y) && x.same_shape_and_strides(z) {
        let table = shared(x, order);
        (Some(table.clone()), Some(table.clone()), Some(table))
    } else if x.same_shape_and_strides(y) {
        let (xo, zo) = join(|| shared(x, order), || shared(z, order));
        (Some(xo.clone()), Some(xo), Some(zo))
    } else if x.same_shape_and_strides(z) {
        let (xo, yo) = join(|| shared(x, order), || shared(y, order));
        (Some(xo.clone()), Some(yo), Some(xo))
    } else {
        let ((xo, yo), zo) = join(
            || join(|| shared(x, order), || shared(y, order)),
            || shared(z, order),
        );
        (Some(xo), Some(yo), Some(zo))
    }
}

#[cfg(feature = "rayon")]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "rayon"))]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{index_to_coords, offset_for};
    use crate::DataType;

    fn c(shape: &[i64]) -> ShapeDescriptor {
        ShapeDescriptor::row_major(shape, DataType::Float32).unwrap()
    }

    fn f(shape: &[i64]) -> ShapeDescriptor {
        ShapeDescriptor::column_major(shape, DataType::Float32).unwrap()
    }

    fn strided(shape: &[i64], strides: &[i64]) -> ShapeDescriptor {
        ShapeDescriptor::with_strides(shape, strides, Order::RowMajor, DataType::Float32).unwrap()
    }

    #[test]
    fn ews_shortcut_emits_multiples() {
        let d = c(&[2, 3]);
        assert_eq!(offsets_for(&d, Order::RowMajor), vec![0, 1, 2, 3, 4, 5]);

        let v = strided(&[1, 6], &[12, 2]);
        assert_eq!(v.ews(), 2);
        // common vector: either walk order hits the same elements
        assert_eq!(offsets_for(&v, Order::ColumnMajor), vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn odometer_matches_coordinate_arithmetic() {
        let cases = [
            (vec![2i64, 3, 4], vec![12i64, 4, 1]),
            (vec![2, 3, 4], vec![1, 2, 6]),
            (vec![2, 1, 3], vec![3, 99, 1]),
            (vec![3, 4], vec![8, 2]),
        ];
        for (shape, strides) in cases {
            let len: i64 = shape.iter().product();
            for order in [Order::RowMajor, Order::ColumnMajor] {
                let mut out = vec![0i64; len as usize];
                offsets_raw(&shape, &strides, &mut out, order);
                for index in 0..len {
                    let coords = index_to_coords(&shape, index, order);
                    assert_eq!(
                        out[index as usize],
                        offset_for(0, &shape, &strides, &coords),
                        "shape {:?} strides {:?} order {:?} index {}",
                        shape,
                        strides,
                        order,
                        index
                    );
                }
            }
        }
    }

    #[test]
    fn descriptor_offsets_cross_orders() {
        // c-contiguous walked in f order has to use the odometer
        let d = c(&[2, 3]);
        assert_eq!(offsets_for(&d, Order::ColumnMajor), vec![0, 3, 1, 4, 2, 5]);
        // f-contiguous walked in f order is the identity
        let d = f(&[2, 3]);
        assert_eq!(offsets_for(&d, Order::ColumnMajor), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn oversized_raw_rank_spills_to_the_heap() {
        // raw slices are not bounded by MAX_RANK
        let mut shape = vec![1i64; 40];
        let mut strides = vec![1i64; 40];
        shape[0] = 2;
        strides[0] = 3;
        shape[39] = 3;
        let mut out = vec![0i64; 6];
        offsets_raw(&shape, &strides, &mut out, Order::RowMajor);
        assert_eq!(out, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_descriptor_has_no_offsets() {
        let d = c(&[2, 0, 3]);
        assert!(offsets_for(&d, Order::RowMajor).is_empty());
    }

    #[test]
    fn pair_identity_and_mixed() {
        let a = c(&[2, 3]);
        let b = c(&[2, 3]);
        assert_eq!(offsets_for_pair(&a, &b, Order::RowMajor), (None, None));

        // same order, f, same shape: still identity for both
        let (xo, yo) = offsets_for_pair(&f(&[2, 3]), &f(&[2, 3]), Order::RowMajor);
        assert!(xo.is_none() && yo.is_none());

        // x dictates the walk of y
        let y = strided(&[2, 3], &[1, 4]);
        let (xo, yo) = offsets_for_pair(&a, &y, Order::RowMajor);
        assert!(xo.is_none());
        assert_eq!(&yo.unwrap()[..], &[0, 4, 8, 1, 5, 9]);
    }

    #[test]
    fn pair_shares_one_table() {
        let x = strided(&[2, 3], &[1, 4]);
        let y = strided(&[2, 3], &[1, 4]);
        let (xo, yo) = offsets_for_pair(&x, &y, Order::RowMajor);
        let (xo, yo) = (xo.unwrap(), yo.unwrap());
        assert!(Arc::ptr_eq(&xo, &yo));
        assert_eq!(&xo[..], &[0, 4, 8, 1, 5, 9]);
    }

    #[test]
    fn pair_independent_tables() {
        let x = strided(&[2, 3], &[1, 4]);
        let y = strided(&[2, 3], &[2, 8]);
        let (xo, yo) = offsets_for_pair(&x, &y, Order::RowMajor);
        assert_eq!(&xo.unwrap()[..], &[0, 4, 8, 1, 5, 9]);
        assert_eq!(&yo.unwrap()[..], &[0, 8, 16, 2, 10, 18]);
    }

    #[test]
    fn triple_dispatch() {
        let a = c(&[2, 3]);
        let b = c(&[2, 3]);
        let z = strided(&[2, 3], &[1, 4]);

        let (xo, yo, zo) = offsets_for_triple(&a, &b, &c(&[2, 3]), Order::RowMajor);
        assert!(xo.is_none() && yo.is_none() && zo.is_none());

        let (xo, yo, zo) = offsets_for_triple(&a, &b, &z, Order::RowMajor);
        assert!(xo.is_none() && yo.is_none());
        assert_eq!(&zo.unwrap()[..], &[0, 4, 8, 1, 5, 9]);

        // all three share one non-trivial layout
        let z2 = strided(&[2, 3], &[1, 4]);
        let z3 = strided(&[2, 3], &[1, 4]);
        let (xo, yo, zo) = offsets_for_triple(&z, &z2, &z3, Order::RowMajor);
        let (xo, yo, zo) = (xo.unwrap(), yo.unwrap(), zo.unwrap());
        assert!(Arc::ptr_eq(&xo, &yo) && Arc::ptr_eq(&yo, &zo));

        // x pairs with y, z stands alone
        let w = strided(&[2, 3], &[2, 8]);
        let (xo, yo, zo) = offsets_for_triple(&z, &z2, &w, Order::RowMajor);
        let (xo, yo, zo) = (xo.unwrap(), yo.unwrap(), zo.unwrap());
        assert!(Arc::ptr_eq(&xo, &yo));
        assert_eq!(&zo[..], &[0, 8, 16, 2, 10, 18]);
    }
}
