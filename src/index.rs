// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion between linear indices, coordinate tuples and buffer offsets.
//!
//! `index_to_coords` and `coords_to_index` are inverses for a given
//! `(shape, order)`; they map between an array's logical index space and its
//! coordinate space using running products of the shape, never the strides.
//! The offset primitives then apply the strides.

use num_traits::{PrimInt, WrappingAdd, WrappingMul};

use crate::dimvec::DimVec;
use crate::{Order, ShapeDescriptor};

/// Coordinates of logical `index` within `shape`, walked in `order`.
pub fn index_to_coords(shape: &[i64], index: i64, order: Order) -> DimVec {
    let mut coords = DimVec::zeros(shape.len());
    index_to_coords_into(shape, index, &mut coords, order);
    coords
}

/// Zero-allocation form of [`index_to_coords`]: writes into `coords`.
pub fn index_to_coords_into(shape: &[i64], index: i64, coords: &mut [i64], order: Order) {
    let len = shape.iter().product();
    index_to_coords_with_len(shape, index, len, coords, order);
}

/// Like [`index_to_coords_into`] for callers that already know the element
/// count. Axes of extent 1 always produce coordinate 0; a zero extent makes
/// every coordinate 0 since no index is valid.
pub fn index_to_coords_with_len(
    shape: &[i64],
    mut index: i64,
    mut len: i64,
    coords: &mut [i64],
    order: Order,
) {
    debug_assert_eq!(shape.len(), coords.len());
    let mut split = |i: usize| {
        let d = shape[i];
        len = if d != 0 { len / d } else { 0 };
        if len > 0 && d > 1 {
            coords[i] = index / len;
            index %= len;
        } else {
            coords[i] = 0;
        }
    };
    match order {
        Order::RowMajor => (0..shape.len()).for_each(&mut split),
        Order::ColumnMajor => (0..shape.len()).rev().for_each(&mut split),
    }
}

/// Linear index of `coords` within `shape`, walked in `order`.
///
/// The weights are running products of the shape in the chosen order — the
/// logical position, independent of the descriptor's strides.
pub fn coords_to_index(shape: &[i64], coords: &[i64], order: Order) -> i64 {
    debug_assert_eq!(shape.len(), coords.len());
    let rank = shape.len();
    if rank == 0 {
        return 0;
    }
    let mut shift = 1;
    match order {
        Order::RowMajor => {
            let mut index = coords[rank - 1];
            for i in (0..rank - 1).rev() {
                shift *= shape[i + 1];
                index += shift * coords[i];
            }
            index
        }
        Order::ColumnMajor => {
            let mut index = coords[0];
            for i in 1..rank {
                shift *= shape[i - 1];
                index += shift * coords[i];
            }
            index
        }
    }
}

/// Buffer offset of `coords` under `strides`, starting from `base`.
///
/// Axes of extent 1 are skipped, so broadcasting callers may pass any
/// coordinate there.
pub fn offset_for(base: i64, shape: &[i64], strides: &[i64], coords: &[i64]) -> i64 {
    let mut offset = base;
    for (&d, &s, &c) in izip!(shape, strides, coords) {
        if d != 1 {
            offset += c * s;
        }
    }
    offset
}

/// Dense per-logical-index offset table in column-major walk order: entry
/// `i` is the buffer offset of logical index `i`.
pub fn linear_offsets(shape: &[i64], strides: &[i64]) -> Vec<i64> {
    let len: i64 = shape.iter().product();
    let mut offsets = Vec::with_capacity(len.max(0) as usize);
    let mut coords = DimVec::zeros(shape.len());
    for index in 0..len {
        index_to_coords_into(shape, index, &mut coords, Order::ColumnMajor);
        offsets.push(offset_for(0, shape, strides, &coords));
    }
    offsets
}

/// The axis-by-axis index split shared by every fused index→offset path:
/// divide the running interior length out of the linear index and collect
/// the stride contribution of each non-unit axis. Generic over the integer
/// width so the 64-bit and the narrow 32-bit walks cannot drift apart;
/// wrapping arithmetic mirrors the unsigned overflow of the narrow path.
fn split_index<T, I>(axes: I, mut index: T, mut len: T) -> T
where
    T: PrimInt + WrappingAdd + WrappingMul,
    I: IntoIterator<Item = (T, T)>,
{
    let mut offset = T::zero();
    for (d, s) in axes {
        len = if d != T::zero() { len / d } else { T::zero() };
        if len > T::zero() && d > T::one() {
            offset = offset.wrapping_add(&(index / len).wrapping_mul(&s));
            index = index % len;
        }
    }
    offset
}

impl ShapeDescriptor {
    /// Buffer offset of the element at `coords`.
    pub fn offset_at(&self, coords: &[i64]) -> i64 {
        offset_for(0, &self.shape, &self.strides, coords)
    }

    /// Buffer offset of logical `index`.
    ///
    /// Row-major descriptors with a usable ews resolve to `index · ews`
    /// without touching the shape; everything else walks the axes from
    /// outer to inner, splitting the index by the running interior length.
    pub fn offset_of_index(&self, index: i64) -> i64 {
        if self.ews > 0 && self.order == Order::RowMajor {
            return if self.ews == 1 { index } else { self.ews * index };
        }
        let axes = izip!(&self.shape, &self.strides).map(|(&d, &s)| (d, s));
        split_index(axes, index, self.length())
    }

    /// 32-bit fast path of [`offset_of_index`](ShapeDescriptor::offset_of_index),
    /// for callers that have proved the length and every stride fit in `u32`.
    pub fn offset_of_index_narrow(&self, index: u32) -> u32 {
        if self.ews > 0 && self.order == Order::RowMajor {
            return if self.ews == 1 {
                index
            } else {
                self.ews as u32 * index
            };
        }
        let axes = izip!(&self.shape, &self.strides).map(|(&d, &s)| (d as u32, s as u32));
        split_index(axes, index, self.length() as u32)
    }

    /// Dispatch between the 64-bit and the narrow path on a caller-proved
    /// flag.
    #[inline]
    pub fn offset_of_index_auto(&self, index: i64, narrow: bool) -> i64 {
        if narrow {
            self.offset_of_index_narrow(index as u32) as i64
        } else {
            self.offset_of_index(index)
        }
    }

    /// Buffer offset of logical `index` when walked in an explicit `order`,
    /// without the ews shortcut: outer→inner for row major, inner→outer for
    /// column major.
    pub fn offset_of_index_ordered(&self, index: i64, order: Order) -> i64 {
        let axes = izip!(&self.shape, &self.strides).map(|(&d, &s)| (d, s));
        match order {
            Order::RowMajor => split_index(axes, index, self.length()),
            Order::ColumnMajor => split_index(axes.rev(), index, self.length()),
        }
    }
}
