// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default stride synthesis.
//!
//! Row-major strides give the innermost (last) axis the seed stride and
//! accumulate outward: shape `(a, b, c)` gives strides `(b·c, c, 1)`.
//! Column-major gives the outermost (first) axis the seed and accumulates
//! forward: `(1, a, a·b)`.

use crate::dimvec::DimVec;
use crate::itertools::zip;
use crate::{Order, ShapeDescriptor};

/// Default strides for `shape` in the given order (seed 1).
pub fn strides_for(shape: &[i64], order: Order) -> DimVec {
    strides_for_seeded(shape, order, 1)
}

/// Strides for `shape` where the fastest-varying axis steps by `seed`.
pub fn strides_for_seeded(shape: &[i64], order: Order, seed: i64) -> DimVec {
    let mut strides = DimVec::zeros(shape.len());
    write_strides(shape, order, seed, &mut strides);
    strides
}

/// Zero-allocation form of [`strides_for_seeded`]: writes into `strides`.
///
/// **Panics** if the slices differ in length.
pub fn write_strides(shape: &[i64], order: Order, seed: i64, strides: &mut [i64]) {
    assert_eq!(
        shape.len(),
        strides.len(),
        "stride synthesis needs one stride slot per axis"
    );
    let mut acc = seed;
    match order {
        Order::RowMajor => {
            for (st, &d) in zip(strides.iter_mut().rev(), shape.iter().rev()) {
                *st = acc;
                acc *= d;
            }
        }
        Order::ColumnMajor => {
            for (st, &d) in zip(strides.iter_mut(), shape) {
                *st = acc;
                acc *= d;
            }
        }
    }
}

impl ShapeDescriptor {
    /// Rewrite the strides in place from the current shape, making the
    /// descriptor contiguous in `order` (the ews becomes 1).
    pub fn update_strides(&mut self, order: Order) {
        write_strides(&self.shape, order, 1, &mut self.strides);
        self.ews = 1;
        self.order = order;
    }
}
