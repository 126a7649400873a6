// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Copy-free reshape.
//!
//! A reshape succeeds without moving elements only when the new shape can be
//! expressed as strides over the old buffer. The check walks paired windows
//! of old and new axes with matching element counts (numpy's algorithm):
//! within each window the grouped old axes must be contiguous in the
//! requested order, and the window's new strides are accumulated from the
//! old boundary stride.

use crate::dimvec::DimVec;
use crate::{Order, ShapeDescriptor, MAX_RANK};

/// Whether `new_shape` can be laid over the `(old_shape, old_strides)`
/// buffer without copying, with axes grouped in `order`.
///
/// Zero-size and differing element counts are never reshapeable this way.
pub fn can_reshape(
    old_shape: &[i64],
    old_strides: &[i64],
    new_shape: &[i64],
    order: Order,
) -> bool {
    reshape_strides(old_shape, old_strides, new_shape, order).is_some()
}

/// The stride synthesis behind [`can_reshape`]: `Some(new_strides)` exactly
/// when the reshape is a view.
pub(crate) fn reshape_strides(
    old_shape: &[i64],
    old_strides: &[i64],
    new_shape: &[i64],
    order: Order,
) -> Option<DimVec> {
    debug_assert_eq!(old_shape.len(), old_strides.len());
    if old_shape.len() > MAX_RANK {
        return None;
    }

    // Axes of extent 1 have no effect on the element mapping but would need
    // special cases since their strides do not matter; project them away.
    let mut dims = [0i64; MAX_RANK];
    let mut strides = [0i64; MAX_RANK];
    let mut old_rank = 0;
    for i in 0..old_shape.len() {
        if old_shape[i] != 1 {
            dims[old_rank] = old_shape[i];
            strides[old_rank] = old_strides[i];
            old_rank += 1;
        }
    }
    let dims = &dims[..old_rank];
    let strides = &strides[..old_rank];

    let new_len: i64 = new_shape.iter().product();
    let old_len: i64 = dims.iter().product();
    if new_len != old_len || new_len == 0 {
        return None;
    }

    let new_rank = new_shape.len();
    let mut new_strides = DimVec::zeros(new_rank);

    // [old_start, old_stop) and [new_start, new_stop) are the axis windows
    // currently worked with
    let mut old_start = 0;
    let mut old_stop = 1;
    let mut new_start = 0;
    let mut new_stop = 1;

    while new_start < new_rank && old_start < old_rank {
        let mut np = new_shape[new_start];
        let mut op = dims[old_start];

        // grow whichever side's product is smaller until they match up
        while np != op {
            if np < op {
                if new_stop >= new_rank {
                    return None;
                }
                np *= new_shape[new_stop];
                new_stop += 1;
            } else {
                if old_stop >= old_rank {
                    return None;
                }
                op *= dims[old_stop];
                old_stop += 1;
            }
        }

        // the grouped old axes must be contiguous in the requested order
        for k in old_start..old_stop - 1 {
            match order {
                Order::ColumnMajor => {
                    if strides[k + 1] != dims[k] * strides[k] {
                        return None;
                    }
                }
                Order::RowMajor => {
                    if strides[k] != dims[k + 1] * strides[k + 1] {
                        return None;
                    }
                }
            }
        }

        // accumulate the window's new strides from the boundary stride
        match order {
            Order::ColumnMajor => {
                new_strides[new_start] = strides[old_start];
                for nk in new_start + 1..new_stop {
                    new_strides[nk] = new_strides[nk - 1] * new_shape[nk - 1];
                }
            }
            Order::RowMajor => {
                new_strides[new_stop - 1] = strides[old_stop - 1];
                for nk in (new_start + 1..new_stop).rev() {
                    new_strides[nk - 1] = new_strides[nk] * new_shape[nk];
                }
            }
        }

        new_start = new_stop;
        new_stop += 1;
        old_start = old_stop;
        old_stop += 1;
    }

    // only unit axes may remain on either side; trailing unit axes of the
    // new shape inherit the final stride
    if old_start < old_rank {
        return None;
    }
    let tail_stride = if new_start > 0 {
        new_strides[new_start - 1]
    } else {
        1
    };
    for nk in new_start..new_rank {
        if new_shape[nk] != 1 {
            return None;
        }
        new_strides[nk] = tail_stride;
    }

    Some(new_strides)
}

impl ShapeDescriptor {
    /// Reinterpret this descriptor under `new_shape` without copying, using
    /// this descriptor's own order for axis grouping. The order, ews and
    /// flag word carry over verbatim.
    ///
    /// `None` means the layout is incompatible and the caller must copy.
    pub fn reshaped(&self, new_shape: &[i64]) -> Option<ShapeDescriptor> {
        if new_shape.len() > MAX_RANK || new_shape.iter().any(|&d| d < 0) {
            return None;
        }
        let strides = reshape_strides(&self.shape, &self.strides, new_shape, self.order)?;
        Some(ShapeDescriptor {
            shape: DimVec::from(new_shape),
            strides,
            order: self.order,
            ews: self.ews,
            extra: self.extra,
        })
    }
}
