// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sub-array enumeration and outer/inner projection.
//!
//! In broadcast and reduction contexts an outer ("max") array relates to an
//! inner ("min") array obtained by holding some of the outer axes fixed.
//! This module projects coordinates and indices from one onto the other and
//! enumerates, for a given inner element, every outer element that projects
//! onto it.
//!
//! `dims_to_exclude` is always sorted ascending (see
//! [`normalize_dimensions`](crate::permute::normalize_dimensions)). Passing
//! `None` means the leading `max_rank - min_rank` axes are the excluded
//! ones.

use crate::index::{coords_to_index, index_to_coords_into, offset_for};
use crate::offsets::offsets_raw;
use crate::{Order, ShapeDescriptor, MAX_RANK};

/// Project outer-array coordinates onto the inner array.
///
/// Excluded axes carry their coordinate through only in the equal-rank form
/// (they are dropped when the ranks differ); all other axes reduce
/// broadcast-style: an inner extent of 1 forces coordinate 0, and an outer
/// coordinate at or beyond the inner extent wraps modulo the extent.
pub fn project_to_inner(
    max_coords: &[i64],
    min_coords: &mut [i64],
    max: &ShapeDescriptor,
    min: &ShapeDescriptor,
    dims_to_exclude: Option<&[usize]>,
) {
    let max_rank = max.rank();
    let min_rank = min.rank();
    debug_assert!(min_rank <= max_rank);
    let dims_len = dims_to_exclude.map_or(max_rank - min_rank, <[usize]>::len);

    if max_rank == min_rank {
        match dims_to_exclude {
            None => {
                for i in 0..max_rank {
                    if i < dims_len {
                        min_coords[i] = max_coords[i];
                    } else {
                        min_coords[i] = wrap(max_coords[i], min.shape[i]);
                    }
                }
            }
            Some(dims) => {
                let mut dim = 0;
                for i in 0..max_rank {
                    if dim < dims_len && dims[dim] == i {
                        min_coords[i] = max_coords[i];
                        dim += 1;
                        continue;
                    }
                    min_coords[i] = wrap(max_coords[i], min.shape[i]);
                }
            }
        }
    } else {
        match dims_to_exclude {
            None => {
                for i in 0..min_rank {
                    min_coords[i] = wrap(max_coords[i + dims_len], min.shape[i]);
                }
            }
            Some(dims) => {
                let mut min_i = 0;
                let mut dim = 0;
                for max_i in 0..max_rank {
                    if dim < dims_len && dims[dim] == max_i {
                        dim += 1;
                        continue;
                    }
                    min_coords[min_i] = wrap(max_coords[max_i], min.shape[min_i]);
                    min_i += 1;
                }
            }
        }
    }
}

#[inline]
fn wrap(coord: i64, extent: i64) -> i64 {
    if coord > extent {
        coord % extent
    } else if coord == extent {
        0
    } else {
        coord
    }
}

/// The inner-array logical index corresponding to outer logical `max_idx`.
pub fn inner_index(
    max_idx: i64,
    max: &ShapeDescriptor,
    min: &ShapeDescriptor,
    dims_to_exclude: Option<&[usize]>,
) -> i64 {
    let mut max_coords = [0i64; MAX_RANK];
    let mut min_coords = [0i64; MAX_RANK];
    index_to_coords_into(max.shape(), max_idx, &mut max_coords[..max.rank()], max.order());
    project_to_inner(
        &max_coords[..max.rank()],
        &mut min_coords[..min.rank()],
        max,
        min,
        dims_to_exclude,
    );
    coords_to_index(min.shape(), &min_coords[..min.rank()], Order::RowMajor)
}

/// The inner-array buffer offset corresponding to outer logical `max_idx`.
pub fn inner_offset(
    max_idx: i64,
    max: &ShapeDescriptor,
    min: &ShapeDescriptor,
    dims_to_exclude: Option<&[usize]>,
) -> i64 {
    let mut max_coords = [0i64; MAX_RANK];
    let mut min_coords = [0i64; MAX_RANK];
    index_to_coords_into(max.shape(), max_idx, &mut max_coords[..max.rank()], max.order());
    project_to_inner(
        &max_coords[..max.rank()],
        &mut min_coords[..min.rank()],
        max,
        min,
        dims_to_exclude,
    );
    offset_for(0, min.shape(), min.strides(), &min_coords[..min.rank()])
}

/// Enumerate the logical indices of every outer element that projects onto
/// inner logical `min_idx`, writing them into `out` and returning the count.
///
/// `out` must hold `max.length() / min.length()` entries (more is fine).
pub fn outer_indexes(
    out: &mut [i64],
    min_idx: i64,
    max: &ShapeDescriptor,
    min: &ShapeDescriptor,
    dims_to_exclude: Option<&[usize]>,
) -> usize {
    let mut count = 0;
    enumerate_outer(min_idx, max, min, dims_to_exclude, |coords| {
        out[count] = coords_to_index(max.shape(), coords, Order::RowMajor);
        count += 1;
    });
    count
}

/// Enumerate the buffer offsets of every outer element that projects onto
/// inner logical `min_idx`, writing them into `out` and returning the count.
pub fn outer_offsets(
    out: &mut [i64],
    min_idx: i64,
    max: &ShapeDescriptor,
    min: &ShapeDescriptor,
    dims_to_exclude: Option<&[usize]>,
) -> usize {
    let mut count = 0;
    enumerate_outer(min_idx, max, min, dims_to_exclude, |coords| {
        out[count] = offset_for(0, max.shape(), max.strides(), coords);
        count += 1;
    });
    count
}

/// Odometer over the outer coordinates that project onto `min_idx`.
///
/// Excluded axes (and axes the two arrays share at full extent) run through
/// their whole range with step 1 / step 0 respectively; broadcast axes step
/// by the inner extent.
fn enumerate_outer(
    min_idx: i64,
    max: &ShapeDescriptor,
    min: &ShapeDescriptor,
    dims_to_exclude: Option<&[usize]>,
    mut emit: impl FnMut(&[i64]),
) {
    let rank_min = min.rank();
    let rank_max = max.rank();
    debug_assert!(rank_min <= rank_max);
    let diff = rank_max - rank_min;

    let mut indices = [0i64; MAX_RANK];
    let mut increment = [0i64; MAX_RANK];

    // per-axis inner coordinates of min_idx; reused in place as the running
    // outer coordinates
    index_to_coords_into(min.shape(), min_idx, &mut indices[..rank_min], min.order());

    match dims_to_exclude {
        None => {
            // excluded axes are the leading `diff` ones
            let mut min_i = rank_min;
            for max_i in (diff..rank_max).rev() {
                min_i -= 1;
                increment[max_i] = if max.shape[max_i] == min.shape[min_i] {
                    0
                } else {
                    min.shape[min_i]
                };
                indices[max_i] = indices[min_i];
            }
            for max_i in 0..diff {
                increment[max_i] = 1;
                indices[max_i] = 0;
            }
        }
        Some(dims) => {
            let mut dim = dims.len() as isize - 1;
            let mut min_i = rank_min as isize - 1;
            for max_i in (0..rank_max).rev() {
                if dim >= 0 && dims[dim as usize] == max_i {
                    increment[max_i] = 1;
                    indices[max_i] = 0;
                    dim -= 1;
                } else {
                    let mi = min_i as usize;
                    increment[max_i] = if max.shape[max_i] == min.shape[mi] {
                        0
                    } else {
                        min.shape[mi]
                    };
                    indices[max_i] = indices[mi];
                    min_i -= 1;
                }
            }
        }
    }

    emit(&indices[..rank_max]);

    let mut axis = rank_max as isize - 1;
    let mut step: isize = -1;
    while axis >= 0 {
        let ax = axis as usize;
        if increment[ax] != 0 {
            indices[ax] += increment[ax];
            if indices[ax] >= max.shape[ax] {
                // restore the initial value of this axis
                indices[ax] %= increment[ax];
                step = -1;
            } else {
                emit(&indices[..rank_max]);
                step = rank_max as isize - 1 - axis;
            }
        } else if ax == rank_max - 1 {
            step = -1;
        }
        axis += step;
    }
}

/// The number of elements of one tensor-along-dimension: the product of the
/// extents over `dims`.
pub fn tad_length(shape: &[i64], dims: &[usize]) -> i64 {
    dims.iter().map(|&d| shape[d]).product()
}

/// Stride of the rear-most axis left over after excluding `dims`.
///
/// The dimension list is sorted into a local copy first, so callers may
/// pass it in any order.
pub fn rear_leftover_stride(descriptor: &ShapeDescriptor, dims: &[usize]) -> Option<i64> {
    let mut sorted = [0usize; MAX_RANK];
    let len = dims.len().min(MAX_RANK);
    sorted[..len].copy_from_slice(&dims[..len]);
    let sorted = &mut sorted[..len];
    sorted.sort_unstable();
    (0..descriptor.rank())
        .rev()
        .find(|axis| sorted.binary_search(axis).is_err())
        .map(|axis| descriptor.strides[axis])
}

/// The shared shape of every sub-array obtained by holding the
/// `dims_to_exclude` axes of `whole` fixed, together with the buffer offset
/// of each sub-array.
///
/// Holding all axes (or none) degenerates to a clone of `whole` with a
/// single zero offset. With `keep_unities` false, the held axes are
/// collapsed out of the sub-array descriptor; otherwise they remain with
/// extent 1. Offsets enumerate the held axes in row-major order.
pub fn sub_arr_shape_and_offsets(
    whole: &ShapeDescriptor,
    dims_to_exclude: &[usize],
    keep_unities: bool,
) -> (ShapeDescriptor, Vec<i64>) {
    let rank = whole.rank();
    let dims_size = dims_to_exclude.len();

    if dims_size == rank || dims_size == 0 {
        return (whole.clone(), vec![0]);
    }

    let mut sub = whole.clone();
    let mut held_shape = [0i64; MAX_RANK];
    let mut held_strides = [0i64; MAX_RANK];
    let mut kept_shape = Vec::with_capacity(rank - dims_size);
    let mut sub_len = 1i64;

    let mut held = dims_size as isize - 1;
    for i in (0..rank).rev() {
        if held >= 0 && i == dims_to_exclude[held as usize] {
            held_shape[held as usize] = sub.shape[i];
            held_strides[held as usize] = sub.strides[i];
            sub.shape[i] = 1;
            held -= 1;
        } else {
            sub_len *= sub.shape[i];
            kept_shape.push(sub.shape[i]);
        }
    }
    kept_shape.reverse();

    sub.set_ews(Some(sub_len));

    let num_of_sub_arrs: i64 = held_shape[..dims_size].iter().product();
    let mut offsets = vec![0i64; num_of_sub_arrs.max(0) as usize];
    offsets_raw(
        &held_shape[..dims_size],
        &held_strides[..dims_size],
        &mut offsets,
        Order::RowMajor,
    );

    if !keep_unities && sub_len != 0 {
        let collapsed = sub
            .reshaped(&kept_shape)
            .expect("collapsing held unit axes is always a valid view");
        (collapsed, offsets)
    } else {
        (sub, offsets)
    }
}
