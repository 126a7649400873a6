// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Axis permutation and dimension-argument preprocessing.

use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::itertools::enumerate;
use crate::ShapeDescriptor;

/// Verify that `rearrange` is a permutation of `0..rank`.
pub fn check_permutation(rearrange: &[usize], rank: usize) -> Result<(), ShapeError> {
    if rearrange.len() != rank {
        return Err(from_kind(ErrorKind::IncompatibleShape));
    }
    for (i, &axis) in enumerate(rearrange) {
        if axis >= rank {
            return Err(from_kind(ErrorKind::OutOfBounds));
        }
        if rearrange[..i].contains(&axis) {
            return Err(from_kind(ErrorKind::Unsupported));
        }
    }
    Ok(())
}

/// Preprocess a caller-supplied dimension list against `rank`: wrap negative
/// entries (`d` becomes `d + rank`), sort ascending, drop duplicates.
///
/// **Errors** on an empty list and on entries that remain out of range after
/// wrapping.
pub fn normalize_dimensions(rank: usize, dims: &[i64]) -> Result<Vec<usize>, ShapeError> {
    if dims.is_empty() {
        return Err(from_kind(ErrorKind::IncompatibleShape));
    }
    let mut normalized = Vec::with_capacity(dims.len());
    for &dim in dims {
        let dim = if dim < 0 { dim + rank as i64 } else { dim };
        if dim < 0 || dim >= rank as i64 {
            return Err(from_kind(ErrorKind::OutOfBounds));
        }
        normalized.push(dim as usize);
    }
    normalized.sort_unstable();
    normalized.dedup();
    Ok(normalized)
}

/// The permutation that moves the first `count` axes behind the rest:
/// `[count, count+1, …, rank-1, 0, 1, …, count-1]`.
pub fn cycle_axes_back(rank: usize, count: usize) -> Vec<usize> {
    debug_assert!(count <= rank);
    (count..rank).chain(0..count).collect()
}

/// Whether a dimension list is out of ascending order.
pub fn is_permuted(dims: &[i64]) -> bool {
    dims.windows(2).any(|w| w[0] > w[1])
}

impl ShapeDescriptor {
    /// Apply `rearrange` to shape and strides simultaneously:
    /// `shape[i]` becomes `shape[rearrange[i]]`, likewise for strides, and
    /// the canonical (order, ews) pair is re-derived.
    ///
    /// Length-1 descriptors and identity permutations return unchanged.
    /// An invalid `rearrange` (wrong length, out-of-range or duplicate
    /// entries) reports the failure and leaves the descriptor untouched.
    pub fn permute_axes(&mut self, rearrange: &[usize]) -> Result<(), ShapeError> {
        let len = self.length();
        // shapes like [1], [1, 1], ... need no permute
        if len == 1 {
            return Ok(());
        }
        check_permutation(rearrange, self.rank())?;
        if rearrange.iter().enumerate().all(|(i, &axis)| axis == i) {
            return Ok(());
        }

        let old_shape = self.shape.clone();
        let old_strides = self.strides.clone();
        for (i, &axis) in enumerate(rearrange) {
            self.shape[i] = old_shape[axis];
            self.strides[i] = old_strides[axis];
        }
        self.set_order_and_ews(Some(len));
        Ok(())
    }

    /// Reverse shape and strides and flip the order byte. The ews is left
    /// untouched.
    pub fn transpose(&mut self) {
        self.shape.reverse();
        self.strides.reverse();
        self.order = self.order.transpose();
    }
}
