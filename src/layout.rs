// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Layout classification: shape-class predicates, contiguity analysis and
//! the canonical (order, ews) derivation.

use crate::stride::strides_for;
use crate::{Order, ShapeDescriptor};

/// Whether `shape` describes a vector: rank 1, or rank 2 with one axis of
/// extent 1.
pub fn is_vector_shape(shape: &[i64]) -> bool {
    match shape.len() {
        1 => true,
        2 => shape[0] == 1 || shape[1] == 1,
        _ => false,
    }
}

/// Whether some single axis carries the whole element count.
pub fn one_dim_equals_length(shape: &[i64]) -> bool {
    let len: i64 = shape.iter().product();
    shape.iter().any(|&d| d == len)
}

/// Deduce the layout order from raw strides.
///
/// When the strides are contiguous in both orders at once (vectors,
/// length-1 arrays) the result is row major.
pub fn deduce_order(shape: &[i64], strides: &[i64]) -> Order {
    debug_assert_eq!(shape.len(), strides.len());

    let mut c_contiguous = true;
    let mut acc = 1;
    for i in (0..shape.len()).rev() {
        if strides[i] != acc {
            c_contiguous = false;
            break;
        }
        if shape[i] == 0 {
            break;
        }
        acc *= shape[i];
    }

    let mut f_contiguous = true;
    acc = 1;
    for i in 0..shape.len() {
        if strides[i] != acc {
            f_contiguous = false;
        }
        if shape[i] == 0 {
            break;
        }
        acc *= shape[i];
    }

    if f_contiguous && !c_contiguous {
        Order::ColumnMajor
    } else {
        Order::RowMajor
    }
}

/// The element-wise stride implied by raw shape/strides in `order`:
/// 1 when at most one element or contiguous, the single non-unity axis
/// stride for common vectors, otherwise 0.
pub fn element_wise_stride(shape: &[i64], strides: &[i64], order: Order) -> i64 {
    let len: i64 = shape.iter().product();
    ews_for(shape, strides, order, len)
}

pub(crate) fn ews_for(shape: &[i64], strides: &[i64], order: Order, len: i64) -> i64 {
    if len <= 1 {
        return 1;
    }
    if let Some(pos) = single_non_unity(shape) {
        return strides[pos];
    }
    if contiguous_in(shape, strides, order) {
        1
    } else {
        0
    }
}

/// Position of the only non-unity axis, if exactly one exists.
fn single_non_unity(shape: &[i64]) -> Option<usize> {
    let mut pos = None;
    for (i, &d) in shape.iter().enumerate() {
        if d != 1 {
            if pos.is_some() {
                return None;
            }
            pos = Some(i);
        }
    }
    pos
}

/// Whether the strides are the contiguous ones for `order`. Axes of extent 1
/// can carry any stride. Assumes at least two elements.
pub(crate) fn contiguous_in(shape: &[i64], strides: &[i64], order: Order) -> bool {
    let rank = shape.len();
    match order {
        Order::RowMajor => {
            if shape[rank - 1] != 1 && strides[rank - 1] != 1 {
                return false;
            }
            let mut acc = 1;
            for i in (0..rank - 1).rev() {
                acc *= shape[i + 1];
                if shape[i] == 1 {
                    continue;
                }
                if strides[i] != acc {
                    return false;
                }
            }
            true
        }
        Order::ColumnMajor => {
            if shape[0] != 1 && strides[0] != 1 {
                return false;
            }
            let mut acc = 1;
            for i in 1..rank {
                acc *= shape[i - 1];
                if shape[i] == 1 {
                    continue;
                }
                if strides[i] != acc {
                    return false;
                }
            }
            true
        }
    }
}

impl ShapeDescriptor {
    /// Rank 1, or rank 2 with one axis of extent 1.
    pub fn is_vector(&self) -> bool {
        is_vector_shape(&self.shape)
    }

    /// A vector whose first extent is 1.
    pub fn is_row_vector(&self) -> bool {
        self.is_vector() && self.shape[0] == 1
    }

    /// A vector whose first extent is not 1.
    pub fn is_column_vector(&self) -> bool {
        self.is_vector() && self.shape[0] != 1
    }

    /// A shape with at most one non-unity axis, at any rank; returns the
    /// position of that axis. Length-1 descriptors report position 0.
    pub fn is_common_vector(&self) -> Option<usize> {
        if self.rank() > 0 && self.length() == 1 {
            return Some(0);
        }
        let mut pos = None;
        let mut non_unity = 0;
        for (i, &d) in self.shape.iter().enumerate() {
            if d != 1 {
                non_unity += 1;
                pos = Some(i);
            }
        }
        if non_unity == 1 {
            pos
        } else {
            None
        }
    }

    /// Exactly one non-unity axis at rank greater than 2; returns its
    /// position.
    pub fn is_like_vector(&self) -> Option<usize> {
        if self.rank() <= 2 {
            return None;
        }
        let mut pos = None;
        let mut non_unity = 0;
        for (i, &d) in self.shape.iter().enumerate() {
            if d != 1 {
                non_unity += 1;
                pos = Some(i);
            }
        }
        if non_unity == 1 {
            pos
        } else {
            None
        }
    }

    /// Rank 2 with both extents larger than 1.
    pub fn is_matrix(&self) -> bool {
        self.rank() == 2 && self.shape[0] != 1 && self.shape[1] != 1
    }

    /// Rank 0, or shape `[1]`, or shape `[1, 1]`.
    pub fn is_scalar(&self) -> bool {
        match self.rank() {
            0 => true,
            1 => self.shape[0] == 1,
            2 => self.shape[0] == 1 && self.shape[1] == 1,
            _ => false,
        }
    }

    /// Row-major with a usable element-wise stride.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.order == Order::RowMajor && self.ews > 0
    }

    /// Strictly decreasing strides under row-major order, strictly
    /// increasing under column-major.
    pub fn strides_monotone(&self) -> bool {
        if self.rank() == 2 && self.is_row_vector() && self.strides[0] == 1 && self.strides[1] == 1
        {
            return true;
        }
        match self.order {
            Order::RowMajor => self.strides.windows(2).all(|w| w[0] > w[1]),
            Order::ColumnMajor => self.strides.windows(2).all(|w| w[0] < w[1]),
        }
    }

    /// Whether the strides equal what [`update_strides`] would produce for
    /// this shape and order.
    ///
    /// [`update_strides`]: ShapeDescriptor::update_strides
    pub fn has_default_strides(&self) -> bool {
        if self.rank() == 0 {
            return true;
        }
        if !self.strides_monotone() {
            return false;
        }
        self.strides == strides_for(&self.shape, self.order)
    }

    /// Recompute the ews from the current shape and strides, leaving the
    /// order alone. `len` short-circuits the length computation when the
    /// caller already knows it; `None` recomputes.
    pub fn set_ews(&mut self, len: Option<i64>) {
        let len = len.unwrap_or_else(|| self.length());
        self.ews = ews_for(&self.shape, &self.strides, self.order, len);
    }

    /// Derive the canonical (order, ews) pair from the current strides.
    ///
    /// Scalars, empty arrays and length-1 arrays get ews 1 with the order
    /// preserved; common vectors take the stride of their non-unity axis;
    /// otherwise c-contiguity wins over f-contiguity (so both-contiguous
    /// strides settle on row major), and incompatible strides keep the
    /// current order with ews 0.
    pub fn set_order_and_ews(&mut self, len: Option<i64>) {
        let len = len.unwrap_or_else(|| self.length());
        if len <= 1 {
            self.ews = 1;
            return;
        }
        if let Some(pos) = single_non_unity(&self.shape) {
            self.ews = self.strides[pos];
            return;
        }
        if contiguous_in(&self.shape, &self.strides, Order::RowMajor) {
            self.ews = 1;
            self.order = Order::RowMajor;
            return;
        }
        if contiguous_in(&self.shape, &self.strides, Order::ColumnMajor) {
            self.ews = 1;
            self.order = Order::ColumnMajor;
            return;
        }
        self.ews = 0;
    }
}
