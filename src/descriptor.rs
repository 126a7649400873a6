// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::dimvec::DimVec;
use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::flags::{ArrayFlags, DataType};
use crate::order::Order;
use crate::stride;
use crate::MAX_RANK;

/// Shape and stride metadata for one n-dimensional array.
///
/// A descriptor carries everything the index arithmetic needs and nothing
/// about the element buffer itself: per-axis extents, per-axis strides (in
/// elements, signed — negative strides denote reversed views), the iteration
/// [`Order`], the element-wise stride (`ews`, 0 when no uniform stride
/// exists) and the opaque [`ArrayFlags`] word.
///
/// Descriptors are treated as immutable once published; the constructors and
/// the explicit in-place transforms (`update_strides`, `permute_axes`,
/// `transpose`, `set_ews`, `set_order_and_ews`, `mark_empty`) are the only
/// mutators. `==` compares the entire record — rank, shape, strides, order,
/// ews and flags; see [`same_shape`](ShapeDescriptor::same_shape) for the
/// weaker comparisons.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeDescriptor {
    pub(crate) shape: DimVec,
    pub(crate) strides: DimVec,
    pub(crate) order: Order,
    pub(crate) ews: i64,
    pub(crate) extra: ArrayFlags,
}

impl ShapeDescriptor {
    /// A descriptor with default row-major strides for `shape`.
    ///
    /// **Errors** if the rank exceeds [`MAX_RANK`](crate::MAX_RANK), any
    /// extent is negative, or the element count overflows `i64`.
    pub fn row_major(shape: &[i64], dtype: DataType) -> Result<ShapeDescriptor, ShapeError> {
        Self::with_order(shape, Order::RowMajor, dtype)
    }

    /// A descriptor with default column-major strides for `shape`.
    ///
    /// Errors as [`row_major`](ShapeDescriptor::row_major).
    pub fn column_major(shape: &[i64], dtype: DataType) -> Result<ShapeDescriptor, ShapeError> {
        Self::with_order(shape, Order::ColumnMajor, dtype)
    }

    fn with_order(shape: &[i64], order: Order, dtype: DataType) -> Result<ShapeDescriptor, ShapeError> {
        check_shape(shape)?;
        let strides = stride::strides_for(shape, order);
        let mut descriptor = ShapeDescriptor {
            shape: DimVec::from(shape),
            strides,
            order,
            ews: 0,
            extra: ArrayFlags::new(dtype),
        };
        descriptor.set_order_and_ews(None);
        Ok(descriptor)
    }

    /// A descriptor over caller-provided strides.
    ///
    /// The canonical (order, ews) pair is derived from the strides; the
    /// `order` argument only breaks ties when the strides fit neither
    /// layout.
    pub fn with_strides(
        shape: &[i64],
        strides: &[i64],
        order: Order,
        dtype: DataType,
    ) -> Result<ShapeDescriptor, ShapeError> {
        check_shape(shape)?;
        if strides.len() != shape.len() {
            return Err(from_kind(ErrorKind::IncompatibleShape));
        }
        let mut descriptor = ShapeDescriptor {
            shape: DimVec::from(shape),
            strides: DimVec::from(strides),
            order,
            ews: 0,
            extra: ArrayFlags::new(dtype),
        };
        descriptor.set_order_and_ews(None);
        Ok(descriptor)
    }

    /// The canonical rank-0 scalar descriptor.
    pub fn scalar(dtype: DataType) -> ShapeDescriptor {
        ShapeDescriptor {
            shape: DimVec::default(),
            strides: DimVec::default(),
            order: Order::RowMajor,
            ews: 1,
            extra: ArrayFlags::new(dtype),
        }
    }

    /// A rank-0 descriptor with the EMPTY flag set; its length is 0.
    pub fn empty_scalar(dtype: DataType) -> ShapeDescriptor {
        let mut descriptor = Self::scalar(dtype);
        descriptor.extra.set_empty();
        descriptor
    }

    /// The legacy scalar form: a rank-2 descriptor of shape `1 × 1`.
    ///
    /// Some external descriptor producers still emit scalars this way; the
    /// rank-0 form from [`scalar`](ShapeDescriptor::scalar) is canonical.
    /// Both satisfy [`is_scalar`](ShapeDescriptor::is_scalar), so callers
    /// never need to know which form is in use.
    pub fn scalar_like_matrix(dtype: DataType, order: Order) -> ShapeDescriptor {
        ShapeDescriptor {
            shape: DimVec::from([1, 1]),
            strides: DimVec::from([1, 1]),
            order,
            ews: 1,
            extra: ArrayFlags::new(dtype),
        }
    }

    /// Build a descriptor from an already-parsed npy header: the shape and
    /// the fortran-order flag. The data type defaults to `float32`.
    pub fn from_npy(shape: &[i64], fortran_order: bool) -> Result<ShapeDescriptor, ShapeError> {
        if fortran_order {
            Self::column_major(shape, DataType::Float32)
        } else {
            Self::row_major(shape, DataType::Float32)
        }
    }

    /// Number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Extents along each axis.
    #[inline]
    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    /// Per-axis steps in buffer elements.
    #[inline]
    pub fn strides(&self) -> &[i64] {
        &self.strides
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// The element-wise stride: `s > 0` asserts that walking logical index
    /// `0..length` in this descriptor's order visits buffer positions
    /// `0, s, 2s, …`; 0 means no such uniform stride exists.
    #[inline]
    pub fn ews(&self) -> i64 {
        self.ews
    }

    /// The opaque flag word.
    #[inline]
    pub fn extra(&self) -> ArrayFlags {
        self.extra
    }

    /// Set the EMPTY flag; the logical length becomes 0 for rank 0.
    pub fn mark_empty(&mut self) {
        self.extra.set_empty();
    }

    /// The extent along `axis`; negative axes count from the back.
    /// Rank-0 descriptors report 1 for every axis.
    ///
    /// **Panics** if the axis is out of bounds.
    pub fn dim(&self, axis: isize) -> i64 {
        if self.rank() == 0 {
            return 1;
        }
        let ix = if axis < 0 {
            self.rank() as isize + axis
        } else {
            axis
        };
        self.shape[ix as usize]
    }

    /// Number of elements described: the product of the extents, or 0 for
    /// an empty array (zero extent, or the EMPTY flag on rank 0).
    pub fn length(&self) -> i64 {
        if self.rank() == 0 {
            return if self.extra.is_empty() { 0 } else { 1 };
        }
        self.shape.iter().product()
    }

    /// Whether the EMPTY flag is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extra.is_empty()
    }

    /// Soft comparison: rank and shape only; strides, ews, order and flags
    /// are ignored.
    pub fn same_shape(&self, other: &ShapeDescriptor) -> bool {
        self.shape == other.shape
    }

    /// Soft comparison plus the extra word (flags and data type).
    pub fn same_shape_and_type(&self, other: &ShapeDescriptor) -> bool {
        self.same_shape(other) && self.extra == other.extra
    }

    /// Rank, shape and strides equal; ews, order and flags are ignored.
    pub fn same_shape_and_strides(&self, other: &ShapeDescriptor) -> bool {
        self.shape == other.shape && self.strides == other.strides
    }
}

fn check_shape(shape: &[i64]) -> Result<(), ShapeError> {
    if shape.len() > MAX_RANK {
        return Err(from_kind(ErrorKind::OutOfBounds));
    }
    for &d in shape {
        if d < 0 {
            return Err(from_kind(ErrorKind::Unsupported));
        }
    }
    // the product of non-zero extents must not overflow i64
    shape
        .iter()
        .filter(|&&d| d != 0)
        .try_fold(1i64, |acc, &d| acc.checked_mul(d))
        .map(|_| ())
        .ok_or_else(|| from_kind(ErrorKind::Overflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_basics() {
        let d = ShapeDescriptor::row_major(&[2, 3, 4], DataType::Float32).unwrap();
        assert_eq!(d.rank(), 3);
        assert_eq!(d.shape(), &[2, 3, 4]);
        assert_eq!(d.strides(), &[12, 4, 1]);
        assert_eq!(d.order(), Order::RowMajor);
        assert_eq!(d.ews(), 1);
        assert_eq!(d.length(), 24);
        assert!(!d.is_empty());
    }

    #[test]
    fn column_major_basics() {
        let d = ShapeDescriptor::column_major(&[2, 3, 4], DataType::Float64).unwrap();
        assert_eq!(d.strides(), &[1, 2, 6]);
        assert_eq!(d.order(), Order::ColumnMajor);
        assert_eq!(d.ews(), 1);
        assert_eq!(d.length(), 24);
    }

    #[test]
    fn scalar_forms() {
        let s0 = ShapeDescriptor::scalar(DataType::Int32);
        assert_eq!(s0.rank(), 0);
        assert_eq!(s0.length(), 1);
        assert_eq!(s0.dim(0), 1);

        let s2 = ShapeDescriptor::scalar_like_matrix(DataType::Int32, Order::RowMajor);
        assert_eq!(s2.rank(), 2);
        assert_eq!(s2.length(), 1);
        assert!(s2.is_scalar());
        assert!(s0.is_scalar());

        let empty = ShapeDescriptor::empty_scalar(DataType::Int32);
        assert_eq!(empty.length(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn zero_extent_means_empty_length() {
        let d = ShapeDescriptor::row_major(&[2, 0, 4], DataType::Float32).unwrap();
        assert_eq!(d.length(), 0);
        // the EMPTY flag is a separate signal
        assert!(!d.is_empty());
    }

    #[test]
    fn construction_errors() {
        let kind = |r: Result<ShapeDescriptor, ShapeError>| r.unwrap_err().kind();
        assert_eq!(
            kind(ShapeDescriptor::row_major(&[2, -1], DataType::Bool)),
            ErrorKind::Unsupported
        );
        assert_eq!(
            kind(ShapeDescriptor::row_major(&[1; 33], DataType::Bool)),
            ErrorKind::OutOfBounds
        );
        assert_eq!(
            kind(ShapeDescriptor::row_major(&[i64::MAX, 3], DataType::Bool)),
            ErrorKind::Overflow
        );
        assert_eq!(
            kind(ShapeDescriptor::with_strides(&[2, 3], &[3], Order::C, DataType::Bool)),
            ErrorKind::IncompatibleShape
        );
    }

    #[test]
    fn dim_counts_from_the_back() {
        let d = ShapeDescriptor::row_major(&[2, 3, 4], DataType::Float32).unwrap();
        assert_eq!(d.dim(-1), 4);
        assert_eq!(d.dim(-3), 2);
        assert_eq!(d.dim(1), 3);
    }

    #[test]
    fn equality_trio() {
        let a = ShapeDescriptor::row_major(&[2, 3], DataType::Float32).unwrap();
        let b = ShapeDescriptor::column_major(&[2, 3], DataType::Float32).unwrap();
        let c = ShapeDescriptor::row_major(&[2, 3], DataType::Int8).unwrap();

        // soft: shapes agree
        assert!(a.same_shape(&b));
        assert!(a.same_shape(&c));
        // typed soft: flags must agree too
        assert!(!a.same_shape_and_type(&c));
        assert!(a.same_shape_and_type(&b));
        // strict
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, a.clone());
        // strict implies soft
        assert!(a.same_shape(&a.clone()));
    }

    #[test]
    fn with_strides_derives_canonical_layout() {
        // f-contiguous strides flip the order even when 'c' is requested
        let d =
            ShapeDescriptor::with_strides(&[2, 3], &[1, 2], Order::RowMajor, DataType::Float32)
                .unwrap();
        assert_eq!(d.order(), Order::ColumnMajor);
        assert_eq!(d.ews(), 1);

        // strides that fit neither layout keep the requested order, ews 0
        let d =
            ShapeDescriptor::with_strides(&[2, 3], &[1, 4], Order::RowMajor, DataType::Float32)
                .unwrap();
        assert_eq!(d.order(), Order::RowMajor);
        assert_eq!(d.ews(), 0);
    }
}
