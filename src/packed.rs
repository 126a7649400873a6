// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The flat integer image of a descriptor.
//!
//! At external boundaries a descriptor of rank `R` is `2·R + 4` signed
//! 64-bit words, native endian:
//!
//! ```text
//! index        meaning
//! 0            rank
//! 1 ..= R      shape
//! R+1 ..= 2R   strides
//! 2R+1         extra flag word
//! 2R+2         element-wise stride (0 = none)
//! 2R+3         order byte, 99 ('c') or 102 ('f')
//! ```
//!
//! The rank-0 scalar image is the 4 words `[0, extra, ews, order]`.
//! Decoding validates everything it reads; encoding of a valid descriptor
//! cannot fail.

use crate::dimvec::DimVec;
use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::flags::ArrayFlags;
use crate::order::Order;
use crate::{ShapeDescriptor, MAX_RANK};

/// Number of packed words for a descriptor of rank `rank`.
#[inline]
pub const fn len_for_rank(rank: usize) -> usize {
    2 * rank + 4
}

/// Number of packed bytes for a descriptor of rank `rank`.
#[inline]
pub const fn byte_len_for_rank(rank: usize) -> usize {
    len_for_rank(rank) * std::mem::size_of::<i64>()
}

impl ShapeDescriptor {
    /// Number of words in this descriptor's packed image.
    #[inline]
    pub fn packed_len(&self) -> usize {
        len_for_rank(self.rank())
    }

    /// The packed image as a fresh vector.
    pub fn to_packed(&self) -> Vec<i64> {
        let mut out = vec![0i64; self.packed_len()];
        self.write_packed(&mut out);
        out
    }

    /// Zero-allocation form of [`to_packed`](ShapeDescriptor::to_packed).
    ///
    /// **Panics** if `out` is not exactly `2·rank + 4` words.
    pub fn write_packed(&self, out: &mut [i64]) {
        let rank = self.rank();
        assert_eq!(
            out.len(),
            len_for_rank(rank),
            "packed image of rank {} needs {} words",
            rank,
            len_for_rank(rank)
        );
        out[0] = rank as i64;
        out[1..=rank].copy_from_slice(&self.shape);
        out[rank + 1..=2 * rank].copy_from_slice(&self.strides);
        out[2 * rank + 1] = self.extra.bits();
        out[2 * rank + 2] = self.ews;
        out[2 * rank + 3] = self.order.to_byte();
    }

    /// Decode a packed image, validating rank, length, extents and the
    /// order byte.
    pub fn from_packed(buf: &[i64]) -> Result<ShapeDescriptor, ShapeError> {
        if buf.len() < len_for_rank(0) {
            return Err(from_kind(ErrorKind::IncompatibleShape));
        }
        let rank = buf[0];
        if rank < 0 || rank as usize > MAX_RANK {
            return Err(from_kind(ErrorKind::OutOfBounds));
        }
        let rank = rank as usize;
        if buf.len() != len_for_rank(rank) {
            return Err(from_kind(ErrorKind::IncompatibleShape));
        }
        let shape = &buf[1..=rank];
        if shape.iter().any(|&d| d < 0) {
            return Err(from_kind(ErrorKind::Unsupported));
        }
        let ews = buf[2 * rank + 2];
        if ews < 0 {
            return Err(from_kind(ErrorKind::Unsupported));
        }
        let order =
            Order::from_byte(buf[2 * rank + 3]).ok_or_else(|| from_kind(ErrorKind::Unsupported))?;
        Ok(ShapeDescriptor {
            shape: DimVec::from(shape),
            strides: DimVec::from(&buf[rank + 1..=2 * rank]),
            order,
            ews,
            extra: ArrayFlags::from_bits(buf[2 * rank + 1]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;

    #[test]
    fn lengths() {
        assert_eq!(len_for_rank(0), 4);
        assert_eq!(len_for_rank(3), 10);
        assert_eq!(byte_len_for_rank(3), 80);
    }

    #[test]
    fn packed_layout_of_a_cube() {
        let d = ShapeDescriptor::row_major(&[2, 3, 4], DataType::Float32).unwrap();
        let packed = d.to_packed();
        let extra = d.extra().bits();
        assert_eq!(packed, vec![3, 2, 3, 4, 12, 4, 1, extra, 1, 99]);
    }

    #[test]
    fn roundtrip() {
        let mut d = ShapeDescriptor::column_major(&[2, 3, 4], DataType::Int16).unwrap();
        d.permute_axes(&[2, 0, 1]).unwrap();
        let back = ShapeDescriptor::from_packed(&d.to_packed()).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn scalar_images() {
        let s = ShapeDescriptor::scalar(DataType::Float32);
        let packed = s.to_packed();
        assert_eq!(packed.len(), 4);
        assert_eq!(packed[0], 0);
        assert_eq!(packed[2], 1);
        assert_eq!(packed[3], 99);
        assert_eq!(ShapeDescriptor::from_packed(&packed).unwrap(), s);

        // the legacy 8-word 1x1 form
        let legacy = ShapeDescriptor::scalar_like_matrix(DataType::Float32, Order::RowMajor);
        let packed = legacy.to_packed();
        let extra = legacy.extra().bits();
        assert_eq!(packed, vec![2, 1, 1, 1, 1, extra, 1, 99]);
        let back = ShapeDescriptor::from_packed(&packed).unwrap();
        assert!(back.is_scalar());
    }

    #[test]
    fn order_byte_97_decodes_to_row_major() {
        let mut packed = ShapeDescriptor::row_major(&[5], DataType::Float32)
            .unwrap()
            .to_packed();
        packed[5] = 97;
        let d = ShapeDescriptor::from_packed(&packed).unwrap();
        assert_eq!(d.order(), Order::RowMajor);
    }

    #[test]
    fn malformed_images_are_rejected() {
        let kind = |buf: &[i64]| ShapeDescriptor::from_packed(buf).unwrap_err().kind();
        assert_eq!(kind(&[]), ErrorKind::IncompatibleShape);
        assert_eq!(kind(&[1, 2, 1, 0]), ErrorKind::IncompatibleShape); // wrong total length
        assert_eq!(kind(&[-1, 0, 1, 99]), ErrorKind::OutOfBounds);
        assert_eq!(kind(&[33, 0, 1, 99]), ErrorKind::OutOfBounds);
        assert_eq!(kind(&[1, -2, 1, 0, 1, 99]), ErrorKind::Unsupported); // negative extent
        assert_eq!(kind(&[1, 2, 1, 0, -1, 99]), ErrorKind::Unsupported); // negative ews
        assert_eq!(kind(&[1, 2, 1, 0, 1, 100]), ErrorKind::Unsupported); // bad order byte
    }
}
