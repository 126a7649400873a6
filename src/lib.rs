// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `ndshape` crate provides shape and stride metadata for n-dimensional
//! arrays, without the arrays themselves.
//!
//! - [`ShapeDescriptor`]: the metadata record — shape, strides, iteration
//!   [`Order`], element-wise stride and an opaque flag word per array.
//! - [`stride`]: row- and column-major stride synthesis.
//! - [`layout`]: contiguity and shape-class predicates, canonical
//!   (order, ews) derivation.
//! - [`index`]: conversion between linear indices, coordinate tuples and
//!   buffer offsets.
//! - [`permute`], [`reshape`]: in-place axis permutation and copy-free
//!   reshape of descriptors.
//! - [`subarray`]: enumeration of sub-array shapes and offsets when some
//!   axes are held fixed, and projection between broadcast-related arrays.
//! - [`offsets`]: precomputed per-element offset tables for one, two or
//!   three co-iterated arrays.
//! - [`packed`]: the flat `2·rank + 4` integer image used at external
//!   boundaries.
//!
//! Descriptors are plain values: cheap to clone, immutable once published,
//! mutated only through the explicit in-place transforms. All algorithms are
//! CPU-only and complete in time proportional to the rank or the length of
//! the array they describe.
//!
//! ## Crate Feature Flags
//!
//! The following crate feature flags are available. They are configured in
//! your `Cargo.toml`.
//!
//! - `serde`
//!   - Optional, compatible with Rust stable
//!   - Enables serialization of [`ShapeDescriptor`] through its packed
//!     integer image
//! - `rayon`
//!   - Optional, compatible with Rust stable
//!   - Lets the multi-array offset batcher compute independent offset
//!     tables on the rayon thread pool

#[macro_use]
mod itertools;

mod descriptor;
mod dimvec;
mod error;
mod flags;
mod order;

pub mod index;
pub mod layout;
pub mod offsets;
pub mod packed;
pub mod permute;
pub mod reshape;
pub mod stride;
pub mod subarray;

#[cfg(feature = "serde")]
mod descriptor_serde;

pub use crate::descriptor::ShapeDescriptor;
pub use crate::dimvec::DimVec;
pub use crate::error::{ErrorKind, ShapeError};
pub use crate::flags::{ArrayFlags, DataType};
pub use crate::order::Order;

/// The highest rank a descriptor may have.
///
/// The bound keeps coordinate and odometer scratch on the stack; every
/// constructor and the packed decoder reject shapes with more axes.
pub const MAX_RANK: usize = 32;
