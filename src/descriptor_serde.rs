// Copyright 2026 ndshape developers.
//
// Licensed under the Apache License, Version 2.0 or the MIT license, at
// your option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Serde support for descriptors, through the packed integer image.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ShapeDescriptor;

/// **Requires crate feature `"serde"`**
impl Serialize for ShapeDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let packed = self.to_packed();
        let mut seq = serializer.serialize_seq(Some(packed.len()))?;
        for word in &packed {
            seq.serialize_element(word)?;
        }
        seq.end()
    }
}

struct PackedVisitor;

impl<'de> Visitor<'de> for PackedVisitor {
    type Value = ShapeDescriptor;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a packed shape descriptor (sequence of i64)")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut packed: Vec<i64> = Vec::with_capacity(seq.size_hint().unwrap_or(4));
        while let Some(word) = seq.next_element()? {
            packed.push(word);
        }
        ShapeDescriptor::from_packed(&packed).map_err(de::Error::custom)
    }
}

/// **Requires crate feature `"serde"`**
impl<'de> Deserialize<'de> for ShapeDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<ShapeDescriptor, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(PackedVisitor)
    }
}
