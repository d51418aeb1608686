// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Byte-level encoders and decoders for every value type a row can hold.
//!
//! Each value type implements [`LayoutCodec`]. The untagged form is used for
//! schematized columns and for elements of typed scopes; the tagged form is the
//! payload that follows a type code in a sparse cell. The two only differ for
//! booleans, whose tagged form lives entirely in the code.

mod bool;
mod datetime;
mod decimal;
mod float128;
mod guid;
mod number;
mod object_id;
mod string;
mod varint;

pub use datetime::UnixDateTime;
pub use decimal::Decimal;
pub use float128::Float128;
pub use object_id::MongoDbObjectId;
pub use varint::{VarInt, VarUInt};

pub(crate) use string::{read_len_prefixed, write_len_prefixed};

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::layout::LayoutType;
use crate::types::LayoutCode;

pub trait LayoutCodec<'a>: Sized {
    const LAYOUT_TYPE: LayoutType;

    /// Writes the untagged encoding. Fails for values the format cannot represent.
    fn encode(&self, writer: &mut Writer) -> Result<(), Error>;

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error>;

    /// Type code stored in front of a sparse cell holding this value.
    #[inline(always)]
    fn sparse_code(&self) -> LayoutCode {
        Self::LAYOUT_TYPE.code()
    }

    #[inline(always)]
    fn encode_tagged(&self, writer: &mut Writer) -> Result<(), Error> {
        self.encode(writer)
    }

    #[inline(always)]
    fn decode_tagged(code: LayoutCode, reader: &mut Reader<'a>) -> Result<Self, Error> {
        let _ = code;
        Self::decode(reader)
    }
}

/// The null value. Zero bytes in every encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Null;

impl<'a> LayoutCodec<'a> for Null {
    const LAYOUT_TYPE: LayoutType = LayoutType::Null;

    #[inline(always)]
    fn encode(&self, _writer: &mut Writer) -> Result<(), Error> {
        Ok(())
    }

    #[inline(always)]
    fn decode(_reader: &mut Reader<'a>) -> Result<Self, Error> {
        Ok(Null)
    }
}

/// Encodes `value` untagged into a fresh buffer.
pub fn to_bytes<'a, T: LayoutCodec<'a>>(value: &T) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::default();
    value.encode(&mut writer)?;
    Ok(writer.dump())
}

/// Decodes an untagged `T` from the front of `bytes`.
pub fn from_bytes<'a, T: LayoutCodec<'a>>(bytes: &'a [u8]) -> Result<T, Error> {
    T::decode(&mut Reader::new(bytes))
}
