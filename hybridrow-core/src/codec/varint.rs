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

use crate::buffer::{Reader, Writer};
use crate::codec::LayoutCodec;
use crate::error::Error;
use crate::layout::LayoutType;

/// A signed integer stored as a zigzag LEB128 varint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarInt(pub i64);

/// An unsigned integer stored as a LEB128 varint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarUInt(pub u64);

impl<'a> LayoutCodec<'a> for VarInt {
    const LAYOUT_TYPE: LayoutType = LayoutType::VarInt;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_varint64(self.0);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        Ok(VarInt(reader.read_varint64()?))
    }
}

impl<'a> LayoutCodec<'a> for VarUInt {
    const LAYOUT_TYPE: LayoutType = LayoutType::VarUInt;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_varuint64(self.0);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        Ok(VarUInt(reader.read_varuint64()?))
    }
}
