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

/// An opaque IEEE 754 binary128 value held as two 64-bit halves.
///
/// The row only stores and compares the bits; no arithmetic is provided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Float128 {
    pub high: i64,
    pub low: i64,
}

impl Float128 {
    pub fn new(high: i64, low: i64) -> Float128 {
        Float128 { high, low }
    }
}

impl<'a> LayoutCodec<'a> for Float128 {
    const LAYOUT_TYPE: LayoutType = LayoutType::Float128;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_i64(self.low);
        writer.write_i64(self.high);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        let low = reader.read_i64()?;
        let high = reader.read_i64()?;
        Ok(Float128 { high, low })
    }
}
