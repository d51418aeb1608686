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
use crate::types::GUID_SIZE;
use uuid::Uuid;

// Mixed-endian layout: the first three groups are little-endian.
impl<'a> LayoutCodec<'a> for Uuid {
    const LAYOUT_TYPE: LayoutType = LayoutType::Guid;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_bytes(&self.to_bytes_le());
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        let mut bytes = [0u8; GUID_SIZE];
        bytes.copy_from_slice(reader.read_bytes(GUID_SIZE)?);
        Ok(Uuid::from_bytes_le(bytes))
    }
}
