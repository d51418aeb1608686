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
use crate::types::MONGODB_OBJECT_ID_SIZE;
use std::fmt;

/// A 12-byte MongoDB ObjectId, stored verbatim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MongoDbObjectId(pub [u8; MONGODB_OBJECT_ID_SIZE]);

impl MongoDbObjectId {
    pub fn as_bytes(&self) -> &[u8; MONGODB_OBJECT_ID_SIZE] {
        &self.0
    }
}

impl fmt::Display for MongoDbObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl<'a> LayoutCodec<'a> for MongoDbObjectId {
    const LAYOUT_TYPE: LayoutType = LayoutType::MongoDbObjectId;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        let mut bytes = [0u8; MONGODB_OBJECT_ID_SIZE];
        bytes.copy_from_slice(reader.read_bytes(MONGODB_OBJECT_ID_SIZE)?);
        Ok(MongoDbObjectId(bytes))
    }
}
