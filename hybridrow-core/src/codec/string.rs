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

/// Reads a varuint length prefix followed by that many bytes.
pub(crate) fn read_len_prefixed<'a>(reader: &mut Reader<'a>) -> Result<&'a [u8], Error> {
    let len = reader.read_varuint64()?;
    let len = usize::try_from(len)
        .map_err(|_| Error::invalid_row(format!("length prefix {} is too large", len)))?;
    reader.read_bytes(len)
}

pub(crate) fn write_len_prefixed(writer: &mut Writer, bytes: &[u8]) {
    writer.write_varuint64(bytes.len() as u64);
    writer.write_bytes(bytes);
}

impl<'a> LayoutCodec<'a> for &'a str {
    const LAYOUT_TYPE: LayoutType = LayoutType::Utf8;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        write_len_prefixed(writer, self.as_bytes());
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        std::str::from_utf8(read_len_prefixed(reader)?)
            .map_err(|e| Error::invalid_row(format!("invalid utf-8 string: {}", e)))
    }
}

impl<'a> LayoutCodec<'a> for String {
    const LAYOUT_TYPE: LayoutType = LayoutType::Utf8;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        write_len_prefixed(writer, self.as_bytes());
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        <&'a str as LayoutCodec<'a>>::decode(reader).map(str::to_string)
    }
}

impl<'a> LayoutCodec<'a> for &'a [u8] {
    const LAYOUT_TYPE: LayoutType = LayoutType::Binary;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        write_len_prefixed(writer, self);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        read_len_prefixed(reader)
    }
}

impl<'a> LayoutCodec<'a> for Vec<u8> {
    const LAYOUT_TYPE: LayoutType = LayoutType::Binary;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        write_len_prefixed(writer, self);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        read_len_prefixed(reader).map(<[u8]>::to_vec)
    }
}
