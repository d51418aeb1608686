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
use crate::types::LayoutCode;

impl<'a> LayoutCodec<'a> for bool {
    const LAYOUT_TYPE: LayoutType = LayoutType::Boolean;

    #[inline(always)]
    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_u8(u8::from(*self));
        Ok(())
    }

    #[inline(always)]
    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        Ok(reader.read_u8()? != 0)
    }

    #[inline(always)]
    fn sparse_code(&self) -> LayoutCode {
        if *self {
            LayoutCode::Boolean
        } else {
            LayoutCode::BooleanFalse
        }
    }

    #[inline(always)]
    fn encode_tagged(&self, _writer: &mut Writer) -> Result<(), Error> {
        Ok(())
    }

    fn decode_tagged(code: LayoutCode, _reader: &mut Reader<'a>) -> Result<Self, Error> {
        match code {
            LayoutCode::Boolean => Ok(true),
            LayoutCode::BooleanFalse => Ok(false),
            other => Err(Error::type_mismatch(format!(
                "expected a boolean code, found {:?}",
                other
            ))),
        }
    }
}
