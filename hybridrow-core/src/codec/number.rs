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

macro_rules! impl_num_codec {
    ($ty:ty, $writer:expr, $reader:expr, $layout_type:expr) => {
        impl<'a> LayoutCodec<'a> for $ty {
            const LAYOUT_TYPE: LayoutType = $layout_type;

            #[inline(always)]
            fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
                $writer(writer, *self);
                Ok(())
            }

            #[inline(always)]
            fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
                $reader(reader)
            }
        }
    };
}

impl_num_codec!(i8, Writer::write_i8, Reader::read_i8, LayoutType::Int8);
impl_num_codec!(i16, Writer::write_i16, Reader::read_i16, LayoutType::Int16);
impl_num_codec!(i32, Writer::write_i32, Reader::read_i32, LayoutType::Int32);
impl_num_codec!(i64, Writer::write_i64, Reader::read_i64, LayoutType::Int64);
impl_num_codec!(u8, Writer::write_u8, Reader::read_u8, LayoutType::UInt8);
impl_num_codec!(u16, Writer::write_u16, Reader::read_u16, LayoutType::UInt16);
impl_num_codec!(u32, Writer::write_u32, Reader::read_u32, LayoutType::UInt32);
impl_num_codec!(u64, Writer::write_u64, Reader::read_u64, LayoutType::UInt64);
impl_num_codec!(f32, Writer::write_f32, Reader::read_f32, LayoutType::Float32);
impl_num_codec!(f64, Writer::write_f64, Reader::read_f64, LayoutType::Float64);
