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

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Format version stored in the first byte of every row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum HybridRowVersion {
    Invalid = 0,
    V1 = 0x81,
}

/// One-byte type tag that prefixes every sparse cell and every nested type argument.
///
/// Scope codes come in pairs; the odd member marks the immutable variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum LayoutCode {
    Invalid = 0,
    Null = 1,
    BooleanFalse = 2,
    Boolean = 3,
    Int8 = 5,
    Int16 = 6,
    Int32 = 7,
    Int64 = 8,
    UInt8 = 9,
    UInt16 = 10,
    UInt32 = 11,
    UInt64 = 12,
    VarInt = 13,
    VarUInt = 14,
    Float32 = 15,
    Float64 = 16,
    Decimal = 17,
    DateTime = 18,
    Guid = 19,
    Utf8 = 20,
    Binary = 21,
    Float128 = 22,
    UnixDateTime = 23,
    MongoDbObjectId = 24,
    ObjectScope = 30,
    ImmutableObjectScope = 31,
    ArrayScope = 32,
    ImmutableArrayScope = 33,
    TypedArrayScope = 34,
    ImmutableTypedArrayScope = 35,
    TupleScope = 36,
    ImmutableTupleScope = 37,
    TypedTupleScope = 38,
    ImmutableTypedTupleScope = 39,
    TypedMapScope = 42,
    ImmutableTypedMapScope = 43,
    TypedSetScope = 46,
    ImmutableTypedSetScope = 47,
    NullableScope = 48,
    ImmutableNullableScope = 49,
    TaggedScope = 50,
    ImmutableTaggedScope = 51,
    Tagged2Scope = 52,
    ImmutableTagged2Scope = 53,
    Schema = 68,
    ImmutableSchema = 69,
    EndScope = 70,
}

/// `format_version: u8` followed by a little-endian `i32` schema id.
pub const HEADER_SIZE: usize = 1 + 4;

/// Width of the element count that prefixes typed arrays, sets and maps.
pub const COUNT_SIZE: usize = 4;

pub const DECIMAL_SIZE: usize = 16;
pub const FLOAT128_SIZE: usize = 16;
pub const GUID_SIZE: usize = 16;
pub const DATE_TIME_SIZE: usize = 8;
pub const UNIX_DATE_TIME_SIZE: usize = 8;
pub const MONGODB_OBJECT_ID_SIZE: usize = 12;

/// Policy applied when a write lands on a position that may already hold a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum UpdateOptions {
    /// Fail with `Exists` if the target is occupied.
    Insert,
    /// Fail with `NotFound` if the target is empty.
    Update,
    /// Insert or overwrite.
    #[default]
    Upsert,
    /// Insert before the current element of an indexed scope, shifting it right.
    InsertAt,
}
