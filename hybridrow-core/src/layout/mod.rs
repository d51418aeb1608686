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

//! Resolved schema metadata consumed by the row engine.
//!
//! A [`Layout`] describes one user-defined type: its presence bitmask, the fixed
//! and variable columns at the front of the scope, and the sparse columns whose
//! paths are tokenized. Layouts are produced by an external schema resolver and
//! never change once built.

mod builder;
mod resolver;
mod tokenizer;

pub use builder::LayoutBuilder;
pub use resolver::{LayoutResolver, SimpleLayoutResolver};
pub use tokenizer::StringTokenizer;

use crate::error::Error;
use crate::types::{
    LayoutCode, DATE_TIME_SIZE, DECIMAL_SIZE, FLOAT128_SIZE, GUID_SIZE, MONGODB_OBJECT_ID_SIZE,
    UNIX_DATE_TIME_SIZE,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of a schema within a resolver namespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub i32);

impl SchemaId {
    pub const INVALID: SchemaId = SchemaId(0);

    pub fn id(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of structured container a scope cell holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Object,
    Array,
    TypedArray,
    TypedSet,
    TypedMap,
    Tuple,
    TypedTuple,
    Tagged,
    Tagged2,
    Nullable,
    Udt,
}

impl ScopeKind {
    /// Children carry no type code; their type comes from the scope's arguments.
    pub fn is_typed(self) -> bool {
        matches!(
            self,
            ScopeKind::TypedArray
                | ScopeKind::TypedSet
                | ScopeKind::TypedMap
                | ScopeKind::TypedTuple
                | ScopeKind::Tagged
                | ScopeKind::Tagged2
                | ScopeKind::Nullable
        )
    }

    /// Content is prefixed by a 4-byte element count.
    pub fn is_counted(self) -> bool {
        matches!(
            self,
            ScopeKind::TypedArray | ScopeKind::TypedSet | ScopeKind::TypedMap
        )
    }

    /// One slot per type argument; slots are overwritten, never inserted or removed.
    pub fn is_fixed_arity(self) -> bool {
        matches!(
            self,
            ScopeKind::Tuple
                | ScopeKind::TypedTuple
                | ScopeKind::Tagged
                | ScopeKind::Tagged2
                | ScopeKind::Nullable
        )
    }

    /// Children are kept sorted and deduplicated.
    pub fn is_unique(self) -> bool {
        matches!(self, ScopeKind::TypedSet | ScopeKind::TypedMap)
    }

    /// Children are addressed by path rather than position.
    pub fn has_named_children(self) -> bool {
        matches!(self, ScopeKind::Object | ScopeKind::Udt)
    }

    /// Content ends with an EndScope code.
    pub fn is_end_terminated(self) -> bool {
        matches!(
            self,
            ScopeKind::Object | ScopeKind::Array | ScopeKind::Tuple | ScopeKind::Udt
        )
    }

    fn codes(self) -> (LayoutCode, LayoutCode) {
        match self {
            ScopeKind::Object => (LayoutCode::ObjectScope, LayoutCode::ImmutableObjectScope),
            ScopeKind::Array => (LayoutCode::ArrayScope, LayoutCode::ImmutableArrayScope),
            ScopeKind::TypedArray => (
                LayoutCode::TypedArrayScope,
                LayoutCode::ImmutableTypedArrayScope,
            ),
            ScopeKind::TypedSet => (
                LayoutCode::TypedSetScope,
                LayoutCode::ImmutableTypedSetScope,
            ),
            ScopeKind::TypedMap => (
                LayoutCode::TypedMapScope,
                LayoutCode::ImmutableTypedMapScope,
            ),
            ScopeKind::Tuple => (LayoutCode::TupleScope, LayoutCode::ImmutableTupleScope),
            ScopeKind::TypedTuple => (
                LayoutCode::TypedTupleScope,
                LayoutCode::ImmutableTypedTupleScope,
            ),
            ScopeKind::Tagged => (LayoutCode::TaggedScope, LayoutCode::ImmutableTaggedScope),
            ScopeKind::Tagged2 => (
                LayoutCode::Tagged2Scope,
                LayoutCode::ImmutableTagged2Scope,
            ),
            ScopeKind::Nullable => (
                LayoutCode::NullableScope,
                LayoutCode::ImmutableNullableScope,
            ),
            ScopeKind::Udt => (LayoutCode::Schema, LayoutCode::ImmutableSchema),
        }
    }
}

/// Closed set of value and scope types a cell or column can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutType {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    VarInt,
    VarUInt,
    Float32,
    Float64,
    Float128,
    Decimal,
    DateTime,
    UnixDateTime,
    Guid,
    MongoDbObjectId,
    Utf8,
    Binary,
    Scope { kind: ScopeKind, immutable: bool },
    EndScope,
}

impl LayoutType {
    pub const fn scope(kind: ScopeKind) -> LayoutType {
        LayoutType::Scope {
            kind,
            immutable: false,
        }
    }

    pub const fn immutable_scope(kind: ScopeKind) -> LayoutType {
        LayoutType::Scope {
            kind,
            immutable: true,
        }
    }

    pub fn code(self) -> LayoutCode {
        match self {
            LayoutType::Null => LayoutCode::Null,
            LayoutType::Boolean => LayoutCode::Boolean,
            LayoutType::Int8 => LayoutCode::Int8,
            LayoutType::Int16 => LayoutCode::Int16,
            LayoutType::Int32 => LayoutCode::Int32,
            LayoutType::Int64 => LayoutCode::Int64,
            LayoutType::UInt8 => LayoutCode::UInt8,
            LayoutType::UInt16 => LayoutCode::UInt16,
            LayoutType::UInt32 => LayoutCode::UInt32,
            LayoutType::UInt64 => LayoutCode::UInt64,
            LayoutType::VarInt => LayoutCode::VarInt,
            LayoutType::VarUInt => LayoutCode::VarUInt,
            LayoutType::Float32 => LayoutCode::Float32,
            LayoutType::Float64 => LayoutCode::Float64,
            LayoutType::Float128 => LayoutCode::Float128,
            LayoutType::Decimal => LayoutCode::Decimal,
            LayoutType::DateTime => LayoutCode::DateTime,
            LayoutType::UnixDateTime => LayoutCode::UnixDateTime,
            LayoutType::Guid => LayoutCode::Guid,
            LayoutType::MongoDbObjectId => LayoutCode::MongoDbObjectId,
            LayoutType::Utf8 => LayoutCode::Utf8,
            LayoutType::Binary => LayoutCode::Binary,
            LayoutType::Scope { kind, immutable } => {
                let (mutable_code, immutable_code) = kind.codes();
                if immutable {
                    immutable_code
                } else {
                    mutable_code
                }
            }
            LayoutType::EndScope => LayoutCode::EndScope,
        }
    }

    /// Maps a stored code back to its type. `BooleanFalse` maps to [`LayoutType::Boolean`].
    pub fn from_code(code: LayoutCode) -> Result<LayoutType, Error> {
        use LayoutCode as C;
        let t = match code {
            C::Invalid => return Err(Error::invalid_row("invalid layout code 0")),
            C::Null => LayoutType::Null,
            C::BooleanFalse | C::Boolean => LayoutType::Boolean,
            C::Int8 => LayoutType::Int8,
            C::Int16 => LayoutType::Int16,
            C::Int32 => LayoutType::Int32,
            C::Int64 => LayoutType::Int64,
            C::UInt8 => LayoutType::UInt8,
            C::UInt16 => LayoutType::UInt16,
            C::UInt32 => LayoutType::UInt32,
            C::UInt64 => LayoutType::UInt64,
            C::VarInt => LayoutType::VarInt,
            C::VarUInt => LayoutType::VarUInt,
            C::Float32 => LayoutType::Float32,
            C::Float64 => LayoutType::Float64,
            C::Decimal => LayoutType::Decimal,
            C::DateTime => LayoutType::DateTime,
            C::Guid => LayoutType::Guid,
            C::Utf8 => LayoutType::Utf8,
            C::Binary => LayoutType::Binary,
            C::Float128 => LayoutType::Float128,
            C::UnixDateTime => LayoutType::UnixDateTime,
            C::MongoDbObjectId => LayoutType::MongoDbObjectId,
            C::ObjectScope => LayoutType::scope(ScopeKind::Object),
            C::ImmutableObjectScope => LayoutType::immutable_scope(ScopeKind::Object),
            C::ArrayScope => LayoutType::scope(ScopeKind::Array),
            C::ImmutableArrayScope => LayoutType::immutable_scope(ScopeKind::Array),
            C::TypedArrayScope => LayoutType::scope(ScopeKind::TypedArray),
            C::ImmutableTypedArrayScope => LayoutType::immutable_scope(ScopeKind::TypedArray),
            C::TupleScope => LayoutType::scope(ScopeKind::Tuple),
            C::ImmutableTupleScope => LayoutType::immutable_scope(ScopeKind::Tuple),
            C::TypedTupleScope => LayoutType::scope(ScopeKind::TypedTuple),
            C::ImmutableTypedTupleScope => LayoutType::immutable_scope(ScopeKind::TypedTuple),
            C::TypedMapScope => LayoutType::scope(ScopeKind::TypedMap),
            C::ImmutableTypedMapScope => LayoutType::immutable_scope(ScopeKind::TypedMap),
            C::TypedSetScope => LayoutType::scope(ScopeKind::TypedSet),
            C::ImmutableTypedSetScope => LayoutType::immutable_scope(ScopeKind::TypedSet),
            C::NullableScope => LayoutType::scope(ScopeKind::Nullable),
            C::ImmutableNullableScope => LayoutType::immutable_scope(ScopeKind::Nullable),
            C::TaggedScope => LayoutType::scope(ScopeKind::Tagged),
            C::ImmutableTaggedScope => LayoutType::immutable_scope(ScopeKind::Tagged),
            C::Tagged2Scope => LayoutType::scope(ScopeKind::Tagged2),
            C::ImmutableTagged2Scope => LayoutType::immutable_scope(ScopeKind::Tagged2),
            C::Schema => LayoutType::scope(ScopeKind::Udt),
            C::ImmutableSchema => LayoutType::immutable_scope(ScopeKind::Udt),
            C::EndScope => LayoutType::EndScope,
        };
        Ok(t)
    }

    /// Encoded width of the value when it is stored untagged, or `None` for
    /// variable-length values and scopes.
    pub fn fixed_size(self) -> Option<usize> {
        let size = match self {
            LayoutType::Null => 0,
            LayoutType::Boolean | LayoutType::Int8 | LayoutType::UInt8 => 1,
            LayoutType::Int16 | LayoutType::UInt16 => 2,
            LayoutType::Int32 | LayoutType::UInt32 | LayoutType::Float32 => 4,
            LayoutType::Int64 | LayoutType::UInt64 | LayoutType::Float64 => 8,
            LayoutType::Float128 => FLOAT128_SIZE,
            LayoutType::Decimal => DECIMAL_SIZE,
            LayoutType::DateTime => DATE_TIME_SIZE,
            LayoutType::UnixDateTime => UNIX_DATE_TIME_SIZE,
            LayoutType::Guid => GUID_SIZE,
            LayoutType::MongoDbObjectId => MONGODB_OBJECT_ID_SIZE,
            _ => return None,
        };
        Some(size)
    }

    pub fn is_fixed(self) -> bool {
        self.fixed_size().is_some()
    }

    /// Types allowed in the variable region of a schematized scope.
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            LayoutType::VarInt | LayoutType::VarUInt | LayoutType::Utf8 | LayoutType::Binary
        )
    }

    pub fn is_varint(self) -> bool {
        matches!(self, LayoutType::VarInt | LayoutType::VarUInt)
    }

    pub fn scope_kind(self) -> Option<ScopeKind> {
        match self {
            LayoutType::Scope { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn is_scope(self) -> bool {
        self.scope_kind().is_some()
    }

    pub fn is_immutable(self) -> bool {
        matches!(
            self,
            LayoutType::Scope {
                immutable: true,
                ..
            }
        )
    }

    pub fn is_unique_scope(self) -> bool {
        self.scope_kind().is_some_and(ScopeKind::is_unique)
    }
}

/// A type together with its nested type arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeArgument {
    layout_type: LayoutType,
    type_args: TypeArgumentList,
}

impl TypeArgument {
    pub fn new(layout_type: LayoutType, type_args: TypeArgumentList) -> TypeArgument {
        TypeArgument {
            layout_type,
            type_args,
        }
    }

    /// A type without arguments (primitives, Object, Array).
    pub fn of(layout_type: LayoutType) -> TypeArgument {
        TypeArgument::new(layout_type, TypeArgumentList::default())
    }

    pub fn object() -> TypeArgument {
        TypeArgument::of(LayoutType::scope(ScopeKind::Object))
    }

    pub fn array() -> TypeArgument {
        TypeArgument::of(LayoutType::scope(ScopeKind::Array))
    }

    pub fn typed_array(element: TypeArgument) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::TypedArray),
            TypeArgumentList::new(vec![element]),
        )
    }

    pub fn typed_set(element: TypeArgument) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::TypedSet),
            TypeArgumentList::new(vec![element]),
        )
    }

    pub fn typed_map(key: TypeArgument, value: TypeArgument) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::TypedMap),
            TypeArgumentList::new(vec![key, value]),
        )
    }

    pub fn tuple(items: Vec<TypeArgument>) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::Tuple),
            TypeArgumentList::new(items),
        )
    }

    pub fn typed_tuple(items: Vec<TypeArgument>) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::TypedTuple),
            TypeArgumentList::new(items),
        )
    }

    /// `(u8 tag, value)`; the tag slot is implicit in the encoded arguments.
    pub fn tagged(value: TypeArgument) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::Tagged),
            TypeArgumentList::new(vec![TypeArgument::of(LayoutType::UInt8), value]),
        )
    }

    /// `(u8 tag, first, second)`.
    pub fn tagged2(first: TypeArgument, second: TypeArgument) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::Tagged2),
            TypeArgumentList::new(vec![TypeArgument::of(LayoutType::UInt8), first, second]),
        )
    }

    pub fn nullable(value: TypeArgument) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::Nullable),
            TypeArgumentList::new(vec![value]),
        )
    }

    pub fn udt(schema_id: SchemaId) -> TypeArgument {
        TypeArgument::new(
            LayoutType::scope(ScopeKind::Udt),
            TypeArgumentList::from_schema_id(schema_id),
        )
    }

    /// Same type with the immutable scope variant.
    pub fn into_immutable(self) -> TypeArgument {
        match self.layout_type.scope_kind() {
            Some(kind) => TypeArgument::new(LayoutType::immutable_scope(kind), self.type_args),
            None => self,
        }
    }

    pub fn layout_type(&self) -> LayoutType {
        self.layout_type
    }

    pub fn type_args(&self) -> &TypeArgumentList {
        &self.type_args
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layout_type {
            LayoutType::Scope { kind, immutable } => {
                if immutable {
                    write!(f, "immutable ")?;
                }
                write!(f, "{:?}", kind)?;
                if kind == ScopeKind::Udt {
                    return write!(f, "<{}>", self.type_args.schema_id);
                }
                if self.type_args.is_empty() {
                    return Ok(());
                }
                write!(f, "<")?;
                for (i, arg) in self.type_args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
            other => write!(f, "{:?}", other),
        }
    }
}

/// Nested type arguments of a scope type, or the schema id of a UDT.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeArgumentList {
    args: Arc<[TypeArgument]>,
    schema_id: SchemaId,
}

impl Default for TypeArgumentList {
    fn default() -> Self {
        TypeArgumentList {
            args: Arc::from(Vec::new()),
            schema_id: SchemaId::INVALID,
        }
    }
}

impl TypeArgumentList {
    pub fn new(args: Vec<TypeArgument>) -> TypeArgumentList {
        TypeArgumentList {
            args: Arc::from(args),
            schema_id: SchemaId::INVALID,
        }
    }

    pub fn from_schema_id(schema_id: SchemaId) -> TypeArgumentList {
        TypeArgumentList {
            args: Arc::from(Vec::new()),
            schema_id,
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TypeArgument> {
        self.args.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeArgument> {
        self.args.iter()
    }

    pub fn schema_id(&self) -> SchemaId {
        self.schema_id
    }
}

/// Type of the child at `index` inside a typed or tuple scope.
pub(crate) fn element_type(
    kind: ScopeKind,
    args: &TypeArgumentList,
    index: usize,
) -> Result<TypeArgument, Error> {
    let arg = |i: usize| {
        args.get(i).cloned().ok_or_else(|| {
            Error::invalid_row(format!("{:?} scope has no type argument {}", kind, i))
        })
    };
    match kind {
        ScopeKind::TypedArray | ScopeKind::TypedSet | ScopeKind::Nullable => arg(0),
        ScopeKind::TypedMap => Ok(TypeArgument::typed_tuple(vec![arg(0)?, arg(1)?])),
        ScopeKind::Tuple | ScopeKind::TypedTuple | ScopeKind::Tagged | ScopeKind::Tagged2 => {
            arg(index)
        }
        ScopeKind::Object | ScopeKind::Array | ScopeKind::Udt => Err(Error::type_constraint(
            format!("{:?} scope children are not typed", kind),
        )),
    }
}

/// Where a column's value lives inside its UDT scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// At a fixed byte offset from the scope start.
    Fixed,
    /// In the variable region, located by walking the present preceding columns.
    Variable,
    /// As a tagged cell in the sparse region, addressed by path.
    Sparse,
}

/// A bit of the presence bitmask at the front of a UDT scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutBit(u32);

impl LayoutBit {
    pub fn new(index: u32) -> LayoutBit {
        LayoutBit(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// Byte offset of the bit relative to the scope start.
    pub fn byte_offset(self) -> usize {
        (self.0 / 8) as usize
    }

    pub fn mask(self) -> u8 {
        1 << (self.0 % 8)
    }
}

#[derive(Clone, Debug)]
pub struct LayoutColumn {
    pub(crate) path: String,
    pub(crate) type_arg: TypeArgument,
    pub(crate) storage: StorageKind,
    pub(crate) index: usize,
    pub(crate) offset: usize,
    pub(crate) null_bit: Option<LayoutBit>,
    pub(crate) bool_bit: Option<LayoutBit>,
    pub(crate) size: usize,
}

impl LayoutColumn {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn type_arg(&self) -> &TypeArgument {
        &self.type_arg
    }

    pub fn layout_type(&self) -> LayoutType {
        self.type_arg.layout_type()
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Position in [`Layout::columns`].
    pub fn index(&self) -> usize {
        self.index
    }

    /// Fixed columns: byte offset from the scope start (bitmask included).
    /// Variable columns: ordinal within the variable region.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Presence bit; `None` for fixed columns that are always present.
    pub fn null_bit(&self) -> Option<LayoutBit> {
        self.null_bit
    }

    /// Value bit of a fixed boolean column.
    pub fn bool_bit(&self) -> Option<LayoutBit> {
        self.bool_bit
    }

    /// Bytes occupied in the fixed region.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_nullable(&self) -> bool {
        self.null_bit.is_some()
    }
}

#[derive(Debug)]
pub struct Layout {
    pub(crate) name: String,
    pub(crate) schema_id: SchemaId,
    pub(crate) size: usize,
    pub(crate) num_bitmask_bytes: usize,
    pub(crate) num_fixed: usize,
    pub(crate) num_variable: usize,
    pub(crate) columns: Vec<LayoutColumn>,
    pub(crate) path_map: HashMap<String, usize>,
    pub(crate) tokenizer: StringTokenizer,
}

impl Layout {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema_id(&self) -> SchemaId {
        self.schema_id
    }

    /// Bytes of bitmask plus fixed region.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_bitmask_bytes(&self) -> usize {
        self.num_bitmask_bytes
    }

    pub fn num_fixed(&self) -> usize {
        self.num_fixed
    }

    pub fn num_variable(&self) -> usize {
        self.num_variable
    }

    /// Fixed columns, then variable columns, then sparse columns.
    pub fn columns(&self) -> &[LayoutColumn] {
        &self.columns
    }

    /// Number of columns with schematized (fixed or variable) storage.
    pub fn schematized_count(&self) -> usize {
        self.num_fixed + self.num_variable
    }

    pub fn fixed_columns(&self) -> &[LayoutColumn] {
        &self.columns[..self.num_fixed]
    }

    pub fn variable_columns(&self) -> &[LayoutColumn] {
        &self.columns[self.num_fixed..self.num_fixed + self.num_variable]
    }

    pub fn sparse_columns(&self) -> &[LayoutColumn] {
        &self.columns[self.num_fixed + self.num_variable..]
    }

    pub fn try_find(&self, path: &str) -> Option<&LayoutColumn> {
        self.path_map.get(path).map(|&i| &self.columns[i])
    }

    pub fn tokenizer(&self) -> &StringTokenizer {
        &self.tokenizer
    }
}
