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

use super::cursor::RowCursor;
use crate::buffer::{Reader, Writer};
use crate::codec::LayoutCodec;
use crate::config::Config;
use crate::error::Error;
use crate::layout::{
    Layout, LayoutBit, LayoutColumn, LayoutResolver, LayoutType, SchemaId, SimpleLayoutResolver,
    StorageKind,
};
use crate::types::{HybridRowVersion, HEADER_SIZE};
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::{debug, trace};

const FALSE_BYTE: &[u8] = &[0];
const TRUE_BYTE: &[u8] = &[1];

/// Decoded row header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HybridRowHeader {
    pub version: HybridRowVersion,
    pub schema_id: SchemaId,
}

/// A row: one contiguous byte buffer holding the header, the root UDT's
/// schematized region and its trailing sparse cells.
///
/// Mutations splice bytes in place. Any cursor holding offsets past the splice
/// point is stale afterwards unless it was handed back by the mutating call.
pub struct RowBuffer {
    pub(crate) buffer: Vec<u8>,
    pub(crate) resolver: Arc<dyn LayoutResolver>,
    pub(crate) config: Config,
}

impl std::fmt::Debug for RowBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowBuffer")
            .field("len", &self.buffer.len())
            .field("config", &self.config)
            .finish()
    }
}

impl RowBuffer {
    pub fn new(capacity: usize) -> RowBuffer {
        RowBuffer::with_config(Config::default().initial_capacity(capacity))
    }

    pub fn with_config(config: Config) -> RowBuffer {
        RowBuffer {
            buffer: Vec::with_capacity(config.get_initial_capacity()),
            resolver: Arc::new(SimpleLayoutResolver::new()),
            config,
        }
    }

    /// [`RowBuffer::init_layout`] with the version from this row's [`Config`].
    pub fn init(
        &mut self,
        layout: &Layout,
        resolver: Arc<dyn LayoutResolver>,
    ) -> Result<(), Error> {
        self.init_layout(self.config.get_version(), layout, resolver)
    }

    /// Resets the row to an empty instance of `layout`: header, zeroed bitmask
    /// and fixed region, no variable or sparse content.
    pub fn init_layout(
        &mut self,
        version: HybridRowVersion,
        layout: &Layout,
        resolver: Arc<dyn LayoutResolver>,
    ) -> Result<(), Error> {
        if version == HybridRowVersion::Invalid {
            return Err(Error::type_constraint("cannot initialize an invalid row version"));
        }
        self.resolver = resolver;
        self.buffer.clear();
        let mut writer = Writer::with_capacity(HEADER_SIZE);
        writer.write_u8(version.into());
        writer.write_i32(layout.schema_id().id());
        self.buffer.extend_from_slice(writer.as_slice());
        self.buffer.resize(HEADER_SIZE + layout.size(), 0);
        Ok(())
    }

    /// Replaces the content with `bytes`, which must be a complete row of `version`.
    pub fn read_from(
        &mut self,
        bytes: &[u8],
        version: HybridRowVersion,
        resolver: Arc<dyn LayoutResolver>,
    ) -> Result<(), Error> {
        let header = Self::parse_header(bytes)?;
        if header.version != version {
            return Err(Error::invalid_row(format!(
                "row version {:?} does not match expected {:?}",
                header.version, version
            )));
        }
        let layout = resolver.resolve(header.schema_id)?;
        // The root bitmask and fixed region follow the header.
        let fixed_region = layout.size();
        if bytes.len() < HEADER_SIZE + fixed_region {
            return Err(Error::too_few_bytes(HEADER_SIZE, fixed_region, bytes.len()));
        }
        self.resolver = resolver;
        self.buffer.clear();
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Reads exactly `len` bytes from `stream` and loads them as a row.
    pub fn read_from_stream<R: Read>(
        &mut self,
        stream: &mut R,
        len: usize,
        version: HybridRowVersion,
        resolver: Arc<dyn LayoutResolver>,
    ) -> Result<(), Error> {
        let mut bytes = vec![0u8; len];
        stream.read_exact(&mut bytes)?;
        self.read_from(&bytes, version, resolver)
    }

    pub fn write_to<W: Write>(&self, stream: &mut W) -> Result<(), Error> {
        stream.write_all(&self.buffer)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<dyn LayoutResolver> {
        &self.resolver
    }

    pub fn header(&self) -> Result<HybridRowHeader, Error> {
        Self::parse_header(&self.buffer)
    }

    fn parse_header(bytes: &[u8]) -> Result<HybridRowHeader, Error> {
        let mut reader = Reader::new(bytes);
        let version = HybridRowVersion::try_from(reader.read_u8()?)
            .map_err(|e| Error::invalid_row(format!("unknown row version {}", e.number)))?;
        if version == HybridRowVersion::Invalid {
            return Err(Error::invalid_row("row version is invalid"));
        }
        let schema_id = SchemaId(reader.read_i32()?);
        Ok(HybridRowHeader { version, schema_id })
    }

    pub(crate) fn resolve(&self, schema_id: SchemaId) -> Result<Arc<Layout>, Error> {
        self.resolver.resolve(schema_id).map_err(|e| {
            debug!(schema_id = schema_id.id(), "layout resolution failed");
            e
        })
    }

    /// Reader over the bytes starting at `offset`.
    pub(crate) fn reader_at(&self, offset: usize) -> Result<Reader<'_>, Error> {
        match self.buffer.get(offset..) {
            Some(bytes) => Ok(Reader::new(bytes)),
            None => Err(Error::too_few_bytes(offset, 0, self.buffer.len())),
        }
    }

    pub(crate) fn read_u8_at(&self, offset: usize) -> Result<u8, Error> {
        self.buffer
            .get(offset)
            .copied()
            .ok_or_else(|| Error::too_few_bytes(offset, 1, self.buffer.len()))
    }

    pub(crate) fn read_u32_at(&self, offset: usize) -> Result<u32, Error> {
        self.reader_at(offset)?.read_u32()
    }

    pub(crate) fn write_u32_at(&mut self, offset: usize, value: u32) -> Result<(), Error> {
        self.write_fixed_bytes(offset, &value.to_le_bytes())
    }

    /// Replaces `remove` bytes at `offset` with `insert`, shifting everything after.
    pub fn splice(&mut self, offset: usize, remove: usize, insert: &[u8]) -> Result<(), Error> {
        let end = offset
            .checked_add(remove)
            .filter(|end| *end <= self.buffer.len())
            .ok_or_else(|| Error::too_few_bytes(offset, remove, self.buffer.len()))?;
        if insert.len() > remove {
            let grow = insert.len() - remove;
            let needed = self.buffer.len() + grow;
            if needed > self.buffer.capacity() {
                // Double rather than grow to the exact size.
                let target = needed.max(self.buffer.capacity() * 2);
                self.buffer.reserve_exact(target - self.buffer.len());
            }
        }
        trace!(offset, remove, insert = insert.len(), "splice row buffer");
        drop(self.buffer.splice(offset..end, insert.iter().copied()));
        Ok(())
    }

    /// Inserts `delta` zero bytes (`delta > 0`) or removes `-delta` bytes at `offset`.
    pub fn resize(&mut self, offset: usize, delta: isize) -> Result<(), Error> {
        if delta >= 0 {
            self.splice(offset, 0, &vec![0u8; delta as usize])
        } else {
            self.splice(offset, delta.unsigned_abs(), &[])
        }
    }

    pub fn read_fixed_bytes(&self, offset: usize, width: usize) -> Result<&[u8], Error> {
        offset
            .checked_add(width)
            .and_then(|end| self.buffer.get(offset..end))
            .ok_or_else(|| Error::too_few_bytes(offset, width, self.buffer.len()))
    }

    pub fn write_fixed_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Error> {
        let len = self.buffer.len();
        offset
            .checked_add(bytes.len())
            .and_then(|end| self.buffer.get_mut(offset..end))
            .ok_or_else(|| Error::too_few_bytes(offset, bytes.len(), len))?
            .copy_from_slice(bytes);
        Ok(())
    }

    /// Payload of the varuint-length-prefixed value at `offset`.
    pub fn read_variable_bytes(&self, offset: usize) -> Result<&[u8], Error> {
        crate::codec::read_len_prefixed(&mut self.reader_at(offset)?)
    }

    /// Writes `bytes` length-prefixed at `offset`, replacing the existing value
    /// there when `exists`. Returns the change in row length.
    pub fn write_variable_bytes(
        &mut self,
        offset: usize,
        exists: bool,
        bytes: &[u8],
    ) -> Result<isize, Error> {
        let mut writer = Writer::with_capacity(bytes.len() + 5);
        crate::codec::write_len_prefixed(&mut writer, bytes);
        let existing = if exists {
            let mut reader = self.reader_at(offset)?;
            crate::codec::read_len_prefixed(&mut reader)?;
            reader.get_cursor()
        } else {
            0
        };
        self.splice(offset, existing, writer.as_slice())?;
        Ok(writer.len() as isize - existing as isize)
    }

    pub fn read_bit(&self, scope_start: usize, bit: LayoutBit) -> Result<bool, Error> {
        Ok(self.read_u8_at(scope_start + bit.byte_offset())? & bit.mask() != 0)
    }

    pub fn set_bit(&mut self, scope_start: usize, bit: LayoutBit) -> Result<(), Error> {
        let offset = scope_start + bit.byte_offset();
        let len = self.buffer.len();
        let byte = self
            .buffer
            .get_mut(offset)
            .ok_or_else(|| Error::too_few_bytes(offset, 1, len))?;
        *byte |= bit.mask();
        Ok(())
    }

    pub fn unset_bit(&mut self, scope_start: usize, bit: LayoutBit) -> Result<(), Error> {
        let offset = scope_start + bit.byte_offset();
        let len = self.buffer.len();
        let byte = self
            .buffer
            .get_mut(offset)
            .ok_or_else(|| Error::too_few_bytes(offset, 1, len))?;
        *byte &= !bit.mask();
        Ok(())
    }

    /// Whether a schematized column currently holds a value.
    pub fn column_has_value(&self, scope: &RowCursor, col: &LayoutColumn) -> Result<bool, Error> {
        match col.null_bit() {
            Some(bit) => self.read_bit(scope.start, bit),
            None => Ok(col.storage() == StorageKind::Fixed),
        }
    }

    fn check_column<'v, T: LayoutCodec<'v>>(
        scope: &RowCursor,
        col: &LayoutColumn,
        storage: StorageKind,
    ) -> Result<(), Error> {
        if !matches!(scope.scope_type.scope_kind(), Some(crate::layout::ScopeKind::Udt)) {
            return Err(Error::type_constraint(
                "schematized columns exist only in UDT scopes",
            ));
        }
        if col.storage() != storage {
            return Err(Error::type_constraint(format!(
                "column {} is {:?}, not {:?}",
                col.path(),
                col.storage(),
                storage
            )));
        }
        if col.layout_type() != T::LAYOUT_TYPE {
            return Err(Error::type_mismatch(format!(
                "column {} is {:?}, not {:?}",
                col.path(),
                col.layout_type(),
                T::LAYOUT_TYPE
            )));
        }
        Ok(())
    }

    pub fn read_fixed<'a, T: LayoutCodec<'a>>(
        &'a self,
        scope: &RowCursor,
        col: &LayoutColumn,
    ) -> Result<T, Error> {
        Self::check_column::<T>(scope, col, StorageKind::Fixed)?;
        if !self.column_has_value(scope, col)? {
            return Err(Error::not_found(format!("column {} is null", col.path())));
        }
        if let Some(bit) = col.bool_bit() {
            let bytes = if self.read_bit(scope.start, bit)? {
                TRUE_BYTE
            } else {
                FALSE_BYTE
            };
            return T::decode(&mut Reader::new(bytes));
        }
        let bytes = self.read_fixed_bytes(scope.start + col.offset(), col.size())?;
        T::decode(&mut Reader::new(bytes))
    }

    pub fn write_fixed<'v, T: LayoutCodec<'v>>(
        &mut self,
        scope: &RowCursor,
        col: &LayoutColumn,
        value: &T,
    ) -> Result<(), Error> {
        Self::check_column::<T>(scope, col, StorageKind::Fixed)?;
        if scope.immutable {
            return Err(Error::insufficient_permissions(format!(
                "column {} is in an immutable scope",
                col.path()
            )));
        }
        let mut writer = Writer::with_capacity(col.size().max(1));
        value.encode(&mut writer)?;
        match col.bool_bit() {
            Some(bit) => {
                if writer.as_slice().first().copied().unwrap_or(0) != 0 {
                    self.set_bit(scope.start, bit)?;
                } else {
                    self.unset_bit(scope.start, bit)?;
                }
            }
            None => self.write_fixed_bytes(scope.start + col.offset(), writer.as_slice())?,
        }
        if let Some(bit) = col.null_bit() {
            self.set_bit(scope.start, bit)?;
        }
        Ok(())
    }

    pub fn delete_fixed(&mut self, scope: &RowCursor, col: &LayoutColumn) -> Result<(), Error> {
        if col.storage() != StorageKind::Fixed {
            return Err(Error::type_constraint(format!(
                "column {} is not fixed",
                col.path()
            )));
        }
        if scope.immutable {
            return Err(Error::insufficient_permissions(format!(
                "column {} is in an immutable scope",
                col.path()
            )));
        }
        let Some(null_bit) = col.null_bit() else {
            return Err(Error::type_constraint(format!(
                "column {} is not nullable",
                col.path()
            )));
        };
        self.unset_bit(scope.start, null_bit)?;
        if let Some(bit) = col.bool_bit() {
            self.unset_bit(scope.start, bit)?;
        }
        Ok(())
    }

    /// Offset of the variable column with ordinal `ordinal`, or of the sparse
    /// region when `ordinal == layout.num_variable()`.
    pub(crate) fn compute_variable_value_offset(
        &self,
        scope_start: usize,
        layout: &Layout,
        ordinal: usize,
    ) -> Result<usize, Error> {
        let mut offset = scope_start + layout.size();
        for col in layout.variable_columns().iter().take(ordinal) {
            let present = match col.null_bit() {
                Some(bit) => self.read_bit(scope_start, bit)?,
                None => true,
            };
            if present {
                offset += self.primitive_value_size(offset, col.layout_type())?;
            }
        }
        Ok(offset)
    }

    pub(crate) fn udt_sparse_start(&self, scope_start: usize, layout: &Layout) -> Result<usize, Error> {
        self.compute_variable_value_offset(scope_start, layout, layout.num_variable())
    }

    /// Encoded size of a non-scope value stored untagged at `offset`.
    pub(crate) fn primitive_value_size(&self, offset: usize, t: LayoutType) -> Result<usize, Error> {
        if let Some(size) = t.fixed_size() {
            self.read_fixed_bytes(offset, size)?;
            return Ok(size);
        }
        let mut reader = self.reader_at(offset)?;
        match t {
            LayoutType::VarInt | LayoutType::VarUInt => {
                reader.read_varuint64()?;
            }
            LayoutType::Utf8 | LayoutType::Binary => {
                crate::codec::read_len_prefixed(&mut reader)?;
            }
            other => {
                return Err(Error::invalid_row(format!(
                    "{:?} is not a primitive value type",
                    other
                )))
            }
        }
        Ok(reader.get_cursor())
    }

    fn variable_column_offset(
        &self,
        scope: &RowCursor,
        col: &LayoutColumn,
    ) -> Result<usize, Error> {
        self.compute_variable_value_offset(scope.start, &scope.layout, col.offset())
    }

    pub fn read_variable<'a, T: LayoutCodec<'a>>(
        &'a self,
        scope: &RowCursor,
        col: &LayoutColumn,
    ) -> Result<T, Error> {
        Self::check_column::<T>(scope, col, StorageKind::Variable)?;
        if !self.column_has_value(scope, col)? {
            return Err(Error::not_found(format!("column {} is null", col.path())));
        }
        let offset = self.variable_column_offset(scope, col)?;
        T::decode(&mut self.reader_at(offset)?)
    }

    /// Writes a variable column and returns the change in row length.
    pub fn write_variable<'v, T: LayoutCodec<'v>>(
        &mut self,
        scope: &RowCursor,
        col: &LayoutColumn,
        value: &T,
    ) -> Result<isize, Error> {
        Self::check_column::<T>(scope, col, StorageKind::Variable)?;
        if scope.immutable {
            return Err(Error::insufficient_permissions(format!(
                "column {} is in an immutable scope",
                col.path()
            )));
        }
        let offset = self.variable_column_offset(scope, col)?;
        let existing = if self.column_has_value(scope, col)? {
            self.primitive_value_size(offset, col.layout_type())?
        } else {
            0
        };
        let mut writer = Writer::default();
        value.encode(&mut writer)?;
        self.splice(offset, existing, writer.as_slice())?;
        if let Some(bit) = col.null_bit() {
            self.set_bit(scope.start, bit)?;
        }
        Ok(writer.len() as isize - existing as isize)
    }

    /// Removes a variable column's value and returns the change in row length.
    pub fn delete_variable(&mut self, scope: &RowCursor, col: &LayoutColumn) -> Result<isize, Error> {
        if col.storage() != StorageKind::Variable {
            return Err(Error::type_constraint(format!(
                "column {} is not variable",
                col.path()
            )));
        }
        if scope.immutable {
            return Err(Error::insufficient_permissions(format!(
                "column {} is in an immutable scope",
                col.path()
            )));
        }
        if !self.column_has_value(scope, col)? {
            return Ok(0);
        }
        let offset = self.variable_column_offset(scope, col)?;
        let existing = self.primitive_value_size(offset, col.layout_type())?;
        self.splice(offset, existing, &[])?;
        if let Some(bit) = col.null_bit() {
            self.unset_bit(scope.start, bit)?;
        }
        Ok(-(existing as isize))
    }
}
