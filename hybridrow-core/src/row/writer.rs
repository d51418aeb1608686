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

use super::buffer::RowBuffer;
use super::cursor::RowCursor;
use crate::codec::{Decimal, Float128, LayoutCodec, MongoDbObjectId, Null, UnixDateTime, VarInt, VarUInt};
use crate::error::Error;
use crate::layout::{ScopeKind, StorageKind, TypeArgument};
use crate::types::UpdateOptions;
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Forward-only writer filling one scope of a row.
///
/// Paths naming a fixed or variable column of the enclosing UDT are written in
/// place; everything else is appended as a sparse cell. Nested scopes are
/// filled by a callback that receives a writer over the new scope.
pub struct RowWriter<'a> {
    row: &'a mut RowBuffer,
    cursor: RowCursor,
}

impl<'a> RowWriter<'a> {
    /// Runs `func` with a writer over the root UDT of an initialized row.
    pub fn write_buffer<C, F>(row: &mut RowBuffer, context: C, func: F) -> Result<(), Error>
    where
        F: FnOnce(&mut RowWriter<'_>, &TypeArgument, C) -> Result<(), Error>,
    {
        let cursor = RowCursor::root(row)?;
        let type_arg = TypeArgument::udt(cursor.layout.schema_id());
        let mut writer = RowWriter { row, cursor };
        func(&mut writer, &type_arg, context)
    }

    pub fn new(row: &'a mut RowBuffer) -> Result<RowWriter<'a>, Error> {
        let cursor = RowCursor::root(row)?;
        Ok(RowWriter { row, cursor })
    }

    pub fn cursor(&self) -> &RowCursor {
        &self.cursor
    }

    /// Current length of the row.
    pub fn length(&self) -> usize {
        self.row.len()
    }

    fn prepare_path(&mut self, path: &str) {
        if self.cursor.kind().has_named_children() {
            self.cursor.write_path = Some(path.to_string());
        }
    }

    /// Rejects a sparse write whose path is declared in the layout with another type.
    fn check_sparse_column(&self, path: &str, type_arg: &TypeArgument) -> Result<(), Error> {
        if self.cursor.kind() != ScopeKind::Udt {
            return Ok(());
        }
        match self.cursor.layout.try_find(path) {
            Some(col) if col.type_arg() != type_arg => Err(Error::type_constraint(format!(
                "column {} is declared as {}, not {}",
                path,
                col.type_arg(),
                type_arg
            ))),
            _ => Ok(()),
        }
    }

    /// Keeps the cursor on the sparse region after the variable region changed size.
    fn shift_sparse(&mut self, shift: isize) {
        let apply = |v: usize| (v as isize + shift) as usize;
        self.cursor.meta_offset = apply(self.cursor.meta_offset);
        self.cursor.value_offset = apply(self.cursor.value_offset);
        if self.cursor.path_len > 0 {
            self.cursor.path_offset = apply(self.cursor.path_offset);
        }
        self.cursor.next_hint = None;
    }

    pub fn write<'v, T: LayoutCodec<'v>>(&mut self, path: &str, value: &T) -> Result<(), Error> {
        if self.cursor.kind() == ScopeKind::Udt {
            let layout = self.cursor.layout.clone();
            if let Some(col) = layout.try_find(path) {
                match col.storage() {
                    StorageKind::Fixed => return self.row.write_fixed(&self.cursor, col, value),
                    StorageKind::Variable => {
                        let shift = self.row.write_variable(&self.cursor, col, value)?;
                        self.shift_sparse(shift);
                        return Ok(());
                    }
                    StorageKind::Sparse => {
                        self.check_sparse_column(path, &TypeArgument::of(T::LAYOUT_TYPE))?
                    }
                }
            }
        }
        self.prepare_path(path);
        self.row
            .write_sparse(&mut self.cursor, value, UpdateOptions::Upsert)?;
        self.cursor.move_next(self.row)?;
        Ok(())
    }

    pub fn write_null(&mut self, path: &str) -> Result<(), Error> {
        self.write(path, &Null)
    }

    pub fn write_bool(&mut self, path: &str, value: bool) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_int8(&mut self, path: &str, value: i8) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_int16(&mut self, path: &str, value: i16) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_int32(&mut self, path: &str, value: i32) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_int64(&mut self, path: &str, value: i64) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_uint8(&mut self, path: &str, value: u8) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_uint16(&mut self, path: &str, value: u16) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_uint32(&mut self, path: &str, value: u32) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_uint64(&mut self, path: &str, value: u64) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_varint(&mut self, path: &str, value: i64) -> Result<(), Error> {
        self.write(path, &VarInt(value))
    }

    pub fn write_varuint(&mut self, path: &str, value: u64) -> Result<(), Error> {
        self.write(path, &VarUInt(value))
    }

    pub fn write_float32(&mut self, path: &str, value: f32) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_float64(&mut self, path: &str, value: f64) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_float128(&mut self, path: &str, value: Float128) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_decimal(&mut self, path: &str, value: Decimal) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_datetime(&mut self, path: &str, value: NaiveDateTime) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_unix_datetime(&mut self, path: &str, value: UnixDateTime) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_guid(&mut self, path: &str, value: Uuid) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_mongodb_object_id(
        &mut self,
        path: &str,
        value: MongoDbObjectId,
    ) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_string(&mut self, path: &str, value: &str) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_binary(&mut self, path: &str, value: &[u8]) -> Result<(), Error> {
        self.write(path, &value)
    }

    pub fn write_scope<C, F>(
        &mut self,
        path: &str,
        type_arg: &TypeArgument,
        context: C,
        func: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(&mut RowWriter<'_>, &TypeArgument, C) -> Result<(), Error>,
    {
        self.write_scope_opt(path, type_arg, context, Some(func))
    }

    /// Writes an empty scope, or a nullable scope without a value.
    pub fn write_scope_none(&mut self, path: &str, type_arg: &TypeArgument) -> Result<(), Error> {
        self.write_scope_opt::<(), fn(&mut RowWriter<'_>, &TypeArgument, ()) -> Result<(), Error>>(
            path, type_arg, (), None,
        )
    }

    /// Writes a scope and fills it with `func` when given. A nullable scope
    /// has a value exactly when `func` is given. Sets and maps are sorted once
    /// `func` returns.
    pub fn write_scope_opt<C, F>(
        &mut self,
        path: &str,
        type_arg: &TypeArgument,
        context: C,
        func: Option<F>,
    ) -> Result<(), Error>
    where
        F: FnOnce(&mut RowWriter<'_>, &TypeArgument, C) -> Result<(), Error>,
    {
        let kind = type_arg
            .layout_type()
            .scope_kind()
            .ok_or_else(|| Error::type_constraint(format!("{} is not a scope type", type_arg)))?;
        self.check_sparse_column(path, type_arg)?;
        self.prepare_path(path);
        let mut child = if kind == ScopeKind::Nullable {
            self.row.write_nullable(
                &mut self.cursor,
                type_arg,
                UpdateOptions::Upsert,
                func.is_some(),
            )?
        } else {
            self.row
                .write_scope(&mut self.cursor, type_arg, UpdateOptions::Upsert)?
        };
        child.defer_unique_index = kind.is_unique();
        if let Some(func) = func {
            let mut nested = RowWriter {
                row: &mut *self.row,
                cursor: child,
            };
            func(&mut nested, type_arg, context)?;
            child = nested.cursor;
        }
        if kind.is_unique() {
            self.row.unique_index_rebuild(&child)?;
        }
        self.cursor.move_next(self.row)?;
        Ok(())
    }
}
