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
use crate::layout::{LayoutColumn, LayoutType, ScopeKind, StorageKind, TypeArgument};
use chrono::NaiveDateTime;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    /// Before the first call to `read`.
    None,
    /// On a present fixed or variable column of a UDT.
    Schematized,
    /// On a sparse cell.
    Sparse,
    Done,
}

/// Saved position of a [`RowReader`].
#[derive(Clone, Debug)]
pub struct Checkpoint {
    pub state: ReaderState,
    pub column_index: usize,
    pub cursor: RowCursor,
}

/// Forward-only reader over the fields of one scope.
///
/// A UDT scope yields its present schematized columns first, in layout order,
/// then its sparse cells. Other scopes only have sparse cells.
#[derive(Debug)]
pub struct RowReader<'a> {
    row: &'a RowBuffer,
    cursor: RowCursor,
    state: ReaderState,
    column_index: usize,
}

impl<'a> RowReader<'a> {
    /// Reader over the root UDT.
    pub fn new(row: &'a RowBuffer) -> Result<RowReader<'a>, Error> {
        Ok(RowReader::from_cursor(row, RowCursor::root(row)?))
    }

    /// Reader over the scope `cursor` iterates, starting before its first field.
    pub fn from_cursor(row: &'a RowBuffer, cursor: RowCursor) -> RowReader<'a> {
        RowReader {
            row,
            cursor,
            state: ReaderState::None,
            column_index: 0,
        }
    }

    pub fn from_checkpoint(row: &'a RowBuffer, checkpoint: Checkpoint) -> RowReader<'a> {
        RowReader {
            row,
            cursor: checkpoint.cursor,
            state: checkpoint.state,
            column_index: checkpoint.column_index,
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state,
            column_index: self.column_index,
            cursor: self.cursor.clone(),
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn cursor(&self) -> &RowCursor {
        &self.cursor
    }

    fn column(&self) -> Result<&LayoutColumn, Error> {
        self.cursor
            .layout
            .columns()
            .get(self.column_index)
            .ok_or_else(|| Error::invalid_row(format!("no column {}", self.column_index)))
    }

    /// Advances `column_index` to the next present schematized column.
    fn seek_schematized(&mut self) -> Result<bool, Error> {
        let layout = self.cursor.layout.clone();
        while self.column_index < layout.schematized_count() {
            let col = &layout.columns()[self.column_index];
            if self.row.column_has_value(&self.cursor, col)? {
                return Ok(true);
            }
            self.column_index += 1;
        }
        Ok(false)
    }

    /// Moves to the next field. Returns false once the scope is exhausted.
    pub fn read(&mut self) -> Result<bool, Error> {
        match self.state {
            ReaderState::None => {
                if self.cursor.kind() == ScopeKind::Udt {
                    self.state = ReaderState::Schematized;
                    self.column_index = 0;
                    if self.seek_schematized()? {
                        return Ok(true);
                    }
                }
                self.state = ReaderState::Sparse;
                self.move_sparse()
            }
            ReaderState::Schematized => {
                self.column_index += 1;
                if self.seek_schematized()? {
                    return Ok(true);
                }
                self.state = ReaderState::Sparse;
                self.move_sparse()
            }
            ReaderState::Sparse => self.move_sparse(),
            ReaderState::Done => Ok(false),
        }
    }

    fn move_sparse(&mut self) -> Result<bool, Error> {
        if self.cursor.move_next(self.row)? {
            return Ok(true);
        }
        self.state = ReaderState::Done;
        Ok(false)
    }

    /// Path of the current field; empty for elements of indexed scopes.
    pub fn path(&self) -> Result<&str, Error> {
        match self.state {
            ReaderState::Schematized => Ok(self.column()?.path()),
            ReaderState::Sparse => self.cursor.path(self.row),
            _ => Ok(""),
        }
    }

    pub fn layout_type(&self) -> Option<LayoutType> {
        match self.state {
            ReaderState::Schematized => self.column().ok().map(LayoutColumn::layout_type),
            ReaderState::Sparse => self.cursor.cell_type,
            _ => None,
        }
    }

    pub fn type_arg(&self) -> Option<TypeArgument> {
        match self.state {
            ReaderState::Schematized => self.column().ok().map(|c| c.type_arg().clone()),
            ReaderState::Sparse => self.cursor.cell_type_arg(),
            _ => None,
        }
    }

    /// Column index while schematized; element index while sparse.
    pub fn index(&self) -> usize {
        match self.state {
            ReaderState::Schematized => self.column_index,
            _ => self.cursor.index,
        }
    }

    /// False for nulls and for nullable scopes without a value.
    pub fn has_value(&self) -> Result<bool, Error> {
        match self.state {
            ReaderState::Schematized => Ok(true),
            ReaderState::Sparse => match self.cursor.cell_type {
                Some(LayoutType::Null) | None => Ok(false),
                Some(t) if t.scope_kind() == Some(ScopeKind::Nullable) => {
                    self.row.nullable_has_value(&self.cursor)
                }
                Some(_) => Ok(true),
            },
            _ => Ok(false),
        }
    }

    pub fn read_value<T: LayoutCodec<'a>>(&self) -> Result<T, Error> {
        match self.state {
            ReaderState::Schematized => {
                let col = self.column()?;
                match col.storage() {
                    StorageKind::Fixed => self.row.read_fixed(&self.cursor, col),
                    StorageKind::Variable => self.row.read_variable(&self.cursor, col),
                    StorageKind::Sparse => Err(Error::invalid_row(
                        "sparse column in schematized position",
                    )),
                }
            }
            ReaderState::Sparse => self.row.read_sparse(&self.cursor),
            _ => Err(Error::not_found("reader is not positioned on a field")),
        }
    }

    pub fn read_null(&self) -> Result<Null, Error> {
        self.read_value()
    }

    pub fn read_bool(&self) -> Result<bool, Error> {
        self.read_value()
    }

    pub fn read_int8(&self) -> Result<i8, Error> {
        self.read_value()
    }

    pub fn read_int16(&self) -> Result<i16, Error> {
        self.read_value()
    }

    pub fn read_int32(&self) -> Result<i32, Error> {
        self.read_value()
    }

    pub fn read_int64(&self) -> Result<i64, Error> {
        self.read_value()
    }

    pub fn read_uint8(&self) -> Result<u8, Error> {
        self.read_value()
    }

    pub fn read_uint16(&self) -> Result<u16, Error> {
        self.read_value()
    }

    pub fn read_uint32(&self) -> Result<u32, Error> {
        self.read_value()
    }

    pub fn read_uint64(&self) -> Result<u64, Error> {
        self.read_value()
    }

    pub fn read_varint(&self) -> Result<i64, Error> {
        self.read_value::<VarInt>().map(|v| v.0)
    }

    pub fn read_varuint(&self) -> Result<u64, Error> {
        self.read_value::<VarUInt>().map(|v| v.0)
    }

    pub fn read_float32(&self) -> Result<f32, Error> {
        self.read_value()
    }

    pub fn read_float64(&self) -> Result<f64, Error> {
        self.read_value()
    }

    pub fn read_float128(&self) -> Result<Float128, Error> {
        self.read_value()
    }

    pub fn read_decimal(&self) -> Result<Decimal, Error> {
        self.read_value()
    }

    pub fn read_datetime(&self) -> Result<NaiveDateTime, Error> {
        self.read_value()
    }

    pub fn read_unix_datetime(&self) -> Result<UnixDateTime, Error> {
        self.read_value()
    }

    pub fn read_guid(&self) -> Result<Uuid, Error> {
        self.read_value()
    }

    pub fn read_mongodb_object_id(&self) -> Result<MongoDbObjectId, Error> {
        self.read_value()
    }

    pub fn read_string(&self) -> Result<&'a str, Error> {
        self.read_value()
    }

    pub fn read_binary(&self) -> Result<&'a [u8], Error> {
        self.read_value()
    }

    /// Reader over the scope at the current field. The parent must not be
    /// advanced until the child is done; see [`RowReader::skip_scope`].
    pub fn read_scope(&self) -> Result<RowReader<'a>, Error> {
        if self.state != ReaderState::Sparse {
            return Err(Error::type_mismatch("current field is not a scope"));
        }
        let child = self.row.read_scope(&self.cursor)?;
        Ok(RowReader::from_cursor(self.row, child))
    }

    /// Runs `func` over a child reader of the current scope, then skips past it.
    pub fn read_scope_with<C, R, F>(&mut self, context: C, func: F) -> Result<R, Error>
    where
        F: FnOnce(&mut RowReader<'a>, C) -> Result<R, Error>,
    {
        let mut child = self.read_scope()?;
        let result = func(&mut child, context)?;
        self.skip_scope(&child)?;
        Ok(result)
    }

    /// Lets the parent resume after a child reader created by [`RowReader::read_scope`].
    pub fn skip_scope(&mut self, child: &RowReader<'a>) -> Result<(), Error> {
        if self.state != ReaderState::Sparse || !self.cursor.exists {
            return Err(Error::not_found("reader is not positioned on a scope"));
        }
        self.cursor.next_hint = Some(self.row.scope_end(&child.cursor)?);
        Ok(())
    }
}
