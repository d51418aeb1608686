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
use crate::buffer::Writer;
use crate::codec::LayoutCodec;
use crate::error::Error;
use crate::layout::{
    element_type, Layout, LayoutType, ScopeKind, TypeArgument, TypeArgumentList, SchemaId,
};
use crate::types::{LayoutCode, UpdateOptions, COUNT_SIZE};
use std::sync::Arc;

/// Decoded metadata of a tagged cell.
pub(crate) struct SparseCell {
    pub layout_type: LayoutType,
    pub type_args: TypeArgumentList,
    pub path_token: Option<u64>,
    pub path_offset: usize,
    pub path_len: usize,
    pub value_offset: usize,
}

fn layout_code(byte: u8) -> Result<LayoutCode, Error> {
    LayoutCode::try_from(byte)
        .map_err(|e| Error::invalid_row(format!("unknown layout code {}", e.number)))
}

fn missing_arg(t: LayoutType, index: usize) -> Error {
    Error::type_constraint(format!("{:?} requires type argument {}", t, index))
}

impl RowBuffer {
    fn check_depth(&self, depth: u32) -> Result<(), Error> {
        if depth > self.config.get_max_nesting_depth() {
            return Err(Error::invalid_row(format!(
                "scopes nest deeper than {}",
                self.config.get_max_nesting_depth()
            )));
        }
        Ok(())
    }

    pub(crate) fn write_type_arg(writer: &mut Writer, arg: &TypeArgument) -> Result<(), Error> {
        writer.write_u8(arg.layout_type().code().into());
        Self::write_type_args(writer, arg.layout_type(), arg.type_args())
    }

    /// Writes the arguments that follow a scope's type code.
    pub(crate) fn write_type_args(
        writer: &mut Writer,
        t: LayoutType,
        args: &TypeArgumentList,
    ) -> Result<(), Error> {
        let Some(kind) = t.scope_kind() else {
            return Ok(());
        };
        let arg = |i: usize| args.get(i).ok_or_else(|| missing_arg(t, i));
        match kind {
            ScopeKind::TypedArray | ScopeKind::TypedSet | ScopeKind::Nullable => {
                Self::write_type_arg(writer, arg(0)?)?;
            }
            ScopeKind::TypedMap => {
                Self::write_type_arg(writer, arg(0)?)?;
                Self::write_type_arg(writer, arg(1)?)?;
            }
            ScopeKind::Tuple | ScopeKind::TypedTuple => {
                writer.write_varuint64(args.len() as u64);
                for a in args.iter() {
                    Self::write_type_arg(writer, a)?;
                }
            }
            // The leading u8 tag argument is implied by the code.
            ScopeKind::Tagged => {
                Self::write_type_arg(writer, arg(1)?)?;
            }
            ScopeKind::Tagged2 => {
                Self::write_type_arg(writer, arg(1)?)?;
                Self::write_type_arg(writer, arg(2)?)?;
            }
            ScopeKind::Udt => writer.write_i32(args.schema_id().id()),
            ScopeKind::Object | ScopeKind::Array => {}
        }
        Ok(())
    }

    fn read_type_arg(&self, offset: usize, depth: u32) -> Result<(TypeArgument, usize), Error> {
        let t = LayoutType::from_code(layout_code(self.read_u8_at(offset)?)?)?;
        if t == LayoutType::EndScope {
            return Err(Error::invalid_row("EndScope is not a type argument"));
        }
        let (args, len) = self.read_type_args(offset + 1, t, depth + 1)?;
        Ok((TypeArgument::new(t, args), len + 1))
    }

    fn read_type_arg_list(
        &self,
        offset: usize,
        n: usize,
        depth: u32,
        args: &mut Vec<TypeArgument>,
    ) -> Result<usize, Error> {
        let mut pos = offset;
        for _ in 0..n {
            let (arg, len) = self.read_type_arg(pos, depth)?;
            args.push(arg);
            pos += len;
        }
        Ok(pos - offset)
    }

    /// Reads the arguments following a scope's type code. Returns them with their encoded length.
    pub(crate) fn read_type_args(
        &self,
        offset: usize,
        t: LayoutType,
        depth: u32,
    ) -> Result<(TypeArgumentList, usize), Error> {
        self.check_depth(depth)?;
        let Some(kind) = t.scope_kind() else {
            return Ok((TypeArgumentList::default(), 0));
        };
        let mut args = Vec::new();
        let len = match kind {
            ScopeKind::TypedArray | ScopeKind::TypedSet | ScopeKind::Nullable => {
                self.read_type_arg_list(offset, 1, depth, &mut args)?
            }
            ScopeKind::TypedMap => self.read_type_arg_list(offset, 2, depth, &mut args)?,
            ScopeKind::Tuple | ScopeKind::TypedTuple => {
                let mut reader = self.reader_at(offset)?;
                let n = reader.read_varuint64()?;
                let n = usize::try_from(n)
                    .map_err(|_| Error::invalid_row(format!("tuple arity {} is too large", n)))?;
                let prefix = reader.get_cursor();
                prefix + self.read_type_arg_list(offset + prefix, n, depth, &mut args)?
            }
            ScopeKind::Tagged => {
                args.push(TypeArgument::of(LayoutType::UInt8));
                self.read_type_arg_list(offset, 1, depth, &mut args)?
            }
            ScopeKind::Tagged2 => {
                args.push(TypeArgument::of(LayoutType::UInt8));
                self.read_type_arg_list(offset, 2, depth, &mut args)?
            }
            ScopeKind::Udt => {
                let schema_id = SchemaId(self.reader_at(offset)?.read_i32()?);
                return Ok((TypeArgumentList::from_schema_id(schema_id), 4));
            }
            ScopeKind::Object | ScopeKind::Array => 0,
        };
        Ok((TypeArgumentList::new(args), len))
    }

    pub(crate) fn read_sparse_cell(
        &self,
        offset: usize,
        named: bool,
        token_count: u64,
        depth: u32,
    ) -> Result<SparseCell, Error> {
        let t = LayoutType::from_code(layout_code(self.read_u8_at(offset)?)?)?;
        if t == LayoutType::EndScope {
            return Err(Error::invalid_row(format!(
                "unexpected end of scope at {}",
                offset
            )));
        }
        let (type_args, args_len) = self.read_type_args(offset + 1, t, depth)?;
        let mut pos = offset + 1 + args_len;
        let mut path_token = None;
        let mut path_offset = 0;
        let mut path_len = 0;
        if named {
            let mut reader = self.reader_at(pos)?;
            let token = reader.read_varuint64()?;
            pos += reader.get_cursor();
            if token < token_count {
                path_token = Some(token);
            } else {
                path_len = usize::try_from(token - token_count)
                    .map_err(|_| Error::invalid_row("inline path is too long"))?;
                path_offset = pos;
                self.read_fixed_bytes(pos, path_len)?;
                pos += path_len;
            }
        }
        Ok(SparseCell {
            layout_type: t,
            type_args,
            path_token,
            path_offset,
            path_len,
            value_offset: pos,
        })
    }

    /// Fills in the current cell of a cursor whose `meta_offset` is on a child.
    pub(crate) fn read_sparse_metadata(&self, cursor: &mut RowCursor) -> Result<(), Error> {
        let kind = cursor.kind();
        if kind.is_typed() {
            let elem = element_type(kind, &cursor.scope_type_args, cursor.index)?;
            cursor.cell_type = Some(elem.layout_type());
            cursor.cell_type_args = elem.type_args().clone();
            cursor.value_offset = cursor.meta_offset;
            return Ok(());
        }
        let cell = self.read_sparse_cell(
            cursor.meta_offset,
            kind.has_named_children(),
            cursor.layout.tokenizer().count(),
            0,
        )?;
        cursor.cell_type = Some(cell.layout_type);
        cursor.cell_type_args = cell.type_args;
        cursor.path_token = cell.path_token;
        cursor.path_offset = cell.path_offset;
        cursor.path_len = cell.path_len;
        cursor.value_offset = cell.value_offset;
        Ok(())
    }

    /// Encoded size of a value at `offset`. `tagged` values follow a type code,
    /// which is where booleans keep their value.
    pub(crate) fn sparse_value_size(
        &self,
        layout: &Arc<Layout>,
        offset: usize,
        t: LayoutType,
        args: &TypeArgumentList,
        tagged: bool,
        depth: u32,
    ) -> Result<usize, Error> {
        self.check_depth(depth)?;
        let Some(kind) = t.scope_kind() else {
            return match t {
                LayoutType::Boolean if tagged => Ok(0),
                LayoutType::Boolean => self.read_u8_at(offset).map(|_| 1),
                LayoutType::EndScope => Err(Error::invalid_row("EndScope has no value")),
                _ => self.primitive_value_size(offset, t),
            };
        };
        match kind {
            ScopeKind::Object | ScopeKind::Array | ScopeKind::Tuple => {
                let end =
                    self.skip_tagged_cells(layout, offset, kind.has_named_children(), depth + 1)?;
                Ok(end - offset)
            }
            ScopeKind::Udt => {
                let nested = self.resolve(args.schema_id())?;
                let sparse = self.udt_sparse_start(offset, &nested)?;
                let end = self.skip_tagged_cells(&nested, sparse, true, depth + 1)?;
                Ok(end - offset)
            }
            ScopeKind::TypedArray | ScopeKind::TypedSet | ScopeKind::TypedMap => {
                let count = self.read_u32_at(offset)?;
                let elem = element_type(kind, args, 0)?;
                let mut pos = offset + COUNT_SIZE;
                for _ in 0..count {
                    pos += self.sparse_value_size(
                        layout,
                        pos,
                        elem.layout_type(),
                        elem.type_args(),
                        false,
                        depth + 1,
                    )?;
                }
                Ok(pos - offset)
            }
            ScopeKind::TypedTuple | ScopeKind::Tagged | ScopeKind::Tagged2 => {
                let mut pos = offset;
                for arg in args.iter() {
                    pos += self.sparse_value_size(
                        layout,
                        pos,
                        arg.layout_type(),
                        arg.type_args(),
                        false,
                        depth + 1,
                    )?;
                }
                Ok(pos - offset)
            }
            ScopeKind::Nullable => {
                let inner = args.get(0).ok_or_else(|| missing_arg(t, 0))?;
                self.read_u8_at(offset)?;
                let size = self.sparse_value_size(
                    layout,
                    offset + 1,
                    inner.layout_type(),
                    inner.type_args(),
                    false,
                    depth + 1,
                )?;
                Ok(1 + size)
            }
        }
    }

    /// Walks tagged cells from `offset` and returns the offset just past the EndScope.
    fn skip_tagged_cells(
        &self,
        layout: &Arc<Layout>,
        offset: usize,
        named: bool,
        depth: u32,
    ) -> Result<usize, Error> {
        let end_scope = u8::from(LayoutCode::EndScope);
        let mut pos = offset;
        loop {
            if self.read_u8_at(pos)? == end_scope {
                return Ok(pos + 1);
            }
            let cell = self.read_sparse_cell(pos, named, layout.tokenizer().count(), depth)?;
            pos = cell.value_offset
                + self.sparse_value_size(
                    layout,
                    cell.value_offset,
                    cell.layout_type,
                    &cell.type_args,
                    true,
                    depth,
                )?;
        }
    }

    /// Offset just past the cell the cursor is positioned on.
    pub(crate) fn cell_end(&self, cursor: &RowCursor) -> Result<usize, Error> {
        let t = cursor
            .cell_type
            .ok_or_else(|| Error::not_found("cursor is not positioned on a cell"))?;
        let size = self.sparse_value_size(
            &cursor.layout,
            cursor.value_offset,
            t,
            &cursor.cell_type_args,
            !cursor.kind().is_typed(),
            0,
        )?;
        Ok(cursor.value_offset + size)
    }

    /// Writes the untagged default encoding of `arg`: zeros, empty strings, empty scopes.
    pub(crate) fn write_default_value(
        &self,
        writer: &mut Writer,
        arg: &TypeArgument,
        depth: u32,
    ) -> Result<(), Error> {
        self.check_depth(depth)?;
        let t = arg.layout_type();
        let end_scope = u8::from(LayoutCode::EndScope);
        match t {
            LayoutType::Null => {}
            LayoutType::EndScope => {
                return Err(Error::type_constraint("EndScope has no default value"))
            }
            LayoutType::VarInt | LayoutType::VarUInt | LayoutType::Utf8 | LayoutType::Binary => {
                writer.write_u8(0)
            }
            LayoutType::Scope { kind, .. } => match kind {
                ScopeKind::Object | ScopeKind::Array => writer.write_u8(end_scope),
                ScopeKind::Tuple => {
                    for _ in arg.type_args().iter() {
                        writer.write_u8(LayoutCode::Null.into());
                    }
                    writer.write_u8(end_scope);
                }
                ScopeKind::TypedArray | ScopeKind::TypedSet | ScopeKind::TypedMap => {
                    writer.write_u32(0)
                }
                ScopeKind::TypedTuple | ScopeKind::Tagged | ScopeKind::Tagged2 => {
                    for a in arg.type_args().iter() {
                        self.write_default_value(writer, a, depth + 1)?;
                    }
                }
                ScopeKind::Nullable => {
                    let inner = arg.type_args().get(0).ok_or_else(|| missing_arg(t, 0))?;
                    writer.write_u8(0);
                    self.write_default_value(writer, inner, depth + 1)?;
                }
                ScopeKind::Udt => {
                    let layout = self.resolve(arg.type_args().schema_id())?;
                    writer.skip(layout.size());
                    writer.write_u8(end_scope);
                }
            },
            other => writer.skip(other.fixed_size().unwrap_or(0)),
        }
        Ok(())
    }

    fn prepare_sparse_write(
        &self,
        edit: &RowCursor,
        arg: &TypeArgument,
        options: UpdateOptions,
    ) -> Result<(), Error> {
        let kind = edit.kind();
        if edit.immutable {
            return Err(Error::insufficient_permissions(format!(
                "cannot write into immutable {:?} scope",
                kind
            )));
        }
        if kind.is_unique() {
            if options == UpdateOptions::InsertAt {
                return Err(Error::type_constraint(
                    "positional insert is not allowed in a set or map",
                ));
            }
            if !edit.defer_unique_index {
                return Err(Error::insufficient_permissions(
                    "set and map children are written through move_field",
                ));
            }
        }
        if options == UpdateOptions::InsertAt && kind.has_named_children() {
            return Err(Error::type_constraint(format!(
                "positional insert is not allowed in {:?} scopes",
                kind
            )));
        }
        if kind.is_fixed_arity() && (!edit.exists || options == UpdateOptions::InsertAt) {
            return Err(Error::type_constraint(format!(
                "{:?} scopes have a fixed number of slots",
                kind
            )));
        }
        if options == UpdateOptions::Insert && edit.exists {
            return Err(Error::exists("a value already exists at this position"));
        }
        if options == UpdateOptions::Update && !edit.exists {
            return Err(Error::not_found("no value exists at this position"));
        }
        if kind.is_typed() {
            let elem = element_type(kind, &edit.scope_type_args, edit.index)?;
            if elem != *arg {
                return Err(Error::type_constraint(format!(
                    "{} does not match element type {}",
                    arg, elem
                )));
            }
        } else if kind == ScopeKind::Tuple {
            let declared = edit
                .scope_type_args
                .get(edit.index)
                .ok_or_else(|| Error::type_constraint("tuple index out of range"))?;
            if arg.layout_type() != LayoutType::Null && declared != arg {
                return Err(Error::type_constraint(format!(
                    "{} does not match tuple slot type {}",
                    arg, declared
                )));
            }
        }
        if kind.has_named_children() && edit.write_path.is_none() && !edit.exists {
            return Err(Error::type_constraint(
                "a path is required to write into a named scope",
            ));
        }
        Ok(())
    }

    /// Writes a cell with already-encoded payload at the cursor, inserting or
    /// replacing per `options`, and leaves the cursor positioned on it.
    fn write_sparse_cell(
        &mut self,
        edit: &mut RowCursor,
        arg: &TypeArgument,
        code: LayoutCode,
        payload: &[u8],
        options: UpdateOptions,
    ) -> Result<(), Error> {
        self.prepare_sparse_write(edit, arg, options)?;
        let kind = edit.kind();
        let mut writer = Writer::with_capacity(payload.len() + 8);
        let mut path_token = None;
        let mut path_offset = 0;
        let mut path_len = 0;
        if !kind.is_typed() {
            writer.write_u8(code.into());
            Self::write_type_args(&mut writer, arg.layout_type(), arg.type_args())?;
            if kind.has_named_children() {
                let path = match &edit.write_path {
                    Some(path) => path.clone(),
                    None => edit.path(self)?.to_string(),
                };
                let tokenizer = edit.layout.tokenizer();
                match tokenizer.find_token(&path) {
                    Some(token) => {
                        writer.write_varuint64(token);
                        path_token = Some(token);
                    }
                    None => {
                        writer.write_varuint64(tokenizer.count() + path.len() as u64);
                        path_offset = edit.meta_offset + writer.len();
                        path_len = path.len();
                        writer.write_bytes(path.as_bytes());
                    }
                }
            }
        }
        let meta_len = writer.len();
        writer.write_bytes(payload);

        let replace = edit.exists && options != UpdateOptions::InsertAt;
        let remove = if replace {
            self.cell_end(edit)? - edit.meta_offset
        } else {
            0
        };
        self.splice(edit.meta_offset, remove, writer.as_slice())?;
        if !replace && kind.is_counted() {
            edit.count += 1;
            self.write_u32_at(edit.start - COUNT_SIZE, edit.count as u32)?;
        }

        edit.exists = true;
        edit.cell_type = Some(arg.layout_type());
        edit.cell_type_args = arg.type_args().clone();
        edit.value_offset = edit.meta_offset + meta_len;
        edit.path_token = path_token;
        edit.path_offset = path_offset;
        edit.path_len = path_len;
        edit.next_hint = None;
        Ok(())
    }

    pub fn write_sparse<'v, T: LayoutCodec<'v>>(
        &mut self,
        edit: &mut RowCursor,
        value: &T,
        options: UpdateOptions,
    ) -> Result<(), Error> {
        let arg = TypeArgument::of(T::LAYOUT_TYPE);
        let mut writer = Writer::default();
        let code = if edit.kind().is_typed() {
            value.encode(&mut writer)?;
            T::LAYOUT_TYPE.code()
        } else {
            value.encode_tagged(&mut writer)?;
            value.sparse_code()
        };
        self.write_sparse_cell(edit, &arg, code, writer.as_slice(), options)
    }

    pub fn read_sparse<'a, T: LayoutCodec<'a>>(&'a self, edit: &RowCursor) -> Result<T, Error> {
        if !edit.exists {
            return Err(Error::not_found("cursor is not positioned on a value"));
        }
        if edit.cell_type != Some(T::LAYOUT_TYPE) {
            return Err(Error::type_mismatch(format!(
                "stored {:?}, requested {:?}",
                edit.cell_type, T::LAYOUT_TYPE
            )));
        }
        let mut reader = self.reader_at(edit.value_offset)?;
        if edit.kind().is_typed() {
            T::decode(&mut reader)
        } else {
            let code = layout_code(self.read_u8_at(edit.meta_offset)?)?;
            T::decode_tagged(code, &mut reader)
        }
    }

    pub(crate) fn prepare_sparse_delete(&self, edit: &RowCursor) -> Result<(), Error> {
        let kind = edit.kind();
        if kind.is_fixed_arity() {
            return Err(Error::type_constraint(format!(
                "cannot remove a slot of a {:?} scope",
                kind
            )));
        }
        if edit.immutable || (kind.is_unique() && !edit.defer_unique_index) {
            return Err(Error::insufficient_permissions(format!(
                "cannot delete from {:?} scope directly",
                kind
            )));
        }
        Ok(())
    }

    /// Removes the cell under the cursor. The cursor is left before the
    /// following sibling; a no-op when nothing is there.
    pub fn delete_sparse(&mut self, edit: &mut RowCursor) -> Result<(), Error> {
        self.prepare_sparse_delete(edit)?;
        if !edit.exists {
            return Ok(());
        }
        let end = self.cell_end(edit)?;
        self.splice(edit.meta_offset, end - edit.meta_offset, &[])?;
        if edit.kind().is_counted() {
            edit.count = edit.count.saturating_sub(1);
            self.write_u32_at(edit.start - COUNT_SIZE, edit.count as u32)?;
        }
        let write_path = edit.write_path.take();
        edit.exists = false;
        edit.cell_type = None;
        edit.cell_type_args = TypeArgumentList::default();
        edit.path_token = None;
        edit.path_len = 0;
        edit.value_offset = edit.meta_offset;
        edit.next_hint = None;
        edit.write_path = write_path;
        Ok(())
    }

    /// Writes an empty scope of `type_arg` at the cursor and returns a cursor
    /// over its content. Children of fixed-arity scopes come back positioned
    /// on the first slot.
    pub fn write_scope(
        &mut self,
        edit: &mut RowCursor,
        type_arg: &TypeArgument,
        options: UpdateOptions,
    ) -> Result<RowCursor, Error> {
        self.write_scope_inner(edit, type_arg, options, false)
    }

    /// Writes a nullable scope. When `has_value` is false the value slot keeps its default.
    pub fn write_nullable(
        &mut self,
        edit: &mut RowCursor,
        type_arg: &TypeArgument,
        options: UpdateOptions,
        has_value: bool,
    ) -> Result<RowCursor, Error> {
        if type_arg.layout_type().scope_kind() != Some(ScopeKind::Nullable) {
            return Err(Error::type_constraint(format!(
                "{} is not a nullable type",
                type_arg
            )));
        }
        self.write_scope_inner(edit, type_arg, options, has_value)
    }

    fn write_scope_inner(
        &mut self,
        edit: &mut RowCursor,
        type_arg: &TypeArgument,
        options: UpdateOptions,
        has_value: bool,
    ) -> Result<RowCursor, Error> {
        let t = type_arg.layout_type();
        let kind = t
            .scope_kind()
            .ok_or_else(|| Error::type_constraint(format!("{} is not a scope type", type_arg)))?;
        let mut writer = Writer::default();
        self.write_default_value(&mut writer, type_arg, 0)?;
        if kind == ScopeKind::Nullable && has_value {
            writer.set_bytes(0, &[1]);
        }
        self.write_sparse_cell(edit, type_arg, t.code(), writer.as_slice(), options)?;
        let mut child = self.child_cursor(edit, false)?;
        if kind.is_fixed_arity() {
            child.move_next(self)?;
        }
        Ok(child)
    }

    /// Cursor over the content of the scope the cursor is positioned on.
    pub fn read_scope(&self, edit: &RowCursor) -> Result<RowCursor, Error> {
        if !edit.exists {
            return Err(Error::not_found("cursor is not positioned on a value"));
        }
        let t = edit
            .cell_type
            .ok_or_else(|| Error::not_found("cursor is not positioned on a value"))?;
        if !t.is_scope() {
            return Err(Error::type_mismatch(format!("{:?} is not a scope", t)));
        }
        let immutable = edit.immutable || t.is_immutable() || edit.kind().is_unique();
        self.child_cursor(edit, immutable)
    }

    fn child_cursor(&self, edit: &RowCursor, immutable: bool) -> Result<RowCursor, Error> {
        let t = edit
            .cell_type
            .ok_or_else(|| Error::not_found("cursor is not positioned on a value"))?;
        let kind = t
            .scope_kind()
            .ok_or_else(|| Error::type_mismatch(format!("{:?} is not a scope", t)))?;
        let args = edit.cell_type_args.clone();
        let value_offset = edit.value_offset;
        let mut layout = edit.layout.clone();
        let (start, meta_offset, count) = match kind {
            ScopeKind::Udt => {
                layout = self.resolve(args.schema_id())?;
                let meta = self.udt_sparse_start(value_offset, &layout)?;
                (value_offset, meta, 0)
            }
            ScopeKind::TypedArray | ScopeKind::TypedSet | ScopeKind::TypedMap => {
                let count = self.read_u32_at(value_offset)? as usize;
                let start = value_offset + COUNT_SIZE;
                (start, start, count)
            }
            ScopeKind::Nullable => {
                let count = usize::from(self.read_u8_at(value_offset)? != 0);
                (value_offset + 1, value_offset + 1, count)
            }
            ScopeKind::TypedTuple | ScopeKind::Tagged | ScopeKind::Tagged2 | ScopeKind::Tuple => {
                (value_offset, value_offset, args.len())
            }
            ScopeKind::Object | ScopeKind::Array => (value_offset, value_offset, 0),
        };
        Ok(RowCursor::new_scope(
            layout,
            t,
            args,
            immutable,
            start,
            meta_offset,
            count,
        ))
    }

    /// Removes the scope under the cursor with all its content.
    pub fn delete_scope(&mut self, edit: &mut RowCursor) -> Result<(), Error> {
        if let Some(t) = edit.cell_type {
            if !t.is_scope() {
                return Err(Error::type_mismatch(format!("{:?} is not a scope", t)));
            }
        }
        self.delete_sparse(edit)
    }

    pub fn nullable_has_value(&self, edit: &RowCursor) -> Result<bool, Error> {
        match edit.cell_type {
            None => Err(Error::not_found("cursor is not positioned on a value")),
            Some(t) if t.scope_kind() == Some(ScopeKind::Nullable) => {
                Ok(self.read_u8_at(edit.value_offset)? != 0)
            }
            Some(t) => Err(Error::type_mismatch(format!("{:?} is not nullable", t))),
        }
    }

    /// Offset just past the content of the scope `scope` iterates.
    pub fn scope_end(&self, scope: &RowCursor) -> Result<usize, Error> {
        if scope.is_root() {
            return Ok(self.len());
        }
        let value_start = match scope.kind() {
            ScopeKind::TypedArray | ScopeKind::TypedSet | ScopeKind::TypedMap => {
                scope.start - COUNT_SIZE
            }
            ScopeKind::Nullable => scope.start - 1,
            _ => scope.start,
        };
        let size = self.sparse_value_size(
            &scope.layout,
            value_start,
            scope.scope_type,
            &scope.scope_type_args,
            false,
            0,
        )?;
        Ok(value_start + size)
    }
}
