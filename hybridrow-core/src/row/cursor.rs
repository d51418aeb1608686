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
use crate::error::Error;
use crate::layout::{Layout, LayoutType, ScopeKind, StorageKind, TypeArgument, TypeArgumentList};
use crate::types::{LayoutCode, HEADER_SIZE};
use std::sync::Arc;

/// Position within one scope of a row.
///
/// A cursor starts before the first child. [`RowCursor::move_next`] positions it
/// on each child in turn; while positioned, `exists` is true and the cell's type
/// and value offset are known. Cursors hold offsets, not bytes, so they must be
/// re-derived after a mutation that happened ahead of them.
#[derive(Clone, Debug)]
pub struct RowCursor {
    /// Layout of the nearest enclosing UDT; supplies path tokens for named scopes.
    pub(crate) layout: Arc<Layout>,
    pub(crate) scope_type: LayoutType,
    pub(crate) scope_type_args: TypeArgumentList,
    pub(crate) immutable: bool,
    /// Children of a set or map may be appended out of order; the owner rebuilds the index after.
    pub(crate) defer_unique_index: bool,
    /// First byte of the scope's children (after any count or has-value prefix).
    pub(crate) start: usize,
    pub(crate) exists: bool,
    /// Path used when writing a new cell into a named scope.
    pub(crate) write_path: Option<String>,
    pub(crate) path_token: Option<u64>,
    pub(crate) path_offset: usize,
    pub(crate) path_len: usize,
    pub(crate) meta_offset: usize,
    pub(crate) cell_type: Option<LayoutType>,
    pub(crate) cell_type_args: TypeArgumentList,
    pub(crate) value_offset: usize,
    pub(crate) count: usize,
    pub(crate) index: usize,
    pub(crate) next_hint: Option<usize>,
}

impl RowCursor {
    pub(crate) fn new_scope(
        layout: Arc<Layout>,
        scope_type: LayoutType,
        scope_type_args: TypeArgumentList,
        immutable: bool,
        start: usize,
        meta_offset: usize,
        count: usize,
    ) -> RowCursor {
        RowCursor {
            layout,
            scope_type,
            scope_type_args,
            immutable,
            defer_unique_index: false,
            start,
            exists: false,
            write_path: None,
            path_token: None,
            path_offset: 0,
            path_len: 0,
            meta_offset,
            cell_type: None,
            cell_type_args: TypeArgumentList::default(),
            value_offset: meta_offset,
            count,
            index: 0,
            next_hint: None,
        }
    }

    /// Cursor over the root UDT named by the row header.
    pub fn root(row: &RowBuffer) -> Result<RowCursor, Error> {
        let header = row.header()?;
        let layout = row.resolve(header.schema_id)?;
        let meta_offset = row.udt_sparse_start(HEADER_SIZE, &layout)?;
        Ok(RowCursor::new_scope(
            layout,
            LayoutType::scope(ScopeKind::Udt),
            TypeArgumentList::from_schema_id(header.schema_id),
            false,
            HEADER_SIZE,
            meta_offset,
            0,
        ))
    }

    pub(crate) fn kind(&self) -> ScopeKind {
        self.scope_type.scope_kind().unwrap_or(ScopeKind::Udt)
    }

    pub fn is_root(&self) -> bool {
        self.kind() == ScopeKind::Udt && self.start == HEADER_SIZE
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn scope_type(&self) -> LayoutType {
        self.scope_type
    }

    pub fn scope_type_args(&self) -> &TypeArgumentList {
        &self.scope_type_args
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of children in a counted or fixed-arity scope.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn cell_type(&self) -> Option<LayoutType> {
        self.cell_type
    }

    pub fn cell_type_args(&self) -> &TypeArgumentList {
        &self.cell_type_args
    }

    /// Type of the current cell with its arguments.
    pub fn cell_type_arg(&self) -> Option<TypeArgument> {
        self.cell_type
            .map(|t| TypeArgument::new(t, self.cell_type_args.clone()))
    }

    pub fn value_offset(&self) -> usize {
        self.value_offset
    }

    pub fn meta_offset(&self) -> usize {
        self.meta_offset
    }

    /// Path of the current cell in a named scope; empty elsewhere.
    pub fn path<'r>(&'r self, row: &'r RowBuffer) -> Result<&'r str, Error> {
        if !self.exists || !self.kind().has_named_children() {
            return Ok("");
        }
        if let Some(token) = self.path_token {
            return self.layout.tokenizer().find_string(token).ok_or_else(|| {
                Error::invalid_row(format!("unknown path token {}", token))
            });
        }
        let bytes = row.read_fixed_bytes(self.path_offset, self.path_len)?;
        std::str::from_utf8(bytes).map_err(|e| Error::invalid_row(format!("invalid path: {}", e)))
    }

    fn clear_cell(&mut self) {
        self.exists = false;
        self.write_path = None;
        self.path_token = None;
        self.path_offset = 0;
        self.path_len = 0;
        self.cell_type = None;
        self.cell_type_args = TypeArgumentList::default();
        self.next_hint = None;
    }

    /// Moves back before the first child.
    pub fn reset(&mut self, row: &RowBuffer) -> Result<(), Error> {
        self.meta_offset = match self.kind() {
            ScopeKind::Udt => row.udt_sparse_start(self.start, &self.layout)?,
            _ => self.start,
        };
        self.value_offset = self.meta_offset;
        self.index = 0;
        self.clear_cell();
        Ok(())
    }

    pub(crate) fn at_scope_end(&self, row: &RowBuffer) -> Result<bool, Error> {
        if self.is_root() {
            return Ok(self.meta_offset >= row.len());
        }
        if self.kind().is_typed() {
            return Ok(self.index >= self.count);
        }
        Ok(row.read_u8_at(self.meta_offset)? == u8::from(LayoutCode::EndScope))
    }

    /// Advances to the next child. Returns false once the scope is exhausted.
    pub fn move_next(&mut self, row: &RowBuffer) -> Result<bool, Error> {
        if self.exists {
            let end = match self.next_hint {
                Some(end) => end,
                None => row.cell_end(self)?,
            };
            self.meta_offset = end;
            self.value_offset = end;
            self.index += 1;
            self.clear_cell();
        }
        if self.at_scope_end(row)? {
            return Ok(false);
        }
        row.read_sparse_metadata(self)?;
        self.exists = true;
        Ok(true)
    }

    /// Positions on the sparse child named `path`, or at the insertion point
    /// after the last child when there is none. Either way the next write on
    /// this cursor targets `path`.
    ///
    /// Fixed and variable columns of a UDT are not cells; naming one fails with
    /// `TypeConstraint`.
    pub fn find(&mut self, row: &RowBuffer, path: &str) -> Result<bool, Error> {
        if !self.kind().has_named_children() {
            return Err(Error::type_constraint(format!(
                "{:?} scopes are not addressed by path",
                self.kind()
            )));
        }
        if self.kind() == ScopeKind::Udt {
            if let Some(col) = self.layout.try_find(path) {
                if col.storage() != StorageKind::Sparse {
                    return Err(Error::type_constraint(format!(
                        "column {} is {:?}, not sparse",
                        path,
                        col.storage()
                    )));
                }
            }
        }
        self.reset(row)?;
        let token = self.layout.tokenizer().find_token(path);
        while self.move_next(row)? {
            let matched = match (self.path_token, token) {
                (Some(found), Some(wanted)) => found == wanted,
                (Some(_), None) => false,
                (None, _) => {
                    row.read_fixed_bytes(self.path_offset, self.path_len)? == path.as_bytes()
                }
            };
            if matched {
                self.write_path = Some(path.to_string());
                return Ok(true);
            }
        }
        self.write_path = Some(path.to_string());
        Ok(false)
    }
}
