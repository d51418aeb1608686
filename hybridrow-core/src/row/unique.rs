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

//! Sets and maps keep their elements sorted by encoded bytes with no two
//! elements (map keys) equal. Elements are never written directly; a value is
//! staged as an ordinary cell elsewhere in the row and moved into place.

use super::buffer::RowBuffer;
use super::cursor::RowCursor;
use crate::buffer::Writer;
use crate::codec::LayoutCodec;
use crate::error::Error;
use crate::layout::{element_type, LayoutType, ScopeKind};
use crate::types::{LayoutCode, UpdateOptions, COUNT_SIZE};
use std::cmp::Ordering;
use tracing::debug;

/// Byte range of one element and of its comparison key.
#[derive(Clone, Copy, Debug)]
struct Element {
    offset: usize,
    key_end: usize,
    end: usize,
}

/// Outcome of a sorted search over a uniqueness scope.
struct SearchResult {
    index: usize,
    offset: usize,
    found: Option<Element>,
}

impl RowBuffer {
    fn unique_scope_kind(scope: &RowCursor) -> Result<ScopeKind, Error> {
        let kind = scope.kind();
        if !kind.is_unique() {
            return Err(Error::type_constraint(format!(
                "{:?} scopes do not enforce uniqueness",
                kind
            )));
        }
        Ok(kind)
    }

    fn unique_elements(&self, scope: &RowCursor) -> Result<Vec<Element>, Error> {
        let kind = Self::unique_scope_kind(scope)?;
        let elem = element_type(kind, &scope.scope_type_args, 0)?;
        let key = match kind {
            ScopeKind::TypedMap => elem.type_args().get(0).cloned(),
            _ => None,
        };
        let mut elements = Vec::with_capacity(scope.count);
        let mut pos = scope.start;
        for _ in 0..scope.count {
            let size = self.sparse_value_size(
                &scope.layout,
                pos,
                elem.layout_type(),
                elem.type_args(),
                false,
                0,
            )?;
            let key_end = match &key {
                Some(k) => {
                    pos + self.sparse_value_size(
                        &scope.layout,
                        pos,
                        k.layout_type(),
                        k.type_args(),
                        false,
                        0,
                    )?
                }
                None => pos + size,
            };
            self.read_fixed_bytes(pos, size)?;
            elements.push(Element {
                offset: pos,
                key_end,
                end: pos + size,
            });
            pos += size;
        }
        Ok(elements)
    }

    fn element_key_bytes(&self, e: &Element) -> Result<&[u8], Error> {
        self.read_fixed_bytes(e.offset, e.key_end - e.offset)
    }

    /// First element whose key is not less than `key`.
    fn unique_search(&self, scope: &RowCursor, key: &[u8]) -> Result<SearchResult, Error> {
        let elements = self.unique_elements(scope)?;
        for (index, e) in elements.iter().enumerate() {
            match self.element_key_bytes(e)?.cmp(key) {
                Ordering::Less => continue,
                Ordering::Equal => {
                    return Ok(SearchResult {
                        index,
                        offset: e.offset,
                        found: Some(*e),
                    })
                }
                Ordering::Greater => {
                    return Ok(SearchResult {
                        index,
                        offset: e.offset,
                        found: None,
                    })
                }
            }
        }
        Ok(SearchResult {
            index: elements.len(),
            offset: elements.last().map_or(scope.start, |e| e.end),
            found: None,
        })
    }

    /// Untagged bytes of the value under `cursor`.
    fn untagged_value_bytes(&self, cursor: &RowCursor) -> Result<Vec<u8>, Error> {
        if !cursor.exists {
            return Err(Error::not_found("cursor is not positioned on a value"));
        }
        if cursor.cell_type == Some(LayoutType::Boolean) && !cursor.kind().is_typed() {
            let code = self.read_u8_at(cursor.meta_offset)?;
            return Ok(vec![u8::from(code == u8::from(LayoutCode::Boolean))]);
        }
        let end = self.cell_end(cursor)?;
        let bytes = self.read_fixed_bytes(cursor.value_offset, end - cursor.value_offset)?;
        Ok(bytes.to_vec())
    }

    /// Comparison key of an encoded element: the whole value, or the key of a map entry.
    fn element_key<'b>(
        &self,
        scope: &RowCursor,
        bytes: &'b [u8],
    ) -> Result<&'b [u8], Error> {
        if scope.kind() != ScopeKind::TypedMap {
            return Ok(bytes);
        }
        let key = scope
            .scope_type_args
            .get(0)
            .ok_or_else(|| Error::type_constraint("map requires a key type"))?;
        let len = match key.layout_type().fixed_size() {
            Some(size) if !key.layout_type().is_scope() => size,
            _ => {
                // Size variable keys against a scratch row holding just the element.
                let scratch = RowBuffer {
                    buffer: bytes.to_vec(),
                    resolver: self.resolver.clone(),
                    config: self.config.clone(),
                };
                scratch.sparse_value_size(
                    &scope.layout,
                    0,
                    key.layout_type(),
                    key.type_args(),
                    false,
                    0,
                )?
            }
        };
        bytes
            .get(..len)
            .ok_or_else(|| Error::too_few_bytes(0, len, bytes.len()))
    }

    /// Cursor positioned on the element equal to `pattern`'s value (or map entry
    /// with the same key), or `NotFound`.
    pub fn find_unique(&self, scope: &RowCursor, pattern: &RowCursor) -> Result<RowCursor, Error> {
        Self::unique_scope_kind(scope)?;
        let bytes = self.untagged_value_bytes(pattern)?;
        let key = self.element_key(scope, &bytes)?;
        self.find_unique_key(scope, key)
    }

    /// Like [`RowBuffer::find_unique`] for a value given directly. For maps `value` is the key.
    pub fn find_unique_value<'v, T: LayoutCodec<'v>>(
        &self,
        scope: &RowCursor,
        value: &T,
    ) -> Result<RowCursor, Error> {
        let mut writer = Writer::default();
        value.encode(&mut writer)?;
        self.find_unique_key(scope, writer.as_slice())
    }

    fn find_unique_key(&self, scope: &RowCursor, key: &[u8]) -> Result<RowCursor, Error> {
        let result = self.unique_search(scope, key)?;
        if result.found.is_none() {
            return Err(Error::not_found("no equal element in the scope"));
        }
        let mut cursor = scope.clone();
        cursor.meta_offset = result.offset;
        cursor.index = result.index;
        cursor.exists = false;
        cursor.next_hint = None;
        self.read_sparse_metadata(&mut cursor)?;
        cursor.exists = true;
        Ok(cursor)
    }

    /// Moves the value under `source` into the set or map `dest`, keeping it
    /// sorted. The source cell is removed. `dest` is reset to before its first
    /// element; `source` is left where the removed cell was.
    pub fn move_field(
        &mut self,
        dest: &mut RowCursor,
        source: &mut RowCursor,
        options: UpdateOptions,
    ) -> Result<(), Error> {
        let kind = Self::unique_scope_kind(dest)?;
        if dest.immutable {
            return Err(Error::insufficient_permissions(
                "cannot move into an immutable scope",
            ));
        }
        if options == UpdateOptions::InsertAt {
            return Err(Error::type_constraint(
                "positional insert is not allowed in a set or map",
            ));
        }
        if !source.exists {
            return Err(Error::not_found("source cursor is not positioned on a value"));
        }
        let elem = element_type(kind, &dest.scope_type_args, 0)?;
        if source.cell_type_arg().as_ref() != Some(&elem) {
            return Err(Error::type_constraint(format!(
                "source {:?} does not match element type {}",
                source.cell_type, elem
            )));
        }
        let dest_end = self.scope_end(dest)?;
        if source.meta_offset >= dest.start && source.meta_offset < dest_end {
            return Err(Error::type_constraint("source lies inside the destination scope"));
        }
        self.prepare_sparse_delete(source)?;

        let bytes = self.untagged_value_bytes(source)?;
        let key = self.element_key(dest, &bytes)?.to_vec();
        let search = self.unique_search(dest, &key)?;
        match (options, search.found) {
            (UpdateOptions::Insert, Some(_)) => {
                return Err(Error::exists("an equal element is already present"))
            }
            (UpdateOptions::Update, None) => {
                return Err(Error::not_found("no equal element to update"))
            }
            _ => {}
        }

        let removed = search.found.map_or(0, |e| e.end - e.offset);
        self.splice(search.offset, removed, &bytes)?;
        if search.found.is_none() {
            dest.count += 1;
            self.write_u32_at(dest.start - COUNT_SIZE, dest.count as u32)?;
        }
        let delta = bytes.len() as isize - removed as isize;

        let source_len = self.cell_end_shifted(source, search.offset, delta)?;
        if source.meta_offset < dest.start {
            dest.start -= source_len;
        }
        self.delete_sparse(source)?;

        dest.meta_offset = dest.start;
        dest.value_offset = dest.start;
        dest.index = 0;
        dest.exists = false;
        dest.cell_type = None;
        dest.next_hint = None;
        Ok(())
    }

    /// Shifts a cursor lying after `at` by `delta` and returns its cell length.
    fn cell_end_shifted(
        &self,
        cursor: &mut RowCursor,
        at: usize,
        delta: isize,
    ) -> Result<usize, Error> {
        if cursor.meta_offset >= at {
            let shift = |v: usize| (v as isize + delta) as usize;
            if cursor.start >= at {
                cursor.start = shift(cursor.start);
            }
            cursor.meta_offset = shift(cursor.meta_offset);
            cursor.value_offset = shift(cursor.value_offset);
            if cursor.path_len > 0 {
                cursor.path_offset = shift(cursor.path_offset);
            }
        }
        cursor.next_hint = None;
        Ok(self.cell_end(cursor)? - cursor.meta_offset)
    }

    /// Sorts the elements of a set or map written with deferred uniqueness.
    /// Fails with `Exists` when two elements (map keys) are equal.
    pub fn unique_index_rebuild(&mut self, scope: &RowCursor) -> Result<(), Error> {
        let elements = self.unique_elements(scope)?;
        if elements.len() < 2 {
            return Ok(());
        }
        let region_start = scope.start;
        let region_end = elements.last().map_or(region_start, |e| e.end);
        let mut keyed = elements
            .iter()
            .map(|e| Ok((*e, self.element_key_bytes(e)?)))
            .collect::<Result<Vec<_>, Error>>()?;
        keyed.sort_by(|a, b| a.1.cmp(b.1));
        for pair in keyed.windows(2) {
            if pair[0].1 == pair[1].1 {
                debug!(
                    offset = pair[1].0.offset,
                    "duplicate element in unique scope"
                );
                return Err(Error::exists("duplicate element in set or map"));
            }
        }
        let mut sorted = Vec::with_capacity(region_end - region_start);
        for (e, _) in &keyed {
            sorted.extend_from_slice(self.read_fixed_bytes(e.offset, e.end - e.offset)?);
        }
        self.write_fixed_bytes(region_start, &sorted)
    }
}
