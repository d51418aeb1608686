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

//! # HybridRow
//!
//! Read and write HybridRow binary rows: one flat buffer holding a UDT's
//! schematized columns followed by self-describing sparse cells, updated in
//! place.
//!
//! ## Building a row
//!
//! A row is initialized from a [`Layout`](layout::Layout) and filled with a
//! [`RowWriter`]. Paths that name a fixed or variable column of the layout are
//! stored at their schematized position; any other path becomes a sparse cell.
//! Nested scopes are written through callbacks:
//!
//! ```rust
//! use hybridrow::layout::{LayoutBuilder, LayoutType, SchemaId, SimpleLayoutResolver, TypeArgument};
//! use hybridrow::{Error, HybridRowVersion, RowBuffer, RowReader, RowWriter};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Error> {
//! let mut resolver = SimpleLayoutResolver::new();
//! let layout = resolver.register(
//!     LayoutBuilder::new("Album", SchemaId(1))
//!         .add_variable_column("title", LayoutType::Utf8)
//!         .build()?,
//! )?;
//! let mut row = RowBuffer::new(256);
//! row.init_layout(HybridRowVersion::V1, &layout, Arc::new(resolver))?;
//!
//! let tags = TypeArgument::typed_array(TypeArgument::of(LayoutType::Utf8));
//! RowWriter::write_buffer(&mut row, (), |w, _, _| {
//!     w.write_string("title", "Off the Wall")?;
//!     w.write_scope("tags", &tags, (), |w, _, _| {
//!         w.write_string("", "funk")?;
//!         w.write_string("", "soul")
//!     })
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading a row
//!
//! [`RowReader`] walks a scope front to back: present schematized columns
//! first, then sparse cells. Nested scopes get their own reader.
//!
//! ```rust
//! # use hybridrow::layout::{LayoutBuilder, LayoutType, SchemaId, SimpleLayoutResolver, TypeArgument};
//! # use hybridrow::{Error, HybridRowVersion, RowBuffer, RowReader, RowWriter};
//! # use std::sync::Arc;
//! # fn main() -> Result<(), Error> {
//! # let mut resolver = SimpleLayoutResolver::new();
//! # let layout = resolver.register(
//! #     LayoutBuilder::new("Album", SchemaId(1))
//! #         .add_variable_column("title", LayoutType::Utf8)
//! #         .build()?,
//! # )?;
//! # let mut row = RowBuffer::new(256);
//! # row.init_layout(HybridRowVersion::V1, &layout, Arc::new(resolver))?;
//! # let tags = TypeArgument::typed_array(TypeArgument::of(LayoutType::Utf8));
//! # RowWriter::write_buffer(&mut row, (), |w, _, _| {
//! #     w.write_string("title", "Off the Wall")?;
//! #     w.write_scope("tags", &tags, (), |w, _, _| {
//! #         w.write_string("", "funk")?;
//! #         w.write_string("", "soul")
//! #     })
//! # })?;
//! let mut reader = RowReader::new(&row)?;
//! let mut tags = Vec::new();
//! while reader.read()? {
//!     if reader.path()? == "tags" {
//!         reader.read_scope_with(&mut tags, |child, tags| {
//!             while child.read()? {
//!                 tags.push(child.read_string()?.to_string());
//!             }
//!             Ok(())
//!         })?;
//!     }
//! }
//! assert_eq!(tags, ["funk", "soul"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sets and maps
//!
//! Typed sets and maps keep their elements sorted by encoded bytes and reject
//! duplicates. Their elements cannot be written directly once the scope is
//! built; stage a value as a sparse cell and move it in with
//! [`RowBuffer::move_field`] under an [`UpdateOptions`] policy.

pub use hybridrow_core::{
    codec, config::Config, error::Error, error::ResultCode, layout, row::Checkpoint,
    row::HybridRowHeader, row::ReaderState, row::RowBuffer, row::RowCursor, row::RowReader,
    row::RowWriter, types::HybridRowVersion, types::LayoutCode, types::UpdateOptions,
};
pub use hybridrow_core::{bail, ensure};
