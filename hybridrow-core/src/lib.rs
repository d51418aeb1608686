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

//! # HybridRow Core
//!
//! Core implementation of the HybridRow binary row format: a self-describing
//! row that mixes schematized columns (at fixed offsets or in a compact
//! variable region) with sparse, tagged cells that can nest arbitrarily.
//!
//! ## Architecture
//!
//! - **`buffer`**: little-endian and varint primitives over byte slices
//! - **`codec`**: encoders and decoders for every value type
//! - **`layout`**: resolved schema metadata, path tokens and layout resolvers
//! - **`row`**: the row buffer, cursors, and the streaming reader and writer
//! - **`types`**: layout codes, format version and update policies
//! - **`config`**: row buffer configuration
//! - **`error`**: error handling and result codes
//!
//! ## Row layout
//!
//! ```text
//! [version:u8][schema id:i32]
//! [presence bitmask][fixed columns][variable columns][sparse cells...]
//! ```
//!
//! A sparse cell is `[code][type args][path][payload]`. Sets and maps keep their
//! elements sorted by encoded bytes so that membership checks and merges are
//! plain byte comparisons.
//!
//! ## Usage
//!
//! ```rust
//! use hybridrow_core::error::Error;
//! use hybridrow_core::layout::{
//!     LayoutBuilder, LayoutResolver, LayoutType, SchemaId, SimpleLayoutResolver, TypeArgument,
//! };
//! use hybridrow_core::row::{RowBuffer, RowReader, RowWriter};
//! use hybridrow_core::types::HybridRowVersion;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Error> {
//! let mut resolver = SimpleLayoutResolver::new();
//! let layout = resolver.register(
//!     LayoutBuilder::new("Song", SchemaId(1))
//!         .add_fixed_column("year", LayoutType::Int32, true)
//!         .add_variable_column("title", LayoutType::Utf8)
//!         .build()?,
//! )?;
//! let resolver: Arc<dyn LayoutResolver> = Arc::new(resolver);
//!
//! let mut row = RowBuffer::new(128);
//! row.init_layout(HybridRowVersion::V1, &layout, resolver)?;
//! let tags = TypeArgument::typed_array(TypeArgument::of(LayoutType::Utf8));
//! RowWriter::write_buffer(&mut row, (), |w, _, _| {
//!     w.write_int32("year", 1979)?;
//!     w.write_string("title", "Good Times")?;
//!     w.write_scope("tags", &tags, (), |w, _, _| w.write_string("", "disco"))
//! })?;
//!
//! let mut reader = RowReader::new(&row)?;
//! assert!(reader.read()?);
//! assert_eq!(reader.path()?, "year");
//! assert_eq!(reader.read_int32()?, 1979);
//! assert!(reader.read()?);
//! assert_eq!(reader.read_string()?, "Good Times");
//! assert!(reader.read()?);
//! assert_eq!(reader.path()?, "tags");
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod layout;
pub mod row;
pub mod types;
