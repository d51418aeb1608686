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

use super::{
    Layout, LayoutBit, LayoutColumn, LayoutType, SchemaId, StorageKind, StringTokenizer,
    TypeArgument,
};
use crate::ensure;
use crate::error::Error;
use std::collections::HashMap;

struct PendingColumn {
    path: String,
    type_arg: TypeArgument,
    nullable: bool,
}

/// Assembles a [`Layout`] from column declarations.
///
/// Bits are assigned in declaration order: each nullable fixed column gets a
/// presence bit, each boolean fixed column a value bit, then every variable
/// column a presence bit. Boolean columns take no bytes in the fixed region.
pub struct LayoutBuilder {
    name: String,
    schema_id: SchemaId,
    fixed: Vec<PendingColumn>,
    variable: Vec<PendingColumn>,
    sparse: Vec<PendingColumn>,
}

impl LayoutBuilder {
    pub fn new(name: impl Into<String>, schema_id: SchemaId) -> LayoutBuilder {
        LayoutBuilder {
            name: name.into(),
            schema_id,
            fixed: Vec::new(),
            variable: Vec::new(),
            sparse: Vec::new(),
        }
    }

    pub fn add_fixed_column(
        mut self,
        path: impl Into<String>,
        layout_type: LayoutType,
        nullable: bool,
    ) -> Self {
        self.fixed.push(PendingColumn {
            path: path.into(),
            type_arg: TypeArgument::of(layout_type),
            nullable,
        });
        self
    }

    pub fn add_variable_column(mut self, path: impl Into<String>, layout_type: LayoutType) -> Self {
        self.variable.push(PendingColumn {
            path: path.into(),
            type_arg: TypeArgument::of(layout_type),
            nullable: true,
        });
        self
    }

    pub fn add_sparse_column(mut self, path: impl Into<String>, type_arg: TypeArgument) -> Self {
        self.sparse.push(PendingColumn {
            path: path.into(),
            type_arg,
            nullable: true,
        });
        self
    }

    pub fn build(self) -> Result<Layout, Error> {
        let mut next_bit = 0u32;
        let mut alloc_bit = || {
            let bit = LayoutBit::new(next_bit);
            next_bit += 1;
            bit
        };

        struct Placed {
            col: PendingColumn,
            null_bit: Option<LayoutBit>,
            bool_bit: Option<LayoutBit>,
        }

        let mut fixed = Vec::with_capacity(self.fixed.len());
        for col in self.fixed {
            let t = col.type_arg.layout_type();
            ensure!(
                t.is_fixed() && t != LayoutType::Null,
                Error::type_constraint(format!("column {} of type {:?} is not fixed", col.path, t))
            );
            let null_bit = col.nullable.then(&mut alloc_bit);
            let bool_bit = (t == LayoutType::Boolean).then(&mut alloc_bit);
            fixed.push(Placed {
                col,
                null_bit,
                bool_bit,
            });
        }
        let mut variable = Vec::with_capacity(self.variable.len());
        for col in self.variable {
            let t = col.type_arg.layout_type();
            ensure!(
                t.is_variable(),
                Error::type_constraint(format!(
                    "column {} of type {:?} is not variable",
                    col.path, t
                ))
            );
            variable.push(Placed {
                col,
                null_bit: Some(alloc_bit()),
                bool_bit: None,
            });
        }
        let num_bitmask_bytes = (next_bit as usize + 7) / 8;

        let num_fixed = fixed.len();
        let num_variable = variable.len();
        let mut columns = Vec::with_capacity(num_fixed + num_variable + self.sparse.len());
        let mut path_map = HashMap::new();
        let mut tokenizer = StringTokenizer::new();
        let mut offset = num_bitmask_bytes;

        let mut push = |columns: &mut Vec<LayoutColumn>, column: LayoutColumn| {
            ensure!(
                !column.path.is_empty(),
                Error::type_constraint("column path must not be empty")
            );
            ensure!(
                path_map.insert(column.path.clone(), columns.len()).is_none(),
                Error::exists(format!("duplicate column path {}", column.path))
            );
            tokenizer.add(&column.path);
            columns.push(column);
            Ok(())
        };

        for p in fixed {
            let size = match p.col.type_arg.layout_type() {
                LayoutType::Boolean => 0,
                t => t.fixed_size().unwrap_or(0),
            };
            let index = columns.len();
            push(
                &mut columns,
                LayoutColumn {
                    path: p.col.path,
                    type_arg: p.col.type_arg,
                    storage: StorageKind::Fixed,
                    index,
                    offset,
                    null_bit: p.null_bit,
                    bool_bit: p.bool_bit,
                    size,
                },
            )?;
            offset += size;
        }
        for (ordinal, p) in variable.into_iter().enumerate() {
            let index = columns.len();
            push(
                &mut columns,
                LayoutColumn {
                    path: p.col.path,
                    type_arg: p.col.type_arg,
                    storage: StorageKind::Variable,
                    index,
                    offset: ordinal,
                    null_bit: p.null_bit,
                    bool_bit: None,
                    size: 0,
                },
            )?;
        }
        for col in self.sparse {
            let index = columns.len();
            push(
                &mut columns,
                LayoutColumn {
                    path: col.path,
                    type_arg: col.type_arg,
                    storage: StorageKind::Sparse,
                    index,
                    offset: 0,
                    null_bit: None,
                    bool_bit: None,
                    size: 0,
                },
            )?;
        }
        drop(push);

        Ok(Layout {
            name: self.name,
            schema_id: self.schema_id,
            size: offset,
            num_bitmask_bytes,
            num_fixed,
            num_variable,
            columns,
            path_map,
            tokenizer,
        })
    }
}
