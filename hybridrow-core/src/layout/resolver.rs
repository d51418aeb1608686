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

use super::{Layout, SchemaId};
use crate::error::Error;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps schema ids to their resolved layouts.
///
/// Resolvers are shared by every row that references their namespace, so they
/// must be safe to use from multiple threads.
pub trait LayoutResolver: Send + Sync {
    fn resolve(&self, schema_id: SchemaId) -> Result<Arc<Layout>, Error>;
}

/// A fixed table of layouts registered up front.
#[derive(Default, Debug)]
pub struct SimpleLayoutResolver {
    layouts: HashMap<SchemaId, Arc<Layout>>,
}

impl SimpleLayoutResolver {
    pub fn new() -> SimpleLayoutResolver {
        SimpleLayoutResolver::default()
    }

    /// Registers `layout` under its own schema id.
    pub fn register(&mut self, layout: Layout) -> Result<Arc<Layout>, Error> {
        let schema_id = layout.schema_id();
        if self.layouts.contains_key(&schema_id) {
            return Err(Error::exists(format!(
                "schema {} is already registered",
                schema_id
            )));
        }
        debug!(schema_id = schema_id.id(), name = layout.name(), "register layout");
        let layout = Arc::new(layout);
        self.layouts.insert(schema_id, layout.clone());
        Ok(layout)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl LayoutResolver for SimpleLayoutResolver {
    fn resolve(&self, schema_id: SchemaId) -> Result<Arc<Layout>, Error> {
        self.layouts
            .get(&schema_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("schema {} is not registered", schema_id)))
    }
}
