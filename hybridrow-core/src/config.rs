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

use crate::types::HybridRowVersion;

/// Configuration for row buffers.
///
/// Shared by every cursor, reader and writer operating on the same
/// [`RowBuffer`](crate::row::RowBuffer).
#[derive(Clone, Debug)]
pub struct Config {
    /// Bytes reserved when a new row is initialized.
    pub initial_capacity: usize,
    /// Version byte written into new row headers.
    pub version: HybridRowVersion,
    /// Maximum scope nesting followed while sizing or skipping values.
    pub max_nesting_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_capacity: 512,
            version: HybridRowVersion::V1,
            max_nesting_depth: 64,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn version(mut self, version: HybridRowVersion) -> Self {
        self.version = version;
        self
    }

    pub fn max_nesting_depth(mut self, max_nesting_depth: u32) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }

    #[inline(always)]
    pub fn get_initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    #[inline(always)]
    pub fn get_version(&self) -> HybridRowVersion {
        self.version
    }

    #[inline(always)]
    pub fn get_max_nesting_depth(&self) -> u32 {
        self.max_nesting_depth
    }
}
