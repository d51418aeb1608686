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

use std::collections::HashMap;

/// Bidirectional map between sparse path strings and small integer tokens.
///
/// Token 0 is always the empty string.
#[derive(Clone, Debug)]
pub struct StringTokenizer {
    tokens: HashMap<String, u64>,
    strings: Vec<String>,
}

impl Default for StringTokenizer {
    fn default() -> Self {
        StringTokenizer::new()
    }
}

impl StringTokenizer {
    pub fn new() -> StringTokenizer {
        let mut tokens = HashMap::new();
        tokens.insert(String::new(), 0);
        StringTokenizer {
            tokens,
            strings: vec![String::new()],
        }
    }

    /// Returns the token for `path`, assigning the next one if unseen.
    pub fn add(&mut self, path: &str) -> u64 {
        if let Some(&token) = self.tokens.get(path) {
            return token;
        }
        let token = self.strings.len() as u64;
        self.strings.push(path.to_string());
        self.tokens.insert(path.to_string(), token);
        token
    }

    pub fn find_token(&self, path: &str) -> Option<u64> {
        self.tokens.get(path).copied()
    }

    pub fn find_string(&self, token: u64) -> Option<&str> {
        self.strings.get(token as usize).map(String::as_str)
    }

    /// Number of assigned tokens. Encoded path values at or above this are inline strings.
    pub fn count(&self) -> u64 {
        self.strings.len() as u64
    }
}
