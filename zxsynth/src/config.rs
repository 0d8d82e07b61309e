// QuiZX - Rust library for quantum circuit rewriting and optimisation
//         using the ZX-calculus
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Settings threaded through the simplifier and the extractor.

use serde::{Deserialize, Serialize};

/// Expansion cap for the minimal one-hot row combination search.
pub const DEFAULT_SEARCH_LIMIT: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Stop a single fixed-point run after this many rounds.
    pub max_rounds: Option<usize>,
    /// Keep a `(rule, matches)` entry for every round that fired.
    pub record_recipe: bool,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        SimplifyConfig {
            max_rounds: None,
            record_recipe: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// 0: plain Gaussian elimination. 1: best of all block sizes.
    /// 2: greedy one-hot reduction, falling back to level 1.
    pub optimize_level: u8,
    /// Block width for level 0. Zero means unblocked elimination.
    pub block_size: usize,
    /// Cancel pairs of identical CNOTs with nothing in between.
    pub filter_duplicate_cxs: bool,
    /// Order neighbour columns by vertex index.
    pub sort_neighbors: bool,
    /// Reorder biadjacency columns to sit close to the diagonal before
    /// elimination.
    pub permute_columns: bool,
    /// Emit SWAP gates for the residual qubit permutation.
    pub permute_qubits: bool,
    pub search_limit: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            optimize_level: 1,
            block_size: 0,
            filter_duplicate_cxs: true,
            sort_neighbors: true,
            permute_columns: true,
            permute_qubits: true,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simplify: SimplifyConfig,
    pub extract: ExtractConfig,
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn from_reader(r: impl std::io::Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(r)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
