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

use itertools::Itertools;

use crate::graph::*;
use crate::rules::{is_h_z_neighbor, Rewrite, Rule, Taken};

/// Local complementation at a Z spider with phase ±π/2.
///
/// The spider is removed, every neighbour loses its phase, and the
/// Hadamard edges among the neighbours are complemented.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalComp;

impl Rule for LocalComp {
    type Match = V;

    fn name(&self) -> &'static str {
        "lcomp"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<V> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for v in g.vertices() {
            if taken.contains(v)
                || g.vertex_type(v) != VType::Z
                || !g.phase(v).is_proper_clifford()
                || !g.incident_edges(v).all(|(n, et)| is_h_z_neighbor(g, n, et))
            {
                continue;
            }
            taken.claim(g, &[v]);
            ms.push(v);
        }
        ms
    }

    fn rewrite(&self, g: &impl GraphLike, matches: &[V]) -> Rewrite {
        let mut rw = Rewrite::new();
        for &v in matches {
            let p = g.phase(v);
            let ns = g.neighbor_vec(v);
            for &n in &ns {
                rw.add_to_phase(n, -p);
            }
            for (&n0, &n1) in ns.iter().tuple_combinations() {
                rw.add_edge(n0, n1, EType::H);
            }
            rw.remove_vertex(v);
        }
        rw
    }
}
