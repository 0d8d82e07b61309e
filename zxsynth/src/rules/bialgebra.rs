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

use num::Zero;

use crate::graph::*;
use crate::rules::{Rewrite, Rule, Taken};

/// The bialgebra rule on a plain edge between a Z and an X spider.
///
/// Both spiders must be phase-free with plain edges only, and every other
/// neighbour of each must be a phase-free spider of the opposite colour.
/// The pair is replaced by a complete bipartite graph of plain edges
/// between the two neighbourhoods.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bialgebra;

impl Bialgebra {
    fn side_ok(g: &impl GraphLike, v: V, other: V) -> bool {
        let want = match g.vertex_type(v) {
            VType::Z => VType::X,
            _ => VType::Z,
        };
        g.degree(v) > 1
            && g.phase(v).is_zero()
            && g.incident_edges(v).all(|(n, et)| {
                et == EType::N && (n == other || (g.vertex_type(n) == want && g.phase(n).is_zero()))
            })
    }
}

impl Rule for Bialgebra {
    /// (Z spider, X spider)
    type Match = (V, V);

    fn name(&self) -> &'static str {
        "bialgebra"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<(V, V)> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for (s, t, et) in g.edges() {
            if et != EType::N || taken.any(&[s, t]) {
                continue;
            }
            let (z, x) = match (g.vertex_type(s), g.vertex_type(t)) {
                (VType::Z, VType::X) => (s, t),
                (VType::X, VType::Z) => (t, s),
                _ => continue,
            };
            if Self::side_ok(g, z, x) && Self::side_ok(g, x, z) {
                taken.claim(g, &[z, x]);
                ms.push((z, x));
            }
        }
        ms
    }

    fn rewrite(&self, g: &impl GraphLike, matches: &[(V, V)]) -> Rewrite {
        let mut rw = Rewrite::new();
        for &(z, x) in matches {
            let nz: Vec<V> = g.neighbors(z).filter(|&n| n != x).collect();
            let nx: Vec<V> = g.neighbors(x).filter(|&n| n != z).collect();
            for &a in &nz {
                for &b in &nx {
                    rw.add_edge(a, b, EType::N);
                }
            }
            rw.remove_vertex(z);
            rw.remove_vertex(x);
        }
        rw
    }
}
