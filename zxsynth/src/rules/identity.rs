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

/// Remove a phase-free spider with two neighbours, joining them directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRemoval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityMatch {
    pub v: V,
    pub ends: [(V, EType); 2],
}

impl Rule for IdentityRemoval {
    type Match = IdentityMatch;

    fn name(&self) -> &'static str {
        "id_removal"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<IdentityMatch> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for v in g.vertices() {
            if taken.contains(v)
                || !g.vertex_type(v).is_spider()
                || !g.phase(v).is_zero()
                || g.degree(v) != 2
            {
                continue;
            }
            let nhd = g.incident_edge_vec(v);
            taken.claim(g, &[v]);
            ms.push(IdentityMatch {
                v,
                ends: [nhd[0], nhd[1]],
            });
        }
        ms
    }

    fn rewrite(&self, _g: &impl GraphLike, matches: &[IdentityMatch]) -> Rewrite {
        let mut rw = Rewrite::new();
        for m in matches {
            let [(n0, e0), (n1, e1)] = m.ends;
            rw.add_edge(n0, n1, EType::merge(e0, e1));
            rw.remove_vertex(m.v);
        }
        rw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;
    use crate::rules::round_once;
    use crate::vec_graph::Graph;
    use num::One;

    #[test]
    fn remove_chain() {
        // b0 -- z -H- x -H- z -- b1
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let v0 = g.add_vertex(VType::Z);
        let v1 = g.add_vertex(VType::X);
        let v2 = g.add_vertex(VType::Z);
        let b1 = g.add_vertex(VType::B);
        g.add_edge(b0, v0).unwrap();
        g.add_edge_with_type(v0, v1, EType::H).unwrap();
        g.add_edge_with_type(v1, v2, EType::H).unwrap();
        g.add_edge(v2, b1).unwrap();
        g.set_inputs(vec![b0]);
        g.set_outputs(vec![b1]);

        assert_eq!(round_once(&IdentityRemoval, &mut g), 2);
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.edge_type(b0, v1), EType::H);
        assert_eq!(g.edge_type(v1, b1), EType::H);

        assert_eq!(round_once(&IdentityRemoval, &mut g), 1);
        assert!(g.is_identity());
        g.check_invariants().unwrap();
    }

    #[test]
    fn phases_and_degrees_block() {
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let v = g.add_vertex_with_phase(VType::Z, (1, 2));
        let w = g.add_vertex(VType::Z);
        let h = g.add_vertex(VType::H);
        g.add_edge(b0, v).unwrap();
        g.add_edge(v, w).unwrap();
        g.add_edge(w, h).unwrap();
        assert_eq!(IdentityRemoval.find_matches(&g).len(), 1);
        assert_eq!(IdentityRemoval.find_matches(&g)[0].v, w);
        // the H-box is not a spider, even with degree 2
        let u = g.add_vertex(VType::Z);
        g.add_edge(h, u).unwrap();
        assert!(IdentityRemoval.find_matches(&g).iter().all(|m| m.v != h));
    }

    #[test]
    fn parallel_result_goes_through_the_algebra() {
        // two X spiders joined directly and through a phase-free Z
        let mut g = Graph::new();
        let a = g.add_vertex(VType::X);
        let c = g.add_vertex(VType::X);
        let id = g.add_vertex(VType::Z);
        let b0 = g.add_vertex(VType::B);
        let b1 = g.add_vertex(VType::B);
        g.add_edge(b0, a).unwrap();
        g.add_edge(c, b1).unwrap();
        g.add_edge_with_type(a, c, EType::H).unwrap();
        g.add_edge_with_type(a, id, EType::H).unwrap();
        g.add_edge_with_type(id, c, EType::H).unwrap();

        round_once(&IdentityRemoval, &mut g);
        assert!(!g.contains_vertex(id));
        assert_eq!(g.edge_type(a, c), EType::N);
        assert_eq!(g.phase(a), Phase::one());
    }
}
