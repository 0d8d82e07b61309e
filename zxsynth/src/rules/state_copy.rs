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

use crate::graph::*;
use crate::rules::{is_h_z_neighbor, Rewrite, Rule, Taken};

/// Copy a Pauli state through the spider it is attached to.
///
/// `v` is a degree-1 Z spider with phase 0 or π behind a Hadamard edge,
/// i.e. a computational basis state, plugged into a Z spider `a`. The
/// state is copied onto every other leg of `a`: interior neighbours absorb
/// the phase, and a boundary neighbour gets a fresh spider carrying it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateCopy;

impl Rule for StateCopy {
    /// (state, spider it is copied through)
    type Match = (V, V);

    fn name(&self) -> &'static str {
        "copy"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<(V, V)> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for v in g.vertices() {
            if taken.contains(v)
                || g.vertex_type(v) != VType::Z
                || g.degree(v) != 1
                || !g.phase(v).is_pauli()
            {
                continue;
            }
            let Some((a, et)) = g.incident_edges(v).next() else {
                continue;
            };
            if taken.contains(a) || !is_h_z_neighbor(g, a, et) {
                continue;
            }
            let ok = g
                .incident_edges(a)
                .all(|(n, et)| g.vertex_type(n) == VType::B || is_h_z_neighbor(g, n, et));
            if !ok || g.neighbors(a).any(|n| taken.contains(n)) {
                continue;
            }
            taken.insert(v);
            taken.claim(g, &[a]);
            ms.push((v, a));
        }
        ms
    }

    fn rewrite(&self, g: &impl GraphLike, matches: &[(V, V)]) -> Rewrite {
        let mut rw = Rewrite::new();
        for &(v, a) in matches {
            let p = g.phase(v);
            for (n, et) in g.incident_edges(a) {
                if n == v {
                    continue;
                }
                if g.vertex_type(n) == VType::B {
                    let w = rw.new_vertex(
                        g,
                        VData {
                            ty: VType::Z,
                            phase: p,
                            qubit: g.qubit(n),
                            row: g.row(a),
                        },
                    );
                    rw.add_edge(w, n, et.opposite());
                } else {
                    rw.add_to_phase(n, p);
                }
            }
            rw.remove_vertex(v);
            rw.remove_vertex(a);
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
    use num::{One, Zero};

    #[test]
    fn copy_through_spider() {
        // state(π) -H- a(π/4) -H- n ; a -- o
        let mut g = Graph::new();
        let v = g.add_vertex_with_phase(VType::Z, Phase::one());
        let a = g.add_vertex_with_phase(VType::Z, (1, 4));
        let n = g.add_vertex_with_phase(VType::Z, (1, 2));
        let o = g.add_vertex(VType::B);
        let o1 = g.add_vertex(VType::B);
        g.add_edge_with_type(v, a, EType::H).unwrap();
        g.add_edge_with_type(a, n, EType::H).unwrap();
        g.add_edge(a, o).unwrap();
        g.add_edge(n, o1).unwrap();
        g.set_outputs(vec![o, o1]);

        assert_eq!(StateCopy.find_matches(&g), vec![(v, a)]);
        let w = g.vindex();
        round_once(&StateCopy, &mut g);
        assert!(!g.contains_vertex(v) && !g.contains_vertex(a));
        assert_eq!(g.phase(n), Phase::from((-1, 2)));
        assert_eq!(g.phase(w), Phase::one());
        assert_eq!(g.edge_type(w, o), EType::H);
        g.check_invariants().unwrap();
    }

    #[test]
    fn non_pauli_states_stay() {
        let mut g = Graph::new();
        let v = g.add_vertex_with_phase(VType::Z, (1, 4));
        let a = g.add_vertex(VType::Z);
        let n = g.add_vertex(VType::Z);
        g.add_edge_with_type(v, a, EType::H).unwrap();
        g.add_edge_with_type(a, n, EType::H).unwrap();
        let ms = StateCopy.find_matches(&g);
        // n is a degree-1 Pauli spider too, so it is copied through a
        assert_eq!(ms, vec![(n, a)]);
        g.set_phase(n, Phase::from((1, 2)));
        assert!(StateCopy.find_matches(&g).is_empty());
        g.set_phase(v, Phase::zero());
        assert_eq!(StateCopy.find_matches(&g), vec![(v, a)]);
    }
}
