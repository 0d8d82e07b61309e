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
use crate::rules::{Rewrite, Rule, Taken};

/// Fuse two spiders of the same colour joined by a plain edge.
///
/// The second spider is absorbed into the first: its phase is added and
/// its other edges are moved over, cancelling against existing ones where
/// the edge algebra says so.
///
/// ```
/// # use zxsynth::graph::*;
/// # use zxsynth::vec_graph::Graph;
/// # use zxsynth::rules::{Rule, SpiderFusion};
/// let mut g = Graph::new();
/// let v0 = g.add_vertex(VType::Z);
/// let v1 = g.add_vertex(VType::Z);
/// let v2 = g.add_vertex(VType::X);
/// g.add_edge(v0, v1).unwrap();
/// g.add_edge(v1, v2).unwrap();
/// assert_eq!(SpiderFusion.find_matches(&g), vec![(v0, v1)]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiderFusion;

impl Rule for SpiderFusion {
    /// (kept, absorbed)
    type Match = (V, V);

    fn name(&self) -> &'static str {
        "spider_fusion"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<(V, V)> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for (s, t, et) in g.edges() {
            if et != EType::N || s == t || taken.any(&[s, t]) {
                continue;
            }
            let ty = g.vertex_type(s);
            if !ty.is_spider() || g.vertex_type(t) != ty {
                continue;
            }
            taken.claim(g, &[s, t]);
            ms.push((s, t));
        }
        ms
    }

    fn rewrite(&self, g: &impl GraphLike, matches: &[(V, V)]) -> Rewrite {
        let mut rw = Rewrite::new();
        for &(v0, v1) in matches {
            for (n, et) in g.incident_edges(v1) {
                if n != v0 {
                    rw.add_edge(v0, n, et);
                }
            }
            rw.add_to_phase(v0, g.phase(v1));
            rw.remove_vertex(v1);
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
    fn fuse_line() {
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let v0 = g.add_vertex_with_phase(VType::Z, (1, 4));
        let v1 = g.add_vertex_with_phase(VType::Z, (1, 2));
        let b1 = g.add_vertex(VType::B);
        g.add_edge(b0, v0).unwrap();
        g.add_edge(v0, v1).unwrap();
        g.add_edge(v1, b1).unwrap();
        g.set_inputs(vec![b0]);
        g.set_outputs(vec![b1]);

        assert_eq!(round_once(&SpiderFusion, &mut g), 1);
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.phase(v0), Phase::from((3, 4)));
        assert_eq!(g.edge_type(v0, b1), EType::N);
        assert!(!g.contains_vertex(v1));
        g.check_invariants().unwrap();
    }

    #[test]
    fn fusion_cancels_parallel_edges() {
        // v0 and v1 both have a Hadamard edge to w, which cancel on fusion
        let mut g = Graph::new();
        let v0 = g.add_vertex(VType::X);
        let v1 = g.add_vertex(VType::X);
        let w = g.add_vertex(VType::X);
        let u = g.add_vertex(VType::Z);
        g.add_edge(v0, v1).unwrap();
        g.add_edge_with_type(v0, w, EType::H).unwrap();
        g.add_edge_with_type(v1, w, EType::H).unwrap();
        g.add_edge_with_type(w, u, EType::H).unwrap();

        assert_eq!(SpiderFusion.find_matches(&g), vec![(v0, v1)]);
        round_once(&SpiderFusion, &mut g);
        assert!(!g.connected(v0, w));
        assert!(g.connected(w, u));
        // v0 was left without edges
        assert!(!g.contains_vertex(v0));
    }

    #[test]
    fn hadamard_edges_and_mixed_colours_do_not_fuse() {
        let mut g = Graph::new();
        let v0 = g.add_vertex(VType::Z);
        let v1 = g.add_vertex(VType::Z);
        let v2 = g.add_vertex(VType::X);
        g.add_edge_with_type(v0, v1, EType::H).unwrap();
        g.add_edge(v1, v2).unwrap();
        assert!(SpiderFusion.find_matches(&g).is_empty());
    }

    #[test]
    fn matches_are_disjoint() {
        let mut g = Graph::new();
        let vs: Vec<V> = (0..4).map(|_| g.add_vertex(VType::Z)).collect();
        for w in vs.windows(2) {
            g.add_edge(w[0], w[1]).unwrap();
        }
        let b = g.add_vertex(VType::B);
        g.add_edge(b, vs[0]).unwrap();
        g.add_to_phase(vs[3], Phase::one());
        let ms = SpiderFusion.find_matches(&g);
        assert_eq!(ms.len(), 1);

        let mut rounds = 0;
        while round_once(&SpiderFusion, &mut g) > 0 {
            rounds += 1;
        }
        assert!(rounds >= 2);
        assert_eq!(g.num_vertices(), 2);
        assert_eq!(g.neighbor_vec(b), vec![vs[0]]);
        assert_eq!(g.phase(vs[0]), Phase::one());
    }
}
