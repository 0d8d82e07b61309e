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

use num::One;

use crate::graph::*;
use crate::rules::{Rewrite, Rule, Taken};

/// An H-box with two neighbours and phase π, which is just a Hadamard gate
fn is_hadamard_box(g: &impl GraphLike, h: V) -> bool {
    g.vertex_type(h) == VType::H && g.degree(h) == 2 && g.phase(h).is_one()
}

fn edge_from_bool(had: bool) -> EType {
    if had {
        EType::H
    } else {
        EType::N
    }
}

/// Cancel two adjacent Hadamard boxes.
///
/// Their outer neighbours are joined by a single edge, which is Hadamard
/// iff an odd number of the three edges along the path were.
#[derive(Debug, Clone, Copy, Default)]
pub struct HBoxFusion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HBoxPair {
    pub boxes: [V; 2],
    /// Outer neighbour of each box and the edge to it
    pub outer: [(V, EType); 2],
    pub middle: EType,
}

impl Rule for HBoxFusion {
    type Match = HBoxPair;

    fn name(&self) -> &'static str {
        "hbox_fusion"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<HBoxPair> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for (s, t, middle) in g.edges() {
            if s == t || taken.any(&[s, t]) || !is_hadamard_box(g, s) || !is_hadamard_box(g, t) {
                continue;
            }
            let outer_of = |h: V, other: V| g.incident_edges(h).find(|&(n, _)| n != other);
            let (Some(a), Some(b)) = (outer_of(s, t), outer_of(t, s)) else {
                continue;
            };
            if a.0 == b.0 {
                continue;
            }
            taken.claim(g, &[s, t]);
            ms.push(HBoxPair {
                boxes: [s, t],
                outer: [a, b],
                middle,
            });
        }
        ms
    }

    fn rewrite(&self, _g: &impl GraphLike, matches: &[HBoxPair]) -> Rewrite {
        let mut rw = Rewrite::new();
        for m in matches {
            let [(a, ea), (b, eb)] = m.outer;
            let had = (ea == EType::H) ^ (m.middle == EType::H) ^ (eb == EType::H);
            rw.add_edge(a, b, edge_from_bool(had));
            rw.remove_vertex(m.boxes[0]);
            rw.remove_vertex(m.boxes[1]);
        }
        rw
    }
}

/// Replace a Hadamard box by an edge between its two neighbours.
///
/// The new edge is Hadamard iff both old edges had the same type.
#[derive(Debug, Clone, Copy, Default)]
pub struct HadamardRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HadamardBox {
    pub h: V,
    pub ends: [(V, EType); 2],
}

impl Rule for HadamardRule {
    type Match = HadamardBox;

    fn name(&self) -> &'static str {
        "hadamard"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<HadamardBox> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for h in g.vertices() {
            if taken.contains(h) || !is_hadamard_box(g, h) {
                continue;
            }
            let nhd = g.incident_edge_vec(h);
            let (n0, n1) = (nhd[0].0, nhd[1].0);
            if taken.contains(n0) || taken.contains(n1) {
                continue;
            }
            for v in [h, n0, n1] {
                taken.insert(v);
            }
            ms.push(HadamardBox {
                h,
                ends: [nhd[0], nhd[1]],
            });
        }
        ms
    }

    fn rewrite(&self, _g: &impl GraphLike, matches: &[HadamardBox]) -> Rewrite {
        let mut rw = Rewrite::new();
        for m in matches {
            let [(n0, e0), (n1, e1)] = m.ends;
            rw.add_edge(n0, n1, edge_from_bool(e0 == e1));
            rw.remove_vertex(m.h);
        }
        rw
    }
}
