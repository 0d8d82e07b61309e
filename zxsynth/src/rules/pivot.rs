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

//! The pivot family: interior pivots, pivots next to a boundary, and
//! pivots that first move a non-Pauli phase onto a gadget.
//!
//! All three share [`push_pivot`], which writes the generalised pivot into
//! an edit script. The extractor uses it as well to absorb phase gadgets
//! into the frontier.

use num::{One, Zero};

use crate::graph::*;
use crate::phase::Phase;
use crate::rules::{is_h_z_neighbor, Rewrite, Rule, Taken};

/// One endpoint of a pivot.
///
/// `phase` is the phase the pivot treats the vertex as having. When the
/// vertex has been gadgetised virtually, `phase` is zero and `extra` holds
/// the axel of a gadget that exists only in the edit script, standing in
/// for an extra neighbour.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PivotSide {
    pub v: V,
    pub phase: Phase,
    pub extra: Vec<V>,
}

impl PivotSide {
    pub fn plain(g: &impl GraphLike, v: V) -> Self {
        PivotSide {
            v,
            phase: g.phase(v),
            extra: vec![],
        }
    }

    /// Move the phase of `v` onto a new gadget in `rw`
    pub fn gadgetized(g: &impl GraphLike, rw: &mut Rewrite, v: V) -> Self {
        let row = g.row(v);
        let axel = rw.new_vertex(
            g,
            VData {
                ty: VType::Z,
                phase: Phase::zero(),
                qubit: -1.0,
                row,
            },
        );
        let leaf = rw.new_vertex(
            g,
            VData {
                ty: VType::Z,
                phase: g.phase(v),
                qubit: -2.0,
                row,
            },
        );
        rw.add_edge(axel, leaf, EType::H);
        PivotSide {
            v,
            phase: Phase::zero(),
            extra: vec![axel],
        }
    }

    /// Gadgetise only if the phase is not Pauli
    pub fn new(g: &impl GraphLike, rw: &mut Rewrite, v: V) -> Self {
        if g.phase(v).is_pauli() {
            Self::plain(g, v)
        } else {
            Self::gadgetized(g, rw, v)
        }
    }
}

/// Write a pivot along the edge between the two sides into `rw`.
///
/// The neighbours of the pair split into those of the first side only,
/// those of the second only, and those shared. Each group gets the phase of
/// the opposite side (shared ones get both plus π) and the Hadamard edges
/// between every two groups are complemented.
///
/// If one side touches a boundary, the other side is kept: it takes over
/// the boundary edge with its type flipped, and its phase becomes the one
/// the pivot assumed. Only the side that touched the boundary is removed.
pub(crate) fn push_pivot(g: &impl GraphLike, rw: &mut Rewrite, sides: [PivotSide; 2]) {
    let v = [sides[0].v, sides[1].v];
    let mut ns: [Vec<V>; 2] = [vec![], vec![]];
    let mut boundary = None;

    for i in 0..2 {
        for (n, et) in g.incident_edges(v[i]) {
            if n == v[1 - i] {
                continue;
            }
            if g.vertex_type(n) == VType::B {
                boundary = Some((i, n, et));
            } else {
                ns[i].push(n);
            }
        }
        ns[i].extend(sides[i].extra.iter().copied());
    }

    let shared: Vec<V> = ns[0].iter().copied().filter(|n| ns[1].contains(n)).collect();
    let only: [Vec<V>; 2] = [0, 1].map(|i| {
        ns[i]
            .iter()
            .copied()
            .filter(|n| !shared.contains(n))
            .collect()
    });

    for &n in &only[0] {
        rw.add_to_phase(n, sides[1].phase);
    }
    for &n in &only[1] {
        rw.add_to_phase(n, sides[0].phase);
    }
    for &n in &shared {
        rw.add_to_phase(n, sides[0].phase + sides[1].phase + Phase::one());
    }

    for (a, b) in [(&only[0], &only[1]), (&only[0], &shared), (&only[1], &shared)] {
        for &x in a {
            for &y in b {
                rw.add_edge(x, y, EType::H);
            }
        }
    }

    match boundary {
        Some((i, b, et)) => {
            let j = 1 - i;
            rw.add_edge(v[j], b, et.opposite());
            rw.add_to_phase(v[j], sides[j].phase - g.phase(v[j]));
            for &x in &sides[j].extra {
                rw.add_edge(v[j], x, EType::H);
            }
            rw.remove_vertex(v[i]);
        }
        None => {
            rw.remove_vertex(v[0]);
            rw.remove_vertex(v[1]);
        }
    }
}

fn has_leaf(g: &impl GraphLike, v: V) -> bool {
    g.neighbors(v).any(|n| g.degree(n) == 1)
}

/// All neighbours of `v` apart from `other` are Z spiders behind
/// Hadamard edges
fn is_interior(g: &impl GraphLike, v: V, other: V) -> bool {
    g.incident_edges(v)
        .all(|(n, et)| n == other || is_h_z_neighbor(g, n, et))
}

/// Pivot along a Hadamard edge between two Pauli Z spiders.
///
/// Apart from each other, both spiders may only have Z neighbours behind
/// Hadamard edges, and at most one boundary between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pivot;

impl Rule for Pivot {
    type Match = (V, V);

    fn name(&self) -> &'static str {
        "pivot"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<(V, V)> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for (s, t, et) in g.edges() {
            if et != EType::H || s == t || taken.any(&[s, t]) {
                continue;
            }
            if g.vertex_type(s) != VType::Z
                || g.vertex_type(t) != VType::Z
                || !g.phase(s).is_pauli()
                || !g.phase(t).is_pauli()
            {
                continue;
            }

            let mut boundaries = 0;
            let ok = [(s, t), (t, s)].iter().all(|&(v, other)| {
                g.incident_edges(v).all(|(n, et)| {
                    if n == other {
                        true
                    } else if g.vertex_type(n) == VType::B {
                        boundaries += 1;
                        true
                    } else {
                        is_h_z_neighbor(g, n, et)
                    }
                })
            });
            if !ok || boundaries > 1 {
                continue;
            }

            taken.claim(g, &[s, t]);
            ms.push((s, t));
        }
        ms
    }

    fn rewrite(&self, g: &impl GraphLike, matches: &[(V, V)]) -> Rewrite {
        let mut rw = Rewrite::new();
        for &(s, t) in matches {
            push_pivot(g, &mut rw, [PivotSide::plain(g, s), PivotSide::plain(g, t)]);
        }
        rw
    }
}

/// Pivot a spider off the boundary.
///
/// The first vertex touches exactly one boundary and may have any phase;
/// a non-Pauli phase is moved onto a gadget. The second is an interior
/// Pauli spider, which takes the first one's place at the boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct PivotBoundary;

impl PivotBoundary {
    fn partner(g: &impl GraphLike, taken: &Taken, vs: V) -> Option<V> {
        g.incident_edges(vs).find_map(|(vt, et)| {
            let ok = et == EType::H
                && !taken.contains(vt)
                && g.vertex_type(vt) == VType::Z
                && g.phase(vt).is_pauli()
                && !has_leaf(g, vt)
                && is_interior(g, vt, vs);
            ok.then_some(vt)
        })
    }
}

impl Rule for PivotBoundary {
    /// (boundary spider, interior partner)
    type Match = (V, V);

    fn name(&self) -> &'static str {
        "pivot_boundary"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<(V, V)> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for &b in g.inputs().iter().chain(g.outputs()) {
            let Some(vs) = g.neighbors(b).next() else {
                continue;
            };
            if taken.contains(vs) || g.vertex_type(vs) != VType::Z {
                continue;
            }
            let mut boundaries = 0;
            let ok = g.incident_edges(vs).all(|(n, et)| {
                if g.vertex_type(n) == VType::B {
                    boundaries += 1;
                    true
                } else {
                    is_h_z_neighbor(g, n, et) && g.degree(n) > 1
                }
            });
            if !ok || boundaries != 1 {
                continue;
            }
            let Some(vt) = Self::partner(g, &taken, vs) else {
                continue;
            };
            taken.claim(g, &[vs, vt]);
            ms.push((vs, vt));
        }
        ms
    }

    fn rewrite(&self, g: &impl GraphLike, matches: &[(V, V)]) -> Rewrite {
        let mut rw = Rewrite::new();
        for &(vs, vt) in matches {
            let s = PivotSide::new(g, &mut rw, vs);
            push_pivot(g, &mut rw, [s, PivotSide::plain(g, vt)]);
        }
        rw
    }
}

/// Pivot between an interior Pauli spider and an interior non-Pauli one,
/// moving the non-Pauli phase onto a new phase gadget.
#[derive(Debug, Clone, Copy, Default)]
pub struct PivotGadget;

impl Rule for PivotGadget {
    /// (Pauli spider, spider to gadgetise)
    type Match = (V, V);

    fn name(&self) -> &'static str {
        "pivot_gadget"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<(V, V)> {
        let mut taken = Taken::default();
        let mut ms = vec![];
        for (s, t, et) in g.edges() {
            if et != EType::H || s == t || taken.any(&[s, t]) {
                continue;
            }
            if g.vertex_type(s) != VType::Z || g.vertex_type(t) != VType::Z {
                continue;
            }
            let (vs, vt) = match (g.phase(s).is_pauli(), g.phase(t).is_pauli()) {
                (true, false) => (s, t),
                (false, true) => (t, s),
                _ => continue,
            };
            if g.degree(vs) == 1
                || g.degree(vt) == 1
                || has_leaf(g, vs)
                || !is_interior(g, vs, vt)
                || !is_interior(g, vt, vs)
            {
                continue;
            }
            taken.claim(g, &[vs, vt]);
            ms.push((vs, vt));
        }
        ms
    }

    fn rewrite(&self, g: &impl GraphLike, matches: &[(V, V)]) -> Rewrite {
        let mut rw = Rewrite::new();
        for &(vs, vt) in matches {
            let t = PivotSide::gadgetized(g, &mut rw, vt);
            push_pivot(g, &mut rw, [PivotSide::plain(g, vs), t]);
        }
        rw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::round_once;
    use crate::vec_graph::Graph;
    use rstest::rstest;

    /// Two Z spiders joined by a Hadamard edge, each with its own
    /// neighbour, sharing a third. Every outer neighbour carries a boundary.
    fn pivot_pair(p0: (i64, i64), p1: (i64, i64)) -> (Graph, [V; 2], [V; 3]) {
        let mut g = Graph::new();
        let v0 = g.add_vertex_with_phase(VType::Z, p0);
        let v1 = g.add_vertex_with_phase(VType::Z, p1);
        let a = g.add_vertex(VType::Z);
        let b = g.add_vertex(VType::Z);
        let c = g.add_vertex(VType::Z);
        g.add_edge_with_type(v0, v1, EType::H).unwrap();
        g.add_edge_with_type(v0, a, EType::H).unwrap();
        g.add_edge_with_type(v1, b, EType::H).unwrap();
        g.add_edge_with_type(v0, c, EType::H).unwrap();
        g.add_edge_with_type(v1, c, EType::H).unwrap();
        let mut outs = vec![];
        for n in [a, b, c] {
            let o = g.add_vertex(VType::B);
            g.add_edge(n, o).unwrap();
            outs.push(o);
        }
        g.set_outputs(outs);
        (g, [v0, v1], [a, b, c])
    }

    #[test]
    fn interior_pivot() {
        let (mut g, [v0, v1], [a, b, c]) = pivot_pair((0, 1), (1, 1));
        assert_eq!(Pivot.find_matches(&g), vec![(v0, v1)]);
        assert_eq!(round_once(&Pivot, &mut g), 1);

        assert!(!g.contains_vertex(v0) && !g.contains_vertex(v1));
        assert_eq!(g.edge_type(a, b), EType::H);
        assert_eq!(g.edge_type(a, c), EType::H);
        assert_eq!(g.edge_type(b, c), EType::H);
        assert_eq!(g.phase(a), Phase::one());
        assert_eq!(g.phase(b), Phase::zero());
        assert_eq!(g.phase(c), Phase::zero());
        assert!(g.is_graph_like());
        g.check_invariants().unwrap();
    }

    #[rstest]
    #[case((1, 2), (0, 1))]
    #[case((0, 1), (1, 4))]
    fn pivot_needs_pauli(#[case] p0: (i64, i64), #[case] p1: (i64, i64)) {
        let (mut g, _, outer) = pivot_pair(p0, p1);
        for n in outer {
            g.set_phase(n, Phase::from((1, 4)));
        }
        assert!(Pivot.find_matches(&g).is_empty());
    }

    #[test]
    fn pivot_keeps_the_boundary() {
        // b -- v0 -H- v1 -H- w, with w on an output
        let mut g = Graph::new();
        let b = g.add_vertex(VType::B);
        let v0 = g.add_vertex(VType::Z);
        let v1 = g.add_vertex_with_phase(VType::Z, 1);
        let w = g.add_vertex_with_phase(VType::Z, (1, 4));
        let o = g.add_vertex(VType::B);
        g.add_edge(b, v0).unwrap();
        g.add_edge_with_type(v0, v1, EType::H).unwrap();
        g.add_edge_with_type(v1, w, EType::H).unwrap();
        g.add_edge(w, o).unwrap();
        g.set_inputs(vec![b]);
        g.set_outputs(vec![o]);

        assert_eq!(Pivot.find_matches(&g), vec![(v0, v1)]);
        round_once(&Pivot, &mut g);
        // v1 now sits on the input, behind a Hadamard edge
        assert!(!g.contains_vertex(v0));
        assert_eq!(g.edge_type(v1, b), EType::H);
        assert_eq!(g.phase(v1), Phase::one());
        assert_eq!(g.edge_type(v1, w), EType::H);
        assert_eq!(g.phase(w), Phase::from((1, 4)));
        g.check_invariants().unwrap();
    }

    #[test]
    fn boundary_pivot_with_gadget() {
        // b -- vs(π/4) -H- vt -H- w -- o
        let mut g = Graph::new();
        let b = g.add_vertex(VType::B);
        let vs = g.add_vertex_with_phase(VType::Z, (1, 4));
        let vt = g.add_vertex(VType::Z);
        let w = g.add_vertex(VType::Z);
        let o = g.add_vertex(VType::B);
        g.add_edge(b, vs).unwrap();
        g.add_edge_with_type(vs, vt, EType::H).unwrap();
        g.add_edge_with_type(vt, w, EType::H).unwrap();
        g.add_edge(w, o).unwrap();
        g.set_inputs(vec![b]);
        g.set_outputs(vec![o]);

        assert_eq!(PivotBoundary.find_matches(&g), vec![(vs, vt)]);

        let n = g.vindex();
        round_once(&PivotBoundary, &mut g);
        let (axel, leaf) = (n, n + 1);
        assert!(!g.contains_vertex(vs));
        assert_eq!(g.edge_type(vt, b), EType::H);
        assert_eq!(g.phase(leaf), Phase::from((1, 4)));
        assert_eq!(g.neighbor_vec(leaf), vec![axel]);
        // the gadget stands in for vs, so it is complemented against w
        assert_eq!(g.edge_type(axel, w), EType::H);
        assert!(!g.connected(axel, vt));
        assert_eq!(g.edge_type(vt, w), EType::H);
        assert!(g.is_graph_like());
        g.check_invariants().unwrap();
    }

    #[test]
    fn gadget_pivot() {
        let (mut g, [v0, v1], [a, b, c]) = pivot_pair((0, 1), (1, 4));
        // make both spiders interior
        for n in [a, b, c] {
            let o = g.neighbor_vec(n).into_iter().find(|&x| g.vertex_type(x) == VType::B).unwrap();
            let q = g.outputs().iter().position(|&x| x == o).unwrap();
            let o1 = g.add_vertex(VType::B);
            g.outputs_mut()[q] = o1;
            g.remove_vertex(o).unwrap();
            let z = g.add_vertex(VType::Z);
            g.add_edge_with_type(n, z, EType::H).unwrap();
            g.add_edge(z, o1).unwrap();
        }

        assert_eq!(PivotGadget.find_matches(&g), vec![(v0, v1)]);
        let n = g.vindex();
        round_once(&PivotGadget, &mut g);
        let (axel, leaf) = (n, n + 1);
        assert!(!g.contains_vertex(v0) && !g.contains_vertex(v1));
        assert_eq!(g.phase(leaf), Phase::from((1, 4)));
        // the axel joins v1's side of the pivot
        assert_eq!(g.edge_type(axel, a), EType::H);
        assert!(!g.connected(axel, b));
        assert!(g.connected(axel, c));
        assert_eq!(g.num_gadgets(), 1);
        g.check_invariants().unwrap();
    }
}
