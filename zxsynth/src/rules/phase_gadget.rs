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

use num::{One, Zero};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::*;
use crate::phase::Phase;
use crate::rules::{is_h_z_neighbor, Rewrite, Rule};

/// Fuse phase gadgets that act on the same set of spiders.
///
/// A gadget is a Pauli Z spider (the axel) carrying exactly one degree-1 Z
/// spider (the leaf) behind a Hadamard edge, all of its other edges going
/// to Z spiders. Gadgets whose axels have the same other neighbours add up
/// into the first one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseGadgetFusion;

/// An axel and its leaf
pub type Gadget = (V, V);

fn gadget_at(g: &impl GraphLike, v: V) -> Option<(Gadget, Vec<V>)> {
    if g.vertex_type(v) != VType::Z || !g.phase(v).is_pauli() {
        return None;
    }
    let mut leaf = None;
    let mut rest = vec![];
    for (n, et) in g.incident_edges(v) {
        if !is_h_z_neighbor(g, n, et) {
            return None;
        }
        if g.degree(n) == 1 {
            if leaf.is_some() {
                return None;
            }
            leaf = Some(n);
        } else {
            rest.push(n);
        }
    }
    if rest.is_empty() {
        return None;
    }
    rest.sort_unstable();
    leaf.map(|l| ((v, l), rest))
}

impl Rule for PhaseGadgetFusion {
    /// Gadgets to fuse into the first one
    type Match = Vec<Gadget>;

    fn name(&self) -> &'static str {
        "gadget_fusion"
    }

    fn find_matches(&self, g: &impl GraphLike) -> Vec<Vec<Gadget>> {
        let mut groups: FxHashMap<Vec<V>, Vec<Gadget>> = FxHashMap::default();
        let mut order = vec![];
        for v in g.vertices() {
            if let Some((gadget, key)) = gadget_at(g, v) {
                let e = groups.entry(key.clone()).or_default();
                if e.is_empty() {
                    order.push(key);
                }
                e.push(gadget);
            }
        }

        // a group is skipped if one of its axels is a target of another
        // accepted group, or the other way round
        let mut taken: FxHashSet<V> = FxHashSet::default();
        let mut targets: FxHashSet<V> = FxHashSet::default();
        let mut ms = vec![];
        for key in order {
            let Some(group) = groups.remove(&key) else {
                continue;
            };
            if group.len() < 2
                || group
                    .iter()
                    .any(|&(a, _)| taken.contains(&a) || targets.contains(&a))
                || key.iter().any(|v| taken.contains(v))
            {
                continue;
            }
            for &(a, l) in &group {
                taken.insert(a);
                taken.insert(l);
            }
            targets.extend(key);
            ms.push(group);
        }
        ms
    }

    fn rewrite(&self, g: &impl GraphLike, matches: &[Vec<Gadget>]) -> Rewrite {
        let mut rw = Rewrite::new();
        for group in matches {
            let total: Phase = group
                .iter()
                .map(|&(a, l)| {
                    if g.phase(a).is_one() {
                        -g.phase(l)
                    } else {
                        g.phase(l)
                    }
                })
                .sum();

            let (a0, l0) = group[0];
            rw.add_to_phase(l0, total - g.phase(l0));
            if !g.phase(a0).is_zero() {
                rw.add_to_phase(a0, Phase::one());
            }
            for &(a, l) in &group[1..] {
                rw.remove_vertex(a);
                rw.remove_vertex(l);
            }
        }
        rw
    }
}
