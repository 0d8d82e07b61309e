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

//! # Rewrite rules as pure edit scripts
//!
//! Every rule is split into two read-only halves. [`Rule::find_matches`]
//! collects a set of pattern instances that can be rewritten at the same
//! time, and [`Rule::rewrite`] turns them into one [`Rewrite`]: the new
//! vertices, phase changes, edges and deletions the round will perform.
//! Nothing touches the diagram until the [`Simplifier`](crate::simplify::Simplifier)
//! applies the script, so a rule can be inspected, logged or discarded
//! without side effects.
//!
//! Matches returned together never overlap: each one claims its core
//! vertices and all of their neighbours, and later candidates touching a
//! claimed vertex are skipped. This keeps the rewrites of one round
//! independent of the order they are applied in.

use std::collections::BTreeMap;
use std::fmt;

use log::trace;
use rustc_hash::FxHashSet;

use crate::error::{GraphError, GraphResult};
use crate::graph::*;
use crate::phase::Phase;

mod bialgebra;
mod hbox;
mod identity;
mod local_comp;
mod phase_gadget;
mod pivot;
mod spider_fusion;
mod state_copy;

pub use bialgebra::Bialgebra;
pub use hbox::{HBoxFusion, HBoxPair, HadamardBox, HadamardRule};
pub use identity::{IdentityMatch, IdentityRemoval};
pub use local_comp::LocalComp;
pub use phase_gadget::{Gadget, PhaseGadgetFusion};
pub use pivot::{Pivot, PivotBoundary, PivotGadget};
pub use spider_fusion::SpiderFusion;
pub use state_copy::StateCopy;

pub(crate) use pivot::{push_pivot, PivotSide};

/// An edit script produced by a rule.
///
/// Edges are accumulated in a table keyed by the ordered vertex pair and
/// counting plain and Hadamard insertions separately. When the script is
/// applied every counted edge goes through
/// [`add_edge_smart`](GraphLike::add_edge_smart), so two Hadamard edges
/// requested between the same spiders cancel out just as they would on
/// the diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rewrite {
    /// Vertices to create, with the ids the diagram will hand out.
    pub new_vertices: Vec<(V, VData)>,
    pub phase_updates: Vec<(V, Phase)>,
    pub edge_table: BTreeMap<(V, V), (usize, usize)>,
    pub remove_edges: Vec<(V, V)>,
    pub remove_vertices: Vec<V>,
}

impl Rewrite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh vertex. The returned id is the one the diagram will
    /// assign when the script is applied, provided nothing else adds
    /// vertices in between.
    pub fn new_vertex(&mut self, g: &impl GraphLike, d: VData) -> V {
        let v = g.vindex() + self.new_vertices.len();
        self.new_vertices.push((v, d));
        v
    }

    pub fn add_to_phase(&mut self, v: V, phase: impl Into<Phase>) {
        self.phase_updates.push((v, phase.into()));
    }

    pub fn add_edge(&mut self, s: V, t: V, ety: EType) {
        let key = if s <= t { (s, t) } else { (t, s) };
        let e = self.edge_table.entry(key).or_insert((0, 0));
        match ety {
            EType::N => e.0 += 1,
            EType::H => e.1 += 1,
        }
    }

    pub fn remove_edge(&mut self, s: V, t: V) {
        self.remove_edges.push((s, t));
    }

    pub fn remove_vertex(&mut self, v: V) {
        self.remove_vertices.push(v);
    }

    pub fn is_empty(&self) -> bool {
        self.new_vertices.is_empty()
            && self.phase_updates.is_empty()
            && self.edge_table.is_empty()
            && self.remove_edges.is_empty()
            && self.remove_vertices.is_empty()
    }
}

/// Apply an edit script.
///
/// New vertices are created first, then phases are updated, then the edge
/// table is inserted one edge at a time, and finally edges and vertices are
/// deleted. Any vertex left without neighbours that is not a boundary is
/// removed at the end.
pub(crate) fn apply_rewrite(g: &mut impl GraphLike, mut rw: Rewrite) -> GraphResult<()> {
    trace!(
        "rewrite: +{}v ~{}p {}e -{}e -{}v",
        rw.new_vertices.len(),
        rw.phase_updates.len(),
        rw.edge_table.len(),
        rw.remove_edges.len(),
        rw.remove_vertices.len()
    );

    for (expected, d) in rw.new_vertices {
        let found = g.add_vertex_with_data(d);
        if found != expected {
            return Err(GraphError::UnexpectedVertexId { expected, found });
        }
    }

    for (v, p) in rw.phase_updates {
        g.check_vertex(v)?;
        g.add_to_phase(v, p);
    }

    for ((s, t), (n, h)) in rw.edge_table {
        for _ in 0..n {
            g.add_edge_smart(s, t, EType::N)?;
        }
        for _ in 0..h {
            g.add_edge_smart(s, t, EType::H)?;
        }
    }

    for (s, t) in rw.remove_edges {
        g.remove_edge(s, t)?;
    }

    rw.remove_vertices.sort_unstable();
    rw.remove_vertices.dedup();
    g.remove_vertices(&rw.remove_vertices)?;
    g.remove_isolated_vertices()?;
    Ok(())
}

/// A local rewrite rule of the ZX-calculus.
pub trait Rule {
    /// One instance of the rule's pattern.
    type Match: Clone + fmt::Debug;

    fn name(&self) -> &'static str;

    /// All non-overlapping instances of the pattern in `g`.
    fn find_matches(&self, g: &impl GraphLike) -> Vec<Self::Match>;

    /// The edit script rewriting every given match. The matches must come
    /// from [`find_matches`](Rule::find_matches) on the same diagram.
    fn rewrite(&self, g: &impl GraphLike, matches: &[Self::Match]) -> Rewrite;
}

/// Vertices claimed by the matches found so far in a round.
#[derive(Debug, Default)]
pub(crate) struct Taken(FxHashSet<V>);

impl Taken {
    pub fn contains(&self, v: V) -> bool {
        self.0.contains(&v)
    }

    pub fn any(&self, vs: &[V]) -> bool {
        vs.iter().any(|v| self.0.contains(v))
    }

    /// Claim `vs` together with all of their neighbours
    pub fn claim(&mut self, g: &impl GraphLike, vs: &[V]) {
        for &v in vs {
            self.0.insert(v);
            self.0.extend(g.neighbors(v));
        }
    }

    pub fn insert(&mut self, v: V) {
        self.0.insert(v);
    }
}

/// The rules as a closed set of variants, for callers that pick a rule at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    SpiderFusion,
    IdentityRemoval,
    LocalComp,
    Pivot,
    PivotBoundary,
    PivotGadget,
    PhaseGadgetFusion,
    Bialgebra,
    HBoxFusion,
    HadamardRule,
    StateCopy,
}

impl RuleKind {
    pub const ALL: [RuleKind; 11] = [
        RuleKind::SpiderFusion,
        RuleKind::IdentityRemoval,
        RuleKind::LocalComp,
        RuleKind::Pivot,
        RuleKind::PivotBoundary,
        RuleKind::PivotGadget,
        RuleKind::PhaseGadgetFusion,
        RuleKind::Bialgebra,
        RuleKind::HBoxFusion,
        RuleKind::HadamardRule,
        RuleKind::StateCopy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::SpiderFusion => SpiderFusion.name(),
            RuleKind::IdentityRemoval => IdentityRemoval.name(),
            RuleKind::LocalComp => LocalComp.name(),
            RuleKind::Pivot => Pivot.name(),
            RuleKind::PivotBoundary => PivotBoundary.name(),
            RuleKind::PivotGadget => PivotGadget.name(),
            RuleKind::PhaseGadgetFusion => PhaseGadgetFusion.name(),
            RuleKind::Bialgebra => Bialgebra.name(),
            RuleKind::HBoxFusion => HBoxFusion.name(),
            RuleKind::HadamardRule => HadamardRule.name(),
            RuleKind::StateCopy => StateCopy.name(),
        }
    }

    /// Find all matches of this rule and build their edit script.
    ///
    /// Returns the number of matches with the script.
    pub fn round(&self, g: &impl GraphLike) -> (usize, Rewrite) {
        fn go<R: Rule>(r: R, g: &impl GraphLike) -> (usize, Rewrite) {
            let ms = r.find_matches(g);
            let rw = if ms.is_empty() {
                Rewrite::new()
            } else {
                r.rewrite(g, &ms)
            };
            (ms.len(), rw)
        }

        match self {
            RuleKind::SpiderFusion => go(SpiderFusion, g),
            RuleKind::IdentityRemoval => go(IdentityRemoval, g),
            RuleKind::LocalComp => go(LocalComp, g),
            RuleKind::Pivot => go(Pivot, g),
            RuleKind::PivotBoundary => go(PivotBoundary, g),
            RuleKind::PivotGadget => go(PivotGadget, g),
            RuleKind::PhaseGadgetFusion => go(PhaseGadgetFusion, g),
            RuleKind::Bialgebra => go(Bialgebra, g),
            RuleKind::HBoxFusion => go(HBoxFusion, g),
            RuleKind::HadamardRule => go(HadamardRule, g),
            RuleKind::StateCopy => go(StateCopy, g),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Z spider reached over a Hadamard edge
pub(crate) fn is_h_z_neighbor(g: &impl GraphLike, n: V, et: EType) -> bool {
    et == EType::H && g.vertex_type(n) == VType::Z
}

/// Run one round of `r` on `g`, returning the number of matches
#[cfg(test)]
pub(crate) fn round_once<R: Rule>(r: &R, g: &mut impl GraphLike) -> usize {
    let ms = r.find_matches(g);
    if !ms.is_empty() {
        let rw = r.rewrite(g, &ms);
        apply_rewrite(g, rw).expect("rewrite failed");
    }
    ms.len()
}
