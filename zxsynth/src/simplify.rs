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

//! # Simplification strategies
//!
//! A [`Simplifier`] owns the mutable borrow of a diagram for the length of a
//! simplification. It runs single rules to a fixed point and composes them
//! into the usual strategies. The free functions at the bottom of this
//! module are shorthands that build a default simplifier, run one strategy
//! and return the number of rounds.
//!
//! Every fixed-point loop checks the [`CancelToken`] before each round. A
//! cancelled run stops at the next round boundary and reports the rounds it
//! did finish, wrapped in [`Outcome::Cancelled`]; the diagram is always left
//! between two complete rounds.

use log::{debug, info};

use crate::cancel::{CancelToken, Outcome};
use crate::config::SimplifyConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::*;
use crate::rules::*;

/// Rounds performed, or the corruption that stopped the run
pub type SimpResult = Result<Outcome<usize>, GraphError>;

/// Add the rounds of a sub-run to `$total`, returning early on cancellation
macro_rules! step {
    ($total:ident, $e:expr) => {{
        let n = match $e? {
            Outcome::Done(n) => n,
            Outcome::Cancelled(n) => return Ok(Outcome::Cancelled($total + n)),
        };
        $total += n;
        n
    }};
}

pub struct Simplifier<'a, G: GraphLike> {
    g: &'a mut G,
    config: SimplifyConfig,
    cancel: CancelToken,
    recipe: Vec<(&'static str, usize)>,
}

impl<'a, G: GraphLike> Simplifier<'a, G> {
    pub fn new(g: &'a mut G) -> Self {
        Simplifier {
            g,
            config: SimplifyConfig::default(),
            cancel: CancelToken::new(),
            recipe: vec![],
        }
    }

    pub fn with_config(mut self, config: SimplifyConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn graph(&self) -> &G {
        &*self.g
    }

    /// The rule name and match count of every round so far, if recording
    /// is switched on
    pub fn recipe(&self) -> &[(&'static str, usize)] {
        &self.recipe
    }

    /// Apply a single edit script to the diagram
    pub fn apply(&mut self, rw: Rewrite) -> GraphResult<()> {
        apply_rewrite(&mut *self.g, rw)
    }

    fn fixed_point(
        &mut self,
        name: &'static str,
        round: impl Fn(&G) -> (usize, Rewrite),
        require_shrink: bool,
    ) -> SimpResult {
        let mut rounds = 0;
        loop {
            if self.cancel.is_cancelled() {
                debug!("{name}: cancelled after {rounds} rounds");
                return Ok(Outcome::Cancelled(rounds));
            }
            if self.config.max_rounds.is_some_and(|m| rounds >= m) {
                debug!("{name}: stopping at the round limit");
                break;
            }

            let (n, rw) = round(&*self.g);
            if n == 0 {
                break;
            }
            let numv = self.g.num_vertices();
            self.apply(rw)?;
            rounds += 1;
            debug!("{name}: round {rounds}, {n} matches");
            if self.config.record_recipe {
                self.recipe.push((name, n));
            }
            if require_shrink && self.g.num_vertices() >= numv {
                break;
            }
        }
        Ok(Outcome::Done(rounds))
    }

    /// Apply `rule` until it no longer matches
    pub fn run<R: Rule>(&mut self, rule: &R) -> SimpResult {
        self.fixed_point(
            rule.name(),
            |g| {
                let ms = rule.find_matches(g);
                if ms.is_empty() {
                    (0, Rewrite::new())
                } else {
                    (ms.len(), rule.rewrite(g, &ms))
                }
            },
            false,
        )
    }

    /// Same as [`run`](Simplifier::run), for a rule chosen at runtime.
    ///
    /// [`RuleKind::HadamardRule`] is sent to
    /// [`run_hadamard_rule`](Simplifier::run_hadamard_rule).
    pub fn run_kind(&mut self, kind: RuleKind) -> SimpResult {
        if kind == RuleKind::HadamardRule {
            return self.run_hadamard_rule();
        }
        self.fixed_point(kind.name(), |g| kind.round(g), false)
    }

    /// Replace Hadamard boxes by edges.
    ///
    /// An edge landing next to another H-box is routed through a new
    /// vertex, so a round need not shrink the diagram. The loop stops as
    /// soon as one does not.
    pub fn run_hadamard_rule(&mut self) -> SimpResult {
        self.fixed_point(HadamardRule.name(), |g| RuleKind::HadamardRule.round(g), true)
    }

    pub fn spider_simp(&mut self) -> SimpResult {
        self.run(&SpiderFusion)
    }

    pub fn id_simp(&mut self) -> SimpResult {
        self.run(&IdentityRemoval)
    }

    pub fn lcomp_simp(&mut self) -> SimpResult {
        self.run(&LocalComp)
    }

    pub fn pivot_simp(&mut self) -> SimpResult {
        self.run(&Pivot)
    }

    pub fn pivot_boundary_simp(&mut self) -> SimpResult {
        self.run(&PivotBoundary)
    }

    pub fn pivot_gadget_simp(&mut self) -> SimpResult {
        self.run(&PivotGadget)
    }

    pub fn gadget_simp(&mut self) -> SimpResult {
        self.run(&PhaseGadgetFusion)
    }

    pub fn bialgebra_simp(&mut self) -> SimpResult {
        self.run(&Bialgebra)
    }

    pub fn hbox_simp(&mut self) -> SimpResult {
        self.run(&HBoxFusion)
    }

    pub fn copy_simp(&mut self) -> SimpResult {
        self.run(&StateCopy)
    }

    /// Turn every X spider into a Z spider
    pub fn to_graph(&mut self) -> GraphResult<()> {
        self.g.x_to_z()
    }

    /// Turn every Z spider into an X spider
    pub fn to_rgraph(&mut self) -> GraphResult<()> {
        self.g.z_to_x()
    }

    /// Fuse spiders, switch to graph-like form, then repeat spider fusion,
    /// identity removal, pivoting and local complementation until a whole
    /// round does nothing.
    pub fn interior_clifford_simp(&mut self) -> SimpResult {
        let mut total = 0;
        step!(total, self.spider_simp());
        self.to_graph()?;
        loop {
            let mut round = 0;
            round += step!(total, self.spider_simp());
            round += step!(total, self.id_simp());
            round += step!(total, self.spider_simp());
            round += step!(total, self.pivot_simp());
            round += step!(total, self.lcomp_simp());
            if round == 0 {
                break;
            }
        }
        info!("interior_clifford_simp: {total} rounds");
        Ok(Outcome::Done(total))
    }

    /// Alternate [`interior_clifford_simp`](Simplifier::interior_clifford_simp)
    /// with boundary pivots until no boundary pivot applies.
    pub fn clifford_simp(&mut self) -> SimpResult {
        let mut total = 0;
        loop {
            step!(total, self.interior_clifford_simp());
            if step!(total, self.pivot_boundary_simp()) == 0 {
                break;
            }
        }
        info!("clifford_simp: {total} rounds");
        Ok(Outcome::Done(total))
    }

    /// Clifford simplification interleaved with gadget pivots and gadget
    /// fusion, until neither the interior pass nor the gadget pivots at the
    /// end of a round change anything.
    pub fn full_reduce(&mut self) -> SimpResult {
        let mut total = 0;
        step!(total, self.interior_clifford_simp());
        step!(total, self.pivot_gadget_simp());
        loop {
            step!(total, self.clifford_simp());
            step!(total, self.gadget_simp());
            let i = step!(total, self.interior_clifford_simp());
            let p = step!(total, self.pivot_gadget_simp());
            if i == 0 && p == 0 {
                break;
            }
        }
        info!(
            "full_reduce: {total} rounds, {} vertices, {} edges, T-count {}",
            self.g.num_vertices(),
            self.g.num_edges(),
            self.g.tcount()
        );
        Ok(Outcome::Done(total))
    }
}

macro_rules! shorthand {
    ($($name:ident),* $(,)?) => {
        $(
            /// Run the strategy of the same name with default settings,
            /// returning the number of rounds
            pub fn $name(g: &mut impl GraphLike) -> GraphResult<usize> {
                Simplifier::new(g).$name().map(Outcome::into_inner)
            }
        )*
    };
}

shorthand!(
    spider_simp,
    id_simp,
    lcomp_simp,
    pivot_simp,
    pivot_boundary_simp,
    pivot_gadget_simp,
    gadget_simp,
    bialgebra_simp,
    hbox_simp,
    copy_simp,
    interior_clifford_simp,
    clifford_simp,
    full_reduce,
);

pub fn hadamard_simp(g: &mut impl GraphLike) -> GraphResult<usize> {
    Simplifier::new(g).run_hadamard_rule().map(Outcome::into_inner)
}

pub fn to_graph(g: &mut impl GraphLike) -> GraphResult<()> {
    g.x_to_z()
}

pub fn to_rgraph(g: &mut impl GraphLike) -> GraphResult<()> {
    g.z_to_x()
}
