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

//! # Circuit extraction
//!
//! Turns a graph-like diagram with gflow back into a circuit. The
//! [`Extractor`] keeps a frontier of spiders next to the outputs and walks
//! it towards the inputs. Phases, Hadamards and CZs sitting on the
//! frontier become gates directly. Phase gadgets next to the frontier are
//! absorbed by pivoting. Whatever connectivity is left between the
//! frontier and the rest of the diagram is turned into CNOTs by Gaussian
//! elimination over GF(2), until some frontier spider has a single
//! neighbour and can be moved one step back.
//!
//! Gates are found from the outputs backwards, so they are pushed onto
//! the front of the circuit. The extractor consumes the diagram it is
//! given; [`ToCircuit::to_circuit`] works on a copy.

use itertools::Itertools;
use log::{debug, info, trace};
use num::Zero;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::cancel::{CancelToken, Outcome};
use crate::circuit::Circuit;
use crate::config::ExtractConfig;
use crate::error::GraphError;
use crate::gate::*;
use crate::graph::*;
use crate::linalg::*;
use crate::phase::Phase;
use crate::rules::{apply_rewrite, is_h_z_neighbor, push_pivot, PivotSide, Rewrite};

/// Extraction couldn't finish.
#[derive(Debug, Error)]
pub enum ExtractError<G: GraphLike> {
    /// No progress was possible. Carries the gates extracted so far and
    /// what is left of the diagram.
    #[error("diagram not fully extractable: {reason}")]
    NotExtractable {
        reason: String,
        circuit: Circuit,
        graph: G,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub trait ToCircuit: GraphLike {
    fn into_circuit(&mut self) -> Result<Circuit, ExtractError<Self>>;

    fn to_circuit(&self) -> Result<Circuit, ExtractError<Self>> {
        self.clone().into_circuit()
    }

    fn extractor(&mut self) -> Extractor<'_, Self> {
        Extractor::new(self)
    }
}

impl<G: GraphLike> ToCircuit for G {
    fn into_circuit(&mut self) -> Result<Circuit, ExtractError<G>> {
        Extractor::new(self).extract().map(Outcome::into_inner)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    gadgets: usize,
    cz: usize,
    cnot: usize,
    peeled: usize,
}

pub struct Extractor<'a, G: GraphLike> {
    g: &'a mut G,
    config: ExtractConfig,
    cancel: CancelToken,
    /// Pairs (qubit, vertex), ordered by qubit
    frontier: Vec<(usize, V)>,
    /// Hubs of phase gadgets, i.e. the neighbours of degree-1 spiders
    gadgets: FxHashSet<V>,
    counts: Counts,
}

impl<'a, G: GraphLike> Extractor<'a, G> {
    pub fn new(g: &'a mut G) -> Self {
        Extractor {
            g,
            config: ExtractConfig::default(),
            cancel: CancelToken::new(),
            frontier: Vec::new(),
            gadgets: FxHashSet::default(),
            counts: Counts::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Leave the final qubit permutation out of the circuit
    pub fn up_to_perm(mut self) -> Self {
        self.config.permute_qubits = false;
        self
    }

    fn fail(&self, reason: impl Into<String>, c: &Circuit) -> ExtractError<G> {
        ExtractError::NotExtractable {
            reason: reason.into(),
            circuit: c.clone(),
            graph: self.g.clone(),
        }
    }

    /// Build a biadjacency matrix of frontier with its neighbors
    ///
    /// Frontier elements are rows and neighbors are columns. The computed
    /// vec of neighbors and the matrix are returned.
    fn frontier_biadj(&self) -> (Vec<V>, Mat2) {
        let mut seen = FxHashSet::default();
        let mut neighbors = Vec::new();
        for &(_, v) in &self.frontier {
            for n in self.g.neighbors(v) {
                if self.g.vertex_type(n) != VType::B && seen.insert(n) {
                    neighbors.push(n);
                }
            }
        }
        if self.config.sort_neighbors {
            neighbors.sort_unstable();
        }

        let m = Mat2::build(self.frontier.len(), neighbors.len(), |i, j| {
            self.g.connected(self.frontier[i].1, neighbors[j])
        });

        (neighbors, m)
    }

    /// Set edges between frontier and given neighbors to match biadj. matrix
    fn update_frontier_biadj(&mut self, neighbors: &[V], m: &Mat2) -> Result<(), GraphError> {
        for (i, &(_, v)) in self.frontier.iter().enumerate() {
            for (j, &w) in neighbors.iter().enumerate() {
                match (m[(i, j)] == 1, self.g.connected(v, w)) {
                    (true, false) => self.g.add_edge_with_type(v, w, EType::H)?,
                    (false, true) => self.g.remove_edge(v, w)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn eliminate(m: &Mat2, blocksize: usize) -> Vec<RowOp> {
        let mut m = m.clone();
        if blocksize == 0 {
            m.gaussian_eliminate()
        } else {
            let mut ops = Vec::new();
            m.gauss_x(true, blocksize, &mut ops);
            ops
        }
    }

    /// The shortest elimination over plain Gauss and every block size
    fn best_elimination(m: &Mat2) -> Vec<RowOp> {
        (1..=m.num_cols()).fold(Self::eliminate(m, 0), |best, bs| {
            let ops = Self::eliminate(m, bs);
            if ops.len() < best.len() {
                ops
            } else {
                best
            }
        })
    }

    /// Row operations on the biadjacency matrix, chosen by the
    /// optimisation level
    fn row_ops(&self, m: &Mat2) -> Outcome<Vec<RowOp>> {
        let m = if self.config.permute_columns {
            m.permute_columns(&m.column_optimal_swap())
        } else {
            m.clone()
        };

        let mut ops = match self.config.optimize_level {
            0 => Self::eliminate(&m, self.config.block_size),
            1 => Self::best_elimination(&m),
            _ => match m.greedy_reduce(self.config.search_limit, &self.cancel) {
                Outcome::Cancelled(_) => return Outcome::Cancelled(vec![]),
                Outcome::Done(ops) if !ops.is_empty() => ops,
                Outcome::Done(_) => Self::best_elimination(&m),
            },
        };

        if self.config.filter_duplicate_cxs {
            filter_duplicate_ops(&mut ops);
        }
        Outcome::Done(ops)
    }

    /// Perform gaussian elimination on the frontier as CNOT gates
    ///
    /// At this point, we assume the frontier is phase-free and there are no
    /// edges between frontier vertices. Returns `false` if cancelled.
    fn gauss(&mut self, c: &mut Circuit) -> Result<bool, GraphError> {
        let (neighbors, mut m) = self.frontier_biadj();
        let ops = match self.row_ops(&m) {
            Outcome::Done(ops) => ops,
            Outcome::Cancelled(_) => return Ok(false),
        };

        // adding row src to row dst is a CNOT with its control on dst,
        // behind the Hadamards that join the frontier to its neighbours
        for op in &ops {
            let control = self.frontier[op.dst].0;
            let target = self.frontier[op.src].0;
            c.push_front(Gate::new(CNOT, vec![control, target]));
        }
        m.apply_row_ops(&ops);
        self.counts.cnot += ops.len();
        debug!("extract: {} CNOTs from a {}x{} biadjacency", ops.len(), m.num_rows(), m.num_cols());
        trace!("extract: row ops {}", ops.iter().join(" "));

        self.update_frontier_biadj(&neighbors, &m)?;
        Ok(true)
    }

    /// Prepare the frontier for circuit extraction
    ///
    /// Identifies the frontier, and pulls Hadamards, phases, and CZ
    /// gates into the circuit. Frontier vertices that touch an input and
    /// something else get a buffer spider before the input.
    fn prepare_frontier(&mut self, c: &mut Circuit) -> Result<(), ExtractError<G>> {
        self.frontier.clear();

        for q in 0..self.g.outputs().len() {
            let o = self.g.outputs()[q];
            let Some((mut v, mut et)) = self.g.incident_edges(o).next() else {
                return Err(self.fail(format!("output {o} is not connected"), c));
            };

            // a gadget hub can't sit on the frontier, so push it inwards
            if self.gadgets.contains(&v) {
                if let Some(b) = self.g.add_buffer(o, v, et)? {
                    v = b;
                    et = et.opposite();
                }
            }

            // replace a Hadamard edge from the output with a Hadamard gate
            if et == EType::H {
                c.push_front_reduced(Gate::new(HAD, vec![q]));
                self.g.set_edge_type(o, v, EType::N)?;
            }

            match self.g.vertex_type(v) {
                VType::B => {
                    if self.g.outputs().contains(&v) {
                        return Err(self.fail(format!("outputs {o} and {v} are connected"), c));
                    }
                    // output connects to an input, so this qubit is done
                    continue;
                }
                VType::Z => {}
                ty => {
                    return Err(self.fail(format!("frontier vertex {v} has type {ty:?}"), c));
                }
            }

            self.frontier.push((q, v));

            let p = self.g.phase(v);
            if !p.is_zero() {
                c.push_front_reduced(Gate::new_with_phase(ZPhase, vec![q], p));
                self.g.set_phase(v, Phase::zero());
            }

            for (n, et) in self.g.incident_edge_vec(v) {
                if n == o {
                    continue;
                }
                if self.g.vertex_type(n) == VType::B {
                    // for unitary circuits, an additional boundary must be an input
                    if !self.g.inputs().contains(&n) {
                        return Err(self.fail(format!("two outputs connected to vertex {v}"), c));
                    }
                    if self.g.degree(v) > 2 {
                        self.g.add_buffer(n, v, et)?;
                    }
                } else if let Some(&(r, _)) = self.frontier.iter().find(|&&(_, f)| f == n) {
                    if et != EType::H {
                        return Err(self.fail(format!("plain edge between frontier vertices {v} and {n}"), c));
                    }
                    self.g.remove_edge(v, n)?;
                    c.push_front(Gate::new(CZ, vec![q, r]));
                    self.counts.cz += 1;
                } else if !is_h_z_neighbor(&*self.g, n, et) {
                    return Err(self.fail(format!("bad neighbour {n} of frontier vertex {v}"), c));
                }
            }
        }

        Ok(())
    }

    /// Pivot to remove a gadget adjacent to the frontier
    ///
    /// The pivot runs along the edge between a frontier vertex and the
    /// gadget hub. The frontier vertex is removed and the hub takes its
    /// place, leaving the gadget's leaf as an ordinary spider further in.
    /// A hub whose phase is not Pauli is first gadgetised itself.
    fn fix_gadgets(&mut self, c: &Circuit) -> Result<bool, ExtractError<G>> {
        for i in 0..self.frontier.len() {
            let v = self.frontier[i].1;
            let Some(n) = self.g.neighbors(v).find(|n| self.gadgets.contains(n)) else {
                continue;
            };

            // the pivot has room for only one boundary, the output of v
            for (b, et) in self.g.incident_edge_vec(n) {
                if self.g.vertex_type(b) == VType::B {
                    self.g.add_buffer(b, n, et)?;
                }
            }
            if !self
                .g
                .incident_edges(n)
                .all(|(w, et)| w == v || is_h_z_neighbor(&*self.g, w, et))
            {
                return Err(self.fail(format!("could not pivot gadget hub {n} into the frontier"), c));
            }

            let mut rw = Rewrite::new();
            let hub = PivotSide::new(&*self.g, &mut rw, n);
            self.gadgets.extend(hub.extra.iter().copied());
            let front = PivotSide::plain(&*self.g, v);
            push_pivot(&*self.g, &mut rw, [front, hub]);
            apply_rewrite(&mut *self.g, rw)?;

            self.gadgets.remove(&n);
            self.counts.gadgets += 1;
            debug!("extract: pivoted gadget hub {n} into frontier vertex {v}");
            return Ok(true);
        }
        Ok(false)
    }

    /// Extract vertices from the frontier
    ///
    /// Phase-free frontier vertices with a single neighbour besides the
    /// output are removed, joining the output to that neighbour. Returns
    /// how many were found.
    fn extract_from_frontier(&mut self) -> Result<usize, GraphError> {
        let mut claimed = FxHashSet::default();
        let mut found = 0;
        for &(q, v) in &self.frontier {
            if self.g.degree(v) != 2 {
                continue;
            }
            let o = self.g.outputs()[q];
            let Some((w, et)) = self.g.incident_edges(v).find(|&(w, _)| w != o) else {
                continue;
            };
            if !claimed.insert(w) {
                continue;
            }
            self.g.remove_vertex(v)?;
            self.g.add_edge_with_type(o, w, et)?;
            found += 1;
        }
        self.counts.peeled += found;
        Ok(found)
    }

    /// Read the permutation off a diagram of wires and undo it with SWAPs
    fn permute_qubits(&mut self, c: &mut Circuit) -> Result<(), ExtractError<G>> {
        let outs = self.g.outputs().clone();
        let ins = self.g.inputs().clone();
        let m = Mat2::build(outs.len(), ins.len(), |i, j| self.g.connected(outs[i], ins[j]));
        let Some(perm) = m.column_assignment() else {
            return Err(self.fail("outputs do not connect to distinct inputs", c));
        };

        if !self.config.permute_qubits {
            return Ok(());
        }

        let mut cur: Vec<usize> = (0..perm.len()).collect();
        let mut swaps = Vec::new();
        for q in 0..perm.len() {
            if let Some(r) = cur.iter().position(|&x| x == perm[q]) {
                if r != q {
                    cur.swap(q, r);
                    swaps.push(Gate::new(SWAP, vec![q, r]));
                }
            }
        }
        for g in swaps.into_iter().rev() {
            c.push_front(g);
        }
        Ok(())
    }

    /// Extract a circuit, consuming the diagram
    ///
    /// Returns [`Outcome::Cancelled`] with the gates found so far if the
    /// cancel token fires; the diagram then holds whatever is not
    /// extracted yet.
    pub fn extract(&mut self) -> Result<Outcome<Circuit>, ExtractError<G>> {
        let mut c = Circuit::new(self.g.outputs().len());
        if self.g.inputs().len() != self.g.outputs().len() {
            return Err(self.fail(
                format!("{} inputs and {} outputs", self.g.inputs().len(), self.g.outputs().len()),
                &c,
            ));
        }

        // Pre-generate a set of all the phase gadgets. The extraction should
        // only ever eliminate phase gadgets, never create new ones.
        self.gadgets.clear();
        for v in self.g.vertices() {
            if self.g.degree(v) == 1 && self.g.vertex_type(v) == VType::Z {
                if let Some(n) = self.g.neighbors(v).next() {
                    if self.g.vertex_type(n) == VType::Z {
                        self.gadgets.insert(n);
                    }
                }
            }
        }

        loop {
            if self.cancel.is_cancelled() {
                return Ok(Outcome::Cancelled(c));
            }

            // Remove any phases, Hadamards, or CZs from the output and generate
            // a list of frontier vertices. If the frontier is empty after pre-processing,
            // we are done.
            self.prepare_frontier(&mut c)?;
            if self.frontier.is_empty() {
                break;
            }

            // If any gadgets are adjacent to the frontier, do a generalised pivot to remove
            // them. In that case, some edges will change, so we need to re-generate the frontier.
            if self.fix_gadgets(&c)? {
                continue;
            }

            // Look for extractible vertices. If we found some, loop. If not, try gaussian
            // elimination via CNOTs and look again.
            if self.extract_from_frontier()? > 0 {
                continue;
            }

            if !self.gauss(&mut c)? {
                return Ok(Outcome::Cancelled(c));
            }

            if self.extract_from_frontier()? > 0 {
                continue;
            }

            // If we didn't make progress, terminate with an error. This prevents infinite loops
            // in the case where a graph is not extractible.
            return Err(self.fail("no extractable vertex found", &c));
        }

        if let Some(v) = self.g.vertices().find(|&v| self.g.vertex_type(v) != VType::B) {
            return Err(self.fail(format!("vertex {v} is not reachable from the outputs"), &c));
        }

        self.permute_qubits(&mut c)?;

        let Counts { gadgets, cz, cnot, peeled } = self.counts;
        info!(
            "extracted {} gates: {gadgets} gadgets, {cz} CZs, {cnot} CNOTs, {peeled} vertices peeled",
            c.num_gates()
        );
        Ok(Outcome::Done(c))
    }
}
