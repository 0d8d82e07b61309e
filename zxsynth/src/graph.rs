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

use std::fmt::Write;

use num::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::phase::Phase;

pub type V = usize;

/// The type of a vertex in a graph.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VType {
    B, // Boundary
    #[default]
    Z, // Z-spider
    X, // X-spider
    #[serde(rename = "hadamard")]
    H, // H-box
}

impl VType {
    pub fn is_spider(&self) -> bool {
        matches!(self, VType::Z | VType::X)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VData {
    pub ty: VType,
    pub phase: Phase,
    pub qubit: f64,
    pub row: f64,
}

impl Default for VData {
    fn default() -> Self {
        VData {
            ty: VType::B,
            phase: Phase::zero(),
            qubit: 0.0,
            row: 0.0,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EType {
    /// Normal edge.
    #[default]
    #[serde(rename = "simple")]
    N,
    /// Hadamard edge.
    #[serde(rename = "hadamard")]
    H,
}

impl EType {
    pub fn opposite(&self) -> EType {
        match self {
            EType::N => EType::H,
            EType::H => EType::N,
        }
    }

    /// The type of the single edge equivalent to two edges in sequence.
    pub fn merge(et0: EType, et1: EType) -> EType {
        if et0 == EType::N {
            et1
        } else {
            et1.opposite()
        }
    }
}

/// A ZX-diagram with typed vertices, two edge types and ordered boundaries.
///
/// Vertex ids are handed out by a counter that only grows, so the next id is
/// always `vindex()` and an id is never reused after its vertex is removed.
/// Mutators that can find the diagram in an inconsistent state return a
/// [`GraphError`]; read accessors panic on a missing vertex, which is a bug
/// in the caller rather than a property of the diagram.
pub trait GraphLike: Clone + Sized + Send + Sync + std::fmt::Debug {
    /// Initialise a new empty graph
    fn new() -> Self;

    /// Next fresh vertex index
    fn vindex(&self) -> V;

    fn num_vertices(&self) -> usize;
    fn num_edges(&self) -> usize;

    /// Get iterator over all vertices, in increasing order
    fn vertices(&self) -> impl Iterator<Item = V>;

    /// Get iterator over all edges
    ///
    /// An "edge" is a triple (s, t, edge_type), where s <= t.
    fn edges(&self) -> impl Iterator<Item = (V, V, EType)>;

    fn inputs(&self) -> &Vec<V>;
    fn inputs_mut(&mut self) -> &mut Vec<V>;
    fn set_inputs(&mut self, inputs: Vec<V>);
    fn outputs(&self) -> &Vec<V>;
    fn outputs_mut(&mut self) -> &mut Vec<V>;
    fn set_outputs(&mut self, outputs: Vec<V>);

    /// Add a vertex with the given VData struct
    fn add_vertex_with_data(&mut self, d: VData) -> V;

    /// Remove a vertex and all of its edges
    ///
    /// A boundary is also dropped from the input and output lists. Those
    /// lists are indexed by qubit, so every boundary listed after it moves
    /// down one qubit. To keep the numbering, put a replacement boundary in
    /// its slot before removing it.
    fn remove_vertex(&mut self, v: V) -> GraphResult<()>;

    /// Add an edge with the given type, with no simplification
    ///
    /// Fails if the vertices are already connected. Use
    /// [`add_edge_smart`](GraphLike::add_edge_smart) to insert an edge
    /// that might be parallel to an existing one.
    fn add_edge_with_type(&mut self, s: V, t: V, ety: EType) -> GraphResult<()>;

    /// Remove the edge between s and t
    ///
    /// The edge must be recorded at both endpoints.
    fn remove_edge(&mut self, s: V, t: V) -> GraphResult<()>;

    fn set_edge_type(&mut self, s: V, t: V, ety: EType) -> GraphResult<()>;

    fn vertex_data(&self, v: V) -> &VData;
    fn vertex_data_mut(&mut self, v: V) -> &mut VData;
    fn edge_type_opt(&self, s: V, t: V) -> Option<EType>;
    fn neighbors(&self, v: V) -> impl Iterator<Item = V>;
    fn incident_edges(&self, v: V) -> impl Iterator<Item = (V, EType)>;
    fn degree(&self, v: V) -> usize;
    fn contains_vertex(&self, v: V) -> bool;

    fn check_vertex(&self, v: V) -> GraphResult<()> {
        if self.contains_vertex(v) {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound(v))
        }
    }

    /// Add a vertex with the given type and zero phase
    fn add_vertex(&mut self, ty: VType) -> V {
        self.add_vertex_with_data(VData {
            ty,
            ..VData::default()
        })
    }

    fn add_vertex_with_phase(&mut self, ty: VType, phase: impl Into<Phase>) -> V {
        self.add_vertex_with_data(VData {
            ty,
            phase: phase.into(),
            ..VData::default()
        })
    }

    /// Add a vertex with its phase and layout position
    fn add_vertex_at(&mut self, ty: VType, phase: impl Into<Phase>, qubit: f64, row: f64) -> V {
        self.add_vertex_with_data(VData {
            ty,
            phase: phase.into(),
            qubit,
            row,
        })
    }

    fn phase(&self, v: V) -> Phase {
        self.vertex_data(v).phase
    }

    fn set_phase(&mut self, v: V, phase: impl Into<Phase>) {
        self.vertex_data_mut(v).phase = phase.into();
    }

    fn add_to_phase(&mut self, v: V, phase: impl Into<Phase>) {
        let vd = self.vertex_data_mut(v);
        vd.phase += phase.into();
    }

    fn vertex_type(&self, v: V) -> VType {
        self.vertex_data(v).ty
    }

    fn set_vertex_type(&mut self, v: V, ty: VType) {
        self.vertex_data_mut(v).ty = ty;
    }

    fn qubit(&self, v: V) -> f64 {
        self.vertex_data(v).qubit
    }

    fn set_qubit(&mut self, v: V, qubit: f64) {
        self.vertex_data_mut(v).qubit = qubit;
    }

    fn row(&self, v: V) -> f64 {
        self.vertex_data(v).row
    }

    fn set_row(&mut self, v: V, row: f64) {
        self.vertex_data_mut(v).row = row;
    }

    /// Add a plain edge, with no simplification
    fn add_edge(&mut self, s: V, t: V) -> GraphResult<()> {
        self.add_edge_with_type(s, t, EType::N)
    }

    fn edge_type(&self, s: V, t: V) -> EType {
        self.edge_type_opt(s, t).expect("Edge not found")
    }

    fn connected(&self, v0: V, v1: V) -> bool {
        self.edge_type_opt(v0, v1).is_some()
    }

    fn toggle_edge_type(&mut self, v0: V, v1: V) -> GraphResult<()> {
        let et = self
            .edge_type_opt(v0, v1)
            .ok_or(GraphError::EdgeNotFound(v0, v1))?;
        self.set_edge_type(v0, v1, et.opposite())
    }

    /// Remove the edge between s and t, checking it has the expected type
    fn remove_edge_with_type(&mut self, s: V, t: V, ety: EType) -> GraphResult<()> {
        match self.edge_type_opt(s, t) {
            Some(et) if et == ety => self.remove_edge(s, t),
            _ => Err(GraphError::EdgeNotFound(s, t)),
        }
    }

    fn vertex_vec(&self) -> Vec<V> {
        self.vertices().collect()
    }

    fn edge_vec(&self) -> Vec<(V, V, EType)> {
        self.edges().collect()
    }

    fn neighbor_vec(&self, v: V) -> Vec<V> {
        self.neighbors(v).collect()
    }

    fn incident_edge_vec(&self, v: V) -> Vec<(V, EType)> {
        self.incident_edges(v).collect()
    }

    fn remove_vertices(&mut self, vs: &[V]) -> GraphResult<()> {
        for &v in vs {
            self.remove_vertex(v)?;
        }
        Ok(())
    }

    /// Remove every non-boundary vertex with no neighbours
    ///
    /// Returns the number of vertices removed.
    fn remove_isolated_vertices(&mut self) -> GraphResult<usize> {
        let isolated: Vec<V> = self
            .vertices()
            .filter(|&v| self.vertex_type(v) != VType::B && self.degree(v) == 0)
            .collect();
        self.remove_vertices(&isolated)?;
        Ok(isolated.len())
    }

    /// Recolour every spider of type `from`, toggling its edges
    fn recolor_spiders(&mut self, from: VType, to: VType) -> GraphResult<()> {
        for v in self.vertex_vec() {
            if self.vertex_type(v) == from {
                self.set_vertex_type(v, to);
                for w in self.neighbor_vec(v) {
                    self.toggle_edge_type(v, w)?;
                }
            }
        }
        Ok(())
    }

    /// Convert all X spiders to Z with the colour-change rule
    fn x_to_z(&mut self) -> GraphResult<()> {
        self.recolor_spiders(VType::X, VType::Z)
    }

    /// Convert all Z spiders to X with the colour-change rule
    fn z_to_x(&mut self) -> GraphResult<()> {
        self.recolor_spiders(VType::Z, VType::X)
    }

    /// Add an edge and simplify if necessary to remove parallel edges
    ///
    /// Parallel edges between two spiders are resolved with the Hopf rule
    /// and the colour-change rule, so they either vanish or turn into a
    /// phase of π. A self-loop on a spider is dropped, adding π if it is a
    /// Hadamard loop. H-boxes do not take part in this algebra: a parallel
    /// edge touching an H-box is kept by routing it through a fresh vertex.
    /// Boundaries admit no second edge at all.
    fn add_edge_smart(&mut self, s: V, t: V, ety: EType) -> GraphResult<()> {
        self.check_vertex(s)?;
        self.check_vertex(t)?;
        let st = self.vertex_type(s);

        if s == t {
            return if st.is_spider() {
                if ety == EType::H {
                    self.add_to_phase(s, Phase::one());
                }
                Ok(())
            } else {
                Err(GraphError::UnsupportedSelfLoop(s, st))
            };
        }

        let Some(ety0) = self.edge_type_opt(s, t) else {
            return self.add_edge_with_type(s, t, ety);
        };

        let tt = self.vertex_type(t);
        match (st, tt) {
            (VType::B, _) => Err(GraphError::BoundaryParallelEdge(s, t)),
            (_, VType::B) => Err(GraphError::BoundaryParallelEdge(t, s)),
            (VType::H, _) | (_, VType::H) => {
                let (ty, phase) = match ety {
                    EType::N => (VType::Z, Phase::zero()),
                    EType::H => (VType::H, Phase::one()),
                };
                let v = self.add_vertex_at(
                    ty,
                    phase,
                    (self.qubit(s) + self.qubit(t)) / 2.0,
                    (self.row(s) + self.row(t)) / 2.0,
                );
                self.add_edge_with_type(s, v, EType::N)?;
                self.add_edge_with_type(v, t, EType::N)
            }
            _ if st == tt => match (ety0, ety) {
                (EType::N, EType::N) => Ok(()), // ignore new edge
                (EType::H, EType::H) => self.remove_edge(s, t),
                (EType::H, EType::N) => {
                    self.set_edge_type(s, t, EType::N)?;
                    self.add_to_phase(s, Phase::one());
                    Ok(())
                }
                (EType::N, EType::H) => {
                    self.add_to_phase(s, Phase::one());
                    Ok(())
                }
            },
            _ => match (ety0, ety) {
                (EType::N, EType::N) => self.remove_edge(s, t),
                (EType::N, EType::H) => {
                    self.set_edge_type(s, t, EType::H)?;
                    self.add_to_phase(s, Phase::one());
                    Ok(())
                }
                (EType::H, EType::N) => {
                    self.add_to_phase(s, Phase::one());
                    Ok(())
                }
                (EType::H, EType::H) => Ok(()), // ignore new edge
            },
        }
    }

    /// Move all of `v`'s phase except `keep` onto a fresh phase gadget
    ///
    /// Returns the new (axel, leaf) pair. The axel is joined to `v` and to
    /// the leaf by Hadamard edges, and the leaf carries `phase(v) - keep`.
    fn gadgetize_phase(&mut self, v: V, keep: Phase) -> GraphResult<(V, V)> {
        self.check_vertex(v)?;
        if self.vertex_type(v) != VType::Z {
            return Err(GraphError::WrongVertexType(v, self.vertex_type(v)));
        }
        let row = self.row(v);
        let axel = self.add_vertex_at(VType::Z, Phase::zero(), -1.0, row);
        let leaf = self.add_vertex_at(VType::Z, self.phase(v) - keep, -2.0, row);
        self.set_phase(v, keep);
        self.add_edge_with_type(axel, leaf, EType::H)?;
        self.add_edge_with_type(v, axel, EType::H)?;
        Ok((axel, leaf))
    }

    /// Insert a phase-free Z spider on the edge between `v` and `other`
    ///
    /// Only acts if that edge exists and has type `ety`; returns the buffer
    /// vertex, or `None` if nothing was done. Afterwards `v` connects to the
    /// buffer with the opposite edge type and the buffer connects to `other`
    /// with a Hadamard edge, which composes back to `ety`.
    fn add_buffer(&mut self, v: V, other: V, ety: EType) -> GraphResult<Option<V>> {
        if self.edge_type_opt(v, other) != Some(ety) {
            return Ok(None);
        }
        let buf = self.add_vertex_at(
            VType::Z,
            Phase::zero(),
            self.qubit(v),
            (self.row(v) + self.row(other)) / 2.0,
        );
        self.remove_edge(v, other)?;
        self.add_edge_with_type(v, buf, ety.opposite())?;
        self.add_edge_with_type(buf, other, EType::H)?;
        Ok(Some(buf))
    }

    /// Check adjacency symmetry and boundary degrees
    fn check_invariants(&self) -> GraphResult<()> {
        for v in self.vertices() {
            for (n, et) in self.incident_edges(v) {
                if !self.contains_vertex(n) {
                    return Err(GraphError::VertexNotFound(n));
                }
                if self.edge_type_opt(n, v) != Some(et) {
                    return Err(GraphError::AsymmetricEdge(v, n));
                }
            }
            if self.vertex_type(v) == VType::B && self.degree(v) != 1 {
                return Err(GraphError::BoundaryDegree(v, self.degree(v)));
            }
        }
        for &b in self.inputs().iter().chain(self.outputs()) {
            self.check_vertex(b)?;
        }
        Ok(())
    }

    /// All spiders are Z, internal edges are Hadamard and boundaries have
    /// exactly one neighbour
    fn is_graph_like(&self) -> bool {
        self.vertices().all(|v| match self.vertex_type(v) {
            VType::B => self.degree(v) == 1,
            VType::Z => self
                .incident_edges(v)
                .all(|(n, et)| et == EType::H || self.vertex_type(n) == VType::B),
            _ => false,
        })
    }

    /// Checks if the given graph only consists of wires from the inputs to outputs (in order)
    fn is_identity(&self) -> bool {
        let n = self.inputs().len();
        self.outputs().len() == n
            && self.num_vertices() == 2 * n
            && (0..n).all(|i| self.edge_type_opt(self.inputs()[i], self.outputs()[i]) == Some(EType::N))
    }

    /// Mean of the squared vertex degrees
    fn density(&self) -> f64 {
        if self.num_vertices() == 0 {
            return 0.0;
        }
        let total: usize = self.vertices().map(|v| self.degree(v).pow(2)).sum();
        total as f64 / self.num_vertices() as f64
    }

    /// Number of non-boundary vertices of degree 1
    fn num_gadgets(&self) -> usize {
        self.vertices()
            .filter(|&v| self.vertex_type(v) != VType::B && self.degree(v) == 1)
            .count()
    }

    /// Return number of Z or X spiders with non-Clifford phase
    fn tcount(&self) -> usize {
        self.vertices()
            .filter(|&v| self.vertex_type(v).is_spider() && !self.phase(v).is_clifford())
            .count()
    }

    /// Returns max row of any vertex, or -1 for an empty graph
    fn depth(&self) -> f64 {
        self.vertices().map(|v| self.row(v)).fold(-1.0, f64::max)
    }

    /// Exchange inputs and outputs, negate all phases and mirror the layout
    fn adjoint(&mut self) {
        let max_row = self.depth();
        for v in self.vertex_vec() {
            let d = self.vertex_data_mut(v);
            d.phase = -d.phase;
            d.row = max_row - d.row;
        }

        let inp = self.inputs().clone();
        let outp = self.outputs().clone();
        self.set_inputs(outp);
        self.set_outputs(inp);
    }

    /// Same as GraphLike::adjoint(), but return as a copy
    fn to_adjoint(&self) -> Self {
        let mut g = self.clone();
        g.adjoint();
        g
    }

    /// Return a graphviz-friendly string representation of the graph
    fn to_dot(&self) -> String {
        let mut dot = String::from("graph {\n");
        for v in self.vertices() {
            let color = match self.vertex_type(v) {
                VType::B => "black",
                VType::Z => "green",
                VType::X => "red",
                VType::H => "yellow",
            };
            let p = self.phase(v);
            let label = if self.inputs().contains(&v) {
                format!("{v}:i")
            } else if self.outputs().contains(&v) {
                format!("{v}:o")
            } else if !p.is_zero() {
                format!("{v}:{p}")
            } else {
                format!("{v}")
            };
            let _ = writeln!(
                dot,
                "  {v} [color={color}, label=\"{label}\", pos=\"{},{}!\"]",
                self.row(v),
                self.qubit(v)
            );
        }
        dot += "\n";
        for (s, t, ty) in self.edges() {
            let _ = write!(dot, "  {s} -- {t}");
            if ty == EType::H {
                dot += " [color=blue]";
            }
            dot += "\n";
        }
        dot += "}\n";
        dot
    }
}
