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

pub use crate::graph::*;
use crate::error::{GraphError, GraphResult};
use std::mem;

pub type VTab<T> = Vec<Option<T>>;

/// Adjacency-list graph backed by a vertex arena.
///
/// Removing a vertex leaves a `None` slot behind. Slots are never refilled,
/// so ids stay stable for as long as the graph lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    vdata: VTab<VData>,
    edata: VTab<Vec<(V, EType)>>,
    inputs: Vec<V>,
    outputs: Vec<V>,
    numv: usize,
    nume: usize,
}

impl Graph {
    fn index<U>(nhd: &[(V, U)], v: V) -> Option<usize> {
        nhd.iter().position(|&(v0, _)| v == v0)
    }

    fn nhd(&self, v: V) -> &Vec<(V, EType)> {
        match self.edata.get(v) {
            Some(Some(nhd)) => nhd,
            _ => panic!("Vertex not found"),
        }
    }

    fn nhd_mut(&mut self, v: V) -> GraphResult<&mut Vec<(V, EType)>> {
        match self.edata.get_mut(v) {
            Some(Some(nhd)) => Ok(nhd),
            _ => Err(GraphError::VertexNotFound(v)),
        }
    }

    /// Removes vertex 't' from the adjacency list of 's', returning whether
    /// it was there.
    fn remove_half_edge(&mut self, s: V, t: V) -> bool {
        if let Some(Some(nhd)) = self.edata.get_mut(s) {
            if let Some(i) = Graph::index(nhd, t) {
                nhd.swap_remove(i);
                return true;
            }
        }
        false
    }
}

impl GraphLike for Graph {
    fn new() -> Graph {
        Graph {
            vdata: Vec::new(),
            edata: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            numv: 0,
            nume: 0,
        }
    }

    fn vindex(&self) -> V {
        self.vdata.len()
    }

    fn num_vertices(&self) -> usize {
        self.numv
    }

    fn num_edges(&self) -> usize {
        self.nume
    }

    fn vertices(&self) -> impl Iterator<Item = V> {
        self.vdata
            .iter()
            .enumerate()
            .filter_map(|(v, d)| d.as_ref().map(|_| v))
    }

    fn edges(&self) -> impl Iterator<Item = (V, V, EType)> {
        self.edata.iter().enumerate().flat_map(|(v, tab)| {
            tab.iter()
                .flatten()
                .filter(move |&&(v1, _)| v <= v1)
                .map(move |&(v1, et)| (v, v1, et))
        })
    }

    fn inputs(&self) -> &Vec<V> {
        &self.inputs
    }

    fn inputs_mut(&mut self) -> &mut Vec<V> {
        &mut self.inputs
    }

    fn set_inputs(&mut self, inputs: Vec<V>) {
        self.inputs = inputs;
    }

    fn outputs(&self) -> &Vec<V> {
        &self.outputs
    }

    fn outputs_mut(&mut self) -> &mut Vec<V> {
        &mut self.outputs
    }

    fn set_outputs(&mut self, outputs: Vec<V>) {
        self.outputs = outputs;
    }

    fn add_vertex_with_data(&mut self, d: VData) -> V {
        self.numv += 1;
        self.vdata.push(Some(d));
        self.edata.push(Some(Vec::new()));
        self.vdata.len() - 1
    }

    fn remove_vertex(&mut self, v: V) -> GraphResult<()> {
        let adj = self
            .edata
            .get_mut(v)
            .and_then(mem::take)
            .ok_or(GraphError::VertexNotFound(v))?;
        self.vdata[v] = None;
        self.numv -= 1;

        for (v1, _) in adj {
            self.nume -= 1;
            if v1 != v && !self.remove_half_edge(v1, v) {
                return Err(GraphError::AsymmetricEdge(v, v1));
            }
        }

        self.inputs.retain(|&i| i != v);
        self.outputs.retain(|&o| o != v);
        Ok(())
    }

    fn add_edge_with_type(&mut self, s: V, t: V, ety: EType) -> GraphResult<()> {
        if s == t {
            let ty = self.vdata.get(s).and_then(|d| d.as_ref()).map(|d| d.ty);
            return match ty {
                Some(ty) => Err(GraphError::UnsupportedSelfLoop(s, ty)),
                None => Err(GraphError::VertexNotFound(s)),
            };
        }
        self.nhd_mut(t)?;
        let nhd = self.nhd_mut(s)?;
        if Graph::index(nhd, t).is_some() {
            return Err(GraphError::ParallelEdge(s, t));
        }
        nhd.push((t, ety));
        self.nhd_mut(t)?.push((s, ety));
        self.nume += 1;
        Ok(())
    }

    fn remove_edge(&mut self, s: V, t: V) -> GraphResult<()> {
        match (self.remove_half_edge(s, t), self.remove_half_edge(t, s)) {
            (true, true) => {
                self.nume -= 1;
                Ok(())
            }
            (false, false) => Err(GraphError::EdgeNotFound(s, t)),
            _ => Err(GraphError::AsymmetricEdge(s, t)),
        }
    }

    fn set_edge_type(&mut self, s: V, t: V, ety: EType) -> GraphResult<()> {
        let nhd = self.nhd_mut(s)?;
        let i = Graph::index(nhd, t).ok_or(GraphError::EdgeNotFound(s, t))?;
        nhd[i].1 = ety;

        let nhd = self.nhd_mut(t)?;
        let i = Graph::index(nhd, s).ok_or(GraphError::AsymmetricEdge(s, t))?;
        nhd[i].1 = ety;
        Ok(())
    }

    fn vertex_data(&self, v: V) -> &VData {
        self.vdata
            .get(v)
            .and_then(|d| d.as_ref())
            .expect("Vertex not found")
    }

    fn vertex_data_mut(&mut self, v: V) -> &mut VData {
        self.vdata
            .get_mut(v)
            .and_then(|d| d.as_mut())
            .expect("Vertex not found")
    }

    fn edge_type_opt(&self, s: V, t: V) -> Option<EType> {
        if let Some(Some(nhd)) = self.edata.get(s) {
            nhd.iter().find(|&&(v0, _)| v0 == t).map(|&(_, et)| et)
        } else {
            None
        }
    }

    fn neighbors(&self, v: V) -> impl Iterator<Item = V> {
        self.nhd(v).iter().map(|&(v1, _)| v1)
    }

    fn incident_edges(&self, v: V) -> impl Iterator<Item = (V, EType)> {
        self.nhd(v).iter().copied()
    }

    fn degree(&self, v: V) -> usize {
        self.nhd(v).len()
    }

    fn contains_vertex(&self, v: V) -> bool {
        matches!(self.vdata.get(v), Some(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_empty_graph() {
        let g = Graph::new();
        assert_eq!(g.num_vertices(), 0);
        assert_eq!(g.num_edges(), 0);
    }

    fn simple_graph() -> (Graph, Vec<V>) {
        let mut g = Graph::new();
        let vs = vec![
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
            g.add_vertex(VType::Z),
            g.add_vertex(VType::Z),
            g.add_vertex(VType::X),
            g.add_vertex(VType::X),
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
        ];
        for (s, t) in [(0, 2), (1, 3), (2, 4), (2, 5), (3, 4), (3, 5), (4, 6), (5, 7)] {
            g.add_edge(vs[s], vs[t]).unwrap();
        }
        g.set_inputs(vec![vs[0], vs[1]]);
        g.set_outputs(vec![vs[6], vs[7]]);
        (g, vs)
    }

    #[test]
    fn create_simple_graph() {
        let (g, _) = simple_graph();
        assert_eq!(g.num_vertices(), 8);
        assert_eq!(g.num_edges(), 8);
        g.check_invariants().unwrap();
    }

    #[test]
    fn edge_iterator() {
        let (mut g, vs) = simple_graph();
        g.set_edge_type(vs[1], vs[3], EType::H).unwrap();

        let mut edges: Vec<_> = g.edges().collect();
        let mut expected_edges = vec![
            (vs[0], vs[2], EType::N),
            (vs[1], vs[3], EType::H),
            (vs[2], vs[4], EType::N),
            (vs[2], vs[5], EType::N),
            (vs[3], vs[4], EType::N),
            (vs[3], vs[5], EType::N),
            (vs[4], vs[6], EType::N),
            (vs[5], vs[7], EType::N),
        ];

        edges.sort();
        expected_edges.sort();
        assert_eq!(expected_edges, edges);
    }

    #[test]
    fn ids_are_not_reused() {
        let (mut g, vs) = simple_graph();
        let next = g.vindex();
        g.remove_vertex(vs[4]).unwrap();
        assert_eq!(g.num_vertices(), 7);
        assert_eq!(g.num_edges(), 5);
        assert!(!g.contains_vertex(vs[4]));
        assert_eq!(g.add_vertex(VType::Z), next);
        assert_eq!(g.remove_vertex(vs[4]), Err(GraphError::VertexNotFound(vs[4])));
    }

    #[test]
    fn removing_a_boundary_updates_io() {
        let (mut g, vs) = simple_graph();
        // qubit 1 moves down to qubit 0
        g.remove_vertex(vs[0]).unwrap();
        assert_eq!(g.inputs(), &vec![vs[1]]);
        assert_eq!(g.outputs(), &vec![vs[6], vs[7]]);

        // a boundary swapped out of its slot first leaves the numbering alone
        let o = g.add_vertex(VType::B);
        g.add_edge(vs[5], o).unwrap();
        g.outputs_mut()[1] = o;
        g.remove_vertex(vs[7]).unwrap();
        assert_eq!(g.outputs(), &vec![vs[6], o]);
        g.check_invariants().unwrap();
    }

    #[test]
    fn raw_edges_are_checked() {
        let (mut g, vs) = simple_graph();
        assert_eq!(
            g.add_edge(vs[2], vs[4]),
            Err(GraphError::ParallelEdge(vs[2], vs[4]))
        );
        assert_eq!(g.add_edge(vs[2], 99), Err(GraphError::VertexNotFound(99)));
        assert!(g.add_edge(vs[2], vs[2]).is_err());
        assert_eq!(
            g.remove_edge(vs[0], vs[7]),
            Err(GraphError::EdgeNotFound(vs[0], vs[7]))
        );
        assert_eq!(g.num_edges(), 8);
    }

    #[test]
    fn one_sided_edge_is_corruption() {
        let (mut g, vs) = simple_graph();
        g.edata[vs[4]]
            .as_mut()
            .unwrap()
            .retain(|&(n, _)| n != vs[2]);
        assert_eq!(
            g.check_invariants(),
            Err(GraphError::AsymmetricEdge(vs[2], vs[4]))
        );
        assert_eq!(
            g.remove_edge(vs[2], vs[4]),
            Err(GraphError::AsymmetricEdge(vs[2], vs[4]))
        );
    }
}
