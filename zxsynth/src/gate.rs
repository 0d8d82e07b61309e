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

//! Gate kinds and their translation into diagram spiders.

use num::{One, Zero};
use rustc_hash::FxHashMap;

use crate::error::{CircuitError, GraphResult};
use crate::graph::*;
use crate::phase::Phase;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum GType {
    XPhase,
    NOT,
    ZPhase,
    Z,
    S,
    T,
    Sdg,
    Tdg,
    CNOT,
    CZ,
    SWAP,
    HAD,
}

pub use GType::*;

impl GType {
    pub fn from_qasm_name(s: &str) -> Result<GType, CircuitError> {
        Ok(match s {
            "rz" => ZPhase,
            "rx" => XPhase,
            "x" => NOT,
            "z" => Z,
            "s" => S,
            "t" => T,
            "sdg" => Sdg,
            "tdg" => Tdg,
            "h" => HAD,
            "cx" | "CX" => CNOT,
            "cz" => CZ,
            "swap" => SWAP,
            _ => return Err(CircuitError::UnknownGate(s.to_string())),
        })
    }

    pub fn qasm_name(&self) -> &'static str {
        match self {
            ZPhase => "rz",
            NOT => "x",
            XPhase => "rx",
            Z => "z",
            S => "s",
            T => "t",
            Sdg => "sdg",
            Tdg => "tdg",
            HAD => "h",
            CNOT => "cx",
            CZ => "cz",
            SWAP => "swap",
        }
    }

    /// number of qubits the gate acts on
    pub fn num_qubits(&self) -> usize {
        match self {
            CNOT | CZ | SWAP => 2,
            _ => 1,
        }
    }

    /// The spider a single-qubit phase gate lowers to, with its fixed
    /// phase. Gates carrying their own phase return `None` here.
    fn fixed_spider(&self) -> Option<(VType, Phase)> {
        match self {
            Z => Some((VType::Z, Phase::one())),
            S => Some((VType::Z, Phase::new((1, 2)))),
            Sdg => Some((VType::Z, Phase::new((-1, 2)))),
            T => Some((VType::Z, Phase::new((1, 4)))),
            Tdg => Some((VType::Z, Phase::new((-1, 4)))),
            NOT => Some((VType::X, Phase::one())),
            _ => None,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Gate {
    pub t: GType,
    pub qs: Vec<usize>,
    pub phase: Phase,
}

impl Gate {
    pub fn new(t: GType, qs: Vec<usize>) -> Gate {
        Gate {
            t,
            qs,
            phase: Phase::zero(),
        }
    }

    pub fn new_with_phase(t: GType, qs: Vec<usize>, phase: impl Into<Phase>) -> Gate {
        Gate {
            t,
            qs,
            phase: phase.into(),
        }
    }

    pub fn qasm_name(&self) -> &'static str {
        self.t.qasm_name()
    }

    pub fn to_qasm(&self) -> String {
        let mut s = String::from(self.qasm_name());

        if let ZPhase | XPhase = self.t {
            s += &format!("({}*pi)", self.phase.to_f64());
        }

        s += " ";
        let qs: Vec<String> = self.qs.iter().map(|i| format!("q[{i}]")).collect();
        s += &qs.join(", ");

        s
    }

    pub fn adjoint(&mut self) {
        match self.t {
            ZPhase | XPhase => {
                self.phase = -self.phase;
            }
            S => self.t = Sdg,
            T => self.t = Tdg,
            Sdg => self.t = S,
            Tdg => self.t = T,
            _ => {} // everything else is self-adjoint
        }
    }

    /// The phase this gate applies, if it is a single-qubit phase gate
    pub fn rotation(&self) -> Option<Phase> {
        match self.t {
            ZPhase | XPhase => Some(self.phase),
            t => t.fixed_spider().map(|(_, p)| p),
        }
    }

    /// Everything but non-Clifford rotations
    pub fn is_clifford(&self) -> bool {
        self.rotation().map_or(true, |p| p.is_clifford())
    }

    /// Check the operands against the gate kind and the circuit width.
    pub fn validate(&self, nqubits: usize) -> Result<(), CircuitError> {
        let expected = self.t.num_qubits();
        if self.qs.len() != expected {
            return Err(CircuitError::WrongArity {
                name: self.qasm_name(),
                expected,
                found: self.qs.len(),
            });
        }
        if let Some(&q) = self.qs.iter().find(|&&q| q >= nqubits) {
            return Err(CircuitError::QubitOutOfRange(q, nqubits));
        }
        if expected == 2 && self.qs[0] == self.qs[1] {
            return Err(CircuitError::RepeatedQubit(self.qasm_name()));
        }
        Ok(())
    }

    /// Turn the output vertex of `qubit` into a spider and push a fresh
    /// output after it
    ///
    /// The map `qs` sends each qubit to its position in the output list.
    /// If `et` is Hadamard, the edge into the new spider is toggled. The
    /// new spider is returned.
    fn add_spider<G: GraphLike>(
        graph: &mut G,
        qs: &FxHashMap<usize, usize>,
        qubit: usize,
        ty: VType,
        et: EType,
        phase: impl Into<Phase>,
    ) -> GraphResult<V> {
        let i = qs[&qubit];
        let v0 = graph.outputs()[i];
        let q = graph.qubit(v0);
        let row = graph.row(v0);
        graph.set_vertex_type(v0, ty);
        graph.set_phase(v0, phase);
        let outp = graph.add_vertex_with_data(VData {
            ty: VType::B,
            qubit: q,
            row: row + 1.0,
            ..Default::default()
        });

        graph.add_edge(v0, outp)?;
        graph.outputs_mut()[i] = outp;

        if et == EType::H {
            let v1 = graph.neighbors(v0).find(|&w| w != outp);
            if let Some(v1) = v1 {
                graph.toggle_edge_type(v0, v1)?;
            }
        }

        Ok(v0)
    }

    /// Put two freshly added spiders on the same row, pushing both outputs
    /// one row past it.
    fn align<G: GraphLike>(graph: &mut G, qs: &FxHashMap<usize, usize>, pair: [(usize, V); 2]) {
        let outs = pair.map(|(q, _)| graph.outputs()[qs[&q]]);
        let row = graph.row(outs[0]).max(graph.row(outs[1]));
        for ((_, v), o) in pair.into_iter().zip(outs) {
            graph.set_row(v, row - 1.0);
            graph.set_row(o, row);
        }
    }

    /// Append this gate to the open end of a diagram
    ///
    /// Returns the spiders created. The gate must already be validated
    /// against the diagram width.
    pub fn add_to_graph(
        &self,
        graph: &mut impl GraphLike,
        qs: &mut FxHashMap<usize, usize>,
    ) -> GraphResult<Vec<V>> {
        let vs = match self.t {
            ZPhase => vec![Gate::add_spider(graph, qs, self.qs[0], VType::Z, EType::N, self.phase)?],
            XPhase => vec![Gate::add_spider(graph, qs, self.qs[0], VType::X, EType::N, self.phase)?],
            HAD => vec![Gate::add_spider(graph, qs, self.qs[0], VType::Z, EType::H, Phase::zero())?],
            CNOT | CZ => {
                let (ty, et) = if self.t == CNOT {
                    (VType::X, EType::N)
                } else {
                    (VType::Z, EType::H)
                };
                let v1 = Gate::add_spider(graph, qs, self.qs[0], VType::Z, EType::N, Phase::zero())?;
                let v2 = Gate::add_spider(graph, qs, self.qs[1], ty, EType::N, Phase::zero())?;
                Gate::align(graph, qs, [(self.qs[0], v1), (self.qs[1], v2)]);
                graph.add_edge_with_type(v1, v2, et)?;
                vec![v1, v2]
            }
            SWAP => {
                let (i0, i1) = (qs[&self.qs[0]], qs[&self.qs[1]]);
                qs.insert(self.qs[0], i1);
                qs.insert(self.qs[1], i0);
                vec![]
            }
            t => match t.fixed_spider() {
                Some((ty, phase)) => vec![Gate::add_spider(graph, qs, self.qs[0], ty, EType::N, phase)?],
                None => vec![],
            },
        };
        Ok(vs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rz", ZPhase)]
    #[case("x", NOT)]
    #[case("sdg", Sdg)]
    #[case("CX", CNOT)]
    #[case("swap", SWAP)]
    fn qasm_names(#[case] name: &str, #[case] t: GType) {
        assert_eq!(GType::from_qasm_name(name), Ok(t));
        if name != "CX" {
            assert_eq!(t.qasm_name(), name);
        }
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            GType::from_qasm_name("ccx"),
            Err(CircuitError::UnknownGate("ccx".into()))
        );
    }

    #[test]
    fn adjoints() {
        let mut g = Gate::new(T, vec![0]);
        g.adjoint();
        assert_eq!(g.t, Tdg);

        let mut g = Gate::new_with_phase(ZPhase, vec![1], (1, 4));
        g.adjoint();
        assert_eq!(g.phase, Phase::new((-1, 4)));

        let mut g = Gate::new(CNOT, vec![0, 1]);
        g.adjoint();
        assert_eq!(g, Gate::new(CNOT, vec![0, 1]));
    }

    #[test]
    fn clifford_gates() {
        assert!(Gate::new(S, vec![0]).is_clifford());
        assert!(Gate::new(CZ, vec![0, 1]).is_clifford());
        assert!(!Gate::new(T, vec![0]).is_clifford());
        assert!(!Gate::new_with_phase(XPhase, vec![0], (3, 8)).is_clifford());
        assert_eq!(Gate::new(Sdg, vec![0]).rotation(), Some(Phase::new((-1, 2))));
        assert_eq!(Gate::new(HAD, vec![0]).rotation(), None);
    }

    #[test]
    fn validation() {
        assert!(Gate::new(CNOT, vec![0, 1]).validate(2).is_ok());
        assert_eq!(
            Gate::new(CNOT, vec![0]).validate(2),
            Err(CircuitError::WrongArity {
                name: "cx",
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Gate::new(HAD, vec![3]).validate(2),
            Err(CircuitError::QubitOutOfRange(3, 2))
        );
        assert_eq!(
            Gate::new(CZ, vec![1, 1]).validate(2),
            Err(CircuitError::RepeatedQubit("cz"))
        );
    }

    #[test]
    fn qasm_line() {
        let g = Gate::new_with_phase(ZPhase, vec![2], (1, 2));
        assert_eq!(g.to_qasm(), "rz(0.5*pi) q[2]");
        assert_eq!(Gate::new(CNOT, vec![0, 1]).to_qasm(), "cx q[0], q[1]");
    }
}
