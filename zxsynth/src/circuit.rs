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

use num::Zero;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::fmt;

use crate::error::CircuitError;
use crate::gate::*;
use crate::graph::*;
use crate::linalg::RowOps;
use crate::phase::Phase;

/// A type for quantum circuits
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Circuit {
    nqubits: usize,
    pub gates: VecDeque<Gate>,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct CircuitStats {
    pub qubits: usize,
    pub total: usize,
    pub oneq: usize,
    pub twoq: usize,
    pub cnot: usize,
    pub cliff: usize,
    pub non_cliff: usize,
}

impl CircuitStats {
    pub fn make(c: &Circuit) -> Self {
        let mut s = CircuitStats {
            qubits: c.num_qubits(),
            total: c.num_gates(),
            oneq: 0,
            twoq: 0,
            cnot: 0,
            cliff: 0,
            non_cliff: 0,
        };
        for g in &c.gates {
            if g.qs.len() == 1 {
                s.oneq += 1;
            } else {
                s.twoq += 1;
            }

            if g.t == CNOT {
                s.cnot += 1;
            }

            if g.is_clifford() {
                s.cliff += 1;
            } else {
                s.non_cliff += 1;
            }
        }
        s
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Circuit with {} qubits, {} gates\n  1-qubit: {}\n  2-qubit: {}\n  cnot: {}\n  clifford: {}\n  non-clifford: {}",
            self.qubits, self.total, self.oneq, self.twoq, self.cnot, self.cliff, self.non_cliff
        )
    }
}

impl Circuit {
    pub fn new(nqubits: usize) -> Circuit {
        Circuit {
            gates: VecDeque::new(),
            nqubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.nqubits
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_gates_of_type(&self, t: GType) -> usize {
        self.gates.iter().filter(|g| g.t == t).count()
    }

    pub fn push(&mut self, g: Gate) {
        self.gates.push_back(g);
    }

    pub fn push_back(&mut self, g: Gate) {
        self.gates.push_back(g);
    }

    pub fn push_front(&mut self, g: Gate) {
        self.gates.push_front(g);
    }

    /// Prepend a gate, cancelling it against the first gate on its qubit
    /// where possible
    ///
    /// Two Hadamards cancel, and two Z rotations merge into one (which
    /// disappears if the phases sum to zero). Anything else is prepended
    /// as it is.
    pub fn push_front_reduced(&mut self, g: Gate) {
        if let [q] = g.qs[..] {
            if let Some(i) = self.gates.iter().position(|h| h.qs.contains(&q)) {
                let h = &mut self.gates[i];
                match (g.t, h.t) {
                    (HAD, HAD) => {
                        self.gates.remove(i);
                        return;
                    }
                    (ZPhase, ZPhase) => {
                        h.phase += g.phase;
                        if h.phase.is_zero() {
                            self.gates.remove(i);
                        }
                        return;
                    }
                    _ => {}
                }
            }
        }
        self.gates.push_front(g);
    }

    pub fn add_gate_with_phase(
        &mut self,
        name: &str,
        qs: Vec<usize>,
        phase: impl Into<Phase>,
    ) -> Result<(), CircuitError> {
        let g = Gate::new_with_phase(GType::from_qasm_name(name)?, qs, phase);
        g.validate(self.nqubits)?;
        self.push(g);
        Ok(())
    }

    pub fn add_gate(&mut self, name: &str, qs: Vec<usize>) -> Result<(), CircuitError> {
        self.add_gate_with_phase(name, qs, Phase::zero())
    }

    pub fn reverse(&mut self) {
        self.gates.make_contiguous().reverse();
    }

    pub fn adjoint(&mut self) {
        self.reverse();
        for g in &mut self.gates {
            g.adjoint();
        }
    }

    pub fn to_adjoint(&self) -> Circuit {
        let mut c = self.clone();
        c.adjoint();
        c
    }

    pub fn to_qasm(&self) -> String {
        String::from("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n") + &self.to_string()
    }

    /// Lower the circuit into a diagram
    ///
    /// Inputs sit on row 1 and outputs on the row after the last spider,
    /// both ordered by qubit. Only boundaries and Z and X spiders are
    /// created; Hadamards become Hadamard edges.
    pub fn to_graph<G: GraphLike>(&self) -> Result<G, CircuitError> {
        for g in &self.gates {
            g.validate(self.nqubits)?;
        }

        let mut graph = G::new();
        let mut inputs = Vec::with_capacity(self.nqubits);
        let mut outputs = Vec::with_capacity(self.nqubits);
        let mut qs = FxHashMap::default();

        // we start counting rows from 1, to allow coordinate
        // (0,0) to mean "no coordinate"
        for i in 0..self.nqubits {
            let inp = graph.add_vertex_at(VType::B, Phase::zero(), i as f64, 1.0);
            let outp = graph.add_vertex_at(VType::B, Phase::zero(), i as f64, 2.0);
            graph.add_edge(inp, outp)?;
            inputs.push(inp);
            outputs.push(outp);
            qs.insert(i, i);
        }

        graph.set_inputs(inputs);
        graph.set_outputs(outputs);

        for g in &self.gates {
            g.add_to_graph(&mut graph, &mut qs)?;
        }

        // undo the relabelling done by swaps, and line the outputs up
        let wires = graph.outputs().clone();
        let last_row = wires.iter().map(|&o| graph.row(o)).fold(2.0, f64::max);
        let outputs: Vec<V> = (0..self.nqubits).map(|q| wires[qs[&q]]).collect();
        for (q, &o) in outputs.iter().enumerate() {
            graph.set_row(o, last_row);
            graph.set_qubit(o, q as f64);
        }
        graph.set_outputs(outputs);

        Ok(graph)
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats::make(self)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qreg q[{}];", self.num_qubits())?;

        for g in &self.gates {
            writeln!(f, "{};", g.to_qasm())?;
        }

        Ok(())
    }
}

impl std::ops::Add<&Circuit> for Circuit {
    type Output = Circuit;
    fn add(mut self, rhs: &Circuit) -> Self::Output {
        assert_eq!(
            self.num_qubits(),
            rhs.num_qubits(),
            "Cannot append circuits with different numbers of qubits"
        );
        self.gates.extend(rhs.gates.iter().cloned());
        self
    }
}

/// A circuit can pretend to be a matrix, where row operations correspond
/// to appending CNOT gates.
///
/// For example, we can synthesise a CNOT circuit corresponding to the parity
/// matrix `m` as follows:
///
/// ```
/// use zxsynth::circuit::Circuit;
/// use zxsynth::linalg::*;
/// let mut c = Circuit::new(3); // c|b> = |id * b>
/// let mut m = Mat2::new(vec![vec![1,1,1], vec![0,1,1], vec![0,0,1]]);
/// m.gauss_x(true, 1, &mut c);  // c|b> = |m^-1 * b>
/// c.reverse();                 // c|b> = |m * b>
/// assert_eq!(m, Mat2::id(3));
/// ```
impl RowOps for Circuit {
    fn row_add(&mut self, r0: usize, r1: usize) {
        self.push_back(Gate::new(CNOT, vec![r1, r0]));
    }

    fn row_swap(&mut self, r0: usize, r1: usize) {
        self.push_back(Gate::new(SWAP, vec![r0, r1]));
    }
}
