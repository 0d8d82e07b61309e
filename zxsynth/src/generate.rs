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

//! Seeded random circuits, for tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::circuit::*;
use crate::gate::*;

/// Draws `depth` gates, each from a weighted mix of gate kinds, on
/// uniformly chosen qubits.
pub struct RandomCircuitBuilder {
    rng: StdRng,
    qubits: usize,
    depth: usize,
    mix: Vec<(GType, f32)>,
}

impl Circuit {
    pub fn random() -> RandomCircuitBuilder {
        RandomCircuitBuilder {
            rng: StdRng::from_os_rng(),
            qubits: 0,
            depth: 0,
            mix: vec![],
        }
    }
}

impl RandomCircuitBuilder {
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn qubits(&mut self, qubits: usize) -> &mut Self {
        self.qubits = qubits;
        self
    }

    pub fn depth(&mut self, depth: usize) -> &mut Self {
        self.depth = depth;
        self
    }

    /// T gates with probability `p_t`, the rest split evenly between CNOT,
    /// HAD and S
    pub fn clifford_t(&mut self, p_t: f32) -> &mut Self {
        let p = (1.0 - p_t) / 3.0;
        self.mix = vec![(CNOT, p), (HAD, p), (S, p), (T, p_t)];
        self
    }

    /// CNOT, CZ, HAD, S and T with equal weight
    pub fn uniform(&mut self) -> &mut Self {
        self.mix = [CNOT, CZ, HAD, S, T].map(|t| (t, 1.0)).to_vec();
        self
    }

    fn draw_kind(&mut self) -> Option<GType> {
        let live: Vec<(GType, f32)> = self.mix.iter().copied().filter(|&(_, w)| w > 0.0).collect();
        let total: f32 = live.iter().map(|&(_, w)| w).sum();
        let mut p = self.rng.random::<f32>() * total;
        // rounding can leave a sliver past the last weight
        live.iter()
            .find(|&&(_, w)| {
                p -= w;
                p < 0.0
            })
            .or(live.last())
            .map(|&(t, _)| t)
    }

    /// Draw `depth` gates. A two-qubit draw on a one-qubit circuit is
    /// dropped, and nothing is drawn on an empty one.
    pub fn build(&mut self) -> Circuit {
        let mut c = Circuit::new(self.qubits);
        if self.qubits == 0 {
            return c;
        }

        for _ in 0..self.depth {
            let Some(t) = self.draw_kind() else { break };
            let q0 = self.rng.random_range(0..self.qubits);
            if t.num_qubits() == 1 {
                c.push(Gate::new(t, vec![q0]));
            } else if self.qubits > 1 {
                let q1 = (q0 + self.rng.random_range(1..self.qubits)) % self.qubits;
                c.push(Gate::new(t, vec![q0, q1]));
            }
        }

        c
    }
}
