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

//! Errors raised when an operation finds the diagram in a state its
//! invariants rule out.

use thiserror::Error;

use crate::graph::{VType, V};

/// A violated diagram invariant.
///
/// None of these are expected during normal simplification or extraction.
/// Seeing one means either the caller passed a malformed diagram or an
/// edit script disagreed with the diagram it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {0} not found")]
    VertexNotFound(V),

    #[error("no edge between {0} and {1}")]
    EdgeNotFound(V, V),

    /// The edge is recorded at one endpoint only.
    #[error("edge {0} -- {1} is only recorded on one endpoint")]
    AsymmetricEdge(V, V),

    #[error("vertices {0} and {1} are already connected")]
    ParallelEdge(V, V),

    #[error("vertex {0} has type {1:?}, expected a Z spider")]
    WrongVertexType(V, VType),

    #[error("self-loop on vertex {0} of type {1:?} is not supported")]
    UnsupportedSelfLoop(V, VType),

    #[error("boundary vertex {0} already has an edge to {1}")]
    BoundaryParallelEdge(V, V),

    #[error("boundary vertex {0} has {1} neighbours, expected 1")]
    BoundaryDegree(V, usize),

    /// A rewrite predicted the id of a vertex it creates, and the diagram
    /// handed out a different one.
    #[error("expected fresh vertex {expected}, got {found}")]
    UnexpectedVertexId { expected: V, found: V },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// A gate list that cannot be lowered into a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("unknown gate '{0}'")]
    UnknownGate(String),

    #[error("gate {name} acts on {expected} qubit(s), got {found}")]
    WrongArity {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("qubit {0} is out of range for a {1}-qubit circuit")]
    QubitOutOfRange(usize, usize),

    #[error("gate {0} acts on the same qubit twice")]
    RepeatedQubit(&'static str),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
