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

//! Simplify and re-extract a random Clifford+T circuit.
//!
//! Usage: `simp_and_extract [QUBITS] [DEPTH] [SEED] [CONFIG.json]`
//!
//! Set `RUST_LOG=debug` to follow the individual rule rounds and
//! extraction steps.

use log::{info, warn};
use std::fs::File;
use std::time::Instant;
use zxsynth::circuit::*;
use zxsynth::config::Config;
use zxsynth::extract::*;
use zxsynth::graph::GraphLike;
use zxsynth::simplify::*;
use zxsynth::vec_graph::*;

fn arg<T: std::str::FromStr>(args: &[String], i: usize, default: T) -> Result<T, T::Err> {
    args.get(i).map_or(Ok(default), |s| s.parse())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let qubits: usize = arg(&args, 1, 10)?;
    let depth: usize = arg(&args, 2, 400)?;
    let seed: u64 = arg(&args, 3, 1337)?;
    let config = match args.get(4) {
        Some(path) => Config::from_reader(File::open(path)?)?,
        None => Config::default(),
    };

    let c = Circuit::random()
        .seed(seed)
        .qubits(qubits)
        .depth(depth)
        .clifford_t(0.1)
        .build();
    println!("stats before: {}", c.stats());
    let mut g: Graph = c.to_graph()?;

    println!("simplifying...");
    let time = Instant::now();
    let rounds = Simplifier::new(&mut g)
        .with_config(config.simplify)
        .full_reduce()?
        .into_inner();
    println!("Done in {:.2?}", time.elapsed());
    info!(
        "{rounds} rounds, {} vertices, {} edges, T-count {}",
        g.num_vertices(),
        g.num_edges(),
        g.tcount()
    );

    println!("extracting...");
    let time = Instant::now();
    let result = Extractor::new(&mut g).with_config(config.extract).extract();

    match result {
        Ok(c1) => {
            println!("Done in {:.2?}", time.elapsed());
            println!("extracted ok");
            println!("stats after: {}", c1.into_inner().stats());
        }
        Err(ExtractError::NotExtractable { reason, circuit, graph }) => {
            warn!("{} gates extracted before failing", circuit.num_gates());
            println!("extract failed: {reason}");
            println!("{}", graph.to_dot());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
