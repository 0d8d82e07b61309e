#[cfg(test)]
mod test {
    use num::Zero;
    use rstest::{fixture, rstest};
    use zxsynth::cancel::Outcome;
    use zxsynth::circuit::Circuit;
    use zxsynth::extract::{ExtractError, Extractor, ToCircuit};
    use zxsynth::gate::*;
    use zxsynth::graph::*;
    use zxsynth::phase::Phase;
    use zxsynth::simplify::*;
    use zxsynth::vec_graph::Graph;

    /// One input and one output per qubit, with the inputs first
    #[fixture]
    fn boundaries(#[default(1)] qubits: usize) -> (Graph, Vec<V>, Vec<V>) {
        let mut g = Graph::new();
        let is: Vec<_> = (0..qubits)
            .map(|q| g.add_vertex_at(VType::B, Phase::zero(), q as f64, 0.0))
            .collect();
        let os: Vec<_> = (0..qubits)
            .map(|q| g.add_vertex_at(VType::B, Phase::zero(), q as f64, 4.0))
            .collect();
        g.set_inputs(is.clone());
        g.set_outputs(os.clone());
        (g, is, os)
    }

    fn random_circuit(seed: u64, qubits: usize, depth: usize) -> Circuit {
        Circuit::random()
            .seed(seed)
            .qubits(qubits)
            .depth(depth)
            .clifford_t(0.2)
            .build()
    }

    #[rstest]
    fn cz_round_trip(#[with(2)] boundaries: (Graph, Vec<V>, Vec<V>)) {
        let (mut g, is, os) = boundaries;
        let z0 = g.add_vertex_at(VType::Z, Phase::zero(), 0.0, 2.0);
        let z1 = g.add_vertex_at(VType::Z, Phase::zero(), 1.0, 2.0);
        for (q, z) in [z0, z1].into_iter().enumerate() {
            g.add_edge(is[q], z).unwrap();
            g.add_edge(z, os[q]).unwrap();
        }
        g.add_edge_with_type(z0, z1, EType::H).unwrap();
        assert!(g.is_graph_like());

        let c = g.to_circuit().unwrap();
        let stats = c.stats();
        assert_eq!(stats.twoq, 1);
        assert_eq!(stats.oneq, 0);
        assert_eq!(c.gates[0].t, CZ);
    }

    #[rstest]
    fn gadget_becomes_a_rotation(boundaries: (Graph, Vec<V>, Vec<V>)) {
        let (mut g, is, os) = boundaries;
        let v = g.add_vertex_at(VType::Z, Phase::zero(), 0.0, 2.0);
        let hub = g.add_vertex_at(VType::Z, Phase::zero(), -1.0, 2.0);
        let leaf = g.add_vertex_at(VType::Z, (1, 4), -2.0, 2.0);
        g.add_edge(is[0], v).unwrap();
        g.add_edge(v, os[0]).unwrap();
        g.add_edge_with_type(v, hub, EType::H).unwrap();
        g.add_edge_with_type(hub, leaf, EType::H).unwrap();
        assert_eq!(g.num_gadgets(), 1);

        let c = Extractor::new(&mut g).extract().unwrap();
        let Outcome::Done(c) = c else {
            panic!("extraction was cancelled");
        };
        assert_eq!(c.num_gates(), 1);
        assert_eq!(c.gates[0], Gate::new_with_phase(ZPhase, vec![0], (1, 4)));

        // only the boundaries are left, joined by a plain wire
        assert_eq!(g.num_vertices(), 2);
        assert!(g.is_identity());
    }

    #[rstest]
    fn hbox_is_not_extracted(boundaries: (Graph, Vec<V>, Vec<V>)) {
        let (mut g, is, os) = boundaries;
        let z1 = g.add_vertex_at(VType::Z, (1, 4), 0.0, 1.0);
        let h = g.add_vertex_at(VType::H, (1, 2), 0.0, 2.0);
        let z2 = g.add_vertex_at(VType::Z, (1, 4), 0.0, 3.0);
        let z3 = g.add_vertex_at(VType::Z, Phase::zero(), 1.0, 2.0);
        g.add_edge(is[0], z1).unwrap();
        g.add_edge(z1, h).unwrap();
        g.add_edge(h, z2).unwrap();
        g.add_edge(z2, os[0]).unwrap();
        g.add_edge(h, z3).unwrap();

        match g.to_circuit() {
            Err(ExtractError::NotExtractable {
                reason,
                circuit,
                graph,
            }) => {
                assert!(!reason.is_empty());
                // the phase on the frontier came out before the H-box blocked
                assert_eq!(circuit.num_gates(), 1);
                assert!(graph.vertices().any(|v| graph.vertex_type(v) == VType::H));
            }
            Ok(c) => panic!("extracted a circuit through an H-box:\n{c}"),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[rstest]
    fn full_reduce_converges(#[values(10, 11, 12)] seed: u64) {
        let c = random_circuit(seed, 4, 50);
        let mut g: Graph = c.to_graph().unwrap();
        assert!(full_reduce(&mut g).unwrap() > 0);
        assert_eq!(full_reduce(&mut g).unwrap(), 0);
        assert!(g.is_graph_like());
        assert_eq!(g.check_invariants(), Ok(()));
    }

    #[rstest]
    #[case(20, 3, 30)]
    #[case(21, 4, 60)]
    #[case(22, 5, 80)]
    #[case(23, 6, 100)]
    fn simplify_and_extract(#[case] seed: u64, #[case] qubits: usize, #[case] depth: usize) {
        let c = random_circuit(seed, qubits, depth);
        let mut g: Graph = c.to_graph().unwrap();
        full_reduce(&mut g).unwrap();
        let tcount = g.tcount();

        let c1 = g.to_circuit().unwrap();
        assert_eq!(c1.num_qubits(), qubits);
        assert!(c1.stats().non_cliff <= tcount);
        assert!(c1.stats().non_cliff <= c.stats().non_cliff);

        // the extracted circuit goes through the pipeline again
        let mut g1: Graph = c1.to_graph().unwrap();
        full_reduce(&mut g1).unwrap();
        let c2 = g1.to_circuit().unwrap();
        assert_eq!(c2.num_qubits(), qubits);
    }

    #[rstest]
    fn clifford_circuits_extract_to_cliffords(#[values(30, 31)] seed: u64) {
        let c = Circuit::random()
            .seed(seed)
            .qubits(5)
            .depth(80)
            .clifford_t(0.0)
            .build();
        let mut g: Graph = c.to_graph().unwrap();
        clifford_simp(&mut g).unwrap();
        assert_eq!(g.tcount(), 0);

        let c1 = g.to_circuit().unwrap();
        assert_eq!(c1.stats().non_cliff, 0);
    }
}
