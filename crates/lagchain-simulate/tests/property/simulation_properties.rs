//! Property tests for the structural recursion.

use proptest::prelude::*;

use lagchain_core::series::UnitSeries;
use lagchain_core::structural::{AblationSpec, Edge, StructuralConfig};
use lagchain_core::traits::ObservedDriver;
use lagchain_simulate::ChainSimulator;

const NODES: [&str; 5] = ["A", "B", "C", "D", "E"];

fn driver_unit(a: Vec<f64>) -> UnitSeries {
    test_fixtures::unit_with_driver("p", 0, a)
}

fn config_with(baselines: &[f64], edges: &[(usize, usize, f64)]) -> StructuralConfig {
    let mut builder = StructuralConfig::five_node();
    for (i, b) in baselines.iter().enumerate() {
        builder = builder.baseline(NODES[i + 1], *b);
    }
    for (p, c, k) in edges {
        builder = builder.edge(NODES[*p], NODES[*c], *k);
    }
    builder.build().unwrap()
}

fn forward_edges() -> impl Strategy<Value = Vec<(usize, usize, f64)>> {
    prop::collection::vec((0usize..4, 1usize..5, -1.0f64..1.0), 1..10)
        .prop_map(|raw| raw.into_iter().filter(|(p, c, _)| p < c).collect())
}

proptest! {
    #[test]
    fn zero_coefficients_stay_at_baseline(
        baselines in prop::collection::vec(-5.0f64..5.0, 4),
        edges in forward_edges(),
        a in prop::collection::vec(-10.0f64..10.0, 3..30),
    ) {
        let zeroed: Vec<_> = edges.iter().map(|(p, c, _)| (*p, *c, 0.0)).collect();
        let config = config_with(&baselines, &zeroed);
        let sim = ChainSimulator::new(&config).unwrap();
        let series = driver_unit(a.clone());
        let end = a.len() as i64 - 1;
        let traj = sim
            .simulate(&series, &[0.0; 5], 1..=end, &ObservedDriver::new("A"), &AblationSpec::full())
            .unwrap();
        for state in &traj.states {
            for (i, b) in baselines.iter().enumerate() {
                prop_assert_eq!(state[i + 1], *b);
            }
        }
    }

    #[test]
    fn ablated_driver_edges_make_downstream_driver_independent(
        baselines in prop::collection::vec(-1.0f64..1.0, 4),
        edges in forward_edges(),
        a in prop::collection::vec(-3.0f64..3.0, 3..20),
        bump in -5.0f64..5.0,
        at in 0usize..20,
    ) {
        let config = config_with(&baselines, &edges);
        let from_driver: Vec<Edge> = config
            .edges()
            .filter(|(e, _)| e.parent == "A")
            .map(|(e, _)| e.clone())
            .collect();
        let spec = AblationSpec::custom("NoA", from_driver);
        let sim = ChainSimulator::new(&config).unwrap();

        let mut perturbed = a.clone();
        let idx = at % a.len();
        perturbed[idx] += bump;

        let end = a.len() as i64 - 1;
        let run = |values: Vec<f64>| {
            sim.simulate(&driver_unit(values), &[0.0; 5], 1..=end, &ObservedDriver::new("A"), &spec)
                .unwrap()
        };
        let (x, y) = (run(a), run(perturbed));
        for (sx, sy) in x.states.iter().zip(&y.states) {
            prop_assert_eq!(&sx[1..], &sy[1..]);
        }
    }

    #[test]
    fn ablated_edge_cuts_parent_influence(
        initial_b in -5.0f64..5.0,
        kappa in -1.0f64..1.0,
    ) {
        // C's only parent is B; removing B->C must hide any change in B.
        let config = config_with(&[0.0, 0.1, 0.0, 0.0], &[(1, 2, kappa), (2, 3, 0.5), (0, 1, 0.3)]);
        let sim = ChainSimulator::new(&config).unwrap();
        let series = driver_unit(vec![0.5; 10]);
        let spec = AblationSpec::remove_edge(Edge::new("B", "C"));
        let run = |b: f64| {
            sim.simulate(&series, &[0.0, b, 0.0, 0.0, 0.0], 1..=9, &ObservedDriver::new("A"), &spec)
                .unwrap()
        };
        let (x, y) = (run(0.0), run(initial_b));
        prop_assert_eq!(x.column(2), y.column(2));
        prop_assert_eq!(x.column(3), y.column(3));
    }
}
