//! Property tests for structural configs and ablation membership.

use proptest::prelude::*;

use lagchain_core::structural::{AblationSpec, Edge, StructuralConfig};

const NODES: [&str; 5] = ["A", "B", "C", "D", "E"];

fn forward_edges() -> impl Strategy<Value = Vec<(usize, usize, f64)>> {
    prop::collection::vec((0usize..4, 1usize..5, -2.0f64..2.0), 0..12)
        .prop_map(|raw| raw.into_iter().filter(|(p, c, _)| p < c).collect())
}

proptest! {
    #[test]
    fn forward_edges_always_validate(edges in forward_edges()) {
        let mut builder = StructuralConfig::five_node().uniform_baseline(0.0);
        for (p, c, k) in &edges {
            builder = builder.edge(NODES[*p], NODES[*c], *k);
        }
        let config = builder.build().unwrap();
        for (edge, _) in config.edges() {
            prop_assert!(config.node_index(&edge.parent) < config.node_index(&edge.child));
        }
    }

    #[test]
    fn backward_edge_never_validates(edges in forward_edges(), back in (1usize..5, 0usize..4)) {
        prop_assume!(back.0 > back.1);
        let mut builder = StructuralConfig::five_node().uniform_baseline(0.0);
        for (p, c, k) in &edges {
            builder = builder.edge(NODES[*p], NODES[*c], *k);
        }
        builder = builder.edge(NODES[back.0], NODES[back.1], 0.5);
        prop_assert!(builder.build().is_err());
    }

    #[test]
    fn inbound_removal_covers_exactly_the_childs_edges(edges in forward_edges(), target in 1usize..5) {
        let mut builder = StructuralConfig::five_node().uniform_baseline(0.0);
        for (p, c, k) in &edges {
            builder = builder.edge(NODES[*p], NODES[*c], *k);
        }
        let config = builder.build().unwrap();
        let spec = AblationSpec::remove_inbound(NODES[target]);
        prop_assert!(spec.validate_against(&config).is_ok());
        for (edge, _) in config.edges() {
            prop_assert_eq!(spec.is_ablated(edge), edge.child == NODES[target]);
        }
    }

    #[test]
    fn edge_display_parses_back(p in 0usize..5, c in 0usize..5) {
        let edge = Edge::new(NODES[p], NODES[c]);
        prop_assert_eq!(edge.to_string().parse::<Edge>().unwrap(), edge);
    }
}
