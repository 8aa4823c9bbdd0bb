//! κ agreement between the ICU and macro chains.

use lagchain_core::errors::ConfigValidationError;
use lagchain_core::structural::{kappa_agreement, Edge, StructuralConfig};
use test_fixtures::{load_effects, pulse_config};

#[test]
fn main_chains_agree_in_sign_but_not_in_rank() {
    let icu = load_effects("icu");
    let housing = load_effects("macro");
    let edges = icu.main_chain();
    assert_eq!(edges.len(), 4);

    let agreement = kappa_agreement(&icu, &housing, &edges).unwrap();
    let rows: Vec<(String, f64, f64, bool)> = agreement
        .rows
        .iter()
        .map(|r| (r.edge.to_string(), r.left, r.right, r.sign_agree))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Edge::new("A", "B").to_string(), 0.41, 0.29, true),
            (Edge::new("B", "C").to_string(), 0.37, 0.44, true),
            (Edge::new("C", "D").to_string(), 0.52, 0.61, true),
            (Edge::new("D", "E").to_string(), 0.44, 0.35, true),
        ]
    );
    assert_eq!(agreement.sign_rate, 1.0);
    // ranks [2, 1, 4, 3] against [1, 3, 4, 2]
    assert!((agreement.spearman - 0.4).abs() < 1e-12);
}

#[test]
fn skip_edges_with_opposite_signs_lower_the_rate() {
    let edges = [Edge::new("A", "C"), Edge::new("A", "D"), Edge::new("B", "E")];
    let agreement = kappa_agreement(&load_effects("icu"), &load_effects("macro"), &edges).unwrap();

    let agree: Vec<bool> = agreement.rows.iter().map(|r| r.sign_agree).collect();
    assert_eq!(agree, [true, false, true]);
    assert!((agreement.sign_rate - 2.0 / 3.0).abs() < 1e-12);
    assert!((agreement.spearman - 0.5).abs() < 1e-12);
}

#[test]
fn both_zero_counts_as_agreement() {
    let zero = StructuralConfig::five_node()
        .uniform_baseline(0.0)
        .edge("A", "B", 0.0)
        .build()
        .unwrap();
    let agreement = kappa_agreement(&zero, &zero, &[Edge::new("A", "B")]).unwrap();
    assert!(agreement.rows[0].sign_agree);
    assert!(agreement.spearman.is_nan());
    assert!(kappa_agreement(&zero, &zero, &[]).unwrap().sign_rate.is_nan());
}

#[test]
fn edge_missing_from_either_side_is_named() {
    let err = kappa_agreement(&load_effects("icu"), &pulse_config(), &[Edge::new("A", "C")]).unwrap_err();
    match err {
        ConfigValidationError::MissingKey { key } => assert_eq!(key, "effects.C.kappa_A"),
        other => panic!("unexpected error: {other}"),
    }
}
