//! Rolling operator fits and the configured operator.

use lagchain_core::errors::{ConfigValidationError, LagchainError, SchemaError, StabilityError};
use lagchain_core::structural::{AblationSpec, Edge};
use lagchain_stability::{structural_operator, StabilityAnalyzer};
use test_fixtures::{random_panel, skip_edge_config};

/// Noise-free chain driven by a deterministic irregular `A`.
fn chain_matrix(len: usize) -> (Vec<i64>, Vec<Vec<f64>>) {
    let mut rows = vec![vec![0.0; 5]];
    for t in 1..len {
        let p = &rows[t - 1];
        let a = ((t * 7919 % 211) as f64 / 211.0 - 0.5) * 2.0;
        let b = 0.6 * p[0];
        let c = 0.1 * p[0] + 0.5 * p[1];
        let d = 0.55 * p[2] - 0.2 * p[1];
        let e = 0.6 * p[3] + 0.15 * p[2];
        rows.push(vec![a, b, c, d, e]);
    }
    ((0..len as i64).collect(), rows)
}

#[test]
fn recovers_chain_coefficients() {
    let (times, matrix) = chain_matrix(100);
    let snapshots = StabilityAnalyzer::new(40, 10, 1e-10)
        .unwrap()
        .rolling_spectral_radius(&times, &matrix)
        .unwrap();
    assert_eq!(snapshots.len(), 7);

    let first = &snapshots[0];
    // mean of 0..40 is 19.5; ties round to even
    assert_eq!(first.t_mid, 20);
    assert_eq!(first.fitted_rows, 4);
    assert_eq!(first.degraded_rows, 0);
    assert_eq!(first.rho, 0.0);
    let k = &first.operator;
    assert!((k[1][0] - 0.6).abs() < 1e-4);
    assert!((k[2][1] - 0.5).abs() < 1e-4);
    assert!((k[2][0] - 0.1).abs() < 1e-4);
    assert!((k[3][2] - 0.55).abs() < 1e-4);
    assert!((k[4][3] - 0.6).abs() < 1e-4);
}

#[test]
fn non_finite_value_degrades_affected_rows_only() {
    let (times, mut matrix) = chain_matrix(60);
    matrix[5][3] = f64::NAN;
    let snapshots = StabilityAnalyzer::new(20, 20, 1e-6)
        .unwrap()
        .rolling_spectral_radius(&times, &matrix)
        .unwrap();

    let hit = &snapshots[0];
    assert_eq!(hit.fitted_rows, 2);
    assert_eq!(hit.degraded_rows, 2);
    assert!(hit.operator[3].iter().all(|v| *v == 0.0));
    assert!(hit.operator[4].iter().all(|v| *v == 0.0));
    assert_eq!(snapshots[1].degraded_rows, 0);
}

#[test]
fn short_windows_leave_zero_rows() {
    let (times, matrix) = chain_matrix(10);
    let snapshots = StabilityAnalyzer::new(3, 1, 1e-6)
        .unwrap()
        .rolling_spectral_radius(&times, &matrix)
        .unwrap();
    assert_eq!(snapshots.len(), 8);
    for s in &snapshots {
        assert_eq!(s.fitted_rows, 1);
        assert_eq!(s.degraded_rows, 3);
        assert_eq!(s.rho, 0.0);
    }
}

#[test]
fn fewer_rows_than_window_yield_nothing() {
    let (times, matrix) = chain_matrix(5);
    let analyzer = StabilityAnalyzer::new(6, 1, 0.0).unwrap();
    assert!(analyzer.rolling_spectral_radius(&times, &matrix).unwrap().is_empty());
}

#[test]
fn malformed_requests_are_errors() {
    assert!(matches!(
        StabilityAnalyzer::new(1, 1, 0.0),
        Err(StabilityError::WindowTooSmall { window: 1 })
    ));
    assert!(matches!(StabilityAnalyzer::new(4, 0, 0.0), Err(StabilityError::InvalidStep)));
    assert!(matches!(
        StabilityAnalyzer::new(4, 1, -1.0),
        Err(StabilityError::InvalidRidge { .. })
    ));

    let analyzer = StabilityAnalyzer::new(2, 1, 0.0).unwrap();
    let ragged = vec![vec![1.0, 2.0], vec![1.0]];
    assert!(matches!(
        analyzer.rolling_spectral_radius(&[0, 1], &ragged),
        Err(StabilityError::RaggedMatrix { row: 1, expected: 2, actual: 1 })
    ));
    assert!(matches!(
        analyzer.rolling_spectral_radius(&[0], &ragged),
        Err(StabilityError::TimeMismatch { times: 1, rows: 2 })
    ));
}

#[test]
fn unit_analysis_uses_config_order() {
    let config = skip_edge_config();
    let panel = random_panel(9, 1, 72, &config);
    let series = panel.units().next().unwrap();
    let table = StabilityAnalyzer::new(36, 6, 1e-6)
        .unwrap()
        .analyze_unit(series, config.nodes())
        .unwrap();
    assert_eq!(table.name, "stability_r0");
    assert_eq!(table.len(), 7);
    for s in table.iter() {
        assert_eq!(s.operator.len(), 5);
        assert_eq!(s.rho, 0.0);
        assert_eq!(s.fitted_rows, 4);
    }

    let err = StabilityAnalyzer::new(36, 6, 1e-6)
        .unwrap()
        .analyze_unit(series, &["A".to_string(), "Z".to_string()])
        .unwrap_err();
    assert!(matches!(err, LagchainError::Schema(SchemaError::MissingColumns { .. })));
}

#[test]
fn structural_operator_respects_ablation() {
    let config = skip_edge_config();
    let full = structural_operator(&config, &AblationSpec::full()).unwrap();
    assert_eq!(full.run_tag, "Full_main");
    assert_eq!(full.operator[4][0], 0.08);
    assert_eq!(full.operator[1][0], test_fixtures::KAPPA_AB);
    assert_eq!(full.rho, 0.0);

    let none_e = structural_operator(&config, &AblationSpec::remove_inbound("E")).unwrap();
    assert!(none_e.operator[4].iter().all(|v| *v == 0.0));
    assert_eq!(none_e.operator[3], full.operator[3]);

    let err = structural_operator(&config, &AblationSpec::remove_edge(Edge::new("E", "A"))).unwrap_err();
    assert!(matches!(err, ConfigValidationError::MissingKey { .. }));
}
