//! Property tests for the rolling operator.

use proptest::prelude::*;

use lagchain_stability::StabilityAnalyzer;

fn cell() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -5.0f64..5.0,
        1 => Just(f64::NAN),
        1 => Just(0.0),
    ]
}

proptest! {
    #[test]
    fn operator_is_strictly_lower_triangular(
        rows in prop::collection::vec(prop::collection::vec(cell(), 5), 2..60),
        window in 2usize..20,
        step in 1usize..5,
        ridge in prop_oneof![Just(0.0f64), 1e-8f64..1.0],
    ) {
        let times: Vec<i64> = (0..rows.len() as i64).collect();
        let snapshots = StabilityAnalyzer::new(window, step, ridge)
            .unwrap()
            .rolling_spectral_radius(&times, &rows)
            .unwrap();
        for s in &snapshots {
            prop_assert_eq!(s.fitted_rows + s.degraded_rows, 4);
            for (i, row) in s.operator.iter().enumerate() {
                prop_assert!(row[i..].iter().all(|v| *v == 0.0));
            }
            prop_assert_eq!(s.rho, 0.0);
        }
    }
}
