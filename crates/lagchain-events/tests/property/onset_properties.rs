//! Property tests for rising-edge extraction.

use proptest::prelude::*;

use lagchain_events::{is_set, rising_edges};

proptest! {
    #[test]
    fn every_onset_starts_a_run(flags in prop::collection::vec(prop::bool::ANY, 0..200)) {
        let series: Vec<f64> = flags.iter().map(|b| if *b { 1.0 } else { 0.0 }).collect();
        let edges = rising_edges(&series);
        for &i in &edges {
            prop_assert!(i > 0);
            prop_assert!(is_set(series[i]));
            prop_assert!(!is_set(series[i - 1]));
        }
        let runs_after_start = (1..series.len())
            .filter(|&i| flags[i] && !flags[i - 1])
            .count();
        prop_assert_eq!(edges.len(), runs_after_start);
    }

    #[test]
    fn onsets_are_strictly_increasing(flags in prop::collection::vec(0u8..3, 0..200)) {
        let series: Vec<f64> = flags.iter().map(|f| *f as f64).collect();
        let edges = rising_edges(&series);
        prop_assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }
}
