//! Property tests for alignment and bootstrap bands.

use std::collections::BTreeMap;

use proptest::prelude::*;

use lagchain_align::{bootstrap_band, AlignMode, LagAligner};
use lagchain_core::models::OnsetSet;
use lagchain_core::series::{Panel, UnitId, UnitSeries};
use lagchain_core::traits::CancellationToken;

proptest! {
    #[test]
    fn band_stays_within_sample_range(
        values in prop::collection::vec(-100.0f64..100.0, 1..40),
        seed in any::<u64>(),
    ) {
        let (lo, hi) = bootstrap_band(&values, 64, seed, &CancellationToken::new()).unwrap();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(lo <= hi);
        prop_assert!(lo >= min - 1e-9 && hi <= max + 1e-9);
    }

    #[test]
    fn rebased_increments_never_negative(
        y in prop::collection::vec(-10.0f64..10.0, 20..60),
        onsets in prop::collection::btree_set(1i64..20, 1..5),
    ) {
        let mut cols = BTreeMap::new();
        let len = y.len() as i64;
        cols.insert("Y".to_string(), y);
        let panel = Panel::from_units([UnitSeries::new("u", (0..len).collect(), cols).unwrap()]);
        let mut trig = OnsetSet::new("f");
        trig.insert(UnitId::from("u"), onsets.into_iter().collect());

        let curve = LagAligner::new(-3, 10)
            .unwrap()
            .align(&panel, "Y", &trig, AlignMode::CumulativeRebased, &CancellationToken::new())
            .unwrap();
        for p in curve.iter() {
            prop_assert!(p.n == 0 || p.mean >= 0.0);
        }
    }
}
