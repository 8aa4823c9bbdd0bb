//! Property tests for block shuffles.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use lagchain_core::config::BlockScheme;
use lagchain_null::{block_ranges, block_shuffle, permute_within_blocks};

fn scheme() -> impl Strategy<Value = BlockScheme> {
    prop_oneof![Just(BlockScheme::Positional), Just(BlockScheme::TimeAligned)]
}

fn count(flags: &[f64]) -> usize {
    flags.iter().filter(|f| **f != 0.0).count()
}

proptest! {
    #[test]
    fn shuffle_keeps_every_block_count(
        flags in prop::collection::vec(prop_oneof![Just(0.0f64), Just(1.0f64)], 0..80),
        gaps in prop::collection::vec(1i64..4, 80),
        block_size in 1usize..20,
        scheme in scheme(),
        seed in any::<u64>(),
    ) {
        let mut t = -7i64;
        let times: Vec<i64> = gaps[..flags.len()].iter().map(|g| { t += g; t }).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let out = block_shuffle(&flags, &times, block_size, scheme, &mut rng).unwrap();

        prop_assert_eq!(out.len(), flags.len());
        for block in block_ranges(&times, block_size, scheme).unwrap() {
            prop_assert_eq!(count(&out[block.clone()]), count(&flags[block]));
        }
        prop_assert!(out.iter().all(|v| *v == 0.0 || *v == 1.0));
    }

    #[test]
    fn permutation_keeps_every_block_multiset(
        values in prop::collection::vec(-50.0f64..50.0, 0..60),
        block_size in 1usize..15,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = permute_within_blocks(&values, block_size, &mut rng).unwrap();
        for (a, b) in values.chunks(block_size).zip(out.chunks(block_size)) {
            let mut a = a.to_vec();
            let mut b = b.to_vec();
            a.sort_by(f64::total_cmp);
            b.sort_by(f64::total_cmp);
            prop_assert_eq!(a, b);
        }
    }
}
