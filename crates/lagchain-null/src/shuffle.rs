use std::ops::Range;

use rand::seq::{index, SliceRandom};
use rand::Rng;

use lagchain_core::config::BlockScheme;
use lagchain_core::errors::AlignError;
use lagchain_events::is_set;

/// Position ranges of the shuffle blocks of one unit, in order.
///
/// `Positional` cuts consecutive runs of `block_size` positions (the last
/// block may be shorter). `TimeAligned` groups consecutive positions whose
/// `t.div_euclid(block_size)` agree, so a gap in the time index can split
/// or shrink a block but never merges two.
pub fn block_ranges(
    times: &[i64],
    block_size: usize,
    scheme: BlockScheme,
) -> Result<Vec<Range<usize>>, AlignError> {
    if block_size == 0 {
        return Err(AlignError::InvalidBlockSize);
    }
    let n = times.len();
    let ranges = match scheme {
        BlockScheme::Positional => (0..n)
            .step_by(block_size)
            .map(|start| start..(start + block_size).min(n))
            .collect(),
        BlockScheme::TimeAligned => {
            let size = i64::try_from(block_size).map_err(|_| AlignError::InvalidBlockSize)?;
            let mut ranges = Vec::new();
            let mut start = 0;
            for i in 1..=n {
                if i == n || times[i].div_euclid(size) != times[start].div_euclid(size) {
                    ranges.push(start..i);
                    start = i;
                }
            }
            ranges
        }
    };
    Ok(ranges)
}

/// Surrogate flag series: within every block the number of set flags is
/// kept and the set positions are drawn uniformly without replacement.
/// Output is 0/1; non-finite input flags count as unset.
pub fn block_shuffle<R: Rng + ?Sized>(
    flags: &[f64],
    times: &[i64],
    block_size: usize,
    scheme: BlockScheme,
    rng: &mut R,
) -> Result<Vec<f64>, AlignError> {
    if flags.len() != times.len() {
        return Err(AlignError::LengthMismatch {
            left: flags.len(),
            right: times.len(),
        });
    }
    let mut out = vec![0.0; flags.len()];
    for block in block_ranges(times, block_size, scheme)? {
        let m = flags[block.clone()].iter().filter(|f| is_set(**f)).count();
        if m == 0 {
            continue;
        }
        for offset in index::sample(rng, block.len(), m).into_iter() {
            out[block.start + offset] = 1.0;
        }
    }
    Ok(out)
}

/// Permutes values inside consecutive blocks of `block_size` positions.
/// The multiset of every block is unchanged.
pub fn permute_within_blocks<R: Rng + ?Sized>(
    values: &[f64],
    block_size: usize,
    rng: &mut R,
) -> Result<Vec<f64>, AlignError> {
    if block_size == 0 {
        return Err(AlignError::InvalidBlockSize);
    }
    let mut out = values.to_vec();
    for chunk in out.chunks_mut(block_size) {
        chunk.shuffle(rng);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn positional_blocks_cover_every_position() {
        let times: Vec<i64> = (0..7).collect();
        let ranges = block_ranges(&times, 3, BlockScheme::Positional).unwrap();
        assert_eq!(ranges, vec![0..3, 3..6, 6..7]);
    }

    #[test]
    fn time_aligned_blocks_follow_the_clock() {
        let ranges = block_ranges(&[-1, 0, 1, 2, 5, 6], 3, BlockScheme::TimeAligned).unwrap();
        assert_eq!(ranges, vec![0..1, 1..4, 4..5, 5..6]);
    }

    #[test]
    fn zero_block_size_is_rejected() {
        assert!(matches!(
            block_ranges(&[0, 1], 0, BlockScheme::Positional),
            Err(AlignError::InvalidBlockSize)
        ));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(permute_within_blocks(&[1.0], 0, &mut rng).is_err());
    }

    #[test]
    fn full_block_stays_full() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = block_shuffle(&[1.0, 1.0, f64::NAN], &[0, 1, 2], 2, BlockScheme::Positional, &mut rng).unwrap();
        assert_eq!(out, vec![1.0, 1.0, 0.0]);
    }
}
