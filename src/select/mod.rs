//! Keyed selection of the blocks that carry payload bits.
//!
//! A ChaCha20 stream seeded from the key drives a forward partial
//! Fisher-Yates shuffle over `[0, total_blocks)`. Only the first `count`
//! slots are shuffled, so the result is uniform sampling without
//! replacement, and a shorter selection is always a prefix of a longer one
//! under the same key. Ranges are drawn as `u64` so 32-bit and 64-bit
//! targets consume the stream identically.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectError {
    #[error("payload needs {requested} blocks but only {available} are available")]
    Capacity { requested: usize, available: usize },
}

/// Select `count` distinct block indices from `[0, total_blocks)`.
///
/// Deterministic in `(total_blocks, count, key)`.
pub fn select(total_blocks: usize, count: usize, key: i64) -> Result<Vec<usize>, SelectError> {
    if count > total_blocks {
        return Err(SelectError::Capacity {
            requested: count,
            available: total_blocks,
        });
    }

    let mut rng = ChaCha20Rng::seed_from_u64(key as u64);
    let mut indices: Vec<usize> = (0..total_blocks).collect();
    let total = total_blocks as u64;
    for i in 0..count {
        let j = rng.gen_range(i as u64..total) as usize;
        indices.swap(i, j);
    }

    indices.truncate(count);
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn deterministic() {
        let a = select(1000, 64, 42).unwrap();
        let b = select(1000, 64, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_keys_differ() {
        let a = select(1000, 64, 42).unwrap();
        let b = select(1000, 64, 43).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn negative_key_is_a_valid_seed() {
        let a = select(500, 40, -7).unwrap();
        assert_eq!(a, select(500, 40, -7).unwrap());
        assert_ne!(a, select(500, 40, 7).unwrap());
    }

    #[test]
    fn distinct_and_in_range() {
        for &(total, count) in &[(64, 16), (64, 64), (1, 1), (4096, 300)] {
            let positions = select(total, count, 1234).unwrap();
            assert_eq!(positions.len(), count);
            let set: HashSet<_> = positions.iter().copied().collect();
            assert_eq!(set.len(), count);
            assert!(positions.iter().all(|&p| p < total));
        }
    }

    #[test]
    fn full_selection_is_a_permutation() {
        let mut positions = select(64, 64, 9).unwrap();
        positions.sort_unstable();
        assert_eq!(positions, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn capacity_error_when_count_exceeds_total() {
        assert_eq!(
            select(64, 65, 1),
            Err(SelectError::Capacity {
                requested: 65,
                available: 64
            })
        );
        assert!(select(0, 1, 1).is_err());
        assert_eq!(select(0, 0, 1).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn shorter_selection_is_prefix() {
        let short = select(2048, 56, 77).unwrap();
        let long = select(2048, 56 + 8 * 20, 77).unwrap();
        assert_eq!(&long[..short.len()], &short[..]);
    }

    #[test]
    fn roughly_uniform_first_pick() {
        // Every block should be chosen as the first position for some key
        let mut seen = HashSet::new();
        for key in 0..400 {
            seen.insert(select(16, 1, key).unwrap()[0]);
        }
        assert_eq!(seen.len(), 16);
    }
}
