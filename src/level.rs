//! Random level assignment.
//!
//! A new node's height follows a geometric law truncated at the list's
//! maximum level: height `h` is drawn with probability proportional to
//! `p^(h-1) * (1-p)`. Rather than flip a coin per level, one uniform sample
//! `r` in `[0, 1)` is compared against a precomputed table where
//! `table[i] = p^i`, and the height is one plus the number of leading table
//! entries (after the first) that `r` falls below.
//!
//! ```text
//! table:  1.0    p      p^2    p^3   ...
//!          |     |      |      |
//! r = 0.2  h>=1  h>=2   h>=3   stop        -> height 3 (for p = 1/e)
//! ```

use rand::Rng;
use rand::SeedableRng;
use rand::distributions::Standard;
use rand::rngs::StdRng;
use rand_core::OsRng;
use rand_core::RngCore;

/// Smallest permitted maximum level.
pub const MIN_LEVEL: usize = 1;

/// Largest permitted maximum level.
pub const MAX_LEVEL: usize = 64;

/// Default maximum level. With `p = 1/e` this comfortably covers
/// `e^16` (about 8.9 million) entries.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Default level probability, `1/e`.
pub const DEFAULT_PROBABILITY: f64 = 1.0 / std::f64::consts::E;

/// Draws node heights for one skip list.
#[derive(Debug, Clone)]
pub(crate) struct LevelGenerator {
    rng: StdRng,
    probability: f64,
    /// `table[i] = probability^i`, one entry per level.
    table: Vec<f64>,
}

impl LevelGenerator {
    /// The caller has already validated `max_level` and `probability`.
    pub(crate) fn new(max_level: usize, probability: f64, seed: Option<u64>) -> LevelGenerator {
        let seed = match seed {
            Some(seed) => seed,
            None => OsRng.next_u64(),
        };
        return LevelGenerator {
            rng: StdRng::seed_from_u64(seed),
            probability,
            table: probability_table(probability, max_level),
        };
    }

    pub(crate) fn probability(&self) -> f64 {
        return self.probability;
    }

    pub(crate) fn max_level(&self) -> usize {
        return self.table.len();
    }

    /// Replace the probability and rebuild the table against the current
    /// maximum level.
    pub(crate) fn set_probability(&mut self, probability: f64) {
        self.probability = probability;
        self.table = probability_table(probability, self.table.len());
    }

    /// Draw a height in `1..=max_level`.
    pub(crate) fn random_level(&mut self) -> usize {
        let r: f64 = self.rng.sample(Standard);
        let max_level = self.table.len();

        let mut level = 1;
        while level < max_level && r < self.table[level] {
            level += 1;
        }
        return level;
    }
}

/// `table[i] = probability^i` for `i` in `0..max_level`.
fn probability_table(probability: f64, max_level: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(max_level);
    let mut current = 1.0;
    for _ in 0..max_level {
        table.push(current);
        current *= probability;
    }
    return table;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_holds_powers() {
        let table = probability_table(0.5, 5);
        assert_eq!(table, vec![1.0, 0.5, 0.25, 0.125, 0.0625]);
    }

    #[test]
    fn table_for_zero_probability() {
        let table = probability_table(0.0, 4);
        assert_eq!(table, vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn heights_stay_in_range() {
        let mut levels = LevelGenerator::new(4, 0.9, Some(1));
        for _ in 0..10_000 {
            let height = levels.random_level();
            assert!((1..=4).contains(&height), "height {} out of range", height);
        }
    }

    #[test]
    fn single_level_list_always_draws_one() {
        let mut levels = LevelGenerator::new(1, 1.0, Some(2));
        for _ in 0..1000 {
            assert_eq!(levels.random_level(), 1);
        }
    }

    #[test]
    fn extreme_probabilities() {
        let mut never = LevelGenerator::new(16, 0.0, Some(3));
        let mut always = LevelGenerator::new(16, 1.0, Some(3));
        for _ in 0..1000 {
            assert_eq!(never.random_level(), 1);
            assert_eq!(always.random_level(), 16);
        }
    }

    #[test]
    fn same_seed_same_heights() {
        let mut a = LevelGenerator::new(16, DEFAULT_PROBABILITY, Some(42));
        let mut b = LevelGenerator::new(16, DEFAULT_PROBABILITY, Some(42));
        for _ in 0..1000 {
            assert_eq!(a.random_level(), b.random_level());
        }
    }

    #[test]
    fn set_probability_rebuilds_table() {
        let mut levels = LevelGenerator::new(3, 0.5, Some(4));
        levels.set_probability(0.25);
        assert_eq!(levels.probability(), 0.25);
        assert_eq!(levels.table, vec![1.0, 0.25, 0.0625]);
        assert_eq!(levels.max_level(), 3);
    }

    /// Observed height frequencies should track `p^(h-1) * (1-p)`.
    #[test]
    fn heights_follow_geometric_law() {
        const TRIALS: usize = 200_000;
        let max_level = 16;

        for &p in &[DEFAULT_PROBABILITY, 0.5, 0.25] {
            let mut levels = LevelGenerator::new(max_level, p, Some(0x5eed));
            let mut counts = vec![0usize; max_level + 1];
            for _ in 0..TRIALS {
                counts[levels.random_level()] += 1;
            }

            for h in 1..=5 {
                let expected = p.powi(h as i32 - 1) * (1.0 - p);
                let observed = counts[h] as f64 / TRIALS as f64;
                assert!(
                    (observed - expected).abs() < 0.01,
                    "p={} height {}: observed {:.4}, expected {:.4}",
                    p, h, observed, expected
                );
            }

            // Chi-square over heights 1..=4 plus a tail bucket, 4 degrees of
            // freedom. 30.0 is far beyond the 99.9th percentile (18.47).
            let mut chi_square = 0.0;
            let mut tail_expected = 1.0;
            let mut tail_observed = TRIALS;
            for h in 1..=4 {
                let expected = p.powi(h as i32 - 1) * (1.0 - p);
                tail_expected -= expected;
                tail_observed -= counts[h];
                let e = expected * TRIALS as f64;
                chi_square += (counts[h] as f64 - e).powi(2) / e;
            }
            let e = tail_expected * TRIALS as f64;
            chi_square += (tail_observed as f64 - e).powi(2) / e;
            assert!(chi_square < 30.0, "p={} chi-square {:.2}", p, chi_square);
        }
    }
}
