//! Construction parameters.

use crate::error::Error;
use crate::level::DEFAULT_MAX_LEVEL;
use crate::level::DEFAULT_PROBABILITY;
use crate::level::MAX_LEVEL;
use crate::level::MIN_LEVEL;

/// Parameters for building a skip list.
///
/// ```
/// use skiplist::Config;
/// use skiplist::SkipMap;
///
/// let config = Config::default().max_level(8).probability(0.5).seed(7);
/// let map: SkipMap<u64, &str> = SkipMap::with_config(config).unwrap();
/// assert_eq!(map.max_level(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Number of levels in the header; bounds every node's height.
    pub max_level: usize,
    /// Chance that a node reaching level `i` also reaches level `i + 1`.
    pub probability: f64,
    /// Seed for level assignment. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Config {
    pub fn max_level(mut self, max_level: usize) -> Config {
        self.max_level = max_level;
        return self;
    }

    pub fn probability(mut self, probability: f64) -> Config {
        self.probability = probability;
        return self;
    }

    /// Fix the seed so the sequence of node heights is reproducible.
    pub fn seed(mut self, seed: u64) -> Config {
        self.seed = Some(seed);
        return self;
    }

    /// Check both bounds; nothing is clamped.
    pub fn validate(&self) -> Result<(), Error> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.max_level) {
            return Err(Error::InvalidMaxLevel(self.max_level));
        }
        validate_probability(self.probability)?;
        return Ok(());
    }
}

impl Default for Config {
    fn default() -> Self {
        return Config {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        };
    }
}

pub(crate) fn validate_probability(probability: f64) -> Result<(), Error> {
    // NaN fails the range check too.
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::InvalidProbability(probability));
    }
    return Ok(());
}
