//! A probabilistic ordered map (skip list) keyed by numbers.
//!
//! [`SkipMap`] is the engine: upsert, lookup, removal and forward traversal
//! in expected `O(log n)`, with node heights drawn from a geometric law.
//! [`SkipList`] puts one behind a single exclusive lock for use from many
//! threads.
//!
//! # Quick Start
//!
//! ```
//! use skiplist::SkipMap;
//!
//! let mut map = SkipMap::new();
//! map.set(5.0, "a");
//! map.set(1.0, "b");
//! map.set(3.0, "c");
//!
//! let keys: Vec<f64> = map.iter().map(|(k, _)| k).collect();
//! assert_eq!(keys, vec![1.0, 3.0, 5.0]);
//!
//! assert_eq!(map.remove(&3.0), Some((3.0, "c")));
//! assert!(map.get(&3.0).is_none());
//! assert_eq!(map.len(), 2);
//! ```

mod config;
mod error;
pub mod key;
mod level;
mod map;
mod sync;

pub use config::Config;
pub use error::Error;
pub use key::Key;
pub use level::DEFAULT_MAX_LEVEL;
pub use level::DEFAULT_PROBABILITY;
pub use level::MAX_LEVEL;
pub use level::MIN_LEVEL;
pub use map::Iter;
pub use map::NodeRef;
pub use map::SkipMap;
pub use sync::NodeGuard;
pub use sync::SkipList;
