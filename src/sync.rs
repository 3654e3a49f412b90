//! A [`SkipMap`] behind one exclusive lock.
//!
//! Every operation, lookups included, takes the same `parking_lot::Mutex`,
//! so at most one operation touches the structure at a time and nobody ever
//! sees a half-relinked node. Lookups serialize with each other as well; a
//! shared/exclusive split would allow parallel reads but changes contention
//! behaviour, so it is not done here.
//!
//! Operations that hand back a node return a [`NodeGuard`], which keeps the
//! lock held until it is dropped. Walking with [`NodeGuard::next`] carries the
//! lock along, so a traversal from [`SkipList::front`] always observes one
//! consistent state. The lock is not reentrant: calling back into the same
//! list while holding a guard deadlocks.
//!
//! ```
//! use skiplist::SkipList;
//!
//! let list = SkipList::new();
//! list.set(5.0, "a");
//! list.set(1.0, "b");
//!
//! let mut keys = Vec::new();
//! let mut node = list.front();
//! while let Some(n) = node {
//!     keys.push(n.key());
//!     node = n.next();
//! }
//! assert_eq!(keys, vec![1.0, 5.0]);
//! ```

use std::fmt;
use std::ops::Deref;

use parking_lot::Mutex;
use parking_lot::MutexGuard;

use crate::config::Config;
use crate::error::Error;
use crate::key::Key;
use crate::map::Idx;
use crate::map::NodeRef;
use crate::map::SkipMap;

/// A skip list safe to share between threads.
pub struct SkipList<K, V> {
    map: Mutex<SkipMap<K, V>>,
}

impl<K: Key, V> SkipList<K, V> {
    /// Create an empty list with the default configuration.
    pub fn new() -> SkipList<K, V> {
        return SkipList::from_map(SkipMap::new());
    }

    /// Create an empty list with `max_level` levels, which must be in `1..=64`.
    pub fn with_max_level(max_level: usize) -> Result<SkipList<K, V>, Error> {
        return Ok(SkipList::from_map(SkipMap::with_max_level(max_level)?));
    }

    pub fn with_config(config: Config) -> Result<SkipList<K, V>, Error> {
        return Ok(SkipList::from_map(SkipMap::with_config(config)?));
    }

    /// Wrap an existing map.
    pub fn from_map(map: SkipMap<K, V>) -> SkipList<K, V> {
        return SkipList { map: Mutex::new(map) };
    }

    pub fn into_inner(self) -> SkipMap<K, V> {
        return self.map.into_inner();
    }

    /// Lock the list for a batch of operations.
    pub fn lock(&self) -> MutexGuard<'_, SkipMap<K, V>> {
        return self.map.lock();
    }

    pub fn len(&self) -> usize {
        return self.map.lock().len();
    }

    pub fn is_empty(&self) -> bool {
        return self.map.lock().is_empty();
    }

    pub fn max_level(&self) -> usize {
        return self.map.lock().max_level();
    }

    pub fn probability(&self) -> f64 {
        return self.map.lock().probability();
    }

    /// See [`SkipMap::set_probability`].
    pub fn set_probability(&self, probability: f64) -> Result<(), Error> {
        return self.map.lock().set_probability(probability);
    }

    /// Insert `key` or overwrite its value. The returned guard holds the lock.
    pub fn set(&self, key: K, value: V) -> NodeGuard<'_, K, V> {
        let mut guard = self.map.lock();
        let idx = guard.upsert(key, value);
        return NodeGuard { guard, idx };
    }

    /// Look up `key`. A hit holds the lock until the guard is dropped.
    pub fn get(&self, key: &K) -> Option<NodeGuard<'_, K, V>> {
        let guard = self.map.lock();
        let idx = guard.find(key)?;
        return Some(NodeGuard { guard, idx });
    }

    /// Look up `key` and release the lock before returning.
    pub fn get_cloned(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        return self.map.lock().get(key).map(|node| node.value().clone());
    }

    pub fn contains_key(&self, key: &K) -> bool {
        return self.map.lock().contains_key(key);
    }

    /// Remove `key`, returning the entry it held.
    pub fn remove(&self, key: &K) -> Option<(K, V)> {
        return self.map.lock().remove(key);
    }

    /// First node in key order, with the lock held.
    pub fn front(&self) -> Option<NodeGuard<'_, K, V>> {
        let guard = self.map.lock();
        let idx = guard.first()?;
        return Some(NodeGuard { guard, idx });
    }

    pub fn clear(&self) {
        self.map.lock().clear();
    }
}

impl<K: Key, V> Default for SkipList<K, V> {
    fn default() -> Self {
        return SkipList::new();
    }
}

impl<K: Key, V: fmt::Debug> fmt::Debug for SkipList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return fmt::Debug::fmt(&*self.map.lock(), f);
    }
}

/// A node of a [`SkipList`], with the list's lock held.
pub struct NodeGuard<'a, K, V> {
    guard: MutexGuard<'a, SkipMap<K, V>>,
    idx: Idx,
}

impl<'a, K: Key, V> NodeGuard<'a, K, V> {
    fn node(&self) -> NodeRef<'_, K, V> {
        return self.guard.node_ref(self.idx);
    }

    pub fn key(&self) -> K {
        return self.node().key();
    }

    pub fn value(&self) -> &V {
        return self.node().value();
    }

    /// Number of levels this node is linked on.
    pub fn height(&self) -> usize {
        return self.node().height();
    }

    /// Move to the next node in key order, keeping the lock. Returns `None`
    /// (and unlocks) at the end.
    pub fn next(self) -> Option<NodeGuard<'a, K, V>> {
        let idx = self.guard.successor(self.idx)?;
        return Some(NodeGuard { guard: self.guard, idx });
    }
}

impl<K: Key, V> Deref for NodeGuard<'_, K, V> {
    type Target = V;

    fn deref(&self) -> &V {
        return self.value();
    }
}

impl<K: Key, V: fmt::Debug> fmt::Debug for NodeGuard<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return fmt::Debug::fmt(&self.node(), f);
    }
}
