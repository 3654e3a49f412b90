//! Skip list engine.
//!
//! A classic skip list with one entry per node, ordered by a numeric [`Key`].
//! Nodes live in an arena and link to each other by index, so unlinking a
//! node is "rewrite the neighbours' indices, then free the slot".
//!
//! ```text
//! Level 2: HEAD ------------------> 3.0 -----------------------> NULL
//! Level 1: HEAD ------> 1.0 ------> 3.0 ------------> 7.5 -----> NULL
//! Level 0: HEAD ------> 1.0 ------> 3.0 ---> 5.0 ---> 7.5 -----> NULL
//! ```
//!
//! Every operation starts with the same descent: from the top level down,
//! walk right while the next key is strictly smaller than the target, then
//! drop a level without going back. The last node visited on each level is
//! that level's predecessor. After level 0, the predecessor's successor is
//! either the target or the first larger key.
//!
//! [`SkipMap`] itself does no locking; mutation needs `&mut self`. Use
//! [`SkipList`](crate::SkipList) to share one between threads.

use std::fmt;

use log::debug;
use log::trace;
use smallvec::SmallVec;

use crate::config::Config;
use crate::config::validate_probability;
use crate::error::Error;
use crate::key::Key;
use crate::level::LevelGenerator;

/// Node index type. u32 keeps forward links small.
pub(crate) type Idx = u32;

/// Null link: end of a level.
const NULL: Idx = Idx::MAX;

/// Stands in for the header node in predecessor slots.
const HEAD: Idx = Idx::MAX - 1;

/// Forward links stored inline before spilling to the heap. With the default
/// probability of 1/e, about 98% of nodes are at most this tall.
const INLINE_LEVELS: usize = 4;

/// A stored entry.
struct Node<K, V> {
    key: K,
    value: V,
    /// `forward[level]` is the next node at that level. The length is the
    /// node's height and never changes.
    forward: SmallVec<[Idx; INLINE_LEVELS]>,
}

/// A probabilistic ordered map from numeric keys to values.
pub struct SkipMap<K, V> {
    /// Arena of nodes. `None` marks a free slot.
    nodes: Vec<Option<Node<K, V>>>,
    /// Free slots available for reuse.
    free_list: Vec<Idx>,
    /// Header links, one per level.
    head: Vec<Idx>,
    /// Predecessor at each level from the latest search. Sized once and
    /// overwritten on every call.
    search_path: Vec<Idx>,
    /// Number of entries.
    len: usize,
    levels: LevelGenerator,
}

impl<K: Key, V> SkipMap<K, V> {
    /// Create an empty map with the default configuration.
    pub fn new() -> SkipMap<K, V> {
        return SkipMap::build(Config::default());
    }

    /// Create an empty map with `max_level` levels, which must be in `1..=64`.
    ///
    /// A good choice is about `ln(n)` for at most `n` entries.
    pub fn with_max_level(max_level: usize) -> Result<SkipMap<K, V>, Error> {
        return SkipMap::with_config(Config::default().max_level(max_level));
    }

    /// Create an empty map from a validated configuration.
    pub fn with_config(config: Config) -> Result<SkipMap<K, V>, Error> {
        config.validate()?;
        return Ok(SkipMap::build(config));
    }

    fn build(config: Config) -> SkipMap<K, V> {
        debug!(
            "new skip list: max_level={} probability={} seeded={}",
            config.max_level,
            config.probability,
            config.seed.is_some()
        );
        return SkipMap {
            nodes: Vec::new(),
            free_list: Vec::new(),
            head: vec![NULL; config.max_level],
            search_path: vec![HEAD; config.max_level],
            len: 0,
            levels: LevelGenerator::new(config.max_level, config.probability, config.seed),
        };
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Number of levels; no node is taller than this.
    pub fn max_level(&self) -> usize {
        return self.levels.max_level();
    }

    /// Current level probability.
    pub fn probability(&self) -> f64 {
        return self.levels.probability();
    }

    /// Change the level probability for nodes inserted from now on.
    ///
    /// Existing nodes keep their heights. Fails without changing anything if
    /// `probability` is NaN or outside `[0, 1]`.
    pub fn set_probability(&mut self, probability: f64) -> Result<(), Error> {
        validate_probability(probability)?;
        debug!("skip list probability {} -> {}", self.levels.probability(), probability);
        self.levels.set_probability(probability);
        return Ok(());
    }

    /// Insert `key`, or overwrite its value if it is already present.
    ///
    /// Returns the stored node. Overwriting keeps the node's height and
    /// leaves the length unchanged.
    pub fn set(&mut self, key: K, value: V) -> NodeRef<'_, K, V> {
        let idx = self.upsert(key, value);
        return self.node_ref(idx);
    }

    /// Look up the node holding `key`.
    pub fn get(&self, key: &K) -> Option<NodeRef<'_, K, V>> {
        let idx = self.find(key)?;
        return Some(self.node_ref(idx));
    }

    /// Mutable access to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find(key)?;
        return Some(&mut self.node_mut(idx).value);
    }

    pub fn contains_key(&self, key: &K) -> bool {
        return self.find(key).is_some();
    }

    /// Remove `key`, returning the entry it held.
    ///
    /// The node is unlinked from every level it sits on before its slot is
    /// freed. Absent keys leave the map untouched.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        self.find_predecessors(key);

        let target = self.next_at(self.search_path[0], 0);
        if target == NULL || !self.node(target).key.same(key) {
            return None;
        }

        let node = match self.nodes[target as usize].take() {
            Some(node) => node,
            None => unreachable!("dangling skip list link {}", target),
        };

        // Levels at and above the node's height never linked to it.
        for (level, &next) in node.forward.iter().enumerate() {
            let pred = self.search_path[level];
            debug_assert_eq!(self.next_at(pred, level), target);
            self.set_next(pred, level, next);
        }

        self.free_list.push(target);
        self.len -= 1;
        trace!("removed key {:?} (height {})", node.key, node.forward.len());

        #[cfg(test)]
        self.check_invariants();

        return Some((node.key, node.value));
    }

    /// First node in key order.
    pub fn front(&self) -> Option<NodeRef<'_, K, V>> {
        let idx = self.first()?;
        return Some(self.node_ref(idx));
    }

    /// Iterate over entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        return Iter {
            map: self,
            current: self.head[0],
            remaining: self.len,
        };
    }

    /// Drop every entry. Configuration and the level generator are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head.fill(NULL);
        self.len = 0;
    }

    // --- Crate-internal handle API, used by the locked wrapper ---

    /// Insert or overwrite, returning the node's index.
    pub(crate) fn upsert(&mut self, key: K, value: V) -> Idx {
        self.find_predecessors(&key);

        let existing = self.next_at(self.search_path[0], 0);
        if existing != NULL && self.node(existing).key.same(&key) {
            self.node_mut(existing).value = value;
            return existing;
        }

        let height = self.levels.random_level();
        let mut forward = SmallVec::with_capacity(height);
        for level in 0..height {
            forward.push(self.next_at(self.search_path[level], level));
        }

        trace!("inserting key {:?} at height {}", key, height);
        let idx = self.alloc(Node { key, value, forward });

        // Splice between each level's predecessor and its old successor.
        // Levels above `height` are left alone.
        for level in 0..height {
            let pred = self.search_path[level];
            self.set_next(pred, level, idx);
        }

        self.len += 1;

        #[cfg(test)]
        self.check_invariants();

        return idx;
    }

    /// Index of the node holding `key`. Same descent as
    /// [`find_predecessors`](Self::find_predecessors) without recording the
    /// path, so it works through `&self`.
    pub(crate) fn find(&self, key: &K) -> Option<Idx> {
        let mut prev = HEAD;
        let mut next = NULL;

        for level in (0..self.head.len()).rev() {
            next = self.next_at(prev, level);
            while next != NULL && self.node(next).key.precedes(key) {
                prev = next;
                next = self.node(next).forward[level];
            }
        }

        if next != NULL && self.node(next).key.same(key) {
            return Some(next);
        }
        return None;
    }

    pub(crate) fn first(&self) -> Option<Idx> {
        return link(self.head[0]);
    }

    /// Level-0 successor of a live node.
    pub(crate) fn successor(&self, idx: Idx) -> Option<Idx> {
        return link(self.node(idx).forward[0]);
    }

    pub(crate) fn node_ref(&self, idx: Idx) -> NodeRef<'_, K, V> {
        return NodeRef { map: self, idx };
    }

    // --- Search ---

    /// Record, for each level from the top down, the last node whose key is
    /// strictly less than `key`. Horizontal progress carries over from one
    /// level to the next.
    fn find_predecessors(&mut self, key: &K) {
        let mut prev = HEAD;

        for level in (0..self.head.len()).rev() {
            let mut next = self.next_at(prev, level);
            while next != NULL && self.node(next).key.precedes(key) {
                prev = next;
                next = self.node(next).forward[level];
            }
            self.search_path[level] = prev;
        }
    }

    // --- Arena helpers ---

    fn node(&self, idx: Idx) -> &Node<K, V> {
        match self.nodes.get(idx as usize) {
            Some(Some(node)) => return node,
            _ => panic!("dangling skip list link {}", idx),
        }
    }

    fn node_mut(&mut self, idx: Idx) -> &mut Node<K, V> {
        match self.nodes.get_mut(idx as usize) {
            Some(Some(node)) => return node,
            _ => panic!("dangling skip list link {}", idx),
        }
    }

    /// Successor of `idx` (or of the header) at `level`.
    fn next_at(&self, idx: Idx, level: usize) -> Idx {
        if idx == HEAD {
            return self.head[level];
        }
        return self.node(idx).forward[level];
    }

    fn set_next(&mut self, idx: Idx, level: usize, to: Idx) {
        if idx == HEAD {
            self.head[level] = to;
        } else {
            self.node_mut(idx).forward[level] = to;
        }
    }

    fn alloc(&mut self, node: Node<K, V>) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx as usize] = Some(node);
            return idx;
        }
        let idx = self.nodes.len();
        assert!(idx < HEAD as usize, "skip list arena exhausted");
        self.nodes.push(Some(node));
        return idx as Idx;
    }

    // --- Invariant checking ---

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let live = self.nodes.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(live, self.len, "live slots {} != len {}", live, self.len);
        assert_eq!(live + self.free_list.len(), self.nodes.len());

        for level in 0..self.head.len() {
            let mut count = 0usize;
            let mut prev_key: Option<K> = None;
            let mut idx = self.head[level];
            while idx != NULL {
                let node = self.node(idx);
                assert!(
                    level < node.forward.len(),
                    "node {:?} of height {} linked at level {}",
                    node.key, node.forward.len(), level
                );
                if let Some(prev) = prev_key {
                    assert!(
                        prev.precedes(&node.key),
                        "level {} out of order: {:?} then {:?}",
                        level, prev, node.key
                    );
                }
                prev_key = Some(node.key);
                count += 1;
                idx = node.forward[level];
            }

            // Every node at least this tall is reachable on this level.
            let tall = self
                .nodes
                .iter()
                .flatten()
                .filter(|node| node.forward.len() > level)
                .count();
            assert_eq!(count, tall, "level {} reaches {} of {} nodes", level, count, tall);
            if level == 0 {
                assert_eq!(count, self.len, "level 0 count {} != len {}", count, self.len);
            }
        }
    }
}

/// Convert a raw link into an index.
fn link(idx: Idx) -> Option<Idx> {
    if idx == NULL {
        return None;
    }
    return Some(idx);
}

impl<K: Key, V> Default for SkipMap<K, V> {
    fn default() -> Self {
        return SkipMap::new();
    }
}

impl<K: Key, V: fmt::Debug> fmt::Debug for SkipMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_map().entries(self.iter()).finish();
    }
}

impl<K: Key, V> Extend<(K, V)> for SkipMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.upsert(key, value);
        }
    }
}

impl<K: Key, V> FromIterator<(K, V)> for SkipMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SkipMap::new();
        map.extend(iter);
        return map;
    }
}

/// A borrowed view of one stored node.
pub struct NodeRef<'a, K, V> {
    map: &'a SkipMap<K, V>,
    idx: Idx,
}

impl<'a, K: Key, V> NodeRef<'a, K, V> {
    pub fn key(&self) -> K {
        return self.map.node(self.idx).key;
    }

    pub fn value(&self) -> &'a V {
        return &self.map.node(self.idx).value;
    }

    /// Number of levels this node is linked on.
    pub fn height(&self) -> usize {
        return self.map.node(self.idx).forward.len();
    }

    /// The next node in key order, or `None` at the end.
    pub fn next(&self) -> Option<NodeRef<'a, K, V>> {
        let idx = self.map.successor(self.idx)?;
        return Some(NodeRef { map: self.map, idx });
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        return *self;
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: Key, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("NodeRef")
            .field("key", &self.key())
            .field("value", self.value())
            .field("height", &self.height())
            .finish();
    }
}

/// Iterator over a map's entries in ascending key order.
pub struct Iter<'a, K, V> {
    map: &'a SkipMap<K, V>,
    current: Idx,
    remaining: usize,
}

impl<'a, K: Key, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NULL {
            return None;
        }
        let node = self.map.node(self.current);
        self.current = node.forward[0];
        self.remaining -= 1;
        return Some((node.key, &node.value));
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.remaining, Some(self.remaining));
    }
}

impl<K: Key, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K: Key, V> IntoIterator for &'a SkipMap<K, V> {
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter();
    }
}
