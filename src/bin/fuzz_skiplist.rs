//! AFL fuzz harness for the skip list.
//!
//! Replays a byte stream as a sequence of operations against both a
//! `SkipMap` and a `BTreeMap`, and checks after every step that the two
//! agree. The map's own invariant checks run in debug builds via
//! `debug_assert`s on the unlink path.

use std::collections::BTreeMap;

use afl::fuzz;
use skiplist::Config;
use skiplist::SkipMap;

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Set { key: u8, value: u8 },
    Get { key: u8 },
    Remove { key: u8 },
    /// Change the level probability to `n / 255`.
    Probability { n: u8 },
    Clear,
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        if bytes.is_empty() {
            return None;
        }

        let op_type = bytes[0] % 5;
        let rest = &bytes[1..];

        match op_type {
            0 if rest.len() >= 2 => Some((FuzzOp::Set { key: rest[0], value: rest[1] }, &rest[2..])),
            1 if !rest.is_empty() => Some((FuzzOp::Get { key: rest[0] }, &rest[1..])),
            2 if !rest.is_empty() => Some((FuzzOp::Remove { key: rest[0] }, &rest[1..])),
            3 if !rest.is_empty() => Some((FuzzOp::Probability { n: rest[0] }, &rest[1..])),
            4 => Some((FuzzOp::Clear, rest)),
            _ => None,
        }
    }
}

fn main() {
    fuzz!(|data: &[u8]| {
        // Small max level so tall nodes and full-height splices are common.
        let config = Config::default().max_level(6).seed(0);
        let mut map: SkipMap<u8, u8> = SkipMap::with_config(config).unwrap();
        let mut model: BTreeMap<u8, u8> = BTreeMap::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            match op {
                FuzzOp::Set { key, value } => {
                    let node = map.set(key, value);
                    assert_eq!((node.key(), *node.value()), (key, value));
                    model.insert(key, value);
                }
                FuzzOp::Get { key } => {
                    assert_eq!(map.get(&key).map(|n| *n.value()), model.get(&key).copied());
                }
                FuzzOp::Remove { key } => {
                    assert_eq!(map.remove(&key), model.remove_entry(&key));
                }
                FuzzOp::Probability { n } => {
                    map.set_probability(n as f64 / 255.0).unwrap();
                }
                FuzzOp::Clear => {
                    map.clear();
                    model.clear();
                }
            }

            assert_eq!(map.len(), model.len());
        }

        let entries: Vec<(u8, u8)> = map.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(u8, u8)> = model.into_iter().collect();
        assert_eq!(entries, expected);
    });
}
