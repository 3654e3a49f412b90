//! Benchmarks for the skip list against std's BTreeMap.

use std::collections::BTreeMap;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;

use skiplist::Config;
use skiplist::SkipList;
use skiplist::SkipMap;

/// Deterministic scrambled keys.
fn keys(n: usize) -> Vec<u64> {
    let mut state = 0x9e3779b97f4a7c15u64;
    return (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        })
        .collect();
}

fn filled(keys: &[u64]) -> SkipMap<u64, u64> {
    let mut map = SkipMap::with_config(Config::default().seed(1)).unwrap();
    for &k in keys {
        map.set(k, k);
    }
    return map;
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[1_000usize, 10_000, 100_000] {
        let keys = keys(n);
        group.bench_with_input(BenchmarkId::new("skipmap", n), &keys, |b, keys| {
            b.iter(|| black_box(filled(keys)));
        });
        group.bench_with_input(BenchmarkId::new("btreemap", n), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in keys {
                    map.insert(k, k);
                }
                black_box(map)
            });
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for &n in &[1_000usize, 100_000] {
        let keys = keys(n);
        let map = filled(&keys);
        group.bench_with_input(BenchmarkId::new("skipmap", n), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(map.get(k).map(|node| *node.value()));
                }
            });
        });

        let list = SkipList::from_map(filled(&keys));
        group.bench_with_input(BenchmarkId::new("skiplist_locked", n), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(list.get_cloned(k));
                }
            });
        });
    }
    group.finish();
}

fn bench_probability(c: &mut Criterion) {
    let mut group = c.benchmark_group("probability");
    let keys = keys(50_000);
    for &p in &[0.25f64, 0.5, 1.0 / std::f64::consts::E] {
        let mut map = SkipMap::with_config(Config::default().probability(p).seed(2)).unwrap();
        for &k in &keys {
            map.set(k, k);
        }
        group.bench_with_input(BenchmarkId::new("get", format!("{:.3}", p)), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(map.contains_key(k));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_get, bench_probability);
criterion_main!(benches);
