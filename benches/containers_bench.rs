//! Benchmarks for the coral containers against their std counterparts

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use coral::{FlexVec, NodeId, OrdMap, Stack};

const PUSH_COUNT: usize = 10_000;
const MAP_COUNT: u64 = 10_000;

fn bench_vec_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("vec_push");

    group.bench_function("flexvec", |b| {
        b.iter(|| {
            let mut vec = FlexVec::new();
            for i in 0..PUSH_COUNT {
                vec.push(black_box(i)).unwrap();
            }
            vec
        })
    });

    group.bench_function("std_vec", |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for i in 0..PUSH_COUNT {
                vec.push(black_box(i));
            }
            vec
        })
    });

    group.finish();
}

fn bench_vec_insert_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("vec_insert_middle");
    let payload: Vec<u64> = (0..256).collect();

    group.bench_function("flexvec_insert_slice", |b| {
        b.iter(|| {
            let mut vec = FlexVec::from_slice(&payload).unwrap();
            vec.insert_slice(128, black_box(&payload)).unwrap();
            vec
        })
    });

    group.bench_function("std_vec_splice", |b| {
        b.iter(|| {
            let mut vec = payload.clone();
            vec.splice(128..128, black_box(&payload).iter().copied());
            vec
        })
    });

    group.finish();
}

fn bench_map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_random");
    let mut rng = StdRng::seed_from_u64(42);
    let keys: Vec<u64> = (0..MAP_COUNT).map(|_| rng.gen()).collect();

    group.bench_function("ordmap", |b| {
        b.iter(|| {
            let mut map = OrdMap::new();
            for &k in &keys {
                map.insert(black_box(k), k).unwrap();
            }
            map
        })
    });

    group.bench_function("btreemap", |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(black_box(k), k);
            }
            map
        })
    });

    group.finish();
}

fn bench_map_insert_sorted_hinted(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_sorted");

    group.bench_function("ordmap_hinted", |b| {
        b.iter(|| {
            let mut map = OrdMap::new();
            let mut hint: Option<NodeId> = None;
            for k in 0..MAP_COUNT {
                let id = match hint {
                    None => map.insert(k, k).unwrap().0,
                    Some(h) => map.insert_hint(h, k, k).unwrap(),
                };
                hint = Some(id);
            }
            map
        })
    });

    group.bench_function("ordmap_plain", |b| {
        b.iter(|| {
            let mut map = OrdMap::new();
            for k in 0..MAP_COUNT {
                map.insert(black_box(k), k).unwrap();
            }
            map
        })
    });

    group.finish();
}

fn bench_map_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_lookup");
    let mut rng = StdRng::seed_from_u64(7);
    let keys: Vec<u64> = (0..MAP_COUNT).map(|_| rng.gen_range(0..MAP_COUNT * 2)).collect();

    let ord: OrdMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
    let btree: BTreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
    let probes: Vec<u64> = (0..1_000).map(|_| rng.gen_range(0..MAP_COUNT * 2)).collect();

    group.bench_function("ordmap", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for p in &probes {
                if ord.contains_key(black_box(p)) {
                    hits += 1;
                }
            }
            hits
        })
    });

    group.bench_function("btreemap", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for p in &probes {
                if btree.contains_key(black_box(p)) {
                    hits += 1;
                }
            }
            hits
        })
    });

    group.finish();
}

fn bench_map_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_iterate");
    let ord: OrdMap<u64, u64> = (0..MAP_COUNT).map(|k| (k, k)).collect();
    let btree: BTreeMap<u64, u64> = (0..MAP_COUNT).map(|k| (k, k)).collect();

    group.bench_function("ordmap", |b| {
        b.iter(|| ord.values().sum::<u64>())
    });

    group.bench_function("btreemap", |b| {
        b.iter(|| btree.values().sum::<u64>())
    });

    group.finish();
}

fn bench_stack_churn(c: &mut Criterion) {
    c.bench_function("stack_churn", |b| {
        b.iter(|| {
            let mut stack = Stack::new();
            for round in 0..100u32 {
                for i in 0..100 {
                    stack.push(black_box(round * 100 + i)).unwrap();
                }
                for _ in 0..50 {
                    stack.pop();
                }
            }
            stack
        })
    });
}

criterion_group!(
    benches,
    bench_vec_push,
    bench_vec_insert_middle,
    bench_map_insert,
    bench_map_insert_sorted_hinted,
    bench_map_lookup,
    bench_map_iterate,
    bench_stack_churn
);
criterion_main!(benches);
