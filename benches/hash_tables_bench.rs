use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use graph_hash::{FastHashMap, FastHashSet, HashCommonMap};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

// 10k query keys drawn from `keys` with a second LCG.
fn sample(keys: &[String], count: usize) -> Vec<String> {
    let n = keys.len();
    let mut s = 0x9e3779b97f4a7c15u64;
    (0..count)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            keys[(s as usize) % n].clone()
        })
        .collect()
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    let mut g = c.benchmark_group("insert_fresh_100k");
    g.bench_function("common", |b| {
        b.iter_batched(
            HashCommonMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.put(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.bench_function("fast", |b| {
        b.iter_batched(
            FastHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.put(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.bench_function("hashbrown", |b| {
        b.iter_batched(
            hashbrown::HashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.finish();
}

fn bench_remove_random_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(5).take(110_000).map(key).collect();
    let victims = sample(&keys, 10_000);
    let mut g = c.benchmark_group("remove_random_10k_of_110k");
    g.bench_function("common", |b| {
        b.iter_batched(
            || keys.iter().cloned().zip(0u64..).collect::<HashCommonMap<_, _>>(),
            |mut m| {
                for k in &victims {
                    m.remove_unchecked(k);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.bench_function("fast", |b| {
        b.iter_batched(
            || keys.iter().cloned().zip(0u64..).collect::<FastHashMap<_, _>>(),
            |mut m| {
                for k in &victims {
                    m.remove_unchecked(k);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    g.finish();
}

fn bench_get_hit_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(7).take(100_000).map(key).collect();
    let queries = sample(&keys, 10_000);
    let common: HashCommonMap<String, u64> = keys.iter().cloned().zip(0u64..).collect();
    let fast: FastHashMap<String, u64> = keys.iter().cloned().zip(0u64..).collect();
    let mut g = c.benchmark_group("get_hit_10k_on_100k");
    g.bench_function("common", |b| {
        b.iter(|| {
            for k in &queries {
                black_box(common.get(k));
            }
        })
    });
    g.bench_function("fast", |b| {
        b.iter(|| {
            for k in &queries {
                black_box(fast.get(k));
            }
        })
    });
    g.finish();
}

fn bench_get_miss_10k(c: &mut Criterion) {
    let common: HashCommonMap<String, u64> = lcg(11).take(100_000).map(key).zip(0u64..).collect();
    let fast: FastHashMap<String, u64> = lcg(11).take(100_000).map(key).zip(0u64..).collect();
    let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
    let mut g = c.benchmark_group("get_miss_10k_on_100k");
    g.bench_function("common", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(common.get(k));
            }
        })
    });
    g.bench_function("fast", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(fast.get(k));
            }
        })
    });
    g.finish();
}

fn bench_index_access(c: &mut Criterion) {
    c.bench_function("fast::get_key_at_10k", |b| {
        let mut s: FastHashSet<String> = FastHashSet::new();
        let indices: Vec<usize> = lcg(123)
            .take(100_000)
            .map(|x| s.add_and_get_index(key(x)).0)
            .collect();
        let n = indices.len();
        let mut r = 0x9e3779b97f4a7c15u64;
        let targets: Vec<usize> = (0..10_000)
            .map(|_| {
                r = r.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                indices[(r as usize) % n]
            })
            .collect();
        b.iter(|| {
            for &i in &targets {
                black_box(s.get_key_at(i));
            }
        })
    });
}

fn bench_iter_100k(c: &mut Criterion) {
    let common: HashCommonMap<String, u64> = lcg(999).take(100_000).map(key).zip(0u64..).collect();
    let fast: FastHashMap<String, u64> = lcg(999).take(100_000).map(key).zip(0u64..).collect();
    let mut g = c.benchmark_group("iter_all_100k");
    g.bench_function("common", |b| {
        b.iter(|| black_box(common.values().fold(0u64, |a, v| a.wrapping_add(*v))))
    });
    g.bench_function("fast", |b| {
        b.iter(|| black_box(fast.values().fold(0u64, |a, v| a.wrapping_add(*v))))
    });
    g.finish();
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_get_hit_10k,
              bench_get_miss_10k,
              bench_index_access,
              bench_iter_100k
}
criterion_main!(benches_insert, benches_ops);
