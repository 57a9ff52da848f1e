use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use chaindict::{Dictionary, StringKey};
use std::collections::HashMap;

// Benchmarking module for Dictionary.
// Most benchmarks run against several bucket counts, since the count is fixed for the lifetime
// of a dictionary and chain length grows with N / buckets.
// To run benchmarks, use the following command:
// cargo bench --bench benchmarks

const N: u32 = 10_000;

const BUCKETS: [u32; 4] = [31, 257, 2_053, 16_411];

fn filled(buckets: u32) -> Dictionary<u32, u32> {
    let mut dict = Dictionary::with_buckets(buckets);
    for i in 0..N {
        dict.set(i, i);
    }
    dict
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dictionary, N=1e4, set");
    for buckets in BUCKETS {
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &buckets, |b, &buckets| {
            b.iter(|| {
                let mut dict = Dictionary::with_buckets(buckets);
                for i in 0..N {
                    black_box(dict.set(i, i));
                }
                dict
            })
        });
    }
    group.finish();
}

fn bench_set_hashmap(c: &mut Criterion) {
    c.bench_function("HashMap, N=1e4, insert", |b| {
        b.iter(|| {
            let mut map = HashMap::new();
            for i in 0..N {
                black_box(map.insert(i, i));
            }
            map
        })
    });
}

fn bench_replace(c: &mut Criterion) {
    let mut dict = filled(2_053);
    c.bench_function("Dictionary, N=1e4, replace", |b| {
        b.iter(|| {
            for i in 0..N {
                black_box(dict.set(i, i + 1));
            }
        })
    });
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dictionary, N=1e4, get hit");
    for buckets in BUCKETS {
        let dict = filled(buckets);
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &dict, |b, dict| {
            b.iter(|| {
                black_box(dict.get(&5_000));
            })
        });
    }
    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dictionary, N=1e4, get miss");
    for buckets in BUCKETS {
        let dict = filled(buckets);
        group.bench_with_input(BenchmarkId::from_parameter(buckets), &dict, |b, dict| {
            b.iter(|| {
                black_box(dict.get(&(N + 7)));
            })
        });
    }
    group.finish();
}

fn bench_get_hashmap(c: &mut Criterion) {
    let mut map = HashMap::new();
    for i in 0..N {
        map.insert(i, i);
    }
    c.bench_function("HashMap, N=1e4, get", |b| {
        b.iter(|| {
            black_box(map.get(&5_000));
        })
    });
}

fn bench_get_string_key(c: &mut Criterion) {
    let mut dict = Dictionary::with_buckets(2_053);
    for i in 0..N {
        dict.set(StringKey::from(format!("key-{i}")), i);
    }
    let probe = StringKey::from("key-5000");
    c.bench_function("Dictionary, N=1e4, get StringKey", |b| {
        b.iter(|| {
            black_box(dict.get(&probe));
        })
    });
}

fn bench_delete_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dictionary, N=1e4, delete + set");
    for buckets in BUCKETS {
        let mut dict = filled(buckets);
        group.bench_function(BenchmarkId::from_parameter(buckets), |b| {
            b.iter(|| {
                let value = dict.delete(&5_000);
                black_box(dict.set(5_000, value.unwrap_or(0)));
            })
        });
    }
    group.finish();
}

fn bench_remove_insert_hashmap(c: &mut Criterion) {
    let mut map = HashMap::new();
    for i in 0..N {
        map.insert(i, i);
    }
    c.bench_function("HashMap, N=1e4, remove + insert", |b| {
        b.iter(|| {
            let value = map.remove(&5_000);
            black_box(map.insert(5_000, value.unwrap_or(0)));
        })
    });
}

fn bench_each(c: &mut Criterion) {
    let dict = filled(2_053);
    c.bench_function("Dictionary, N=1e4, each", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            let _: Result<(), ()> = dict.each(|_, value| {
                sum += *value as u64;
                Ok(())
            });
            black_box(sum)
        })
    });
}

fn bench_keys(c: &mut Criterion) {
    let dict = filled(2_053);
    c.bench_function("Dictionary, N=1e4, keys", |b| {
        b.iter(|| {
            black_box(dict.keys().len());
        })
    });
}

criterion_group!(
    benches_set_get,
    bench_set,
    bench_set_hashmap,
    bench_replace,
    bench_get,
    bench_get_miss,
    bench_get_hashmap,
    bench_get_string_key,
);

criterion_group!(benches_delete, bench_delete_set, bench_remove_insert_hashmap);

criterion_group!(benches_iteration, bench_each, bench_keys);

criterion_main!(benches_set_get, benches_delete, benches_iteration);
