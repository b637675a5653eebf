use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rc_kvstore::KvStore;
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

fn bench_set_insert(c: &mut Criterion) {
    c.bench_function("kv_store_set_insert_1k", |b| {
        b.iter_batched(
            KvStore::new,
            |kvs| {
                for (i, x) in lcg(1).take(1_000).enumerate() {
                    kvs.set(key(x), format!("v{i}")).unwrap();
                }
                black_box(kvs)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_set_update(c: &mut Criterion) {
    c.bench_function("kv_store_set_update", |b| {
        let kvs = KvStore::new();
        let keys: Vec<_> = lcg(3).take(1_000).map(key).collect();
        for k in &keys {
            kvs.set(k, "initial").unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            kvs.set(k, "updated").unwrap();
            black_box(k);
        })
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("kv_store_get_hit", |b| {
        let kvs = KvStore::new();
        let keys: Vec<_> = lcg(7).take(1_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            kvs.set(k, format!("v{i}")).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(kvs.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("kv_store_get_miss", |b| {
        let kvs = KvStore::new();
        for (i, x) in lcg(11).take(1_000).enumerate() {
            kvs.set(key(x), format!("v{i}")).unwrap();
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in the store
            let k = key(miss.next().unwrap());
            black_box(kvs.get(&k).unwrap());
        })
    });
}

fn bench_dup_discard(c: &mut Criterion) {
    c.bench_function("kv_store_dup_discard", |b| {
        let kvs = KvStore::new();
        kvs.set("key", "value").unwrap();
        b.iter(|| {
            let h = kvs.dup().unwrap();
            black_box(&h);
            h.discard().unwrap();
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_set_insert, bench_set_update, bench_get_hit, bench_get_miss, bench_dup_discard
}
criterion_main!(benches);
