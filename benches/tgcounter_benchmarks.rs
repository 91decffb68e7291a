use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tgcounter::prelude::*;

fn bench_tgcounter_increment(c: &mut Criterion) {
    c.bench_function("TGCounter::increment x1000", |b| {
        b.iter(|| {
            let mut counter = TGCounter::new();
            for i in 0..1000 {
                counter.increment("bench", format!("t{i}"), 10).unwrap();
            }
            black_box(counter.value())
        })
    });
}

fn bench_tgcounter_compact(c: &mut Criterion) {
    let mut counter = TGCounter::new();
    for i in 0..1000 {
        counter.increment("bench", format!("t{i}"), 10).unwrap();
    }

    c.bench_function("TGCounter::compact 1000 transactions", |b| {
        b.iter(|| {
            let mut compacted = counter.clone();
            compacted.compact("bench");
            black_box(compacted.value())
        })
    });
}

fn replicas(n: usize, txns: usize) -> Vec<(String, TGCounter)> {
    (0..n)
        .map(|i| {
            let actor = format!("node-{i}");
            let mut c = TGCounter::new();
            for t in 0..txns {
                c.increment(actor.as_str(), format!("{actor}-t{t}"), 1).unwrap();
            }
            (actor, c)
        })
        .collect()
}

fn bench_tgcounter_merge(c: &mut Criterion) {
    let counters = replicas(10, 50);

    c.bench_function("TGCounter::merge 10 replicas", |b| {
        b.iter(|| {
            let mut merged = counters[0].1.clone();
            for (_, other) in &counters[1..] {
                merged.merge(other);
            }
            black_box(merged.value())
        })
    });

    let mut shuffled = replicas(100, 10);
    shuffled.shuffle(&mut StdRng::seed_from_u64(42));
    let (local, first) = shuffled[0].clone();

    c.bench_function("TGCounter::merge_as 100 replicas shuffled", |b| {
        b.iter(|| {
            let mut merged = first.clone();
            for (_, other) in &shuffled[1..] {
                merged.merge_as(Some(local.as_str()), other);
            }
            black_box(merged.value())
        })
    });
}

fn bench_tgcounter_delta(c: &mut Criterion) {
    let counters = replicas(50, 20);
    let mut full = TGCounter::new();
    for (_, other) in &counters {
        full.merge(other);
    }
    let partial = counters[0].1.clone();

    c.bench_function("TGCounter::delta+apply 50 actors", |b| {
        b.iter(|| {
            let mut receiver = partial.clone();
            let delta = full.delta(&receiver);
            receiver.apply_delta(&delta);
            black_box(receiver.value())
        })
    });
}

fn bench_ledger(c: &mut Criterion) {
    c.bench_function("Ledger::credit+debit x500 history 50", |b| {
        b.iter(|| {
            let mut ledger = Ledger::new(LedgerConfig::new("bench").with_history_length(50));
            for i in 0..500 {
                ledger.credit(format!("c{i}"), 2).unwrap();
                ledger.debit(format!("d{i}"), 1).unwrap();
            }
            black_box(ledger.value())
        })
    });
}

fn bench_snapshot_json(c: &mut Criterion) {
    let mut counter = TGCounter::new();
    for (_, other) in &replicas(20, 20) {
        counter.merge(other);
    }
    let json = counter.to_json().unwrap();

    c.bench_function("TGCounter::to_json 20x20", |b| {
        b.iter(|| black_box(counter.to_json().unwrap()))
    });
    c.bench_function("TGCounter::from_json 20x20", |b| {
        b.iter(|| black_box(TGCounter::from_json(&json).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_tgcounter_increment,
    bench_tgcounter_compact,
    bench_tgcounter_merge,
    bench_tgcounter_delta,
    bench_ledger,
    bench_snapshot_json,
);
criterion_main!(benches);
