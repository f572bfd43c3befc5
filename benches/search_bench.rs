// benches/search_bench.rs
use addrgram::{build_inverted_index, build_inverted_index_par, search, Field, Record};
use criterion::{criterion_group, criterion_main, Criterion};

const PREFS: [&str; 4] = ["東京都", "京都府", "大阪府", "北海道"];
const TOWNS: [&str; 5] = ["渋谷", "神宮前", "東塩小路町", "梅田", "大通西"];

fn synthetic(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            Record::new(format!("{i:07}"))
                .with(Field::Prefecture, PREFS[i % PREFS.len()])
                .with(Field::Town, TOWNS[i % TOWNS.len()])
                .with(Field::Block, format!("{}丁目{}番", i % 9 + 1, i % 40))
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let records = synthetic(20_000);
    c.bench_function("build_20k", |b| b.iter(|| build_inverted_index(&records)));
    c.bench_function("build_20k_par", |b| b.iter(|| build_inverted_index_par(&records)));
}

fn bench_search(c: &mut Criterion) {
    let records = synthetic(20_000);
    let idx = build_inverted_index(&records);
    c.bench_function("search_kyoto", |b| b.iter(|| search("京都", &idx, &records).len()));
    c.bench_function("search_block", |b| b.iter(|| search("3丁目12番", &idx, &records).len()));
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
