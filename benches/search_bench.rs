//! Benchmarks for top-1 document queries

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::seq::SliceRandom;
use semantic_docstore::{DocumentFile, DocumentStore, StoreConfig};

const WORDS: [&str; 12] = [
    "cats", "stocks", "river", "engine", "market", "forest", "protein", "harbor", "signal",
    "garden", "ledger", "planet",
];

fn create_random_documents(n: usize, words_per_doc: usize) -> Vec<DocumentFile> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|i| {
            let body: Vec<&str> = (0..words_per_doc)
                .filter_map(|_| WORDS.choose(&mut rng).copied())
                .collect();
            DocumentFile::new(format!("doc{}.txt", i), body.join(" "))
        })
        .collect()
}

fn benchmark_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    for size in [100, 1000, 10000].iter() {
        let store = DocumentStore::with_hash_embedder(StoreConfig::default());
        store
            .add_documents(&create_random_documents(*size, 20))
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| store.query(black_box("river market engine")).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_query);
criterion_main!(benches);
