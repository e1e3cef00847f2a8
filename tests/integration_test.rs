//! Integration tests for the document store

use approx::assert_relative_eq;
use semantic_docstore::{
    DocumentFile, DocumentStore, ErrorKind, Result, StoreConfig, StoreError, Vector,
};
use std::sync::Arc;
use std::thread;

/// Projects text onto two concept axes (animals, finance) by keyword.
fn topic_embedder(text: &str) -> Result<Vector> {
    const ANIMALS: [&str; 5] = ["cat", "feline", "mammal", "biology", "dog"];
    const FINANCE: [&str; 4] = ["stock", "market", "rose", "price"];

    let lower = text.to_lowercase();
    let score = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count() as f32;
    Ok(Vector::new(vec![score(&ANIMALS), score(&FINANCE), 0.1]))
}

#[test]
fn test_basic_workflow() {
    let store = DocumentStore::with_hash_embedder(StoreConfig::default());
    assert_eq!(store.count().unwrap(), 0);

    let report = store
        .add_documents(&[
            DocumentFile::new("a.txt", "the quick brown fox"),
            DocumentFile::new("b.txt", "lazy dogs sleep all day"),
        ])
        .unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(report.ids.len(), 2);

    store
        .add_documents(&[DocumentFile::new("c.json", r#"{"note": "fox tracks"}"#)])
        .unwrap();
    assert_eq!(store.count().unwrap(), 3);

    let hit = store.query("the quick brown fox").unwrap();
    assert_eq!(hit.filename, "a.txt");

    store.delete_all().unwrap();
    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(
        store.query("fox").unwrap_err().kind(),
        ErrorKind::EmptyCollection
    );
}

#[test]
fn test_feline_query_finds_cats() {
    let store = DocumentStore::new(topic_embedder, StoreConfig::default());
    store
        .add_documents(&[
            DocumentFile::new("stocks.txt", "stocks rose today"),
            DocumentFile::new("cats.txt", "cats are mammals"),
        ])
        .unwrap();

    let hits = store.query_top("feline biology", 2).unwrap();
    assert_eq!(hits[0].filename, "cats.txt");
    assert_eq!(hits[0].body, "cats are mammals");
    assert!(hits[0].distance < hits[1].distance);
}

#[test]
fn test_json_round_trip_is_canonical() {
    let expected = "{\n  \"a\": 1,\n  \"b\": [\n    2,\n    3\n  ]\n}";

    for source in [r#"{"a": 1, "b": [2,3]}"#, r#"{ "b":[2, 3],"a":1 }"#] {
        let store = DocumentStore::with_hash_embedder(StoreConfig::default());
        store
            .add_documents(&[DocumentFile::new("doc.JSON", source)])
            .unwrap();

        let hit = store.query(expected).unwrap();
        assert_eq!(hit.body, expected);
        assert_relative_eq!(hit.distance, 0.0, epsilon = 1e-5);
    }
}

#[test]
fn test_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("notes.txt");
    let json = dir.path().join("data.json");
    std::fs::write(&txt, "meeting notes about the roadmap").unwrap();
    std::fs::write(&json, r#"{"city": "A Coruña", "rain": true}"#).unwrap();

    let files = vec![
        DocumentFile::read(&txt).unwrap(),
        DocumentFile::read(&json).unwrap(),
    ];
    let store = DocumentStore::with_hash_embedder(StoreConfig::default());
    store.add_documents(&files).unwrap();

    let hit = store.query("city A Coruña rain true").unwrap();
    assert_eq!(hit.filename, "data.json");
    assert!(hit.body.contains("A Coruña"));
    assert!(hit.header().contains("data.json"));
}

#[test]
fn test_rejection_leaves_collection_unchanged() {
    let store = DocumentStore::with_hash_embedder(StoreConfig::default());
    store
        .add_documents(&[DocumentFile::new("keep.txt", "keep me")])
        .unwrap();
    let before = store.count().unwrap();

    let err = store
        .add_documents(&[
            DocumentFile::new("one.txt", "one"),
            DocumentFile::new("two.md", "two"),
            DocumentFile::new("three.json", "{}"),
        ])
        .unwrap_err();

    assert!(matches!(err, StoreError::UnsupportedFile { .. }));
    assert_eq!(store.count().unwrap(), before);
}

#[test]
fn test_concurrent_callers_serialize() {
    let store = Arc::new(DocumentStore::with_hash_embedder(StoreConfig::default()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for j in 0..5 {
                    store
                        .add_documents(&[DocumentFile::new(
                            format!("t{}-{}.txt", i, j),
                            format!("thread {} document {}", i, j),
                        )])
                        .unwrap();
                    let _ = store.query("document");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.count().unwrap(), 40);
}
