//! # Semantic Docstore
//!
//! A transient, in-memory store for small text and JSON documents that
//! returns the most semantically relevant document for a free-text query.
//!
//! This library provides:
//! - Upload validation and JSON canonicalization
//! - A pluggable embedder contract with a built-in hashing embedder
//! - An exact nearest-neighbor collection with deterministic tie-breaking
//! - An HTTP API over a shared store
//!
//! ## Example
//!
//! ```rust
//! use semantic_docstore::{DocumentFile, DocumentStore, StoreConfig};
//!
//! let store = DocumentStore::with_hash_embedder(StoreConfig::default());
//!
//! store.add_documents(&[
//!     DocumentFile::new("cats.txt", "cats are mammals"),
//!     DocumentFile::new("stocks.json", r#"{"headline": "stocks rose today"}"#),
//! ]).unwrap();
//!
//! let hit = store.query("cats are mammals").unwrap();
//! assert_eq!(hit.filename, "cats.txt");
//! println!("{}\n{}", hit.header(), hit.body);
//! ```

pub mod collection;
pub mod config;
pub mod distance;
pub mod document;
pub mod embedding;
pub mod error;
pub mod flat_index;
pub mod index;
pub mod logging;
pub mod neighbor;
pub mod server;
pub mod store;
pub mod vector;

pub use collection::{Collection, Entry, EntryId, Metadata, NewEntry, SearchHit};
pub use config::StoreConfig;
pub use distance::DistanceMetric;
pub use document::{canonicalize, DocumentFile};
pub use embedding::{Embedder, HashEmbedder};
pub use error::{ErrorKind, Result, StoreError};
pub use flat_index::FlatIndex;
pub use index::Index;
pub use store::{AddReport, DeleteReport, DocumentStore, QueryHit};
pub use vector::Vector;
