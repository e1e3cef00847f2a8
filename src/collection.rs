//! In-memory collection of embedded documents.
//!
//! A [`Collection`] owns the entries (id, document text, metadata) and a
//! pluggable search [`Index`] that holds their vectors. Entries are appended
//! in batches and only ever removed all at once.

use crate::config::StoreConfig;
use crate::distance::DistanceMetric;
use crate::embedding::Embedder;
use crate::error::{Result, StoreError};
use crate::flat_index::FlatIndex;
use crate::index::Index;
use crate::vector::Vector;
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, warn};

/// Unique entry identifier. Never reused within a process.
///
/// Rendered as `<collection tag>-<sequence>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    instance: u64,
    seq: u64,
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}-{:08}", self.instance, self.seq)
    }
}

impl Serialize for EntryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Metadata associated with an entry. Opaque to the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Metadata {
    fields: BTreeMap<String, String>,
}

impl Metadata {
    pub const FILENAME: &'static str = "filename";
    pub const SOURCE: &'static str = "source";

    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Metadata recorded for a file uploaded by a user.
    pub fn uploaded_file(filename: impl Into<String>) -> Self {
        let mut metadata = Self::new();
        metadata.insert(Self::FILENAME, filename);
        metadata.insert(Self::SOURCE, "uploaded_file");
        metadata
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn filename(&self) -> Option<&str> {
        self.get(Self::FILENAME)
    }
}

/// A document waiting to be embedded and stored.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub document_text: String,
    pub metadata: Metadata,
    /// Text handed to the embedder.
    pub embed_text: String,
}

impl NewEntry {
    /// An entry whose stored text is also what gets embedded.
    pub fn new(document_text: impl Into<String>, metadata: Metadata) -> Self {
        let document_text = document_text.into();
        Self {
            embed_text: document_text.clone(),
            document_text,
            metadata,
        }
    }
}

/// One stored document. Its vector lives in the collection's index.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,
    pub document_text: String,
    pub metadata: Metadata,
}

/// A search result: the matching entry and its distance to the query.
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub entry: &'a Entry,
    pub distance: f32,
}

/// The set of stored entries plus the index that searches them.
#[derive(Debug)]
pub struct Collection<I: Index> {
    index: I,
    entries: Vec<Entry>,
    /// Insertion sequence -> position in `entries`
    positions: HashMap<u64, usize>,
    /// Next sequence number to assign. Survives `delete_all`.
    next_seq: u64,
    /// Random tag distinguishing ids minted by this collection
    instance: u64,
    /// Enforced vector dimension
    dimension: Option<usize>,
}

impl Collection<FlatIndex> {
    /// Create an empty collection with a brute-force flat index.
    pub fn new(metric: DistanceMetric) -> Self {
        Self::with_index(FlatIndex::new(metric))
    }
}

impl<I: Index> Collection<I> {
    /// Create an empty collection over `index`, honoring a pinned dimension.
    pub fn from_config(index: I, config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let mut collection = Self::with_index(index);
        collection.dimension = config.dimension;
        Ok(collection)
    }

    /// Create an empty collection over the given index.
    pub fn with_index(mut index: I) -> Self {
        index.clear();
        Self {
            index,
            entries: Vec::new(),
            positions: HashMap::new(),
            next_seq: 0,
            instance: rand::random(),
            dimension: None,
        }
    }

    /// Embed and append a batch of documents, returning their new ids in
    /// batch order.
    ///
    /// All-or-nothing: if any document fails to embed or yields a vector of
    /// the wrong dimension, nothing from the batch is kept.
    pub fn insert(&mut self, embedder: &dyn Embedder, batch: Vec<NewEntry>) -> Result<Vec<EntryId>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = batch
            .par_iter()
            .map(|item| embedder.embed(&item.embed_text))
            .collect::<Result<Vec<Vector>>>()?;

        let dimension = self.check_vectors(&vectors)?;

        let prior_len = self.entries.len();
        let mut ids = Vec::with_capacity(batch.len());
        for (item, vector) in batch.into_iter().zip(vectors) {
            let seq = self.next_seq;
            if let Err(e) = self.index.add(seq, vector) {
                self.rollback(prior_len);
                return Err(e);
            }
            self.next_seq += 1;

            let id = EntryId {
                instance: self.instance,
                seq,
            };
            self.positions.insert(seq, self.entries.len());
            self.entries.push(Entry {
                id,
                document_text: item.document_text,
                metadata: item.metadata,
            });
            ids.push(id);
        }

        self.dimension = Some(dimension);
        debug!(added = ids.len(), total = self.entries.len(), "inserted batch");
        Ok(ids)
    }

    /// Validate a batch of fresh vectors and return their common dimension.
    fn check_vectors(&self, vectors: &[Vector]) -> Result<usize> {
        let mut expected = self.dimension;
        for vector in vectors {
            let actual = vector.dimension();
            if actual == 0 {
                return Err(StoreError::Embedding(
                    "embedder returned an empty vector".to_string(),
                ));
            }
            if !vector.is_finite() {
                return Err(StoreError::Embedding(
                    "embedder returned non-finite values".to_string(),
                ));
            }
            match expected {
                Some(expected) if expected != actual => {
                    return Err(StoreError::DimensionMismatch { expected, actual });
                }
                Some(_) => {}
                None => expected = Some(actual),
            }
        }
        // `vectors` is non-empty here, so `expected` has been set.
        expected.ok_or_else(|| StoreError::Index("empty batch".to_string()))
    }

    /// Drop every entry past `len`, from both the entry list and the index.
    fn rollback(&mut self, len: usize) {
        for entry in self.entries.drain(len..) {
            self.index.remove(entry.id.seq);
            self.positions.remove(&entry.id.seq);
        }
        warn!(kept = len, "rolled back partially inserted batch");
    }

    /// Find the `k` entries closest to `query`, nearest first. Ties keep
    /// insertion order. An empty collection yields no hits.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<SearchHit<'_>>> {
        if self.is_empty() {
            return Ok(vec![]);
        }

        if let Some(expected) = self.dimension {
            if query.dimension() != expected {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    actual: query.dimension(),
                });
            }
        }

        let hits = self
            .index
            .search(query, k)?
            .into_iter()
            .filter_map(|(seq, distance)| {
                self.positions.get(&seq).map(|&pos| SearchHit {
                    entry: &self.entries[pos],
                    distance,
                })
            })
            .collect();

        Ok(hits)
    }

    /// Remove every entry. Idempotent. Ids are not recycled afterwards.
    pub fn delete_all(&mut self) {
        self.index.clear();
        self.entries.clear();
        self.positions.clear();
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        if id.instance != self.instance {
            return None;
        }
        self.positions.get(&id.seq).map(|&pos| &self.entries[pos])
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Get the distance metric used by this collection
    pub fn metric(&self) -> DistanceMetric {
        self.index.metric()
    }

    /// Get the dimension of vectors in this collection (if known)
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}
