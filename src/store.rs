//! Document store API: the façade callers talk to.
//!
//! [`DocumentStore`] validates uploads, normalizes their text, embeds them
//! into a [`Collection`] and answers "most relevant document" queries. Every
//! operation returns a [`Result`] whose error carries a kind and a readable
//! message; nothing panics across this boundary.
//!
//! A store whose construction failed stays usable as a value but answers every
//! call with [`StoreError::Unavailable`].

use crate::collection::{Collection, EntryId, Metadata, NewEntry};
use crate::config::StoreConfig;
use crate::distance::DistanceMetric;
use crate::document::{canonicalize, DocumentFile};
use crate::embedding::{Embedder, HashEmbedder};
use crate::error::{Result, StoreError};
use crate::flat_index::FlatIndex;
use crate::index::Index;
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Outcome of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct AddReport {
    pub added: usize,
    pub total: usize,
    pub ids: Vec<EntryId>,
}

impl fmt::Display for AddReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Upload complete: added {} documents. Total in store: {}.",
            self.added, self.total
        )
    }
}

/// Outcome of clearing the store.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeleteReport {
    pub count: usize,
}

impl fmt::Display for DeleteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deleted all documents. The collection now contains {} documents.",
            self.count
        )
    }
}

/// A retrieved document.
#[derive(Debug, Clone, Serialize)]
pub struct QueryHit {
    pub id: EntryId,
    pub filename: String,
    pub distance: f32,
    pub body: String,
    #[serde(skip)]
    precision: usize,
}

impl QueryHit {
    /// One-line summary naming the source file and the distance.
    pub fn header(&self) -> String {
        format!(
            "Most relevant document: {} (distance: {:.*})",
            self.filename, self.precision, self.distance
        )
    }
}

enum State<I: Index> {
    Ready {
        embedder: Box<dyn Embedder>,
        collection: Mutex<Collection<I>>,
    },
    Unavailable {
        reason: String,
    },
}

/// The in-memory semantic document store.
///
/// All operations take `&self`; a single mutex around the collection
/// serializes them, so the store can be shared behind an `Arc`.
pub struct DocumentStore<I: Index = FlatIndex> {
    state: State<I>,
    precision: usize,
}

impl DocumentStore<FlatIndex> {
    /// Build a brute-force store around `embedder`. Construction failures
    /// leave the store in degraded mode rather than returning an error.
    pub fn new(embedder: impl Embedder + 'static, config: StoreConfig) -> Self {
        let index = FlatIndex::new(config.metric);
        Self::with_index(embedder, index, config)
    }

    /// Build a store that embeds with [`HashEmbedder`] sized from the config.
    ///
    /// A pinned dimension that disagrees with the embedder's output would
    /// reject every upload, so it is treated as a construction failure.
    pub fn with_hash_embedder(config: StoreConfig) -> Self {
        let embedder = match HashEmbedder::new(config.embedding_dimension) {
            Ok(embedder) => embedder,
            Err(e) => {
                error!(error = %e, "failed to initialize embedder");
                return Self::unavailable(e.to_string());
            }
        };

        if let Some(pinned) = config.dimension {
            if pinned != embedder.dimension() {
                let e = StoreError::InvalidConfig(format!(
                    "pinned dimension {} does not match embedding dimension {}",
                    pinned,
                    embedder.dimension()
                ));
                error!(error = %e, "failed to initialize document store");
                return Self::unavailable(e.to_string());
            }
        }

        Self::new(embedder, config)
    }
}

impl<I: Index> DocumentStore<I> {
    /// Build a store over a caller-supplied index.
    pub fn with_index(embedder: impl Embedder + 'static, index: I, config: StoreConfig) -> Self {
        let precision = config.precision;
        match Collection::from_config(index, &config) {
            Ok(collection) => {
                info!(metric = %collection.metric(), "document store initialized");
                Self {
                    state: State::Ready {
                        embedder: Box::new(embedder),
                        collection: Mutex::new(collection),
                    },
                    precision,
                }
            }
            Err(e) => {
                error!(error = %e, "failed to initialize document store");
                Self::unavailable(e.to_string())
            }
        }
    }

    /// A store in degraded mode.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: State::Unavailable {
                reason: reason.into(),
            },
            precision: StoreConfig::default().precision,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }

    fn ready(&self) -> Result<(&dyn Embedder, MutexGuard<'_, Collection<I>>)> {
        match &self.state {
            State::Ready {
                embedder,
                collection,
            } => {
                let guard = collection
                    .lock()
                    .map_err(|_| StoreError::Index("lock poisoned".to_string()))?;
                Ok((embedder.as_ref(), guard))
            }
            State::Unavailable { reason } => Err(StoreError::Unavailable {
                reason: reason.clone(),
            }),
        }
    }

    /// Validate, normalize, embed and store a batch of files.
    ///
    /// The batch is all-or-nothing: an unsupported extension, an unreadable
    /// file or an embedding failure on any file leaves the collection exactly
    /// as it was.
    pub fn add_documents(&self, files: &[DocumentFile]) -> Result<AddReport> {
        if let State::Unavailable { reason } = &self.state {
            return Err(StoreError::Unavailable {
                reason: reason.clone(),
            });
        }
        if files.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let mut batch = Vec::with_capacity(files.len());
        for file in files {
            let name = file.basename();
            if !file.has_accepted_extension() {
                warn!(file = name, "rejected upload batch: unsupported file type");
                return Err(StoreError::UnsupportedFile {
                    name: name.to_string(),
                });
            }
            let text = file.text().map_err(|e| {
                warn!(file = name, error = %e, "rejected upload batch: unreadable file");
                e
            })?;
            batch.push(NewEntry::new(canonicalize(text), Metadata::uploaded_file(name)));
        }

        let (embedder, mut collection) = self.ready()?;
        let ids = collection.insert(embedder, batch)?;
        let report = AddReport {
            added: ids.len(),
            total: collection.count(),
            ids,
        };
        info!(added = report.added, total = report.total, "documents added");
        Ok(report)
    }

    /// Return the single document closest to `text`.
    pub fn query(&self, text: &str) -> Result<QueryHit> {
        self.query_top(text, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound {
                query: text.to_string(),
            })
    }

    /// Return up to `k` documents closest to `text`, nearest first.
    pub fn query_top(&self, text: &str, k: usize) -> Result<Vec<QueryHit>> {
        if let State::Unavailable { reason } = &self.state {
            return Err(StoreError::Unavailable {
                reason: reason.clone(),
            });
        }
        if text.trim().is_empty() {
            return Err(StoreError::EmptyQuery);
        }

        let (embedder, collection) = self.ready()?;
        if collection.is_empty() {
            return Err(StoreError::EmptyCollection);
        }

        let query = embedder.embed(text)?;
        let hits = collection.search(&query, k)?;
        debug!(k, found = hits.len(), "query served");

        Ok(hits
            .into_iter()
            .map(|hit| QueryHit {
                id: hit.entry.id.clone(),
                filename: hit
                    .entry
                    .metadata
                    .filename()
                    .unwrap_or("unknown")
                    .to_string(),
                distance: hit.distance,
                body: hit.entry.document_text.clone(),
                precision: self.precision,
            })
            .collect())
    }

    /// Remove every document. Always leaves the store empty.
    pub fn delete_all(&self) -> Result<DeleteReport> {
        let (_, mut collection) = self.ready()?;
        let removed = collection.count();
        collection.delete_all();
        info!(removed, "collection cleared");
        Ok(DeleteReport {
            count: collection.count(),
        })
    }

    /// Number of stored documents.
    pub fn count(&self) -> Result<usize> {
        let (_, collection) = self.ready()?;
        Ok(collection.count())
    }

    /// Distance metric used for ranking.
    pub fn metric(&self) -> Result<DistanceMetric> {
        let (_, collection) = self.ready()?;
        Ok(collection.metric())
    }

    /// Vector dimension, once pinned or learned from the first upload.
    pub fn dimension(&self) -> Result<Option<usize>> {
        let (_, collection) = self.ready()?;
        Ok(collection.dimension())
    }
}

impl<I: Index> fmt::Debug for DocumentStore<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Ready { collection, .. } => {
                let count = collection.lock().map(|c| c.count()).ok();
                f.debug_struct("DocumentStore")
                    .field("available", &true)
                    .field("count", &count)
                    .finish()
            }
            State::Unavailable { reason } => f
                .debug_struct("DocumentStore")
                .field("available", &false)
                .field("reason", reason)
                .finish(),
        }
    }
}
