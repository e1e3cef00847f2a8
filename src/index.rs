//! Index trait for pluggable search backends

use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::vector::Vector;

/// A search index that supports insertion, bulk removal, and k-NN search.
///
/// Vectors are keyed by the collection's insertion sequence number, which is
/// also the tie-break for equal distances: implementations must return
/// results ordered by `(distance, seq)` ascending. An approximate backend can
/// sit behind this trait as long as it keeps that ordering contract.
pub trait Index {
    /// Add a vector under the given sequence number.
    fn add(&mut self, seq: u64, vector: Vector) -> Result<()>;

    /// Remove the vector stored under `seq`, if any.
    fn remove(&mut self, seq: u64);

    /// Search for the `k` nearest neighbors of `query`.
    /// Returns `(seq, distance)` pairs sorted by distance ascending.
    fn search(&self, query: &Vector, k: usize) -> Result<Vec<(u64, f32)>>;

    /// Remove every vector.
    fn clear(&mut self);

    /// The distance metric used by this index.
    fn metric(&self) -> DistanceMetric;

    /// The number of vectors in this index.
    fn len(&self) -> usize;

    /// Whether the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
