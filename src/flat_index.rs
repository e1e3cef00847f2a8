//! Brute-force flat index: O(n) k-NN search

use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::index::Index;
use crate::neighbor::{Neighbor, TopK};
use crate::vector::Vector;

/// A flat (brute-force) index that computes distance to every stored vector.
///
/// Vectors are kept in insertion order, so sequence numbers ascend.
#[derive(Debug)]
pub struct FlatIndex {
    vectors: Vec<(u64, Vector)>,
    metric: DistanceMetric,
}

impl FlatIndex {
    /// Create a new empty flat index with the given distance metric.
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            vectors: Vec::new(),
            metric,
        }
    }
}

impl Index for FlatIndex {
    fn add(&mut self, seq: u64, vector: Vector) -> Result<()> {
        self.vectors.push((seq, vector));
        Ok(())
    }

    fn remove(&mut self, seq: u64) {
        if let Ok(pos) = self.vectors.binary_search_by_key(&seq, |(s, _)| *s) {
            self.vectors.remove(pos);
        }
    }

    fn search(&self, query: &Vector, k: usize) -> Result<Vec<(u64, f32)>> {
        let mut top = TopK::new(k);
        for (seq, vector) in &self.vectors {
            let distance = self.metric.distance(query, vector)?;
            top.push(Neighbor::new(*seq, distance));
        }

        Ok(top
            .into_sorted_vec()
            .into_iter()
            .map(|n| (n.seq, n.distance))
            .collect())
    }

    fn clear(&mut self) {
        self.vectors = Vec::new();
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}
