//! Ordering and bounded selection of search candidates.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A search candidate: insertion sequence number and its distance to the query.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub distance: f32,
    pub seq: u64,
}

impl Neighbor {
    pub fn new(seq: u64, distance: f32) -> Self {
        Self { distance, seq }
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Closer first; equal distances fall back to insertion order.
impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Keeps the `k` best neighbors seen so far.
///
/// Backed by a max-heap so the current worst candidate sits on top and can be
/// evicted in O(log k).
#[derive(Debug)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Neighbor>,
}

impl TopK {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(1024)),
        }
    }

    pub fn push(&mut self, neighbor: Neighbor) {
        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(neighbor);
        } else if let Some(worst) = self.heap.peek() {
            if neighbor < *worst {
                self.heap.pop();
                self.heap.push(neighbor);
            }
        }
    }

    /// Consume into a Vec sorted by ascending distance.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}
