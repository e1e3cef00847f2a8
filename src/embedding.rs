//! Text embedding.
//!
//! The store only depends on the [`Embedder`] contract: text in, fixed-length
//! vector out, or an embedding error. [`HashEmbedder`] is a dependency-free
//! implementation based on feature hashing, so the CLI, the HTTP server and
//! the tests can run without a model.

use crate::error::{Result, StoreError};
use crate::vector::Vector;

/// Maps text to a fixed-dimension vector.
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vector>;
}

impl<F> Embedder for F
where
    F: Fn(&str) -> Result<Vector> + Send + Sync,
{
    fn embed(&self, text: &str) -> Result<Vector> {
        self(text)
    }
}

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing embedder.
///
/// Lowercased alphanumeric words and their character trigrams are hashed
/// (CRC32) into `dimension` signed buckets, then the vector is scaled to unit
/// length. Identical texts map to identical vectors; texts sharing vocabulary
/// land close together. Text with no alphanumeric content embeds to the zero
/// vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub const DEFAULT_DIMENSION: usize = 256;

    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(StoreError::InvalidConfig(
                "embedding dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn accumulate(&self, data: &mut [f32], prefix: &[u8], feature: &[u8], weight: f32) {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(prefix);
        hasher.update(feature);
        let hash = hasher.finalize();

        let bucket = hash as usize % self.dimension;
        let sign = if hash & 0x8000_0000 == 0 { 1.0 } else { -1.0 };
        data[bucket] += sign * weight;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimension: Self::DEFAULT_DIMENSION,
        }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        let mut data = vec![0.0f32; self.dimension];

        let lowered = text.to_lowercase();
        for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            self.accumulate(&mut data, b"w:", word.as_bytes(), WORD_WEIGHT);

            let chars: Vec<char> = format!("^{}$", word).chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                self.accumulate(&mut data, b"t:", trigram.as_bytes(), TRIGRAM_WEIGHT);
            }
        }

        let mut vector = Vector::new(data);
        if !vector.is_zero() {
            vector.normalize()?;
        }
        Ok(vector)
    }
}
