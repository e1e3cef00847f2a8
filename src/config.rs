//! Store configuration

use crate::distance::DistanceMetric;
use crate::embedding::HashEmbedder;
use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};

/// Decimal places past which a distance carries no useful signal.
const MAX_PRECISION: usize = 9;

/// Configuration for a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Distance metric, fixed for the lifetime of the store.
    pub metric: DistanceMetric,
    /// Pin the embedding dimension up front. When unset, the first
    /// successful embedding decides it.
    pub dimension: Option<usize>,
    /// Output dimension of the built-in hashing embedder.
    pub embedding_dimension: usize,
    /// Decimal places used when formatting distances.
    pub precision: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default(),
            dimension: None,
            embedding_dimension: HashEmbedder::DEFAULT_DIMENSION,
            precision: 4,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dimension == Some(0) {
            return Err(StoreError::InvalidConfig(
                "pinned dimension must be positive".to_string(),
            ));
        }
        if self.embedding_dimension == 0 {
            return Err(StoreError::InvalidConfig(
                "embedding dimension must be positive".to_string(),
            ));
        }
        if self.precision > MAX_PRECISION {
            return Err(StoreError::InvalidConfig(format!(
                "precision {} exceeds the maximum of {}",
                self.precision, MAX_PRECISION
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StoreConfig::default();
        assert_eq!(config.metric, DistanceMetric::SquaredEuclidean);
        assert_eq!(config.precision, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_dimension_is_invalid() {
        let config = StoreConfig {
            dimension: Some(0),
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: StoreConfig = serde_json::from_str(r#"{"metric": "cosine"}"#).unwrap();
        assert_eq!(config.metric, DistanceMetric::Cosine);
        assert_eq!(config.embedding_dimension, HashEmbedder::DEFAULT_DIMENSION);
    }
}
