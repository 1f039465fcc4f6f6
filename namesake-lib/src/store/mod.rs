//! Vector storage backends
//!
//! Production traffic goes to a hosted Pinecone index; the in-memory store is
//! a brute-force stand-in for development and tests.
//!
//! # Storage Model
//!
//! Each stored item consists of:
//! - Id: a stable positional key (`name_0`, `name_1`, ...)
//! - Values: the embedding of the lowercased name
//! - Metadata: the original-case display name
//!
//! # Usage
//!
//! ```ignore
//! use namesake_lib::store::{IndexSpec, MemoryStore, VectorStore};
//!
//! let mut store = MemoryStore::new();
//! store.ensure_index(&IndexSpec::cosine("names", 384))?;
//!
//! // Upsert records; same id overwrites
//! store.upsert(&records)?;
//!
//! // Top-k by cosine similarity, highest first
//! let matches = store.query(&query_embedding, 5, true)?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::embed::Embedding;
use crate::Result;

/// Similarity metric an index is configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cosine,
    Euclidean,
    Dotproduct,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
            Metric::Dotproduct => "dotproduct",
        };
        f.write_str(name)
    }
}

/// Shape of the index backing a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    /// Index / collection name
    pub name: String,
    /// Vector dimensionality
    pub dimension: usize,
    /// Similarity metric
    pub metric: Metric,
}

impl IndexSpec {
    /// A cosine-similarity index of the given dimension.
    pub fn cosine(name: impl Into<String>, dimension: usize) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric: Metric::Cosine,
        }
    }
}

/// Metadata stored next to each vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMetadata {
    /// Original-case display name
    pub name: String,
}

/// A record to upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier
    pub id: String,
    /// The embedding vector
    pub values: Embedding,
    /// Display metadata
    pub metadata: NameMetadata,
}

/// A query match with similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    /// Id of the matched record
    pub id: String,
    /// Similarity score (higher is more similar)
    /// For cosine similarity: -1.0 to 1.0
    pub score: f64,
    /// Present when metadata was requested
    pub metadata: Option<NameMetadata>,
}

/// Trait for vector storage backends
pub trait VectorStore: Send + Sync {
    /// Create the index if it does not exist yet
    ///
    /// Idempotent. Fails if an index of that name exists with a different
    /// dimension or metric.
    fn ensure_index(&mut self, spec: &IndexSpec) -> Result<()>;

    /// Insert or overwrite records by id
    ///
    /// # Returns
    /// Number of records written
    fn upsert(&mut self, records: &[Record]) -> Result<usize>;

    /// Search for similar vectors
    ///
    /// # Arguments
    /// * `vector` - The query vector
    /// * `top_k` - Number of results to return
    /// * `include_metadata` - Whether matches carry their metadata
    ///
    /// # Returns
    /// At most `top_k` matches sorted by similarity (highest first)
    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>>;

    /// Number of stored records
    fn count(&self) -> Result<usize>;
}

mod memory;
mod pinecone;

pub use memory::*;
pub use pinecone::*;
