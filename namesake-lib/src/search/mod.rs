//! High-level matching interface
//!
//! Combines embedder and store into the two operations the binary needs:
//! indexing a list of known names and finding the names closest to an input.
//!
//! # Usage
//!
//! ```ignore
//! use namesake_lib::search::NameMatcher;
//! use namesake_lib::store::IndexSpec;
//!
//! let mut matcher = NameMatcher::connect(embedder, store, IndexSpec::cosine("names", 384))?;
//! matcher.index(&["Alice", "Alicia", "Bob"])?;
//!
//! let response = matcher.query("Alise", 2)?;
//! if let Some(best) = &response.best_match {
//!     println!("{} ({}%)", best.name, best.score);
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embed::Embedder;
use crate::store::{IndexSpec, NameMetadata, Record, VectorStore};
use crate::{Error, Result};

/// A stored name and how close it is to the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Original-case display name
    pub name: String,
    /// Cosine similarity as a percentage in [0, 100], two decimals
    pub score: f64,
}

/// Result of one query.
///
/// `best_match` is the first element of `all_matches`, or `None` when there
/// are no matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub input_name: String,
    pub best_match: Option<MatchResult>,
    /// Ordered by descending similarity, as returned by the store
    pub all_matches: Vec<MatchResult>,
}

impl QueryResponse {
    fn new(input_name: &str, all_matches: Vec<MatchResult>) -> Self {
        Self {
            input_name: input_name.to_string(),
            best_match: all_matches.first().cloned(),
            all_matches,
        }
    }
}

/// Name matcher combining an embedding model and a vector store.
pub struct NameMatcher<E: Embedder, S: VectorStore> {
    embedder: E,
    store: S,
    spec: IndexSpec,
}

impl<E: Embedder, S: VectorStore> NameMatcher<E, S> {
    /// Check the embedder against the index shape and make sure the index
    /// exists.
    ///
    /// Fails fast with [`Error::DimensionMismatch`] when the embedder's
    /// declared output size is not `spec.dimension`.
    pub fn connect(embedder: E, mut store: S, spec: IndexSpec) -> Result<Self> {
        if embedder.dimension() != spec.dimension {
            return Err(Error::DimensionMismatch {
                expected: spec.dimension,
                actual: embedder.dimension(),
            });
        }

        store.ensure_index(&spec)?;
        debug!(index = %spec.name, model = embedder.model_name(), "matcher connected");

        Ok(Self {
            embedder,
            store,
            spec,
        })
    }

    /// Embed and upsert names, keeping the original spelling as metadata.
    ///
    /// Ids are positional (`name_0`, `name_1`, ...), so indexing the same
    /// list again overwrites rather than duplicates.
    ///
    /// # Returns
    /// Number of records stored
    pub fn index<T: AsRef<str>>(&mut self, names: &[T]) -> Result<usize> {
        if names.is_empty() {
            return Ok(0);
        }

        let lowered: Vec<String> = names.iter().map(|n| n.as_ref().to_lowercase()).collect();
        let texts: Vec<&str> = lowered.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_documents(&texts)?;

        if embeddings.len() != names.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                names.len(),
                embeddings.len()
            )));
        }

        let records = names
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(idx, (name, values))| {
                self.check_dimension(values.len())?;
                Ok(Record {
                    id: format!("name_{idx}"),
                    values,
                    metadata: NameMetadata {
                        name: name.as_ref().to_string(),
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let stored = self.store.upsert(&records)?;
        info!(index = %self.spec.name, stored, "indexed names");
        Ok(stored)
    }

    /// Find the `top_k` stored names most similar to `input_name`.
    pub fn query(&mut self, input_name: &str, top_k: usize) -> Result<QueryResponse> {
        if top_k == 0 {
            return Err(Error::InvalidInput("top_k must be at least 1".to_string()));
        }

        let embedding = self.embedder.embed_query(&input_name.to_lowercase())?;
        self.check_dimension(embedding.len())?;

        let matches = self.store.query(&embedding, top_k, true)?;
        debug!(input = input_name, top_k, matches = matches.len(), "query answered");

        let all_matches = matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.ok_or_else(|| {
                    Error::Store(format!("match {} has no name metadata", m.id))
                })?;
                Ok(MatchResult {
                    name: metadata.name,
                    score: percentage(m.score),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(QueryResponse::new(input_name, all_matches))
    }

    /// Number of records in the store.
    pub fn len(&self) -> Result<usize> {
        self.store.count()
    }

    /// The index this matcher reads and writes.
    #[must_use]
    pub fn spec(&self) -> &IndexSpec {
        &self.spec
    }

    /// Returns a reference to the embedder.
    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Returns a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual == self.spec.dimension {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.spec.dimension,
                actual,
            })
        }
    }
}

/// Similarity to a 0-100 percentage rounded to two decimals.
///
/// Rounds the decimal expansion of `similarity * 100`, so 0.13615 (stored as
/// 13.6149...) becomes 13.61. Cosine similarity can go negative; those clamp
/// to 0.
fn percentage(similarity: f64) -> f64 {
    let scaled = similarity * 100.0;
    let rounded = format!("{scaled:.2}").parse::<f64>().unwrap_or(scaled);
    rounded.clamp(0.0, 100.0)
}
