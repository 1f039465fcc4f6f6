//! Text embedding using local models
//!
//! Uses sentence-transformers/all-MiniLM-L6-v2 via the fastembed crate
//! (ONNX runtime).
//!
//! # Model Details
//!
//! - Dimensions: 384
//! - Max tokens: 256
//! - Output vectors are L2-normalised, so cosine similarity is well defined
//!
//! # Usage
//!
//! ```ignore
//! use namesake_lib::embed::{Embedder, MiniLmEmbedder};
//!
//! let mut embedder = MiniLmEmbedder::new(None)?;
//!
//! // Embed names (for indexing)
//! let name_embeddings = embedder.embed_documents(&["alice", "bob"])?;
//!
//! // Embed a single name (for searching)
//! let query_embedding = embedder.embed_query("alise")?;
//! ```

use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
///
/// Implementations must be deterministic for a given model and input, and
/// every vector they return must have [`dimension`](Embedder::dimension)
/// elements.
pub trait Embedder: Send + Sync {
    /// Embed multiple texts for indexing
    ///
    /// Texts may be batched for efficiency. The output has one embedding per
    /// input, in input order.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single text for searching
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

mod minilm;
pub use minilm::*;
