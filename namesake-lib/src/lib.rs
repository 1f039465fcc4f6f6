//! namesake - nearest-neighbour name matching
//!
//! # Architecture
//!
//! ```text
//! Names -> lowercase -> Embedder -> Store (upsert, metadata = original name)
//!                                      |
//! Input -> lowercase -> Embedder -> Store (top-k cosine) <-+
//!                                      |
//!                               QueryResponse -> Shell
//! ```
//!
//! # Example
//!
//! ```ignore
//! use namesake_lib::{config::Config, embed::MiniLmEmbedder, search::NameMatcher, store::PineconeStore};
//!
//! let config = Config::from_env()?;
//! let embedder = MiniLmEmbedder::new(config.model_cache_dir.clone())?;
//! let store = PineconeStore::new(&config.pinecone)?;
//! let mut matcher = NameMatcher::connect(embedder, store, config.index_spec())?;
//!
//! // Index known names
//! matcher.index(namesake_lib::names::DEFAULT_NAMES)?;
//!
//! // Match
//! let response = matcher.query("Jon Smith", config.top_k)?;
//! ```

pub mod config;
pub mod embed;
pub mod error;
pub mod names;
pub mod search;
pub mod shell;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
