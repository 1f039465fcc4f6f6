//! Test doubles for the embedder and store seams.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::embed::{Embedder, Embedding};
use crate::store::{IndexSpec, Record, ScoredRecord, VectorStore};
use crate::{Error, Result};

pub const BIGRAM_DIMENSION: usize = 384;

/// Deterministic character-bigram embedder.
///
/// Each adjacent character pair bumps one bucket, so names sharing bigrams
/// get high cosine similarity and names sharing none score zero.
pub struct BigramEmbedder {
    pub calls: usize,
}

impl BigramEmbedder {
    pub fn new() -> Self {
        Self { calls: 0 }
    }

    fn encode(text: &str) -> Embedding {
        let chars: Vec<char> = text.chars().collect();
        let mut vector = vec![0.0; BIGRAM_DIMENSION];
        for pair in chars.windows(2) {
            let bucket = (pair[0] as usize * 31 + pair[1] as usize) % BIGRAM_DIMENSION;
            vector[bucket] += 1.0;
        }
        vector
    }
}

impl Embedder for BigramEmbedder {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.calls += 1;
        Ok(texts.iter().map(|text| Self::encode(text)).collect())
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        self.calls += 1;
        Ok(Self::encode(text))
    }

    fn dimension(&self) -> usize {
        BIGRAM_DIMENSION
    }

    fn model_name(&self) -> &str {
        "test/bigram"
    }
}

/// Embedder whose inference always fails.
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed_documents(&mut self, _texts: &[&str]) -> Result<Vec<Embedding>> {
        Err(Error::Embedding("inference failed".to_string()))
    }

    fn embed_query(&mut self, _text: &str) -> Result<Embedding> {
        Err(Error::Embedding("inference failed".to_string()))
    }

    fn dimension(&self) -> usize {
        BIGRAM_DIMENSION
    }

    fn model_name(&self) -> &str {
        "test/failing"
    }
}

/// Embedder that declares one size and produces another.
pub struct MisreportingEmbedder;

impl Embedder for MisreportingEmbedder {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|_| vec![1.0; 3]).collect())
    }

    fn embed_query(&mut self, _text: &str) -> Result<Embedding> {
        Ok(vec![1.0; 3])
    }

    fn dimension(&self) -> usize {
        BIGRAM_DIMENSION
    }

    fn model_name(&self) -> &str {
        "test/misreporting"
    }
}

/// Store that accepts the index but fails every query after the first
/// `healthy_queries`.
pub struct FlakyStore {
    pub healthy_queries: usize,
    queries: AtomicUsize,
}

impl FlakyStore {
    pub fn new(healthy_queries: usize) -> Self {
        Self {
            healthy_queries,
            queries: AtomicUsize::new(0),
        }
    }
}

impl VectorStore for FlakyStore {
    fn ensure_index(&mut self, _spec: &IndexSpec) -> Result<()> {
        Ok(())
    }

    fn upsert(&mut self, records: &[Record]) -> Result<usize> {
        Ok(records.len())
    }

    fn query(
        &self,
        _vector: &[f32],
        _top_k: usize,
        _include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>> {
        let seen = self.queries.fetch_add(1, Ordering::SeqCst);
        if seen < self.healthy_queries {
            Ok(Vec::new())
        } else {
            Err(Error::Store("pinecone returned 503 Service Unavailable".to_string()))
        }
    }

    fn count(&self) -> Result<usize> {
        Ok(0)
    }
}

/// Store whose matches come back without the name metadata.
pub struct MetadataFreeStore;

impl VectorStore for MetadataFreeStore {
    fn ensure_index(&mut self, _spec: &IndexSpec) -> Result<()> {
        Ok(())
    }

    fn upsert(&mut self, records: &[Record]) -> Result<usize> {
        Ok(records.len())
    }

    fn query(
        &self,
        _vector: &[f32],
        _top_k: usize,
        _include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>> {
        Ok(vec![ScoredRecord {
            id: "name_0".to_string(),
            score: 0.9,
            metadata: None,
        }])
    }

    fn count(&self) -> Result<usize> {
        Ok(1)
    }
}
