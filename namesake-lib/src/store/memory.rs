use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::store::{IndexSpec, Metric, Record, ScoredRecord, VectorStore};
use crate::{Error, Result};

/// In-memory vector store for development and testing.
///
/// Uses brute-force cosine similarity search. Suitable for small datasets
/// (< 10k names). For production, use a proper vector database.
pub struct MemoryStore {
    spec: Option<IndexSpec>,
    records: HashMap<String, Record>,
}

impl MemoryStore {
    /// Create a new store with no index configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            spec: None,
            records: HashMap::new(),
        }
    }

    /// Look up a stored record by id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    fn dimension(&self) -> Result<usize> {
        self.spec
            .as_ref()
            .map(|spec| spec.dimension)
            .ok_or_else(|| Error::Store("index has not been created".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Heap entry ordered by score, then by id.
struct Candidate<'a> {
    score: f32,
    record: &'a Record,
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            // ties resolve to the smaller id first
            .then_with(|| other.record.id.cmp(&self.record.id))
    }
}

impl VectorStore for MemoryStore {
    fn ensure_index(&mut self, spec: &IndexSpec) -> Result<()> {
        if spec.metric != Metric::Cosine {
            return Err(Error::Store(format!(
                "memory store only supports cosine, got {}",
                spec.metric
            )));
        }

        match &self.spec {
            Some(existing) if existing.dimension != spec.dimension => {
                Err(Error::DimensionMismatch {
                    expected: spec.dimension,
                    actual: existing.dimension,
                })
            }
            Some(_) => Ok(()),
            None => {
                self.spec = Some(spec.clone());
                Ok(())
            }
        }
    }

    fn upsert(&mut self, records: &[Record]) -> Result<usize> {
        let dimension = self.dimension()?;

        if let Some(bad) = records.iter().find(|r| r.values.len() != dimension) {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                actual: bad.values.len(),
            });
        }

        for record in records {
            self.records.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>> {
        let dimension = self.dimension()?;
        if vector.len() != dimension {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                actual: vector.len(),
            });
        }

        let mut heap: BinaryHeap<Candidate<'_>> = self
            .records
            .values()
            .map(|record| Candidate {
                score: cosine_similarity(vector, &record.values),
                record,
            })
            .collect();

        let mut results = Vec::with_capacity(top_k.min(heap.len()));
        while results.len() < top_k {
            let Some(Candidate { score, record }) = heap.pop() else {
                break;
            };
            results.push(ScoredRecord {
                id: record.id.clone(),
                score: f64::from(score),
                metadata: include_metadata.then(|| record.metadata.clone()),
            });
        }

        Ok(results)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NameMetadata;

    fn make_record(id: &str, name: &str, values: Vec<f32>) -> Record {
        Record {
            id: id.to_string(),
            values,
            metadata: NameMetadata {
                name: name.to_string(),
            },
        }
    }

    fn store_with_dimension(dimension: usize) -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .ensure_index(&IndexSpec::cosine("test", dimension))
            .unwrap();
        store
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_upsert_and_count() {
        let mut store = store_with_dimension(2);
        assert_eq!(store.count().unwrap(), 0);

        let records = vec![
            make_record("1", "Alice", vec![1.0, 0.0]),
            make_record("2", "Bob", vec![0.0, 1.0]),
        ];

        assert_eq!(store.upsert(&records).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_query_returns_sorted() {
        let mut store = store_with_dimension(3);

        let records = vec![
            make_record("1", "far away", vec![0.0, 1.0, 0.0]),
            make_record("2", "very close", vec![1.0, 0.0, 0.0]),
            make_record("3", "medium", vec![0.5, 0.5, 0.0]),
        ];
        store.upsert(&records).unwrap();

        let results = store.query(&[1.0, 0.0, 0.0], 3, true).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "2"); // highest similarity
        assert_eq!(results[1].id, "3"); // medium
        assert_eq!(results[2].id, "1"); // lowest
        assert_eq!(results[0].metadata.as_ref().unwrap().name, "very close");
    }

    #[test]
    fn test_query_respects_k() {
        let mut store = store_with_dimension(2);

        let records = vec![
            make_record("1", "a", vec![1.0, 0.0]),
            make_record("2", "b", vec![0.9, 0.1]),
            make_record("3", "c", vec![0.8, 0.2]),
        ];
        store.upsert(&records).unwrap();

        let results = store.query(&[1.0, 0.0], 2, true).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_query_k_larger_than_store() {
        let mut store = store_with_dimension(2);
        store
            .upsert(&[make_record("1", "only one", vec![1.0, 0.0])])
            .unwrap();

        let results = store.query(&[1.0, 0.0], 100, true).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_query_without_metadata() {
        let mut store = store_with_dimension(2);
        store
            .upsert(&[make_record("1", "Alice", vec![1.0, 0.0])])
            .unwrap();

        let results = store.query(&[1.0, 0.0], 1, false).unwrap();
        assert!(results[0].metadata.is_none());
    }

    #[test]
    fn test_overwrite_by_id() {
        let mut store = store_with_dimension(1);

        store
            .upsert(&[make_record("same-id", "first", vec![1.0])])
            .unwrap();
        store
            .upsert(&[make_record("same-id", "second", vec![1.0])])
            .unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get("same-id").unwrap().metadata.name, "second");
    }

    #[test]
    fn test_empty_query() {
        let store = store_with_dimension(2);
        let results = store.query(&[1.0, 0.0], 5, true).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_ensure_index_is_idempotent() {
        let mut store = store_with_dimension(4);
        store.ensure_index(&IndexSpec::cosine("test", 4)).unwrap();
    }

    #[test]
    fn test_ensure_index_rejects_other_dimension() {
        let mut store = store_with_dimension(4);
        let err = store
            .ensure_index(&IndexSpec::cosine("test", 8))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 8,
                actual: 4
            }
        ));
    }

    #[test]
    fn test_upsert_before_ensure_index_fails() {
        let mut store = MemoryStore::new();
        let err = store
            .upsert(&[make_record("1", "a", vec![1.0])])
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_upsert_rejects_wrong_dimension() {
        let mut store = store_with_dimension(3);
        let err = store
            .upsert(&[make_record("1", "a", vec![1.0, 0.0])])
            .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
        assert_eq!(store.count().unwrap(), 0);
    }
}
